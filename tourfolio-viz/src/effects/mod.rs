//! Shader effect library for the portfolio grid
//!
//! Three effect programs are available, each pairing a WGSL vertex and
//! fragment stage with a typed uniform record:
//!
//! - **Particle**: attractor-driven UV distortion with layered value-noise grain
//! - **Paper**: wave/curl displacement, warm tint, grain and vignette
//! - **Combined**: a lighter mix of both, driven by one animation speed
//!
//! Every rendered mesh owns its own [`EffectMaterial`]. Materials are not
//! `Clone`, so two tiles can never share a uniform record.
//!
//! # Example
//!
//! ```
//! use tourfolio_viz::effects::{EffectKind, EffectMaterial};
//!
//! let mut material = EffectMaterial::new(EffectKind::from_selector(Some("paper")), "/img/gym.jpg");
//! material.uniforms_mut().apply_hover(1.0);
//! assert_eq!(material.kind(), EffectKind::Paper);
//! ```

mod shaders;
mod uniforms;

pub use shaders::{combined_shader, panorama_shader, paper_shader, particle_shader};
pub use uniforms::{
    CombinedUniforms, DEFAULT_ANIMATION_SPEED, DEFAULT_CURL_AMOUNT, DEFAULT_PARTICLE_SIZE,
    DEFAULT_RESOLUTION, DEFAULT_SPEED, PaperUniforms, ParticleUniforms, TransformUniforms,
};

/// Peak values the hover-driven uniforms reach at full hover progress
pub mod hover_peaks {
    pub const PARTICLE_INTENSITY: f32 = 0.15;
    pub const PARTICLE_DISTORTION: f32 = 0.08;
    pub const PAPER_WAVE: f32 = 0.03;
    pub const PAPER_STRENGTH: f32 = 0.4;
    pub const COMBINED_PARTICLE: f32 = 0.08;
    pub const COMBINED_PAPER: f32 = 0.25;
}

/// Effect selection for one grid tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EffectKind {
    #[default]
    Particle,
    Paper,
    Combined,
}

impl EffectKind {
    pub const ALL: [EffectKind; 3] = [EffectKind::Particle, EffectKind::Paper, EffectKind::Combined];

    /// Resolve a metadata selector. Missing or unrecognized values select
    /// [`EffectKind::Particle`].
    pub fn from_selector(selector: Option<&str>) -> Self {
        match selector.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("paper") => EffectKind::Paper,
            Some("combined") => EffectKind::Combined,
            Some("particle") | Some("particles") => EffectKind::Particle,
            Some(other) => {
                tracing::warn!(selector = other, "unknown effect selector, using particles");
                EffectKind::Particle
            }
            None => EffectKind::Particle,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EffectKind::Particle => "particles",
            EffectKind::Paper => "paper",
            EffectKind::Combined => "combined",
        }
    }

    /// Complete WGSL source for this effect
    pub fn shader_source(&self) -> String {
        match self {
            EffectKind::Particle => particle_shader(),
            EffectKind::Paper => paper_shader(),
            EffectKind::Combined => combined_shader(),
        }
    }
}

/// Typed uniform record of one material
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectUniforms {
    Particle(ParticleUniforms),
    Paper(PaperUniforms),
    Combined(CombinedUniforms),
}

impl EffectUniforms {
    /// Neutral uniforms for the given effect (hover-driven values at zero)
    pub fn defaults(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Particle => EffectUniforms::Particle(ParticleUniforms::default()),
            EffectKind::Paper => EffectUniforms::Paper(PaperUniforms::default()),
            EffectKind::Combined => EffectUniforms::Combined(CombinedUniforms::default()),
        }
    }

    pub fn kind(&self) -> EffectKind {
        match self {
            EffectUniforms::Particle(_) => EffectKind::Particle,
            EffectUniforms::Paper(_) => EffectKind::Paper,
            EffectUniforms::Combined(_) => EffectKind::Combined,
        }
    }

    pub fn time(&self) -> f32 {
        match self {
            EffectUniforms::Particle(u) => u.time,
            EffectUniforms::Paper(u) => u.time,
            EffectUniforms::Combined(u) => u.time,
        }
    }

    pub fn set_time(&mut self, time: f32) {
        match self {
            EffectUniforms::Particle(u) => u.time = time,
            EffectUniforms::Paper(u) => u.time = time,
            EffectUniforms::Combined(u) => u.time = time,
        }
    }

    pub fn mouse(&self) -> [f32; 2] {
        match self {
            EffectUniforms::Particle(u) => u.mouse,
            EffectUniforms::Paper(u) => u.mouse,
            EffectUniforms::Combined(u) => u.mouse,
        }
    }

    pub fn set_mouse(&mut self, mouse: [f32; 2]) {
        match self {
            EffectUniforms::Particle(u) => u.mouse = mouse,
            EffectUniforms::Paper(u) => u.mouse = mouse,
            EffectUniforms::Combined(u) => u.mouse = mouse,
        }
    }

    /// Scale the hover-driven uniforms by `progress` (0..=1)
    pub fn apply_hover(&mut self, progress: f32) {
        let p = progress.clamp(0.0, 1.0);
        match self {
            EffectUniforms::Particle(u) => {
                u.intensity = p * hover_peaks::PARTICLE_INTENSITY;
                u.distortion_strength = p * hover_peaks::PARTICLE_DISTORTION;
            }
            EffectUniforms::Paper(u) => {
                u.wave_intensity = p * hover_peaks::PAPER_WAVE;
                u.paper_strength = p * hover_peaks::PAPER_STRENGTH;
            }
            EffectUniforms::Combined(u) => {
                u.particle_intensity = p * hover_peaks::COMBINED_PARTICLE;
                u.paper_intensity = p * hover_peaks::COMBINED_PAPER;
            }
        }
    }

    /// Raw bytes for uniform buffer upload
    #[cfg(feature = "webgpu")]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            EffectUniforms::Particle(u) => bytemuck::bytes_of(u),
            EffectUniforms::Paper(u) => bytemuck::bytes_of(u),
            EffectUniforms::Combined(u) => bytemuck::bytes_of(u),
        }
    }
}

/// A self-contained shader program instance bound to one mesh
#[derive(Debug)]
pub struct EffectMaterial {
    kind: EffectKind,
    texture_url: String,
    uniforms: EffectUniforms,
}

impl EffectMaterial {
    pub fn new(kind: EffectKind, texture_url: impl Into<String>) -> Self {
        Self {
            kind,
            texture_url: texture_url.into(),
            uniforms: EffectUniforms::defaults(kind),
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    /// URL of the texture bound to this material
    pub fn texture_url(&self) -> &str {
        &self.texture_url
    }

    pub fn uniforms(&self) -> &EffectUniforms {
        &self.uniforms
    }

    pub fn uniforms_mut(&mut self) -> &mut EffectUniforms {
        &mut self.uniforms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_selector_defaults_to_particles() {
        assert_eq!(EffectKind::from_selector(None), EffectKind::Particle);
    }

    #[test]
    fn unknown_selector_falls_back_to_particles() {
        assert_eq!(EffectKind::from_selector(Some("watercolor")), EffectKind::Particle);
        assert_eq!(EffectKind::from_selector(Some("")), EffectKind::Particle);
    }

    #[test]
    fn known_selectors_resolve() {
        assert_eq!(EffectKind::from_selector(Some("paper")), EffectKind::Paper);
        assert_eq!(EffectKind::from_selector(Some("Combined")), EffectKind::Combined);
        assert_eq!(EffectKind::from_selector(Some("particles")), EffectKind::Particle);
        assert_eq!(EffectKind::from_selector(Some("particle")), EffectKind::Particle);
    }

    #[test]
    fn selector_names_round_trip() {
        for kind in EffectKind::ALL {
            assert_eq!(EffectKind::from_selector(Some(kind.name())), kind);
        }
    }

    #[test]
    fn material_uniforms_match_kind() {
        for kind in EffectKind::ALL {
            let material = EffectMaterial::new(kind, "/img.jpg");
            assert_eq!(material.uniforms().kind(), kind);
            assert_eq!(material.uniforms().time(), 0.0);
            assert_eq!(material.uniforms().mouse(), [0.0, 0.0]);
            assert_eq!(material.texture_url(), "/img.jpg");
        }
    }

    #[test]
    fn materials_do_not_share_uniforms() {
        let mut a = EffectMaterial::new(EffectKind::Particle, "/a.jpg");
        let b = EffectMaterial::new(EffectKind::Particle, "/b.jpg");

        a.uniforms_mut().apply_hover(1.0);
        a.uniforms_mut().set_time(4.0);

        assert_ne!(a.uniforms(), b.uniforms());
        assert_eq!(*b.uniforms(), EffectUniforms::defaults(EffectKind::Particle));
    }

    #[test]
    fn full_hover_reaches_peak_values() {
        let mut particle = EffectUniforms::defaults(EffectKind::Particle);
        particle.apply_hover(1.0);
        match particle {
            EffectUniforms::Particle(u) => {
                assert_eq!(u.intensity, 0.15);
                assert_eq!(u.distortion_strength, 0.08);
            }
            _ => panic!("expected particle uniforms"),
        }

        let mut paper = EffectUniforms::defaults(EffectKind::Paper);
        paper.apply_hover(1.0);
        match paper {
            EffectUniforms::Paper(u) => {
                assert_eq!(u.wave_intensity, 0.03);
                assert_eq!(u.paper_strength, 0.4);
            }
            _ => panic!("expected paper uniforms"),
        }

        let mut combined = EffectUniforms::defaults(EffectKind::Combined);
        combined.apply_hover(1.0);
        match combined {
            EffectUniforms::Combined(u) => {
                assert_eq!(u.particle_intensity, 0.08);
                assert_eq!(u.paper_intensity, 0.25);
            }
            _ => panic!("expected combined uniforms"),
        }
    }

    #[test]
    fn hover_progress_is_clamped() {
        let mut paper = EffectUniforms::defaults(EffectKind::Paper);
        paper.apply_hover(3.0);
        if let EffectUniforms::Paper(u) = paper {
            assert_eq!(u.paper_strength, hover_peaks::PAPER_STRENGTH);
        }
    }

    #[test]
    fn zero_hover_restores_neutral_values() {
        let mut combined = EffectUniforms::defaults(EffectKind::Combined);
        combined.apply_hover(0.7);
        combined.apply_hover(0.0);
        assert_eq!(combined, EffectUniforms::defaults(EffectKind::Combined));
    }
}
