//! Uniform records for the effect shaders
//!
//! Each record is repr(C) and laid out to match its WGSL struct so it can be
//! uploaded directly to a uniform buffer. Sizes are multiples of 16 bytes.

/// Default particle radius parameter (attractor radius = size * 0.01 in UV units)
pub const DEFAULT_PARTICLE_SIZE: f32 = 20.0;

/// Default attractor speed
pub const DEFAULT_SPEED: f32 = 1.0;

/// Default curl amount for the paper effect
pub const DEFAULT_CURL_AMOUNT: f32 = 0.5;

/// Default animation speed for the combined effect
pub const DEFAULT_ANIMATION_SPEED: f32 = 1.0;

/// Nominal texture resolution passed to the particle shader
pub const DEFAULT_RESOLUTION: [f32; 2] = [512.0, 512.0];

/// Per-mesh placement, shared by all three effect programs
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "webgpu", derive(bytemuck::Pod, bytemuck::Zeroable))]
pub struct TransformUniforms {
    pub view_proj: [f32; 16],
    /// World-space offset of the mesh (w unused)
    pub offset: [f32; 4],
    /// Per-axis scale of the mesh (w unused)
    pub scale: [f32; 4],
}

impl TransformUniforms {
    pub fn new(view_proj: [f32; 16], position: [f32; 3], size: [f32; 2]) -> Self {
        Self {
            view_proj,
            offset: [position[0], position[1], position[2], 0.0],
            scale: [size[0], size[1], 1.0, 0.0],
        }
    }
}

/// Uniforms of the particle-distortion program
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "webgpu", derive(bytemuck::Pod, bytemuck::Zeroable))]
pub struct ParticleUniforms {
    pub time: f32,
    /// Surface wave amplitude (hover driven)
    pub intensity: f32,
    pub mouse: [f32; 2],
    pub resolution: [f32; 2],
    pub particle_size: f32,
    pub speed: f32,
    /// UV displacement scale of the attractors (hover driven)
    pub distortion_strength: f32,
    pub _pad0: f32,
    pub _pad1: f32,
    pub _pad2: f32,
}

impl Default for ParticleUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            intensity: 0.0,
            mouse: [0.0, 0.0],
            resolution: DEFAULT_RESOLUTION,
            particle_size: DEFAULT_PARTICLE_SIZE,
            speed: DEFAULT_SPEED,
            distortion_strength: 0.0,
            _pad0: 0.0,
            _pad1: 0.0,
            _pad2: 0.0,
        }
    }
}

/// Uniforms of the paper-grain program
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "webgpu", derive(bytemuck::Pod, bytemuck::Zeroable))]
pub struct PaperUniforms {
    pub time: f32,
    /// Vertex wave amplitude (hover driven)
    pub wave_intensity: f32,
    pub mouse: [f32; 2],
    /// Grain strength (hover driven)
    pub paper_strength: f32,
    pub curl_amount: f32,
    pub _pad0: f32,
    pub _pad1: f32,
}

impl Default for PaperUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            wave_intensity: 0.0,
            mouse: [0.0, 0.0],
            paper_strength: 0.0,
            curl_amount: DEFAULT_CURL_AMOUNT,
            _pad0: 0.0,
            _pad1: 0.0,
        }
    }
}

/// Uniforms of the combined program
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "webgpu", derive(bytemuck::Pod, bytemuck::Zeroable))]
pub struct CombinedUniforms {
    pub time: f32,
    pub animation_speed: f32,
    pub mouse: [f32; 2],
    /// Attractor distortion scale (hover driven)
    pub particle_intensity: f32,
    /// Grain blend factor (hover driven)
    pub paper_intensity: f32,
    pub _pad0: f32,
    pub _pad1: f32,
}

impl Default for CombinedUniforms {
    fn default() -> Self {
        Self {
            time: 0.0,
            animation_speed: DEFAULT_ANIMATION_SPEED,
            mouse: [0.0, 0.0],
            particle_intensity: 0.0,
            paper_intensity: 0.0,
            _pad0: 0.0,
            _pad1: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_are_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<TransformUniforms>(), 96);
        assert_eq!(std::mem::size_of::<ParticleUniforms>(), 48);
        assert_eq!(std::mem::size_of::<PaperUniforms>(), 32);
        assert_eq!(std::mem::size_of::<CombinedUniforms>(), 32);
    }

    #[test]
    fn hover_driven_values_start_at_zero() {
        let particle = ParticleUniforms::default();
        assert_eq!(particle.intensity, 0.0);
        assert_eq!(particle.distortion_strength, 0.0);

        let paper = PaperUniforms::default();
        assert_eq!(paper.wave_intensity, 0.0);
        assert_eq!(paper.paper_strength, 0.0);

        let combined = CombinedUniforms::default();
        assert_eq!(combined.particle_intensity, 0.0);
        assert_eq!(combined.paper_intensity, 0.0);
    }

    #[test]
    fn transform_packs_position_and_size() {
        let t = TransformUniforms::new([0.0; 16], [1.0, 2.0, 3.0], [2.0, 1.5]);
        assert_eq!(t.offset, [1.0, 2.0, 3.0, 0.0]);
        assert_eq!(t.scale, [2.0, 1.5, 1.0, 0.0]);
    }
}
