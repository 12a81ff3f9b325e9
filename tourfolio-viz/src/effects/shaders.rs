//! WGSL programs for the grid hover effects and the panorama sphere
//!
//! Every effect program uses the same bind group layout:
//! binding 0 = transform, 1 = effect uniforms, 2 = texture, 3 = sampler.

/// Vertex input, transform uniform and the shared projection helper
pub const MESH_COMMON: &str = r#"
struct Transform {
    view_proj: mat4x4<f32>,
    offset: vec4<f32>,
    scale: vec4<f32>,
}

@group(0) @binding(0) var<uniform> transform: Transform;
@group(0) @binding(2) var base_texture: texture_2d<f32>;
@group(0) @binding(3) var base_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

fn project(model_pos: vec3<f32>, uv: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    let world = model_pos * transform.scale.xyz + transform.offset.xyz;
    out.clip_position = transform.view_proj * vec4<f32>(world, 1.0);
    out.uv = uv;
    return out;
}
"#;

/// Hash, value noise and moving point attractors
pub const NOISE: &str = r#"
fn hash(p: vec2<f32>) -> f32 {
    return fract(sin(dot(p, vec2<f32>(12.9898, 78.233))) * 43758.5453);
}

fn value_noise(p: vec2<f32>) -> f32 {
    let i = floor(p);
    var f = fract(p);
    f = f * f * (3.0 - 2.0 * f);
    return mix(
        mix(hash(i), hash(i + vec2<f32>(1.0, 0.0)), f.x),
        mix(hash(i + vec2<f32>(0.0, 1.0)), hash(i + vec2<f32>(1.0, 1.0)), f.x),
        f.y
    );
}

// Attractors walk the unit square along golden-ratio offsets
fn attractor_offset(uv: vec2<f32>, time: f32, count: i32, speed: f32, radius: f32, strength: f32) -> vec2<f32> {
    var offset = vec2<f32>(0.0, 0.0);
    for (var i = 0; i < count; i++) {
        let fi = f32(i);
        let center = vec2<f32>(
            fract(fi * 0.618 + time * speed * 0.1),
            fract(fi * 0.382 + time * speed * 0.15)
        );
        let delta = uv - center;
        let dist = length(delta);
        let influence = 1.0 - smoothstep(0.0, radius, dist);
        if (dist > 0.0001) {
            offset += delta / dist * influence * strength;
        }
    }
    return offset;
}
"#;

/// Particle-distortion program
pub const PARTICLE: &str = r#"
struct ParticleUniforms {
    time: f32,
    intensity: f32,
    mouse: vec2<f32>,
    resolution: vec2<f32>,
    particle_size: f32,
    speed: f32,
    distortion_strength: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
}

@group(0) @binding(1) var<uniform> effect: ParticleUniforms;

fn layered_grain(uv: vec2<f32>) -> f32 {
    var grain = 0.0;
    grain += value_noise(uv * 100.0) * 0.1;
    grain += value_noise(uv * 50.0) * 0.2;
    grain += value_noise(uv * 25.0) * 0.3;
    grain += value_noise(uv * 12.5) * 0.4;
    return grain * 0.1;
}

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var pos = vertex.position;
    let t = effect.time;
    let wave1 = sin(pos.x * 4.0 + t * 0.5) * 0.01;
    let wave2 = cos(pos.y * 3.0 + t * 0.3) * 0.01;
    let wave3 = sin(pos.x * 2.0 + pos.y * 2.0 + t * 0.4) * 0.005;
    pos.z += (wave1 + wave2 + wave3) * effect.intensity;
    return project(pos, vertex.uv);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let uv = in.uv;
    let t = effect.time;

    var distorted = uv + attractor_offset(
        uv,
        t,
        8,
        effect.speed,
        effect.particle_size * 0.01,
        effect.distortion_strength
    );
    let paper_wave = sin(uv.x * 20.0 + t) * cos(uv.y * 15.0 + t * 0.7) * 0.002;
    distorted += vec2<f32>(paper_wave, paper_wave);

    let color = textureSample(base_texture, base_sampler, distorted);
    let grain = layered_grain(uv);
    var rgb = mix(color.rgb, color.rgb * (1.0 + grain), 0.3);
    rgb *= 0.95 + grain * 0.1;
    return vec4<f32>(rgb, color.a);
}
"#;

/// Paper-grain program
pub const PAPER: &str = r#"
struct PaperUniforms {
    time: f32,
    wave_intensity: f32,
    mouse: vec2<f32>,
    paper_strength: f32,
    curl_amount: f32,
    _pad0: f32,
    _pad1: f32,
}

@group(0) @binding(1) var<uniform> effect: PaperUniforms;

fn signed_noise(p: vec2<f32>) -> f32 {
    return hash(p) * 2.0 - 1.0;
}

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var pos = vertex.position;
    let t = effect.time;

    let wave_x = sin(pos.y * 3.0 + t * 0.5) * effect.wave_intensity;
    let wave_y = cos(pos.x * 4.0 + t * 0.3) * effect.wave_intensity;
    let curl = sin(pos.x * 2.0 + pos.y * 2.0 + t * 0.2) * effect.curl_amount * 0.01;
    pos.z += wave_x + wave_y + curl;

    // Flutter
    let angle = sin(t * 0.5) * 0.02;
    let flat_x = pos.x;
    pos.x += sin(angle) * pos.y * 0.01;
    pos.y += cos(angle) * flat_x * 0.01;

    return project(pos, vertex.uv);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let uv = in.uv;
    let color = textureSample(base_texture, base_sampler, uv);

    let grain = signed_noise(uv * 200.0 + vec2<f32>(effect.time * 0.1, effect.time * 0.1)) * 0.05;
    let fibers = signed_noise(uv * 80.0) * 0.1;
    let surface = signed_noise(uv * 300.0) * 0.03;
    let paper = (grain + fibers + surface) * effect.paper_strength;

    var rgb = mix(color.rgb, color.rgb * vec3<f32>(1.02, 1.01, 0.98), 0.2);
    rgb += vec3<f32>(paper, paper, paper);

    let vignette = 1.0 - smoothstep(0.3, 0.8, distance(uv, vec2<f32>(0.5, 0.5)));
    rgb *= 0.9 + vignette * 0.1;
    return vec4<f32>(rgb, color.a);
}
"#;

/// Combined particle + paper program
pub const COMBINED: &str = r#"
struct CombinedUniforms {
    time: f32,
    animation_speed: f32,
    mouse: vec2<f32>,
    particle_intensity: f32,
    paper_intensity: f32,
    _pad0: f32,
    _pad1: f32,
}

@group(0) @binding(1) var<uniform> effect: CombinedUniforms;

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var pos = vertex.position;
    let t = effect.time * effect.animation_speed;
    let wave1 = sin(pos.x * 3.0 + t * 0.5) * 0.01;
    let wave2 = cos(pos.y * 4.0 + t * 0.3) * 0.01;
    pos.z += wave1 + wave2;
    return project(pos, vertex.uv);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let uv = in.uv;
    let offset = attractor_offset(
        uv,
        effect.time,
        6,
        effect.animation_speed,
        0.2,
        effect.particle_intensity
    );
    let color = textureSample(base_texture, base_sampler, uv + offset);

    let paper = value_noise(uv * 150.0) * 0.1 + value_noise(uv * 75.0) * 0.05;
    let rgb = mix(color.rgb, color.rgb * (1.0 + paper), effect.paper_intensity);
    return vec4<f32>(rgb, color.a);
}
"#;

/// Panorama sphere program: one draw per material, additive blending
pub const PANORAMA: &str = r#"
struct CameraUniforms {
    view_proj: mat4x4<f32>,
}

struct MaterialUniforms {
    opacity: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
}

@group(0) @binding(0) var<uniform> camera: CameraUniforms;
@group(1) @binding(0) var<uniform> material: MaterialUniforms;
@group(2) @binding(0) var panorama: texture_2d<f32>;
@group(2) @binding(1) var panorama_sampler: sampler;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = camera.view_proj * vec4<f32>(vertex.position, 1.0);
    out.uv = vertex.uv;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let hdr = textureSample(panorama, panorama_sampler, in.uv).rgb;
    // Reinhard tone mapping keeps the weighted sum of both materials linear
    let mapped = hdr / (hdr + vec3<f32>(1.0, 1.0, 1.0));
    return vec4<f32>(mapped * material.opacity, material.opacity);
}
"#;

/// Full WGSL source of the particle program
pub fn particle_shader() -> String {
    format!("{}\n{}\n{}", MESH_COMMON, NOISE, PARTICLE)
}

/// Full WGSL source of the paper program
pub fn paper_shader() -> String {
    format!("{}\n{}\n{}", MESH_COMMON, NOISE, PAPER)
}

/// Full WGSL source of the combined program
pub fn combined_shader() -> String {
    format!("{}\n{}\n{}", MESH_COMMON, NOISE, COMBINED)
}

/// Full WGSL source of the panorama program
pub fn panorama_shader() -> String {
    PANORAMA.to_string()
}
