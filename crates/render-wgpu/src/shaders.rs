/// WGSL shader for scene meshes.
///
/// Vertices arrive in world space. `flags` bit 0 selects Lambert lighting
/// (otherwise the colour is drawn flat), bit 1 marks a double-sided surface.
pub const SCENE_SHADER: &str = r#"
const MAX_LIGHTS: u32 = 8u;
const FLAG_LIT: u32 = 1u;
const FLAG_DOUBLE_SIDED: u32 = 2u;

struct PointLight {
    position: vec4<f32>,
    // rgb, intensity
    color: vec4<f32>,
    // distance, unused x3
    range: vec4<f32>,
};

struct Uniforms {
    view_proj: mat4x4<f32>,
    // rgb, intensity
    ambient: vec4<f32>,
    light_count: vec4<u32>,
    lights: array<PointLight, 8>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec3<f32>,
    @location(3) flags: u32,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec3<f32>,
    @location(3) @interpolate(flat) flags: u32,
};

@vertex
fn vs_main(vertex: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position, 1.0);
    out.world_position = vertex.position;
    out.world_normal = vertex.normal;
    out.color = vertex.color;
    out.flags = vertex.flags;
    return out;
}

@fragment
fn fs_main(in: VertexOutput, @builtin(front_facing) front_facing: bool) -> @location(0) vec4<f32> {
    let double_sided = (in.flags & FLAG_DOUBLE_SIDED) != 0u;
    if (!front_facing && !double_sided) {
        discard;
    }
    if ((in.flags & FLAG_LIT) == 0u) {
        return vec4<f32>(in.color, 1.0);
    }

    var normal = normalize(in.world_normal);
    if (!front_facing) {
        normal = -normal;
    }

    var lighting = uniforms.ambient.rgb * uniforms.ambient.w;
    let count = min(uniforms.light_count.x, MAX_LIGHTS);
    for (var i = 0u; i < count; i = i + 1u) {
        let light = uniforms.lights[i];
        let to_light = light.position.xyz - in.world_position;
        let dist = length(to_light);
        var falloff = 1.0;
        if (light.range.x > 0.0) {
            let t = clamp(1.0 - dist / light.range.x, 0.0, 1.0);
            falloff = t * t;
        }
        let diffuse = max(dot(normal, to_light / max(dist, 1e-4)), 0.0);
        lighting = lighting + light.color.rgb * light.color.w * diffuse * falloff;
    }
    return vec4<f32>(in.color * lighting, 1.0);
}
"#;
