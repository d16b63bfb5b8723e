pub const PARTICLE_SHADER: &str = r#"
struct VertexInput {
    @location(0) position: vec3<f32>,
}

struct InstanceInput {
    @location(1) position_scale: vec4<f32>,
    @location(2) color: vec4<f32>,
}

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
}

struct Uniforms {
    view_proj: mat4x4<f32>,
}

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

@vertex
fn vs_main(input: VertexInput, instance: InstanceInput) -> VertexOutput {
    var output: VertexOutput;
    let scale = instance.position_scale.w;
    let local = vec3<f32>(input.position.xy * scale, input.position.z);
    let world_pos = local + instance.position_scale.xyz;

    output.clip_position = uniforms.view_proj * vec4<f32>(world_pos, 1.0);
    output.color = instance.color;
    return output;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(input.color.rgb, clamp(input.color.a, 0.0, 1.0));
}
"#;
