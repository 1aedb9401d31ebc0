/// WGSL shader for the mesh: one matrix, one flat color.
pub const MESH_SHADER: &str = r#"
struct Uniforms {
    mvp: mat4x4<f32>,
    color: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput) -> @builtin(position) vec4<f32> {
    return uniforms.mvp * vec4<f32>(vertex.position, 1.0);
}

@fragment
fn fs_main() -> @location(0) vec4<f32> {
    return vec4<f32>(uniforms.color.rgb, 1.0);
}
"#;
