use std::borrow::Cow;

use wgpu::naga::ShaderStage;

/// Vertex/fragment pair for one pipeline.
pub(crate) struct ShaderPair {
    pub vertex: wgpu::ShaderModule,
    pub fragment: wgpu::ShaderModule,
}

/// Compiles the RGB-shift plane shaders through naga's GLSL frontend.
pub(crate) fn compile_plane_shaders(device: &wgpu::Device) -> ShaderPair {
    ShaderPair {
        vertex: glsl_module(device, "plane vertex", PLANE_VERTEX_GLSL, ShaderStage::Vertex),
        fragment: glsl_module(
            device,
            "plane fragment",
            PLANE_FRAGMENT_GLSL,
            ShaderStage::Fragment,
        ),
    }
}

/// Compiles the flat-colour shaders used to draw region outlines.
pub(crate) fn compile_overlay_shaders(device: &wgpu::Device) -> ShaderPair {
    ShaderPair {
        vertex: glsl_module(
            device,
            "overlay vertex",
            OVERLAY_VERTEX_GLSL,
            ShaderStage::Vertex,
        ),
        fragment: glsl_module(
            device,
            "overlay fragment",
            OVERLAY_FRAGMENT_GLSL,
            ShaderStage::Fragment,
        ),
    }
}

fn glsl_module(
    device: &wgpu::Device,
    label: &str,
    source: &'static str,
    stage: ShaderStage,
) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Borrowed(source),
            stage,
            defines: &[],
        },
    })
}

/// The uniform block layout must match `PlaneUniforms` in `gpu/uniforms.rs`.
const PLANE_VERTEX_GLSL: &str = r"#version 450
layout(location = 0) in vec3 a_position;
layout(location = 1) in vec2 a_uv;
layout(location = 0) out vec2 v_uv;

layout(std140, set = 0, binding = 0) uniform PlaneParams {
    mat4 uModelViewProjection;
    vec2 uOffset;
    float uAlpha;
    float _padding;
} ubo;

const float PI = 3.14159265358979;

// Bows the plane sideways along its height and vertically along its width.
vec3 bulge(vec3 position, vec2 uv, vec2 offset) {
    position.x += sin(uv.y * PI) * offset.x;
    position.y += sin(uv.x * PI) * offset.y;
    return position;
}

void main() {
    v_uv = a_uv;
    vec3 displaced = bulge(a_position, a_uv, ubo.uOffset);
    gl_Position = ubo.uModelViewProjection * vec4(displaced, 1.0);
}
";

const PLANE_FRAGMENT_GLSL: &str = r"#version 450
layout(location = 0) in vec2 v_uv;
layout(location = 0) out vec4 outColor;

layout(std140, set = 0, binding = 0) uniform PlaneParams {
    mat4 uModelViewProjection;
    vec2 uOffset;
    float uAlpha;
    float _padding;
} ubo;

layout(set = 1, binding = 0) uniform texture2D plane_texture;
layout(set = 1, binding = 1) uniform sampler plane_sampler;

#define planeImage sampler2D(plane_texture, plane_sampler)

void main() {
    // Only red is shifted; green and blue stay put.
    float r = texture(planeImage, v_uv + ubo.uOffset).r;
    vec2 gb = texture(planeImage, v_uv).gb;
    outColor = vec4(r, gb, ubo.uAlpha);
}
";

const OVERLAY_VERTEX_GLSL: &str = r"#version 450
layout(location = 0) in vec2 a_position;
layout(location = 1) in vec4 a_color;
layout(location = 0) out vec4 v_color;

void main() {
    v_color = a_color;
    gl_Position = vec4(a_position, 0.0, 1.0);
}
";

const OVERLAY_FRAGMENT_GLSL: &str = r"#version 450
layout(location = 0) in vec4 v_color;
layout(location = 0) out vec4 outColor;

void main() {
    outColor = v_color;
}
";

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_block(source: &str) -> &str {
        let start = source.find("layout(std140").expect("uniform block start");
        let end = source[start..].find("} ubo;").expect("uniform block end") + start;
        &source[start..end]
    }

    #[test]
    fn plane_stages_share_uniform_block() {
        assert_eq!(
            uniform_block(PLANE_VERTEX_GLSL),
            uniform_block(PLANE_FRAGMENT_GLSL)
        );
    }

    #[test]
    fn vertex_bulge_is_keyed_to_opposite_uv_axis() {
        assert!(PLANE_VERTEX_GLSL.contains("position.x += sin(uv.y * PI) * offset.x;"));
        assert!(PLANE_VERTEX_GLSL.contains("position.y += sin(uv.x * PI) * offset.y;"));
        assert!(PLANE_VERTEX_GLSL.contains("bulge(a_position, a_uv, ubo.uOffset)"));
    }

    #[test]
    fn fragment_shifts_red_only_and_applies_alpha() {
        assert!(PLANE_FRAGMENT_GLSL.contains("texture(planeImage, v_uv + ubo.uOffset).r"));
        assert!(PLANE_FRAGMENT_GLSL.contains("texture(planeImage, v_uv).gb"));
        assert!(PLANE_FRAGMENT_GLSL.contains("vec4(r, gb, ubo.uAlpha)"));
    }
}
