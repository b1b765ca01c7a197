use std::borrow::Cow;
use std::fmt;

use wgpu::naga::front::glsl::{Frontend, Options};
use wgpu::naga::valid::{Capabilities, ValidationFlags, Validator};
use wgpu::naga::ShaderStage;

use crate::types::{ChannelTextureKind, CHANNEL_COUNT};

/// Pipeline stage of a user shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderKind {
    Vertex,
    Fragment,
}

impl ShaderKind {
    fn naga_stage(self) -> ShaderStage {
        match self {
            ShaderKind::Vertex => ShaderStage::Vertex,
            ShaderKind::Fragment => ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderKind::Vertex => f.pad("vertex"),
            ShaderKind::Fragment => f.pad("fragment"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("{stage} shader failed to parse:\n{message}")]
    Parse { stage: ShaderKind, message: String },
    #[error("{stage} shader failed validation: {message}")]
    Validation { stage: ShaderKind, message: String },
}

/// Parses and validates a user shader the same way the renderer will wrap
/// it, without touching a GPU.
pub fn check_shader(
    stage: ShaderKind,
    source: &str,
    channels: &[ChannelTextureKind; CHANNEL_COUNT],
) -> Result<(), ShaderError> {
    let wrapped = match stage {
        ShaderKind::Vertex => wrap_vertex(source),
        ShaderKind::Fragment => wrap_fragment(source, channels),
    };

    let module = Frontend::default()
        .parse(&Options::from(stage.naga_stage()), &wrapped)
        .map_err(|errors| ShaderError::Parse {
            stage,
            message: errors
                .errors
                .iter()
                .map(|error| error.to_string())
                .collect::<Vec<_>>()
                .join("\n"),
        })?;

    Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|error| ShaderError::Validation {
            stage,
            message: error.to_string(),
        })?;

    tracing::debug!(%stage, "shader passed validation");
    Ok(())
}

/// Compiles the user vertex shader, or the built-in fullscreen triangle.
pub(crate) fn compile_vertex_shader(
    device: &wgpu::Device,
    source: Option<&str>,
) -> wgpu::ShaderModule {
    let (label, shader) = match source {
        Some(source) => ("user vertex", Cow::Owned(wrap_vertex(source))),
        None => ("fullscreen triangle vertex", Cow::Borrowed(VERTEX_SHADER_GLSL)),
    };
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader,
            stage: ShaderStage::Vertex,
            defines: &[],
        },
    })
}

pub(crate) fn compile_fragment_shader(
    device: &wgpu::Device,
    source: &str,
    channels: &[ChannelTextureKind; CHANNEL_COUNT],
) -> wgpu::ShaderModule {
    let wrapped = wrap_fragment(source, channels);
    tracing::trace!(lines = wrapped.lines().count(), "wrapped fragment shader");
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("user fragment"),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(wrapped),
            stage: ShaderStage::Fragment,
            defines: &[],
        },
    })
}

/// Names the header provides. User declarations of these are dropped.
const HOST_UNIFORMS: [&str; 14] = [
    "uCamera",
    "uFocus",
    "uUp",
    "uResolution",
    "uTimeSeconds",
    "uTime",
    "uSeed",
    "uFlow",
    "uDelta",
    "uChannelResolution",
    "uChannel0",
    "uChannel1",
    "uChannel2",
    "uChannel3",
];

/// Drops `#version` directives and user uniform declarations that would
/// clash with the header.
fn sanitize(source: &str) -> String {
    let mut sanitized = String::with_capacity(source.len());
    let mut skipped_version = false;
    for line in source.lines() {
        let trimmed = line.trim_start();
        if !skipped_version && trimmed.starts_with("#version") {
            skipped_version = true;
            continue;
        }
        let declares_uniform = trimmed.starts_with("uniform ")
            || (trimmed.starts_with("layout") && trimmed.contains(" uniform "));
        if declares_uniform && HOST_UNIFORMS.iter().any(|name| declares_name(trimmed, name)) {
            continue;
        }
        sanitized.push_str(line);
        sanitized.push('\n');
    }
    sanitized
}

fn declares_name(line: &str, name: &str) -> bool {
    line.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .any(|token| token == name)
}

/// Produces a self-contained GLSL 450 fragment shader from user code that
/// defines `void mainImage(out vec4 fragColor, in vec2 fragCoord)`.
///
/// `fragCoord` has a bottom-left origin in physical pixels.
pub fn wrap_fragment(source: &str, channels: &[ChannelTextureKind; CHANNEL_COUNT]) -> String {
    let sanitized = sanitize(source);
    let mut header = String::from("#version 450\nlayout(location = 0) out vec4 outColor;\n");
    header.push_str(UNIFORM_BLOCK);
    header.push_str(&channel_declarations(channels));
    format!("{header}\n#line 1\n{sanitized}{FRAGMENT_FOOTER}")
}

/// Gives a user vertex shader access to the frame uniforms.
pub fn wrap_vertex(source: &str) -> String {
    let sanitized = sanitize(source);
    format!("#version 450\n{UNIFORM_BLOCK}\n#line 1\n{sanitized}")
}

fn channel_declarations(channels: &[ChannelTextureKind; CHANNEL_COUNT]) -> String {
    let mut out = String::new();
    for (index, kind) in channels.iter().enumerate() {
        let (texture, sampler) = match kind {
            ChannelTextureKind::Texture2d => ("texture2D", "sampler2D"),
            ChannelTextureKind::Cubemap => ("textureCube", "samplerCube"),
        };
        let texture_binding = index * 2;
        let sampler_binding = texture_binding + 1;
        out.push_str(&format!(
            "layout(set = 1, binding = {texture_binding}) uniform {texture} marchview_channel{index}_texture;\n\
             layout(set = 1, binding = {sampler_binding}) uniform sampler marchview_channel{index}_sampler;\n\
             #define uChannel{index} {sampler}(marchview_channel{index}_texture, marchview_channel{index}_sampler)\n"
        ));
    }
    out
}

/// Layout must match `FrameUniforms` in `gpu/uniforms.rs`.
const UNIFORM_BLOCK: &str = r"
layout(std140, set = 0, binding = 0) uniform FrameParams {
    vec3 _camera;
    float _timeSeconds;
    vec3 _focus;
    float _seed;
    vec3 _up;
    int _time;
    vec2 _resolution;
    int _flow;
    float _delta;
    vec4 _channelResolution[4];
} marchview_frame;

#define uCamera marchview_frame._camera
#define uFocus marchview_frame._focus
#define uUp marchview_frame._up
#define uResolution marchview_frame._resolution
#define uTime marchview_frame._time
#define uTimeSeconds marchview_frame._timeSeconds
#define uSeed marchview_frame._seed
#define uFlow marchview_frame._flow
#define uDelta marchview_frame._delta
#define uChannelResolution marchview_frame._channelResolution
";

/// Hardware coordinates are top-left; `mainImage` expects bottom-left.
const FRAGMENT_FOOTER: &str = r"
void main() {
    vec2 fragCoord = vec2(gl_FragCoord.x, uResolution.y - gl_FragCoord.y);
    vec4 color = vec4(0.0, 0.0, 0.0, 1.0);
    mainImage(color, fragCoord);
    outColor = color;
}
";

const VERTEX_SHADER_GLSL: &str = r"#version 450
const vec2 positions[3] = vec2[3](
    vec2(-1.0, -3.0),
    vec2(3.0, 1.0),
    vec2(-1.0, 1.0)
);

void main() {
    gl_Position = vec4(positions[gl_VertexIndex], 0.0, 1.0);
}
";
