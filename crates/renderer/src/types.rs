use std::path::PathBuf;

use anyhow::Result;
use rig::{Camera, TimeSteps, DEFAULT_SEED_MAX};

/// Shaders may sample up to four input channels (`uChannel0-3`).
pub const CHANNEL_COUNT: usize = 4;

/// Face stems looked up, in upload order, inside a cubemap directory.
pub const CUBEMAP_FACE_STEMS: [&str; 6] = ["posx", "negx", "posy", "negy", "posz", "negz"];

/// Alternative face names accepted when the `posx`-style files are absent.
pub const CUBEMAP_FACE_ALIASES: [&str; 6] = ["right", "left", "top", "bottom", "front", "back"];

/// Describes how a channel should be populated.
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelSource {
    Texture { path: PathBuf },
    Cubemap { directory: PathBuf },
}

/// Texture dimensionality a channel binding requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelTextureKind {
    Texture2d,
    Cubemap,
}

/// Channel bindings prepared for the renderer.
#[derive(Clone, Debug, Default)]
pub struct ChannelBindings {
    sources: [Option<ChannelSource>; CHANNEL_COUNT],
}

impl ChannelBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_texture(&mut self, channel: usize, path: PathBuf) -> Result<()> {
        self.set(channel, ChannelSource::Texture { path })
    }

    pub fn set_cubemap(&mut self, channel: usize, directory: PathBuf) -> Result<()> {
        self.set(channel, ChannelSource::Cubemap { directory })
    }

    fn set(&mut self, channel: usize, source: ChannelSource) -> Result<()> {
        let Some(slot) = self.sources.get_mut(channel) else {
            anyhow::bail!(
                "channel {} exceeds supported channel count ({})",
                channel,
                CHANNEL_COUNT
            );
        };
        *slot = Some(source);
        Ok(())
    }

    pub(crate) fn slots(&self) -> &[Option<ChannelSource>; CHANNEL_COUNT] {
        &self.sources
    }

    /// Returns the required texture dimensionality for each channel.
    pub fn layout_signature(&self) -> [ChannelTextureKind; CHANNEL_COUNT] {
        let mut kinds = [ChannelTextureKind::Texture2d; CHANNEL_COUNT];
        for (index, source) in self.sources.iter().enumerate() {
            if matches!(source, Some(ChannelSource::Cubemap { .. })) {
                kinds[index] = ChannelTextureKind::Cubemap;
            }
        }
        kinds
    }
}

/// Which host program the renderer behaves as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMode {
    /// Clears the window every frame; no shader is compiled.
    Template,
    /// Fullscreen shader with resolution, time and seed uniforms.
    Screen,
    /// Screen shader plus keyboard camera and time-scrub keys.
    Raymarch,
}

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    Auto,
    /// Render directly into the swapchain.
    #[default]
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

/// Where the per-frame random seed comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedConfig {
    /// Exclusive upper bound of the seed uniform.
    pub max: f32,
    /// Fixed RNG seed for reproducible runs; entropy when `None`.
    pub fixed: Option<u64>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            max: DEFAULT_SEED_MAX,
            fixed: None,
        }
    }
}

/// Shader sources for the screen and raymarch hosts.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderPaths {
    /// Fragment shader defining `mainImage`.
    pub fragment: PathBuf,
    /// Optional vertex shader fed the six-vertex quad.
    pub vertex: Option<PathBuf>,
}

/// Immutable configuration passed to the renderer at start-up.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub mode: HostMode,
    pub title: String,
    /// Initial window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Linear RGB clear color used before drawing.
    pub clear_color: [f32; 3],
    /// Required for `Screen` and `Raymarch`, ignored for `Template`.
    pub shaders: Option<ShaderPaths>,
    pub channel_bindings: ChannelBindings,
    pub antialiasing: Antialiasing,
    /// Starting camera. Only moved by the keyboard in `Raymarch` mode.
    pub camera: Camera,
    /// Time-scrub steps; `None` disables the time keys.
    pub time_steps: Option<TimeSteps>,
    pub seed: SeedConfig,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            mode: HostMode::Raymarch,
            title: "Ray Marching".to_string(),
            surface_size: (1080, 720),
            clear_color: [0.0, 0.0, 0.0],
            shaders: None,
            channel_bindings: ChannelBindings::default(),
            antialiasing: Antialiasing::default(),
            camera: Camera::default(),
            time_steps: Some(TimeSteps::default()),
            seed: SeedConfig::default(),
        }
    }
}
