use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

/// Number of texture channels a scene may bind.
pub const MAX_CHANNELS: usize = 4;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read scene file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scene: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid scene: {0}")]
    Invalid(String),
}

/// Which of the host programs a scene runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SceneMode {
    /// Opens a window and clears it; no shader.
    Template,
    /// Fullscreen shader fed resolution, elapsed time and a random seed.
    Screen,
    /// Screen shader plus the keyboard camera and time-scrub controls.
    #[default]
    Raymarch,
}

impl FromStr for SceneMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "template" => Ok(SceneMode::Template),
            "screen" => Ok(SceneMode::Screen),
            "raymarch" | "raymarching" => Ok(SceneMode::Raymarch),
            other => Err(format!(
                "unknown mode '{other}'; expected template, screen, or raymarch"
            )),
        }
    }
}

impl fmt::Display for SceneMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneMode::Template => f.write_str("template"),
            SceneMode::Screen => f.write_str("screen"),
            SceneMode::Raymarch => f.write_str("raymarch"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CameraModelSetting {
    #[default]
    FreeFly,
    Euler,
}

impl FromStr for CameraModelSetting {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "free-fly" | "freefly" | "look" => Ok(CameraModelSetting::FreeFly),
            "euler" | "yaw-pitch" => Ok(CameraModelSetting::Euler),
            other => Err(format!(
                "unknown camera model '{other}'; expected free-fly or euler"
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AntialiasSetting {
    Auto,
    #[default]
    Off,
    Samples2,
    Samples4,
    Samples8,
    Samples16,
}

impl AntialiasSetting {
    pub fn from_samples(samples: u32) -> Option<Self> {
        match samples {
            0 | 1 => Some(Self::Off),
            2 => Some(Self::Samples2),
            4 => Some(Self::Samples4),
            8 => Some(Self::Samples8),
            16 => Some(Self::Samples16),
            _ => None,
        }
    }

    pub fn sample_count(self) -> Option<u32> {
        match self {
            Self::Auto => None,
            Self::Off => Some(1),
            Self::Samples2 => Some(2),
            Self::Samples4 => Some(4),
            Self::Samples8 => Some(8),
            Self::Samples16 => Some(16),
        }
    }
}

impl FromStr for AntialiasSetting {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "auto" | "max" | "default" => Ok(AntialiasSetting::Auto),
            "off" | "none" | "disable" | "disabled" | "0" | "1" => Ok(AntialiasSetting::Off),
            "2" => Ok(AntialiasSetting::Samples2),
            "4" => Ok(AntialiasSetting::Samples4),
            "8" => Ok(AntialiasSetting::Samples8),
            "16" => Ok(AntialiasSetting::Samples16),
            other => Err(format!(
                "invalid antialias setting '{other}'; use auto/off or 2/4/8/16"
            )),
        }
    }
}

impl<'de> Deserialize<'de> for AntialiasSetting {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Helper {
            Str(String),
            Num(i64),
        }

        match Helper::deserialize(deserializer)? {
            Helper::Str(raw) => raw.parse().map_err(de::Error::custom),
            Helper::Num(value) if value < 0 => {
                Err(de::Error::custom("antialias value must be non-negative"))
            }
            Helper::Num(value) => value.to_string().parse().map_err(de::Error::custom),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub clear_color: [f32; 3],
    pub antialias: AntialiasSetting,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSettings {
    pub fragment: PathBuf,
    /// Custom vertex stage; the built-in fullscreen triangle when absent.
    pub vertex: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraSettings {
    pub model: CameraModelSetting,
    pub position: [f32; 3],
    pub look: [f32; 3],
    pub move_speed: f32,
    pub turn_speed: f32,
    pub pitch_limit: f32,
}

impl CameraSettings {
    pub fn for_model(model: CameraModelSetting) -> Self {
        let (turn_speed, pitch_limit) = match model {
            CameraModelSetting::FreeFly => (20.0, 1.2),
            CameraModelSetting::Euler => (1.5, 89.0_f32.to_radians()),
        };
        Self {
            model,
            position: [0.0, 0.0, -8.0],
            look: [0.0, 0.0, 1.0],
            move_speed: 12.0,
            turn_speed,
            pitch_limit,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeSettings {
    pub enabled: bool,
    pub rewind_fast_step: Duration,
    pub slow_motion_step: Duration,
    pub fast_forward_step: Duration,
}

impl TimeSettings {
    fn with_enabled(enabled: bool) -> Self {
        Self {
            enabled,
            rewind_fast_step: Duration::from_millis(25),
            slow_motion_step: Duration::from_millis(10),
            fast_forward_step: Duration::from_millis(10),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeedSettings {
    pub max: f32,
    pub fixed: Option<u64>,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            max: 10_000_000.0,
            fixed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelKind {
    Texture(PathBuf),
    Cubemap(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSettings {
    pub index: usize,
    pub kind: ChannelKind,
}

/// Fully resolved scene description.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub mode: SceneMode,
    pub window: WindowSettings,
    pub shader: Option<ShaderSettings>,
    pub camera: CameraSettings,
    pub time: TimeSettings,
    pub seed: SeedSettings,
    pub channels: Vec<ChannelSettings>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawScene {
    mode: Option<SceneMode>,
    #[serde(default)]
    window: RawWindow,
    shader: Option<RawShader>,
    #[serde(default)]
    camera: RawCamera,
    #[serde(default)]
    time: RawTime,
    #[serde(default)]
    seed: RawSeed,
    #[serde(default)]
    channels: Vec<RawChannel>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawWindow {
    title: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    clear_color: Option<[f32; 3]>,
    antialias: Option<AntialiasSetting>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawShader {
    fragment: PathBuf,
    vertex: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawCamera {
    model: Option<CameraModelSetting>,
    position: Option<[f32; 3]>,
    look: Option<[f32; 3]>,
    move_speed: Option<f32>,
    turn_speed: Option<f32>,
    pitch_limit: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTime {
    enabled: Option<bool>,
    #[serde(default, deserialize_with = "deserialize_step_opt")]
    rewind_fast_step: Option<Duration>,
    #[serde(default, deserialize_with = "deserialize_step_opt")]
    slow_motion_step: Option<Duration>,
    #[serde(default, deserialize_with = "deserialize_step_opt")]
    fast_forward_step: Option<Duration>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSeed {
    max: Option<f32>,
    fixed: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawChannel {
    index: usize,
    texture: Option<PathBuf>,
    cubemap: Option<PathBuf>,
}

/// Steps are per-frame epoch shifts, so bare numbers mean milliseconds.
fn deserialize_step_opt<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Option<Duration>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a step as number of milliseconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(Duration::from_millis(v)))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("step must be non-negative"));
            }
            Ok(Some(Duration::from_millis(v as u64)))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() {
                return Err(E::custom("step must be non-negative"));
            }
            Duration::try_from_secs_f64(v / 1000.0)
                .map(Some)
                .map_err(|err| E::custom(format!("invalid step {v}: {err}")))
        }
    }

    deserializer.deserialize_any(Visitor)
}

impl SceneConfig {
    /// Defaults reproducing the stock program for each mode.
    pub fn for_mode(mode: SceneMode) -> Self {
        let (title, width, height) = match mode {
            SceneMode::Template => ("OpenGL Template", 1600, 900),
            SceneMode::Screen => ("Screen Shader", 1280, 720),
            SceneMode::Raymarch => ("Ray Marching", 1080, 720),
        };
        let shader = match mode {
            SceneMode::Template => None,
            SceneMode::Screen | SceneMode::Raymarch => Some(ShaderSettings {
                fragment: PathBuf::from("screen.frag"),
                vertex: None,
            }),
        };
        Self {
            mode,
            window: WindowSettings {
                title: title.to_string(),
                width,
                height,
                clear_color: [0.0, 0.0, 0.0],
                antialias: AntialiasSetting::default(),
            },
            shader,
            camera: CameraSettings::for_model(CameraModelSetting::default()),
            time: TimeSettings::with_enabled(matches!(mode, SceneMode::Raymarch)),
            seed: SeedSettings::default(),
            channels: Vec::new(),
        }
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Self::from_toml_str_as(input, None)
    }

    /// Parses a scene, running it as `mode` instead of the file's own mode
    /// when given. Mode-dependent defaults follow the final mode; values
    /// written in the file are kept.
    pub fn from_toml_str_as(input: &str, mode: Option<SceneMode>) -> Result<Self, ConfigError> {
        let mut raw: RawScene = toml::from_str(input)?;
        if mode.is_some() {
            raw.mode = mode;
        }
        let scene = Self::from_raw(raw);
        scene.validate()?;
        Ok(scene)
    }

    /// Reads a scene file; relative shader and channel paths are resolved
    /// against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::load_as(path, None)
    }

    /// [`SceneConfig::load`] with an optional mode override, see
    /// [`SceneConfig::from_toml_str_as`].
    pub fn load_as(path: &Path, mode: Option<SceneMode>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut scene = Self::from_toml_str_as(&contents, mode)?;
        if let Some(base) = path.parent() {
            scene.resolve_relative_to(base);
        }
        tracing::debug!(
            path = %path.display(),
            mode = %scene.mode,
            channels = scene.channels.len(),
            "loaded scene"
        );
        Ok(scene)
    }

    /// Anchors every relative path in the scene at `base`.
    pub fn resolve_relative_to(&mut self, base: &Path) {
        let anchor = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };
        if let Some(shader) = self.shader.as_mut() {
            anchor(&mut shader.fragment);
            if let Some(vertex) = shader.vertex.as_mut() {
                anchor(vertex);
            }
        }
        for channel in &mut self.channels {
            match &mut channel.kind {
                ChannelKind::Texture(path) | ChannelKind::Cubemap(path) => anchor(path),
            }
        }
    }

    /// Switches the camera model, resetting model-specific tuning that was
    /// left at the previous model's defaults.
    pub fn set_camera_model(&mut self, model: CameraModelSetting) {
        if self.camera.model == model {
            return;
        }
        let previous = CameraSettings::for_model(self.camera.model);
        let next = CameraSettings::for_model(model);
        if self.camera.turn_speed == previous.turn_speed {
            self.camera.turn_speed = next.turn_speed;
        }
        if self.camera.pitch_limit == previous.pitch_limit {
            self.camera.pitch_limit = next.pitch_limit;
        }
        self.camera.model = model;
    }

    fn from_raw(raw: RawScene) -> Self {
        let mode = raw.mode.unwrap_or_default();
        let mut scene = Self::for_mode(mode);

        let window = raw.window;
        if let Some(title) = window.title {
            scene.window.title = title;
        }
        if let Some(width) = window.width {
            scene.window.width = width;
        }
        if let Some(height) = window.height {
            scene.window.height = height;
        }
        if let Some(color) = window.clear_color {
            scene.window.clear_color = color;
        }
        if let Some(antialias) = window.antialias {
            scene.window.antialias = antialias;
        }

        if let Some(shader) = raw.shader {
            scene.shader = Some(ShaderSettings {
                fragment: shader.fragment,
                vertex: shader.vertex,
            });
        }

        let camera = raw.camera;
        if let Some(model) = camera.model {
            scene.camera = CameraSettings::for_model(model);
        }
        if let Some(position) = camera.position {
            scene.camera.position = position;
        }
        if let Some(look) = camera.look {
            scene.camera.look = look;
        }
        if let Some(speed) = camera.move_speed {
            scene.camera.move_speed = speed;
        }
        if let Some(speed) = camera.turn_speed {
            scene.camera.turn_speed = speed;
        }
        if let Some(limit) = camera.pitch_limit {
            scene.camera.pitch_limit = limit;
        }

        let time = raw.time;
        if let Some(enabled) = time.enabled {
            scene.time.enabled = enabled;
        }
        if let Some(step) = time.rewind_fast_step {
            scene.time.rewind_fast_step = step;
        }
        if let Some(step) = time.slow_motion_step {
            scene.time.slow_motion_step = step;
        }
        if let Some(step) = time.fast_forward_step {
            scene.time.fast_forward_step = step;
        }

        if let Some(max) = raw.seed.max {
            scene.seed.max = max;
        }
        scene.seed.fixed = raw.seed.fixed;

        scene.channels = raw
            .channels
            .into_iter()
            .map(|channel| {
                let kind = match (channel.texture, channel.cubemap) {
                    (Some(path), None) => Some(ChannelKind::Texture(path)),
                    (None, Some(path)) => Some(ChannelKind::Cubemap(path)),
                    _ => None,
                };
                RawResolvedChannel {
                    index: channel.index,
                    kind,
                }
            })
            .map(RawResolvedChannel::into_settings)
            .collect();

        scene
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero (got {}x{})",
                self.window.width, self.window.height
            )));
        }

        if self
            .window
            .clear_color
            .iter()
            .any(|c| !c.is_finite() || !(0.0..=1.0).contains(c))
        {
            return Err(ConfigError::Invalid(
                "window.clear_color components must be within 0.0-1.0".into(),
            ));
        }

        match (&self.mode, &self.shader) {
            (SceneMode::Template, _) => {}
            (_, None) => {
                return Err(ConfigError::Invalid(format!(
                    "mode '{}' requires a [shader] section with a fragment path",
                    self.mode
                )));
            }
            (_, Some(shader)) if shader.fragment.as_os_str().is_empty() => {
                return Err(ConfigError::Invalid(
                    "shader.fragment must not be empty".into(),
                ));
            }
            _ => {}
        }

        let camera = &self.camera;
        for (name, value) in [
            ("move_speed", camera.move_speed),
            ("turn_speed", camera.turn_speed),
            ("pitch_limit", camera.pitch_limit),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "camera.{name} must be a positive number"
                )));
            }
        }
        if camera.model == CameraModelSetting::Euler
            && camera.pitch_limit >= std::f32::consts::FRAC_PI_2
        {
            return Err(ConfigError::Invalid(
                "camera.pitch_limit must be below pi/2 radians for the euler camera".into(),
            ));
        }
        if camera.position.iter().chain(camera.look.iter()).any(|c| !c.is_finite()) {
            return Err(ConfigError::Invalid(
                "camera.position and camera.look must be finite".into(),
            ));
        }
        if camera.look.iter().all(|c| *c == 0.0) {
            return Err(ConfigError::Invalid("camera.look must not be zero".into()));
        }

        if !self.seed.max.is_finite() || self.seed.max <= 0.0 {
            return Err(ConfigError::Invalid("seed.max must be greater than zero".into()));
        }

        let mut seen = [false; MAX_CHANNELS];
        for channel in &self.channels {
            if channel.index >= MAX_CHANNELS {
                return Err(ConfigError::Invalid(format!(
                    "channel {} exceeds supported channel count ({MAX_CHANNELS})",
                    channel.index
                )));
            }
            if std::mem::replace(&mut seen[channel.index], true) {
                return Err(ConfigError::Invalid(format!(
                    "channel {} is bound more than once",
                    channel.index
                )));
            }
            let path = match &channel.kind {
                ChannelKind::Texture(path) | ChannelKind::Cubemap(path) => path,
            };
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "channel {} must set exactly one of texture or cubemap",
                    channel.index
                )));
            }
        }

        Ok(())
    }
}

struct RawResolvedChannel {
    index: usize,
    kind: Option<ChannelKind>,
}

impl RawResolvedChannel {
    /// A channel with neither or both sources keeps an empty path so that
    /// `validate` can report it with its index.
    fn into_settings(self) -> ChannelSettings {
        ChannelSettings {
            index: self.index,
            kind: self
                .kind
                .unwrap_or_else(|| ChannelKind::Texture(PathBuf::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
mode = "raymarch"

[window]
title = "Cave"
width = 800
height = 600
clear_color = [0.1, 0.2, 0.3]
antialias = 4

[shader]
fragment = "shaders/cave.frag"
vertex = "shaders/screen.vert"

[camera]
model = "euler"
position = [1.0, 2.0, 3.0]
move_speed = 6.0

[time]
rewind_fast_step = "40ms"
fast_forward_step = 20

[seed]
fixed = 42

[[channels]]
index = 0
cubemap = "skybox"

[[channels]]
index = 2
texture = "noise.png"
"#;

    #[test]
    fn parses_sample_scene() {
        let scene = SceneConfig::from_toml_str(SAMPLE).expect("parse scene");
        assert_eq!(scene.mode, SceneMode::Raymarch);
        assert_eq!(scene.window.title, "Cave");
        assert_eq!(scene.window.antialias, AntialiasSetting::Samples4);
        assert_eq!(scene.camera.model, CameraModelSetting::Euler);
        assert_eq!(scene.camera.position, [1.0, 2.0, 3.0]);
        assert_eq!(scene.camera.move_speed, 6.0);
        assert_eq!(scene.camera.turn_speed, 1.5);
        assert_eq!(scene.time.rewind_fast_step, Duration::from_millis(40));
        assert_eq!(scene.time.slow_motion_step, Duration::from_millis(10));
        assert_eq!(scene.time.fast_forward_step, Duration::from_millis(20));
        assert_eq!(scene.seed.fixed, Some(42));
        assert_eq!(
            scene.channels[0].kind,
            ChannelKind::Cubemap(PathBuf::from("skybox"))
        );
        assert_eq!(scene.channels[1].index, 2);
    }

    #[test]
    fn empty_scene_uses_raymarch_defaults() {
        let scene = SceneConfig::from_toml_str("").expect("defaults");
        assert_eq!(scene, SceneConfig::for_mode(SceneMode::Raymarch));
        assert_eq!(scene.window.width, 1080);
        assert!(scene.time.enabled);
    }

    #[test]
    fn template_mode_needs_no_shader() {
        let scene = SceneConfig::from_toml_str("mode = \"template\"").expect("template");
        assert!(scene.shader.is_none());
        assert_eq!(scene.window.title, "OpenGL Template");
        assert!(!scene.time.enabled);
    }

    #[test]
    fn rejects_duplicate_channels() {
        let err = SceneConfig::from_toml_str(
            r#"
[[channels]]
index = 1
texture = "a.png"

[[channels]]
index = 1
texture = "b.png"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_channel_with_two_sources() {
        let err = SceneConfig::from_toml_str(
            r#"
[[channels]]
index = 0
texture = "a.png"
cubemap = "sky"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("exactly one"));
    }

    #[test]
    fn rejects_out_of_range_channel() {
        let err = SceneConfig::from_toml_str(
            r#"
[[channels]]
index = 4
texture = "a.png"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = SceneConfig::from_toml_str("[window]\nfullscreen = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_euler_pitch_limit_at_vertical() {
        let err = SceneConfig::from_toml_str(
            "[camera]\nmodel = \"euler\"\npitch_limit = 1.6\n",
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_window() {
        let err = SceneConfig::from_toml_str("[window]\nwidth = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn switching_camera_model_swaps_default_tuning() {
        let mut scene = SceneConfig::for_mode(SceneMode::Raymarch);
        scene.set_camera_model(CameraModelSetting::Euler);
        assert_eq!(scene.camera.turn_speed, 1.5);
        assert!(scene.validate().is_ok());

        let mut tuned = SceneConfig::from_toml_str("[camera]\nturn_speed = 3.0\n").unwrap();
        tuned.set_camera_model(CameraModelSetting::Euler);
        assert_eq!(tuned.camera.turn_speed, 3.0);
    }

    #[test]
    fn load_resolves_paths_against_scene_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.toml");
        fs::write(
            &path,
            "[shader]\nfragment = \"screen.frag\"\n\n[[channels]]\nindex = 0\ncubemap = \"/abs/sky\"\n",
        )
        .unwrap();

        let scene = SceneConfig::load(&path).unwrap();
        let shader = scene.shader.unwrap();
        assert_eq!(shader.fragment, dir.path().join("screen.frag"));
        assert_eq!(
            scene.channels[0].kind,
            ChannelKind::Cubemap(PathBuf::from("/abs/sky"))
        );
    }

    #[test]
    fn load_reports_missing_file() {
        let err = SceneConfig::load(Path::new("/definitely/missing/scene.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn parses_mode_and_antialias_strings() {
        assert_eq!("Screen".parse::<SceneMode>(), Ok(SceneMode::Screen));
        assert!("nope".parse::<SceneMode>().is_err());
        assert_eq!("auto".parse::<AntialiasSetting>(), Ok(AntialiasSetting::Auto));
        assert!("3".parse::<AntialiasSetting>().is_err());
        assert_eq!(AntialiasSetting::from_samples(8), Some(AntialiasSetting::Samples8));
    }

    #[test]
    fn non_finite_or_huge_steps_are_parse_errors() {
        for input in [
            "[time]\nrewind_fast_step = inf\n",
            "[time]\nslow_motion_step = 1e300\n",
        ] {
            let err = SceneConfig::from_toml_str(input).unwrap_err();
            assert!(matches!(err, ConfigError::Parse(_)), "{input}: {err}");
        }
        let scene = SceneConfig::from_toml_str("[time]\nslow_motion_step = 500.0\n").unwrap();
        assert_eq!(scene.time.slow_motion_step, Duration::from_millis(500));
    }

    #[test]
    fn mode_override_takes_defaults_from_final_mode() {
        let input = "mode = \"screen\"\n[shader]\nfragment = \"noise.frag\"\n";
        let screen = SceneConfig::from_toml_str(input).unwrap();
        assert!(!screen.time.enabled);

        let scene = SceneConfig::from_toml_str_as(input, Some(SceneMode::Raymarch)).unwrap();
        assert_eq!(scene.mode, SceneMode::Raymarch);
        assert!(scene.time.enabled);
        assert_eq!(scene.window.title, "Ray Marching");
        assert_eq!((scene.window.width, scene.window.height), (1080, 720));
        assert_eq!(scene.shader.unwrap().fragment, PathBuf::from("noise.frag"));
    }

    #[test]
    fn mode_override_keeps_explicit_values() {
        let input = "mode = \"screen\"\n[window]\ntitle = \"Noise\"\n[shader]\nfragment = \"noise.frag\"\n[time]\nenabled = false\n";
        let scene = SceneConfig::from_toml_str_as(input, Some(SceneMode::Raymarch)).unwrap();
        assert_eq!(scene.window.title, "Noise");
        assert!(!scene.time.enabled);
    }
}
