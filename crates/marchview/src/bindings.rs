use anyhow::{Context, Result};
use renderer::{Antialiasing, ChannelBindings, HostMode, RendererConfig, SeedConfig, ShaderPaths};
use rig::{Camera, CameraModel, MovementTuning, TimeSteps, Vec3};
use sceneconfig::{
    AntialiasSetting, CameraModelSetting, CameraSettings, ChannelKind, ChannelSettings,
    SceneConfig, SceneMode, TimeSettings,
};

/// Translates a validated scene into the renderer's start-up configuration.
pub fn renderer_config(scene: &SceneConfig) -> Result<RendererConfig> {
    Ok(RendererConfig {
        mode: host_mode(scene.mode),
        title: scene.window.title.clone(),
        surface_size: (scene.window.width, scene.window.height),
        clear_color: scene.window.clear_color,
        shaders: scene.shader.as_ref().map(|shader| ShaderPaths {
            fragment: shader.fragment.clone(),
            vertex: shader.vertex.clone(),
        }),
        channel_bindings: channel_bindings(&scene.channels)?,
        antialiasing: map_antialias(scene.window.antialias),
        camera: camera(&scene.camera),
        time_steps: time_steps(&scene.time),
        seed: SeedConfig {
            max: scene.seed.max,
            fixed: scene.seed.fixed,
        },
    })
}

pub fn host_mode(mode: SceneMode) -> HostMode {
    match mode {
        SceneMode::Template => HostMode::Template,
        SceneMode::Screen => HostMode::Screen,
        SceneMode::Raymarch => HostMode::Raymarch,
    }
}

pub fn channel_bindings(channels: &[ChannelSettings]) -> Result<ChannelBindings> {
    let mut bindings = ChannelBindings::new();
    for channel in channels {
        match &channel.kind {
            ChannelKind::Texture(path) => bindings
                .set_texture(channel.index, path.clone())
                .with_context(|| format!("invalid texture for channel {}", channel.index))?,
            ChannelKind::Cubemap(directory) => bindings
                .set_cubemap(channel.index, directory.clone())
                .with_context(|| format!("invalid cubemap for channel {}", channel.index))?,
        }
    }
    Ok(bindings)
}

fn map_antialias(setting: AntialiasSetting) -> Antialiasing {
    match setting.sample_count() {
        None => Antialiasing::Auto,
        Some(0 | 1) => Antialiasing::Off,
        Some(samples) => Antialiasing::Samples(samples),
    }
}

fn camera(settings: &CameraSettings) -> Camera {
    let model = match settings.model {
        CameraModelSetting::FreeFly => CameraModel::FreeFly,
        CameraModelSetting::Euler => CameraModel::Euler,
    };
    let tuning = MovementTuning {
        move_speed: settings.move_speed,
        turn_speed: settings.turn_speed,
        pitch_limit: settings.pitch_limit,
    };
    Camera::new(
        model,
        Vec3::from_array(settings.position),
        Vec3::from_array(settings.look),
        tuning,
    )
}

fn time_steps(settings: &TimeSettings) -> Option<TimeSteps> {
    settings.enabled.then(|| TimeSteps {
        rewind_fast: settings.rewind_fast_step,
        slow_motion: settings.slow_motion_step,
        fast_forward: settings.fast_forward_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use renderer::ChannelTextureKind;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn raymarch_defaults_enable_time_steps() {
        let scene = SceneConfig::for_mode(SceneMode::Raymarch);
        let config = renderer_config(&scene).unwrap();

        assert_eq!(config.mode, HostMode::Raymarch);
        assert_eq!(config.surface_size, (1080, 720));
        assert_eq!(config.time_steps, Some(TimeSteps::default()));
        assert_eq!(config.antialiasing, Antialiasing::Off);
        assert_eq!(config.camera.model(), CameraModel::FreeFly);
        assert_eq!(config.camera.position(), Vec3::new(0.0, 0.0, -8.0));
    }

    #[test]
    fn disabled_time_control_drops_steps() {
        let mut scene = SceneConfig::for_mode(SceneMode::Raymarch);
        scene.time.enabled = false;
        scene.time.fast_forward_step = Duration::from_millis(40);
        assert_eq!(renderer_config(&scene).unwrap().time_steps, None);
    }

    #[test]
    fn maps_antialias_settings() {
        assert_eq!(map_antialias(AntialiasSetting::Auto), Antialiasing::Auto);
        assert_eq!(map_antialias(AntialiasSetting::Off), Antialiasing::Off);
        assert_eq!(
            map_antialias(AntialiasSetting::Samples8),
            Antialiasing::Samples(8)
        );
    }

    #[test]
    fn channels_carry_their_kind() {
        let channels = vec![
            ChannelSettings {
                index: 0,
                kind: ChannelKind::Texture(PathBuf::from("noise.png")),
            },
            ChannelSettings {
                index: 2,
                kind: ChannelKind::Cubemap(PathBuf::from("sky")),
            },
        ];
        let bindings = channel_bindings(&channels).unwrap();
        assert_eq!(
            bindings.layout_signature(),
            [
                ChannelTextureKind::Texture2d,
                ChannelTextureKind::Texture2d,
                ChannelTextureKind::Cubemap,
                ChannelTextureKind::Texture2d,
            ]
        );
    }

    #[test]
    fn euler_camera_uses_scene_tuning() {
        let mut scene = SceneConfig::for_mode(SceneMode::Raymarch);
        scene.set_camera_model(CameraModelSetting::Euler);
        let config = renderer_config(&scene).unwrap();
        assert_eq!(config.camera.model(), CameraModel::Euler);
    }
}
