use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use sceneconfig::{SceneConfig, ShaderSettings};

use crate::cli::SceneArgs;
use crate::paths::{AppPaths, SCENE_FILE_NAME};

/// Where the scene came from, for logging and `check` output.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneOrigin {
    File(PathBuf),
    Defaults,
}

/// Picks the scene (explicit path, then the config directory, then mode
/// defaults) and applies command-line overrides on top. `--mode` is applied
/// while the scene is built so mode-dependent defaults follow it.
pub fn resolve_scene(args: &SceneArgs, paths: &AppPaths) -> Result<(SceneConfig, SceneOrigin)> {
    let (mut scene, origin) = match scene_file(args, paths) {
        Some(path) => {
            let scene = SceneConfig::load_as(&path, args.mode)
                .with_context(|| format!("failed to load scene {}", path.display()))?;
            (scene, SceneOrigin::File(path))
        }
        None => (
            SceneConfig::for_mode(args.mode.unwrap_or_default()),
            SceneOrigin::Defaults,
        ),
    };

    apply_overrides(&mut scene, args)?;
    scene.validate().context("invalid scene after overrides")?;
    tracing::debug!(?origin, mode = %scene.mode, "resolved scene");
    Ok((scene, origin))
}

fn scene_file(args: &SceneArgs, paths: &AppPaths) -> Option<PathBuf> {
    if let Some(path) = &args.scene {
        return Some(expand_scene_path(path));
    }
    let candidate = paths.default_scene();
    candidate.is_file().then_some(candidate)
}

fn expand_scene_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(SCENE_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

pub fn apply_overrides(scene: &mut SceneConfig, args: &SceneArgs) -> Result<()> {
    if let Some(fragment) = &args.fragment {
        let vertex = scene.shader.take().and_then(|shader| shader.vertex);
        scene.shader = Some(ShaderSettings {
            fragment: fragment.clone(),
            vertex,
        });
    }
    if let Some(vertex) = &args.vertex {
        let Some(shader) = scene.shader.as_mut() else {
            bail!("--vertex needs a fragment shader (pass --fragment or add a [shader] section)");
        };
        shader.vertex = Some(vertex.clone());
    }

    if let Some((width, height)) = args.size {
        scene.window.width = width;
        scene.window.height = height;
    }
    if let Some(model) = args.camera {
        scene.set_camera_model(model);
    }
    if let Some(seed) = args.seed {
        scene.seed.fixed = Some(seed);
    }
    if let Some(antialias) = args.antialias {
        scene.window.antialias = antialias;
    }
    if args.no_time_control {
        scene.time.enabled = false;
    }
    Ok(())
}
