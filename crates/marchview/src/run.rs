use anyhow::{Context, Result};
use renderer::Renderer;
use tracing_subscriber::EnvFilter;

use crate::bindings::renderer_config;
use crate::cli::SceneArgs;
use crate::paths::AppPaths;
use crate::scene::resolve_scene;

pub fn run(args: SceneArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    tracing::debug!(config = %paths.config_dir().display(), "resolved marchview paths");

    let (scene, origin) = resolve_scene(&args, &paths)?;
    let config = renderer_config(&scene)?;
    tracing::info!(
        ?origin,
        mode = %scene.mode,
        camera = ?config.camera.model(),
        time_control = config.time_steps.is_some(),
        seed = ?config.seed.fixed,
        "starting marchview"
    );

    let mut renderer = Renderer::new(config);
    renderer.run().context("renderer exited with an error")
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
