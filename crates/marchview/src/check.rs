use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use renderer::{check_shader, ChannelTextureKind, ShaderKind, CHANNEL_COUNT};

use crate::bindings::channel_bindings;
use crate::cli::SceneArgs;
use crate::paths::AppPaths;
use crate::scene::{resolve_scene, SceneOrigin};

/// Validates the scene's shaders without creating a window or a device.
pub fn run_check(args: SceneArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    let (scene, origin) = resolve_scene(&args, &paths)?;
    match &origin {
        SceneOrigin::File(path) => println!("scene: {} ({})", path.display(), scene.mode),
        SceneOrigin::Defaults => println!("scene: built-in {} defaults", scene.mode),
    }

    let Some(shader) = scene.shader.as_ref() else {
        println!("no shaders to check");
        return Ok(());
    };
    let channels = channel_bindings(&scene.channels)?.layout_signature();

    let mut failures = 0usize;
    let mut stages = vec![(ShaderKind::Fragment, shader.fragment.as_path())];
    if let Some(vertex) = shader.vertex.as_deref() {
        stages.push((ShaderKind::Vertex, vertex));
    }
    for (stage, path) in stages {
        match check_file(stage, path, &channels) {
            Ok(()) => println!("ok    {stage:<8} {}", path.display()),
            Err(err) => {
                failures += 1;
                println!("FAIL  {stage:<8} {}", path.display());
                eprintln!("{err:#}");
            }
        }
    }

    if failures > 0 {
        bail!("{failures} shader(s) failed to validate");
    }
    Ok(())
}

fn check_file(
    stage: ShaderKind,
    path: &Path,
    channels: &[ChannelTextureKind; CHANNEL_COUNT],
) -> Result<()> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {stage} shader {}", path.display()))?;
    check_shader(stage, &source, channels)?;
    tracing::debug!(%stage, path = %path.display(), "shader validated");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const NO_CHANNELS: [ChannelTextureKind; CHANNEL_COUNT] =
        [ChannelTextureKind::Texture2d; CHANNEL_COUNT];

    #[test]
    fn reports_missing_files() {
        let dir = TempDir::new().unwrap();
        let err = check_file(
            ShaderKind::Fragment,
            &dir.path().join("missing.frag"),
            &NO_CHANNELS,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("missing.frag"));
    }

    #[test]
    fn accepts_a_minimal_main_image() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("screen.frag");
        fs::write(
            &path,
            "void mainImage(out vec4 fragColor, in vec2 fragCoord) {\n    \
             vec2 uv = fragCoord / uResolution;\n    \
             fragColor = vec4(uv, 0.5 + 0.5 * sin(uTimeSeconds), 1.0);\n}\n",
        )
        .unwrap();
        check_file(ShaderKind::Fragment, &path, &NO_CHANNELS).unwrap();
    }
}
