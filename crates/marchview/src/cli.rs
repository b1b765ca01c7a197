use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sceneconfig::{AntialiasSetting, CameraModelSetting, SceneMode};

#[derive(Parser, Debug)]
#[command(
    name = "marchview",
    author,
    version,
    about = "Raymarching and screen-shader host with a keyboard camera and time scrubbing"
)]
pub struct Cli {
    #[command(flatten)]
    pub scene: SceneArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Scene selection plus per-run overrides, shared by running and checking.
#[derive(Args, Debug, Default, Clone)]
pub struct SceneArgs {
    /// Scene file (or a directory containing `scene.toml`).
    #[arg(value_name = "SCENE")]
    pub scene: Option<PathBuf>,

    /// Host mode: `template`, `screen`, or `raymarch`.
    #[arg(long, value_name = "MODE")]
    pub mode: Option<SceneMode>,

    /// Fragment shader defining `mainImage`.
    #[arg(long, value_name = "PATH")]
    pub fragment: Option<PathBuf>,

    /// Vertex shader fed the six-vertex screen quad.
    #[arg(long, value_name = "PATH")]
    pub vertex: Option<PathBuf>,

    /// Window size in physical pixels (e.g. `1080x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size)]
    pub size: Option<(u32, u32)>,

    /// Camera model: `free-fly` or `euler`.
    #[arg(long, value_name = "MODEL")]
    pub camera: Option<CameraModelSetting>,

    /// Fixed RNG seed for a reproducible seed uniform sequence.
    #[arg(long, value_name = "N", env = "MARCHVIEW_SEED")]
    pub seed: Option<u64>,

    /// Anti-aliasing policy: `auto`, `off`, or an MSAA sample count (e.g. `4`).
    #[arg(long, value_name = "MODE")]
    pub antialias: Option<AntialiasSetting>,

    /// Ignore the time keys; shader time follows the wall clock.
    #[arg(long)]
    pub no_time_control: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse the scene and validate its shaders without opening a window.
    Check(SceneArgs),
    /// Print the configuration directory and default scene location.
    Paths,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size '{value}'; expected WIDTHxHEIGHT"))?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width '{w}'"))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height '{h}'"))?;
    if width == 0 || height == 0 {
        return Err("window size must be greater than zero".into());
    }
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_surface_sizes() {
        assert_eq!(parse_surface_size("1080x720"), Ok((1080, 720)));
        assert_eq!(parse_surface_size(" 800X600 "), Ok((800, 600)));
        assert!(parse_surface_size("0x600").is_err());
        assert!(parse_surface_size("1080").is_err());
        assert!(parse_surface_size("wide x tall").is_err());
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "marchview",
            "scene.toml",
            "--mode",
            "screen",
            "--camera",
            "euler",
            "--antialias",
            "4",
            "--size",
            "640x480",
            "--no-time-control",
        ])
        .unwrap();
        assert_eq!(cli.scene.scene, Some(PathBuf::from("scene.toml")));
        assert_eq!(cli.scene.mode, Some(SceneMode::Screen));
        assert_eq!(cli.scene.camera, Some(CameraModelSetting::Euler));
        assert_eq!(cli.scene.antialias, Some(AntialiasSetting::Samples4));
        assert_eq!(cli.scene.size, Some((640, 480)));
        assert!(cli.scene.no_time_control);
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_check_subcommand() {
        let cli = Cli::try_parse_from(["marchview", "check", "demo/scene.toml"]).unwrap();
        match cli.command {
            Some(Command::Check(args)) => {
                assert_eq!(args.scene, Some(PathBuf::from("demo/scene.toml")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
