mod bindings;
mod check;
mod cli;
mod paths;
mod run;
mod scene;

use anyhow::Result;
use cli::Command;
use paths::AppPaths;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Check(args)) => check::run_check(args),
        Some(Command::Paths) => print_paths(),
        None => run::run(cli.scene),
    }
}

fn print_paths() -> Result<()> {
    let paths = AppPaths::discover()?;
    let scene = paths.default_scene();
    println!("config: {}", paths.config_dir().display());
    println!(
        "scene:  {} ({})",
        scene.display(),
        if scene.is_file() { "present" } else { "missing" }
    );
    Ok(())
}
