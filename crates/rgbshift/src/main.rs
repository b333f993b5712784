mod assets;
mod cli;
mod paths;
mod run;

use anyhow::{Context, Result};
use cli::{Command, RunArgs, SceneAction};
use paths::AppPaths;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Scene(scene_cmd)) => handle_scene_command(&cli.run, scene_cmd.action),
        None => run::run(cli.run),
    }
}

fn handle_scene_command(args: &RunArgs, action: SceneAction) -> Result<()> {
    let paths = AppPaths::discover()?;
    match action {
        SceneAction::Show { json } => run_scene_show(args, &paths, json),
        SceneAction::Where => run_scene_where(args, &paths),
    }
}

fn run_scene_show(args: &RunArgs, paths: &AppPaths, json: bool) -> Result<()> {
    let loaded = run::load_scene(args, paths)?;
    let rendered = if json {
        serde_json::to_string_pretty(&loaded.scene).context("failed to encode scene as JSON")?
    } else {
        loaded
            .scene
            .to_toml_string()
            .context("failed to encode scene as TOML")?
    };
    println!("{rendered}");
    Ok(())
}

fn run_scene_where(args: &RunArgs, paths: &AppPaths) -> Result<()> {
    let scene_file = args.config.clone().unwrap_or_else(|| paths.scene_file());
    let status = match (scene_file.is_file(), args.config.is_some()) {
        (true, _) => "present",
        (false, true) => "missing",
        (false, false) => "missing; built-in scene",
    };
    println!("Configuration directories:");
    println!("  config:     {}", paths.config_dir().display());
    println!("  cache:      {}", paths.cache_dir().display());
    println!("  textures:   {}", paths.texture_cache_dir().display());
    println!("  scene:      {} ({status})", scene_file.display());
    Ok(())
}
