use std::path::PathBuf;

use clap::{Parser, Subcommand};
use renderer::{Antialiasing, ColorSpaceMode};

#[derive(Parser, Debug)]
#[command(
    name = "rgbshift",
    author,
    version,
    about = "Cursor-following RGB-shift hover effect",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Scene file to load instead of `<config>/scene.toml`.
    #[arg(long, value_name = "FILE", env = "RGBSHIFT_SCENE")]
    pub config: Option<PathBuf>,

    /// Initial window size in logical pixels (e.g. `1280x800`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(
        long,
        value_name = "MODE",
        value_parser = parse_antialias,
        default_value = "auto"
    )]
    pub antialias: Antialiasing,

    /// Output color space handling: `auto`, `gamma`, or `linear`.
    #[arg(
        long,
        value_name = "MODE",
        value_parser = parse_color_space,
        default_value = "auto"
    )]
    pub color_space: ColorSpaceMode,

    /// Optional FPS cap (0=uncapped).
    #[arg(long, value_name = "FPS", value_parser = parse_fps)]
    pub fps: Option<f32>,

    /// Override the scene's damping factor, in `(0, 1]`.
    #[arg(long, value_name = "FACTOR", value_parser = parse_damping)]
    pub damping: Option<f64>,

    /// Re-download remote textures even when a cached copy exists.
    #[arg(long)]
    pub refresh: bool,

    /// Skip any remote fetches; uncached remote textures become placeholders.
    #[arg(long, conflicts_with = "refresh")]
    pub cache_only: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Inspect the resolved scene and directories.
    Scene(SceneCommand),
}

#[derive(Parser, Debug)]
pub struct SceneCommand {
    #[command(subcommand)]
    pub action: SceneAction,
}

#[derive(Subcommand, Debug)]
pub enum SceneAction {
    /// Print the scene that would be rendered, after defaults are applied.
    Show {
        /// Emit JSON instead of TOML.
        #[arg(long)]
        json: bool,
    },
    /// Print resolved directories for config, cache, and the scene file.
    Where,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_antialias(value: &str) -> Result<Antialiasing, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("anti-alias mode must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "auto" | "max" | "default" => Ok(Antialiasing::Auto),
        "off" | "none" | "disable" | "disabled" | "0" => Ok(Antialiasing::Off),
        _ => {
            let samples: u32 = normalized.parse().map_err(|_| {
                format!("invalid anti-alias sample count '{trimmed}'; use auto/off or 2/4/8/16")
            })?;

            if samples == 1 {
                return Ok(Antialiasing::Off);
            }

            if !matches!(samples, 2 | 4 | 8 | 16) {
                return Err(format!(
                    "unsupported sample count {samples}; supported values are 2, 4, 8, or 16"
                ));
            }

            Ok(Antialiasing::Samples(samples))
        }
    }
}

pub fn parse_color_space(value: &str) -> Result<ColorSpaceMode, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("color space must not be empty".to_string());
    }

    let normalized = trimmed.to_ascii_lowercase();
    match normalized.as_str() {
        "auto" => Ok(ColorSpaceMode::Auto),
        "gamma" | "srgb-off" => Ok(ColorSpaceMode::Gamma),
        "linear" | "srgb" => Ok(ColorSpaceMode::Linear),
        other => Err(format!(
            "unknown color space '{other}'; expected auto, gamma, or linear"
        )),
    }
}

pub fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width '{}'", w.trim()))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height '{}'", h.trim()))?;
    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".into());
    }
    Ok((width, height))
}

pub fn parse_fps(value: &str) -> Result<f32, String> {
    let fps = value
        .trim()
        .parse::<f32>()
        .map_err(|_| format!("invalid fps '{}'", value.trim()))?;
    if !(fps.is_finite() && fps >= 0.0) {
        return Err(format!("fps must be a non-negative number, got {fps}"));
    }
    Ok(fps)
}

pub fn parse_damping(value: &str) -> Result<f64, String> {
    let damping = value
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid damping '{}'", value.trim()))?;
    if !(damping > 0.0 && damping <= 1.0) {
        return Err(format!("damping must be in (0, 1], got {damping}"));
    }
    Ok(damping)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_antialias_modes() {
        assert_eq!(parse_antialias("auto").unwrap(), Antialiasing::Auto);
        assert_eq!(parse_antialias(" OFF ").unwrap(), Antialiasing::Off);
        assert_eq!(parse_antialias("1").unwrap(), Antialiasing::Off);
        assert_eq!(parse_antialias("4").unwrap(), Antialiasing::Samples(4));
        assert!(parse_antialias("3").is_err());
        assert!(parse_antialias("").is_err());
        assert!(parse_antialias("lots").is_err());
    }

    #[test]
    fn parses_color_space_aliases() {
        assert_eq!(parse_color_space("auto").unwrap(), ColorSpaceMode::Auto);
        assert_eq!(parse_color_space("srgb").unwrap(), ColorSpaceMode::Linear);
        assert_eq!(parse_color_space("Gamma").unwrap(), ColorSpaceMode::Gamma);
        assert!(parse_color_space("hdr").is_err());
    }

    #[test]
    fn parses_window_size() {
        assert_eq!(parse_size("1280x800").unwrap(), (1280, 800));
        assert_eq!(parse_size(" 640 X 480 ").unwrap(), (640, 480));
        assert!(parse_size("1280").is_err());
        assert!(parse_size("0x800").is_err());
        assert!(parse_size("widex800").is_err());
    }

    #[test]
    fn damping_must_be_a_fraction() {
        assert_eq!(parse_damping("0.1").unwrap(), 0.1);
        assert_eq!(parse_damping("1").unwrap(), 1.0);
        assert!(parse_damping("0").is_err());
        assert!(parse_damping("1.5").is_err());
        assert!(parse_damping("NaN").is_err());
        assert!(parse_damping("soft").is_err());
    }

    #[test]
    fn fps_must_be_finite_and_non_negative() {
        assert_eq!(parse_fps("30").unwrap(), 30.0);
        assert_eq!(parse_fps("0").unwrap(), 0.0);
        assert_eq!(parse_fps("1e-30").unwrap(), 1e-30);
        assert!(parse_fps("-1").is_err());
        assert!(parse_fps("inf").is_err());
        assert!(parse_fps("NaN").is_err());
        assert!(parse_fps("fast").is_err());
    }

    #[test]
    fn scene_subcommands_parse() {
        let cli = Cli::try_parse_from(["rgbshift", "scene", "show", "--json"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Scene(SceneCommand {
                action: SceneAction::Show { json: true }
            }))
        ));

        let cli = Cli::try_parse_from(["rgbshift", "--fps", "30", "--refresh"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.fps, Some(30.0));
        assert!(cli.run.refresh);
        assert!(Cli::try_parse_from(["rgbshift", "--refresh", "--cache-only"]).is_err());
    }
}
