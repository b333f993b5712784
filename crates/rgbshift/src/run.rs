use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use motion::{FrameParams, Rect};
use renderer::{PlaneSpec, RegionVisual, Renderer, RendererConfig};
use sceneconfig::SceneConfig;
use tracing_subscriber::EnvFilter;

use crate::assets::{FetchPolicy, TextureResolver};
use crate::cli::RunArgs;
use crate::paths::AppPaths;

/// A scene plus the file it came from, if any.
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub scene: SceneConfig,
    pub source: Option<PathBuf>,
}

impl LoadedScene {
    /// Directory that relative texture paths are resolved against.
    pub fn base_dir(&self, paths: &AppPaths) -> PathBuf {
        self.source
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| paths.config_dir().to_path_buf())
    }
}

pub fn run(args: RunArgs) -> Result<()> {
    let paths = AppPaths::discover()?;
    tracing::debug!(
        config = %paths.config_dir().display(),
        cache = %paths.cache_dir().display(),
        "resolved rgbshift paths"
    );
    let loaded = load_scene(&args, &paths)?;

    let resolver = TextureResolver::new(
        loaded.base_dir(&paths),
        paths.texture_cache_dir(),
        FetchPolicy {
            refresh: args.refresh,
            cache_only: args.cache_only,
        },
    )?;
    let textures = loaded
        .scene
        .regions
        .iter()
        .map(|region| resolver.resolve(region))
        .collect::<Vec<_>>();
    let ready = textures.iter().filter(|texture| texture.is_some()).count();
    tracing::info!(
        regions = loaded.scene.regions.len(),
        textures = ready,
        "resolved region textures"
    );

    let config = build_renderer_config(&loaded.scene, textures, &args);
    Renderer::new(config).run()
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Reads the scene named by `--config`, or `<config>/scene.toml`, falling
/// back to the built-in scene when the default file does not exist.
pub fn load_scene(args: &RunArgs, paths: &AppPaths) -> Result<LoadedScene> {
    let (path, explicit) = match args.config.as_ref() {
        Some(path) => (path.clone(), true),
        None => (paths.scene_file(), false),
    };

    let mut loaded = if path.is_file() {
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read scene file {}", path.display()))?;
        let scene = SceneConfig::from_toml_str(&text)
            .with_context(|| format!("failed to load scene file {}", path.display()))?;
        tracing::info!(path = %path.display(), regions = scene.regions.len(), "loaded scene");
        LoadedScene {
            scene,
            source: Some(path),
        }
    } else if explicit {
        bail!("scene file {} does not exist", path.display());
    } else {
        tracing::info!(
            path = %path.display(),
            "no scene file found; using built-in scene"
        );
        LoadedScene {
            scene: SceneConfig::default(),
            source: None,
        }
    };

    if let Some(damping) = args.damping {
        loaded.scene.damping = damping;
        loaded
            .scene
            .validate()
            .context("scene is invalid after applying --damping")?;
    }
    Ok(loaded)
}

/// Maps the scene and CLI flags onto the renderer's start-up configuration.
/// `textures` is parallel to `scene.regions`.
pub fn build_renderer_config(
    scene: &SceneConfig,
    textures: Vec<Option<PathBuf>>,
    args: &RunArgs,
) -> RendererConfig {
    let defaults = RendererConfig::default();
    let regions = scene
        .regions
        .iter()
        .zip(textures)
        .map(|(region, texture)| RegionVisual {
            name: region.id.clone(),
            rect: Rect::new(
                region.x as f32,
                region.y as f32,
                region.width as f32,
                region.height as f32,
            ),
            color: region.color.map(|channel| channel as f32),
            texture,
        })
        .collect();

    RendererConfig {
        window_size: args.size.unwrap_or(defaults.window_size),
        title: defaults.title,
        plane: PlaneSpec {
            width: scene.plane.width as f32,
            height: scene.plane.height as f32,
            segments: scene.plane.segments,
        },
        perspective: scene.perspective as f32,
        background: scene.background.map(|channel| channel as f32),
        regions,
        motion: FrameParams {
            damping: scene.damping as f32,
            offset_scale: scene.offset_scale as f32,
        },
        target_fps: args.fps,
        antialiasing: args.antialias,
        color_space: args.color_space,
    }
}
