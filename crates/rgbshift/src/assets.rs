use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use sceneconfig::{RegionConfig, TextureSource};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

/// How remote textures may be fetched for this run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchPolicy {
    pub refresh: bool,
    pub cache_only: bool,
}

/// Turns each region's `texture` entry into a local file the renderer can
/// decode. Remote images land in `<cache>/textures/<sha256>.img`.
pub struct TextureResolver {
    base_dir: PathBuf,
    cache_dir: PathBuf,
    policy: FetchPolicy,
    client: Option<Client>,
}

impl TextureResolver {
    /// `base_dir` anchors relative texture paths, normally the directory of
    /// the scene file.
    pub fn new(base_dir: PathBuf, cache_dir: PathBuf, policy: FetchPolicy) -> Result<Self> {
        let client = if policy.cache_only {
            info!("remote fetch disabled (--cache-only)");
            None
        } else {
            Some(
                Client::builder()
                    .user_agent(concat!("rgbshift/", env!("CARGO_PKG_VERSION")))
                    .build()
                    .context("failed to construct HTTP client")?,
            )
        };
        Ok(Self {
            base_dir,
            cache_dir,
            policy,
            client,
        })
    }

    /// Returns `None` when no usable file exists; the renderer then binds a
    /// placeholder for that region.
    pub fn resolve(&self, region: &RegionConfig) -> Option<PathBuf> {
        match region.texture_source() {
            TextureSource::Local(path) => self.resolve_local(&region.id, &path),
            TextureSource::Remote(url) => self.resolve_remote(&region.id, &url),
        }
    }

    fn resolve_local(&self, region: &str, path: &Path) -> Option<PathBuf> {
        let resolved = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        };
        if resolved.is_file() {
            debug!(region, path = %resolved.display(), "using local texture");
            Some(resolved)
        } else {
            warn!(region, path = %resolved.display(), "local texture not found");
            None
        }
    }

    fn resolve_remote(&self, region: &str, url: &str) -> Option<PathBuf> {
        let cached = cache_path(&self.cache_dir, url);
        let have_cached = cached.is_file();
        if have_cached && !self.policy.refresh {
            debug!(region, %url, path = %cached.display(), "using cached texture");
            return Some(cached);
        }

        let Some(client) = self.client.as_ref() else {
            warn!(region, %url, "texture not cached and remote fetch is disabled");
            return None;
        };

        match download(client, url, &cached) {
            Ok(bytes) => {
                info!(region, %url, bytes, path = %cached.display(), "downloaded texture");
                Some(cached)
            }
            Err(err) if have_cached => {
                warn!(region, %url, error = %format!("{err:#}"), "refresh failed; keeping cached texture");
                Some(cached)
            }
            Err(err) => {
                warn!(region, %url, error = %format!("{err:#}"), "failed to download texture");
                None
            }
        }
    }
}

/// Cache location for a remote texture, keyed by the SHA-256 of its URL.
pub fn cache_path(cache_dir: &Path, url: &str) -> PathBuf {
    let digest = Sha256::digest(url.trim().as_bytes());
    let name = digest
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>();
    cache_dir.join(format!("{name}.img"))
}

fn download(client: &Client, url: &str, destination: &Path) -> Result<usize> {
    let response = client
        .get(url)
        .send()
        .with_context(|| format!("requesting {url}"))?
        .error_for_status()
        .with_context(|| format!("texture request to {url} failed"))?;
    let bytes = response
        .bytes()
        .with_context(|| format!("reading texture body from {url}"))?;

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    // Only complete downloads ever appear under the cache name.
    let partial = destination.with_extension("part");
    fs::write(&partial, &bytes)
        .with_context(|| format!("failed to write {}", partial.display()))?;
    fs::rename(&partial, destination)
        .with_context(|| format!("failed to move texture into {}", destination.display()))?;
    Ok(bytes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn region(texture: &str) -> RegionConfig {
        RegionConfig {
            id: "content-1".into(),
            texture: texture.into(),
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 100.0,
            color: [1.0, 1.0, 1.0, 0.1],
        }
    }

    fn cache_only() -> FetchPolicy {
        FetchPolicy {
            refresh: false,
            cache_only: true,
        }
    }

    #[test]
    fn cache_key_is_stable_hex() {
        let dir = Path::new("/cache");
        let first = cache_path(dir, "https://picsum.photos/200/300");
        let second = cache_path(dir, " https://picsum.photos/200/300 ");
        assert_eq!(first, second);
        let name = first.file_stem().unwrap().to_str().unwrap();
        assert_eq!(name.len(), 64);
        assert!(name.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, cache_path(dir, "https://picsum.photos/seed/picsum/200/300"));
    }

    #[test]
    fn relative_local_paths_resolve_against_base_dir() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("img")).unwrap();
        fs::write(root.path().join("img/one.png"), b"not decoded here").unwrap();

        let resolver =
            TextureResolver::new(root.path().to_path_buf(), root.path().join("cache"), cache_only())
                .unwrap();
        assert_eq!(
            resolver.resolve(&region("img/one.png")),
            Some(root.path().join("img/one.png"))
        );
        assert_eq!(resolver.resolve(&region("img/missing.png")), None);
    }

    #[test]
    fn cache_only_uses_existing_download() {
        let root = TempDir::new().unwrap();
        let cache_dir = root.path().join("textures");
        let url = "https://picsum.photos/200/300";
        let cached = cache_path(&cache_dir, url);
        fs::create_dir_all(&cache_dir).unwrap();
        fs::write(&cached, b"cached bytes").unwrap();

        let resolver =
            TextureResolver::new(root.path().to_path_buf(), cache_dir, cache_only()).unwrap();
        assert_eq!(resolver.resolve(&region(url)), Some(cached));
    }

    #[test]
    fn cache_only_without_download_yields_placeholder() {
        let root = TempDir::new().unwrap();
        let resolver =
            TextureResolver::new(root.path().to_path_buf(), root.path().join("textures"), cache_only())
                .unwrap();
        assert_eq!(resolver.resolve(&region("https://example.invalid/a.png")), None);
    }
}
