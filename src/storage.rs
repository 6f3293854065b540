//! On-disk persistence of rendered logos.
//!
//! Each saved logo is a PNG plus a JSON sidecar with the prompt and seed that produced it,
//! so a refinement session can be picked up by hand later.

use crate::image::RenderedLogo;
use crate::model::Seed;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLogo {
    pub timestamp_utc: String,
    pub prompt: String,
    pub seed: Option<Seed>,
    pub width: u32,
    pub height: u32,
    pub image_file: String,
    /// The image as a `data:` URI, usable without the PNG next to it.
    pub data_uri: String,
}

/// Default directory for saved logos.
pub fn default_save_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("logo-studio")
        .join("logos")
}

fn timestamp_slug(now: time::OffsetDateTime) -> String {
    let fmt = time::macros::format_description!("[year][month][day]-[hour][minute][second]");
    let base = now.format(&fmt).unwrap_or_else(|_| "now".into());
    format!("{base}-{:03}", now.millisecond())
}

/// Pick `logo-<timestamp>.png`, adding a counter if that name is taken.
fn unique_png_path(dir: &Path, slug: &str) -> PathBuf {
    let first = dir.join(format!("logo-{slug}.png"));
    if !first.exists() {
        return first;
    }
    (1..)
        .map(|n| dir.join(format!("logo-{slug}-{n}.png")))
        .find(|p| !p.exists())
        .unwrap_or(first)
}

/// Write the PNG bytes exactly as the backend sent them.
pub fn write_png(path: &Path, logo: &RenderedLogo) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }
    std::fs::write(path, &logo.png).with_context(|| format!("write {}", path.display()))
}

/// Save a logo and its sidecar into `dir`. Returns the PNG path.
pub fn save_logo(dir: &Path, prompt: &str, seed: Option<&Seed>, logo: &RenderedLogo) -> Result<PathBuf> {
    std::fs::create_dir_all(dir).with_context(|| format!("create directory {}", dir.display()))?;

    let now = time::OffsetDateTime::now_utc();
    let png_path = unique_png_path(dir, &timestamp_slug(now));
    write_png(&png_path, logo)?;

    let sidecar = SavedLogo {
        timestamp_utc: now
            .format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| "now".into()),
        prompt: prompt.to_string(),
        seed: seed.cloned(),
        width: logo.width,
        height: logo.height,
        image_file: png_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        data_uri: logo.data_uri(),
    };
    let sidecar_path = png_path.with_extension("json");
    let json = serde_json::to_vec_pretty(&sidecar)?;
    std::fs::write(&sidecar_path, json)
        .with_context(|| format!("write {}", sidecar_path.display()))?;

    tracing::info!(path = %png_path.display(), "saved logo");
    Ok(png_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::sample_png;
    use bytes::Bytes;

    fn load_sidecar(png_path: &Path) -> SavedLogo {
        let raw = std::fs::read(png_path.with_extension("json")).unwrap();
        serde_json::from_slice(&raw).unwrap()
    }

    fn logo() -> RenderedLogo {
        RenderedLogo::from_png(Bytes::from(sample_png(6, 6))).unwrap()
    }

    #[test]
    fn save_writes_png_and_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let logo = logo();
        let path = save_logo(dir.path(), "logo for Acme", Some(&Seed::from(42)), &logo).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), logo.png.to_vec());
        let sidecar = load_sidecar(&path);
        assert_eq!(sidecar.prompt, "logo for Acme");
        assert_eq!(sidecar.seed, Some(Seed::from(42)));
        assert_eq!((sidecar.width, sidecar.height), (6, 6));
        assert!(sidecar.data_uri.starts_with("data:image/png;base64,"));
        assert_eq!(
            sidecar.image_file,
            path.file_name().unwrap().to_string_lossy()
        );
    }

    #[test]
    fn repeated_saves_do_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let logo = logo();
        let a = save_logo(dir.path(), "a", None, &logo).unwrap();
        let b = save_logo(dir.path(), "b", None, &logo).unwrap();
        assert_ne!(a, b);
        assert_eq!(load_sidecar(&a).prompt, "a");
        assert_eq!(load_sidecar(&b).prompt, "b");
    }

    #[test]
    fn write_png_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/logo.png");
        write_png(&path, &logo()).unwrap();
        assert!(path.exists());
    }
}
