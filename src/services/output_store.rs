use rand::RngCore;
use std::io;
use std::path::{Path, PathBuf};

const PARTIAL_EXTENSION: &str = "partial";

/// Directory of produced cartoons.
///
/// Files are written under a `.partial` name and renamed into place, so a
/// reader of the directory only ever sees complete PNGs.
#[derive(Debug, Clone)]
pub struct OutputStore {
    dir: PathBuf,
}

impl OutputStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory (and parents) if needed and remove `.partial`
    /// files left behind by writes that never finished.
    pub fn ensure_dir(&self) -> io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let mut swept = 0usize;
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_partial = path.extension().is_some_and(|ext| ext == PARTIAL_EXTENSION);
            if is_partial && path.is_file() {
                match std::fs::remove_file(&path) {
                    Ok(()) => swept += 1,
                    Err(e) => {
                        tracing::warn!(%e, path = %path.display(), "Failed to remove stale partial")
                    }
                }
            }
        }
        if swept > 0 {
            tracing::info!(count = swept, dir = %self.dir.display(), "Removed stale partial files");
        }
        Ok(())
    }

    /// Fresh, collision-resistant name: `cartoon_<timestamp>_<8 hex>.png`.
    pub fn unique_name() -> String {
        let mut nonce = [0u8; 4];
        rand::thread_rng().fill_bytes(&mut nonce);
        format!(
            "cartoon_{}_{}.png",
            chrono::Utc::now().format("%Y%m%d%H%M%S"),
            hex::encode(nonce)
        )
    }

    /// Write `png` under a new unique name and return that name.
    pub async fn save(&self, png: &[u8]) -> io::Result<String> {
        let name = Self::unique_name();
        let path = self.dir.join(&name);
        let partial = self.dir.join(format!("{name}.{PARTIAL_EXTENSION}"));

        if let Err(e) = tokio::fs::write(&partial, png).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
        if let Err(e) = tokio::fs::rename(&partial, &path).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }

        tracing::debug!(name = %name, bytes = png.len(), "Saved cartoon");
        Ok(name)
    }

    /// Resolve a served name to its path. Only single, non-hidden path
    /// components ending in `.png` resolve.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        let valid = !name.is_empty()
            && !name.starts_with('.')
            && name.ends_with(".png")
            && !name.contains(['/', '\\'])
            && !name.contains("..");
        valid.then(|| self.dir.join(name))
    }
}
