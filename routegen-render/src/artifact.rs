// Rendered artifacts

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

/// One output file: an absolute install path and its contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: String,
    pub contents: String,
}

impl Artifact {
    pub fn new(path: impl Into<String>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// The complete output of rendering one job: the primary settings document
/// plus any secret-material files referenced from it by fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedJob {
    pub name: String,
    pub document: Artifact,
    pub secrets: Vec<Artifact>,
}

impl RenderedJob {
    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        std::iter::once(&self.document).chain(self.secrets.iter())
    }

    /// Contents of the secret file at `path`, if one was rendered.
    pub fn secret(&self, path: &str) -> Option<&str> {
        self.secrets
            .iter()
            .find(|s| s.path == path)
            .map(|s| s.contents.as_str())
    }

    /// Write every artifact under `root`, treating each artifact path as
    /// relative to it. Parent directories are created as needed.
    pub fn write_to(&self, root: &Path) -> io::Result<()> {
        for artifact in self.artifacts() {
            let relative = artifact.path.trim_start_matches('/');
            let target = root.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, &artifact.contents)?;
            debug!(job = %self.name, path = %target.display(), "wrote artifact");
        }
        Ok(())
    }
}
