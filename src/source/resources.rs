//! Directory-backed resource provider.
//!
//! Looks up `<root>/<resolution>/<media-id>` first, then `<root>/<media-id>`
//! so a flat directory of originals also works for every variant.

use super::ResourceProvider;
use crate::model::{MediaId, Resolution, TransportError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Resource provider reading payloads from a directory tree.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    /// Provider rooted at `root`. The directory need not exist yet.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory searched for payloads.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn candidates(&self, media: &MediaId, resolution: Resolution) -> [PathBuf; 2] {
        [
            self.root.join(resolution.as_str()).join(media.as_str()),
            self.root.join(media.as_str()),
        ]
    }
}

impl ResourceProvider for DirectoryResources {
    fn fetch_resource(
        &mut self,
        media: &MediaId,
        resolution: Resolution,
    ) -> Result<Vec<u8>, TransportError> {
        // Media ids must be plain file names under the root.
        if media.as_str().contains(['/', '\\']) || media.as_str().starts_with('.') {
            return Err(TransportError::Forbidden(format!(
                "media id '{media}' is not a plain file name"
            )));
        }

        for path in self.candidates(media, resolution) {
            match std::fs::read(&path) {
                Ok(bytes) => return Ok(bytes),
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    return Err(TransportError::Provider {
                        status: 500,
                        message: format!("{}: {e}", path.display()),
                    })
                }
            }
        }

        Err(TransportError::NotFound(format!("{media} ({resolution})")))
    }
}
