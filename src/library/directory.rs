use std::{
    io::Write as _,
    path::{Path, PathBuf},
};

use sha2::{Digest as _, Sha256};

use crate::{
    encode::codec::EncodedImage,
    foundation::error::{KeepsakeError, KeepsakeResult},
    library::gateway::{PermissionStatus, PhotoLibraryGateway, SaveReceipt},
};

/// Photo store backed by a directory.
///
/// Permission mirrors the directory: missing is `NotDetermined` (a request creates it), a
/// read-only directory is `Denied`, a non-directory in the way is `Restricted`. Files are named
/// after a hash of their contents and written through a temporary file plus rename, so a failed
/// save never leaves a partial image behind.
#[derive(Clone, Debug)]
pub struct DirectoryLibrary {
    root: PathBuf,
}

impl DirectoryLibrary {
    /// Library rooted at `root` (created on the first permission request).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Library directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File name an image is stored under.
    pub fn file_name(image: &EncodedImage) -> String {
        let digest = Sha256::digest(&image.bytes);
        let hex: String = digest[..6].iter().map(|b| format!("{b:02x}")).collect();
        format!("keepsake-{hex}.{}", image.format.extension())
    }
}

impl PhotoLibraryGateway for DirectoryLibrary {
    fn permission_status(&self) -> PermissionStatus {
        match std::fs::metadata(&self.root) {
            Ok(meta) if !meta.is_dir() => PermissionStatus::Restricted,
            Ok(meta) if meta.permissions().readonly() => PermissionStatus::Denied,
            Ok(_) => PermissionStatus::Authorized,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                PermissionStatus::NotDetermined
            }
            Err(_) => PermissionStatus::Restricted,
        }
    }

    fn request_permission(&self) -> PermissionStatus {
        let status = self.permission_status();
        if status != PermissionStatus::NotDetermined {
            return status;
        }
        match std::fs::create_dir_all(&self.root) {
            Ok(()) => {
                tracing::info!(root = %self.root.display(), "library directory created");
                self.permission_status()
            }
            Err(err) => {
                tracing::warn!(root = %self.root.display(), error = %err, "cannot create library directory");
                PermissionStatus::Denied
            }
        }
    }

    fn save(&self, image: &EncodedImage) -> KeepsakeResult<SaveReceipt> {
        if !self.permission_status().allows_save() {
            return Err(KeepsakeError::permission_denied(format!(
                "library directory '{}' is not writable",
                self.root.display()
            )));
        }

        let name = Self::file_name(image);
        let path = self.root.join(&name);
        let tmp = self.root.join(format!(".{name}.tmp"));

        let written = std::fs::File::create(&tmp).and_then(|mut f| {
            f.write_all(&image.bytes)?;
            f.sync_all()
        });
        if let Err(err) = written.and_then(|()| std::fs::rename(&tmp, &path)) {
            let _ = std::fs::remove_file(&tmp);
            return Err(KeepsakeError::persist(format!(
                "write '{}': {err}",
                path.display()
            )));
        }

        tracing::debug!(path = %path.display(), bytes = image.bytes.len(), "image saved");
        Ok(SaveReceipt { id: name, path: Some(path) })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/library/directory.rs"]
mod tests;
