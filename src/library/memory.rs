use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use crate::{
    encode::codec::EncodedImage,
    foundation::error::{KeepsakeError, KeepsakeResult},
    library::gateway::{PermissionStatus, PhotoLibraryGateway, SaveReceipt},
};

type SaveHook = Box<dyn Fn(&EncodedImage) + Send + Sync>;

/// Scriptable in-process photo store.
///
/// Holds saved images in memory, answers permission queries from configured statuses and counts
/// every call. A save hook runs inside `save` before the image is stored; it may block to hold an
/// export in the persisting stage.
pub struct InMemoryLibrary {
    status: Mutex<PermissionStatus>,
    granted_on_request: PermissionStatus,
    fail_saves: Option<String>,
    hook: Option<SaveHook>,
    saved: Mutex<Vec<EncodedImage>>,
    status_calls: AtomicUsize,
    request_calls: AtomicUsize,
}

impl std::fmt::Debug for InMemoryLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLibrary")
            .field("status", &self.current_status())
            .field("saved", &self.saved_count())
            .finish()
    }
}

impl Default for InMemoryLibrary {
    fn default() -> Self {
        Self::with_status(PermissionStatus::Authorized)
    }
}

impl InMemoryLibrary {
    /// Authorized library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Library starting in `status`; a permission request grants `Authorized`.
    pub fn with_status(status: PermissionStatus) -> Self {
        Self {
            status: Mutex::new(status),
            granted_on_request: PermissionStatus::Authorized,
            fail_saves: None,
            hook: None,
            saved: Mutex::new(Vec::new()),
            status_calls: AtomicUsize::new(0),
            request_calls: AtomicUsize::new(0),
        }
    }

    /// Status a pending permission request resolves to.
    pub fn granting(mut self, status: PermissionStatus) -> Self {
        self.granted_on_request = status;
        self
    }

    /// Make every save fail with a persist error carrying `message`.
    pub fn failing_saves(mut self, message: impl Into<String>) -> Self {
        self.fail_saves = Some(message.into());
        self
    }

    /// Run `hook` at the start of every save.
    pub fn on_save(mut self, hook: impl Fn(&EncodedImage) + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    fn current_status(&self) -> PermissionStatus {
        *self.status.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Images saved so far.
    pub fn saved(&self) -> Vec<EncodedImage> {
        self.saved.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of images saved so far.
    pub fn saved_count(&self) -> usize {
        self.saved.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Number of `permission_status` calls.
    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    /// Number of `request_permission` calls.
    pub fn request_calls(&self) -> usize {
        self.request_calls.load(Ordering::SeqCst)
    }
}

impl PhotoLibraryGateway for InMemoryLibrary {
    fn permission_status(&self) -> PermissionStatus {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.current_status()
    }

    fn request_permission(&self) -> PermissionStatus {
        self.request_calls.fetch_add(1, Ordering::SeqCst);
        let mut status = self.status.lock().unwrap_or_else(|e| e.into_inner());
        if *status == PermissionStatus::NotDetermined {
            *status = self.granted_on_request;
        }
        *status
    }

    fn save(&self, image: &EncodedImage) -> KeepsakeResult<SaveReceipt> {
        if let Some(hook) = &self.hook {
            hook(image);
        }
        if let Some(msg) = &self.fail_saves {
            return Err(KeepsakeError::persist(msg.clone()));
        }
        if !self.current_status().allows_save() {
            return Err(KeepsakeError::permission_denied(
                "library is not authorized for writes",
            ));
        }
        let mut saved = self.saved.lock().unwrap_or_else(|e| e.into_inner());
        saved.push(image.clone());
        Ok(SaveReceipt {
            id: format!("memory-{}", saved.len()),
            path: None,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/library/memory.rs"]
mod tests;
