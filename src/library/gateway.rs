use std::path::PathBuf;

use crate::{encode::codec::EncodedImage, foundation::error::KeepsakeResult};

/// Authorization state of the photo store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionStatus {
    /// Full access.
    Authorized,
    /// Add-only or partial access; enough to save.
    Limited,
    /// The user has not been asked yet.
    NotDetermined,
    /// The user refused.
    Denied,
    /// Access is blocked by policy.
    Restricted,
}

impl PermissionStatus {
    /// Whether a save may proceed without asking.
    pub fn allows_save(self) -> bool {
        matches!(self, Self::Authorized | Self::Limited)
    }
}

impl std::fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Authorized => "authorized",
            Self::Limited => "limited",
            Self::NotDetermined => "not-determined",
            Self::Denied => "denied",
            Self::Restricted => "restricted",
        })
    }
}

/// Where a saved image ended up.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SaveReceipt {
    /// Store-specific identifier of the new asset.
    pub id: String,
    /// Filesystem location, for stores backed by files.
    pub path: Option<PathBuf>,
}

/// Photo store the orchestrator persists exports into.
///
/// Calls may block (a permission prompt, a slow disk); the orchestrator runs them on its export
/// thread and waits.
pub trait PhotoLibraryGateway: Send + Sync {
    /// Current authorization without prompting.
    fn permission_status(&self) -> PermissionStatus;

    /// Ask for access and return the resulting status.
    fn request_permission(&self) -> PermissionStatus;

    /// Persist one encoded image.
    fn save(&self, image: &EncodedImage) -> KeepsakeResult<SaveReceipt>;
}
