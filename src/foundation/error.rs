/// Convenience result type used across keepsake.
pub type KeepsakeResult<T> = Result<T, KeepsakeError>;

/// Error taxonomy for the export pipeline.
///
/// Every stage maps its own failure into one of these variants; the orchestrator turns the error
/// into a terminal [`crate::DownloadResult`] using [`KeepsakeError::user_message`].
#[derive(thiserror::Error, Debug)]
pub enum KeepsakeError {
    /// Invalid caller-provided data or an out-of-order state transition.
    #[error("validation error: {0}")]
    Validation(String),

    /// The photo store has not granted write access.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The renderer could not produce a bitmap.
    #[error("render error: {0}")]
    Render(String),

    /// The bitmap could not be converted to the requested byte format.
    #[error("encode error: {0}")]
    Encode(String),

    /// The store write reported an error.
    #[error("persist error: {0}")]
    Persist(String),

    /// Another export already holds the single-flight ticket.
    #[error("busy: {0}")]
    Busy(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KeepsakeError {
    /// Build a [`KeepsakeError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KeepsakeError::PermissionDenied`] value.
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Build a [`KeepsakeError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`KeepsakeError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`KeepsakeError::Persist`] value.
    pub fn persist(msg: impl Into<String>) -> Self {
        Self::Persist(msg.into())
    }

    /// Build a [`KeepsakeError::Busy`] value.
    pub fn busy(msg: impl Into<String>) -> Self {
        Self::Busy(msg.into())
    }

    /// Short message meant to be shown to the user as-is (toast, status line).
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation(msg) => format!("Export request was invalid: {msg}"),
            Self::PermissionDenied(_) => {
                "Photo library access is required to save artifacts".to_string()
            }
            Self::Render(_) => "Could not render the artifact".to_string(),
            Self::Encode(_) => "Could not encode the image".to_string(),
            Self::Persist(msg) => format!("Could not save the image: {msg}"),
            Self::Busy(_) => "Another export is already in progress".to_string(),
            Self::Other(err) => format!("Export failed: {err}"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
