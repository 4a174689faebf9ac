use crate::{composition::model::Composition, record::JournalRecord, style::catalog::ArtifactStyle};

/// Builds the visual structure of an artifact from a record.
///
/// Geometry must be a pure function of `(record, style)`: the capture strategies and the
/// fixed-height containment rely on two calls with the same inputs measuring the same. Decorative
/// text such as serial numbers may differ between calls as long as it keeps its footprint.
pub trait CompositionFactory: Send + Sync {
    /// Compose `record` in `style`.
    fn make(&self, record: &JournalRecord, style: ArtifactStyle) -> Composition;
}

impl<F> CompositionFactory for F
where
    F: Fn(&JournalRecord, ArtifactStyle) -> Composition + Send + Sync,
{
    fn make(&self, record: &JournalRecord, style: ArtifactStyle) -> Composition {
        self(record, style)
    }
}
