use super::*;
use crate::quality::OutputFormat;

fn image() -> EncodedImage {
    EncodedImage {
        bytes: vec![1, 2, 3],
        requested: OutputFormat::Png,
        format: OutputFormat::Png,
        width: 1,
        height: 1,
    }
}

#[test]
fn saves_and_counts() {
    let lib = InMemoryLibrary::new();
    assert_eq!(lib.permission_status(), PermissionStatus::Authorized);
    let receipt = lib.save(&image()).unwrap();
    assert_eq!(receipt.id, "memory-1");
    assert_eq!(lib.saved_count(), 1);
    assert_eq!(lib.status_calls(), 1);
    assert_eq!(lib.request_calls(), 0);
}

#[test]
fn request_resolves_not_determined_only() {
    let lib = InMemoryLibrary::with_status(PermissionStatus::NotDetermined)
        .granting(PermissionStatus::Limited);
    assert_eq!(lib.request_permission(), PermissionStatus::Limited);
    assert_eq!(lib.permission_status(), PermissionStatus::Limited);

    let denied = InMemoryLibrary::with_status(PermissionStatus::Denied);
    assert_eq!(denied.request_permission(), PermissionStatus::Denied);
    assert!(matches!(
        denied.save(&image()),
        Err(KeepsakeError::PermissionDenied(_))
    ));
}

#[test]
fn failure_injection_and_hooks() {
    let hits = std::sync::Arc::new(AtomicUsize::new(0));
    let seen = hits.clone();
    let lib = InMemoryLibrary::new()
        .on_save(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .failing_saves("disk full");
    let err = lib.save(&image()).unwrap_err();
    assert!(matches!(err, KeepsakeError::Persist(ref m) if m == "disk full"));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    assert_eq!(lib.saved_count(), 0);
}
