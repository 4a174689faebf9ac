use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        KeepsakeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        KeepsakeError::permission_denied("x")
            .to_string()
            .contains("permission denied:")
    );
    assert!(KeepsakeError::render("x").to_string().contains("render error:"));
    assert!(KeepsakeError::encode("x").to_string().contains("encode error:"));
    assert!(
        KeepsakeError::persist("x")
            .to_string()
            .contains("persist error:")
    );
    assert!(KeepsakeError::busy("x").to_string().contains("busy:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = KeepsakeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
    assert!(err.user_message().contains("boom"));
}

#[test]
fn user_messages_hide_internal_detail_except_persist() {
    let render = KeepsakeError::render("pixmap 0x0");
    assert!(!render.user_message().contains("pixmap"));

    let persist = KeepsakeError::persist("disk full");
    assert!(persist.user_message().contains("disk full"));

    let denied = KeepsakeError::permission_denied("status=denied");
    assert!(denied.user_message().contains("Photo library"));
}
