use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ShotframeError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(
        ShotframeError::media_load("x")
            .to_string()
            .contains("media load error:")
    );
    assert!(
        ShotframeError::capture_unavailable("x")
            .to_string()
            .contains("capture unavailable:")
    );
    assert!(
        ShotframeError::encoding("x")
            .to_string()
            .contains("encoding error:")
    );
    assert!(
        ShotframeError::unsupported_media("audio/mpeg")
            .to_string()
            .contains("unsupported media: audio/mpeg")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ShotframeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn export_failures_restore_controls() {
    assert!(ShotframeError::capture_unavailable("x").is_export_failure());
    assert!(ShotframeError::encoding("x").is_export_failure());
    assert!(ShotframeError::media_load("x").is_export_failure());
    assert!(!ShotframeError::configuration("x").is_export_failure());
    assert!(!ShotframeError::validation("x").is_export_failure());
}
