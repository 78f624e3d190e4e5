use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        AvatarError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(AvatarError::asset("x").to_string().contains("asset error:"));
    assert!(AvatarError::raster("x").to_string().contains("raster error:"));
    assert!(
        AvatarError::upload("x", false)
            .to_string()
            .contains("upload error:")
    );
    assert!(
        AvatarError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn only_retryable_uploads_report_retryable() {
    assert!(AvatarError::upload("503", true).is_retryable());
    assert!(!AvatarError::upload("401", false).is_retryable());
    assert!(!AvatarError::raster("bad markup").is_retryable());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = AvatarError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: AvatarError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, AvatarError::Serde(_)));
}
