use super::*;

#[test]
fn display_prefixes_are_stable() {
    let cases = [
        (StrataError::validation("x"), "validation error:"),
        (StrataError::asset("x"), "asset error:"),
        (StrataError::material("x"), "material error:"),
        (StrataError::timeline("x"), "timeline error:"),
        (StrataError::render("x"), "render error:"),
        (StrataError::serde("x"), "serialization error:"),
    ];
    for (err, prefix) in cases {
        assert!(err.to_string().starts_with(prefix), "{err} lacks {prefix}");
    }
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = StrataError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn json_errors_map_to_serde() {
    let err: StrataError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, StrataError::Serde(_)));
}
