use super::*;

#[test]
fn url_for_encodes_each_segment() {
    let src = HttpAssetSource::new("https://cdn.example.com/avatars/");
    assert_eq!(
        src.url_for("facial-hair/Facial Hair 3.svg").unwrap(),
        "https://cdn.example.com/avatars/facial-hair/Facial%20Hair%203.svg"
    );
}

#[test]
fn url_for_rejects_traversal() {
    let src = HttpAssetSource::new("https://cdn.example.com");
    assert!(src.url_for("../etc/passwd").is_err());
}

#[test]
fn unreachable_host_is_a_miss() {
    let src = HttpAssetSource::new("http://127.0.0.1:9");
    assert!(src.fetch_part_document("hair/Hair 1.svg").is_none());
}
