//! Object names for uploaded files.

use uuid::Uuid;

/// A fresh, collision-free object name that keeps `extension`.
///
/// `random_object_name(Some("png"))` yields e.g.
/// `3f0c9a52-8d7e-4b1c-9a55-0e2f4f6b7c11.png`.
pub fn random_object_name(extension: Option<&str>) -> String {
    let stem = Uuid::new_v4();
    match extension.map(|e| e.trim_start_matches('.')).filter(|e| !e.is_empty()) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_keep_extension_and_differ() {
        let a = random_object_name(Some("png"));
        let b = random_object_name(Some(".png"));
        assert!(a.ends_with(".png"));
        assert!(b.ends_with(".png") && !b.ends_with("..png"));
        assert_ne!(a, b);
        assert!(!random_object_name(None).contains('.'));
    }
}
