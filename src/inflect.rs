//! Segment inflection for convention dispatch.
//!
//! URL segments arrive as `admin_users` or `admin-users`; module and
//! controller names are StudlyCase (`AdminUsers`). Only the `classify`
//! transform is needed here; a full inflection library is out of scope.

/// Convert a URL segment into a StudlyCase identifier.
///
/// Splits on underscores and dashes, uppercases the first letter of each
/// piece and joins the result: `admin_users` → `AdminUsers`. Characters
/// after the first letter of a piece keep their case.
#[must_use]
pub fn classify(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for piece in segment.split(['_', '-']) {
        let mut chars = piece.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_underscored() {
        assert_eq!(classify("admin_users"), "AdminUsers");
        assert_eq!(classify("file_manager"), "FileManager");
    }

    #[test]
    fn test_classify_dashed() {
        assert_eq!(classify("file-manager"), "FileManager");
    }

    #[test]
    fn test_classify_single_word() {
        assert_eq!(classify("blog"), "Blog");
        assert_eq!(classify("Blog"), "Blog");
    }

    #[test]
    fn test_classify_preserves_inner_case() {
        assert_eq!(classify("api_v2"), "ApiV2");
        assert_eq!(classify("API"), "API");
    }

    #[test]
    fn test_classify_empty() {
        assert_eq!(classify(""), "");
    }
}
