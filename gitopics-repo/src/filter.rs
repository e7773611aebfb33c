//! Comment filtering predicates
//!
//! Filters run in order over each file's raw comment list; the first
//! rejection drops the comment.

use crate::comments::Comment;

/// A named predicate deciding whether an extracted comment is kept
pub trait CommentFilter: Send + Sync {
    /// Short name for diagnostics
    fn name(&self) -> &'static str;

    /// `true` keeps the comment, `false` drops it
    fn accepts(&self, comment: &Comment) -> bool;
}

/// Rejects license and copyright boilerplate
///
/// A case-insensitive match on "license" or "copyright" anywhere in the
/// comment text rejects it.
pub struct LicenseFilter;

impl CommentFilter for LicenseFilter {
    fn name(&self) -> &'static str {
        "license"
    }

    fn accepts(&self, comment: &Comment) -> bool {
        let lowered = comment.text.to_lowercase();
        !lowered.contains("license") && !lowered.contains("copyright")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(text: &str) -> Comment {
        Comment {
            text: text.to_string(),
            file_name: "main".to_string(),
            block: true,
        }
    }

    #[test]
    fn license_filter_rejects_boilerplate() {
        let filter = LicenseFilter;
        assert!(!filter.accepts(&comment("Copyright 2020 Foo")));
        assert!(!filter.accepts(&comment("Distributed under the MIT LICENSE")));
        assert!(!filter.accepts(&comment("see license file")));
    }

    #[test]
    fn license_filter_keeps_ordinary_comments() {
        let filter = LicenseFilter;
        assert!(filter.accepts(&comment("Parses the manifest")));
        assert!(filter.accepts(&comment("")));
        assert_eq!(filter.name(), "license");
    }
}
