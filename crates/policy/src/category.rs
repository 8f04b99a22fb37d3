use crate::format::file_extension;

/// Global upload ceiling: 50 MiB, regardless of category.
pub const GLOBAL_SIZE_LIMIT: u64 = 50 * 1024 * 1024;

/// A named class of acceptable file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    Image,
    Document,
}

/// Acceptance policy for one file category.
///
/// Extensions are lowercase and dot-prefixed; MIME types are exact matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryPolicy {
    pub category: FileCategory,
    /// User-facing name used in rejection messages.
    pub display_name: &'static str,
    pub extensions: &'static [&'static str],
    pub mime_types: &'static [&'static str],
    /// Per-category size ceiling in bytes.
    pub max_size: u64,
}

/// The acceptance table. Order is significant: MIME resolution scans in
/// declared order and the first match wins (images before documents).
///
/// Invariant: every extension appears in exactly one category.
pub const POLICIES: &[CategoryPolicy] = &[
    CategoryPolicy {
        category: FileCategory::Image,
        display_name: "image",
        extensions: &[".jpg", ".jpeg", ".png", ".gif", ".webp"],
        mime_types: &["image/jpeg", "image/png", "image/gif", "image/webp"],
        max_size: 10 * 1024 * 1024,
    },
    CategoryPolicy {
        category: FileCategory::Document,
        display_name: "PDF document",
        extensions: &[".pdf"],
        mime_types: &["application/pdf"],
        max_size: 20 * 1024 * 1024,
    },
];

/// Resolves the category policy for a MIME type. First match wins.
pub fn policy_for_mime(mime_type: &str) -> Option<&'static CategoryPolicy> {
    POLICIES
        .iter()
        .find(|policy| policy.mime_types.contains(&mime_type))
}

/// Resolves the category policy for a dot-prefixed extension
/// (case-insensitive).
pub fn policy_for_extension(extension: &str) -> Option<&'static CategoryPolicy> {
    let extension = extension.to_lowercase();
    POLICIES
        .iter()
        .find(|policy| policy.extensions.contains(&extension.as_str()))
}

/// Classifies a filename by its extension alone, independent of MIME
/// sniffing. `None` means unknown.
pub fn file_type(name: &str) -> Option<FileCategory> {
    let ext = file_extension(name);
    if ext.is_empty() {
        return None;
    }
    policy_for_extension(&ext).map(|policy| policy.category)
}
