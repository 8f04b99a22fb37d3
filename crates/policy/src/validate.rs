use thiserror::Error;

use crate::category::{CategoryPolicy, GLOBAL_SIZE_LIMIT, policy_for_mime};
use crate::format::{file_extension, format_size};

/// Why a candidate file was rejected.
///
/// The `Display` strings are the user-facing rejection reasons.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no file was selected")]
    NoFile,

    #[error("file size may not exceed {}", format_size(GLOBAL_SIZE_LIMIT))]
    TooLarge,

    #[error("unsupported file format")]
    UnsupportedFormat,

    #[error("{display_name} files may not exceed {}", format_size(*.max_size))]
    CategoryTooLarge {
        display_name: &'static str,
        max_size: u64,
    },

    #[error("file extension does not match the file type")]
    ExtensionMismatch,
}

/// Validates a candidate file against the acceptance table.
///
/// Checks run in order: presence, global ceiling, MIME category (first
/// matching policy in declared order), category ceiling, extension
/// membership. Returns the matched policy on acceptance.
pub fn validate(
    name: &str,
    mime_type: &str,
    size: u64,
) -> Result<&'static CategoryPolicy, ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::NoFile);
    }

    if size > GLOBAL_SIZE_LIMIT {
        return Err(ValidationError::TooLarge);
    }

    let policy = policy_for_mime(mime_type).ok_or(ValidationError::UnsupportedFormat)?;

    if size > policy.max_size {
        return Err(ValidationError::CategoryTooLarge {
            display_name: policy.display_name,
            max_size: policy.max_size,
        });
    }

    let ext = file_extension(name);
    if !policy.extensions.contains(&ext.as_str()) {
        return Err(ValidationError::ExtensionMismatch);
    }

    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{FileCategory, POLICIES};

    #[test]
    fn accepts_png_within_limits() {
        let policy = validate("photo.png", "image/png", 5 * 1024 * 1024).unwrap();
        assert_eq!(policy.category, FileCategory::Image);
    }

    #[test]
    fn accepts_pdf_within_limits() {
        let policy = validate("paper.pdf", "application/pdf", 15 * 1024 * 1024).unwrap();
        assert_eq!(policy.category, FileCategory::Document);
    }

    #[test]
    fn rejects_empty_name() {
        assert_eq!(validate("", "image/png", 10), Err(ValidationError::NoFile));
    }

    #[test]
    fn rejects_over_global_ceiling_regardless_of_category() {
        let too_big = GLOBAL_SIZE_LIMIT + 1;
        assert_eq!(
            validate("huge.png", "image/png", too_big),
            Err(ValidationError::TooLarge)
        );
        assert_eq!(
            validate("huge.pdf", "application/pdf", too_big),
            Err(ValidationError::TooLarge)
        );
        // Even an unknown type hits the global ceiling first.
        assert_eq!(
            validate("huge.bin", "application/octet-stream", too_big),
            Err(ValidationError::TooLarge)
        );
    }

    #[test]
    fn rejects_unmatched_mime() {
        assert_eq!(
            validate("clip.mp4", "video/mp4", 1024),
            Err(ValidationError::UnsupportedFormat)
        );
    }

    #[test]
    fn rejects_over_category_ceiling_with_display_name() {
        let err = validate("big.png", "image/png", 11 * 1024 * 1024).unwrap_err();
        assert_eq!(
            err,
            ValidationError::CategoryTooLarge {
                display_name: "image",
                max_size: 10 * 1024 * 1024,
            }
        );
        assert_eq!(err.to_string(), "image files may not exceed 10 MB");
    }

    #[test]
    fn rejects_extension_mismatch() {
        // MIME says PNG but the name claims PDF.
        assert_eq!(
            validate("sneaky.pdf", "image/png", 1024),
            Err(ValidationError::ExtensionMismatch)
        );
        // No extension at all.
        assert_eq!(
            validate("noext", "image/png", 1024),
            Err(ValidationError::ExtensionMismatch)
        );
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(validate("SHOT.PNG", "image/png", 1024).is_ok());
    }

    #[test]
    fn every_policy_accepts_its_own_pairs() {
        for policy in POLICIES {
            let mime = policy.mime_types[0];
            for ext in policy.extensions {
                let name = format!("file{ext}");
                assert!(validate(&name, mime, 1024).is_ok(), "for {name} / {mime}");
            }
        }
    }
}
