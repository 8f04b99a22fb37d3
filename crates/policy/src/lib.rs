//! File acceptance policy for chat uploads.
//!
//! A declarative table of accepted file categories (extensions, MIME types,
//! per-category size ceiling) plus the pure validation and formatting
//! helpers built on it. No I/O, no async — everything here is callable from
//! both the transfer client and the UI layer.

mod category;
mod format;
mod validate;

pub use category::{
    CategoryPolicy, FileCategory, GLOBAL_SIZE_LIMIT, POLICIES, file_type, policy_for_extension,
    policy_for_mime,
};
pub use format::{file_extension, format_size};
pub use validate::{ValidationError, validate};
