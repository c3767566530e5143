//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Admin-only commands (manual verification, code management)
pub mod admin;

/// General utility commands
pub mod general;

/// Purchase and redemption commands
pub mod shop;

// Export commands
pub use admin::*;
pub use general::*;
pub use shop::*;
