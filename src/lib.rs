//! `PremiumShop` - A Discord bot that sells time-limited premium access
//!
//! This crate pairs a Discord storefront (purchases, redeem codes, admin
//! verification) with a small HTTP API that an in-game payment detector calls
//! to report currency transfers. Orders and codes persist as flat JSON
//! snapshots; verification grants a Discord role and notifies the buyer.

// Deny the most critical lints that could lead to bugs or security issues
#![deny(
    // Security and correctness
    unsafe_code,
    unsafe_op_in_unsafe_fn,

    // Code quality - things that are almost always bugs
    unreachable_code,
    unreachable_patterns,
    unused_must_use,

    // Documentation - broken links are bugs
    rustdoc::broken_intra_doc_links,
    rustdoc::private_intra_doc_links,
)]
// Warn on things that should be fixed but aren't necessarily bugs
#![warn(
    // Documentation - missing docs should be added gradually
    missing_docs,

    // Clippy categories for overall code quality
    clippy::all,
    clippy::pedantic,
    clippy::nursery,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_types_passed_by_value,
    clippy::needless_pass_by_value,
    clippy::unnecessary_wraps,

    // Correctness
    clippy::clone_on_ref_ptr,
    clippy::dbg_macro,
    clippy::exit,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,

    // Complexity and readability
    clippy::cognitive_complexity,
    clippy::large_enum_variant,
    clippy::match_same_arms,
    clippy::too_many_lines,

    // Style consistency
    clippy::enum_glob_use,
    clippy::inconsistent_struct_constructor,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::redundant_closure_for_method_calls,
    clippy::semicolon_if_nothing_returned,
    clippy::wildcard_imports,

    // Future compatibility
    future_incompatible,
    rust_2018_idioms,
)]
// Allow some pedantic lints that are too noisy or not applicable
#![allow(
    clippy::module_name_repetitions,  // Common pattern in Rust
    clippy::missing_errors_doc,        // Will add gradually
    clippy::missing_panics_doc,        // Will add gradually
)]

/// HTTP payment API consumed by the game-server payment detector
pub mod api;
/// Discord bot interface - commands, handlers, and the outbound dispatcher
pub mod bot;
/// Runtime settings loaded from environment variables
pub mod config;
/// Core business logic - plans, order lifecycle, and code redemption
pub mod core;
/// Serde record definitions persisted by the stores
pub mod entities;
/// Unified error types and result handling
pub mod errors;
/// Outbound side-effect queue connecting the core to the Discord layer
pub mod outbound;
/// File-backed JSON snapshot stores for orders and codes
pub mod store;

#[cfg(test)]
pub mod test_utils;
