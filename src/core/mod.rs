//! # Core
//!
//! Domain types and the pure logic around them. Nothing here performs
//! network I/O; the `directory` module drives the backend and calls into
//! these pieces.
//!
//! ## Modules
//!
//! - [`models`]: table rows and merged view models
//! - [`merge`]: left-join of base rows with translation rows
//! - [`validation`]: identifier checks and input sanitizers
//! - [`language`]: persisted language selection
//! - [`config`]: layered configuration
//! - [`categories`]: category icons and map helpers
//! - [`i18n`]: interface strings

pub mod categories;
pub mod config;
pub mod i18n;
pub mod language;
pub mod merge;
pub mod models;
pub mod validation;
