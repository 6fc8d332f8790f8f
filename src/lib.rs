//! locwrap - wrap SwiftUI UI strings for localization
//!
//! locwrap rewrites Swift sources so that user-visible string literals in
//! SwiftUI views become `String(localized: "...", comment: "...")` calls.
//! Only literals in registered UI positions are touched; everything else in
//! the file is copied byte for byte, and running it twice changes nothing.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, commands, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Wrapping engine (scanner, classifier, comments, rewriter)
//! - `issues`: Issue type definitions and reporting
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod utils;
