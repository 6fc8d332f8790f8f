//! Actions turn pipeline outcomes into file operations.
//!
//! ```text
//! FileOutcome (rewritten text + planned edits)
//!     ↓
//! Action (outcome → operation conversion)
//!     ↓
//! Operation (write a file, or preview it)
//! ```
//!
//! - [`WrapLiterals`]: write rewritten Swift files (or preview them)

mod operation;
mod traits;
mod wrap_literals;

pub use traits::Action;
pub use wrap_literals::WrapLiterals;
