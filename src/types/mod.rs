//! Type definitions for the long-command notifier
//!
//! - [`identifiers`] - Type-safe wrappers (`CommandId`, `PaneTarget`)
//! - [`options`] - Notifier configuration and its builder

pub mod identifiers;
pub mod options;

// Re-export commonly used types
pub use identifiers::{CommandId, PaneTarget};
pub use options::{IdleOptions, NotifierOptions, NotifierOptionsBuilder, TypingOptions};
