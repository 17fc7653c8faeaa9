//! Completion notice pipeline
//!
//! - `composer` - Builds the bounded notice text
//! - `idle` - Waits for the target pane to stop changing
//! - `injector` - Types the notice into the pane, one delivery at a time

pub mod composer;
pub mod idle;
pub mod injector;

pub use composer::{ExitCode, NoticeComposer, Outcome};
pub use idle::{IdleDetector, IdleOutcome};
pub use injector::{Delivery, SessionInjector};
