//! Search session module
//!
//! The [`UnifiedSearchModel`] holds all session state and is driven either
//! directly (it performs no I/O) or through a [`SearchSession`] task.

mod error;
mod models;
mod orchestrator;
mod session;

pub use error::{SearchError, SessionClosed};
pub use models::*;
pub use orchestrator::UnifiedSearchModel;
pub use session::SearchSession;
