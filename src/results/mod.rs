//! Result rows, the shared ordered list, and the merger that fills it
//!
//! This module defines the row model exposed to the presentation layer.

pub mod icons;
mod list;
mod merge;
mod types;

pub use list::{ListEvent, ResultList};
pub use merge::ResultMerger;
pub use types::*;
