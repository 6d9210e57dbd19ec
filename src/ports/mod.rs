//! Port traits (interfaces)
//!
//! These traits define the boundaries between the probe core and the host
//! that feeds it samples and consumes its results. Adapters implement them.

pub mod output;
pub mod report;
pub mod source;

pub use output::*;
pub use report::*;
pub use source::*;
