//! Export artifacts generated from one batch result.
//!
//! Both exports read the same [`crate::batch::BatchResult`] without
//! mutating it, so generation order does not matter. An empty batch yields
//! [`crate::error::Error::EmptyBatch`] instead of an empty file.

mod narrative;
mod tabular;

pub use narrative::{render_narrative, write_narrative};
pub use tabular::{CSV_HEADER, tabular_to_writer, write_tabular};
