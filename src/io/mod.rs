//! File formats shared with the ingestion and reporting pipelines.
//!
//! - Input: area JSON with (possibly nested) demographic fractions
//! - Output: `time,score` CSV progress log and the final snapshot

mod input;
mod progress;
mod snapshot;

pub use input::{flatten_demographics, load_areas, parse_areas, AreaRecord, KEY_SEPARATOR};
pub use progress::ProgressLog;
pub use snapshot::{AreaSnapshot, DescriptorSnapshot, Snapshot};
