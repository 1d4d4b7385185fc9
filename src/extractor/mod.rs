pub mod partial;
pub mod random;
pub mod summary;
pub mod writer;

pub use partial::PartialExtractor;
pub use random::{PreviewRow, RandomExtractor};
pub use summary::{ExtractionMode, ExtractionSummary, StopReason, SummaryBuilder};
pub use writer::IndexedWriter;
