pub mod handlers;
pub mod index;
pub mod normalize;
pub mod record;
pub mod report;
pub mod splay;

pub use handlers::{AppState, router};
pub use index::{BuildStats, Concordance, ConcordanceError, QueryParams, QueryResult, WordTable};
pub use record::OccurrenceRecord;
pub use report::{format_record, write_report};
pub use splay::SplayTree;
