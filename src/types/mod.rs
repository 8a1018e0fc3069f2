pub mod analysis;
pub mod error;
pub mod matrix;
pub mod selection;

pub use analysis::{AnalysisRecord, AnalysisType, InsightBlock, InsightCategory};
pub use error::{BenchError, ErrorCategory, ErrorClassifier, Result, SelectionIssue};
pub use matrix::{ComparisonMatrix, ConfidenceMap, FetchResult, SourceRecord, cell_key};
pub use selection::{Criterion, Entity, Selection};
