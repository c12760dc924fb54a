pub mod analysis;
pub mod extractor;
pub mod store;
pub mod summarizer;

pub use analysis::AnalysisService;
pub use extractor::{ContentExtractor, ExtractError, ExtractedContent};
pub use store::{DocumentStore, MemoryStore, MongoStore, StoreError};
pub use summarizer::{GeminiSummarizer, MockSummarizer, SummarizeError, Summarizer};
