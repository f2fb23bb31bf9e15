pub mod document_extractor;
pub mod llm_service;
pub mod oracle;
pub mod page_reader;

pub use document_extractor::DocumentExtractor;
pub use llm_service::LlmService;
pub use oracle::{AnswerOracle, PlanOracle};
pub use page_reader::{extract_submit_url, BrowserPageReader, PageReader};
