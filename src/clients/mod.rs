pub mod arxiv_client;
pub mod qa_client;

pub use arxiv_client::{ArxivClient, PaperSource};
pub use qa_client::QaClient;
