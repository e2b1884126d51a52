pub mod feed_parser;
pub mod paper_store;
pub mod prompt;

pub use feed_parser::{FeedParser, ParsedFeed};
pub use paper_store::PaperStore;
pub use prompt::{build_prompt, TechnicalLevel};
