pub mod category;
pub mod paper;

pub use category::CategoryRegistry;
pub use paper::{find_by_title, PaperRecord};
