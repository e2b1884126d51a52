//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! pipeline (分类 → Vec<PaperRecord>)
//!     ↓
//! services (能力层：parse / store / prompt)
//!     ↓
//! clients (外部系统：arXiv / 问答服务)
//! ```
//!
//! 编排层只做调度和日志，不做具体解析或写文件。

pub mod pipeline;

pub use pipeline::{Pipeline, Stage};
