//! # Paper Summariser
//!
//! 获取 arXiv 最新论文、保存为文本文件，并把选中的论文交给问答服务总结
//!
//! ## 架构设计
//!
//! ### ① 外部系统层（Clients）
//! - `clients/` - 只负责和外部系统通信，不解析业务数据
//! - `ArxivClient` - 按分类获取最新论文的原始 Atom 文本
//! - `QaClient` - 把 prompt 转发给问答服务
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `FeedParser` - Atom 文本 → `PaperRecord`
//! - `PaperStore` - `PaperRecord` → 文本文件
//! - `build_prompt` - 论文 + 技术水平 → prompt
//!
//! ### ③ 编排层（Orchestration）
//! - `orchestrator/pipeline` - 分类查找 → 抓取 → 解析 → 保存
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use clients::{ArxivClient, PaperSource, QaClient};
pub use config::Config;
pub use error::{
    CategoryError, FetchError, MalformedEntry, ParseError, PipelineError, PipelineResult,
    QaError, StoreError,
};
pub use models::{CategoryRegistry, PaperRecord};
pub use orchestrator::Pipeline;
pub use services::{build_prompt, FeedParser, PaperStore, ParsedFeed, TechnicalLevel};
