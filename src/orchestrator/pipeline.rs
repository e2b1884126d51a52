//! 抓取流水线 - 编排层
//!
//! ## 职责
//!
//! 按顺序执行：分类查找 → 抓取 → 解析 → 保存。
//!
//! ## 状态
//!
//! ```text
//! Idle → Fetching → FetchFailed (空结果)
//!                 → Parsing → ParseFailed (空结果)
//!                           → ParseEmpty (空结果)
//!                           → Storing → Done
//! ```
//!
//! 抓取失败、文档无法解析、结果为空都降级为空列表；
//! 未知分类和保存失败交给调用方处理。

use crate::clients::{ArxivClient, PaperSource};
use crate::config::Config;
use crate::error::{FetchError, PipelineError, PipelineResult};
use crate::models::{CategoryRegistry, PaperRecord};
use crate::services::{FeedParser, PaperStore};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Fetching,
    FetchFailed,
    Parsing,
    ParseFailed,
    ParseEmpty,
    Storing,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "Idle",
            Stage::Fetching => "Fetching",
            Stage::FetchFailed => "FetchFailed",
            Stage::Parsing => "Parsing",
            Stage::ParseFailed => "ParseFailed",
            Stage::ParseEmpty => "ParseEmpty",
            Stage::Storing => "Storing",
            Stage::Done => "Done",
        };
        f.write_str(name)
    }
}

/// 抓取流水线
///
/// 不在两次运行之间保存任何状态，唯一共享的是输出目录
pub struct Pipeline<S> {
    source: S,
    parser: FeedParser,
    store: PaperStore,
    output_dir: PathBuf,
}

impl Pipeline<ArxivClient> {
    /// 按配置创建连接 arXiv 的流水线
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        Ok(Self::new(
            ArxivClient::new(config)?,
            PaperStore::from_config(config),
            config.output_dir.clone(),
        ))
    }
}

impl<S: PaperSource> Pipeline<S> {
    pub fn new(source: S, store: PaperStore, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            parser: FeedParser::new(),
            store,
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// 运行一次流水线
    ///
    /// # 参数
    /// - `category`: 分类显示名称
    /// - `max_results`: 最多获取的论文数量
    ///
    /// # 返回
    /// 返回按提交时间倒序的论文；抓取失败或没有结果时返回空列表
    pub async fn run(&self, category: &str, max_results: u32) -> PipelineResult<Vec<PaperRecord>> {
        let mut stage = Stage::Idle;
        let code = CategoryRegistry::code_for(category)?;

        info!("🔍 [{}] 正在获取最新 {} 篇论文 ({})", category, max_results, code);

        advance(&mut stage, Stage::Fetching);
        let raw = match self.source.fetch(code, max_results).await {
            Ok(raw) => raw,
            Err(e) => {
                advance(&mut stage, Stage::FetchFailed);
                warn!("⚠️ [{}] 获取论文失败: {}", category, e);
                return Ok(Vec::new());
            }
        };

        advance(&mut stage, Stage::Parsing);
        let feed = match self.parser.parse(&raw) {
            Ok(feed) => feed,
            Err(e) => {
                advance(&mut stage, Stage::ParseFailed);
                warn!("⚠️ [{}] 响应无法解析: {}", category, e);
                return Ok(Vec::new());
            }
        };

        for skipped in &feed.skipped {
            warn!("⚠️ [{}] 跳过格式错误的条目: {}", category, skipped);
        }

        if feed.records.is_empty() {
            advance(&mut stage, Stage::ParseEmpty);
            info!("[{}] 没有找到论文", category);
            return Ok(feed.records);
        }

        advance(&mut stage, Stage::Storing);
        debug!(
            "[{}] 写入 {} 篇论文到 {}，间隔 {:?}",
            category,
            feed.records.len(),
            self.output_dir.display(),
            self.store.write_delay()
        );
        if let Err(source) = self.store.save(&feed.records, &self.output_dir).await {
            error!("❌ [{}] 保存论文失败: {}", category, source);
            return Err(PipelineError::Store {
                records: feed.records,
                source,
            });
        }

        advance(&mut stage, Stage::Done);
        info!("✅ [{}] 完成，共 {} 篇论文", category, feed.records.len());
        Ok(feed.records)
    }
}

fn advance(stage: &mut Stage, next: Stage) {
    debug!("流水线状态: {} → {}", stage, next);
    *stage = next;
}
