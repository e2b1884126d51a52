//! 论文存储服务 - 业务能力层
//!
//! 只负责"把论文记录写成文本文件"能力，一篇论文一个文件

use crate::config::Config;
use crate::error::StoreError;
use crate::models::PaperRecord;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs;
use tokio::time::sleep;
use tracing::{debug, info};

/// 论文存储服务
///
/// 文件名取自 id 的最后一段，同名文件直接覆盖，重复保存结果不变
pub struct PaperStore {
    /// 相邻两次写入之间的等待时间，`Duration::ZERO` 表示不等待
    write_delay: Duration,
}

impl PaperStore {
    /// 创建新的存储服务
    pub fn new(write_delay: Duration) -> Self {
        Self { write_delay }
    }

    /// 不做写入间隔，用于测试
    pub fn without_delay() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.write_delay())
    }

    pub fn write_delay(&self) -> Duration {
        self.write_delay
    }

    /// 保存论文
    ///
    /// # 参数
    /// - `records`: 要保存的论文
    /// - `output_dir`: 输出目录，不存在时自动创建
    ///
    /// # 返回
    /// 返回按顺序写入的文件路径；遇到第一个失败立即返回
    pub async fn save(
        &self,
        records: &[PaperRecord],
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, StoreError> {
        fs::create_dir_all(output_dir)
            .await
            .map_err(|source| StoreError::CreateDir {
                path: output_dir.to_path_buf(),
                source,
            })?;

        let mut written = Vec::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if i > 0 && !self.write_delay.is_zero() {
                sleep(self.write_delay).await;
            }

            let path = output_dir.join(file_name(record)?);
            fs::write(&path, render(record))
                .await
                .map_err(|source| StoreError::Write {
                    path: path.clone(),
                    source,
                })?;

            debug!("✓ 已写入 {}", path.display());
            written.push(path);
        }

        info!("💾 已保存 {} 篇论文到 {}", written.len(), output_dir.display());
        Ok(written)
    }
}

/// 论文对应的文件名：`<id 最后一段>.txt`
pub fn file_name(record: &PaperRecord) -> Result<String, StoreError> {
    let stem = record.file_stem();
    if stem.is_empty() {
        return Err(StoreError::InvalidFileStem {
            id: record.id.clone(),
        });
    }
    Ok(format!("{}.txt", stem))
}

/// 论文的文本格式
pub fn render(record: &PaperRecord) -> String {
    format!(
        "Title: {}\nAuthors: {}\nPublished: {}\nLink: {}\n\nSummary:\n{}\n",
        record.title,
        record.authors_line(),
        record.published,
        record.link,
        record.summary
    )
}
