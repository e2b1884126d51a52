//! 错误类型
//!
//! 每个组件一个错误枚举；流水线只把"必须让调用方知道"的错误往上抛。

use crate::models::PaperRecord;
use std::path::PathBuf;
use thiserror::Error;

/// 分类查找错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    /// 分类名称不在注册表中
    #[error("未知分类: {name}")]
    NotFound { name: String },
}

/// 抓取错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// API 返回非 200 状态码
    #[error("API 返回错误状态码: {status_code}")]
    Status { status_code: u16 },

    /// 网络请求本身失败（连接、超时、读取响应体）
    #[error("请求 {url} 失败: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// 结果数量必须为正整数
    #[error("max_results 必须大于 0")]
    InvalidLimit,

    /// 基础地址无法解析
    #[error("无效的 API 地址 {url}: {reason}")]
    InvalidEndpoint { url: String, reason: String },
}

/// 整个文档解析失败
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML 语法错误
    #[error("XML 解析失败 (位置 {position}): {source}")]
    Xml {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },

    /// 文档结束时仍有未闭合的元素
    #[error("文档被截断，未闭合的元素: {open}")]
    Truncated { open: String },
}

/// 单个条目缺少必填字段
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("第 {index} 个条目缺少必填字段 `{field}` (id: {})", .id.as_deref().unwrap_or("未知"))]
pub struct MalformedEntry {
    /// 条目在文档中的位置（从 0 开始）
    pub index: usize,
    /// 条目 id（如果能取到）
    pub id: Option<String>,
    /// 缺失的字段名
    pub field: &'static str,
}

/// 存储错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 无法创建输出目录
    #[error("无法创建目录 {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 无法写入文件
    #[error("无法写入文件 {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// id 的最后一段为空，无法生成文件名
    #[error("无法从 id 生成文件名: {id}")]
    InvalidFileStem { id: String },
}

impl StoreError {
    /// 出错的路径（文件名无法生成时为 None）
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            StoreError::CreateDir { path, .. } | StoreError::Write { path, .. } => Some(path),
            StoreError::InvalidFileStem { .. } => None,
        }
    }
}

/// 问答服务调用错误
#[derive(Debug, Error)]
pub enum QaError {
    /// 网络请求失败
    #[error("问答服务请求失败 ({endpoint}): {source}")]
    Request {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 200 响应但响应体不是 JSON
    #[error("问答服务返回的不是有效 JSON ({endpoint}): {source}")]
    InvalidJson {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("无法读取配置文件 {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件格式错误
    #[error("无法解析配置文件 {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

/// 流水线错误
///
/// 抓取失败和空结果不在这里：它们降级为空列表。
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Category(#[from] CategoryError),

    /// 记录已解析但落盘失败，记录本身仍然随错误返回
    #[error("已获取 {} 篇论文但保存失败: {source}", .records.len())]
    Store {
        records: Vec<PaperRecord>,
        #[source]
        source: StoreError,
    },
}

impl PipelineError {
    /// 取回落盘失败时仍然有效的记录
    pub fn into_records(self) -> Vec<PaperRecord> {
        match self {
            PipelineError::Store { records, .. } => records,
            PipelineError::Category(_) => Vec::new(),
        }
    }
}

/// 流水线结果类型
pub type PipelineResult<T> = Result<T, PipelineError>;
