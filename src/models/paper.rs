use serde::{Deserialize, Serialize};

/// 论文记录
///
/// 每次解析都重新构造，构造后不再修改。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// 规范标识 URL，例如 `http://arxiv.org/abs/1234.5678v1`
    pub id: String,
    pub title: String,
    pub summary: String,
    /// 源数据提供的时间戳，原样保留
    pub published: String,
    #[serde(default)]
    pub authors: Vec<String>,
    /// 可在浏览器中查看的 HTML 链接
    pub link: String,
}

impl PaperRecord {
    /// 从 id 推导的文件名主干（id 的最后一段路径）
    ///
    /// # 返回
    /// `http://arxiv.org/abs/1234.5678v1` 返回 `1234.5678v1`；
    /// 最后一段为空时返回空字符串
    pub fn file_stem(&self) -> &str {
        let id = self.id.trim().trim_end_matches('/');
        id.rsplit('/').next().unwrap_or(id)
    }

    /// 作者列表，以 `, ` 连接
    pub fn authors_line(&self) -> String {
        self.authors.join(", ")
    }
}

/// 按标题精确查找，返回第一个匹配项
pub fn find_by_title<'a>(records: &'a [PaperRecord], title: &str) -> Option<&'a PaperRecord> {
    records.iter().find(|r| r.title == title)
}
