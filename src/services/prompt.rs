//! 提问内容构建
//!
//! 把论文标题、摘要和读者水平拼成发给问答服务的 prompt

use crate::models::PaperRecord;
use std::fmt;

/// 读者技术水平
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum TechnicalLevel {
    #[default]
    Basic,
    Intermediate,
    Advanced,
}

impl TechnicalLevel {
    pub fn name(self) -> &'static str {
        match self {
            TechnicalLevel::Basic => "Basic",
            TechnicalLevel::Intermediate => "Intermediate",
            TechnicalLevel::Advanced => "Advanced",
        }
    }
}

impl fmt::Display for TechnicalLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 构建总结请求
pub fn build_prompt(record: &PaperRecord, level: TechnicalLevel) -> String {
    format!(
        "Please summarize the following paper at a {} level of technical understanding:\n\nTitle: {}\n\nSummary: {}\n",
        level.name().to_lowercase(),
        record.title,
        record.summary
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt() {
        let record = PaperRecord {
            id: "http://arxiv.org/abs/1234.5678v1".to_string(),
            title: "Deep Learning Survey".to_string(),
            summary: "A survey.".to_string(),
            published: "2024-01-01T00:00:00Z".to_string(),
            authors: vec![],
            link: "http://arxiv.org/abs/1234.5678v1".to_string(),
        };

        assert_eq!(
            build_prompt(&record, TechnicalLevel::Intermediate),
            "Please summarize the following paper at a intermediate level of technical understanding:\n\n\
             Title: Deep Learning Survey\n\n\
             Summary: A survey.\n"
        );
        assert!(build_prompt(&record, TechnicalLevel::default()).contains("at a basic level"));
    }

    #[test]
    fn test_level_display() {
        assert_eq!(TechnicalLevel::Advanced.to_string(), "Advanced");
    }
}
