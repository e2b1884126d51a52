//! arXiv 分类注册表
//!
//! 显示名称 → arXiv 分类代码的静态映射，编译期生成，只读。

use crate::error::CategoryError;
use phf::phf_map;

static CATEGORIES: phf::Map<&'static str, &'static str> = phf_map! {
    "Artificial Intelligence" => "cs.AI",
    "Hardware Architecture" => "cs.AR",
    "Computational Complexity" => "cs.CC",
    "Computational Engineering, Finance, and Science" => "cs.CE",
    "Computational Geometry" => "cs.CG",
    "Computation and Language" => "cs.CL",
    "Cryptography and Security" => "cs.CR",
    "Computer Vision and Pattern Recognition" => "cs.CV",
    "Computers and Society" => "cs.CY",
    "Databases" => "cs.DB",
    "Distributed, Parallel, and Cluster Computing" => "cs.DC",
    "Digital Libraries" => "cs.DL",
    "Discrete Mathematics" => "cs.DM",
    "Data Structures and Algorithms" => "cs.DS",
    "Emerging Technologies" => "cs.ET",
    "Formal Languages and Automata Theory" => "cs.FL",
    "General Literature" => "cs.GL",
    "Graphics" => "cs.GR",
    "Computer Science and Game Theory" => "cs.GT",
    "Human-Computer Interaction" => "cs.HC",
    "Information Retrieval" => "cs.IR",
    "Information Theory" => "cs.IT",
    "Machine Learning" => "cs.LG",
    "Logic in Computer Science" => "cs.LO",
    "Multiagent Systems" => "cs.MA",
    "Multimedia" => "cs.MM",
    "Mathematical Software" => "cs.MS",
    "Numerical Analysis" => "cs.NA",
    "Neural and Evolutionary Computing" => "cs.NE",
    "Networking and Internet Architecture" => "cs.NI",
    "Other Computer Science" => "cs.OH",
    "Operating Systems" => "cs.OS",
    "Performance" => "cs.PF",
    "Programming Languages" => "cs.PL",
    "Robotics" => "cs.RO",
    "Symbolic Computation" => "cs.SC",
    "Sound" => "cs.SD",
    "Software Engineering" => "cs.SE",
    "Social and Information Networks" => "cs.SI",
    "Systems and Control" => "cs.SY",
};

/// 分类注册表
pub struct CategoryRegistry;

impl CategoryRegistry {
    /// 获取分类代码
    ///
    /// # 参数
    /// - `display_name`: 分类显示名称（精确匹配）
    ///
    /// # 返回
    /// 返回 arXiv 分类代码，未知名称返回 `CategoryError::NotFound`
    pub fn code_for(display_name: &str) -> Result<&'static str, CategoryError> {
        CATEGORIES
            .get(display_name)
            .copied()
            .ok_or_else(|| CategoryError::NotFound {
                name: display_name.to_string(),
            })
    }

    /// 所有 (显示名称, 代码)，按显示名称排序
    pub fn entries() -> Vec<(&'static str, &'static str)> {
        let mut entries: Vec<_> = CATEGORIES.entries().map(|(k, v)| (*k, *v)).collect();
        entries.sort_unstable();
        entries
    }

    pub fn len() -> usize {
        CATEGORIES.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_for_known_names() {
        assert_eq!(CategoryRegistry::code_for("Artificial Intelligence"), Ok("cs.AI"));
        assert_eq!(CategoryRegistry::code_for("Machine Learning"), Ok("cs.LG"));
        assert_eq!(CategoryRegistry::code_for("Systems and Control"), Ok("cs.SY"));
    }

    #[test]
    fn test_code_for_unknown_name() {
        assert_eq!(
            CategoryRegistry::code_for("Astrology"),
            Err(CategoryError::NotFound {
                name: "Astrology".to_string()
            })
        );
        // 精确匹配，不做大小写折叠
        assert!(CategoryRegistry::code_for("machine learning").is_err());
    }

    #[test]
    fn test_registry_contents() {
        assert_eq!(CategoryRegistry::len(), 40);
        let entries = CategoryRegistry::entries();
        assert_eq!(entries.len(), 40);
        assert!(entries.windows(2).all(|w| w[0].0 <= w[1].0));
        assert!(entries.iter().all(|(_, code)| code.starts_with("cs.")));
    }
}
