use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// 程序配置文件
///
/// 优先级：环境变量 > TOML 文件 > 默认值
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// arXiv 查询接口地址
    pub api_base_url: String,
    /// 每次抓取的论文数量
    pub max_results: u32,
    /// 论文文本文件输出目录
    pub output_dir: PathBuf,
    /// 两次写文件之间的间隔（毫秒），0 表示不等待
    pub write_delay_ms: u64,
    /// HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// 问答服务地址
    pub qa_endpoint: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://export.arxiv.org/api/query".to_string(),
            max_results: 5,
            output_dir: PathBuf::from("data"),
            write_delay_ms: 1000,
            request_timeout_secs: 30,
            user_agent: concat!("paper_summariser/", env!("CARGO_PKG_VERSION")).to_string(),
            qa_endpoint: "http://pathway:8000/v1/pw_ai_answer".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 从 TOML 文件加载，再叠加环境变量
    ///
    /// # 参数
    /// - `path`: 配置文件路径，None 时只使用默认值和环境变量
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        base.apply_overrides(|key| std::env::var(key).ok())
    }

    /// 只读取 TOML 文件，缺失字段使用默认值
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// 写文件间隔
    pub fn write_delay(&self) -> Duration {
        Duration::from_millis(self.write_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn apply_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(v) = lookup("ARXIV_API_BASE_URL") {
            self.api_base_url = v;
        }
        if let Some(v) = parse_var(&lookup, "MAX_RESULTS", "u32")? {
            self.max_results = v;
        }
        if let Some(v) = lookup("OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = parse_var(&lookup, "WRITE_DELAY_MS", "u64")? {
            self.write_delay_ms = v;
        }
        if let Some(v) = parse_var(&lookup, "REQUEST_TIMEOUT_SECS", "u64")? {
            self.request_timeout_secs = v;
        }
        if let Some(v) = lookup("USER_AGENT") {
            self.user_agent = v;
        }
        if let Some(v) = lookup("QA_ENDPOINT") {
            self.qa_endpoint = v;
        }
        if let Some(v) = parse_var(&lookup, "VERBOSE_LOGGING", "bool")? {
            self.verbose_logging = v;
        }
        Ok(self)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
