/// arXiv API 客户端
///
/// 只负责"按分类取最新一页论文"，返回原始 Atom 文本，不做解析
use crate::config::Config;
use crate::error::FetchError;
use reqwest::{Client, StatusCode, Url};
use tracing::{debug, warn};

/// 论文数据源
///
/// 流水线只依赖这个能力，测试中可以换成内存数据源
#[allow(async_fn_in_trait)]
pub trait PaperSource {
    /// 获取某个分类最新的论文列表（原始文本）
    async fn fetch(&self, category_code: &str, max_results: u32) -> Result<String, FetchError>;
}

/// arXiv 客户端
pub struct ArxivClient {
    http: Client,
    base_url: Url,
}

impl ArxivClient {
    /// 创建新的 arXiv 客户端
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let base_url = Url::parse(&config.api_base_url).map_err(|e| FetchError::InvalidEndpoint {
            url: config.api_base_url.clone(),
            reason: e.to_string(),
        })?;

        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()
            .map_err(|source| FetchError::Transport {
                url: config.api_base_url.clone(),
                source,
            })?;

        Ok(Self { http, base_url })
    }

    /// 构建查询地址
    ///
    /// # 参数
    /// - `category_code`: arXiv 分类代码，如 `cs.AI`
    /// - `max_results`: 返回数量上限，超过 API 上限时由 API 自行截断
    pub fn query_url(&self, category_code: &str, max_results: u32) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("search_query", &format!("cat:{}", category_code))
            .append_pair("sortBy", "submittedDate")
            .append_pair("sortOrder", "descending")
            .append_pair("max_results", &max_results.to_string());
        url
    }
}

impl PaperSource for ArxivClient {
    async fn fetch(&self, category_code: &str, max_results: u32) -> Result<String, FetchError> {
        if max_results == 0 {
            return Err(FetchError::InvalidLimit);
        }

        let url = self.query_url(category_code, max_results);
        debug!("请求 arXiv: {}", url);

        let transport = |source: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            source,
        };

        let response = self.http.get(url.clone()).send().await.map_err(transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("⚠️ arXiv 返回状态码 {}", status);
            return Err(FetchError::Status {
                status_code: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(transport)?;
        debug!("arXiv 响应长度: {} 字节", body.len());

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ArxivClient {
        ArxivClient::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_query_url_parameters() {
        let url = client().query_url("cs.AI", 5);
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(url.host_str(), Some("export.arxiv.org"));
        assert_eq!(url.path(), "/api/query");
        assert_eq!(
            pairs,
            vec![
                ("search_query".to_string(), "cat:cs.AI".to_string()),
                ("sortBy".to_string(), "submittedDate".to_string()),
                ("sortOrder".to_string(), "descending".to_string()),
                ("max_results".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_url_passes_large_limit_through() {
        let url = client().query_url("cs.LG", 100_000);
        assert!(url.query_pairs().any(|(k, v)| k == "max_results" && v == "100000"));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = Config {
            api_base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            ArxivClient::new(&config),
            Err(FetchError::InvalidEndpoint { .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_limit_rejected_before_request() {
        let result = client().fetch("cs.AI", 0).await;
        assert!(matches!(result, Err(FetchError::InvalidLimit)));
    }
}
