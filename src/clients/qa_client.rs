/// 问答服务客户端
///
/// 把 prompt 转发给外部问答服务，返回其 JSON 响应
use crate::config::Config;
use crate::error::QaError;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tracing::{debug, warn};

/// 非 200 响应时返回的固定错误信息
pub const QA_FAILURE_MESSAGE: &str = "Failed to get a response from the microservice.";

/// 问答服务客户端
pub struct QaClient {
    http: Client,
    endpoint: String,
}

impl QaClient {
    /// 创建新的问答服务客户端
    pub fn new(config: &Config) -> Result<Self, QaError> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.request_timeout())
            .build()
            .map_err(|source| QaError::Request {
                endpoint: config.qa_endpoint.clone(),
                source,
            })?;

        Ok(Self {
            http,
            endpoint: config.qa_endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// 提问
    ///
    /// # 参数
    /// - `prompt`: 完整的提问内容
    ///
    /// # 返回
    /// 200 时返回服务的 JSON 响应，其他状态码返回 `{"error": ...}`
    pub async fn ask(&self, prompt: &str) -> Result<Value, QaError> {
        debug!("调用问答服务: {}，prompt 长度 {}", self.endpoint, prompt.len());

        let response = self
            .http
            .post(&self.endpoint)
            .header(ACCEPT, "*/*")
            .header(CONTENT_TYPE, "application/json")
            .json(&json!({ "prompt": prompt }))
            .send()
            .await
            .map_err(|source| QaError::Request {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("⚠️ 问答服务返回状态码 {}", status);
            return Ok(failure_reply());
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| QaError::InvalidJson {
                endpoint: self.endpoint.clone(),
                source,
            })
    }
}

/// 固定格式的失败响应
pub fn failure_reply() -> Value {
    json!({ "error": QA_FAILURE_MESSAGE })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reply_shape() {
        let reply = failure_reply();
        assert_eq!(reply["error"], QA_FAILURE_MESSAGE);
        assert_eq!(reply.as_object().map(|o| o.len()), Some(1));
    }

    #[test]
    fn test_endpoint_from_config() {
        let config = Config {
            qa_endpoint: "http://localhost:8000/v1/pw_ai_answer".to_string(),
            ..Config::default()
        };
        let client = QaClient::new(&config).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8000/v1/pw_ai_answer");
    }
}
