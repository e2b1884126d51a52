use paper_summariser::clients::qa_client::failure_reply;
use paper_summariser::{ArxivClient, Config, FetchError, PaperSource, Pipeline, QaClient};
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

const ONE_ENTRY_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <id>http://arxiv.org/abs/2401.00001v1</id>
    <published>2024-01-02T00:00:00Z</published>
    <title>Local Paper</title>
    <summary>Served locally.</summary>
    <author><name>Carol</name></author>
    <link href="http://arxiv.org/abs/2401.00001v1" rel="alternate" type="text/html"/>
  </entry>
</feed>"#;

/// 本地 HTTP 服务：每个连接都回复同一个响应，并记录收到的原始请求
struct LocalServer {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl LocalServer {
    async fn start(status_line: &'static str, body: &'static str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let seen = Arc::clone(&seen);
                tokio::spawn(async move {
                    let request = read_request(&mut socket).await;
                    seen.lock().unwrap().push(request);

                    let response = format!(
                        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        status_line,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
        }
    }

    fn config(&self, output_dir: &std::path::Path) -> Config {
        Config {
            api_base_url: format!("{}/api/query", self.base_url),
            qa_endpoint: format!("{}/v1/pw_ai_answer", self.base_url),
            output_dir: output_dir.to_path_buf(),
            write_delay_ms: 0,
            request_timeout_secs: 5,
            ..Config::default()
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// 读完请求头和 content-length 指定的请求体
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        if let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..head_end]).to_ascii_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + body_len {
                break;
            }
        }

        match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

#[tokio::test]
async fn test_arxiv_503_is_status_error() {
    let server = LocalServer::start("503 Service Unavailable", "").await;
    let tmp = tempfile::tempdir().unwrap();
    let client = ArxivClient::new(&server.config(tmp.path())).unwrap();

    let result = client.fetch("cs.AI", 5).await;

    assert!(matches!(
        result,
        Err(FetchError::Status { status_code: 503 })
    ));
    assert_eq!(server.requests().len(), 1);
}

#[tokio::test]
async fn test_pipeline_over_http_503_returns_empty() {
    let server = LocalServer::start("503 Service Unavailable", "").await;
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("data");
    let pipeline = Pipeline::from_config(&server.config(&out)).unwrap();

    let records = pipeline.run("Artificial Intelligence", 5).await.unwrap();

    assert!(records.is_empty());
    assert!(!out.exists());
}

#[tokio::test]
async fn test_pipeline_over_http_saves_feed() {
    let server = LocalServer::start("200 OK", ONE_ENTRY_FEED).await;
    let tmp = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::from_config(&server.config(tmp.path())).unwrap();

    let records = pipeline.run("Machine Learning", 2).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].title, "Local Paper");
    assert_eq!(records[0].authors, vec!["Carol".to_string()]);
    assert!(tmp.path().join("2401.00001v1.txt").is_file());

    let requests = server.requests();
    let request_line = requests[0].lines().next().unwrap_or_default().to_string();
    assert!(request_line.starts_with("GET /api/query?"));
    assert!(request_line.contains("search_query=cat%3Acs.LG"));
    assert!(request_line.contains("sortBy=submittedDate"));
    assert!(request_line.contains("sortOrder=descending"));
    assert!(request_line.contains("max_results=2"));
}

#[tokio::test]
async fn test_qa_non_200_returns_fixed_error() {
    let server = LocalServer::start("503 Service Unavailable", "").await;
    let tmp = tempfile::tempdir().unwrap();
    let client = QaClient::new(&server.config(tmp.path())).unwrap();

    let reply = client.ask("Summarise this").await.unwrap();

    assert_eq!(reply, failure_reply());
}

#[tokio::test]
async fn test_qa_200_returns_service_json() {
    let server = LocalServer::start("200 OK", r#"{"answer":"short summary"}"#).await;
    let tmp = tempfile::tempdir().unwrap();
    let client = QaClient::new(&server.config(tmp.path())).unwrap();

    let reply = client.ask("Summarise this").await.unwrap();

    assert_eq!(reply, json!({ "answer": "short summary" }));

    let requests = server.requests();
    let request = &requests[0];
    assert!(request.starts_with("POST /v1/pw_ai_answer "));
    assert!(request.to_ascii_lowercase().contains("content-type: application/json"));
    assert!(request.ends_with(r#"{"prompt":"Summarise this"}"#));
}
