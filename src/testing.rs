// src/testing.rs
// =============================================================================
// In-memory stand-ins for the network and the model, used by unit tests,
// plus a few fixtures (an HTML page, a one-page PDF, a scripted HTTP server).
// =============================================================================

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::error::{EditorialError, Result};
use crate::fetch::{FetchedPage, PageFetcher};
use crate::llm::{CompletionClient, CompletionRequest};

/// Serves canned pages. Unknown URLs behave like a 404.
#[derive(Default)]
pub struct FakeFetcher {
    pages: HashMap<String, Result<FetchedPage>>,
    rendered: HashMap<String, String>,
    rendered_log: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(html_page(url, html)));
        self
    }

    pub fn with_bytes(mut self, url: &str, content_type: &str, body: Vec<u8>) -> Self {
        let page = FetchedPage {
            url: url.to_string(),
            content_type: content_type.to_string(),
            body,
        };
        self.pages.insert(url.to_string(), Ok(page));
        self
    }

    pub fn with_error(mut self, url: &str, error: EditorialError) -> Self {
        self.pages.insert(url.to_string(), Err(error));
        self
    }

    /// What the headless browser would return for `url`
    pub fn with_rendered(mut self, url: &str, html: &str) -> Self {
        self.rendered.insert(url.to_string(), html.to_string());
        self
    }

    pub fn rendered_urls(&self) -> Vec<String> {
        self.rendered_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        match self.pages.get(url) {
            Some(page) => page.clone(),
            None => Err(EditorialError::ProblemNotFound(format!("HTTP 404 for {}", url))),
        }
    }

    async fn render(&self, url: &str, _wait: Duration) -> Result<String> {
        self.rendered_log.lock().unwrap().push(url.to_string());
        self.rendered
            .get(url)
            .cloned()
            .ok_or_else(|| EditorialError::Network(format!("no browser available for {}", url)))
    }
}

/// Answers completions from a script, in order
pub struct FakeLlm {
    replies: Mutex<VecDeque<Result<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeLlm {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// User prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for FakeLlm {
    fn model(&self) -> &str {
        "fake-model"
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.prompts.lock().unwrap().push(request.prompt);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(EditorialError::Api("no scripted reply left".to_string())))
    }
}

pub fn html_page(url: &str, html: &str) -> FetchedPage {
    FetchedPage {
        url: url.to_string(),
        content_type: "text/html; charset=utf-8".to_string(),
        body: html.as_bytes().to_vec(),
    }
}

/// A one-page PDF showing `text` in Helvetica
///
/// `text` must not contain parentheses or backslashes.
pub fn pdf_with_text(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 72 720 Td ({}) Tj ET", text);
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_string(),
        format!("<< /Length {} >>\nstream\n{}\nendstream", content.len(), content),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::new();
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, object));
    }

    // Cross-reference entries are exactly 20 bytes each
    let xref_at = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{:010} 00000 n \n", offset));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_at
    ));
    pdf.into_bytes()
}

/// One canned HTTP response
pub struct Canned {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl Canned {
    pub fn new(status: u16, content_type: &'static str, body: impl Into<String>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }
}

/// Serves `responses` on 127.0.0.1, one per connection, then stops listening
///
/// Returns the base URL and a counter of requests served.
pub async fn scripted_server(responses: Vec<Canned>) -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = hits.clone();
    tokio::spawn(async move {
        for canned in responses {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            read_request(&mut socket).await;
            counter.fetch_add(1, Ordering::SeqCst);

            let response = format!(
                "HTTP/1.1 {} Canned\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                canned.status,
                canned.content_type,
                canned.body.len(),
                canned.body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (base_url, hits)
}

// Reads headers plus a Content-Length body, so the client never sees a reset
async fn read_request(socket: &mut TcpStream) {
    let mut request = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        request.extend_from_slice(&chunk[..n]);

        let Some(head_end) = request.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&request[..head_end]).to_lowercase();
        let body_len = head
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);

        if request.len() >= head_end + 4 + body_len {
            return;
        }
    }
}
