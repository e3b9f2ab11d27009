use anyhow::{anyhow, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::debug;
use url::form_urlencoded;

/// Largest request body accepted.
pub const MAX_BODY_SIZE: usize = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    OPTIONS,
    HEAD,
}

impl HttpMethod {
    pub fn as_str(&self) -> &str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::OPTIONS => "OPTIONS",
            HttpMethod::HEAD => "HEAD",
        }
    }
}

impl FromStr for HttpMethod {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::GET),
            "POST" => Ok(HttpMethod::POST),
            "PUT" => Ok(HttpMethod::PUT),
            "DELETE" => Ok(HttpMethod::DELETE),
            "PATCH" => Ok(HttpMethod::PATCH),
            "OPTIONS" => Ok(HttpMethod::OPTIONS),
            "HEAD" => Ok(HttpMethod::HEAD),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query_params: HashMap<String, String>,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Reads one HTTP/1.1 request: request line, headers and a
    /// `Content-Length` delimited body.
    pub async fn parse<S: AsyncRead + Unpin>(stream: &mut S) -> Result<Self> {
        let mut reader = BufReader::new(stream);

        let mut request_line = String::new();
        reader.read_line(&mut request_line).await?;

        // METHOD PATH HTTP/VERSION
        let parts: Vec<&str> = request_line.split_whitespace().collect();
        if parts.len() < 3 {
            return Err(anyhow!("Invalid HTTP request line"));
        }

        let method = parts[0]
            .parse::<HttpMethod>()
            .map_err(|_| anyhow!("Invalid HTTP method: {}", parts[0]))?;

        let (path, query_params) = split_target(parts[1]);

        let mut headers = HashMap::new();
        let mut content_length = 0usize;

        loop {
            let mut header_line = String::new();
            let read = reader.read_line(&mut header_line).await?;

            if read == 0 || header_line == "\r\n" || header_line == "\n" {
                break;
            }

            if let Some((key, value)) = header_line.split_once(':') {
                let key = key.trim().to_lowercase();
                let value = value.trim().to_string();

                if key == "content-length" {
                    content_length = value.parse().map_err(|_| anyhow!("Invalid Content-Length: {}", value))?;
                }

                headers.insert(key, value);
            }
        }

        if content_length > MAX_BODY_SIZE {
            return Err(anyhow!("Request body too large: {} bytes", content_length));
        }

        debug!(method = method.as_str(), path = %path, content_length, "request received");

        let mut body = vec![0u8; content_length];
        if content_length > 0 {
            reader.read_exact(&mut body).await?;
        }

        Ok(HttpRequest {
            method,
            path,
            query_params,
            headers,
            body,
        })
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query_params.get(key).map(String::as_str)
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Token from an `Authorization: Bearer <token>` header.
    pub fn bearer_token(&self) -> Option<&str> {
        self.header("authorization")
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
    }
}

/// Splits `/path?a=1&b=2` into a normalized path and its decoded query
/// parameters. The path itself stays encoded; route captures are decoded one
/// segment at a time.
fn split_target(target: &str) -> (String, HashMap<String, String>) {
    let (path, query_string) = match target.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (target, None),
    };

    let query_params = query_string
        .map(|qs| {
            form_urlencoded::parse(qs.as_bytes())
                .map(|(key, value)| (key.into_owned(), value.into_owned()))
                .collect()
        })
        .unwrap_or_default();

    let path = match path.trim_end_matches('/') {
        "" => "/".to_string(),
        trimmed => trimmed.to_string(),
    };
    (path, query_params)
}

#[derive(Debug)]
pub struct HttpResponse {
    status_code: u16,
    status_text: String,
    headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status_code: u16) -> Self {
        let status_text = match status_code {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            400 => "Bad Request",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            500 => "Internal Server Error",
            _ => "Unknown",
        }
        .to_string();

        HttpResponse {
            status_code,
            status_text,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    pub fn created() -> Self {
        Self::new(201)
    }

    pub fn no_content() -> Self {
        Self::new(204)
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn json(mut self, value: &Value) -> Self {
        self.body = value.to_string().into_bytes();
        self.headers.insert("Content-Type".to_string(), "application/json".to_string());
        self
    }

    pub async fn send<S: AsyncWrite + Unpin>(mut self, stream: &mut S) -> Result<()> {
        self.headers
            .entry("Access-Control-Allow-Origin".to_string())
            .or_insert_with(|| "*".to_string());
        self.headers
            .entry("Access-Control-Allow-Methods".to_string())
            .or_insert_with(|| "GET, POST, PUT, DELETE, PATCH, OPTIONS".to_string());
        self.headers
            .entry("Access-Control-Allow-Headers".to_string())
            .or_insert_with(|| "Content-Type, Authorization".to_string());
        self.headers.insert("Content-Length".to_string(), self.body.len().to_string());
        self.headers.insert("Connection".to_string(), "close".to_string());

        let mut response = format!("HTTP/1.1 {} {}\r\n", self.status_code, self.status_text);
        for (key, value) in &self.headers {
            response.push_str(&format!("{}: {}\r\n", key, value));
        }
        response.push_str("\r\n");

        stream.write_all(response.as_bytes()).await?;
        if !self.body.is_empty() {
            stream.write_all(&self.body).await?;
        }

        stream.flush().await?;
        Ok(())
    }
}
