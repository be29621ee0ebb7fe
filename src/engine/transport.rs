use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::Url;
use serde_json::Value;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

/// One outbound call, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub segments: Vec<String>,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(segments: &[&str]) -> Self {
        Self::new(Method::Get, segments)
    }

    pub fn post(segments: &[&str], body: Value) -> Self {
        Self::new(Method::Post, segments).with_body(body)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// `/api/story`-style path, unescaped. Used for logs and test matching.
    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

/// Sends a request and returns the decoded JSON body. Any non-2xx status
/// is an error. An empty body decodes to `Value::Null`.
pub trait Transport: Send {
    fn send(&self, request: &HttpRequest) -> Result<Value, ApiError>;
}

pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(90))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, request: &HttpRequest) -> Result<Url, ApiError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;

        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(&request.segments);

        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }

        Ok(url)
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &HttpRequest) -> Result<Value, ApiError> {
        let url = self.url(request)?;

        let builder = match request.method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Patch => self.client.patch(url),
            Method::Delete => self.client.delete(url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let resp = builder.send()?;
        let status = resp.status();
        let text = resp.text()?;

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_are_appended_to_base_path() {
        let transport = HttpTransport::new("http://localhost:3001/");
        let request = HttpRequest::get(&["api", "load", "by-name"]).with_query("name", "Dragon & me");
        let url = transport.url(&request).unwrap();
        assert_eq!(url.path(), "/api/load/by-name");
        assert_eq!(url.query(), Some("name=Dragon+%26+me"));
    }

    #[test]
    fn ids_are_escaped() {
        let transport = HttpTransport::new("http://localhost:3001");
        let url = transport.url(&HttpRequest::get(&["api", "load", "a/b"])).unwrap();
        assert_eq!(url.path(), "/api/load/a%2Fb");
    }

    #[test]
    fn bad_base_url_is_reported() {
        let transport = HttpTransport::new("not a url");
        let err = transport.url(&HttpRequest::get(&["api"])).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }
}
