use anyhow::{anyhow, Context, Error};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declarative description of one call. `url` is relative to the configured
/// base path and already carries the query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// A response as received, before any status handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Performs a single HTTP exchange. Any status counts as a response; only
/// failures to talk to the server at all are errors.
pub trait Transport: Send + Sync {
    fn send(&self, base_path: &str, request: &HttpRequest) -> Result<RawResponse, Error>;
}

/// Blocking transport backed by `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn send(&self, base_path: &str, request: &HttpRequest) -> Result<RawResponse, Error> {
        let url = format!("{}{}", base_path, request.url);
        let mut http_request = ureq::request(request.method.as_str(), &url);
        for (name, value) in &request.headers {
            http_request.set(name, value);
        }
        let http_response = match &request.body {
            Some(body) => http_request.send_string(body),
            None => http_request.call(),
        };
        if http_response.synthetic() {
            let reason = http_response.status_text().to_owned();
            let detail = http_response.into_string().unwrap_or_default();
            return Err(anyhow!("{} {}: {} {}", request.method, url, reason, detail));
        }

        let status = http_response.status();
        let status_text = http_response.status_text().to_owned();
        let headers = http_response
            .headers_names()
            .into_iter()
            .filter_map(|name| {
                let value = http_response.header(&name)?.to_owned();
                Some((name, value))
            })
            .collect();
        let body = http_response
            .into_string()
            .context("failed to turn response into string")?;
        Ok(RawResponse {
            status,
            status_text,
            headers,
            body,
        })
    }
}
