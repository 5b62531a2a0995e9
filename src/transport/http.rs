// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP engine backed by reqwest
//!
//! Redirects are followed manually so that, with header capture on, every
//! hop contributes its status line and headers to the raw buffer ahead of
//! the terminal block - the shape the response parser unwraps. The engine
//! owns the cookie jar and optionally persists it as a Netscape-format
//! jar file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use bytes::Bytes;
use reqwest::blocking::multipart::Form;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use reqwest::Method;
use url::Url;

use super::{Transport, TransportOutcome};
use crate::error::{Error, Result};
use crate::http::{Cookie, DEFAULT_USER_AGENT};
use crate::session::{Body, MultipartValue, ResolvedOptions};

/// HTTP engine configuration
#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    /// User agent string
    pub user_agent: String,
    /// Default timeout (overridable per call)
    pub timeout: Duration,
    /// Accept invalid certificates (dangerous!)
    pub accept_invalid_certs: bool,
    /// Proxy URL
    pub proxy: Option<String>,
    /// Cookie-jar file, loaded at construction and written on close
    pub cookie_file: Option<PathBuf>,
    /// Maximum redirects to follow when redirect-following is on
    pub max_redirects: usize,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
            proxy: None,
            cookie_file: None,
            max_redirects: 10,
        }
    }
}

impl HttpTransportConfig {
    /// Create a new config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the default timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Accept invalid certificates
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Set a proxy URL
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set the cookie-jar file path
    pub fn cookie_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_file = Some(path.into());
        self
    }

    /// Set the redirect cap
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }
}

/// reqwest-backed [`Transport`] implementation
pub struct HttpTransport {
    client: Client,
    config: HttpTransportConfig,
    jar: Vec<Cookie>,
    effective_url: Option<String>,
}

impl HttpTransport {
    /// Create an engine with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpTransportConfig::default())
    }

    /// Create an engine with custom configuration
    pub fn with_config(config: HttpTransportConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(config.accept_invalid_certs);

        if let Some(proxy_url) = &config.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::config(format!("invalid proxy URL: {}", e)))?,
            );
        }

        let client = builder.build()?;

        let jar = match &config.cookie_file {
            Some(path) if path.exists() => load_jar(path)?,
            _ => Vec::new(),
        };

        Ok(Self {
            client,
            config,
            jar,
            effective_url: None,
        })
    }

    /// Engine configuration
    pub fn config(&self) -> &HttpTransportConfig {
        &self.config
    }

    /// Insert a cookie, replacing any existing one with the same identity
    fn insert(&mut self, cookie: Cookie) {
        self.jar.retain(|c| {
            !(c.name == cookie.name && c.host() == cookie.host() && c.path == cookie.path)
        });
        self.jar.push(cookie);
    }

    /// Build the `Cookie` header value for a request URL
    fn cookie_header_for(&self, url: &Url) -> Option<String> {
        let host = url.host_str()?;
        let https = url.scheme() == "https";
        let path = url.path();

        let pairs: Vec<String> = self
            .jar
            .iter()
            .filter(|c| !c.is_expired())
            .filter(|c| c.matches_host(host))
            .filter(|c| path.starts_with(c.path.as_str()))
            .filter(|c| !c.secure || https)
            .filter_map(|c| {
                let name = c.name.as_deref().filter(|n| !n.is_empty())?;
                Some(format!("{}={}", name, c.value.as_deref().unwrap_or("")))
            })
            .collect();

        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }

    fn capture_set_cookies(&mut self, response: &reqwest::blocking::Response) {
        let host = response.url().host_str().unwrap_or("").to_string();
        let cookies: Vec<Cookie> = response
            .headers()
            .get_all(reqwest::header::SET_COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .filter_map(|header| Cookie::parse_set_cookie(header, &host))
            .collect();
        for cookie in cookies {
            self.insert(cookie);
        }
    }

    fn apply_cookie_directive(&mut self, directive: &str) {
        if directive == "ALL" {
            self.jar.clear();
        } else if let Some(cookie) = Cookie::parse_wire_line(directive) {
            self.insert(cookie);
        } else {
            tracing::warn!(directive, "ignoring unrecognized cookie-jar directive");
        }
    }

    fn save_jar(&self) -> Result<()> {
        let Some(path) = &self.config.cookie_file else {
            return Ok(());
        };

        let mut out = String::from("# Netscape HTTP Cookie File\n");
        for cookie in &self.jar {
            if let Some(line) = cookie.to_wire_line() {
                out.push_str(&line);
                out.push('\n');
            }
        }
        std::fs::write(path, out)?;
        Ok(())
    }
}

impl Transport for HttpTransport {
    fn execute(&mut self, options: &ResolvedOptions) -> TransportOutcome {
        if let Some(directive) = &options.cookie_list {
            self.apply_cookie_directive(directive);
        }

        let Some(url) = options.url.as_deref() else {
            return TransportOutcome::Failed("no URL configured".to_string());
        };

        // curl-compatible leniency: a scheme-less URL defaults to http
        let mut current = match Url::parse(url)
            .or_else(|_| Url::parse(&format!("http://{}", url)))
        {
            Ok(parsed) => parsed,
            Err(e) => return TransportOutcome::Failed(format!("invalid URL '{}': {}", url, e)),
        };

        if options.verbose {
            tracing::debug!(url = %current, post = options.post, "executing transport call");
        }

        let mut method = if options.post { Method::POST } else { Method::GET };
        let mut send_body = true;
        let mut referer = options.referer.clone();
        let mut blocks: Vec<u8> = Vec::new();
        let mut hops = 0;

        loop {
            let mut request = self.client.request(method.clone(), current.clone());

            for line in &options.header_lines {
                if let Some((name, value)) = line.split_once(':') {
                    request = request.header(name.trim(), value.trim());
                }
            }
            if let Some(referer) = &referer {
                request = request.header(reqwest::header::REFERER, referer);
            }
            if let Some(cookie_header) = self.cookie_header_for(&current) {
                request = request.header(reqwest::header::COOKIE, cookie_header);
            }
            if let Some(timeout) = options.timeout {
                request = request.timeout(timeout);
            }

            if send_body {
                match &options.body {
                    Some(Body::Raw(bytes)) => request = request.body(bytes.clone()),
                    Some(Body::Form(encoded)) => {
                        request = request
                            .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                            .body(encoded.clone());
                    }
                    Some(Body::Multipart(parts)) => {
                        let mut form = Form::new();
                        for (name, value) in parts {
                            form = match value {
                                MultipartValue::Text(text) => {
                                    form.text(name.clone(), text.clone())
                                }
                                MultipartValue::File(path) => match form.file(name.clone(), path) {
                                    Ok(form) => form,
                                    Err(e) => {
                                        return TransportOutcome::Failed(format!(
                                            "multipart file '{}': {}",
                                            path.display(),
                                            e
                                        ))
                                    }
                                },
                            };
                        }
                        request = request.multipart(form);
                    }
                    None => {}
                }
            }

            let response = match request.send() {
                Ok(response) => response,
                Err(e) => return TransportOutcome::Failed(e.to_string()),
            };

            self.effective_url = Some(response.url().to_string());
            self.capture_set_cookies(&response);

            let status = response.status();
            if options.include_headers {
                let reason = status.canonical_reason().unwrap_or("");
                blocks.extend_from_slice(
                    format!("{:?} {} {}\r\n", response.version(), status.as_u16(), reason)
                        .as_bytes(),
                );
                for (name, value) in response.headers() {
                    blocks.extend_from_slice(name.as_str().as_bytes());
                    blocks.extend_from_slice(b": ");
                    blocks.extend_from_slice(value.as_bytes());
                    blocks.extend_from_slice(b"\r\n");
                }
                blocks.extend_from_slice(b"\r\n");
            }

            let location = response
                .headers()
                .get(reqwest::header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            if options.follow_redirects && status.is_redirection() {
                if let Some(location) = location {
                    if hops >= self.config.max_redirects {
                        return TransportOutcome::Failed(format!(
                            "redirect cap of {} reached at {}",
                            self.config.max_redirects, current
                        ));
                    }
                    let next = match current.join(&location) {
                        Ok(next) => next,
                        Err(e) => {
                            return TransportOutcome::Failed(format!(
                                "bad Location '{}': {}",
                                location, e
                            ))
                        }
                    };
                    tracing::debug!(from = %current, to = %next, status = status.as_u16(), "following redirect");

                    if options.auto_referer {
                        referer = Some(current.to_string());
                    }
                    if matches!(status.as_u16(), 301 | 302 | 303) {
                        method = Method::GET;
                        send_body = false;
                    }
                    current = next;
                    hops += 1;
                    continue;
                }
            }

            let body = match response.bytes() {
                Ok(body) => body,
                Err(e) => return TransportOutcome::Failed(e.to_string()),
            };

            if !options.return_body {
                return TransportOutcome::NotCaptured;
            }

            return if options.include_headers {
                blocks.extend_from_slice(&body);
                TransportOutcome::Raw(Bytes::from(blocks))
            } else {
                TransportOutcome::Raw(body)
            };
        }
    }

    fn effective_url(&self) -> Option<String> {
        self.effective_url.clone()
    }

    fn cookie_lines(&self) -> Vec<String> {
        self.jar.iter().filter_map(Cookie::to_wire_line).collect()
    }

    fn add_cookie_line(&mut self, line: &str) -> Result<()> {
        match Cookie::parse_wire_line(line) {
            Some(cookie) => {
                self.insert(cookie);
                Ok(())
            }
            None => Err(Error::cookie(format!("rejected cookie line '{}'", line))),
        }
    }

    fn clear_cookies(&mut self) -> Result<()> {
        self.jar.clear();
        Ok(())
    }

    fn reset(&mut self) {
        self.effective_url = None;
    }

    fn close(&mut self) {
        if let Err(e) = self.save_jar() {
            tracing::warn!(error = %e, "failed to persist cookie jar");
        }
        self.effective_url = None;
    }
}

impl Drop for HttpTransport {
    fn drop(&mut self) {
        if let Err(e) = self.save_jar() {
            tracing::warn!(error = %e, "failed to persist cookie jar on drop");
        }
    }
}

/// Load a Netscape-format jar file
///
/// `#HttpOnly_` prefixes are tolerated; other comment lines and
/// unparseable lines are skipped.
fn load_jar(path: &Path) -> Result<Vec<Cookie>> {
    let content = std::fs::read_to_string(path)?;
    let mut jar = Vec::new();

    for line in content.lines() {
        let line = line.strip_prefix("#HttpOnly_").unwrap_or(line);
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match Cookie::parse_wire_line(line) {
            Some(cookie) => jar.push(cookie),
            None => tracing::warn!(line, "skipping unparseable jar line"),
        }
    }

    Ok(jar)
}
