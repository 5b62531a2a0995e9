// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request configuration types
//!
//! [`RequestOptions`] is the open, per-request configuration callers fill
//! in; every field is optional so that session-wide defaults can shine
//! through. [`ResolvedOptions`] is the fully-merged, defaulted form the
//! transport consumes.

use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::http::HeaderSet;

/// Referrer auto-detection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoReferer {
    /// Detection armed but disabled
    Off,
    /// Use the previous effective URL unconditionally
    All,
    /// Use the previous effective URL only for same-host requests
    Host,
}

/// A multipart form field value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MultipartValue {
    /// Plain text field
    Text(String),
    /// File upload from a path
    File(PathBuf),
}

/// Request body payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Raw bytes, sent as-is
    Raw(Vec<u8>),
    /// `application/x-www-form-urlencoded` payload
    Form(String),
    /// `multipart/form-data` fields
    Multipart(Vec<(String, MultipartValue)>),
}

/// Per-request configuration
///
/// Unset fields fall through to the session-wide common options; the
/// session applies safe defaults for whatever remains unset. Two option
/// sets merge field-wise with the higher-priority side winning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    /// Request URL (normally passed as the `request` argument instead)
    pub url: Option<String>,
    /// Use the POST method
    pub post: Option<bool>,
    /// Request body
    pub body: Option<Body>,
    /// Request headers; merged name-wise, caller wins
    pub headers: HeaderSet,
    /// Let the transport follow redirects itself
    pub follow_redirects: Option<bool>,
    /// Verbosity level; above 1 the raw response buffer is echoed to the log
    pub verbose: Option<u32>,
    /// Explicit referrer value
    pub referer: Option<String>,
    /// Referrer auto-detection; the presence of this field arms detection
    pub auto_referer: Option<AutoReferer>,
    /// Raw cookie-jar directive handed to the transport (`"ALL"` clears)
    pub cookie_list: Option<String>,
    /// Resolve relative URLs against the previous effective URL (default on)
    pub resolve_relative: Option<bool>,
    /// Capture the response body (default on)
    pub return_body: Option<bool>,
    /// Include the status line and headers in the captured buffer (default on)
    pub include_headers: Option<bool>,
    /// Only typed file parts may upload files (default on)
    pub safe_upload: Option<bool>,
    /// Convenience: JSON-encode this value into the request body
    pub json_body: Option<Value>,
    /// Per-request transport timeout
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Create an empty option set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Use the POST method
    pub fn post(mut self, post: bool) -> Self {
        self.post = Some(post);
        self
    }

    /// Set the request body
    pub fn body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Set a single header
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Set headers from raw `"Name: value"` lines
    ///
    /// Fails on a line without a `:` separator.
    pub fn header_lines<I, S>(mut self, lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.headers = HeaderSet::parse_lines(lines)?.merged_over(&self.headers);
        Ok(self)
    }

    /// Let the transport follow redirects
    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = Some(follow);
        self
    }

    /// Set the verbosity level
    pub fn verbose(mut self, level: u32) -> Self {
        self.verbose = Some(level);
        self
    }

    /// Set an explicit referrer
    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }

    /// Arm referrer auto-detection
    pub fn auto_referer(mut self, mode: AutoReferer) -> Self {
        self.auto_referer = Some(mode);
        self
    }

    /// Hand a raw cookie-jar directive to the transport
    pub fn cookie_list(mut self, directive: impl Into<String>) -> Self {
        self.cookie_list = Some(directive.into());
        self
    }

    /// Toggle relative-URL resolution
    pub fn resolve_relative(mut self, resolve: bool) -> Self {
        self.resolve_relative = Some(resolve);
        self
    }

    /// Toggle response body capture
    pub fn return_body(mut self, capture: bool) -> Self {
        self.return_body = Some(capture);
        self
    }

    /// Toggle header capture in the response buffer
    pub fn include_headers(mut self, include: bool) -> Self {
        self.include_headers = Some(include);
        self
    }

    /// Toggle safe uploads
    pub fn safe_upload(mut self, safe: bool) -> Self {
        self.safe_upload = Some(safe);
        self
    }

    /// JSON-encode a value into the request body
    pub fn json<T: Serialize>(mut self, data: &T) -> Result<Self> {
        self.json_body = Some(serde_json::to_value(data)?);
        Ok(self)
    }

    /// Set the per-request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Expand convenience options into their native form
    ///
    /// JSON-encodes `json_body` into `body`; an unencodable value is a
    /// fatal error for the call.
    pub fn transpile(mut self) -> Result<Self> {
        if let Some(value) = self.json_body.take() {
            self.body = Some(Body::Raw(serde_json::to_vec(&value)?));
        }
        Ok(self)
    }

    /// Overlay this option set on a lower-priority one
    ///
    /// Set fields of `self` win; unset fields fall through to `lower`.
    /// Headers merge name-wise with `self` winning on collision.
    pub fn overlay(self, lower: &RequestOptions) -> RequestOptions {
        RequestOptions {
            url: self.url.or_else(|| lower.url.clone()),
            post: self.post.or(lower.post),
            body: self.body.or_else(|| lower.body.clone()),
            headers: self.headers.merged_over(&lower.headers),
            follow_redirects: self.follow_redirects.or(lower.follow_redirects),
            verbose: self.verbose.or(lower.verbose),
            referer: self.referer.or_else(|| lower.referer.clone()),
            auto_referer: self.auto_referer.or(lower.auto_referer),
            cookie_list: self.cookie_list.or_else(|| lower.cookie_list.clone()),
            resolve_relative: self.resolve_relative.or(lower.resolve_relative),
            return_body: self.return_body.or(lower.return_body),
            include_headers: self.include_headers.or(lower.include_headers),
            safe_upload: self.safe_upload.or(lower.safe_upload),
            json_body: self.json_body.or_else(|| lower.json_body.clone()),
            timeout: self.timeout.or(lower.timeout),
        }
    }
}

/// Fully-resolved per-call configuration consumed by the transport
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub url: Option<String>,
    pub post: bool,
    pub body: Option<Body>,
    pub header_lines: Vec<String>,
    pub follow_redirects: bool,
    pub verbose: bool,
    /// Raw verbosity level was above 1: echo the raw buffer to the log
    pub echo_raw: bool,
    pub referer: Option<String>,
    pub auto_referer: bool,
    pub cookie_list: Option<String>,
    pub return_body: bool,
    pub include_headers: bool,
    pub safe_upload: bool,
    pub timeout: Option<Duration>,
}
