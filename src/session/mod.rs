// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Stateful HTTP session orchestration
//!
//! [`Session`] carries state between calls: the previous effective URL
//! feeds relative-URL resolution and referrer auto-detection, and the
//! transport's cookie jar persists across requests. Option resolution is
//! a pure function of the session state, so it can be inspected without
//! executing anything.

mod options;

pub use options::{AutoReferer, Body, MultipartValue, RequestOptions, ResolvedOptions};

use serde::Serialize;

use crate::error::Result;
use crate::http::{header_names, Cookie, Response, UrlParts};
use crate::transport::{Transport, TransportOutcome};

/// A cookie-aware HTTP session over a pluggable transport
pub struct Session<T: Transport> {
    transport: T,
    common: RequestOptions,
    /// Effective URL of the request before last, once a new call starts
    last_url: Option<String>,
    started: bool,
}

impl<T: Transport> Session<T> {
    /// Create a session with session-wide common options
    ///
    /// Common options sit below per-request options in the overlay; any
    /// field a request leaves unset falls through to them.
    pub fn new(transport: T, common: RequestOptions) -> Result<Self> {
        Ok(Self {
            transport,
            common: common.transpile()?,
            last_url: None,
            started: false,
        })
    }

    /// Create a session with no common options
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            common: RequestOptions::default(),
            last_url: None,
            started: false,
        }
    }

    /// The underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access to the underlying transport
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Execute one request
    ///
    /// The URL argument overrides any URL in the options. Relative URLs
    /// resolve against the previous effective URL unless resolution is
    /// switched off.
    pub fn request(&mut self, url: &str, opts: RequestOptions) -> Result<Response> {
        if self.started {
            // bank the previous call's landing URL before the transport
            // forgets it
            self.last_url = self.transport.effective_url().or_else(|| self.last_url.take());
            self.transport.reset();
        } else {
            self.started = true;
        }

        let resolved = self.resolve_options(Some(url), opts)?;
        let request_url = resolved.url.clone().unwrap_or_else(|| url.to_string());

        if resolved.verbose {
            tracing::debug!(url = %request_url, post = resolved.post, "executing request");
        }

        let response = match self.transport.execute(&resolved) {
            TransportOutcome::Failed(message) => Response::from_error(request_url, message),
            TransportOutcome::NotCaptured => Response::from_url(request_url),
            TransportOutcome::Raw(raw) => {
                if resolved.echo_raw {
                    tracing::debug!(raw = %String::from_utf8_lossy(&raw), "raw transport response");
                }
                if resolved.include_headers {
                    Response::from_raw(request_url, &raw)
                } else {
                    Response::from_body(request_url, raw)
                }
            }
        };

        Ok(response)
    }

    /// GET a URL
    pub fn get(&mut self, url: &str) -> Result<Response> {
        self.request(url, RequestOptions::new())
    }

    /// GET a URL with query parameters appended
    pub fn get_with_query(&mut self, url: &str, params: &[(&str, &str)]) -> Result<Response> {
        let url = UrlParts::append_query(url, &form_urlencode(params.iter().copied()));
        self.request(&url, RequestOptions::new())
    }

    /// POST form-urlencoded parameters to a URL
    pub fn post(&mut self, url: &str, params: &[(&str, &str)]) -> Result<Response> {
        let mut opts = RequestOptions::new().post(true);
        if !params.is_empty() {
            opts = opts.body(Body::Form(form_urlencode(params.iter().copied())));
        }
        self.request(url, opts)
    }

    /// POST a multipart form to a URL
    pub fn post_multipart(
        &mut self,
        url: &str,
        parts: Vec<(String, MultipartValue)>,
    ) -> Result<Response> {
        self.request(
            url,
            RequestOptions::new().post(true).body(Body::Multipart(parts)),
        )
    }

    /// POST a JSON-encoded value to a URL
    pub fn post_json<V: Serialize>(&mut self, url: &str, data: &V) -> Result<Response> {
        let opts = RequestOptions::new()
            .post(true)
            .header(header_names::CONTENT_TYPE, "application/json")
            .json(data)?;
        self.request(url, opts)
    }

    /// Resolve per-request options against the session state
    ///
    /// Pure with respect to the session: calling it twice with the same
    /// inputs yields the same result, and nothing is executed. Overlay
    /// order is explicit URL, then per-request options, then common
    /// options, then built-in defaults. Referrer detection runs before
    /// relative-URL resolution, so a relative request URL never produces
    /// a same-host referrer by accident.
    pub fn resolve_options(
        &self,
        url: Option<&str>,
        opts: RequestOptions,
    ) -> Result<ResolvedOptions> {
        let opts = opts.transpile()?;
        let mut merged = opts.overlay(&self.common);
        if let Some(url) = url {
            merged.url = Some(url.to_string());
        }

        let verbose_level = merged.verbose.unwrap_or(0);
        let (referer, auto_referer) = self.detect_referrer(&merged);
        let url = self.resolve_relative_url(
            merged.url.as_deref(),
            merged.resolve_relative.unwrap_or(true),
        );

        Ok(ResolvedOptions {
            url,
            post: merged.post.unwrap_or(false),
            body: merged.body,
            header_lines: merged.headers.to_lines(),
            follow_redirects: merged.follow_redirects.unwrap_or(false),
            verbose: verbose_level > 0,
            echo_raw: verbose_level > 1,
            referer,
            auto_referer,
            cookie_list: merged.cookie_list,
            return_body: merged.return_body.unwrap_or(true),
            include_headers: merged.include_headers.unwrap_or(true),
            safe_upload: merged.safe_upload.unwrap_or(true),
            timeout: merged.timeout,
        })
    }

    /// Compute the referrer for a request
    ///
    /// Detection is armed by the presence of the auto-referer option; an
    /// explicit non-empty referrer always wins over detection.
    fn detect_referrer(&self, merged: &RequestOptions) -> (Option<String>, bool) {
        let Some(mode) = merged.auto_referer else {
            return (merged.referer.clone(), false);
        };
        let armed = mode != AutoReferer::Off;

        if merged.referer.as_deref().map_or(false, |r| !r.is_empty()) {
            return (merged.referer.clone(), armed);
        }

        let referer = match mode {
            AutoReferer::Off => None,
            AutoReferer::All => self.last_effective_url(),
            AutoReferer::Host => {
                let request_host = merged
                    .url
                    .as_deref()
                    .map(UrlParts::parse)
                    .and_then(|p| p.host)
                    .map(|h| h.to_lowercase());
                let last = self.last_effective_url();
                let last_host = last
                    .as_deref()
                    .map(UrlParts::parse)
                    .and_then(|p| p.host)
                    .map(|h| h.to_lowercase());
                match (request_host, last_host) {
                    (Some(a), Some(b)) if a == b => last,
                    _ => None,
                }
            }
        };

        (referer, armed)
    }

    /// Resolve a relative request URL against the previous effective URL
    ///
    /// A URL carrying its own host or scheme is already absolute and
    /// passes through untouched, as does any URL when resolution is off
    /// or no previous URL exists yet.
    fn resolve_relative_url(&self, url: Option<&str>, resolve: bool) -> Option<String> {
        let url = url?;
        if !resolve {
            return Some(url.to_string());
        }

        let parts = UrlParts::parse(url);
        if parts.host.is_some() || parts.scheme.is_some() {
            return Some(url.to_string());
        }

        match self.last_effective_url() {
            Some(base) => Some(UrlParts::merge(&UrlParts::parse(&base), &parts).build()),
            None => Some(url.to_string()),
        }
    }

    /// The URL the most recent request actually landed on
    pub fn last_effective_url(&self) -> Option<String> {
        self.transport.effective_url().or_else(|| self.last_url.clone())
    }

    /// Cookies currently in the jar, optionally filtered to one host
    ///
    /// Expired cookies are dropped unless `with_expired` is set. Jar
    /// lines the wire parser rejects are logged and skipped.
    pub fn get_cookies(&self, host: Option<&str>, with_expired: bool) -> Vec<Cookie> {
        self.transport
            .cookie_lines()
            .iter()
            .filter_map(|line| match Cookie::parse_wire_line(line) {
                Some(cookie) => Some(cookie),
                None => {
                    tracing::warn!(line = %line, "skipping unparseable cookie-jar line");
                    None
                }
            })
            .filter(|cookie| host.map_or(true, |host| cookie.matches_host(host)))
            .filter(|cookie| with_expired || !cookie.is_expired())
            .collect()
    }

    /// Insert cookies into the jar
    ///
    /// Nameless cookies have no wire form and are skipped with a warning;
    /// a line the transport rejects is a fatal error.
    pub fn add_cookies(&mut self, cookies: impl IntoIterator<Item = Cookie>) -> Result<()> {
        for cookie in cookies {
            match cookie.to_wire_line() {
                Some(line) => self.transport.add_cookie_line(&line)?,
                None => tracing::warn!("skipping nameless cookie"),
            }
        }
        Ok(())
    }

    /// Expire cookies in the jar
    ///
    /// Re-inserts each cookie with an expiration in the past, which
    /// replaces the live copy under the same identity.
    pub fn expire_cookies(&mut self, cookies: impl IntoIterator<Item = Cookie>) -> Result<()> {
        self.add_cookies(cookies.into_iter().map(|c| c.expires_at(1)))
    }

    /// Remove all cookies from the jar
    pub fn clear_cookies(&mut self) -> Result<()> {
        self.transport.clear_cookies()
    }

    /// Close the session, persisting transport state
    pub fn close(&mut self) {
        self.transport.close();
        self.last_url = None;
        self.started = false;
    }
}

/// Encode key/value pairs as `application/x-www-form-urlencoded`
pub fn form_urlencode<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    params
        .into_iter()
        .map(|(key, value)| format!("{}={}", percent_encode(key), percent_encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
