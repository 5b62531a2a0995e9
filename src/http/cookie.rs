// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie value type with Netscape wire-format support
//!
//! The wire format is the classic cookie-jar line: seven tab-separated
//! fields `[host, subdomains, path, secure, expires, name, value]` with
//! literal `TRUE`/`FALSE` boolean tokens. It must stay byte-compatible
//! with existing jar files.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of tab-separated fields in a wire-format cookie line
const WIRE_FIELDS: usize = 7;

/// A single HTTP cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    /// Domain the cookie is scoped to; `None` means host-agnostic
    host: Option<String>,
    /// Whether subdomains of `host` also match
    pub include_subdomains: bool,
    /// Path the cookie is valid for
    pub path: String,
    /// Secure flag (HTTPS only)
    pub secure: bool,
    /// Expiration as a unix timestamp; `0` means session cookie
    pub expires_at: i64,
    /// Cookie name
    pub name: Option<String>,
    /// Cookie value
    pub value: Option<String>,
}

impl Default for Cookie {
    fn default() -> Self {
        Self {
            host: None,
            include_subdomains: false,
            path: "/".to_string(),
            secure: false,
            expires_at: 0,
            name: None,
            value: None,
        }
    }
}

impl Cookie {
    /// Create a new cookie with a name and value
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(value.into()),
            ..Self::default()
        }
    }

    /// Scope the cookie to a host
    pub fn for_host(mut self, host: impl Into<String>, include_subdomains: bool) -> Self {
        let host = host.into();
        self.set_host(Some(&host), include_subdomains);
        self
    }

    /// Set the path
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Set the secure flag
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set the expiration timestamp
    pub fn expires_at(mut self, expires_at: i64) -> Self {
        self.expires_at = expires_at;
        self
    }

    /// The host this cookie is scoped to
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Set the host the cookie is scoped to
    ///
    /// A leading `.` is stripped; if one was present, or `sub_hint` is
    /// true, the cookie also matches subdomains. An empty or absent host
    /// clears the scope entirely.
    pub fn set_host(&mut self, host: Option<&str>, sub_hint: bool) {
        match host {
            None | Some("") => {
                self.host = None;
                self.include_subdomains = false;
            }
            Some(host) => {
                let stripped = host.strip_prefix('.');
                self.host = Some(stripped.unwrap_or(host).to_string());
                self.include_subdomains = sub_hint || stripped.is_some();
            }
        }
    }

    /// Check whether the cookie applies to the given host
    ///
    /// Exact match always applies. With `include_subdomains`, any candidate
    /// ending in `".{host}"` matches too - a literal suffix test, not a
    /// DNS-aware one.
    pub fn matches_host(&self, candidate: &str) -> bool {
        let is_equal = self.host.as_deref() == Some(candidate);
        if !self.include_subdomains || is_equal {
            return is_equal;
        }
        match &self.host {
            Some(host) => candidate.ends_with(&format!(".{}", host)),
            None => false,
        }
    }

    /// Check if the cookie is expired
    ///
    /// Session cookies (`expires_at == 0`) never expire by time.
    pub fn is_expired(&self) -> bool {
        self.expires_at > 0 && self.expires_at < Utc::now().timestamp()
    }

    /// Parse one wire-format cookie-jar line
    ///
    /// Returns `None` for lines that do not carry exactly seven
    /// tab-separated fields. A `TRUE`/`FALSE` token in the host field
    /// marks a host-agnostic cookie.
    pub fn parse_wire_line(line: &str) -> Option<Cookie> {
        let fields: Vec<&str> = line.splitn(WIRE_FIELDS, '\t').collect();
        if fields.len() != WIRE_FIELDS {
            return None;
        }

        let mut cookie = Cookie::default();
        let host = match fields[0] {
            "" | "TRUE" | "FALSE" => None,
            host => Some(host),
        };
        cookie.set_host(host, fields[1] == "TRUE");
        cookie.path = fields[2].to_string();
        cookie.secure = fields[3] == "TRUE";
        cookie.expires_at = fields[4].parse().unwrap_or(0);
        cookie.name = Some(fields[5].to_string());
        cookie.value = Some(fields[6].to_string());

        Some(cookie)
    }

    /// Serialize to a wire-format cookie-jar line
    ///
    /// A cookie without a name has no wire representation.
    pub fn to_wire_line(&self) -> Option<String> {
        let name = self.name.as_deref().filter(|n| !n.is_empty())?;

        Some(
            [
                self.host.as_deref().unwrap_or("FALSE"),
                if self.include_subdomains { "TRUE" } else { "FALSE" },
                &self.path,
                if self.secure { "TRUE" } else { "FALSE" },
                &self.expires_at.to_string(),
                name,
                self.value.as_deref().unwrap_or(""),
            ]
            .join("\t"),
        )
    }

    /// Parse a `Set-Cookie` response header into the cookie model
    ///
    /// `default_host` scopes the cookie to the responding host when no
    /// `Domain` attribute is present. An explicit `Domain` attribute also
    /// covers subdomains.
    pub fn parse_set_cookie(header: &str, default_host: &str) -> Option<Cookie> {
        let mut parts = header.split(';');
        let first = parts.next()?.trim();

        let (name, value) = first.split_once('=')?;
        let mut cookie = Cookie::new(name.trim(), value.trim());
        cookie.set_host(Some(default_host).filter(|h| !h.is_empty()), false);

        for part in parts {
            let part = part.trim();
            if let Some((attr, val)) = part.split_once('=') {
                let val = val.trim();
                match attr.trim().to_lowercase().as_str() {
                    "domain" => cookie.set_host(Some(val), true),
                    "path" => cookie.path = val.to_string(),
                    "expires" => {
                        if let Ok(dt) = DateTime::parse_from_rfc2822(val) {
                            cookie.expires_at = dt.timestamp();
                        }
                    }
                    "max-age" => {
                        if let Ok(secs) = val.parse::<i64>() {
                            cookie.expires_at = Utc::now().timestamp() + secs;
                        }
                    }
                    _ => {}
                }
            } else if part.eq_ignore_ascii_case("secure") {
                cookie.secure = true;
            }
        }

        Some(cookie)
    }
}
