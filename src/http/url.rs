// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! URL splitting, relative-URL merging and path canonicalization
//!
//! The session layer needs its own resolver: relative URLs are merged
//! against the previous effective URL with directory-relative semantics,
//! and paths are canonicalized by fixpoint rewriting. Components absent
//! from the input stay absent - there is no defaulting to empty strings.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref MULTI_SLASH: Regex = Regex::new("/+").expect("static regex");
    static ref CURRENT_DIR: Regex = Regex::new(r"(^|/)\./").expect("static regex");
    static ref PARENT_DIR: Regex = Regex::new(r"[^/]+/\.\./").expect("static regex");
}

/// A URL split into its components
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub pass: Option<String>,
    pub path: Option<String>,
    pub query: Option<String>,
    pub fragment: Option<String>,
}

impl UrlParts {
    /// Split a URL string into components
    ///
    /// A bare word like `example.com` parses as a path, not a host: only
    /// a `scheme://` or `//` prefix introduces an authority component.
    pub fn parse(url: &str) -> UrlParts {
        let mut parts = UrlParts::default();

        let rest = match url.split_once('#') {
            Some((rest, fragment)) => {
                parts.fragment = non_empty(fragment);
                rest
            }
            None => url,
        };

        let rest = match rest.split_once('?') {
            Some((rest, query)) => {
                parts.query = non_empty(query);
                rest
            }
            None => rest,
        };

        let authority_rest = if let Some(idx) = rest.find("://") {
            parts.scheme = non_empty(&rest[..idx]);
            Some(&rest[idx + 3..])
        } else {
            rest.strip_prefix("//")
        };

        match authority_rest {
            Some(authority_rest) => {
                let (authority, path) = match authority_rest.find('/') {
                    Some(idx) => (&authority_rest[..idx], non_empty(&authority_rest[idx..])),
                    None => (authority_rest, None),
                };
                parts.path = path;

                let host_port = match authority.rsplit_once('@') {
                    Some((userinfo, host_port)) => {
                        match userinfo.split_once(':') {
                            Some((user, pass)) => {
                                parts.user = non_empty(user);
                                parts.pass = non_empty(pass);
                            }
                            None => parts.user = non_empty(userinfo),
                        }
                        host_port
                    }
                    None => authority,
                };

                // a bracketed IPv6 literal without a port ends in `]`;
                // its colons are not port separators
                if host_port.ends_with(']') {
                    parts.host = non_empty(host_port);
                } else {
                    match host_port.rsplit_once(':') {
                        Some((host, port)) if port.chars().all(|c| c.is_ascii_digit()) => {
                            parts.host = non_empty(host);
                            parts.port = port.parse().ok();
                        }
                        _ => parts.host = non_empty(host_port),
                    }
                }
            }
            None => parts.path = non_empty(rest),
        }

        parts
    }

    /// Merge a relative URL against a base URL
    ///
    /// An absolute "relative" (own host or scheme) is returned as-is. A
    /// rooted relative path replaces the base path; an unrooted one is
    /// appended to the base path's directory. Scheme, host and port are
    /// inherited from the base only; query and fragment come from the
    /// relative only; user and pass are dropped from the result.
    pub fn merge(base: &UrlParts, relative: &UrlParts) -> UrlParts {
        if relative.host.is_some() || relative.scheme.is_some() {
            return relative.clone();
        }

        let path = match &relative.path {
            Some(rel_path) => {
                let mut path = if !rel_path.starts_with('/') {
                    base.path.as_deref().map(directory_of).unwrap_or_default()
                } else {
                    String::new()
                };
                path.push_str(rel_path);
                Some(canonicalize_path(&path))
            }
            None => base.path.as_ref().map(|p| canonicalize_path(p)),
        };

        UrlParts {
            scheme: base.scheme.clone(),
            host: base.host.clone(),
            port: base.port,
            user: None,
            pass: None,
            path,
            query: relative.query.clone(),
            fragment: relative.fragment.clone(),
        }
    }

    /// Reassemble the components into a URL string
    pub fn build(&self) -> String {
        let scheme = match &self.scheme {
            Some(scheme) => format!("{}://", scheme),
            None => String::new(),
        };
        let user = self.user.as_deref().unwrap_or("");
        let pass = match &self.pass {
            Some(pass) => format!(":{}", pass),
            None => String::new(),
        };
        let userinfo = if !user.is_empty() || !pass.is_empty() {
            format!("{}{}@", user, pass)
        } else {
            String::new()
        };
        let host = self.host.as_deref().unwrap_or("");
        let port = match self.port {
            Some(port) => format!(":{}", port),
            None => String::new(),
        };
        let path = self.path.as_deref().unwrap_or("");
        let query = match &self.query {
            Some(query) => format!("?{}", query),
            None => String::new(),
        };
        let fragment = match &self.fragment {
            Some(fragment) => format!("#{}", fragment),
            None => String::new(),
        };

        format!("{}{}{}{}{}{}{}", scheme, userinfo, host, port, path, query, fragment)
    }

    /// Append a query string to a URL, keeping any fragment in place
    ///
    /// An empty query string leaves the URL untouched. The query is
    /// spliced into the existing query component (`&`-joined if one
    /// exists, introduced with `?` otherwise), ahead of any fragment.
    pub fn append_query(url: &str, query: &str) -> String {
        if query.is_empty() {
            return url.to_string();
        }

        let (head, fragment) = match url.split_once('#') {
            Some((head, fragment)) => (head, Some(fragment)),
            None => (url, None),
        };

        let separator = if head.contains('?') { '&' } else { '?' };
        match fragment {
            Some(fragment) => format!("{}{}{}#{}", head, separator, query, fragment),
            None => format!("{}{}{}", head, separator, query),
        }
    }
}

/// The directory portion of a path: everything up to the final `/`
fn directory_of(path: &str) -> String {
    match path.rfind('/') {
        Some(idx) => path[..=idx].to_string(),
        None => String::new(),
    }
}

/// Canonicalize a path by fixpoint rewriting
///
/// Collapses repeated slashes, drops `./` segments, then repeatedly drops
/// `segment/../` pairs until none remain. This is deliberately the flat
/// textual normalization of the original layer, not a stack traversal:
/// leading `../` segments that cannot be resolved are kept.
fn canonicalize_path(path: &str) -> String {
    let path = MULTI_SLASH.replace_all(path, "/").into_owned();
    let path = replace_until_stable(&CURRENT_DIR, path, "$1");
    replace_until_stable(&PARENT_DIR, path, "")
}

fn replace_until_stable(re: &Regex, mut value: String, replacement: &str) -> String {
    loop {
        let next = re.replace_all(&value, replacement).into_owned();
        if next == value {
            return next;
        }
        value = next;
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
