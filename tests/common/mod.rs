// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Shared test helpers
//!
//! A tracing subscriber hook plus a scripted transport with a real
//! in-memory cookie jar, so session-level behaviour can be exercised
//! without network I/O.

#![allow(dead_code)]

use std::collections::VecDeque;

use bytes::Bytes;
use mustekala::{Cookie, Error, ResolvedOptions, Result, Transport, TransportOutcome};

/// Install the test subscriber once; `RUST_LOG` controls the filter
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct MockTransport {
    responses: VecDeque<TransportOutcome>,
    pub calls: Vec<ResolvedOptions>,
    jar: Vec<Cookie>,
    effective: Option<String>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            responses: VecDeque::new(),
            calls: Vec::new(),
            jar: Vec::new(),
            effective: None,
        }
    }

    pub fn respond_with(mut self, outcome: TransportOutcome) -> Self {
        self.responses.push_back(outcome);
        self
    }

    pub fn respond_raw(self, buffer: &[u8]) -> Self {
        self.respond_with(TransportOutcome::Raw(Bytes::copy_from_slice(buffer)))
    }

    fn insert(&mut self, cookie: Cookie) {
        self.jar.retain(|c| {
            !(c.name == cookie.name && c.host() == cookie.host() && c.path == cookie.path)
        });
        self.jar.push(cookie);
    }
}

impl Transport for MockTransport {
    fn execute(&mut self, options: &ResolvedOptions) -> TransportOutcome {
        if let Some(directive) = &options.cookie_list {
            if directive == "ALL" {
                self.jar.clear();
            } else if let Some(cookie) = Cookie::parse_wire_line(directive) {
                self.insert(cookie);
            }
        }

        self.effective = options.url.clone();
        self.calls.push(options.clone());
        self.responses.pop_front().unwrap_or_else(|| {
            TransportOutcome::Raw(Bytes::from_static(b"HTTP/1.1 200 OK\r\n\r\nok"))
        })
    }

    fn effective_url(&self) -> Option<String> {
        self.effective.clone()
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
        self.effective = None;
    }

    fn close(&mut self) {
        self.effective = None;
    }
}
