// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Strategies for locating a bearer token on an inbound request.
//!
//! An extractor answers one of three ways:
//!
//! - `Ok(Some(token))` - a token was found
//! - `Ok(None)` - no token was presented (not an error)
//! - `Err(_)` - a token was presented but is malformed
//!
//! Closures with the matching signature are extractors too, so strategies
//! compose freely through [`FromFirst`].

use axum::http::{header::AUTHORIZATION, request::Parts};

use super::error::ExtractError;

/// Pulls a raw bearer token out of a request.
pub trait TokenExtractor: Send + Sync {
    fn extract(&self, parts: &Parts) -> Result<Option<String>, ExtractError>;
}

impl<F> TokenExtractor for F
where
    F: Fn(&Parts) -> Result<Option<String>, ExtractError> + Send + Sync,
{
    fn extract(&self, parts: &Parts) -> Result<Option<String>, ExtractError> {
        self(parts)
    }
}

/// Reads `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively. A missing or empty header is
/// "no token"; anything other than exactly two whitespace-separated fields
/// with a `bearer` scheme is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct FromAuthHeader;

impl TokenExtractor for FromAuthHeader {
    fn extract(&self, parts: &Parts) -> Result<Option<String>, ExtractError> {
        let Some(value) = parts.headers.get(AUTHORIZATION) else {
            return Ok(None);
        };

        let header = value
            .to_str()
            .map_err(|_| ExtractError::MalformedAuthHeader)?;
        if header.is_empty() {
            return Ok(None);
        }

        let fields: Vec<&str> = header.split_whitespace().collect();
        match fields.as_slice() {
            [scheme, token] if scheme.eq_ignore_ascii_case("bearer") => {
                Ok(Some((*token).to_string()))
            }
            _ => Err(ExtractError::MalformedAuthHeader),
        }
    }
}

/// Reads the token from a query-string parameter. Never fails.
#[derive(Debug, Clone)]
pub struct FromParameter {
    name: String,
}

impl FromParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl TokenExtractor for FromParameter {
    fn extract(&self, parts: &Parts) -> Result<Option<String>, ExtractError> {
        let Some(query) = parts.uri.query() else {
            return Ok(None);
        };

        // first occurrence wins
        let value = url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == self.name.as_str())
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty());

        Ok(value)
    }
}

/// Runs extractors in order and takes the first token found.
///
/// An error from any extractor stops the chain immediately. With no
/// extractors, or when none finds a token, the result is `Ok(None)`.
#[derive(Default)]
pub struct FromFirst {
    extractors: Vec<Box<dyn TokenExtractor>>,
}

impl FromFirst {
    pub fn new(extractors: Vec<Box<dyn TokenExtractor>>) -> Self {
        Self { extractors }
    }

    /// Append an extractor to the end of the chain.
    pub fn or(mut self, extractor: impl TokenExtractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl TokenExtractor for FromFirst {
    fn extract(&self, parts: &Parts) -> Result<Option<String>, ExtractError> {
        for extractor in &self.extractors {
            if let Some(token) = extractor.extract(parts)?.filter(|t| !t.is_empty()) {
                return Ok(Some(token));
            }
        }
        Ok(None)
    }
}

impl std::fmt::Debug for FromFirst {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromFirst")
            .field("extractors", &self.len())
            .finish()
    }
}
