// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults, and the loader that turns them into
//! a [`JwtValidator`]. Configuration is read once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SIGNING_METHOD` | Algorithm every token must be signed with | `RS512` |
//! | `JWT_PUBLIC_KEY_PEM` | Static RSA public key (PKIX PEM, `\n` escapes allowed) | - |
//! | `JWT_JWKS_URL` | JWKS endpoint, used when no static key is set | - |
//! | `JWT_CREDENTIALS_OPTIONAL` | Let requests without a token through | `false` |
//! | `JWT_AUTH_ON_OPTIONS` | Authenticate `OPTIONS` requests too | `false` |
//! | `JWT_TOKEN_QUERY_PARAM` | Also accept the token from this query parameter | - |
//! | `JWT_ISSUER` | Expected `iss` claim | - |
//! | `JWT_AUDIENCE` | Expected `aud` claim | - |
//! | `JWT_LEEWAY_SECS` | Clock skew tolerance for `exp` / `nbf` / `iat` | `60` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! One of `JWT_PUBLIC_KEY_PEM` or `JWT_JWKS_URL` is required.

use std::str::FromStr;
use std::sync::Arc;

use jsonwebtoken::Algorithm;
use thiserror::Error;

use crate::auth::{
    claims::DEFAULT_LEEWAY, FromAuthHeader, FromFirst, FromParameter, JwksResolver, JwtValidator,
    KeyResolutionError, KeyResolver, StaticKeyResolver,
};
use crate::crypto::{self, CryptoError};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Algorithm name as accepted by `jsonwebtoken`, e.g. `RS512` or `ES256`.
pub const JWT_SIGNING_METHOD_ENV: &str = "JWT_SIGNING_METHOD";

/// PEM-encoded RSA public key. Takes precedence over [`JWT_JWKS_URL_ENV`].
pub const JWT_PUBLIC_KEY_PEM_ENV: &str = "JWT_PUBLIC_KEY_PEM";

pub const JWT_JWKS_URL_ENV: &str = "JWT_JWKS_URL";
pub const JWT_CREDENTIALS_OPTIONAL_ENV: &str = "JWT_CREDENTIALS_OPTIONAL";
pub const JWT_AUTH_ON_OPTIONS_ENV: &str = "JWT_AUTH_ON_OPTIONS";

/// When set, the query parameter is tried before the `Authorization` header.
pub const JWT_TOKEN_QUERY_PARAM_ENV: &str = "JWT_TOKEN_QUERY_PARAM";

pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const JWT_AUDIENCE_ENV: &str = "JWT_AUDIENCE";
pub const JWT_LEEWAY_SECS_ENV: &str = "JWT_LEEWAY_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SIGNING_METHOD: Algorithm = Algorithm::RS512;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validator requires a signing method")]
    MissingSigningMethod,

    #[error("validator requires a key resolver")]
    MissingKeyResolver,

    #[error("leeway of {0}s exceeds the one day limit")]
    LeewayOutOfRange(u64),

    #[error("missing configuration: {0}")]
    Missing(&'static str),

    #[error("invalid configuration: {var}={value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("invalid public key: {0}")]
    PublicKey(#[from] CryptoError),

    #[error("invalid JWKS configuration: {0}")]
    Jwks(#[from] KeyResolutionError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            _ => Err(()),
        }
    }
}

/// Where verification keys come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    PublicKeyPem(String),
    JwksUrl(String),
}

/// Everything the server reads from the environment.
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub host: String,
    pub port: u16,
    pub signing_method: Algorithm,
    pub key_source: KeySource,
    pub credentials_optional: bool,
    pub enable_auth_on_options: bool,
    pub token_query_param: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub leeway: u64,
    pub log_format: LogFormat,
}

impl AuthSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = get(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = parse_or(get(PORT_ENV), PORT_ENV, DEFAULT_PORT)?;

        let signing_method = match get(JWT_SIGNING_METHOD_ENV) {
            Some(value) => Algorithm::from_str(value.trim()).map_err(|_| ConfigError::Invalid {
                var: JWT_SIGNING_METHOD_ENV,
                value,
            })?,
            None => DEFAULT_SIGNING_METHOD,
        };

        let key_source = match (get(JWT_PUBLIC_KEY_PEM_ENV), get(JWT_JWKS_URL_ENV)) {
            (Some(pem), _) => KeySource::PublicKeyPem(pem.replace("\\n", "\n")),
            (None, Some(url)) => KeySource::JwksUrl(url),
            (None, None) => return Err(ConfigError::Missing(JWT_PUBLIC_KEY_PEM_ENV)),
        };

        let log_format = match get(LOG_FORMAT_ENV) {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                var: LOG_FORMAT_ENV,
                value,
            })?,
            None => LogFormat::default(),
        };

        let credentials_optional = parse_bool(
            get(JWT_CREDENTIALS_OPTIONAL_ENV),
            JWT_CREDENTIALS_OPTIONAL_ENV,
        )?;
        let enable_auth_on_options =
            parse_bool(get(JWT_AUTH_ON_OPTIONS_ENV), JWT_AUTH_ON_OPTIONS_ENV)?;
        let leeway = parse_or(get(JWT_LEEWAY_SECS_ENV), JWT_LEEWAY_SECS_ENV, DEFAULT_LEEWAY)?;

        Ok(Self {
            host,
            port,
            signing_method,
            key_source,
            credentials_optional,
            enable_auth_on_options,
            token_query_param: get(JWT_TOKEN_QUERY_PARAM_ENV),
            issuer: get(JWT_ISSUER_ENV),
            audience: get(JWT_AUDIENCE_ENV),
            leeway,
            log_format,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the validator. The JWKS resolver, if any, is returned as well so
    /// the health endpoint can report on it.
    pub fn build_validator(
        &self,
    ) -> Result<(JwtValidator, Option<Arc<JwksResolver>>), ConfigError> {
        let (resolver, jwks) = match &self.key_source {
            KeySource::PublicKeyPem(pem) => {
                let public_key = crypto::rsa::parse_rsa_public_key_from_pem_str(pem)?;
                let key = crypto::rsa::decoding_key(&public_key)?;
                (Arc::new(StaticKeyResolver::new(key)) as Arc<dyn KeyResolver>, None)
            }
            KeySource::JwksUrl(url) => {
                let jwks = Arc::new(JwksResolver::new(url.clone())?);
                (jwks.clone() as Arc<dyn KeyResolver>, Some(jwks))
            }
        };

        let mut builder = JwtValidator::builder()
            .signing_method(self.signing_method)
            .key_resolver_arc(resolver)
            .credentials_optional(self.credentials_optional)
            .enable_auth_on_options(self.enable_auth_on_options)
            .leeway(self.leeway);

        if let Some(param) = &self.token_query_param {
            builder = builder.extractor(
                FromFirst::default()
                    .or(FromParameter::new(param.clone()))
                    .or(FromAuthHeader),
            );
        }
        if let Some(issuer) = &self.issuer {
            builder = builder.issuer(issuer.clone());
        }
        if let Some(audience) = &self.audience {
            builder = builder.audience(audience.clone());
        }

        Ok((builder.build()?, jwks))
    }
}

fn parse_or<T: FromStr>(
    value: Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        None => Ok(default),
    }
}

fn parse_bool(value: Option<String>, var: &'static str) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::Invalid { var, value }),
    }
}
