// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer Guard - JWT bearer-token authentication for Axum services
//!
//! Extracts a token from each request, verifies it against a pinned signing
//! algorithm with keys from a pluggable resolver, and hands the verified
//! token to downstream handlers.
//!
//! ## Modules
//!
//! - `auth` - Token extraction, validation middleware and extractors
//! - `crypto` - RSA keys, AES-CFB, bcrypt and secret generation
//! - `api` - Demo resource server routes (Axum)
//! - `config` - Environment configuration

pub mod api;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod state;
pub mod telemetry;
pub mod util;
