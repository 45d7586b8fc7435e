// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of [`generate_secret_key`] output, a valid AES-256 key size.
pub const SECRET_KEY_LEN: usize = 32;

/// Random alphanumeric secret from the thread-local CSPRNG.
pub fn generate_secret_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_KEY_LEN)
        .map(char::from)
        .collect()
}
