// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! AES-CFB encryption.
//!
//! Output layout: `IV (16 bytes) || CFB(base64(plaintext))`. The key length
//! selects AES-128, AES-192 or AES-256.

use aes::{Aes128, Aes192, Aes256};
use base64ct::{Base64, Encoding};
use cfb_mode::cipher::{AsyncStreamCipher, InvalidLength, KeyIvInit};
use cfb_mode::{Decryptor, Encryptor};
use rand::RngCore;

use super::CryptoError;

/// AES block size, which is also the IV length.
const BLOCK_SIZE: usize = 16;

/// Encrypt `value` under `key` (16, 24 or 32 bytes).
pub fn encrypt(value: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    check_key(key)?;

    let encoded = Base64::encode_string(value);
    let mut out = vec![0u8; BLOCK_SIZE + encoded.len()];
    let (iv, body) = out.split_at_mut(BLOCK_SIZE);
    rand::rngs::OsRng.fill_bytes(iv);
    body.copy_from_slice(encoded.as_bytes());

    let invalid = |_: InvalidLength| CryptoError::InvalidKeyLength(key.len());
    match key.len() {
        16 => Encryptor::<Aes128>::new_from_slices(key, iv).map_err(invalid)?.encrypt(body),
        24 => Encryptor::<Aes192>::new_from_slices(key, iv).map_err(invalid)?.encrypt(body),
        _ => Encryptor::<Aes256>::new_from_slices(key, iv).map_err(invalid)?.encrypt(body),
    }

    Ok(out)
}

/// Reverse of [`encrypt`].
pub fn decrypt(ciphertext: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    check_key(key)?;
    if ciphertext.len() < BLOCK_SIZE {
        return Err(CryptoError::CiphertextTooShort);
    }

    let (iv, body) = ciphertext.split_at(BLOCK_SIZE);
    let mut body = body.to_vec();

    let invalid = |_: InvalidLength| CryptoError::InvalidKeyLength(key.len());
    match key.len() {
        16 => Decryptor::<Aes128>::new_from_slices(key, iv).map_err(invalid)?.decrypt(&mut body),
        24 => Decryptor::<Aes192>::new_from_slices(key, iv).map_err(invalid)?.decrypt(&mut body),
        _ => Decryptor::<Aes256>::new_from_slices(key, iv).map_err(invalid)?.decrypt(&mut body),
    }

    let encoded = std::str::from_utf8(&body).map_err(|_| CryptoError::MalformedPayload)?;
    Base64::decode_vec(encoded).map_err(|_| CryptoError::MalformedPayload)
}

fn check_key(key: &[u8]) -> Result<(), CryptoError> {
    match key.len() {
        16 | 24 | 32 => Ok(()),
        other => Err(CryptoError::InvalidKeyLength(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_then_decrypt_with_each_key_size() {
        for size in [16, 24, 32] {
            let key = vec![7u8; size];
            let ciphertext = encrypt(b"hello world", &key).unwrap();
            assert_eq!(decrypt(&ciphertext, &key).unwrap(), b"hello world");
        }
    }

    #[test]
    fn empty_input_encrypts_to_bare_iv() {
        let key = [3u8; 24];
        let ciphertext = encrypt(b"", &key).unwrap();
        assert_eq!(ciphertext.len(), BLOCK_SIZE);
        assert!(decrypt(&ciphertext, &key).unwrap().is_empty());
    }

    #[test]
    fn non_utf8_bytes_survive() {
        let key = [9u8; 32];
        let value = [0u8, 255, 128];
        let ciphertext = encrypt(&value, &key).unwrap();
        assert_eq!(decrypt(&ciphertext, &key).unwrap(), value);
    }

    #[test]
    fn output_is_iv_plus_base64_length() {
        let key = [1u8; 32];
        let ciphertext = encrypt(b"abc", &key).unwrap();
        // base64("abc") == "YWJj"
        assert_eq!(ciphertext.len(), BLOCK_SIZE + 4);
    }

    #[test]
    fn iv_is_random() {
        let key = [1u8; 16];
        let a = encrypt(b"same", &key).unwrap();
        let b = encrypt(b"same", &key).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn invalid_key_length_is_rejected() {
        assert!(matches!(
            encrypt(b"x", &[0u8; 10]),
            Err(CryptoError::InvalidKeyLength(10))
        ));
        assert!(matches!(
            decrypt(&[0u8; 32], &[0u8; 33]),
            Err(CryptoError::InvalidKeyLength(33))
        ));
    }

    #[test]
    fn short_ciphertext_is_rejected() {
        assert!(matches!(
            decrypt(&[0u8; 5], &[0u8; 16]),
            Err(CryptoError::CiphertextTooShort)
        ));
    }

    #[test]
    fn wrong_key_does_not_yield_plaintext() {
        let ciphertext = encrypt(b"a secret message", &[1u8; 16]).unwrap();
        match decrypt(&ciphertext, &[2u8; 16]) {
            Ok(plain) => assert_ne!(plain, b"a secret message"),
            Err(e) => assert!(matches!(e, CryptoError::MalformedPayload)),
        }
    }

    #[test]
    fn works_with_generated_secret() {
        let key = crate::crypto::generate_secret_key();
        let ciphertext = encrypt(b"payload", key.as_bytes()).unwrap();
        assert_eq!(decrypt(&ciphertext, key.as_bytes()).unwrap(), b"payload");
    }
}
