// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

/// At most `len` bytes of `s`, backing off to the previous char boundary.
pub fn safe_string_cut(s: &str, len: usize) -> &str {
    if s.len() <= len {
        return s;
    }
    let mut end = len;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorter_string_is_unchanged() {
        assert_eq!(safe_string_cut("abc", 10), "abc");
        assert_eq!(safe_string_cut("abc", 3), "abc");
    }

    #[test]
    fn longer_string_is_cut() {
        assert_eq!(safe_string_cut("abcdef", 3), "abc");
        assert_eq!(safe_string_cut("abcdef", 0), "");
    }

    #[test]
    fn multibyte_char_is_not_split() {
        // "é" is two bytes
        assert_eq!(safe_string_cut("aéb", 2), "a");
        assert_eq!(safe_string_cut("aéb", 3), "aé");
    }
}
