// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-scoped storage of the verified token.
//!
//! The token lives in the request's `Extensions` under a type that is private
//! to this module. Downstream code can read it through the accessors below
//! but cannot name the slot, so it cannot replace or forge the entry.

use std::sync::Arc;

use axum::http::{Extensions, Request};

use super::claims::VerifiedToken;

#[derive(Clone)]
struct VerifiedSlot(Arc<VerifiedToken>);

/// Attach a verified token to a request's extensions.
pub(crate) fn attach(extensions: &mut Extensions, token: VerifiedToken) {
    extensions.insert(VerifiedSlot(Arc::new(token)));
}

/// The token verified for this request, if any.
///
/// `None` when authentication was bypassed (OPTIONS, optional credentials
/// without a token) or the JWT middleware is not applied to the route.
pub fn jwt_from_extensions(extensions: &Extensions) -> Option<Arc<VerifiedToken>> {
    extensions
        .get::<VerifiedSlot>()
        .map(|slot| Arc::clone(&slot.0))
}

/// Shorthand for [`jwt_from_extensions`] on a full request.
pub fn jwt_from_request<B>(request: &Request<B>) -> Option<Arc<VerifiedToken>> {
    jwt_from_extensions(request.extensions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{Algorithm, Header};

    fn token(raw: &str) -> VerifiedToken {
        VerifiedToken::new(
            raw.to_string(),
            Header::new(Algorithm::RS512),
            Default::default(),
        )
    }

    #[test]
    fn absent_until_attached() {
        let mut request = Request::new(());
        assert!(jwt_from_request(&request).is_none());

        attach(request.extensions_mut(), token("a.b.c"));
        assert_eq!(jwt_from_request(&request).unwrap().raw(), "a.b.c");
    }

    #[test]
    fn public_types_do_not_collide_with_the_slot() {
        let mut extensions = Extensions::new();
        attach(&mut extensions, token("verified"));

        // Downstream code inserting the public types leaves the slot untouched.
        extensions.insert(token("forged"));
        extensions.insert(Arc::new(token("forged")));

        assert_eq!(jwt_from_extensions(&extensions).unwrap().raw(), "verified");
    }
}
