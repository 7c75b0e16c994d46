// Copyright © 2025 rustmailer.com
// Licensed under RustMailer License Agreement v1.0
// Unauthorized copying, modification, or distribution is prohibited.

use poem::{
    web::headers::{authorization::Bearer, Authorization, HeaderMapExt},
    FromRequest, Request, RequestBody, Result,
};

/// The caller's delegated Graph credential, taken from `Authorization: Bearer`.
///
/// A missing or blank credential is not rejected here; the operation decides how
/// to report it so the response keeps the operation's own shape.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BearerToken(pub Option<String>);

impl BearerToken {
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl<'a> FromRequest<'a> for BearerToken {
    async fn from_request(req: &'a Request, _body: &mut RequestBody) -> Result<Self> {
        Ok(extract_bearer_token(req))
    }
}

pub fn extract_bearer_token(req: &Request) -> BearerToken {
    let token = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .map(|auth| auth.token().trim().to_string())
        .filter(|token| !token.is_empty());
    BearerToken(token)
}
