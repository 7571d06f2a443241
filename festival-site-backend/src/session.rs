use bytes::Bytes;
use cookie::{Cookie, SameSite};
use http::header::{COOKIE, SET_COOKIE};
use http::{Method, Request};
use http_body::Body;
use http_body_util::BodyExt as _;
use rand::{thread_rng, Rng as _};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::error::AppError;

pub const COOKIE_NAME_CSRF_TOKEN: &str = "__Host_csrf_token";

/// The visitor's CSRF token. It also keys their feedback form.
#[derive(Clone, Debug)]
#[must_use]
pub struct Session {
    // bool is true when the value was changed
    csrf_token: (String, bool),
}

impl Session {
    pub fn new<T>(request: &Request<T>) -> Self {
        let mut csrf_token = None;
        request
            .headers()
            .get_all(COOKIE)
            .into_iter()
            .filter_map(|value| value.to_str().ok())
            .map(std::borrow::ToOwned::to_owned)
            .flat_map(Cookie::split_parse)
            .filter_map(std::result::Result::ok)
            .for_each(|cookie| {
                if cookie.name() == COOKIE_NAME_CSRF_TOKEN {
                    csrf_token = Some((cookie.value().to_owned(), false));
                }
            });
        let csrf_token = csrf_token.unwrap_or_else(|| {
            debug!("issuing a new csrf token");
            (
                thread_rng()
                    .sample_iter(&rand::distributions::Alphanumeric)
                    .take(30)
                    .map(char::from)
                    .collect(),
                true,
            )
        });
        Self { csrf_token }
    }

    #[must_use]
    pub fn csrf_token(&self) -> &str {
        &self.csrf_token.0
    }
}

pub trait ResponseSessionExt {
    #[must_use]
    fn with_session(self, session: Session) -> Self;
}

impl ResponseSessionExt for http::response::Builder {
    fn with_session(self, session: Session) -> Self {
        if let (value, true) = session.csrf_token {
            let cookie = Cookie::build((COOKIE_NAME_CSRF_TOKEN, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Strict)
                .build();
            // invalid header values surface as an error when the body is set
            self.header(SET_COOKIE, cookie.to_string())
        } else {
            self
        }
    }
}

pub trait CsrfToken {
    fn csrf_token(&self) -> &str;
}

#[derive(Deserialize)]
pub struct CsrfOnlyPayload {
    csrf_token: String,
}

impl CsrfToken for CsrfOnlyPayload {
    fn csrf_token(&self) -> &str {
        &self.csrf_token
    }
}

/// An url-encoded form whose token has been compared with the session.
pub struct CsrfSafeForm<T: CsrfToken> {
    pub value: T,
}

impl<T: CsrfToken + DeserializeOwned> CsrfSafeForm<T> {
    pub async fn from_request<B>(request: Request<B>, session: &Session) -> Result<Self, AppError>
    where
        B: Body<Data = Bytes>,
        AppError: From<B::Error>,
    {
        let not_get_or_head = !(request.method() == Method::GET || request.method() == Method::HEAD);
        let body = request.into_body().collect().await?.to_bytes();
        let value: T = serde_urlencoded::from_bytes(&body)?;

        if not_get_or_head && value.csrf_token() != session.csrf_token() {
            return Err(AppError::WrongCsrfToken);
        }
        Ok(Self { value })
    }
}
