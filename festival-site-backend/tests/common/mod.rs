#![allow(dead_code)]

use std::str::from_utf8;

use bytes::Bytes;
use festival_site_backend::{handle, AppState};
use festival_site_config::FeedbackConfig;
use festival_site_core::{FestivalCatalog, MemoryStore};
use http::header::{CONTENT_TYPE, COOKIE};
use http::{Method, Request, Response};
use http_body_util::{BodyExt as _, Full};

pub const TOKEN: &str = "testtoken";

pub fn state() -> AppState {
    state_with_delays(60_000)
}

pub fn state_with_delays(delay_ms: u64) -> AppState {
    AppState::new(
        FestivalCatalog::shipped(),
        MemoryStore::new(),
        FeedbackConfig {
            resubmit_cooldown_ms: delay_ms,
            notice_dismiss_ms: delay_ms,
        },
    )
}

pub fn query(path: &str, pairs: &[(&str, &str)]) -> String {
    format!("{path}?{}", serde_urlencoded::to_string(pairs).unwrap())
}

pub fn get(uri: &str) -> Request<Full<Bytes>> {
    get_as(uri, TOKEN)
}

pub fn get_as(uri: &str, token: &str) -> Request<Full<Bytes>> {
    Request::builder()
        .uri(uri)
        .header(COOKIE, format!("__Host_csrf_token={token}"))
        .body(Full::default())
        .unwrap()
}

pub fn post(uri: &str, form: &[(&str, &str)]) -> Request<Full<Bytes>> {
    post_as(uri, form, TOKEN)
}

pub fn post_as(uri: &str, form: &[(&str, &str)], token: &str) -> Request<Full<Bytes>> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(COOKIE, format!("__Host_csrf_token={token}"))
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Full::new(Bytes::from(serde_urlencoded::to_string(form).unwrap())))
        .unwrap()
}

pub async fn send(state: &AppState, request: Request<Full<Bytes>>) -> Response<Full<Bytes>> {
    handle(state.clone(), request).await.unwrap()
}

pub async fn text(response: Response<Full<Bytes>>) -> String {
    let binding = response.into_body().collect().await.unwrap().to_bytes();
    from_utf8(&binding).unwrap().to_owned()
}
