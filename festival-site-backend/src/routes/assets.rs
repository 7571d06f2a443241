use std::time::Duration;

use bytes::Bytes;
use headers::{CacheControl, ContentType, ETag, Header as _, HeaderMapExt as _, IfNoneMatch};
use http::{HeaderValue, Request, Response, StatusCode};
use http_body_util::Full;

use crate::error::AppError;
use crate::ResponseTypedHeaderExt as _;

pub const INDEX_CSS: &str = include_str!("../../frontend/index.css");
pub const INDEX_JS: &str = include_str!("../../frontend/index.js");
/// Cache busting query value, bumped with the crate version.
pub const ASSET_VERSION: &str = env!("CARGO_PKG_VERSION");
const ASSET_ETAG: &str = concat!("\"", env!("CARGO_PKG_VERSION"), "\"");

fn asset<B>(
    request: &Request<B>,
    content_type: ContentType,
    content: &'static str,
) -> Result<Response<Full<Bytes>>, AppError> {
    let if_none_match: Option<IfNoneMatch> = request.headers().typed_get();
    let etag = ETag::decode(&mut std::iter::once(&HeaderValue::from_static(ASSET_ETAG)))?;
    if if_none_match.map_or(true, |h| h.precondition_passes(&etag)) {
        Ok(Response::builder()
            .status(StatusCode::OK)
            .typed_header(content_type)
            .typed_header(etag)
            .typed_header(
                CacheControl::new()
                    .with_immutable()
                    .with_public()
                    .with_max_age(Duration::from_secs(31_536_000)),
            )
            .body(Full::new(Bytes::from_static(content.as_bytes())))?)
    } else {
        Ok(Response::builder()
            .status(StatusCode::NOT_MODIFIED)
            .body(Full::default())?)
    }
}

pub fn indexcss<B>(request: &Request<B>) -> Result<Response<Full<Bytes>>, AppError> {
    asset(request, ContentType::from(mime::TEXT_CSS_UTF_8), INDEX_CSS)
}

pub fn indexjs<B>(request: &Request<B>) -> Result<Response<Full<Bytes>>, AppError> {
    asset(
        request,
        ContentType::from(mime::APPLICATION_JAVASCRIPT_UTF_8),
        INDEX_JS,
    )
}
