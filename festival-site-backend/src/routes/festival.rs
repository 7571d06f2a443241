use bytes::Bytes;
use headers::ContentType;
use http::{Response, StatusCode};
use http_body_util::Full;

use crate::components::main::{escape, main};
use crate::error::AppError;
use crate::session::{ResponseSessionExt as _, Session};
use crate::{AppState, ResponseTypedHeaderExt as _};

/// Detail page, addressed by the record's link.
pub fn festival(
    state: &AppState,
    link: &str,
    session: Session,
) -> Result<Response<Full<Bytes>>, AppError> {
    let record = state.catalog.by_link(link).ok_or(AppError::NotFound)?;

    let inner = format!(
        r#"<article class="festival">
    <h1 class="center">{}</h1>
    <dl>
        <dt>日期</dt>
        <dd>{}</dd>
        <dt>季节</dt>
        <dd>{}</dd>
    </dl>
    <p>{}</p>
    <a href="/">返回节日列表</a>
</article>"#,
        escape(&record.name),
        escape(&record.date),
        escape(&record.season),
        escape(&record.description),
    );

    Ok(Response::builder()
        .with_session(session)
        .status(StatusCode::OK)
        .typed_header(ContentType::html())
        .body(Full::new(Bytes::from(main(&record.name, &inner))))?)
}
