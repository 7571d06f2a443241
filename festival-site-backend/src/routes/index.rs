use bytes::Bytes;
use festival_site_core::SearchHistory;
use headers::ContentType;
use http::{Response, StatusCode};
use http_body_util::Full;

use crate::components::festival::{catalog, search_form, search_history};
use crate::components::main::main;
use crate::error::AppError;
use crate::session::{ResponseSessionExt as _, Session};
use crate::{AppState, ResponseTypedHeaderExt as _};

pub fn index(state: &AppState, session: Session) -> Result<Response<Full<Bytes>>, AppError> {
    let history = SearchHistory::load_scoped(&*state.site()?.store, session.csrf_token())?;
    let history = search_history(&history, &session);

    let inner = format!(
        r#"<h1 class="center">中国传统节日</h1>
{}
{history}
<div id="search-results">{}</div>"#,
        search_form(""),
        catalog(&state.catalog),
    );

    Ok(Response::builder()
        .with_session(session)
        .status(StatusCode::OK)
        .typed_header(ContentType::html())
        .body(Full::new(Bytes::from(main("首页", &inner))))?)
}
