use bytes::Bytes;
use festival_site_core::{SearchHistory, SearchOutcome};
use headers::ContentType;
use http::header::LOCATION;
use http::{Request, Response, StatusCode};
use http_body::Body;
use http_body_util::Full;
use serde::Deserialize;

use crate::components::festival::{cards, search_form, search_history};
use crate::components::main::main;
use crate::error::AppError;
use crate::session::{CsrfOnlyPayload, CsrfSafeForm, ResponseSessionExt as _, Session};
use crate::{AppState, ResponseTypedHeaderExt as _};

pub const NO_MATCHES: &str = "未找到匹配的节日，请尝试其他关键词。";

#[derive(Deserialize, Default)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

pub fn parse_query<T: for<'de> Deserialize<'de>, B>(request: &Request<B>) -> Result<T, AppError> {
    Ok(serde_urlencoded::from_str(request.uri().query().unwrap_or_default())?)
}

pub fn redirect(location: &str, session: Session) -> Result<Response<Full<Bytes>>, AppError> {
    Ok(Response::builder()
        .with_session(session)
        .status(StatusCode::SEE_OTHER)
        .header(LOCATION, location)
        .body(Full::default())?)
}

/// Runs a search from the search box or a history chip.
pub fn search<B>(
    state: &AppState,
    request: &Request<B>,
    session: Session,
) -> Result<Response<Full<Bytes>>, AppError> {
    let query: SearchQuery = parse_query(request)?;
    let engine = state.engine();

    let (outcome, history) = {
        let mut site = state.site()?;
        let mut history = SearchHistory::load_scoped(&*site.store, session.csrf_token())?;
        let outcome = engine.search(&mut *site.store, &mut history, &query.q)?;
        (outcome, search_history(&history, &session))
    };

    let results = match outcome {
        SearchOutcome::ShowCatalog => return redirect("/", session),
        SearchOutcome::Single(record) => return redirect(&format!("/{}", record.link), session),
        SearchOutcome::NoMatches => format!(r#"<p class="center">{NO_MATCHES}</p>"#),
        SearchOutcome::Multiple(records) => cards(records),
    };

    let inner = format!(
        r#"<h1 class="center">中国传统节日</h1>
{}
{history}
<div id="search-results"><h3 class="center">搜索结果</h3>{results}</div>"#,
        search_form(query.q.trim()),
    );

    Ok(Response::builder()
        .with_session(session)
        .status(StatusCode::OK)
        .typed_header(ContentType::html())
        .body(Full::new(Bytes::from(main("搜索结果", &inner))))?)
}

pub async fn clear_history<B>(
    state: &AppState,
    request: Request<B>,
    session: Session,
) -> Result<Response<Full<Bytes>>, AppError>
where
    B: Body<Data = Bytes>,
    AppError: From<B::Error>,
{
    CsrfSafeForm::<CsrfOnlyPayload>::from_request(request, &session).await?;
    {
        let mut site = state.site()?;
        let mut history = SearchHistory::load_scoped(&*site.store, session.csrf_token())?;
        history.clear(&mut *site.store)?;
    }
    redirect("/", session)
}
