use bytes::Bytes;
use festival_site_core::email::complete;
use festival_site_core::suggestions::{Action, Key, Suggestion};
use festival_site_core::{Field, SuggestionController};
use headers::ContentType;
use http::{Request, Response, StatusCode};
use http_body_util::Full;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::routes::search::{parse_query, SearchQuery};
use crate::session::Session;
use crate::{AppState, ResponseTypedHeaderExt as _};

/// The search box as the page sees it: the typed text, the highlighted item and
/// at most one key press or click to apply.
#[derive(Deserialize)]
pub struct SuggestionsQuery {
    #[serde(default)]
    q: String,
    active: Option<usize>,
    key: Option<Key>,
    click: Option<usize>,
}

#[derive(Serialize)]
pub struct SuggestionsResponse<'a> {
    items: &'a [Suggestion],
    active: Option<usize>,
    action: Action,
}

#[derive(Deserialize)]
pub struct ValidateQuery {
    field: String,
    #[serde(default)]
    value: String,
    #[serde(default)]
    consent: bool,
}

#[derive(Serialize)]
pub struct ValidateResponse {
    error: Option<String>,
}

fn json<T: Serialize>(value: &T) -> Result<Response<Full<Bytes>>, AppError> {
    Ok(Response::builder()
        .status(StatusCode::OK)
        .typed_header(ContentType::json())
        .body(Full::new(Bytes::from(serde_json::to_vec(value)?)))?)
}

/// Live suggestions for the search box, with keyboard and pointer navigation.
pub fn suggestions<B>(state: &AppState, request: &Request<B>) -> Result<Response<Full<Bytes>>, AppError> {
    let query: SuggestionsQuery = parse_query(request)?;
    let mut controller = SuggestionController::new();
    controller.input(&state.engine(), &query.q);
    if let Some(active) = query.active {
        controller.hover(active);
    }
    let action = match (query.click, query.key) {
        (Some(index), _) => controller.click(index),
        (None, Some(key)) => controller.key(key),
        (None, None) => Action::None,
    };
    json(&SuggestionsResponse {
        items: controller.items(),
        active: controller.active(),
        action,
    })
}

/// Validates a single field of the visitor's feedback form.
pub fn validate<B>(
    state: &AppState,
    request: &Request<B>,
    session: &Session,
) -> Result<Response<Full<Bytes>>, AppError> {
    let query: ValidateQuery = parse_query(request)?;
    let Ok(field) = query.field.parse::<Field>() else {
        return json(&ValidateResponse { error: None });
    };

    let error = {
        let mut site = state.site()?;
        let mut scratch;
        let controller = match site.forms.get_mut(session.csrf_token()) {
            Some(controller) => controller,
            None => {
                scratch = state.new_form();
                &mut scratch
            }
        };
        let marker = if field == Field::Privacy {
            controller.set_consent(query.consent)
        } else {
            controller.input(field, &query.value)
        };
        marker.error()
    };

    json(&ValidateResponse {
        error: error.map(|error| error.to_string()),
    })
}

pub fn email_suggestions<B>(request: &Request<B>) -> Result<Response<Full<Bytes>>, AppError> {
    let query: SearchQuery = parse_query(request)?;
    json(&complete(&query.q))
}
