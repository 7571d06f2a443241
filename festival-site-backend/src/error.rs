use std::convert::Infallible;

use bytes::Bytes;
use festival_site_config::ConfigError;
use festival_site_core::StoreError;
use headers::ContentType;
use http::{Response, StatusCode};
use http_body_util::Full;
use tracing::{error, warn};

use crate::components::main::{escape, main};
use crate::session::{ResponseSessionExt as _, Session};
use crate::ResponseTypedHeaderExt as _;

#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("header error: {0}")]
    Header(#[from] headers::Error),
    #[error("IO error: {0}")]
    File(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("form submission error: {0}")]
    FormRejection(#[from] serde_urlencoded::de::Error),
    #[error("webserver error: {0}")]
    Hyper(#[from] hyper::Error),
    #[error("http error: {0}")]
    Http(#[from] http::Error),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("log filter error: {0}")]
    LogFilter(#[from] tracing_subscriber::filter::ParseError),
    #[error("poison error: the site state lock is poisoned")]
    Poison,
    #[error("wrong csrf token")]
    WrongCsrfToken,
    #[error("页面不存在")]
    NotFound,
}

impl From<Infallible> for AppError {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

impl AppError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::WrongCsrfToken | Self::FormRejection(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Renders the error page. This must not fail, so a broken response falls
    /// back to a bare status.
    pub fn build_error_template(self, session: Session) -> Response<Full<Bytes>> {
        let status = self.status();
        match status {
            StatusCode::INTERNAL_SERVER_ERROR => error!("request failed: {self}"),
            StatusCode::BAD_REQUEST => warn!("rejected request: {self}"),
            _ => {}
        }
        let title = status.canonical_reason().unwrap_or("Error");
        let inner = format!(
            r#"<h1 class="center">{}</h1><div class="error-message">{}</div><a href="/">返回首页</a>"#,
            escape(title),
            escape(&self.to_string()),
        );
        let html = main(title, &inner);
        Response::builder()
            .with_session(session)
            .status(status)
            .typed_header(ContentType::html())
            .body(Full::new(Bytes::from(html)))
            .unwrap_or_else(|_| {
                let mut response = Response::new(Full::default());
                *response.status_mut() = status;
                response
            })
    }
}
