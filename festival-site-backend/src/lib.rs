pub mod components;
pub mod error;
pub mod routes;
pub mod session;

use core::convert::Infallible;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;

use bytes::Bytes;
use festival_site_config::FeedbackConfig;
use festival_site_core::{FestivalCatalog, FormController, PersistentStore, SearchEngine};
use futures_util::{pin_mut, Future};
use headers::{Header, HeaderMapExt as _};
use http::{Method, Request, Response};
use http_body::Body;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper_util::rt::{TokioExecutor, TokioIo};
use session::Session;
use tokio::net::TcpListener;
use tokio::select;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::AppError;

pub trait ResponseTypedHeaderExt {
    #[must_use]
    fn typed_header<H: Header>(self, header: H) -> Self;
}

impl ResponseTypedHeaderExt for http::response::Builder {
    fn typed_header<H: Header>(mut self, header: H) -> Self {
        if let Some(headers) = self.headers_mut() {
            headers.typed_insert(header);
        }
        self
    }
}

/// Everything a request may change. One lock guards all of it, so every
/// request is a single atomic step.
///
/// Search histories live in the store under keys scoped by csrf token, so each
/// visitor only sees their own.
pub struct Site {
    store: Box<dyn PersistentStore + Send>,
    /// Feedback forms keyed by csrf token. Only forms with a pending deadline are kept.
    forms: HashMap<String, FormController>,
}

impl Site {
    fn evict_settled_forms(&mut self, now: Instant) {
        let before = self.forms.len();
        self.forms.retain(|_, form| {
            form.tick(now);
            !form.is_settled()
        });
        if self.forms.len() < before {
            debug!("evicted {} settled feedback forms", before - self.forms.len());
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    catalog: Arc<FestivalCatalog>,
    site: Arc<Mutex<Site>>,
    feedback: FeedbackConfig,
}

impl AppState {
    #[must_use]
    pub fn new(
        catalog: FestivalCatalog,
        store: impl PersistentStore + Send + 'static,
        feedback: FeedbackConfig,
    ) -> Self {
        Self {
            catalog: Arc::new(catalog),
            site: Arc::new(Mutex::new(Site {
                store: Box::new(store),
                forms: HashMap::new(),
            })),
            feedback,
        }
    }

    #[must_use]
    pub fn engine(&self) -> SearchEngine<'_> {
        SearchEngine::new(&self.catalog)
    }

    /// Locks the site. Forms whose deadlines have all passed are dropped first.
    fn site(&self) -> Result<MutexGuard<'_, Site>, AppError> {
        let mut site = self.site.lock().map_err(|_| AppError::Poison)?;
        site.evict_settled_forms(Instant::now());
        Ok(site)
    }

    /// Number of feedback forms that still wait for a deadline.
    pub fn pending_forms(&self) -> Result<usize, AppError> {
        Ok(self.site()?.forms.len())
    }

    fn new_form(&self) -> FormController {
        FormController::with_delays(
            self.feedback.resubmit_cooldown(),
            self.feedback.notice_dismiss(),
        )
    }
}

/// Routes one request. Failures become error pages, so this never fails.
pub async fn handle<B>(
    state: AppState,
    request: Request<B>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes> + Send,
    AppError: From<B::Error>,
{
    let session = Session::new(&request);
    debug!("{} {}", request.method(), request.uri().path());
    let result = route(&state, request, session.clone()).await;
    Ok(result.unwrap_or_else(|app_error| app_error.build_error_template(session)))
}

async fn route<B>(
    state: &AppState,
    request: Request<B>,
    session: Session,
) -> Result<Response<Full<Bytes>>, AppError>
where
    B: Body<Data = Bytes> + Send,
    AppError: From<B::Error>,
{
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    match (method, path.as_str()) {
        (Method::GET, "/") => routes::index::index(state, session),
        (Method::GET, "/search") => routes::search::search(state, &request, session),
        (Method::POST, "/search/history/clear") => {
            routes::search::clear_history(state, request, session).await
        }
        (Method::GET, "/feedback") => routes::feedback::show(state, session),
        (Method::POST, "/feedback") => routes::feedback::submit(state, request, session).await,
        (Method::GET, "/api/suggestions") => routes::api::suggestions(state, &request),
        (Method::GET, "/api/validate") => routes::api::validate(state, &request, &session),
        (Method::GET, "/api/email-suggestions") => routes::api::email_suggestions(&request),
        (Method::GET, "/index.css") => routes::assets::indexcss(&request),
        (Method::GET, "/index.js") => routes::assets::indexjs(&request),
        (Method::GET, link) if link.starts_with("/festival_") && link.ends_with(".html") => {
            routes::festival::festival(state, &link[1..], session)
        }
        _ => Err(AppError::NotFound),
    }
}

pub async fn run_server(
    state: AppState,
    listen_address: &str,
) -> Result<impl Future<Output = Result<(), AppError>>, AppError> {
    info!("starting up server...");

    let listener = TcpListener::bind(listen_address).await?;

    // tell the connections to shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let shutdown_tx = Arc::new(shutdown_tx);

    // wait for the connections to finish shutdown
    let (closed_tx, closed_rx) = watch::channel(());

    info!("listening on {}", listener.local_addr()?);

    Ok(async move {
        #[allow(clippy::redundant_pub_crate)]
        loop {
            select! {
                accept = listener.accept() => {
                    let (socket, remote_addr) = match accept {
                        Ok(accepted) => accepted,
                        Err(err) => {
                            error!("failed to accept connection: {err}");
                            continue;
                        }
                    };
                    debug!("accepted connection from {remote_addr}");

                    let state = state.clone();
                    let shutdown_tx = Arc::clone(&shutdown_tx);
                    let closed_rx = closed_rx.clone();

                    let fut = async move {
                        let socket = TokioIo::new(socket);

                        let hyper_service = hyper::service::service_fn(move |request: Request<Incoming>| {
                            handle(state.clone(), request)
                        });

                        let builder = hyper_util::server::conn::auto::Builder::new(TokioExecutor::new());
                        let connection = builder.serve_connection_with_upgrades(socket, hyper_service);
                        pin_mut!(connection);

                        loop {
                            select! {
                                connection_result = connection.as_mut() => {
                                    if let Err(err) = connection_result
                                    {
                                        error!("failed to serve connection: {err:#}");
                                    }
                                    break; // (gracefully) finished connection
                                }
                                () = shutdown_tx.closed() => {
                                    connection.as_mut().graceful_shutdown();
                                }
                            }
                        }

                        drop(closed_rx);
                    };

                    tokio::spawn(fut);
                }
                () = shutdown_signal() => {
                    warn!("shutting down");
                    drop(shutdown_rx); // initiate shutdown
                    drop(closed_rx);
                    closed_tx.closed().await;
                    break;
                }
            }
        }

        info!("all connections closed");
        Ok(())
    })
}

#[allow(clippy::redundant_pub_crate)]
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!("failed to install signal handler: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
