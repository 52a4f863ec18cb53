use std::sync::Arc;

use axum::{
    extract::{Query, Request, State},
    http::header,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use infodarts_core::tournaments::SCHEDULE;
use infodarts_core::{to_ics, Action, AppState, Consent, MonthView, Section, Theme};
use log::{debug, error, info};
use maud::Markup;
use serde::Deserialize;

use crate::loader::Context;
use crate::page;

pub const THEME_COOKIE: &str = "theme";
pub const CONSENT_COOKIE: &str = "ads_consent";

/// Page query as sent by the browser. Every field is kept as text so a bad
/// value falls back to the default view instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    year: Option<String>,
    /// One-based, unlike [`MonthView`].
    month: Option<String>,
    section: Option<String>,
    menu: Option<String>,
}

impl PageQuery {
    fn view(&self) -> Option<MonthView> {
        let year = self.year.as_deref()?.parse().ok()?;
        let month = self.month.as_deref()?.parse::<u32>().ok()?;
        MonthView::new(year, month.checked_sub(1)?)
    }

    fn menu_open(&self) -> bool {
        self.menu.as_deref() == Some("true")
    }
}

/// Rebuilds the visitor's state from stored preferences and the query.
fn session(context: &Context, jar: &CookieJar, query: &PageQuery) -> AppState {
    let mut state = AppState::new(context.clock.today());
    state.theme = Theme::from_stored(jar.get(THEME_COOKIE).map(Cookie::value));
    state.consent = Consent::from_stored(jar.get(CONSENT_COOKIE).map(Cookie::value));

    if let Some(view) = query.view() {
        state.view = view;
    }

    let section = query
        .section
        .as_deref()
        .map(Section::resolve)
        .unwrap_or_default();
    state = state.reduce(Action::Navigate(section));

    if query.menu_open() {
        state = state.reduce(Action::OpenMenu);
    }

    state
}

fn remember(jar: CookieJar, name: &'static str, value: &'static str) -> CookieJar {
    jar.add(
        Cookie::build((name, value))
            .path("/")
            .same_site(SameSite::Lax)
            .http_only(true)
            .permanent(),
    )
}

async fn handle_page(
    State(context): State<Arc<Context>>,
    jar: CookieJar,
    Query(query): Query<PageQuery>,
) -> Markup {
    let state = session(&context, &jar, &query);

    let (content, ranking) = tokio::join!(context.load_content(), context.load_ranking());

    page::render(&state, &content, &ranking, &context.ads)
}

async fn handle_theme(
    State(context): State<Arc<Context>>,
    jar: CookieJar,
    Query(query): Query<PageQuery>,
) -> (CookieJar, Redirect) {
    let state = session(&context, &jar, &query).reduce(Action::ToggleTheme);
    (
        remember(jar, THEME_COOKIE, state.theme.as_str()),
        Redirect::to(&page::page_href(&state)),
    )
}

fn apply_consent(
    context: &Context,
    jar: CookieJar,
    query: &PageQuery,
    action: Action,
) -> (CookieJar, Redirect) {
    let state = session(context, &jar, query).reduce(action);
    let jar = match state.consent.stored() {
        Some(value) => remember(jar, CONSENT_COOKIE, value),
        None => jar,
    };
    (jar, Redirect::to(&page::page_href(&state)))
}

async fn handle_accept(
    State(context): State<Arc<Context>>,
    jar: CookieJar,
    Query(query): Query<PageQuery>,
) -> (CookieJar, Redirect) {
    apply_consent(&context, jar, &query, Action::AcceptAds)
}

async fn handle_deny(
    State(context): State<Arc<Context>>,
    jar: CookieJar,
    Query(query): Query<PageQuery>,
) -> (CookieJar, Redirect) {
    apply_consent(&context, jar, &query, Action::DenyAds)
}

async fn handle_ics() -> Response {
    (
        [(header::CONTENT_TYPE, "text/calendar")],
        to_ics("InfoDarts", &SCHEDULE).to_string(),
    )
        .into_response()
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let response = next.run(request).await;
    debug!("{method} {uri} -> {}", response.status());
    response
}

pub fn router(context: Arc<Context>) -> Router {
    Router::new()
        .route("/", get(handle_page))
        .route("/theme", post(handle_theme))
        .route("/consent/accept", post(handle_accept))
        .route("/consent/deny", post(handle_deny))
        .route("/calendar.ics", get(handle_ics))
        .route("/healthz", get(|| async { "ok" }))
        .fallback(|| async { Redirect::to("/") })
        .layer(middleware::from_fn(log_request))
        .with_state(context)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {err}");
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
                error!("Failed to listen for SIGTERM: {err}");
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

    info!("Shutting down");
}
