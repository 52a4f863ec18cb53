use std::fs;
use std::path::Path;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use http_body_util::BodyExt;
use infodarts::{cache, router, AdsConfig, Clock, Config, Context, Source};
use infodarts_core::view::{
    ARTICLES_FAILED, NO_ROUTINES, RANKING_FAILED, ROUTINES_FAILED,
};
use scraper::{Html, Selector};
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::time::Duration;
use tower::ServiceExt;

const FIXTURE: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/infodarts-core/tests/fixtures/ranking.xlsx"
);

const FEED: &str = r#"{
    "articles": [
        {"title": "Cómo elegir tus dardos", "summary": "Peso y grip", "image": "img/dardos.jpg", "docx": "docs/dardos.docx"},
        {"title": "Checkouts & más", "docx": "docs/checkouts.docx"}
    ],
    "rutinas": []
}"#;

struct Portal {
    router: Router,
    _dir: TempDir,
}

fn portal(feed: Option<&str>, ranking: bool, sources: Option<(Source, Source)>) -> Portal {
    let dir = tempfile::tempdir().unwrap();
    if let Some(feed) = feed {
        fs::write(dir.path().join("articles.json"), feed).unwrap();
    }
    if ranking {
        fs::copy(FIXTURE, dir.path().join("ranking.xlsx")).unwrap();
    }

    let (feed, ranking) = sources.unwrap_or_else(|| {
        (
            "articles.json".parse().unwrap(),
            "ranking.xlsx".parse().unwrap(),
        )
    });

    let context = Context::new(Config {
        content_dir: dir.path().to_path_buf(),
        feed,
        ranking,
        cache: cache::Config {
            enabled: false,
            ttl: Duration::from_secs(60),
        },
        ads: AdsConfig {
            client: "ca-pub-test".into(),
            slots: vec!["42".into()],
        },
        clock: Clock::Fixed(NaiveDate::from_ymd_opt(2025, 9, 5).unwrap()),
    });

    Portal {
        router: router(Arc::new(context)),
        _dir: dir,
    }
}

async fn send(portal: &Portal, request: Request<Body>) -> (StatusCode, header::HeaderMap, String) {
    let response = portal.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

async fn page(portal: &Portal, uri: &str, cookie: Option<&str>) -> Html {
    let mut request = Request::get(uri);
    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    let (status, _, body) = send(portal, request.body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    Html::parse_document(&body)
}

fn texts(html: &Html, query: &str) -> Vec<String> {
    html.select(&Selector::parse(query).unwrap())
        .map(|element| element.text().collect::<String>().trim().to_string())
        .collect()
}

async fn upstream(router: Router) -> String {
    // Requests to the throwaway server must not be routed through a proxy.
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_full_page() {
    let portal = portal(Some(FEED), true, None);
    let html = page(&portal, "/", None).await;

    assert_eq!(texts(&html, "#monthYear"), ["Septiembre 2025"]);
    assert_eq!(texts(&html, "#calendarGrid > .day").len(), 35);
    assert_eq!(
        texts(&html, ".day.today .event"),
        ["Czech Open (ET 11) — 13:00"]
    );

    assert_eq!(
        texts(&html, "#articles-list h3"),
        ["Cómo elegir tus dardos", "Checkouts & más"]
    );
    assert_eq!(texts(&html, "#rutinas-list p.placeholder"), [NO_ROUTINES]);

    assert_eq!(
        texts(&html, "#ranking-list tbody tr td:nth-child(2)"),
        ["Luke Littler", "Luke Humphries", "Jermaine Wattimena"]
    );
    assert_eq!(
        texts(&html, "#ranking-list tbody tr:nth-child(3) td"),
        ["3", "Jermaine Wattimena", "-", "2011", ""]
    );

    assert_eq!(texts(&html, "section.active").len(), 1);
    assert_eq!(texts(&html, "section.active#calendario > h2"), ["Calendario"]);
    assert_eq!(texts(&html, ".consent-banner").len(), 1);
}

#[tokio::test]
async fn test_month_navigation_links() {
    let portal = portal(Some(FEED), true, None);
    let html = page(&portal, "/?year=2025&month=12&section=articulos", None).await;

    assert_eq!(texts(&html, "#monthYear"), ["Diciembre 2025"]);
    let next = html
        .select(&Selector::parse("#nextMonth").unwrap())
        .next()
        .unwrap()
        .value()
        .attr("href")
        .unwrap()
        .to_string();
    assert_eq!(next, "/?year=2026&month=1&section=articulos");
    assert_eq!(texts(&html, "section.active#articulos").len(), 1);
    assert!(texts(&html, ".day.today").is_empty());

    let html = page(&portal, &next, None).await;
    assert_eq!(texts(&html, "#monthYear"), ["Enero 2026"]);
}

#[tokio::test]
async fn test_invalid_month_falls_back_to_today() {
    let portal = portal(Some(FEED), true, None);
    let html = page(&portal, "/?year=2025&month=13&section=nowhere", None).await;
    assert_eq!(texts(&html, "#monthYear"), ["Septiembre 2025"]);
    assert_eq!(texts(&html, "section.active#calendario").len(), 1);
}

#[tokio::test]
async fn test_garbled_query_falls_back() {
    let portal = portal(Some(FEED), true, None);
    let html = page(&portal, "/?year=abc&month=2&menu=yes", None).await;
    assert_eq!(texts(&html, "#monthYear"), ["Septiembre 2025"]);
    assert!(texts(&html, "#sidebar.show").is_empty());

    let html = page(&portal, "/?year=2024&month=&menu=true", None).await;
    assert_eq!(texts(&html, "#monthYear"), ["Septiembre 2025"]);
    assert_eq!(texts(&html, "#sidebar.show").len(), 1);

    let (status, _, _) = send(
        &portal,
        Request::post("/theme?year=2025.5&menu=1").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_malformed_feed_fails_both_lists() {
    let portal = portal(Some("{\"articles\": [ oops"), true, None);
    let html = page(&portal, "/", None).await;

    assert_eq!(texts(&html, "#articles-list p.danger"), [ARTICLES_FAILED]);
    assert_eq!(texts(&html, "#rutinas-list p.danger"), [ROUTINES_FAILED]);
    assert_eq!(texts(&html, "#ranking-list tbody tr").len(), 3);
}

#[tokio::test]
async fn test_missing_ranking_file() {
    let portal = portal(Some(FEED), false, None);
    let html = page(&portal, "/", None).await;

    assert_eq!(texts(&html, "#ranking-list p.danger"), [RANKING_FAILED]);
    assert_eq!(texts(&html, "#articles-list article").len(), 2);
}

#[tokio::test]
async fn test_remote_ranking_not_found() {
    let base = upstream(
        Router::new().route("/articles.json", get(|| async { FEED })),
    )
    .await;

    let sources = (
        format!("{base}/articles.json").parse().unwrap(),
        format!("{base}/ranking.xlsx").parse().unwrap(),
    );
    let portal = portal(None, false, Some(sources));
    let html = page(&portal, "/?section=ranking", None).await;

    assert_eq!(texts(&html, "#ranking-list p.danger"), [RANKING_FAILED]);
    assert!(texts(&html, "#ranking-list table").is_empty());
    assert_eq!(texts(&html, "#articles-list article").len(), 2);
    assert_eq!(texts(&html, "#rutinas-list p.placeholder"), [NO_ROUTINES]);
}

#[tokio::test]
async fn test_theme_toggle_sets_cookie() {
    let portal = portal(Some(FEED), true, None);
    let (status, headers, _) = send(
        &portal,
        Request::post("/theme?year=2025&month=10&section=rutinas")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        headers[header::LOCATION],
        "/?year=2025&month=10&section=rutinas"
    );
    let cookie = headers[header::SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("theme=dark"));

    let html = page(&portal, "/", Some("theme=dark")).await;
    assert_eq!(texts(&html, "html[data-theme=dark]").len(), 1);
    assert_eq!(texts(&html, "button.theme-icon"), ["☀️"]);
}

#[tokio::test]
async fn test_consent_gates_ads() {
    let portal = portal(Some(FEED), true, None);
    let (status, headers, _) = send(
        &portal,
        Request::post("/consent/accept").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert!(headers[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .starts_with("ads_consent=yes"));

    let granted = page(&portal, "/", Some("ads_consent=yes")).await;
    assert!(texts(&granted, ".consent-banner").is_empty());
    assert_eq!(
        texts(&granted, "script[src*='adsbygoogle.js?client=ca-pub-test']").len(),
        1
    );
    assert_eq!(
        texts(&granted, ".ad-slot[data-ad-slot='42'] ins.adsbygoogle").len(),
        1
    );

    let denied = page(&portal, "/", Some("ads_consent=no")).await;
    assert!(texts(&denied, ".consent-banner").is_empty());
    assert!(texts(&denied, "ins.adsbygoogle").is_empty());
}

#[tokio::test]
async fn test_calendar_feed_and_fallback() {
    let portal = portal(Some(FEED), true, None);

    let (status, headers, body) = send(
        &portal,
        Request::get("/calendar.ics").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/calendar");
    assert!(body.starts_with("BEGIN:VCALENDAR"));
    assert_eq!(body.matches("BEGIN:VEVENT").count(), 5);

    let (status, headers, _) = send(
        &portal,
        Request::get("/index.html").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(headers[header::LOCATION], "/");

    let (status, _, body) = send(
        &portal,
        Request::get("/healthz").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
}

#[test]
fn test_fixture_exists() {
    assert!(Path::new(FIXTURE).is_file());
}
