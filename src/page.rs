use infodarts_core::calendar::build_grid;
use infodarts_core::tournaments::SCHEDULE;
use infodarts_core::{view, Action, AppState, Consent, ContentOutcome, RankingOutcome, Section};
use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::loader::AdsConfig;

const CSS: &str = r#"
:root { --bg: #f6f7fb; --surface: #fff; --text: #1c1f2a; --text-secondary: #5d6475; --accent: #d7263d; --danger: #b00020; }
[data-theme="dark"] { --bg: #12141b; --surface: #1d2030; --text: #eef0f6; --text-secondary: #a3a9bb; --accent: #ff5a6e; --danger: #ff6b81; }
body { margin: 0; font-family: system-ui, sans-serif; background: var(--bg); color: var(--text); }
header { display: flex; align-items: center; gap: 12px; padding: 12px 16px; background: var(--surface); }
header h1 { flex: 1; margin: 0; font-size: 1.3rem; }
a { color: inherit; }
#sidebar { position: fixed; top: 0; left: -280px; width: 260px; height: 100%; padding: 16px; background: var(--surface); transition: left .2s; z-index: 20; }
#sidebar.show { left: 0; }
#sidebar a { display: block; padding: 8px 0; text-decoration: none; }
#sidebar a.active { color: var(--accent); font-weight: 600; }
#overlay { display: none; position: fixed; inset: 0; background: rgba(0,0,0,.4); z-index: 10; }
#overlay.show { display: block; }
main { max-width: 1100px; margin: 0 auto; padding: 16px; }
.section { display: none; }
.section.active { display: block; }
.calendar-header { display: flex; align-items: center; justify-content: space-between; }
.weekdays, .calendar-grid { display: grid; grid-template-columns: repeat(7, 1fr); gap: 4px; }
.weekdays div { text-align: center; color: var(--text-secondary); }
.day { min-height: 84px; padding: 4px; background: var(--surface); border-radius: 6px; }
.day.other-month { opacity: .45; }
.day.today { outline: 2px solid var(--accent); }
.event { display: block; margin-top: 4px; padding: 2px 4px; font-size: .75rem; border-radius: 4px; background: var(--bg); text-decoration: none; }
.event.pdc { border-left: 3px solid var(--accent); }
.event.wdf { border-left: 3px solid #2a9d8f; }
.article-container { margin-bottom: 12px; padding: 12px; background: var(--surface); border-radius: 8px; }
.article-container a { text-decoration: none; }
.article-container img { max-width: 100%; border-radius: 6px; }
.placeholder { text-align: center; color: var(--text-secondary); }
.placeholder.danger { color: var(--danger); }
.ranking-table { width: 100%; border-collapse: collapse; }
.ranking-table th, .ranking-table td { padding: 6px; border-bottom: 1px solid var(--bg); text-align: left; }
.consent-banner { position: fixed; bottom: 0; left: 0; right: 0; display: flex; gap: 12px; align-items: center; justify-content: space-between; padding: 12px 16px; background: var(--surface); box-shadow: 0 -2px 8px rgba(0,0,0,.15); }
.consent-banner form { display: inline; }
.btn { padding: 6px 12px; border: 1px solid var(--text-secondary); border-radius: 6px; background: none; color: inherit; cursor: pointer; }
.btn-primary { background: var(--accent); border-color: var(--accent); color: #fff; }
.theme-toggle { border: none; background: none; font-size: 1.2rem; cursor: pointer; }
"#;

/// Query string that reproduces `state` on the next request.
pub fn query_string(state: &AppState) -> String {
    let mut query = format!(
        "?year={}&month={}&section={}",
        state.view.year(),
        state.view.month() + 1,
        state.section
    );
    if state.menu_open {
        query.push_str("&menu=true");
    }
    query
}

pub fn page_href(state: &AppState) -> String {
    format!("/{}", query_string(state))
}

fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn action_form(path: &str, state: &AppState, class: &str, label: &str) -> Markup {
    html! {
        form method="post" action={ (path) (query_string(state)) } {
            button type="submit" class=(class) { (label) }
        }
    }
}

fn ad_slots(ads: &AdsConfig, consent: Consent) -> Markup {
    html! {
        @for slot in &ads.slots {
            div.ad-slot data-ad-slot=(slot) {
                @if consent.allows_ads() {
                    ins.adsbygoogle style="display:block" data-ad-client=(ads.client) data-ad-slot=(slot)
                        data-ad-format="auto" data-full-width-responsive="true" {}
                    script { (PreEscaped("(adsbygoogle = window.adsbygoogle || []).push({});")) }
                }
            }
        }
    }
}

fn consent_banner(state: &AppState) -> Markup {
    html! {
        div.consent-banner role="dialog" {
            p { "Usamos cookies para mejorar la experiencia y mostrar anuncios. ¿Aceptas anuncios personalizados?" }
            div {
                (action_form("/consent/accept", state, "btn btn-primary consent-accept", "Aceptar"))
                (action_form("/consent/deny", state, "btn consent-deny", "Rechazar"))
            }
        }
    }
}

fn sidebar(state: &AppState) -> Markup {
    let close = page_href(&state.reduce(Action::CloseMenu));
    html! {
        nav #sidebar .show[state.menu_open] aria-hidden=(flag(!state.menu_open)) {
            a #sidebarClose href=(close) aria-label="Cerrar menú" { "✕" }
            @for section in Section::ALL {
                a.active[section == state.section] data-section=(section.id())
                    href=(page_href(&state.reduce(Action::Navigate(section)))) {
                    (section.label())
                }
            }
        }
        a #overlay .show[state.menu_open] href=(close) tabindex="-1" aria-hidden="true" {}
    }
}

fn section(id: Section, state: &AppState, body: Markup) -> Markup {
    html! {
        section.section.active[id == state.section] id=(id.id()) {
            h2 { (id.label()) }
            (body)
        }
    }
}

pub fn render(
    state: &AppState,
    content: &ContentOutcome,
    ranking: &RankingOutcome,
    ads: &AdsConfig,
) -> Markup {
    let cells = build_grid(state.view, state.today, &SCHEDULE);
    let prev = page_href(&state.reduce(Action::PrevMonth));
    let next = page_href(&state.reduce(Action::NextMonth));

    html! {
        (DOCTYPE)
        html lang="es" data-theme=(state.theme.as_str()) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "InfoDarts" }
                style { (PreEscaped(CSS)) }
                @if state.consent.allows_ads() {
                    script async src=(ads.script_src()) crossorigin="anonymous" {}
                }
            }
            body {
                header {
                    a #menuToggle href=(page_href(&state.reduce(Action::OpenMenu)))
                        aria-expanded=(flag(state.menu_open)) aria-controls="sidebar" { "☰" }
                    h1 { "🎯 InfoDarts" }
                    (action_form("/theme", state, "theme-toggle theme-icon", state.theme.icon()))
                }
                (sidebar(state))
                main {
                    (section(Section::Calendar, state, html! {
                        (view::calendar(state.view, &cells, &prev, &next))
                        p { a href="/calendar.ics" { "Suscribirse al calendario" } }
                    }))
                    (section(Section::Articles, state, html! {
                        div #articles-list { (view::articles(content)) }
                    }))
                    (section(Section::Routines, state, html! {
                        div #rutinas-list { (view::routines(content)) }
                    }))
                    (section(Section::Ranking, state, html! {
                        div #ranking-list { (view::ranking(ranking)) }
                    }))
                    (ad_slots(ads, state.consent))
                }
                @if state.consent == Consent::Unset {
                    (consent_banner(state))
                }
            }
        }
    }
}
