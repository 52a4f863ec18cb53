use maud::{html, Markup};

use crate::calendar::{GridCell, MonthRelation, MonthView, WEEKDAY_NAMES};
use crate::{Article, Event, Feed, RankingRow, Routine};

pub const NO_ARTICLES: &str = "No hay artículos disponibles.";
pub const NO_ROUTINES: &str = "No hay rutinas disponibles.";
pub const NO_RANKING: &str = "No hay datos de ranking disponibles.";
pub const ARTICLES_FAILED: &str = "Error al cargar los artículos.";
pub const ROUTINES_FAILED: &str = "Error al cargar las rutinas.";
pub const RANKING_FAILED: &str = "Error al cargar el ranking.";
pub const RANKING_UNAVAILABLE: &str = "Error al cargar la biblioteca de Excel.";

/// Result of loading the content feed. Both card lists render from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentOutcome {
    Loaded(Feed),
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingOutcome {
    Loaded(Vec<RankingRow>),
    Failed,
    /// The reader behind the spreadsheet could not be prepared, so nothing
    /// was fetched or parsed. Rendered with [`RANKING_UNAVAILABLE`], the
    /// message the portal has always shown when its spreadsheet reader fails
    /// to come up, whatever part of the reader failed.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Muted,
    Danger,
}

#[must_use]
pub fn placeholder(message: &str, tone: Tone) -> Markup {
    html! {
        p.placeholder.danger[tone == Tone::Danger] { (message) }
    }
}

#[must_use]
pub fn article_card(article: &Article) -> Markup {
    html! {
        article.article-container {
            a href=(article.link()) {
                @if let Some(image) = &article.image {
                    img src=(image) alt=(article.title) loading="lazy";
                }
                h3 { (article.title) }
                p { (article.summary.as_deref().unwrap_or_default()) }
            }
        }
    }
}

#[must_use]
pub fn routine_card(routine: &Routine) -> Markup {
    html! {
        article.article-container {
            a href=(routine.link()) {
                @if let Some(image) = &routine.image {
                    img src=(image) alt=(routine.title) loading="lazy";
                }
                h3 { (routine.title) }
                p { (routine.summary.as_deref().unwrap_or_default()) }
            }
        }
    }
}

fn card_list<T>(items: &[T], card: fn(&T) -> Markup, empty: &str) -> Markup {
    html! {
        @if items.is_empty() {
            (placeholder(empty, Tone::Muted))
        } @else {
            @for item in items {
                (card(item))
            }
        }
    }
}

#[must_use]
pub fn articles(outcome: &ContentOutcome) -> Markup {
    match outcome {
        ContentOutcome::Loaded(feed) => card_list(&feed.articles, article_card, NO_ARTICLES),
        ContentOutcome::Failed => placeholder(ARTICLES_FAILED, Tone::Danger),
    }
}

#[must_use]
pub fn routines(outcome: &ContentOutcome) -> Markup {
    match outcome {
        ContentOutcome::Loaded(feed) => card_list(&feed.routines, routine_card, NO_ROUTINES),
        ContentOutcome::Failed => placeholder(ROUTINES_FAILED, Tone::Danger),
    }
}

fn or_dash(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or("-")
}

#[must_use]
pub fn ranking_table(rows: &[RankingRow]) -> Markup {
    html! {
        table.ranking-table {
            thead {
                tr {
                    th { "#" }
                    th { "Jugador" }
                    th { "Puntos" }
                    th { "PDC desde" }
                    th { "Top 64" }
                }
            }
            tbody {
                @for row in rows {
                    tr {
                        td { strong { (or_dash(&row.position)) } }
                        td { (or_dash(&row.player)) }
                        td { (or_dash(&row.points)) }
                        td { (or_dash(&row.member_since)) }
                        td { @if row.top_tier { (crate::ranking::TOP_TIER_MARK) } }
                    }
                }
            }
        }
    }
}

#[must_use]
pub fn ranking(outcome: &RankingOutcome) -> Markup {
    match outcome {
        RankingOutcome::Loaded(rows) if rows.is_empty() => placeholder(NO_RANKING, Tone::Muted),
        RankingOutcome::Loaded(rows) => ranking_table(rows),
        RankingOutcome::Failed => placeholder(RANKING_FAILED, Tone::Danger),
        RankingOutcome::Unavailable => placeholder(RANKING_UNAVAILABLE, Tone::Danger),
    }
}

fn event_label(event: &Event) -> String {
    match &event.time {
        Some(time) => format!("{} — {}", event.title, time),
        None => event.title.clone(),
    }
}

#[must_use]
pub fn calendar_event(event: &Event) -> Markup {
    let class = format!("event {}", event.category);
    html! {
        @if let Some(link) = &event.link {
            a class=(class) href=(link) title=(event.title) target="_blank" rel="noopener noreferrer" {
                (event_label(event))
            }
        } @else {
            div class=(class) title=(event.title) { (event_label(event)) }
        }
    }
}

#[must_use]
pub fn calendar_cell(cell: &GridCell<'_>) -> Markup {
    html! {
        div.day.other-month[cell.relation != MonthRelation::Current].today[cell.is_today] {
            div.num { (cell.day) }
            @for event in &cell.events {
                (calendar_event(event))
            }
        }
    }
}

/// Month header with prev/next links and the day grid.
#[must_use]
pub fn calendar(view: MonthView, cells: &[GridCell<'_>], prev_href: &str, next_href: &str) -> Markup {
    html! {
        div.calendar-header {
            a #prevMonth href=(prev_href) aria-label="Mes anterior" { "‹" }
            h2 #monthYear { (view.title()) }
            a #nextMonth href=(next_href) aria-label="Mes siguiente" { "›" }
        }
        div.weekdays {
            @for name in WEEKDAY_NAMES {
                div { (name) }
            }
        }
        div #calendarGrid .calendar-grid {
            @for cell in cells {
                (calendar_cell(cell))
            }
        }
    }
}
