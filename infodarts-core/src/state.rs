use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;

use crate::calendar::MonthView;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Icon of the toggle button, showing what the next theme looks like.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }

    /// Unknown stored values fall back to the light theme.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Section {
    #[default]
    Calendar,
    Articles,
    Routines,
    Ranking,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Calendar,
        Section::Articles,
        Section::Routines,
        Section::Ranking,
    ];

    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Section::Calendar => "calendario",
            Section::Articles => "articulos",
            Section::Routines => "rutinas",
            Section::Ranking => "ranking",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Section::Calendar => "Calendario",
            Section::Articles => "Artículos",
            Section::Routines => "Rutinas",
            Section::Ranking => "Ranking",
        }
    }

    /// Resolves a panel identifier, with or without a leading `#`. Anything
    /// unknown lands on the calendar.
    #[must_use]
    pub fn resolve(id: &str) -> Self {
        id.trim_start_matches('#').parse().unwrap_or_default()
    }
}

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.id() == s)
            .ok_or(UnknownSection)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown section")]
pub struct UnknownSection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Consent {
    #[default]
    Unset,
    Granted,
    Denied,
}

impl Consent {
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("yes") => Consent::Granted,
            Some("no") => Consent::Denied,
            _ => Consent::Unset,
        }
    }

    #[must_use]
    pub fn stored(self) -> Option<&'static str> {
        match self {
            Consent::Unset => None,
            Consent::Granted => Some("yes"),
            Consent::Denied => Some("no"),
        }
    }

    #[must_use]
    pub fn allows_ads(self) -> bool {
        self == Consent::Granted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ToggleTheme,
    Navigate(Section),
    PrevMonth,
    NextMonth,
    OpenMenu,
    CloseMenu,
    AcceptAds,
    DenyAds,
}

/// Everything the page needs to know about the visitor's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppState {
    pub today: NaiveDate,
    pub theme: Theme,
    pub section: Section,
    pub view: MonthView,
    pub menu_open: bool,
    pub consent: Consent,
}

impl AppState {
    /// Fresh state for a visitor: calendar section showing today's month.
    #[must_use]
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today,
            theme: Theme::default(),
            section: Section::default(),
            view: MonthView::containing(today),
            menu_open: false,
            consent: Consent::default(),
        }
    }

    #[must_use]
    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::ToggleTheme => Self {
                theme: self.theme.toggled(),
                ..self
            },
            Action::Navigate(section) => Self {
                section,
                menu_open: false,
                ..self
            },
            Action::PrevMonth => Self {
                view: self.view.advance(-1),
                ..self
            },
            Action::NextMonth => Self {
                view: self.view.advance(1),
                ..self
            },
            Action::OpenMenu => Self {
                menu_open: true,
                ..self
            },
            Action::CloseMenu => Self {
                menu_open: false,
                ..self
            },
            Action::AcceptAds => Self {
                consent: Consent::Granted,
                ..self
            },
            Action::DenyAds => Self {
                consent: Consent::Denied,
                ..self
            },
        }
    }
}
