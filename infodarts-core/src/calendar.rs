use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::Event;

pub const MONTH_NAMES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

pub const WEEKDAY_NAMES: [&str; 7] = ["Lun", "Mar", "Mié", "Jue", "Vie", "Sáb", "Dom"];

/// The month currently shown by the calendar. Months are zero-based.
///
/// A view can only be constructed for months whose first day chrono can
/// represent, so every view has a well-defined first weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthView {
    first: NaiveDate,
}

impl MonthView {
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if month > 11 {
            return None;
        }

        NaiveDate::from_ymd_opt(year, month + 1, 1).map(|first| Self { first })
    }

    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date - chrono::Days::new(u64::from(date.day0())),
        }
    }

    #[must_use]
    pub fn year(&self) -> i32 {
        self.first.year()
    }

    #[must_use]
    pub fn month(&self) -> u32 {
        self.first.month0()
    }

    /// Moves the view by `delta` months, carrying into the year. At the edge
    /// of the representable date range the view stays where it is.
    #[must_use]
    pub fn advance(self, delta: i32) -> Self {
        let total = i64::from(self.year()) * 12 + i64::from(self.month()) + i64::from(delta);

        let (Ok(year), Ok(month)) = (
            i32::try_from(total.div_euclid(12)),
            u32::try_from(total.rem_euclid(12)),
        ) else {
            return self;
        };

        Self::new(year, month).unwrap_or(self)
    }

    #[must_use]
    pub fn title(&self) -> String {
        format!("{} {}", MONTH_NAMES[self.month() as usize], self.year())
    }

    #[must_use]
    pub fn days(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    fn contains(&self, date: NaiveDate, day: u32) -> bool {
        date.year() == self.year() && date.month0() == self.month() && date.day() == day
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonthRelation {
    Previous,
    Current,
    Next,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCell<'a> {
    pub day: u32,
    pub relation: MonthRelation,
    pub is_today: bool,
    pub events: Vec<&'a Event>,
}

impl GridCell<'_> {
    fn outside(day: u32, relation: MonthRelation) -> Self {
        Self {
            day,
            relation,
            is_today: false,
            events: Vec::new(),
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year.rem_euclid(4) == 0 && year.rem_euclid(100) != 0) || year.rem_euclid(400) == 0
}

#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 if is_leap_year(year) => 29,
        1 => 28,
        3 | 5 | 8 | 10 => 30,
        _ => 31,
    }
}

/// Lays out the month as whole Monday-first weeks. Cells before and after the
/// month show the neighbouring months' days and never carry events.
#[must_use]
pub fn build_grid<'a>(view: MonthView, today: NaiveDate, events: &'a [Event]) -> Vec<GridCell<'a>> {
    let first_weekday = view.first.weekday().num_days_from_monday();
    let days = view.days();

    let (prev_year, prev_month) = match view.month() {
        0 => (view.year() - 1, 11),
        month => (view.year(), month - 1),
    };
    let prev_days = days_in_month(prev_year, prev_month);

    let total = (first_weekday + days).div_ceil(7) * 7;
    let mut cells = Vec::with_capacity(total as usize);

    for day in (prev_days - first_weekday + 1)..=prev_days {
        cells.push(GridCell::outside(day, MonthRelation::Previous));
    }

    for day in 1..=days {
        cells.push(GridCell {
            day,
            relation: MonthRelation::Current,
            is_today: view.contains(today, day),
            events: events
                .iter()
                .filter(|event| view.contains(event.date, day))
                .collect(),
        });
    }

    for day in 1..=(total - first_weekday - days) {
        cells.push(GridCell::outside(day, MonthRelation::Next));
    }

    cells
}
