use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::Event;

macro_rules! tournament {
    ($title:expr, $category:expr, ($year:expr, $month:expr, $day:expr), $time:expr, $link:expr) => {
        Event {
            title: $title.into(),
            category: $category.into(),
            date: NaiveDate::from_ymd_opt($year, $month, $day).unwrap(),
            time: Some($time.into()),
            link: Some($link.into()),
        }
    };
}

/// Tournaments shown on the calendar, in display order.
pub static SCHEDULE: Lazy<Vec<Event>> = Lazy::new(|| {
    vec![
        tournament!(
            "Czech Open (ET 11)",
            "pdc",
            (2025, 9, 5),
            "13:00",
            "https://www.pdc.tv/tournament/gambrinus-czech-darts-open-et11"
        ),
        tournament!(
            "Catalonia Open",
            "wdf",
            (2025, 9, 6),
            "11:00",
            "https://www.dardscatalunya.cat/noticies/8/2126/live-scores-13th-catalonia-open-fcd-anniversary-2025"
        ),
        tournament!(
            "Players Championship 26",
            "pdc",
            (2025, 9, 9),
            "13:00",
            "https://www.pdc.tv/tournament/players-championship-26-3"
        ),
        tournament!(
            "WSOD Finals",
            "pdc",
            (2025, 9, 12),
            "19:00",
            "https://www.pdc.tv/tournament/jacks-casino-world-series-darts-finals-0"
        ),
        tournament!(
            "Italian Open",
            "wdf",
            (2025, 9, 13),
            "10:00",
            "https://dartswdf.com/competitions/italian-open/2025"
        ),
    ]
});
