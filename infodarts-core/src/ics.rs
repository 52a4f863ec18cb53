use chrono::NaiveTime;
use ics::{
    parameters::{TzIDParam, Value},
    properties::{Categories, DtStart, RRule, Summary, TzName, URL},
    Daylight, ICalendar, Standard, TimeZone,
};

use crate::Event;

const TZID: &str = "Europe/Madrid";

fn timezone() -> TimeZone<'static> {
    let mut cet_standard = Standard::new("19701025T030000", "+0200", "+0100");
    cet_standard.push(TzName::new("CET"));
    cet_standard.push(RRule::new("FREQ=YEARLY;BYMONTH=10;BYDAY=-1SU"));

    let mut cest_daylight = Daylight::new("19700329T020000", "+0100", "+0200");
    cest_daylight.push(TzName::new("CEST"));
    cest_daylight.push(RRule::new("FREQ=YEARLY;BYMONTH=3;BYDAY=-1SU"));

    let mut timezone = TimeZone::daylight(TZID, cest_daylight);
    timezone.add_standard(cet_standard);
    timezone
}

/// Builds a subscribable calendar out of the tournament schedule.
#[must_use]
pub fn to_ics<'a>(name: &'a str, events: &'a [Event]) -> ICalendar<'a> {
    let mut icalendar = ICalendar::new("2.0", name);
    icalendar.add_timezone(timezone());

    for event in events {
        icalendar.add_event(event.to_ics());
    }

    icalendar
}

impl Event {
    #[must_use]
    pub fn to_ics(&self) -> ics::Event<'_> {
        let date = self.date.format("%Y%m%d").to_string();

        let start_time = self
            .time
            .as_deref()
            .and_then(|time| NaiveTime::parse_from_str(time, "%H:%M").ok());

        let id = format!("{}_{}@infodarts", date, self.title.replace(' ', "-"));
        let mut ics_event = ics::Event::new(id, format!("{date}T000000Z"));

        match start_time {
            Some(time) => {
                let mut start = DtStart::new(format!("{date}T{}00", time.format("%H%M")));
                start.add(TzIDParam::new(TZID));
                ics_event.push(start);
            }
            None => {
                let mut start = DtStart::new(date);
                start.add(Value::DATE);
                ics_event.push(start);
            }
        }

        ics_event.push(Summary::new(ics::escape_text(self.title.as_str())));
        ics_event.push(Categories::new(self.category.to_uppercase()));

        if let Some(link) = &self.link {
            ics_event.push(URL::new(link));
        }

        ics_event
    }
}
