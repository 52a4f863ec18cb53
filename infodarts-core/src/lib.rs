mod structs;

pub mod calendar;
pub mod capability;
pub mod feed;
pub mod ranking;
pub mod state;
pub mod tournaments;
pub mod view;

#[cfg(feature = "ics")]
mod ics;

pub use calendar::{build_grid, GridCell, MonthRelation, MonthView};
pub use capability::{Capability, CapabilityError};
pub use feed::{parse_feed, FeedError};
#[cfg(feature = "ics")]
pub use self::ics::to_ics;
pub use ranking::{parse_ranking, RankingError};
pub use state::{Action, AppState, Consent, Section, Theme};
pub use structs::{Article, Event, Feed, RankingRow, Routine};
pub use view::{ContentOutcome, RankingOutcome};
