//! Calendar record codec - iCalendar generation and parsing
//!
//! Converts structured events into interchange-format records and parses
//! stored records back into structured data. All timestamps are
//! Europe/Helsinki civil time; the emitted records embed the zone's
//! daylight-saving rules so readers need no external timezone data.

pub mod event;
pub mod generate;
pub mod parse;
pub mod tz;

pub use event::CalendarEvent;
pub use generate::generate;
pub use parse::{parse, ParsedEvent};
