pub mod fetcher;
pub mod layouts;
pub mod logging;
pub mod schedule_text;
pub mod conference;

pub use fetcher::HttpFetcher;
pub use layouts::{ElmEuropeLayout, PageLayout};
pub use schedule_text::{parse_schedule_text, ScheduleSlot};
pub use conference::ConferenceScraper;
