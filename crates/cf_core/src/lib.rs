pub mod config;
pub mod error;
pub mod join;
pub mod source;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use join::join_schedule;
pub use source::{ConferenceSource, PageFetcher};
pub use types::{RawScheduleItem, RawTalk, Resource, ScheduleItem, Speaker, Talk};
