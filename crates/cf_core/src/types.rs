use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub bio: String,
}

/// One row of the conference timeline.
///
/// `T` is the speaker-bearing part of the row: [`RawTalk`] straight out of
/// the page, [`Talk`] once speakers have been joined in. Rows without a
/// speaker (breaks, lunch) carry no talk at all and serialize with only
/// `title`, `starts` and `duration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleItem<T = Talk> {
    pub title: String,
    #[serde(flatten)]
    pub talk: Option<T>,
    #[serde(with = "js_timestamp")]
    pub starts: DateTime<Utc>,
    /// Minutes; `None` when the page gave no readable number
    pub duration: Option<u32>,
}

pub type RawScheduleItem = ScheduleItem<RawTalk>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTalk {
    pub speaker: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talk {
    /// `None` when the named speaker has no card on the page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<Speaker>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Speakers,
    Schedule,
}

impl Resource {
    pub const ALL: [Resource; 2] = [Resource::Speakers, Resource::Schedule];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Speakers => "speakers",
            Resource::Schedule => "schedule",
        }
    }

    pub fn uri(&self) -> &'static str {
        match self {
            Resource::Speakers => "/speakers",
            Resource::Schedule => "/schedule",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Resource::Speakers => "Retrieves the list of Elm Europe conference speakers",
            Resource::Schedule => "Retrieves the list of Elm Europe conference talks",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "speakers" => Ok(Resource::Speakers),
            "schedule" => Ok(Resource::Schedule),
            other => Err(Error::Config(format!("Unknown resource: {}", other))),
        }
    }
}

/// Timestamps on the wire look like `Date.prototype.toJSON` output:
/// UTC with millisecond precision, e.g. `2017-06-12T10:00:00.000Z`.
pub mod js_timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn starts() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2017, 6, 12, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_row_without_talk_has_only_time_fields() {
        let item: ScheduleItem = ScheduleItem {
            title: "Lunch".to_string(),
            talk: None,
            starts: starts(),
            duration: Some(60),
        };

        let value = serde_json::to_value(&item).unwrap();
        let keys: Vec<&String> = value.as_object().unwrap().keys().collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(
            value,
            json!({ "title": "Lunch", "starts": "2017-06-12T10:00:00.000Z", "duration": 60 })
        );
    }

    #[test]
    fn test_unmatched_speaker_keeps_description() {
        let item = ScheduleItem {
            title: "Elm at scale".to_string(),
            talk: Some(Talk { speaker: None, description: "War stories".to_string() }),
            starts: starts(),
            duration: None,
        };

        let value = serde_json::to_value(&item).unwrap();
        assert!(value.get("speaker").is_none());
        assert_eq!(value["description"], "War stories");
        assert!(value["duration"].is_null());
    }

    #[test]
    fn test_speaker_without_image_omits_field() {
        let speaker = Speaker {
            name: "Ada Lovelace".to_string(),
            image: None,
            bio: "Wrote the first program.".to_string(),
        };
        let value = serde_json::to_value(&speaker).unwrap();
        assert_eq!(value, json!({ "name": "Ada Lovelace", "bio": "Wrote the first program." }));
    }

    #[test]
    fn test_schedule_item_reads_back() {
        let raw = json!({
            "title": "Keynote",
            "speaker": "Ada Lovelace",
            "description": "Opening",
            "starts": "2017-06-12T10:00:00.000Z",
            "duration": 45
        });
        let item: RawScheduleItem = serde_json::from_value(raw).unwrap();
        assert_eq!(item.talk.unwrap().speaker, "Ada Lovelace");
        assert_eq!(item.starts, starts());
        assert_eq!(item.duration, Some(45));
    }

    #[test]
    fn test_resource_parsing() {
        assert_eq!("speakers".parse::<Resource>().unwrap(), Resource::Speakers);
        assert_eq!(" Schedule ".parse::<Resource>().unwrap(), Resource::Schedule);
        assert!("talks".parse::<Resource>().is_err());
        assert_eq!(Resource::Schedule.uri(), "/schedule");
    }
}
