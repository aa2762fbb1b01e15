use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use cf_core::{Error, Result};

/// Hour assumed when a date phrase carries no time of day
const IMPLIED_HOUR: u32 = 12;

const MONTHS: [&str; 12] = [
    "january", "february", "march", "april", "may", "june",
    "july", "august", "september", "october", "november", "december",
];

const WEEKDAYS: [&str; 7] = [
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleSlot {
    pub starts: DateTime<Utc>,
    /// Minutes; `None` when the duration field holds no number
    pub duration: Option<u32>,
}

/// Parse the muted subtitle of a timeline panel, e.g.
/// `"Monday, 12 June, 2017, 45 minutes"`.
///
/// The first three comma-separated fields form the date phrase and the
/// fourth the duration. Anything past the fourth field is ignored.
pub fn parse_schedule_text(text: &str, timezone: Tz) -> Result<ScheduleSlot> {
    let segments: Vec<&str> = text.split(',').map(str::trim).collect();
    if segments.len() < 4 {
        return Err(Error::ScheduleText(format!(
            "expected weekday, day, year and duration, got {} field(s) in {:?}",
            segments.len(),
            text
        )));
    }

    let phrase = segments[..3].join(" ");
    let starts = parse_date_phrase(&phrase, timezone)?;
    let duration = leading_integer(&segments[3].replace("minutes", ""));

    Ok(ScheduleSlot { starts, duration })
}

/// Resolve a loose English date phrase in `timezone`.
///
/// Day, month and year must all be present. Weekday names and unknown
/// words are skipped; a time such as `09:30`, `9am` or `2:15pm` overrides
/// the implied noon.
pub fn parse_date_phrase(phrase: &str, timezone: Tz) -> Result<DateTime<Utc>> {
    let mut day = None;
    let mut month = None;
    let mut year = None;
    let mut time = None;

    for raw in phrase.split_whitespace() {
        let token = raw
            .trim_matches(|c: char| c == ',' || c == '.')
            .to_lowercase();
        if token.is_empty() || is_weekday(&token) {
            continue;
        }
        if let Some(m) = month_number(&token) {
            month.get_or_insert(m);
        } else if let Some(t) = parse_time(&token) {
            time.get_or_insert(t);
        } else if let Some(n) = parse_number(&token) {
            if n >= 1000 {
                if let Ok(n) = i32::try_from(n) {
                    year.get_or_insert(n);
                }
            } else if (1..=31).contains(&n) && day.is_none() {
                day = Some(n);
            }
        }
    }

    let missing = |what: &str| Error::ScheduleText(format!("no {} in date {:?}", what, phrase));
    let day = day.ok_or_else(|| missing("day"))?;
    let month = month.ok_or_else(|| missing("month"))?;
    let year = year.ok_or_else(|| missing("year"))?;
    let (hour, minute) = time.unwrap_or((IMPLIED_HOUR, 0));

    let local = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| Error::ScheduleText(format!("no such date {:?}", phrase)))?;

    timezone
        .from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| {
            Error::ScheduleText(format!("{:?} does not exist in {}", phrase, timezone.name()))
        })
}

fn month_number(token: &str) -> Option<u32> {
    if token.len() < 3 {
        return None;
    }
    MONTHS
        .iter()
        .position(|name| name.starts_with(token))
        .map(|i| i as u32 + 1)
}

fn is_weekday(token: &str) -> bool {
    token.len() >= 3 && WEEKDAYS.iter().any(|name| name.starts_with(token))
}

/// Digits with an optional ordinal suffix (`12`, `12th`, `1st`)
fn parse_number(token: &str) -> Option<u32> {
    let digits = ["st", "nd", "rd", "th"]
        .iter()
        .find_map(|suffix| token.strip_suffix(suffix))
        .unwrap_or(token);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn parse_time(token: &str) -> Option<(u32, u32)> {
    let (clock, pm) = if let Some(rest) = token.strip_suffix("am") {
        (rest, Some(false))
    } else if let Some(rest) = token.strip_suffix("pm") {
        (rest, Some(true))
    } else {
        (token, None)
    };

    let (hour, minute) = match clock.split_once(':') {
        Some((h, m)) => (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?),
        None if pm.is_some() => (clock.parse::<u32>().ok()?, 0),
        None => return None,
    };
    if minute > 59 {
        return None;
    }

    match pm {
        Some(_) if hour == 0 || hour > 12 => None,
        Some(pm) => Some((hour % 12 + if pm { 12 } else { 0 }, minute)),
        None if hour > 23 => None,
        None => Some((hour, minute)),
    }
}

/// Leading run of digits after optional whitespace, like `parseInt`
fn leading_integer(text: &str) -> Option<u32> {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].parse().ok()
}
