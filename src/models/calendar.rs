use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer};

/// Reads the calendar day out of `YYYY-MM-DD` or any timestamp that starts with it.
/// Everything after the date prefix (time, offset) is ignored.
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let prefix = value.trim().get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

pub fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_calendar_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date `{}`", raw)))
}

// Null and "" both mean "no date"
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => parse_calendar_date(&raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date `{}`", raw))),
    }
}

/// For partial updates: absent field -> `None`, explicit null -> `Some(None)`.
/// Pair with `#[serde(default)]`.
pub fn deserialize_date_change<'de, D>(
    deserializer: D,
) -> Result<Option<Option<NaiveDate>>, D::Error>
where
    D: Deserializer<'de>,
{
    deserialize_optional_date(deserializer).map(Some)
}
