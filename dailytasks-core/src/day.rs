//! Calendar-day keys.
//!
//! A day is persisted as an 8-digit `DDMMYYYY` string (zero padded, no
//! separators). Two instants on the same calendar day always map to the same key.
//! Only years 0 through 9999 fit that form, so every constructor rejects the rest.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

const DAY_FORMAT: &str = "%d%m%Y";

const YEARS: RangeInclusive<i32> = 0..=9999;

static DAY_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{8}$").expect("valid day key pattern"));

static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid iso date pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Result<Self, CoreError> {
        if !YEARS.contains(&date.year()) {
            return Err(CoreError::InvalidDate(date.to_string()));
        }
        Ok(Self(date))
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, CoreError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| CoreError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))
            .and_then(Self::new)
    }

    /// The calendar day `instant` falls on in its own time zone.
    pub fn of<Tz: TimeZone>(instant: &DateTime<Tz>) -> Result<Self, CoreError> {
        Self::new(instant.date_naive())
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }

    pub fn pred(self) -> Option<Self> {
        self.0.pred_opt().and_then(|d| Self::new(d).ok())
    }

    /// Parses either the persisted `DDMMYYYY` form or ISO `YYYY-MM-DD`.
    pub fn parse_flexible(s: &str) -> Result<Self, CoreError> {
        let s = s.trim();
        if ISO_DATE_RE.is_match(s) {
            return NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(Self)
                .map_err(|_| CoreError::InvalidDate(s.to_string()));
        }
        s.parse()
    }

    pub fn iso(self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.0.year(),
            self.0.month(),
            self.0.day()
        )
    }
}

impl TryFrom<NaiveDate> for DayKey {
    type Error = CoreError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        Self::new(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DAY_FORMAT))
    }
}

impl FromStr for DayKey {
    type Err = CoreError;

    /// Strict `DDMMYYYY`: chrono alone would also accept unpadded fields.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !DAY_KEY_RE.is_match(s) {
            return Err(CoreError::InvalidDate(s.to_string()));
        }
        NaiveDate::parse_from_str(s, DAY_FORMAT)
            .map(Self)
            .map_err(|_| CoreError::InvalidDate(s.to_string()))
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DayKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn formats_zero_padded() {
        let day = DayKey::from_ymd(2024, 12, 25).unwrap();
        assert_eq!(day.to_string(), "25122024");
        let day = DayKey::from_ymd(2024, 1, 5).unwrap();
        assert_eq!(day.to_string(), "05012024");
    }

    #[test]
    fn parses_persisted_form() {
        let day: DayKey = "01012024".parse().unwrap();
        assert_eq!(day, DayKey::from_ymd(2024, 1, 1).unwrap());
    }

    #[test]
    fn rejects_malformed_keys() {
        assert!("1012024".parse::<DayKey>().is_err());
        assert!("01-01-2024".parse::<DayKey>().is_err());
        assert!("32012024".parse::<DayKey>().is_err());
        assert!("".parse::<DayKey>().is_err());
    }

    #[test]
    fn time_of_day_does_not_matter() {
        let morning = Utc.with_ymd_and_hms(2024, 3, 9, 0, 1, 0).unwrap();
        let night = Utc.with_ymd_and_hms(2024, 3, 9, 23, 59, 59).unwrap();
        assert_eq!(DayKey::of(&morning).unwrap(), DayKey::of(&night).unwrap());
    }

    #[test]
    fn day_follows_local_offset() {
        let tz = FixedOffset::west_opt(6 * 3600).unwrap();
        let instant = tz.with_ymd_and_hms(2024, 3, 9, 22, 0, 0).unwrap();
        assert_eq!(DayKey::of(&instant).unwrap().to_string(), "09032024");
        assert_eq!(
            DayKey::of(&instant.with_timezone(&Utc)).unwrap().to_string(),
            "10032024"
        );
    }

    #[test]
    fn years_outside_four_digits_are_rejected() {
        assert!(matches!(
            DayKey::from_ymd(10000, 1, 1),
            Err(CoreError::InvalidDate(_))
        ));
        assert!(DayKey::from_ymd(-1, 12, 31).is_err());
        let far = NaiveDate::from_ymd_opt(12345, 6, 7).unwrap();
        assert!(DayKey::try_from(far).is_err());

        let edge = DayKey::from_ymd(9999, 12, 31).unwrap();
        assert_eq!(edge.to_string(), "31129999");
        let first = DayKey::from_ymd(0, 1, 1).unwrap();
        assert_eq!(first.to_string(), "01010000");
        assert_eq!(first.pred(), None);
    }

    #[test]
    fn flexible_parsing() {
        let iso = DayKey::parse_flexible("2024-12-25").unwrap();
        let persisted = DayKey::parse_flexible("25122024").unwrap();
        assert_eq!(iso, persisted);
        assert_eq!(iso.iso(), "2024-12-25");
        assert!(DayKey::parse_flexible("2024-13-01").is_err());
    }

    #[test]
    fn serde_uses_persisted_form() {
        let day = DayKey::from_ymd(2024, 12, 25).unwrap();
        assert_eq!(serde_json::to_string(&day).unwrap(), "\"25122024\"");
        let back: DayKey = serde_json::from_str("\"25122024\"").unwrap();
        assert_eq!(back, day);
        assert!(serde_json::from_str::<DayKey>("\"2024-12-25\"").is_err());
    }
}
