// Canonical tour-search criteria and the defaults used when a session has none
use chrono::{Duration, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// Default search values
pub const COUNTRY_DEFAULT: u32 = 338; // Egypt
pub const FROM_CITY_DEFAULT: u32 = 2014; // Kyiv
pub const MEAL_TYPE_DEFAULT: [u32; 6] = [388, 498, 496, 1956, 560, 512]; // any meal plan
pub const ADULTS_DEFAULT: u32 = 2;
pub const CHILDREN_DEFAULT: u32 = 0;
pub const HOTEL_RATINGS_DEFAULT: [u32; 2] = [78, 4]; // 5 and 4 stars
pub const NIGHT_FROM_DEFAULT: u32 = 6;
pub const NIGHT_TILL_DEFAULT: u32 = 10;

// Departure window relative to today: tomorrow .. tomorrow + 6 days
pub const DATE_FROM_OFFSET_DAYS: i64 = 1;
pub const DATE_TILL_OFFSET_DAYS: i64 = DATE_FROM_OFFSET_DAYS + 6;

// Wire format of dates, e.g. 19.10.26
pub const DATE_FORMAT: &str = "%d.%m.%y";

// Errors raised while turning request input into criteria
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CriteriaError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid number for {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid date for {field}: {value:?} (expected dd.mm.yy)")]
    InvalidDate { field: &'static str, value: String },

    #[error("Malformed search input: {0}")]
    Decode(String),
}

// Calendar date exchanged with the inventory API as `dd.mm.yy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TourDate(NaiveDate);

impl TourDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    // Day `days` after `today`
    pub fn days_after(today: NaiveDate, days: i64) -> Self {
        Self(today + Duration::days(days))
    }
}

impl fmt::Display for TourDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl FromStr for TourDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map(Self)
    }
}

impl From<NaiveDate> for TourDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl Serialize for TourDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TourDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// The full set of filter values behind one tour search.
// This is the record kept in the session: list fields are always stored as
// sequences, the `:`-joined form only exists in the outbound URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub country: u32,
    pub region: Option<Vec<u32>>,
    pub from_city: u32,
    pub meal_type: Vec<u32>,
    pub adult_amount: u32,
    pub child_amount: Option<u32>,
    pub child_age: Option<Vec<u32>>,
    pub hotel_rating: Vec<u32>,
    pub date_from: TourDate,
    pub date_till: TourDate,
    pub night_from: u32,
    pub night_till: u32,
}

// Departure window used whenever the caller supplies no dates
pub fn default_dates(today: NaiveDate) -> (TourDate, TourDate) {
    (
        TourDate::days_after(today, DATE_FROM_OFFSET_DAYS),
        TourDate::days_after(today, DATE_TILL_OFFSET_DAYS),
    )
}

// Default criteria with the departure window computed from the local date.
pub fn default_criteria() -> SearchCriteria {
    default_criteria_on(Local::now().date_naive())
}

pub fn default_criteria_on(today: NaiveDate) -> SearchCriteria {
    let (date_from, date_till) = default_dates(today);

    SearchCriteria {
        country: COUNTRY_DEFAULT,
        region: None,
        from_city: FROM_CITY_DEFAULT,
        meal_type: MEAL_TYPE_DEFAULT.to_vec(),
        adult_amount: ADULTS_DEFAULT,
        child_amount: Some(CHILDREN_DEFAULT),
        child_age: None,
        hotel_rating: HOTEL_RATINGS_DEFAULT.to_vec(),
        date_from,
        date_till,
        night_from: NIGHT_FROM_DEFAULT,
        night_till: NIGHT_TILL_DEFAULT,
    }
}
