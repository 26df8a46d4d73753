// Request input boundary: loosely-typed form fields become SearchCriteria here
use crate::criteria::{
    default_dates, CriteriaError, SearchCriteria, TourDate, HOTEL_RATINGS_DEFAULT,
    MEAL_TYPE_DEFAULT, NIGHT_FROM_DEFAULT, NIGHT_TILL_DEFAULT,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::{Map, Value};

// Separator between ids in a delimited list field, e.g. "78:4"
pub const LIST_DELIMITER: char = ':';

// A scalar as it arrives from a JSON body or an HTML form post
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(i64),
    Text(String),
}

impl FormValue {
    fn is_blank(&self) -> bool {
        matches!(self, FormValue::Text(s) if s.trim().is_empty())
    }

    pub fn to_u32(&self, field: &'static str) -> Result<u32, CriteriaError> {
        match self {
            FormValue::Number(n) => u32::try_from(*n).map_err(|_| CriteriaError::InvalidNumber {
                field,
                value: n.to_string(),
            }),
            FormValue::Text(s) => parse_id(field, s),
        }
    }
}

// Every accepted wire shape of a list field.
// `[5, 9]`, `["5", "9"]`, `"5:9"`, `["5:9"]` and `5` are all valid region values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ListParam {
    Items(Vec<FormValue>),
    Single(FormValue),
}

impl ListParam {
    fn is_blank(&self) -> bool {
        match self {
            ListParam::Items(items) => items.is_empty(),
            ListParam::Single(value) => value.is_blank(),
        }
    }
}

fn parse_id(field: &'static str, raw: &str) -> Result<u32, CriteriaError> {
    raw.trim()
        .parse()
        .map_err(|_| CriteriaError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

// Converts any accepted representation of a list field into its canonical
// sequence form. Delimited strings are split on `:`, empty segments skipped.
pub fn normalize_list(field: &'static str, param: &ListParam) -> Result<Vec<u32>, CriteriaError> {
    match param {
        ListParam::Items(items) => {
            let mut ids = Vec::with_capacity(items.len());
            for item in items {
                ids.extend(normalize_value(field, item)?);
            }
            Ok(ids)
        }
        ListParam::Single(value) => normalize_value(field, value),
    }
}

// Text values may themselves be delimited, e.g. ["5:9", "12"]
fn normalize_value(field: &'static str, value: &FormValue) -> Result<Vec<u32>, CriteriaError> {
    match value {
        FormValue::Number(_) => Ok(vec![value.to_u32(field)?]),
        FormValue::Text(raw) => raw
            .split(LIST_DELIMITER)
            .filter(|segment| !segment.trim().is_empty())
            .map(|segment| parse_id(field, segment))
            .collect(),
    }
}

// Submitted search form; every field may be missing
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchForm {
    pub country: Option<FormValue>,
    pub region: Option<ListParam>,
    pub from_city: Option<FormValue>,
    pub meal_type: Option<ListParam>,
    pub adult_amount: Option<FormValue>,
    pub child_amount: Option<FormValue>,
    pub child_age: Option<ListParam>,
    pub hotel_rating: Option<ListParam>,
    pub date_from: Option<String>,
    pub date_till: Option<String>,
    pub night_from: Option<FormValue>,
    pub night_till: Option<FormValue>,
}

impl SearchForm {
    // Reads a decoded request body; unknown keys are ignored
    pub fn from_map(map: Map<String, Value>) -> Result<Self, CriteriaError> {
        serde_json::from_value(Value::Object(map))
            .map_err(|e| CriteriaError::Decode(e.to_string()))
    }

    pub fn into_criteria(self) -> Result<SearchCriteria, CriteriaError> {
        self.into_criteria_on(Local::now().date_naive())
    }

    // Builds a complete record, filling every missing field from its default.
    // `meal_type` and `hotel_rating` fall back to the default id sets, while
    // `region`, `child_amount` and `child_age` stay absent when not supplied.
    pub fn into_criteria_on(self, today: NaiveDate) -> Result<SearchCriteria, CriteriaError> {
        let (default_from, default_till) = default_dates(today);

        Ok(SearchCriteria {
            country: required(&self.country, "country")?,
            region: optional_list(&self.region, "region")?,
            from_city: required(&self.from_city, "from_city")?,
            meal_type: optional_list(&self.meal_type, "meal_type")?
                .unwrap_or_else(|| MEAL_TYPE_DEFAULT.to_vec()),
            adult_amount: required(&self.adult_amount, "adult_amount")?,
            child_amount: optional(&self.child_amount, "child_amount")?,
            child_age: optional_list(&self.child_age, "child_age")?,
            hotel_rating: optional_list(&self.hotel_rating, "hotel_rating")?
                .unwrap_or_else(|| HOTEL_RATINGS_DEFAULT.to_vec()),
            date_from: optional_date(&self.date_from, "date_from")?.unwrap_or(default_from),
            date_till: optional_date(&self.date_till, "date_till")?.unwrap_or(default_till),
            night_from: optional(&self.night_from, "night_from")?.unwrap_or(NIGHT_FROM_DEFAULT),
            night_till: optional(&self.night_till, "night_till")?.unwrap_or(NIGHT_TILL_DEFAULT),
        })
    }
}

fn optional(value: &Option<FormValue>, field: &'static str) -> Result<Option<u32>, CriteriaError> {
    match value {
        Some(v) if !v.is_blank() => v.to_u32(field).map(Some),
        _ => Ok(None),
    }
}

fn required(value: &Option<FormValue>, field: &'static str) -> Result<u32, CriteriaError> {
    optional(value, field)?.ok_or(CriteriaError::MissingField(field))
}

fn optional_list(
    value: &Option<ListParam>,
    field: &'static str,
) -> Result<Option<Vec<u32>>, CriteriaError> {
    match value {
        Some(param) if !param.is_blank() => {
            let ids = normalize_list(field, param)?;
            Ok((!ids.is_empty()).then_some(ids))
        }
        _ => Ok(None),
    }
}

fn optional_date(
    value: &Option<String>,
    field: &'static str,
) -> Result<Option<TourDate>, CriteriaError> {
    match value.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => {
            raw.parse()
                .map(Some)
                .map_err(|_| CriteriaError::InvalidDate {
                    field,
                    value: raw.to_string(),
                })
        }
        _ => Ok(None),
    }
}
