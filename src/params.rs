// Typed views over the inventory "parameters" endpoint
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Country popularity groups as tagged by the inventory API
pub const POPULAR_COUNTRY: u64 = 1;
pub const OTHER_COUNTRY: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryGroup {
    Popular,
    Rare,
}

impl CountryGroup {
    // The API is loose about types here: 1 and "1" both occur
    pub fn from_group_id(group_id: &Value) -> Option<Self> {
        let id = match group_id {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }?;

        match id {
            POPULAR_COUNTRY => Some(CountryGroup::Popular),
            OTHER_COUNTRY => Some(CountryGroup::Rare),
            _ => None,
        }
    }
}

// A destination country record. Only `group_id` is interpreted; every other
// field is kept as-is and passed through to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub group_id: Value,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Country {
    pub fn group(&self) -> Option<CountryGroup> {
        CountryGroup::from_group_id(&self.group_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParamsResponse {
    pub countries: Vec<Country>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupedCountries {
    pub popular: Vec<Country>,
    pub rare: Vec<Country>,
}

impl GroupedCountries {
    // Countries outside both groups are dropped
    pub fn from_countries<I>(countries: I) -> Self
    where
        I: IntoIterator<Item = Country>,
    {
        let mut grouped = Self::default();
        for country in countries {
            match country.group() {
                Some(CountryGroup::Popular) => grouped.popular.push(country),
                Some(CountryGroup::Rare) => grouped.rare.push(country),
                None => {}
            }
        }
        grouped
    }
}
