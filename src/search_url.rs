// Outbound request paths for the inventory API
use crate::criteria::SearchCriteria;
use crate::search_form::LIST_DELIMITER;
use std::fmt::{Display, Write};

pub const SEARCH_PATH: &str = "/module/search";
pub const SEARCH_TYPE: u32 = 1;
pub const ITEMS_PER_PAGE: u32 = 20;
pub const HOTEL_INFO: u32 = 1;

pub const PARAMS_PATH: &str = "/module/params";
pub const FROM_CITY_ENTITY: &str = "from_city";

// Fixed prefix of every search request
pub fn search_base_url() -> String {
    format!(
        "{}?type={}&items_per_page={}&hotel_info={}",
        SEARCH_PATH, SEARCH_TYPE, ITEMS_PER_PAGE, HOTEL_INFO
    )
}

pub fn join_ids(ids: &[u32]) -> String {
    let mut joined = String::with_capacity(ids.len() * 4);
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            joined.push(LIST_DELIMITER);
        }
        let _ = write!(joined, "{}", id);
    }
    joined
}

fn push_param<T: Display>(url: &mut String, key: &str, value: Option<T>) {
    if let Some(value) = value {
        let _ = write!(url, "&{}={}", key, value);
    }
}

fn push_list(url: &mut String, key: &str, ids: Option<&[u32]>) {
    let joined = ids.filter(|ids| !ids.is_empty()).map(join_ids);
    push_param(url, key, joined);
}

// Serializes criteria into the search query understood by the inventory API.
// Parameter order is fixed for wire compatibility. Absent fields and empty
// lists are left out entirely, and page 0 is treated as "no page".
pub fn build_search_url(criteria: &SearchCriteria, page: Option<u32>) -> String {
    let mut url = search_base_url();

    push_param(&mut url, "country", Some(criteria.country));
    push_list(&mut url, "region", criteria.region.as_deref());
    push_list(&mut url, "meal_type", Some(criteria.meal_type.as_slice()));
    push_param(&mut url, "from_city", Some(criteria.from_city));
    push_param(&mut url, "adult_amount", Some(criteria.adult_amount));
    push_param(&mut url, "child_amount", criteria.child_amount);
    push_list(&mut url, "child_age", criteria.child_age.as_deref());
    push_list(&mut url, "hotel_rating", Some(criteria.hotel_rating.as_slice()));
    push_param(&mut url, "night_from", Some(criteria.night_from));
    push_param(&mut url, "night_till", Some(criteria.night_till));
    push_param(&mut url, "date_from", Some(criteria.date_from));
    push_param(&mut url, "date_till", Some(criteria.date_till));
    push_param(&mut url, "page", page.filter(|p| *p > 0));

    url
}

// Departure cities available for a destination country
pub fn build_from_cities_path(country_id: u32) -> String {
    format!("{}/{}?entity={}", PARAMS_PATH, country_id, FROM_CITY_ENTITY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::criteria::default_criteria_on;
    use crate::search_form::SearchForm;
    use chrono::NaiveDate;
    use serde_json::json;
    use test_case::test_case;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn test_default_search_url() {
        let url = build_search_url(&default_criteria_on(today()), None);

        assert_eq!(
            url,
            "/module/search?type=1&items_per_page=20&hotel_info=1\
             &country=338&meal_type=388:498:496:1956:560:512&from_city=2014\
             &adult_amount=2&child_amount=0&hotel_rating=78:4\
             &night_from=6&night_till=10&date_from=19.10.26&date_till=25.10.26"
        );
    }

    #[test]
    fn test_region_is_joined() {
        let mut criteria = default_criteria_on(today());
        criteria.region = Some(vec![5, 9]);

        let url = build_search_url(&criteria, None);
        assert!(url.contains("&country=338&region=5:9&meal_type="));
    }

    #[test_case(None, "&date_till=25.10.26"; "no page")]
    #[test_case(Some(0), "&date_till=25.10.26"; "page zero")]
    #[test_case(Some(3), "&date_till=25.10.26&page=3"; "page three")]
    fn test_page_suffix(page: Option<u32>, suffix: &str) {
        let url = build_search_url(&default_criteria_on(today()), page);
        assert!(url.ends_with(suffix), "{} does not end with {}", url, suffix);
        assert_eq!(url.contains("&page="), page.unwrap_or(0) > 0);
    }

    #[test]
    fn test_absent_fields_emit_no_pairs() {
        let mut criteria = default_criteria_on(today());
        criteria.region = Some(vec![]);
        criteria.child_amount = None;
        criteria.child_age = None;

        let url = build_search_url(&criteria, None);
        for key in ["region=", "child_amount=", "child_age="] {
            assert!(!url.contains(key), "unexpected {} in {}", key, url);
        }
        assert!(!url.contains("=&"));
    }

    #[test]
    fn test_submitted_form_url() {
        let criteria = serde_json::from_value::<SearchForm>(json!({
            "country": 10,
            "from_city": 99,
            "adult_amount": 2,
            "child_amount": 1,
            "child_age": [7],
            "night_from": 7,
            "night_till": 9
        }))
        .unwrap()
        .into_criteria_on(today())
        .unwrap();

        let url = build_search_url(&criteria, Some(2));
        assert_eq!(
            url,
            "/module/search?type=1&items_per_page=20&hotel_info=1\
             &country=10&meal_type=388:498:496:1956:560:512&from_city=99\
             &adult_amount=2&child_amount=1&child_age=7&hotel_rating=78:4\
             &night_from=7&night_till=9&date_from=19.10.26&date_till=25.10.26&page=2"
        );
    }

    #[test]
    fn test_from_cities_path() {
        assert_eq!(
            build_from_cities_path(338),
            "/module/params/338?entity=from_city"
        );
    }

    #[test]
    fn test_join_ids() {
        assert_eq!(join_ids(&[]), "");
        assert_eq!(join_ids(&[78]), "78");
        assert_eq!(join_ids(&[78, 4]), "78:4");
    }
}
