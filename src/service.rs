// Search parameter resolver: session defaults, request building and response shaping
use crate::api_client::{ApiError, InventoryApi};
use crate::criteria::{default_criteria_on, CriteriaError, SearchCriteria};
use crate::params::{GroupedCountries, ParamsResponse};
use crate::search_form::SearchForm;
use crate::search_url::{build_from_cities_path, build_search_url, PARAMS_PATH};
use crate::session::{SessionStore, FORM_DATA_SESSION};
use chrono::{Local, NaiveDate};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Criteria(#[from] CriteriaError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Session encode error: {0}")]
    Session(String),
}

// Resolves search criteria for one user session and talks to the
// inventory API on its behalf.
pub struct TourSearchService {
    api: Arc<dyn InventoryApi>,
    session: Arc<dyn SessionStore>,
}

impl TourSearchService {
    pub fn new(api: Arc<dyn InventoryApi>, session: Arc<dyn SessionStore>) -> Self {
        Self { api, session }
    }

    // Criteria stored in the session, if any and still readable
    pub fn stored_criteria(&self) -> Option<SearchCriteria> {
        let raw = self.session.get(FORM_DATA_SESSION)?;
        match serde_json::from_value(raw) {
            Ok(criteria) => Some(criteria),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable session criteria");
                None
            }
        }
    }

    // Session criteria, or the defaults when the session holds none.
    // Never writes to the session.
    pub fn resolve_criteria(&self) -> SearchCriteria {
        self.resolve_criteria_on(Local::now().date_naive())
    }

    pub fn resolve_criteria_on(&self, today: NaiveDate) -> SearchCriteria {
        self.stored_criteria()
            .unwrap_or_else(|| default_criteria_on(today))
    }

    pub fn persist_criteria(&self, form: SearchForm) -> Result<SearchCriteria, ServiceError> {
        self.persist_criteria_on(form, Local::now().date_naive())
    }

    // Builds a complete record from the submitted form and replaces the
    // session slot with it. Nothing is written if the form is invalid.
    pub fn persist_criteria_on(
        &self,
        form: SearchForm,
        today: NaiveDate,
    ) -> Result<SearchCriteria, ServiceError> {
        let criteria = form.into_criteria_on(today)?;
        let record =
            serde_json::to_value(&criteria).map_err(|e| ServiceError::Session(e.to_string()))?;

        self.session.put(FORM_DATA_SESSION, record);
        tracing::debug!(
            country = criteria.country,
            from_city = criteria.from_city,
            "search criteria stored"
        );
        Ok(criteria)
    }

    // Raw request body variant of persist_criteria
    pub fn persist_form_map(&self, input: Map<String, Value>) -> Result<SearchCriteria, ServiceError> {
        self.persist_criteria(SearchForm::from_map(input)?)
    }

    pub fn search_url(&self, page: Option<u32>) -> String {
        build_search_url(&self.resolve_criteria(), page)
    }

    // Hotel search results, passed through untouched
    pub async fn fetch_hotels(&self, page: Option<u32>) -> Result<Value, ServiceError> {
        let url = self.search_url(page);
        tracing::debug!(%url, "hotel search");
        Ok(self.api.get_json(&url).await?)
    }

    pub async fn fetch_countries(&self) -> Result<GroupedCountries, ServiceError> {
        let body = self.api.get_json(PARAMS_PATH).await?;
        let params: ParamsResponse =
            serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(GroupedCountries::from_countries(params.countries))
    }

    pub async fn fetch_from_cities(&self, country_id: u32) -> Result<Vec<Value>, ServiceError> {
        let mut body = self.api.get_json(&build_from_cities_path(country_id)).await?;

        match body.get_mut("from_cities").map(Value::take) {
            Some(Value::Array(cities)) => Ok(cities),
            Some(other) => Err(ApiError::Decode(format!(
                "from_cities is not a list: {}",
                other
            ))
            .into()),
            None => Err(ApiError::MissingField("from_cities".to_string()).into()),
        }
    }
}
