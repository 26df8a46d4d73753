// Search parameter resolver for the tour-search frontend

pub mod api_client;
pub mod criteria;
pub mod params;
pub mod search_form;
pub mod search_url;
pub mod service;
pub mod session;

// Re-export key types for convenience
pub use api_client::{ApiError, ClientConfig, HttpInventoryClient, InventoryApi};
pub use criteria::{default_criteria, default_criteria_on, CriteriaError, SearchCriteria, TourDate};
pub use params::{Country, CountryGroup, GroupedCountries};
pub use search_form::{normalize_list, FormValue, ListParam, SearchForm};
pub use search_url::{build_from_cities_path, build_search_url};
pub use service::{ServiceError, TourSearchService};
pub use session::{MemorySession, SessionId, SessionRegistry, SessionStore, FORM_DATA_SESSION};
