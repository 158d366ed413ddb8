mod request;
mod wrapper;

pub use request::*;
pub use wrapper::*;

use serde::{Deserialize, Serialize};

/// Raw listing parameters exactly as they arrive in the query string.
/// Validation happens in the query builder so that every rejection uses
/// the same error shape.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct ListingQuery {
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub order: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub limit: Option<String>,
    #[serde(default)]
    pub p: Option<String>,
}
