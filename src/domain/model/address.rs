use super::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Street address of a restaurant. Owned by exactly one restaurant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub street_address: String,
    #[serde(default)]
    pub addr_line2: Option<String>,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zipcode: String,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_modified: Option<DateTime<Utc>>,
}

impl Address {
    pub fn new(
        street_address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zipcode: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            street_address: street_address.into(),
            addr_line2: None,
            city: city.into(),
            state: state.into(),
            zipcode: zipcode.into(),
            date_created: None,
            date_modified: None,
        }
    }

    pub fn with_line2(mut self, line2: impl Into<String>) -> Self {
        self.addr_line2 = Some(line2.into());
        self
    }
}

impl Entity for Address {
    const TABLE: &'static str = "addresses";

    fn id(&self) -> Uuid {
        self.id
    }
}
