use super::Entity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A user's review of one restaurant.
///
/// The restaurant is referenced by id only; resolving it is an explicit lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    /// Expected to be 1-5; not enforced.
    #[serde(default)]
    pub user_rating: i32,
    /// Free text, not a validated identity.
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub review_text: String,
    #[serde(default)]
    pub restaurant_id: Option<Uuid>,
    #[serde(default = "Utc::now")]
    pub review_date: DateTime<Utc>,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_modified: Option<DateTime<Utc>>,
}

impl Review {
    pub fn new(
        restaurant_id: Uuid,
        username: impl Into<String>,
        user_rating: i32,
        review_text: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_rating,
            username: username.into(),
            review_text: review_text.into(),
            restaurant_id: Some(restaurant_id),
            review_date: Utc::now(),
            date_created: None,
            date_modified: None,
        }
    }
}

impl Entity for Review {
    const TABLE: &'static str = "reviews";

    fn id(&self) -> Uuid {
        self.id
    }
}
