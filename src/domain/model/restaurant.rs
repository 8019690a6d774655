use super::{Address, Entity, Review};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A restaurant listing.
///
/// `average_user_rating` and `reviews` are derived on read and ignored on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default, skip_deserializing)]
    pub average_user_rating: i32,
    #[serde(default)]
    pub accepts_reservations: bool,
    #[serde(default, skip_deserializing)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub date_created: Option<DateTime<Utc>>,
    #[serde(default)]
    pub date_modified: Option<DateTime<Utc>>,
}

impl Restaurant {
    /// Creates a restaurant pointing at `address`.
    pub fn new(name: impl Into<String>, phone_number: impl Into<String>, address: Address) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address_id: address.id,
            address: Some(address),
            phone_number: phone_number.into(),
            average_user_rating: 0,
            accepts_reservations: false,
            reviews: Vec::new(),
            date_created: None,
            date_modified: None,
        }
    }

    pub fn accepting_reservations(mut self, accepts: bool) -> Self {
        self.accepts_reservations = accepts;
        self
    }

    /// Keeps `address_id` in step with an embedded address.
    pub fn sync_address_id(&mut self) {
        if let Some(address) = &self.address {
            self.address_id = address.id;
        }
    }

    /// Attaches the loaded reviews and recomputes the average rating from them.
    pub fn attach_reviews(&mut self, reviews: Vec<Review>) {
        self.average_user_rating = average_rating(&reviews);
        self.reviews = reviews;
    }
}

impl Entity for Restaurant {
    const TABLE: &'static str = "restaurants";

    fn id(&self) -> Uuid {
        self.id
    }
}

/// Integer-truncated mean of the review ratings; 0 when there are none.
pub fn average_rating(reviews: &[Review]) -> i32 {
    if reviews.is_empty() {
        return 0;
    }
    let sum: i64 = reviews.iter().map(|r| i64::from(r.user_rating)).sum();
    (sum / reviews.len() as i64) as i32
}
