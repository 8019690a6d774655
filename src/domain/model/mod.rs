//! Domain records: restaurants, their addresses, and reviews.

use uuid::Uuid;

pub mod address;
pub mod restaurant;
pub mod review;

pub use address::Address;
pub use restaurant::{average_rating, Restaurant};
pub use review::Review;

/// A record stored in its own table and keyed by a generated UUID.
///
/// The store layer uses this to run existence checks and deletes without
/// knowing the concrete record type.
pub trait Entity {
    /// Name of the database table holding this record.
    const TABLE: &'static str;

    /// Identifier assigned at construction.
    fn id(&self) -> Uuid;
}
