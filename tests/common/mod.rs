//! Shared fixtures: a throwaway database file per test plus sample records.

#![allow(dead_code)]

use restaurant_reviews::{Address, DatabaseService, Restaurant, Review};
use tempfile::TempDir;

/// Keeps the temp dir alive as long as the service is in use.
pub struct TestDb {
    pub service: DatabaseService,
    _dir: TempDir,
}

pub async fn fresh_db() -> TestDb {
    let dir = tempfile::tempdir().expect("create temp dir");
    let service = DatabaseService::open(dir.path().join("restaurant_reviews.db"))
        .await
        .expect("open test database");
    TestDb { service, _dir: dir }
}

pub fn restaurant_in(name: &str, city: &str, state: &str) -> Restaurant {
    Restaurant::new(
        name,
        "412-444-4444",
        Address::new("100 Main St", city, state, "15108").with_line2(""),
    )
}

pub fn review_for(restaurant: &Restaurant, username: &str, rating: i32) -> Review {
    Review::new(
        restaurant.id,
        username,
        rating,
        "This restaurant served us quickly and the food was great!",
    )
}
