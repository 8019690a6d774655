//! Domain repository: business-level reads and staged writes over the gateway.
//!
//! Reads hit the store immediately. Writes are recorded as [`PendingChange`]s and only
//! reach the store when [`ReviewsRepository::commit_changes`] runs them inside a single
//! transaction.

use crate::domain::model::{Address, Entity, Restaurant, Review};
use crate::errors::{Result, ReviewsError};
use crate::storage::gateway;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::pool::PoolConnection;
use sqlx::{Connection, Sqlite, SqliteConnection};
use tracing::debug;
use uuid::Uuid;

pub const ADDRESS_REQUIRED: &str = "Each restaurant must have an address or an addressId";

/// Contract for the restaurant reviews data access layer.
///
/// The unit of work depends on this trait rather than on SQLite directly, so tests can
/// substitute a repository that fails on demand.
#[async_trait]
pub trait ReviewsRepository: Send {
    /// Stages an insert (unknown id) or update (known id) of the restaurant and its
    /// embedded address.
    async fn add_or_update_restaurant(&mut self, restaurant: Restaurant) -> Result<Restaurant>;

    /// Loads a restaurant with its address and reviews and a freshly computed average.
    async fn get_restaurant(&mut self, id: Uuid) -> Result<Option<Restaurant>>;

    /// Stages an insert or update of a review whose restaurant must already exist.
    async fn add_or_update_review(&mut self, review: Review) -> Result<Review>;

    /// Stages removal of a review. `false` when no such review exists or its removal is
    /// already staged.
    async fn delete_review(&mut self, id: Uuid) -> Result<bool>;

    async fn find_restaurants_by_city_state(
        &mut self,
        city: &str,
        state: &str,
    ) -> Result<Vec<Restaurant>>;

    async fn get_reviews_by_user(&mut self, username: &str) -> Result<Vec<Review>>;

    /// Reviews of an existing restaurant; empty when the restaurant is unknown.
    async fn get_reviews_for_restaurant(&mut self, restaurant: &Restaurant) -> Result<Vec<Review>>;

    /// Flushes all staged changes as one transaction.
    async fn commit_changes(&mut self) -> Result<()>;
}

/// A write recorded by the repository and applied on commit.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingChange {
    InsertAddress(Address),
    UpdateAddress(Address),
    InsertRestaurant(Restaurant),
    UpdateRestaurant(Restaurant),
    InsertReview(Review),
    UpdateReview(Review),
    DeleteReview(Uuid),
}

impl PendingChange {
    async fn apply(&self, conn: &mut SqliteConnection) -> std::result::Result<(), sqlx::Error> {
        match self {
            PendingChange::InsertAddress(address) => gateway::insert_address(conn, address).await,
            PendingChange::UpdateAddress(address) => gateway::update_address(conn, address).await,
            PendingChange::InsertRestaurant(restaurant) => {
                gateway::insert_restaurant(conn, restaurant).await
            }
            PendingChange::UpdateRestaurant(restaurant) => {
                gateway::update_restaurant(conn, restaurant).await
            }
            PendingChange::InsertReview(review) => gateway::insert_review(conn, review).await,
            PendingChange::UpdateReview(review) => gateway::update_review(conn, review).await,
            PendingChange::DeleteReview(id) => {
                let removed = gateway::delete::<Review>(conn, *id).await?;
                debug!(review_id = %id, removed, "applied review delete");
                Ok(())
            }
        }
    }
}

/// SQLite-backed repository holding one pooled connection for its whole lifetime.
///
/// Dropping the repository returns the connection to the pool and discards any
/// uncommitted changes.
pub struct SqliteRepository {
    conn: PoolConnection<Sqlite>,
    pending: Vec<PendingChange>,
}

impl SqliteRepository {
    pub fn new(conn: PoolConnection<Sqlite>) -> Self {
        Self {
            conn,
            pending: Vec::new(),
        }
    }

    /// Changes staged since the last commit, in application order.
    pub fn pending_changes(&self) -> &[PendingChange] {
        &self.pending
    }

    async fn stage_address(&mut self, address: &mut Address, now: DateTime<Utc>) -> Result<()> {
        match gateway::find_existing::<Address>(&mut self.conn, address.id()).await? {
            None => {
                address.date_created = Some(now);
                address.date_modified = None;
                self.pending.push(PendingChange::InsertAddress(address.clone()));
            }
            Some(existing) => {
                address.date_created = existing.date_created;
                address.date_modified = Some(now);
                self.pending.push(PendingChange::UpdateAddress(address.clone()));
            }
        }
        Ok(())
    }

    async fn load_relations(&mut self, restaurant: &mut Restaurant) -> Result<()> {
        restaurant.address = gateway::fetch_address(&mut self.conn, restaurant.address_id).await?;
        let reviews = gateway::fetch_reviews_for_restaurant(&mut self.conn, restaurant.id).await?;
        restaurant.attach_reviews(reviews);
        Ok(())
    }
}

#[async_trait]
impl ReviewsRepository for SqliteRepository {
    async fn add_or_update_restaurant(&mut self, mut restaurant: Restaurant) -> Result<Restaurant> {
        restaurant.sync_address_id();
        if restaurant.address.is_none() && restaurant.address_id.is_nil() {
            return Err(ReviewsError::validation(ADDRESS_REQUIRED));
        }
        let now = Utc::now();
        let existing = gateway::find_existing::<Restaurant>(&mut self.conn, restaurant.id()).await?;

        // The address row must be staged first so the foreign key resolves on commit.
        let mut address = restaurant.address.take();
        if let Some(address) = address.as_mut() {
            self.stage_address(address, now).await?;
        }
        restaurant.address = address;

        match existing {
            None => {
                debug!(restaurant_id = %restaurant.id, "staging restaurant insert");
                restaurant.date_created = Some(now);
                restaurant.date_modified = None;
                self.pending.push(PendingChange::InsertRestaurant(restaurant.clone()));
            }
            Some(existing) => {
                debug!(restaurant_id = %restaurant.id, "staging restaurant update");
                restaurant.date_created = existing.date_created;
                restaurant.date_modified = Some(now);
                self.pending.push(PendingChange::UpdateRestaurant(restaurant.clone()));
            }
        }

        Ok(restaurant)
    }

    async fn get_restaurant(&mut self, id: Uuid) -> Result<Option<Restaurant>> {
        let Some(mut restaurant) = gateway::fetch_restaurant(&mut self.conn, id).await? else {
            return Ok(None);
        };
        self.load_relations(&mut restaurant).await?;
        Ok(Some(restaurant))
    }

    async fn add_or_update_review(&mut self, mut review: Review) -> Result<Review> {
        let restaurant_id = review
            .restaurant_id
            .ok_or(ReviewsError::MissingRestaurant {
                restaurant_id: None,
            })?;
        if !gateway::exists::<Restaurant>(&mut self.conn, restaurant_id).await? {
            return Err(ReviewsError::MissingRestaurant {
                restaurant_id: Some(restaurant_id),
            });
        }

        let now = Utc::now();
        match gateway::find_existing::<Review>(&mut self.conn, review.id()).await? {
            None => {
                debug!(review_id = %review.id, %restaurant_id, "staging review insert");
                review.date_created = Some(now);
                review.date_modified = None;
                self.pending.push(PendingChange::InsertReview(review.clone()));
            }
            Some(existing) => {
                debug!(review_id = %review.id, %restaurant_id, "staging review update");
                review.date_created = existing.date_created;
                review.date_modified = Some(now);
                self.pending.push(PendingChange::UpdateReview(review.clone()));
            }
        }

        Ok(review)
    }

    async fn delete_review(&mut self, id: Uuid) -> Result<bool> {
        if self.pending.contains(&PendingChange::DeleteReview(id)) {
            return Ok(false);
        }
        if !gateway::exists::<Review>(&mut self.conn, id).await? {
            return Ok(false);
        }
        debug!(review_id = %id, "staging review delete");
        self.pending.push(PendingChange::DeleteReview(id));
        Ok(true)
    }

    async fn find_restaurants_by_city_state(
        &mut self,
        city: &str,
        state: &str,
    ) -> Result<Vec<Restaurant>> {
        let mut restaurants =
            gateway::fetch_restaurants_by_city_state(&mut self.conn, city, state).await?;
        for restaurant in restaurants.iter_mut() {
            self.load_relations(restaurant).await?;
        }
        Ok(restaurants)
    }

    async fn get_reviews_by_user(&mut self, username: &str) -> Result<Vec<Review>> {
        Ok(gateway::fetch_reviews_by_username(&mut self.conn, username).await?)
    }

    async fn get_reviews_for_restaurant(&mut self, restaurant: &Restaurant) -> Result<Vec<Review>> {
        if !gateway::exists::<Restaurant>(&mut self.conn, restaurant.id()).await? {
            return Ok(Vec::new());
        }
        Ok(gateway::fetch_reviews_for_restaurant(&mut self.conn, restaurant.id).await?)
    }

    async fn commit_changes(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }

        // Staged changes are consumed whether or not the transaction succeeds.
        let changes = std::mem::take(&mut self.pending);
        let mut tx = self.conn.begin().await?;
        for change in &changes {
            change.apply(&mut tx).await?;
        }
        tx.commit().await?;

        debug!(count = changes.len(), "committed staged changes");
        Ok(())
    }
}
