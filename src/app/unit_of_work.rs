//! Unit of work: one repository call (plus commit for writes) per operation, with every
//! outcome reported through [`UnitOfWorkResult`] instead of an error.

use crate::app::repository::{ReviewsRepository, SqliteRepository};
use crate::domain::model::{Restaurant, Review};
use crate::errors::ReviewsError;
use sqlx::SqlitePool;
use tracing::{error, info, warn};
use uuid::Uuid;

pub const NO_REVIEWS_FOR_USER: &str = "No reviews found for this user";
pub const NO_REVIEWS_FOR_RESTAURANT: &str = "No reviews found for this restaurant";
pub const NO_MATCHING_REVIEW: &str = "No matching review found";
pub const NO_MATCHING_RESTAURANT: &str = "No matching restaurant found";
pub const NO_RESTAURANTS_IN_CITY_STATE: &str =
    "Unable to locate any Restaurants in the city/state provided";
pub const CITY_AND_STATE_REQUIRED: &str = "City and State are both required";

/// Outcome of a unit of work operation.
///
/// `Completed` may still carry a message explaining an empty result.
#[derive(Debug)]
pub enum UnitOfWorkResult<T> {
    Completed { results: T, message: Option<String> },
    Failed { error: ReviewsError },
}

impl<T> UnitOfWorkResult<T> {
    pub fn completed(results: T) -> Self {
        UnitOfWorkResult::Completed {
            results,
            message: None,
        }
    }

    pub fn completed_with_message(results: T, message: impl Into<String>) -> Self {
        UnitOfWorkResult::Completed {
            results,
            message: Some(message.into()),
        }
    }

    pub fn failed(error: ReviewsError) -> Self {
        UnitOfWorkResult::Failed { error }
    }

    pub fn successful(&self) -> bool {
        matches!(self, UnitOfWorkResult::Completed { .. })
    }

    pub fn results(&self) -> Option<&T> {
        match self {
            UnitOfWorkResult::Completed { results, .. } => Some(results),
            UnitOfWorkResult::Failed { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            UnitOfWorkResult::Completed { message, .. } => message.as_deref(),
            UnitOfWorkResult::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&ReviewsError> {
        match self {
            UnitOfWorkResult::Completed { .. } => None,
            UnitOfWorkResult::Failed { error } => Some(error),
        }
    }

    pub fn into_results(self) -> Option<T> {
        match self {
            UnitOfWorkResult::Completed { results, .. } => Some(results),
            UnitOfWorkResult::Failed { .. } => None,
        }
    }
}

fn log_failure(operation: &str, error: &ReviewsError) {
    if error.is_client_error() {
        warn!(operation, error = %error, "unit of work rejected request");
    } else {
        error!(operation, error = ?error, "unit of work failed");
    }
}

/// Scoped orchestrator around a repository.
///
/// Built per request; dropping it releases the repository (and its pooled connection).
pub struct UnitOfWork<R: ReviewsRepository = SqliteRepository> {
    repository: R,
}

impl UnitOfWork<SqliteRepository> {
    /// Acquires a pooled connection and wraps it in a fresh repository.
    pub async fn begin(pool: &SqlitePool) -> Result<Self, ReviewsError> {
        let conn = pool.acquire().await?;
        Ok(Self::new(SqliteRepository::new(conn)))
    }
}

impl<R: ReviewsRepository> UnitOfWork<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub async fn get_reviews_by_user(&mut self, username: &str) -> UnitOfWorkResult<Vec<Review>> {
        match self.repository.get_reviews_by_user(username).await {
            Ok(reviews) if reviews.is_empty() => {
                UnitOfWorkResult::completed_with_message(reviews, NO_REVIEWS_FOR_USER)
            }
            Ok(reviews) => UnitOfWorkResult::completed(reviews),
            Err(e) => {
                log_failure("get_reviews_by_user", &e);
                UnitOfWorkResult::failed(e)
            }
        }
    }

    pub async fn get_restaurant_reviews(
        &mut self,
        restaurant: &Restaurant,
    ) -> UnitOfWorkResult<Vec<Review>> {
        match self.repository.get_reviews_for_restaurant(restaurant).await {
            Ok(reviews) if reviews.is_empty() => {
                UnitOfWorkResult::completed_with_message(reviews, NO_REVIEWS_FOR_RESTAURANT)
            }
            Ok(reviews) => UnitOfWorkResult::completed(reviews),
            Err(e) => {
                log_failure("get_restaurant_reviews", &e);
                UnitOfWorkResult::failed(e)
            }
        }
    }

    pub async fn get_restaurant(&mut self, id: Uuid) -> UnitOfWorkResult<Option<Restaurant>> {
        match self.repository.get_restaurant(id).await {
            Ok(None) => UnitOfWorkResult::completed_with_message(None, NO_MATCHING_RESTAURANT),
            Ok(found) => UnitOfWorkResult::completed(found),
            Err(e) => {
                log_failure("get_restaurant", &e);
                UnitOfWorkResult::failed(e)
            }
        }
    }

    pub async fn add_restaurant(&mut self, restaurant: Restaurant) -> UnitOfWorkResult<Restaurant> {
        let saved = match self.repository.add_or_update_restaurant(restaurant).await {
            Ok(saved) => saved,
            Err(e) => {
                log_failure("add_restaurant", &e);
                return UnitOfWorkResult::failed(e);
            }
        };
        if let Err(e) = self.repository.commit_changes().await {
            log_failure("add_restaurant", &e);
            return UnitOfWorkResult::failed(e);
        }
        info!(restaurant_id = %saved.id, "restaurant saved");
        UnitOfWorkResult::completed(saved)
    }

    pub async fn add_restaurant_review(&mut self, review: Review) -> UnitOfWorkResult<Review> {
        let saved = match self.repository.add_or_update_review(review).await {
            Ok(saved) => saved,
            Err(e) => {
                log_failure("add_restaurant_review", &e);
                return UnitOfWorkResult::failed(e);
            }
        };
        if let Err(e) = self.repository.commit_changes().await {
            log_failure("add_restaurant_review", &e);
            return UnitOfWorkResult::failed(e);
        }
        info!(review_id = %saved.id, "review saved");
        UnitOfWorkResult::completed(saved)
    }

    pub async fn delete_restaurant_review(&mut self, review_id: Uuid) -> UnitOfWorkResult<bool> {
        let deleted = match self.repository.delete_review(review_id).await {
            Ok(deleted) => deleted,
            Err(e) => {
                log_failure("delete_restaurant_review", &e);
                return UnitOfWorkResult::failed(e);
            }
        };
        if let Err(e) = self.repository.commit_changes().await {
            log_failure("delete_restaurant_review", &e);
            return UnitOfWorkResult::failed(e);
        }
        if deleted {
            info!(%review_id, "review deleted");
            UnitOfWorkResult::completed(true)
        } else {
            UnitOfWorkResult::completed_with_message(false, NO_MATCHING_REVIEW)
        }
    }

    pub async fn find_restaurants_by_city_state(
        &mut self,
        city: &str,
        state: &str,
    ) -> UnitOfWorkResult<Vec<Restaurant>> {
        if city.is_empty() || state.is_empty() {
            let e = ReviewsError::validation(CITY_AND_STATE_REQUIRED);
            log_failure("find_restaurants_by_city_state", &e);
            return UnitOfWorkResult::failed(e);
        }
        match self.repository.find_restaurants_by_city_state(city, state).await {
            Ok(restaurants) if restaurants.is_empty() => {
                UnitOfWorkResult::completed_with_message(restaurants, NO_RESTAURANTS_IN_CITY_STATE)
            }
            Ok(restaurants) => UnitOfWorkResult::completed(restaurants),
            Err(e) => {
                log_failure("find_restaurants_by_city_state", &e);
                UnitOfWorkResult::failed(e)
            }
        }
    }
}
