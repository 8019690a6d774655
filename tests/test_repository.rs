//! Repository behaviour against a real SQLite file: staging, commit, lookups and ratings.

mod common;

use common::{fresh_db, restaurant_in, review_for};
use restaurant_reviews::{PendingChange, Restaurant, ReviewsError, ReviewsRepository, SqliteRepository};
use uuid::Uuid;

async fn repository(db: &common::TestDb) -> SqliteRepository {
    let conn = db.service.pool().acquire().await.expect("acquire connection");
    SqliteRepository::new(conn)
}

async fn saved_restaurant(repo: &mut SqliteRepository, restaurant: Restaurant) -> Restaurant {
    let saved = repo.add_or_update_restaurant(restaurant).await.unwrap();
    repo.commit_changes().await.unwrap();
    saved
}

#[tokio::test]
async fn add_restaurant_then_get_returns_same_ids() -> Result<(), Box<dyn std::error::Error>> {
    let db = fresh_db().await;
    let mut repo = repository(&db).await;
    let mut validation = repository(&db).await;

    let saved = saved_restaurant(&mut repo, restaurant_in("Restaurant 1", "Pittsburgh", "PA")).await;
    assert!(saved.date_created.is_some());
    assert!(saved.date_modified.is_none());

    let found = validation.get_restaurant(saved.id).await?.expect("restaurant persisted");
    assert_eq!(found.id, saved.id);
    assert_eq!(found.address_id, saved.address_id);
    assert_eq!(found.name, "Restaurant 1");
    assert_eq!(found.average_user_rating, 0);
    assert!(found.reviews.is_empty());

    let address = found.address.expect("address loaded");
    assert_eq!(address.id, saved.address_id);
    assert_eq!(address.city, "Pittsburgh");

    assert!(validation.get_restaurant(Uuid::new_v4()).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn find_restaurants_by_city_state_ignores_case() -> Result<(), Box<dyn std::error::Error>> {
    let db = fresh_db().await;
    let mut repo = repository(&db).await;

    saved_restaurant(&mut repo, restaurant_in("Restaurant 1", "Pittsburgh", "PA")).await;
    saved_restaurant(&mut repo, restaurant_in("Restaurant 2", "Boston", "MA")).await;

    let pittsburgh = repo.find_restaurants_by_city_state("pittsburgh", "pa").await?;
    assert_eq!(pittsburgh.len(), 1);
    assert_eq!(pittsburgh[0].name, "Restaurant 1");
    assert_eq!(
        pittsburgh[0].address.as_ref().map(|a| a.state.as_str()),
        Some("PA")
    );

    let boston = repo.find_restaurants_by_city_state("boston", "ma").await?;
    assert_eq!(boston.len(), 1);

    // City is a substring match, state is not.
    assert_eq!(repo.find_restaurants_by_city_state("BURG", "Pa").await?.len(), 1);
    assert!(repo.find_restaurants_by_city_state("pittsburgh", "p").await?.is_empty());
    assert!(repo.find_restaurants_by_city_state("%", "pa").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn average_rating_is_truncated_mean() -> Result<(), Box<dyn std::error::Error>> {
    let db = fresh_db().await;
    let mut repo = repository(&db).await;
    let mut validation = repository(&db).await;

    let restaurant = saved_restaurant(&mut repo, restaurant_in("Restaurant 1", "Pittsburgh", "PA")).await;
    let first = review_for(&restaurant, "user1@nowhere.net", 5);
    let second = review_for(&restaurant, "user1@nowhere.net", 3);

    for review in [first.clone(), second.clone()] {
        let saved = repo.add_or_update_review(review.clone()).await?;
        assert_eq!(saved.id, review.id);
        assert_eq!(saved.restaurant_id, Some(restaurant.id));
        assert_eq!(saved.review_text, review.review_text);
        assert_eq!(saved.username, review.username);

        // The referenced restaurant is never rewritten.
        assert!(!repo
            .pending_changes()
            .iter()
            .any(|c| matches!(c, PendingChange::UpdateRestaurant(_) | PendingChange::InsertRestaurant(_))));
        let unchanged = validation.get_restaurant(restaurant.id).await?.unwrap();
        assert_eq!(unchanged.name, restaurant.name);
        assert_eq!(unchanged.address_id, restaurant.address_id);
    }
    repo.commit_changes().await?;

    let rated = validation.get_restaurant(restaurant.id).await?.unwrap();
    assert_eq!(rated.reviews.len(), 2);
    assert_eq!(rated.average_user_rating, (first.user_rating + second.user_rating) / 2);
    assert_eq!(rated.average_user_rating, 4);

    let found = validation.find_restaurants_by_city_state("pittsburgh", "pa").await?;
    assert_eq!(found[0].average_user_rating, 4);
    Ok(())
}

#[tokio::test]
async fn review_without_existing_restaurant_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let db = fresh_db().await;
    let mut repo = repository(&db).await;

    let unsaved = restaurant_in("Never Saved", "Pittsburgh", "PA");
    let orphan = review_for(&unsaved, "orphan@nowhere.net", 4);
    let err = repo.add_or_update_review(orphan).await.unwrap_err();
    assert!(matches!(
        err,
        ReviewsError::MissingRestaurant { restaurant_id: Some(id) } if id == unsaved.id
    ));

    let mut no_reference = review_for(&unsaved, "orphan@nowhere.net", 4);
    no_reference.restaurant_id = None;
    let err = repo.add_or_update_review(no_reference).await.unwrap_err();
    assert!(matches!(err, ReviewsError::MissingRestaurant { restaurant_id: None }));

    assert!(repo.pending_changes().is_empty());
    repo.commit_changes().await?;
    assert!(repo.get_reviews_by_user("orphan").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn delete_review_removes_exactly_one() -> Result<(), Box<dyn std::error::Error>> {
    let db = fresh_db().await;
    let mut repo = repository(&db).await;

    let restaurant = saved_restaurant(&mut repo, restaurant_in("Restaurant 1", "Pittsburgh", "PA")).await;
    let first = repo
        .add_or_update_review(review_for(&restaurant, "user1@nowhere.net", 5))
        .await?;
    repo.add_or_update_review(review_for(&restaurant, "user1@nowhere.net", 3))
        .await?;
    repo.commit_changes().await?;

    assert_eq!(repo.get_reviews_by_user("user1@nowhere.net").await?.len(), 2);

    assert!(repo.delete_review(first.id).await?);
    repo.commit_changes().await?;

    let remaining = repo.get_reviews_by_user("user1@nowhere.net").await?;
    assert_eq!(remaining.len(), 1);
    assert_ne!(remaining[0].id, first.id);

    assert!(!repo.delete_review(first.id).await?);
    assert!(!repo.delete_review(Uuid::new_v4()).await?);
    Ok(())
}

#[tokio::test]
async fn get_reviews_by_user_matches_substring_ignoring_case() -> Result<(), Box<dyn std::error::Error>> {
    let db = fresh_db().await;
    let mut repo = repository(&db).await;

    let restaurant = saved_restaurant(&mut repo, restaurant_in("Restaurant 1", "Pittsburgh", "PA")).await;
    repo.add_or_update_review(review_for(&restaurant, "User1@Nowhere.net", 5))
        .await?;
    repo.add_or_update_review(review_for(&restaurant, "someone@else.org", 2))
        .await?;
    repo.commit_changes().await?;

    assert_eq!(repo.get_reviews_by_user("user1").await?.len(), 1);
    assert_eq!(repo.get_reviews_by_user("NOWHERE").await?.len(), 1);
    assert_eq!(repo.get_reviews_by_user("@").await?.len(), 2);
    assert!(repo.get_reviews_by_user("nobody").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn staged_writes_are_invisible_until_commit() -> Result<(), Box<dyn std::error::Error>> {
    let db = fresh_db().await;
    let mut repo = repository(&db).await;
    let mut validation = repository(&db).await;

    let staged = repo
        .add_or_update_restaurant(restaurant_in("Restaurant 1", "Pittsburgh", "PA"))
        .await?;
    assert_eq!(repo.pending_changes().len(), 2);
    assert!(matches!(repo.pending_changes()[0], PendingChange::InsertAddress(_)));
    assert!(matches!(repo.pending_changes()[1], PendingChange::InsertRestaurant(_)));
    assert!(validation.get_restaurant(staged.id).await?.is_none());

    repo.commit_changes().await?;
    assert!(repo.pending_changes().is_empty());
    assert!(validation.get_restaurant(staged.id).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn update_keeps_creation_timestamp() -> Result<(), Box<dyn std::error::Error>> {
    let db = fresh_db().await;
    let mut repo = repository(&db).await;

    let inserted = saved_restaurant(&mut repo, restaurant_in("Restaurant 1", "Pittsburgh", "PA")).await;
    let stored = repo.get_restaurant(inserted.id).await?.unwrap();

    let mut changed = stored.clone();
    changed.name = "Restaurant One".to_string();
    changed.date_created = None;
    if let Some(address) = changed.address.as_mut() {
        address.city = "Pittsburg".to_string();
    }
    let updated = repo.add_or_update_restaurant(changed).await?;
    assert!(matches!(repo.pending_changes()[0], PendingChange::UpdateAddress(_)));
    assert!(matches!(repo.pending_changes()[1], PendingChange::UpdateRestaurant(_)));
    repo.commit_changes().await?;

    assert_eq!(updated.date_created, stored.date_created);
    assert!(updated.date_modified.is_some());

    let reloaded = repo.get_restaurant(inserted.id).await?.unwrap();
    assert_eq!(reloaded.name, "Restaurant One");
    assert_eq!(reloaded.date_created, stored.date_created);
    assert!(reloaded.date_modified.is_some());
    let address = reloaded.address.as_ref().unwrap();
    assert_eq!(address.city, "Pittsburg");
    assert!(address.date_modified.is_some());

    let review = repo
        .add_or_update_review(review_for(&reloaded, "user1@nowhere.net", 2))
        .await?;
    repo.commit_changes().await?;
    let created = repo.get_reviews_by_user("user1").await?[0].date_created;

    let mut edited = review.clone();
    edited.user_rating = 4;
    repo.add_or_update_review(edited).await?;
    assert!(matches!(repo.pending_changes()[0], PendingChange::UpdateReview(_)));
    repo.commit_changes().await?;

    let reviews = repo.get_reviews_by_user("user1").await?;
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].user_rating, 4);
    assert_eq!(reviews[0].date_created, created);
    assert!(reviews[0].date_modified.is_some());
    Ok(())
}

#[tokio::test]
async fn get_reviews_for_restaurant_requires_existing_restaurant() -> Result<(), Box<dyn std::error::Error>> {
    let db = fresh_db().await;
    let mut repo = repository(&db).await;

    let restaurant = saved_restaurant(&mut repo, restaurant_in("Restaurant 1", "Pittsburgh", "PA")).await;
    assert!(repo.get_reviews_for_restaurant(&restaurant).await?.is_empty());

    repo.add_or_update_review(review_for(&restaurant, "user1@nowhere.net", 5))
        .await?;
    repo.commit_changes().await?;
    assert_eq!(repo.get_reviews_for_restaurant(&restaurant).await?.len(), 1);

    let unknown = restaurant_in("Unknown", "Boston", "MA");
    assert!(repo.get_reviews_for_restaurant(&unknown).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn failed_commit_discards_staged_changes() -> Result<(), Box<dyn std::error::Error>> {
    let db = fresh_db().await;
    let mut repo = repository(&db).await;

    // No embedded address and a dangling address id: the foreign key rejects it on commit.
    let mut dangling = restaurant_in("Dangling", "Pittsburgh", "PA");
    dangling.address = None;
    dangling.address_id = Uuid::new_v4();
    repo.add_or_update_restaurant(dangling.clone()).await?;

    let err = repo.commit_changes().await.unwrap_err();
    assert!(matches!(err, ReviewsError::Database(_)));
    assert!(repo.pending_changes().is_empty());
    assert!(repo.get_restaurant(dangling.id).await?.is_none());

    // The connection stays usable after the rollback.
    saved_restaurant(&mut repo, restaurant_in("Restaurant 1", "Pittsburgh", "PA")).await;
    Ok(())
}

#[tokio::test]
async fn second_delete_before_commit_is_not_staged() -> Result<(), Box<dyn std::error::Error>> {
    let db = fresh_db().await;
    let mut repo = repository(&db).await;

    let restaurant = saved_restaurant(&mut repo, restaurant_in("Restaurant 1", "Pittsburgh", "PA")).await;
    let review = repo
        .add_or_update_review(review_for(&restaurant, "user1@nowhere.net", 5))
        .await?;
    repo.commit_changes().await?;

    assert!(repo.delete_review(review.id).await?);
    assert!(!repo.delete_review(review.id).await?);
    assert_eq!(repo.pending_changes(), &[PendingChange::DeleteReview(review.id)]);

    repo.commit_changes().await?;
    assert!(repo.get_reviews_by_user("user1").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn restaurant_without_any_address_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let db = fresh_db().await;
    let mut repo = repository(&db).await;

    let mut homeless = restaurant_in("Homeless", "Pittsburgh", "PA");
    homeless.address = None;
    homeless.address_id = Uuid::nil();

    let err = repo.add_or_update_restaurant(homeless.clone()).await.unwrap_err();
    assert!(matches!(err, ReviewsError::Validation { .. }));
    assert!(err.is_client_error());
    assert!(repo.pending_changes().is_empty());
    assert!(repo.get_restaurant(homeless.id).await?.is_none());
    Ok(())
}
