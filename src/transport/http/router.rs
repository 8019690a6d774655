use crate::domain::model::{Address, Restaurant, Review};
use crate::transport::http::handlers::{health, restaurants, reviews};
use crate::transport::http::types::ApiResponse;
use axum::routing::{delete, get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        restaurants::get_restaurants_by_city_state_handler,
        restaurants::post_restaurant_handler,
        restaurants::get_restaurant_handler,
        reviews::post_review_handler,
        reviews::get_reviews_by_user_handler,
        reviews::get_reviews_for_restaurant_handler,
        reviews::delete_review_handler
    ),
    components(schemas(ApiResponse, Restaurant, Address, Review))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route(
            "/api/GetRestaurantsByCityState/:city/:state",
            get(restaurants::get_restaurants_by_city_state_handler),
        )
        .route("/api/PostRestaurant", post(restaurants::post_restaurant_handler))
        .route(
            "/api/GetRestaurant/:restaurant_id",
            get(restaurants::get_restaurant_handler),
        )
        .route("/api/PostReview", post(reviews::post_review_handler))
        .route(
            "/api/GetReviewsByUser/:username",
            get(reviews::get_reviews_by_user_handler),
        )
        .route(
            "/api/GetReviewsForRestaurant/:restaurant_id",
            get(reviews::get_reviews_for_restaurant_handler),
        )
        .route(
            "/api/DeleteReview/:review_id",
            delete(reviews::delete_review_handler),
        )
        .with_state(app_state)
}
