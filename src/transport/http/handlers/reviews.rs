use crate::app::unit_of_work::UnitOfWorkResult;
use crate::domain::model::Review;
use crate::transport::http::handlers::common::begin_unit_of_work;
use crate::transport::http::types::{error_response, json_422, path_400, ApiResponse, AppState};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/PostReview",
    request_body = Review,
    responses(
        (status = 200, description = "Review inserted or updated", body = Review),
        (status = 400, description = "Review does not reference an existing restaurant", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn post_review_handler(
    State(app): State<AppState>,
    request: Result<Json<Review>, JsonRejection>,
) -> impl IntoResponse {
    let Json(review) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "a Review object with restaurantId").into_response(),
    };

    let mut uow = match begin_unit_of_work(&app).await {
        Ok(uow) => uow,
        Err(resp) => return resp.into_response(),
    };

    match uow.add_restaurant_review(review).await {
        UnitOfWorkResult::Completed { results, .. } => (StatusCode::OK, Json(results)).into_response(),
        UnitOfWorkResult::Failed { error } => error_response(&error).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/GetReviewsByUser/{username}",
    params(
        ("username" = String, Path, description = "Case-insensitive substring of the username")
    ),
    responses(
        (status = 200, description = "Matching reviews (possibly empty)", body = Vec<Review>),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn get_reviews_by_user_handler(
    State(app): State<AppState>,
    Path(username): Path<String>,
) -> impl IntoResponse {
    let mut uow = match begin_unit_of_work(&app).await {
        Ok(uow) => uow,
        Err(resp) => return resp.into_response(),
    };

    match uow.get_reviews_by_user(&username).await {
        UnitOfWorkResult::Completed { results, .. } => (StatusCode::OK, Json(results)).into_response(),
        UnitOfWorkResult::Failed { error } => error_response(&error).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/GetReviewsForRestaurant/{restaurantId}",
    params(
        ("restaurantId" = Uuid, Path, description = "Restaurant id")
    ),
    responses(
        (status = 200, description = "Reviews of the restaurant (possibly empty)", body = Vec<Review>),
        (status = 400, description = "Malformed id", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn get_reviews_for_restaurant_handler(
    State(app): State<AppState>,
    restaurant_id: Result<Path<Uuid>, PathRejection>,
) -> impl IntoResponse {
    let Path(restaurant_id) = match restaurant_id {
        Ok(v) => v,
        Err(e) => return path_400(e).into_response(),
    };

    let mut uow = match begin_unit_of_work(&app).await {
        Ok(uow) => uow,
        Err(resp) => return resp.into_response(),
    };

    let restaurant = match uow.get_restaurant(restaurant_id).await {
        UnitOfWorkResult::Completed {
            results: Some(restaurant),
            ..
        } => restaurant,
        UnitOfWorkResult::Completed { results: None, .. } => {
            return (StatusCode::OK, Json(Vec::<Review>::new())).into_response();
        }
        UnitOfWorkResult::Failed { error } => return error_response(&error).into_response(),
    };

    match uow.get_restaurant_reviews(&restaurant).await {
        UnitOfWorkResult::Completed { results, .. } => (StatusCode::OK, Json(results)).into_response(),
        UnitOfWorkResult::Failed { error } => error_response(&error).into_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/DeleteReview/{reviewId}",
    params(
        ("reviewId" = Uuid, Path, description = "Review id")
    ),
    responses(
        (status = 200, description = "Review deleted", body = ApiResponse),
        (status = 400, description = "Malformed id", body = ApiResponse),
        (status = 404, description = "No such review", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn delete_review_handler(
    State(app): State<AppState>,
    review_id: Result<Path<Uuid>, PathRejection>,
) -> impl IntoResponse {
    let Path(review_id) = match review_id {
        Ok(v) => v,
        Err(e) => return path_400(e).into_response(),
    };

    let mut uow = match begin_unit_of_work(&app).await {
        Ok(uow) => uow,
        Err(resp) => return resp.into_response(),
    };

    match uow.delete_restaurant_review(review_id).await {
        UnitOfWorkResult::Completed { results: true, .. } => (
            StatusCode::OK,
            Json(ApiResponse::ok(serde_json::json!({ "deleted": true, "id": review_id }))),
        )
            .into_response(),
        UnitOfWorkResult::Completed {
            results: false,
            message,
        } => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Review not found").with_message(message.as_deref())),
        )
            .into_response(),
        UnitOfWorkResult::Failed { error } => error_response(&error).into_response(),
    }
}
