use crate::app::unit_of_work::UnitOfWorkResult;
use crate::domain::model::Restaurant;
use crate::transport::http::handlers::common::begin_unit_of_work;
use crate::transport::http::types::{error_response, json_422, path_400, ApiResponse, AppState};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/GetRestaurantsByCityState/{city}/{state}",
    params(
        ("city" = String, Path, description = "Case-insensitive substring of the city"),
        ("state" = String, Path, description = "State, matched exactly but case-insensitively")
    ),
    responses(
        (status = 200, description = "Matching restaurants (possibly empty)", body = Vec<Restaurant>),
        (status = 400, description = "City or state missing", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn get_restaurants_by_city_state_handler(
    State(app): State<AppState>,
    Path((city, state)): Path<(String, String)>,
) -> impl IntoResponse {
    let mut uow = match begin_unit_of_work(&app).await {
        Ok(uow) => uow,
        Err(resp) => return resp.into_response(),
    };

    match uow.find_restaurants_by_city_state(&city, &state).await {
        UnitOfWorkResult::Completed { results, .. } => (StatusCode::OK, Json(results)).into_response(),
        UnitOfWorkResult::Failed { error } => error_response(&error).into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/PostRestaurant",
    request_body = Restaurant,
    responses(
        (status = 200, description = "Restaurant inserted or updated", body = Restaurant),
        (status = 400, description = "Neither an address nor an addressId was given", body = ApiResponse),
        (status = 422, description = "Unprocessable entity (invalid JSON body)", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn post_restaurant_handler(
    State(app): State<AppState>,
    request: Result<Json<Restaurant>, JsonRejection>,
) -> impl IntoResponse {
    let Json(restaurant) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "a Restaurant object").into_response(),
    };

    let mut uow = match begin_unit_of_work(&app).await {
        Ok(uow) => uow,
        Err(resp) => return resp.into_response(),
    };

    match uow.add_restaurant(restaurant).await {
        UnitOfWorkResult::Completed { results, .. } => (StatusCode::OK, Json(results)).into_response(),
        UnitOfWorkResult::Failed { error } => error_response(&error).into_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/GetRestaurant/{restaurantId}",
    params(
        ("restaurantId" = Uuid, Path, description = "Restaurant id")
    ),
    responses(
        (status = 200, description = "Restaurant with address, reviews and average rating", body = Restaurant),
        (status = 400, description = "Malformed id", body = ApiResponse),
        (status = 404, description = "No such restaurant", body = ApiResponse),
        (status = 500, description = "Internal server error", body = ApiResponse)
    )
)]
pub async fn get_restaurant_handler(
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

    match uow.get_restaurant(restaurant_id).await {
        UnitOfWorkResult::Completed {
            results: Some(restaurant),
            ..
        } => (StatusCode::OK, Json(restaurant)).into_response(),
        UnitOfWorkResult::Completed {
            results: None,
            message,
        } => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error("Restaurant not found").with_message(message.as_deref())),
        )
            .into_response(),
        UnitOfWorkResult::Failed { error } => error_response(&error).into_response(),
    }
}
