use crate::app::repository::SqliteRepository;
use crate::app::unit_of_work::UnitOfWork;
use crate::transport::http::types::{error_response, ApiResponse, AppState};
use axum::http::StatusCode;
use axum::Json;

/// Opens the per-request unit of work, or the 500 response to return when the pool is
/// exhausted or the store is unreachable.
pub async fn begin_unit_of_work(
    state: &AppState,
) -> Result<UnitOfWork<SqliteRepository>, (StatusCode, Json<ApiResponse>)> {
    state.db_service.begin_unit_of_work().await.map_err(|e| {
        tracing::error!(error = ?e, "failed to acquire a database connection");
        error_response(&e)
    })
}
