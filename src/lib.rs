pub mod app;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::database_service::DatabaseService;
pub use app::repository::{PendingChange, ReviewsRepository, SqliteRepository};
pub use app::unit_of_work::{UnitOfWork, UnitOfWorkResult};
pub use domain::model::{Address, Restaurant, Review};
pub use errors::ReviewsError;
pub use infra::Config;
