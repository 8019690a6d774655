pub mod database_service;
pub mod repository;
pub mod unit_of_work;

pub use database_service::DatabaseService;
pub use repository::{PendingChange, ReviewsRepository, SqliteRepository};
pub use unit_of_work::{UnitOfWork, UnitOfWorkResult};
