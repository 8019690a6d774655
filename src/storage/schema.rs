//! Table definitions, applied with `CREATE TABLE IF NOT EXISTS` on startup.

use sqlx::SqlitePool;

/// Tables owned by the service, in foreign-key dependency order.
pub const TABLES: &[&str] = &["addresses", "restaurants", "reviews"];

const CREATE_ADDRESSES: &str = "CREATE TABLE IF NOT EXISTS addresses (
    id BLOB PRIMARY KEY NOT NULL,
    street_address TEXT NOT NULL,
    addr_line2 TEXT,
    city TEXT NOT NULL,
    state TEXT NOT NULL,
    zipcode TEXT NOT NULL,
    date_created TEXT,
    date_modified TEXT
)";

const CREATE_RESTAURANTS: &str = "CREATE TABLE IF NOT EXISTS restaurants (
    id BLOB PRIMARY KEY NOT NULL,
    name TEXT NOT NULL,
    address_id BLOB NOT NULL REFERENCES addresses(id),
    phone_number TEXT NOT NULL,
    accepts_reservations INTEGER NOT NULL DEFAULT 0,
    date_created TEXT,
    date_modified TEXT
)";

const CREATE_REVIEWS: &str = "CREATE TABLE IF NOT EXISTS reviews (
    id BLOB PRIMARY KEY NOT NULL,
    user_rating INTEGER NOT NULL,
    username TEXT NOT NULL,
    review_text TEXT NOT NULL,
    restaurant_id BLOB NOT NULL REFERENCES restaurants(id),
    review_date TEXT NOT NULL,
    date_created TEXT,
    date_modified TEXT
)";

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_restaurants_address_id ON restaurants(address_id)",
    "CREATE INDEX IF NOT EXISTS idx_reviews_restaurant_id ON reviews(restaurant_id)",
];

/// Creates the three tables and their foreign-key indexes if they are missing.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in [CREATE_ADDRESSES, CREATE_RESTAURANTS, CREATE_REVIEWS]
        .iter()
        .chain(CREATE_INDEXES.iter())
    {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
