//! Row-level primitives over a single SQLite connection.
//!
//! Every function takes `&mut SqliteConnection` so the same code runs against a pooled
//! connection (reads) or an open transaction (commit of staged writes).

use crate::domain::model::{Address, Entity, Restaurant, Review};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection};
use uuid::Uuid;

/// What an existence check learns about a stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExistingRow {
    pub date_created: Option<DateTime<Utc>>,
}

/// Looks up a row by id, returning its stored creation timestamp when present.
pub async fn find_existing<E: Entity>(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<Option<ExistingRow>, sqlx::Error> {
    let sql = format!("SELECT date_created FROM {} WHERE id = ?", E::TABLE);
    let row = sqlx::query(&sql).bind(id).fetch_optional(&mut *conn).await?;
    match row {
        Some(row) => Ok(Some(ExistingRow {
            date_created: row.try_get("date_created")?,
        })),
        None => Ok(None),
    }
}

pub async fn exists<E: Entity>(conn: &mut SqliteConnection, id: Uuid) -> Result<bool, sqlx::Error> {
    Ok(find_existing::<E>(conn, id).await?.is_some())
}

/// Deletes a row by id, returning the number of rows removed.
pub async fn delete<E: Entity>(conn: &mut SqliteConnection, id: Uuid) -> Result<u64, sqlx::Error> {
    let sql = format!("DELETE FROM {} WHERE id = ?", E::TABLE);
    let result = sqlx::query(&sql).bind(id).execute(&mut *conn).await?;
    Ok(result.rows_affected())
}

pub async fn count_rows(conn: &mut SqliteConnection, table: &str) -> Result<i64, sqlx::Error> {
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    sqlx::query_scalar::<_, i64>(&sql).fetch_one(&mut *conn).await
}

// --- addresses ---

pub async fn insert_address(conn: &mut SqliteConnection, address: &Address) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO addresses
            (id, street_address, addr_line2, city, state, zipcode, date_created, date_modified)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(address.id)
    .bind(&address.street_address)
    .bind(&address.addr_line2)
    .bind(&address.city)
    .bind(&address.state)
    .bind(&address.zipcode)
    .bind(address.date_created)
    .bind(address.date_modified)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Updates every column except `date_created`, which is written once at insert.
pub async fn update_address(conn: &mut SqliteConnection, address: &Address) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE addresses
            SET street_address = ?, addr_line2 = ?, city = ?, state = ?, zipcode = ?, date_modified = ?
          WHERE id = ?",
    )
    .bind(&address.street_address)
    .bind(&address.addr_line2)
    .bind(&address.city)
    .bind(&address.state)
    .bind(&address.zipcode)
    .bind(address.date_modified)
    .bind(address.id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn fetch_address(conn: &mut SqliteConnection, id: Uuid) -> Result<Option<Address>, sqlx::Error> {
    let row = sqlx::query("SELECT * FROM addresses WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(address_from_row).transpose()
}

fn address_from_row(row: &SqliteRow) -> Result<Address, sqlx::Error> {
    Ok(Address {
        id: row.try_get("id")?,
        street_address: row.try_get("street_address")?,
        addr_line2: row.try_get("addr_line2")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        zipcode: row.try_get("zipcode")?,
        date_created: row.try_get("date_created")?,
        date_modified: row.try_get("date_modified")?,
    })
}

// --- restaurants ---

pub async fn insert_restaurant(
    conn: &mut SqliteConnection,
    restaurant: &Restaurant,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO restaurants
            (id, name, address_id, phone_number, accepts_reservations, date_created, date_modified)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(restaurant.id)
    .bind(&restaurant.name)
    .bind(restaurant.address_id)
    .bind(&restaurant.phone_number)
    .bind(restaurant.accepts_reservations)
    .bind(restaurant.date_created)
    .bind(restaurant.date_modified)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn update_restaurant(
    conn: &mut SqliteConnection,
    restaurant: &Restaurant,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE restaurants
            SET name = ?, address_id = ?, phone_number = ?, accepts_reservations = ?, date_modified = ?
          WHERE id = ?",
    )
    .bind(&restaurant.name)
    .bind(restaurant.address_id)
    .bind(&restaurant.phone_number)
    .bind(restaurant.accepts_reservations)
    .bind(restaurant.date_modified)
    .bind(restaurant.id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

/// Fetches the restaurant row only; address and reviews are loaded separately.
pub async fn fetch_restaurant(
    conn: &mut SqliteConnection,
    id: Uuid,
) -> Result<Option<Restaurant>, sqlx::Error> {
    let row = sqlx::query("SELECT * FROM restaurants WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    row.as_ref().map(restaurant_from_row).transpose()
}

/// Restaurants whose address city contains `city` and whose state equals `state`,
/// both compared case-insensitively.
pub async fn fetch_restaurants_by_city_state(
    conn: &mut SqliteConnection,
    city: &str,
    state: &str,
) -> Result<Vec<Restaurant>, sqlx::Error> {
    // instr() keeps user input out of LIKE pattern syntax.
    let rows = sqlx::query(
        "SELECT r.*
           FROM restaurants r
           JOIN addresses a ON r.address_id = a.id
          WHERE instr(lower(a.city), lower(?)) > 0
            AND lower(a.state) = lower(?)",
    )
    .bind(city)
    .bind(state)
    .fetch_all(&mut *conn)
    .await?;
    rows.iter().map(restaurant_from_row).collect()
}

fn restaurant_from_row(row: &SqliteRow) -> Result<Restaurant, sqlx::Error> {
    Ok(Restaurant {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        address_id: row.try_get("address_id")?,
        address: None,
        phone_number: row.try_get("phone_number")?,
        average_user_rating: 0,
        accepts_reservations: row.try_get("accepts_reservations")?,
        reviews: Vec::new(),
        date_created: row.try_get("date_created")?,
        date_modified: row.try_get("date_modified")?,
    })
}

// --- reviews ---

/// Inserts a review. The caller has already resolved `restaurant_id`.
pub async fn insert_review(conn: &mut SqliteConnection, review: &Review) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO reviews
            (id, user_rating, username, review_text, restaurant_id, review_date, date_created, date_modified)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(review.id)
    .bind(review.user_rating)
    .bind(&review.username)
    .bind(&review.review_text)
    .bind(review.restaurant_id)
    .bind(review.review_date)
    .bind(review.date_created)
    .bind(review.date_modified)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn update_review(conn: &mut SqliteConnection, review: &Review) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE reviews
            SET user_rating = ?, username = ?, review_text = ?, restaurant_id = ?, review_date = ?, date_modified = ?
          WHERE id = ?",
    )
    .bind(review.user_rating)
    .bind(&review.username)
    .bind(&review.review_text)
    .bind(review.restaurant_id)
    .bind(review.review_date)
    .bind(review.date_modified)
    .bind(review.id)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn fetch_reviews_for_restaurant(
    conn: &mut SqliteConnection,
    restaurant_id: Uuid,
) -> Result<Vec<Review>, sqlx::Error> {
    let rows = sqlx::query("SELECT * FROM reviews WHERE restaurant_id = ?")
        .bind(restaurant_id)
        .fetch_all(&mut *conn)
        .await?;
    rows.iter().map(review_from_row).collect()
}

/// Reviews whose username contains `username`, case-insensitively.
pub async fn fetch_reviews_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Vec<Review>, sqlx::Error> {
    let rows = sqlx::query("SELECT * FROM reviews WHERE instr(lower(username), lower(?)) > 0")
        .bind(username)
        .fetch_all(&mut *conn)
        .await?;
    rows.iter().map(review_from_row).collect()
}

fn review_from_row(row: &SqliteRow) -> Result<Review, sqlx::Error> {
    Ok(Review {
        id: row.try_get("id")?,
        user_rating: row.try_get("user_rating")?,
        username: row.try_get("username")?,
        review_text: row.try_get("review_text")?,
        restaurant_id: row.try_get("restaurant_id")?,
        review_date: row.try_get("review_date")?,
        date_created: row.try_get("date_created")?,
        date_modified: row.try_get("date_modified")?,
    })
}
