use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::error::{AppError, AppResult};
use crate::models::{
    booking::{Booking, BookingStatus, NewBooking},
    property::{Property, PropertyFilter, PropertySummary},
    room::Room,
};
use crate::repository::{BookingRepository, RoomRepository};

// ?1 = room id, ?2 = proposed check-in, ?3 = proposed check-out.
macro_rules! active_overlap {
    () => {
        "room_id = ?1
         AND status IN ('pending', 'confirmed')
         AND ((check_in <= ?2 AND check_out > ?2)
           OR (check_in < ?3 AND check_out >= ?3)
           OR (check_in >= ?2 AND check_out <= ?3))"
    };
}

const SELECT_OVERLAP: &str = concat!(
    "SELECT * FROM bookings WHERE ",
    active_overlap!(),
    " ORDER BY check_in LIMIT 1"
);

// Check and insert run as one statement under SQLite's write lock; the schema
// triggers reject any overlapping row that slips in through another path.
const INSERT_UNLESS_OVERLAP: &str = concat!(
    "INSERT INTO bookings
        (room_id, check_in, check_out, user_id, guests, total_price, status, payment_status, special_requests)
     SELECT ?1, ?2, ?3, ?4, ?5, ?6, 'pending', 'pending', ?7
     WHERE NOT EXISTS (SELECT 1 FROM bookings WHERE ",
    active_overlap!(),
    ") RETURNING *"
);

const OVERLAP_TRIGGER_MESSAGE: &str = "booking_overlap";

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn unavailable_dates() -> AppError {
    AppError::Conflict("room is not available for the selected dates".to_string())
}

fn map_insert_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.message().contains(OVERLAP_TRIGGER_MESSAGE) => {
            unavailable_dates()
        }
        _ => AppError::Database(err),
    }
}

fn push_room_predicate(qb: &mut QueryBuilder<'_, Sqlite>, filter: &PropertyFilter) {
    if let Some(min) = filter.min_price {
        qb.push(" AND r.price >= ").push_bind(min);
    }
    if let Some(max) = filter.max_price {
        qb.push(" AND r.price <= ").push_bind(max);
    }
    if let Some(guests) = filter.guests {
        qb.push(" AND r.capacity >= ").push_bind(guests);
    }
}

fn push_property_predicate(qb: &mut QueryBuilder<'_, Sqlite>, filter: &PropertyFilter) {
    qb.push(" WHERE 1 = 1");
    if let Some(city) = &filter.city {
        qb.push(" AND instr(lower(p.city), lower(")
            .push_bind(city.clone())
            .push(")) > 0");
    }
    for amenity in &filter.amenities {
        qb.push(" AND EXISTS (SELECT 1 FROM json_each(p.amenities) a WHERE lower(a.value) = lower(")
            .push_bind(amenity.clone())
            .push("))");
    }
    if filter.has_room_filter() {
        qb.push(" AND EXISTS (SELECT 1 FROM rooms r WHERE r.property_id = p.id");
        push_room_predicate(qb, filter);
        qb.push(")");
    }
}

#[async_trait]
impl RoomRepository for SqliteStore {
    async fn find_room(&self, id: i64) -> AppResult<Option<Room>> {
        let room = sqlx::query_as::<_, Room>("SELECT * FROM rooms WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(room)
    }

    async fn rooms_of_property(&self, property_id: i64) -> AppResult<Vec<Room>> {
        let rooms = sqlx::query_as::<_, Room>(
            "SELECT * FROM rooms WHERE property_id = ? ORDER BY price, id",
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rooms)
    }

    async fn find_property(&self, id: i64) -> AppResult<Option<Property>> {
        let property = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(property)
    }

    async fn search_properties(
        &self,
        filter: &PropertyFilter,
    ) -> AppResult<(Vec<PropertySummary>, i64)> {
        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM properties p");
        push_property_predicate(&mut count, filter);
        let total = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut page = QueryBuilder::<Sqlite>::new(
            "SELECT p.id, p.name, p.description, p.address, p.city, p.country, p.amenities,
                    p.rating, p.review_count, p.featured,
                    (SELECT COUNT(*) FROM rooms r WHERE r.property_id = p.id) AS room_count,
                    (SELECT MIN(r.price) FROM rooms r WHERE r.property_id = p.id",
        );
        push_room_predicate(&mut page, filter);
        page.push(") AS min_price FROM properties p");
        push_property_predicate(&mut page, filter);
        page.push(" ORDER BY p.featured DESC, p.rating DESC, p.id ASC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let properties = page
            .build_query_as::<PropertySummary>()
            .fetch_all(&self.pool)
            .await?;
        Ok((properties, total))
    }
}

#[async_trait]
impl BookingRepository for SqliteStore {
    async fn find_overlapping(
        &self,
        room_id: i64,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(SELECT_OVERLAP)
            .bind(room_id)
            .bind(check_in)
            .bind(check_out)
            .fetch_optional(&self.pool)
            .await?;
        Ok(booking)
    }

    async fn insert_booking(&self, new: NewBooking) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(INSERT_UNLESS_OVERLAP)
            .bind(new.room_id)
            .bind(new.check_in)
            .bind(new.check_out)
            .bind(&new.user_id)
            .bind(new.guests)
            .bind(new.total_price)
            .bind(&new.special_requests)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_insert_error)?
            .ok_or_else(unavailable_dates)
    }

    async fn find_booking(&self, id: i64) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(booking)
    }

    async fn bookings_of_user(&self, user_id: &str) -> AppResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    async fn transition_status(
        &self,
        id: i64,
        from: BookingStatus,
        to: BookingStatus,
    ) -> AppResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET status = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ? AND status = ?
            RETURNING *
            "#,
        )
        .bind(to)
        .bind(id)
        .bind(from)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_insert_error)?;
        Ok(booking)
    }
}
