use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::AppResult;
use crate::models::{
    booking::{Booking, BookingStatus, NewBooking},
    property::{Property, PropertyFilter, PropertySummary},
    room::Room,
};

#[cfg(test)]
pub mod memory;

#[async_trait]
pub trait RoomRepository: Send + Sync {
    async fn find_room(&self, id: i64) -> AppResult<Option<Room>>;

    async fn rooms_of_property(&self, property_id: i64) -> AppResult<Vec<Room>>;

    async fn find_property(&self, id: i64) -> AppResult<Option<Property>>;

    /// One page of matches plus the total number of matches.
    async fn search_properties(
        &self,
        filter: &PropertyFilter,
    ) -> AppResult<(Vec<PropertySummary>, i64)>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// First pending or confirmed booking of `room_id` that intersects
    /// `[check_in, check_out)`.
    async fn find_overlapping(
        &self,
        room_id: i64,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> AppResult<Option<Booking>>;

    /// Stores a pending booking. The overlap check and the insert are one
    /// atomic step; a collision yields `AppError::Conflict`.
    async fn insert_booking(&self, new: NewBooking) -> AppResult<Booking>;

    async fn find_booking(&self, id: i64) -> AppResult<Option<Booking>>;

    async fn bookings_of_user(&self, user_id: &str) -> AppResult<Vec<Booking>>;

    /// Moves a booking from `from` to `to`. Returns `None` when the booking
    /// is no longer in `from`.
    async fn transition_status(
        &self,
        id: i64,
        from: BookingStatus,
        to: BookingStatus,
    ) -> AppResult<Option<Booking>>;
}
