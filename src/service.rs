use std::sync::Arc;

use crate::availability::Stay;
use crate::clock::Clock;
use crate::error::{AppError, AppResult};
use crate::identity::Requester;
use crate::models::{
    booking::{Availability, Booking, BookingDetail, BookingStatus, DateRange, NewBooking},
    property::PropertyRef,
    room::{Room, RoomDetail},
};
use crate::repository::{BookingRepository, RoomRepository};

/// Input for a booking once the request body has been unpacked.
#[derive(Debug, Clone)]
pub struct BookingDraft {
    pub room_id: i64,
    pub check_in: String,
    pub check_out: String,
    pub guests: i64,
    pub special_requests: Option<String>,
}

#[derive(Clone)]
pub struct BookingService {
    rooms: Arc<dyn RoomRepository>,
    bookings: Arc<dyn BookingRepository>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(
        rooms: Arc<dyn RoomRepository>,
        bookings: Arc<dyn BookingRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rooms,
            bookings,
            clock,
        }
    }

    async fn room(&self, room_id: i64) -> AppResult<Room> {
        self.rooms
            .find_room(room_id)
            .await?
            .ok_or_else(|| AppError::NotFound("room not found".to_string()))
    }

    async fn booking(&self, booking_id: i64) -> AppResult<Booking> {
        self.bookings
            .find_booking(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("booking not found".to_string()))
    }

    /// Read-only: whether `room_id` can be booked for the stay, and at what price.
    pub async fn check_availability(
        &self,
        room_id: i64,
        check_in: &str,
        check_out: &str,
    ) -> AppResult<Availability> {
        let stay = Stay::parse(check_in, check_out)?;
        let room = self.room(room_id).await?;

        if !room.available {
            return Ok(Availability::RoomDisabled);
        }

        if let Some(existing) = self
            .bookings
            .find_overlapping(room.id, stay.check_in(), stay.check_out())
            .await?
        {
            return Ok(Availability::Booked {
                conflicting: DateRange {
                    check_in: existing.check_in,
                    check_out: existing.check_out,
                },
            });
        }

        Ok(Availability::Available {
            price_per_night: room.price,
            nights: stay.nights(),
            total_price: stay.total_price(room.price),
        })
    }

    pub async fn create_booking(
        &self,
        requester: &Requester,
        draft: BookingDraft,
    ) -> AppResult<Booking> {
        let stay = Stay::parse(&draft.check_in, &draft.check_out)?;
        if stay.starts_before(self.clock.today()) {
            return Err(AppError::InvalidInput(
                "check-in date cannot be in the past".to_string(),
            ));
        }
        if draft.guests <= 0 {
            return Err(AppError::InvalidInput(
                "guests must be a positive number".to_string(),
            ));
        }

        let room = self.room(draft.room_id).await?;
        if !room.available {
            return Err(AppError::Conflict("room is not available".to_string()));
        }
        if draft.guests > room.capacity {
            return Err(AppError::InvalidInput(format!(
                "room capacity is {} guests",
                room.capacity
            )));
        }

        if self
            .bookings
            .find_overlapping(room.id, stay.check_in(), stay.check_out())
            .await?
            .is_some()
        {
            log::warn!(
                "rejected booking for room {} ({} to {}): dates taken",
                room.id,
                stay.check_in(),
                stay.check_out()
            );
            return Err(AppError::Conflict(
                "room is not available for the selected dates".to_string(),
            ));
        }

        // The repository repeats the overlap check atomically with the insert.
        let booking = self
            .bookings
            .insert_booking(NewBooking {
                room_id: room.id,
                user_id: requester.user_id.clone(),
                check_in: stay.check_in(),
                check_out: stay.check_out(),
                guests: draft.guests,
                total_price: stay.total_price(room.price),
                special_requests: draft.special_requests,
            })
            .await?;

        log::info!(
            "booking {} created for room {} by {} ({} nights, total {:.2})",
            booking.id,
            booking.room_id,
            booking.user_id,
            stay.nights(),
            booking.total_price
        );
        Ok(booking)
    }

    /// Applies a requested status change. Cancellation is the only transition
    /// callers may ask for.
    pub async fn update_status(
        &self,
        booking_id: i64,
        requester: &Requester,
        desired: &str,
    ) -> AppResult<Booking> {
        let booking = self.booking(booking_id).await?;
        if !requester.can_manage(&booking.user_id) {
            return Err(AppError::Forbidden(
                "not allowed to modify this booking".to_string(),
            ));
        }
        let target: BookingStatus = desired.parse()?;
        if target != BookingStatus::Cancelled {
            return Err(AppError::InvalidInput(
                "only cancellation is allowed".to_string(),
            ));
        }

        let next = booking.status.cancel()?;
        let updated = self
            .bookings
            .transition_status(booking.id, booking.status, next)
            .await?
            .ok_or_else(|| {
                AppError::InvalidState("booking status changed concurrently".to_string())
            })?;

        log::info!(
            "booking {} cancelled by {} (was {})",
            updated.id,
            requester.user_id,
            booking.status
        );
        Ok(updated)
    }

    #[cfg(test)]
    pub async fn cancel_booking(
        &self,
        booking_id: i64,
        requester: &Requester,
    ) -> AppResult<Booking> {
        self.update_status(booking_id, requester, BookingStatus::Cancelled.as_str())
            .await
    }

    pub async fn get_booking(&self, booking_id: i64, requester: &Requester) -> AppResult<Booking> {
        let booking = self.booking(booking_id).await?;
        if !requester.can_manage(&booking.user_id) {
            return Err(AppError::Forbidden(
                "not allowed to view this booking".to_string(),
            ));
        }
        Ok(booking)
    }

    pub async fn bookings_for(&self, requester: &Requester) -> AppResult<Vec<Booking>> {
        self.bookings.bookings_of_user(&requester.user_id).await
    }

    /// Attaches the booked room and its property.
    pub async fn booking_detail(&self, booking: Booking) -> AppResult<BookingDetail> {
        let room = self.rooms.find_room(booking.room_id).await?.ok_or_else(|| {
            AppError::Internal(format!("booking {} references a missing room", booking.id))
        })?;
        let property = self
            .rooms
            .find_property(room.property_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("room {} references a missing property", room.id))
            })?;

        Ok(BookingDetail {
            booking,
            room: RoomDetail {
                property: PropertyRef::from(&property),
                room,
            },
        })
    }

    pub async fn booking_details(&self, bookings: Vec<Booking>) -> AppResult<Vec<BookingDetail>> {
        let mut details = Vec::with_capacity(bookings.len());
        for booking in bookings {
            details.push(self.booking_detail(booking).await?);
        }
        Ok(details)
    }
}
