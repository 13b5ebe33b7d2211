use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use super::{BookingRepository, RoomRepository};
use crate::availability::Stay;
use crate::error::{AppError, AppResult};
use crate::models::{
    booking::{Booking, BookingStatus, NewBooking, PaymentStatus},
    property::{Property, PropertyFilter, PropertySummary},
    room::Room,
};

#[derive(Default)]
struct State {
    properties: BTreeMap<i64, Property>,
    rooms: BTreeMap<i64, Room>,
    bookings: BTreeMap<i64, Booking>,
    next_booking_id: i64,
}

impl State {
    fn overlapping(&self, room_id: i64, stay: Stay) -> Option<&Booking> {
        self.bookings.values().find(|b| {
            b.room_id == room_id && b.status.is_active() && stay.overlaps(b.check_in, b.check_out)
        })
    }
}

/// Store backed by maps behind one mutex; every operation is serialized.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_property(&self, property: Property) {
        self.state().properties.insert(property.id, property);
    }

    pub fn add_room(&self, room: Room) {
        self.state().rooms.insert(room.id, room);
    }

    pub fn set_room_available(&self, room_id: i64, available: bool) {
        if let Some(room) = self.state().rooms.get_mut(&room_id) {
            room.available = available;
        }
    }

    /// Forces a status, standing in for the payment and stay collaborators.
    pub fn force_status(&self, booking_id: i64, status: BookingStatus) {
        if let Some(booking) = self.state().bookings.get_mut(&booking_id) {
            booking.status = status;
        }
    }
}

#[async_trait]
impl RoomRepository for MemoryStore {
    async fn find_room(&self, id: i64) -> AppResult<Option<Room>> {
        Ok(self.state().rooms.get(&id).cloned())
    }

    async fn rooms_of_property(&self, property_id: i64) -> AppResult<Vec<Room>> {
        Ok(self
            .state()
            .rooms
            .values()
            .filter(|r| r.property_id == property_id)
            .cloned()
            .collect())
    }

    async fn find_property(&self, id: i64) -> AppResult<Option<Property>> {
        Ok(self.state().properties.get(&id).cloned())
    }

    async fn search_properties(
        &self,
        filter: &PropertyFilter,
    ) -> AppResult<(Vec<PropertySummary>, i64)> {
        let state = self.state();
        let mut matches: Vec<PropertySummary> = state
            .properties
            .values()
            .filter(|p| filter.property_matches(p))
            .filter_map(|p| {
                let rooms: Vec<&Room> = state
                    .rooms
                    .values()
                    .filter(|r| r.property_id == p.id)
                    .collect();
                let matching: Vec<&Room> = rooms
                    .iter()
                    .copied()
                    .filter(|r| filter.room_matches(r))
                    .collect();
                if filter.has_room_filter() && matching.is_empty() {
                    return None;
                }
                Some(PropertySummary {
                    id: p.id,
                    name: p.name.clone(),
                    description: p.description.clone(),
                    address: p.address.clone(),
                    city: p.city.clone(),
                    country: p.country.clone(),
                    amenities: p.amenities.clone(),
                    rating: p.rating,
                    review_count: p.review_count,
                    featured: p.featured,
                    room_count: rooms.len() as i64,
                    min_price: matching.iter().map(|r| r.price).reduce(f64::min),
                })
            })
            .collect();

        matches.sort_by(|a, b| {
            b.featured
                .cmp(&a.featured)
                .then(b.rating.total_cmp(&a.rating))
                .then(a.id.cmp(&b.id))
        });
        let total = matches.len() as i64;
        let page = matches
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit as usize)
            .collect();
        Ok((page, total))
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn find_overlapping(
        &self,
        room_id: i64,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> AppResult<Option<Booking>> {
        let stay = Stay::new(check_in, check_out)?;
        Ok(self.state().overlapping(room_id, stay).cloned())
    }

    async fn insert_booking(&self, new: NewBooking) -> AppResult<Booking> {
        let stay = Stay::new(new.check_in, new.check_out)?;
        let mut state = self.state();
        if state.overlapping(new.room_id, stay).is_some() {
            return Err(AppError::Conflict(
                "room is not available for the selected dates".to_string(),
            ));
        }

        state.next_booking_id += 1;
        let now = Utc::now().naive_utc();
        let booking = Booking {
            id: state.next_booking_id,
            room_id: new.room_id,
            user_id: new.user_id,
            check_in: new.check_in,
            check_out: new.check_out,
            guests: new.guests,
            total_price: new.total_price,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            special_requests: new.special_requests,
            created_at: now,
            updated_at: now,
        };
        state.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn find_booking(&self, id: i64) -> AppResult<Option<Booking>> {
        Ok(self.state().bookings.get(&id).cloned())
    }

    async fn bookings_of_user(&self, user_id: &str) -> AppResult<Vec<Booking>> {
        let mut bookings: Vec<Booking> = self
            .state()
            .bookings
            .values()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(bookings)
    }

    async fn transition_status(
        &self,
        id: i64,
        from: BookingStatus,
        to: BookingStatus,
    ) -> AppResult<Option<Booking>> {
        let mut state = self.state();
        match state.bookings.get_mut(&id) {
            Some(booking) if booking.status == from => {
                booking.status = to;
                booking.updated_at = Utc::now().naive_utc();
                Ok(Some(booking.clone()))
            }
            _ => Ok(None),
        }
    }
}
