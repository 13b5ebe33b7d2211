use std::sync::Arc;

use crate::repository::RoomRepository;
use crate::service::BookingService;

pub mod bookings;
pub mod health;
pub mod properties;
pub mod rooms;

pub struct AppState {
    pub bookings: BookingService,
    pub rooms: Arc<dyn RoomRepository>,
}
