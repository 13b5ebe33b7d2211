use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::property::PropertyRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: i64,
    pub property_id: i64,
    pub name: String,
    pub room_type: String,
    pub capacity: i64,
    pub price: f64,
    /// Owner-controlled switch, independent of the booking calendar.
    pub available: bool,
    #[sqlx(json)]
    pub amenities: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetail {
    #[serde(flatten)]
    pub room: Room,
    pub property: PropertyRef,
}
