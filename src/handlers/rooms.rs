use actix_web::{web, HttpResponse};

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{property::PropertyRef, room::RoomDetail};

pub async fn get_room_by_id(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let room = state
        .rooms
        .find_room(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("room not found".to_string()))?;

    let property = state
        .rooms
        .find_property(room.property_id)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!("room {} references a missing property", room.id))
        })?;

    Ok(HttpResponse::Ok().json(RoomDetail {
        property: PropertyRef::from(&property),
        room,
    }))
}
