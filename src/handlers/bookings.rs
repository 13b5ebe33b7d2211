use actix_web::{web, HttpResponse};
use validator::Validate;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::identity::Requester;
use crate::models::booking::{
    AvailabilityRequest, AvailabilityResponse, CreateBookingRequest, UpdateBookingRequest,
};
use crate::service::BookingDraft;

fn required<T>(value: Option<T>) -> AppResult<T> {
    value.ok_or_else(|| AppError::InvalidInput("missing required fields".to_string()))
}

fn required_text(value: Option<String>) -> AppResult<String> {
    required(value.filter(|v| !v.trim().is_empty()))
}

pub async fn check_availability(
    state: web::Data<AppState>,
    body: web::Json<AvailabilityRequest>,
) -> AppResult<HttpResponse> {
    let body = body.into_inner();
    let room_id = required(body.room_id)?;
    let check_in = required_text(body.check_in)?;
    let check_out = required_text(body.check_out)?;

    let availability = state
        .bookings
        .check_availability(room_id, &check_in, &check_out)
        .await?;

    Ok(HttpResponse::Ok().json(AvailabilityResponse::from(availability)))
}

pub async fn create_booking(
    state: web::Data<AppState>,
    requester: Requester,
    body: web::Json<CreateBookingRequest>,
) -> AppResult<HttpResponse> {
    body.validate()?;
    let body = body.into_inner();

    let draft = BookingDraft {
        room_id: required(body.room_id)?,
        check_in: required_text(body.check_in)?,
        check_out: required_text(body.check_out)?,
        guests: required(body.guests)?,
        special_requests: body.special_requests.filter(|s| !s.trim().is_empty()),
    };

    let booking = state.bookings.create_booking(&requester, draft).await?;
    let booking = state.bookings.booking_detail(booking).await?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "booking": booking })))
}

pub async fn list_bookings(
    state: web::Data<AppState>,
    requester: Requester,
) -> AppResult<HttpResponse> {
    let bookings = state.bookings.bookings_for(&requester).await?;
    let bookings = state.bookings.booking_details(bookings).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "bookings": bookings })))
}

pub async fn get_booking(
    state: web::Data<AppState>,
    requester: Requester,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let booking = state
        .bookings
        .get_booking(path.into_inner(), &requester)
        .await?;
    let booking = state.bookings.booking_detail(booking).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "booking": booking })))
}

pub async fn update_booking(
    state: web::Data<AppState>,
    requester: Requester,
    path: web::Path<i64>,
    body: web::Json<UpdateBookingRequest>,
) -> AppResult<HttpResponse> {
    let desired = body.into_inner().status.unwrap_or_default();
    let booking = state
        .bookings
        .update_status(path.into_inner(), &requester, &desired)
        .await?;
    let booking = state.bookings.booking_detail(booking).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "booking": booking })))
}
