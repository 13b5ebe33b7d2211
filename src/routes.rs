use actix_web::web;

use crate::error::AppError;
use crate::handlers::{bookings, health, properties, rooms};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _| AppError::InvalidInput(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _| AppError::InvalidInput(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _| AppError::InvalidInput(err.to_string()).into()),
    )
    .route("/health", web::get().to(health::health_check))
    .service(
        web::scope("/properties")
            .route("", web::get().to(properties::get_properties))
            .route("/{id}", web::get().to(properties::get_property_by_id)),
    )
    .service(web::scope("/rooms").route("/{id}", web::get().to(rooms::get_room_by_id)))
    .service(
        web::scope("/bookings")
            .route("", web::get().to(bookings::list_bookings))
            .route("", web::post().to(bookings::create_booking))
            .route(
                "/check-availability",
                web::post().to(bookings::check_availability),
            )
            .route("/{id}", web::get().to(bookings::get_booking))
            .route("/{id}", web::patch().to(bookings::update_booking)),
    );
}
