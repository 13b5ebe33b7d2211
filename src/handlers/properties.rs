use actix_web::{web, HttpResponse};
use validator::Validate;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::models::property::{
    Pagination, PropertyDetail, PropertyFilter, PropertyPage, PropertySearch,
};

pub async fn get_properties(
    state: web::Data<AppState>,
    params: web::Query<PropertySearch>,
) -> AppResult<HttpResponse> {
    params.validate()?;
    let filter = PropertyFilter::from(params.into_inner());

    let (properties, total) = state.rooms.search_properties(&filter).await?;

    Ok(HttpResponse::Ok().json(PropertyPage {
        properties,
        pagination: Pagination::new(filter.page, filter.limit, total),
    }))
}

pub async fn get_property_by_id(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let property = state
        .rooms
        .find_property(id)
        .await?
        .ok_or_else(|| AppError::NotFound("property not found".to_string()))?;
    let rooms = state.rooms.rooms_of_property(id).await?;

    Ok(HttpResponse::Ok().json(PropertyDetail::new(property, rooms)))
}
