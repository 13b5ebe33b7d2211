use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::room::Room;

pub const DEFAULT_PAGE_SIZE: i64 = 12;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub country: String,
    #[sqlx(json)]
    pub amenities: Vec<String>,
    pub rating: f64,
    pub review_count: i64,
    pub featured: bool,
    pub owner_id: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PropertyRef {
    pub id: i64,
    pub name: String,
    pub city: String,
    pub country: String,
}

impl From<&Property> for PropertyRef {
    fn from(p: &Property) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            city: p.city.clone(),
            country: p.country.clone(),
        }
    }
}

/// Listing row: a property plus figures derived from its rooms.
#[derive(Debug, Serialize, Clone, PartialEq, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PropertySummary {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
    pub country: String,
    #[sqlx(json)]
    pub amenities: Vec<String>,
    pub rating: f64,
    pub review_count: i64,
    pub featured: bool,
    pub room_count: i64,
    pub min_price: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDetail {
    #[serde(flatten)]
    pub property: Property,
    pub room_count: i64,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub rooms: Vec<Room>,
}

impl PropertyDetail {
    pub fn new(property: Property, rooms: Vec<Room>) -> Self {
        let min_price = rooms.iter().map(|r| r.price).reduce(f64::min);
        let max_price = rooms.iter().map(|r| r.price).reduce(f64::max);
        Self {
            property,
            room_count: rooms.len() as i64,
            min_price,
            max_price,
            rooms,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PropertySearch {
    pub city: Option<String>,
    #[validate(range(min = 0.0))]
    pub min_price: Option<f64>,
    #[validate(range(min = 0.0))]
    pub max_price: Option<f64>,
    #[validate(range(min = 1))]
    pub guests: Option<i64>,
    /// Comma separated.
    pub amenities: Option<String>,
    #[validate(range(min = 1, max = 10_000))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 50))]
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    pub city: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub guests: Option<i64>,
    pub amenities: Vec<String>,
    pub page: i64,
    pub limit: i64,
}

impl From<PropertySearch> for PropertyFilter {
    fn from(search: PropertySearch) -> Self {
        let amenities = search
            .amenities
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            city: search.city.filter(|c| !c.trim().is_empty()),
            min_price: search.min_price,
            max_price: search.max_price,
            guests: search.guests,
            amenities,
            page: search.page.unwrap_or(1),
            limit: search.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

impl PropertyFilter {
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn has_room_filter(&self) -> bool {
        self.min_price.is_some() || self.max_price.is_some() || self.guests.is_some()
    }

    pub fn room_matches(&self, room: &Room) -> bool {
        self.min_price.map_or(true, |min| room.price >= min)
            && self.max_price.map_or(true, |max| room.price <= max)
            && self.guests.map_or(true, |g| room.capacity >= g)
    }

    pub fn property_matches(&self, property: &Property) -> bool {
        let city_ok = self.city.as_ref().map_or(true, |city| {
            property
                .city
                .to_ascii_lowercase()
                .contains(&city.to_ascii_lowercase())
        });
        let amenities_ok = self.amenities.iter().all(|wanted| {
            property
                .amenities
                .iter()
                .any(|have| have.eq_ignore_ascii_case(wanted))
        });
        city_ok && amenities_ok
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total_count: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total_count: i64) -> Self {
        let total_pages = (total_count + limit - 1) / limit;
        Self {
            page,
            limit,
            total_count,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PropertyPage {
    pub properties: Vec<PropertySummary>,
    pub pagination: Pagination,
}
