//! Property listing API endpoints

pub mod types;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use types::SearchPropertiesQuery;

use crate::api::extractors::{ValidatedJson, ValidatedQuery};
use crate::api::types::ApiError;
use crate::domain::ListingService;
use crate::domain::listings::{NewProperty, Property, PropertyStatus};

/// Shared state for Properties API endpoints
#[derive(Clone)]
pub struct PropertiesApiState {
    pub listings: ListingService,
}

/// Build Properties API routes
pub fn routes(listings: ListingService) -> Router<()> {
    let state = PropertiesApiState { listings };

    Router::new()
        .route("/", get(search_properties).post(create_property))
        .with_state(state)
}

/// Search property listings
#[utoipa::path(
    get,
    path = "/api/v1/properties",
    tag = "properties",
    params(
        ("q" = Option<String>, Query, description = "Text matched in title, city, state or address"),
        ("min_price" = Option<i64>, Query, description = "Minimum price (inclusive)"),
        ("max_price" = Option<i64>, Query, description = "Maximum price (inclusive)"),
        ("bedrooms" = Option<i64>, Query, description = "Minimum bedrooms"),
        ("bathrooms" = Option<f64>, Query, description = "Minimum bathrooms"),
        ("city" = Option<String>, Query, description = "City (case-insensitive exact match)"),
        ("state" = Option<String>, Query, description = "State (case-insensitive exact match)"),
        ("property_type" = Option<String>, Query, description = "Property type (case-insensitive exact match)"),
        ("status" = Option<PropertyStatus>, Query, description = "Listing status (default sale)"),
        ("limit" = Option<u32>, Query, description = "Maximum results (1-200, default 50)")
    ),
    responses(
        (status = 200, description = "Matching listings in store order", body = [Property]),
        (status = 400, description = "Invalid query parameters"),
        (status = 503, description = "Database not available")
    )
)]
pub async fn search_properties(
    State(state): State<PropertiesApiState>,
    ValidatedQuery(query): ValidatedQuery<SearchPropertiesQuery>,
) -> Result<Json<Vec<Property>>, ApiError> {
    let criteria = query.to_criteria();
    let results = state.listings.search(&criteria, query.limit).await?;
    Ok(Json(results))
}

/// Create a property listing
#[utoipa::path(
    post,
    path = "/api/v1/properties",
    tag = "properties",
    request_body = NewProperty,
    responses(
        (status = 201, description = "Listing created, body is the new id", body = String),
        (status = 400, description = "Invalid request body"),
        (status = 503, description = "Database not available")
    )
)]
pub async fn create_property(
    State(state): State<PropertiesApiState>,
    ValidatedJson(body): ValidatedJson<NewProperty>,
) -> Result<(StatusCode, Json<String>), ApiError> {
    let id = state.listings.create(&body).await?;
    tracing::info!(id = %id, city = %body.city, status = %body.status, "Property created");
    Ok((StatusCode::CREATED, Json(id)))
}
