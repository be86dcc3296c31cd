//! Wire-format response types. The per-kind field names of the original
//! clients are preserved here (`name` vs `serviceTitle`, `isSold` vs
//! `isOutOfService`); the internal model stays uniform.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domains::listings::models::{Listing, ListingDetails, ListingStatus, PriceType};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductData {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub seller_name: String,
    pub seller_contact: String,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub product_age: String,
    pub is_negotiable: bool,
    pub has_bill: bool,
    pub is_groceries: bool,
    pub status: ListingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub is_approved: bool,
    pub is_sold: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceData {
    pub id: String,
    pub service_title: String,
    pub description: String,
    pub price: f64,
    pub seller_name: String,
    pub seller_contact: String,
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub price_type: PriceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    pub service_category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub is_negotiable: bool,
    pub status: ListingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub is_approved: bool,
    pub is_out_of_service: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A listing as it appears on the wire, shaped per kind.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ListingData {
    Product(ProductData),
    Service(ServiceData),
}

impl From<Listing> for ListingData {
    fn from(listing: Listing) -> Self {
        let (image_url, image_public_id) = match listing.image {
            Some(image) => (Some(image.url), Some(image.public_id)),
            None => (None, None),
        };

        match listing.details {
            ListingDetails::Product {
                product_age,
                has_bill,
                is_groceries,
            } => ListingData::Product(ProductData {
                id: listing.id,
                name: listing.title,
                description: listing.description,
                price: listing.price,
                seller_name: listing.seller_name,
                seller_contact: listing.seller_contact,
                image_url,
                image_public_id,
                product_age,
                is_negotiable: listing.is_negotiable,
                has_bill,
                is_groceries,
                status: listing.status,
                reason: listing.reason,
                is_approved: listing.is_approved,
                is_sold: listing.is_terminal,
                created_at: listing.created_at,
                updated_at: listing.updated_at,
            }),
            ListingDetails::Service {
                price_type,
                duration,
                service_category,
                location,
            } => ListingData::Service(ServiceData {
                id: listing.id,
                service_title: listing.title,
                description: listing.description,
                price: listing.price,
                seller_name: listing.seller_name,
                seller_contact: listing.seller_contact,
                image_url,
                image_public_id,
                price_type,
                duration,
                service_category,
                location,
                is_negotiable: listing.is_negotiable,
                status: listing.status,
                reason: listing.reason,
                is_approved: listing.is_approved,
                is_out_of_service: listing.is_terminal,
                created_at: listing.created_at,
                updated_at: listing.updated_at,
            }),
        }
    }
}

/// Envelope for mutation responses (`{"message": ..., "listing": ...}`).
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    pub message: String,
    pub listing: ListingData,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Body of `PATCH /listings/{kind}/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct StatusChangeRequest {
    pub status: String,
    pub reason: Option<String>,
}

/// Body of `PATCH /admin/listings/{kind}/{id}/reject`.
#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
}
