//! Listing route handlers. Thin controllers: parse the multipart/JSON body,
//! validate at the boundary, delegate to the ListingStore.

use std::collections::HashMap;

use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    Json,
};
use tracing::info;

use crate::common::ApiError;
use crate::domains::listings::data::{
    ListingData, ListingResponse, MessageResponse, StatusChangeRequest,
};
use crate::domains::listings::models::{
    CreateListing, ListingDetails, ListingKind, ListingPatch, ListingStatus, PriceType,
};
use crate::domains::listings::ImageUpload;
use crate::server::app::AppState;
use crate::server::middleware::AuthAdmin;

/// Text fields plus the optional image payload of a listing form.
struct ListingForm {
    fields: HashMap<String, String>,
    image: Option<ImageUpload>,
}

impl ListingForm {
    fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    fn require(&self, name: &str, message: &str) -> Result<String, ApiError> {
        match self.get(name) {
            Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
            _ => Err(ApiError::validation(message)),
        }
    }

    /// For patching a required field: absent means "leave unchanged", but a
    /// supplied value must still be non-empty.
    fn patch_required(&self, name: &str, message: &str) -> Result<Option<String>, ApiError> {
        match self.get(name) {
            Some(value) if value.trim().is_empty() => Err(ApiError::validation(message)),
            Some(value) => Ok(Some(value.to_string())),
            None => Ok(None),
        }
    }

    fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).map(|value| value == "true")
    }

    fn price(&self, name: &str) -> Result<Option<f64>, ApiError> {
        match self.get(name) {
            Some(value) => value
                .parse::<f64>()
                .map(Some)
                .map_err(|_| ApiError::validation("Price must be a number")),
            None => Ok(None),
        }
    }
}

/// Read a multipart form into text fields plus the optional `image` part.
async fn read_form(mut multipart: Multipart) -> Result<ListingForm, ApiError> {
    let mut fields = HashMap::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| ApiError::validation(format!("Invalid form data: {}", error)))?
    {
        let name = field.name().unwrap_or("").to_string();

        if name == "image" {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|error| ApiError::validation(format!("Failed to read image: {}", error)))?
                .to_vec();
            if !bytes.is_empty() {
                image = Some(ImageUpload { bytes, file_name });
            }
        } else {
            let value = field
                .text()
                .await
                .map_err(|error| ApiError::validation(format!("Failed to read field: {}", error)))?;
            fields.insert(name, value);
        }
    }

    Ok(ListingForm { fields, image })
}

fn title_field(kind: ListingKind) -> (&'static str, &'static str) {
    match kind {
        ListingKind::Product => ("name", "Product name is required"),
        ListingKind::Service => ("serviceTitle", "Service title is required"),
    }
}

fn create_from_form(kind: ListingKind, form: &ListingForm) -> Result<CreateListing, ApiError> {
    let (field, missing_message) = title_field(kind);
    let title = form.require(field, missing_message)?;
    let description = form.require("description", "Description is required")?;
    let price = form
        .price("price")?
        .ok_or_else(|| ApiError::validation("Price is required"))?;
    let seller_name = form.require("sellerName", "Seller name is required")?;
    let seller_contact = form.require("sellerContact", "Seller contact is required")?;
    let is_negotiable = form.bool("isNegotiable").unwrap_or(false);

    let details = match kind {
        ListingKind::Product => ListingDetails::Product {
            product_age: form.require("productAge", "Product age is required")?,
            has_bill: form.bool("hasBill").unwrap_or(false),
            is_groceries: form.bool("isGroceries").unwrap_or(false),
        },
        ListingKind::Service => ListingDetails::Service {
            price_type: match form.get("priceType") {
                Some(value) => PriceType::parse(value)?,
                None => PriceType::Fixed,
            },
            duration: form.get("duration").map(str::to_string),
            service_category: form.require("serviceCategory", "Service category is required")?,
            location: form.get("location").map(str::to_string),
        },
    };

    Ok(CreateListing {
        title,
        description,
        price,
        is_negotiable,
        seller_name,
        seller_contact,
        details,
    })
}

/// Build a patch from the whitelisted form fields for this kind. A `status`
/// field is validated here so the store only ever sees recognized values, and
/// required fields keep their non-empty constraint on edit.
fn patch_from_form(kind: ListingKind, form: &ListingForm) -> Result<ListingPatch, ApiError> {
    let (field, missing_message) = title_field(kind);

    let mut patch = ListingPatch {
        title: form.patch_required(field, missing_message)?,
        description: form.patch_required("description", "Description is required")?,
        price: form.price("price")?,
        is_negotiable: form.bool("isNegotiable"),
        seller_name: form.patch_required("sellerName", "Seller name is required")?,
        seller_contact: form.patch_required("sellerContact", "Seller contact is required")?,
        reason: form.get("reason").map(str::to_string),
        ..Default::default()
    };

    if let Some(status) = form.get("status") {
        patch.status = Some(ListingStatus::parse(kind, status)?);
    }

    match kind {
        ListingKind::Product => {
            patch.product_age = form.patch_required("productAge", "Product age is required")?;
            patch.has_bill = form.bool("hasBill");
            patch.is_groceries = form.bool("isGroceries");
        }
        ListingKind::Service => {
            if let Some(value) = form.get("priceType") {
                patch.price_type = Some(PriceType::parse(value)?);
            }
            patch.duration = form.get("duration").map(str::to_string);
            patch.service_category =
                form.patch_required("serviceCategory", "Service category is required")?;
            patch.location = form.get("location").map(str::to_string);
        }
    }

    Ok(patch)
}

/// POST /listings/{kind}
pub async fn create_listing(
    Extension(state): Extension<AppState>,
    Path(kind): Path<ListingKind>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ListingData>), ApiError> {
    let form = read_form(multipart).await?;
    let input = create_from_form(kind, &form)?;

    let listing = state.store.create(kind, input, form.image).await?;
    info!(kind = %kind, id = %listing.id, "Listing created");

    Ok((StatusCode::CREATED, Json(listing.into())))
}

/// GET /listings/{kind}
pub async fn list_listings(
    Extension(state): Extension<AppState>,
    Path(kind): Path<ListingKind>,
) -> Result<Json<Vec<ListingData>>, ApiError> {
    let listings = state.store.list_public(kind).await?;
    Ok(Json(listings.into_iter().map(ListingData::from).collect()))
}

/// GET /listings/{kind}/{id}
pub async fn get_listing(
    Extension(state): Extension<AppState>,
    Path((kind, id)): Path<(ListingKind, String)>,
) -> Result<Json<ListingData>, ApiError> {
    let listing = state.store.get(kind, &id).await?;
    Ok(Json(listing.into()))
}

/// PUT /listings/{kind}/{id} (admin full edit)
pub async fn update_listing(
    _admin: AuthAdmin,
    Extension(state): Extension<AppState>,
    Path((kind, id)): Path<(ListingKind, String)>,
    multipart: Multipart,
) -> Result<Json<ListingResponse>, ApiError> {
    let form = read_form(multipart).await?;
    let patch = patch_from_form(kind, &form)?;

    let listing = state.store.update(kind, &id, patch, form.image).await?;

    Ok(Json(ListingResponse {
        message: format!("{} updated", kind.label()),
        listing: listing.into(),
    }))
}

/// DELETE /listings/{kind}/{id} (admin)
pub async fn delete_listing(
    _admin: AuthAdmin,
    Extension(state): Extension<AppState>,
    Path((kind, id)): Path<(ListingKind, String)>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete(kind, &id).await?;
    Ok(Json(MessageResponse {
        message: format!("{} deleted", kind.label()),
    }))
}

/// PATCH /listings/{kind}/{id}/status (admin)
pub async fn change_status(
    _admin: AuthAdmin,
    Extension(state): Extension<AppState>,
    Path((kind, id)): Path<(ListingKind, String)>,
    Json(request): Json<StatusChangeRequest>,
) -> Result<Json<ListingResponse>, ApiError> {
    let listing = state
        .store
        .set_status(kind, &id, &request.status, request.reason)
        .await?;

    Ok(Json(ListingResponse {
        message: format!("Status updated to {}", listing.status),
        listing: listing.into(),
    }))
}
