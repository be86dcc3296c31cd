use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::ApiError;

/// The two listing kinds. Routed as path segments (`/listings/products`,
/// `/listings/services`) and stored in separate collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingKind {
    #[serde(rename = "products")]
    Product,
    #[serde(rename = "services")]
    Service,
}

impl ListingKind {
    pub fn collection_name(&self) -> &'static str {
        match self {
            ListingKind::Product => "products",
            ListingKind::Service => "services",
        }
    }

    /// Human-readable label used in response messages ("Product not found").
    pub fn label(&self) -> &'static str {
        match self {
            ListingKind::Product => "Product",
            ListingKind::Service => "Service",
        }
    }
}

impl std::fmt::Display for ListingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.collection_name())
    }
}

/// Moderation status. `Sold` is the terminal state for products,
/// `OutOfService` for services; they are semantically the same "no longer
/// transactable" state with kind-specific wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Pending,
    Approved,
    Rejected,
    Sold,
    OutOfService,
}

impl ListingStatus {
    /// Parse a status string for a listing kind. The terminal state name is
    /// kind-specific: `sold` for products, `out_of_service` for services.
    pub fn parse(kind: ListingKind, value: &str) -> Result<Self, ApiError> {
        match (kind, value) {
            (_, "pending") => Ok(ListingStatus::Pending),
            (_, "approved") => Ok(ListingStatus::Approved),
            (_, "rejected") => Ok(ListingStatus::Rejected),
            (ListingKind::Product, "sold") => Ok(ListingStatus::Sold),
            (ListingKind::Service, "out_of_service") => Ok(ListingStatus::OutOfService),
            _ => Err(ApiError::validation(format!(
                "Invalid status '{}' for {}",
                value,
                kind.label().to_lowercase()
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ListingStatus::Pending => "pending",
            ListingStatus::Approved => "approved",
            ListingStatus::Rejected => "rejected",
            ListingStatus::Sold => "sold",
            ListingStatus::OutOfService => "out_of_service",
        }
    }

    /// Whether this is the "no longer transactable" terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ListingStatus::Sold | ListingStatus::OutOfService)
    }
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pricing model for services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Fixed,
    Hourly,
}

impl PriceType {
    pub fn parse(value: &str) -> Result<Self, ApiError> {
        match value {
            "fixed" => Ok(PriceType::Fixed),
            "hourly" => Ok(PriceType::Hourly),
            _ => Err(ApiError::validation(format!(
                "Invalid price type '{}'",
                value
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceType::Fixed => "fixed",
            PriceType::Hourly => "hourly",
        }
    }
}

/// Handle to an asset on the media store. Either both fields are present or
/// the listing carries no image at all; `public_id` is what the media store
/// needs to delete the asset later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRef {
    pub url: String,
    pub public_id: String,
}

/// Kind-specific listing fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ListingDetails {
    #[serde(rename_all = "camelCase")]
    Product {
        product_age: String,
        #[serde(default)]
        has_bill: bool,
        #[serde(default)]
        is_groceries: bool,
    },
    #[serde(rename_all = "camelCase")]
    Service {
        price_type: PriceType,
        duration: Option<String>,
        service_category: String,
        location: Option<String>,
    },
}

impl ListingDetails {
    pub fn kind(&self) -> ListingKind {
        match self {
            ListingDetails::Product { .. } => ListingKind::Product,
            ListingDetails::Service { .. } => ListingKind::Service,
        }
    }
}

/// A marketplace listing (product or service).
///
/// `status` is the single source of truth for moderation state. The legacy
/// booleans `is_approved` and `is_terminal` exist for older clients and are
/// recomputed from `status` on every transition; nothing else may write them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    #[serde(rename = "_id")]
    pub id: String,

    pub title: String,
    pub description: String,
    pub price: f64,
    pub is_negotiable: bool,
    pub seller_name: String,
    pub seller_contact: String,

    #[serde(default)]
    pub image: Option<ImageRef>,

    // Moderation
    pub status: ListingStatus,
    #[serde(default)]
    pub reason: Option<String>,
    pub is_approved: bool,
    pub is_terminal: bool,

    #[serde(flatten)]
    pub details: ListingDetails,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a listing.
#[derive(Debug, Clone)]
pub struct CreateListing {
    pub title: String,
    pub description: String,
    pub price: f64,
    pub is_negotiable: bool,
    pub seller_name: String,
    pub seller_contact: String,
    pub details: ListingDetails,
}

/// Whitelisted patch for the full-edit flow. Fields absent from the patch are
/// left untouched; a `status` in the patch goes through the same transition
/// path as the dedicated status route.
#[derive(Debug, Clone, Default)]
pub struct ListingPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub is_negotiable: Option<bool>,
    pub seller_name: Option<String>,
    pub seller_contact: Option<String>,

    pub status: Option<ListingStatus>,
    pub reason: Option<String>,

    // Product-only
    pub product_age: Option<String>,
    pub has_bill: Option<bool>,
    pub is_groceries: Option<bool>,

    // Service-only
    pub price_type: Option<PriceType>,
    pub duration: Option<String>,
    pub service_category: Option<String>,
    pub location: Option<String>,
}

impl Listing {
    /// Create a new listing in the `pending` state.
    pub fn new(input: CreateListing, image: Option<ImageRef>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: input.title,
            description: input.description,
            price: input.price,
            is_negotiable: input.is_negotiable,
            seller_name: input.seller_name,
            seller_contact: input.seller_contact,
            image,
            status: ListingStatus::Pending,
            reason: None,
            is_approved: false,
            is_terminal: false,
            details: input.details,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn kind(&self) -> ListingKind {
        self.details.kind()
    }

    /// The single transition path. Sets `status`, recomputes both legacy
    /// flags, and handles the rejection reason:
    ///
    /// - transition into `approved` clears any stale rejection reason
    /// - a supplied reason replaces the stored one; absent, the stored reason
    ///   is kept (matching the status route's merge behavior)
    pub fn apply_status(&mut self, status: ListingStatus, reason: Option<String>) {
        self.status = status;
        self.is_approved = status == ListingStatus::Approved;
        self.is_terminal = status.is_terminal();
        match status {
            ListingStatus::Approved => self.reason = None,
            _ => {
                if let Some(reason) = reason {
                    self.reason = Some(reason);
                }
            }
        }
        self.touch();
    }

    /// Apply a whitelisted field patch. Kind-specific fields are only applied
    /// when they belong to this listing's kind; a `status` change is routed
    /// through `apply_status` so the legacy flags can never drift.
    pub fn apply_patch(&mut self, patch: ListingPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        if let Some(is_negotiable) = patch.is_negotiable {
            self.is_negotiable = is_negotiable;
        }
        if let Some(seller_name) = patch.seller_name {
            self.seller_name = seller_name;
        }
        if let Some(seller_contact) = patch.seller_contact {
            self.seller_contact = seller_contact;
        }

        match &mut self.details {
            ListingDetails::Product {
                product_age,
                has_bill,
                is_groceries,
            } => {
                if let Some(value) = patch.product_age {
                    *product_age = value;
                }
                if let Some(value) = patch.has_bill {
                    *has_bill = value;
                }
                if let Some(value) = patch.is_groceries {
                    *is_groceries = value;
                }
            }
            ListingDetails::Service {
                price_type,
                duration,
                service_category,
                location,
            } => {
                if let Some(value) = patch.price_type {
                    *price_type = value;
                }
                if let Some(value) = patch.duration {
                    *duration = Some(value);
                }
                if let Some(value) = patch.service_category {
                    *service_category = value;
                }
                if let Some(value) = patch.location {
                    *location = Some(value);
                }
            }
        }

        if let Some(status) = patch.status {
            self.apply_status(status, patch.reason);
        } else {
            if let Some(reason) = patch.reason {
                self.reason = Some(reason);
            }
            self.touch();
        }
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
