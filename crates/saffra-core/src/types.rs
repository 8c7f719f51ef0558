//! # Domain Types
//!
//! Menu, form and order types used throughout Saffra.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    MenuItem     │   │   ContactForm   │   │   CareersForm   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (opaque)    │   │  name, email    │   │  name, email    │       │
//! │  │  price (Money)  │   │  phone?         │   │  phone          │       │
//! │  │  category       │   │  message?       │   │  job_title      │       │
//! │  │  min_order_qty? │   │  event_date?    │   │  message        │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  MenuCategory   │   │ DeliveryMethod  │   │  CateringOrder  │       │
//! │  │  Buffet, ...    │   │  Delivery       │   │  items, total   │       │
//! │  └─────────────────┘   │  Pickup         │   │  (order schema) │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Optional form fields are `Option<String>`. "Not provided" and "provided
//! but blank" both normalize to `None` through [`normalize_optional`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::cart::InquiryItem;
use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Menu
// =============================================================================

/// Menu category tag. Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum MenuCategory {
    Buffet,
    Platter,
    FingerFood,
    Main,
    Side,
    Dessert,
    Drink,
}

impl MenuCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuCategory::Buffet => "buffet",
            MenuCategory::Platter => "platter",
            MenuCategory::FingerFood => "finger_food",
            MenuCategory::Main => "main",
            MenuCategory::Side => "side",
            MenuCategory::Dessert => "dessert",
            MenuCategory::Drink => "drink",
        }
    }
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A dish or package offered on the menu.
///
/// Managed by the admin dashboard; the inquiry flow only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Opaque identifier assigned by the menu database.
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Price per unit, never negative.
    pub price: Money,

    pub category: MenuCategory,

    /// Image reference (URL or storage key).
    #[serde(default)]
    pub image: Option<String>,

    /// Smallest quantity that can be ordered. Absent means 1.
    #[serde(default)]
    pub min_order_quantity: Option<u32>,

    /// Sub-items that come with the package ("rice", "naan", ...).
    #[serde(default)]
    pub includes: Vec<String>,

    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl MenuItem {
    /// The quantity floor for this item: `max(1, min_order_quantity)`.
    #[inline]
    pub fn quantity_floor(&self) -> i64 {
        i64::from(self.min_order_quantity.unwrap_or(1).max(1))
    }
}

/// Filters a menu to the items on offer and orders it by category.
///
/// Items within one category keep their source order.
pub fn available_menu(items: impl IntoIterator<Item = MenuItem>) -> Vec<MenuItem> {
    let mut menu: Vec<MenuItem> = items.into_iter().filter(|i| i.available).collect();
    menu.sort_by_key(|i| i.category);
    menu
}

// =============================================================================
// Delivery
// =============================================================================

/// How a catering order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    #[default]
    Delivery,
    Pickup,
}

impl DeliveryMethod {
    /// Whether this method charges the delivery fee.
    #[inline]
    pub fn requires_fee(&self) -> bool {
        matches!(self, DeliveryMethod::Delivery)
    }
}

// =============================================================================
// Form Identity
// =============================================================================

/// Which form a field belongs to. Field rules differ per form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    /// Contact / catering inquiry form.
    Contact,
    Careers,
    /// Order schema (cross-field totals).
    Order,
}

/// A named form field.
///
/// Serializes with the website's field names (`jobTitle`, `eventDate`, ...),
/// so an error map can be handed to the frontend as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Name,
    Email,
    Phone,
    JobTitle,
    Message,
    Company,
    EventDate,
    GuestCount,
    Items,
    DeliveryAddress,
    TotalAmount,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::JobTitle => "jobTitle",
            Field::Message => "message",
            Field::Company => "company",
            Field::EventDate => "eventDate",
            Field::GuestCount => "guestCount",
            Field::Items => "items",
            Field::DeliveryAddress => "deliveryAddress",
            Field::TotalAmount => "totalAmount",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s {
            "name" => Field::Name,
            "email" => Field::Email,
            "phone" => Field::Phone,
            "jobTitle" => Field::JobTitle,
            "message" => Field::Message,
            "company" => Field::Company,
            "eventDate" => Field::EventDate,
            "guestCount" => Field::GuestCount,
            "items" => Field::Items,
            "deliveryAddress" => Field::DeliveryAddress,
            "totalAmount" => Field::TotalAmount,
            other => return Err(CoreError::UnknownField(other.to_string())),
        };
        Ok(field)
    }
}

// =============================================================================
// Forms
// =============================================================================

/// Contact / catering inquiry form.
///
/// For catering inquiries the session's cart travels alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    #[ts(as = "Option<String>")]
    pub event_date: Option<NaiveDate>,
    pub guest_count: Option<u32>,
    pub message: Option<String>,
}

impl ContactForm {
    /// Text value of a field, `None` when absent or not part of this form.
    pub fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(self.name.as_str()),
            Field::Email => Some(self.email.as_str()),
            Field::Phone => self.phone.as_deref(),
            Field::Company => self.company.as_deref(),
            Field::Message => self.message.as_deref(),
            _ => None,
        }
    }

    /// Updates a text field from raw input. Returns false if the field is
    /// not a text field of this form.
    pub fn set_value(&mut self, field: Field, raw: &str) -> bool {
        match field {
            Field::Name => self.name = raw.to_string(),
            Field::Email => self.email = raw.to_string(),
            Field::Phone => self.phone = normalize_optional(raw),
            Field::Company => self.company = normalize_optional(raw),
            Field::Message => self.message = normalize_optional(raw),
            _ => return false,
        }
        true
    }
}

/// Careers application form. Every field is required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct CareersForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub job_title: String,
    pub message: String,
}

impl CareersForm {
    pub fn value(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(self.name.as_str()),
            Field::Email => Some(self.email.as_str()),
            Field::Phone => Some(self.phone.as_str()),
            Field::JobTitle => Some(self.job_title.as_str()),
            Field::Message => Some(self.message.as_str()),
            _ => None,
        }
    }

    pub fn set_value(&mut self, field: Field, raw: &str) -> bool {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::JobTitle => &mut self.job_title,
            Field::Message => &mut self.message,
            _ => return false,
        };
        *slot = raw.to_string();
        true
    }
}

/// A catering order as the order schema sees it.
///
/// Not produced by any current UI flow; validated when orders are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CateringOrder {
    pub items: Vec<InquiryItem>,
    pub delivery_method: DeliveryMethod,
    #[serde(default)]
    pub delivery_address: Option<String>,
    #[ts(as = "String")]
    pub event_date: NaiveDate,
    pub guest_count: u32,
    /// Fee charged when `delivery_method` requires one.
    pub delivery_fee: Money,
    /// Amount the customer was quoted.
    pub total_amount: Money,
}

impl CateringOrder {
    /// `Σ(price × quantity)` plus the fee when the method requires it.
    pub fn expected_total(&self) -> Money {
        let subtotal: Money = self.items.iter().map(InquiryItem::line_total).sum();
        if self.delivery_method.requires_fee() {
            subtotal + self.delivery_fee
        } else {
            subtotal
        }
    }
}

/// Maps blank input to `None`.
pub fn normalize_optional(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        None
    } else {
        Some(raw.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
