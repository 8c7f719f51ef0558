//! # saffra-core: Pure Business Logic for Saffra
//!
//! The rules behind the catering site's inquiry flow: field validation,
//! submission schemas, the inquiry cart and its delivery pricing. No I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Saffra Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Website                                      │   │
//! │  │    Menu ──► Inquiry cart ──► Contact / Careers form            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ saffra-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │ MenuItem  │  │   Money   │  │ Inquiry-  │  │  fields   │  │   │
//! │  │   │  forms    │  │format_    │  │  Cart     │  │  schemas  │  │   │
//! │  │   │           │  │  price    │  │ Totals    │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                         ┌───────────┐                           │   │
//! │  │                         │  session  │                           │   │
//! │  │                         └───────────┘                           │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             saffra-relay (email relay, menu source)             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Menu items, forms, catering orders
//! - [`money`] - Integer money and price formatting
//! - [`cart`] - Inquiry cart aggregator and pricing policy
//! - [`validation`] - Field rules and whole-form schemas
//! - [`session`] - Per-visitor form state and submission status
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use saffra_core::{InquiryCart, MenuCategory, MenuItem, Money};
//!
//! let platter = MenuItem {
//!     id: "platter-1".to_string(),
//!     name: "Mezze Platter".to_string(),
//!     description: None,
//!     price: Money::from_major(300),
//!     category: MenuCategory::Platter,
//!     image: None,
//!     min_order_quantity: None,
//!     includes: Vec::new(),
//!     available: true,
//! };
//!
//! let mut cart = InquiryCart::new();
//! cart.add(&platter);
//! cart.add(&platter);
//!
//! let totals = cart.compute_totals();
//! assert_eq!(totals.subtotal, Money::from_major(600));
//! assert!(totals.delivery_fee.is_zero());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartTotals, InquiryCart, InquiryItem, PricingPolicy};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{format_price, Money};
pub use session::{
    CareersSession, CateringInquiry, ContactSession, FormSession, FormState, SubmissionStatus,
};
pub use types::*;
pub use validation::{field_error_message, validate_field, FieldErrors, Validate};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Delivery fee charged below the free delivery threshold.
pub const DELIVERY_FEE: Money = Money::from_major(49);

/// Subtotal at or above which delivery is free (inclusive).
pub const FREE_DELIVERY_THRESHOLD: Money = Money::from_major(500);

/// Largest accepted difference between a quoted total and the computed one.
pub const AMOUNT_TOLERANCE: Money = Money::from_cents(1);

/// Largest party size the inquiry forms accept.
pub const MAX_GUEST_COUNT: u32 = 1000;

/// Largest quantity a single cart entry can hold.
pub const MAX_ITEM_QUANTITY: i64 = 9_999;
