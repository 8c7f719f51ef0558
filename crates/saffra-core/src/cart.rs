//! # Inquiry Cart
//!
//! The staging list of menu items a customer wants a quote for.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Inquiry Cart Operations                              │
//! │                                                                         │
//! │  Frontend Action          Cart Method             State Change          │
//! │  ───────────────          ───────────             ────────────          │
//! │                                                                         │
//! │  "Add to inquiry" ───────► add(&menu_item) ─────► new: qty = MOQ       │
//! │                                                   existing: qty += 1    │
//! │                                                                         │
//! │  Stepper + ──────────────► increment(id) ─────────► qty += 1           │
//! │                                                                         │
//! │  Stepper - ──────────────► decrement(id) ─────────► qty -= 1, or       │
//! │                                                   removed below MOQ     │
//! │                                                                         │
//! │  Quantity input ─────────► set_quantity(id, n) ──► qty = min(n, MAX)   │
//! │                                                   removed (n <= 0)      │
//! │                                                                         │
//! │  Remove button ──────────► remove(id) ────────────► entry deleted      │
//! │                                                                         │
//! │  Summary panel ──────────► compute_totals() ──────► (read only)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! No operation here fails. Out-of-range requests normalize: a quantity at or
//! below zero means removal, and quantities never exceed [`MAX_ITEM_QUANTITY`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::MenuItem;
use crate::{DELIVERY_FEE, FREE_DELIVERY_THRESHOLD, MAX_ITEM_QUANTITY};

// =============================================================================
// Pricing Policy
// =============================================================================

/// Delivery fee rules.
///
/// `Default` uses [`DELIVERY_FEE`] and [`FREE_DELIVERY_THRESHOLD`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingPolicy {
    pub delivery_fee: Money,
    /// Subtotal at or above which delivery is free.
    pub free_delivery_threshold: Money,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        PricingPolicy {
            delivery_fee: DELIVERY_FEE,
            free_delivery_threshold: FREE_DELIVERY_THRESHOLD,
        }
    }
}

impl PricingPolicy {
    /// The fee for a given subtotal. The threshold comparison is inclusive.
    #[inline]
    pub fn delivery_fee_for(&self, subtotal: Money) -> Money {
        if self.qualifies_for_free_delivery(subtotal) {
            Money::zero()
        } else {
            self.delivery_fee
        }
    }

    #[inline]
    pub fn qualifies_for_free_delivery(&self, subtotal: Money) -> bool {
        subtotal >= self.free_delivery_threshold
    }
}

// =============================================================================
// Inquiry Item
// =============================================================================

/// A menu item staged in the inquiry cart.
///
/// Name, price and minimum order quantity are copied from the menu item when
/// it is first added and stay fixed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InquiryItem {
    /// Menu item id.
    pub id: String,

    pub name: String,

    /// Unit price at add-time.
    pub price: Money,

    pub quantity: i64,

    #[serde(default)]
    pub image: Option<String>,

    /// Minimum order quantity at add-time, the decrement floor.
    #[serde(default)]
    pub min_order_quantity: Option<u32>,

    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl InquiryItem {
    /// Stages a menu item at its minimum order quantity.
    pub fn from_menu_item(item: &MenuItem) -> Self {
        InquiryItem {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: item.quantity_floor().min(MAX_ITEM_QUANTITY),
            image: item.image.clone(),
            min_order_quantity: item.min_order_quantity,
            added_at: Utc::now(),
        }
    }

    /// `max(1, min_order_quantity)`.
    #[inline]
    pub fn quantity_floor(&self) -> i64 {
        i64::from(self.min_order_quantity.unwrap_or(1).max(1))
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }

    fn bump(&mut self) {
        self.quantity = self.quantity.saturating_add(1).min(MAX_ITEM_QUANTITY);
    }
}

// =============================================================================
// Inquiry Cart
// =============================================================================

/// The inquiry cart.
///
/// ## Invariants
/// - Entries are unique by `id` (adding the same item bumps its quantity)
/// - Every entry has `0 < quantity <= MAX_ITEM_QUANTITY`
/// - Entries created by `add` start at `max(1, MOQ)`; `decrement` never
///   leaves an entry below that floor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InquiryCart {
    items: Vec<InquiryItem>,
}

impl InquiryCart {
    pub fn new() -> Self {
        InquiryCart { items: Vec::new() }
    }

    /// Adds a menu item, or bumps the quantity by one if already staged.
    pub fn add(&mut self, menu_item: &MenuItem) {
        if let Some(item) = self.find_mut(&menu_item.id) {
            item.bump();
            return;
        }
        self.items.push(InquiryItem::from_menu_item(menu_item));
    }

    /// Replaces an entry's quantity; `quantity <= 0` removes the entry.
    ///
    /// Clamped to [`MAX_ITEM_QUANTITY`], not to the minimum order quantity.
    /// Unknown ids are ignored.
    pub fn set_quantity(&mut self, id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove(id);
            return;
        }
        if let Some(item) = self.find_mut(id) {
            item.quantity = quantity.min(MAX_ITEM_QUANTITY);
        }
    }

    /// Stepper "+". Unknown ids are ignored.
    pub fn increment(&mut self, id: &str) {
        if let Some(item) = self.find_mut(id) {
            item.bump();
        }
    }

    /// Stepper "-". Stepping below the floor removes the entry.
    pub fn decrement(&mut self, id: &str) {
        let Some(item) = self.find_mut(id) else {
            return;
        };
        if item.quantity - 1 < item.quantity_floor() {
            self.remove(id);
        } else {
            item.quantity -= 1;
        }
    }

    /// Deletes an entry. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let initial_len = self.items.len();
        self.items.retain(|i| i.id != id);
        self.items.len() != initial_len
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[InquiryItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&InquiryItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct entries.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    pub fn subtotal(&self) -> Money {
        self.items.iter().map(InquiryItem::line_total).sum()
    }

    /// Totals under the default [`PricingPolicy`].
    pub fn compute_totals(&self) -> CartTotals {
        self.compute_totals_with(&PricingPolicy::default())
    }

    /// Totals under an explicit policy. Always derived from current entries.
    pub fn compute_totals_with(&self, policy: &PricingPolicy) -> CartTotals {
        let subtotal = self.subtotal();
        let delivery_fee = policy.delivery_fee_for(subtotal);

        CartTotals {
            item_count: self.total_quantity(),
            line_count: self.line_count(),
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
            qualifies_for_free_delivery: policy.qualifies_for_free_delivery(subtotal),
            amount_until_free_delivery: subtotal.shortfall_to(policy.free_delivery_threshold),
        }
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut InquiryItem> {
        self.items.iter_mut().find(|i| i.id == id)
    }
}

/// Derived pricing summary of an inquiry cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Sum of quantities.
    pub item_count: i64,
    /// Distinct entries.
    pub line_count: usize,
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub total: Money,
    pub qualifies_for_free_delivery: bool,
    pub amount_until_free_delivery: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
