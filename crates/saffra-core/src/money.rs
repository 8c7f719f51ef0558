//! # Money Module
//!
//! Provides the `Money` type for menu prices, delivery fees and inquiry
//! totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  An order total checked against Σ(price × qty) + fee with floats       │
//! │  needs an epsilon. With integer öre the check is exact arithmetic      │
//! │  plus an explicit one-öre tolerance.                                   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use saffra_core::money::Money;
//!
//! let buffet = Money::from_major(180);
//! let fee = Money::from_major(49);
//!
//! assert_eq!((buffet + fee).cents(), 22_900);
//! assert_eq!((buffet + fee).to_string(), "229 kr");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (öre).
///
/// ## Design Decisions
/// - **i64 (signed)**: differences between two totals can be negative
/// - **Single field tuple struct**: serializes as the bare integer
///
/// ## Where Money is Used
/// ```text
/// MenuItem.price ──► InquiryItem.price ──► line total (× quantity)
///                                                │
///                    CartTotals.subtotal ◄───────┘
///                           │
///                           ├──► delivery fee (threshold check)
///                           ▼
///                    CartTotals.total ──► relay message "229 kr"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ```rust
    /// use saffra_core::money::Money;
    ///
    /// let price = Money::from_cents(4950); // 49,50 kr
    /// assert_eq!(price.cents(), 4950);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// Menu prices and the delivery constants are quoted in whole kronor.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit carries the sign:
    /// `from_major_minor(-5, 50)` is -5,50, not -4,50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.saturating_abs())
    }

    /// Multiplies a unit price by a quantity, saturating at the `i64` bounds.
    ///
    /// ```rust
    /// use saffra_core::money::Money;
    ///
    /// let platter = Money::from_major(300);
    /// assert_eq!(platter.multiply_quantity(2), Money::from_major(600));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }

    /// Parses a decimal amount in whole units, as the menu database returns
    /// prices (`"180"`, `"49.5"`, `"49.50"`).
    ///
    /// Returns `None` for anything with more than two decimals, a sign, or
    /// non-digit characters.
    ///
    /// ```rust
    /// use saffra_core::money::Money;
    ///
    /// assert_eq!(Money::parse_major("49.5"), Some(Money::from_cents(4950)));
    /// assert_eq!(Money::parse_major("180"), Some(Money::from_major(180)));
    /// assert_eq!(Money::parse_major("-1"), None);
    /// ```
    pub fn parse_major(input: &str) -> Option<Money> {
        let input = input.trim();
        let (whole, fraction) = match input.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (input, ""),
        };

        if whole.is_empty()
            || fraction.len() > 2
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }

        let major: i64 = whole.parse().ok()?;
        let minor: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().ok()? * 10,
            _ => fraction.parse().ok()?,
        };

        major
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(minor))
            .map(Money::from_cents)
    }

    /// Returns the amount still missing to reach `target`, zero once reached.
    #[inline]
    pub fn shortfall_to(&self, target: Money) -> Money {
        if *self >= target {
            Money::zero()
        } else {
            target - *self
        }
    }
}

// =============================================================================
// Price Formatting
// =============================================================================

/// Renders an amount the way the website shows prices.
///
/// Whole amounts drop the decimals; fractional amounts use a decimal comma.
/// Thousands are grouped with a space and the `kr` suffix always follows.
///
/// ```rust
/// use saffra_core::money::{format_price, Money};
///
/// assert_eq!(format_price(Money::from_major(1299)), "1 299 kr");
/// assert_eq!(format_price(Money::from_cents(4950)), "49,50 kr");
/// assert_eq!(format_price(Money::zero()), "0 kr");
/// ```
pub fn format_price(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    let whole = group_thousands(amount.major().unsigned_abs());

    match amount.minor_part() {
        0 => format!("{sign}{whole} kr"),
        minor => format!("{sign}{whole},{minor:02} kr"),
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }

    grouped
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_price(*self))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
