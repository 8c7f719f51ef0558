//! # Validation Module
//!
//! Field rules and submission-time schemas for the inquiry forms.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  On blur: validate_field(form, field, value)                           │
//! │  ├── One field, first failing rule wins                                │
//! │  └── Message shown under the input                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  On submit: Validate::validate(&form)                                  │
//! │  ├── Every field rule again, all fields, no fail-fast                  │
//! │  ├── Cross-field rules (dates, totals)                                 │
//! │  └── Non-empty FieldErrors ──► no network call                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rules are ordered per field: required, then minimum length, then
//! maximum length, then format. Lengths count characters of the trimmed
//! value.
//!
//! ## Usage
//! ```rust
//! use saffra_core::validation::{field_error_message, validate_field};
//! use saffra_core::{Field, FormKind};
//!
//! assert!(validate_field(FormKind::Contact, Field::Name, Some("Ada")).is_ok());
//! assert_eq!(
//!     field_error_message(FormKind::Careers, Field::Message, Some("Too short")),
//!     "Please tell us a bit more (at least 10 characters)"
//! );
//! ```

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;

use crate::cart::InquiryItem;
use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CareersForm, CateringOrder, ContactForm, Field, FormKind};
use crate::{AMOUNT_TOLERANCE, MAX_GUEST_COUNT, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

// =============================================================================
// Rule Tables
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum Check {
    Required,
    MinLen(usize),
    MaxLen(usize),
    Email,
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    check: Check,
    message: &'static str,
}

const fn rule(check: Check, message: &'static str) -> Rule {
    Rule { check, message }
}

#[derive(Debug)]
struct FieldRules {
    field: Field,
    rules: &'static [Rule],
}

const NAME_RULES: &[Rule] = &[
    rule(Check::Required, "Please enter your name"),
    rule(Check::MinLen(2), "Name must be at least 2 characters"),
    rule(Check::MaxLen(100), "Name must be at most 100 characters"),
];

const EMAIL_RULES: &[Rule] = &[
    rule(Check::Required, "Please enter your email address"),
    rule(Check::Email, "Please enter a valid email address"),
];

const OPTIONAL_PHONE_RULES: &[Rule] = &[
    rule(Check::MinLen(8), "Phone number must be at least 8 characters"),
    rule(Check::MaxLen(20), "Phone number must be at most 20 characters"),
];

const REQUIRED_PHONE_RULES: &[Rule] = &[
    rule(Check::Required, "Please enter your phone number"),
    rule(Check::MinLen(8), "Phone number must be at least 8 characters"),
    rule(Check::MaxLen(20), "Phone number must be at most 20 characters"),
];

const COMPANY_RULES: &[Rule] = &[rule(
    Check::MaxLen(100),
    "Company name must be at most 100 characters",
)];

const OPTIONAL_MESSAGE_RULES: &[Rule] = &[rule(
    Check::MaxLen(1000),
    "Message must be at most 1000 characters",
)];

const CAREERS_MESSAGE_RULES: &[Rule] = &[
    rule(Check::Required, "Please tell us a bit about yourself"),
    rule(
        Check::MinLen(10),
        "Please tell us a bit more (at least 10 characters)",
    ),
    rule(Check::MaxLen(1000), "Message must be at most 1000 characters"),
];

const JOB_TITLE_RULES: &[Rule] = &[rule(
    Check::Required,
    "Please choose the position you are applying for",
)];

const DELIVERY_ADDRESS_RULES: &[Rule] = &[
    rule(Check::Required, "Please enter a delivery address"),
    rule(Check::MinLen(5), "Delivery address must be at least 5 characters"),
    rule(Check::MaxLen(200), "Delivery address must be at most 200 characters"),
];

const CONTACT_FIELDS: &[FieldRules] = &[
    FieldRules { field: Field::Name, rules: NAME_RULES },
    FieldRules { field: Field::Email, rules: EMAIL_RULES },
    FieldRules { field: Field::Phone, rules: OPTIONAL_PHONE_RULES },
    FieldRules { field: Field::Company, rules: COMPANY_RULES },
    FieldRules { field: Field::Message, rules: OPTIONAL_MESSAGE_RULES },
];

const CAREERS_FIELDS: &[FieldRules] = &[
    FieldRules { field: Field::Name, rules: NAME_RULES },
    FieldRules { field: Field::Email, rules: EMAIL_RULES },
    FieldRules { field: Field::Phone, rules: REQUIRED_PHONE_RULES },
    FieldRules { field: Field::JobTitle, rules: JOB_TITLE_RULES },
    FieldRules { field: Field::Message, rules: CAREERS_MESSAGE_RULES },
];

const ORDER_FIELDS: &[FieldRules] = &[FieldRules {
    field: Field::DeliveryAddress,
    rules: DELIVERY_ADDRESS_RULES,
}];

fn form_rules(form: FormKind) -> &'static [FieldRules] {
    match form {
        FormKind::Contact => CONTACT_FIELDS,
        FormKind::Careers => CAREERS_FIELDS,
        FormKind::Order => ORDER_FIELDS,
    }
}

fn rules_for(form: FormKind, field: Field) -> Option<&'static FieldRules> {
    form_rules(form).iter().find(|r| r.field == field)
}

// =============================================================================
// Field Validator
// =============================================================================

/// Validates one field of one form.
///
/// `None` and blank values count as "not provided": required fields fail
/// with their required message, optional fields pass without running their
/// other rules. Fields without text rules on `form` always pass.
pub fn validate_field(form: FormKind, field: Field, value: Option<&str>) -> ValidationResult<()> {
    let Some(field_rules) = rules_for(form, field) else {
        return Ok(());
    };

    let value = value.map(str::trim).filter(|v| !v.is_empty());
    let Some(value) = value else {
        return match field_rules.rules.iter().find(|r| matches!(r.check, Check::Required)) {
            Some(required) => Err(ValidationError::Required {
                field,
                message: required.message,
            }),
            None => Ok(()),
        };
    };

    let len = value.chars().count();
    for r in field_rules.rules {
        match r.check {
            Check::Required => {}
            Check::MinLen(min) if len < min => {
                return Err(ValidationError::TooShort {
                    field,
                    min,
                    message: r.message,
                })
            }
            Check::MaxLen(max) if len > max => {
                return Err(ValidationError::TooLong {
                    field,
                    max,
                    message: r.message,
                })
            }
            Check::Email if !EMAIL_SHAPE.is_match(value) => {
                return Err(ValidationError::InvalidFormat {
                    field,
                    message: r.message,
                })
            }
            _ => {}
        }
    }

    Ok(())
}

/// Blur-handler form of [`validate_field`]: the message to show, or an
/// empty string when the value is valid.
pub fn field_error_message(form: FormKind, field: Field, value: Option<&str>) -> String {
    match validate_field(form, field, value) {
        Ok(()) => String::new(),
        Err(e) => e.to_string(),
    }
}

/// Validates an event date against the first allowed day.
pub fn validate_event_date(date: NaiveDate, today: NaiveDate) -> ValidationResult<()> {
    if date < today {
        return Err(ValidationError::DateInPast {
            field: Field::EventDate,
            message: "Please choose a date that has not already passed",
        });
    }
    Ok(())
}

/// Validates a guest count: 1 to [`MAX_GUEST_COUNT`].
pub fn validate_guest_count(count: u32) -> ValidationResult<()> {
    if count == 0 || count > MAX_GUEST_COUNT {
        return Err(ValidationError::OutOfRange {
            field: Field::GuestCount,
            min: 1,
            max: i64::from(MAX_GUEST_COUNT),
            message: "Please enter a number of guests between 1 and 1000",
        });
    }
    Ok(())
}

/// Cross-field total check: `actual` must be within [`AMOUNT_TOLERANCE`]
/// of `expected`.
pub fn validate_total(expected: Money, actual: Money) -> ValidationResult<()> {
    if (expected - actual).abs() > AMOUNT_TOLERANCE {
        return Err(ValidationError::AmountMismatch { expected, actual });
    }
    Ok(())
}

fn validate_items(items: &[InquiryItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: Field::Items,
            message: "Please add at least one item to your order",
        });
    }

    if let Some(short) = items.iter().find(|i| i.quantity < i.quantity_floor()) {
        return Err(ValidationError::OutOfRange {
            field: Field::Items,
            min: short.quantity_floor(),
            max: MAX_ITEM_QUANTITY,
            message: "Some items are below their minimum order quantity",
        });
    }

    if let Some(large) = items.iter().find(|i| i.quantity > MAX_ITEM_QUANTITY) {
        return Err(ValidationError::OutOfRange {
            field: Field::Items,
            min: large.quantity_floor(),
            max: MAX_ITEM_QUANTITY,
            message: "Some items exceed the largest quantity we can quote",
        });
    }

    Ok(())
}

// =============================================================================
// Schema Validator
// =============================================================================

/// Every failed field of one submission, at most one error per field.
///
/// Serializes as `{ "fieldName": "message", ... }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub struct FieldErrors {
    errors: BTreeMap<Field, ValidationError>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error. The first error recorded for a field is kept.
    pub fn insert(&mut self, error: ValidationError) {
        self.errors.entry(error.field()).or_insert(error);
    }

    /// Records the error of a failed check, if any.
    pub fn check(&mut self, result: ValidationResult<()>) {
        if let Err(e) = result {
            self.insert(e);
        }
    }

    pub fn remove(&mut self, field: Field) -> Option<ValidationError> {
        self.errors.remove(&field)
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, field: Field) -> Option<&ValidationError> {
        self.errors.get(&field)
    }

    pub fn message(&self, field: Field) -> Option<String> {
        self.get(field).map(ToString::to_string)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &ValidationError)> {
        self.errors.iter().map(|(f, e)| (*f, e))
    }

    /// `Ok(())` when empty, otherwise the errors themselves.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.errors.len()))?;
        for (field, error) in &self.errors {
            map.serialize_entry(field.as_str(), &error.to_string())?;
        }
        map.end()
    }
}

/// Whole-form validation.
pub trait Validate {
    /// Validates against a given calendar day (for date rules).
    fn validate_on(&self, today: NaiveDate) -> FieldErrors;

    /// Validates against the local calendar day.
    fn validate(&self) -> FieldErrors {
        self.validate_on(Local::now().date_naive())
    }
}

fn validate_text_fields<'a>(
    form: FormKind,
    errors: &mut FieldErrors,
    value: impl Fn(Field) -> Option<&'a str>,
) {
    for field_rules in form_rules(form) {
        let field = field_rules.field;
        errors.check(validate_field(form, field, value(field)));
    }
}

impl Validate for ContactForm {
    fn validate_on(&self, today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();
        validate_text_fields(FormKind::Contact, &mut errors, |f| self.value(f));

        if let Some(date) = self.event_date {
            errors.check(validate_event_date(date, today));
        }
        if let Some(count) = self.guest_count {
            errors.check(validate_guest_count(count));
        }

        errors
    }
}

impl Validate for CareersForm {
    fn validate_on(&self, _today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();
        validate_text_fields(FormKind::Careers, &mut errors, |f| self.value(f));
        errors
    }
}

impl Validate for CateringOrder {
    fn validate_on(&self, today: NaiveDate) -> FieldErrors {
        let mut errors = FieldErrors::new();

        errors.check(validate_items(&self.items));
        errors.check(validate_event_date(self.event_date, today));
        errors.check(validate_guest_count(self.guest_count));

        if self.delivery_method.requires_fee() {
            errors.check(validate_field(
                FormKind::Order,
                Field::DeliveryAddress,
                self.delivery_address.as_deref(),
            ));
        }

        errors.check(validate_total(self.expected_total(), self.total_amount));

        errors
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeliveryMethod;
    use chrono::Utc;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn valid_careers() -> CareersForm {
        CareersForm {
            name: "Amira Haddad".to_string(),
            email: "amira@example.se".to_string(),
            phone: "070-123 45 67".to_string(),
            job_title: "Line cook".to_string(),
            message: "Five years in hotel kitchens.".to_string(),
        }
    }

    fn order_item(price: i64, quantity: i64, min: Option<u32>) -> InquiryItem {
        InquiryItem {
            id: format!("item-{price}"),
            name: "Lamb Platter".to_string(),
            price: Money::from_major(price),
            quantity,
            image: None,
            min_order_quantity: min,
            added_at: Utc::now(),
        }
    }

    #[test]
    fn test_valid_tuple_passes_every_field() {
        let form = valid_careers();
        for field in [Field::Name, Field::Email, Field::Phone, Field::JobTitle, Field::Message] {
            assert_eq!(field_error_message(FormKind::Careers, field, form.value(field)), "");
        }
    }

    #[test]
    fn test_name_bounds() {
        let check = |v: &str| validate_field(FormKind::Contact, Field::Name, Some(v));

        assert!(matches!(check(""), Err(ValidationError::Required { .. })));
        assert!(matches!(check("A"), Err(ValidationError::TooShort { min: 2, .. })));
        assert!(check("Al").is_ok());
        assert!(check(&"a".repeat(100)).is_ok());
        assert!(matches!(
            check(&"a".repeat(101)),
            Err(ValidationError::TooLong { max: 100, .. })
        ));
    }

    #[test]
    fn test_email_shape() {
        let check = |v: &str| validate_field(FormKind::Contact, Field::Email, Some(v));

        assert!(check("kim@example.se").is_ok());
        assert!(check("first.last@sub.example.co").is_ok());
        assert!(matches!(check("   "), Err(ValidationError::Required { .. })));
        assert!(matches!(check("kim@example"), Err(ValidationError::InvalidFormat { .. })));
        assert!(matches!(check("kim example.se"), Err(ValidationError::InvalidFormat { .. })));
        assert!(matches!(check("@example.se"), Err(ValidationError::InvalidFormat { .. })));
    }

    #[test]
    fn test_phone_required_only_on_careers() {
        assert!(validate_field(FormKind::Contact, Field::Phone, None).is_ok());
        assert!(validate_field(FormKind::Contact, Field::Phone, Some("")).is_ok());
        assert!(matches!(
            validate_field(FormKind::Careers, Field::Phone, None),
            Err(ValidationError::Required { .. })
        ));

        for form in [FormKind::Contact, FormKind::Careers] {
            assert!(validate_field(form, Field::Phone, Some("1234567")).is_err());
            assert!(validate_field(form, Field::Phone, Some("12345678")).is_ok());
            assert!(validate_field(form, Field::Phone, Some(&"1".repeat(20))).is_ok());
            assert!(validate_field(form, Field::Phone, Some(&"1".repeat(21))).is_err());
        }
    }

    #[test]
    fn test_careers_message_minimum() {
        let nine = "a".repeat(9);
        let ten = "a".repeat(10);

        assert_eq!(
            field_error_message(FormKind::Careers, Field::Message, Some(&nine)),
            "Please tell us a bit more (at least 10 characters)"
        );
        assert_eq!(field_error_message(FormKind::Careers, Field::Message, Some(&ten)), "");
        assert!(validate_field(FormKind::Careers, Field::Message, Some(&"a".repeat(1001))).is_err());
    }

    #[test]
    fn test_contact_message_optional_with_maximum() {
        assert!(validate_field(FormKind::Contact, Field::Message, None).is_ok());
        assert!(validate_field(FormKind::Contact, Field::Message, Some("Hi")).is_ok());
        assert!(validate_field(FormKind::Contact, Field::Message, Some(&"a".repeat(1000))).is_ok());
        assert!(matches!(
            validate_field(FormKind::Contact, Field::Message, Some(&"a".repeat(1001))),
            Err(ValidationError::TooLong { max: 1000, .. })
        ));
    }

    #[test]
    fn test_job_title_careers_only() {
        assert!(validate_field(FormKind::Careers, Field::JobTitle, Some(" ")).is_err());
        assert!(validate_field(FormKind::Careers, Field::JobTitle, Some("Waiter")).is_ok());
        assert!(validate_field(FormKind::Contact, Field::JobTitle, None).is_ok());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 2 characters, 4 bytes
        assert!(validate_field(FormKind::Contact, Field::Name, Some("Åä")).is_ok());
    }

    #[test]
    fn test_required_wins_over_other_rules() {
        let err = validate_field(FormKind::Careers, Field::Message, Some("   ")).unwrap_err();
        assert_eq!(err.to_string(), "Please tell us a bit about yourself");
    }

    #[test]
    fn test_schema_collects_all_errors() {
        let form = CareersForm {
            name: "A".to_string(),
            email: "not-an-email".to_string(),
            phone: String::new(),
            job_title: String::new(),
            message: "short".to_string(),
        };

        let errors = form.validate_on(today());
        assert_eq!(errors.len(), 5);
        assert_eq!(
            errors.message(Field::Message).as_deref(),
            Some("Please tell us a bit more (at least 10 characters)")
        );
        assert!(valid_careers().validate_on(today()).is_empty());
    }

    #[test]
    fn test_contact_schema_dates_and_guests() {
        let mut form = ContactForm {
            name: "Jonas Berg".to_string(),
            email: "jonas@example.se".to_string(),
            event_date: Some(today()),
            guest_count: Some(40),
            ..ContactForm::default()
        };
        assert!(form.validate_on(today()).is_empty());

        form.event_date = today().pred_opt();
        form.guest_count = Some(0);
        let errors = form.validate_on(today());
        assert!(matches!(errors.get(Field::EventDate), Some(ValidationError::DateInPast { .. })));
        assert!(matches!(errors.get(Field::GuestCount), Some(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_field_errors_serialize_as_message_map() {
        let mut errors = FieldErrors::new();
        errors.check(validate_field(FormKind::Careers, Field::JobTitle, None));
        errors.check(validate_field(FormKind::Careers, Field::Name, Some("A")));

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["jobTitle"], "Please choose the position you are applying for");
        assert_eq!(json["name"], "Name must be at least 2 characters");
    }

    #[test]
    fn test_field_errors_keep_first_error_per_field() {
        let mut errors = FieldErrors::new();
        errors.check(validate_field(FormKind::Contact, Field::Name, Some("")));
        errors.check(validate_field(FormKind::Contact, Field::Name, Some("A")));

        assert_eq!(errors.len(), 1);
        assert!(matches!(errors.get(Field::Name), Some(ValidationError::Required { .. })));
        assert!(errors.clone().into_result().is_err());
        assert!(FieldErrors::new().into_result().is_ok());
    }

    #[test]
    fn test_total_tolerance() {
        let expected = Money::from_major(229);
        assert!(validate_total(expected, expected).is_ok());
        assert!(validate_total(expected, expected + Money::from_cents(1)).is_ok());
        assert!(validate_total(expected, expected - Money::from_cents(1)).is_ok());
        assert!(validate_total(expected, expected + Money::from_cents(2)).is_err());
    }

    #[test]
    fn test_order_schema_includes_fee_only_for_delivery() {
        let mut order = CateringOrder {
            items: vec![order_item(180, 1, None)],
            delivery_method: DeliveryMethod::Delivery,
            delivery_address: Some("Storgatan 1, Malmö".to_string()),
            event_date: today(),
            guest_count: 20,
            delivery_fee: Money::from_major(49),
            total_amount: Money::from_major(229),
        };
        assert!(order.validate_on(today()).is_empty());

        order.delivery_method = DeliveryMethod::Pickup;
        let errors = order.validate_on(today());
        assert!(matches!(
            errors.get(Field::TotalAmount),
            Some(ValidationError::AmountMismatch { .. })
        ));

        order.total_amount = Money::from_major(180);
        order.delivery_address = None;
        assert!(order.validate_on(today()).is_empty());
    }

    #[test]
    fn test_order_schema_item_rules() {
        let order = CateringOrder {
            items: vec![order_item(95, 4, Some(10))],
            delivery_method: DeliveryMethod::Delivery,
            delivery_address: None,
            event_date: today(),
            guest_count: 20,
            delivery_fee: Money::from_major(49),
            total_amount: Money::from_major(429),
        };

        let errors = order.validate_on(today());
        assert!(matches!(
            errors.get(Field::Items),
            Some(ValidationError::OutOfRange { min: 10, .. })
        ));
        assert!(matches!(
            errors.get(Field::DeliveryAddress),
            Some(ValidationError::Required { .. })
        ));

        let empty = CateringOrder { items: Vec::new(), total_amount: Money::from_major(49), ..order };
        assert!(matches!(
            empty.validate_on(today()).get(Field::Items),
            Some(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_order_schema_rejects_oversized_quantity() {
        let order = CateringOrder {
            items: vec![order_item(95, MAX_ITEM_QUANTITY + 1, None)],
            delivery_method: DeliveryMethod::Pickup,
            delivery_address: None,
            event_date: today(),
            guest_count: 20,
            delivery_fee: Money::zero(),
            total_amount: Money::from_major(95 * (MAX_ITEM_QUANTITY + 1)),
        };

        assert!(matches!(
            order.validate_on(today()).get(Field::Items),
            Some(ValidationError::OutOfRange { max: MAX_ITEM_QUANTITY, .. })
        ));

        let at_limit = CateringOrder {
            items: vec![order_item(95, MAX_ITEM_QUANTITY, None)],
            total_amount: Money::from_major(95 * MAX_ITEM_QUANTITY),
            ..order
        };
        assert!(at_limit.validate_on(today()).is_empty());
    }
}
