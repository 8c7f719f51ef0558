//! # Form Sessions
//!
//! Session-scoped state for one visitor filling in one form.
//!
//! ## Submission Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Lifecycle                                    │
//! │                                                                         │
//! │  ┌──────────┐  set_field  ┌──────────┐ begin_submit ┌────────────┐     │
//! │  │   Idle   │───blur─────►│  Idle +  │─────────────►│ Submitting │     │
//! │  │          │             │  errors  │  (valid)     │ (disabled) │     │
//! │  └──────────┘             └──────────┘              └─────┬──────┘     │
//! │       ▲                        ▲                          │            │
//! │       │                        │ begin_submit             │            │
//! │       │                        │ (invalid: errors kept,   │            │
//! │       │                        │  nothing sent)           │            │
//! │       │                                                   │            │
//! │       │  complete_success                complete_failure │            │
//! │       │  (form + cart reset)             (form kept)      │            │
//! │  ┌────┴─────┐                              ┌──────────────▼─┐          │
//! │  │Succeeded │                              │     Failed     │          │
//! │  └──────────┘                              └────────────────┘          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A session is owned by exactly one caller and handed around by `&mut`.
//! The `Submitting` state is what the website renders as a disabled submit
//! button; it is not a lock.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::cart::{CartTotals, InquiryCart, InquiryItem, PricingPolicy};
use crate::error::{CoreError, CoreResult};
use crate::types::{CareersForm, ContactForm, Field, FormKind};
use crate::validation::{validate_field, FieldErrors, Validate};

/// Shown after the relay accepted a submission.
pub const SUCCESS_MESSAGE: &str = "Thank you! Your message has been sent and we will get back to you shortly.";

// =============================================================================
// Status
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded { message: String },
    Failed { message: String },
}

impl SubmissionStatus {
    pub fn message(&self) -> Option<&str> {
        match self {
            SubmissionStatus::Succeeded { message } | SubmissionStatus::Failed { message } => {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

// =============================================================================
// Generic Form Session
// =============================================================================

/// A form that a [`FormSession`] can hold.
pub trait FormState: Validate + Default + Clone {
    const KIND: FormKind;

    fn value(&self, field: Field) -> Option<&str>;

    /// Stores raw input. Returns false when `field` is not a text field of
    /// this form.
    fn set_value(&mut self, field: Field, raw: &str) -> bool;
}

impl FormState for ContactForm {
    const KIND: FormKind = FormKind::Contact;

    fn value(&self, field: Field) -> Option<&str> {
        ContactForm::value(self, field)
    }

    fn set_value(&mut self, field: Field, raw: &str) -> bool {
        ContactForm::set_value(self, field, raw)
    }
}

impl FormState for CareersForm {
    const KIND: FormKind = FormKind::Careers;

    fn value(&self, field: Field) -> Option<&str> {
        CareersForm::value(self, field)
    }

    fn set_value(&mut self, field: Field, raw: &str) -> bool {
        CareersForm::set_value(self, field, raw)
    }
}

/// Form values, inline errors and submission status for one visitor.
#[derive(Debug, Clone, Default)]
pub struct FormSession<F> {
    form: F,
    errors: FieldErrors,
    status: SubmissionStatus,
}

pub type CareersSession = FormSession<CareersForm>;

impl<F: FormState> FormSession<F> {
    pub fn new() -> Self {
        FormSession {
            form: F::default(),
            errors: FieldErrors::new(),
            status: SubmissionStatus::Idle,
        }
    }

    /// Starts a session from prefilled values.
    pub fn with_form(form: F) -> Self {
        FormSession {
            form,
            ..Self::new()
        }
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn status(&self) -> &SubmissionStatus {
        &self.status
    }

    pub fn is_submitting(&self) -> bool {
        self.status == SubmissionStatus::Submitting
    }

    /// Stores raw input for a field.
    ///
    /// A field already showing an error is re-checked so the message clears
    /// as soon as the value becomes valid.
    pub fn set_field(&mut self, field: Field, raw: &str) -> CoreResult<()> {
        if !self.form.set_value(field, raw) {
            return Err(CoreError::FieldNotInForm { field });
        }
        if self.errors.get(field).is_some() {
            self.blur(field);
        }
        Ok(())
    }

    /// Validates one field as the visitor leaves it. Returns the message to
    /// show, empty when valid.
    pub fn blur(&mut self, field: Field) -> String {
        self.errors.remove(field);
        match validate_field(F::KIND, field, self.form.value(field)) {
            Ok(()) => String::new(),
            Err(e) => {
                let message = e.to_string();
                self.errors.insert(e);
                message
            }
        }
    }

    /// Validates the whole form against `today`.
    ///
    /// On success the session enters `Submitting` and the form values to
    /// send are returned. On failure every field error is recorded and
    /// nothing may be sent.
    pub fn begin_submit_on(&mut self, today: NaiveDate) -> CoreResult<F> {
        if self.is_submitting() {
            return Err(CoreError::SubmissionInProgress);
        }

        self.errors = self.form.validate_on(today);
        if !self.errors.is_empty() {
            return Err(CoreError::InvalidSubmission(self.errors.clone()));
        }

        self.status = SubmissionStatus::Submitting;
        Ok(self.form.clone())
    }

    pub fn begin_submit(&mut self) -> CoreResult<F> {
        self.begin_submit_on(Local::now().date_naive())
    }

    /// The relay accepted the submission: reset to an empty form.
    pub fn complete_success(&mut self) {
        self.form = F::default();
        self.errors.clear();
        self.status = SubmissionStatus::Succeeded {
            message: SUCCESS_MESSAGE.to_string(),
        };
    }

    /// The relay failed: keep the form so the visitor can retry.
    pub fn complete_failure(&mut self, message: impl Into<String>) {
        self.status = SubmissionStatus::Failed {
            message: message.into(),
        };
    }
}

// =============================================================================
// Contact Session (with Inquiry Cart)
// =============================================================================

/// What a contact submission sends: form values plus a cart snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CateringInquiry {
    pub form: ContactForm,
    pub items: Vec<InquiryItem>,
    pub totals: CartTotals,
}

impl CateringInquiry {
    /// Whether the visitor staged any menu items.
    pub fn has_items(&self) -> bool {
        !self.items.is_empty()
    }
}

/// Contact / catering form session. Owns the inquiry cart.
#[derive(Debug, Clone, Default)]
pub struct ContactSession {
    inner: FormSession<ContactForm>,
    cart: InquiryCart,
    pricing: PricingPolicy,
}

impl ContactSession {
    pub fn new(pricing: PricingPolicy) -> Self {
        ContactSession {
            inner: FormSession::new(),
            cart: InquiryCart::new(),
            pricing,
        }
    }

    pub fn form(&self) -> &ContactForm {
        self.inner.form()
    }

    pub fn errors(&self) -> &FieldErrors {
        self.inner.errors()
    }

    pub fn status(&self) -> &SubmissionStatus {
        self.inner.status()
    }

    pub fn is_submitting(&self) -> bool {
        self.inner.is_submitting()
    }

    pub fn pricing(&self) -> &PricingPolicy {
        &self.pricing
    }

    pub fn cart(&self) -> &InquiryCart {
        &self.cart
    }

    /// Cart handle for add / set_quantity / increment / decrement / remove.
    pub fn cart_mut(&mut self) -> &mut InquiryCart {
        &mut self.cart
    }

    /// Current totals, recomputed from the cart on every call.
    pub fn totals(&self) -> CartTotals {
        self.cart.compute_totals_with(&self.pricing)
    }

    pub fn set_field(&mut self, field: Field, raw: &str) -> CoreResult<()> {
        self.inner.set_field(field, raw)
    }

    pub fn blur(&mut self, field: Field) -> String {
        self.inner.blur(field)
    }

    pub fn set_event_date(&mut self, date: Option<NaiveDate>) {
        self.inner.form.event_date = date;
    }

    pub fn set_guest_count(&mut self, count: Option<u32>) {
        self.inner.form.guest_count = count;
    }

    /// Validates the form and snapshots the cart with fresh totals.
    pub fn begin_submit_on(&mut self, today: NaiveDate) -> CoreResult<CateringInquiry> {
        let form = self.inner.begin_submit_on(today)?;
        Ok(CateringInquiry {
            form,
            items: self.cart.items().to_vec(),
            totals: self.totals(),
        })
    }

    pub fn begin_submit(&mut self) -> CoreResult<CateringInquiry> {
        self.begin_submit_on(Local::now().date_naive())
    }

    /// The relay accepted the submission: empty form and empty cart.
    pub fn complete_success(&mut self) {
        self.inner.complete_success();
        self.cart.clear();
    }

    /// The relay failed: form and cart stay as they were.
    pub fn complete_failure(&mut self, message: impl Into<String>) {
        self.inner.complete_failure(message);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::types::{MenuCategory, MenuItem};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn buffet() -> MenuItem {
        MenuItem {
            id: "buffet-1".to_string(),
            name: "Wedding Buffet".to_string(),
            description: None,
            price: Money::from_major(180),
            category: MenuCategory::Buffet,
            image: None,
            min_order_quantity: None,
            includes: vec!["Rice".to_string(), "Naan".to_string()],
            available: true,
        }
    }

    fn fill_contact(session: &mut ContactSession) {
        session.set_field(Field::Name, "Sara Lind").unwrap();
        session.set_field(Field::Email, "sara@example.se").unwrap();
    }

    #[test]
    fn test_blur_records_and_clears_errors() {
        let mut session = CareersSession::new();

        let message = session.blur(Field::Name);
        assert_eq!(message, "Please enter your name");
        assert!(session.errors().get(Field::Name).is_some());

        session.set_field(Field::Name, "Li").unwrap();
        assert!(session.errors().get(Field::Name).is_none());
    }

    #[test]
    fn test_set_field_rejects_foreign_fields() {
        let mut session = CareersSession::new();
        assert!(matches!(
            session.set_field(Field::Company, "Acme"),
            Err(CoreError::FieldNotInForm { field: Field::Company })
        ));
    }

    #[test]
    fn test_invalid_submit_marks_all_fields_and_stays_idle() {
        let mut session = CareersSession::new();
        let err = session.begin_submit_on(today()).unwrap_err();

        match err {
            CoreError::InvalidSubmission(errors) => assert_eq!(errors.len(), 5),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(session.errors().len(), 5);
        assert_eq!(session.status(), &SubmissionStatus::Idle);
    }

    #[test]
    fn test_submit_in_progress_is_rejected() {
        let mut session = ContactSession::default();
        fill_contact(&mut session);

        session.begin_submit_on(today()).unwrap();
        assert!(session.is_submitting());
        assert!(matches!(
            session.begin_submit_on(today()),
            Err(CoreError::SubmissionInProgress)
        ));
    }

    #[test]
    fn test_contact_snapshot_carries_cart_and_totals() {
        let mut session = ContactSession::default();
        fill_contact(&mut session);
        session.cart_mut().add(&buffet());

        let inquiry = session.begin_submit_on(today()).unwrap();
        assert!(inquiry.has_items());
        assert_eq!(inquiry.items.len(), 1);
        assert_eq!(inquiry.totals.total, Money::from_major(229));
        assert_eq!(inquiry.form.name, "Sara Lind");
    }

    #[test]
    fn test_success_resets_form_and_cart() {
        let mut session = ContactSession::default();
        fill_contact(&mut session);
        session.set_field(Field::Message, "Lunch for 30 people").unwrap();
        session.cart_mut().add(&buffet());

        session.begin_submit_on(today()).unwrap();
        session.complete_success();

        assert!(session.cart().is_empty());
        assert_eq!(session.form(), &ContactForm::default());
        assert_eq!(session.form().name, "");
        assert_eq!(session.form().email, "");
        assert_eq!(session.status().message(), Some(SUCCESS_MESSAGE));
        assert!(!session.is_submitting());
    }

    #[test]
    fn test_failure_keeps_form_and_cart() {
        let mut session = ContactSession::default();
        fill_contact(&mut session);
        session.cart_mut().add(&buffet());

        session.begin_submit_on(today()).unwrap();
        session.complete_failure("Something went wrong");

        assert_eq!(session.form().name, "Sara Lind");
        assert_eq!(session.cart().line_count(), 1);
        assert_eq!(session.status().message(), Some("Something went wrong"));

        // A retry is a fresh attempt.
        assert!(session.begin_submit_on(today()).is_ok());
    }

    #[test]
    fn test_totals_use_session_pricing() {
        let mut session = ContactSession::new(PricingPolicy {
            delivery_fee: Money::from_major(99),
            free_delivery_threshold: Money::from_major(150),
        });
        session.cart_mut().add(&buffet());

        let totals = session.totals();
        assert!(totals.qualifies_for_free_delivery);
        assert_eq!(totals.total, Money::from_major(180));
    }
}
