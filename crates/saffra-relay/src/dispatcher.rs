//! # Submission Dispatcher
//!
//! Turns a valid form session into one relay request.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    submit_contact / submit_careers                      │
//! │                                                                         │
//! │  session.begin_submit()                                                 │
//! │     │                                                                   │
//! │     ├── invalid ──► field errors stay on session ──► Err(Invalid)       │
//! │     │               (no request is built)                               │
//! │     ▼                                                                   │
//! │  Submitting ──► access key? ── missing ──► Failed(GENERIC) ──► Err      │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  render body ──► transport.send() ── error ──► log ──► Failed(RETRY)    │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  complete_success() (form and cart reset) ──► Ok                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every attempt is independent. Nothing is retried here; a visitor who
//! presses submit again starts a new attempt.

use tracing::{debug, error, info, instrument};

use saffra_core::{CareersSession, ContactSession};

use crate::config::{ConfigError, RelayConfig};
use crate::error::{RelayError, RelayResult};
use crate::message::{render_careers, render_contact};
use crate::transport::{RelayRequest, RelayTransport};

pub struct Dispatcher<T> {
    transport: T,
    access_key: Option<String>,
    contact_subject: String,
    careers_subject: String,
    support_phone: Option<String>,
    support_email: Option<String>,
}

impl<T: RelayTransport> Dispatcher<T> {
    pub fn new(transport: T, config: &RelayConfig) -> Self {
        Dispatcher {
            transport,
            access_key: config.require_access_key().ok().map(str::to_string),
            contact_subject: config.contact_subject.clone(),
            careers_subject: config.careers_subject.clone(),
            support_phone: config.support_phone.clone(),
            support_email: config.support_email.clone(),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Submits a contact / catering inquiry with its cart.
    #[instrument(skip_all, fields(form = "contact"))]
    pub async fn submit_contact(&self, session: &mut ContactSession) -> RelayResult<()> {
        let inquiry = match session.begin_submit() {
            Ok(inquiry) => inquiry,
            Err(e) => return Err(self.rejected_before_send(e.into())),
        };

        let request = match self.request(
            &self.contact_subject,
            &inquiry.form.name,
            &inquiry.form.email,
            render_contact(&inquiry, session.pricing()),
        ) {
            Ok(request) => request,
            Err(e) => {
                session.complete_failure(self.status_message(&e));
                return Err(e);
            }
        };

        debug!(
            lines = inquiry.totals.line_count,
            total = %inquiry.totals.total,
            "Sending catering inquiry"
        );

        match self.transport.send(&request).await {
            Ok(_) => {
                info!(lines = inquiry.totals.line_count, "Catering inquiry delivered");
                session.complete_success();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to deliver catering inquiry");
                session.complete_failure(self.status_message(&e));
                Err(e)
            }
        }
    }

    /// Submits a job application.
    #[instrument(skip_all, fields(form = "careers"))]
    pub async fn submit_careers(&self, session: &mut CareersSession) -> RelayResult<()> {
        let form = match session.begin_submit() {
            Ok(form) => form,
            Err(e) => return Err(self.rejected_before_send(e.into())),
        };

        let request = match self.request(
            &self.careers_subject,
            &form.name,
            &form.email,
            render_careers(&form),
        ) {
            Ok(request) => request,
            Err(e) => {
                session.complete_failure(self.status_message(&e));
                return Err(e);
            }
        };

        match self.transport.send(&request).await {
            Ok(_) => {
                info!(position = %form.job_title, "Job application delivered");
                session.complete_success();
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to deliver job application");
                session.complete_failure(self.status_message(&e));
                Err(e)
            }
        }
    }

    /// The status text a visitor sees for `err`.
    ///
    /// Retryable failures offer the configured phone and email, if any.
    pub fn status_message(&self, err: &RelayError) -> String {
        let base = err.user_message();
        if !err.is_retryable() {
            return base.to_string();
        }

        let contacts: Vec<&str> = [self.support_phone.as_deref(), self.support_email.as_deref()]
            .into_iter()
            .flatten()
            .collect();

        if contacts.is_empty() {
            base.to_string()
        } else {
            format!("{base} You can reach us at {}.", contacts.join(" or "))
        }
    }

    fn request(
        &self,
        subject: &str,
        name: &str,
        email: &str,
        message: String,
    ) -> RelayResult<RelayRequest> {
        let access_key = self.access_key.clone().ok_or_else(|| {
            let err = RelayError::from(ConfigError::MissingRequired("access_key".to_string()));
            error!(error = %err, "Relay access key is not configured");
            err
        })?;

        Ok(RelayRequest {
            access_key,
            subject: subject.to_string(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            message,
        })
    }

    fn rejected_before_send(&self, err: RelayError) -> RelayError {
        match &err {
            RelayError::Invalid(errors) => {
                debug!(fields = errors.len(), "Submission blocked by validation");
            }
            other => {
                debug!(error = %other, "Submission not started");
            }
        }
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use saffra_core::{
        CoreError, Field, MenuCategory, MenuItem, Money, SubmissionStatus,
    };

    use crate::error::{GENERIC_MESSAGE, RETRY_MESSAGE};
    use crate::transport::RelayResponse;

    /// Records every request. Fails when `reject` is set.
    #[derive(Default)]
    struct FakeTransport {
        sent: Mutex<Vec<RelayRequest>>,
        reject: bool,
    }

    impl FakeTransport {
        fn rejecting() -> Self {
            FakeTransport {
                reject: true,
                ..Self::default()
            }
        }

        fn sent(&self) -> Vec<RelayRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl RelayTransport for FakeTransport {
        async fn send(&self, request: &RelayRequest) -> RelayResult<RelayResponse> {
            self.sent.lock().unwrap().push(request.clone());
            if self.reject {
                Err(RelayError::Rejected {
                    status: 500,
                    message: Some("upstream exploded".to_string()),
                })
            } else {
                Ok(RelayResponse {
                    success: true,
                    message: None,
                })
            }
        }
    }

    fn config() -> RelayConfig {
        RelayConfig {
            access_key: Some("test-key".to_string()),
            ..RelayConfig::default()
        }
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
            includes: Vec::new(),
            available: true,
        }
    }

    fn contact_session() -> ContactSession {
        let mut session = ContactSession::default();
        session.set_field(Field::Name, "Sara Lind").unwrap();
        session.set_field(Field::Email, "sara@example.se").unwrap();
        session.cart_mut().add(&buffet());
        session
    }

    fn careers_session() -> CareersSession {
        let mut session = CareersSession::new();
        session.set_field(Field::Name, "Ali Haddad").unwrap();
        session.set_field(Field::Email, "ali@example.se").unwrap();
        session.set_field(Field::Phone, "0701234567").unwrap();
        session.set_field(Field::JobTitle, "Chef").unwrap();
        session
            .set_field(Field::Message, "Ten years in hotel kitchens.")
            .unwrap();
        session
    }

    #[tokio::test]
    async fn test_contact_success_sends_once_and_resets() {
        let dispatcher = Dispatcher::new(FakeTransport::default(), &config());
        let mut session = contact_session();

        dispatcher.submit_contact(&mut session).await.unwrap();

        let sent = dispatcher.transport().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].access_key, "test-key");
        assert_eq!(sent[0].subject, crate::config::DEFAULT_CONTACT_SUBJECT);
        assert_eq!(sent[0].name, "Sara Lind");
        assert!(sent[0].message.contains("Wedding Buffet x 1"));
        assert!(sent[0].message.contains("Total: 229 kr"));

        assert!(session.cart().is_empty());
        assert_eq!(session.form().name, "");
        assert!(matches!(session.status(), SubmissionStatus::Succeeded { .. }));
    }

    #[tokio::test]
    async fn test_invalid_contact_never_reaches_transport() {
        let dispatcher = Dispatcher::new(FakeTransport::default(), &config());
        let mut session = ContactSession::default();
        session.set_field(Field::Email, "not-an-email").unwrap();

        let err = dispatcher.submit_contact(&mut session).await.unwrap_err();

        assert!(matches!(err, RelayError::Invalid(_)));
        assert!(dispatcher.transport().sent().is_empty());
        assert!(session.errors().get(Field::Name).is_some());
        assert!(session.errors().get(Field::Email).is_some());
        assert_eq!(session.status(), &SubmissionStatus::Idle);
    }

    #[tokio::test]
    async fn test_transport_failure_keeps_state_and_shows_generic_message() {
        let dispatcher = Dispatcher::new(FakeTransport::rejecting(), &config());
        let mut session = contact_session();

        let err = dispatcher.submit_contact(&mut session).await.unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(dispatcher.transport().sent().len(), 1);
        assert_eq!(session.cart().line_count(), 1);
        assert_eq!(session.form().name, "Sara Lind");

        let shown = session.status().message().unwrap();
        assert_eq!(shown, RETRY_MESSAGE);
        assert!(!shown.contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_retry_after_failure_is_a_new_attempt() {
        let failing = Dispatcher::new(FakeTransport::rejecting(), &config());
        let working = Dispatcher::new(FakeTransport::default(), &config());
        let mut session = contact_session();

        assert!(failing.submit_contact(&mut session).await.is_err());
        working.submit_contact(&mut session).await.unwrap();

        assert_eq!(working.transport().sent().len(), 1);
        assert!(session.cart().is_empty());
    }

    #[tokio::test]
    async fn test_missing_access_key_fails_without_sending() {
        let dispatcher = Dispatcher::new(FakeTransport::default(), &RelayConfig::default());
        let mut session = careers_session();

        let err = dispatcher.submit_careers(&mut session).await.unwrap_err();

        assert!(matches!(
            err,
            RelayError::Config(ConfigError::MissingRequired(_))
        ));
        assert!(dispatcher.transport().sent().is_empty());
        assert_eq!(session.status().message(), Some(GENERIC_MESSAGE));
        assert_eq!(session.form().name, "Ali Haddad");
    }

    #[tokio::test]
    async fn test_careers_success() {
        let dispatcher = Dispatcher::new(FakeTransport::default(), &config());
        let mut session = careers_session();

        dispatcher.submit_careers(&mut session).await.unwrap();

        let sent = dispatcher.transport().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, crate::config::DEFAULT_CAREERS_SUBJECT);
        assert!(sent[0].message.contains("Position: Chef"));
        assert_eq!(session.form().job_title, "");
    }

    #[tokio::test]
    async fn test_double_submit_is_rejected() {
        let dispatcher = Dispatcher::new(FakeTransport::default(), &config());
        let mut session = contact_session();
        session.begin_submit().unwrap();

        let err = dispatcher.submit_contact(&mut session).await.unwrap_err();

        assert!(matches!(err, RelayError::Core(CoreError::SubmissionInProgress)));
        assert!(dispatcher.transport().sent().is_empty());
    }

    #[test]
    fn test_status_message_offers_contact_details() {
        let dispatcher = Dispatcher::new(
            FakeTransport::default(),
            &RelayConfig {
                support_phone: Some("040-12 34 56".to_string()),
                support_email: Some("hello@saffra.se".to_string()),
                ..config()
            },
        );
        let err = RelayError::Rejected {
            status: 502,
            message: None,
        };

        assert_eq!(
            dispatcher.status_message(&err),
            format!("{RETRY_MESSAGE} You can reach us at 040-12 34 56 or hello@saffra.se.")
        );

        let config_err = RelayError::from(ConfigError::MissingRequired("access_key".to_string()));
        assert_eq!(dispatcher.status_message(&config_err), GENERIC_MESSAGE);
    }
}
