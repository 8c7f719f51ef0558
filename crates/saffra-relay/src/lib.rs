//! # saffra-relay: Submissions and Menu Data for Saffra
//!
//! The I/O half of the inquiry flow. `saffra-core` decides whether a form
//! may be sent; this crate sends it and reads the menu.
//!
//! ## Modules
//!
//! - [`config`] - Relay endpoint, access key, pricing overrides
//! - [`dispatcher`] - Session ──► relay request ──► session status
//! - [`transport`] - The web3forms wire format and HTTP client
//! - [`message`] - Plain-text bodies staff receive
//! - [`menu`] - Static and REST menu sources
//! - [`error`] - Relay error type and visitor-facing messages
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use saffra_core::{ContactSession, Field};
//! use saffra_relay::{Dispatcher, RelayConfig, Web3FormsTransport};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RelayConfig::load()?;
//! let dispatcher = Dispatcher::new(Web3FormsTransport::new(&config.relay_url), &config);
//!
//! let mut session = ContactSession::new(config.pricing());
//! session.set_field(Field::Name, "Sara Lind")?;
//! session.set_field(Field::Email, "sara@example.se")?;
//!
//! if dispatcher.submit_contact(&mut session).await.is_err() {
//!     println!("{}", session.status().message().unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod menu;
pub mod message;
pub mod transport;

pub use config::{ConfigError, RelayConfig};
pub use dispatcher::Dispatcher;
pub use error::{RelayError, RelayResult, GENERIC_MESSAGE, RETRY_MESSAGE};
pub use menu::{MenuSource, RestMenuSource, StaticMenu};
pub use transport::{RelayRequest, RelayResponse, RelayTransport, Web3FormsTransport};
