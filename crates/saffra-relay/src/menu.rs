//! # Menu Sources
//!
//! Where the inquiry flow reads the menu from.
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────────────────────────────────┐
//! │  StaticMenu     │     │  RestMenuSource                              │
//! │  (in memory)    │     │  GET {base}/rest/v1/menu_items               │
//! │                 │     │      ?available=eq.true&order=category.asc   │
//! └────────┬────────┘     └──────────────────────┬───────────────────────┘
//!          │                                     │ rows ──► MenuItem
//!          └──────────────┬──────────────────────┘
//!                         ▼
//!          saffra_core::available_menu (filter + category order)
//! ```
//!
//! The filter is applied again client side, so a source that ignores the
//! query still yields only available items.

use std::future::Future;

use serde::Deserialize;
use tracing::{debug, warn};

use saffra_core::{available_menu, MenuCategory, MenuItem, Money};

use crate::config::RelayConfig;
use crate::error::{RelayError, RelayResult};

/// Read-only access to the menu.
pub trait MenuSource {
    /// Items on offer, ordered by category.
    fn list_available_menu_items(&self) -> impl Future<Output = RelayResult<Vec<MenuItem>>> + Send;
}

// =============================================================================
// Static Menu
// =============================================================================

/// A fixed menu held in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticMenu {
    items: Vec<MenuItem>,
}

impl StaticMenu {
    pub fn new(items: Vec<MenuItem>) -> Self {
        StaticMenu { items }
    }

    /// Parses a JSON array of menu items.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(StaticMenu::new(serde_json::from_str(json)?))
    }
}

impl MenuSource for StaticMenu {
    async fn list_available_menu_items(&self) -> RelayResult<Vec<MenuItem>> {
        Ok(available_menu(self.items.iter().cloned()))
    }
}

// =============================================================================
// REST Menu
// =============================================================================

/// Reads `menu_items` from a PostgREST-style endpoint.
#[derive(Debug, Clone)]
pub struct RestMenuSource {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl RestMenuSource {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        RestMenuSource {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key,
        }
    }

    /// Builds a source from `menu_url` / `menu_api_key`. `None` when no
    /// menu URL is configured.
    pub fn from_config(config: &RelayConfig) -> Option<Self> {
        config
            .menu_url
            .as_ref()
            .map(|url| RestMenuSource::new(url.clone(), config.menu_api_key.clone()))
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/rest/v1/menu_items?select=*&available=eq.true&order=category.asc",
            self.base_url.trim_end_matches('/')
        )
    }
}

impl MenuSource for RestMenuSource {
    async fn list_available_menu_items(&self) -> RelayResult<Vec<MenuItem>> {
        let endpoint = self.endpoint();
        debug!(endpoint = %endpoint, "Fetching menu");

        let mut request = self.client.get(&endpoint);
        if let Some(key) = &self.api_key {
            request = request.header("apikey", key.as_str()).bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Rejected {
                status: status.as_u16(),
                message: response.text().await.ok().filter(|t| !t.is_empty()),
            });
        }

        let rows: Vec<serde_json::Value> =
            response
                .json()
                .await
                .map_err(|e| RelayError::InvalidResponse {
                    endpoint: endpoint.clone(),
                    detail: e.to_string(),
                })?;

        Ok(available_menu(decode_rows(rows)))
    }
}

/// Converts each row on its own. Rows that fail are logged and left out.
fn decode_rows(rows: Vec<serde_json::Value>) -> Vec<MenuItem> {
    let total = rows.len();
    let items: Vec<MenuItem> = rows
        .into_iter()
        .filter_map(|row| match serde_json::from_value::<MenuRow>(row) {
            Ok(row) => row.into_menu_item(),
            Err(e) => {
                warn!(error = %e, "Menu row does not match the menu schema");
                None
            }
        })
        .collect();

    if items.len() < total {
        warn!(skipped = total - items.len(), "Skipped unreadable menu rows");
    }
    items
}

/// One `menu_items` row as the database returns it.
#[derive(Debug, Deserialize)]
struct MenuRow {
    id: serde_json::Value,
    name: String,
    #[serde(default)]
    description: Option<String>,
    /// Major units, integer or decimal.
    price: serde_json::Number,
    category: MenuCategory,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    min_order_quantity: Option<u32>,
    #[serde(default)]
    includes: Option<Vec<String>>,
    #[serde(default = "default_true")]
    available: bool,
}

fn default_true() -> bool {
    true
}

impl MenuRow {
    fn into_menu_item(self) -> Option<MenuItem> {
        let id = match self.id {
            serde_json::Value::String(s) => s,
            serde_json::Value::Number(n) => n.to_string(),
            other => {
                warn!(id = %other, "Menu row has an unusable id");
                return None;
            }
        };

        let Some(price) = Money::parse_major(&self.price.to_string()) else {
            warn!(id = %id, price = %self.price, "Menu row has an unusable price");
            return None;
        };

        Some(MenuItem {
            id,
            name: self.name,
            description: self.description,
            price,
            category: self.category,
            image: self.image_url,
            min_order_quantity: self.min_order_quantity,
            includes: self.includes.unwrap_or_default(),
            available: self.available,
        })
    }
}
