//! Command implementations.

use std::fmt::Write;
use std::path::Path;

use anyhow::{bail, Context};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use saffra_core::{
    format_price, CareersForm, CareersSession, ContactForm, ContactSession, Field, FieldErrors,
    MenuCategory, MenuItem, PricingPolicy, MAX_ITEM_QUANTITY,
};
use saffra_relay::{MenuSource, RelayConfig, RelayResult, RestMenuSource, StaticMenu};

// =============================================================================
// Menu
// =============================================================================

/// Menu chosen on the command line or from configuration.
pub enum CliMenu {
    File(StaticMenu),
    Rest(RestMenuSource),
}

impl CliMenu {
    /// `--menu-file` wins over `menu_url`.
    pub fn resolve(menu_file: Option<&Path>, config: &RelayConfig) -> anyhow::Result<Self> {
        if let Some(path) = menu_file {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read menu file {}", path.display()))?;
            let menu = StaticMenu::from_json(&json)
                .with_context(|| format!("Failed to parse menu file {}", path.display()))?;
            return Ok(CliMenu::File(menu));
        }

        match RestMenuSource::from_config(config) {
            Some(source) => Ok(CliMenu::Rest(source)),
            None => bail!("No menu configured: pass --menu-file or set SAFFRA_MENU_URL"),
        }
    }
}

impl MenuSource for CliMenu {
    async fn list_available_menu_items(&self) -> RelayResult<Vec<MenuItem>> {
        match self {
            CliMenu::File(menu) => menu.list_available_menu_items().await,
            CliMenu::Rest(menu) => menu.list_available_menu_items().await,
        }
    }
}

/// Menu listing grouped under category headings.
pub fn render_menu(items: &[MenuItem]) -> String {
    let mut out = String::new();
    let mut current: Option<MenuCategory> = None;

    for item in items {
        if current != Some(item.category) {
            if current.is_some() {
                out.push('\n');
            }
            let _ = writeln!(out, "[{}]", item.category);
            current = Some(item.category);
        }

        let _ = write!(out, "  {:<8} {:<32} {:>10}", item.id, item.name, format_price(item.price));
        if item.quantity_floor() > 1 {
            let _ = write!(out, "  (min {})", item.quantity_floor());
        }
        out.push('\n');
        if !item.includes.is_empty() {
            let _ = writeln!(out, "           includes: {}", item.includes.join(", "));
        }
    }

    out
}

// =============================================================================
// Submission Files
// =============================================================================

/// A contact form file. `items` stages menu items in the inquiry cart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFile {
    #[serde(flatten)]
    pub form: ContactForm,
    #[serde(default)]
    pub items: Vec<ItemRef>,
}

#[derive(Debug, Deserialize)]
pub struct ItemRef {
    pub id: String,
    /// Absent means the item's minimum order quantity.
    #[serde(default)]
    pub quantity: Option<i64>,
}

const CONTACT_TEXT_FIELDS: [Field; 5] = [
    Field::Name,
    Field::Email,
    Field::Phone,
    Field::Company,
    Field::Message,
];

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Builds a contact session the way the website would: field by field,
/// then the cart.
pub fn contact_session(
    file: ContactFile,
    menu: &[MenuItem],
    pricing: PricingPolicy,
) -> anyhow::Result<ContactSession> {
    let mut session = ContactSession::new(pricing);

    for field in CONTACT_TEXT_FIELDS {
        if let Some(value) = file.form.value(field) {
            session.set_field(field, value)?;
        }
    }
    session.set_event_date(file.form.event_date);
    session.set_guest_count(file.form.guest_count);

    for item_ref in &file.items {
        let Some(item) = menu.iter().find(|i| i.id == item_ref.id) else {
            bail!("Unknown or unavailable menu item: {}", item_ref.id);
        };

        session.cart_mut().add(item);
        if let Some(quantity) = item_ref.quantity {
            if quantity < item.quantity_floor() {
                bail!(
                    "{} must be ordered in quantities of at least {}",
                    item.name,
                    item.quantity_floor()
                );
            }
            if quantity > MAX_ITEM_QUANTITY {
                bail!("{} cannot be ordered in quantities above {MAX_ITEM_QUANTITY}", item.name);
            }
            session.cart_mut().set_quantity(&item.id, quantity);
        }
    }

    Ok(session)
}

pub fn careers_session(form: CareersForm) -> CareersSession {
    CareersSession::with_form(form)
}

/// One line per failed field.
pub fn render_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, error)| format!("  {field}: {error}\n"))
        .collect()
}
