//! Plain-text message bodies for the relay.
//!
//! The relay forwards `message` verbatim to the restaurant inbox, so the
//! layout here is what staff read.

use std::fmt::Write;

use saffra_core::{format_price, CareersForm, CateringInquiry, PricingPolicy};

/// Renders a contact / catering inquiry.
///
/// ```text
/// Name: Sara Lind
/// Email: sara@example.se
/// Event date: 2026-11-20
/// Guests: 40
///
/// Message:
/// Lunch for the office
///
/// Inquiry items:
/// - Wedding Buffet x 1 @ 180 kr = 180 kr
///
/// Items: 1
/// Subtotal: 180 kr
/// Delivery: 49 kr
/// Total: 229 kr
/// ```
pub fn render_contact(inquiry: &CateringInquiry, pricing: &PricingPolicy) -> String {
    let form = &inquiry.form;
    let mut out = String::new();

    push_line(&mut out, "Name", &form.name);
    push_line(&mut out, "Email", &form.email);
    if let Some(phone) = &form.phone {
        push_line(&mut out, "Phone", phone);
    }
    if let Some(company) = &form.company {
        push_line(&mut out, "Company", company);
    }
    if let Some(date) = form.event_date {
        push_line(&mut out, "Event date", &date.to_string());
    }
    if let Some(guests) = form.guest_count {
        push_line(&mut out, "Guests", &guests.to_string());
    }

    if let Some(message) = &form.message {
        out.push_str("\nMessage:\n");
        out.push_str(message.trim());
        out.push('\n');
    }

    if !inquiry.has_items() {
        return out;
    }

    out.push_str("\nInquiry items:\n");
    for item in &inquiry.items {
        let _ = writeln!(
            out,
            "- {} x {} @ {} = {}",
            item.name,
            item.quantity,
            format_price(item.price),
            format_price(item.line_total())
        );
    }

    let totals = &inquiry.totals;
    out.push('\n');
    push_line(&mut out, "Items", &totals.item_count.to_string());
    push_line(&mut out, "Subtotal", &format_price(totals.subtotal));
    if totals.qualifies_for_free_delivery {
        let _ = writeln!(
            out,
            "Delivery: Free (orders from {})",
            format_price(pricing.free_delivery_threshold)
        );
    } else {
        push_line(&mut out, "Delivery", &format_price(totals.delivery_fee));
    }
    push_line(&mut out, "Total", &format_price(totals.total));

    out
}

/// Renders a job application.
pub fn render_careers(form: &CareersForm) -> String {
    let mut out = String::new();
    push_line(&mut out, "Name", &form.name);
    push_line(&mut out, "Email", &form.email);
    push_line(&mut out, "Phone", &form.phone);
    push_line(&mut out, "Position", &form.job_title);
    out.push_str("\nAbout the applicant:\n");
    out.push_str(form.message.trim());
    out.push('\n');
    out
}

fn push_line(out: &mut String, label: &str, value: &str) {
    let _ = writeln!(out, "{label}: {}", value.trim());
}
