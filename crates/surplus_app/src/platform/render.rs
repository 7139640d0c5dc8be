use std::fmt::Write;

use chrono::Local;
use surplus_core::{AppViewModel, OfferDetailView, SessionState, Severity};

/// Renders the whole console view as one block of text.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();
    let session = match view.session {
        SessionState::Watching => "Watching",
        SessionState::Stopped => "Stopped",
    };
    let updated = view
        .last_updated
        .map(|at| at.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    let _ = writeln!(
        out,
        "== {} | last update {} | cycles {} | alerts {} | skipped records {} ==",
        session, updated, view.cycles_seen, view.notified_total, view.skipped_total
    );

    if let Some(status) = &view.status {
        let tag = match status.severity {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "ERROR",
        };
        let _ = writeln!(out, "[{}] {}", tag, status.text);
    }

    if view.rows.is_empty() {
        let _ = writeln!(out, "No offers match the current filters.");
    } else {
        let _ = writeln!(
            out,
            "  #  {:<28} {:>12} {:>4}  {:<24} {:>7}",
            "Vendor", "Price", "Qty", "Pickup", "km"
        );
        for (index, row) in view.rows.iter().enumerate() {
            let marker = if row.is_new { '*' } else { ' ' };
            let _ = writeln!(
                out,
                "{}{:>2}  {:<28} {:>12} {:>4}  {:<24} {:>7.2}",
                marker,
                index + 1,
                truncate(&row.vendor, 28),
                row.price,
                row.quantity,
                row.pickup,
                row.distance_km
            );
        }
    }

    if let Some(detail) = &view.selected {
        render_detail(&mut out, detail);
    }

    let draft = &view.draft;
    let location = draft
        .coordinates
        .map(|c| format!("{:.4}, {:.4}", c.lat, c.lng))
        .unwrap_or_else(|| "not set".to_string());
    let _ = writeln!(
        out,
        "Draft: keywords [{}] vendor [{}] price {}-{} radius {} km location {} every {} s",
        draft.keywords,
        draft.vendor.as_deref().unwrap_or("any"),
        draft.min_price,
        draft.max_price,
        draft.radius_km,
        location,
        draft.refresh_interval_secs
    );
    if !view.vendor_choices.is_empty() {
        let choices = view
            .vendor_choices
            .iter()
            .enumerate()
            .map(|(index, vendor)| format!("#{} {}", index + 1, vendor))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "Vendors: {}", choices);
    }
    out
}

fn render_detail(out: &mut String, detail: &OfferDetailView) {
    let _ = writeln!(out, "-- {} --", detail.vendor);
    let _ = writeln!(out, "   Address:  {}", detail.address);
    let _ = writeln!(out, "   Price:    {}", detail.price);
    let _ = writeln!(out, "   Quantity: {}", detail.quantity);
    let _ = writeln!(out, "   Pickup:   {}", detail.pickup);
    let _ = writeln!(out, "   Distance: {:.2} km", detail.distance_km);
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    cut.push('~');
    cut
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use surplus_core::{
        update, AppState, CycleReport, Msg, Offer, OfferId, Price, SettingsSnapshot,
    };

    use super::*;

    fn offer(id: &str, vendor: &str) -> Offer {
        Offer {
            id: OfferId::new(id),
            vendor_name: vendor.to_string(),
            address: Some("Nowy Swiat 5".to_string()),
            price: Price::new(1500, "PLN"),
            quantity_available: 4,
            pickup_window: None,
            distance_km: 1.25,
        }
    }

    #[test]
    fn marks_new_rows_and_shows_detail() {
        let report = CycleReport {
            filtered: vec![offer("1", "Green Bakery"), offer("2", "Corner Cafe")],
            new_offers: vec![offer("2", "Corner Cafe")],
            vendors: vec!["Corner Cafe".to_string(), "Green Bakery".to_string()],
            polled_at: Utc::now(),
            skipped_records: 1,
            coalesced: 0,
        };
        let state = AppState::new(SettingsSnapshot::default());
        let (state, _) = update(state, Msg::CycleCompleted(report));
        let (state, _) = update(state, Msg::OfferSelected(OfferId::new("1")));

        let text = render(&state.view());
        assert!(text.contains("alerts 1 | skipped records 1"));
        assert!(text.contains("* 2  Corner Cafe"));
        assert!(text.contains("  1  Green Bakery"));
        assert!(text.contains("15.00 PLN"));
        assert!(text.contains("Address:  Nowy Swiat 5"));
        assert!(text.contains("#1 Corner Cafe, #2 Green Bakery"));
    }

    #[test]
    fn empty_view_says_so() {
        let text = render(&AppState::default().view());
        assert!(text.starts_with("== Watching | last update never"));
        assert!(text.contains("No offers match the current filters."));
        assert!(text.contains("location not set"));
    }

    #[test]
    fn long_vendor_names_are_cut() {
        assert_eq!(truncate("abcdef", 4), "abc~");
        assert_eq!(truncate("abc", 4), "abc");
    }
}
