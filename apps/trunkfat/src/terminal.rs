//! Text projection of the in-memory surface.

use std::fmt::Write as _;

use client_core::{surface::MemorySnapshot, Region, RiskBadge, TextSlot};

pub fn render(snapshot: &MemorySnapshot) -> String {
    let mut out = String::new();

    if snapshot.is_visible(Region::ErrorBanner) {
        let message = snapshot.text(TextSlot::ErrorMessage).unwrap_or_default();
        let _ = writeln!(out, "[!] {message}");
        if !snapshot.invalid.is_empty() {
            let mut fields: Vec<&str> = snapshot.invalid.iter().map(|f| f.name()).collect();
            fields.sort_unstable();
            let _ = writeln!(out, "    check: {}", fields.join(", "));
        }
    }

    if snapshot.is_visible(Region::Result) {
        let percentage = snapshot.text(TextSlot::Percentage).unwrap_or_default();
        let _ = writeln!(out, "躯干脂肪比例: {percentage}");
        if let Some((label, badge)) = &snapshot.badge {
            let marker = match badge {
                RiskBadge::Low => "+",
                RiskBadge::Elevated => "!",
            };
            let _ = writeln!(out, "风险等级: [{marker}] {label} ({})", badge.css_class());
        }
        for slot in [TextSlot::Advice, TextSlot::DetailedAdvice, TextSlot::CutoffNote] {
            if let Some(text) = snapshot.text(slot).filter(|t| !t.is_empty()) {
                let _ = writeln!(out, "{text}");
            }
        }
        if snapshot.is_visible(Region::Recommendations) {
            let _ = writeln!(out, "建议:");
            for (index, item) in snapshot.recommendations.iter().enumerate() {
                let _ = writeln!(out, "  {}. {item}", index + 1);
            }
        }
    }

    out
}
