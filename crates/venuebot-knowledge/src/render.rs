// SPDX-FileCopyrightText: 2026 Venuebot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge text handed to the model as part of its instruction.
//!
//! The layout is deterministic: the same snapshot always renders to the same
//! text, so conversations seeded within one TTL window see identical facts.

use std::fmt::Write;

use venuebot_core::types::PackageRecord;

use crate::cache::Snapshot;
use crate::facts::PhoneFixup;

const MISSING: &str = "N/A";
const NO_IMAGE: &str = "None";

/// Renders the four collections as labelled sections, one line per record.
pub fn render_snapshot(snapshot: &Snapshot, fixup: &PhoneFixup) -> String {
    let mut out = String::from("--- GENERAL INFO ---\n");
    for fact in &snapshot.facts {
        let _ = writeln!(out, "- {}: {}", fact.key, fixup.apply(&fact.key, &fact.value));
    }

    out.push_str("\n--- PACKAGES ---\n");
    for pkg in &snapshot.packages {
        out.push_str(&package_line(pkg));
        out.push('\n');
    }

    out.push_str("\n--- BUFFET OPTIONS ---\n");
    for tier in &snapshot.buffet {
        let _ = writeln!(
            out,
            "• For Package {}: {} = {} ({})",
            or_missing(&tier.package_id),
            or_missing(&tier.level_name),
            or_missing(&tier.price),
            or_missing(&tier.items),
        );
    }

    out.push_str("\n--- EXTRAS ---\n");
    for extra in &snapshot.extras {
        let _ = writeln!(
            out,
            "• {} ({}): {}",
            or_missing(&extra.name),
            or_missing(&extra.category),
            or_missing(&extra.price),
        );
    }

    out
}

fn package_line(pkg: &PackageRecord) -> String {
    format!(
        "• ID: {} | Name: {} | Season: {} | Guests: {} | Price: {} | Tier: {} | Image: {} | Details: {}",
        or_missing(&pkg.id),
        or_missing(&pkg.name),
        or_missing(&pkg.season),
        or_missing(&pkg.guests),
        or_missing(&pkg.price),
        pkg.tier(),
        pkg.image_url.as_deref().unwrap_or(NO_IMAGE),
        or_missing(&pkg.details),
    )
}

fn or_missing(field: &Option<String>) -> &str {
    field.as_deref().unwrap_or(MISSING)
}
