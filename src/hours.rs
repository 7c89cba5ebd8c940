//! Working-hours normalization for the morning and afternoon schedule slots.

/// Combine the raw morning and afternoon slot texts into one schedule string.
///
/// Each slot is trimmed, whitespace runs collapse to a single space and spaces around `-`
/// are dropped, so `"09:00 - 13:00"` becomes `"09:00-13:00"`. Non-empty slots are joined
/// with `", "`.
pub fn parse_working_hours(morning: &str, afternoon: &str) -> String {
    [morning, afternoon]
        .iter()
        .map(|slot| normalize_slot(slot))
        .filter(|slot| !slot.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn normalize_slot(slot: &str) -> String {
    let collapsed = slot.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.replace(" - ", "-").replace(" -", "-").replace("- ", "-")
}
