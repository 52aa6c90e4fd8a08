use std::fmt::Display;

/// Maximum number of items `format_list` prints before collapsing the rest.
pub const MAX_LIST_ITEMS: usize = 10;

/// Format a ratio as a human readable percentage.
///
/// Whole percentages drop their decimals (`0.2` -> `20%`), values too small
/// or too close to one to show with two decimals are bounded
/// (`<0.01%`, `>99.99%`).
pub fn format_percent(ratio: f64) -> String {
    if ratio < 0. {
        return format!("-{}", format_percent(-ratio));
    }
    if ratio.fract() == 0. {
        return format!("{}%", (ratio * 100.).round() as i64);
    }
    if ratio < 1. {
        if ratio < 1e-4 {
            return "<0.01%".to_string();
        }
        if ratio > 1. - 1e-4 {
            return ">99.99%".to_string();
        }
    }
    format!("{}%", trim_decimals(format!("{:.2}", ratio * 100.)))
}

fn trim_decimals(s: String) -> String {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Join items with `", "`, keeping at most `MAX_LIST_ITEMS` and noting how
/// many were left out.
pub fn format_list<T: Display>(items: &[T]) -> String {
    let shown: Vec<String> = items
        .iter()
        .take(MAX_LIST_ITEMS)
        .map(|i| i.to_string())
        .collect();
    let mut out = shown.join(", ");
    if items.len() > MAX_LIST_ITEMS {
        out.push_str(&format!(", +{} more", items.len() - MAX_LIST_ITEMS));
    }
    out
}

/// Cut `s` to `max_len` characters, marking the cut with `...`.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max_len).collect();
    out.push_str("...");
    out
}
