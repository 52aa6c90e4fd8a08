const UNITS: [(usize, &str); 3] = [(1_000_000_000, "B"), (1_000_000, "M"), (1_000, "K")];

/// Short row count for console output: `4536` -> `4.5K`, `2000` -> `2K`.
pub fn format_numbers(n: usize) -> String {
    for (scale, suffix) in UNITS {
        if n >= scale {
            let short = format!("{:.1}", n as f64 / scale as f64);
            let short = short.strip_suffix(".0").unwrap_or(&short);
            return format!("{}{}", short, suffix);
        }
    }
    n.to_string()
}
