//! Kubernetes-style quantity strings to numbers, and numbers back to
//! display strings.
//!
//! CPU quantities come out in cores (`"500m"` → `0.5`), memory and storage
//! in bytes (`"2Gi"` → `2147483648`). Parsing never fails: anything that
//! does not start with a number is worth zero.

use tracing::debug;

const MILLI: f64 = 1.0 / 1000.0;
const KIBI: f64 = 1024.0;
const MEBI: f64 = 1_048_576.0; // 1024 ^ 2
const GIBI: f64 = 1_073_741_824.0; // 1024 ^ 3
const TEBI: f64 = 1_099_511_627_776.0; // 1024 ^ 4

/// Recognized scale suffixes. Anything else parses unscaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suffix {
    Milli,
    Kibi,
    Mebi,
    Gibi,
    Tebi,
    None,
}

impl Suffix {
    /// Checked in this order against the end of the string.
    const MATCH_ORDER: [(Suffix, &'static str); 5] = [
        (Suffix::Milli, "m"),
        (Suffix::Kibi, "Ki"),
        (Suffix::Mebi, "Mi"),
        (Suffix::Gibi, "Gi"),
        (Suffix::Tebi, "Ti"),
    ];

    pub const fn multiplier(self) -> f64 {
        match self {
            Suffix::Milli => MILLI,
            Suffix::Kibi => KIBI,
            Suffix::Mebi => MEBI,
            Suffix::Gibi => GIBI,
            Suffix::Tebi => TEBI,
            Suffix::None => 1.0,
        }
    }

    /// Find the suffix by trailing-string match.
    pub fn of(raw: &str) -> Suffix {
        Self::MATCH_ORDER
            .iter()
            .find(|(_, text)| raw.ends_with(text))
            .map(|(suffix, _)| *suffix)
            .unwrap_or(Suffix::None)
    }
}

/// Parse a quantity string into its base magnitude.
///
/// `m` divides by 1000; `Ki`/`Mi`/`Gi`/`Ti` multiply by powers of 1024; no
/// suffix or an unknown one leaves the leading number as-is. Empty or
/// malformed input yields `0.0`.
pub fn parse_quantity(raw: &str) -> f64 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0.0;
    }
    let Some(value) = leading_number(raw) else {
        debug!("Unparseable quantity '{}', treating as 0", raw);
        return 0.0;
    };
    value * Suffix::of(raw).multiplier()
}

/// Parse the longest numeric prefix (`[+-]digits[.digits]`).
fn leading_number(raw: &str) -> Option<f64> {
    let bytes = raw.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if !raw[digits_start..end].bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    raw[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Render a byte count as gibibytes with one decimal, e.g. `"2.0Gi"`.
pub fn format_bytes(bytes: f64) -> String {
    format!("{:.1}Gi", bytes / GIBI)
}

/// Render a core count with one decimal, e.g. `"15.0"`.
pub fn format_cores(cores: f64) -> String {
    format!("{:.1}", cores)
}

/// Render a device count: whole numbers bare, fractions with one decimal.
pub fn format_count(count: f64) -> String {
    if count.is_finite() && count.fract() == 0.0 {
        format!("{:.0}", count)
    } else {
        format!("{:.1}", count)
    }
}

/// Display percentage of `used` against `limit`, clamped to `[0, 100]`.
/// A zero or non-finite limit reads as 0%.
pub fn usage_percentage(used: f64, limit: f64) -> f64 {
    if limit == 0.0 || !limit.is_finite() {
        return 0.0;
    }
    let pct = used / limit * 100.0;
    if pct.is_nan() {
        return 0.0;
    }
    pct.clamp(0.0, 100.0)
}
