//! Numeric extraction from noisy text.
//!
//! Stands in for the pricing collaborator of the surrounding platform:
//! pull the first numeric token out of text like `"ab 1.234,56 EUR"`,
//! resolve the thousands/decimal separator convention, and round to a
//! fixed scale. Unparseable input degrades to `None`, never an error.

use std::sync::OnceLock;

use regex::Regex;

/// Scale applied when none is given explicitly.
pub const DEFAULT_SCALE: u32 = 2;

/// Rounding applied when reducing a value to a fixed scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round half away from zero. The default.
    HalfUp,
    /// Round half toward zero.
    HalfDown,
    /// Round half to the even neighbor.
    HalfEven,
    /// Always round away from zero.
    Up,
    /// Always round toward zero.
    Down,
}

fn token_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // digit groups joined by separators: "1 234,56", "1.234.567", "12'000"
        Regex::new(r"-?\d+(?:[ \u{00A0}.,']\d+)*").expect("token pattern is valid")
    })
}

/// Extract the first number from `text` at the default scale of 2,
/// rounding half up.
pub fn extract_number(text: &str) -> Option<f64> {
    extract_number_with(text, DEFAULT_SCALE, Rounding::HalfUp)
}

/// Extract the first number from `text`, rounded to `scale` fractional
/// digits with the given mode. Returns `None` when no numeric token is
/// present.
pub fn extract_number_with(text: &str, scale: u32, rounding: Rounding) -> Option<f64> {
    let token = token_pattern().find(text)?.as_str();
    let canonical = canonicalize(token);
    let value: f64 = canonical.parse().ok()?;
    Some(round_to(value, scale, rounding))
}

/// Round `value` to `scale` fractional digits.
pub fn round_to(value: f64, scale: u32, rounding: Rounding) -> f64 {
    let factor = 10f64.powi(scale as i32);
    // shed binary representation noise (2.345 * 100 is 234.4999…) before
    // the mode looks at the half boundary
    let scaled = (value * factor * 1e10).round() / 1e10;
    let rounded = match rounding {
        Rounding::HalfUp => half_up(scaled),
        Rounding::HalfDown => half_down(scaled),
        Rounding::HalfEven => half_even(scaled),
        Rounding::Up => scaled.signum() * scaled.abs().ceil(),
        Rounding::Down => scaled.trunc(),
    };
    rounded / factor
}

fn half_up(scaled: f64) -> f64 {
    if scaled >= 0.0 {
        (scaled + 0.5).floor()
    } else {
        (scaled - 0.5).ceil()
    }
}

fn half_down(scaled: f64) -> f64 {
    if scaled >= 0.0 {
        (scaled - 0.5).ceil()
    } else {
        (scaled + 0.5).floor()
    }
}

fn half_even(scaled: f64) -> f64 {
    let floor = scaled.floor();
    let diff = scaled - floor;
    if diff > 0.5 {
        floor + 1.0
    } else if diff < 0.5 {
        floor
    } else if (floor as i64) % 2 == 0 {
        floor
    } else {
        floor + 1.0
    }
}

/// Reduce a matched token to a plain `digits[.digits]` form.
///
/// Rules, in order:
/// - spaces, non-breaking spaces and apostrophes are always grouping;
/// - when both `,` and `.` appear, the one occurring last is the decimal
///   separator and the other is grouping;
/// - a single separator kind occurring once with exactly three digits
///   after it is grouping (`1,234` reads as 1234), any other digit count
///   makes it decimal (`1,5` reads as 1.5);
/// - a separator kind occurring several times is grouping except for a
///   final group of fewer than three digits.
fn canonicalize(token: &str) -> String {
    let compact: String = token
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{00A0}' | '\''))
        .collect();

    let last_comma = compact.rfind(',');
    let last_dot = compact.rfind('.');

    let decimal_sep = match (last_comma, last_dot) {
        (Some(c), Some(d)) => {
            if c > d {
                Some(',')
            } else {
                Some('.')
            }
        }
        (Some(c), None) => single_kind_decimal(&compact, ',', c),
        (None, Some(d)) => single_kind_decimal(&compact, '.', d),
        (None, None) => None,
    };

    let mut out = String::with_capacity(compact.len());
    let decimal_at = decimal_sep.and_then(|sep| compact.rfind(sep));
    for (i, c) in compact.char_indices() {
        if c == ',' || c == '.' {
            if Some(i) == decimal_at {
                out.push('.');
            }
            // grouping separators are dropped
        } else {
            out.push(c);
        }
    }
    out
}

fn single_kind_decimal(compact: &str, sep: char, last_at: usize) -> Option<char> {
    let trailing = compact.len() - last_at - 1;
    if trailing != 3 {
        return Some(sep);
    }
    let occurrences = compact.matches(sep).count();
    if occurrences > 1 {
        return None;
    }
    // "2,345" reads as grouping, but a zero or oversized head cannot be a
    // grouped integer part ("0,005", "1234,567")
    let head = compact[..last_at].trim_start_matches('-');
    if head == "0" || head.len() > 3 {
        Some(sep)
    } else {
        None
    }
}
