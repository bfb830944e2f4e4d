//! # Numeric Formatting Module
//!
//! Fixed-decimal rounding shared by every calculator. Results are rounded the
//! way a calculator display rounds: ties go away from zero, computed from the
//! exact binary value of the input.

/// Format `value` with exactly `decimals` digits after the point.
///
/// Exact ties (e.g. `0.125` at two decimals) round away from zero, every other
/// value rounds to nearest.
///
/// # Examples
///
/// ```rust
/// use brewmate::numeric::to_fixed;
///
/// assert_eq!(to_fixed(0.125, 2), "0.13");
/// assert_eq!(to_fixed(1.0, 2), "1.00");
/// assert_eq!(to_fixed(-0.25, 1), "-0.3");
/// ```
pub fn to_fixed(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let magnitude = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if is_exact_tie(magnitude, decimals) {
        let nudged = format!("{:.*}", decimals, round_tie_up(magnitude, decimals));
        return format!("{sign}{nudged}");
    }

    let formatted = format!("{:.*}", decimals, magnitude);
    if formatted.chars().all(|c| c == '0' || c == '.') {
        // Avoid "-0.00"
        return formatted;
    }
    format!("{sign}{formatted}")
}

/// Round `value` to `decimals` digits and return it as a number.
pub fn round_to(value: f64, decimals: usize) -> f64 {
    to_fixed(value, decimals).parse().unwrap_or(value)
}

/// Whether the exact decimal expansion of `magnitude` ends with a single `5`
/// right after the last kept digit.
fn is_exact_tie(magnitude: f64, decimals: usize) -> bool {
    // 1100 digits cover the full expansion of any finite f64
    let exact = format!("{:.1100}", magnitude);
    let Some(point) = exact.find('.') else {
        return false;
    };
    let fraction = &exact[point + 1..];
    let mut tail = fraction.chars().skip(decimals);
    tail.next() == Some('5') && tail.all(|c| c == '0')
}

fn round_tie_up(magnitude: f64, decimals: usize) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    ((magnitude * scale).floor() + 1.0) / scale
}
