//! Value normalization for comparing authored CSS with browser output.

use lightningcss::traits::Parse;
use lightningcss::values::color::{CssColor, SRGB};

/// Formats any CSS color the way WebDriver reports computed colors:
/// `rgba(r, g, b, a)` with integer channels. Returns `None` for values that
/// are not a single color (e.g. `6px solid goldenrod`) or have no fixed
/// sRGB value (`currentColor`).
pub fn normalize_color(value: &str) -> Option<String> {
    let color = CssColor::parse_string(value.trim()).ok()?;
    let srgb = SRGB::try_from(&color).ok()?;
    Some(format!(
        "rgba({}, {}, {}, {})",
        channel(srgb.r),
        channel(srgb.g),
        channel(srgb.b),
        format_alpha(srgb.alpha)
    ))
}

fn channel(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn format_alpha(alpha: f32) -> String {
    let alpha = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
    let text = format!("{:.3}", alpha);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Colors compare by normalized value, everything else by trimmed text.
pub fn values_match(property: &str, actual: &str, expected: &str) -> bool {
    if actual.trim() == expected.trim() {
        return true;
    }
    if property.ends_with("color") {
        if let (Some(a), Some(e)) = (normalize_color(actual), normalize_color(expected)) {
            return a == e;
        }
    }
    false
}

/// Pixel length of a computed value such as `39.2px`.
///
/// Shorthands whose sides are all equal (`10px 10px`) resolve to that length;
/// anything else is `None`.
pub fn parse_px(value: &str) -> Option<f64> {
    let mut sides = value.split_whitespace().map(|side| {
        side.strip_suffix("px")
            .and_then(|n| n.parse::<f64>().ok())
    });
    let first = sides.next()??;
    for side in sides {
        if side? != first {
            return None;
        }
    }
    Some(first)
}

/// Percentage of an authored value such as `5%`.
pub fn parse_percent(value: &str) -> Option<f64> {
    value.trim().strip_suffix('%')?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn named_colors_normalize_to_rgba() {
        assert_eq!(normalize_color("cyan").as_deref(), Some("rgba(0, 255, 255, 1)"));
        assert_eq!(normalize_color("white").as_deref(), Some("rgba(255, 255, 255, 1)"));
        assert_eq!(
            normalize_color("goldenrod").as_deref(),
            Some("rgba(218, 165, 32, 1)")
        );
    }

    #[test]
    fn browser_rgb_normalizes_to_rgba() {
        assert_eq!(
            normalize_color("rgb(0, 255, 255)").as_deref(),
            Some("rgba(0, 255, 255, 1)")
        );
        assert_eq!(
            normalize_color("rgba(0, 0, 0, 0.5)").as_deref(),
            Some("rgba(0, 0, 0, 0.5)")
        );
        assert_eq!(normalize_color("#0ff").as_deref(), Some("rgba(0, 255, 255, 1)"));
    }

    #[test]
    fn non_colors_do_not_normalize() {
        assert_eq!(normalize_color("6px solid goldenrod"), None);
        assert_eq!(normalize_color("15px"), None);
        assert_eq!(normalize_color("currentColor"), None);
    }

    #[test]
    fn values_match_colors_only_for_color_properties() {
        assert!(values_match("background-color", "rgb(0, 255, 255)", "rgba(0, 255, 255, 1)"));
        assert!(values_match("background-color", "cyan", "rgba(0, 255, 255, 1)"));
        assert!(!values_match("float", "cyan", "rgba(0, 255, 255, 1)"));
        assert!(values_match("float", " left", "left"));
        assert!(!values_match("background-color", "white", "rgba(0, 255, 255, 1)"));
    }

    #[test]
    fn px_and_percent_parsing() {
        assert_eq!(parse_px("39.2px"), Some(39.2));
        assert_eq!(parse_px("10px 10px 10px 10px"), Some(10.0));
        assert_eq!(parse_px("10px 0px"), None);
        assert_eq!(parse_px("auto"), None);
        assert_eq!(parse_percent("5%"), Some(5.0));
        assert_eq!(parse_percent("5px"), None);
    }
}
