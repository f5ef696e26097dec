//! Color conversions behind the style-variable contract
//!
//! Presentation never reads catalog hex values directly. It reads CSS custom
//! properties holding space-separated decimal channels (`"5 150 105"`), so the
//! conversions here are part of the stable external surface.

/// Prefix shared by every style variable
pub const VARIABLE_PREFIX: &str = "--";

/// Check whether a string is a `#RGB` or `#RRGGBB` hex color
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            (digits.len() == 3 || digits.len() == 6)
                && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Expand a hex color to its six-digit form, without the leading `#`
///
/// `"#abc"` becomes `"aabbcc"`; six-digit input is returned as-is.
fn expand_digits(hex: &str) -> Option<String> {
    let digits = hex.trim_start_matches('#');
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        6 => Some(digits.to_string()),
        3 => Some(digits.chars().flat_map(|c| [c, c]).collect()),
        _ => None,
    }
}

/// Parse a hex color string to RGB components
pub fn parse_hex_color(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = expand_digits(hex)?;
    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Convert a hex color to the channel string stored in style variables
///
/// ```
/// use app_core::color::channel_triple;
///
/// assert_eq!(channel_triple("#059669").as_deref(), Some("5 150 105"));
/// ```
pub fn channel_triple(hex: &str) -> Option<String> {
    let (r, g, b) = parse_hex_color(hex)?;
    Some(format!("{} {} {}", r, g, b))
}

/// Convert an opacity in `[0, 1]` to an 8-bit alpha value
///
/// Values outside the range are clamped; `0.5` rounds up to `128`.
pub fn alpha_byte(opacity: f64) -> u8 {
    let opacity = if opacity.is_nan() { 1.0 } else { opacity.clamp(0.0, 1.0) };
    (opacity * 255.0).round() as u8
}

/// Two lowercase hex digits for an opacity
pub fn alpha_hex(opacity: f64) -> String {
    format!("{:02x}", alpha_byte(opacity))
}

/// Append an alpha byte to a hex color, producing an 8-digit RGBA hex string
///
/// Compact colors are expanded first so the result is always `#RRGGBBAA`.
pub fn with_alpha(hex: &str, opacity: f64) -> Option<String> {
    let digits = expand_digits(hex)?;
    Some(format!("#{}{}", digits, alpha_hex(opacity)))
}

/// Convert a camelCase role name to kebab-case
///
/// Every uppercase letter becomes `-` followed by its lowercase form, so names
/// that are already kebab-case pass through unchanged.
pub fn kebab_case(role: &str) -> String {
    let mut out = String::with_capacity(role.len() + 4);
    for c in role.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Style variable name for a color role (`mutedForeground` → `--muted-foreground`)
pub fn variable_name(role: &str) -> String {
    format!("{}{}", VARIABLE_PREFIX, kebab_case(role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_hex_color() {
        assert!(is_hex_color("#059669"));
        assert!(is_hex_color("#FFF"));
        assert!(is_hex_color("#aBc123"));
        assert!(!is_hex_color("059669"));
        assert!(!is_hex_color("#05966"));
        assert!(!is_hex_color("#0596691a"));
        assert!(!is_hex_color("#GGGGGG"));
        assert!(!is_hex_color(""));
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FFFFFF"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color("#000000"), Some((0, 0, 0)));
        assert_eq!(parse_hex_color("#059669"), Some((5, 150, 105)));
        assert_eq!(parse_hex_color("94a3b8"), Some((148, 163, 184)));
        assert_eq!(parse_hex_color("#abc"), Some((170, 187, 204)));
        assert_eq!(parse_hex_color("#FF"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_channel_triple() {
        assert_eq!(channel_triple("#059669").unwrap(), "5 150 105");
        assert_eq!(channel_triple("#94a3b8").unwrap(), "148 163 184");
        assert_eq!(channel_triple("#fff").unwrap(), "255 255 255");
        assert!(channel_triple("not a color").is_none());
    }

    #[test]
    fn test_alpha_encoding() {
        assert_eq!(alpha_hex(0.5), "80");
        assert_eq!(alpha_hex(1.0), "ff");
        assert_eq!(alpha_hex(0.0), "00");
        assert_eq!(alpha_hex(0.02), "05");
        assert_eq!(alpha_byte(1.7), 255);
        assert_eq!(alpha_byte(-0.3), 0);
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(with_alpha("#fbbf24", 0.25).unwrap(), "#fbbf2440");
        assert_eq!(with_alpha("#fff", 0.5).unwrap(), "#ffffff80");
        assert!(with_alpha("yellow", 0.5).is_none());
    }

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("mutedForeground"), "muted-foreground");
        assert_eq!(kebab_case("primaryForeground"), "primary-foreground");
        assert_eq!(kebab_case("background"), "background");
        assert_eq!(kebab_case("card-foreground"), "card-foreground");
    }

    #[test]
    fn test_variable_name() {
        assert_eq!(variable_name("mutedForeground"), "--muted-foreground");
        assert_eq!(variable_name("primary"), "--primary");
    }
}
