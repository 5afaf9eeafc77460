use std::fmt;

use serde::{Deserialize, Serialize};

/// Clé couleur canonique : `#rrggbb`, minuscules.
///
/// Stockée sous forme de trois canaux ; l'égalité des valeurs équivaut à
/// l'égalité des chaînes canoniques produites par `Display`.
///
/// # Example
/// ```
/// use ts_core::color::Color;
/// let red = Color::from_rgb(239, 68, 68);
/// assert_eq!(red.to_string(), "#ef4444");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Color {
    r: u8,
    g: u8,
    b: u8,
}

impl Color {
    /// `#ffffff`, couleur de fond de toute grille neuve.
    pub const WHITE: Self = Self::from_rgb(255, 255, 255);
    /// `#000000`, repli pour toute entrée invalide.
    pub const BLACK: Self = Self::from_rgb(0, 0, 0);

    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Canaux (r, g, b).
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Luminance perceptuelle BT.709 [0..255].
    ///
    /// # Example
    /// ```
    /// use ts_core::color::Color;
    /// assert_eq!(Color::WHITE.luminance(), 255);
    /// assert_eq!(Color::BLACK.luminance(), 0);
    /// ```
    #[must_use]
    pub fn luminance(self) -> u8 {
        ((u32::from(self.r) * 2126 + u32::from(self.g) * 7152 + u32::from(self.b) * 722) / 10000)
            as u8
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<&str> for Color {
    fn from(input: &str) -> Self {
        normalize(input)
    }
}

impl From<String> for Color {
    fn from(input: String) -> Self {
        normalize(&input)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Normalise une représentation couleur en clé canonique.
///
/// Accepte `#rgb`, `#rrggbb` (hex insensible à la casse) et `rgb(r, g, b)`
/// avec canaux entiers bornés à [0, 255]. Toute autre entrée donne `#000000`.
///
/// # Example
/// ```
/// use ts_core::color::normalize;
/// assert_eq!(normalize("#ABC").to_string(), "#aabbcc");
/// assert_eq!(normalize("rgb(255, 0, 300)").to_string(), "#ff00ff");
/// assert_eq!(normalize("tomato").to_string(), "#000000");
/// ```
#[must_use]
pub fn normalize(input: &str) -> Color {
    let s = input.trim();
    let parsed = if let Some(hex) = s.strip_prefix('#') {
        parse_hex(hex)
    } else if let Some(body) = rgb_body(s) {
        parse_rgb(body)
    } else {
        None
    };
    parsed.unwrap_or(Color::BLACK)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok();
    let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => Some(Color::from_rgb(
            digit(0)? * 17,
            digit(1)? * 17,
            digit(2)? * 17,
        )),
        6 => Some(Color::from_rgb(pair(0)?, pair(2)?, pair(4)?)),
        _ => None,
    }
}

/// Contenu entre `rgb(` et `)`, préfixe insensible à la casse.
fn rgb_body(s: &str) -> Option<&str> {
    let prefix = s.get(..4)?;
    if !prefix.eq_ignore_ascii_case("rgb(") {
        return None;
    }
    s[4..].strip_suffix(')')
}

fn parse_rgb(body: &str) -> Option<Color> {
    let mut channels = body.split(',').map(|c| parse_channel(c.trim()));
    let r = channels.next()??;
    let g = channels.next()??;
    let b = channels.next()??;
    if channels.next().is_some() {
        return None;
    }
    Some(Color::from_rgb(r, g, b))
}

/// Entier signé quelconque, borné à [0, 255] (y compris au-delà de `u64`).
fn parse_channel(s: &str) -> Option<u8> {
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if negative {
        return Some(0);
    }
    let significant = digits.trim_start_matches('0');
    if significant.len() > 3 {
        return Some(u8::MAX);
    }
    let value = significant.parse::<u16>().unwrap_or(0);
    Some(value.min(255) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(input: &str) -> String {
        normalize(input).to_string()
    }

    #[test]
    fn short_hex_expands_each_digit() {
        assert_eq!(key("#abc"), "#aabbcc");
        assert_eq!(key("#F0a"), "#ff00aa");
        assert_eq!(key("#000"), "#000000");
    }

    #[test]
    fn long_hex_is_lowercased() {
        assert_eq!(key("#EF4444"), "#ef4444");
        assert_eq!(key("  #22c55e  "), "#22c55e");
    }

    #[test]
    fn rgb_function_converts_and_clamps() {
        assert_eq!(key("rgb(239, 68, 68)"), "#ef4444");
        assert_eq!(key("rgb(0,0,0)"), "#000000");
        assert_eq!(key("RGB( 255 , 255 , 255 )"), "#ffffff");
        assert_eq!(key("rgb(-20, 256, 1000)"), "#00ffff");
        assert_eq!(key("rgb(99999999999999999999999, 0, 0)"), "#ff0000");
        assert_eq!(key("rgb(007, 0, 0)"), "#070000");
    }

    #[test]
    fn malformed_input_falls_back_to_black() {
        for input in [
            "",
            "   ",
            "#",
            "#ab",
            "#abcd",
            "#abcdeg",
            "#ééé",
            "ef4444",
            "red",
            "rgb(1, 2)",
            "rgb(1, 2, 3, 4)",
            "rgb(1.5, 2, 3)",
            "rgb(a, b, c)",
            "rgb(1, 2, 3",
            "rgba(1, 2, 3, 1)",
        ] {
            assert_eq!(key(input), "#000000", "input {input:?}");
        }
    }

    #[test]
    fn normalize_is_idempotent() {
        for input in ["#abc", "#ABCDEF", "rgb(12, 200, 255)", "rgb(300,-1,7)", "#123456"] {
            let once = key(input);
            assert_eq!(key(&once), once, "input {input:?}");
            assert_eq!(once.len(), 7);
            assert_eq!(once, once.to_lowercase());
        }
    }

    #[test]
    fn equal_after_normalization_means_equal_values() {
        assert_eq!(normalize("#fff"), normalize("rgb(255,255,255)"));
        assert_eq!(normalize("#FFFFFF"), Color::WHITE);
    }

    #[test]
    fn serde_goes_through_normalize() {
        #[derive(Deserialize, Serialize)]
        struct Wrapper {
            color: Color,
        }
        let w: Wrapper = toml::from_str("color = \"#F00\"").unwrap();
        assert_eq!(w.color, Color::from_rgb(255, 0, 0));
        let out = toml::to_string(&w).unwrap();
        assert!(out.contains("#ff0000"), "{out}");
    }
}
