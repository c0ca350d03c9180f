use crate::foundation::core::Rgba8;
use serde::{Deserialize, Serialize};

/// Substituted for a category whose `colorHex` is missing or malformed.
pub const FALLBACK_COLOR: Rgba8 = Rgba8::rgb(0x00, 0x00, 0x00);

/// Neutral fill of the single wedge drawn for an empty dataset.
pub const PLACEHOLDER_COLOR: Rgba8 = Rgba8::rgb(0xDD, 0xDD, 0xDD);

/// Color as it appears in configuration documents.
///
/// Accepts `"#rrggbb"`, `"#rrggbbaa"` or an `[r, g, b]` / `[r, g, b, a]` array of bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorDef(pub Rgba8);

impl From<Rgba8> for ColorDef {
    fn from(value: Rgba8) -> Self {
        Self(value)
    }
}

impl Serialize for ColorDef {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&to_hex(self.0))
    }
}

impl<'de> Deserialize<'de> for ColorDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Hex(String),
            Arr(Vec<u8>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Hex(s) => parse_hex(&s).map(Self).map_err(serde::de::Error::custom),
            Repr::Arr(v) => match v.as_slice() {
                [r, g, b] => Ok(Self(Rgba8::rgb(*r, *g, *b))),
                [r, g, b, a] => Ok(Self(Rgba8::rgba(*r, *g, *b, *a))),
                _ => Err(serde::de::Error::custom(
                    "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                )),
            },
        }
    }
}

/// Parse `#RRGGBB` (or `#RRGGBBAA`), case-insensitive, leading `#` optional.
pub fn parse_hex(s: &str) -> Result<Rgba8, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);
    if !s.is_ascii() {
        return Err(format!("hex color \"{s}\" contains non-ascii characters"));
    }

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    match s.len() {
        6 => Ok(Rgba8::rgb(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
        )),
        8 => Ok(Rgba8::rgba(
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        )),
        _ => Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned()),
    }
}

/// Parse an opaque `#RRGGBB` color. Alpha digits are rejected.
pub fn parse_hex_rgb(s: &str) -> Result<Rgba8, String> {
    let digits = s.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if digits.len() != 6 {
        return Err(format!("category color \"{s}\" must be #RRGGBB"));
    }
    parse_hex(digits)
}

/// Resolve a category color, substituting [`FALLBACK_COLOR`] for missing or malformed input.
///
/// Only opaque `#RRGGBB` is accepted, so a category can never end up invisible.
pub fn resolve_category_color(label: &str, hex: Option<&str>) -> Rgba8 {
    let Some(hex) = hex else {
        tracing::warn!(category = label, "category has no color, using fallback");
        return FALLBACK_COLOR;
    };
    match parse_hex_rgb(hex) {
        Ok(c) => c,
        Err(err) => {
            tracing::warn!(category = label, color = hex, %err, "invalid category color, using fallback");
            FALLBACK_COLOR
        }
    }
}

pub fn to_hex(c: Rgba8) -> String {
    if c.a == 255 {
        format!("#{:02X}{:02X}{:02X}", c.r, c.g, c.b)
    } else {
        format!("#{:02X}{:02X}{:02X}{:02X}", c.r, c.g, c.b, c.a)
    }
}
