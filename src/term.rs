//! Term object model: property values, operators between them, and the
//! typed color / rectangle forms produced by reclassification.

use std::fmt;

use url::Url;

/// Separator written before a term. The first term of a list carries none;
/// plain whitespace is the default between the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Space,
    Comma,
    Slash,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub operator: Option<Operator>,
    pub value: TermValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TermValue {
    Ident(String),
    String(String),
    Number { value: f32, integer: bool },
    Percent(f32),
    Dimension { value: f32, unit: String },
    Color(Color),
    Uri { value: String, base: Option<Url> },
    Function { name: String, args: Vec<Term> },
    Rect(Rect),
}

/// sRGB color with alpha, `a == 255` meaning opaque.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// `rect(top, right, bottom, left)`, each edge a length or `auto`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub edges: Vec<Term>,
}

impl Term {
    pub fn new(operator: Option<Operator>, value: TermValue) -> Self {
        Self { operator, value }
    }
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Basic named colors plus `transparent`; unknown names stay idents.
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "aqua" => Self::rgb(0, 255, 255),
            "black" => Self::rgb(0, 0, 0),
            "blue" => Self::rgb(0, 0, 255),
            "cyan" => Self::rgb(0, 255, 255),
            "fuchsia" => Self::rgb(255, 0, 255),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "green" => Self::rgb(0, 128, 0),
            "lime" => Self::rgb(0, 255, 0),
            "magenta" => Self::rgb(255, 0, 255),
            "maroon" => Self::rgb(128, 0, 0),
            "navy" => Self::rgb(0, 0, 128),
            "olive" => Self::rgb(128, 128, 0),
            "orange" => Self::rgb(255, 165, 0),
            "purple" => Self::rgb(128, 0, 128),
            "red" => Self::rgb(255, 0, 0),
            "silver" => Self::rgb(192, 192, 192),
            "teal" => Self::rgb(0, 128, 128),
            "white" => Self::rgb(255, 255, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "transparent" => Self::TRANSPARENT,
            _ => return None,
        })
    }

    /// `#rgb` or `#rrggbb` hex digits, without the leading `#`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        // Hash content is any ident sequence, not necessarily ASCII.
        if !hex.is_ascii() {
            return None;
        }
        match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
                let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
                let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
                Some(Self::rgb(r << 4 | r, g << 4 | g, b << 4 | b))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Self::rgb(r, g, b))
            }
            _ => None,
        }
    }

    /// `rgb()` / `rgba()` argument values: channels as 0-255 integers or
    /// percentages, alpha as a 0-1 number.
    pub fn from_rgb_args(args: &[&TermValue]) -> Option<Self> {
        if args.len() != 3 && args.len() != 4 {
            return None;
        }
        let r = rgb_channel(args[0])?;
        let g = rgb_channel(args[1])?;
        let b = rgb_channel(args[2])?;
        let a = match args.get(3) {
            Some(value) => alpha_channel(value)?,
            None => 255,
        };
        Some(Self { r, g, b, a })
    }

    /// `hsl()` / `hsla()` argument values: hue in degrees, saturation and
    /// lightness as percentages.
    pub fn from_hsl_args(args: &[&TermValue]) -> Option<Self> {
        if args.len() != 3 && args.len() != 4 {
            return None;
        }
        let h = match args[0] {
            TermValue::Number { value, .. } => value.rem_euclid(360.0) / 360.0,
            _ => return None,
        };
        let s = percent_channel(args[1])?;
        let l = percent_channel(args[2])?;
        let a = match args.get(3) {
            Some(value) => alpha_channel(value)?,
            None => 255,
        };
        let m2 = if l <= 0.5 { l * (s + 1.0) } else { l + s - l * s };
        let m1 = l * 2.0 - m2;
        Some(Self {
            r: to_channel(hue_to_rgb(m1, m2, h + 1.0 / 3.0)),
            g: to_channel(hue_to_rgb(m1, m2, h)),
            b: to_channel(hue_to_rgb(m1, m2, h - 1.0 / 3.0)),
            a,
        })
    }
}

fn rgb_channel(value: &TermValue) -> Option<u8> {
    match value {
        TermValue::Number { value, integer } if *integer => {
            Some(value.clamp(0.0, 255.0) as u8)
        }
        TermValue::Percent(p) => Some((p.clamp(0.0, 100.0) * 255.0 / 100.0).round() as u8),
        _ => None,
    }
}

fn alpha_channel(value: &TermValue) -> Option<u8> {
    match value {
        TermValue::Number { value, .. } => Some((value.clamp(0.0, 1.0) * 255.0).round() as u8),
        _ => None,
    }
}

fn percent_channel(value: &TermValue) -> Option<f32> {
    match value {
        TermValue::Percent(p) => Some(p.clamp(0.0, 100.0) / 100.0),
        _ => None,
    }
}

fn to_channel(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn hue_to_rgb(m1: f32, m2: f32, mut h: f32) -> f32 {
    if h < 0.0 {
        h += 1.0;
    }
    if h > 1.0 {
        h -= 1.0;
    }
    if h * 6.0 < 1.0 {
        m1 + (m2 - m1) * h * 6.0
    } else if h * 2.0 < 1.0 {
        m2
    } else if h * 3.0 < 2.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - h) * 6.0
    } else {
        m1
    }
}

impl Rect {
    /// Accepts exactly four edge terms, each a length, a plain zero, or the
    /// `auto` keyword.
    pub fn from_args(args: &[Term]) -> Option<Self> {
        if args.len() != 4 {
            return None;
        }
        for term in args {
            match &term.value {
                TermValue::Dimension { .. } => {}
                TermValue::Number { value, .. } if *value == 0.0 => {}
                TermValue::Ident(name) if name.eq_ignore_ascii_case("auto") => {}
                _ => return None,
            }
        }
        Some(Self {
            edges: args
                .iter()
                .map(|t| Term::new(None, t.value.clone()))
                .collect(),
        })
    }
}

/// Prints integers without a fraction part, `1.5` style otherwise.
pub(crate) fn write_number(f: &mut fmt::Formatter<'_>, value: f32, integer: bool) -> fmt::Result {
    if integer || value.fract() == 0.0 {
        write!(f, "{}", value as i64)
    } else {
        write!(f, "{value}")
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.operator {
            Some(Operator::Space) => write!(f, " ")?,
            Some(Operator::Comma) => write!(f, ", ")?,
            Some(Operator::Slash) => write!(f, "/")?,
            None => {}
        }
        write!(f, "{}", self.value)
    }
}

impl fmt::Display for TermValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "{name}"),
            Self::String(value) => write!(f, "\"{}\"", value.replace('"', "\\\"")),
            Self::Number { value, integer } => write_number(f, *value, *integer),
            Self::Percent(value) => {
                write_number(f, *value, value.fract() == 0.0)?;
                write!(f, "%")
            }
            Self::Dimension { value, unit } => {
                write_number(f, *value, value.fract() == 0.0)?;
                write!(f, "{unit}")
            }
            Self::Color(color) => write!(f, "{color}"),
            Self::Uri { value, .. } => write!(f, "url(\"{value}\")"),
            Self::Function { name, args } => {
                write!(f, "{name}(")?;
                for arg in args {
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Self::Rect(rect) => write!(f, "{rect}"),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "rgba({}, {}, {}, {:.2})",
                self.r,
                self.g,
                self.b,
                f32::from(self.a) / 255.0
            )
        }
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rect(")?;
        for (i, edge) in self.edges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{edge}")?;
        }
        write!(f, ")")
    }
}

/// Parses scanner number text; the integer flag records whether the literal
/// was plain digits, so `1e3` is not an integer even though its value is.
pub(crate) fn parse_number(text: &str) -> Option<(f32, bool)> {
    let value: f32 = text.parse().ok()?;
    Some((value, text.bytes().all(|b| b.is_ascii_digit())))
}

/// Splits dimension text into its numeric value and lowercased unit.
pub(crate) fn split_dimension(text: &str) -> Option<(f32, String)> {
    let split = number_literal_end(text);
    let value: f32 = text[..split].parse().ok()?;
    let unit = text[split..].to_ascii_lowercase();
    if unit.is_empty() {
        return None;
    }
    Some((value, unit))
}

/// Byte length of the leading number literal, matching the scanner's number
/// syntax: an `e` belongs to the literal only when digits follow it, so
/// `1e3px` splits after the exponent while `1em` splits before the `e`.
fn number_literal_end(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut end = 0;
    while end < bytes.len() && (bytes[end].is_ascii_digit() || bytes[end] == b'.') {
        end += 1;
    }
    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp = end + 1;
        if exp < bytes.len() && (bytes[exp] == b'+' || bytes[exp] == b'-') {
            exp += 1;
        }
        if exp < bytes.len() && bytes[exp].is_ascii_digit() {
            while exp < bytes.len() && bytes[exp].is_ascii_digit() {
                exp += 1;
            }
            end = exp;
        }
    }
    end
}
