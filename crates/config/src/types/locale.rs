//! Locale and charset values of the base settings.
//!
//! Responsibilities:
//! - Parse `default-locale` text (`en`, `en_US`, `zh-CN`, `de_DE_1996`).
//! - Validate and canonicalize `default-charset` labels.
//!
//! Invariants:
//! - Language is lowercase, country uppercase.
//! - A `Charset` always holds a canonical name from `KNOWN_CHARSETS`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// A language with optional country and variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    language: String,
    country: Option<String>,
    variant: Option<String>,
}

impl Locale {
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split(['_', '-']);

        let language = parts.next().unwrap_or_default();
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err("language must be 2 or 3 ascii letters".to_string());
        }

        let country = match parts.next() {
            Some(c) if c.len() == 2 && c.chars().all(|c| c.is_ascii_alphabetic()) => {
                Some(c.to_ascii_uppercase())
            }
            Some(c) if c.len() == 3 && c.chars().all(|c| c.is_ascii_digit()) => Some(c.to_string()),
            Some(_) => return Err("country must be 2 letters or 3 digits".to_string()),
            None => None,
        };

        let rest: Vec<&str> = parts.collect();
        let variant = if rest.is_empty() {
            None
        } else if rest.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_alphanumeric()))
        {
            Some(rest.join("_"))
        } else {
            return Err("variant must be alphanumeric".to_string());
        };

        Ok(Locale {
            language: language.to_ascii_lowercase(),
            country,
            variant,
        })
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)?;
        if let Some(country) = &self.country {
            write!(f, "_{country}")?;
        }
        if let Some(variant) = &self.variant {
            write!(f, "_{variant}")?;
        }
        Ok(())
    }
}

impl Serialize for Locale {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Canonical charset names and their accepted aliases.
const KNOWN_CHARSETS: &[(&str, &[&str])] = &[
    ("UTF-8", &["utf8"]),
    ("UTF-16", &["utf16"]),
    ("UTF-16BE", &["utf16be"]),
    ("UTF-16LE", &["utf16le"]),
    ("US-ASCII", &["ascii", "us_ascii", "iso646-us"]),
    ("ISO-8859-1", &["latin1", "iso8859_1", "iso_8859_1", "l1"]),
    ("ISO-8859-2", &["latin2", "iso8859_2", "iso_8859_2", "l2"]),
    ("ISO-8859-5", &["cyrillic", "iso8859_5", "iso_8859_5"]),
    ("ISO-8859-15", &["latin9", "iso8859_15"]),
    ("WINDOWS-1250", &["cp1250"]),
    ("WINDOWS-1251", &["cp1251"]),
    ("WINDOWS-1252", &["cp1252"]),
    ("KOI8-R", &["koi8_r", "koi8"]),
    ("GBK", &["cp936"]),
    ("GB2312", &["euc-cn"]),
    ("GB18030", &[]),
    ("BIG5", &["big-5"]),
    ("SHIFT_JIS", &["sjis", "shift-jis"]),
    ("EUC-JP", &["eucjp"]),
    ("EUC-KR", &["euckr"]),
    ("UTF-32", &["utf32"]),
];

/// A supported character set.
///
/// `default-charset` accepts these canonical names, matched case-insensitively,
/// together with their common aliases (`utf8`, `latin1`, `cp1252`, `sjis`, ...):
///
/// | Family        | Canonical names                                                |
/// |---------------|----------------------------------------------------------------|
/// | Unicode       | `UTF-8`, `UTF-16`, `UTF-16BE`, `UTF-16LE`, `UTF-32`              |
/// | ASCII / Latin | `US-ASCII`, `ISO-8859-1`, `ISO-8859-2`, `ISO-8859-15`            |
/// | Cyrillic      | `ISO-8859-5`, `WINDOWS-1251`, `KOI8-R`                           |
/// | Windows       | `WINDOWS-1250`, `WINDOWS-1252`                                 |
/// | Chinese       | `GBK`, `GB2312`, `GB18030`, `BIG5`                               |
/// | Japanese      | `SHIFT_JIS`, `EUC-JP`                                           |
/// | Korean        | `EUC-KR`                                                       |
///
/// Any other label is rejected with an `InvalidValue` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Charset(&'static str);

impl Charset {
    pub const UTF_8: Charset = Charset("UTF-8");

    /// Canonical name, e.g. `UTF-8`.
    pub fn name(&self) -> &'static str {
        self.0
    }

    /// Canonical names of every accepted charset.
    pub fn supported() -> impl Iterator<Item = &'static str> {
        KNOWN_CHARSETS.iter().map(|(name, _)| *name)
    }
}

impl FromStr for Charset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        KNOWN_CHARSETS
            .iter()
            .find(|(name, aliases)| {
                name.eq_ignore_ascii_case(label) || aliases.iter().any(|a| a.eq_ignore_ascii_case(label))
            })
            .map(|(name, _)| Charset(name))
            .ok_or_else(|| {
                let supported: Vec<_> = Charset::supported().collect();
                format!("unsupported charset, expected one of {}", supported.join(", "))
            })
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl Serialize for Charset {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

/// Parse a config boolean: `true/false`, `yes/no`, `on/off`, `1/0`, any case.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}
