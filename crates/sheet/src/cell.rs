use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A raw cell value as read from a worksheet, before any column coercion.
///
/// Excel date cells arrive as [`CellValue::Float`] serials; see
/// [`crate::datetime`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

impl CellValue {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Null, or text with nothing but whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::String(s) => s.trim().is_empty(),
            CellValue::Bool(_) | CellValue::Int(_) | CellValue::Float(_) => false,
        }
    }

    /// Numeric cells only; text is not parsed here.
    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            CellValue::Float(f) => Some(*f),
            CellValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The cell as display text. Borrows string cells.
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        match self {
            CellValue::String(s) => Cow::Borrowed(s),
            other => Cow::Owned(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_detection() {
        assert!(CellValue::Null.is_blank());
        assert!(CellValue::from("   ").is_blank());
        assert!(!CellValue::from("Cash").is_blank());
        assert!(!CellValue::Int(0).is_blank());
    }

    #[test]
    fn test_as_float_is_numeric_only() {
        assert_eq!(CellValue::Int(42).as_float(), Some(42.0));
        assert_eq!(CellValue::Float(3.75).as_float(), Some(3.75));
        assert_eq!(CellValue::from("42").as_float(), None);
        assert_eq!(CellValue::Bool(true).as_float(), None);
    }

    #[test]
    fn test_text() {
        assert!(matches!(CellValue::from("Yangon").text(), Cow::Borrowed("Yangon")));
        assert_eq!(CellValue::Int(7).text(), "7");
        assert_eq!(CellValue::Float(548.9715).text(), "548.9715");
        assert_eq!(CellValue::Null.text(), "");
    }
}
