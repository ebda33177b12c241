use serde::Serialize;
use std::fmt;

/// Represents the value of a decoded OBIS line.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReadingValue {
    Numeric(f64),
    Text(String),
}

impl ReadingValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ReadingValue::Numeric(v) => Some(*v),
            ReadingValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ReadingValue::Numeric(_) => None,
            ReadingValue::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for ReadingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadingValue::Numeric(v) => write!(f, "{v}"),
            ReadingValue::Text(s) => f.write_str(s),
        }
    }
}

/// One decoded telegram field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// OBIS code the value was decoded from.
    pub tag: &'static str,
    pub description: &'static str,
    pub value: ReadingValue,
    /// Unit string, empty for unitless values.
    pub unit: String,
    /// Capture time reported by an M-Bus sub-meter, DST flag stripped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.description, self.value)?;
        if !self.unit.is_empty() {
            write!(f, " {}", self.unit)?;
        }
        if let Some(ts) = &self.timestamp {
            write!(f, " @ {ts}")?;
        }
        Ok(())
    }
}
