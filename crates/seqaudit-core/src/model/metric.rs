//! Quality metric measurement values.

use serde::{Deserialize, Serialize};

/// A single named measurement inside a quality metric record.
///
/// Pipelines report counts as integers, ratios as floats and occasionally
/// emit textual tokens such as `"Infinity"` for unbounded ratios.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl MetricValue {
    /// Numeric view of the value. `"Infinity"` maps to positive infinity and
    /// numeric text is parsed.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            Self::Text(t) => match t.trim() {
                "Infinity" | "infinity" | "inf" => Some(f64::INFINITY),
                other => other.parse::<f64>().ok(),
            },
            Self::Other(_) => None,
        }
    }

    /// Non-negative integral view, used for read counts.
    pub fn as_count(&self) -> Option<u64> {
        match self {
            Self::Integer(v) => u64::try_from(*v).ok(),
            Self::Float(v) if v.is_finite() && *v >= 0.0 => Some(*v as u64),
            Self::Text(t) => t.trim().parse::<u64>().ok(),
            _ => None,
        }
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infinity_token_is_positive_infinity() {
        assert_eq!(MetricValue::from("Infinity").as_f64(), Some(f64::INFINITY));
    }

    #[test]
    fn count_rejects_negative_values() {
        assert_eq!(MetricValue::Integer(-3).as_count(), None);
        assert_eq!(MetricValue::Integer(40_000_000).as_count(), Some(40_000_000));
    }

    #[test]
    fn decodes_mixed_json_values() {
        let values: Vec<MetricValue> = serde_json::from_str(r#"[1, 0.5, "Infinity"]"#).unwrap();
        assert_eq!(values[0], MetricValue::Integer(1));
        assert_eq!(values[1], MetricValue::Float(0.5));
        assert_eq!(values[2].as_f64(), Some(f64::INFINITY));
    }
}
