//! Value canonicalization and constraint checks for a single field.

use super::types::{FieldKind, FieldSchema};
use crate::base::FieldValue;

/// Which constraint a value broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationKind {
    /// Not a number (and not an accepted sentinel) on a numeric field.
    Type,
    /// Not one of the enumerated values.
    Enum,
    /// Outside the numeric bounds.
    Range,
}

/// A failed field check, with a description of the constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub kind: ViolationKind,
    pub constraint: String,
}

impl Violation {
    fn new(kind: ViolationKind, constraint: impl Into<String>) -> Self {
        Self {
            kind,
            constraint: constraint.into(),
        }
    }
}

/// `n` as an `i64` when it is whole and representable.
///
/// `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive.
pub(crate) fn exact_integer(n: f64) -> Option<i64> {
    let whole = n.is_finite() && n.fract() == 0.0;
    (whole && n >= i64::MIN as f64 && n < i64::MAX as f64).then_some(n as i64)
}

impl FieldSchema {
    /// Bring a value into the representation its declared type calls for.
    ///
    /// Numeric text becomes a number on numeric fields, whole numbers become
    /// integers on integer fields, and numbers become text on string fields.
    /// Values that do not fit are kept as trimmed text so the validator can
    /// report them.
    pub fn canonicalize(&self, value: FieldValue) -> FieldValue {
        match self.kind {
            FieldKind::Number | FieldKind::NumberOrSentinel => match value {
                FieldValue::Text(s) => match s.trim().parse::<f64>() {
                    Ok(n) if n.is_finite() => FieldValue::Number(n),
                    _ => FieldValue::Text(s.trim().to_string()),
                },
                FieldValue::Integer(i) => FieldValue::Number(i as f64),
                number => number,
            },
            FieldKind::Integer => match value {
                FieldValue::Text(s) => {
                    let trimmed = s.trim();
                    if let Ok(i) = trimmed.parse::<i64>() {
                        FieldValue::Integer(i)
                    } else {
                        match trimmed.parse::<f64>() {
                            Ok(n) if n.is_finite() => {
                                exact_integer(n).map_or(FieldValue::Number(n), FieldValue::Integer)
                            }
                            _ => FieldValue::Text(trimmed.to_string()),
                        }
                    }
                }
                FieldValue::Number(n) => {
                    exact_integer(n).map_or(FieldValue::Number(n), FieldValue::Integer)
                }
                other => other,
            },
            FieldKind::String | FieldKind::Enum => match value {
                FieldValue::Text(s) => FieldValue::Text(s.trim().to_string()),
                number => FieldValue::Text(number.to_string()),
            },
        }
    }

    /// Check a value against the declared type, enumeration, and bounds.
    pub fn check(&self, value: &FieldValue) -> Result<(), Violation> {
        match self.kind {
            FieldKind::String => Ok(()),
            FieldKind::Enum => {
                let text = value.to_string();
                if self.enum_contains(&text) {
                    Ok(())
                } else {
                    Err(Violation::new(
                        ViolationKind::Enum,
                        format!("must be one of: {}", self.enum_values.join(", ")),
                    ))
                }
            }
            FieldKind::Number => match value.as_f64() {
                Some(n) => self.check_bounds(n),
                None => Err(Violation::new(ViolationKind::Type, "must be a number")),
            },
            FieldKind::Integer => match value {
                FieldValue::Integer(i) => self.check_bounds(*i as f64),
                _ => Err(Violation::new(ViolationKind::Type, "must be an integer")),
            },
            FieldKind::NumberOrSentinel => match value {
                FieldValue::Text(s) if self.is_sentinel(s) => Ok(()),
                FieldValue::Text(_) => Err(Violation::new(
                    ViolationKind::Type,
                    format!("must be a number or one of: {}", self.sentinels.join(", ")),
                )),
                number => match number.as_f64() {
                    Some(n) => self.check_bounds(n),
                    None => Ok(()),
                },
            },
        }
    }

    fn check_bounds(&self, n: f64) -> Result<(), Violation> {
        if let Some(min) = self.minimum {
            if !min.admits_above(n) {
                let op = if min.exclusive { ">" } else { ">=" };
                return Err(Violation::new(
                    ViolationKind::Range,
                    format!("must be {op} {}", min.value),
                ));
            }
        }
        if let Some(max) = self.maximum {
            if !max.admits_below(n) {
                let op = if max.exclusive { "<" } else { "<=" };
                return Err(Violation::new(
                    ViolationKind::Range,
                    format!("must be {op} {}", max.value),
                ));
            }
        }
        Ok(())
    }
}
