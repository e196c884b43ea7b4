//! Property definitions, property values and value sets
//!
//! A [`PropertyDefinition`] lives on a product type; a [`PropertyValue`] lives
//! on a product configuration. The two are paired by property name.

use crate::name::QualifiedName;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Kind of a configurable property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyKind {
    /// Plain attribute value
    Value,
    /// Formula evaluated at runtime
    Formula,
    /// Usage of a lookup table
    TableUsage,
    /// Configured element of the schema side
    Config,
}

impl PropertyKind {
    /// All kinds in declaration order
    pub const ALL: [Self; 4] = [Self::Value, Self::Formula, Self::TableUsage, Self::Config];

    /// Stable tag used in descriptions and reports
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Value => "VALUE",
            Self::Formula => "FORMULA",
            Self::TableUsage => "TABLE_USAGE",
            Self::Config => "CONFIG",
        }
    }
}

impl Display for PropertyKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored payload of a property value
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum Payload {
    /// No value set (null)
    #[default]
    Empty,
    /// Literal value in the datatype's string form
    Literal(String),
    /// Formula expression
    Expression(String),
    /// Reference to a table content
    TableRef(QualifiedName),
}

impl Payload {
    /// Check if nothing is stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// Shape of a value set, the unit of value-set compatibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSetShape {
    /// Any value of the datatype
    Unrestricted,
    /// Explicit list of values
    Enum,
    /// Numeric interval
    Range,
}

impl Display for ValueSetShape {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrestricted => f.write_str("unrestricted"),
            Self::Enum => f.write_str("enum"),
            Self::Range => f.write_str("range"),
        }
    }
}

/// Set of allowed values
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ValueSet {
    /// Any value of the datatype
    #[default]
    Unrestricted,

    /// Explicit list of allowed values
    Enum {
        /// Allowed values in their string form
        values: Vec<String>,
    },

    /// Interval of allowed values; a missing bound is open
    Range {
        /// Lower bound (inclusive)
        #[serde(default)]
        lower: Option<String>,
        /// Upper bound (inclusive)
        #[serde(default)]
        upper: Option<String>,
        /// Step width
        #[serde(default)]
        step: Option<String>,
    },
}

impl ValueSet {
    /// Enum value set from string-like values
    #[must_use]
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Closed range without step
    #[must_use]
    pub fn range(lower: impl Into<String>, upper: impl Into<String>) -> Self {
        Self::Range {
            lower: Some(lower.into()),
            upper: Some(upper.into()),
            step: None,
        }
    }

    /// Shape of this value set
    #[inline]
    #[must_use]
    pub fn shape(&self) -> ValueSetShape {
        match self {
            Self::Unrestricted => ValueSetShape::Unrestricted,
            Self::Enum { .. } => ValueSetShape::Enum,
            Self::Range { .. } => ValueSetShape::Range,
        }
    }

    /// Check if this (stored) value set may stand under `declared`
    ///
    /// An unrestricted declaration admits every shape; otherwise the shapes
    /// must agree.
    #[inline]
    #[must_use]
    pub fn is_compatible_with(&self, declared: &ValueSet) -> bool {
        matches!(declared, Self::Unrestricted) || self.shape() == declared.shape()
    }

    /// Nearest value set compatible with `declared`, if any can be salvaged
    ///
    /// - unrestricted narrows to a copy of the declared set
    /// - a range under a declared enum keeps the declared values inside it
    /// - an enum under a declared range widens to the numeric min..max span,
    ///   clipped to the declared bounds
    ///
    /// Returns `None` when nothing survives, or when bounds and values are not
    /// numeric where a numeric comparison is needed.
    #[must_use]
    pub fn fit_to(&self, declared: &ValueSet) -> Option<ValueSet> {
        if self.is_compatible_with(declared) {
            return Some(self.clone());
        }

        match (self, declared) {
            (Self::Unrestricted, _) => Some(declared.clone()),
            (Self::Range { lower, upper, .. }, Self::Enum { values }) => {
                let lower = parse_bound(lower.as_deref())?;
                let upper = parse_bound(upper.as_deref())?;
                let kept: Vec<String> = values
                    .iter()
                    .filter(|value| {
                        value.parse::<f64>().is_ok_and(|v| {
                            lower.map_or(true, |l| v >= l) && upper.map_or(true, |u| v <= u)
                        })
                    })
                    .cloned()
                    .collect();
                if kept.is_empty() {
                    None
                } else {
                    Some(Self::Enum { values: kept })
                }
            }
            (
                Self::Enum { values },
                Self::Range {
                    lower: declared_lower,
                    upper: declared_upper,
                    ..
                },
            ) => {
                let mut numeric = Vec::with_capacity(values.len());
                for value in values {
                    numeric.push((value.parse::<f64>().ok()?, value.as_str()));
                }
                let min = *numeric.iter().min_by(|a, b| a.0.total_cmp(&b.0))?;
                let max = *numeric.iter().max_by(|a, b| a.0.total_cmp(&b.0))?;

                let lower = match (parse_bound(declared_lower.as_deref())?, declared_lower) {
                    (Some(bound), Some(text)) if bound > min.0 => (bound, text.as_str()),
                    _ => min,
                };
                let upper = match (parse_bound(declared_upper.as_deref())?, declared_upper) {
                    (Some(bound), Some(text)) if bound < max.0 => (bound, text.as_str()),
                    _ => max,
                };
                if lower.0 > upper.0 {
                    return None;
                }
                Some(Self::Range {
                    lower: Some(lower.1.to_string()),
                    upper: Some(upper.1.to_string()),
                    step: None,
                })
            }
            _ => None,
        }
    }
}

/// `Some(None)` for an open bound, `None` for a bound that is not numeric
fn parse_bound(bound: Option<&str>) -> Option<Option<f64>> {
    match bound {
        None => Some(None),
        Some(text) => text.parse::<f64>().ok().map(Some),
    }
}

impl Display for ValueSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrestricted => f.write_str("unrestricted"),
            Self::Enum { values } => write!(f, "{{{}}}", values.join(", ")),
            Self::Range { lower, upper, step } => {
                write!(
                    f,
                    "[{} .. {}]",
                    lower.as_deref().unwrap_or("*"),
                    upper.as_deref().unwrap_or("*")
                )?;
                if let Some(step) = step {
                    write!(f, " step {step}")?;
                }
                Ok(())
            }
        }
    }
}

/// Property declared by a product type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// Stable property name, unique within one type node
    pub name: String,
    /// Kind tag
    pub kind: PropertyKind,
    /// Datatype name (`Decimal`, `Integer`, `String`, ...)
    pub datatype: String,
    /// Allowed values; only meaningful for [`PropertyKind::Value`]
    #[serde(default)]
    pub value_set: ValueSet,
    /// Default literal used when a value is created for this definition
    #[serde(default)]
    pub default_value: Option<String>,
}

impl PropertyDefinition {
    /// Create definition with unrestricted value set and no default
    #[must_use]
    pub fn new(name: impl Into<String>, kind: PropertyKind, datatype: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            datatype: datatype.into(),
            value_set: ValueSet::Unrestricted,
            default_value: None,
        }
    }

    /// Shorthand for a [`PropertyKind::Value`] definition
    #[must_use]
    pub fn value(name: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::new(name, PropertyKind::Value, datatype)
    }

    /// With declared value set
    #[must_use]
    pub fn with_value_set(mut self, value_set: ValueSet) -> Self {
        self.value_set = value_set;
        self
    }

    /// With default literal
    #[must_use]
    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Value set a value created for this definition starts with
    #[must_use]
    pub fn initial_value_set(&self) -> ValueSet {
        if self.kind == PropertyKind::Value {
            self.value_set.clone()
        } else {
            ValueSet::Unrestricted
        }
    }

    /// Check kind and datatype agree with `value`
    #[inline]
    #[must_use]
    pub fn agrees_with(&self, value: &PropertyValue) -> bool {
        self.kind == value.kind && self.datatype == value.datatype
    }
}

/// Value stored by a product configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyValue {
    /// Name of the property this value belongs to
    pub name: String,
    /// Kind tag mirroring the definition kinds
    pub kind: PropertyKind,
    /// Datatype the payload was stored with
    pub datatype: String,
    /// Stored payload
    #[serde(default)]
    pub payload: Payload,
    /// Value set narrowed by this configuration
    #[serde(default)]
    pub value_set: ValueSet,
}

impl PropertyValue {
    /// Create value with unrestricted value set
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        kind: PropertyKind,
        datatype: impl Into<String>,
        payload: Payload,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            datatype: datatype.into(),
            payload,
            value_set: ValueSet::Unrestricted,
        }
    }

    /// Value matching `definition` exactly, holding `payload`
    #[must_use]
    pub fn for_definition(definition: &PropertyDefinition, payload: Payload) -> Self {
        Self {
            name: definition.name.clone(),
            kind: definition.kind,
            datatype: definition.datatype.clone(),
            payload,
            value_set: definition.initial_value_set(),
        }
    }

    /// With value set
    #[must_use]
    pub fn with_value_set(mut self, value_set: ValueSet) -> Self {
        self.value_set = value_set;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_serde_tags() {
        let json = serde_json::to_string(&PropertyKind::TableUsage).unwrap();
        assert_eq!(json, "\"TABLE_USAGE\"");
        assert_eq!(PropertyKind::Formula.to_string(), "FORMULA");
    }

    #[test]
    fn value_set_compatibility() {
        let declared_enum = ValueSet::enumeration(["A", "B"]);
        let declared_range = ValueSet::range("0", "10");

        assert!(ValueSet::enumeration(["A"]).is_compatible_with(&declared_enum));
        assert!(ValueSet::range("1", "2").is_compatible_with(&declared_range));
        assert!(declared_enum.is_compatible_with(&ValueSet::Unrestricted));
        assert!(!ValueSet::Unrestricted.is_compatible_with(&declared_enum));
        assert!(!declared_range.is_compatible_with(&declared_enum));
    }

    #[test]
    fn fit_unrestricted_narrows_to_declared() {
        let declared = ValueSet::enumeration(["A", "B"]);
        assert_eq!(ValueSet::Unrestricted.fit_to(&declared), Some(declared));
    }

    #[test]
    fn fit_range_keeps_enum_values_inside() {
        let declared = ValueSet::enumeration(["1", "5", "20", "x"]);
        let stored = ValueSet::range("0", "10");
        assert_eq!(
            stored.fit_to(&declared),
            Some(ValueSet::enumeration(["1", "5"]))
        );
    }

    #[test]
    fn fit_range_outside_enum_is_lost() {
        let declared = ValueSet::enumeration(["100"]);
        assert_eq!(ValueSet::range("0", "10").fit_to(&declared), None);
    }

    #[test]
    fn fit_enum_widens_to_span() {
        let declared = ValueSet::range("0", "100");
        let stored = ValueSet::enumeration(["7", "3.5", "12"]);
        assert_eq!(stored.fit_to(&declared), Some(ValueSet::range("3.5", "12")));
    }

    #[test]
    fn fit_enum_span_is_clipped_to_declared_bounds() {
        let declared = ValueSet::range("0", "100");
        assert_eq!(
            ValueSet::enumeration(["50", "300"]).fit_to(&declared),
            Some(ValueSet::range("50", "100"))
        );
        assert_eq!(
            ValueSet::enumeration(["-5", "20"]).fit_to(&ValueSet::Range {
                lower: Some("0".into()),
                upper: None,
                step: None
            }),
            Some(ValueSet::range("0", "20"))
        );
    }

    #[test]
    fn fit_enum_outside_declared_range_is_lost() {
        let declared = ValueSet::range("0", "100");
        assert_eq!(ValueSet::enumeration(["200", "300"]).fit_to(&declared), None);
    }

    #[test]
    fn fit_non_numeric_enum_is_lost() {
        let declared = ValueSet::range("0", "100");
        assert_eq!(ValueSet::enumeration(["low", "high"]).fit_to(&declared), None);
        assert_eq!(ValueSet::enumeration(Vec::<String>::new()).fit_to(&declared), None);
    }

    #[test]
    fn value_for_definition_copies_declared_set() {
        let definition = PropertyDefinition::value("riskClass", "Enum")
            .with_value_set(ValueSet::enumeration(["A", "B"]));
        let value = PropertyValue::for_definition(&definition, Payload::Empty);
        assert!(definition.agrees_with(&value));
        assert_eq!(value.value_set, definition.value_set);

        let formula = PropertyDefinition::new("calc", PropertyKind::Formula, "Decimal")
            .with_value_set(ValueSet::range("0", "1"));
        let value = PropertyValue::for_definition(&formula, Payload::Empty);
        assert_eq!(value.value_set, ValueSet::Unrestricted);
    }

    #[test]
    fn value_set_display() {
        assert_eq!(ValueSet::enumeration(["A", "B"]).to_string(), "{A, B}");
        assert_eq!(ValueSet::range("0", "9").to_string(), "[0 .. 9]");
    }
}
