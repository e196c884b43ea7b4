//! Default payloads for values created or reset by a fix

use crate::error::DefaultValueError;
use pconf_model::{Payload, PropertyDefinition, PropertyKind};

/// Source of the payload a freshly created or reset value starts with
///
/// The defaulting policy belongs to the host; the fix protocol only asks.
#[cfg_attr(test, mockall::automock)]
pub trait DefaultValueProvider {
    /// Payload for a new value of `definition`
    ///
    /// # Errors
    /// Returns error if no default can be produced
    fn default_payload(&self, definition: &PropertyDefinition) -> Result<Payload, DefaultValueError>;
}

/// Declared default literal for VALUE properties, empty otherwise
///
/// Literals of numeric datatypes are checked to parse before use.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDefaults;

impl StandardDefaults {
    fn check_literal(definition: &PropertyDefinition, literal: &str) -> Result<(), DefaultValueError> {
        let valid = match definition.datatype.as_str() {
            "Integer" | "Long" => literal.trim().parse::<i64>().is_ok(),
            "Decimal" | "Double" | "Money" => literal.trim().parse::<f64>().is_ok(),
            "Boolean" => matches!(literal, "true" | "false"),
            _ => true,
        };
        if valid {
            Ok(())
        } else {
            Err(DefaultValueError::InvalidDefault {
                property: definition.name.clone(),
                datatype: definition.datatype.clone(),
                literal: literal.to_string(),
            })
        }
    }
}

impl DefaultValueProvider for StandardDefaults {
    fn default_payload(&self, definition: &PropertyDefinition) -> Result<Payload, DefaultValueError> {
        if definition.kind != PropertyKind::Value {
            return Ok(Payload::Empty);
        }
        match &definition.default_value {
            Some(literal) => {
                Self::check_literal(definition, literal)?;
                Ok(Payload::Literal(literal.clone()))
            }
            None => Ok(Payload::Empty),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_uses_declared_literal() {
        let definition = PropertyDefinition::value("premium", "Decimal").with_default("99.90");
        assert_eq!(
            StandardDefaults.default_payload(&definition),
            Ok(Payload::Literal("99.90".into()))
        );
    }

    #[test]
    fn standard_without_default_is_empty() {
        let definition = PropertyDefinition::value("premium", "Decimal");
        assert_eq!(StandardDefaults.default_payload(&definition), Ok(Payload::Empty));

        let formula = PropertyDefinition::new("calc", PropertyKind::Formula, "Decimal")
            .with_default("1 + 1");
        assert_eq!(StandardDefaults.default_payload(&formula), Ok(Payload::Empty));
    }

    #[test]
    fn standard_rejects_malformed_numeric_default() {
        let definition = PropertyDefinition::value("count", "Integer").with_default("many");
        let result = StandardDefaults.default_payload(&definition);
        assert!(matches!(result, Err(DefaultValueError::InvalidDefault { .. })));

        let text = PropertyDefinition::value("label", "String").with_default("many");
        assert!(StandardDefaults.default_payload(&text).is_ok());
    }
}
