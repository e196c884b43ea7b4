//! Supertype and configured schema consistency
//!
//! A type hierarchy must mirror the hierarchy of the schemas it configures:
//! a type configuring a subschema needs a supertype, and that supertype has
//! to configure the same schema or one of its ancestors.

use crate::message::{codes, ValidationMessage};
use pconf_graph::is_same_or_subschema;
use pconf_model::{ProductType, Schema, TypeRepository};

/// Check `this_type` against its resolved supertype and configured schemas
///
/// Pure; the schema ancestry is looked up in `repo`. Returns at most one
/// message.
pub fn validate_supertype_consistency<R>(
    repo: &R,
    this_type: &ProductType,
    super_type: Option<&ProductType>,
    schema_of_this: Option<&Schema>,
    schema_of_super: Option<&Schema>,
) -> Option<ValidationMessage>
where
    R: TypeRepository + ?Sized,
{
    let Some(super_type) = super_type else {
        let schema = schema_of_this?;
        let superschema = schema.superschema()?;
        return Some(
            ValidationMessage::error(
                codes::SUPERTYPE_MISSING,
                format!(
                    "type configures '{}' which extends '{superschema}', so it needs a supertype",
                    schema.name()
                ),
            )
            .with_object(this_type.name().clone()),
        );
    };

    let schema_of_super = schema_of_super?;
    let consistent = schema_of_this
        .is_some_and(|schema| is_same_or_subschema(repo, schema, schema_of_super.name()));
    if consistent {
        return None;
    }

    let text = match schema_of_this {
        Some(schema) => format!(
            "supertype '{}' configures '{}', which is neither '{}' nor one of its superschemas",
            super_type.name(),
            schema_of_super.name(),
            schema.name()
        ),
        None => format!(
            "supertype '{}' configures '{}' but the type configures no schema",
            super_type.name(),
            schema_of_super.name()
        ),
    };
    Some(
        ValidationMessage::error(codes::SUPERTYPE_SCHEMA_MISMATCH, text)
            .with_object(this_type.name().clone()),
    )
}
