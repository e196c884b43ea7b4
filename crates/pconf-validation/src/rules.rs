//! Type, configuration and whole-model validation

use crate::consistency::validate_supertype_consistency;
use crate::message::{codes, MessageList, ValidationMessage};
use pconf_graph::{
    find_hierarchy_cycles, is_same_or_subtype, type_walker, AssociationCycleDetector,
    FlattenedType, Termination,
};
use pconf_model::{
    ConfigurationRepository, ProductConfiguration, ProductModel, ProductType, QualifiedName,
    TypeRepository,
};

/// Validate one product type
///
/// Covers unresolved references, supertype consistency and whether the
/// supertype chain runs into a cycle.
pub fn validate_type<R>(repo: &R, ty: &ProductType) -> MessageList
where
    R: TypeRepository + ?Sized,
{
    let mut messages = check_type(repo, ty);

    let (_, summary) = type_walker(repo).collect(ty);
    if let Termination::Cycle(revisited) = summary.termination {
        messages.push(
            ValidationMessage::error(
                codes::SUPERTYPE_CYCLE,
                format!("supertype chain runs into a cycle at '{revisited}'"),
            )
            .with_object(ty.name().clone()),
        );
    }
    messages
}

/// Reference and consistency checks, without cycle search
fn check_type<R>(repo: &R, ty: &ProductType) -> MessageList
where
    R: TypeRepository + ?Sized,
{
    let mut messages = MessageList::new();

    let super_type = match ty.supertype() {
        Some(name) => {
            let resolved = repo.find_type(name);
            if resolved.is_none() {
                messages.push(
                    ValidationMessage::error(
                        codes::SUPERTYPE_NOT_FOUND,
                        format!("supertype '{name}' does not exist"),
                    )
                    .with_object(ty.name().clone()),
                );
            }
            resolved
        }
        None => None,
    };

    let schema = match ty.configured_schema() {
        Some(name) => {
            let resolved = repo.find_schema(name);
            if resolved.is_none() {
                messages.push(
                    ValidationMessage::error(
                        codes::SCHEMA_NOT_FOUND,
                        format!("configured schema '{name}' does not exist"),
                    )
                    .with_object(ty.name().clone()),
                );
            }
            resolved
        }
        None => None,
    };

    // an unresolved reference already explains any inconsistency
    let references_resolved = ty.supertype().is_some() == super_type.is_some()
        && ty.configured_schema().is_some() == schema.is_some();
    if references_resolved {
        let super_schema = super_type.and_then(|s| repo.resolve_configured_schema(s));
        messages.push_opt(validate_supertype_consistency(
            repo,
            ty,
            super_type,
            schema,
            super_schema,
        ));
    }

    for association in ty.association_definitions() {
        if repo.find_type(&association.target).is_none() {
            messages.push(
                ValidationMessage::warning(
                    codes::ASSOCIATION_TARGET_NOT_FOUND,
                    format!("association target type '{}' does not exist", association.target),
                )
                .with_object(ty.name().clone())
                .with_property(association.role.clone()),
            );
        }
    }

    messages
}

/// Validate one configuration against its type and the configurations it
/// links to
pub fn validate_configuration<M>(model: &M, configuration: &ProductConfiguration) -> MessageList
where
    M: TypeRepository + ConfigurationRepository + ?Sized,
{
    let mut messages = MessageList::new();
    let id = configuration.id();

    let Some(ty) = model.find_type(configuration.product_type()) else {
        messages.push(
            ValidationMessage::error(
                codes::TYPE_NOT_FOUND,
                format!("product type '{}' does not exist", configuration.product_type()),
            )
            .with_object(id.clone()),
        );
        return messages;
    };

    if ty.is_abstract() {
        messages.push(
            ValidationMessage::error(
                codes::ABSTRACT_TYPE_CONFIGURED,
                format!("product type '{}' is abstract", ty.name()),
            )
            .with_object(id.clone()),
        );
    }

    let flattened = FlattenedType::collect(model, ty);

    for link in configuration.links() {
        let Some(association) = flattened.association(&link.role) else {
            // orphan links are delta entries, not validation findings
            continue;
        };
        let Some(target) = model.find_configuration(&link.target) else {
            messages.push(
                ValidationMessage::error(
                    codes::LINK_TARGET_NOT_FOUND,
                    format!("link target '{}' does not exist", link.target),
                )
                .with_object(id.clone())
                .with_property(link.role.clone()),
            );
            continue;
        };
        let conforms = model
            .find_type(target.product_type())
            .is_some_and(|target_type| is_same_or_subtype(model, target_type, &association.target));
        if !conforms {
            messages.push(
                ValidationMessage::error(
                    codes::LINK_TARGET_TYPE_MISMATCH,
                    format!(
                        "link target '{}' is a '{}', association requires '{}'",
                        link.target,
                        target.product_type(),
                        association.target
                    ),
                )
                .with_object(id.clone())
                .with_property(link.role.clone()),
            );
        }
    }

    for association in flattened.associations() {
        let count = configuration.links_for_role(&association.role).count();
        if !association.cardinality.admits(count) {
            messages.push(
                ValidationMessage::warning(
                    codes::CARDINALITY_VIOLATION,
                    format!(
                        "{count} link(s) for '{}', cardinality is {}",
                        association.role, association.cardinality
                    ),
                )
                .with_object(id.clone())
                .with_property(association.role.clone()),
            );
        }
    }

    if let Some(cycle) = AssociationCycleDetector::new(model).find_cycle_through(configuration) {
        messages.push(
            ValidationMessage::error(codes::LINK_CYCLE, format!("link cycle {cycle}"))
                .with_object(id.clone()),
        );
    }

    messages
}

/// Validate every schema, type and configuration of `model`
///
/// Hierarchy cycles are reported once per cycle rather than once per member.
pub fn validate_model(model: &ProductModel) -> MessageList {
    let mut messages = MessageList::new();

    for cycle in find_hierarchy_cycles(model.schemas()) {
        messages.push(cycle_message(codes::SCHEMA_CYCLE, "superschema", &cycle));
    }
    for cycle in find_hierarchy_cycles(model.types()) {
        messages.push(cycle_message(codes::SUPERTYPE_CYCLE, "supertype", &cycle));
    }
    for ty in model.types() {
        messages.append(check_type(model, ty));
    }
    for configuration in model.configurations() {
        messages.append(validate_configuration(model, configuration));
    }

    tracing::debug!(
        types = model.types().count(),
        configurations = model.configuration_count(),
        messages = messages.len(),
        "model validated"
    );
    messages
}

fn cycle_message(code: &'static str, relation: &str, cycle: &[QualifiedName]) -> ValidationMessage {
    let mut path: Vec<String> = cycle.iter().map(ToString::to_string).collect();
    if let Some(first) = path.first().cloned() {
        path.push(first);
    }
    let mut message = ValidationMessage::error(
        code,
        format!("{relation} cycle {}", path.join(" -> ")),
    );
    if let Some(first) = cycle.first() {
        message = message.with_object(first.clone());
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use pconf_model::{AssociationDefinition, Cardinality};
    use pconf_test_utils::{qn, schemas, supertype_chain, ConfigurationBuilder, TypeBuilder};
    use pretty_assertions::assert_eq;

    fn codes_of(messages: &MessageList) -> Vec<&'static str> {
        messages.iter().map(|m| m.code).collect()
    }

    #[test]
    fn unresolved_references() {
        let mut model = ProductModel::new();
        model
            .insert_type(
                TypeBuilder::new("Policy")
                    .supertype("Missing")
                    .configuring("NoSchema")
                    .association("coverage", "Ghost")
                    .build(),
            )
            .unwrap();
        let ty = model.find_type(&qn("Policy")).unwrap();

        let messages = validate_type(&model, ty);
        assert_eq!(
            codes_of(&messages),
            vec![
                codes::SUPERTYPE_NOT_FOUND,
                codes::SCHEMA_NOT_FOUND,
                codes::ASSOCIATION_TARGET_NOT_FOUND
            ]
        );
    }

    #[test]
    fn type_in_cycle() {
        let model = supertype_chain(&["A", "B"], true);
        let ty = model.find_type(&qn("A")).unwrap();
        let messages = validate_type(&model, ty);
        assert_eq!(codes_of(&messages), vec![codes::SUPERTYPE_CYCLE]);
    }

    #[test]
    fn model_reports_each_cycle_once() {
        let model = supertype_chain(&["A", "B", "C"], true);
        let messages = validate_model(&model);
        let cycles: Vec<_> = messages.with_code(codes::SUPERTYPE_CYCLE).collect();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].text, "supertype cycle A -> B -> C -> A");
    }

    #[test]
    fn inconsistent_schema_hierarchy() {
        let mut model = ProductModel::new();
        for schema in schemas() {
            model.insert_schema(schema).unwrap();
        }
        model
            .insert_type(TypeBuilder::new("Other").configuring("Unrelated").build())
            .unwrap();
        model
            .insert_type(
                TypeBuilder::new("Motor")
                    .supertype("Other")
                    .configuring("MotorPolicyCmpt")
                    .build(),
            )
            .unwrap();

        let messages = validate_model(&model);
        assert_eq!(codes_of(&messages), vec![codes::SUPERTYPE_SCHEMA_MISMATCH]);
        assert_eq!(messages.messages()[0].object, Some(qn("Motor")));
    }

    fn coverage_model() -> ProductModel {
        let mut model = ProductModel::new();
        model.insert_type(TypeBuilder::new("Coverage").build()).unwrap();
        model
            .insert_type(TypeBuilder::new("FireCoverage").supertype("Coverage").build())
            .unwrap();
        model.insert_type(TypeBuilder::new("Rider").build()).unwrap();
        model
            .insert_type(
                TypeBuilder::new("Policy")
                    .association_def(
                        AssociationDefinition::new("coverage", qn("Coverage"))
                            .with_cardinality(Cardinality::new(1, Some(2))),
                    )
                    .build(),
            )
            .unwrap();
        model
            .insert_type(TypeBuilder::new("Template").abstract_type().build())
            .unwrap();
        for (id, ty) in [("Fire1", "FireCoverage"), ("Rider1", "Rider")] {
            model
                .insert_configuration(ConfigurationBuilder::new(id, ty).build())
                .unwrap();
        }
        model
    }

    #[test]
    fn link_targets_checked() {
        let model = coverage_model();
        let ok = ConfigurationBuilder::new("P1", "Policy")
            .link("coverage", "Fire1")
            .build();
        assert!(validate_configuration(&model, &ok).is_empty());

        let bad = ConfigurationBuilder::new("P2", "Policy")
            .link("coverage", "Rider1")
            .link("coverage", "Nowhere")
            .link("coverage", "Fire1")
            .build();
        assert_eq!(
            codes_of(&validate_configuration(&model, &bad)),
            vec![
                codes::LINK_TARGET_TYPE_MISMATCH,
                codes::LINK_TARGET_NOT_FOUND,
                codes::CARDINALITY_VIOLATION
            ]
        );
    }

    #[test]
    fn missing_mandatory_link_is_warning() {
        let model = coverage_model();
        let config = ConfigurationBuilder::new("P", "Policy").build();
        let messages = validate_configuration(&model, &config);
        assert_eq!(codes_of(&messages), vec![codes::CARDINALITY_VIOLATION]);
        assert!(!messages.contains_errors());
    }

    #[test]
    fn unknown_and_abstract_types() {
        let model = coverage_model();
        let unknown = ConfigurationBuilder::new("X", "Nope").build();
        assert_eq!(
            codes_of(&validate_configuration(&model, &unknown)),
            vec![codes::TYPE_NOT_FOUND]
        );
        let template = ConfigurationBuilder::new("T", "Template").build();
        assert_eq!(
            codes_of(&validate_configuration(&model, &template)),
            vec![codes::ABSTRACT_TYPE_CONFIGURED]
        );
    }
}
