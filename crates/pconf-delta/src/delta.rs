//! The computed set of mismatches of one configuration

use crate::config::FixContext;
use crate::entry::{DeltaEntry, DeltaKind};
use crate::error::FixApplicationError;
use pconf_model::{ProductConfiguration, QualifiedName};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

/// Mismatches between a configuration and its product type
///
/// Entries are grouped by [`DeltaKind`] in declaration order. A delta is a
/// snapshot: it is never updated when the model changes, recompute instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Delta {
    configuration: QualifiedName,
    product_type: QualifiedName,
    entries: Vec<DeltaEntry>,
}

impl Delta {
    pub(crate) fn new(
        configuration: QualifiedName,
        product_type: QualifiedName,
        entries: Vec<DeltaEntry>,
    ) -> Self {
        Self {
            configuration,
            product_type,
            entries,
        }
    }

    /// Id of the diffed configuration
    #[inline]
    #[must_use]
    pub fn configuration(&self) -> &QualifiedName {
        &self.configuration
    }

    /// Product type it was diffed against
    #[inline]
    #[must_use]
    pub fn product_type(&self) -> &QualifiedName {
        &self.product_type
    }

    /// All entries in delta order
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[DeltaEntry] {
        &self.entries
    }

    /// Entries of one kind, in delta order
    pub fn entries_of(&self, kind: DeltaKind) -> impl Iterator<Item = &DeltaEntry> {
        self.entries.iter().filter(move |e| e.kind() == kind)
    }

    /// Check if configuration and type agree
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entry counts per kind
    #[must_use]
    pub fn summary(&self) -> DeltaSummary {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            *counts.entry(entry.kind()).or_insert(0) += 1;
        }
        DeltaSummary { counts }
    }

    /// Apply every entry's fix once, in order
    ///
    /// Stops at the first failing entry. Entries before it stay applied.
    ///
    /// # Errors
    /// Returns error if `configuration` is not the diffed one, or an entry
    /// fails
    pub fn fix(
        &self,
        configuration: &mut ProductConfiguration,
        context: &FixContext<'_>,
    ) -> Result<(), FixApplicationError> {
        if configuration.id() != &self.configuration {
            return Err(FixApplicationError::ConfigurationMismatch {
                expected: self.configuration.clone(),
                actual: configuration.id().clone(),
            });
        }

        for (index, entry) in self.entries.iter().enumerate() {
            if let Err(source) = entry.fix(configuration, context) {
                tracing::error!(
                    configuration = %self.configuration,
                    index,
                    entry = %entry,
                    error = %source,
                    "fix aborted, configuration partially fixed"
                );
                return Err(FixApplicationError::EntryFailed {
                    index,
                    entry: Box::new(entry.clone()),
                    applied: index,
                    source,
                });
            }
        }

        if !self.is_empty() {
            tracing::info!(
                configuration = %self.configuration,
                entries = self.len(),
                "delta applied"
            );
        }
        Ok(())
    }
}

impl Display for Delta {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "{}: up to date with {}", self.configuration, self.product_type);
        }
        writeln!(
            f,
            "{}: {} against {}",
            self.configuration,
            self.summary(),
            self.product_type
        )?;
        for entry in &self.entries {
            writeln!(f, "  {entry}")?;
        }
        Ok(())
    }
}

/// Entry counts per kind; kinds without entries are left out
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeltaSummary {
    counts: BTreeMap<DeltaKind, usize>,
}

impl DeltaSummary {
    /// Entries of `kind`
    #[must_use]
    pub fn count(&self, kind: DeltaKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    /// Total entries
    #[must_use]
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl Display for DeltaSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.counts.is_empty() {
            return f.write_str("no differences");
        }
        let parts: Vec<String> = self
            .counts
            .iter()
            .map(|(kind, count)| format!("{count} {kind}"))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pconf_model::{Link, PropertyDefinition};
    use pconf_test_utils::{qn, ConfigurationBuilder};
    use pretty_assertions::assert_eq;

    fn sample() -> Delta {
        Delta::new(
            qn("Policy2024"),
            qn("Policy"),
            vec![
                DeltaEntry::MissingPropertyValue {
                    definition: PropertyDefinition::value("riskClass", "Enum"),
                },
                DeltaEntry::MissingPropertyValue {
                    definition: PropertyDefinition::value("term", "Integer"),
                },
                DeltaEntry::LinkWithoutAssociation {
                    link: Link::new("coverage", qn("Cov")),
                },
            ],
        )
    }

    #[test]
    fn entries_of_filters_in_order() {
        let delta = sample();
        assert_eq!(delta.entries_of(DeltaKind::MissingPropertyValue).count(), 2);
        assert_eq!(delta.entries_of(DeltaKind::ValueSetMismatch).count(), 0);
        assert_eq!(delta.len(), 3);
    }

    #[test]
    fn summary_counts_kinds() {
        let summary = sample().summary();
        assert_eq!(summary.count(DeltaKind::MissingPropertyValue), 2);
        assert_eq!(summary.count(DeltaKind::LinkWithoutAssociation), 1);
        assert_eq!(summary.total(), 3);
        assert_eq!(
            summary.to_string(),
            "2 missing_property_value, 1 link_without_association"
        );
    }

    #[test]
    fn display_lists_entries() {
        let text = sample().to_string();
        assert!(text.starts_with("Policy2024: 2 missing_property_value"));
        assert_eq!(text.lines().count(), 4);
        assert!(text.contains("[link_without_association]"));
    }

    #[test]
    fn fix_rejects_other_configuration() {
        let mut other = ConfigurationBuilder::new("Policy2025", "Policy").build();
        let result = sample().fix(&mut other, &FixContext::standard());
        assert!(matches!(
            result,
            Err(FixApplicationError::ConfigurationMismatch { .. })
        ));
        assert!(other.property_values().is_empty());
    }

    #[test]
    fn serializes_with_kind_tags() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["entries"][0]["kind"], "missing_property_value");
        assert_eq!(json["entries"][2]["link"]["role"], "coverage");
        assert_eq!(json["configuration"], "Policy2024");
    }
}
