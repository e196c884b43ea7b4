//! Qualified names for model elements
//!
//! Provides [`QualifiedName`], the identity of product types, schemas and
//! product configurations.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Dotted, package-qualified name of a model element
///
/// Every segment is non-empty and consists of alphanumerics or underscores.
/// Two elements are the same element exactly when their qualified names are
/// equal, which is why the hierarchy walker keys its visited set by name.
///
/// # Examples
/// - `["motor", "Policy"]` → `motor.Policy`
/// - `["motor", "Policy2024"]` → `motor.Policy2024`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName(Vec<String>);

impl QualifiedName {
    /// Parse a dotted name
    ///
    /// # Errors
    /// Returns error if the name is empty or contains an invalid segment
    #[inline]
    pub fn parse(name: &str) -> Result<Self, NameError> {
        name.parse()
    }

    /// Build a name from already split segments
    ///
    /// # Errors
    /// Returns error if there are no segments or a segment is invalid
    pub fn from_segments<I, S>(segments: I) -> Result<Self, NameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(NameError::Empty);
        }
        for segment in &segments {
            validate_segment(segment)?;
        }
        Ok(Self(segments))
    }

    /// Get name segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments, at least one
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Last segment, the name without its package
    #[inline]
    #[must_use]
    pub fn unqualified(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }

    /// Package part (if the name is qualified)
    #[inline]
    #[must_use]
    pub fn package(&self) -> Option<Self> {
        if self.0.len() > 1 {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        } else {
            None
        }
    }

    /// Append a segment, returning new name
    ///
    /// # Errors
    /// Returns error if the segment is invalid
    pub fn child(&self, segment: impl Into<String>) -> Result<Self, NameError> {
        let segment = segment.into();
        validate_segment(&segment)?;
        let mut new = self.clone();
        new.0.push(segment);
        Ok(new)
    }

    /// Check whether this name lives inside `package`
    ///
    /// `motor.Policy` is within `motor`; `motor` is not within itself.
    #[inline]
    #[must_use]
    pub fn is_within(&self, package: &Self) -> bool {
        self.0.len() > package.0.len() && self.0[..package.0.len()] == package.0[..]
    }
}

fn validate_segment(segment: &str) -> Result<(), NameError> {
    if segment.is_empty() {
        Err(NameError::EmptySegment)
    } else if segment.contains(|c: char| !c.is_alphanumeric() && c != '_') {
        Err(NameError::InvalidSegment(segment.to_string()))
    } else {
        Ok(())
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

impl FromStr for QualifiedName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(NameError::Empty);
        }
        Self::from_segments(s.split('.'))
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for QualifiedName {
    type Error = NameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<QualifiedName> for String {
    fn from(name: QualifiedName) -> Self {
        name.to_string()
    }
}

/// Errors related to qualified names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    /// No segments at all
    #[error("qualified name is empty")]
    Empty,

    /// Empty segment in name
    #[error("qualified name contains empty segment")]
    EmptySegment,

    /// Invalid segment characters
    #[error("invalid segment: {0} (must be alphanumeric or underscore)")]
    InvalidSegment(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_parse_and_segments() {
        let name = QualifiedName::parse("motor.Policy").unwrap();
        assert_eq!(name.segments(), &["motor", "Policy"]);
        assert_eq!(name.len(), 2);
        assert!(!name.is_empty());
    }

    #[test]
    fn name_unqualified_and_package() {
        let name = QualifiedName::parse("motor.car.Policy").unwrap();
        assert_eq!(name.unqualified(), "Policy");
        assert_eq!(name.package().unwrap().to_string(), "motor.car");

        let plain = QualifiedName::parse("Policy").unwrap();
        assert!(plain.package().is_none());
    }

    #[test]
    fn name_child() {
        let package = QualifiedName::parse("motor").unwrap();
        let child = package.child("Policy").unwrap();
        assert_eq!(child.to_string(), "motor.Policy");
        assert!(package.child("bad-name").is_err());
    }

    #[test]
    fn name_is_within() {
        let package = QualifiedName::parse("motor").unwrap();
        let name = QualifiedName::parse("motor.Policy").unwrap();
        assert!(name.is_within(&package));
        assert!(!package.is_within(&package));
        assert!(!package.is_within(&name));
    }

    #[test]
    fn name_rejects_empty() {
        assert_eq!(QualifiedName::parse(""), Err(NameError::Empty));
        assert_eq!(QualifiedName::parse("a..b"), Err(NameError::EmptySegment));
        assert!(QualifiedName::from_segments(Vec::<String>::new()).is_err());
    }

    #[test]
    fn name_rejects_invalid_chars() {
        let result = QualifiedName::parse("motor.Pol-icy");
        assert!(matches!(result, Err(NameError::InvalidSegment(_))));
    }

    #[test]
    fn name_serde_as_string() {
        let name = QualifiedName::parse("motor.Policy").unwrap();
        let json = serde_json::to_string(&name).unwrap();
        assert_eq!(json, "\"motor.Policy\"");
        let back: QualifiedName = serde_json::from_str(&json).unwrap();
        assert_eq!(back, name);
        assert!(serde_json::from_str::<QualifiedName>("\"a..b\"").is_err());
    }
}
