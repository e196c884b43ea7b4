//! Validation messages
//!
//! Findings are values, never errors: a validator returns every message it
//! produced and the caller decides what blocks.

use pconf_model::QualifiedName;
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// Message severity, ordered from least to most severe
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational
    Info,
    /// Suspicious but usable
    Warning,
    /// Broken model
    Error,
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => f.write_str("INFO"),
            Self::Warning => f.write_str("WARNING"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}

/// Message codes
pub mod codes {
    /// Declared supertype does not exist
    pub const SUPERTYPE_NOT_FOUND: &str = "PCONF-SUPERTYPE-NOT-FOUND";
    /// Configured schema does not exist
    pub const SCHEMA_NOT_FOUND: &str = "PCONF-SCHEMA-NOT-FOUND";
    /// Configured schema has a superschema but the type has no supertype
    pub const SUPERTYPE_MISSING: &str = "PCONF-SUPERTYPE-MISSING";
    /// Supertype configures a schema unrelated to the type's schema
    pub const SUPERTYPE_SCHEMA_MISMATCH: &str = "PCONF-SUPERTYPE-SCHEMA-MISMATCH";
    /// Supertype chain runs into a cycle
    pub const SUPERTYPE_CYCLE: &str = "PCONF-SUPERTYPE-CYCLE";
    /// Superschema chain runs into a cycle
    pub const SCHEMA_CYCLE: &str = "PCONF-SCHEMA-CYCLE";
    /// Association target type does not exist
    pub const ASSOCIATION_TARGET_NOT_FOUND: &str = "PCONF-ASSOCIATION-TARGET-NOT-FOUND";
    /// Configuration instantiates an unknown type
    pub const TYPE_NOT_FOUND: &str = "PCONF-TYPE-NOT-FOUND";
    /// Configuration instantiates an abstract type
    pub const ABSTRACT_TYPE_CONFIGURED: &str = "PCONF-ABSTRACT-TYPE-CONFIGURED";
    /// Link target configuration does not exist
    pub const LINK_TARGET_NOT_FOUND: &str = "PCONF-LINK-TARGET-NOT-FOUND";
    /// Link target is not an instance of the association target type
    pub const LINK_TARGET_TYPE_MISMATCH: &str = "PCONF-LINK-TARGET-TYPE-MISMATCH";
    /// Number of links outside the association cardinality
    pub const CARDINALITY_VIOLATION: &str = "PCONF-CARDINALITY-VIOLATION";
    /// Configuration lies on a link cycle
    pub const LINK_CYCLE: &str = "PCONF-LINK-CYCLE";
}

/// One finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationMessage {
    /// Stable code, see [`codes`]
    pub code: &'static str,
    /// Severity
    pub severity: Severity,
    /// Human readable text
    pub text: String,
    /// Element the message is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<QualifiedName>,
    /// Property or role of `object` the message is about
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

impl ValidationMessage {
    /// Create message
    #[must_use]
    pub fn new(code: &'static str, severity: Severity, text: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            text: text.into(),
            object: None,
            property: None,
        }
    }

    /// Error message
    #[must_use]
    pub fn error(code: &'static str, text: impl Into<String>) -> Self {
        Self::new(code, Severity::Error, text)
    }

    /// Warning message
    #[must_use]
    pub fn warning(code: &'static str, text: impl Into<String>) -> Self {
        Self::new(code, Severity::Warning, text)
    }

    /// Info message
    #[must_use]
    pub fn info(code: &'static str, text: impl Into<String>) -> Self {
        Self::new(code, Severity::Info, text)
    }

    /// About `object`
    #[must_use]
    pub fn with_object(mut self, object: QualifiedName) -> Self {
        self.object = Some(object);
        self
    }

    /// About `property` of the object
    #[must_use]
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.property = Some(property.into());
        self
    }
}

impl Display for ValidationMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.code, self.text)?;
        match (&self.object, &self.property) {
            (Some(object), Some(property)) => write!(f, " ({object}.{property})"),
            (Some(object), None) => write!(f, " ({object})"),
            _ => Ok(()),
        }
    }
}

/// Ordered list of findings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageList {
    messages: Vec<ValidationMessage>,
}

impl MessageList {
    /// Create empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message
    pub fn push(&mut self, message: ValidationMessage) {
        self.messages.push(message);
    }

    /// Append a message if there is one
    pub fn push_opt(&mut self, message: Option<ValidationMessage>) {
        if let Some(message) = message {
            self.messages.push(message);
        }
    }

    /// Append all messages of `other`
    pub fn append(&mut self, other: MessageList) {
        self.messages.extend(other.messages);
    }

    /// Messages in order
    #[inline]
    #[must_use]
    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    /// Iterate messages
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationMessage> {
        self.messages.iter()
    }

    /// Number of messages
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if nothing was found
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Highest severity, `None` for an empty list
    #[must_use]
    pub fn severity(&self) -> Option<Severity> {
        self.messages.iter().map(|m| m.severity).max()
    }

    /// Check if any message is an error
    #[must_use]
    pub fn contains_errors(&self) -> bool {
        self.severity() == Some(Severity::Error)
    }

    /// Messages with `code`
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a ValidationMessage> {
        self.messages.iter().filter(move |m| m.code == code)
    }

    /// Messages about `object`
    pub fn for_object<'a>(
        &'a self,
        object: &'a QualifiedName,
    ) -> impl Iterator<Item = &'a ValidationMessage> {
        self.messages
            .iter()
            .filter(move |m| m.object.as_ref() == Some(object))
    }
}

impl Display for MessageList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for message in &self.messages {
            writeln!(f, "{message}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a MessageList {
    type Item = &'a ValidationMessage;
    type IntoIter = std::slice::Iter<'a, ValidationMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl IntoIterator for MessageList {
    type Item = ValidationMessage;
    type IntoIter = std::vec::IntoIter<ValidationMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.into_iter()
    }
}

impl FromIterator<ValidationMessage> for MessageList {
    fn from_iter<I: IntoIterator<Item = ValidationMessage>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pconf_test_utils::qn;

    #[test]
    fn list_severity_is_max() {
        let mut list = MessageList::new();
        assert_eq!(list.severity(), None);
        list.push(ValidationMessage::info(codes::LINK_CYCLE, "i"));
        list.push(ValidationMessage::warning(codes::CARDINALITY_VIOLATION, "w"));
        assert_eq!(list.severity(), Some(Severity::Warning));
        assert!(!list.contains_errors());
        list.push_opt(Some(ValidationMessage::error(codes::TYPE_NOT_FOUND, "e")));
        list.push_opt(None);
        assert!(list.contains_errors());
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn message_display() {
        let message = ValidationMessage::error(codes::TYPE_NOT_FOUND, "unknown type")
            .with_object(qn("motor.Policy2024"))
            .with_property("premium");
        assert_eq!(
            message.to_string(),
            "ERROR PCONF-TYPE-NOT-FOUND: unknown type (motor.Policy2024.premium)"
        );
    }

    #[test]
    fn filters() {
        let list: MessageList = vec![
            ValidationMessage::error(codes::TYPE_NOT_FOUND, "a").with_object(qn("A")),
            ValidationMessage::error(codes::LINK_CYCLE, "b").with_object(qn("B")),
        ]
        .into_iter()
        .collect();
        assert_eq!(list.with_code(codes::LINK_CYCLE).count(), 1);
        assert_eq!(list.for_object(&qn("A")).count(), 1);
    }
}
