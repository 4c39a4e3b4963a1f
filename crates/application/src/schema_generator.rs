use std::collections::{BTreeMap, BTreeSet};

use crmdesk_domain::{FieldDefinition, FieldDefinitions};
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

mod field_rules;
mod formats;


use field_rules::FieldRules;

/// Fields maintained by the server and never validated on input.
pub const SYSTEM_FIELDS: [&str; 6] = [
    "id",
    "deleted",
    "createdAt",
    "modifiedAt",
    "createdBy",
    "modifiedBy",
];

/// Field selection for entity-level schema generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntitySchemaOptions {
    /// When set, only these fields are validated.
    pub include_fields: Option<BTreeSet<String>>,
    /// Fields never validated.
    pub exclude_fields: BTreeSet<String>,
    /// Leaves read-only and disabled fields out of the schema.
    pub skip_read_only: bool,
}

impl Default for EntitySchemaOptions {
    fn default() -> Self {
        Self {
            include_fields: None,
            exclude_fields: BTreeSet::new(),
            skip_read_only: true,
        }
    }
}

/// Validator for a single field, derived from its metadata.
#[derive(Debug, Clone)]
pub struct FieldValidator {
    name: String,
    definition: FieldDefinition,
    pattern: Option<Regex>,
}

impl FieldValidator {
    /// Returns the validated field name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the field definition the validator was built from.
    #[must_use]
    pub fn definition(&self) -> &FieldDefinition {
        &self.definition
    }

    /// Validates one value, absent when `None`.
    ///
    /// Returns the normalized value to keep (`None` when it stays absent) or the
    /// message of the first failing rule.
    pub fn validate(&self, value: Option<&Value>) -> Result<Option<Value>, String> {
        let value = value.or(self.definition.default_value());
        FieldRules {
            name: self.name.as_str(),
            definition: &self.definition,
            pattern: self.pattern.as_ref(),
        }
        .check(value)
    }
}

/// Validator for a whole record payload.
#[derive(Debug, Clone, Default)]
pub struct EntityValidator {
    fields: Vec<FieldValidator>,
}

impl EntityValidator {
    /// Returns the field validators in metadata order.
    #[must_use]
    pub fn fields(&self) -> &[FieldValidator] {
        &self.fields
    }

    /// Validates a record payload. Non-object payloads are treated as empty.
    #[must_use]
    pub fn validate(&self, data: &Value) -> ValidationOutcome {
        let input = data.as_object();
        let mut normalized = Map::new();
        let mut errors = BTreeMap::new();

        for field in &self.fields {
            let value = input.and_then(|object| object.get(field.name()));
            match field.validate(value) {
                Ok(Some(kept)) => {
                    normalized.insert(field.name().to_owned(), kept);
                }
                Ok(None) => {}
                Err(message) => {
                    errors.insert(field.name().to_owned(), message);
                }
            }
        }

        if errors.is_empty() {
            ValidationOutcome::Success { data: normalized }
        } else {
            ValidationOutcome::Failure { errors }
        }
    }
}

/// Result of validating a record payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// Every field passed; carries the normalized payload restricted to schema fields.
    Success {
        /// Normalized payload.
        data: Map<String, Value>,
    },
    /// At least one field failed; carries one message per failing field.
    Failure {
        /// Messages keyed by field name.
        errors: BTreeMap<String, String>,
    },
}

impl ValidationOutcome {
    /// Returns whether validation passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the field messages of a failed validation.
    #[must_use]
    pub fn errors(&self) -> Option<&BTreeMap<String, String>> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { errors } => Some(errors),
        }
    }

    /// Returns the normalized payload of a successful validation.
    #[must_use]
    pub fn data(&self) -> Option<&Map<String, Value>> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }
}

impl Serialize for ValidationOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            Self::Success { data } => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry("data", data)?;
            }
            Self::Failure { errors } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("errors", errors)?;
            }
        }
        map.end()
    }
}

/// Builds the validator for one field.
///
/// An uncompilable `pattern` is logged and ignored.
#[must_use]
pub fn generate_field_schema(name: &str, definition: &FieldDefinition) -> FieldValidator {
    let pattern = definition
        .pattern()
        .and_then(|pattern| match Regex::new(pattern) {
            Ok(expression) => Some(expression),
            Err(error) => {
                warn!(field = %name, pattern = %pattern, error = %error, "ignoring invalid field pattern");
                None
            }
        });

    FieldValidator {
        name: name.to_owned(),
        definition: definition.clone(),
        pattern,
    }
}

/// Builds the validator for a record payload from an entity's field definitions.
#[must_use]
pub fn generate_entity_schema(
    definitions: &FieldDefinitions,
    options: &EntitySchemaOptions,
) -> EntityValidator {
    let fields = definitions
        .iter()
        .filter(|(name, definition)| {
            if SYSTEM_FIELDS.contains(name) || options.exclude_fields.contains(*name) {
                return false;
            }
            if options.skip_read_only && (definition.is_read_only() || definition.is_disabled()) {
                return false;
            }
            options
                .include_fields
                .as_ref()
                .is_none_or(|included| included.contains(*name))
        })
        .map(|(name, definition)| generate_field_schema(name, definition))
        .collect();

    EntityValidator { fields }
}

/// Validates a record payload against an entity's field definitions. Never fails.
#[must_use]
pub fn validate_entity_data(
    definitions: &FieldDefinitions,
    data: &Value,
    options: &EntitySchemaOptions,
) -> ValidationOutcome {
    generate_entity_schema(definitions, options).validate(data)
}

/// Validates one field value in isolation, as an edit form does on change.
pub fn validate_field_value(
    name: &str,
    definition: &FieldDefinition,
    value: Option<&Value>,
) -> Result<Option<Value>, String> {
    generate_field_schema(name, definition).validate(value)
}
