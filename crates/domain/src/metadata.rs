use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use crmdesk_core::{AppError, AppResult};
use serde_json::Value;
use tracing::warn;

use crate::EntityDynamicLogic;

/// Supported metadata field kinds.
///
/// Server type names map onto one kind each; several aliases share a kind
/// (`currency` is a decimal, `checklist` a multi-choice). Names this client does
/// not know are preserved in [`FieldType::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    /// Single-line text.
    ShortText,
    /// Multi-line text.
    LongText,
    /// Email address.
    Email,
    /// Phone number.
    Phone,
    /// Whole number.
    Integer,
    /// Decimal or currency amount.
    Decimal,
    /// Checkbox.
    Boolean,
    /// One value out of `options`.
    SingleChoice,
    /// Any subset of `options`.
    MultiChoice,
    /// Date without time.
    Date,
    /// Date with time.
    DateTime,
    /// Link to one record.
    ReferenceToOne,
    /// Links to many records.
    ReferenceToMany,
    /// One attachment.
    File,
    /// Many attachments.
    FileList,
    /// Composite postal address.
    Address,
    /// Composite person name.
    PersonName,
    /// Hex color.
    Color,
    /// Latitude/longitude pair.
    GeoPoint,
    /// Web address.
    Url,
    /// Type name not known to this client.
    Other(String),
}

impl FieldType {
    /// Parses a server type name. Never fails; unknown names become [`FieldType::Other`].
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "varchar" => Self::ShortText,
            "text" | "wysiwyg" => Self::LongText,
            "email" => Self::Email,
            "phone" => Self::Phone,
            "int" | "autoincrement" => Self::Integer,
            "float" | "currency" | "decimal" => Self::Decimal,
            "bool" => Self::Boolean,
            "enum" => Self::SingleChoice,
            "multiEnum" | "array" | "checklist" => Self::MultiChoice,
            "date" => Self::Date,
            "datetime" | "datetimeOptional" => Self::DateTime,
            "link" | "linkOne" | "linkParent" => Self::ReferenceToOne,
            "linkMultiple" => Self::ReferenceToMany,
            "file" | "image" => Self::File,
            "attachmentMultiple" => Self::FileList,
            "address" => Self::Address,
            "personName" => Self::PersonName,
            "colorpicker" => Self::Color,
            "map" => Self::GeoPoint,
            "url" => Self::Url,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the canonical server type name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ShortText => "varchar",
            Self::LongText => "text",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Integer => "int",
            Self::Decimal => "float",
            Self::Boolean => "bool",
            Self::SingleChoice => "enum",
            Self::MultiChoice => "multiEnum",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::ReferenceToOne => "link",
            Self::ReferenceToMany => "linkMultiple",
            Self::File => "file",
            Self::FileList => "attachmentMultiple",
            Self::Address => "address",
            Self::PersonName => "personName",
            Self::Color => "colorpicker",
            Self::GeoPoint => "map",
            Self::Url => "url",
            Self::Other(name) => name.as_str(),
        }
    }

    /// Returns whether values are picked from an option list.
    #[must_use]
    pub fn is_enumerated(&self) -> bool {
        matches!(self, Self::SingleChoice | Self::MultiChoice)
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        Self::parse(value.as_str())
    }
}

impl From<FieldType> for String {
    fn from(value: FieldType) -> Self {
        match value {
            FieldType::Other(name) => name,
            known => known.as_str().to_owned(),
        }
    }
}

impl Display for FieldType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Metadata definition for a single entity field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    #[serde(rename = "type")]
    field_type: FieldType,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    read_only: bool,
    #[serde(default)]
    disabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_length: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(
        default,
        deserialize_with = "deserialize_options",
        skip_serializing_if = "Option::is_none"
    )]
    options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default: Option<Value>,
}

impl FieldDefinition {
    /// Creates an unconstrained field definition of the given kind.
    #[must_use]
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            required: false,
            read_only: false,
            disabled: false,
            label: None,
            max_length: None,
            min_length: None,
            min: None,
            max: None,
            pattern: None,
            options: None,
            default: None,
        }
    }

    /// Sets the required flag.
    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the read-only flag.
    #[must_use]
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Sets the disabled flag.
    #[must_use]
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Sets the display label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets text length bounds.
    #[must_use]
    pub fn with_length_bounds(mut self, min_length: Option<u64>, max_length: Option<u64>) -> Self {
        self.min_length = min_length;
        self.max_length = max_length;
        self
    }

    /// Sets numeric bounds.
    #[must_use]
    pub fn with_range(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    /// Sets a regular expression that non-empty text values must match.
    #[must_use]
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Sets the option list.
    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the value applied when none is supplied.
    #[must_use]
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Returns the field kind.
    #[must_use]
    pub fn field_type(&self) -> &FieldType {
        &self.field_type
    }

    /// Returns whether the field is required.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns whether the field is read-only.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Returns whether the field is disabled.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Returns the maximum text length.
    #[must_use]
    pub fn max_length(&self) -> Option<u64> {
        self.max_length
    }

    /// Returns the minimum text length.
    #[must_use]
    pub fn min_length(&self) -> Option<u64> {
        self.min_length
    }

    /// Returns the numeric lower bound.
    #[must_use]
    pub fn min(&self) -> Option<f64> {
        self.min
    }

    /// Returns the numeric upper bound.
    #[must_use]
    pub fn max(&self) -> Option<f64> {
        self.max
    }

    /// Returns the text pattern.
    #[must_use]
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Returns the stringified option list.
    #[must_use]
    pub fn options(&self) -> Option<&[String]> {
        self.options.as_deref()
    }

    /// Returns the default value.
    #[must_use]
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

fn deserialize_options<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Vec<Value>>::deserialize(deserializer)?;
    Ok(raw.map(|items| items.iter().map(stringify_option).collect()))
}

fn stringify_option(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

/// Field definitions of one entity in server metadata order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldDefinitions {
    entries: Vec<(String, FieldDefinition)>,
}

impl FieldDefinitions {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a field, replacing an existing definition with the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, definition: FieldDefinition) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = definition,
            None => self.entries.push((name, definition)),
        }
    }

    /// Builder form of [`FieldDefinitions::insert`].
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, definition: FieldDefinition) -> Self {
        self.insert(name, definition);
        self
    }

    /// Returns one field definition.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldDefinition> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, definition)| definition)
    }

    /// Returns whether a field is defined.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates fields in metadata order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldDefinition)> {
        self.entries
            .iter()
            .map(|(name, definition)| (name.as_str(), definition))
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether there are no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, FieldDefinition)> for FieldDefinitions {
    fn from_iter<T: IntoIterator<Item = (String, FieldDefinition)>>(iter: T) -> Self {
        let mut definitions = Self::new();
        for (name, definition) in iter {
            definitions.insert(name, definition);
        }
        definitions
    }
}

impl Serialize for FieldDefinitions {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, definition) in &self.entries {
            map.serialize_entry(name, definition)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldDefinitions {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FieldDefinitionsVisitor)
    }
}

struct FieldDefinitionsVisitor;

impl<'de> Visitor<'de> for FieldDefinitionsVisitor {
    type Value = FieldDefinitions;

    fn expecting(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("a map of field name to field definition")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut definitions = FieldDefinitions::new();
        while let Some((name, raw)) = access.next_entry::<String, Value>()? {
            match FieldDefinition::deserialize(raw) {
                Ok(definition) => definitions.insert(name, definition),
                Err(error) => {
                    warn!(field = %name, error = %error, "skipping unreadable field definition");
                }
            }
        }

        Ok(definitions)
    }
}

/// Server-side definition block for one entity type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityDefs {
    #[serde(default)]
    fields: FieldDefinitions,
}

/// Client-side definition block for one entity type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDefs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dynamic_logic: Option<EntityDynamicLogic>,
}

/// Immutable metadata snapshot for every entity type visible to the session.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityMetadata {
    #[serde(default)]
    entity_defs: BTreeMap<String, EntityDefs>,
    #[serde(default)]
    client_defs: BTreeMap<String, ClientDefs>,
}

impl EntityMetadata {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entity's field definitions.
    #[must_use]
    pub fn with_entity(mut self, entity_type: impl Into<String>, fields: FieldDefinitions) -> Self {
        self.entity_defs
            .insert(entity_type.into(), EntityDefs { fields });
        self
    }

    /// Adds or replaces an entity's dynamic logic.
    #[must_use]
    pub fn with_dynamic_logic(
        mut self,
        entity_type: impl Into<String>,
        dynamic_logic: EntityDynamicLogic,
    ) -> Self {
        self.client_defs.insert(
            entity_type.into(),
            ClientDefs {
                dynamic_logic: Some(dynamic_logic),
            },
        );
        self
    }

    /// Returns the entity types with server definitions.
    pub fn entity_types(&self) -> impl Iterator<Item = &str> {
        self.entity_defs.keys().map(String::as_str)
    }

    /// Returns an entity's field definitions.
    #[must_use]
    pub fn fields(&self, entity_type: &str) -> Option<&FieldDefinitions> {
        self.entity_defs
            .get(entity_type)
            .map(|definition| &definition.fields)
    }

    /// Returns an entity's field definitions or a not-found error.
    pub fn require_fields(&self, entity_type: &str) -> AppResult<&FieldDefinitions> {
        self.fields(entity_type).ok_or_else(|| {
            AppError::NotFound(format!("entity type '{entity_type}' has no metadata"))
        })
    }

    /// Returns an entity's dynamic logic.
    #[must_use]
    pub fn dynamic_logic(&self, entity_type: &str) -> Option<&EntityDynamicLogic> {
        self.client_defs
            .get(entity_type)
            .and_then(|definition| definition.dynamic_logic.as_ref())
    }

    /// Returns the static option lists of an entity's enumerated fields.
    #[must_use]
    pub fn field_options(&self, entity_type: &str) -> BTreeMap<String, Vec<String>> {
        self.fields(entity_type)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(|(name, definition)| {
                        definition
                            .options()
                            .map(|options| (name.to_owned(), options.to_vec()))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{EntityMetadata, FieldDefinition, FieldDefinitions, FieldType};

    #[test]
    fn field_type_aliases_share_a_kind() {
        assert_eq!(FieldType::parse("currency"), FieldType::Decimal);
        assert_eq!(FieldType::parse("checklist"), FieldType::MultiChoice);
        assert_eq!(FieldType::parse("image"), FieldType::File);
        assert_eq!(
            FieldType::parse("barcode"),
            FieldType::Other("barcode".to_owned())
        );
        assert_eq!(String::from(FieldType::parse("barcode")), "barcode");
    }

    #[test]
    fn field_definition_parses_constraints_and_stringifies_options() {
        let definition = serde_json::from_value::<FieldDefinition>(json!({
            "type": "enum",
            "required": true,
            "options": ["", "Hot", 3, true],
            "default": "Hot",
            "maxLength": 20
        }))
        .unwrap_or_else(|_| unreachable!());

        assert_eq!(definition.field_type(), &FieldType::SingleChoice);
        assert!(definition.is_required());
        assert!(!definition.is_read_only());
        assert_eq!(definition.max_length(), Some(20));
        assert_eq!(
            definition.options(),
            Some(
                &[
                    String::new(),
                    "Hot".to_owned(),
                    "3".to_owned(),
                    "true".to_owned()
                ][..]
            )
        );
        assert_eq!(definition.default_value(), Some(&json!("Hot")));
    }

    #[test]
    fn require_fields_reports_unknown_entity_types() {
        let metadata = EntityMetadata::new().with_entity(
            "Lead",
            FieldDefinitions::new().with_field("name", FieldDefinition::new(FieldType::ShortText)),
        );

        assert!(metadata.require_fields("Lead").is_ok());
        assert!(matches!(
            metadata.require_fields("Invoice"),
            Err(crmdesk_core::AppError::NotFound(_))
        ));
    }

    #[test]
    fn field_definitions_preserve_server_order() {
        let definitions = serde_json::from_str::<FieldDefinitions>(
            r#"{"website":{"type":"url"},"name":{"type":"varchar"},"amount":{"type":"currency"}}"#,
        )
        .unwrap_or_default();

        let names: Vec<&str> = definitions.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["website", "name", "amount"]);
    }

    #[test]
    fn unreadable_field_definitions_are_skipped() {
        let definitions = serde_json::from_str::<FieldDefinitions>(
            r#"{"name":{"type":"varchar"},"broken":{"required":true},"email":{"type":"email"}}"#,
        )
        .unwrap_or_default();

        assert_eq!(definitions.len(), 2);
        assert!(!definitions.contains("broken"));
    }

    #[test]
    fn insert_replaces_in_place() {
        let definitions = FieldDefinitions::new()
            .with_field("name", FieldDefinition::new(FieldType::ShortText))
            .with_field("email", FieldDefinition::new(FieldType::Email))
            .with_field(
                "name",
                FieldDefinition::new(FieldType::ShortText).with_required(true),
            );

        let names: Vec<&str> = definitions.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["name", "email"]);
        assert!(
            definitions
                .get("name")
                .is_some_and(FieldDefinition::is_required)
        );
    }

    #[test]
    fn metadata_payload_exposes_fields_and_dynamic_logic() {
        let metadata = serde_json::from_value::<EntityMetadata>(json!({
            "entityDefs": {
                "Lead": {
                    "fields": {
                        "status": {"type": "enum", "options": ["New", "Dead"]},
                        "reason": {"type": "text"}
                    },
                    "links": {"account": {"type": "belongsTo"}}
                }
            },
            "clientDefs": {
                "Lead": {
                    "dynamicLogic": {
                        "fields": {
                            "reason": {
                                "visible": {"conditionGroup": [
                                    {"type": "equals", "attribute": "status", "value": "Dead"}
                                ]}
                            }
                        }
                    }
                }
            }
        }))
        .unwrap_or_default();

        assert_eq!(metadata.entity_types().collect::<Vec<_>>(), vec!["Lead"]);
        assert!(metadata.fields("Lead").is_some_and(|fields| fields.len() == 2));
        assert!(metadata.dynamic_logic("Lead").is_some());
        assert!(metadata.dynamic_logic("Account").is_none());
        assert_eq!(
            metadata.field_options("Lead").get("status"),
            Some(&vec!["New".to_owned(), "Dead".to_owned()])
        );
    }
}
