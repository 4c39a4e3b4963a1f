use crmdesk_domain::{FieldDefinition, FieldType};
use regex::Regex;
use serde_json::{Map, Number, Value};

use super::formats::{is_color, is_date, is_date_time, is_email, is_url};

const PERSON_NAME_KEYS: [&str; 2] = ["first", "last"];

/// 2^63; whole numbers must lie in `-I64_BOUND..I64_BOUND`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// Outcome of one field rule: the normalized value to keep (`None` leaves it absent)
/// or the first failing message.
pub(super) type RuleResult = Result<Option<Value>, String>;

pub(super) struct FieldRules<'a> {
    pub(super) name: &'a str,
    pub(super) definition: &'a FieldDefinition,
    pub(super) pattern: Option<&'a Regex>,
}

#[derive(Clone, Copy)]
enum TextFormat {
    Plain,
    Email,
    Url,
    Date,
    DateTime,
    Color,
}

impl FieldRules<'_> {
    pub(super) fn check(&self, value: Option<&Value>) -> RuleResult {
        match self.definition.field_type() {
            FieldType::ShortText | FieldType::LongText | FieldType::Phone => {
                self.text(value, TextFormat::Plain)
            }
            FieldType::Email => self.text(value, TextFormat::Email),
            FieldType::Url => self.text(value, TextFormat::Url),
            FieldType::Date => self.text(value, TextFormat::Date),
            FieldType::DateTime => self.text(value, TextFormat::DateTime),
            FieldType::Color => self.text(value, TextFormat::Color),
            FieldType::Integer => self.number(value, true),
            FieldType::Decimal => self.number(value, false),
            FieldType::Boolean => self.boolean(value),
            FieldType::SingleChoice => self.single_choice(value),
            FieldType::MultiChoice => self.multi_choice(value),
            FieldType::ReferenceToOne | FieldType::File => self.reference(value),
            FieldType::ReferenceToMany | FieldType::FileList => self.references(value),
            FieldType::Address => self.address(value),
            FieldType::PersonName => self.person_name(value),
            FieldType::GeoPoint => self.geo_point(value),
            FieldType::Other(_) => Ok(value.cloned()),
        }
    }

    fn required_message(&self) -> String {
        format!("{} is required", self.name)
    }

    fn invalid(&self, expectation: &str) -> String {
        format!("{} must be {expectation}", self.name)
    }

    /// Handles absent, `null` and `""` input; `None` means the value needs full checks.
    fn blank(&self, value: Option<&Value>, empty_as: Option<Value>) -> Option<RuleResult> {
        let is_blank = match value {
            None | Some(Value::Null) => true,
            Some(Value::String(text)) => text.trim().is_empty(),
            Some(_) => false,
        };
        if !is_blank {
            return None;
        }

        if self.definition.is_required() {
            return Some(Err(self.required_message()));
        }

        let kept = match value {
            Some(Value::String(_)) => empty_as.or_else(|| value.cloned()),
            other => other.cloned(),
        };
        Some(Ok(kept))
    }

    fn text(&self, value: Option<&Value>, format: TextFormat) -> RuleResult {
        if let Some(result) = self.blank(value, None) {
            return result;
        }

        let Some(text) = value.and_then(Value::as_str) else {
            return Err(self.invalid("text"));
        };
        let length = text.chars().count() as u64;

        if let Some(min_length) = self.definition.min_length()
            && length < min_length
        {
            return Err(self.invalid(&format!("at least {min_length} characters")));
        }
        if let Some(max_length) = self.definition.max_length()
            && length > max_length
        {
            return Err(self.invalid(&format!("at most {max_length} characters")));
        }

        let well_formed = match format {
            TextFormat::Plain => true,
            TextFormat::Email => is_email(text),
            TextFormat::Url => is_url(text),
            TextFormat::Date => is_date(text),
            TextFormat::DateTime => is_date_time(text),
            TextFormat::Color => is_color(text),
        };
        if !well_formed {
            return Err(self.invalid(match format {
                TextFormat::Plain => "text",
                TextFormat::Email => "a valid email address",
                TextFormat::Url => "a valid URL",
                TextFormat::Date => "a date (YYYY-MM-DD)",
                TextFormat::DateTime => "a date-time (YYYY-MM-DD HH:MM)",
                TextFormat::Color => "a hex color (#RGB or #RRGGBB)",
            }));
        }

        if let Some(pattern) = self.pattern
            && !pattern.is_match(text)
        {
            return Err(format!("{} has an invalid format", self.name));
        }

        Ok(value.cloned())
    }

    fn number(&self, value: Option<&Value>, whole: bool) -> RuleResult {
        if let Some(result) = self.blank(value, Some(Value::Null)) {
            return result;
        }

        let Some(raw) = value else {
            return Ok(None);
        };
        let parsed = match raw {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        let Some(number) = parsed.filter(|number| number.is_finite()) else {
            return Err(self.invalid("a number"));
        };

        if whole && (number.fract() != 0.0 || !(-I64_BOUND..I64_BOUND).contains(&number)) {
            return Err(self.invalid("a whole number"));
        }
        if let Some(min) = self.definition.min()
            && number < min
        {
            return Err(self.invalid(&format!("at least {min}")));
        }
        if let Some(max) = self.definition.max()
            && number > max
        {
            return Err(self.invalid(&format!("at most {max}")));
        }

        let normalized = match raw {
            Value::Number(_) => raw.clone(),
            // in range after the whole-number check
            _ if whole => Value::from(number as i64),
            _ => Number::from_f64(number).map_or(Value::Null, Value::Number),
        };
        Ok(Some(normalized))
    }

    fn boolean(&self, value: Option<&Value>) -> RuleResult {
        match value {
            None | Some(Value::Null) => Ok(Some(Value::Bool(false))),
            Some(Value::Bool(flag)) => Ok(Some(Value::Bool(*flag))),
            Some(_) => Err(self.invalid("true or false")),
        }
    }

    fn single_choice(&self, value: Option<&Value>) -> RuleResult {
        if let Some(result) = self.blank(value, None) {
            return result;
        }

        let Some(choice) = value.and_then(stringify_option) else {
            return Err(self.invalid("one of the allowed options"));
        };
        if !self.allows_option(choice.as_str()) {
            return Err(self.invalid("one of the allowed options"));
        }

        Ok(value.cloned())
    }

    fn multi_choice(&self, value: Option<&Value>) -> RuleResult {
        let items = match value {
            None | Some(Value::Null) if self.definition.is_required() => {
                return Err(self.required_message());
            }
            None | Some(Value::Null) => return Ok(value.cloned()),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(self.invalid("a list")),
        };

        if items.is_empty() && self.definition.is_required() {
            return Err(self.required_message());
        }
        let all_allowed = items.iter().all(|item| {
            stringify_option(item).is_some_and(|choice| self.allows_option(choice.as_str()))
        });
        if !all_allowed {
            return Err(format!(
                "{} contains a value outside the allowed options",
                self.name
            ));
        }

        Ok(value.cloned())
    }

    fn allows_option(&self, choice: &str) -> bool {
        self.definition
            .options()
            .is_none_or(|options| options.iter().any(|option| option == choice))
    }

    fn reference(&self, value: Option<&Value>) -> RuleResult {
        if let Some(result) = self.blank(value, None) {
            return result;
        }

        match value.and_then(reference_id) {
            Some(id) if !id.is_empty() => Ok(value.cloned()),
            Some(_) if self.definition.is_required() => Err(self.required_message()),
            Some(_) => Ok(value.cloned()),
            None => Err(self.invalid("a record reference")),
        }
    }

    fn references(&self, value: Option<&Value>) -> RuleResult {
        let items = match value {
            None | Some(Value::Null) if self.definition.is_required() => {
                return Err(self.required_message());
            }
            None | Some(Value::Null) => return Ok(value.cloned()),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(self.invalid("a list of record references")),
        };

        if items.is_empty() && self.definition.is_required() {
            return Err(self.required_message());
        }
        let all_valid = items
            .iter()
            .all(|item| reference_id(item).is_some_and(|id| !id.is_empty()));
        if !all_valid {
            return Err(self.invalid("a list of record references"));
        }

        Ok(value.cloned())
    }

    fn address(&self, value: Option<&Value>) -> RuleResult {
        let parts = match value {
            None | Some(Value::Null) if self.definition.is_required() => {
                return Err(self.required_message());
            }
            None | Some(Value::Null) => return Ok(value.cloned()),
            Some(Value::Object(parts)) => parts,
            Some(_) => return Err(self.invalid("an address")),
        };

        if !string_parts(parts) {
            return Err(self.invalid("an address"));
        }
        let filled = parts
            .values()
            .filter_map(Value::as_str)
            .any(|part| !part.trim().is_empty());
        if !filled && self.definition.is_required() {
            return Err(self.required_message());
        }

        Ok(value.cloned())
    }

    fn person_name(&self, value: Option<&Value>) -> RuleResult {
        if let Some(result) = self.blank(value, None) {
            return result;
        }

        match value {
            Some(Value::String(_)) => Ok(value.cloned()),
            Some(Value::Object(parts)) if string_parts(parts) => {
                let named = PERSON_NAME_KEYS.iter().any(|key| {
                    parts
                        .get(*key)
                        .and_then(Value::as_str)
                        .is_some_and(|part| !part.trim().is_empty())
                });
                if !named && self.definition.is_required() {
                    return Err(self.required_message());
                }
                Ok(value.cloned())
            }
            _ => Err(self.invalid("a person name")),
        }
    }

    fn geo_point(&self, value: Option<&Value>) -> RuleResult {
        let point = match value {
            None | Some(Value::Null) if self.definition.is_required() => {
                return Err(self.required_message());
            }
            None | Some(Value::Null) => return Ok(value.cloned()),
            Some(Value::Object(point)) if point.is_empty() && self.definition.is_required() => {
                return Err(self.required_message());
            }
            Some(Value::Object(point)) if point.is_empty() => return Ok(value.cloned()),
            Some(Value::Object(point)) => point,
            Some(_) => return Err(self.invalid("a latitude/longitude pair")),
        };

        let latitude = point.get("lat").and_then(Value::as_f64);
        let longitude = point.get("lon").and_then(Value::as_f64);
        let in_range = matches!(
            (latitude, longitude),
            (Some(lat), Some(lon)) if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
        );
        if !in_range {
            return Err(self.invalid("a latitude/longitude pair"));
        }

        Ok(value.cloned())
    }
}

fn stringify_option(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Returns the id of a bare-id or `{id, name?}` reference; `None` for other shapes.
fn reference_id(value: &Value) -> Option<&str> {
    match value {
        Value::String(id) => Some(id.as_str()),
        Value::Object(reference) => {
            let name_ok = reference
                .get("name")
                .is_none_or(|name| name.is_null() || name.is_string());
            if !name_ok {
                return None;
            }
            match reference.get("id") {
                Some(Value::String(id)) => Some(id.as_str()),
                None | Some(Value::Null) => Some(""),
                Some(_) => None,
            }
        }
        _ => None,
    }
}

fn string_parts(parts: &Map<String, Value>) -> bool {
    parts
        .values()
        .all(|part| part.is_null() || part.is_string())
}
