use std::collections::HashMap;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::jne::datetime::{parse_date, parse_datetime};
use crate::jne::entitykind::{Derivation, EntityKind, FieldParser, Sentinel};
use crate::jne::error::Error;

/// Field path reported for errors on the parsed value itself.
const ROOT_FIELD: &str = "$";

/// Represents a JNE attribute value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Signed 64-bit integer.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    String(String),
    /// Boolean value.
    Boolean(bool),
    /// Null value.
    Null,
    /// Converted date field.
    Date(NaiveDate),
    /// Converted datetime field.
    DateTime(NaiveDateTime),
    /// Derived amount.
    Decimal(Decimal),
    /// Nested section.
    Entity(Box<Entity>),
    /// Nested list section.
    List(EntityList),
    /// Array or object with no declared parser, kept as received.
    Json(JsonValue),
}

impl Value {
    /// Convert a raw JSON value without any declared parser.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Boolean(*b),
            JsonValue::Number(number) => {
                if let Some(i) = number.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(number.as_f64().unwrap_or(f64::NAN))
                }
            }
            JsonValue::String(s) => Value::String(s.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => Value::Json(value.clone()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&Entity> {
        match self {
            Value::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&EntityList> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }
}

/// Attribute name as sent by the API.
pub type Attribute = String;

/// JNE record with attribute values.
///
/// Attributes are exactly the keys present in the source object. Looking up a
/// key the API did not send gives `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entity {
    #[serde(skip)]
    kind: EntityKind,
    attributes: HashMap<Attribute, Value>,
}

impl Entity {
    /// Create a new empty entity of `kind`.
    pub fn new(kind: EntityKind) -> Self {
        Entity {
            kind,
            attributes: HashMap::new(),
        }
    }

    /// Parse a JSON object into an entity of `kind`.
    ///
    /// Declared fields go through their parser; every other key is stored as
    /// received. Missing keys are never an error.
    pub fn parse(kind: EntityKind, json: &JsonValue) -> Result<Self, Error> {
        parse_object(kind, json, ROOT_FIELD)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Raw or converted attribute value, `None` if the key was not sent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn attributes(&self) -> &HashMap<Attribute, Value> {
        &self.attributes
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(Value::as_bool)
    }

    pub fn get_date(&self, key: &str) -> Option<NaiveDate> {
        self.get(key).and_then(Value::as_date)
    }

    pub fn get_datetime(&self, key: &str) -> Option<NaiveDateTime> {
        self.get(key).and_then(Value::as_datetime)
    }

    pub fn get_entity(&self, key: &str) -> Option<&Entity> {
        self.get(key).and_then(Value::as_entity)
    }

    pub fn get_list(&self, key: &str) -> Option<&EntityList> {
        self.get(key).and_then(Value::as_list)
    }

    /// True if this record is the placeholder row its kind uses for "none declared".
    pub fn is_empty_item(&self) -> bool {
        let Some(empty_item) = self.kind.empty_item() else {
            return false;
        };
        match (self.get(empty_item.field), empty_item.sentinel) {
            (Some(Value::String(flag)), Sentinel::Text(sentinel)) => flag == sentinel,
            (Some(Value::Int(flag)), Sentinel::Int(sentinel)) => *flag == sentinel,
            _ => false,
        }
    }

    /// Compute the derived attribute `name` declared for this kind.
    ///
    /// Returns `None` when the kind declares no such field or its sources do not
    /// hold a readable value.
    pub fn derived(&self, name: &str) -> Option<Value> {
        let field = self.kind.derived_field(name)?;
        match field.rule {
            Derivation::Year { source, ongoing } => {
                self.year_from(source, ongoing).map(|y| Value::Int(i64::from(y)))
            }
            Derivation::DecimalSum { sources } => self.decimal_sum(sources).map(Value::Decimal),
        }
    }

    /// Derived year, see [`Entity::derived`].
    pub fn derived_year(&self, name: &str) -> Option<i32> {
        self.derived(name)
            .and_then(|value| value.as_i64())
            .and_then(|y| i32::try_from(y).ok())
    }

    /// Derived amount, see [`Entity::derived`].
    pub fn derived_decimal(&self, name: &str) -> Option<Decimal> {
        self.derived(name).and_then(|value| value.as_decimal())
    }

    fn year_from(&self, source: &str, ongoing: Option<&str>) -> Option<i32> {
        match self.get(source)? {
            Value::String(raw) => {
                let raw = raw.trim();
                if ongoing == Some(raw) {
                    return None;
                }
                raw.parse::<i32>().ok()
            }
            Value::Int(i) => i32::try_from(*i).ok(),
            _ => None,
        }
    }

    fn decimal_sum(&self, sources: &[&str]) -> Option<Decimal> {
        let mut amounts = sources
            .iter()
            .filter_map(|source| self.get(source).and_then(amount));
        let first = amounts.next()?;
        amounts.try_fold(first, |total, value| total.checked_add(value))
    }
}

fn amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Int(i) => Some(Decimal::from(*i)),
        Value::Float(f) => Decimal::try_from(*f).ok(),
        Value::Decimal(d) => Some(*d),
        Value::String(s) => Decimal::from_str(&s.trim().replace(',', "")).ok(),
        _ => None,
    }
}

/// Ordered entities of one kind with the number of items parsed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityList {
    #[serde(skip)]
    kind: EntityKind,
    items: Vec<Entity>,
    total: usize,
}

impl EntityList {
    /// Create a new empty list of `kind`.
    pub fn new(kind: EntityKind) -> Self {
        EntityList {
            kind,
            items: Vec::new(),
            total: 0,
        }
    }

    /// Parse a JSON array into a list of `kind`. Absent or null input is an empty list.
    pub fn parse(kind: EntityKind, json: Option<&JsonValue>) -> Result<Self, Error> {
        parse_items(kind, json, ROOT_FIELD)
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Number of items parsed, independent of any later filtering.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entity> {
        self.items.get(index)
    }

    pub fn first(&self) -> Option<&Entity> {
        self.items.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entity> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<Entity> {
        self.items
    }

    /// Items that are not the kind's placeholder row.
    ///
    /// Kinds without an empty-item declaration keep every item.
    pub fn exclude_empty_item(&self) -> Vec<&Entity> {
        self.items.iter().filter(|item| !item.is_empty_item()).collect()
    }
}

impl<'a> IntoIterator for &'a EntityList {
    type Item = &'a Entity;
    type IntoIter = std::slice::Iter<'a, Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for EntityList {
    type Item = Entity;
    type IntoIter = std::vec::IntoIter<Entity>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

fn parse_object(kind: EntityKind, json: &JsonValue, field: &str) -> Result<Entity, Error> {
    let record = json.as_object().ok_or_else(|| Error::Shape {
        kind: kind.name(),
        field: field.to_string(),
        expected: "object",
    })?;

    let mut entity = Entity::new(kind);
    for (key, value) in record {
        let parsed = match kind.field_parser(key) {
            Some(parser) => apply_parser(kind, parser, key, value)?,
            None => Value::from_json(value),
        };
        entity.attributes.insert(key.clone(), parsed);
    }

    Ok(entity)
}

fn parse_items(kind: EntityKind, json: Option<&JsonValue>, field: &str) -> Result<EntityList, Error> {
    let items = match json {
        None | Some(JsonValue::Null) => return Ok(EntityList::new(kind)),
        Some(JsonValue::Array(items)) => items,
        Some(_) => {
            return Err(Error::Shape {
                kind: kind.name(),
                field: field.to_string(),
                expected: "array",
            });
        }
    };

    let mut results = EntityList::new(kind);
    for item in items {
        results.items.push(parse_object(kind, item, field)?);
        results.total += 1;
    }

    log::trace!("parsed {} {} item(s)", results.total, kind);
    Ok(results)
}

fn apply_parser(
    owner: EntityKind,
    parser: FieldParser,
    key: &str,
    value: &JsonValue,
) -> Result<Value, Error> {
    match parser {
        FieldParser::Date(format) => {
            let raw = date_text(owner, key, value)?;
            let parsed = parse_date(raw, format).map_err(|source| Error::Format {
                field: key.to_string(),
                source,
            })?;
            Ok(parsed.map_or(Value::Null, Value::Date))
        }
        FieldParser::DateTime(format) => {
            let raw = date_text(owner, key, value)?;
            let parsed = parse_datetime(raw, format).map_err(|source| Error::Format {
                field: key.to_string(),
                source,
            })?;
            Ok(parsed.map_or(Value::Null, Value::DateTime))
        }
        FieldParser::Nested(kind) => {
            if value.is_null() {
                return Ok(Value::Null);
            }
            parse_object(kind, value, key).map(|entity| Value::Entity(Box::new(entity)))
        }
        FieldParser::NestedList(kind) => parse_items(kind, Some(value), key).map(Value::List),
    }
}

fn date_text<'a>(owner: EntityKind, key: &str, value: &'a JsonValue) -> Result<Option<&'a str>, Error> {
    match value {
        JsonValue::Null => Ok(None),
        JsonValue::String(s) => Ok(Some(s)),
        _ => Err(Error::Shape {
            kind: owner.name(),
            field: key.to_string(),
            expected: "date string",
        }),
    }
}
