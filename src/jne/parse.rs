use serde_json::Value;

use crate::jne::entity::{Entity, EntityList};
use crate::jne::error::Error;
use crate::jne::registry;

/// Parsed `data` member of a response envelope.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Entity(Entity),
    List(EntityList),
}

impl Payload {
    pub fn into_entity(self) -> Option<Entity> {
        match self {
            Payload::Entity(entity) => Some(entity),
            Payload::List(_) => None,
        }
    }

    pub fn into_list(self) -> Option<EntityList> {
        match self {
            Payload::List(list) => Some(list),
            Payload::Entity(_) => None,
        }
    }
}

/// Parse the `data` member of a decoded envelope.
///
/// Returns `Ok(None)` when no payload type is given, or when a single object is
/// expected and `data` is absent or null. A missing list is an empty list.
pub fn parse_response(
    envelope: &Value,
    payload_type: Option<&str>,
    payload_list: bool,
) -> Result<Option<Payload>, Error> {
    let Some(payload_type) = payload_type else {
        return Ok(None);
    };
    let kind = registry::resolve(payload_type)?;

    let data = envelope.get("data");
    if payload_list {
        return EntityList::parse(kind, data).map(|list| Some(Payload::List(list)));
    }

    match data {
        None | Some(Value::Null) => Ok(None),
        Some(data) => Entity::parse(kind, data).map(|entity| Some(Payload::Entity(entity))),
    }
}

/// Envelope parser used by the service client.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityParser;

impl EntityParser {
    pub fn new() -> Self {
        EntityParser
    }

    /// See [`parse_response`].
    pub fn parse(
        &self,
        envelope: &Value,
        payload_type: Option<&str>,
        payload_list: bool,
    ) -> Result<Option<Payload>, Error> {
        parse_response(envelope, payload_type, payload_list)
    }
}
