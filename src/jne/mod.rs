/// Date and datetime normalisation for JNE string formats.
pub mod datetime;
/// Generic entity records, attribute values and result sets.
pub mod entity;
/// Per-kind parsing tables: field conversions, nested sections, empty items, derived fields.
pub mod entitykind;
/// Crate error type.
pub mod error;
/// Envelope parsing.
pub mod parse;
/// Payload type name lookup.
pub mod registry;
/// HTTP client for the Plataforma Electoral API.
pub mod serviceclient;

pub use self::entity::{Entity, EntityList, Value};
pub use self::entitykind::EntityKind;
pub use self::error::Error;
pub use self::parse::{EntityParser, Payload, parse_response};
pub use self::serviceclient::{FileSearch, Operation, ServiceClient};
