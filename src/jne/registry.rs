use crate::jne::entitykind::EntityKind;
use crate::jne::error::Error;

/// Look up the entity kind responsible for a payload type name.
pub fn resolve(payload_type: &str) -> Result<EntityKind, Error> {
    EntityKind::ALL
        .iter()
        .copied()
        .find(|kind| kind.name() == payload_type)
        .ok_or_else(|| Error::UnknownPayloadType(payload_type.to_string()))
}

/// Fail on the first name in `payload_types` without a registered kind.
pub fn ensure_registered<'a, I>(payload_types: I) -> Result<(), Error>
where
    I: IntoIterator<Item = &'a str>,
{
    for payload_type in payload_types {
        resolve(payload_type)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const API_PAYLOAD_TYPES: &[&str] = &[
        "election_process",
        "election_type",
        "electoral_district",
        "file",
        "file_extended",
        "candidate",
        "resume",
        "personal_info",
        "penal_sentence",
        "obligation_sentence",
        "university_education",
        "postgraduate_education",
        "immovable_property",
        "movable_property",
        "basic_education",
        "non_university_education",
        "technical_education",
        "additional_information",
        "professional_experience",
        "partisan_position",
        "resignation_political_organization",
    ];

    #[test]
    fn every_api_payload_type_resolves() {
        for name in API_PAYLOAD_TYPES {
            let kind = resolve(name).unwrap();
            assert_eq!(kind.name(), *name);
        }
        assert!(ensure_registered(API_PAYLOAD_TYPES.iter().copied()).is_ok());
    }

    #[test]
    fn unknown_payload_type_is_reported_by_name() {
        let err = resolve("bogus").unwrap_err();
        assert!(matches!(&err, Error::UnknownPayloadType(name) if name == "bogus"));
        assert_eq!(err.to_string(), "No entity for this payload type: bogus");
        assert!(resolve("Resume").is_err());
    }

    #[test]
    fn ensure_registered_stops_at_first_miss() {
        let err = ensure_registered(["resume", "nope", "also_nope"]).unwrap_err();
        assert!(matches!(err, Error::UnknownPayloadType(name) if name == "nope"));
    }
}
