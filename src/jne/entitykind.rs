use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::jne::datetime::{DEFAULT_DATE_FORMAT, DEFAULT_DATETIME_FORMAT, MERIDIEM_DATETIME_FORMAT};
use crate::jne::error::Error;
use crate::jne::registry;

/// Every JSON shape the Plataforma Electoral API returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    ElectionProcess,
    ElectionType,
    ElectoralDistrict,
    File,
    FileExtended,
    ProceduralPart,
    Document,
    Candidate,
    Resume,
    PersonalInfo,
    PenalSentence,
    ObligationSentence,
    UniversityEducation,
    PostgraduateEducation,
    ImmovableProperty,
    MovableProperty,
    BasicEducation,
    NonUniversityEducation,
    TechnicalEducation,
    AdditionalInformation,
    ProfessionalExperience,
    PartisanPosition,
    ElectedPosition,
    ResignationPoliticalOrganization,
    Income,
}

/// Conversion applied to a declared attribute instead of storing the raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldParser {
    /// Date string in the given format.
    Date(&'static str),
    /// Datetime string in the given format.
    DateTime(&'static str),
    /// Nested object of the given kind.
    Nested(EntityKind),
    /// Nested array of the given kind.
    NestedList(EntityKind),
}

/// Flag value marking a placeholder row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    Text(&'static str),
    Int(i64),
}

/// Which attribute flags a placeholder row and the value that means "none declared".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyItem {
    pub field: &'static str,
    pub sentinel: Sentinel,
}

/// Rule used to compute a derived attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derivation {
    /// Integer year read from `source`. `ongoing` is a raw value meaning "no year".
    Year {
        source: &'static str,
        ongoing: Option<&'static str>,
    },
    /// Decimal sum of whichever `sources` hold a readable amount.
    DecimalSum { sources: &'static [&'static str] },
}

/// A named read-only attribute computed on access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedField {
    pub name: &'static str,
    pub rule: Derivation,
}

const NONE_DECLARED: &str = "2";

const fn flagged(field: &'static str) -> Option<EmptyItem> {
    Some(EmptyItem {
        field,
        sentinel: Sentinel::Text(NONE_DECLARED),
    })
}

const fn year(name: &'static str, source: &'static str) -> DerivedField {
    DerivedField {
        name,
        rule: Derivation::Year {
            source,
            ongoing: None,
        },
    }
}

const ELECTION_PROCESS_FIELDS: &[(&str, FieldParser)] = &[
    ("strFechaAperturaProceso", FieldParser::Date(DEFAULT_DATE_FORMAT)),
    ("strFechaConvocatoria", FieldParser::Date(DEFAULT_DATE_FORMAT)),
    ("strFechaCierreProceso", FieldParser::Date(DEFAULT_DATE_FORMAT)),
    ("strFechaRegistro", FieldParser::DateTime(MERIDIEM_DATETIME_FORMAT)),
];

const CANDIDATE_FIELDS: &[(&str, FieldParser)] = &[(
    "strFechaNacimiento",
    FieldParser::DateTime(MERIDIEM_DATETIME_FORMAT),
)];

const PERSONAL_INFO_FIELDS: &[(&str, FieldParser)] = &[
    ("strFeTerminoRegistro", FieldParser::DateTime(DEFAULT_DATETIME_FORMAT)),
    ("strFechaNacimiento", FieldParser::Date(DEFAULT_DATE_FORMAT)),
];

const FILE_FIELDS: &[(&str, FieldParser)] = &[(
    "lParteProcesal",
    FieldParser::NestedList(EntityKind::ProceduralPart),
)];

const FILE_EXTENDED_FIELDS: &[(&str, FieldParser)] = &[
    ("oExpediente", FieldParser::Nested(EntityKind::File)),
    ("lReporteBusquedaExpediente", FieldParser::NestedList(EntityKind::Document)),
    ("lCandidatosExpediente", FieldParser::NestedList(EntityKind::Candidate)),
    ("lAsociadosPadre", FieldParser::NestedList(EntityKind::File)),
    ("lAsociadosHijos", FieldParser::NestedList(EntityKind::File)),
];

const RESUME_FIELDS: &[(&str, FieldParser)] = &[
    ("lBienInmueble", FieldParser::NestedList(EntityKind::ImmovableProperty)),
    ("lBienMueble", FieldParser::NestedList(EntityKind::MovableProperty)),
    ("lCargoPartidario", FieldParser::NestedList(EntityKind::PartisanPosition)),
    ("lCargoEleccion", FieldParser::NestedList(EntityKind::ElectedPosition)),
    ("lEduUniversitaria", FieldParser::NestedList(EntityKind::UniversityEducation)),
    ("lExperienciaLaboral", FieldParser::NestedList(EntityKind::ProfessionalExperience)),
    (
        "lRenunciaOP",
        FieldParser::NestedList(EntityKind::ResignationPoliticalOrganization),
    ),
    ("lSentenciaObliga", FieldParser::NestedList(EntityKind::ObligationSentence)),
    ("lSentenciaPenal", FieldParser::NestedList(EntityKind::PenalSentence)),
    ("oDatosPersonales", FieldParser::Nested(EntityKind::PersonalInfo)),
    ("oEduBasica", FieldParser::Nested(EntityKind::BasicEducation)),
    ("oEduNoUniversitaria", FieldParser::Nested(EntityKind::NonUniversityEducation)),
    // upstream spelling
    ("oEduPosgrago", FieldParser::Nested(EntityKind::PostgraduateEducation)),
    ("oEduTecnico", FieldParser::Nested(EntityKind::TechnicalEducation)),
    ("oInfoAdicional", FieldParser::Nested(EntityKind::AdditionalInformation)),
    ("oIngresos", FieldParser::Nested(EntityKind::Income)),
];

const EXPERIENCE_DERIVED: &[DerivedField] = &[
    year("start_year", "strAnioTrabajoDesde"),
    DerivedField {
        name: "end_year",
        rule: Derivation::Year {
            source: "strAnioTrabajoHasta",
            ongoing: Some("0000"),
        },
    },
];

const PARTISAN_POSITION_DERIVED: &[DerivedField] = &[
    year("start_year", "strAnioCargoPartiDesde"),
    year("end_year", "strAnioCargoPartiHasta"),
];

const ELECTED_POSITION_DERIVED: &[DerivedField] = &[
    year("start_year", "strAnioCargoElecDesde"),
    year("end_year", "strAnioCargoElecHasta"),
];

const UNIVERSITY_DERIVED: &[DerivedField] = &[
    year("bachelor_year", "strAnioBachiller"),
    year("title_year", "strAnioTitulo"),
];

const POSTGRADUATE_DERIVED: &[DerivedField] = &[year("year", "strAnioPosgrado")];

const PUBLIC_INCOME: &[&str] = &[
    "decRemuBrutaPublico",
    "decRentaIndividualPublico",
    "decOtroIngresoPublico",
];

const PRIVATE_INCOME: &[&str] = &[
    "decRemuBrutaPrivado",
    "decRentaIndividualPrivado",
    "decOtroIngresoPrivado",
];

const ALL_INCOME: &[&str] = &[
    "decRemuBrutaPublico",
    "decRentaIndividualPublico",
    "decOtroIngresoPublico",
    "decRemuBrutaPrivado",
    "decRentaIndividualPrivado",
    "decOtroIngresoPrivado",
];

const INCOME_DERIVED: &[DerivedField] = &[
    DerivedField {
        name: "total_public",
        rule: Derivation::DecimalSum {
            sources: PUBLIC_INCOME,
        },
    },
    DerivedField {
        name: "total_private",
        rule: Derivation::DecimalSum {
            sources: PRIVATE_INCOME,
        },
    },
    DerivedField {
        name: "total",
        rule: Derivation::DecimalSum {
            sources: ALL_INCOME,
        },
    },
];

impl EntityKind {
    /// All kinds, in registry order.
    pub const ALL: [EntityKind; 25] = [
        EntityKind::ElectionProcess,
        EntityKind::ElectionType,
        EntityKind::ElectoralDistrict,
        EntityKind::File,
        EntityKind::FileExtended,
        EntityKind::ProceduralPart,
        EntityKind::Document,
        EntityKind::Candidate,
        EntityKind::Resume,
        EntityKind::PersonalInfo,
        EntityKind::PenalSentence,
        EntityKind::ObligationSentence,
        EntityKind::UniversityEducation,
        EntityKind::PostgraduateEducation,
        EntityKind::ImmovableProperty,
        EntityKind::MovableProperty,
        EntityKind::BasicEducation,
        EntityKind::NonUniversityEducation,
        EntityKind::TechnicalEducation,
        EntityKind::AdditionalInformation,
        EntityKind::ProfessionalExperience,
        EntityKind::PartisanPosition,
        EntityKind::ElectedPosition,
        EntityKind::ResignationPoliticalOrganization,
        EntityKind::Income,
    ];

    /// Payload type name used by the registry.
    pub const fn name(self) -> &'static str {
        match self {
            EntityKind::ElectionProcess => "election_process",
            EntityKind::ElectionType => "election_type",
            EntityKind::ElectoralDistrict => "electoral_district",
            EntityKind::File => "file",
            EntityKind::FileExtended => "file_extended",
            EntityKind::ProceduralPart => "procedural_part",
            EntityKind::Document => "document",
            EntityKind::Candidate => "candidate",
            EntityKind::Resume => "resume",
            EntityKind::PersonalInfo => "personal_info",
            EntityKind::PenalSentence => "penal_sentence",
            EntityKind::ObligationSentence => "obligation_sentence",
            EntityKind::UniversityEducation => "university_education",
            EntityKind::PostgraduateEducation => "postgraduate_education",
            EntityKind::ImmovableProperty => "immovable_property",
            EntityKind::MovableProperty => "movable_property",
            EntityKind::BasicEducation => "basic_education",
            EntityKind::NonUniversityEducation => "non_university_education",
            EntityKind::TechnicalEducation => "technical_education",
            EntityKind::AdditionalInformation => "additional_information",
            EntityKind::ProfessionalExperience => "professional_experience",
            EntityKind::PartisanPosition => "partisan_position",
            EntityKind::ElectedPosition => "elected_position",
            EntityKind::ResignationPoliticalOrganization => {
                "resignation_political_organization"
            }
            EntityKind::Income => "income",
        }
    }

    /// Attributes converted during parsing. Anything else is stored as received.
    pub fn field_parsers(self) -> &'static [(&'static str, FieldParser)] {
        match self {
            EntityKind::ElectionProcess => ELECTION_PROCESS_FIELDS,
            EntityKind::Candidate => CANDIDATE_FIELDS,
            EntityKind::PersonalInfo => PERSONAL_INFO_FIELDS,
            EntityKind::File => FILE_FIELDS,
            EntityKind::FileExtended => FILE_EXTENDED_FIELDS,
            EntityKind::Resume => RESUME_FIELDS,
            _ => &[],
        }
    }

    /// Parser declared for `key`, if any.
    pub fn field_parser(self, key: &str) -> Option<FieldParser> {
        self.field_parsers()
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, parser)| *parser)
    }

    /// Placeholder-row declaration for kinds whose section may be declared empty.
    pub const fn empty_item(self) -> Option<EmptyItem> {
        match self {
            EntityKind::ElectionProcess => Some(EmptyItem {
                field: "idProcesoElectoral",
                sentinel: Sentinel::Int(0),
            }),
            EntityKind::ImmovableProperty => flagged("strTengoInmueble"),
            EntityKind::MovableProperty => flagged("strTengoBienMueble"),
            EntityKind::BasicEducation => flagged("strTengoEduBasica"),
            EntityKind::UniversityEducation => flagged("strTengoEduUniversitaria"),
            EntityKind::NonUniversityEducation => flagged("strTengoNoUniversitaria"),
            EntityKind::TechnicalEducation => flagged("strTengoEduTecnico"),
            EntityKind::PostgraduateEducation => flagged("strTengoPosgrado"),
            EntityKind::PenalSentence => flagged("strTengoSentenciaPenal"),
            EntityKind::ObligationSentence => flagged("strTengoSentenciaObliga"),
            EntityKind::PartisanPosition => flagged("strTengoCargoPartidario"),
            EntityKind::ElectedPosition => flagged("strTengoCargoEleccion"),
            EntityKind::ProfessionalExperience => flagged("strTengoExpeLaboral"),
            EntityKind::Income => flagged("strTengoIngresos"),
            _ => None,
        }
    }

    /// Attributes computed on access.
    pub fn derived_fields(self) -> &'static [DerivedField] {
        match self {
            EntityKind::ProfessionalExperience => EXPERIENCE_DERIVED,
            EntityKind::PartisanPosition => PARTISAN_POSITION_DERIVED,
            EntityKind::ElectedPosition => ELECTED_POSITION_DERIVED,
            EntityKind::UniversityEducation => UNIVERSITY_DERIVED,
            EntityKind::PostgraduateEducation => POSTGRADUATE_DERIVED,
            EntityKind::Income => INCOME_DERIVED,
            _ => &[],
        }
    }

    /// Derived field declared under `name`, if any.
    pub fn derived_field(self, name: &str) -> Option<&'static DerivedField> {
        self.derived_fields().iter().find(|field| field.name == name)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EntityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        registry::resolve(s)
    }
}
