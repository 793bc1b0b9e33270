use std::str::FromStr;

use chrono::{NaiveDate, Timelike};
use jne_plataforma_electoral_client::jne::{EntityKind, Payload, Value, parse_response};
use rust_decimal::Decimal;

fn load_fixture(name: &str) -> serde_json::Value {
    let body = std::fs::read_to_string(format!("tests/fixtures/{}", name)).unwrap();
    serde_json::from_str(&body).unwrap()
}

#[test]
fn parse_election_processes() {
    let envelope = load_fixture("election_processes.json");
    let list = parse_response(&envelope, Some("election_process"), true)
        .unwrap()
        .and_then(Payload::into_list)
        .unwrap();

    assert_eq!(list.total(), 3);
    assert_eq!(list.kind(), EntityKind::ElectionProcess);

    let real = list.exclude_empty_item();
    assert_eq!(real.len(), 2);
    assert_eq!(real[0].get_i64("idProcesoElectoral"), Some(110));
    assert_eq!(
        real[0].get_date("strFechaAperturaProceso"),
        NaiveDate::from_ymd_opt(2020, 7, 9)
    );
    assert_eq!(real[0].get("strFechaCierreProceso"), Some(&Value::Null));
    assert_eq!(real[1].get_datetime("strFechaRegistro").unwrap().hour(), 17);
}

#[test]
fn parse_resume_sections() {
    let envelope = load_fixture("resume.json");
    let resume = parse_response(&envelope, Some("resume"), false)
        .unwrap()
        .and_then(Payload::into_entity)
        .unwrap();

    let personal = resume.get_entity("oDatosPersonales").unwrap();
    assert_eq!(personal.kind(), EntityKind::PersonalInfo);
    assert_eq!(
        personal.get_date("strFechaNacimiento"),
        NaiveDate::from_ymd_opt(1968, 3, 21)
    );
    assert_eq!(
        personal.get_datetime("strFeTerminoRegistro").map(|dt| dt.hour()),
        Some(18)
    );

    let jobs = resume.get_list("lExperienciaLaboral").unwrap();
    assert_eq!(jobs.exclude_empty_item().len(), 2);
    assert_eq!(jobs.get(0).unwrap().derived_year("end_year"), None);
    assert_eq!(jobs.get(0).unwrap().derived_year("start_year"), Some(2015));
    assert_eq!(jobs.get(1).unwrap().derived_year("end_year"), Some(2014));

    let university = resume.get_list("lEduUniversitaria").unwrap();
    let degree = university.first().unwrap();
    assert_eq!(degree.derived_year("bachelor_year"), Some(1992));
    assert_eq!(degree.derived_year("title_year"), None);

    let postgraduate = resume.get_entity("oEduPosgrago").unwrap();
    assert_eq!(postgraduate.derived_year("year"), Some(2012));
    assert!(!postgraduate.is_empty_item());
    assert!(resume.get_entity("oEduTecnico").unwrap().is_empty_item());

    let penal = resume.get_list("lSentenciaPenal").unwrap();
    assert_eq!(penal.total(), 1);
    assert!(penal.exclude_empty_item().is_empty());

    assert_eq!(resume.get_list("lSentenciaObliga").unwrap().total(), 0);
    assert_eq!(resume.get_list("lRenunciaOP").unwrap().total(), 0);
    assert!(resume.get_list("lBienMueble").unwrap().exclude_empty_item().is_empty());
    assert!(resume.get_list("lCargoEleccion").unwrap().exclude_empty_item().is_empty());
    assert_eq!(resume.get_list("lBienInmueble").unwrap().exclude_empty_item().len(), 2);
    assert_eq!(resume.get_list("lCargoPartidario").unwrap().first().unwrap().derived_year("end_year"), Some(2020));

    let income = resume.get_entity("oIngresos").unwrap();
    assert_eq!(income.derived_decimal("total_public"), Some(Decimal::from(84000)));
    assert_eq!(income.derived_decimal("total_private"), Decimal::from_str("12000.50").ok());
    assert_eq!(income.derived_decimal("total"), Decimal::from_str("96000.50").ok());

    assert_eq!(
        resume.get_entity("oInfoAdicional").unwrap().get_str("strInfoAdicional"),
        Some("NINGUNA")
    );
}

#[test]
fn parse_file_extended() {
    let envelope = load_fixture("file_extended.json");
    let file = parse_response(&envelope, Some("file_extended"), false)
        .unwrap()
        .and_then(Payload::into_entity)
        .unwrap();

    let expediente = file.get_entity("oExpediente").unwrap();
    assert_eq!(expediente.get_str("strCodExpedienteExt"), Some("EG.2021001234"));
    assert_eq!(expediente.get_list("lParteProcesal").unwrap().total(), 1);

    let documents = file.get_list("lReporteBusquedaExpediente").unwrap();
    assert_eq!(documents.kind(), EntityKind::Document);
    assert_eq!(documents.total(), 2);
    // no conversion declared for documents
    assert_eq!(
        documents.first().unwrap().get_str("strFechaDocumento"),
        Some("20/12/2020")
    );

    let candidates = file.get_list("lCandidatosExpediente").unwrap();
    let birth = candidates.first().unwrap().get_datetime("strFechaNacimiento").unwrap();
    assert_eq!(birth.date(), NaiveDate::from_ymd_opt(1968, 3, 21).unwrap());
    assert_eq!(birth.hour(), 0);

    assert!(file.get_list("lAsociadosPadre").unwrap().is_empty());
    assert!(file.get_list("lAsociadosHijos").unwrap().is_empty());
}

#[test]
fn entity_kind_round_trips_through_registry_name() {
    for kind in EntityKind::ALL {
        assert_eq!(kind.name().parse::<EntityKind>().unwrap(), kind);
    }
}
