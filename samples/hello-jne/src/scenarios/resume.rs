use jne_plataforma_electoral_client::LogLevel;
use jne_plataforma_electoral_client::jne::ServiceClient;

use crate::config::Settings;

pub async fn run(client: &ServiceClient, settings: &Settings) -> Result<(), String> {
    if settings.resume_id == 0 {
        return Ok(());
    }
    println!("Scenario: resume");

    let Some(resume) = client
        .get_resume(
            settings.resume_id,
            settings.election_process,
            settings.political_organization,
        )
        .await
        .map_err(|e| e.to_string())?
    else {
        println!("No resume returned");
        return Ok(());
    };

    if let Some(personal) = resume.get_entity("oDatosPersonales") {
        println!(
            "Candidate: {} {}",
            personal.get_str("strNombres").unwrap_or_default(),
            personal.get_str("strApellidoPaterno").unwrap_or_default()
        );
    }

    if let Some(jobs) = resume.get_list("lExperienciaLaboral") {
        for job in jobs.exclude_empty_item() {
            let end = job
                .derived_year("end_year")
                .map(|y| y.to_string())
                .unwrap_or_else(|| "present".to_string());
            println!(
                "Job: {} ({} - {})",
                job.get_str("strCentroTrabajo").unwrap_or_default(),
                job.derived_year("start_year").map(|y| y.to_string()).unwrap_or_default(),
                end
            );
        }
    }

    if settings.log_level == LogLevel::Debug {
        let json = serde_json::to_string_pretty(&resume).map_err(|e| e.to_string())?;
        println!("{}", json);
    }

    Ok(())
}
