use jne_plataforma_electoral_client::jne::ServiceClient;

use crate::config::Settings;

pub async fn run(client: &ServiceClient, settings: &Settings) -> Result<(), String> {
    println!("Scenario: election processes");

    let processes = client
        .get_election_processes()
        .await
        .map_err(|e| e.to_string())?;
    println!(
        "Election processes: {} ({} excluding placeholder)",
        processes.total(),
        processes.exclude_empty_item().len()
    );

    let types = client
        .get_election_types_by_process(settings.election_process)
        .await
        .map_err(|e| e.to_string())?;
    for election_type in &types {
        if let Some(name) = election_type.get_str("strTipoEleccion") {
            println!("Election type: {}", name);
        }
    }

    Ok(())
}
