mod config;
mod scenarios;

use jne_plataforma_electoral_client::jne::ServiceClient;

use config::load_settings;

#[tokio::main]
async fn main() -> Result<(), String> {
    let settings = load_settings()?;

    let client = ServiceClient::new(&settings.base_url, settings.log_level);

    scenarios::processes::run(&client, &settings).await?;
    scenarios::resume::run(&client, &settings).await?;

    Ok(())
}
