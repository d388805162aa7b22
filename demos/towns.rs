use anyhow::Result;
use aemet_opendata::Client;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Example program that calls the library API.
    // Configure the key via AEMET_API_KEY or an `.aemetrc` file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("aemet_opendata=debug")),
        )
        .init();

    let mut client = Client::from_env()?;
    client.set_debug(std::env::var_os("AEMET_DEBUG").is_some());

    let town_id = std::env::args().nth(1).unwrap_or_else(|| "28079".to_string());
    match client.get_town(&town_id)? {
        Some(town) => println!("{town:#}"),
        None => eprintln!("empty response for town {town_id}"),
    }

    if let Some(Some(n)) = client.get_towns()?.map(|v| v.as_array().map(Vec::len)) {
        println!("{n} towns listed");
    }

    Ok(())
}
