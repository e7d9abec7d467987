use gamerec_api::services::discovery::sample_discovery;
use gamerec_api::services::providers::steam::{parse_profile_url, SteamProvider};
use gamerec_api::services::recommender::recommend_for_user;
use gamerec_api::{AppError, Catalog, Config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;

    let profile_url = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("Usage: gamerec-api <steam profile url>"))?;
    let profile_ref = parse_profile_url(&profile_url)?;

    let catalog = Catalog::load(&config.data_dir)?;
    let provider = SteamProvider::new(config.steam_api_key.clone(), config.steam_api_url.clone());

    match recommend_for_user(&provider, &catalog, &profile_ref, config.recommendation_count).await {
        Ok(result) => {
            let who = result.persona.as_deref().unwrap_or(&result.steamid);
            println!("Recommendations for {}:", who);
            for (rank, rec) in result.recommendations.iter().enumerate() {
                println!("{:>3}. {}  (score {:.3}, appid {})", rank + 1, rec.name, rec.score, rec.appid);
            }

            let discoveries = sample_discovery(
                &catalog,
                &result.owned_appids,
                config.discovery_count,
                config.discovery_power,
                &mut rand::thread_rng(),
            )?;
            if !discoveries.is_empty() {
                println!("\nSomething different:");
                for item in &discoveries {
                    println!("  - {}  (appid {})", item.name, item.appid);
                }
            }
        }
        Err(AppError::InsufficientData(reason)) => {
            // A distinct outcome, not a failure: fall back to discovery only.
            println!("Cannot personalize: {}", reason);
            let discoveries = sample_discovery(
                &catalog,
                &Default::default(),
                config.discovery_count,
                config.discovery_power,
                &mut rand::thread_rng(),
            )?;
            println!("\nSomething to try anyway:");
            for item in &discoveries {
                println!("  - {}  (appid {})", item.name, item.appid);
            }
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
