use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password};
use market_core::{Config, ContextAggregator, ContextRequest, MarketContext, ProviderId};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "market", version, about = "Market context and fashion trend CLI")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name: "openweather", "weatherapi" or "socialblade".
        provider: String,
    },

    /// Show the market context for an IP address or a place name.
    Context {
        /// IP address or location name.
        identifier: String,

        /// Brand handle to pull social stats for.
        #[arg(long)]
        handle: Option<String>,

        /// Seed for the synthetic fallbacks.
        #[arg(long)]
        seed: Option<u64>,

        /// Print the raw JSON record.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Context {
                identifier,
                handle,
                seed,
                json,
            } => {
                let mut config = Config::load()?;
                config.apply_env_overrides()?;
                if seed.is_some() {
                    config.seed = seed;
                }

                let aggregator = ContextAggregator::from_config(&config)?;
                let request = ContextRequest { identifier, handle };
                let context = aggregator.aggregate(&request).await;

                if json {
                    let out = serde_json::to_string_pretty(&context)
                        .context("Failed to serialize market context")?;
                    println!("{out}");
                } else {
                    print_summary(&context);
                }
                Ok(())
            }
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.upsert_provider_api_key(id, api_key.trim().to_string());

    let is_default = config.default_provider_id().ok() == Some(id);
    if id.is_weather() && !is_default {
        let make_default = Confirm::new(&format!("Use {id} as the default weather provider?"))
            .with_default(false)
            .prompt()
            .context("Failed to read answer")?;
        if make_default {
            config.set_default_provider(id);
        }
    }

    config.save()?;
    println!(
        "Saved {id} credentials to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

fn print_summary(ctx: &MarketContext) {
    let place = &ctx.place;
    let weather = &ctx.weather;

    println!("{}, {} ({:.2}, {:.2})", place.city, place.country, place.latitude, place.longitude);
    println!(
        "{} {} {:.0}°C, humidity {}%, wind {:.1} m/s",
        weather.icon(),
        weather.condition,
        weather.temperature,
        weather.humidity,
        weather.wind
    );
    println!("Trend:  {}", ctx.trend);
    println!("Season: {}", ctx.season);

    if let Some(social) = &ctx.social {
        println!(
            "@{}: {} followers, {:.2}% engagement, {} posts",
            social.handle, social.followers, social.engagement_rate, social.media_count
        );
        let post = &social.recent_post;
        println!(
            "  recent post: {} likes, {} comments, reach {}",
            post.likes, post.comments, post.reach
        );
        if !post.hashtags.is_empty() {
            println!("  hashtags: {}", post.hashtags.join(" "));
        }
        println!("  latest campaign: {}", social.latest_campaign);
    }

    println!("Generated at {}", ctx.timestamp.to_rfc3339());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_command_parses_flags() {
        let cli = Cli::try_parse_from([
            "market", "context", "Mumbai", "--handle", "acme", "--seed", "9", "--json",
        ])
        .expect("valid args");

        match cli.command {
            Command::Context {
                identifier,
                handle,
                seed,
                json,
            } => {
                assert_eq!(identifier, "Mumbai");
                assert_eq!(handle.as_deref(), Some("acme"));
                assert_eq!(seed, Some(9));
                assert!(json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn configure_requires_provider() {
        assert!(Cli::try_parse_from(["market", "configure"]).is_err());
    }
}
