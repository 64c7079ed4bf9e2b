use anyhow::Context;
use cityweather_core::{
    Config, FileCityStore, FixedLocation, IpLocationResolver, LocationLatch, LocationResolver,
    WeatherController,
    provider::{openweather::icon_url_with_base, provider_from_config},
};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode};
use std::sync::Arc;

use crate::{render, session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "cityweather", version, about = "Current weather for a city")]
pub struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the OpenWeather API key and location preference.
    Configure,

    /// Show weather once and exit.
    Show {
        /// City name; defaults to the last successfully searched city.
        city: Option<String>,

        /// Look up the current city from this machine's location.
        #[arg(long, conflicts_with = "city")]
        here: bool,
    },

    /// Interactive single-screen session (the default).
    Interactive {
        /// Skip the automatic location lookup at startup.
        #[arg(long)]
        no_locate: bool,

        /// Treat CITY as the current location instead of looking it up.
        #[arg(long, value_name = "CITY", conflicts_with = "no_locate")]
        location: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let command = self.command.unwrap_or(Command::Interactive {
            no_locate: false,
            location: None,
        });

        match command {
            Command::Configure => configure(),
            Command::Show { city, here } => show(city, here).await,
            Command::Interactive {
                no_locate,
                location,
            } => interactive(no_locate, location).await,
        }
    }
}

fn build_controller(config: &Config) -> anyhow::Result<WeatherController> {
    let provider = provider_from_config(config)?;
    let store = FileCityStore::open_default()?;
    Ok(WeatherController::restore(Arc::new(provider), Arc::new(store)))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("API key prompt cancelled")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    config.location_enabled = Confirm::new("Allow looking up your city from your IP address?")
        .with_default(config.location_enabled)
        .prompt()
        .context("Location prompt cancelled")?;

    config.save()?;
    println!(
        "Saved configuration to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}

async fn show(city: Option<String>, here: bool) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut controller = build_controller(&config)?;

    if here {
        let resolver = IpLocationResolver::from_config(&config)?;
        if !controller.locate(&resolver, &LocationLatch::new()).await {
            if let Some(message) = controller.state().error_message() {
                anyhow::bail!("{message}");
            }
            anyhow::bail!("Could not determine your current city");
        }
    } else {
        if let Some(city) = city {
            controller.set_search_city(city);
        }
        controller.fetch().await;
    }

    let state = controller.state();
    let screen = render::render(state, |icon| {
        icon_url_with_base(&config.image_base_url, icon)
    });
    print!("{screen}");

    if let Some(message) = state.error_message() {
        anyhow::bail!("{message}");
    }
    Ok(())
}

async fn interactive(no_locate: bool, location: Option<String>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let controller = build_controller(&config)?;

    let by_ip = IpLocationResolver::from_config(&config)?;
    let fixed = location.as_deref().map(FixedLocation::new);
    let resolver: Option<&dyn LocationResolver> = match &fixed {
        Some(fixed) => Some(fixed),
        None if no_locate => None,
        None => Some(&by_ip),
    };

    session::run(controller, &config, resolver).await
}
