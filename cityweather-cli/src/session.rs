//! Interactive single-screen session.

use anyhow::Context;
use cityweather_core::{
    ApiError, Config, LocationLatch, LocationResolver, WeatherController, WeatherData,
    WeatherProvider, provider::openweather::icon_url_with_base,
};
use inquire::{Select, Text};
use std::{fmt, sync::Arc};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::render::{render, render_error};

type FetchTask = JoinHandle<Result<WeatherData, ApiError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    Fetch,
    EditCity,
    Locate,
    Quit,
}

impl Intent {
    const ALL: [Intent; 4] = [Intent::Fetch, Intent::EditCity, Intent::Locate, Intent::Quit];
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Intent::Fetch => "Fetch / refresh",
            Intent::EditCity => "Change city",
            Intent::Locate => "Use my location",
            Intent::Quit => "Quit",
        })
    }
}

fn spawn_fetch(provider: Arc<dyn WeatherProvider>, city: &str) -> FetchTask {
    let city = city.to_string();
    tokio::spawn(async move { provider.fetch_weather(&city).await })
}

async fn join_fetch(task: FetchTask) -> Result<WeatherData, ApiError> {
    task.await
        .unwrap_or_else(|e| Err(ApiError::Unknown(format!("fetch task failed: {e}"))))
}

/// Fetch while keeping the loading screen visible.
async fn fetch_with_screen(controller: &mut WeatherController, config: &Config) {
    let ticket = controller.begin_fetch();
    draw(controller, config);
    let task = spawn_fetch(controller.provider(), ticket.city());
    let result = join_fetch(task).await;
    controller.complete_fetch(ticket, result);
}

/// Startup: fetch the saved city, and let a located city take over.
///
/// The saved-city request is aborted when location wins the race. A location
/// failure is reported after the saved-city outcome so it stays visible.
async fn startup(
    controller: &mut WeatherController,
    config: &Config,
    resolver: Option<&dyn LocationResolver>,
    latch: &LocationLatch,
) {
    let saved = controller.begin_fetch();
    draw(controller, config);
    let saved_task = spawn_fetch(controller.provider(), saved.city());

    let mut location_error = None;
    if let Some(resolver) = resolver {
        match resolver.resolve_current_city_best_effort().await {
            Err(e) => location_error = Some(e),
            outcome => {
                if controller.apply_location(latch, outcome) {
                    debug!(ticket = saved.id(), "located city supersedes saved city");
                    saved_task.abort();
                    fetch_with_screen(controller, config).await;
                    return;
                }
            }
        }
    }

    let result = join_fetch(saved_task).await;
    controller.complete_fetch(saved, result);

    if let Some(e) = location_error {
        controller.set_error_message(e.user_message());
    }
}

fn draw(controller: &WeatherController, config: &Config) {
    let screen = render(controller.state(), |icon| {
        icon_url_with_base(&config.image_base_url, icon)
    });
    println!("\n{screen}");
}

fn acknowledge_error(controller: &mut WeatherController) -> anyhow::Result<()> {
    if let Some(dialog) = render_error(controller.state()) {
        println!("\n{dialog}\n");
        Select::new("", vec!["Ok"])
            .prompt()
            .context("Error dialog cancelled")?;
        controller.dismiss_error();
    }
    Ok(())
}

pub async fn run(
    mut controller: WeatherController,
    config: &Config,
    resolver: Option<&dyn LocationResolver>,
) -> anyhow::Result<()> {
    let latch = LocationLatch::new();
    startup(&mut controller, config, resolver, &latch).await;

    loop {
        draw(&controller, config);
        acknowledge_error(&mut controller)?;

        let intent = match Select::new("Action:", Intent::ALL.to_vec()).prompt() {
            Ok(intent) => intent,
            Err(
                inquire::InquireError::OperationCanceled
                | inquire::InquireError::OperationInterrupted,
            ) => Intent::Quit,
            Err(e) => return Err(e).context("Action prompt failed"),
        };

        match intent {
            Intent::Fetch => fetch_with_screen(&mut controller, config).await,
            Intent::EditCity => {
                let city = Text::new("City:")
                    .with_initial_value(controller.state().search_city())
                    .prompt()
                    .context("City prompt cancelled")?;
                controller.set_search_city(city);
                fetch_with_screen(&mut controller, config).await;
            }
            Intent::Locate => {
                let Some(resolver) = resolver else {
                    println!("Location lookup is turned off for this session.");
                    continue;
                };
                if latch.is_claimed() {
                    println!("Location was already used this session.");
                    continue;
                }
                let outcome = resolver.resolve_current_city_best_effort().await;
                if controller.apply_location(&latch, outcome) {
                    fetch_with_screen(&mut controller, config).await;
                }
            }
            Intent::Quit => return Ok(()),
        }
    }
}
