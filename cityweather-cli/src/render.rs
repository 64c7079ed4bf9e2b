//! Text rendering of the single weather screen.

use chrono::Local;
use cityweather_core::{AppState, WeatherData, format::current_conditions_rows};
use std::fmt::Write;

pub const NOTHING_LOADED: &str = "Nothing is loaded, please input a city in the input field above";

/// Render `state` as the screen body. The error dialog is drawn separately.
pub fn render(state: &AppState, icon_url: impl Fn(&str) -> String) -> String {
    let mut out = String::new();

    let search = if state.search_city().is_empty() {
        "<empty>"
    } else {
        state.search_city()
    };
    if state.inputs_enabled() {
        let _ = writeln!(out, "City: {search}  [Fetch]");
    } else {
        let _ = writeln!(out, "City: {search}  (loading...)");
    }
    out.push('\n');

    match state.last_result() {
        Some(data) => render_weather(&mut out, data, icon_url),
        None => {
            let _ = writeln!(out, "{NOTHING_LOADED}");
        }
    }

    out
}

fn render_weather(out: &mut String, data: &WeatherData, icon_url: impl Fn(&str) -> String) {
    let _ = writeln!(out, "{} Weather", data.name);
    if let Some(at) = data.observed_at() {
        let local = at.with_timezone(&Local);
        let _ = writeln!(out, "Updated {}", local.format("%Y-%m-%d %H:%M"));
    }

    let rows = current_conditions_rows(&data.main);
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in rows {
        let _ = writeln!(out, "  {label:<width$}  {value:>10}");
    }

    for condition in &data.weather {
        let _ = writeln!(out);
        let _ = writeln!(out, "  [{}] {}", condition.id, condition.main);
        let _ = writeln!(out, "      {}", condition.description);
        let _ = writeln!(out, "      {}", icon_url(&condition.icon));
    }
}

/// Error dialog body, if there is one to show.
pub fn render_error(state: &AppState) -> Option<String> {
    state.error_message().map(|message| format!("Error\n  {message}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cityweather_core::{
        Condition, MainConditions, MemoryCityStore, OpenWeatherProvider, WeatherController,
    };
    use std::sync::Arc;

    fn controller() -> WeatherController {
        WeatherController::new(
            Arc::new(OpenWeatherProvider::new("unused".into())),
            Arc::new(MemoryCityStore::default()),
        )
    }

    fn london() -> WeatherData {
        WeatherData {
            name: "London".into(),
            main: MainConditions {
                temp: 283.0,
                feels_like: 281.9,
                temp_min: 281.5,
                temp_max: 284.2,
                pressure: 1012,
                humidity: 81,
            },
            weather: vec![Condition {
                id: 500,
                main: "Rain".into(),
                description: "light rain".into(),
                icon: "10d".into(),
            }],
            dt: None,
        }
    }

    fn icon(id: &str) -> String {
        format!("img/{id}@2x.png")
    }

    #[test]
    fn empty_screen_prompts_for_city() {
        let ctl = controller();
        let screen = render(ctl.state(), icon);
        assert!(screen.contains(NOTHING_LOADED));
        assert!(screen.contains("[Fetch]"));
        assert!(render_error(ctl.state()).is_none());
    }

    #[test]
    fn loaded_screen_shows_conditions() {
        let mut ctl = controller();
        ctl.set_search_city("London");
        let ticket = ctl.begin_fetch();
        ctl.complete_fetch(ticket, Ok(london()));

        let screen = render(ctl.state(), icon);
        assert!(screen.contains("London Weather"));
        assert!(screen.contains("50 F"));
        assert!(screen.contains("81 %"));
        assert!(screen.contains("1012 hPa"));
        assert!(screen.contains("[500] Rain"));
        assert!(screen.contains("light rain"));
        assert!(screen.contains("img/10d@2x.png"));
        assert!(!screen.contains(NOTHING_LOADED));
    }

    #[test]
    fn loading_disables_fetch_action() {
        let mut ctl = controller();
        ctl.set_search_city("Paris");
        ctl.begin_fetch();

        let screen = render(ctl.state(), icon);
        assert!(screen.contains("(loading...)"));
        assert!(!screen.contains("[Fetch]"));
    }

    #[test]
    fn error_dialog_keeps_stale_weather_visible() {
        let mut ctl = controller();
        let ticket = ctl.begin_fetch();
        ctl.complete_fetch(ticket, Ok(london()));
        ctl.set_error_message("Server Error");

        assert_eq!(render_error(ctl.state()).as_deref(), Some("Error\n  Server Error"));
        assert!(render(ctl.state(), icon).contains("London Weather"));
    }
}
