//! Display strings for the raw upstream values.

use crate::model::MainConditions;

/// Kelvin to whole degrees Fahrenheit, e.g. `283.0` -> `"50 F"`.
///
/// Rounds half-down: exact .5 ties go toward zero. Negative readings that
/// round to zero keep their sign and print as `"-0 F"`.
pub fn kelvin_to_fahrenheit(kelvin: f64) -> String {
    fahrenheit_label((kelvin - 273.15) * 1.8 + 32.0)
}

fn fahrenheit_label(f: f64) -> String {
    let whole = round_half_down(f);
    if whole == 0 && f < 0.0 {
        return "-0 F".to_string();
    }
    format!("{whole} F")
}

fn round_half_down(value: f64) -> i64 {
    let truncated = value.trunc();
    if (value - truncated).abs() == 0.5 {
        truncated as i64
    } else {
        value.round() as i64
    }
}

pub fn humidity(percent: i64) -> String {
    format!("{percent} %")
}

pub fn pressure(hpa: i64) -> String {
    format!("{hpa} hPa")
}

/// Labelled rows for the current-conditions block, in display order.
pub fn current_conditions_rows(main: &MainConditions) -> Vec<(&'static str, String)> {
    vec![
        ("Temperature", kelvin_to_fahrenheit(main.temp)),
        ("Feels like", kelvin_to_fahrenheit(main.feels_like)),
        ("Humidity", humidity(main.humidity)),
        ("Min Temp", kelvin_to_fahrenheit(main.temp_min)),
        ("Max Temp", kelvin_to_fahrenheit(main.temp_max)),
        ("Pressure", pressure(main.pressure)),
    ]
}
