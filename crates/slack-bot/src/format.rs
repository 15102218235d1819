//! Reply rendering. Every function here is total: missing data renders
//! as a placeholder, never as an error.

use slack_client::{Reply, Visibility};
use tools::{format_number, Number, Place, WeatherReading};

/// Shown in place of a missing weather field.
pub const PLACEHOLDER: &str = "n/a";

/// Weather card for a place, broadcast to the channel.
pub fn weather_reply(place: &Place, reading: &WeatherReading) -> Reply {
    let description = reading
        .description
        .as_deref()
        .map(title_case)
        .unwrap_or_default();

    let lines = [
        format!("*{}, {}*", place.name, place.country),
        description,
        format!(
            "🌡️ {}°C (feels {}°C)  ·  💧 {}%",
            value(reading.temperature),
            value(reading.feels_like),
            value(reading.humidity)
        ),
        format!("🌬️ {} m/s", value(reading.wind_speed)),
    ];

    Reply::section(Visibility::InChannel, lines.join("\n"))
}

/// `expr = result`, broadcast to the channel.
pub fn calc_reply(expression: &str, result: Number) -> Reply {
    Reply::in_channel(format!(
        "🧮 `{}` = *{}*",
        expression,
        format_number(result)
    ))
}

/// Local time in a zone, only for the caller.
pub fn time_reply(zone: &str, formatted: &str) -> Reply {
    Reply::ephemeral(format!("🕒 *{}*: {}", zone, formatted))
}

/// Capitalize the first letter of every word, lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut start_of_word = true;

    for ch in text.chars() {
        if ch.is_alphabetic() {
            if start_of_word {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            start_of_word = false;
        } else {
            out.push(ch);
            start_of_word = true;
        }
    }

    out
}

/// Shortest round-trip form of the decoded value; `31.0` and `31` in the
/// payload both render as `31`.
fn value(v: Option<f64>) -> String {
    v.map(|v| v.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}
