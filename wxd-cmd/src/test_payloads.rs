//! Provider JSON for the mock servers in command tests.

use serde_json::{json, Value};

fn hour(index: usize) -> Value {
    json!({
        "tempC": (index % 10).to_string(),
        "tempF": "41",
        "windspeedMiles": "7",
        "windspeedKmph": "11",
        "winddirDegree": "243",
        "winddir16Point": "WSW",
        "weatherDesc": [{"value": "Sunny"}],
        "precipMM": "0.0",
        "precipInches": "0.0",
        "humidity": "57",
        "visibility": "10",
        "visibilityMiles": "6",
        "cloudcover": "0",
        "uvIndex": "1"
    })
}

fn day(date: &str) -> Value {
    json!({
        "date": date,
        "astronomy": [{
            "sunrise": "06:31 AM",
            "sunset": "05:38 PM",
            "moonrise": "01:55 AM",
            "moonset": "11:43 AM",
            "moon_phase": "Waning Crescent",
            "moon_illumination": "47"
        }],
        "maxtempC": "8",
        "maxtempF": "46",
        "mintempC": "-2",
        "mintempF": "28",
        "avgtempC": "3",
        "avgtempF": "38",
        "totalSnow_cm": "0.0",
        "sunHour": "8.7",
        "uvIndex": "2",
        "hourly": (0..24).map(hour).collect::<Vec<_>>()
    })
}

pub fn past_weather(date: &str) -> Value {
    json!({"data": {"weather": [day(date)]}})
}

/// Seven forecast days from 2019-02-27, local time 14:32.
pub fn forecast() -> Value {
    let days: Vec<Value> = (27..=28)
        .map(|d| format!("2019-02-{d}"))
        .chain((1..=5).map(|d| format!("2019-03-0{d}")))
        .map(|date| day(&date))
        .collect();
    json!({
        "data": {
            "current_condition": [{
                "temp_C": "5",
                "temp_F": "41",
                "precipMM": "0.1",
                "uvIndex": "2"
            }],
            "time_zone": [{"localtime": "2019-02-27 14:32"}],
            "weather": days
        }
    })
}
