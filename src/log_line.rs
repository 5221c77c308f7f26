use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

/// One JSON object per line on stderr.
#[derive(Clone, Debug, Serialize)]
pub struct StructuredLogLine {
    #[serde(rename = "timestampMs")]
    pub timestamp_ms: i64,
    pub level: String,
    pub event: String,
    #[serde(rename = "runId")]
    pub run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick: Option<u64>,
    pub details: Value,
}

impl StructuredLogLine {
    pub fn new(
        level: &str,
        event: &str,
        run_id: &str,
        game: Option<u32>,
        seed: Option<u32>,
        tick: Option<u64>,
        details: Value,
    ) -> Self {
        Self {
            timestamp_ms: now_ms(),
            level: level.to_string(),
            event: event.to_string(),
            run_id: run_id.to_string(),
            game,
            seed,
            tick,
            details,
        }
    }
}

pub fn emit_log(
    level: &str,
    event: &str,
    run_id: &str,
    game: Option<u32>,
    seed: Option<u32>,
    tick: Option<u64>,
    details: Value,
) {
    let log_line = StructuredLogLine::new(level, event, run_id, game, seed, tick, details);
    eprintln!("{}", render_log_line(&log_line));
}

pub fn render_log_line(log_line: &StructuredLogLine) -> String {
    serde_json::to_string(log_line)
        .unwrap_or_else(|error| serialize_failure_line(&error.to_string()))
}

fn serialize_failure_line(error: &str) -> String {
    json!({
        "timestampMs": now_ms(),
        "level": "error",
        "event": "log_serialize_failed",
        "details": { "error": error },
    })
    .to_string()
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_are_omitted_when_absent() {
        let line = StructuredLogLine::new(
            "info",
            "run_finished",
            "sim-1-2",
            None,
            None,
            None,
            json!({ "games": 3 }),
        );
        let value = serde_json::to_value(&line).expect("log line serializes");
        assert_eq!(value["runId"], "sim-1-2");
        assert_eq!(value["details"]["games"], 3);
        assert!(value.get("game").is_none());
        assert!(value.get("tick").is_none());
        assert!(value["timestampMs"].as_i64().is_some());
    }

    #[test]
    fn game_scope_is_serialized_when_present() {
        let line = StructuredLogLine::new(
            "warn",
            "anomaly_detected",
            "sim-1-2",
            Some(2),
            Some(7),
            Some(120),
            json!({ "message": "x" }),
        );
        let value = serde_json::to_value(&line).expect("log line serializes");
        assert_eq!(value["game"], 2);
        assert_eq!(value["seed"], 7);
        assert_eq!(value["tick"], 120);
        assert_eq!(value["level"], "warn");
    }

    #[test]
    fn serialize_failure_line_escapes_the_error_text() {
        let text = serialize_failure_line("bad \"key\" at line 1\nnext");
        let value: Value = serde_json::from_str(&text).expect("fallback line is valid json");
        assert_eq!(value["event"], "log_serialize_failed");
        assert_eq!(value["details"]["error"], "bad \"key\" at line 1\nnext");
    }

    #[test]
    fn rendered_line_is_a_single_json_object() {
        let line = StructuredLogLine::new(
            "debug",
            "game_event",
            "run \"quoted\"",
            Some(1),
            None,
            Some(3),
            json!({ "type": "pip_eaten" }),
        );
        let text = render_log_line(&line);
        assert!(!text.contains('\n'));
        let value: Value = serde_json::from_str(&text).expect("rendered line parses");
        assert_eq!(value["runId"], "run \"quoted\"");
    }
}
