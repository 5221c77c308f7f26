use clap::Parser;
use packman_core::constants::{STARTING_LIVES, TICK_RATE};
use packman_core::engine::autopilot::Autopilot;
use packman_core::engine::{GameEngine, GameEngineOptions};
use packman_core::grid::GridMap;
use packman_core::log_line::{emit_log, now_ms};
use packman_core::rng::Rng;
use packman_core::types::GameEvent;
use serde::Serialize;
use serde_json::json;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[arg(long)]
    seed: Option<u32>,
    #[arg(long, default_value_t = 3)]
    games: u32,
    #[arg(long, default_value_t = 36_000)]
    max_ticks: u64,
    #[arg(long)]
    lives: Option<u32>,
    #[arg(long)]
    run_id: Option<String>,
    #[arg(long)]
    summary_out: Option<PathBuf>,
    #[arg(long)]
    trace_events: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum GameOutcome {
    GameOver,
    TickLimit,
}

impl GameOutcome {
    fn key(self) -> &'static str {
        match self {
            GameOutcome::GameOver => "game_over",
            GameOutcome::TickLimit => "tick_limit",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
struct GameResultLine {
    game: u32,
    seed: u32,
    outcome: GameOutcome,
    score: u32,
    level: u32,
    #[serde(rename = "livesLeft")]
    lives_left: u32,
    ticks: u64,
    #[serde(rename = "durationSecs")]
    duration_secs: f64,
    #[serde(rename = "pipsEaten")]
    pips_eaten: u32,
    #[serde(rename = "powerPellets")]
    power_pellets: u32,
    #[serde(rename = "ghostsEaten")]
    ghosts_eaten: u32,
    deaths: u32,
    #[serde(rename = "levelsCleared")]
    levels_cleared: u32,
    anomalies: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
struct AnomalyRecord {
    tick: u64,
    message: String,
}

/// Every sighting is kept with its tick; the result line lists each message once.
#[derive(Debug, Default)]
struct AnomalyLog {
    records: Vec<AnomalyRecord>,
    distinct: Vec<String>,
    seen: HashSet<String>,
}

impl AnomalyLog {
    fn record(&mut self, tick: u64, message: String) {
        if self.seen.insert(message.clone()) {
            self.distinct.push(message.clone());
        }
        self.records.push(AnomalyRecord { tick, message });
    }

    fn into_parts(self) -> (Vec<String>, Vec<AnomalyRecord>) {
        (self.distinct, self.records)
    }
}

#[derive(Clone, Debug)]
struct GameRunResult {
    result: GameResultLine,
    anomaly_records: Vec<AnomalyRecord>,
}

#[derive(Clone, Debug, Serialize)]
struct RunSummary {
    #[serde(rename = "runId")]
    run_id: String,
    #[serde(rename = "startedAtMs")]
    started_at_ms: i64,
    #[serde(rename = "finishedAtMs")]
    finished_at_ms: i64,
    #[serde(rename = "gameCount")]
    game_count: usize,
    #[serde(rename = "anomalyCount")]
    anomaly_count: usize,
    #[serde(rename = "averageScore")]
    average_score: u32,
    #[serde(rename = "bestScore")]
    best_score: u32,
    #[serde(rename = "outcomeCounts")]
    outcome_counts: BTreeMap<String, usize>,
    games: Vec<GameResultLine>,
}

/// Per-run knobs shared by every game.
struct RunConfig<'a> {
    run_id: &'a str,
    max_ticks: u64,
    starting_lives: u32,
    trace_events: bool,
}

fn main() {
    let cli = Cli::parse();
    let base_seed = cli
        .seed
        .unwrap_or_else(|| Rng::from_entropy().next_u32());
    let run_started_at_ms = now_ms();
    let run_id = cli
        .run_id
        .clone()
        .unwrap_or_else(|| default_run_id(base_seed, run_started_at_ms));
    let config = RunConfig {
        run_id: &run_id,
        max_ticks: cli.max_ticks.max(1),
        starting_lives: cli.lives.unwrap_or(STARTING_LIVES).max(1),
        trace_events: cli.trace_events,
    };

    let mut has_anomaly = false;
    let mut game_results = Vec::new();
    let mut total_anomalies = 0usize;

    for game in 1..=cli.games.max(1) {
        let seed = base_seed.wrapping_add(game - 1);
        emit_log(
            "info",
            "game_started",
            &run_id,
            Some(game),
            Some(seed),
            None,
            json!({
                "maxTicks": config.max_ticks,
                "lives": config.starting_lives,
            }),
        );
        let game_run = run_game(game, seed, &config);

        for anomaly in &game_run.anomaly_records {
            emit_log(
                "warn",
                "anomaly_detected",
                &run_id,
                Some(game),
                Some(seed),
                Some(anomaly.tick),
                json!({
                    "message": anomaly.message,
                }),
            );
        }

        if !game_run.result.anomalies.is_empty() {
            has_anomaly = true;
        }
        total_anomalies += game_run.anomaly_records.len();

        emit_log(
            "info",
            "game_finished",
            &run_id,
            Some(game),
            Some(seed),
            Some(game_run.result.ticks),
            json!({
                "outcome": game_run.result.outcome,
                "score": game_run.result.score,
                "level": game_run.result.level,
                "durationSecs": game_run.result.duration_secs,
                "anomalyCount": game_run.anomaly_records.len(),
            }),
        );

        match serde_json::to_string(&game_run.result) {
            Ok(line) => println!("{line}"),
            Err(error) => emit_log(
                "error",
                "result_serialize_failed",
                &run_id,
                Some(game),
                Some(seed),
                None,
                json!({ "error": error.to_string() }),
            ),
        }
        game_results.push(game_run.result);
    }

    let summary = build_run_summary(
        run_id.clone(),
        run_started_at_ms,
        now_ms(),
        game_results,
        total_anomalies,
    );

    let mut summary_out_written: Option<String> = None;
    if let Some(path) = cli.summary_out.as_ref() {
        if let Err(error) = write_summary(path, &summary) {
            emit_log(
                "error",
                "summary_write_failed",
                &run_id,
                None,
                None,
                None,
                json!({
                    "path": path.to_string_lossy(),
                    "error": error.to_string(),
                }),
            );
            std::process::exit(2);
        }
        summary_out_written = Some(path.to_string_lossy().to_string());
    }

    emit_log(
        "info",
        "run_finished",
        &run_id,
        None,
        None,
        None,
        json!({
            "gameCount": summary.game_count,
            "anomalyCount": summary.anomaly_count,
            "averageScore": summary.average_score,
            "bestScore": summary.best_score,
            "outcomeCounts": summary.outcome_counts,
            "summaryOut": summary_out_written,
        }),
    );

    if has_anomaly {
        std::process::exit(1);
    }
}

fn run_game(game: u32, seed: u32, config: &RunConfig<'_>) -> GameRunResult {
    let mut engine = GameEngine::new(GameEngineOptions {
        seed,
        starting_lives: config.starting_lives,
        ..GameEngineOptions::default()
    });
    let mut pilot = Autopilot::new(seed.wrapping_add(0x9e37_79b9));

    let mut pips_eaten = 0;
    let mut power_pellets = 0;
    let mut ghosts_eaten = 0;
    let mut deaths = 0;
    let mut levels_cleared = 0;
    let mut anomaly_log = AnomalyLog::default();
    let mut last_score = 0;

    while !engine.is_game_over() && engine.tick_count() < config.max_ticks {
        let (dx, dy) = pilot.choose(&engine).delta();
        engine.set_desired_direction(dx, dy);
        let events = engine.tick();
        let tick = engine.tick_count();

        for event in &events {
            match event {
                GameEvent::PipEaten { .. } => pips_eaten += 1,
                GameEvent::PowerPelletEaten { .. } => power_pellets += 1,
                GameEvent::GhostEaten { .. } => ghosts_eaten += 1,
                GameEvent::PlayerDeath { .. } => deaths += 1,
                GameEvent::LevelComplete { .. } => levels_cleared += 1,
                _ => {}
            }
            if config.trace_events {
                emit_log(
                    "debug",
                    "game_event",
                    config.run_id,
                    Some(game),
                    Some(seed),
                    Some(tick),
                    serde_json::to_value(event).unwrap_or_default(),
                );
            }
        }

        for message in collect_engine_anomalies(&engine, config.starting_lives, last_score) {
            anomaly_log.record(tick, message);
        }
        last_score = engine.score();
    }

    let outcome = if engine.is_game_over() {
        GameOutcome::GameOver
    } else {
        GameOutcome::TickLimit
    };
    let (anomalies, anomaly_records) = anomaly_log.into_parts();

    GameRunResult {
        result: GameResultLine {
            game,
            seed,
            outcome,
            score: engine.score(),
            level: engine.level(),
            lives_left: engine.lives(),
            ticks: engine.tick_count(),
            duration_secs: ticks_to_secs(engine.tick_count()),
            pips_eaten,
            power_pellets,
            ghosts_eaten,
            deaths,
            levels_cleared,
            anomalies,
        },
        anomaly_records,
    }
}

fn collect_engine_anomalies(
    engine: &GameEngine,
    starting_lives: u32,
    previous_score: u32,
) -> Vec<String> {
    let mut anomalies = Vec::new();
    let grid = engine.grid();

    anomalies.extend(out_of_bounds_message(grid, "player", engine.player().body.cell()));
    for ghost in engine.ghosts() {
        let who = format!("ghost {}", ghost.name);
        anomalies.extend(out_of_bounds_message(grid, &who, ghost.body.cell()));
    }

    if grid.collected_pips() > grid.total_pips() {
        anomalies.push(format!(
            "collected pips exceed total: {}/{}",
            grid.collected_pips(),
            grid.total_pips()
        ));
    }
    if engine.lives() > starting_lives {
        anomalies.push(format!("lives above starting value: {}", engine.lives()));
    }
    if engine.score() < previous_score {
        anomalies.push(format!(
            "score decreased: {previous_score} -> {}",
            engine.score()
        ));
    }
    if engine.is_game_over() != (engine.lives() == 0) {
        anomalies.push(format!(
            "game over flag out of step with lives: {}",
            engine.lives()
        ));
    }
    anomalies
}

fn out_of_bounds_message(grid: &GridMap, who: &str, (x, y): (i32, i32)) -> Option<String> {
    if grid.in_bounds(x, y) {
        None
    } else {
        Some(format!("{who} cell out of bounds: ({x}, {y})"))
    }
}

fn ticks_to_secs(ticks: u64) -> f64 {
    ticks as f64 / TICK_RATE as f64
}

fn default_run_id(seed: u32, timestamp_ms: i64) -> String {
    format!("sim-{seed}-{timestamp_ms}")
}

fn build_run_summary(
    run_id: String,
    started_at_ms: i64,
    finished_at_ms: i64,
    games: Vec<GameResultLine>,
    anomaly_count: usize,
) -> RunSummary {
    let game_count = games.len();
    let total_score: u64 = games.iter().map(|game| game.score as u64).sum();
    let average_score = if game_count == 0 {
        0
    } else {
        (total_score / game_count as u64) as u32
    };
    let best_score = games.iter().map(|game| game.score).max().unwrap_or(0);
    let mut outcome_counts: BTreeMap<String, usize> = BTreeMap::new();
    for game in &games {
        *outcome_counts
            .entry(game.outcome.key().to_string())
            .or_insert(0) += 1;
    }
    RunSummary {
        run_id,
        started_at_ms,
        finished_at_ms,
        game_count,
        anomaly_count,
        average_score,
        best_score,
        outcome_counts,
        games,
    }
}

fn write_summary(path: &Path, summary: &RunSummary) -> io::Result<()> {
    let summary_text = serde_json::to_string_pretty(summary).map_err(io::Error::other)?;
    std::fs::write(path, summary_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_game_result(outcome: GameOutcome, score: u32) -> GameResultLine {
        GameResultLine {
            game: 1,
            seed: 42,
            outcome,
            score,
            level: 1,
            lives_left: 0,
            ticks: 100,
            duration_secs: ticks_to_secs(100),
            pips_eaten: 0,
            power_pellets: 0,
            ghosts_eaten: 0,
            deaths: 0,
            levels_cleared: 0,
            anomalies: Vec::new(),
        }
    }

    fn quiet_config(run_id: &str) -> RunConfig<'_> {
        RunConfig {
            run_id,
            max_ticks: 600,
            starting_lives: 3,
            trace_events: false,
        }
    }

    #[test]
    fn default_run_id_contains_seed_and_timestamp() {
        assert_eq!(default_run_id(42, 123456789), "sim-42-123456789");
    }

    #[test]
    fn build_run_summary_counts_outcomes_and_scores() {
        let summary = build_run_summary(
            "sim-42-1".to_string(),
            1,
            2,
            vec![
                make_game_result(GameOutcome::GameOver, 1_000),
                make_game_result(GameOutcome::TickLimit, 3_000),
                make_game_result(GameOutcome::GameOver, 2_000),
            ],
            0,
        );
        assert_eq!(summary.game_count, 3);
        assert_eq!(summary.average_score, 2_000);
        assert_eq!(summary.best_score, 3_000);
        assert_eq!(summary.outcome_counts.get("game_over"), Some(&2));
        assert_eq!(summary.outcome_counts.get("tick_limit"), Some(&1));
    }

    #[test]
    fn write_summary_returns_error_when_parent_does_not_exist() {
        let target = std::env::temp_dir()
            .join(format!("packman-missing-{}", now_ms()))
            .join("summary.json");
        let summary = build_run_summary(
            "sim-1-1".to_string(),
            1,
            2,
            vec![make_game_result(GameOutcome::TickLimit, 0)],
            0,
        );
        assert!(write_summary(&target, &summary).is_err());
    }

    #[test]
    fn escaped_player_is_reported_once_per_game_but_logged_every_tick() {
        let grid = GridMap::standard();
        assert_eq!(out_of_bounds_message(&grid, "player", (6, 14)), None);

        let mut log = AnomalyLog::default();
        for tick in [40, 41] {
            let message = out_of_bounds_message(&grid, "player", (14, 8)).expect("off the grid");
            log.record(tick, message);
        }
        let ghost = out_of_bounds_message(&grid, "ghost Clyde", (3, -1)).expect("off the grid");
        log.record(41, ghost);

        let (distinct, records) = log.into_parts();
        assert_eq!(
            distinct,
            vec![
                "player cell out of bounds: (14, 8)".to_string(),
                "ghost Clyde cell out of bounds: (3, -1)".to_string(),
            ]
        );
        let ticks: Vec<u64> = records.iter().map(|record| record.tick).collect();
        assert_eq!(ticks, vec![40, 41, 41]);
    }

    #[test]
    fn game_length_is_reported_in_seconds_at_the_tick_rate() {
        assert_eq!(ticks_to_secs(0), 0.0);
        assert_eq!(ticks_to_secs(TICK_RATE as u64 * 90), 90.0);
        let run = run_game(1, 3, &quiet_config("sim-secs"));
        assert_eq!(run.result.duration_secs, ticks_to_secs(run.result.ticks));
    }

    #[test]
    fn short_game_is_clean_and_capped() {
        let run = run_game(1, 7, &quiet_config("sim-test"));
        assert!(run.result.anomalies.is_empty());
        assert!(run.anomaly_records.is_empty());
        assert!(run.result.ticks <= 600);
        if run.result.outcome == GameOutcome::TickLimit {
            assert_eq!(run.result.ticks, 600);
        }
        assert!(run.result.pips_eaten > 0);
    }

    #[test]
    fn same_seed_reproduces_the_same_game() {
        let a = run_game(1, 11, &quiet_config("sim-a"));
        let b = run_game(1, 11, &quiet_config("sim-b"));
        assert_eq!(a.result.score, b.result.score);
        assert_eq!(a.result.ticks, b.result.ticks);
        assert_eq!(a.result.deaths, b.result.deaths);
    }
}
