use crate::constants::{
    ghost_speed_for_level, FRIGHTENED_TICKS, GHOSTS, GHOST_SPEED_STEP, INVINCIBLE_TICKS,
    PLAYER_SPAWN, STARTING_LIVES,
};
use crate::ghost::Ghost;
use crate::grid::{pixel_to_cell, GridMap};
use crate::player::Player;
use crate::rng::Rng;
use crate::scheduler::{DeferredEffect, TickScheduler};
use crate::types::{Direction, GameEvent, GameSnapshot};

pub mod autopilot;
mod collision;

#[derive(Clone, Debug)]
pub struct GameEngineOptions {
    pub seed: u32,
    pub starting_lives: u32,
    pub frightened_ticks: u32,
    pub invincible_ticks: u32,
    pub ghost_speed_step: f32,
}

impl Default for GameEngineOptions {
    fn default() -> Self {
        Self {
            seed: 1,
            starting_lives: STARTING_LIVES,
            frightened_ticks: FRIGHTENED_TICKS,
            invincible_ticks: INVINCIBLE_TICKS,
            ghost_speed_step: GHOST_SPEED_STEP,
        }
    }
}

/// The whole simulation: one `tick` moves every entity, then resolves pips,
/// ghost contact and level completion.
#[derive(Clone, Debug)]
pub struct GameEngine {
    options: GameEngineOptions,
    grid: GridMap,
    player: Player,
    ghosts: Vec<Ghost>,
    rng: Rng,
    scheduler: TickScheduler,
    events: Vec<GameEvent>,
    pending_direction: Option<Direction>,

    score: u32,
    lives: u32,
    level: u32,
    tick_counter: u64,
    paused: bool,
    game_over: bool,
}

impl GameEngine {
    pub fn new(options: GameEngineOptions) -> Self {
        let ghost_speed = ghost_speed_for_level(1, options.ghost_speed_step);
        Self {
            grid: GridMap::standard(),
            player: Player::new(PLAYER_SPAWN),
            ghosts: GHOSTS
                .iter()
                .map(|spec| Ghost::new(spec, ghost_speed))
                .collect(),
            rng: Rng::new(options.seed),
            scheduler: TickScheduler::new(),
            events: Vec::new(),
            pending_direction: None,
            score: 0,
            lives: options.starting_lives,
            level: 1,
            tick_counter: 0,
            paused: false,
            game_over: false,
            options,
        }
    }

    /// Fresh game with the same options; pending deferred effects are dropped.
    pub fn restart(&mut self) {
        self.scheduler.cancel_all();
        *self = Self::new(self.options.clone());
    }

    pub fn options(&self) -> &GameEngineOptions {
        &self.options
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn grid(&self) -> &GridMap {
        &self.grid
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn ghosts(&self) -> &[Ghost] {
        &self.ghosts
    }

    pub fn is_power_mode_pending(&self) -> bool {
        self.scheduler.is_pending(DeferredEffect::PowerModeOff)
    }

    /// Queues a turn for the next tick. Anything but a single unit axis (or
    /// `(0, 0)` to clear the turn) is rejected and leaves the queue alone.
    pub fn set_desired_direction(&mut self, dx: i32, dy: i32) -> bool {
        if self.game_over {
            return false;
        }
        match Direction::from_vector(dx, dy) {
            Some(dir) => {
                self.pending_direction = Some(dir);
                true
            }
            None => false,
        }
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Advances the world one step and returns the events caused by it.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        if self.paused || self.game_over {
            return Vec::new();
        }
        self.tick_counter += 1;

        if let Some(dir) = self.pending_direction.take() {
            self.player.desired = dir;
        }
        self.run_deferred_effects();

        self.player.update(&self.grid);
        self.resolve_pip_collision();

        let player_cell = (
            pixel_to_cell(self.player.body.x),
            pixel_to_cell(self.player.body.y),
        );
        for ghost in &mut self.ghosts {
            ghost.update(&self.grid, player_cell, &mut self.rng);
        }

        if !self.player.is_invincible() {
            self.resolve_ghost_collisions();
        }
        if !self.game_over && self.grid.is_level_complete() {
            self.complete_level();
        }

        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            tick: self.tick_counter,
            score: self.score,
            lives: self.lives,
            level: self.level,
            game_over: self.game_over,
            paused: self.paused,
            pips_remaining: self.grid.remaining_pips(),
            player: self.player.view(),
            ghosts: self.ghosts.iter().map(Ghost::view).collect(),
            tiles: self.grid.rows(),
        }
    }

    fn run_deferred_effects(&mut self) {
        for effect in self.scheduler.due(self.tick_counter) {
            match effect {
                DeferredEffect::PowerModeOff => self.events.push(GameEvent::PowerModeEnded),
            }
        }
    }

    fn end_power_mode_early(&mut self) {
        if self.scheduler.cancel(DeferredEffect::PowerModeOff) {
            self.events.push(GameEvent::PowerModeEnded);
        }
    }

    fn reset_positions(&mut self) {
        self.player.reset(PLAYER_SPAWN, self.options.invincible_ticks);
        for ghost in &mut self.ghosts {
            ghost.reset();
        }
    }
}
