use super::*;

use crate::constants::{COLLISION_SLACK, ENTITY_RADIUS, GHOST_SCORE, POWER_PIP_SCORE, TILE_SIZE};
use crate::grid::cell_center;

impl GameEngine {
    /// Pips are only picked up near a tile centre so one pass over a tile
    /// never counts twice.
    pub(super) fn resolve_pip_collision(&mut self) {
        let (x, y) = (self.player.body.x, self.player.body.y);
        let (cell_x, cell_y) = (pixel_to_cell(x), pixel_to_cell(y));
        let offset = (x - cell_center(cell_x)).hypot(y - cell_center(cell_y));
        if offset >= TILE_SIZE / 3.0 {
            return;
        }

        let gained = self.grid.collect_pip_at(x, y);
        if gained == 0 {
            return;
        }
        self.score += gained;
        if gained == POWER_PIP_SCORE {
            self.events.push(GameEvent::PowerPelletEaten {
                x: cell_x,
                y: cell_y,
            });
            self.frighten_ghosts();
        } else {
            self.events.push(GameEvent::PipEaten {
                x: cell_x,
                y: cell_y,
            });
        }
    }

    pub(super) fn frighten_ghosts(&mut self) {
        let ticks = self.options.frightened_ticks;
        for ghost in &mut self.ghosts {
            ghost.set_frightened(ticks);
        }
        self.scheduler
            .schedule(self.tick_counter, ticks as u64, DeferredEffect::PowerModeOff);
    }

    pub(super) fn is_touching(&self, ghost_idx: usize) -> bool {
        let Some(ghost) = self.ghosts.get(ghost_idx) else {
            return false;
        };
        if ghost.body.cell() == self.player.body.cell() {
            return true;
        }
        let reach = ENTITY_RADIUS + ENTITY_RADIUS - COLLISION_SLACK;
        self.player.body.distance_to(&ghost.body) < reach
    }

    /// Contacts are handled in spawn order. Eating a frightened ghost keeps
    /// going; the first hostile contact costs a life and ends the pass.
    pub(super) fn resolve_ghost_collisions(&mut self) {
        let touching: Vec<usize> = (0..self.ghosts.len())
            .filter(|idx| self.is_touching(*idx))
            .collect();

        for ghost_idx in touching {
            if self.ghosts[ghost_idx].frightened {
                let ghost = &mut self.ghosts[ghost_idx];
                self.events.push(GameEvent::GhostEaten {
                    ghost: ghost.name.clone(),
                    x: ghost.body.cell_x,
                    y: ghost.body.cell_y,
                });
                ghost.reset();
                self.score += GHOST_SCORE;
            } else {
                self.lose_life();
                break;
            }
        }
    }

    pub(super) fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::PlayerDeath {
            lives_left: self.lives,
        });
        if self.lives == 0 {
            self.end_game();
        } else {
            self.reset_positions();
        }
    }

    pub(super) fn end_game(&mut self) {
        self.end_power_mode_early();
        self.scheduler.cancel_all();
        self.pending_direction = None;
        self.game_over = true;
        self.events.push(GameEvent::GameOver { score: self.score });
    }

    pub(super) fn complete_level(&mut self) {
        let cleared = self.level;
        self.level += 1;
        self.end_power_mode_early();
        self.events.push(GameEvent::LevelComplete { level: cleared });

        self.grid.reset();
        self.reset_positions();
        let step = self.options.ghost_speed_step;
        for ghost in &mut self.ghosts {
            ghost.body.speed += step;
        }
    }
}
