use std::collections::{HashMap, VecDeque};

use super::GameEngine;
use crate::grid::{manhattan, GridMap};
use crate::rng::Rng;
use crate::types::Direction;

/// Heuristic driver for headless runs: heads for the nearest pip, shies away
/// from hostile ghosts and chases frightened ones.
#[derive(Clone, Debug)]
pub struct Autopilot {
    rng: Rng,
}

impl Autopilot {
    pub fn new(seed: u32) -> Self {
        Self { rng: Rng::new(seed) }
    }

    pub fn choose(&mut self, engine: &GameEngine) -> Direction {
        let grid = engine.grid();
        let from = engine.player().body.cell();
        let toward_pip = first_step_to_nearest_pip(grid, from);

        let mut best = Direction::None;
        let mut best_score = f32::NEG_INFINITY;
        for dir in Direction::CARDINALS {
            let next = grid.neighbor(from, dir);
            if grid.is_wall_cell(next.0, next.1) {
                continue;
            }

            let mut score = 0.0;
            if grid.tile_at_cell(next.0, next.1).is_collectible() {
                score += 4.0;
            }
            if toward_pip == Some(dir) {
                score += 6.0;
            }
            for ghost in engine.ghosts() {
                let dist = manhattan(next, ghost.body.cell());
                if ghost.frightened {
                    if dist <= 3 {
                        score += (4 - dist) as f32 * 1.5;
                    }
                } else if dist <= 1 {
                    score -= 20.0;
                } else if dist <= 3 {
                    score -= (4 - dist) as f32 * 3.0;
                }
            }
            score += self.rng.next_f32() * 0.5;

            if score > best_score {
                best_score = score;
                best = dir;
            }
        }
        best
    }
}

/// Breadth-first search over open cells (wrapping at the edges); returns the
/// first step of a shortest path to any pip.
pub fn first_step_to_nearest_pip(grid: &GridMap, from: (i32, i32)) -> Option<Direction> {
    let mut first_step: HashMap<(i32, i32), Direction> = HashMap::new();
    let mut queue = VecDeque::new();

    for dir in Direction::CARDINALS {
        let next = grid.neighbor(from, dir);
        if next == from || grid.is_wall_cell(next.0, next.1) || first_step.contains_key(&next) {
            continue;
        }
        first_step.insert(next, dir);
        queue.push_back(next);
    }

    while let Some(cell) = queue.pop_front() {
        let step = first_step[&cell];
        if grid.tile_at_cell(cell.0, cell.1).is_collectible() {
            return Some(step);
        }
        for dir in Direction::CARDINALS {
            let next = grid.neighbor(cell, dir);
            if next == from || grid.is_wall_cell(next.0, next.1) || first_step.contains_key(&next) {
                continue;
            }
            first_step.insert(next, step);
            queue.push_back(next);
        }
    }
    None
}
