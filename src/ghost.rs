use crate::constants::{GhostSpec, GHOST_DEFAULT_DIRECTION};
use crate::entity::{Blocked, Body, Steer};
use crate::grid::{manhattan, GridMap};
use crate::rng::Rng;
use crate::types::{Direction, GhostView};

/// Picks a heading for a ghost standing on a cell centre.
///
/// Reversal is only allowed when nothing else is open. Frightened ghosts
/// wander uniformly at random; otherwise the ghost takes the step that lands
/// closest (Manhattan) to the player, earliest in `CARDINALS` on ties. With no
/// open neighbour at all the current heading is kept and the wall bounces it.
pub fn choose_direction(
    grid: &GridMap,
    cell: (i32, i32),
    current: Direction,
    frightened: bool,
    player_cell: (i32, i32),
    rng: &mut Rng,
) -> Direction {
    let reverse = current.reverse();
    let open = |dir: Direction| {
        let (nx, ny) = grid.neighbor(cell, dir);
        !grid.is_wall_cell(nx, ny)
    };

    let mut candidates: Vec<Direction> = Direction::CARDINALS
        .into_iter()
        .filter(|dir| *dir != reverse && open(*dir))
        .collect();
    if candidates.is_empty() && reverse.is_moving() && open(reverse) {
        candidates.push(reverse);
    }
    if candidates.is_empty() {
        return current;
    }

    if frightened {
        return rng.pick(&candidates).unwrap_or(current);
    }

    let mut best = candidates[0];
    let mut best_dist = i32::MAX;
    for dir in candidates {
        let dist = manhattan(grid.neighbor(cell, dir), player_cell);
        if dist < best_dist {
            best_dist = dist;
            best = dir;
        }
    }
    best
}

struct PolicySteer<'a> {
    frightened: bool,
    player_cell: (i32, i32),
    rng: &'a mut Rng,
}

impl Steer for PolicySteer<'_> {
    fn choose(&mut self, body: &Body, grid: &GridMap) -> Direction {
        choose_direction(
            grid,
            body.cell(),
            body.dir,
            self.frightened,
            self.player_cell,
            self.rng,
        )
    }

    fn on_blocked(&self) -> Blocked {
        Blocked::Reverse
    }
}

#[derive(Clone, Debug)]
pub struct Ghost {
    pub name: String,
    pub color: String,
    pub body: Body,
    pub start_cell: (i32, i32),
    pub frightened: bool,
    pub frightened_ticks: u32,
}

impl Ghost {
    pub fn new(spec: &GhostSpec, speed: f32) -> Self {
        Self {
            name: spec.name.to_string(),
            color: spec.color.to_string(),
            body: Body::new(spec.cell, GHOST_DEFAULT_DIRECTION, speed),
            start_cell: spec.cell,
            frightened: false,
            frightened_ticks: 0,
        }
    }

    /// Restarts the countdown; a second pellet does not stack.
    pub fn set_frightened(&mut self, ticks: u32) {
        self.frightened = true;
        self.frightened_ticks = ticks;
    }

    pub fn tick_frightened(&mut self) {
        if !self.frightened {
            return;
        }
        self.frightened_ticks = self.frightened_ticks.saturating_sub(1);
        if self.frightened_ticks == 0 {
            self.frightened = false;
        }
    }

    pub fn update(&mut self, grid: &GridMap, player_cell: (i32, i32), rng: &mut Rng) {
        self.tick_frightened();
        let mut steer = PolicySteer {
            frightened: self.frightened,
            player_cell,
            rng,
        };
        self.body.advance(grid, &mut steer);
    }

    /// Respawn after being eaten or after a life is lost. Speed is kept.
    pub fn reset(&mut self) {
        self.body.place(self.start_cell);
        self.body.dir = GHOST_DEFAULT_DIRECTION;
        self.frightened = false;
        self.frightened_ticks = 0;
    }

    pub fn view(&self) -> GhostView {
        GhostView {
            name: self.name.clone(),
            color: self.color.clone(),
            cell_x: self.body.cell_x,
            cell_y: self.body.cell_y,
            x: self.body.x,
            y: self.body.y,
            dir: self.body.dir,
            frightened: self.frightened,
            frightened_ticks: self.frightened_ticks,
            speed: self.body.speed,
        }
    }
}
