use crate::constants::{MOUTH_MAX, MOUTH_SPEED, PLAYER_SPEED};
use crate::entity::{Blocked, Body, Steer};
use crate::grid::GridMap;
use crate::types::{Direction, PlayerView};

/// Input-driven steering: take the queued turn when it is open, otherwise
/// keep going until a wall stops the body.
struct InputSteer {
    desired: Direction,
}

impl Steer for InputSteer {
    fn choose(&mut self, body: &Body, grid: &GridMap) -> Direction {
        if self.desired.is_moving() {
            let (nx, ny) = grid.neighbor(body.cell(), self.desired);
            if !grid.is_wall_cell(nx, ny) {
                return self.desired;
            }
        }
        body.dir
    }

    fn on_blocked(&self) -> Blocked {
        Blocked::Stop
    }
}

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub desired: Direction,
    pub invincible_ticks: u32,
    mouth_angle: f32,
    mouth_speed: f32,
}

impl Player {
    pub fn new(cell: (i32, i32)) -> Self {
        Self {
            body: Body::new(cell, Direction::None, PLAYER_SPEED),
            desired: Direction::None,
            invincible_ticks: 0,
            mouth_angle: 0.0,
            mouth_speed: MOUTH_SPEED,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    pub fn update(&mut self, grid: &GridMap) {
        self.invincible_ticks = self.invincible_ticks.saturating_sub(1);

        if self.body.dir.is_moving() {
            self.mouth_angle += self.mouth_speed;
            if !(0.0..=MOUTH_MAX).contains(&self.mouth_angle) {
                self.mouth_speed = -self.mouth_speed;
            }
        }

        let mut steer = InputSteer {
            desired: self.desired,
        };
        self.body.advance(grid, &mut steer);
    }

    /// Back to the spawn cell, stopped, with a grace window against ghosts.
    pub fn reset(&mut self, cell: (i32, i32), invincible_ticks: u32) {
        self.body.place(cell);
        self.body.dir = Direction::None;
        self.desired = Direction::None;
        self.invincible_ticks = invincible_ticks;
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            cell_x: self.body.cell_x,
            cell_y: self.body.cell_y,
            x: self.body.x,
            y: self.body.y,
            dir: self.body.dir,
            invincible: self.is_invincible(),
            invincible_ticks: self.invincible_ticks,
            mouth_angle: self.mouth_angle,
        }
    }
}
