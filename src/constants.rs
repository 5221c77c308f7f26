use crate::types::Direction;

pub const TICK_RATE: u32 = 60;

pub const TILE_SIZE: f32 = 40.0;
pub const GRID_WIDTH: i32 = 14;
pub const GRID_HEIGHT: i32 = 18;

pub const PLAYER_SPEED: f32 = 2.5;
pub const GHOST_BASE_SPEED: f32 = 2.0;
pub const GHOST_SPEED_STEP: f32 = 0.2;

pub const ENTITY_RADIUS: f32 = 15.0;
pub const COLLISION_SLACK: f32 = 10.0;
pub const ARRIVAL_EPSILON: f32 = 1.0;

pub const PIP_SCORE: u32 = 10;
pub const POWER_PIP_SCORE: u32 = 50;
pub const GHOST_SCORE: u32 = 200;

pub const FRIGHTENED_TICKS: u32 = 300;
pub const INVINCIBLE_TICKS: u32 = 120;
pub const STARTING_LIVES: u32 = 3;

pub const MOUTH_SPEED: f32 = 0.15;
pub const MOUTH_MAX: f32 = 0.4;

pub const PLAYER_SPAWN: (i32, i32) = (6, 14);
pub const GHOST_DEFAULT_DIRECTION: Direction = Direction::Right;

pub struct GhostSpec {
    pub name: &'static str,
    pub color: &'static str,
    pub cell: (i32, i32),
}

/// Spawn order is also the order ghost contacts are resolved in.
pub const GHOSTS: [GhostSpec; 4] = [
    GhostSpec {
        name: "Blinky",
        color: "#FF0000",
        cell: (6, 8),
    },
    GhostSpec {
        name: "Pinky",
        color: "#FFB8FF",
        cell: (7, 8),
    },
    GhostSpec {
        name: "Inky",
        color: "#00FFFF",
        cell: (5, 8),
    },
    GhostSpec {
        name: "Clyde",
        color: "#FFB852",
        cell: (8, 8),
    },
];

/// `#` wall, `.` pip, `o` power pip, space empty.
pub const MAP_TEMPLATE: [&str; GRID_HEIGHT as usize] = [
    "##############",
    "#............#",
    "#.##.####.##.#",
    "#o##.####.##o#",
    "#............#",
    "#.##.#.#.###.#",
    "#....#.#.....#",
    "####.#  .#####",
    "   #.#  .#    ",
    "####.###.#####",
    "#............#",
    "#.##.####.##.#",
    "#o.#......#.o#",
    "##.#.#.#.##.##",
    "#....#.#.....#",
    "#.####.#####.#",
    "#............#",
    "##############",
];

pub fn ghost_speed_for_level(level: u32, step: f32) -> f32 {
    GHOST_BASE_SPEED + step * level.saturating_sub(1) as f32
}
