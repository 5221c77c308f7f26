use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    None,
}

impl Direction {
    /// Enumeration order doubles as the chase tie-break.
    pub const CARDINALS: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::None => (0, 0),
        }
    }

    pub fn reverse(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::None => Self::None,
        }
    }

    /// Accepts a unit step on exactly one axis, or `(0, 0)` for "no turn".
    pub fn from_vector(dx: i32, dy: i32) -> Option<Self> {
        match (dx, dy) {
            (0, -1) => Some(Self::Up),
            (0, 1) => Some(Self::Down),
            (-1, 0) => Some(Self::Left),
            (1, 0) => Some(Self::Right),
            (0, 0) => Some(Self::None),
            _ => None,
        }
    }

    pub fn is_moving(self) -> bool {
        self != Self::None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileKind {
    Wall,
    Empty,
    Pip,
    PowerPip,
}

impl TileKind {
    pub fn parse_glyph(glyph: char) -> Option<Self> {
        match glyph {
            '#' => Some(Self::Wall),
            ' ' => Some(Self::Empty),
            '.' => Some(Self::Pip),
            'o' => Some(Self::PowerPip),
            _ => None,
        }
    }

    pub fn glyph(self) -> char {
        match self {
            Self::Wall => '#',
            Self::Empty => ' ',
            Self::Pip => '.',
            Self::PowerPip => 'o',
        }
    }

    pub fn is_collectible(self) -> bool {
        matches!(self, Self::Pip | Self::PowerPip)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PipEaten {
        x: i32,
        y: i32,
    },
    PowerPelletEaten {
        x: i32,
        y: i32,
    },
    GhostEaten {
        ghost: String,
        x: i32,
        y: i32,
    },
    PlayerDeath {
        #[serde(rename = "livesLeft")]
        lives_left: u32,
    },
    LevelComplete {
        level: u32,
    },
    GameOver {
        score: u32,
    },
    PowerModeEnded,
}

#[derive(Clone, Debug, Serialize)]
pub struct PlayerView {
    #[serde(rename = "cellX")]
    pub cell_x: i32,
    #[serde(rename = "cellY")]
    pub cell_y: i32,
    pub x: f32,
    pub y: f32,
    pub dir: Direction,
    pub invincible: bool,
    #[serde(rename = "invincibleTicks")]
    pub invincible_ticks: u32,
    #[serde(rename = "mouthAngle")]
    pub mouth_angle: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct GhostView {
    pub name: String,
    pub color: String,
    #[serde(rename = "cellX")]
    pub cell_x: i32,
    #[serde(rename = "cellY")]
    pub cell_y: i32,
    pub x: f32,
    pub y: f32,
    pub dir: Direction,
    pub frightened: bool,
    #[serde(rename = "frightenedTicks")]
    pub frightened_ticks: u32,
    pub speed: f32,
}

#[derive(Clone, Debug, Serialize)]
pub struct GameSnapshot {
    pub tick: u64,
    pub score: u32,
    pub lives: u32,
    pub level: u32,
    #[serde(rename = "gameOver")]
    pub game_over: bool,
    pub paused: bool,
    #[serde(rename = "pipsRemaining")]
    pub pips_remaining: u32,
    pub player: PlayerView,
    pub ghosts: Vec<GhostView>,
    pub tiles: Vec<String>,
}
