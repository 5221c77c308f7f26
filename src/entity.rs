use crate::constants::ARRIVAL_EPSILON;
use crate::grid::{cell_center, GridMap};
use crate::types::Direction;

/// What a body does when its chosen heading runs into a wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blocked {
    Stop,
    Reverse,
}

/// Direction-decision strategy plugged into the shared movement model.
pub trait Steer {
    /// Only consulted while the body sits on its cell centre.
    fn choose(&mut self, body: &Body, grid: &GridMap) -> Direction;

    fn on_blocked(&self) -> Blocked;
}

/// Grid-locked movement shared by the player and the ghosts.
///
/// `cell_x`/`cell_y` is the logical tile: the one being entered while in
/// transit, the one occupied once arrived. `x`/`y` glide toward the centre of
/// that tile at `speed` pixels per tick and never overshoot it, so arrival is
/// always an exact landing regardless of speed.
#[derive(Clone, Debug)]
pub struct Body {
    pub cell_x: i32,
    pub cell_y: i32,
    pub x: f32,
    pub y: f32,
    pub target_x: f32,
    pub target_y: f32,
    pub dir: Direction,
    pub speed: f32,
}

impl Body {
    pub fn new(cell: (i32, i32), dir: Direction, speed: f32) -> Self {
        let mut body = Self {
            cell_x: cell.0,
            cell_y: cell.1,
            x: 0.0,
            y: 0.0,
            target_x: 0.0,
            target_y: 0.0,
            dir,
            speed,
        };
        body.place(cell);
        body
    }

    pub fn cell(&self) -> (i32, i32) {
        (self.cell_x, self.cell_y)
    }

    /// Teleports onto a cell centre with nothing left to interpolate.
    pub fn place(&mut self, cell: (i32, i32)) {
        self.cell_x = cell.0;
        self.cell_y = cell.1;
        self.x = cell_center(cell.0);
        self.y = cell_center(cell.1);
        self.target_x = self.x;
        self.target_y = self.y;
    }

    pub fn is_at_center(&self) -> bool {
        (self.x - cell_center(self.cell_x)).abs() < ARRIVAL_EPSILON
            && (self.y - cell_center(self.cell_y)).abs() < ARRIVAL_EPSILON
    }

    pub fn distance_to(&self, other: &Body) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn advance<S: Steer + ?Sized>(&mut self, grid: &GridMap, steer: &mut S) {
        if self.is_at_center() {
            self.x = cell_center(self.cell_x);
            self.y = cell_center(self.cell_y);
            self.dir = steer.choose(self, grid);
            if self.dir.is_moving() {
                self.enter_next_cell(grid, steer.on_blocked());
            }
        }

        self.x = step_toward(self.x, self.target_x, self.speed);
        self.y = step_toward(self.y, self.target_y, self.speed);
    }

    fn enter_next_cell(&mut self, grid: &GridMap, blocked: Blocked) {
        let (nx, ny) = grid.neighbor(self.cell(), self.dir);
        if grid.is_wall_cell(nx, ny) {
            self.dir = match blocked {
                Blocked::Stop => Direction::None,
                Blocked::Reverse => self.dir.reverse(),
            };
            return;
        }

        let (dx, dy) = self.dir.delta();
        self.cell_x += dx;
        self.cell_y += dy;
        if grid.in_bounds(self.cell_x, self.cell_y) {
            self.target_x = cell_center(self.cell_x);
            self.target_y = cell_center(self.cell_y);
        } else {
            // Off the edge: reappear on the far side without gliding across.
            self.place(grid.wrap_cell(self.cell_x, self.cell_y));
        }
    }
}

fn step_toward(pos: f32, target: f32, speed: f32) -> f32 {
    if pos < target {
        (pos + speed).min(target)
    } else if pos > target {
        (pos - speed).max(target)
    } else {
        pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TILE_SIZE;

    struct Fixed(Direction, Blocked);

    impl Steer for Fixed {
        fn choose(&mut self, body: &Body, _grid: &GridMap) -> Direction {
            if self.0.is_moving() {
                self.0
            } else {
                body.dir
            }
        }

        fn on_blocked(&self) -> Blocked {
            self.1
        }
    }

    fn corridor() -> GridMap {
        GridMap::from_rows(&["#####", "     ", "#####"]).expect("valid corridor")
    }

    #[test]
    fn body_reaches_next_centre_exactly_without_overshoot() {
        let grid = corridor();
        let mut body = Body::new((1, 1), Direction::Right, 3.0);
        let mut steer = Fixed(Direction::None, Blocked::Stop);

        body.advance(&grid, &mut steer);
        assert_eq!(body.cell(), (2, 1));
        assert!(!body.is_at_center());

        let mut ticks = 1;
        while !body.is_at_center() {
            body.advance(&grid, &mut steer);
            ticks += 1;
            assert!(body.x <= cell_center(2));
            assert!(ticks < 100);
        }
        assert_eq!(body.x, cell_center(2));
        assert_eq!(body.y, cell_center(1));
        assert_eq!(ticks, (TILE_SIZE / 3.0).ceil() as i32);
    }

    #[test]
    fn fast_body_never_skips_a_centre() {
        let grid = corridor();
        let mut body = Body::new((0, 1), Direction::Right, 17.0);
        let mut steer = Fixed(Direction::None, Blocked::Stop);
        let mut visited = vec![body.cell()];
        for _ in 0..12 {
            body.advance(&grid, &mut steer);
            if body.is_at_center() && visited.last() != Some(&body.cell()) {
                visited.push(body.cell());
            }
        }
        assert_eq!(&visited[..4], &[(0, 1), (1, 1), (2, 1), (3, 1)]);
    }

    #[test]
    fn wall_stops_or_reverses_without_leaving_the_cell() {
        let grid = GridMap::from_rows(&["#####", "#   #", "#####"]).expect("valid room");

        let mut stopper = Body::new((3, 1), Direction::Right, 2.0);
        stopper.advance(&grid, &mut Fixed(Direction::None, Blocked::Stop));
        assert_eq!(stopper.cell(), (3, 1));
        assert_eq!(stopper.dir, Direction::None);
        assert_eq!(stopper.x, cell_center(3));

        let mut bouncer = Body::new((3, 1), Direction::Right, 2.0);
        bouncer.advance(&grid, &mut Fixed(Direction::None, Blocked::Reverse));
        assert_eq!(bouncer.cell(), (3, 1));
        assert_eq!(bouncer.dir, Direction::Left);
    }

    #[test]
    fn leaving_an_open_edge_wraps_and_snaps() {
        let grid = corridor();
        let mut body = Body::new((0, 1), Direction::Left, 2.5);
        body.advance(&grid, &mut Fixed(Direction::None, Blocked::Stop));
        assert_eq!(body.cell(), (4, 1));
        assert_eq!(body.x, cell_center(4));
        assert_eq!(body.target_x, cell_center(4));
        assert!(body.is_at_center());

        let mut body = Body::new((4, 1), Direction::Right, 2.5);
        for _ in 0..200 {
            body.advance(&grid, &mut Fixed(Direction::None, Blocked::Stop));
            assert!(grid.in_bounds(body.cell_x, body.cell_y));
            assert!((body.x - cell_center(body.cell_x)).abs() <= TILE_SIZE);
        }
    }

    #[test]
    fn turns_only_happen_on_centres() {
        let grid = GridMap::from_rows(&["#####", "#   #", "# # #", "#   #", "#####"])
            .expect("valid loop");
        let mut body = Body::new((1, 1), Direction::Right, 4.0);
        body.advance(&grid, &mut Fixed(Direction::None, Blocked::Stop));
        assert_eq!(body.cell(), (2, 1));

        let mut steer = Fixed(Direction::Down, Blocked::Stop);
        body.advance(&grid, &mut steer);
        assert_eq!(body.dir, Direction::Right);
        assert!(body.y == cell_center(1));
    }
}
