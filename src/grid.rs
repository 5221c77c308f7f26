use thiserror::Error;

use crate::constants::{MAP_TEMPLATE, PIP_SCORE, POWER_PIP_SCORE, TILE_SIZE};
use crate::types::{Direction, TileKind};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    #[error("map layout has no tiles")]
    Empty,
    #[error("row {row} is {found} tiles wide, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile glyph {glyph:?} at ({x},{y})")]
    UnknownGlyph { glyph: char, x: usize, y: usize },
}

/// Tile layout plus pip bookkeeping. The template is kept so `reset` can
/// restore every pip without re-parsing.
#[derive(Clone, Debug)]
pub struct GridMap {
    width: i32,
    height: i32,
    template: Vec<TileKind>,
    tiles: Vec<TileKind>,
    total_pips: u32,
    collected_pips: u32,
}

impl GridMap {
    pub fn standard() -> Self {
        Self::from_rows(&MAP_TEMPLATE).expect("built-in layout is a valid map")
    }

    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        let expected = rows.first().map(|row| row.as_ref().chars().count()).unwrap_or(0);
        if expected == 0 {
            return Err(MapError::Empty);
        }

        let mut template = Vec::with_capacity(expected * rows.len());
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != expected {
                return Err(MapError::Ragged {
                    row: y,
                    expected,
                    found,
                });
            }
            for (x, glyph) in row.chars().enumerate() {
                let tile =
                    TileKind::parse_glyph(glyph).ok_or(MapError::UnknownGlyph { glyph, x, y })?;
                template.push(tile);
            }
        }

        let total_pips = template.iter().filter(|tile| tile.is_collectible()).count() as u32;
        Ok(Self {
            width: expected as i32,
            height: rows.len() as i32,
            tiles: template.clone(),
            template,
            total_pips,
            collected_pips: 0,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn total_pips(&self) -> u32 {
        self.total_pips
    }

    pub fn collected_pips(&self) -> u32 {
        self.collected_pips
    }

    pub fn remaining_pips(&self) -> u32 {
        self.total_pips.saturating_sub(self.collected_pips)
    }

    pub fn in_bounds(&self, cell_x: i32, cell_y: i32) -> bool {
        cell_x >= 0 && cell_y >= 0 && cell_x < self.width && cell_y < self.height
    }

    /// Folds a cell that stepped off one edge back onto the opposite edge.
    pub fn wrap_cell(&self, cell_x: i32, cell_y: i32) -> (i32, i32) {
        (cell_x.rem_euclid(self.width), cell_y.rem_euclid(self.height))
    }

    /// Wrapped destination of one step from `cell` in `dir`.
    pub fn neighbor(&self, cell: (i32, i32), dir: Direction) -> (i32, i32) {
        let (dx, dy) = dir.delta();
        self.wrap_cell(cell.0 + dx, cell.1 + dy)
    }

    pub fn tile_at_cell(&self, cell_x: i32, cell_y: i32) -> TileKind {
        match self.index_of(cell_x, cell_y) {
            Some(idx) => self.tiles[idx],
            None => TileKind::Wall,
        }
    }

    pub fn tile_at(&self, pixel_x: f32, pixel_y: f32) -> TileKind {
        self.tile_at_cell(pixel_to_cell(pixel_x), pixel_to_cell(pixel_y))
    }

    pub fn is_wall(&self, pixel_x: f32, pixel_y: f32) -> bool {
        self.tile_at(pixel_x, pixel_y) == TileKind::Wall
    }

    pub fn is_wall_cell(&self, cell_x: i32, cell_y: i32) -> bool {
        self.tile_at_cell(cell_x, cell_y) == TileKind::Wall
    }

    /// Clears a pip under the pixel position and returns its score, or 0.
    pub fn collect_pip_at(&mut self, pixel_x: f32, pixel_y: f32) -> u32 {
        let Some(idx) = self.index_of(pixel_to_cell(pixel_x), pixel_to_cell(pixel_y)) else {
            return 0;
        };
        let gained = match self.tiles[idx] {
            TileKind::Pip => PIP_SCORE,
            TileKind::PowerPip => POWER_PIP_SCORE,
            TileKind::Empty | TileKind::Wall => return 0,
        };
        self.tiles[idx] = TileKind::Empty;
        self.collected_pips = (self.collected_pips + 1).min(self.total_pips);
        gained
    }

    pub fn is_level_complete(&self) -> bool {
        self.collected_pips >= self.total_pips
    }

    pub fn reset(&mut self) {
        self.tiles.clone_from(&self.template);
        self.collected_pips = 0;
    }

    pub fn rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.iter().map(|tile| tile.glyph()).collect::<String>())
            .collect()
    }

    pub fn pip_cells(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        self.tiles.iter().enumerate().filter_map(move |(idx, tile)| {
            if tile.is_collectible() {
                let idx = idx as i32;
                Some((idx % self.width, idx / self.width))
            } else {
                None
            }
        })
    }

    fn index_of(&self, cell_x: i32, cell_y: i32) -> Option<usize> {
        if !self.in_bounds(cell_x, cell_y) {
            return None;
        }
        Some((cell_y * self.width + cell_x) as usize)
    }
}

pub fn pixel_to_cell(pixel: f32) -> i32 {
    (pixel / TILE_SIZE).floor() as i32
}

pub fn cell_center(cell: i32) -> f32 {
    cell as f32 * TILE_SIZE + TILE_SIZE / 2.0
}

pub fn manhattan(a: (i32, i32), b: (i32, i32)) -> i32 {
    (a.0 - b.0).abs() + (a.1 - b.1).abs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{GRID_HEIGHT, GRID_WIDTH};

    #[test]
    fn standard_layout_matches_reference_dimensions() {
        let grid = GridMap::standard();
        assert_eq!(grid.width(), GRID_WIDTH);
        assert_eq!(grid.height(), GRID_HEIGHT);
        assert_eq!(grid.rows(), MAP_TEMPLATE.to_vec());
        assert_eq!(grid.pip_cells().count() as u32, grid.total_pips());
        assert!(grid.total_pips() > 0);
        assert_eq!(grid.tile_at_cell(1, 3), TileKind::PowerPip);
    }

    #[test]
    fn out_of_bounds_queries_are_walls() {
        let grid = GridMap::standard();
        assert!(grid.is_wall(-1.0, 60.0));
        assert!(grid.is_wall(60.0, -0.5));
        assert!(grid.is_wall(TILE_SIZE * GRID_WIDTH as f32 + 1.0, 60.0));
        assert!(grid.is_wall(60.0, TILE_SIZE * GRID_HEIGHT as f32));
        assert_eq!(grid.tile_at_cell(-3, 99), TileKind::Wall);
    }

    #[test]
    fn collect_pip_is_idempotent() {
        let mut grid = GridMap::standard();
        let (x, y) = (cell_center(1), cell_center(1));
        assert_eq!(grid.tile_at(x, y), TileKind::Pip);
        assert_eq!(grid.collect_pip_at(x, y), PIP_SCORE);
        assert_eq!(grid.collect_pip_at(x, y), 0);
        assert_eq!(grid.collect_pip_at(x + 5.0, y - 5.0), 0);
        assert_eq!(grid.tile_at(x, y), TileKind::Empty);
        assert_eq!(grid.collected_pips(), 1);
    }

    #[test]
    fn power_pip_scores_fifty_and_walls_score_nothing() {
        let mut grid = GridMap::standard();
        assert_eq!(grid.collect_pip_at(cell_center(1), cell_center(3)), POWER_PIP_SCORE);
        assert_eq!(grid.collect_pip_at(cell_center(0), cell_center(0)), 0);
        assert_eq!(grid.collect_pip_at(cell_center(6), cell_center(7)), 0);
        assert_eq!(grid.collected_pips(), 1);
    }

    #[test]
    fn collecting_everything_completes_level_and_reset_restores() {
        let mut grid = GridMap::standard();
        let cells: Vec<(i32, i32)> = grid.pip_cells().collect();
        let mut last = 0;
        for (cx, cy) in &cells {
            assert!(!grid.is_level_complete());
            grid.collect_pip_at(cell_center(*cx), cell_center(*cy));
            assert!(grid.collected_pips() > last);
            assert!(grid.collected_pips() <= grid.total_pips());
            last = grid.collected_pips();
        }
        assert!(grid.is_level_complete());
        assert_eq!(grid.remaining_pips(), 0);

        grid.reset();
        assert_eq!(grid.collected_pips(), 0);
        assert_eq!(grid.rows(), MAP_TEMPLATE.to_vec());
        assert!(!grid.is_level_complete());
    }

    #[test]
    fn wrap_folds_both_axes() {
        let grid = GridMap::standard();
        assert_eq!(grid.wrap_cell(-1, 8), (GRID_WIDTH - 1, 8));
        assert_eq!(grid.wrap_cell(GRID_WIDTH, 8), (0, 8));
        assert_eq!(grid.wrap_cell(3, -1), (3, GRID_HEIGHT - 1));
        assert_eq!(grid.neighbor((0, 8), Direction::Left), (GRID_WIDTH - 1, 8));
    }

    #[test]
    fn from_rows_rejects_malformed_layouts() {
        let empty: [&str; 0] = [];
        assert_eq!(GridMap::from_rows(&empty).unwrap_err(), MapError::Empty);
        assert_eq!(
            GridMap::from_rows(&["###", "##"]).unwrap_err(),
            MapError::Ragged {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            GridMap::from_rows(&["#x#"]).unwrap_err(),
            MapError::UnknownGlyph {
                glyph: 'x',
                x: 1,
                y: 0
            }
        );
    }
}
