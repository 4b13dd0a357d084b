use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::vector::Vector2D;

/// 0RGB packed pixel, the layout softbuffer presents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub const RED: Self = Self::rgb(220, 60, 60);
    pub const GREEN: Self = Self::rgb(80, 200, 100);
    pub const BLUE: Self = Self::rgb(70, 110, 230);
    pub const YELLOW: Self = Self::rgb(230, 210, 70);
    pub const CYAN: Self = Self::rgb(70, 210, 220);
    pub const MAGENTA: Self = Self::rgb(200, 80, 200);
    pub const WHITE: Self = Self::rgb(235, 235, 235);
    pub const GREY: Self = Self::rgb(140, 140, 140);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self((b as u32) | ((g as u32) << 8) | ((r as u32) << 16))
    }
}

/// Occupancy marker of a single cell. A cell without one is open space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub color: Color,
}

impl Tile {
    pub const fn new(color: Color) -> Self {
        Self { color }
    }

    fn from_char(c: char) -> Option<Option<Self>> {
        let color = match c {
            '.' | ' ' => return Some(None),
            'r' => Color::RED,
            'g' => Color::GREEN,
            'b' => Color::BLUE,
            'y' => Color::YELLOW,
            'c' => Color::CYAN,
            'm' => Color::MAGENTA,
            'w' => Color::WHITE,
            '#' => Color::GREY,
            _ => return None,
        };
        Some(Some(Self::new(color)))
    }
}

/// Integer grid coordinate, may lie outside the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Top-left corner in scene space
    pub fn origin(self) -> Vector2D {
        Vector2D::new(self.x as f64, self.y as f64)
    }
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to read map {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown tile {tile:?} at line {line}, column {column}")]
    UnknownTile {
        tile: char,
        line: usize,
        column: usize,
    },
}

const DEFAULT_MAP: &str = "\
..........
..r.......
..r..gg...
..r.......
..........
.....bbb..
.y........
.y....c...
......c...
..........";

/// Row-major tile grid addressed `[y][x]`. Rows may have different lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    rows: Vec<Vec<Option<Tile>>>,
    width: usize,
}

impl Scene {
    pub fn new(rows: Vec<Vec<Option<Tile>>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        Self { rows, width }
    }

    pub fn empty(width: usize, height: usize) -> Self {
        Self::new(vec![vec![None; width]; height])
    }

    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let text = fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        text.parse()
    }

    /// Longest row
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn size(&self) -> Vector2D {
        Vector2D::new(self.width as f64, self.height() as f64)
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.width
            && (cell.y as usize) < self.height()
    }

    /// Anything outside the grid, including past the end of a short row, is open
    pub fn tile(&self, cell: Cell) -> Option<Tile> {
        if cell.x < 0 || cell.y < 0 {
            return None;
        }
        self.rows
            .get(cell.y as usize)?
            .get(cell.x as usize)
            .copied()
            .flatten()
    }

    #[inline]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.tile(cell).is_some()
    }

    pub fn tiles(&self) -> impl Iterator<Item = (Cell, Tile)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter().enumerate().filter_map(move |(x, tile)| {
                tile.map(|tile| (Cell::new(x as i32, y as i32), tile))
            })
        })
    }
}

impl Default for Scene {
    fn default() -> Self {
        // The built-in map only uses known tiles
        DEFAULT_MAP.parse().unwrap_or_else(|_| Self::empty(10, 10))
    }
}

impl FromStr for Scene {
    type Err = SceneError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let rows = text
            .lines()
            .enumerate()
            .map(|(line, row)| {
                row.chars()
                    .enumerate()
                    .map(|(column, c)| {
                        Tile::from_char(c).ok_or_else(|| SceneError::UnknownTile {
                            tile: c,
                            line: line + 1,
                            column: column + 1,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jagged_rows_use_longest_width() {
        let scene: Scene = "r\n..g\n.".parse().expect("valid map");
        assert_eq!(scene.width(), 3);
        assert_eq!(scene.height(), 3);
        assert!(scene.contains(Cell::new(2, 2)));
        assert_eq!(scene.tile(Cell::new(2, 1)), Some(Tile::new(Color::GREEN)));
        // Past the end of a short row
        assert_eq!(scene.tile(Cell::new(2, 2)), None);
    }

    #[test]
    fn out_of_range_is_open_not_error() {
        let scene: Scene = "rr\nrr".parse().expect("valid map");
        for cell in [Cell::new(-1, 0), Cell::new(0, -1), Cell::new(2, 0), Cell::new(0, 2)] {
            assert!(!scene.contains(cell));
            assert_eq!(scene.tile(cell), None);
        }
    }

    #[test]
    fn degenerate_scene() {
        let scene: Scene = "".parse().expect("empty map");
        assert_eq!(scene.width(), 0);
        assert_eq!(scene.height(), 0);
        assert!(!scene.contains(Cell::new(0, 0)));
    }

    #[test]
    fn unknown_tile_reports_position() {
        let err = "..\n.x".parse::<Scene>().unwrap_err();
        match err {
            SceneError::UnknownTile { tile, line, column } => {
                assert_eq!((tile, line, column), ('x', 2, 2));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn default_scene_has_open_start() {
        let scene = Scene::default();
        assert_eq!((scene.width(), scene.height()), (10, 10));
        assert!(!scene.is_occupied(Cell::new(4, 5)));
        assert_eq!(scene.tiles().count(), 12);
    }

    #[test]
    fn load_bundled_map() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("maps/arena.map");
        let scene = Scene::load(&path).expect("bundled map parses");
        assert_eq!((scene.width(), scene.height()), (16, 12));
        // Closed border
        assert!(scene.is_occupied(Cell::new(0, 0)));
        assert!(scene.is_occupied(Cell::new(15, 11)));
    }

    #[test]
    fn load_missing_file() {
        let err = Scene::load(Path::new("/definitely/not/here.map")).unwrap_err();
        assert!(matches!(err, SceneError::Io { .. }));
    }
}
