use rayon::prelude::*;

use crate::config::View;
use crate::player::Player;
use crate::raycast::{RaySteps, cast};
use crate::scene::{Color, Scene};
use crate::vector::Vector2D;

const SKY: Color = Color::rgb(30, 30, 70);
const GROUND: Color = Color::rgb(40, 40, 40);

const MINIMAP_BACKGROUND: Color = Color::rgb(0x3b, 0x3b, 0x3b);
const GRID_LINE: Color = Color::rgb(255, 255, 255);
const PLAYER_COLOR: Color = Color::rgb(255, 0, 255);
const RAY_COLOR: Color = Color::rgb(255, 165, 0);

/// In cells, scaled by the minimap
const GRID_LINE_WIDTH: f64 = 0.02;
const LINE_WIDTH: f64 = 0.05;
const POINT_RADIUS: f64 = 0.12;

/// Drawing capability the renderer is handed; coordinates are in pixels
pub trait Surface {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn fill_circle(&mut self, center: Vector2D, radius: f64, color: Color);
    fn draw_line(&mut self, start: Vector2D, end: Vector2D, width: f64, color: Color);
    fn fill_rect(&mut self, origin: Vector2D, width: f64, height: f64, color: Color);
}

/// One screen column of wall
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strip {
    pub column: usize,
    /// Distance along the view direction, not along the ray
    pub depth: f64,
    pub height: f64,
    pub color: Color,
}

/// Depth of `hit` along the facing vector rather than along the ray
#[inline]
pub fn corrected_depth(player: &Player, hit: Vector2D) -> f64 {
    (hit - player.position).dot(player.forward())
}

#[inline]
pub fn strip_height(player: &Player, hit: Vector2D, canvas_height: f64) -> f64 {
    canvas_height / corrected_depth(player, hit)
}

pub fn project_column(
    scene: &Scene,
    player: &Player,
    view: &View,
    (left, right): (Vector2D, Vector2D),
    column: usize,
    canvas_height: f64,
) -> Option<Strip> {
    let target = left.lerp(right, column as f64 / view.columns as f64);
    let hit = cast(scene, player.position, target);
    let tile = hit.tile?;

    let depth = corrected_depth(player, hit.point);
    if !(depth > 0.0) || depth > view.far {
        return None;
    }

    Some(Strip {
        column,
        depth,
        height: strip_height(player, hit.point, canvas_height),
        color: tile.color,
    })
}

/// One strip per screen column, cast in parallel
pub fn project_columns(
    scene: &Scene,
    player: &Player,
    view: &View,
    canvas_height: f64,
) -> Vec<Option<Strip>> {
    let range = player.fov_range(view);
    (0..view.columns)
        .into_par_iter()
        .map(|column| project_column(scene, player, view, range, column, canvas_height))
        .collect()
}

pub fn render_frame<S: Surface>(surface: &mut S, scene: &Scene, player: &Player, view: &View) {
    let width = surface.width() as f64;
    let height = surface.height() as f64;

    // Clear background
    let mid = height * 0.5;
    surface.fill_rect(Vector2D::ZERO, width, mid, SKY);
    surface.fill_rect(Vector2D::new(0.0, mid), width, height - mid, GROUND);

    let strip_width = width / view.columns as f64;
    for strip in project_columns(scene, player, view, height)
        .into_iter()
        .flatten()
    {
        let top = (height - strip.height) * 0.5;
        surface.fill_rect(
            Vector2D::new(strip.column as f64 * strip_width, top),
            strip_width,
            strip.height,
            strip.color,
        );
    }
}

/// Top-down overlay: scene space scaled by `cell_size` pixels and offset by `origin`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Minimap {
    pub origin: Vector2D,
    pub cell_size: f64,
}

impl Minimap {
    const MARGIN: f64 = 8.0;

    /// Place the map in the top-left corner, its longer side `fraction` of
    /// the surface's shorter side
    pub fn fit(scene: &Scene, surface_width: usize, surface_height: usize, fraction: f64) -> Self {
        let cells = scene.width().max(scene.height()).max(1) as f64;
        let side = surface_width.min(surface_height) as f64 * fraction;
        Self {
            origin: Vector2D::new(Self::MARGIN, Self::MARGIN),
            cell_size: (side / cells).max(1.0),
        }
    }

    #[inline]
    pub fn to_screen(&self, p: Vector2D) -> Vector2D {
        self.origin + p.scale(self.cell_size)
    }

    #[inline]
    pub fn to_scene(&self, px: Vector2D) -> Vector2D {
        (px - self.origin).scale(1.0 / self.cell_size)
    }

    /// Grid, tiles, player, view cone, and the cursor ray with every grid crossing
    pub fn render<S: Surface>(
        &self,
        surface: &mut S,
        scene: &Scene,
        player: &Player,
        view: &View,
        cursor: Option<Vector2D>,
    ) {
        let size = scene.size().scale(self.cell_size);
        surface.fill_rect(self.origin, size.x, size.y, MINIMAP_BACKGROUND);

        for (cell, tile) in scene.tiles() {
            surface.fill_rect(
                self.to_screen(cell.origin()),
                self.cell_size,
                self.cell_size,
                tile.color,
            );
        }

        let grid_width = GRID_LINE_WIDTH * self.cell_size;
        let (cols, rows) = (scene.width(), scene.height());
        for x in 0..=cols {
            let x = x as f64;
            self.line(surface, Vector2D::new(x, 0.0), Vector2D::new(x, rows as f64), grid_width, GRID_LINE);
        }
        for y in 0..=rows {
            let y = y as f64;
            self.line(surface, Vector2D::new(0.0, y), Vector2D::new(cols as f64, y), grid_width, GRID_LINE);
        }

        let line_width = LINE_WIDTH * self.cell_size;
        let (left, right) = player.fov_range(view);
        self.line(surface, player.position, left, line_width, PLAYER_COLOR);
        self.line(surface, player.position, right, line_width, PLAYER_COLOR);
        self.line(surface, left, right, line_width, PLAYER_COLOR);
        self.circle(surface, player.position, PLAYER_COLOR);

        if let Some(cursor) = cursor {
            let mut prev = player.position;
            for point in RaySteps::new(scene, player.position, cursor) {
                self.line(surface, prev, point, line_width, RAY_COLOR);
                self.circle(surface, point, RAY_COLOR);
                prev = point;
            }
        }
    }

    fn line<S: Surface>(&self, surface: &mut S, a: Vector2D, b: Vector2D, width: f64, color: Color) {
        surface.draw_line(self.to_screen(a), self.to_screen(b), width, color);
    }

    fn circle<S: Surface>(&self, surface: &mut S, center: Vector2D, color: Color) {
        surface.fill_circle(self.to_screen(center), POINT_RADIUS * self.cell_size, color);
    }
}
