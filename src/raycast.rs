use log::error;

use crate::scene::{Cell, Scene, Tile};
use crate::vector::Vector2D;

/// Nudge applied before rounding so a coordinate sitting exactly on a grid
/// line resolves to the next line / cell in the direction of travel.
pub const EPSILON: f64 = 1e-6;

#[inline]
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Next grid line from `component` when moving along `delta`.
/// A component already on a line moves on to the following one.
#[inline]
pub fn snap(component: f64, delta: f64, epsilon: f64) -> f64 {
    if delta > 0.0 {
        (component + epsilon).ceil()
    } else if delta < 0.0 {
        (component - epsilon).floor()
    } else {
        component
    }
}

/// Next point past `p2` on the line `p1 -> p2` that lies on a grid line.
pub fn ray_step(p1: Vector2D, p2: Vector2D) -> Vector2D {
    let delta = p2 - p1;

    // x = p2.x, slope undefined
    if delta.x == 0.0 {
        return Vector2D::new(p2.x, snap(p2.y, delta.y, EPSILON));
    }

    // y = slope * x + intercept
    let slope = delta.y / delta.x;
    let intercept = p1.y - slope * p1.x;

    let x3 = snap(p2.x, delta.x, EPSILON);
    let vertical = Vector2D::new(x3, slope * x3 + intercept);
    if slope == 0.0 {
        return vertical;
    }

    let y4 = snap(p2.y, delta.y, EPSILON);
    let horizontal = Vector2D::new((y4 - intercept) / slope, y4);

    // Ties keep the vertical crossing
    if p2.distance_to(horizontal) < p2.distance_to(vertical) {
        horizontal
    } else {
        vertical
    }
}

/// Cell that `p2` is in, resolving boundary points to the cell being entered.
#[inline]
pub fn hitting_cell(p1: Vector2D, p2: Vector2D) -> Cell {
    let delta = p2 - p1;
    Cell::new(
        (p2.x + sign(delta.x) * EPSILON).floor() as i32,
        (p2.y + sign(delta.y) * EPSILON).floor() as i32,
    )
}

/// Successive points of a ray marched through the grid.
///
/// Yields `p2` first, then every grid-line crossing, and stops after the
/// point whose cell is outside the scene or occupied. The last item is the
/// cast result.
pub struct RaySteps<'a> {
    scene: &'a Scene,
    p1: Vector2D,
    p2: Vector2D,
    steps: usize,
    max_steps: usize,
    done: bool,
}

impl<'a> RaySteps<'a> {
    pub fn new(scene: &'a Scene, p1: Vector2D, p2: Vector2D) -> Self {
        Self {
            scene,
            p1,
            p2,
            steps: 0,
            // A ray crosses each vertical and horizontal grid line at most once
            max_steps: scene.width() + scene.height() + 4,
            done: false,
        }
    }

    fn finish(&mut self) -> Option<Vector2D> {
        self.done = true;
        Some(self.p2)
    }
}

impl Iterator for RaySteps<'_> {
    type Item = Vector2D;

    fn next(&mut self) -> Option<Vector2D> {
        if self.done {
            return None;
        }

        let cell = hitting_cell(self.p1, self.p2);
        if !self.scene.contains(cell) || self.scene.is_occupied(cell) {
            return self.finish();
        }

        // Zero-length segment has no direction to march in
        if self.p1 == self.p2 {
            return self.finish();
        }

        if self.steps >= self.max_steps {
            error!(
                "ray from {:?} through {:?} exceeded {} steps, stopping",
                self.p1, self.p2, self.max_steps
            );
            return self.finish();
        }

        let current = self.p2;
        let next = ray_step(self.p1, self.p2);
        if !next.is_finite() || (next - current).dot(current - self.p1) <= 0.0 {
            error!(
                "ray step from {:?} to {:?} made no progress ({:?})",
                self.p1, current, next
            );
            return self.finish();
        }

        self.p1 = current;
        self.p2 = next;
        self.steps += 1;
        Some(current)
    }
}

/// Point where the ray through `p1 -> p2` leaves the scene or lands on a tile.
pub fn cast_ray(scene: &Scene, p1: Vector2D, p2: Vector2D) -> Vector2D {
    RaySteps::new(scene, p1, p2).last().unwrap_or(p2)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vector2D,
    pub cell: Cell,
    /// `None` when the ray left the scene
    pub tile: Option<Tile>,
}

/// Cast from `origin` toward `target` and resolve the cell the ray ended in.
pub fn cast(scene: &Scene, origin: Vector2D, target: Vector2D) -> RayHit {
    let point = cast_ray(scene, origin, target);
    let cell = hitting_cell(origin, point);
    RayHit {
        point,
        cell,
        tile: scene.tile(cell),
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::scene::Color;

    fn v(x: f64, y: f64) -> Vector2D {
        Vector2D::new(x, y)
    }

    #[test]
    fn snap_moves_off_grid_lines() {
        assert_eq!(snap(1.3, 1.0, EPSILON), 2.0);
        assert_eq!(snap(1.3, -1.0, EPSILON), 1.0);
        assert_eq!(snap(1.0, 0.5, EPSILON), 2.0);
        assert_eq!(snap(1.0, -0.5, EPSILON), 0.0);
    }

    #[test]
    fn snap_without_motion_is_identity() {
        assert_eq!(snap(3.0, 0.0, EPSILON), 3.0);
        assert_eq!(snap(2.7, 0.0, EPSILON), 2.7);
    }

    #[test]
    fn vertical_ray_steps_along_y() {
        assert_eq!(ray_step(v(0.5, 0.5), v(0.5, 0.7)), v(0.5, 1.0));
        assert_eq!(ray_step(v(0.5, 0.7), v(0.5, 1.0)), v(0.5, 2.0));
        assert_eq!(ray_step(v(0.5, 2.5), v(0.5, 2.0)), v(0.5, 1.0));
    }

    #[test]
    fn horizontal_ray_steps_along_x() {
        assert_eq!(ray_step(v(0.2, 3.5), v(0.4, 3.5)), v(1.0, 3.5));
        assert_eq!(ray_step(v(3.0, 3.5), v(2.0, 3.5)), v(1.0, 3.5));
    }

    #[test]
    fn zero_length_step_returns_same_point() {
        assert_eq!(ray_step(v(1.5, 1.5), v(1.5, 1.5)), v(1.5, 1.5));
    }

    #[test]
    fn oblique_ray_picks_nearer_crossing() {
        // Shallow: hits x = 1 before y = 1
        let p = ray_step(v(0.0, 0.5), v(0.5, 0.6));
        assert_relative_eq!(p.x, 1.0);
        assert_relative_eq!(p.y, 0.7, epsilon = 1e-12);

        // Steep: hits y = 1 before x = 1
        let p = ray_step(v(0.5, 0.0), v(0.6, 0.5));
        assert_relative_eq!(p.x, 0.7, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0);
    }

    #[test]
    fn step_always_makes_progress() {
        let rays = [
            (v(0.45, 0.5), v(1.0, 1.0)),
            (v(4.5, 5.0), v(3.2, 1.1)),
            (v(2.0, 2.0), v(3.0, 2.0)),
            (v(7.9, 0.1), v(0.3, 6.6)),
            (v(1.0, 1.0), v(2.0, 2.0)),
        ];
        for (p1, p2) in rays {
            let p3 = ray_step(p1, p2);
            assert!(
                p1.distance_to(p3) > p1.distance_to(p2),
                "{p1:?} -> {p2:?} stepped back to {p3:?}"
            );
            // Still on the same line
            let along = (p3 - p1).normalize().dot((p2 - p1).normalize());
            assert_relative_eq!(along, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn cell_bias_picks_entered_cell() {
        assert_eq!(hitting_cell(v(0.9, 0.5), v(1.0, 0.5)), Cell::new(1, 0));
        assert_eq!(hitting_cell(v(1.1, 0.5), v(1.0, 0.5)), Cell::new(0, 0));
        assert_eq!(hitting_cell(v(0.5, 2.5), v(0.5, 2.0)), Cell::new(0, 1));
        assert_eq!(hitting_cell(v(0.5, 0.5), v(0.5, 0.5)), Cell::new(0, 0));
    }

    #[test]
    fn cast_exits_empty_scene_at_boundary() {
        let scene = Scene::empty(8, 8);
        let steps: Vec<_> = RaySteps::new(&scene, v(0.45, 0.5), v(1.0, 1.0)).collect();
        let end = *steps.last().expect("at least one point");
        assert!(end.x == 8.0 || end.y == 8.0, "ended at {end:?}");
        assert!(steps.len() - 1 <= scene.width() + scene.height());
        assert_eq!(cast_ray(&scene, v(0.45, 0.5), v(1.0, 1.0)), end);
    }

    #[test]
    fn cast_toward_outside_target_stops_at_target() {
        let scene = Scene::empty(8, 8);
        assert_eq!(cast_ray(&scene, v(0.45, 0.5), v(10.0, 10.0)), v(10.0, 10.0));
    }

    #[test]
    fn cast_hits_occupied_cell() {
        let red = Some(Tile::new(Color::RED));
        let scene = Scene::new(vec![vec![None; 4], vec![None, red, red, red]]);
        let hit = cast(&scene, v(0.5, 0.5), v(1.5, 1.5));
        assert_eq!(hit.cell, Cell::new(1, 1));
        assert_eq!(hit.tile, red);
        assert!(hit.point.x >= 1.0 && hit.point.x <= 2.0);
        assert!(hit.point.y >= 1.0 && hit.point.y <= 2.0);
    }

    #[test]
    fn cast_hits_wall_behind_start() {
        let wall = Some(Tile::new(Color::GREY));
        let scene = Scene::new(vec![vec![wall, None, None, None]; 3]);
        let hit = cast(&scene, v(3.5, 1.5), v(2.5, 1.5));
        assert_eq!(hit.point, v(1.0, 1.5));
        assert_eq!(hit.cell, Cell::new(0, 1));
        assert_eq!(hit.tile, wall);
    }

    #[test]
    fn zero_length_cast_terminates() {
        let scene = Scene::empty(4, 4);
        let p = v(1.5, 2.5);
        assert_eq!(RaySteps::new(&scene, p, p).count(), 1);
        assert_eq!(cast_ray(&scene, p, p), p);
    }

    #[test]
    fn degenerate_scene_is_immediately_out_of_bounds() {
        let scene = Scene::new(Vec::new());
        let hit = cast(&scene, v(0.5, 0.5), v(0.7, 0.9));
        assert_eq!(hit.point, v(0.7, 0.9));
        assert_eq!(hit.tile, None);
    }

    #[test]
    fn diagonal_passes_through_corners() {
        let scene = Scene::empty(4, 4);
        let points: Vec<_> = RaySteps::new(&scene, v(0.5, 0.5), v(1.0, 1.0)).collect();
        assert_eq!(points, vec![v(1.0, 1.0), v(2.0, 2.0), v(3.0, 3.0), v(4.0, 4.0)]);
    }
}
