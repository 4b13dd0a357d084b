use log::debug;

use crate::config::View;
use crate::raycast::hitting_cell;
use crate::scene::Scene;
use crate::vector::Vector2D;

/// Viewer position in scene space plus facing angle.
/// `direction` is never wrapped, only its sine/cosine matter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Player {
    pub position: Vector2D,
    pub direction: f64,
}

impl Player {
    pub fn new(position: Vector2D, direction: f64) -> Self {
        Self {
            position,
            direction,
        }
    }

    /// Starting spot a little left of the scene centre, facing +x
    pub fn spawn(scene: &Scene) -> Self {
        Self::new(scene.size() * Vector2D::new(0.45, 0.5), 0.0)
    }

    #[inline]
    pub fn forward(&self) -> Vector2D {
        Vector2D::from_angle(self.direction)
    }

    /// Left and right edges of the view cone on the near plane
    pub fn fov_range(&self, view: &View) -> (Vector2D, Vector2D) {
        let near_point = self.position + self.forward().scale(view.near);
        let perp_distance = view.near * (view.fov * 0.5).tan();
        let perp = (near_point - self.position)
            .normalize()
            .rotate90()
            .scale(perp_distance);
        (near_point - perp, near_point + perp)
    }

    /// Move `distance` along the facing vector (negative walks backwards).
    /// Returns false and stays put if the destination cell is occupied.
    pub fn walk(&mut self, distance: f64, scene: &Scene) -> bool {
        let target = self.position + self.forward().scale(distance);
        let cell = hitting_cell(self.position, target);
        if scene.is_occupied(cell) {
            debug!("move to {target:?} blocked by {cell:?}");
            return false;
        }
        self.position = target;
        true
    }

    #[inline]
    pub fn turn(&mut self, angle: f64) {
        self.direction += angle;
    }
}
