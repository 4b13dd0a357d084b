use winit::keyboard::KeyCode;

use crate::config::Motion;
use crate::player::Player;
use crate::scene::Scene;

/// Player mutation triggered by a single key press
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Forward,
    Backward,
    TurnLeft,
    TurnRight,
}

impl Action {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::KeyW | KeyCode::ArrowUp => Some(Self::Forward),
            KeyCode::KeyS | KeyCode::ArrowDown => Some(Self::Backward),
            KeyCode::KeyA | KeyCode::ArrowLeft => Some(Self::TurnLeft),
            KeyCode::KeyD | KeyCode::ArrowRight => Some(Self::TurnRight),
            _ => None,
        }
    }

    /// Returns whether the player changed and the view needs redrawing
    pub fn apply(self, player: &mut Player, scene: &Scene, motion: &Motion) -> bool {
        match self {
            Self::Forward => player.walk(motion.step_length, scene),
            Self::Backward => player.walk(-motion.step_length, scene),
            // y grows downwards on screen, so a left turn lowers the angle
            Self::TurnLeft => {
                player.turn(-motion.turn_step);
                true
            }
            Self::TurnRight => {
                player.turn(motion.turn_step);
                true
            }
        }
    }
}
