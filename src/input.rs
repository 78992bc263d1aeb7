use crate::board::Direction;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SWIPE_MIN_DISTANCE: f64 = 50.0;

/// `KeyboardEvent.code` values bound to each direction.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ControlBindings {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub left: Vec<String>,
    pub right: Vec<String>,
}

impl Default for ControlBindings {
    fn default() -> Self {
        Self {
            up: vec!["ArrowUp".to_string(), "KeyW".to_string()],
            down: vec!["ArrowDown".to_string(), "KeyS".to_string()],
            left: vec!["ArrowLeft".to_string(), "KeyA".to_string()],
            right: vec!["ArrowRight".to_string(), "KeyD".to_string()],
        }
    }
}

impl ControlBindings {
    pub fn direction_for(&self, code: &str) -> Option<Direction> {
        let bound = |keys: &[String]| keys.iter().any(|k| k == code);
        if bound(&self.up) {
            Some(Direction::Up)
        } else if bound(&self.down) {
            Some(Direction::Down)
        } else if bound(&self.left) {
            Some(Direction::Left)
        } else if bound(&self.right) {
            Some(Direction::Right)
        } else {
            None
        }
    }
}

/// Turns a touchstart/touchend pair into at most one direction.
#[derive(Clone, Debug)]
pub struct SwipeTracker {
    min_distance: f64,
    start: Option<(f64, f64)>,
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_SWIPE_MIN_DISTANCE)
    }
}

impl SwipeTracker {
    pub fn new(min_distance: f64) -> Self {
        Self {
            min_distance,
            start: None,
        }
    }

    pub fn touch_start(&mut self, x: f64, y: f64) {
        self.start = Some((x, y));
    }

    /// Horizontal wins only when strictly dominant; the winning axis must
    /// exceed the minimum distance or the gesture is dropped.
    pub fn touch_end(&mut self, x: f64, y: f64) -> Option<Direction> {
        let (start_x, start_y) = self.start.take()?;
        let dx = x - start_x;
        let dy = y - start_y;
        if dx.abs() > dy.abs() {
            if dx.abs() <= self.min_distance {
                return None;
            }
            Some(if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            })
        } else {
            if dy.abs() <= self.min_distance {
                return None;
            }
            Some(if dy > 0.0 {
                Direction::Down
            } else {
                Direction::Up
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_map_to_directions() {
        let bindings = ControlBindings::default();
        assert_eq!(bindings.direction_for("ArrowUp"), Some(Direction::Up));
        assert_eq!(bindings.direction_for("KeyS"), Some(Direction::Down));
        assert_eq!(bindings.direction_for("KeyA"), Some(Direction::Left));
        assert_eq!(bindings.direction_for("ArrowRight"), Some(Direction::Right));
        assert_eq!(bindings.direction_for("Space"), None);
        assert_eq!(bindings.direction_for("w"), None);
    }

    #[test]
    fn partial_bindings_keep_defaults() {
        let bindings: ControlBindings =
            serde_json::from_str(r#"{"up":["KeyK"]}"#).unwrap();
        assert_eq!(bindings.direction_for("KeyK"), Some(Direction::Up));
        assert_eq!(bindings.direction_for("ArrowUp"), None);
        assert_eq!(bindings.direction_for("KeyD"), Some(Direction::Right));
    }

    #[test]
    fn swipe_uses_dominant_axis() {
        let mut swipe = SwipeTracker::default();
        swipe.touch_start(100.0, 100.0);
        assert_eq!(swipe.touch_end(200.0, 130.0), Some(Direction::Right));
        swipe.touch_start(100.0, 100.0);
        assert_eq!(swipe.touch_end(20.0, 60.0), Some(Direction::Left));
        swipe.touch_start(100.0, 100.0);
        assert_eq!(swipe.touch_end(90.0, 190.0), Some(Direction::Down));
        swipe.touch_start(100.0, 100.0);
        assert_eq!(swipe.touch_end(110.0, 0.0), Some(Direction::Up));
    }

    #[test]
    fn short_swipes_are_ignored() {
        let mut swipe = SwipeTracker::default();
        swipe.touch_start(0.0, 0.0);
        assert_eq!(swipe.touch_end(50.0, 10.0), None);
        swipe.touch_start(0.0, 0.0);
        assert_eq!(swipe.touch_end(51.0, 10.0), Some(Direction::Right));
    }

    #[test]
    fn equal_axes_take_vertical_branch() {
        let mut swipe = SwipeTracker::default();
        swipe.touch_start(0.0, 0.0);
        assert_eq!(swipe.touch_end(80.0, -80.0), Some(Direction::Up));
    }

    #[test]
    fn end_without_start_is_ignored() {
        let mut swipe = SwipeTracker::default();
        assert_eq!(swipe.touch_end(300.0, 0.0), None);
        swipe.touch_start(0.0, 0.0);
        assert!(swipe.touch_end(300.0, 0.0).is_some());
        assert_eq!(swipe.touch_end(600.0, 0.0), None);
    }
}
