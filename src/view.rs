//! Read-only view types handed to the host page.
//!
//! The renderer draws purely from a [`RenderModel`]; nothing here holds a
//! reference back into the engine.

use serde::{Deserialize, Serialize};
use tsify::Tsify;

pub const TOAST_DISMISS_MS: u32 = 4000;

#[derive(Clone, Copy, Serialize, Deserialize, Tsify, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Playing,
    Won,
    Over,
}

#[derive(Clone, Copy, Serialize, Deserialize, Tsify, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, Serialize, Deserialize, Tsify, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub dismiss_after_ms: u32,
}

impl Notification {
    pub fn new(kind: NotificationKind, title: &str, message: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.to_string(),
            dismiss_after_ms: TOAST_DISMISS_MS,
        }
    }

    pub(crate) fn victory() -> Self {
        Self::new(NotificationKind::Success, "Victory!", "You reached 2048!")
    }

    pub(crate) fn game_over() -> Self {
        Self::new(NotificationKind::Error, "Game Over", "No more moves available!")
    }

    pub(crate) fn new_game() -> Self {
        Self::new(NotificationKind::Info, "New Game", "Good luck!")
    }

    pub(crate) fn undo() -> Self {
        Self::new(NotificationKind::Info, "Undo", "Move undone!")
    }

    pub(crate) fn hint_mode() -> Self {
        Self::new(NotificationKind::Info, "Hint Mode", "Best moves highlighted!")
    }

    pub(crate) fn keep_playing() -> Self {
        Self::new(
            NotificationKind::Info,
            "Continue",
            "Keep playing to reach higher numbers!",
        )
    }
}

#[derive(Clone, Serialize, Deserialize, Tsify, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub title: String,
    pub message: String,
    pub can_continue: bool,
}

impl Overlay {
    pub(crate) fn won() -> Self {
        Self {
            title: "You Win!".to_string(),
            message: "Congratulations! You reached 2048!".to_string(),
            can_continue: true,
        }
    }

    pub(crate) fn over() -> Self {
        Self {
            title: "Game Over!".to_string(),
            message: "No more moves available. Try again!".to_string(),
            can_continue: false,
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Tsify, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TileView {
    pub row: usize,
    pub col: usize,
    pub value: u32,
    pub class_name: String,
    pub is_new: bool,
    pub hint: bool,
}

/// CSS classes for a tile: `game-tile` plus a per-value modifier when occupied.
pub fn tile_class(value: u32) -> String {
    if value == 0 {
        "game-tile".to_string()
    } else {
        format!("game-tile game-tile--{value}")
    }
}

#[derive(Clone, Serialize, Deserialize, Tsify, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RenderModel {
    /// Row-major, always 16 entries.
    pub tiles: Vec<TileView>,
    pub score: u32,
    pub best_score: u32,
    pub move_count: u32,
    pub game_won: bool,
    pub game_over: bool,
    pub status: GameStatus,
    pub can_undo: bool,
    pub hint_mode: bool,
    pub overlay: Option<Overlay>,
}

/// What a dispatched command did. `changed` is false for ignored input.
#[derive(Clone, Serialize, Deserialize, Tsify, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DispatchOutcome {
    pub changed: bool,
    pub notifications: Vec<Notification>,
}

impl DispatchOutcome {
    pub(crate) fn unchanged() -> Self {
        Self::default()
    }

    pub(crate) fn applied(notifications: Vec<Notification>) -> Self {
        Self {
            changed: true,
            notifications,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_class_marks_value() {
        assert_eq!(tile_class(0), "game-tile");
        assert_eq!(tile_class(128), "game-tile game-tile--128");
    }

    #[test]
    fn notification_serializes_camel_case() {
        let json = serde_json::to_value(Notification::undo()).unwrap();
        assert_eq!(json["kind"], "info");
        assert_eq!(json["title"], "Undo");
        assert_eq!(json["dismissAfterMs"], 4000);
    }
}
