use crate::board::{Board, Direction, Position, SIZE, WIN_TILE};
use crate::log;
use crate::store::BestScore;
use crate::view::{
    DispatchOutcome, GameStatus, Notification, Overlay, RenderModel, TileView, tile_class,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::VecDeque;

pub const HISTORY_LIMIT: usize = 10;

/// Every input the host can send, already decoded from keys or gestures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    NewGame,
    Move(Direction),
    Undo,
    ToggleHint,
    ContinueAfterWin,
}

/// State captured right before a committed move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub board: Board,
    pub score: u32,
    pub move_count: u32,
}

pub struct GameEngine {
    board: Board,
    score: u32,
    best_score: u32,
    best_store: BestScore,
    move_count: u32,
    game_won: bool,
    game_over: bool,
    continued: bool,
    hint_mode: bool,
    history: VecDeque<HistoryEntry>,
    new_tiles: Vec<Position>,
    rng: StdRng,
}

impl GameEngine {
    pub fn new(best_store: BestScore) -> Self {
        Self::with_rng(best_store, StdRng::from_entropy())
    }

    pub fn with_seed(best_store: BestScore, seed: u64) -> Self {
        Self::with_rng(best_store, StdRng::seed_from_u64(seed))
    }

    fn with_rng(best_store: BestScore, rng: StdRng) -> Self {
        let best_score = best_store.load();
        let mut engine = Self {
            board: Board::EMPTY,
            score: 0,
            best_score,
            best_store,
            move_count: 0,
            game_won: false,
            game_over: false,
            continued: false,
            hint_mode: false,
            history: VecDeque::with_capacity(HISTORY_LIMIT + 1),
            new_tiles: Vec::new(),
            rng,
        };
        engine.reset();
        engine
    }

    fn reset(&mut self) {
        self.board = Board::EMPTY;
        self.score = 0;
        self.move_count = 0;
        self.game_won = false;
        self.game_over = false;
        self.continued = false;
        self.hint_mode = false;
        self.history.clear();
        self.new_tiles.clear();
        for _ in 0..2 {
            if let Some(pos) = self.board.spawn_random_tile(&mut self.rng) {
                self.new_tiles.push(pos);
            }
        }
    }

    pub fn dispatch(&mut self, command: Command) -> DispatchOutcome {
        match command {
            Command::NewGame => self.new_game(),
            Command::Move(dir) => self.move_tiles(dir),
            Command::Undo => self.undo(),
            Command::ToggleHint => self.toggle_hint(),
            Command::ContinueAfterWin => self.continue_after_win(),
        }
    }

    pub fn new_game(&mut self) -> DispatchOutcome {
        self.reset();
        DispatchOutcome::applied(vec![Notification::new_game()])
    }

    /// Slides the board toward `dir`. A move that changes nothing, or any move
    /// after a loss without a prior win, is silently ignored.
    pub fn move_tiles(&mut self, dir: Direction) -> DispatchOutcome {
        if self.game_over && !self.game_won {
            return DispatchOutcome::unchanged();
        }
        let shifted = self.board.shift(dir);
        if !shifted.moved {
            return DispatchOutcome::unchanged();
        }

        self.push_history(HistoryEntry {
            board: self.board,
            score: self.score,
            move_count: self.move_count,
        });
        self.board = shifted.board;
        self.score += shifted.score;
        self.move_count += 1;
        self.new_tiles = self.board.spawn_random_tile(&mut self.rng).into_iter().collect();
        self.record_best();

        DispatchOutcome::applied(self.check_game_state())
    }

    fn push_history(&mut self, entry: HistoryEntry) {
        self.history.push_back(entry);
        while self.history.len() > HISTORY_LIMIT {
            self.history.pop_front();
        }
    }

    fn record_best(&mut self) {
        if self.score > self.best_score {
            self.best_score = self.score;
            self.best_store.save(self.best_score);
        }
    }

    fn check_game_state(&mut self) -> Vec<Notification> {
        let mut notifications = Vec::new();
        if !self.game_won && self.board.contains(WIN_TILE) {
            self.game_won = true;
            log(&format!("[game] reached {WIN_TILE} after {} moves", self.move_count));
            notifications.push(Notification::victory());
        }
        if !self.game_over && self.board.is_game_over() {
            self.game_over = true;
            log(&format!("[game] no moves left, score {}", self.score));
            notifications.push(Notification::game_over());
        }
        notifications
    }

    /// Restores the most recent history entry. The loss flag is recomputed
    /// from the restored board; a win stays recorded.
    pub fn undo(&mut self) -> DispatchOutcome {
        let Some(entry) = self.history.pop_back() else {
            return DispatchOutcome::unchanged();
        };
        self.board = entry.board;
        self.score = entry.score;
        self.move_count = entry.move_count;
        self.game_over = self.board.is_game_over();
        self.new_tiles.clear();
        DispatchOutcome::applied(vec![Notification::undo()])
    }

    pub fn toggle_hint(&mut self) -> DispatchOutcome {
        self.hint_mode = !self.hint_mode;
        let notifications = if self.hint_mode {
            vec![Notification::hint_mode()]
        } else {
            Vec::new()
        };
        DispatchOutcome::applied(notifications)
    }

    pub fn continue_after_win(&mut self) -> DispatchOutcome {
        if !self.game_won || self.continued {
            return DispatchOutcome::unchanged();
        }
        self.continued = true;
        DispatchOutcome::applied(vec![Notification::keep_playing()])
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    pub fn game_won(&self) -> bool {
        self.game_won
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn hint_mode(&self) -> bool {
        self.hint_mode
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Positions filled by the last new game or move.
    pub fn new_tiles(&self) -> &[Position] {
        &self.new_tiles
    }

    pub fn hint_cells(&self) -> [[bool; SIZE]; SIZE] {
        self.board.hint_cells()
    }

    pub fn status(&self) -> GameStatus {
        if self.game_over {
            GameStatus::Over
        } else if self.game_won {
            GameStatus::Won
        } else {
            GameStatus::Playing
        }
    }

    fn overlay(&self) -> Option<Overlay> {
        if self.game_over {
            Some(Overlay::over())
        } else if self.game_won && !self.continued {
            Some(Overlay::won())
        } else {
            None
        }
    }

    pub fn snapshot(&self) -> RenderModel {
        let tiles = Board::positions()
            .map(|pos| {
                let value = self.board.get(pos);
                TileView {
                    row: pos.row,
                    col: pos.col,
                    value,
                    class_name: tile_class(value),
                    is_new: value != 0 && self.new_tiles.contains(&pos),
                    hint: self.hint_mode && self.board.can_merge_at(pos),
                }
            })
            .collect();
        RenderModel {
            tiles,
            score: self.score,
            best_score: self.best_score,
            move_count: self.move_count,
            game_won: self.game_won,
            game_over: self.game_over,
            status: self.status(),
            can_undo: self.can_undo(),
            hint_mode: self.hint_mode,
            overlay: self.overlay(),
        }
    }

    #[cfg(test)]
    pub(crate) fn load_board(&mut self, board: Board) {
        self.board = board;
        self.game_over = board.is_game_over();
        self.new_tiles.clear();
    }
}
