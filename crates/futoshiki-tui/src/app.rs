use crate::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent};
use futoshiki_core::{DateKey, Game, GameError, MoveTag, Position, Transition, GRID_SIZE};
use std::time::Duration;

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Current screen state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenState {
    /// The board, with the intro overlay until the puzzle is revealed
    Playing,
    /// How to play
    Rules,
    /// Share text of a finished puzzle
    Share,
    /// Every completed puzzle
    History,
    /// Developer modal: load another date or reset
    Dev,
}

/// The main application state
pub struct App {
    pub game: Game,
    /// Cell the arrow keys point at
    pub cursor: Position,
    pub theme: Theme,
    pub message: Option<String>,
    message_timer: u32,
    pub screen_state: ScreenState,
    /// Scroll offset for the history view
    pub history_scroll: usize,
    /// Date typed into the developer modal
    pub dev_input: String,
    konami_progress: usize,
    /// UI ticks since the game clock last advanced
    ticks: u32,
}

impl App {
    /// Konami code sequence: ↑↑↓↓←→←→BA
    const KONAMI_CODE: [KeyCode; 10] = [
        KeyCode::Up, KeyCode::Up, KeyCode::Down, KeyCode::Down,
        KeyCode::Left, KeyCode::Right, KeyCode::Left, KeyCode::Right,
        KeyCode::Char('b'), KeyCode::Char('a'),
    ];

    /// UI refresh interval
    pub const TICK_RATE: Duration = Duration::from_millis(100);
    const TICKS_PER_SECOND: u32 = 10;

    pub fn new(game: Game) -> Self {
        Self {
            game,
            cursor: Position::new(0, 0),
            theme: Theme::dark(),
            message: None,
            message_timer: 0,
            screen_state: ScreenState::Playing,
            history_scroll: 0,
            dev_input: String::new(),
            konami_progress: 0,
            ticks: 0,
        }
    }

    /// Expire messages and advance the game clock once a second
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        self.ticks += 1;
        if self.ticks >= Self::TICKS_PER_SECOND {
            self.ticks = 0;
            self.game.tick();
        }
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    /// Whether the intro overlay covers the board
    pub fn show_intro(&self) -> bool {
        self.screen_state == ScreenState::Playing && !self.game.session().is_revealed()
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match self.screen_state {
            ScreenState::Rules => self.handle_overlay_key(key),
            ScreenState::Share => self.handle_overlay_key(key),
            ScreenState::History => self.handle_history_key(key),
            ScreenState::Dev => self.handle_dev_key(key),
            ScreenState::Playing if self.show_intro() => self.handle_intro_key(key),
            ScreenState::Playing => self.handle_game_key(key),
        }
    }

    fn handle_intro_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.game.reveal();
            }
            KeyCode::Char('?') => self.screen_state = ScreenState::Rules,
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_game_key(&mut self, key: KeyEvent) -> AppAction {
        if self.track_konami(key.code) {
            self.dev_input.clear();
            self.screen_state = ScreenState::Dev;
            return AppAction::Continue;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return AppAction::Quit,

            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.move_cursor(0, 1),

            // Toggle selection of the cursor cell
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.game.select_cell(self.cursor) == Transition::Ignored {
                    self.explain_locked_cell();
                }
            }

            KeyCode::Char(c @ '1'..='4') => {
                if let Some(value) = c.to_digit(10) {
                    self.enter(Some(value as u8));
                }
            }

            KeyCode::Char('0') | KeyCode::Delete | KeyCode::Backspace => self.enter(None),

            KeyCode::Char('?') => self.screen_state = ScreenState::Rules,

            KeyCode::Char('s') => {
                if self.game.share_text().is_some() {
                    self.screen_state = ScreenState::Share;
                } else {
                    self.show_message("Finish the puzzle to share your result");
                }
            }

            KeyCode::Char('H') => {
                self.history_scroll = 0;
                self.screen_state = ScreenState::History;
            }

            KeyCode::Char('t') => self.theme = self.theme.toggled(),

            _ => {}
        }

        AppAction::Continue
    }

    /// Select the cursor cell if needed, then write `value` into it
    fn enter(&mut self, value: Option<u8>) {
        if self.game.session().selected_cell() != Some(self.cursor)
            && self.game.select_cell(self.cursor) == Transition::Ignored
        {
            self.explain_locked_cell();
            return;
        }

        let outcome = match value {
            Some(v) => self.game.enter_value(v),
            None => self.game.clear_value(),
        };

        match outcome {
            Transition::Completed(record) => {
                let perfect = record.move_log.contains(&MoveTag::Perfect);
                self.show_message(if perfect { "Perfect solve!" } else { "Solved!" });
                self.screen_state = ScreenState::Share;
            }
            Transition::Logged(MoveTag::Incorrect) => self.show_message("Not quite"),
            Transition::Ignored => {
                // nothing changed, drop the selection we just made
                if self.game.session().selected_cell() == Some(self.cursor) {
                    self.game.select_cell(self.cursor);
                }
            }
            _ => {}
        }
    }

    fn explain_locked_cell(&mut self) {
        if self.game.session().is_completed() {
            self.show_message("Puzzle complete - press s to share");
        } else if self.game.session().is_clue(self.cursor) {
            self.show_message("That cell is a clue");
        }
    }

    fn track_konami(&mut self, code: KeyCode) -> bool {
        if code == Self::KONAMI_CODE[self.konami_progress] {
            self.konami_progress += 1;
            if self.konami_progress >= Self::KONAMI_CODE.len() {
                self.konami_progress = 0;
                return true;
            }
        } else if code == Self::KONAMI_CODE[0] {
            self.konami_progress = 1;
        } else {
            self.konami_progress = 0;
        }
        false
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter | KeyCode::Char(' ') => {
                self.screen_state = ScreenState::Playing;
            }
            KeyCode::Char('?') if self.screen_state == ScreenState::Rules => {
                self.screen_state = ScreenState::Playing;
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_history_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.screen_state = ScreenState::Playing;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.history_scroll = self.history_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.game.completion_history().len().saturating_sub(1);
                self.history_scroll = (self.history_scroll + 1).min(max);
            }
            // Revisit the selected puzzle
            KeyCode::Enter | KeyCode::Char(' ') => {
                let selected = self
                    .game
                    .completion_history()
                    .into_keys()
                    .rev()
                    .nth(self.history_scroll);
                if let Some(id) = selected {
                    match DateKey::parse(&id) {
                        Ok(date) => self.load_date(&date),
                        Err(e) => self.show_message(&e.to_string()),
                    }
                }
            }
            _ => {}
        }
        AppAction::Continue
    }

    fn handle_dev_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Esc => self.screen_state = ScreenState::Playing,
            KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                if self.dev_input.len() < 10 {
                    self.dev_input.push(c);
                }
            }
            KeyCode::Backspace => {
                self.dev_input.pop();
            }
            KeyCode::Char('t') => {
                let today = self.game.today().clone();
                self.load_date(&today);
            }
            KeyCode::Char('r') => {
                self.game.reset();
                self.cursor = Position::new(0, 0);
                self.screen_state = ScreenState::Playing;
                self.show_message("Puzzle reset");
            }
            KeyCode::Enter => match DateKey::parse(&self.dev_input) {
                Ok(date) => self.load_date(&date),
                Err(e) => self.show_message(&e.to_string()),
            },
            _ => {}
        }
        AppAction::Continue
    }

    /// Switch to the puzzle for `date`, keeping the current one on failure
    fn load_date(&mut self, date: &DateKey) {
        match self.game.load_for_date(date) {
            Ok(_) => {
                self.cursor = Position::new(0, 0);
                self.screen_state = ScreenState::Playing;
                self.show_message(&format!("Loaded puzzle {}", date));
            }
            Err(GameError::NoPuzzleForDate(_)) => {
                self.show_message(&format!("No puzzle for {}", date));
            }
            Err(e) => self.show_message(&format!("Could not load puzzle: {}", e)),
        }
    }

    fn move_cursor(&mut self, row_delta: i32, col_delta: i32) {
        let last = GRID_SIZE as i32 - 1;
        let new_row = (self.cursor.row as i32 + row_delta).clamp(0, last) as usize;
        let new_col = (self.cursor.col as i32 + col_delta).clamp(0, last) as usize;
        self.cursor = Position::new(new_row, new_col);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use futoshiki_core::source::StaticSource;
    use futoshiki_core::store::MemoryStore;
    use futoshiki_core::{Constraints, PersistenceGateway, PuzzleDefinition};
    use std::sync::Arc;

    const DAY: &str = "20250103";
    const YESTERDAY: &str = "20250102";

    fn puzzle(id: &str) -> PuzzleDefinition {
        PuzzleDefinition {
            id: id.to_string(),
            initial_grid: [
                [Some(1), None, None, None],
                [None, None, Some(1), None],
                [None, None, None, None],
                [None, Some(3), None, None],
            ],
            solution_grid: [[1, 2, 3, 4], [3, 4, 1, 2], [2, 1, 4, 3], [4, 3, 2, 1]],
            constraints: Constraints::default(),
        }
    }

    fn app() -> App {
        let source = StaticSource::new(vec![
            puzzle(YESTERDAY),
            puzzle(DAY),
            puzzle("20250104"),
        ]);
        let gateway = PersistenceGateway::new(Arc::new(MemoryStore::new()));
        let game = Game::start(&DateKey::parse(DAY).unwrap(), Box::new(source), gateway).unwrap();
        App::new(game)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_keys(app: &mut App, keys: &str) {
        for c in keys.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn revealed_app() -> App {
        let mut app = app();
        press(&mut app, KeyCode::Enter);
        app
    }

    #[test]
    fn test_intro_reveals_on_enter() {
        let mut app = app();
        assert!(app.show_intro());
        // digits do nothing behind the intro
        type_keys(&mut app, "2");
        assert!(app.game.session().move_log().is_empty());

        press(&mut app, KeyCode::Enter);
        assert!(!app.show_intro());
        assert!(app.game.session().is_clock_running());
    }

    #[test]
    fn test_digit_enters_at_cursor() {
        let mut app = revealed_app();
        press(&mut app, KeyCode::Right);
        type_keys(&mut app, "2");

        let session = app.game.session();
        assert_eq!(session.value_at(Position::new(0, 1)), Some(2));
        assert_eq!(session.move_log(), &[MoveTag::Correct]);
        assert_eq!(session.selected_cell(), None);
    }

    #[test]
    fn test_clear_key_erases() {
        let mut app = revealed_app();
        press(&mut app, KeyCode::Right);
        type_keys(&mut app, "3");
        press(&mut app, KeyCode::Backspace);

        let session = app.game.session();
        assert_eq!(session.value_at(Position::new(0, 1)), None);
        assert_eq!(session.move_log(), &[MoveTag::Incorrect, MoveTag::Clear]);
    }

    #[test]
    fn test_clue_cell_is_locked() {
        let mut app = revealed_app();
        type_keys(&mut app, "4");
        assert_eq!(app.game.session().value_at(Position::new(0, 0)), Some(1));
        assert_eq!(app.message.as_deref(), Some("That cell is a clue"));
    }

    #[test]
    fn test_erasing_empty_cell_leaves_no_selection() {
        let mut app = revealed_app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Delete);
        assert_eq!(app.game.session().selected_cell(), None);
        assert!(app.game.session().move_log().is_empty());
    }

    #[test]
    fn test_cursor_stays_on_board() {
        let mut app = revealed_app();
        for _ in 0..6 {
            press(&mut app, KeyCode::Down);
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.cursor, Position::new(3, 3));
    }

    #[test]
    fn test_konami_opens_dev_modal_and_loads_date() {
        let mut app = revealed_app();
        for code in App::KONAMI_CODE {
            press(&mut app, code);
        }
        assert_eq!(app.screen_state, ScreenState::Dev);

        type_keys(&mut app, "2025-01-02");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen_state, ScreenState::Playing);
        assert_eq!(app.game.session().puzzle_id(), YESTERDAY);
    }

    #[test]
    fn test_dev_modal_refuses_tomorrow() {
        let mut app = revealed_app();
        app.screen_state = ScreenState::Dev;
        type_keys(&mut app, "20250104");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen_state, ScreenState::Dev);
        assert_eq!(app.game.session().puzzle_id(), DAY);
        assert_eq!(app.message.as_deref(), Some("No puzzle for 20250104"));
    }

    #[test]
    fn test_dev_modal_keeps_puzzle_on_unknown_date() {
        let mut app = revealed_app();
        app.screen_state = ScreenState::Dev;
        type_keys(&mut app, "20300101");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.screen_state, ScreenState::Dev);
        assert_eq!(app.game.session().puzzle_id(), DAY);
        assert_eq!(app.message.as_deref(), Some("No puzzle for 20300101"));
    }

    #[test]
    fn test_dev_reset() {
        let mut app = revealed_app();
        press(&mut app, KeyCode::Right);
        type_keys(&mut app, "2");
        app.screen_state = ScreenState::Dev;
        type_keys(&mut app, "r");

        assert_eq!(app.screen_state, ScreenState::Playing);
        assert_eq!(
            app.game.session().move_log(),
            &[MoveTag::Correct, MoveTag::Reset]
        );
    }

    #[test]
    fn test_share_requires_completion() {
        let mut app = revealed_app();
        type_keys(&mut app, "s");
        assert_eq!(app.screen_state, ScreenState::Playing);
        assert!(app.message.is_some());
    }

    #[test]
    fn test_solving_opens_share() {
        let mut app = revealed_app();
        let solution = puzzle(DAY).solution_grid;
        for pos in Position::all() {
            if app.game.session().is_clue(pos) {
                continue;
            }
            app.cursor = pos;
            let digit = char::from(b'0' + solution[pos.row][pos.col]);
            type_keys(&mut app, &digit.to_string());
        }

        assert_eq!(app.screen_state, ScreenState::Share);
        assert_eq!(app.message.as_deref(), Some("Perfect solve!"));
        assert_eq!(app.game.completion_history().len(), 1);
    }

    #[test]
    fn test_ticks_advance_clock_once_per_second() {
        let mut app = revealed_app();
        for _ in 0..25 {
            app.tick();
        }
        assert_eq!(app.game.session().elapsed_time_seconds(), 2);
    }
}
