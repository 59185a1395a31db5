//! Share text for finished puzzles.

use crate::date_key::DateKey;
use crate::session::{MoveTag, Session};

/// Footer line of every share text
pub const SHARE_FOOTER: &str = "📲 www.futoshiki.today";

/// Format seconds as MM:SS or H:MM:SS
pub fn format_time(secs: u64) -> String {
    if secs >= 3600 {
        let hours = secs / 3600;
        let mins = (secs % 3600) / 60;
        let secs = secs % 60;
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Move log rendered as a glyph strip
pub fn move_glyphs(moves: &[MoveTag]) -> String {
    moves.iter().map(MoveTag::glyph).collect()
}

/// Puzzle id shown as M/D/YYYY, or verbatim if it is not a date
pub fn display_date(puzzle_id: &str) -> String {
    DateKey::parse(puzzle_id)
        .ok()
        .and_then(|key| key.to_date())
        .map(|date| date.format("%-m/%-d/%Y").to_string())
        .unwrap_or_else(|| puzzle_id.to_string())
}

/// Text a player can paste to brag about a solve
pub fn share_text(puzzle_id: &str, elapsed_secs: u64, moves: &[MoveTag]) -> String {
    format!(
        "Futoshiki {}: {}\n{}\n{}",
        display_date(puzzle_id),
        format_time(elapsed_secs),
        move_glyphs(moves),
        SHARE_FOOTER
    )
}

/// Share text for a session, available once it is completed
pub fn share_session(session: &Session) -> Option<String> {
    session.is_completed().then(|| {
        share_text(
            session.puzzle_id(),
            session.elapsed_time_seconds(),
            session.move_log(),
        )
    })
}
