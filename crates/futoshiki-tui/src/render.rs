use crate::app::{App, ScreenState};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Print, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};
use futoshiki_core::share::{display_date, format_time, move_glyphs};
use futoshiki_core::{MoveTag, Position, SessionPhase, GRID_SIZE};
use std::io;

/// Width of a cell and of the marker column between two cells
const CELL_WIDTH: u16 = 3;
const STEP_X: u16 = CELL_WIDTH * 2;
const GRID_WIDTH: u16 = STEP_X * GRID_SIZE as u16 - CELL_WIDTH + 2;
const GRID_HEIGHT: u16 = GRID_SIZE as u16 * 2 + 1;

const RULES: &[&str] = &[
    "Fill the 4x4 grid so every row and every",
    "column holds each of the digits 1 to 4.",
    "",
    "Digits already on the board are clues and",
    "cannot be changed.",
    "",
    "< and > between two cells, and the arrows",
    "between rows, point at the smaller digit.",
    "",
    "The clock starts when you begin. Solve it",
    "without a wrong entry for a perfect star.",
];

pub fn render(stdout: &mut io::Stdout, app: &App) -> io::Result<()> {
    let (term_width, term_height) = terminal::size()?;

    execute!(stdout, Hide, SetBackgroundColor(app.theme.bg), Clear(ClearType::All))?;

    match app.screen_state {
        ScreenState::History => render_history_screen(stdout, app, term_width, term_height)?,
        _ => {
            render_game_screen(stdout, app, term_width, term_height)?;
            match app.screen_state {
                ScreenState::Rules => {
                    render_panel(stdout, app, "How to play", RULES, term_width, term_height)?
                }
                ScreenState::Share => render_share(stdout, app, term_width, term_height)?,
                ScreenState::Dev => render_dev(stdout, app, term_width, term_height)?,
                ScreenState::Playing if app.show_intro() => {
                    render_intro(stdout, app, term_width, term_height)?
                }
                _ => {}
            }
        }
    }

    if let Some(ref msg) = app.message {
        render_message(stdout, app, msg, term_width)?;
    }

    execute!(stdout, Show)?;
    Ok(())
}

fn render_game_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let total_width = GRID_WIDTH + 30; // grid + gap + info panel
    let start_x = if term_width > total_width {
        (term_width - total_width) / 2
    } else {
        1
    };
    let start_y = if term_height > GRID_HEIGHT + 10 { 3 } else { 1 };

    if !app.show_intro() {
        render_grid(stdout, app, start_x, start_y)?;
    }

    let info_x = start_x + GRID_WIDTH + 4;
    render_info_panel(stdout, app, info_x, start_y)?;

    let controls_y = start_y + GRID_HEIGHT + 2;
    render_controls(stdout, app, start_x, controls_y)?;

    Ok(())
}

fn render_grid(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let constraints = &app.game.session().puzzle().constraints;

    // Frame
    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(theme.bg),
        SetForegroundColor(theme.border),
        Print(format!("┌{}┐", "─".repeat(GRID_WIDTH as usize - 2)))
    )?;
    for row in 1..GRID_HEIGHT {
        execute!(
            stdout,
            MoveTo(x, y + row),
            Print("│"),
            MoveTo(x + GRID_WIDTH - 1, y + row),
            Print("│")
        )?;
    }
    execute!(
        stdout,
        MoveTo(x, y + GRID_HEIGHT),
        Print(format!("└{}┘", "─".repeat(GRID_WIDTH as usize - 2)))
    )?;

    for row in 0..GRID_SIZE {
        let cell_y = y + 1 + row as u16 * 2;

        for col in 0..GRID_SIZE {
            let cell_x = x + 1 + col as u16 * STEP_X;
            render_cell(stdout, app, Position::new(row, col), cell_x, cell_y)?;

            if col + 1 < GRID_SIZE {
                let glyph = constraints.horizontal[row][col].glyph();
                execute!(
                    stdout,
                    MoveTo(cell_x + CELL_WIDTH, cell_y),
                    SetBackgroundColor(theme.bg),
                    SetForegroundColor(theme.marker),
                    Print(format!(" {} ", glyph))
                )?;
            }

            if row + 1 < GRID_SIZE {
                let glyph = constraints.vertical[row][col].glyph();
                execute!(
                    stdout,
                    MoveTo(cell_x + 1, cell_y + 1),
                    SetBackgroundColor(theme.bg),
                    SetForegroundColor(theme.marker),
                    Print(glyph)
                )?;
            }
        }
    }

    Ok(())
}

fn render_cell(stdout: &mut io::Stdout, app: &App, pos: Position, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let session = app.game.session();
    let completed = session.phase() == SessionPhase::Completed;

    let bg = if session.selected_cell() == Some(pos) {
        theme.selected_bg
    } else if pos == app.cursor && !completed {
        theme.cursor_bg
    } else {
        theme.panel_bg
    };

    let fg = if session.is_clue(pos) {
        theme.clue
    } else if completed {
        theme.success
    } else {
        theme.filled
    };

    let content = match session.value_at(pos) {
        Some(value) => format!(" {} ", value),
        None => " · ".to_string(),
    };

    execute!(
        stdout,
        MoveTo(x, y),
        SetBackgroundColor(bg),
        SetForegroundColor(fg),
        Print(content)
    )?;

    Ok(())
}

fn render_info_panel(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;
    let session = app.game.session();

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    execute!(
        stdout,
        MoveTo(x, y),
        SetForegroundColor(theme.key),
        Print("═══ FUTOSHIKI TODAY ═══")
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 2),
        SetForegroundColor(theme.info),
        Print(format!("Puzzle: {:>12}", display_date(session.puzzle_id())))
    )?;

    execute!(
        stdout,
        MoveTo(x, y + 3),
        SetForegroundColor(theme.info),
        Print(format!("Time:   {:>12}", format_time(session.elapsed_time_seconds())))
    )?;

    let (status, color) = match session.phase() {
        SessionPhase::Fresh => ("Not started", theme.info),
        SessionPhase::Active => ("In progress", theme.fg),
        SessionPhase::Completed => ("Solved", theme.success),
    };
    execute!(
        stdout,
        MoveTo(x, y + 4),
        SetForegroundColor(theme.info),
        Print("Status: "),
        SetForegroundColor(color),
        Print(format!("{:>12}", status))
    )?;

    // Move log, wrapped to the panel width
    execute!(
        stdout,
        MoveTo(x, y + 6),
        SetForegroundColor(theme.info),
        Print(format!("Moves: {}", session.move_log().len()))
    )?;
    for (i, chunk) in session.move_log().chunks(10).take(4).enumerate() {
        execute!(
            stdout,
            MoveTo(x, y + 7 + i as u16),
            SetForegroundColor(theme.fg),
            Print(move_glyphs(chunk))
        )?;
    }

    execute!(
        stdout,
        MoveTo(x, y + 12),
        SetForegroundColor(theme.border),
        Print(format!("Source: {}", app.game.source_name()))
    )?;

    Ok(())
}

fn render_controls(stdout: &mut io::Stdout, app: &App, x: u16, y: u16) -> io::Result<()> {
    let theme = &app.theme;

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let controls = [
        ("hjkl/Arrows", "Move"),
        ("1-4", "Enter"),
        ("0/Del", "Clear"),
        ("Enter", "Select"),
        ("?", "Rules"),
        ("s", "Share"),
        ("H", "History"),
        ("t", "Theme"),
        ("q", "Quit"),
    ];

    // Display in 3 columns
    for (i, (key, desc)) in controls.iter().enumerate() {
        let col = i / 3;
        let row = i % 3;
        let cx = x + (col as u16) * 20;
        let cy = y + row as u16;

        execute!(
            stdout,
            MoveTo(cx, cy),
            SetForegroundColor(theme.key),
            Print(format!("{:>11}", key)),
            SetForegroundColor(theme.info),
            Print(format!(" {}", desc))
        )?;
    }

    Ok(())
}

fn render_message(
    stdout: &mut io::Stdout,
    app: &App,
    msg: &str,
    term_width: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let padded = format!("  {}  ", msg);
    let x = term_width.saturating_sub(padded.chars().count() as u16) / 2;

    execute!(
        stdout,
        MoveTo(x, 1),
        SetForegroundColor(theme.fg),
        SetBackgroundColor(theme.selected_bg),
        Print(&padded)
    )?;

    Ok(())
}

/// Centered box with a title and some lines of text
fn render_panel<S: AsRef<str>>(
    stdout: &mut io::Stdout,
    app: &App,
    title: &str,
    lines: &[S],
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let bg = theme.panel_bg;

    let inner = lines
        .iter()
        .map(|l| l.as_ref().chars().count())
        .chain(std::iter::once(title.chars().count()))
        .max()
        .unwrap_or(0);
    let box_width = (inner + 4) as u16;
    let box_height = (lines.len() + 4) as u16;
    let x = term_width.saturating_sub(box_width) / 2;
    let y = term_height.saturating_sub(box_height) / 2;

    for row in 0..box_height {
        execute!(
            stdout,
            MoveTo(x, y + row),
            SetBackgroundColor(bg),
            Print(" ".repeat(box_width as usize))
        )?;
    }

    execute!(
        stdout,
        MoveTo(x + 2, y + 1),
        SetForegroundColor(theme.key),
        SetBackgroundColor(bg),
        Print(title)
    )?;

    for (i, line) in lines.iter().enumerate() {
        execute!(
            stdout,
            MoveTo(x + 2, y + 3 + i as u16),
            SetForegroundColor(theme.fg),
            SetBackgroundColor(bg),
            Print(line.as_ref())
        )?;
    }

    Ok(())
}

fn render_intro(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let session = app.game.session();
    let lines = [
        format!("Today's puzzle: {}", display_date(session.puzzle_id())),
        String::new(),
        "The clock starts when the board is shown.".to_string(),
        String::new(),
        "Enter - start    ? - rules    q - quit".to_string(),
    ];
    render_panel(stdout, app, "Futoshiki Today", &lines, term_width, term_height)
}

fn render_share(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let Some(text) = app.game.share_text() else {
        return Ok(());
    };
    let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
    lines.push(String::new());
    lines.push("Esc - back to the board".to_string());
    render_panel(stdout, app, "Share your result", &lines, term_width, term_height)
}

fn render_dev(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let lines = [
        format!("Date: {}_", app.dev_input),
        String::new(),
        "Enter - load date (YYYYMMDD or YYYY-MM-DD)".to_string(),
        "t - today    r - reset puzzle    Esc - close".to_string(),
    ];
    render_panel(stdout, app, "Developer", &lines, term_width, term_height)
}

fn render_history_screen(
    stdout: &mut io::Stdout,
    app: &App,
    term_width: u16,
    term_height: u16,
) -> io::Result<()> {
    let theme = &app.theme;
    let history = app.game.completion_history();

    execute!(stdout, SetBackgroundColor(theme.bg))?;

    let title = "═══ SOLVED PUZZLES ═══";
    let title_x = term_width.saturating_sub(title.chars().count() as u16) / 2;
    execute!(
        stdout,
        MoveTo(title_x, 1),
        SetForegroundColor(theme.key),
        Print(title)
    )?;

    execute!(
        stdout,
        MoveTo(4, 3),
        SetForegroundColor(theme.info),
        Print("Select a puzzle and press Enter to revisit it")
    )?;

    let header_y = 5;
    execute!(
        stdout,
        MoveTo(4, header_y),
        SetForegroundColor(theme.fg),
        Print(format!("{:>12} {:>8}  {}", "Date", "Time", "Moves")),
        MoveTo(4, header_y + 1),
        SetForegroundColor(theme.border),
        Print("─".repeat(50))
    )?;

    if history.is_empty() {
        execute!(
            stdout,
            MoveTo(4, header_y + 2),
            SetForegroundColor(theme.info),
            Print("No puzzles solved yet")
        )?;
        return Ok(());
    }

    let visible_rows = term_height.saturating_sub(header_y + 4) as usize;
    for (i, record) in history
        .values()
        .rev()
        .enumerate()
        .skip(app.history_scroll)
        .take(visible_rows)
    {
        let y = header_y + 2 + (i - app.history_scroll) as u16;
        let bg = if i == app.history_scroll {
            theme.selected_bg
        } else {
            theme.bg
        };
        let fg = if record.move_log.contains(&MoveTag::Perfect) {
            theme.success
        } else {
            theme.fg
        };

        execute!(
            stdout,
            MoveTo(4, y),
            SetBackgroundColor(bg),
            SetForegroundColor(fg),
            Print(format!(
                "{:>12} {:>8}  {}",
                display_date(&record.puzzle_id),
                format_time(record.time_spent_seconds),
                move_glyphs(&record.move_log)
            ))
        )?;
    }

    Ok(())
}
