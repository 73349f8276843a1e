// src/terminal.rs
// This module handles terminal input/output for the dual attention game.

use std::io::{self, Write};
use std::thread;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Attribute, Color as TermColor, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use tokio::sync::mpsc::UnboundedSender;

use crate::card::Card;
use crate::defs::{Color, Position};
use crate::game::{SessionState, SessionView};
use crate::logging::log_error;
use crate::strings::Strings;

pub const CELL_WIDTH: u16 = 14;
pub const CELL_HEIGHT: u16 = 3;
const GRID_TOP: u16 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Select,
    PlayAgain,
    ToggleInstructions,
    Redraw,
    Quit,
}

pub fn map_key(key: KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Esc | KeyCode::Char('q') => Some(Command::Quit),
        KeyCode::Up | KeyCode::Char('k') => Some(Command::Move(Direction::Up)),
        KeyCode::Down | KeyCode::Char('j') => Some(Command::Move(Direction::Down)),
        KeyCode::Left | KeyCode::Char('h') => Some(Command::Move(Direction::Left)),
        KeyCode::Right | KeyCode::Char('l') => Some(Command::Move(Direction::Right)),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Select),
        KeyCode::Char('n') => Some(Command::PlayAgain),
        KeyCode::Char('i') => Some(Command::ToggleInstructions),
        _ => None,
    }
}

/// Grid cursor over `len` cards laid out `columns` wide.
pub fn move_cursor(index: usize, direction: Direction, columns: usize, len: usize) -> usize {
    if len == 0 || columns == 0 {
        return 0;
    }
    let index = index.min(len - 1);
    match direction {
        Direction::Left if index % columns > 0 => index - 1,
        Direction::Right if index % columns + 1 < columns && index + 1 < len => index + 1,
        Direction::Up if index >= columns => index - columns,
        Direction::Down if index + columns < len => index + columns,
        _ => index,
    }
}

/// Offset of the number label inside its cell, from the card's position and spacing.
pub fn label_offset(card: &Card, label_width: u16) -> (u16, u16) {
    let inner = CELL_WIDTH.saturating_sub(2);
    let free = inner.saturating_sub(label_width);
    let spacing = card.spacing.unwrap_or_default();
    let (left, right) = (spacing.left as u16, spacing.right as u16);
    let centered = (free / 2 + left).saturating_sub(right);

    let (dx, dy) = match card.position {
        Position::Top => (centered, 0),
        Position::Bottom => (centered, CELL_HEIGHT - 1),
        Position::Left => (left, 1),
        Position::Right => (free.saturating_sub(right), 1),
        Position::Middle => (centered, 1),
    };
    (dx.min(free), dy)
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Red => TermColor::Red,
        Color::Blue => TermColor::Blue,
    }
}

/// Raw mode + alternate screen for as long as the guard lives.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(TerminalGuard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
    }
}

/// Read key presses on a blocking thread and forward them as commands.
pub fn spawn_key_reader(tx: UnboundedSender<Command>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        loop {
            let command = match event::read() {
                Ok(Event::Key(key)) => map_key(key),
                Ok(Event::Resize(_, _)) => Some(Command::Redraw),
                Ok(_) => None,
                Err(e) => {
                    log_error(&format!("Failed to read terminal event: {e}"));
                    Some(Command::Quit)
                }
            };
            if let Some(command) = command {
                let quit = command == Command::Quit;
                if tx.send(command).is_err() || quit {
                    break;
                }
            }
        }
    })
}

pub fn render<W: Write>(
    out: &mut W,
    view: &SessionView,
    cursor: usize,
    columns: usize,
    strings: &Strings,
) -> io::Result<()> {
    let columns = columns.max(1);
    queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;

    queue!(
        out,
        SetAttribute(Attribute::Bold),
        Print(strings.title),
        SetAttribute(Attribute::Reset),
        MoveTo(0, 1),
        Print(strings.subtitle),
        MoveTo(0, 3),
        Print(format!(
            "{}: {}    {}: {}",
            strings.time, view.time, strings.current_level, view.level
        )),
    )?;

    if view.error {
        queue!(
            out,
            MoveTo(0, 4),
            SetForegroundColor(TermColor::White),
            SetAttribute(Attribute::Reverse),
            Print(format!(" {} ", strings.try_again)),
            SetAttribute(Attribute::Reset),
            ResetColor,
        )?;
    } else if view.correct {
        queue!(out, MoveTo(0, 4), SetForegroundColor(TermColor::Green), Print("✓"), ResetColor)?;
    }

    for (index, card) in view.cards.iter().enumerate() {
        let col = (index % columns) as u16;
        let row = (index / columns) as u16;
        let x = col * CELL_WIDTH;
        let y = GRID_TOP + row * CELL_HEIGHT;
        let touched = view.progress.contains(&card.id);

        if index == cursor {
            queue!(
                out,
                MoveTo(x, y + 1),
                Print('>'),
                MoveTo(x + CELL_WIDTH - 1, y + 1),
                Print('<'),
            )?;
        }

        let label = format!("({})", card.number);
        let (dx, dy) = label_offset(card, label.chars().count() as u16);
        queue!(out, MoveTo(x + 1 + dx, y + dy), SetForegroundColor(term_color(card.color)))?;
        if touched {
            queue!(out, SetAttribute(Attribute::Reverse))?;
        }
        queue!(out, SetAttribute(Attribute::Bold), Print(label), SetAttribute(Attribute::Reset), ResetColor)?;
    }

    let rows = view.cards.len().div_ceil(columns) as u16;
    let mut line = GRID_TOP + rows * CELL_HEIGHT + 1;

    if view.state == SessionState::LevelComplete {
        if let Some(score) = &view.level_score {
            queue!(
                out,
                MoveTo(0, line),
                SetForegroundColor(TermColor::Green),
                SetAttribute(Attribute::Bold),
                Print(strings.congratulations),
                SetAttribute(Attribute::Reset),
                ResetColor,
                MoveTo(0, line + 1),
                Print(strings.completed),
                MoveTo(0, line + 2),
                Print(format!("{}: {}", strings.time, score.time)),
                MoveTo(0, line + 3),
                Print(format!("[n] {}", strings.play_again)),
            )?;
            line += 5;
        }
    }

    if view.show_instructions {
        queue!(
            out,
            MoveTo(0, line),
            SetAttribute(Attribute::Underlined),
            Print(strings.instructions_title),
            SetAttribute(Attribute::Reset),
            MoveTo(0, line + 1),
            Print(format!("• {}", strings.click_instructions)),
            MoveTo(0, line + 2),
            SetForegroundColor(TermColor::DarkGrey),
            Print(strings.example),
            ResetColor,
            MoveTo(0, line + 3),
            Print(format!("• {}", strings.click_number_one)),
        )?;
        line += 5;
    }

    queue!(
        out,
        MoveTo(0, line),
        SetForegroundColor(TermColor::DarkGrey),
        Print(strings.controls),
        ResetColor,
    )?;

    out.flush()
}
