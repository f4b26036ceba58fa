use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};
use std::time::Duration;
use yurupet::model::Button;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Press(Button),
    /// Raw click in terminal cells; the layout decides what was hit.
    Click { col: u16, row: u16 },
    Quit,
}

/// Wait up to `timeout` for the first event, then drain whatever else is queued.
pub(crate) fn collect_input(timeout: Duration) -> anyhow::Result<Vec<Command>> {
    let mut out = Vec::new();
    let mut wait = timeout;
    while event::poll(wait)? {
        if let Some(cmd) = map_event(event::read()?) {
            out.push(cmd);
            if out.len() >= 32 {
                break;
            }
        }
        wait = Duration::ZERO;
    }
    Ok(out)
}

pub(crate) fn map_event(ev: Event) -> Option<Command> {
    match ev {
        Event::Key(k) if k.kind == KeyEventKind::Press => {
            if k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL) {
                return Some(Command::Quit);
            }
            match k.code {
                KeyCode::Char('f') | KeyCode::Char('F') | KeyCode::Char('1') => {
                    Some(Command::Press(Button::Feed))
                }
                KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char('2') => {
                    Some(Command::Press(Button::Play))
                }
                KeyCode::Char('c') | KeyCode::Char('C') | KeyCode::Char('3') => {
                    Some(Command::Press(Button::Clean))
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
                _ => None,
            }
        }
        Event::Mouse(m) => match m.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(Command::Click {
                col: m.column,
                row: m.row,
            }),
            _ => None,
        },
        _ => None,
    }
}
