use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEventKind};

use crate::app::{Result, RunnelError};

pub enum AppEvent {
    Key(KeyEvent),
    Resize { width: u16, height: u16 },
    ScrollUp,
    ScrollDown,
}

/// Blocking source of terminal events.
///
/// Events the screens have no use for (key releases, focus changes, mouse
/// movement) are skipped.
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn next(&self) -> Result<AppEvent> {
        loop {
            let event = event::read().map_err(RunnelError::Terminal)?;
            match event {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    return Ok(AppEvent::Key(key));
                }
                Event::Resize(width, height) => return Ok(AppEvent::Resize { width, height }),
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => return Ok(AppEvent::ScrollUp),
                    MouseEventKind::ScrollDown => return Ok(AppEvent::ScrollDown),
                    _ => {}
                },
                _ => {}
            }
        }
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Where the selector and pager loops read their input from.
pub trait EventSource {
    fn next_event(&mut self) -> Result<AppEvent>;
}

impl EventSource for EventHandler {
    fn next_event(&mut self) -> Result<AppEvent> {
        self.next()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerAction {
    Quit,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    OpenInBrowser,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorAction {
    Up,
    Down,
    ToggleMark,
    Accept,
    Abort,
    ClearQuery,
    DeleteChar,
    Insert(char),
    None,
}
