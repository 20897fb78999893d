//! Full-screen, read-only viewer for one item.
//!
//! The pager is a plain value: [`Pager::handle_event`] consumes it together
//! with an event and returns the next pager plus what the driver should do.
//! Only [`run`] touches the terminal.

use chrono::{DateTime, Utc};
use ratatui::{backend::Backend, Terminal};

use crate::app::{Result, RunnelError};
use crate::config::Config;
use crate::content;
use crate::domain::FeedItem;
use crate::tui::event::{AppEvent, EventSource, PagerAction};
use crate::tui::layout;
use crate::tui::theme::Styles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerState {
    Uninitialized,
    Ready {
        header_height: u16,
        footer_height: u16,
        viewport: Viewport,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerEvent {
    Resize { width: u16, height: u16 },
    Action(PagerAction),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerEffect {
    None,
    Quit,
    OpenLink(String),
}

#[derive(Debug, Clone)]
pub struct Pager {
    title: String,
    link: String,
    content: String,
    lines: Vec<String>,
    bar_height: u16,
    state: PagerState,
}

impl Pager {
    /// Ages in the body are measured from `now`, normally the time the
    /// selector listing was built.
    pub fn new(item: &FeedItem, now: DateTime<Utc>, styles: &Styles) -> Self {
        Self::from_parts(
            item.display_title(),
            &item.link,
            content::full_content(item, now),
            styles.bar_height(),
        )
    }

    pub fn from_parts(title: &str, link: &str, content: String, bar_height: u16) -> Self {
        Self {
            title: title.to_string(),
            link: link.to_string(),
            content,
            lines: Vec::new(),
            bar_height,
            state: PagerState::Uninitialized,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> PagerState {
        self.state
    }

    pub fn viewport(&self) -> Option<Viewport> {
        match self.state {
            PagerState::Ready { viewport, .. } => Some(viewport),
            PagerState::Uninitialized => None,
        }
    }

    /// Content lines, wrapped to the viewport width.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn visible_lines(&self) -> &[String] {
        match self.viewport() {
            Some(v) => {
                let start = v.offset.min(self.lines.len());
                let end = (start + usize::from(v.height)).min(self.lines.len());
                &self.lines[start..end]
            }
            None => &[],
        }
    }

    pub fn max_offset(&self) -> usize {
        self.viewport()
            .map(|v| self.lines.len().saturating_sub(usize::from(v.height)))
            .unwrap_or(0)
    }

    /// How far down the content the viewport is, from 0.0 to 1.0.
    pub fn scroll_fraction(&self) -> f64 {
        let max = self.max_offset();
        match self.viewport() {
            Some(v) if max > 0 => (v.offset.min(max) as f64) / (max as f64),
            _ => 1.0,
        }
    }

    /// Scroll position as shown in the footer, e.g. `" 42%"`.
    pub fn scroll_percent(&self) -> String {
        format!("{:>3}%", (self.scroll_fraction() * 100.0).round() as u16)
    }

    pub fn handle_event(mut self, event: PagerEvent) -> (Self, PagerEffect) {
        match event {
            PagerEvent::Resize { width, height } => {
                self.resize(width, height);
                (self, PagerEffect::None)
            }
            PagerEvent::Action(PagerAction::Quit) => (self, PagerEffect::Quit),
            PagerEvent::Action(PagerAction::OpenInBrowser) => {
                let effect = if self.link.trim().is_empty() {
                    PagerEffect::None
                } else {
                    PagerEffect::OpenLink(self.link.clone())
                };
                (self, effect)
            }
            PagerEvent::Action(action) => {
                self.scroll(action);
                (self, PagerEffect::None)
            }
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        let (header_height, footer_height, offset) = match self.state {
            PagerState::Uninitialized => (self.bar_height, self.bar_height, 0),
            PagerState::Ready {
                header_height,
                footer_height,
                viewport,
            } => (header_height, footer_height, viewport.offset),
        };

        self.lines = wrap_lines(&self.content, width);
        let viewport_height = height.saturating_sub(header_height + footer_height);
        let max_offset = self.lines.len().saturating_sub(usize::from(viewport_height));

        self.state = PagerState::Ready {
            header_height,
            footer_height,
            viewport: Viewport {
                width,
                height: viewport_height,
                offset: offset.min(max_offset),
            },
        };
    }

    fn scroll(&mut self, action: PagerAction) {
        let max_offset = self.max_offset();
        let PagerState::Ready { viewport, .. } = &mut self.state else {
            return;
        };
        let page = usize::from(viewport.height.max(1));

        viewport.offset = match action {
            PagerAction::ScrollUp => viewport.offset.saturating_sub(1),
            PagerAction::ScrollDown => (viewport.offset + 1).min(max_offset),
            PagerAction::PageUp => viewport.offset.saturating_sub(page),
            PagerAction::PageDown => (viewport.offset + page).min(max_offset),
            PagerAction::Top => 0,
            PagerAction::Bottom => max_offset,
            _ => viewport.offset,
        };
    }
}

fn wrap_lines(content: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    content
        .lines()
        .flat_map(|line| {
            textwrap::wrap(line, width)
                .into_iter()
                .map(|part| part.into_owned())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Show `item` until the user quits.
///
/// A terminal failure ends this pager only; the caller decides what happens
/// to the rest of the session.
pub fn run<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    events: &mut E,
    item: &FeedItem,
    now: DateTime<Utc>,
    config: &Config,
    styles: &Styles,
) -> Result<()> {
    let mut pager = Pager::new(item, now, styles);
    let size = terminal.size().map_err(RunnelError::terminal)?;
    pager = pager
        .handle_event(PagerEvent::Resize {
            width: size.width,
            height: size.height,
        })
        .0;

    loop {
        terminal
            .draw(|frame| layout::render_pager(frame, &pager, styles))
            .map_err(RunnelError::terminal)?;

        let event = match events.next_event()? {
            AppEvent::Key(key) => PagerEvent::Action(config.keybindings.pager.get_action(&key)),
            AppEvent::Resize { width, height } => PagerEvent::Resize { width, height },
            AppEvent::ScrollUp => PagerEvent::Action(PagerAction::ScrollUp),
            AppEvent::ScrollDown => PagerEvent::Action(PagerAction::ScrollDown),
        };

        let (next, effect) = pager.handle_event(event);
        pager = next;

        match effect {
            PagerEffect::None => {}
            PagerEffect::Quit => return Ok(()),
            PagerEffect::OpenLink(url) => {
                tracing::info!(%url, "opening link in browser");
                if let Err(e) = open::that(&url) {
                    tracing::warn!(%url, error = %e, "failed to open browser");
                }
            }
        }
    }
}
