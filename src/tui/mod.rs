pub mod app;
pub mod event;
pub mod layout;
pub mod pager;
pub mod theme;

use std::io::{self, Stdout};

use chrono::Utc;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::app::{Result, RunnelError};
use crate::config::Config;
use crate::domain::FeedItem;

use self::app::{SelectMode, Selection, SelectorState, SelectorStep};
use self::event::{AppEvent, EventHandler, EventSource, SelectorAction};
use self::theme::Styles;

pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Browse `items` until the user aborts: pick one, read it, come back.
pub fn browse(items: &[FeedItem], config: &Config) -> Result<()> {
    let styles = Styles::from_colors(&config.colors);
    let mut terminal = setup_terminal()?;
    let mut events = EventHandler::new();
    let mut state = SelectorState::new(items, SelectMode::Single, Utc::now());
    let result = browse_loop(&mut terminal, &mut events, &mut state, items, config, &styles);
    restore_terminal(&mut terminal)?;
    result
}

/// Let the user mark any number of `items`.
pub fn choose_many(items: &[FeedItem], config: &Config) -> Result<Selection<Vec<usize>>> {
    let styles = Styles::from_colors(&config.colors);
    let mut terminal = setup_terminal()?;
    let mut events = EventHandler::new();
    let mut state = SelectorState::new(items, SelectMode::Multi, Utc::now());
    let result = run_selector(&mut terminal, &mut events, &mut state, config, &styles);
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().map_err(RunnelError::Terminal)?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).map_err(RunnelError::Terminal)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).map_err(RunnelError::Terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().map_err(RunnelError::Terminal)?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .map_err(RunnelError::Terminal)?;
    terminal.show_cursor().map_err(RunnelError::Terminal)?;
    Ok(())
}

/// Alternate between the selector and the pager until the user aborts.
///
/// A pager that fails ends only that pager: the error lands in the status
/// line and selection carries on.
fn browse_loop<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    events: &mut E,
    state: &mut SelectorState<'_>,
    items: &[FeedItem],
    config: &Config,
    styles: &Styles,
) -> Result<()> {
    loop {
        let chosen = match run_selector(terminal, events, state, config, styles)? {
            Selection::Chosen(indices) => indices,
            Selection::Aborted => return Ok(()),
        };

        let Some(item) = chosen.first().and_then(|&index| items.get(index)) else {
            continue;
        };

        tracing::debug!(title = %item.display_title(), "opening pager");
        if let Err(e) = pager::run(terminal, events, item, state.now(), config, styles) {
            tracing::warn!(error = %e, "pager failed");
            state.set_status(format!("Could not show item: {}", e));
            // Force a full repaint; the pager may have left the screen half drawn.
            terminal.clear().map_err(RunnelError::terminal)?;
        }
    }
}

/// Drive the selector until the user accepts or aborts.
///
/// `state` is borrowed so query, cursor and marks survive a round trip
/// through the pager.
fn run_selector<B: Backend, E: EventSource>(
    terminal: &mut Terminal<B>,
    events: &mut E,
    state: &mut SelectorState<'_>,
    config: &Config,
    styles: &Styles,
) -> Result<Selection<Vec<usize>>> {
    loop {
        terminal
            .draw(|frame| layout::render_selector(frame, state, styles))
            .map_err(RunnelError::terminal)?;

        let action = match events.next_event()? {
            AppEvent::Key(key) => config.keybindings.selector.get_action(&key),
            AppEvent::ScrollUp => SelectorAction::Up,
            AppEvent::ScrollDown => SelectorAction::Down,
            AppEvent::Resize { .. } => SelectorAction::None,
        };

        match state.handle_action(action) {
            SelectorStep::Continue => {}
            SelectorStep::Accept => return Ok(Selection::Chosen(state.selection())),
            SelectorStep::Abort => return Ok(Selection::Aborted),
        }
    }
}
