//! Raw-mode terminal search session
//!
//! Terminal input is read on a separate task and published to an
//! [`EventFeed`]; the session driver redraws the view after every change.

use super::render::{cursor_column, draw, view_lines, ListWindow, FIRST_ITEM_ROW};
use super::text_utils::{get_terminal_height, get_terminal_width};
use anyhow::{Context, Result};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::style::Stylize;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use fundsearch_core::{
    run_session, EventFeed, FundLookup, FundNavigator, SearchConfig, SearchKey, SearchSession,
    SessionOutcome, UiEvent,
};
use futures::StreamExt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Navigator that records the route of the chosen fund
#[derive(Debug, Default)]
pub struct RouteNavigator {
    route: Mutex<Option<String>>,
}

impl RouteNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route of the last fund navigated to
    pub fn route(&self) -> Option<String> {
        self.route.lock().ok().and_then(|route| route.clone())
    }
}

impl FundNavigator for RouteNavigator {
    fn navigate_to_fund(&self, fund_id: &str) {
        let route = fund_route(fund_id);
        info!(route = %route, "Navigating to fund");
        if let Ok(mut current) = self.route.lock() {
            *current = Some(route);
        }
    }
}

/// Detail page route for a fund
pub fn fund_route(fund_id: &str) -> String {
    format!("/funds/{}", fund_id)
}

/// Text typed into the search box, tracked on the input side so every
/// edit can be published as the full text
#[derive(Debug, Default)]
pub struct InputBuffer {
    text: String,
}

impl InputBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Translate a key press into the event it produces, if any
    pub fn apply(&mut self, key: KeyEvent) -> Option<UiEvent> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let control = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if control => Some(UiEvent::Key(SearchKey::Escape)),
            KeyCode::Char('u') if control => {
                if self.text.is_empty() {
                    return None;
                }
                self.text.clear();
                Some(UiEvent::Input(String::new()))
            }
            KeyCode::Char(_) if control => None,
            KeyCode::Char(ch) => {
                self.text.push(ch);
                Some(UiEvent::Input(self.text.clone()))
            }
            KeyCode::Backspace => self
                .text
                .pop()
                .map(|_| UiEvent::Input(self.text.clone())),
            KeyCode::Down => Some(UiEvent::Key(SearchKey::ArrowDown)),
            KeyCode::Up => Some(UiEvent::Key(SearchKey::ArrowUp)),
            KeyCode::Enter => Some(UiEvent::Key(SearchKey::Enter)),
            KeyCode::Esc => Some(UiEvent::Key(SearchKey::Escape)),
            _ => None,
        }
    }
}

/// Translate a left click into an item click or a click outside the list.
///
/// Clicks on the prompt and status rows keep the search open.
pub fn click_event(mouse: MouseEvent, window: ListWindow) -> Option<UiEvent> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) || mouse.row < FIRST_ITEM_ROW {
        return None;
    }

    match window.item_at_row(mouse.row) {
        Some(index) => Some(UiEvent::ClickItem(index)),
        None => Some(UiEvent::ClickOutside),
    }
}

/// Raw mode and alternate screen, restored on drop
struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let guard = TerminalGuard;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)
            .context("Failed to prepare terminal")?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

async fn forward_terminal_events(feed: EventFeed, window: watch::Receiver<ListWindow>) {
    let mut events = EventStream::new();
    let mut input = InputBuffer::default();

    loop {
        let event = match events.next().await {
            Some(Ok(event)) => event,
            Some(Err(e)) => {
                warn!(error = %e, "Failed to read terminal event");
                break;
            }
            None => break,
        };

        let ui_event = match event {
            Event::Key(key) => input.apply(key),
            Event::Mouse(mouse) => click_event(mouse, *window.borrow()),
            _ => None,
        };

        if let Some(ui_event) = ui_event {
            debug!(?ui_event, "Terminal event");
            feed.publish(ui_event);
        }
    }

    // Input is gone; end the session
    feed.publish(UiEvent::Key(SearchKey::Escape));
}

/// Run one interactive search until a fund is selected or the search is closed
pub async fn run_interactive(config: &SearchConfig, lookup: Arc<dyn FundLookup>) -> Result<()> {
    let navigator = Arc::new(RouteNavigator::new());
    let mut session = SearchSession::new(config, lookup, navigator.clone());
    let feed = EventFeed::default();
    let (window_tx, window_rx) = watch::channel(ListWindow::default());

    let terminal = TerminalGuard::enter()?;
    let reader = tokio::spawn(forward_terminal_events(feed.clone(), window_rx));

    let mut stdout = io::stdout();
    let mut draw_error: Option<io::Error> = None;
    let outcome = run_session(&mut session, &feed, |snapshot| {
        let window = ListWindow::for_snapshot(snapshot, get_terminal_height());
        window_tx.send_replace(window);
        let lines = view_lines(snapshot, get_terminal_width(), window);
        if let Err(e) = draw(&mut stdout, &lines, cursor_column(snapshot)) {
            draw_error.get_or_insert(e);
        }
    })
    .await;

    reader.abort();
    drop(terminal);

    if let Some(e) = draw_error {
        return Err(e).context("Failed to draw search view");
    }

    let mut stdout = io::stdout();
    match outcome {
        SessionOutcome::Selected(fund) => {
            let route = navigator
                .route()
                .unwrap_or_else(|| fund_route(&fund.id));
            writeln!(stdout, "{} {}", "Opening".green().bold(), route)?;
            writeln!(stdout, "  {}", fund.display_name)?;
        }
        SessionOutcome::Closed => {
            writeln!(stdout, "{}", "Search closed.".dark_grey())?;
        }
    }
    Ok(())
}
