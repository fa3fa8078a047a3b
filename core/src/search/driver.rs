//! Event feed and the async loop that drives a search session

use super::session::{SearchSession, SearchSnapshot, SessionOutcome, UiEvent};
use tokio::sync::broadcast;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

const DEFAULT_FEED_CAPACITY: usize = 64;

/// Broadcast feed of UI events.
///
/// Sessions receive events only while they hold a [`FeedSubscription`].
#[derive(Debug, Clone)]
pub struct EventFeed {
    tx: broadcast::Sender<UiEvent>,
}

impl Default for EventFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

impl EventFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Publish an event; returns how many subscribers received it
    pub fn publish(&self, event: UiEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> FeedSubscription {
        FeedSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// Active subscription to an [`EventFeed`]; dropping it unsubscribes
#[derive(Debug)]
pub struct FeedSubscription {
    rx: broadcast::Receiver<UiEvent>,
}

impl FeedSubscription {
    /// Next event, `None` once every publisher is gone
    pub async fn recv(&mut self) -> Option<UiEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Search session fell behind the event feed");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Run `session` until the user selects a fund or closes the search.
///
/// Opens the session, subscribes to `feed` for its lifetime, and calls
/// `on_change` with a fresh snapshot after every state change.
pub async fn run_session<F>(
    session: &mut SearchSession,
    feed: &EventFeed,
    mut on_change: F,
) -> SessionOutcome
where
    F: FnMut(&SearchSnapshot),
{
    session.open();
    let mut subscription = feed.subscribe();
    on_change(&session.snapshot());

    loop {
        let deadline = session.debounce_deadline();

        tokio::select! {
            event = subscription.recv() => {
                let outcome = match event {
                    Some(event) => session.handle_event(event, Instant::now()),
                    None => {
                        debug!("Event feed closed");
                        Some(session.close())
                    }
                };
                if let Some(outcome) = outcome {
                    on_change(&session.snapshot());
                    return outcome;
                }
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if !session.poll_debounce(Instant::now()) {
                    continue;
                }
            }
            Some(completion) = session.next_completion() => {
                if !session.on_completion(completion) {
                    continue;
                }
            }
        }

        on_change(&session.snapshot());
    }
}
