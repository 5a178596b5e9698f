//! Per-card expiry countdowns and the single ticker that refreshes them.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::render::Board;

pub const ENDED_TEXT: &str = "OFERTA ENCERRADA";
const PENDING_TEXT: &str = "--:--:--";

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "text", rename_all = "snake_case")]
pub enum Countdown {
    /// Rendered but not ticked yet.
    Pending,
    Running(String),
    /// Terminal. Later ticks leave it alone.
    Ended,
}

impl Countdown {
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Countdown::Pending => PENDING_TEXT,
            Countdown::Running(text) => text,
            Countdown::Ended => ENDED_TEXT,
        }
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        matches!(self, Countdown::Ended)
    }
}

/// Formats the time left as `Dd HH:MM:SS`, dropping the day part under one
/// day. Zero or negative input is [`Countdown::Ended`].
#[must_use]
pub fn format_remaining(remaining_ms: i64) -> Countdown {
    if remaining_ms <= 0 {
        return Countdown::Ended;
    }
    let days = remaining_ms / MS_PER_DAY;
    let hours = (remaining_ms % MS_PER_DAY) / MS_PER_HOUR;
    let minutes = (remaining_ms % MS_PER_HOUR) / MS_PER_MINUTE;
    let seconds = (remaining_ms % MS_PER_MINUTE) / MS_PER_SECOND;

    let clock = format!("{hours:02}:{minutes:02}:{seconds:02}");
    if days > 0 {
        Countdown::Running(format!("{days}d {clock}"))
    } else {
        Countdown::Running(clock)
    }
}

#[must_use]
pub fn countdown_at(expiry: DateTime<Utc>, now: DateTime<Utc>) -> Countdown {
    format_remaining((expiry - now).num_milliseconds())
}

/// Recomputes every live countdown on `board` for `now`.
///
/// Returns how many cards changed to [`Countdown::Ended`] on this tick.
pub fn tick(board: &mut Board, now: DateTime<Utc>) -> usize {
    let mut ended = 0;
    for card in board.cards_mut() {
        let (Some(expiry), Some(countdown)) = (card.expiry, card.countdown.as_mut()) else {
            continue;
        };
        if countdown.is_ended() {
            continue;
        }
        *countdown = countdown_at(expiry, now);
        if countdown.is_ended() {
            ended += 1;
        }
    }
    ended
}

/// Owns at most one live ticker task.
///
/// [`CountdownScheduler::start`] aborts the previous task before spawning a
/// new one, so a reload never leaves two tickers writing to the board.
pub struct CountdownScheduler {
    period: Duration,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl CountdownScheduler {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            handle: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn start(&self, board: Arc<RwLock<Board>>) {
        let period = self.period;
        let mut slot = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        *slot = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                let ended = tick(&mut *board.write().await, Utc::now());
                if ended > 0 {
                    tracing::debug!(ended, "countdowns reached expiry");
                }
            }
        }));
    }

    pub fn stop(&self) {
        let mut slot = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        let slot = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        slot.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for CountdownScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
