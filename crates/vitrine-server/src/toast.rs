//! Social-proof toasts on a randomized repeating schedule.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::render::Board;

const FIRST_NAMES: &[&str] = &[
    "Ana", "Bruno", "Camila", "Diego", "Fernanda", "Gabriel", "Juliana", "Lucas", "Mariana",
    "Rafael", "Beatriz", "Thiago",
];

const CITIES: &[&str] = &[
    "São Paulo",
    "Rio de Janeiro",
    "Belo Horizonte",
    "Curitiba",
    "Porto Alegre",
    "Salvador",
    "Recife",
    "Fortaleza",
    "Brasília",
    "Goiânia",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
    pub product_title: String,
    pub shown_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Picks a title, a first name and a city. `None` when there are no titles.
pub fn compose_toast<R: Rng + ?Sized>(
    rng: &mut R,
    titles: &[String],
    now: DateTime<Utc>,
    display: Duration,
) -> Option<Toast> {
    let title = titles.choose(rng)?;
    let name = FIRST_NAMES.choose(rng)?;
    let city = CITIES.choose(rng)?;
    let display = chrono::Duration::from_std(display).unwrap_or_else(|_| chrono::Duration::zero());
    Some(Toast {
        message: format!("{name} de {city} acabou de garantir: {title}"),
        product_title: title.clone(),
        shown_at: now,
        expires_at: now + display,
    })
}

/// Owns at most one live toast task, like [`crate::countdown::CountdownScheduler`].
pub struct ToastScheduler {
    min_period: Duration,
    max_period: Duration,
    display: Duration,
    seed: Option<u64>,
    handle: Mutex<Option<JoinHandle<()>>>,
    current: Arc<RwLock<Option<Toast>>>,
}

impl ToastScheduler {
    #[must_use]
    pub fn new(min_period: Duration, max_period: Duration, display: Duration) -> Self {
        Self {
            min_period,
            max_period: max_period.max(min_period),
            display,
            seed: None,
            handle: Mutex::new(None),
            current: Arc::new(RwLock::new(None)),
        }
    }

    /// Fixes the random sequence, for tests.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn start(&self, board: Arc<RwLock<Board>>) {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let min_ms = duration_ms(self.min_period);
        let max_ms = duration_ms(self.max_period);
        let display = self.display;
        let current = Arc::clone(&self.current);

        let mut slot = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        *slot = Some(tokio::spawn(async move {
            current.write().await.take();
            loop {
                let wait = rng.random_range(min_ms..=max_ms);
                tokio::time::sleep(Duration::from_millis(wait)).await;

                let titles: Vec<String> = board
                    .read()
                    .await
                    .cards()
                    .iter()
                    .map(|c| c.title.clone())
                    .collect();
                let Some(toast) = compose_toast(&mut rng, &titles, Utc::now(), display) else {
                    continue;
                };
                tracing::debug!(product = %toast.product_title, "social-proof toast shown");
                *current.write().await = Some(toast);
                tokio::time::sleep(display).await;
                current.write().await.take();
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

    pub async fn current(&self) -> Option<Toast> {
        self.current.read().await.clone()
    }
}

impl Drop for ToastScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

fn duration_ms(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}
