use std::time::{Duration, Instant};

use log::debug;

/// Cooldown/deduplication window for continuous scanning.
///
/// A symbol held steadily in front of a camera decodes on every frame; left
/// unchecked that floods the record store with repeat writes. Each scanning
/// session owns one of these and asks it whether a freshly decoded payload
/// should be acted on. State is per-session by construction, so concurrent
/// kiosks or users never interfere with each other.
#[derive(Debug, Clone)]
pub struct ScanSession {
    cooldown: Duration,
    last: Option<(String, Instant)>,
}

impl ScanSession {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last: None,
        }
    }

    /// Whether `payload` should be acted on now. A payload identical to the
    /// previously accepted one is rejected until the cooldown has elapsed;
    /// an accepted payload becomes the new remembered value.
    pub fn accept(&mut self, payload: &str) -> bool {
        self.accept_at(payload, Instant::now())
    }

    fn accept_at(&mut self, payload: &str, now: Instant) -> bool {
        if let Some((last_payload, seen_at)) = &self.last {
            if last_payload == payload && now.duration_since(*seen_at) < self.cooldown {
                debug!("suppressing repeat payload within cooldown window");
                return false;
            }
        }
        self.last = Some((payload.to_string(), now));
        true
    }

    /// Forget the remembered payload, e.g. when the operator switches course.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
