//! Planner that replays recorded replies.

use async_trait::async_trait;
use conductor_application::{PlannerGateway, PlannerGatewayError, PlanningRequest};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use tracing::debug;

/// Line separating two recorded replies in a playback file.
pub const PLAYBACK_SEPARATOR: &str = "---";

/// Replays planner replies in order, one per request.
///
/// A playback file holds replies separated by lines containing only `---`.
/// Blank replies are skipped. Running out of replies is a gateway error, so
/// a script that is too short surfaces as a planning failure.
pub struct PlaybackPlanner {
    replies: Mutex<VecDeque<String>>,
}

impl PlaybackPlanner {
    pub fn new(replies: impl IntoIterator<Item = String>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut replies = Vec::new();
        let mut current = Vec::new();
        for line in text.lines() {
            if line.trim() == PLAYBACK_SEPARATOR {
                replies.push(current.join("\n"));
                current.clear();
            } else {
                current.push(line);
            }
        }
        replies.push(current.join("\n"));

        Self::new(
            replies
                .into_iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
        )
    }

    pub fn from_file(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_text(&text))
    }

    pub fn remaining(&self) -> usize {
        self.replies.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[async_trait]
impl PlannerGateway for PlaybackPlanner {
    async fn request(&self, request: &PlanningRequest) -> Result<String, PlannerGatewayError> {
        let mut replies = self
            .replies
            .lock()
            .map_err(|_| PlannerGatewayError::Other("playback state poisoned".to_string()))?;
        let reply = replies.pop_front().ok_or(PlannerGatewayError::Exhausted)?;
        debug!(
            "Replaying planner reply for attempt {} ({} left)",
            request.attempt,
            replies.len()
        );
        Ok(reply)
    }
}
