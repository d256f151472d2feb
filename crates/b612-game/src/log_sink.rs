//! Dialogue display for headless runs: lines go to the log.

use b612_scene::DialogueSink;
use b612_surface::EntityId;
use tracing::{debug, info};

/// Writes dialogue to the `tracing` log and remembers the lines shown.
#[derive(Debug, Default)]
pub struct LogDialogueSink {
    shown: Vec<(EntityId, String)>,
}

impl LogDialogueSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line shown so far, oldest first.
    pub fn shown(&self) -> &[(EntityId, String)] {
        &self.shown
    }
}

impl DialogueSink for LogDialogueSink {
    fn show(&mut self, speaker: &EntityId, text: &str) {
        info!(%speaker, "\"{text}\"");
        self.shown.push((speaker.clone(), text.to_owned()));
    }

    fn hide(&mut self, speaker: &EntityId) {
        debug!(%speaker, "dialogue hidden");
    }
}
