//! Per-NPC dialogue as a data-driven state machine.
//!
//! A script is a set of named nodes. The cursor points at the node that the
//! next click will show; each node names where the cursor goes afterwards.
//! Display timeouts are counted in frames by [`NpcDialogue::tick`], not by
//! timers.

use b612_surface::EntityId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::SceneError;

/// Four seconds at 60 updates per second.
pub const DEFAULT_DISPLAY_FRAMES: u32 = 240;

fn default_display_frames() -> u32 {
    DEFAULT_DISPLAY_FRAMES
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DialogueNode {
    pub id: String,
    pub text: String,
    /// Node shown by the click after this one. `None` repeats this node.
    #[serde(default)]
    pub on_click: Option<String>,
    /// Node jumped to when a mini-game completes while this node is next.
    #[serde(default)]
    pub on_minigame_complete: Option<String>,
    /// Showing this node grants the sphere's reward.
    #[serde(default)]
    pub reward: bool,
    /// Showing this node starts the sphere's mini-game.
    #[serde(default)]
    pub starts_minigame: bool,
    #[serde(default = "default_display_frames")]
    pub display_frames: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DialogueScript {
    pub start: String,
    pub nodes: Vec<DialogueNode>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DialogueEvent {
    Click,
    MiniGameComplete,
}

/// What to display in response to an event.
#[derive(Clone, Debug, PartialEq)]
pub struct DialogueLine {
    pub text: String,
    pub reward: bool,
    pub starts_minigame: bool,
}

/// Fire-and-forget text display.
pub trait DialogueSink {
    fn show(&mut self, speaker: &EntityId, text: &str);
    fn hide(&mut self, speaker: &EntityId);
}

/// Dialogue state of one NPC.
#[derive(Clone, Debug)]
pub struct NpcDialogue {
    npc: EntityId,
    nodes: Vec<DialogueNode>,
    index: FxHashMap<String, usize>,
    /// Survives leaving and re-entering the sphere.
    cursor: usize,
    /// Frames left before the visible line hides; 0 when nothing is shown.
    remaining: u32,
}

impl NpcDialogue {
    /// Validate `script` and start at its `start` node.
    ///
    /// # Errors
    ///
    /// [`SceneError::UnknownDialogueNode`] if the start node or any
    /// transition target does not exist.
    pub fn new(npc: EntityId, script: DialogueScript) -> Result<Self, SceneError> {
        let index: FxHashMap<String, usize> = script
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
        let lookup = |node: &str| {
            index
                .get(node)
                .copied()
                .ok_or_else(|| SceneError::UnknownDialogueNode {
                    npc: npc.clone(),
                    node: node.to_owned(),
                })
        };

        let start = lookup(&script.start)?;
        for node in &script.nodes {
            for target in [&node.on_click, &node.on_minigame_complete]
                .into_iter()
                .flatten()
            {
                lookup(target)?;
            }
        }

        Ok(Self {
            npc,
            nodes: script.nodes,
            index,
            cursor: start,
            remaining: 0,
        })
    }

    pub fn npc(&self) -> &EntityId {
        &self.npc
    }

    /// Id of the node the next click will show.
    pub fn next_node(&self) -> &str {
        &self.nodes[self.cursor].id
    }

    pub fn is_showing(&self) -> bool {
        self.remaining > 0
    }

    /// Advance on `event`. Returns the line to display, or `None` if the
    /// event means nothing in the current state.
    pub fn handle(&mut self, event: DialogueEvent) -> Option<DialogueLine> {
        let shown = match event {
            DialogueEvent::Click => self.cursor,
            DialogueEvent::MiniGameComplete => {
                let target = self.nodes[self.cursor].on_minigame_complete.as_deref()?;
                self.index.get(target).copied()?
            }
        };
        let node = &self.nodes[shown];
        self.cursor = node
            .on_click
            .as_deref()
            .and_then(|next| self.index.get(next).copied())
            .unwrap_or(shown);
        self.remaining = node.display_frames.max(1);
        debug!(npc = %self.npc, node = %node.id, ?event, "dialogue advanced");

        Some(DialogueLine {
            text: node.text.clone(),
            reward: node.reward,
            starts_minigame: node.starts_minigame,
        })
    }

    /// Count down the display timeout. Returns `true` on the frame the line
    /// should be hidden.
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }

    /// Drop the visible line, if any, keeping the cursor where it is. Returns
    /// `true` if a line was showing.
    pub fn dismiss(&mut self) -> bool {
        let showing = self.is_showing();
        self.remaining = 0;
        showing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, text: &str, on_click: Option<&str>) -> DialogueNode {
        DialogueNode {
            id: id.into(),
            text: text.into(),
            on_click: on_click.map(Into::into),
            on_minigame_complete: None,
            reward: false,
            starts_minigame: false,
            display_frames: 3,
        }
    }

    fn drunkard() -> NpcDialogue {
        let mut give = node("give", "Take what you came for.", Some("after"));
        give.reward = true;
        NpcDialogue::new(
            "drunkard".into(),
            DialogueScript {
                start: "l0".into(),
                nodes: vec![
                    node("l0", "I drink.", Some("l1")),
                    node("l1", "To forget.", Some("give")),
                    give,
                    node("after", "......", None),
                ],
            },
        )
        .unwrap()
    }

    #[test]
    fn test_clicks_walk_the_script_then_repeat() {
        let mut dialogue = drunkard();
        let texts: Vec<_> = (0..5)
            .map(|_| dialogue.handle(DialogueEvent::Click).unwrap())
            .collect();
        assert_eq!(texts[0].text, "I drink.");
        assert_eq!(texts[1].text, "To forget.");
        assert!(texts[2].reward);
        assert_eq!(texts[3].text, "......");
        assert_eq!(texts[4].text, "......");
        assert!(!texts[4].reward);
    }

    #[test]
    fn test_timeout_counts_frames_and_restarts_on_click() {
        let mut dialogue = drunkard();
        dialogue.handle(DialogueEvent::Click);
        assert!(dialogue.is_showing());
        assert!(!dialogue.tick());
        assert!(!dialogue.tick());
        dialogue.handle(DialogueEvent::Click);
        assert!(!dialogue.tick());
        assert!(!dialogue.tick());
        assert!(dialogue.tick());
        assert!(!dialogue.is_showing());
        assert!(!dialogue.tick());
    }

    #[test]
    fn test_minigame_completion_jumps() {
        let mut play = node("play", "Light the lamp!", None);
        play.starts_minigame = true;
        play.on_minigame_complete = Some("thanks".into());
        let mut thanks = node("thanks", "Well done.", Some("rest"));
        thanks.reward = true;
        let mut dialogue = NpcDialogue::new(
            "lamplighter".into(),
            DialogueScript {
                start: "play".into(),
                nodes: vec![play, thanks, node("rest", "Good night.", None)],
            },
        )
        .unwrap();

        let line = dialogue.handle(DialogueEvent::Click).unwrap();
        assert!(line.starts_minigame);
        let line = dialogue.handle(DialogueEvent::MiniGameComplete).unwrap();
        assert_eq!(line.text, "Well done.");
        assert!(line.reward);
        assert_eq!(dialogue.next_node(), "rest");
        assert!(dialogue.handle(DialogueEvent::MiniGameComplete).is_none());
    }

    #[test]
    fn test_dismiss_hides_but_keeps_progress() {
        let mut dialogue = drunkard();
        dialogue.handle(DialogueEvent::Click);
        dialogue.handle(DialogueEvent::Click);
        assert!(dialogue.dismiss());
        assert!(!dialogue.is_showing());
        assert!(!dialogue.dismiss());
        assert_eq!(dialogue.next_node(), "give");
        assert!(dialogue.handle(DialogueEvent::Click).unwrap().reward);
    }

    #[test]
    fn test_unknown_targets_rejected() {
        let result = NpcDialogue::new(
            "king".into(),
            DialogueScript {
                start: "a".into(),
                nodes: vec![node("a", "Hm.", Some("nowhere"))],
            },
        );
        assert!(matches!(
            result,
            Err(SceneError::UnknownDialogueNode { node, .. }) if node == "nowhere"
        ));
        let result = NpcDialogue::new(
            "king".into(),
            DialogueScript {
                start: "missing".into(),
                nodes: vec![],
            },
        );
        assert!(result.is_err());
    }
}
