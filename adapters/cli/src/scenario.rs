//! Scenario files: game parameters plus a scripted sequence of player inputs.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use glam::Vec2;
use lane_defence_core::{DefenseKind, GameConfig};
use lane_defence_rendering::FrameInput;
use serde::Deserialize;

/// Contents of a scenario file.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Scenario {
    /// Parameters handed to the session.
    pub(crate) game: GameConfig,
    /// Player inputs, replayed at the listed frames.
    pub(crate) script: Vec<ScriptStep>,
}

/// Player input replayed at a given frame.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub(crate) struct ScriptStep {
    /// Frame the input belongs to.
    pub(crate) frame: u64,
    /// What the player does.
    #[serde(flatten)]
    pub(crate) action: ScriptAction,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub(crate) enum ScriptAction {
    Click { at: [f32; 2] },
    Place { kind: DefenseKind },
    Upgrade,
    Remove,
    Dismiss,
}

impl Scenario {
    /// Reads and parses a scenario file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid scenario {}", path.display()))
    }

    pub(crate) fn parse(text: &str) -> Result<Self> {
        let mut scenario: Self = toml::from_str(text)?;
        scenario.script.sort_by_key(|step| step.frame);
        Ok(scenario)
    }

    /// Merges every scripted step of `frame` into a single input snapshot.
    pub(crate) fn input_at(&self, frame: u64) -> FrameInput {
        let mut input = FrameInput::default();
        for step in self.script.iter().filter(|step| step.frame == frame) {
            match step.action {
                ScriptAction::Click { at } => input.click_world_space = Some(Vec2::from(at)),
                ScriptAction::Place { kind } => input.place = Some(kind),
                ScriptAction::Upgrade => input.upgrade = true,
                ScriptAction::Remove => input.remove = true,
                ScriptAction::Dismiss => input.dismiss = true,
            }
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_steps_are_merged_per_frame() {
        let scenario = Scenario::parse(
            r#"
                [game]
                initial_coins = 200

                [[script]]
                frame = 3
                action = "upgrade"

                [[script]]
                frame = 0
                action = "click"
                at = [75.0, 175.0]

                [[script]]
                frame = 1
                action = "place"
                kind = "strong"
            "#,
        )
        .expect("scenario parses");

        assert_eq!(scenario.game.initial_coins, 200);
        assert_eq!(scenario.game.initial_lives, 3);
        assert_eq!(scenario.script[0].frame, 0);
        assert_eq!(
            scenario.input_at(0).click_world_space,
            Some(Vec2::new(75.0, 175.0))
        );
        assert_eq!(scenario.input_at(1).place, Some(DefenseKind::Strong));
        assert!(scenario.input_at(3).upgrade);
        assert_eq!(scenario.input_at(2), FrameInput::default());
    }

    #[test]
    fn unknown_actions_are_rejected() {
        let parsed = Scenario::parse(
            r#"
                [[script]]
                frame = 0
                action = "sell"
            "#,
        );
        assert!(parsed.is_err());
    }
}
