use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

/// Playback state of an entity's animation.
///
/// Scripts only pick the sequence (`Animation` steps); frame stepping is left
/// to whatever renders the entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Component, Serialize, Deserialize)]
pub struct Animation {
    pub sequence: usize,
    pub frame_index: usize,
    pub elapsed_time: f32,
}

impl Animation {
    pub fn new(sequence: usize) -> Self {
        Self {
            sequence,
            frame_index: 0,
            elapsed_time: 0.0,
        }
    }

    /// Select another sequence and rewind. Re-selecting the current one keeps
    /// its progress.
    pub fn switch_to(&mut self, sequence: usize) {
        if self.sequence == sequence {
            return;
        }
        self.sequence = sequence;
        self.frame_index = 0;
        self.elapsed_time = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_switch_rewinds() {
        let mut animation = Animation::new(0);
        animation.frame_index = 3;
        animation.elapsed_time = 0.4;
        animation.switch_to(2);
        assert_eq!(animation, Animation::new(2));
    }

    #[test]
    fn test_switch_to_same_sequence_keeps_progress() {
        let mut animation = Animation::new(1);
        animation.frame_index = 3;
        animation.switch_to(1);
        assert_eq!(animation.frame_index, 3);
    }
}
