//! Script data model.
//!
//! A [`ScriptSet`] is a named, immutable collection of [`Sequence`]s, each an
//! ordered list of [`ScriptStep`]s. Sets are shared between controllers
//! through `Arc<ScriptSet>` and never mutated after loading.
//!
//! On disk every step is a keyword plus up to three positional numbers; see
//! [`StepKind::from_keyword`] and [`ScriptStep::from_params`] for the mapping.

use std::sync::Arc;

use crate::action::curve::Interpolation;

/// Number of positional parameters a step carries on disk.
pub const STEP_PARAM_COUNT: usize = 3;

/// Step tag, as named in script files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepKind {
    Move,
    Accelerate,
    Wait,
    Path,
    ControlPoint,
    Vanish,
    SpawnTrigger,
    AnimationTrigger,
}

impl StepKind {
    /// Resolve a script file keyword.
    ///
    /// | keyword     | kind               |
    /// |-------------|--------------------|
    /// | `Move`      | `Move`             |
    /// | `Accel`     | `Accelerate`       |
    /// | `Wait`      | `Wait`             |
    /// | `Generate`  | `SpawnTrigger`     |
    /// | `Animation` | `AnimationTrigger` |
    /// | `Delete`    | `Vanish`           |
    /// | `Path`      | `Path`             |
    /// | `Point`     | `ControlPoint`     |
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "Move" => Some(StepKind::Move),
            "Accel" => Some(StepKind::Accelerate),
            "Wait" => Some(StepKind::Wait),
            "Generate" => Some(StepKind::SpawnTrigger),
            "Animation" => Some(StepKind::AnimationTrigger),
            "Delete" => Some(StepKind::Vanish),
            "Path" => Some(StepKind::Path),
            "Point" => Some(StepKind::ControlPoint),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            StepKind::Move => "Move",
            StepKind::Accelerate => "Accel",
            StepKind::Wait => "Wait",
            StepKind::SpawnTrigger => "Generate",
            StepKind::AnimationTrigger => "Animation",
            StepKind::Vanish => "Delete",
            StepKind::Path => "Path",
            StepKind::ControlPoint => "Point",
        }
    }
}

/// A single instruction of a sequence.
///
/// Angles are in degrees, `0` pointing along +X and `90` pointing up the
/// screen (towards −Y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScriptStep {
    /// Set the velocity. Does not consume time.
    Move { direction: f32, speed: f32 },
    /// Set the acceleration. Does not consume time.
    Accelerate { direction: f32, amount: f32 },
    /// Keep moving for `duration` seconds.
    Wait { duration: f32 },
    /// Follow the curve through the next `count` control points.
    Path {
        duration: f32,
        count: usize,
        interpolation: Interpolation,
    },
    /// Curve data consumed by the preceding `Path`; never executed on its own.
    ControlPoint { x: f32, y: f32 },
    /// Stop playback for good and mark the entity for recycling.
    Vanish,
    /// Activate the controller's generator with these parameters.
    SpawnTrigger { speed: f32, direction: f32 },
    /// Switch the entity's animation sequence. Negative values are ignored.
    AnimationTrigger { sequence: i32 },
}

impl ScriptStep {
    /// Build a step from its positional on-disk parameters.
    pub fn from_params(kind: StepKind, params: [f32; STEP_PARAM_COUNT]) -> Self {
        let [a, b, c] = params;
        match kind {
            StepKind::Move => ScriptStep::Move {
                direction: a,
                speed: b,
            },
            StepKind::Accelerate => ScriptStep::Accelerate {
                direction: a,
                amount: b,
            },
            StepKind::Wait => ScriptStep::Wait { duration: a },
            StepKind::Path => ScriptStep::Path {
                duration: a,
                count: b.max(0.0) as usize,
                interpolation: Interpolation::from_param(c),
            },
            StepKind::ControlPoint => ScriptStep::ControlPoint { x: a, y: b },
            StepKind::Vanish => ScriptStep::Vanish,
            StepKind::SpawnTrigger => ScriptStep::SpawnTrigger {
                speed: a,
                direction: b,
            },
            StepKind::AnimationTrigger => ScriptStep::AnimationTrigger { sequence: a as i32 },
        }
    }

    pub fn kind(&self) -> StepKind {
        match self {
            ScriptStep::Move { .. } => StepKind::Move,
            ScriptStep::Accelerate { .. } => StepKind::Accelerate,
            ScriptStep::Wait { .. } => StepKind::Wait,
            ScriptStep::Path { .. } => StepKind::Path,
            ScriptStep::ControlPoint { .. } => StepKind::ControlPoint,
            ScriptStep::Vanish => StepKind::Vanish,
            ScriptStep::SpawnTrigger { .. } => StepKind::SpawnTrigger,
            ScriptStep::AnimationTrigger { .. } => StepKind::AnimationTrigger,
        }
    }
}

/// Ordered list of steps; order is execution order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Sequence {
    steps: Vec<ScriptStep>,
}

impl Sequence {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    pub fn get(&self, index: usize) -> Option<&ScriptStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl From<Vec<ScriptStep>> for Sequence {
    fn from(steps: Vec<ScriptStep>) -> Self {
        Self::new(steps)
    }
}

/// Named collection of sequences addressed by index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptSet {
    name: String,
    sequences: Vec<Sequence>,
}

impl ScriptSet {
    pub fn new(name: impl Into<String>, sequences: Vec<Sequence>) -> Self {
        Self {
            name: name.into(),
            sequences,
        }
    }

    /// Wrap into the shared handle controllers hold.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sequence(&self, index: usize) -> Option<&Sequence> {
        self.sequences.get(index)
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_round_trip() {
        let kinds = [
            StepKind::Move,
            StepKind::Accelerate,
            StepKind::Wait,
            StepKind::Path,
            StepKind::ControlPoint,
            StepKind::Vanish,
            StepKind::SpawnTrigger,
            StepKind::AnimationTrigger,
        ];
        for kind in kinds {
            assert_eq!(StepKind::from_keyword(kind.keyword()), Some(kind));
        }
    }

    #[test]
    fn test_unknown_keyword() {
        assert_eq!(StepKind::from_keyword("Teleport"), None);
        assert_eq!(StepKind::from_keyword("move"), None);
    }

    #[test]
    fn test_from_params_move() {
        let step = ScriptStep::from_params(StepKind::Move, [45.0, 120.0, 9.0]);
        assert_eq!(
            step,
            ScriptStep::Move {
                direction: 45.0,
                speed: 120.0
            }
        );
        assert_eq!(step.kind(), StepKind::Move);
    }

    #[test]
    fn test_from_params_path() {
        let step = ScriptStep::from_params(StepKind::Path, [2.5, 4.0, 1.0]);
        assert_eq!(
            step,
            ScriptStep::Path {
                duration: 2.5,
                count: 4,
                interpolation: Interpolation::Linear
            }
        );
    }

    #[test]
    fn test_from_params_path_negative_count() {
        let step = ScriptStep::from_params(StepKind::Path, [1.0, -3.0, 0.0]);
        assert!(matches!(step, ScriptStep::Path { count: 0, .. }));
    }

    #[test]
    fn test_from_params_generate_and_animation() {
        assert_eq!(
            ScriptStep::from_params(StepKind::SpawnTrigger, [200.0, 270.0, 0.0]),
            ScriptStep::SpawnTrigger {
                speed: 200.0,
                direction: 270.0
            }
        );
        assert_eq!(
            ScriptStep::from_params(StepKind::AnimationTrigger, [2.0, 0.0, 0.0]),
            ScriptStep::AnimationTrigger { sequence: 2 }
        );
        assert_eq!(
            ScriptStep::from_params(StepKind::Vanish, [1.0, 2.0, 3.0]),
            ScriptStep::Vanish
        );
    }

    #[test]
    fn test_script_set_lookup() {
        let set = ScriptSet::new(
            "zako",
            vec![
                Sequence::from(vec![ScriptStep::Wait { duration: 1.0 }]),
                Sequence::default(),
            ],
        );
        assert_eq!(set.name(), "zako");
        assert_eq!(set.len(), 2);
        assert_eq!(set.sequence(0).map(Sequence::len), Some(1));
        assert!(set.sequence(1).is_some_and(Sequence::is_empty));
        assert!(set.sequence(2).is_none());
    }
}
