//! Per-entity script interpreter.
//!
//! An [`ActionController`] is bound to one entity and plays one
//! [`Sequence`](crate::action::script::Sequence) of a shared
//! [`ScriptSet`]. Each call to [`ActionController::update`] advances the
//! current step by the frame delta, integrating motion into the entity
//! through the [`ActionTarget`] trait and crossing as many step boundaries
//! as the delta covers.
//!
//! # Modes
//!
//! - [`ActionMode::Move`] – Euler integration of velocity and acceleration.
//!   `Wait` steps run in this mode.
//! - [`ActionMode::Path`] – time-indexed playback of a [`PathTable`].
//! - [`ActionMode::Vanished`] – terminal; playback is frozen and
//!   [`ActionController::is_deletable`] reports `true`.
//! - [`ActionMode::Manual`] – the owner drives velocity/acceleration directly
//!   (player ships, straight-flying bullets); the script is ignored.
//!
//! # Generator
//!
//! A [`Generator`] is an optional closure run alongside the sequence. A
//! `Generate` step activates it (calling it once with a zero delta); from
//! then on it is called every update with the frame delta until the
//! controller vanishes. Generators keep their own timers and typically send
//! spawn requests (see [`crate::generators`]).
//!
//! # Example
//!
//! ```ignore
//! let mut controller = ActionController::manual()
//!     .with_generator(generators::single_shot(tx, None))
//!     .with_script(store.get("zako").unwrap(), 0);
//! controller.update(1.0 / 60.0, &mut body);
//! ```

use std::fmt;
use std::sync::Arc;

use bevy_ecs::prelude::Component;
use glam::{Vec2, Vec3};
use log::{debug, warn};
use smallvec::SmallVec;

use crate::action::curve::{CurveSettings, PathTable, Waypoint};
use crate::action::script::{ScriptSet, ScriptStep};

/// A step ends once its elapsed time is this close to its target, so frame
/// deltas that do not sum exactly still end it on the expected frame.
const STEP_TIME_EPSILON: f32 = 1e-4;

/// What a controller needs from the entity it drives.
pub trait ActionTarget {
    fn position(&self) -> Vec3;
    fn set_position(&mut self, position: Vec3);
    /// Rotation in degrees.
    fn rotation(&self) -> f32;
    fn set_rotation(&mut self, degrees: f32);
    /// Switch the visual animation sequence. Entities without animations
    /// can ignore it.
    fn set_animation(&mut self, _sequence: usize) {}
}

/// Plain-data [`ActionTarget`] for callers that keep entities outside the ECS.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StandaloneBody {
    pub position: Vec3,
    pub rotation: f32,
    pub animation: Option<usize>,
}

impl StandaloneBody {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            position: Vec3::new(x, y, 0.0),
            ..Self::default()
        }
    }
}

impl ActionTarget for StandaloneBody {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    fn rotation(&self) -> f32 {
        self.rotation
    }

    fn set_rotation(&mut self, degrees: f32) {
        self.rotation = degrees;
    }

    fn set_animation(&mut self, sequence: usize) {
        self.animation = Some(sequence);
    }
}

/// Secondary behaviour run next to the sequence.
///
/// Arguments: frame delta in seconds (zero on activation), the entity, and
/// the `speed` and `direction` parameters of the activating `Generate` step.
pub type Generator = Box<dyn FnMut(f32, &mut dyn ActionTarget, f32, f32) + Send + Sync>;

/// Convert a script angle and magnitude into a screen-space vector.
///
/// 0° points along +X, 90° points up the screen (−Y).
pub fn direction_vector(degrees: f32, magnitude: f32) -> Vec2 {
    let (sin, cos) = degrees.to_radians().sin_cos();
    Vec2::new(cos, -sin) * magnitude
}

/// Inverse of [`direction_vector`]: script angle of a screen-space vector.
pub fn heading_degrees(vector: Vec2) -> f32 {
    (-vector.y).atan2(vector.x).to_degrees()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionMode {
    Move,
    Path,
    Vanished,
    Manual,
}

/// Script interpreter for one entity.
#[derive(Component)]
pub struct ActionController {
    script: Option<Arc<ScriptSet>>,
    sequence: usize,
    step: usize,
    mode: ActionMode,
    elapsed: f32,
    target_time: f32,
    velocity: Vec2,
    acceleration: Vec2,
    path: PathTable,
    curve: CurveSettings,
    face_heading: bool,
    generator: Option<Generator>,
    generator_active: bool,
    spawn_speed: f32,
    spawn_direction: f32,
    // Init can run without an entity at hand (set_list); these wait for the next update
    pending_animation: Option<usize>,
    pending_activation: bool,
}

impl Default for ActionController {
    fn default() -> Self {
        Self::manual()
    }
}

impl ActionController {
    /// Controller playing `sequence` of `script`.
    pub fn new(script: Arc<ScriptSet>, sequence: usize) -> Self {
        Self::manual().with_script(script, sequence)
    }

    /// Unbound controller in [`ActionMode::Manual`].
    pub fn manual() -> Self {
        Self {
            script: None,
            sequence: 0,
            step: 0,
            mode: ActionMode::Manual,
            elapsed: 0.0,
            target_time: 0.0,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            path: PathTable::default(),
            curve: CurveSettings::default(),
            face_heading: false,
            generator: None,
            generator_active: false,
            spawn_speed: 0.0,
            spawn_direction: 0.0,
            pending_animation: None,
            pending_activation: false,
        }
    }

    /// Bind to a script (builder form of [`set_list`](Self::set_list)).
    ///
    /// Attach the generator and curve settings first: the first steps of the
    /// sequence run immediately.
    pub fn with_script(mut self, script: Arc<ScriptSet>, sequence: usize) -> Self {
        self.set_list(script, sequence);
        self
    }

    pub fn with_generator(mut self, generator: Generator) -> Self {
        self.set_generator(Some(generator));
        self
    }

    pub fn with_curve_settings(mut self, settings: CurveSettings) -> Self {
        self.curve = settings;
        self
    }

    /// Make the entity's rotation follow its direction of motion.
    pub fn with_face_heading(mut self, face_heading: bool) -> Self {
        self.face_heading = face_heading;
        self
    }

    // ==================== CONTROL ====================

    /// Bind to `script` and restart from step 0 of `sequence`.
    ///
    /// Leaves the controller untouched if the sequence does not exist.
    pub fn set_list(&mut self, script: Arc<ScriptSet>, sequence: usize) {
        if sequence >= script.len() {
            warn!(
                "Script '{}' has no sequence {} ({} available)",
                script.name(),
                sequence,
                script.len()
            );
            return;
        }
        self.script = Some(script);
        self.sequence = sequence;
        self.restart();
    }

    /// Switch to another sequence of the bound script and restart it.
    pub fn set_seq_index(&mut self, sequence: usize) {
        let Some(script) = &self.script else {
            return;
        };
        if sequence >= script.len() {
            warn!(
                "Script '{}' has no sequence {}, index unchanged",
                script.name(),
                sequence
            );
            return;
        }
        self.sequence = sequence;
        self.restart();
    }

    /// Take manual control and set the velocity.
    pub fn set_manual_move(&mut self, direction: f32, speed: f32) {
        self.enter_manual();
        self.velocity = direction_vector(direction, speed);
    }

    /// Take manual control and set the acceleration.
    pub fn set_manual_accel(&mut self, direction: f32, amount: f32) {
        self.enter_manual();
        self.acceleration = direction_vector(direction, amount);
    }

    /// Take manual control and set an informational duration.
    pub fn set_time(&mut self, duration: f32) {
        self.enter_manual();
        self.target_time = duration;
        self.elapsed = 0.0;
    }

    /// Attach, replace or (with `None`) remove the generator.
    pub fn set_generator(&mut self, generator: Option<Generator>) {
        if generator.is_none() {
            self.generator_active = false;
            self.pending_activation = false;
        }
        self.generator = generator;
    }

    pub fn set_face_heading(&mut self, face_heading: bool) {
        self.face_heading = face_heading;
    }

    fn enter_manual(&mut self) {
        self.mode = ActionMode::Manual;
        self.path.clear();
    }

    fn restart(&mut self) {
        self.step = 0;
        self.elapsed = 0.0;
        self.target_time = 0.0;
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
        self.path.clear();
        self.mode = ActionMode::Move;
        self.generator_active = false;
        self.pending_animation = None;
        self.pending_activation = false;
        self.enter_step(None);
    }

    // ==================== QUERIES ====================

    /// `true` once a `Vanish` step has been reached.
    pub fn is_deletable(&self) -> bool {
        self.mode == ActionMode::Vanished
    }

    /// `true` when the step index has run past the end of the sequence.
    pub fn is_idle(&self) -> bool {
        self.current_steps()
            .is_none_or(|steps| self.step >= steps.len())
    }

    pub fn mode(&self) -> ActionMode {
        self.mode
    }

    pub fn script(&self) -> Option<&Arc<ScriptSet>> {
        self.script.as_ref()
    }

    pub fn sequence_index(&self) -> usize {
        self.sequence
    }

    pub fn step_index(&self) -> usize {
        self.step
    }

    /// Seconds spent in the current step.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Duration of the current step.
    pub fn target_time(&self) -> f32 {
        self.target_time
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn acceleration(&self) -> Vec2 {
        self.acceleration
    }

    /// Waypoints of the current path step (empty outside paths).
    pub fn waypoints(&self) -> &[Waypoint] {
        self.path.waypoints()
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    pub fn is_generator_active(&self) -> bool {
        self.generator_active
    }

    /// `(speed, direction)` of the last `Generate` step.
    pub fn spawn_params(&self) -> (f32, f32) {
        (self.spawn_speed, self.spawn_direction)
    }

    fn current_steps(&self) -> Option<&[ScriptStep]> {
        self.script
            .as_ref()
            .and_then(|script| script.sequence(self.sequence))
            .map(|sequence| sequence.steps())
    }

    fn is_playing(&self) -> bool {
        self.mode != ActionMode::Vanished && self.current_steps().is_some()
    }

    // ==================== INTERPRETER ====================

    /// Run steps from the current index until one that takes time.
    fn enter_step(&mut self, mut target: Option<&mut dyn ActionTarget>) {
        let Some(script) = self.script.clone() else {
            return;
        };
        if self.mode == ActionMode::Vanished {
            return;
        }
        let Some(sequence) = script.sequence(self.sequence) else {
            return;
        };
        let steps = sequence.steps();

        while let Some(&step) = steps.get(self.step) {
            match step {
                ScriptStep::Move { direction, speed } => {
                    self.velocity = direction_vector(direction, speed);
                    self.mode = ActionMode::Move;
                }
                ScriptStep::Accelerate { direction, amount } => {
                    self.acceleration = direction_vector(direction, amount);
                    self.mode = ActionMode::Move;
                }
                ScriptStep::Wait { duration } => {
                    self.target_time = duration.max(0.0);
                    self.mode = ActionMode::Move;
                    debug!(
                        "'{}'[{}] step {}: wait {}s",
                        script.name(),
                        self.sequence,
                        self.step,
                        duration
                    );
                    return;
                }
                ScriptStep::Path {
                    duration,
                    count,
                    interpolation,
                } => {
                    let points: SmallVec<[Vec2; 8]> = steps[self.step + 1..]
                        .iter()
                        .take(count)
                        .map_while(|s| match *s {
                            ScriptStep::ControlPoint { x, y } => Some(Vec2::new(x, y)),
                            _ => None,
                        })
                        .collect();
                    if points.len() < count {
                        warn!(
                            "'{}'[{}] step {}: path expects {} control points, found {}",
                            script.name(),
                            self.sequence,
                            self.step,
                            count,
                            points.len()
                        );
                    }
                    self.path
                        .rebuild(&points, duration, interpolation, &self.curve);
                    self.target_time = duration.max(0.0);
                    self.mode = ActionMode::Path;
                    debug!(
                        "'{}'[{}] step {}: path over {} waypoints in {}s",
                        script.name(),
                        self.sequence,
                        self.step,
                        self.path.waypoints().len(),
                        duration
                    );
                    return;
                }
                ScriptStep::Vanish => {
                    self.mode = ActionMode::Vanished;
                    debug!(
                        "'{}'[{}] step {}: vanished",
                        script.name(),
                        self.sequence,
                        self.step
                    );
                    return;
                }
                ScriptStep::AnimationTrigger { sequence } => {
                    if let Ok(index) = usize::try_from(sequence) {
                        match target.as_deref_mut() {
                            Some(entity) => entity.set_animation(index),
                            None => self.pending_animation = Some(index),
                        }
                    }
                }
                ScriptStep::SpawnTrigger { speed, direction } => {
                    self.spawn_speed = speed;
                    self.spawn_direction = direction;
                    if let Some(generator) = self.generator.as_mut() {
                        self.generator_active = true;
                        match target.as_deref_mut() {
                            Some(entity) => generator(0.0, entity, speed, direction),
                            None => self.pending_activation = true,
                        }
                    }
                }
                ScriptStep::ControlPoint { .. } => {}
            }
            self.step += 1;
        }
    }

    /// Deliver work deferred by an Init that had no entity.
    fn flush_pending(&mut self, target: &mut dyn ActionTarget) {
        if let Some(sequence) = self.pending_animation.take() {
            target.set_animation(sequence);
        }
        if std::mem::take(&mut self.pending_activation) && self.generator_active {
            if let Some(generator) = self.generator.as_mut() {
                generator(0.0, &mut *target, self.spawn_speed, self.spawn_direction);
            }
        }
    }

    /// Advance by `delta` seconds, moving `target`.
    pub fn update(&mut self, delta: f32, target: &mut dyn ActionTarget) {
        self.flush_pending(&mut *target);

        if self.generator_active && self.mode != ActionMode::Vanished {
            if let Some(generator) = self.generator.as_mut() {
                generator(delta, &mut *target, self.spawn_speed, self.spawn_direction);
            }
        }

        if self.mode == ActionMode::Manual {
            self.integrate(delta, &mut *target);
            self.elapsed = (self.elapsed + delta).min(self.target_time.max(0.0));
            return;
        }

        if !self.is_playing() {
            return;
        }

        let slice = (self.target_time - self.elapsed).max(0.0).min(delta);
        self.apply_motion(self.elapsed, slice, &mut *target);
        self.elapsed += delta;

        while self.elapsed + STEP_TIME_EPSILON >= self.target_time
            && self.mode != ActionMode::Vanished
            && !self.is_idle()
        {
            self.elapsed -= self.target_time;
            self.target_time = 0.0;
            self.step += 1;
            self.enter_step(Some(&mut *target));

            if self.mode != ActionMode::Vanished {
                let overflow = self.elapsed.min(self.target_time).max(0.0);
                self.apply_motion(0.0, overflow, &mut *target);
            }
        }
    }

    /// Apply the current mode's motion for `dt` seconds starting `start`
    /// seconds into the step.
    fn apply_motion(&mut self, start: f32, dt: f32, target: &mut dyn ActionTarget) {
        match self.mode {
            ActionMode::Move => self.integrate(dt, target),
            ActionMode::Path => {
                let time = start + dt;
                if let Some(point) = self.path.sample(time) {
                    let position = target.position();
                    target.set_position(Vec3::new(point.x, point.y, position.z));
                }
                if self.face_heading {
                    if let Some(heading) = self.path.heading(time) {
                        target.set_rotation(heading_degrees(heading));
                    }
                }
            }
            ActionMode::Vanished | ActionMode::Manual => {}
        }
    }

    fn integrate(&mut self, dt: f32, target: &mut dyn ActionTarget) {
        if dt <= 0.0 {
            return;
        }
        let step = self.velocity * dt;
        target.set_position(target.position() + step.extend(0.0));
        self.velocity += self.acceleration * dt;
        if self.face_heading && self.velocity != Vec2::ZERO {
            target.set_rotation(heading_degrees(self.velocity));
        }
    }
}

impl fmt::Debug for ActionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionController")
            .field("script", &self.script.as_ref().map(|s| s.name()))
            .field("sequence", &self.sequence)
            .field("step", &self.step)
            .field("mode", &self.mode)
            .field("elapsed", &self.elapsed)
            .field("target_time", &self.target_time)
            .field("velocity", &self.velocity)
            .field("acceleration", &self.acceleration)
            .field("waypoints", &self.path.waypoints().len())
            .field("generator", &self.generator.is_some())
            .field("generator_active", &self.generator_active)
            .finish()
    }
}
