//! Stock generators.
//!
//! Factories for the [`Generator`] closures most scripts need. All of them
//! send [`SpawnCmd`]s through a channel sender (usually obtained from
//! [`SpawnBridge::sender`](crate::resources::spawnbridge::SpawnBridge::sender))
//! and take their speed and direction from the `Generate` step that
//! activates them.
//!
//! A generator is called with a zero delta exactly when a `Generate` step
//! activates it, and with the frame delta on every later update. Generators
//! here treat the zero-delta call as "fire now and restart the timer".
//!
//! # Patterns
//!
//! - [`single_shot`] – one projectile per activation
//! - [`stream`] – one projectile per activation, then one every `interval`
//! - [`burst`] – volleys of several projectiles, either an aimed fan or a
//!   radial ring, with optional random jitter
//! - [`scripted_child`] – spawn an entity running another script

use std::sync::Arc;

use crossbeam_channel::Sender;
use fastrand::Rng;
use glam::Vec3;
use log::debug;

use crate::action::controller::{ActionTarget, Generator};
use crate::action::script::ScriptSet;
use crate::events::spawn::SpawnCmd;

/// Shape and cadence of a [`burst`] generator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BurstPattern {
    /// Seconds between volleys; non-positive fires only on activation.
    pub interval: f32,
    /// Projectiles per volley.
    pub count: usize,
    /// Total fan width in degrees. `360` or more spreads the volley evenly
    /// around a full circle.
    pub spread: f32,
    /// Maximum random deviation added to every shot, in degrees.
    pub jitter: f32,
    /// Lifetime of each projectile.
    pub ttl: Option<f32>,
    /// Fixed seed for the jitter, for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for BurstPattern {
    fn default() -> Self {
        Self {
            interval: 0.0,
            count: 1,
            spread: 0.0,
            jitter: 0.0,
            ttl: None,
            seed: None,
        }
    }
}

impl BurstPattern {
    /// Directions of one volley around `direction`, before jitter.
    pub fn angles(&self, direction: f32) -> impl Iterator<Item = f32> + use<> {
        let count = self.count;
        let spread = self.spread;
        (0..count).map(move |i| {
            if spread >= 360.0 {
                direction + i as f32 * 360.0 / count as f32
            } else if count <= 1 {
                direction
            } else {
                direction - spread / 2.0 + i as f32 * spread / (count - 1) as f32
            }
        })
    }
}

fn send(tx: &Sender<SpawnCmd>, cmd: SpawnCmd) {
    if let Err(e) = tx.send(cmd) {
        debug!("Spawn request dropped: {}", e);
    }
}

fn projectile(position: Vec3, direction: f32, speed: f32, ttl: Option<f32>) -> SpawnCmd {
    SpawnCmd::Projectile {
        position,
        direction,
        speed,
        ttl,
    }
}

/// Fire one projectile from the entity's position per activation.
pub fn single_shot(tx: Sender<SpawnCmd>, ttl: Option<f32>) -> Generator {
    Box::new(move |delta: f32, target: &mut dyn ActionTarget, speed: f32, direction: f32| {
        if delta == 0.0 {
            send(&tx, projectile(target.position(), direction, speed, ttl));
        }
    })
}

/// Fire on activation and then every `interval` seconds.
pub fn stream(tx: Sender<SpawnCmd>, interval: f32, ttl: Option<f32>) -> Generator {
    burst(
        tx,
        BurstPattern {
            interval,
            ttl,
            ..BurstPattern::default()
        },
    )
}

/// Fire volleys shaped by `pattern`.
pub fn burst(tx: Sender<SpawnCmd>, pattern: BurstPattern) -> Generator {
    let mut rng = pattern.seed.map_or_else(Rng::new, Rng::with_seed);
    let mut since_volley = 0.0_f32;

    Box::new(move |delta: f32, target: &mut dyn ActionTarget, speed: f32, direction: f32| {
        let mut volleys = 0;
        if delta == 0.0 {
            since_volley = 0.0;
            volleys = 1;
        } else if pattern.interval > 0.0 {
            since_volley += delta;
            // catch-up: several volleys if the frame was long
            while since_volley >= pattern.interval {
                since_volley -= pattern.interval;
                volleys += 1;
            }
        }

        let origin = target.position();
        for _ in 0..volleys {
            for angle in pattern.angles(direction) {
                let angle = if pattern.jitter > 0.0 {
                    angle + (rng.f32() * 2.0 - 1.0) * pattern.jitter
                } else {
                    angle
                };
                send(&tx, projectile(origin, angle, speed, pattern.ttl));
            }
        }
    })
}

/// Spawn an entity running `sequence` of `script` per activation.
pub fn scripted_child(tx: Sender<SpawnCmd>, script: Arc<ScriptSet>, sequence: usize) -> Generator {
    Box::new(move |delta: f32, target: &mut dyn ActionTarget, _speed: f32, _direction: f32| {
        if delta == 0.0 {
            send(
                &tx,
                SpawnCmd::Scripted {
                    position: target.position(),
                    script: Arc::clone(&script),
                    sequence,
                },
            );
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::controller::StandaloneBody;
    use crossbeam_channel::{Receiver, unbounded};

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn channel() -> (Sender<SpawnCmd>, Receiver<SpawnCmd>) {
        unbounded()
    }

    fn directions(rx: &Receiver<SpawnCmd>) -> Vec<f32> {
        rx.try_iter()
            .filter_map(|cmd| match cmd {
                SpawnCmd::Projectile { direction, .. } => Some(direction),
                SpawnCmd::Scripted { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_single_shot_fires_on_activation_only() {
        let (tx, rx) = channel();
        let mut generator = single_shot(tx, Some(2.0));
        let mut body = StandaloneBody::at(10.0, 20.0);

        generator(0.0, &mut body, 150.0, 270.0);
        generator(0.016, &mut body, 150.0, 270.0);

        let cmds: Vec<_> = rx.try_iter().collect();
        assert_eq!(cmds.len(), 1);
        match &cmds[0] {
            SpawnCmd::Projectile {
                position,
                direction,
                speed,
                ttl,
            } => {
                assert_eq!(*position, Vec3::new(10.0, 20.0, 0.0));
                assert_eq!(*direction, 270.0);
                assert_eq!(*speed, 150.0);
                assert_eq!(*ttl, Some(2.0));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_stream_interval_with_catch_up() {
        let (tx, rx) = channel();
        let mut generator = stream(tx, 0.25, None);
        let mut body = StandaloneBody::default();

        generator(0.0, &mut body, 100.0, 0.0);
        assert_eq!(rx.try_iter().count(), 1);
        generator(0.125, &mut body, 100.0, 0.0);
        assert_eq!(rx.try_iter().count(), 0);
        generator(0.125, &mut body, 100.0, 0.0);
        assert_eq!(rx.try_iter().count(), 1);
        generator(0.75, &mut body, 100.0, 0.0);
        assert_eq!(rx.try_iter().count(), 3);
    }

    #[test]
    fn test_reactivation_restarts_timer() {
        let (tx, rx) = channel();
        let mut generator = stream(tx, 0.5, None);
        let mut body = StandaloneBody::default();

        generator(0.0, &mut body, 1.0, 0.0);
        generator(0.375, &mut body, 1.0, 0.0);
        generator(0.0, &mut body, 1.0, 0.0);
        generator(0.375, &mut body, 1.0, 0.0);
        assert_eq!(rx.try_iter().count(), 2);
    }

    #[test]
    fn test_fan_angles() {
        let pattern = BurstPattern {
            count: 5,
            spread: 60.0,
            ..BurstPattern::default()
        };
        let angles: Vec<f32> = pattern.angles(270.0).collect();
        let expected = [240.0, 255.0, 270.0, 285.0, 300.0];
        assert_eq!(angles.len(), expected.len());
        for (a, e) in angles.iter().zip(expected) {
            assert!(approx_eq(*a, e), "{a} vs {e}");
        }
    }

    #[test]
    fn test_radial_angles() {
        let pattern = BurstPattern {
            count: 4,
            spread: 360.0,
            ..BurstPattern::default()
        };
        let angles: Vec<f32> = pattern.angles(10.0).collect();
        assert_eq!(angles, vec![10.0, 100.0, 190.0, 280.0]);
    }

    #[test]
    fn test_single_shot_pattern_ignores_spread() {
        let pattern = BurstPattern {
            count: 1,
            spread: 90.0,
            ..BurstPattern::default()
        };
        assert_eq!(pattern.angles(45.0).collect::<Vec<_>>(), vec![45.0]);
    }

    #[test]
    fn test_burst_jitter_stays_in_range() {
        let (tx, rx) = channel();
        let mut generator = burst(
            tx,
            BurstPattern {
                interval: 0.1,
                count: 8,
                spread: 360.0,
                jitter: 5.0,
                ttl: Some(1.0),
                seed: Some(7),
            },
        );
        let mut body = StandaloneBody::default();
        generator(0.0, &mut body, 50.0, 0.0);

        let shots = directions(&rx);
        assert_eq!(shots.len(), 8);
        for (shot, base) in shots.iter().zip([0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0]) {
            assert!((shot - base).abs() <= 5.0 + EPSILON);
        }
    }

    #[test]
    fn test_seeded_bursts_are_reproducible() {
        let pattern = BurstPattern {
            count: 3,
            spread: 30.0,
            jitter: 10.0,
            seed: Some(42),
            ..BurstPattern::default()
        };
        let mut body = StandaloneBody::default();

        let (tx_a, rx_a) = channel();
        let mut a = burst(tx_a, pattern);
        a(0.0, &mut body, 1.0, 90.0);

        let (tx_b, rx_b) = channel();
        let mut b = burst(tx_b, pattern);
        b(0.0, &mut body, 1.0, 90.0);

        assert_eq!(directions(&rx_a), directions(&rx_b));
    }

    #[test]
    fn test_scripted_child_shares_script() {
        let script = ScriptSet::new("child", Vec::new()).into_shared();
        let (tx, rx) = channel();
        let mut generator = scripted_child(tx, Arc::clone(&script), 3);
        let mut body = StandaloneBody::at(1.0, 2.0);

        generator(0.0, &mut body, 0.0, 0.0);
        generator(0.5, &mut body, 0.0, 0.0);

        let cmds: Vec<_> = rx.try_iter().collect();
        assert_eq!(cmds.len(), 1);
        match &cmds[0] {
            SpawnCmd::Scripted {
                position,
                script: child,
                sequence,
            } => {
                assert_eq!(*position, Vec3::new(1.0, 2.0, 0.0));
                assert!(Arc::ptr_eq(child, &script));
                assert_eq!(*sequence, 3);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_closed_channel_is_harmless() {
        let (tx, rx) = channel();
        drop(rx);
        let mut generator = single_shot(tx, None);
        let mut body = StandaloneBody::default();
        generator(0.0, &mut body, 1.0, 0.0);
    }
}
