//! Scripted player for headless runs.
//!
//! Reads the latest snapshot and answers with raw device events, the same
//! events a mouse and keyboard would produce, so the session's
//! `InputAdapter` cannot tell it from a person.

use glam::Vec3;

use dunefire_core::config::GameConfig;
use dunefire_core::control::{Key, MouseButton, RawInput};
use dunefire_core::enums::{EnemyMode, ObjectivePhase, SessionStatus};
use dunefire_core::state::{EnemyView, SessionSnapshot};
use dunefire_core::types::yaw_toward;
use dunefire_enemy_ai::profiles::get_profile;
use dunefire_sim::input::DEFAULT_MOUSE_SENSITIVITY;

/// Back away from anything closer than this.
const KEEP_AWAY: f32 = 4.0;

/// Ignore aim corrections smaller than this, in radians.
const AIM_DEADZONE: f32 = 1e-5;

#[derive(Debug, Clone)]
pub struct Autopilot {
    /// Radians per mouse pixel; must match the adapter's.
    sensitivity: f32,
    eye_height: f32,
    range: f32,
    captured: bool,
    /// Keys currently down, in press order.
    held: Vec<Key>,
}

impl Autopilot {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            sensitivity: DEFAULT_MOUSE_SENSITIVITY,
            eye_height: config.player.eye_height,
            range: config.weapon.range,
            captured: false,
            held: Vec::new(),
        }
    }

    pub fn with_sensitivity(mut self, radians_per_pixel: f32) -> Self {
        self.sensitivity = radians_per_pixel;
        self
    }

    /// Forget held keys and capture, e.g. after the session restarts.
    pub fn reset(&mut self) {
        self.captured = false;
        self.held.clear();
    }

    /// Device events for the next frame.
    pub fn steer(&mut self, snapshot: &SessionSnapshot) -> Vec<RawInput> {
        let mut out = Vec::new();
        if snapshot.status != SessionStatus::Running || !snapshot.player.alive {
            self.release_all(&mut out);
            return out;
        }
        if !self.captured {
            self.captured = true;
            out.push(RawInput::PointerCapture { active: true });
        }

        let eye = snapshot.player.position + Vec3::Y * self.eye_height;
        let mut forward = false;
        let mut backward = false;

        if let Some(enemy) = nearest_enemy(snapshot, eye) {
            let profile = get_profile(enemy.archetype);
            let center = enemy.position + Vec3::Y * (profile.body_height - profile.hit_radius);
            self.look_at(snapshot, eye, center, &mut out);

            let distance = center.distance(eye);
            backward = distance < KEEP_AWAY;
            let weapon = &snapshot.weapon;
            if distance <= self.range && !weapon.reloading && weapon.ammo > 0 {
                out.push(RawInput::MouseDown {
                    button: MouseButton::Primary,
                });
                out.push(RawInput::MouseUp {
                    button: MouseButton::Primary,
                });
            }
        } else if snapshot.phase == ObjectivePhase::BonusAccessible {
            if let Some(item) = snapshot.bonus_item {
                self.look_at(snapshot, eye, item.with_y(eye.y), &mut out);
                forward = true;
            }
        }

        let weapon = &snapshot.weapon;
        let reload = weapon.ammo == 0 && weapon.reserve > 0 && !weapon.reloading;
        self.hold(Key::Forward, forward, &mut out);
        self.hold(Key::Backward, backward, &mut out);
        self.hold(Key::Reload, reload, &mut out);
        out
    }

    fn look_at(&self, snapshot: &SessionSnapshot, eye: Vec3, target: Vec3, out: &mut Vec<RawInput>) {
        let offset = target - eye;
        let yaw = yaw_toward(eye, target);
        let pitch = offset.y.atan2(offset.with_y(0.0).length());
        // The player turns by minus the look delta.
        let d_yaw = wrap_angle(snapshot.player.yaw - yaw);
        let d_pitch = snapshot.player.pitch - pitch;
        if d_yaw.abs() > AIM_DEADZONE || d_pitch.abs() > AIM_DEADZONE {
            out.push(RawInput::MouseMove {
                dx: d_yaw / self.sensitivity,
                dy: d_pitch / self.sensitivity,
            });
        }
    }

    fn hold(&mut self, key: Key, down: bool, out: &mut Vec<RawInput>) {
        let is_held = self.held.contains(&key);
        if down && !is_held {
            self.held.push(key);
            out.push(RawInput::KeyDown { key });
        } else if !down && is_held {
            self.held.retain(|k| *k != key);
            out.push(RawInput::KeyUp { key });
        }
    }

    fn release_all(&mut self, out: &mut Vec<RawInput>) {
        out.extend(
            std::mem::take(&mut self.held)
                .into_iter()
                .map(|key| RawInput::KeyUp { key }),
        );
    }
}

fn nearest_enemy(snapshot: &SessionSnapshot, eye: Vec3) -> Option<&EnemyView> {
    snapshot
        .enemies
        .iter()
        .filter(|e| e.mode != EnemyMode::Dead)
        .min_by(|a, b| {
            a.position
                .distance_squared(eye)
                .total_cmp(&b.position.distance_squared(eye))
        })
}

/// Map an angle into (-PI, PI].
fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}
