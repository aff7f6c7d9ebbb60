use crate::action::Intent;
use cartonview_common::{InputConfig, MoveDirection};
use std::collections::HashSet;

/// Touchpad pixels that count as one scroll line.
pub const PIXELS_PER_LINE: f32 = 100.0;

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    P,
    F,
    Escape,
}

impl Key {
    /// Order in which held keys are turned into intents each frame.
    const SAMPLE_ORDER: [Key; 9] = [
        Key::Escape,
        Key::W,
        Key::S,
        Key::A,
        Key::D,
        Key::Q,
        Key::E,
        Key::P,
        Key::F,
    ];

    fn intent(self) -> Intent {
        match self {
            Key::W => Intent::Move(MoveDirection::Forward),
            Key::S => Intent::Move(MoveDirection::Backward),
            Key::A => Intent::Move(MoveDirection::Left),
            Key::D => Intent::Move(MoveDirection::Right),
            Key::Q => Intent::Move(MoveDirection::Down),
            Key::E => Intent::Move(MoveDirection::Up),
            Key::P => Intent::ToggleProjection,
            Key::F => Intent::ResetCamera,
            Key::Escape => Intent::Exit,
        }
    }

    fn is_toggle(self) -> bool {
        matches!(self, Key::P | Key::F)
    }
}

/// Collects window input between frames and hands it out as intents.
#[derive(Debug, Clone)]
pub struct InputMapper {
    sensitivity: f32,
    latch_toggles: bool,
    held: HashSet<Key>,
    /// Toggle keys pressed since the last drain (latched mode only).
    fresh: HashSet<Key>,
    last_cursor: Option<(f32, f32)>,
    pointer_queue: Vec<Intent>,
    scroll_queue: Vec<Intent>,
}

impl InputMapper {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            sensitivity: config.sensitivity,
            latch_toggles: config.latch_toggles,
            held: HashSet::new(),
            fresh: HashSet::new(),
            last_cursor: None,
            pointer_queue: Vec::new(),
            scroll_queue: Vec::new(),
        }
    }

    /// Record an absolute cursor position. Returns the yaw/pitch delta in
    /// degrees that was queued; the very first position only sets the
    /// baseline and yields zero.
    pub fn pointer_moved(&mut self, x: f32, y: f32) -> (f32, f32) {
        let Some((last_x, last_y)) = self.last_cursor.replace((x, y)) else {
            tracing::debug!("pointer baseline at ({x:.1}, {y:.1})");
            return (0.0, 0.0);
        };
        let yaw = (x - last_x) * self.sensitivity;
        // Screen y grows downward; moving up should pitch up.
        let pitch = (last_y - y) * self.sensitivity;
        if yaw != 0.0 || pitch != 0.0 {
            self.pointer_queue.push(Intent::Look { yaw, pitch });
        }
        (yaw, pitch)
    }

    /// Record a vertical scroll offset in lines.
    pub fn scrolled(&mut self, lines: f32) {
        if lines != 0.0 {
            self.scroll_queue.push(Intent::AdjustSpeed(lines));
        }
    }

    /// Record a vertical touchpad scroll in pixels.
    pub fn scrolled_pixels(&mut self, pixels: f32) {
        self.scrolled(pixels / PIXELS_PER_LINE);
    }

    pub fn key_pressed(&mut self, key: Key) {
        if self.held.insert(key) && key.is_toggle() {
            self.fresh.insert(key);
        }
    }

    pub fn key_released(&mut self, key: Key) {
        self.held.remove(&key);
    }

    /// Forget every held key, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        self.held.clear();
        self.fresh.clear();
    }

    /// Hand out this frame's intents: queued pointer looks, then queued
    /// scrolls, then one intent per held key. Latched toggles fire once for
    /// every press since the last drain, even if already released.
    pub fn drain_intents(&mut self) -> Vec<Intent> {
        let mut intents = Vec::with_capacity(
            self.pointer_queue.len() + self.scroll_queue.len() + self.held.len(),
        );
        intents.append(&mut self.pointer_queue);
        intents.append(&mut self.scroll_queue);

        for key in Key::SAMPLE_ORDER {
            let fire = if self.latch_toggles && key.is_toggle() {
                self.fresh.contains(&key)
            } else {
                self.held.contains(&key)
            };
            if fire {
                intents.push(key.intent());
            }
        }
        self.fresh.clear();
        intents
    }
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new(&InputConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn first_pointer_event_is_suppressed() {
        let mut m = InputMapper::default();
        assert_eq!(m.pointer_moved(1234.0, -987.0), (0.0, 0.0));
        assert!(m.drain_intents().is_empty());
    }

    #[test]
    fn pointer_delta_scaled_and_pitch_inverted() {
        let mut m = InputMapper::default();
        m.pointer_moved(100.0, 100.0);
        let (yaw, pitch) = m.pointer_moved(110.0, 80.0);
        assert!(approx(yaw, 1.0));
        assert!(approx(pitch, 2.0));
        assert_eq!(m.drain_intents(), vec![Intent::Look { yaw, pitch }]);
    }

    #[test]
    fn stationary_pointer_queues_nothing() {
        let mut m = InputMapper::default();
        m.pointer_moved(5.0, 5.0);
        m.pointer_moved(5.0, 5.0);
        assert!(m.drain_intents().is_empty());
    }

    #[test]
    fn pixel_scroll_converted_to_lines() {
        let mut m = InputMapper::default();
        m.scrolled_pixels(250.0);
        assert_eq!(m.drain_intents(), vec![Intent::AdjustSpeed(2.5)]);
    }

    #[test]
    fn drain_orders_pointer_scroll_keys() {
        let mut m = InputMapper::default();
        m.key_pressed(Key::W);
        m.scrolled(1.0);
        m.pointer_moved(0.0, 0.0);
        m.pointer_moved(10.0, 0.0);

        let intents = m.drain_intents();
        assert_eq!(intents.len(), 3);
        assert!(matches!(intents[0], Intent::Look { .. }));
        assert_eq!(intents[1], Intent::AdjustSpeed(1.0));
        assert_eq!(intents[2], Intent::Move(MoveDirection::Forward));
    }

    #[test]
    fn queues_empty_after_drain_but_keys_persist() {
        let mut m = InputMapper::default();
        m.key_pressed(Key::D);
        m.scrolled(-1.0);
        assert_eq!(m.drain_intents().len(), 2);
        assert_eq!(
            m.drain_intents(),
            vec![Intent::Move(MoveDirection::Right)]
        );
        m.key_released(Key::D);
        assert!(m.drain_intents().is_empty());
    }

    #[test]
    fn held_toggle_repeats_every_frame_by_default() {
        let mut m = InputMapper::default();
        m.key_pressed(Key::P);
        for _ in 0..3 {
            assert_eq!(m.drain_intents(), vec![Intent::ToggleProjection]);
        }
    }

    #[test]
    fn latched_toggle_fires_once_per_press() {
        let mut m = InputMapper::new(&InputConfig {
            latch_toggles: true,
            ..InputConfig::default()
        });
        m.key_pressed(Key::F);
        m.key_pressed(Key::F); // OS key repeat
        assert_eq!(m.drain_intents(), vec![Intent::ResetCamera]);
        assert!(m.drain_intents().is_empty());

        m.key_released(Key::F);
        m.key_pressed(Key::F);
        assert_eq!(m.drain_intents(), vec![Intent::ResetCamera]);
    }

    #[test]
    fn latching_leaves_movement_continuous() {
        let mut m = InputMapper::new(&InputConfig {
            latch_toggles: true,
            ..InputConfig::default()
        });
        m.key_pressed(Key::E);
        assert_eq!(m.drain_intents(), vec![Intent::Move(MoveDirection::Up)]);
        assert_eq!(m.drain_intents(), vec![Intent::Move(MoveDirection::Up)]);
    }

    #[test]
    fn escape_sampled_first() {
        let mut m = InputMapper::default();
        m.key_pressed(Key::F);
        m.key_pressed(Key::Escape);
        m.key_pressed(Key::A);
        assert_eq!(
            m.drain_intents(),
            vec![
                Intent::Exit,
                Intent::Move(MoveDirection::Left),
                Intent::ResetCamera
            ]
        );
    }

    #[test]
    fn release_all_clears_held_keys() {
        let mut m = InputMapper::default();
        m.key_pressed(Key::W);
        m.key_pressed(Key::Q);
        m.release_all();
        assert!(m.drain_intents().is_empty());
    }

    #[test]
    fn latched_tap_within_one_frame_still_fires() {
        let mut m = InputMapper::new(&InputConfig {
            latch_toggles: true,
            ..InputConfig::default()
        });
        m.key_pressed(Key::P);
        m.key_released(Key::P);
        assert_eq!(m.drain_intents(), vec![Intent::ToggleProjection]);
        assert!(m.drain_intents().is_empty());
    }

    #[test]
    fn unlatched_tap_within_one_frame_is_missed() {
        let mut m = InputMapper::default();
        m.key_pressed(Key::F);
        m.key_released(Key::F);
        assert!(m.drain_intents().is_empty());
    }
}
