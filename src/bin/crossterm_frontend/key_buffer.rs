use chip8_vm::emulator::input::Keypad;
use std::{
    sync::Mutex,
    time::{Duration, Instant},
};

/// A thread-safe record of when each CHIP-8 key was last pressed.
/// Terminals report presses but not releases, so a key counts
/// as held until `timeout` has passed since its last press.
/// Wrap it in an `std::sync::Arc` and you are good to go.
pub struct KeyBuffer {
    timeout: Duration,
    pressed_at: Mutex<[Option<Instant>; 16]>,
}

impl KeyBuffer {
    pub fn new(timeout: Duration) -> KeyBuffer {
        KeyBuffer {
            timeout,
            pressed_at: Mutex::new([None; 16]),
        }
    }

    /// Record a press of `key`.
    pub fn push(&self, key: u8) {
        self.push_at(key, Instant::now());
    }

    fn push_at(&self, key: u8, when: Instant) {
        if let Ok(mut pressed_at) = self.pressed_at.lock() {
            pressed_at[key as usize & 0xF] = Some(when);
        }
    }

    /// The keys pressed recently enough to count as held.
    pub fn snapshot(&self) -> Keypad {
        let mut keypad = [false; 16];
        if let Ok(pressed_at) = self.pressed_at.lock() {
            for (held, pressed) in keypad.iter_mut().zip(pressed_at.iter()) {
                *held = pressed.map_or(false, |at| at.elapsed() < self.timeout);
            }
        }
        keypad
    }
}
