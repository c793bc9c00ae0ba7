use std::collections::VecDeque;

/// The state of the 16 keys `0x0..=0xF`, true meaning held down.
pub type Keypad = [bool; 16];

pub const NO_KEYS: Keypad = [false; 16];

/// Represents an input device that can report which keys are held.
/// The emulator copies the snapshot in before every instruction step.
pub trait EmulatorInput {
    fn keypad(&mut self) -> Keypad;
}

/// An input device that never provides any input
pub struct DummyInput;

impl EmulatorInput for DummyInput {
    fn keypad(&mut self) -> Keypad {
        NO_KEYS
    }
}

/// Replays a fixed list of snapshots, one per call, then keeps returning the last one.
pub struct ScriptedInput {
    script: VecDeque<Keypad>,
    last: Keypad,
}

impl ScriptedInput {
    pub fn new<T: IntoIterator<Item = Keypad>>(script: T) -> ScriptedInput {
        ScriptedInput {
            script: script.into_iter().collect(),
            last: NO_KEYS,
        }
    }

    /// A snapshot with only `key` held.
    pub fn only(key: u8) -> Keypad {
        let mut keypad = NO_KEYS;
        keypad[key as usize & 0xF] = true;
        keypad
    }
}

impl EmulatorInput for ScriptedInput {
    fn keypad(&mut self) -> Keypad {
        if let Some(next) = self.script.pop_front() {
            self.last = next;
        }
        self.last
    }
}
