/*!

A CHIP-8 virtual machine as specified at https://en.wikipedia.org/wiki/CHIP-8.

# Crossterm Frontend

If you want to try the emulator on some programs, there is a ready-to-use implementation
you can run by using `cargo run --release --bin crossterm_frontend -- <program>`.
The keys 1-4, q-r, a-f and z-v form the CHIP-8 keypad and Esc quits.
`cargo run --release -- --duration 2000 <program>` runs a program headless
and prints the screen it ends up with.

# Library

The main way of running a program is to load instructions as bytes and step through them.

```rust
use chip8_vm::emulator::Emulator;

let mut emulator = Emulator::new();

// Load a program at address 0x200.
let program = [
    0x60, 0x07, // V0 = 7
    0xF0, 0x29, // I = glyph for V0
    0xD0, 0x05, // draw it at (V0, V0)
];
emulator.load(&program)?;
for _ in 0..3 {
    emulator.step()?;
}
assert_eq!(emulator.machine().index(), 35);
assert!(emulator.take_frame().is_some());
# Ok::<(), chip8_vm::Chip8Error>(())
```

Alternatively, you can experiment by executing instructions manually.

```rust
use chip8_vm::emulator::Emulator;
use chip8_vm::emulator::instruction::{Instruction, Reg, Const, Addr};

let mut emulator = Emulator::new();

// Execute instructions manually
emulator.execute_single(Instruction::ClearScreen)?;

// Or many sequentially
emulator.execute_many(&[
    Instruction::Goto(Addr(0x250)),
    Instruction::SetRegToConst(Reg(0xA), Const(35)),
    Instruction::SetRegToReg(Reg(0xB), Reg(0xA))
])?;
assert_eq!(emulator.machine().register(Reg(0xB)), 35);
# Ok::<(), chip8_vm::Chip8Error>(())
```

## Running in real time

Instructions run at a configurable rate while the delay and sound timers count down
at 60 Hz on their own. `Runner` schedules both and talks to the outside world through
`EmulatorInput` (a keypad snapshot) and `EmulatorOutput` (a framebuffer snapshot and a tone).
Take a look at `src/emulator/input.rs` and `src/emulator/output.rs` to see how to implement them.

```rust
use std::time::Duration;
use chip8_vm::emulator::{Emulator, Runner};
use chip8_vm::emulator::{input::DummyInput, output::DummyOutput};

let mut emulator = Emulator::new();
emulator.load(&[0x12, 0x00])?; // Jump to 0x200 forever

let mut runner = Runner::new(emulator, DummyInput, DummyOutput::new(), 700);
runner.advance(Duration::from_millis(100))?;
# Ok::<(), chip8_vm::Chip8Error>(())
```
*/

pub mod cli;
pub mod emulator;
pub mod error;
pub mod util;

pub use error::{Chip8Error, Result};
