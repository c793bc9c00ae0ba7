use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use super::emulator::Emulator;
use super::input::EmulatorInput;
use super::output::EmulatorOutput;
use super::random::Entropy;
use super::timing::{Clock, Tick};
use crate::error::{Chip8Error, Result};

/// Drives an emulator in real time.
///
/// Instruction steps and 60 Hz timer ticks are scheduled independently by a
/// `Clock`. Before each step the keypad snapshot is copied in from the input;
/// on each timer tick a changed framebuffer is handed to the output. The tone
/// is on whenever the sound timer is nonzero, so it is checked after every
/// step as well as after every timer tick.
///
/// The first failing instruction halts the instruction clock for good. Timer
/// ticks, tone and frames keep going.
pub struct Runner<I: EmulatorInput, O: EmulatorOutput, R: Entropy> {
    emulator: Emulator<R>,
    input: I,
    output: O,
    clock: Clock,
    tone: bool,
    halted: Option<Chip8Error>,
}

impl<I: EmulatorInput, O: EmulatorOutput, R: Entropy> Runner<I, O, R> {
    pub fn new(emulator: Emulator<R>, input: I, output: O, instruction_hz: u32) -> Runner<I, O, R> {
        Runner {
            emulator,
            input,
            output,
            clock: Clock::new(instruction_hz),
            tone: false,
            halted: None,
        }
    }

    pub fn emulator(&self) -> &Emulator<R> {
        &self.emulator
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// The error that stopped the instruction clock, if any.
    pub fn halted(&self) -> Option<&Chip8Error> {
        self.halted.as_ref()
    }

    /// Process every tick due up to `now`, measured from the start of the session.
    /// Once an instruction has failed, its error is returned from this and every
    /// later call, while the timer ticks due in the window are still processed.
    pub fn advance(&mut self, now: Duration) -> Result<()> {
        while let Some(tick) = self.clock.next_due(now) {
            match tick {
                Tick::Instruction => self.instruction_tick(),
                Tick::Timer => self.timer_tick(),
            }
        }
        match &self.halted {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn instruction_tick(&mut self) {
        if self.halted.is_some() {
            return;
        }
        self.emulator.set_keypad(self.input.keypad());
        match self.emulator.step() {
            Ok(_) => self.update_tone(self.emulator.sound_active()),
            Err(error) => {
                log::error!(
                    "Stopped at {:#06x}: {}",
                    self.emulator.machine().program_counter(),
                    error
                );
                self.halted = Some(error);
            }
        }
    }

    fn timer_tick(&mut self) {
        let tone = self.emulator.tick_timers();
        self.update_tone(tone);
        if let Some(frame) = self.emulator.take_frame() {
            self.output.draw(&frame);
        }
    }

    fn update_tone(&mut self, on: bool) {
        if on != self.tone {
            self.tone = on;
            self.output.set_tone(on);
        }
    }

    /// Run in real time for as long as `keep_running` returns true.
    /// It is asked between ticks, so no instruction is ever cut short.
    pub fn run_while<F: FnMut() -> bool>(&mut self, mut keep_running: F) -> Result<()> {
        let start = Instant::now();
        while keep_running() {
            let now = start.elapsed();
            self.advance(now)?;
            let deadline = self.clock.next_deadline();
            if deadline > now {
                thread::sleep(deadline - now);
            }
        }
        Ok(())
    }

    /// Run in real time until `stop` is set.
    pub fn run(&mut self, stop: &AtomicBool) -> Result<()> {
        self.run_while(|| !stop.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::input::{DummyInput, ScriptedInput};
    use crate::emulator::instruction::Reg;
    use crate::emulator::emulator::Status;
    use crate::emulator::output::DummyOutput;
    use crate::emulator::quirks::Quirks;
    use crate::emulator::random::FixedEntropy;
    use pretty_assertions::assert_eq;

    fn runner<I: EmulatorInput>(program: &[u8], input: I, hz: u32) -> Runner<I, DummyOutput, FixedEntropy> {
        let mut emulator = Emulator::with_entropy(Quirks::default(), FixedEntropy::new(&[]));
        emulator.load(program).unwrap();
        Runner::new(emulator, input, DummyOutput::new(), hz)
    }

    // 0x200: V0 = 120, delay = V0, loop forever
    const COUNT_DOWN: [u8; 6] = [0x60, 0x78, 0xF0, 0x15, 0x12, 0x04];

    #[test]
    fn timers_tick_at_sixty_hz_regardless_of_instruction_rate() {
        for hz in &[100, 700, 2000] {
            let mut runner = runner(&COUNT_DOWN, DummyInput, *hz);
            runner.advance(Duration::from_millis(1000)).unwrap();
            // The delay timer was set by the second instruction, well before the first timer tick
            assert_eq!(runner.emulator().machine().delay_timer(), 60);
        }
    }

    #[test]
    fn frames_are_presented_on_timer_ticks() {
        // Draw glyph 0, then loop
        let mut runner = runner(&[0xD0, 0x05, 0x12, 0x02], DummyInput, 700);
        runner.advance(Duration::from_millis(10)).unwrap();
        assert_eq!(runner.output().frames_drawn(), 0);
        runner.advance(Duration::from_millis(20)).unwrap();
        assert_eq!(runner.output().frames_drawn(), 1);
        runner.advance(Duration::from_millis(200)).unwrap();
        assert_eq!(runner.output().frames_drawn(), 1);
        assert_eq!(runner.output().last_frame().unwrap().lit_pixels(), 14);
    }

    #[test]
    fn tone_follows_sound_timer() {
        // V0 = 2, sound = V0, loop
        let mut runner = runner(&[0x60, 0x02, 0xF0, 0x18, 0x12, 0x04], DummyInput, 700);
        runner.advance(Duration::from_millis(20)).unwrap();
        assert!(runner.output().tone());
        runner.advance(Duration::from_millis(40)).unwrap();
        assert!(!runner.output().tone());
    }

    #[test]
    fn a_one_tick_sound_is_still_heard() {
        // V0 = 1, sound = V0, loop
        let mut runner = runner(&[0x60, 0x01, 0xF0, 0x18, 0x12, 0x04], DummyInput, 700);
        runner.advance(Duration::from_millis(5)).unwrap();
        assert_eq!(runner.output().tone_changes(), &[true]);
        runner.advance(Duration::from_millis(100)).unwrap();
        assert_eq!(runner.output().tone_changes(), &[true, false]);
    }

    #[test]
    fn step_errors_stop_the_runner() {
        let mut runner = runner(&[0x00, 0xEE], DummyInput, 700);
        assert_eq!(runner.advance(Duration::from_millis(100)), Err(Chip8Error::StackUnderflow));
        assert_eq!(runner.emulator().machine().program_counter(), 0x200);
        assert_eq!(runner.halted(), Some(&Chip8Error::StackUnderflow));
    }

    #[test]
    fn timers_keep_running_after_a_step_error() {
        // V0 = 60, delay = V0, return with nothing on the stack
        let mut runner = runner(&[0x60, 0x3C, 0xF0, 0x15, 0x00, 0xEE], DummyInput, 700);
        assert_eq!(runner.advance(Duration::from_millis(500)), Err(Chip8Error::StackUnderflow));
        assert_eq!(runner.emulator().machine().delay_timer(), 30);
        assert_eq!(runner.advance(Duration::from_millis(1000)), Err(Chip8Error::StackUnderflow));
        assert_eq!(runner.emulator().machine().delay_timer(), 0);
        assert_eq!(runner.emulator().machine().program_counter(), 0x204);
    }

    #[test]
    fn frames_are_still_presented_after_a_step_error() {
        // Draw glyph 0, then an unknown opcode
        let mut runner = runner(&[0xD0, 0x05, 0xFF, 0xFF], DummyInput, 700);
        assert_eq!(runner.advance(Duration::from_millis(20)), Err(Chip8Error::UnknownOpcode(0xFFFF)));
        assert_eq!(runner.output().frames_drawn(), 1);
        assert_eq!(runner.output().last_frame().unwrap().lit_pixels(), 14);
    }

    #[test]
    fn key_wait_resumes_from_input() {
        let mut keys = vec![[false; 16]; 5];
        keys.push(ScriptedInput::only(9));
        // Wait for a key into V2, then loop
        let mut runner = runner(&[0xF2, 0x0A, 0x12, 0x02], ScriptedInput::new(keys), 1000);
        runner.advance(Duration::from_millis(3)).unwrap();
        assert_eq!(runner.emulator().status(), Status::WaitingForKey(Reg(2)));
        runner.advance(Duration::from_millis(10)).unwrap();
        assert_eq!(runner.emulator().status(), Status::Running);
        assert_eq!(runner.emulator().machine().register(Reg(2)), 9);
    }

    #[test]
    fn run_stops_when_asked() {
        let mut runner = runner(&COUNT_DOWN, DummyInput, 700);
        let stop = AtomicBool::new(true);
        assert_eq!(runner.run(&stop), Ok(()));
        assert_eq!(runner.emulator().machine().program_counter(), 0x200);

        let mut calls = 0;
        runner
            .run_while(|| {
                calls += 1;
                calls < 3
            })
            .unwrap();
        assert!(runner.emulator().machine().program_counter() > 0x200);
    }
}
