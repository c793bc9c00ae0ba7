//! The fetch, decode and execute engine.

use std::collections::BTreeSet;

use super::framebuffer::Framebuffer;
use super::input::Keypad;
use super::instruction::*;
use super::machine::{Machine, FONT_GLYPH_SIZE, FONT_START};
use super::quirks::Quirks;
use super::random::{Entropy, SystemEntropy};
use crate::error::Result;

/// Whether the instruction stream is running or suspended by FX0A.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Running,
    WaitingForKey(Reg),
}

/// What the program counter does after an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Skip,
    Jump(u16),
    WaitForKey(Reg),
}

impl Flow {
    fn skip_if(condition: bool) -> Flow {
        if condition {
            Flow::Skip
        } else {
            Flow::Next
        }
    }
}

pub struct Emulator<R: Entropy = SystemEntropy> {
    machine: Machine,
    quirks: Quirks,
    entropy: R,
    status: Status,
    ignored_routines: BTreeSet<u16>,
}

impl Emulator<SystemEntropy> {
    /// Create a new emulator with COSMAC VIP behaviour and system randomness
    pub fn new() -> Emulator<SystemEntropy> {
        Emulator::with_entropy(Quirks::default(), SystemEntropy)
    }
}

impl Default for Emulator<SystemEntropy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Entropy> Emulator<R> {
    pub fn with_entropy(quirks: Quirks, entropy: R) -> Emulator<R> {
        Emulator {
            machine: Machine::new(),
            quirks,
            entropy,
            status: Status::Running,
            ignored_routines: BTreeSet::new(),
        }
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Addresses of the 0NNN machine code routines skipped this session, lowest first.
    pub fn ignored_routines(&self) -> impl Iterator<Item = u16> + '_ {
        self.ignored_routines.iter().copied()
    }

    /// Start a fresh session with the font loaded and nothing else.
    pub fn reset(&mut self) {
        self.machine.reset();
        self.status = Status::Running;
        self.ignored_routines.clear();
    }

    /// Reset the machine, then copy a program into memory at 0x200.
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        self.reset();
        self.machine.load_rom(program)?;
        log::debug!("Loaded {} byte program", program.len());
        Ok(())
    }

    /// Copy in the current keypad. A key going down while FX0A waits resumes execution.
    pub fn set_keypad(&mut self, keypad: Keypad) {
        let previous = self.machine.keypad();
        self.machine.set_keypad(keypad);

        if let Status::WaitingForKey(reg) = self.status {
            let pressed = (0..16u8).find(|&key| keypad[key as usize] && !previous[key as usize]);
            if let Some(key) = pressed {
                log::debug!("Key {:X} pressed, resuming", key);
                self.machine.set_register(reg, key);
                self.status = Status::Running;
            }
        }
    }

    /// One 60 Hz timer tick. Returns whether the tone should be on.
    pub fn tick_timers(&mut self) -> bool {
        self.machine.tick_timers()
    }

    pub fn sound_active(&self) -> bool {
        self.machine.sound_timer() > 0
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        self.machine.framebuffer()
    }

    /// The framebuffer, if it changed since it was last taken.
    pub fn take_frame(&mut self) -> Option<Framebuffer> {
        self.machine.take_frame()
    }

    /// Load an instruction at the program counter and execute it.
    /// Does nothing while waiting for a key.
    pub fn step(&mut self) -> Result<Status> {
        if let Status::WaitingForKey(_) = self.status {
            return Ok(self.status);
        }

        let word = self.machine.fetch()?;
        let instruction = Instruction::from_u16(word)?;
        log::trace!("{:#06x}: {:?}", self.machine.program_counter(), instruction);

        self.execute_single(instruction)?;
        Ok(self.status)
    }

    /// Execute many instructions sequentially, as if each were fetched at the program counter.
    pub fn execute_many(&mut self, instructions: &[Instruction]) -> Result<()> {
        for instruction in instructions {
            self.execute_single(*instruction)?;
        }
        Ok(())
    }

    /// Execute a single instruction as if it were fetched at the program counter.
    /// On error nothing has changed.
    pub fn execute_single(&mut self, instruction: Instruction) -> Result<()> {
        let next = self.machine.program_counter().wrapping_add(2);
        let flow = self.execute(instruction, next)?;

        match flow {
            Flow::Next => self.machine.set_program_counter(next),
            Flow::Skip => self.machine.set_program_counter(next.wrapping_add(2)),
            Flow::Jump(addr) => self.machine.set_program_counter(addr),
            Flow::WaitForKey(reg) => {
                log::debug!("Waiting for a key press into V{:X}", reg.0);
                self.machine.set_program_counter(next);
                self.status = Status::WaitingForKey(reg);
            }
        }
        Ok(())
    }

    /// Apply an instruction to the machine. `next` is the address of the following instruction.
    /// Preconditions are checked before anything is written.
    fn execute(&mut self, instruction: Instruction, next: u16) -> Result<Flow> {
        let m = &mut self.machine;

        let flow = match instruction {
            // Native COSMAC VIP machine code routines cannot run here.
            // Warn once per routine, a ROM may call one in a loop.
            Instruction::SysCall(Addr(addr)) => {
                if self.ignored_routines.insert(addr) {
                    log::warn!("Ignoring machine code routine at {:#05x}", addr);
                } else {
                    log::trace!("Ignoring machine code routine at {:#05x} again", addr);
                }
                Flow::Next
            }

            Instruction::ClearScreen => {
                m.clear_screen();
                Flow::Next
            }

            // Return to the previous call site via the stack.
            Instruction::Return => Flow::Jump(m.pop()?),

            Instruction::Goto(Addr(addr)) => Flow::Jump(addr),

            // Store the address after the call on the stack, then jump
            Instruction::Call(Addr(addr)) => {
                m.push(next)?;
                Flow::Jump(addr)
            }

            Instruction::IfRegEqConst(x, Const(n)) => Flow::skip_if(m.register(x) == n),

            Instruction::IfRegNeqConst(x, Const(n)) => Flow::skip_if(m.register(x) != n),

            Instruction::IfRegEqReg(x, y) => Flow::skip_if(m.register(x) == m.register(y)),

            Instruction::SetRegToConst(x, Const(n)) => {
                m.set_register(x, n);
                Flow::Next
            }

            // No carry flag
            Instruction::IncRegByConst(x, Const(n)) => {
                m.set_register(x, m.register(x).wrapping_add(n));
                Flow::Next
            }

            Instruction::SetRegToReg(x, y) => {
                m.set_register(x, m.register(y));
                Flow::Next
            }

            Instruction::BitwiseOr(x, y) => {
                m.set_register(x, m.register(x) | m.register(y));
                Flow::Next
            }

            Instruction::BitwiseAnd(x, y) => {
                m.set_register(x, m.register(x) & m.register(y));
                Flow::Next
            }

            Instruction::BitwiseXor(x, y) => {
                m.set_register(x, m.register(x) ^ m.register(y));
                Flow::Next
            }

            // VF is written last so it survives when X is F
            Instruction::IncRegByReg(x, y) => {
                let (sum, carry) = m.register(x).overflowing_add(m.register(y));
                m.set_register(x, sum);
                m.set_register(Reg(0xF), carry as u8);
                Flow::Next
            }

            // VF is 1 when there is no borrow
            Instruction::DecRegByReg(x, y) => {
                let (vx, vy) = (m.register(x), m.register(y));
                m.set_register(x, vx.wrapping_sub(vy));
                m.set_register(Reg(0xF), (vx >= vy) as u8);
                Flow::Next
            }

            Instruction::BitshiftRight(x, y) => {
                let source = if self.quirks.shift_reads_vy { m.register(y) } else { m.register(x) };
                m.set_register(x, source >> 1);
                m.set_register(Reg(0xF), source & 1);
                Flow::Next
            }

            Instruction::SetVxVyMinusVx(x, y) => {
                let (vx, vy) = (m.register(x), m.register(y));
                m.set_register(x, vy.wrapping_sub(vx));
                m.set_register(Reg(0xF), (vy >= vx) as u8);
                Flow::Next
            }

            Instruction::BitshiftLeft(x, y) => {
                let source = if self.quirks.shift_reads_vy { m.register(y) } else { m.register(x) };
                m.set_register(x, source << 1);
                m.set_register(Reg(0xF), (source >> 7) & 1);
                Flow::Next
            }

            Instruction::IfRegNeqReg(x, y) => Flow::skip_if(m.register(x) != m.register(y)),

            Instruction::SetI(Addr(addr)) => {
                m.set_index(addr);
                Flow::Next
            }

            Instruction::SetPcToV0PlusAddr(Addr(addr)) => Flow::Jump(m.register(Reg(0)) as u16 + addr),

            Instruction::SetVxRand(x, Const(n)) => {
                m.set_register(x, self.entropy.next_byte() & n);
                Flow::Next
            }

            // XOR an 8xN sprite from I onto the screen, VF reports collisions
            Instruction::Draw(x, y, Const(height)) => {
                let sprite = m.read_range(m.index(), height as usize)?.to_vec();
                let (x_coord, y_coord) = (m.register(x), m.register(y));
                let collision = m.draw_sprite(x_coord, y_coord, &sprite);
                m.set_register(Reg(0xF), collision as u8);
                Flow::Next
            }

            Instruction::IfKeyEqVx(x) => Flow::skip_if(m.is_key_down(m.register(x))),

            Instruction::IfKeyNeqVx(x) => Flow::skip_if(!m.is_key_down(m.register(x))),

            Instruction::SetRegToDelayTimer(x) => {
                m.set_register(x, m.delay_timer());
                Flow::Next
            }

            // Suspend until a key goes down, see `set_keypad`
            Instruction::SetRegToGetKey(x) => Flow::WaitForKey(x),

            Instruction::SetDelayTimerToReg(x) => {
                m.set_delay_timer(m.register(x));
                Flow::Next
            }

            Instruction::SetSoundTimerToReg(x) => {
                m.set_sound_timer(m.register(x));
                Flow::Next
            }

            Instruction::AddRegToI(x) => {
                let sum = m.index() as u32 + m.register(x) as u32;
                m.set_index(sum as u16);
                if self.quirks.index_overflow_sets_vf {
                    m.set_register(Reg(0xF), (sum > 0x0FFF) as u8);
                }
                Flow::Next
            }

            // Each font glyph is 5 bytes long.
            Instruction::SetIToSpriteAddrVx(x) => {
                m.set_index(FONT_START + FONT_GLYPH_SIZE * m.register(x) as u16);
                Flow::Next
            }

            Instruction::SetIToBcdOfReg(x) => {
                let value = m.register(x);
                let digits = [value / 100, (value / 10) % 10, value % 10];
                m.write_range(m.index(), &digits)?;
                Flow::Next
            }

            // Dump register values up to Vx
            Instruction::RegDump(Reg(x)) => {
                let count = x as usize + 1;
                let values = m.registers()[..count].to_vec();
                m.write_range(m.index(), &values)?;
                if self.quirks.load_store_advances_index {
                    m.set_index(m.index().wrapping_add(count as u16));
                }
                Flow::Next
            }

            // Load register values up to Vx
            Instruction::RegLoad(Reg(x)) => {
                let count = x as usize + 1;
                let values = m.read_range(m.index(), count)?.to_vec();
                for (reg_no, value) in values.into_iter().enumerate() {
                    m.set_register(Reg(reg_no as u8), value);
                }
                if self.quirks.load_store_advances_index {
                    m.set_index(m.index().wrapping_add(count as u16));
                }
                Flow::Next
            }
        };

        Ok(flow)
    }
}
