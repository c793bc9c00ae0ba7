//! The machine state as described at https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

use super::framebuffer::Framebuffer;
use super::input::{Keypad, NO_KEYS};
use super::instruction::Reg;
use crate::error::{Chip8Error, Result};
use crate::util::bit_splitter::BitSplitter;

pub const MEM_SIZE: usize = 4096;
pub const NUM_REGISTERS: usize = 16;
pub const STACK_SIZE: usize = 16;
pub const PC_START: u16 = 0x200;
pub const MAX_ROM_SIZE: usize = MEM_SIZE - PC_START as usize;
pub const FONT_START: u16 = 0x000;
pub const FONT_GLYPH_SIZE: u16 = 5;
pub const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Memory, registers, timers, screen and keys of a single CHIP-8 session.
///
/// Every accessor keeps the invariants of the machine: memory accesses stay
/// inside the 4 KiB address space and the stack never holds more than 16 or
/// fewer than 0 return addresses. Failing accessors change nothing.
#[derive(Clone)]
pub struct Machine {
    memory: [u8; MEM_SIZE],
    registers: [u8; NUM_REGISTERS],
    index: u16,
    program_counter: u16,
    stack: [u16; STACK_SIZE],
    stack_pointer: usize,
    delay_timer: u8,
    sound_timer: u8,
    framebuffer: Framebuffer,
    keypad: Keypad,
    redraw_pending: bool,
}

impl Machine {
    /// Create a machine with the font loaded and the program counter at 0x200.
    pub fn new() -> Machine {
        let mut memory = [0; MEM_SIZE];
        let font_start = FONT_START as usize;
        memory[font_start..font_start + FONT.len()].copy_from_slice(&FONT);

        Machine {
            memory,
            registers: [0; NUM_REGISTERS],
            index: 0,
            program_counter: PC_START,
            stack: [0; STACK_SIZE],
            stack_pointer: 0,
            delay_timer: 0,
            sound_timer: 0,
            framebuffer: Framebuffer::new(),
            keypad: NO_KEYS,
            redraw_pending: false,
        }
    }

    /// Throw away everything and start over.
    pub fn reset(&mut self) {
        *self = Machine::new();
    }

    /// Copy a program into memory at 0x200.
    /// Registers and timers are left alone, call `reset` first for a clean start.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<()> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Chip8Error::RomTooLarge {
                size: rom.len(),
                max: MAX_ROM_SIZE,
            });
        }
        self.write_range(PC_START, rom)
    }

    fn check_range(&self, addr: u16, len: usize) -> Result<usize> {
        let start = addr as usize;
        // An empty range may sit at the very end of memory but never past it
        if start + len > MEM_SIZE {
            let address = if start >= MEM_SIZE { start } else { MEM_SIZE };
            return Err(Chip8Error::AddressOutOfRange { address });
        }
        Ok(start)
    }

    pub fn read_byte(&self, addr: u16) -> Result<u8> {
        let start = self.check_range(addr, 1)?;
        Ok(self.memory[start])
    }

    pub fn read_range(&self, addr: u16, len: usize) -> Result<&[u8]> {
        let start = self.check_range(addr, len)?;
        Ok(&self.memory[start..start + len])
    }

    pub fn write_range(&mut self, addr: u16, bytes: &[u8]) -> Result<()> {
        let start = self.check_range(addr, bytes.len())?;
        self.memory[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// Read the instruction word at the program counter, high byte first.
    pub fn fetch(&self) -> Result<u16> {
        let bytes = self.read_range(self.program_counter, 2)?;
        Ok(BitSplitter::from_two_u8(bytes[0], bytes[1]).as_u16())
    }

    pub fn register(&self, Reg(x): Reg) -> u8 {
        self.registers[x as usize & 0xF]
    }

    pub fn set_register(&mut self, Reg(x): Reg, value: u8) {
        self.registers[x as usize & 0xF] = value;
    }

    pub fn registers(&self) -> &[u8; NUM_REGISTERS] {
        &self.registers
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    pub fn set_index(&mut self, index: u16) {
        self.index = index;
    }

    pub fn program_counter(&self) -> u16 {
        self.program_counter
    }

    pub fn set_program_counter(&mut self, addr: u16) {
        self.program_counter = addr;
    }

    pub fn stack_pointer(&self) -> usize {
        self.stack_pointer
    }

    /// The return addresses currently on the stack, oldest first.
    pub fn stack(&self) -> &[u16] {
        &self.stack[..self.stack_pointer]
    }

    pub fn push(&mut self, addr: u16) -> Result<()> {
        if self.stack_pointer == STACK_SIZE {
            return Err(Chip8Error::StackOverflow);
        }
        self.stack[self.stack_pointer] = addr;
        self.stack_pointer += 1;
        Ok(())
    }

    pub fn pop(&mut self) -> Result<u16> {
        if self.stack_pointer == 0 {
            return Err(Chip8Error::StackUnderflow);
        }
        self.stack_pointer -= 1;
        Ok(self.stack[self.stack_pointer])
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn set_delay_timer(&mut self, value: u8) {
        self.delay_timer = value;
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn set_sound_timer(&mut self, value: u8) {
        self.sound_timer = value;
    }

    /// One 60 Hz tick. Returns whether the sound timer is still running.
    pub fn tick_timers(&mut self) -> bool {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
        self.sound_timer > 0
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn clear_screen(&mut self) {
        self.framebuffer.clear();
        self.redraw_pending = true;
    }

    /// XOR a sprite onto the screen, returns whether a set pixel was unset.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        self.redraw_pending = true;
        self.framebuffer.draw_sprite(x, y, sprite)
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    /// Copy the framebuffer out if it changed since the last call.
    pub fn take_frame(&mut self) -> Option<Framebuffer> {
        if !self.redraw_pending {
            return None;
        }
        self.redraw_pending = false;
        Some(self.framebuffer)
    }

    pub fn keypad(&self) -> Keypad {
        self.keypad
    }

    pub fn set_keypad(&mut self, keypad: Keypad) {
        self.keypad = keypad;
    }

    /// Keys beyond 0xF are never down.
    pub fn is_key_down(&self, key: u8) -> bool {
        self.keypad.get(key as usize).copied().unwrap_or(false)
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
