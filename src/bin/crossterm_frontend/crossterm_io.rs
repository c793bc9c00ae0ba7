use chip8_vm::emulator::framebuffer::{Framebuffer, SCREEN_HEIGHT, SCREEN_WIDTH};
use chip8_vm::emulator::input::{EmulatorInput, Keypad};
use chip8_vm::emulator::output::EmulatorOutput;

use super::key_manager::KeyManager;

use crossterm::event::KeyCode;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};
use std::io::{stdout, Write};

pub struct CrosstermInput<'a> {
    key_manager: &'a KeyManager,
}

impl CrosstermInput<'_> {
    pub fn new(key_manager: &KeyManager) -> CrosstermInput {
        CrosstermInput { key_manager }
    }
}

impl EmulatorInput for CrosstermInput<'_> {
    fn keypad(&mut self) -> Keypad {
        self.key_manager.keypad()
    }
}

/// Draws the screen inside a box, two terminal cells per pixel.
pub struct CrosstermOutput {
    cells: Framebuffer,
}

impl CrosstermOutput {
    pub fn new() -> crossterm::Result<CrosstermOutput> {
        terminal::enable_raw_mode()?;
        let mut out = stdout();
        execute!(out, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;

        let bottom = SCREEN_HEIGHT as u16 + 1;
        let right = 2 * SCREEN_WIDTH as u16 + 1;
        let horizontal = "━".repeat(2 * SCREEN_WIDTH);
        queue!(out, cursor::MoveTo(0, 0), Print(format!("┏{}┓", horizontal)))?;
        for y in 1..bottom {
            queue!(out, cursor::MoveTo(0, y), Print('┃'), cursor::MoveTo(right, y), Print('┃'))?;
        }
        queue!(out, cursor::MoveTo(0, bottom), Print(format!("┗{}┛", horizontal)))?;
        out.flush()?;

        Ok(CrosstermOutput {
            cells: Framebuffer::new(),
        })
    }

    fn draw_rows(&mut self, frame: &Framebuffer) -> crossterm::Result<()> {
        let mut out = stdout();
        for (y, (row, old_row)) in frame.rows().zip(self.cells.rows()).enumerate() {
            if row == old_row {
                continue;
            }
            let line: String = row.iter().map(|c| if *c == 1 { "██" } else { "  " }).collect();
            queue!(out, cursor::MoveTo(1, y as u16 + 1), Print(line))?;
        }
        out.flush()?;
        self.cells = *frame;
        Ok(())
    }
}

impl Drop for CrosstermOutput {
    fn drop(&mut self) {
        let _ = execute!(stdout(), LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

impl EmulatorOutput for CrosstermOutput {
    fn draw(&mut self, frame: &Framebuffer) {
        if let Err(error) = self.draw_rows(frame) {
            log::error!("Could not draw: {}", error);
        }
    }

    // A terminal can only beep, so beep when the tone starts
    fn set_tone(&mut self, on: bool) {
        if on {
            let mut out = stdout();
            let _ = write!(out, "\x07").and_then(|_| out.flush());
        }
    }
}

/// The usual mapping of the hex keypad onto the left of a QWERTY keyboard:
///
/// ```text
/// 1 2 3 C      1 2 3 4
/// 4 5 6 D  <-  q w e r
/// 7 8 9 E      a s d f
/// A 0 B F      z x c v
/// ```
pub fn key_to_u8(key: KeyCode) -> Option<u8> {
    let c = match key {
        KeyCode::Char(c) => c.to_ascii_lowercase(),
        _ => return None,
    };
    let key = match c {
        '1' => 0x1,
        '2' => 0x2,
        '3' => 0x3,
        '4' => 0xC,
        'q' => 0x4,
        'w' => 0x5,
        'e' => 0x6,
        'r' => 0xD,
        'a' => 0x7,
        's' => 0x8,
        'd' => 0x9,
        'f' => 0xE,
        'z' => 0xA,
        'x' => 0x0,
        'c' => 0xB,
        'v' => 0xF,
        _ => return None,
    };
    Some(key)
}
