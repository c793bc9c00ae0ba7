use std::fmt;

pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;

type Cells = [[u8; SCREEN_WIDTH]; SCREEN_HEIGHT];
const EMPTY_SCREEN: Cells = [[0; SCREEN_WIDTH]; SCREEN_HEIGHT];

/// The 64x32 monochrome display memory, one byte per pixel.
/// A set pixel is 1, an unset pixel 0.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Framebuffer {
    cells: Cells,
}

impl Framebuffer {
    pub fn new() -> Framebuffer {
        Framebuffer { cells: EMPTY_SCREEN }
    }

    pub fn clear(&mut self) {
        self.cells = EMPTY_SCREEN;
    }

    /// Pixel at `(x, y)`, wrapping around both axes.
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.cells[y % SCREEN_HEIGHT][x % SCREEN_WIDTH]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8; SCREEN_WIDTH]> {
        self.cells.iter()
    }

    pub fn lit_pixels(&self) -> usize {
        self.cells.iter().flatten().filter(|c| **c == 1).count()
    }

    /// XOR an 8 pixel wide sprite onto the screen with its top left corner at `(x, y)`.
    /// Each byte of `sprite` is one row, most significant bit leftmost.
    /// Returns true if any set pixel was unset.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let x_coord = x as usize;
        let y_coord = y as usize;

        let mut any_collisions = false;
        for (dy, row) in sprite.iter().enumerate() {
            for dx in 0..8 {
                let new_pixel = (row >> (7 - dx)) & 1;
                if new_pixel == 0 {
                    continue;
                }
                let old_pixel = &mut self.cells[(y_coord + dy) % SCREEN_HEIGHT][(x_coord + dx) % SCREEN_WIDTH];
                if *old_pixel == 1 {
                    any_collisions = true;
                }
                *old_pixel ^= 1;
            }
        }
        any_collisions
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for c in row.iter() {
                write!(f, "{}", if *c == 1 { "#" } else { " " })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Framebuffer({} lit)\n{}", self.lit_pixels(), self)
    }
}
