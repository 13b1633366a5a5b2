use std::fmt;

use crate::constants::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::error::Fault;

/// # Framebuffer
/// The Chip-8 display is composed of 64x32 black/white pixels.
/// The FrameBuffer is indexed as [y][x].
///
/// Renderers only ever get a `&Framebuffer`; the CPU is the only writer.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            pixels: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
        }
    }

    pub fn clear(&mut self) {
        self.pixels = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }

    pub fn get(&self, x: usize, y: usize) -> Result<bool, Fault> {
        Self::check(x, y)?;
        Ok(self.pixels[y][x])
    }

    pub fn set(&mut self, x: usize, y: usize, lit: bool) -> Result<(), Fault> {
        Self::check(x, y)?;
        self.pixels[y][x] = lit;
        Ok(())
    }

    /// Flips a pixel and returns whether it was lit beforehand
    pub fn toggle(&mut self, x: usize, y: usize) -> Result<bool, Fault> {
        Self::check(x, y)?;
        let was_lit = self.pixels[y][x];
        self.pixels[y][x] = !was_lit;
        Ok(was_lit)
    }

    /// XORs a sprite onto the display.
    ///
    /// The starting position wraps around both axes. Each row byte is drawn
    /// msb first on line `(y + row) % 32`, so tall sprites wrap vertically,
    /// while bits that would land past the right edge are clipped.
    ///
    /// Returns true if any lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let x0 = x as usize % DISPLAY_WIDTH;
        let y0 = y as usize % DISPLAY_HEIGHT;
        let mut collided = false;

        for (row, byte) in rows.iter().enumerate() {
            let line = &mut self.pixels[(y0 + row) % DISPLAY_HEIGHT];
            for bit in 0..8 {
                let column = x0 + bit;
                if column >= DISPLAY_WIDTH {
                    break;
                }
                if (*byte >> (7 - bit)) & 1 == 1 {
                    collided |= line[column];
                    line[column] = !line[column];
                }
            }
        }

        collided
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool; DISPLAY_WIDTH]> {
        self.pixels.iter()
    }

    pub fn lit_count(&self) -> usize {
        self.pixels
            .iter()
            .map(|row| row.iter().filter(|&&p| p).count())
            .sum()
    }

    pub(crate) fn from_bits(bits: &[bool]) -> Option<Self> {
        if bits.len() != DISPLAY_WIDTH * DISPLAY_HEIGHT {
            return None;
        }
        let mut framebuffer = Framebuffer::new();
        for (line, chunk) in framebuffer
            .pixels
            .iter_mut()
            .zip(bits.chunks(DISPLAY_WIDTH))
        {
            line.copy_from_slice(chunk);
        }
        Some(framebuffer)
    }

    pub(crate) fn to_bits(&self) -> Vec<bool> {
        self.pixels.iter().flat_map(|row| row.iter().copied()).collect()
    }

    fn check(x: usize, y: usize) -> Result<(), Fault> {
        if x < DISPLAY_WIDTH && y < DISPLAY_HEIGHT {
            Ok(())
        } else {
            Err(Fault::OutOfBounds { x, y })
        }
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders lit pixels as `#` and unlit ones as `.`, one line per row
impl fmt::Display for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.pixels.iter() {
            let line: String = row.iter().map(|&p| if p { '#' } else { '.' }).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Framebuffer {{ lit: {} }}", self.lit_count())
    }
}
