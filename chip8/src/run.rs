use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{error, info};

use emu8_core::Chip8;

/// One 60Hz frame, rounded up so 60 of them cover a full second
const FRAME_TIME: Duration = Duration::from_nanos(16_666_667);

/// Runs `frames` frames as fast as possible, then prints the screen
pub fn run_headless(chip8: &mut Chip8, frames: u32) -> Result<()> {
    for frame in 1..=frames {
        if let Err(fault) = chip8.tick(FRAME_TIME) {
            error!("halted in frame {} at {:#05X}: {}", frame, chip8.pc(), fault);
            print!("{}", chip8.framebuffer());
            return Err(fault).with_context(|| format!("ROM halted in frame {}", frame));
        }
    }
    print!("{}", chip8.framebuffer());
    Ok(())
}

/// Writes the current machine to `path` as pretty JSON
pub fn save(chip8: &Chip8, path: &Path) -> Result<()> {
    let state = serde_json::to_string_pretty(&chip8.save_state())?;
    std::fs::write(path, state)
        .with_context(|| format!("unable to write save state {}", path.display()))?;
    info!("saved state to {}", path.display());
    Ok(())
}

#[cfg(not(feature = "sdl"))]
pub fn run_windowed(_chip8: &mut Chip8) -> Result<()> {
    anyhow::bail!("built without the `sdl` feature; pass --headless or rebuild with --features sdl")
}

#[cfg(feature = "sdl")]
pub use window::run_windowed;

#[cfg(feature = "sdl")]
mod window {
    use std::time::Instant;

    use anyhow::Result;
    use log::error;
    use sdl2::event::Event;
    use sdl2::keyboard::Keycode;

    use emu8_core::Chip8;

    use super::FRAME_TIME;
    use crate::audio::Beeper;
    use crate::display::Display;
    use crate::keymap::keymap;

    /// How much faster than real time to run while Space is held
    const FAST_FORWARD: u32 = 4;

    pub fn run_windowed(chip8: &mut Chip8) -> Result<()> {
        // Get SDL2 context
        let sdl = sdl2::init().map_err(anyhow::Error::msg)?;
        let mut display = Display::new(&sdl)?;
        let mut beeper = Beeper::new(&sdl);
        let mut events = sdl.event_pump().map_err(anyhow::Error::msg)?;

        let mut last_frame = Instant::now();

        // Whether or not the clock speed should be respected
        let mut fast_forward = false;
        // Whether the game's state should be cycled forwards or backwards
        let mut rewind = false;

        'event: loop {
            // Render the current frame if CLS or DRW ran since the last one
            if let Some(frame) = chip8.take_frame() {
                display.render(frame)?;
            }

            // Handle input
            for event in events.poll_iter() {
                match event {
                    Event::Quit { .. } => break 'event,
                    Event::KeyDown {
                        keycode: Some(key), ..
                    } => match (key, keymap(key)) {
                        (_, Some(kc)) => chip8.set_key(kc, true)?,
                        (Keycode::Space, _) => fast_forward = true,
                        (Keycode::Escape, _) => rewind = true,
                        _ => continue,
                    },
                    Event::KeyUp {
                        keycode: Some(key), ..
                    } => match (key, keymap(key)) {
                        (_, Some(kc)) => chip8.set_key(kc, false)?,
                        (Keycode::Space, _) => fast_forward = false,
                        (Keycode::Escape, _) => rewind = false,
                        _ => continue,
                    },
                    _ => continue,
                };
            }

            // Update state
            let now = Instant::now();
            let mut elapsed = now - last_frame;
            last_frame = now;
            if rewind {
                chip8.rewind();
            } else {
                if fast_forward {
                    elapsed *= FAST_FORWARD;
                }
                if let Err(fault) = chip8.tick(elapsed) {
                    error!("halted at {:#05X}: {}", chip8.pc(), fault);
                    beeper.set_active(false);
                    return Err(fault.into());
                }
            }
            beeper.set_active(chip8.sound_active());

            // Handle timing
            let spent = now.elapsed();
            if spent < FRAME_TIME {
                std::thread::sleep(FRAME_TIME - spent);
            }
        }
        Ok(())
    }
}
