use log::{error, info};
use sdl2::audio::{AudioCallback, AudioDevice, AudioSpecDesired};

const SAMPLE_RATE: i32 = 44_100;
const TONE_HZ: f32 = 440.0;
const VOLUME: f32 = 0.2;

/// A square wave, the closest thing to the VIP's buzzer
pub struct SquareWave {
    phase_inc: f32,
    phase: f32,
    volume: f32,
}

impl AudioCallback for SquareWave {
    type Channel = f32;

    fn callback(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = if self.phase < 0.5 {
                self.volume
            } else {
                -self.volume
            };
            self.phase = (self.phase + self.phase_inc) % 1.0;
        }
    }
}

/// Plays a tone while the sound timer is running.
/// Without an audio device it stays silent and the emulator carries on.
pub struct Beeper {
    device: Option<AudioDevice<SquareWave>>,
    playing: bool,
}

impl Beeper {
    pub fn new(sdl: &sdl2::Sdl) -> Self {
        let device = match Self::open(sdl) {
            Ok(device) => {
                info!("audio output opened");
                Some(device)
            }
            Err(err) => {
                error!("unable to open audio output, sound is disabled: {}", err);
                None
            }
        };
        Beeper {
            device,
            playing: false,
        }
    }

    fn open(sdl: &sdl2::Sdl) -> Result<AudioDevice<SquareWave>, String> {
        let audio = sdl.audio()?;
        let desired = AudioSpecDesired {
            freq: Some(SAMPLE_RATE),
            channels: Some(1),
            samples: None,
        };
        audio.open_playback(None, &desired, |spec| SquareWave {
            phase_inc: TONE_HZ / spec.freq as f32,
            phase: 0.0,
            volume: VOLUME,
        })
    }

    pub fn set_active(&mut self, active: bool) {
        if active == self.playing {
            return;
        }
        if let Some(device) = self.device.as_ref() {
            if active {
                device.resume();
            } else {
                device.pause();
            }
        }
        self.playing = active;
    }
}
