use crate::error::InputError;

/// # Keypad
/// Chip-8 input is generated with a hexadecimal keypad.
///
/// ```text
/// |1|2|3|C|
/// |4|5|6|D|
/// |7|8|9|E|
/// |A|0|B|F|
/// ```
///
/// Besides the pressed status of each key, the keypad latches the first key
/// to go down since the latch was last cleared. `LD Vx, K` waits on that
/// latch rather than on the raw key states, so a key that was already held
/// when the wait started doesn't count.
#[derive(Clone, Default)]
pub struct Keypad {
    keys: [bool; 16],
    latch: Option<u8>,
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the pressed status of key
    ///
    /// # Arguments
    /// * `key` the 4-bit index of the key, 0x0..=0xF
    /// * `pressed` whether the key is now down
    pub fn set_key(&mut self, key: u8, pressed: bool) -> Result<(), InputError> {
        let slot = self
            .keys
            .get_mut(key as usize)
            .ok_or(InputError::InvalidKey(key))?;
        if pressed && !*slot && self.latch.is_none() {
            self.latch = Some(key);
        }
        *slot = pressed;
        Ok(())
    }

    /// Only the low nibble of `key` is looked at, so any register value is safe to pass in
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0xF) as usize]
    }

    /// Takes the latched key, if any key went down since the latch was last cleared
    pub fn poll_any_pressed(&mut self) -> Option<u8> {
        self.latch.take()
    }

    pub fn clear_latch(&mut self) {
        self.latch = None;
    }

    pub fn release_all(&mut self) {
        self.keys = [false; 16];
        self.latch = None;
    }

    pub(crate) fn states(&self) -> [bool; 16] {
        self.keys
    }

    /// A keypad with `keys` held down and nothing latched
    pub(crate) fn from_states(keys: [bool; 16]) -> Self {
        Keypad { keys, latch: None }
    }
}
