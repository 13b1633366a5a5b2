use sdl2::keyboard::Keycode;

/// # Keymap
/// The hexadecimal keypad laid over the left 4 alphanumeric columns, row by row.
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
const LAYOUT: [[(Keycode, u8); 4]; 4] = [
    [
        (Keycode::Num1, 0x1),
        (Keycode::Num2, 0x2),
        (Keycode::Num3, 0x3),
        (Keycode::Num4, 0xC),
    ],
    [
        (Keycode::Q, 0x4),
        (Keycode::W, 0x5),
        (Keycode::E, 0x6),
        (Keycode::R, 0xD),
    ],
    [
        (Keycode::A, 0x7),
        (Keycode::S, 0x8),
        (Keycode::D, 0x9),
        (Keycode::F, 0xE),
    ],
    [
        (Keycode::Z, 0xA),
        (Keycode::X, 0x0),
        (Keycode::C, 0xB),
        (Keycode::V, 0xF),
    ],
];

/// The keypad index for a physical key, if it is part of the layout
pub fn keymap(key: Keycode) -> Option<u8> {
    LAYOUT
        .iter()
        .flat_map(|row| row.iter())
        .find(|(keycode, _)| *keycode == key)
        .map(|&(_, index)| index)
}
