use wireworld::{CellState, Random};

const WHITE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];
const BLACK: [u8; 4] = [0x00, 0x00, 0x00, 0xff];

/// 8x8 stipples for wire, head and tail on two-color displays. Bit `x` of byte `y`
/// is the pixel at `(x, y)`.
const STIPPLES: [[u8; 8]; 3] = [
    [0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
    [0x00, 0x66, 0x66, 0x00, 0x00, 0x66, 0x66, 0x00],
    [0xff, 0x99, 0x99, 0xff, 0xff, 0x99, 0x99, 0xff],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellLook {
    Solid([u8; 4]),
    Stipple([u8; 8]),
}

impl CellLook {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        match self {
            CellLook::Solid(color) => *color,
            CellLook::Stipple(pattern) => {
                if pattern[(y % 8) as usize] & (1 << (x % 8)) != 0 {
                    WHITE
                } else {
                    BLACK
                }
            }
        }
    }
}

/// How each non-space state looks. Color palettes pick three hues spread around a
/// wheel of `ncolors` entries and pick again for every new circuit.
#[derive(Debug)]
pub struct Palette {
    ncolors: Option<u32>,
    looks: [CellLook; 3],
    rand: Random,
}

impl Palette {
    /// Two colors or fewer means a monochrome display.
    pub fn new(ncolors: u32, mono: bool, rand: Random) -> Self {
        let mut result = Self {
            ncolors: (!mono && ncolors > 2).then_some(ncolors),
            looks: STIPPLES.map(CellLook::Stipple),
            rand,
        };
        result.reroll();
        result
    }

    pub fn is_mono(&self) -> bool {
        self.ncolors.is_none()
    }

    pub fn look(&self, state: CellState) -> Option<CellLook> {
        match state {
            CellState::Space => None,
            _ => Some(self.looks[state.index() - 1]),
        }
    }

    pub fn reroll(&mut self) {
        let Some(ncolors) = self.ncolors else {
            return;
        };
        let mut index = self.rand.next_in_range(0..ncolors);
        for look in self.looks.iter_mut() {
            *look = CellLook::Solid(hue_rgba(index, ncolors));
            index = (index + ncolors / 6 + self.rand.next_in_range(0..=ncolors / 4)) % ncolors;
        }
    }
}

/// Fully saturated, full value color at `index` of `ncolors` steps around the hue wheel.
fn hue_rgba(index: u32, ncolors: u32) -> [u8; 4] {
    let hue = index as f32 / ncolors as f32 * 6.0;
    let sector = hue.floor();
    let rising = ((hue - sector) * 255.0) as u8;
    let falling = 0xff - rising;
    let [red, green, blue] = match sector as u32 % 6 {
        0 => [0xff, rising, 0],
        1 => [falling, 0xff, 0],
        2 => [0, 0xff, rising],
        3 => [0, falling, 0xff],
        4 => [rising, 0, 0xff],
        _ => [0xff, 0, falling],
    };
    [red, green, blue, 0xff]
}
