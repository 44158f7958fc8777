//! Headless terminal platform: ASCII frames on stdout and a logged tone.

use chip8vm::{
    embedded_graphics::{image::IntoPixelIter, pixelcolor::BinaryColor},
    Context, FrameView, HEIGHT, WIDTH,
};
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub struct TermContext {
    sound: bool,
    rng: StdRng,
}

impl TermContext {
    pub fn new() -> Self {
        Self {
            sound: false,
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible `CXNN` results
    pub fn with_seed(seed: u64) -> Self {
        Self {
            sound: false,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn is_sound_on(&self) -> bool {
        self.sound
    }
}

impl Default for TermContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Context for TermContext {
    fn sound_on(&mut self) {
        if !self.sound {
            info!("tone on");
        }
        self.sound = true;
    }

    fn sound_off(&mut self) {
        if self.sound {
            info!("tone off");
        }
        self.sound = false;
    }

    fn gen_random(&mut self) -> u8 {
        self.rng.gen()
    }
}

/// Draw the frame inside of a border, `#` for lit pixels
pub fn render(frame: FrameView<'_>) -> String {
    let mut rows = vec![vec![' '; WIDTH]; HEIGHT];
    frame
        .as_raw_image()
        .pixel_iter()
        .filter(|px| px.1 == BinaryColor::On)
        .for_each(|px| rows[px.0.y as usize][px.0.x as usize] = '#');

    let border = format!("+{}+\n", "-".repeat(WIDTH));
    let mut out = border.clone();
    for row in rows {
        out.push('|');
        out.extend(row);
        out.push_str("|\n");
    }
    out.push_str(&border);
    out
}
