use core::convert::TryFrom;

use heapless::Vec;
#[allow(unused_imports)]
use log::{debug, error, info, trace, warn};

use crate::config::Quirks;
use crate::context::Context;
use crate::error::Error;
use crate::frame::{Frame, FrameView};
use crate::opcode::OpCode;
use crate::timer::{Timer, TimerState};

pub const MEMORY_SIZE: usize = 4096;
pub const PROGRAM_START: u16 = 0x200;
pub const GLYPHS_START: u16 = 0x050;
pub const GLYPH_HEIGHT: u16 = 5;
pub const STACK_DEPTH: usize = 16;
pub const KEYS: usize = 16;

/// Sprites of the hexadecimal digits 0-F, five rows each
#[rustfmt::skip]
pub const GLYPHS: [u8; 16 * GLYPH_HEIGHT as usize] = [
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

/// State of a single chip-8 run together with the platform it runs on
pub struct Machine<C: Context + Sized> {
    pub(crate) ctx: C,
    pub(crate) quirks: Quirks,
    pub(crate) v: [u8; 16],
    pub(crate) i: u16,
    pub(crate) pc: u16,
    pub(crate) frame: Frame,
    pub(crate) memory: [u8; MEMORY_SIZE],
    pub(crate) stack: Vec<u16, STACK_DEPTH>,
    pub(crate) delay_timer: Timer,
    pub(crate) sound_timer: Timer,
    pub(crate) keys: [bool; KEYS],
    pub(crate) redraw: bool,
}

impl<C: Context + Sized> Machine<C> {
    pub fn new(ctx: C, quirks: Quirks) -> Self {
        let mut machine = Self {
            ctx,
            quirks,
            v: [0; 16],
            i: 0,
            pc: PROGRAM_START,
            frame: Frame::new(),
            memory: [0; MEMORY_SIZE],
            stack: Vec::new(),
            delay_timer: Timer::new(),
            sound_timer: Timer::new(),
            keys: [false; KEYS],
            redraw: false,
        };
        machine.reset();
        machine
    }

    /// Bring back the power-on state and reload the glyphs
    ///
    /// Key states are left as they are, they mirror the physical keyboard.
    pub fn reset(&mut self) {
        self.memory = [0; MEMORY_SIZE];
        self.v = [0; 16];
        self.i = 0;
        self.pc = PROGRAM_START;
        self.stack.clear();
        self.frame.clear();
        self.redraw = false;
        self.delay_timer.store(0);
        self.sound_timer.store(0);

        let glyphs = GLYPHS_START as usize;
        self.memory[glyphs..glyphs + GLYPHS.len()].copy_from_slice(&GLYPHS);
    }

    /// Load program from slice of bytes to memory from 0x200 (_start address)
    ///
    /// Bytes that do not fit below 0x1000 are dropped.
    pub fn load(&mut self, prog: &[u8]) {
        let space = MEMORY_SIZE - PROGRAM_START as usize;
        if prog.len() > space {
            warn!(
                "program of {} bytes truncated to {} bytes",
                prog.len(),
                space
            );
        }
        self.memory[PROGRAM_START as usize..]
            .iter_mut()
            .zip(prog)
            .for_each(|(mem, &prog)| *mem = prog);
        debug!("loaded {} bytes", prog.len().min(space));
    }

    /// Take the frame if it changed since the last call
    pub fn take_frame(&mut self) -> Option<Frame> {
        if self.redraw {
            self.redraw = false;
            Some(self.frame.clone())
        } else {
            None
        }
    }

    /// Look at the current frame without consuming the redraw
    pub fn frame(&self) -> FrameView<'_> {
        self.frame.view()
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw
    }

    /// Store the state of one of the 16 keys
    pub fn set_key(&mut self, key: u8, pressed: bool) {
        match self.keys.get_mut(key as usize) {
            Some(state) => {
                debug!("key {:X} {}", key, if pressed { "down" } else { "up" });
                *state = pressed;
            }
            None => warn!("ignoring update of nonexistent key {:#X}", key),
        }
    }

    pub fn keys(&self) -> &[bool; KEYS] {
        &self.keys
    }

    pub fn registers(&self) -> &[u8; 16] {
        &self.v
    }

    pub fn index(&self) -> u16 {
        self.i
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn stack(&self) -> &[u16] {
        &self.stack
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer.load()
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer.load()
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn context(&self) -> &C {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    /// Fetch, decode and execute a single instruction
    ///
    /// `WouldBlock` means the program waits for a keypress, the same instruction
    /// is fetched again on the next call. Afterwards the platform is told
    /// whether the tone should play.
    pub fn tick_chip(&mut self) -> nb::Result<(), Error> {
        let pc = self.pc;
        let raw = u16::from_be_bytes([
            self.read_byte(pc as usize),
            self.read_byte(pc as usize + 1),
        ]);
        let result = OpCode::try_from(raw)
            .map_err(|e| nb::Error::Other(e.at(pc)))
            .and_then(|opcode| {
                trace!("{:#05X}: {:04X} {:?}", pc, raw, opcode);
                self.execute(opcode)
            });
        if let Err(nb::Error::Other(e)) = result {
            error!("{}", e);
        }
        if self.sound_timer.is_active() {
            self.ctx.sound_on();
        } else {
            self.ctx.sound_off();
        }
        result
    }

    /// Count both timers down by one
    pub fn tick_timers(&mut self) {
        self.delay_timer.decrement();
        if let TimerState::Finished = self.sound_timer.decrement() {
            trace!("sound timer expired");
        }
    }

    /// Reads past the end of memory give 0
    pub(crate) fn read_byte(&self, addr: usize) -> u8 {
        self.memory.get(addr).copied().unwrap_or(0)
    }

    /// Writes past the end of memory are dropped
    pub(crate) fn write_byte(&mut self, addr: usize, value: u8) {
        match self.memory.get_mut(addr) {
            Some(byte) => *byte = value,
            None => trace!("dropped write past memory at {:#X}", addr),
        }
    }

    pub(crate) fn pc_increment(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::TestingContext;

    fn machine() -> Machine<TestingContext> {
        Machine::new(TestingContext::new(0), Quirks::default())
    }

    #[test]
    fn power_on_state() {
        let chip = machine();
        assert_eq!(chip.pc(), 0x200u16);
        assert_eq!(chip.index(), 0x000u16);
        assert_eq!(chip.registers(), &[0u8; 16]);
        assert!(chip.stack().is_empty());
        assert!(!chip.redraw_pending());
        assert_eq!(&chip.memory()[0x050..0x055], &[0xF0, 0x90, 0x90, 0x90, 0xF0]);
        assert_eq!(&chip.memory()[0x050..0x0A0], &GLYPHS[..]);
        assert!(chip.memory()[..0x050].iter().all(|&b| b == 0));
        assert!(chip.memory()[0x0A0..].iter().all(|&b| b == 0));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut chip = machine();
        chip.load(&[0x6A, 0x05, 0xD0, 0x05]);
        chip.v[3] = 0x42;
        chip.i = 0x123;
        chip.pc = 0x2AA;
        chip.stack.push(0x204).unwrap();
        chip.frame.xor_cell(10, true);
        chip.redraw = true;
        chip.delay_timer.store(9);
        chip.sound_timer.store(7);
        chip.set_key(0x4, true);

        chip.reset();
        let memory = chip.memory;
        chip.reset();

        assert_eq!(&chip.memory[..], &memory[..]);
        assert_eq!(&chip.memory[..], &machine().memory[..]);
        assert_eq!(chip.v, [0; 16]);
        assert_eq!(chip.i, 0);
        assert_eq!(chip.pc, 0x200);
        assert!(chip.stack.is_empty());
        assert_eq!(chip.frame().lit(), 0);
        assert!(!chip.redraw_pending());
        assert_eq!((chip.delay_timer(), chip.sound_timer()), (0, 0));
        assert!(chip.keys()[0x4]);
    }

    #[test]
    fn load_program() {
        let mut chip = machine();
        chip.load(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(&chip.memory()[0x200..0x204], &[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(chip.memory()[0x204], 0x00);
    }

    #[test]
    fn load_truncates_oversized_program() {
        let mut chip = machine();
        let prog = [0xAAu8; MEMORY_SIZE];
        chip.load(&prog);
        assert!(chip.memory()[0x200..].iter().all(|&b| b == 0xAA));
        assert_eq!(chip.memory().len(), MEMORY_SIZE);
    }

    #[test]
    fn take_frame_consumes_redraw() {
        let mut chip = machine();
        assert_eq!(chip.take_frame(), None);

        chip.frame.xor_cell(0, true);
        chip.redraw = true;
        let frame = chip.take_frame().unwrap();
        assert_eq!(frame.view().get_bit(0, 0), Some(true));
        assert!(!chip.redraw_pending());
        assert_eq!(chip.take_frame(), None);
        assert_eq!(chip.frame().get_bit(0, 0), Some(true));
    }

    #[test]
    fn set_key() {
        let mut chip = machine();
        chip.set_key(0x1, true);
        chip.set_key(0xF, true);
        assert_eq!(chip.keys().iter().filter(|&&k| k).count(), 2);

        chip.set_key(0xF, false);
        chip.set_key(0x10, true);
        assert_eq!(chip.keys().iter().filter(|&&k| k).count(), 1);
        assert!(chip.keys()[0x1]);
    }

    #[test]
    fn tick_chip_fetches_big_endian() {
        let mut chip = machine();
        chip.load(&[0x6A, 0x05]);
        chip.tick_chip().unwrap();
        assert_eq!(chip.registers()[0xA], 0x05);
        assert_eq!(chip.pc(), 0x202);
    }

    #[test]
    fn tick_chip_reports_faults_with_pc() {
        let mut chip = machine();
        assert_eq!(
            chip.tick_chip(),
            Err(nb::Error::Other(Error::EmptyOpcode { pc: 0x200 })),
        );

        chip.load(&[0xE1, 0x00]);
        assert_eq!(
            chip.tick_chip(),
            Err(nb::Error::Other(Error::UnknownOpcode {
                opcode: 0xE100,
                pc: 0x200
            })),
        );

        chip.load(&[0x01, 0x23]);
        assert_eq!(
            chip.tick_chip(),
            Err(nb::Error::Other(Error::UnsupportedOperation {
                opcode: 0x0123,
                pc: 0x200
            })),
        );
        assert_eq!(chip.pc(), 0x200);
    }

    #[test]
    fn fetch_past_memory_reads_empty_opcode() {
        let mut chip = machine();
        chip.pc = 0x0FFF;
        chip.memory[0x0FFF] = 0x00;
        assert_eq!(
            chip.tick_chip(),
            Err(nb::Error::Other(Error::EmptyOpcode { pc: 0x0FFF })),
        );
    }

    #[test]
    fn tick_chip_signals_tone() {
        let mut chip = machine();
        // V0 = 2, sound timer = V0, then spin on a jump to itself
        chip.load(&[0x60, 0x02, 0xF0, 0x18, 0x12, 0x04]);
        chip.tick_chip().unwrap();
        assert!(!chip.context().is_sound_on());
        chip.tick_chip().unwrap();
        assert!(chip.context().is_sound_on());

        chip.tick_timers();
        chip.tick_chip().unwrap();
        assert!(chip.context().is_sound_on());

        chip.tick_timers();
        chip.tick_chip().unwrap();
        assert!(!chip.context().is_sound_on());
        assert_eq!(chip.context().sound_calls(), 4);
    }

    #[test]
    fn tick_timers_floors_at_zero() {
        let mut chip = machine();
        chip.delay_timer.store(1);
        chip.sound_timer.store(3);
        chip.tick_timers();
        chip.tick_timers();
        assert_eq!((chip.delay_timer(), chip.sound_timer()), (0, 1));
        chip.tick_timers();
        chip.tick_timers();
        assert_eq!((chip.delay_timer(), chip.sound_timer()), (0, 0));
    }
}
