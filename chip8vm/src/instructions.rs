//! Semantics of the chip-8 instruction set
//!
//! Every handler moves the program counter on its own, there is no shared
//! increment after execution.

use crate::context::Context;
use crate::error::Error;
use crate::frame::WIDTH;
use crate::machine::{Machine, GLYPHS_START, GLYPH_HEIGHT};
use crate::opcode::OpCode;

const VF: usize = 0xF;

impl<C: Context + Sized> Machine<C> {
    #[rustfmt::skip]
    pub(crate) fn execute(&mut self, opcode: OpCode) -> nb::Result<(), Error> {
        match opcode {
            OpCode::_0NNN { nnn }     => self.exec_ml_subroutine_at(nnn),
            OpCode::_00E0             => self.clear_screen(),
            OpCode::_00EE             => self.subroutine_return(),
            OpCode::_1NNN { nnn }     => self.jump_to(nnn),
            OpCode::_2NNN { nnn }     => self.exec_subroutine_at(nnn),
            OpCode::_3XNN { x, nn }   => self.skip_if(self.v[x as usize] == nn),
            OpCode::_4XNN { x, nn }   => self.skip_if(self.v[x as usize] != nn),
            OpCode::_5XY0 { x, y }    => self.skip_if(self.v[x as usize] == self.v[y as usize]),
            OpCode::_6XNN { x, nn }   => self.assign_vx_nn(x, nn),
            OpCode::_7XNN { x, nn }   => self.assign_add_vx_nn(x, nn),
            OpCode::_8XY0 { x, y }    => self.assign_vx_with(x, y, |_, vy| vy),
            OpCode::_8XY1 { x, y }    => self.assign_vx_with(x, y, |vx, vy| vx | vy),
            OpCode::_8XY2 { x, y }    => self.assign_vx_with(x, y, |vx, vy| vx & vy),
            OpCode::_8XY3 { x, y }    => self.assign_vx_with(x, y, |vx, vy| vx ^ vy),
            OpCode::_8XY4 { x, y }    => self.assign_add_vx_vy(x, y),
            OpCode::_8XY5 { x, y }    => self.assign_sub(x, x, y),
            OpCode::_8XY6 { x, y }    => self.assign_vx_shifted_r(x, y),
            OpCode::_8XY7 { x, y }    => self.assign_sub(x, y, x),
            OpCode::_8XYE { x, y }    => self.assign_vx_shifted_l(x, y),
            OpCode::_9XY0 { x, y }    => self.skip_if(self.v[x as usize] != self.v[y as usize]),
            OpCode::_ANNN { nnn }     => self.assign_i_nnn(nnn),
            OpCode::_BNNN { nnn }     => self.jump_to(nnn + self.v[0] as u16),
            OpCode::_CXNN { x, nn }   => self.assign_vx_random_and_nn(x, nn),
            OpCode::_DXYN { x, y, n } => self.draw_n_at_vx_vy(x, y, n),
            OpCode::_EX9E { x }       => self.skip_if(self.is_pressed(self.v[x as usize])),
            OpCode::_EXA1 { x }       => self.skip_if(!self.is_pressed(self.v[x as usize])),
            OpCode::_FX07 { x }       => self.assign_vx_delay_t(x),
            OpCode::_FX0A { x }       => self.assign_vx_wait_for_key(x),
            OpCode::_FX15 { x }       => self.assign_delay_t_vx(x),
            OpCode::_FX18 { x }       => self.assign_sound_t_vx(x),
            OpCode::_FX1E { x }       => self.assign_add_i_vx(x),
            OpCode::_FX29 { x }       => self.assign_i_addr_of_sprite_vx(x),
            OpCode::_FX33 { x }       => self.assign_mem_at_i_bcd_of_vx(x),
            OpCode::_FX55 { x }       => self.assign_mem_at_i_v0_to_vx(x),
            OpCode::_FX65 { x }       => self.assign_v0_to_vx_mem_at_i(x),
        }
    }

    /// Machine language routines of the host cpu can't be run
    ///
    /// The whole `0NNN` word is reported, its top nibble is always zero.
    fn exec_ml_subroutine_at(&mut self, routine: u16) -> nb::Result<(), Error> {
        Err(nb::Error::Other(Error::UnsupportedOperation {
            opcode: routine & 0x0FFF,
            pc: self.pc,
        }))
    }

    fn clear_screen(&mut self) -> nb::Result<(), Error> {
        self.frame.clear();
        self.redraw = true;
        self.pc_increment();
        Ok(())
    }

    /// Resume right after the `2NNN` that entered the subroutine
    fn subroutine_return(&mut self) -> nb::Result<(), Error> {
        let addr = self
            .stack
            .pop()
            .ok_or(Error::StackUnderflow { pc: self.pc })?;
        self.pc = addr;
        self.pc_increment();
        Ok(())
    }

    fn jump_to(&mut self, addr: u16) -> nb::Result<(), Error> {
        self.pc = addr;
        Ok(())
    }

    fn exec_subroutine_at(&mut self, nnn: u16) -> nb::Result<(), Error> {
        let pc = self.pc;
        self.stack
            .push(pc)
            .map_err(|_| Error::StackOverflow { pc })?;
        self.pc = nnn;
        Ok(())
    }

    fn skip_if(&mut self, condition: bool) -> nb::Result<(), Error> {
        if condition {
            self.pc_increment();
        }
        self.pc_increment();
        Ok(())
    }

    fn assign_vx_nn(&mut self, x: u8, nn: u8) -> nb::Result<(), Error> {
        self.v[x as usize] = nn;
        self.pc_increment();
        Ok(())
    }

    /// Carry is not reported, VF stays untouched
    fn assign_add_vx_nn(&mut self, x: u8, nn: u8) -> nb::Result<(), Error> {
        self.v[x as usize] = self.v[x as usize].wrapping_add(nn);
        self.pc_increment();
        Ok(())
    }

    fn assign_vx_with<F>(&mut self, x: u8, y: u8, op: F) -> nb::Result<(), Error>
    where
        F: FnOnce(u8, u8) -> u8,
    {
        self.v[x as usize] = op(self.v[x as usize], self.v[y as usize]);
        self.pc_increment();
        Ok(())
    }

    fn assign_add_vx_vy(&mut self, x: u8, y: u8) -> nb::Result<(), Error> {
        let (value, carry) = self.v[x as usize].overflowing_add(self.v[y as usize]);
        self.v[VF] = carry as u8;
        self.v[x as usize] = value;
        self.pc_increment();
        Ok(())
    }

    /// VX = minuend - subtrahend, VF = 00 on borrow and 01 otherwise
    fn assign_sub(&mut self, x: u8, minuend: u8, subtrahend: u8) -> nb::Result<(), Error> {
        let (value, borrow) =
            self.v[minuend as usize].overflowing_sub(self.v[subtrahend as usize]);
        self.v[VF] = !borrow as u8;
        self.v[x as usize] = value;
        self.pc_increment();
        Ok(())
    }

    fn shift_source(&self, x: u8, y: u8) -> u8 {
        if self.quirks.shift_uses_vy {
            self.v[y as usize]
        } else {
            self.v[x as usize]
        }
    }

    fn assign_vx_shifted_r(&mut self, x: u8, y: u8) -> nb::Result<(), Error> {
        let source = self.shift_source(x, y);
        self.v[VF] = source & 0x01;
        self.v[x as usize] = source >> 1;
        self.pc_increment();
        Ok(())
    }

    fn assign_vx_shifted_l(&mut self, x: u8, y: u8) -> nb::Result<(), Error> {
        let source = self.shift_source(x, y);
        self.v[VF] = source >> 7;
        self.v[x as usize] = source << 1;
        self.pc_increment();
        Ok(())
    }

    fn assign_i_nnn(&mut self, nnn: u16) -> nb::Result<(), Error> {
        self.i = nnn;
        self.pc_increment();
        Ok(())
    }

    fn assign_vx_random_and_nn(&mut self, x: u8, nn: u8) -> nb::Result<(), Error> {
        self.v[x as usize] = self.ctx.gen_random() & nn;
        self.pc_increment();
        Ok(())
    }

    /// XOR `n` rows of sprite data from I onto the frame at (VX, VY)
    ///
    /// Cells are addressed row-major, so a sprite crossing the right edge
    /// continues on the next row. Cells past the bottom edge are dropped.
    fn draw_n_at_vx_vy(&mut self, x: u8, y: u8, n: u8) -> nb::Result<(), Error> {
        let origin = self.v[x as usize] as usize + self.v[y as usize] as usize * WIDTH;
        self.v[VF] = 0;
        for row in 0..n as usize {
            let sprite = self.read_byte(self.i as usize + row);
            let line = origin + row * WIDTH;
            for col in (0..8).filter(|col| sprite & (0x80 >> col) != 0) {
                if let Some(true) = self.frame.xor_cell(line + col, true) {
                    self.v[VF] = 1;
                }
            }
        }
        self.redraw = true;
        self.pc_increment();
        Ok(())
    }

    fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    fn assign_vx_delay_t(&mut self, x: u8) -> nb::Result<(), Error> {
        self.v[x as usize] = self.delay_timer.load();
        self.pc_increment();
        Ok(())
    }

    /// Keep the program counter in place until a key is down
    fn assign_vx_wait_for_key(&mut self, x: u8) -> nb::Result<(), Error> {
        let key = match self.keys.iter().position(|&pressed| pressed) {
            Some(key) => key as u8,
            None => return Err(nb::Error::WouldBlock),
        };
        self.v[x as usize] = key;
        self.pc_increment();
        Ok(())
    }

    fn assign_delay_t_vx(&mut self, x: u8) -> nb::Result<(), Error> {
        self.delay_timer.store(self.v[x as usize]);
        self.pc_increment();
        Ok(())
    }

    fn assign_sound_t_vx(&mut self, x: u8) -> nb::Result<(), Error> {
        self.sound_timer.store(self.v[x as usize]);
        self.pc_increment();
        Ok(())
    }

    /// VF reports I leaving the 12-bit address space, I itself wraps at 16 bits
    fn assign_add_i_vx(&mut self, x: u8) -> nb::Result<(), Error> {
        let sum = self.i as u32 + self.v[x as usize] as u32;
        self.v[VF] = (sum > 0x0FFF) as u8;
        self.i = sum as u16;
        self.pc_increment();
        Ok(())
    }

    /// Only the low nibble of VX selects the glyph
    fn assign_i_addr_of_sprite_vx(&mut self, x: u8) -> nb::Result<(), Error> {
        let digit = (self.v[x as usize] & 0x0F) as u16;
        self.i = GLYPHS_START + digit * GLYPH_HEIGHT;
        self.pc_increment();
        Ok(())
    }

    fn assign_mem_at_i_bcd_of_vx(&mut self, x: u8) -> nb::Result<(), Error> {
        let value = self.v[x as usize];
        let addr = self.i as usize;
        self.write_byte(addr, value / 100);
        self.write_byte(addr + 1, value / 10 % 10);
        self.write_byte(addr + 2, value % 10);
        self.pc_increment();
        Ok(())
    }

    fn assign_mem_at_i_v0_to_vx(&mut self, x: u8) -> nb::Result<(), Error> {
        for idx in 0..=x as usize {
            self.write_byte(self.i as usize + idx, self.v[idx]);
        }
        self.advance_i_after_transfer(x);
        self.pc_increment();
        Ok(())
    }

    fn assign_v0_to_vx_mem_at_i(&mut self, x: u8) -> nb::Result<(), Error> {
        for idx in 0..=x as usize {
            self.v[idx] = self.read_byte(self.i as usize + idx);
        }
        self.advance_i_after_transfer(x);
        self.pc_increment();
        Ok(())
    }

    fn advance_i_after_transfer(&mut self, x: u8) {
        if self.quirks.increment_index_on_bulk_transfer {
            self.i = self.i.wrapping_add(x as u16 + 1);
        }
    }
}
