//! Context for accessing functionalities of platform that the chip-8 `Machine`
//! is emulated on.
//!
//! Display and keyboard are not part of the context: the platform polls
//! `Machine::take_frame` at its own refresh rate and pushes key changes through
//! `Machine::set_key`.

/// Trait aggregating platform functionalities
pub trait Context {
    /// Turn sound on
    ///
    /// Called by `tick_chip` after each cycle while the sound timer is nonzero
    fn sound_on(&mut self);
    /// Turn sound off
    ///
    /// Called by `tick_chip` after each cycle while the sound timer is zero, and
    /// by `Scheduler::stop`
    fn sound_off(&mut self);
    /// Generate random 8-bit number
    ///
    /// Called by `tick_chip` whenever requested by executing program
    fn gen_random(&mut self) -> u8;
}
