#![no_std]
pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod frame;
mod instructions;
pub mod machine;
pub mod opcode;
pub mod scheduler;
mod timer;

pub use builder::Builder;
pub use config::{Clock, Quirks};
pub use context::Context;
pub use error::{DecodeError, Error};
pub use frame::{Frame, FrameView, HEIGHT, WIDTH};
pub use machine::Machine;
pub use opcode::OpCode;
pub use scheduler::{Scheduler, Ticks};

#[cfg(feature = "embedded-graphics")]
pub use embedded_graphics;
