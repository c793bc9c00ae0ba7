//! The CHIP-8 virtual machine and everything needed to drive it.

#[allow(clippy::module_inception)]
pub mod emulator;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod machine;
pub mod output;
pub mod quirks;
pub mod random;
pub mod runner;
pub mod timing;

pub use self::emulator::{Emulator, Status};
pub use self::runner::Runner;
