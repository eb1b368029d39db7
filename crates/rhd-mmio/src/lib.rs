//! Register and VRAM access seams for the RadeonHD display engine.
//!
//! The display crates never touch a BAR mapping directly. Everything goes through:
//! - [`RegisterAccess`] for 32-bit MMIO registers (offsets relative to the register BAR), and
//! - [`VramAccess`] for byte writes into the framebuffer aperture (offsets relative to the start
//!   of VRAM as seen by the CPU).
//!
//! [`RegisterFile`] and [`VecVram`] are in-memory implementations. They back the unit/integration
//! tests and can also be used to dry-run a register sequence before touching hardware.
//! [`FbAllocator`] hands out chunks of the framebuffer aperture for driver-owned surfaces such as
//! the cursor images.

#![forbid(unsafe_code)]

mod alloc;
mod regs;
mod vram;

pub use alloc::{FbAllocError, FbAllocator, FB_CHUNK_ALIGN};
pub use regs::{RegisterAccess, RegisterFile, RegisterWrite};
pub use vram::{VecVram, VramAccess};
