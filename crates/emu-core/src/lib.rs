//! Bus and memory abstractions for the 6502 core.
//!
//! The CPU sees the outside world as 8-bit data at 16-bit addresses and
//! nothing else. Concrete buses own the backing memory regions and decide
//! the address map; the CPU borrows the bus for the duration of each call.

mod bus;
mod ram;

pub use bus::{Bus, FlatBus, NesBus};
pub use ram::Ram;

/// NMI vector location ($FFFA/$FFFB, little-endian).
pub const NMI_VECTOR: u16 = 0xFFFA;

/// RESET vector location ($FFFC/$FFFD).
pub const RESET_VECTOR: u16 = 0xFFFC;

/// IRQ/BRK vector location ($FFFE/$FFFF).
pub const IRQ_VECTOR: u16 = 0xFFFE;
