/// Externally assigned small integer block id; 0 is air.
pub type BlockId = u16;

pub const AIR: BlockId = 0;

/// Highest light level a cell can hold.
pub const MAX_LIGHT: u8 = 15;
