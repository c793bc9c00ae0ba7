/// A structure for splitting an instruction word
/// into the fields the decoder matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSplitter(u16);

impl BitSplitter {
    pub fn from_u16(value: u16) -> BitSplitter {
        BitSplitter(value)
    }

    /// Combine two bytes fetched from memory, high byte first.
    pub fn from_two_u8(high: u8, low: u8) -> BitSplitter {
        BitSplitter(((high as u16) << 8) | low as u16)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// The four nibbles, most significant first.
    /// For an opcode these are the family, `x`, `y` and `n`.
    pub fn as_four_u8(&self) -> (u8, u8, u8, u8) {
        (
            (self.0 >> 12) as u8 & 0xF,
            (self.0 >> 8) as u8 & 0xF,
            (self.0 >> 4) as u8 & 0xF,
            self.0 as u8 & 0xF,
        )
    }

    pub fn last_8_bits(&self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    pub fn last_12_bits(&self) -> u16 {
        self.0 & 0x0FFF
    }
}
