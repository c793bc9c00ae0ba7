/// Instruction behaviours that differ between historical CHIP-8 interpreters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quirks {
    /// 8XY6 and 8XYE shift VY into VX (COSMAC VIP). Otherwise VX is shifted in place.
    pub shift_reads_vy: bool,
    /// FX55 and FX65 leave I pointing just past the block they touched.
    pub load_store_advances_index: bool,
    /// FX1E sets VF when I moves past 0xFFF.
    pub index_overflow_sets_vf: bool,
}

impl Quirks {
    pub const COSMAC_VIP: Quirks = Quirks {
        shift_reads_vy: true,
        load_store_advances_index: true,
        index_overflow_sets_vf: false,
    };

    /// What most ROMs written for CHIP-48 and later interpreters expect.
    pub const MODERN: Quirks = Quirks {
        shift_reads_vy: false,
        load_store_advances_index: false,
        index_overflow_sets_vf: false,
    };
}

impl Default for Quirks {
    fn default() -> Self {
        Quirks::COSMAC_VIP
    }
}
