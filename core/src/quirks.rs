#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// # Quirks
/// Historical behaviors that differ between Chip-8 interpreters.
///
/// Every flag defaults to `false`, which reproduces the commonly documented instruction table.
/// Programs written for a particular interpreter may depend on some of them.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Quirks {
    /// 8xy6 / 8xyE shift Vy into Vx rather than shifting Vx in place
    pub shift_uses_vy: bool,
    /// Fx1E sets VF when I + Vx leaves the 12-bit address space
    pub index_overflow_flag: bool,
    /// Fx55 / Fx65 leave I pointing just past the last register transferred
    pub load_store_increments_index: bool,
    /// Bnnn jumps to nnn + Vx (x being the high nibble of nnn) instead of nnn + V0
    pub jump_uses_vx: bool,
    /// 8xy1 / 8xy2 / 8xy3 clear VF
    pub logic_resets_vf: bool,
    /// 8xy4 - 8xyE compute Vx from the operands as they were and write VF afterwards, so the
    /// flag wins when Vx is VF
    pub flag_written_last: bool,
}

impl Quirks {
    /// Behavior of the CHIP-48 interpreter on HP-48 calculators, which most later
    /// interpreters copied
    pub fn chip48() -> Self {
        Quirks {
            shift_uses_vy: false,
            index_overflow_flag: false,
            load_store_increments_index: false,
            jump_uses_vx: true,
            logic_resets_vf: false,
            flag_written_last: true,
        }
    }

    /// Behavior of the original COSMAC VIP interpreter
    pub fn cosmac_vip() -> Self {
        Quirks {
            shift_uses_vy: true,
            index_overflow_flag: false,
            load_store_increments_index: true,
            jump_uses_vx: false,
            logic_resets_vf: true,
            flag_written_last: true,
        }
    }
}
