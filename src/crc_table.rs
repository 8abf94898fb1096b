//! CRC lookup table construction
//!
//! A table entry records the effect of pushing one byte through eight
//! polynomial-division steps, so the byte-at-a-time update in
//! [`crate::crc`] can replace its inner bit loop with a single lookup.
//! Construction is a pure function of the configuration: the table is
//! built once, owned by the CRC that requested it, and read-only from
//! then on.
use crate::bits::{reflect, BitOrder};
use crate::crc::CrcConfiguration;

/// Compute a single table entry for `index`.
///
/// This is the same division the bit-at-a-time algorithm performs,
/// run over one byte with no data coming in.  A CRC built without a
/// table calls this on the fly instead of indexing.
pub fn entry(configuration: &CrcConfiguration<'_>, index: u8) -> u64 {
    let width = configuration.width();

    match configuration.bit_order() {
        BitOrder::LSBFirst => {
            let poly = reflect(configuration.poly(), width);
            let mut crc = index as u64;
            for _ in 0..8 {
                crc = if crc & 1 == 1 { (crc >> 1) ^ poly } else { crc >> 1 };
            }

            crc
        }
        BitOrder::MSBFirst => {
            let poly = configuration.poly() << (64 - width);
            let mut crc = (index as u64) << 56;
            for _ in 0..8 {
                crc = if crc >> 63 == 1 { (crc << 1) ^ poly } else { crc << 1 };
            }

            crc
        }
    }
}

/// Build the 256-entry lookup table for a configuration.
pub fn build_table(configuration: &CrcConfiguration<'_>) -> [u64; 256] {
    let mut table = [0u64; 256];
    for (index, slot) in table.iter_mut().enumerate() {
        *slot = entry(configuration, index as u8);
    }

    table
}
