//! test data shared between the sfnt crates.
//!
//! Fonts are built in code instead of being checked in, so every value a
//! test asserts on can be traced to [`sample_font`].

pub mod bebuffer;
pub mod cmap;
pub mod container;
pub mod glyf;
pub mod sample_font;
pub mod sfnt;

/// `(searchRange, entrySelector, rangeShift)` for `num_items` entries of
/// `item_size` bytes.
pub fn search_params(num_items: u16, item_size: u16) -> (u16, u16, u16) {
    let entry_selector = if num_items == 0 {
        0
    } else {
        (u16::BITS - 1 - num_items.leading_zeros()) as u16
    };
    let search_range = (1u16 << entry_selector) * item_size;
    (
        search_range,
        entry_selector,
        num_items * item_size - search_range,
    )
}

/// The wrapping sum of big-endian words, zero padding the final word.
pub fn checksum(data: &[u8]) -> u32 {
    data.chunks(4).fold(0u32, |sum, chunk| {
        let mut word = [0u8; 4];
        word[..chunk.len()].copy_from_slice(chunk);
        sum.wrapping_add(u32::from_be_bytes(word))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_params_for_eleven_tables() {
        assert_eq!(search_params(11, 16), (128, 3, 48));
        assert_eq!(search_params(1, 16), (16, 0, 0));
    }

    #[test]
    fn checksum_pads() {
        assert_eq!(checksum(&[0, 0, 0, 1, 2]), 0x02000001);
    }
}
