//! Grid codec - index linearization and bit packing.
//!
//! Cell `i` lives in bit `i % 8` of byte `i / 8`, least significant bit first.
//! Cells are linearized row-major: `index(row, col) = row * width + col`.

/// Linear index of `(row, col)` in a grid of the given width.
///
/// Coordinates must already be in range; no wrapping is applied.
#[inline]
pub fn index(row: usize, col: usize, width: usize) -> usize {
    row * width + col
}

/// Number of bytes needed to pack `cells` cells at one bit each.
#[inline]
pub fn packed_len(cells: usize) -> usize {
    cells.div_ceil(8)
}

/// Read bit `n` of a packed buffer.
///
/// # Panics
/// Panics if `n >= buffer.len() * 8`.
#[inline]
pub fn bit_is_set(n: usize, buffer: &[u8]) -> bool {
    let byte = buffer[n / 8];
    let mask = 1u8 << (n % 8);
    (byte & mask) == mask
}

/// Write bit `n` of a packed buffer.
///
/// # Panics
/// Panics if `n >= buffer.len() * 8`.
#[inline]
pub fn set_bit(n: usize, buffer: &mut [u8], alive: bool) {
    let mask = 1u8 << (n % 8);
    if alive {
        buffer[n / 8] |= mask;
    } else {
        buffer[n / 8] &= !mask;
    }
}

/// Zero every bit at or past `cells` in the final byte.
///
/// Padding bits must never be read back as live cells.
pub fn clear_padding(buffer: &mut [u8], cells: usize) {
    let tail = cells % 8;
    if tail != 0 {
        if let Some(last) = buffer.get_mut(cells / 8) {
            *last &= (1u8 << tail) - 1;
        }
    }
    let full = packed_len(cells);
    if buffer.len() > full {
        buffer[full..].fill(0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_index_linearization() {
        assert_eq!(index(1, 1, 4), 5);
        for w in 1..16 {
            assert_eq!(index(0, 0, w), 0);
        }
    }

    #[test]
    fn test_row_end_adjacent_to_next_row_start() {
        let width = 7;
        for row in 0..5 {
            assert_eq!(index(row, width - 1, width) + 1, index(row + 1, 0, width));
        }
    }

    #[test]
    fn test_bit_order_lsb_first() {
        let buffer = [0b0000_0101u8, 0b1000_0000];
        assert!(bit_is_set(0, &buffer));
        assert!(!bit_is_set(1, &buffer));
        assert!(bit_is_set(2, &buffer));
        assert!(bit_is_set(15, &buffer));
        assert!(!bit_is_set(8, &buffer));
    }

    #[test]
    fn test_packed_len() {
        assert_eq!(packed_len(0), 0);
        assert_eq!(packed_len(1), 1);
        assert_eq!(packed_len(8), 1);
        assert_eq!(packed_len(9), 2);
        assert_eq!(packed_len(64 * 64), 512);
    }

    #[test]
    fn test_clear_padding() {
        let mut buffer = [0xFFu8, 0xFF];
        clear_padding(&mut buffer, 11);
        assert_eq!(buffer, [0xFF, 0b0000_0111]);

        // Exact multiple of 8 leaves the last byte alone
        let mut buffer = [0xFFu8, 0xFF];
        clear_padding(&mut buffer, 16);
        assert_eq!(buffer, [0xFF, 0xFF]);
    }

    #[test]
    #[should_panic]
    fn test_bit_is_set_out_of_range() {
        let buffer = [0u8; 2];
        bit_is_set(16, &buffer);
    }

    proptest! {
        #[test]
        fn prop_set_bit_touches_only_target(cells in 1usize..200, pick in any::<prop::sample::Index>()) {
            let mut buffer = vec![0u8; packed_len(cells)];
            let n = pick.index(cells);
            set_bit(n, &mut buffer, true);

            for i in 0..cells {
                prop_assert_eq!(bit_is_set(i, &buffer), i == n);
            }

            set_bit(n, &mut buffer, false);
            prop_assert!(buffer.iter().all(|&b| b == 0));
        }
    }
}
