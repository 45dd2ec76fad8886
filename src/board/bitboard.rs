//! Bitboard implementation for fast stone iteration

/// Occupancy bitboard sized for one board.
///
/// Uses `ceil(cells / 64)` words, so the same type serves 19x19 (6 words)
/// up to 49x49 (38 words).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitboard {
    bits: Vec<u64>,
    cells: usize,
}

impl Bitboard {
    /// Create empty bitboard covering `cells` cells
    pub fn new(cells: usize) -> Self {
        Self {
            bits: vec![0; cells.div_ceil(64)],
            cells,
        }
    }

    /// Set a bit at index
    #[inline]
    pub fn set(&mut self, idx: usize) {
        self.bits[idx / 64] |= 1u64 << (idx % 64);
    }

    /// Clear a bit at index
    #[inline]
    pub fn clear(&mut self, idx: usize) {
        self.bits[idx / 64] &= !(1u64 << (idx % 64));
    }

    /// Check if bit is set at index
    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        (self.bits[idx / 64] >> (idx % 64)) & 1 == 1
    }

    /// Count total set bits (popcount)
    #[inline]
    pub fn count(&self) -> u32 {
        self.bits.iter().map(|b| b.count_ones()).sum()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&b| b == 0)
    }

    /// Iterate over set bit indices in ascending order
    pub fn iter_ones(&self) -> BitboardIter<'_> {
        BitboardIter {
            bits: &self.bits,
            cells: self.cells,
            word_idx: 0,
            current_word: self.bits.first().copied().unwrap_or(0),
        }
    }
}

/// Iterator over set bits in a Bitboard
pub struct BitboardIter<'a> {
    bits: &'a [u64],
    cells: usize,
    word_idx: usize,
    current_word: u64,
}

impl Iterator for BitboardIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.current_word == 0 {
            self.word_idx += 1;
            if self.word_idx >= self.bits.len() {
                return None;
            }
            self.current_word = self.bits[self.word_idx];
        }

        let bit_pos = self.current_word.trailing_zeros() as usize;
        let idx = self.word_idx * 64 + bit_pos;

        // Clear the bit we just found
        self.current_word &= self.current_word - 1;

        if idx < self.cells {
            Some(idx)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitboard_word_count() {
        assert_eq!(Bitboard::new(361).bits.len(), 6);
        assert_eq!(Bitboard::new(49 * 49).bits.len(), 38);
    }

    #[test]
    fn test_bitboard_set_clear() {
        let mut bb = Bitboard::new(361);
        bb.set(0);
        bb.set(64);
        bb.set(360);
        assert!(bb.get(64));
        assert_eq!(bb.count(), 3);

        bb.clear(64);
        assert!(!bb.get(64));
        assert_eq!(bb.count(), 2);
    }

    #[test]
    fn test_bitboard_iter_ascending() {
        let mut bb = Bitboard::new(2401);
        for idx in [2400, 7, 130, 63] {
            bb.set(idx);
        }
        let ones: Vec<usize> = bb.iter_ones().collect();
        assert_eq!(ones, vec![7, 63, 130, 2400]);
    }

    #[test]
    fn test_bitboard_empty_iter() {
        let bb = Bitboard::new(361);
        assert!(bb.is_empty());
        assert_eq!(bb.iter_ones().count(), 0);
    }
}
