//! ROM and RAM: a flat array of fixed-width cells addressed by an
//! unsigned address bus, gated by chip-select/output-enable/write-enable
//! control lines. A control line that is unset counts as not asserted,
//! the same convention every other element in this module follows for
//! floating control inputs.

use crate::bitvalue::BitValue;
use crate::error::{SimError, SimResult};

use super::Maybe;

fn is_high(v: &Maybe) -> bool {
    v.as_ref().map(|b| b.to_unsigned() != 0).unwrap_or(false)
}

/// CS/OE/WE on ROM and RAM are active-low: output is null unless CS is
/// low and OE is low. An unset control line counts as not asserted,
/// same as every other floating control input.
fn is_asserted_low(v: &Maybe) -> bool {
    v.as_ref().map(|b| b.to_unsigned() == 0).unwrap_or(false)
}

/// Backing storage shared by the ROM and RAM elements.
#[derive(Debug, Clone)]
pub struct MemoryState {
    word_width: usize,
    cells: Vec<BitValue>,
}

impl MemoryState {
    pub fn new(address_width: usize, word_width: usize) -> Self {
        let capacity = 1usize << address_width;
        Self {
            word_width,
            cells: vec![BitValue::low(word_width); capacity],
        }
    }

    /// Preload contents (a ROM image), zero-padding if shorter than
    /// capacity and ignoring the remainder if longer.
    pub fn load(&mut self, data: &[BitValue]) {
        for (cell, value) in self.cells.iter_mut().zip(data) {
            *cell = value.clone();
        }
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn word_width(&self) -> usize {
        self.word_width
    }

    fn read(&self, address: usize) -> Maybe {
        self.cells.get(address).cloned()
    }

    fn write(&mut self, address: usize, value: BitValue) {
        if let Some(cell) = self.cells.get_mut(address) {
            *cell = value;
        }
    }

    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            *cell = BitValue::low(self.word_width);
        }
    }

    /// Direct-access read for `Circuit::read_memory`: `length` words
    /// starting at `address`. An out-of-range read is a warning, not a
    /// fault — any word past capacity reads as `None` rather than
    /// failing the whole call.
    pub fn read_range(&self, address: usize, length: usize) -> Vec<Maybe> {
        (address..address + length).map(|a| self.read(a)).collect()
    }

    /// Direct-access write for `Circuit::write_memory`: overwrites
    /// `words` starting at `address`, truncating/padding each to
    /// `word_width`. Words that land beyond capacity are dropped
    /// silently, logged as a warning rather than failing the call.
    pub fn write_many(&mut self, address: usize, words: &[BitValue]) -> SimResult<()> {
        for (offset, word) in words.iter().enumerate() {
            let resized = if word.width() < self.word_width {
                word.pad(self.word_width)?
            } else {
                word.truncate(self.word_width, true)?
            };
            self.write(address + offset, resized);
        }
        Ok(())
    }

    /// Loader-time preload from a single flat value: `value`'s width
    /// must be a multiple of `word_width`; words are extracted from the
    /// MSB end.
    pub fn initialize_from_bitvalue(&mut self, value: &BitValue) -> SimResult<()> {
        if value.width() % self.word_width != 0 {
            return Err(SimError::WidthMismatch {
                expected: self.word_width,
                found: value.width(),
            });
        }
        let count = value.width() / self.word_width;
        for i in 0..count {
            let start = i * self.word_width;
            let word = value.bit_slice(start, Some(start + self.word_width))?;
            if let Some(cell) = self.cells.get_mut(i) {
                *cell = word;
            }
        }
        Ok(())
    }
}

/// `data_out` is the addressed cell when both `cs` and `oe` are
/// asserted low, unset otherwise (including an unset address, or one
/// outside the memory's capacity).
pub fn resolve_rom(state: &MemoryState, address: Maybe, cs: Maybe, oe: Maybe) -> Maybe {
    if !is_asserted_low(&cs) || !is_asserted_low(&oe) {
        return None;
    }
    let address = address?;
    state.read(address.to_unsigned() as usize)
}

/// `reset` clears every cell to zero, independent of `cs`. Otherwise,
/// while `cs` is asserted low: a `we`-asserted-low write captures
/// `data_in` at the addressed cell first, then `data_out` reflects the
/// addressed cell if `oe` is asserted low. `cs` not asserted (or the
/// address unset or out of range) yields an unset `data_out`.
pub fn resolve_ram(
    state: &mut MemoryState,
    address: Maybe,
    data_in: Maybe,
    cs: Maybe,
    oe: Maybe,
    we: Maybe,
    reset: Maybe,
) -> Maybe {
    if is_high(&reset) {
        state.reset();
    }
    if !is_asserted_low(&cs) {
        return None;
    }
    let address = address?;
    let idx = address.to_unsigned() as usize;
    if is_asserted_low(&we) {
        if let Some(data) = data_in {
            state.write(idx, data);
        }
    }
    if is_asserted_low(&oe) {
        state.read(idx)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> Maybe {
        Some(BitValue::from_binary_str(s).unwrap())
    }

    #[test]
    fn rom_reads_preloaded_cell_when_selected_and_enabled() {
        let mut state = MemoryState::new(2, 4);
        state.load(&[BitValue::from_binary_str("1010").unwrap()]);
        // CS and OE are active-low: "0" asserts, "1" deasserts.
        let out = resolve_rom(&state, bits("00"), bits("0"), bits("0"));
        assert_eq!(out, bits("1010"));
    }

    #[test]
    fn rom_output_is_unset_without_output_enable() {
        let mut state = MemoryState::new(2, 4);
        state.load(&[BitValue::from_binary_str("1010").unwrap()]);
        let out = resolve_rom(&state, bits("00"), bits("0"), bits("1"));
        assert_eq!(out, None);
    }

    #[test]
    fn ram_write_then_read_round_trips() {
        let mut state = MemoryState::new(2, 2);
        resolve_ram(&mut state, bits("01"), bits("11"), bits("0"), bits("1"), bits("0"), bits("0"));
        let out = resolve_ram(&mut state, bits("01"), None, bits("0"), bits("0"), bits("1"), bits("0"));
        assert_eq!(out, bits("11"));
    }

    #[test]
    fn ram_reset_clears_all_cells() {
        let mut state = MemoryState::new(2, 2);
        resolve_ram(&mut state, bits("01"), bits("11"), bits("0"), bits("1"), bits("0"), bits("0"));
        resolve_ram(&mut state, bits("01"), None, bits("1"), bits("1"), bits("1"), bits("1"));
        let out = resolve_ram(&mut state, bits("01"), None, bits("0"), bits("0"), bits("1"), bits("0"));
        assert_eq!(out, bits("00"));
    }

    #[test]
    fn ram_deselected_chip_outputs_unset() {
        let mut state = MemoryState::new(2, 2);
        let out = resolve_ram(&mut state, bits("01"), None, bits("1"), bits("0"), bits("1"), bits("0"));
        assert_eq!(out, None);
    }

    #[test]
    fn read_range_reads_past_capacity_as_unset() {
        let mut state = MemoryState::new(2, 4);
        state.load(&[BitValue::from_binary_str("1010").unwrap(), BitValue::from_binary_str("0101").unwrap()]);
        // Capacity is 1<<2 = 4 cells; only cells 0 and 1 were loaded, so
        // cell 3 is zero-initialized and cell 4 is out of range.
        let out = state.read_range(3, 2);
        assert_eq!(out, vec![Some(BitValue::from_binary_str("0000").unwrap()), None]);
    }

    #[test]
    fn write_many_drops_words_past_capacity() {
        let mut state = MemoryState::new(2, 2);
        let words = vec![
            BitValue::from_binary_str("11").unwrap(),
            BitValue::from_binary_str("10").unwrap(),
        ];
        assert!(state.write_many(3, &words).is_ok());
        assert_eq!(state.read_range(3, 1), vec![Some(BitValue::from_binary_str("11").unwrap())]);
    }

    #[test]
    fn initialize_from_bitvalue_splits_msb_first() {
        let mut state = MemoryState::new(2, 4);
        let value = BitValue::from_binary_str("10100101").unwrap();
        state.initialize_from_bitvalue(&value).unwrap();
        assert_eq!(state.read_range(0, 2), vec![
            Some(BitValue::from_binary_str("1010").unwrap()),
            Some(BitValue::from_binary_str("0101").unwrap()),
        ]);
    }

    #[test]
    fn initialize_from_bitvalue_rejects_non_multiple_width() {
        let mut state = MemoryState::new(2, 4);
        let value = BitValue::from_binary_str("101").unwrap();
        assert!(matches!(state.initialize_from_bitvalue(&value), Err(SimError::WidthMismatch { .. })));
    }
}
