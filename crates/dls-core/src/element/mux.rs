//! Selection and routing elements: mux, demux, decoder, priority
//! encoder, bit selector.

use crate::bitvalue::BitValue;
use crate::error::SimResult;

use super::{ceil_log2, Maybe};

fn select_index(select: &Maybe) -> Option<usize> {
    select.as_ref().map(|v| v.to_unsigned() as usize)
}

/// `out = data[select]`, or unset if `select` is unset, unresolved
/// data is unset, or `select` addresses past the end of `data`.
pub fn resolve_mux(data: &[Maybe], select: Maybe) -> SimResult<Maybe> {
    let Some(index) = select_index(&select) else {
        return Ok(None);
    };
    Ok(data.get(index).cloned().flatten())
}

/// Route `data` onto `out[select]`; every other output is driven low at
/// `data`'s width. Unset `select` leaves every output unset.
pub fn resolve_demux(
    output_count: usize,
    width: usize,
    data: Maybe,
    select: Maybe,
) -> SimResult<Vec<Maybe>> {
    let Some(index) = select_index(&select) else {
        return Ok(vec![None; output_count]);
    };
    let mut outputs = vec![Some(BitValue::low(width)); output_count];
    if let Some(slot) = outputs.get_mut(index) {
        *slot = data;
    }
    Ok(outputs)
}

/// One-hot decode: `out[value(input)]` is high, every other output low.
/// Unset input leaves every output unset.
pub fn resolve_decoder(input_width: usize, input: Maybe) -> SimResult<Vec<Maybe>> {
    let count = 1usize << input_width;
    let Some(index) = select_index(&input) else {
        return Ok(vec![None; count]);
    };
    let mut outputs = vec![Some(BitValue::low(1)); count];
    if let Some(slot) = outputs.get_mut(index) {
        *slot = Some(BitValue::high(1));
    }
    Ok(outputs)
}

/// Index of the highest-numbered asserted input, as a `ceil_log2(n)`-bit
/// value; unset (not merely zero) when `enable` is low, distinguishing
/// "no input selected" from "input zero selected". All zero when
/// enabled but no input is asserted.
pub fn resolve_priority_encoder(data: &[Maybe], enable: Maybe) -> SimResult<Maybe> {
    let width = ceil_log2(data.len()).max(1);
    let enabled = enable
        .as_ref()
        .map(|v| v.to_unsigned() != 0)
        .unwrap_or(false);
    if !enabled {
        return Ok(None);
    }
    for (index, value) in data.iter().enumerate().rev() {
        if value.as_ref().map(|v| v.to_unsigned() != 0).unwrap_or(false) {
            return Ok(Some(BitValue::make(index as i128, Some(width))?));
        }
    }
    Ok(Some(BitValue::low(width)))
}

/// The single bit of `data` at MSB-first position `selector`.
pub fn resolve_bit_selector(data: Maybe, selector: Maybe) -> SimResult<Maybe> {
    let (Some(data), Some(selector)) = (data, selector) else {
        return Ok(None);
    };
    let index = selector.to_unsigned() as usize;
    let bit = data.bit(index)?;
    Ok(Some(BitValue::make(bit as i128, Some(1))?))
}
