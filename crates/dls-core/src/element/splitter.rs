//! The bidirectional bus splitter: merges `narrow` buses into `wide`,
//! or splits `wide` into `narrow`, whichever side changed more recently.
//!
//! Unlike every other element, a splitter does not have a fixed input
//! side and output side — direction is decided fresh on every resolve
//! by comparing the wide bus's and the narrow buses' `last_update`
//! timestamps in the owning [`BusNet`], so it is not modeled with the
//! generic `Element::inputs`/`outputs` lists at all.
//!
//! Narrow-port ordering is reversed for loader compatibility: the first
//! (most-significant) slice of the wide bus is stored in `narrow[N-1]`,
//! not `narrow[0]`. A 4-bit wide value split `[2, 2]` yields `narrow[0]`
//! holding the *second* (least-significant) 2 bits and `narrow[1]`
//! holding the first.

use crate::bitvalue::BitValue;
use crate::bus::BusId;
use crate::element::ElementId;
use crate::error::{SimError, SimResult};

use super::Maybe;

/// Which direction a splitter last drove data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitterOp {
    /// Narrow buses were combined and written onto the wide bus.
    PropIn,
    /// The wide bus was split and written onto the narrow buses.
    PropOut,
}

/// A bidirectional splitter: the wide bus, its narrow buses stored in
/// the reversed-slice order described above, and the direction it last
/// resolved in.
#[derive(Debug, Clone)]
pub struct SplitterState {
    pub wide: BusId,
    pub narrow: Vec<BusId>,
    /// Bit width of each wide-bus slice, in natural (MSB-first) order —
    /// `split[i]` is the width of the slice that lands in
    /// `narrow[narrow.len() - 1 - i]`.
    pub split: Vec<usize>,
    pub last_op: SplitterOp,
}

impl SplitterState {
    pub fn new(wide: BusId, narrow: Vec<BusId>, split: Vec<usize>) -> Self {
        Self {
            wide,
            narrow,
            split,
            last_op: SplitterOp::PropOut,
        }
    }

    pub fn reset(&mut self) {
        self.last_op = SplitterOp::PropOut;
    }

    /// The declared width of narrow port `index`, converting from the
    /// reversed storage order back to `split`'s natural-slice order.
    fn declared_width(&self, index: usize) -> usize {
        self.split[self.narrow.len() - 1 - index]
    }
}

/// Folds two narrow-bus timestamps down to `min(a, b)`, matching
/// `t_narrow = min(narrow[i].last_update)`. `None` (never updated)
/// never wins over a real timestamp from another narrow bus.
fn earliest(a: Option<u64>, b: Option<u64>) -> Option<u64> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (Some(x), None) => Some(x),
        (None, Some(y)) => Some(y),
        (None, None) => None,
    }
}

/// Drive the side that changed more recently onto the other side; a
/// tie between the wide bus's and the narrow buses' timestamps is only
/// tolerated when the values already agree, and faults as
/// [`SimError::SplitterContention`] otherwise.
pub fn resolve_splitter(
    state: &mut SplitterState,
    buses: &mut crate::bus::BusNet,
    now: u64,
    element: ElementId,
) -> SimResult<()> {
    let wide_update = buses.last_update(state.wide)?;
    let mut narrow_update = None;
    for &n in &state.narrow {
        narrow_update = earliest(narrow_update, buses.last_update(n)?);
    }

    match (wide_update, narrow_update) {
        (None, None) => Ok(()),
        (Some(_), None) => propagate_out(state, buses, now),
        (None, Some(_)) => propagate_in(state, buses, now),
        (Some(w), Some(n)) if w > n => propagate_out(state, buses, now),
        (Some(w), Some(n)) if n > w => propagate_in(state, buses, now),
        (Some(w), Some(_)) => check_agreement(state, buses, element, w),
    }
}

fn propagate_out(state: &mut SplitterState, buses: &mut crate::bus::BusNet, now: u64) -> SimResult<()> {
    let wide_value = buses.value(state.wide)?.cloned();
    let Some(wide_value) = wide_value else {
        return Ok(());
    };
    let n = state.narrow.len();
    let mut offset = 0;
    for (i, &width) in state.split.iter().enumerate() {
        let segment = wide_value.bit_slice(offset, Some(offset + width))?;
        let narrow_bus = state.narrow[n - 1 - i];
        buses.set_value(narrow_bus, Some(segment), now)?;
        offset += width;
    }
    state.last_op = SplitterOp::PropOut;
    Ok(())
}

/// Combine every narrow bus's current value into a wide value, in the
/// reversed-slice order (`narrow[N-1]` contributes the most-significant
/// slice). Returns `None` (no-op, not an error) if any narrow bus is
/// unset. When `check_width` is set, a narrow value whose width
/// disagrees with its declared `split` width faults — this is only
/// enforced on the combine-into-wide path.
fn assemble_wide(
    state: &SplitterState,
    buses: &crate::bus::BusNet,
    check_width: bool,
) -> SimResult<Option<BitValue>> {
    let mut segments = Vec::with_capacity(state.narrow.len());
    for (index, &bus) in state.narrow.iter().enumerate() {
        let Some(value) = buses.value(bus)?.cloned() else {
            return Ok(None);
        };
        if check_width {
            let declared = state.declared_width(index);
            if value.width() != declared {
                return Err(SimError::WidthMismatch {
                    expected: declared,
                    found: value.width(),
                });
            }
        }
        segments.push(value);
    }
    segments.reverse();
    Ok(Some(BitValue::concat(&segments)))
}

fn propagate_in(state: &mut SplitterState, buses: &mut crate::bus::BusNet, now: u64) -> SimResult<()> {
    let Some(combined) = assemble_wide(state, buses, true)? else {
        return Ok(());
    };
    buses.set_value(state.wide, Some(combined), now)?;
    state.last_op = SplitterOp::PropIn;
    Ok(())
}

fn check_agreement(
    state: &SplitterState,
    buses: &crate::bus::BusNet,
    element: ElementId,
    timestamp: u64,
) -> SimResult<()> {
    let Some(combined) = assemble_wide(state, buses, false)? else {
        return Ok(());
    };
    let wide_value = buses.value(state.wide)?.cloned();
    match wide_value {
        Some(w) if w != combined => Err(SimError::SplitterContention { element, timestamp }),
        _ => Ok(()),
    }
}
