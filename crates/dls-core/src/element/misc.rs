//! Small stateless elements (tri-state buffer, controlled inverter) and
//! the two clock-driven stateful ones (random source, counter).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bitvalue::BitValue;
use crate::error::SimResult;

use super::Maybe;

fn is_high(v: &Maybe) -> bool {
    v.as_ref().map(|b| b.to_unsigned() != 0).unwrap_or(false)
}

/// `data` when `control` is high; high-impedance (`None`) otherwise, or
/// if `control` itself is unset.
pub fn resolve_tristate(data: Maybe, control: Maybe) -> SimResult<Maybe> {
    if control.is_none() {
        return Ok(None);
    }
    Ok(if is_high(&control) { data } else { None })
}

/// `not(data)` when `control` is high, `data` unchanged otherwise.
/// Unset `data` or `control` makes the output unset.
pub fn resolve_controlled_inverter(data: Maybe, control: Maybe) -> SimResult<Maybe> {
    let (Some(data), Some(control)) = (data, control) else {
        return Ok(None);
    };
    Ok(Some(if is_high(&Some(control)) { data.not() } else { data }))
}

/// "Make N copies": a single bit broadcast onto every position of a
/// `width`-bit output — `low(width)` when the input is 0, `high(width)`
/// when it is 1. Unset input leaves the output unset.
pub fn resolve_extend(data: Maybe, width: usize) -> SimResult<Maybe> {
    let Some(data) = data else {
        return Ok(None);
    };
    Ok(Some(if is_high(&Some(data)) {
        BitValue::high(width)
    } else {
        BitValue::low(width)
    }))
}

fn rising_edge(prev: &mut Option<bool>, current: Option<bool>) -> bool {
    let current = current.unwrap_or(false);
    let rose = matches!(*prev, Some(false) | None) && current;
    *prev = Some(current);
    rose
}

/// State for the [`super::ElementKind::Random`] element: samples a new
/// value uniformly from `[0, max_value]` on every clock rising edge.
#[derive(Debug, Clone)]
pub struct RandomState {
    seed: u64,
    max_value: u128,
    rng: StdRng,
    prev_clock: Option<bool>,
}

impl RandomState {
    pub fn new(seed: u64, max_value: u128) -> Self {
        Self {
            seed,
            max_value,
            rng: StdRng::seed_from_u64(seed),
            prev_clock: None,
        }
    }

    /// Record the clock input; returns whether a rising edge occurred.
    pub fn observe_clock(&mut self, clock: Option<bool>) -> bool {
        rising_edge(&mut self.prev_clock, clock)
    }

    pub fn sample(&mut self, width: usize) -> BitValue {
        let value = if self.max_value == 0 {
            0
        } else {
            self.rng.gen_range(0..=self.max_value)
        };
        BitValue::make(value as i128, Some(width)).unwrap_or_else(|_| BitValue::low(width))
    }

    pub fn reset(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
        self.prev_clock = None;
    }
}

/// State for the [`super::ElementKind::Counter`] element: increments
/// modulo `max_value + 1` on every clock rising edge, or synchronously
/// to zero while `reset` is held high.
#[derive(Debug, Clone)]
pub struct CounterState {
    max_value: u128,
    value: u128,
    prev_clock: Option<bool>,
}

impl CounterState {
    pub fn new(max_value: u128) -> Self {
        Self {
            max_value,
            value: 0,
            prev_clock: None,
        }
    }

    pub fn observe_clock(&mut self, clock: Option<bool>) -> bool {
        rising_edge(&mut self.prev_clock, clock)
    }

    /// Advance (or hold at zero under reset) and report the new value
    /// alongside a one-bit `zero` flag.
    pub fn advance(&mut self, reset_high: bool, width: usize) -> (BitValue, BitValue) {
        if reset_high {
            self.value = 0;
        } else if self.value >= self.max_value {
            self.value = 0;
        } else {
            self.value += 1;
        }
        let value = BitValue::make(self.value as i128, Some(width)).unwrap_or_else(|_| BitValue::low(width));
        let zero = BitValue::make(if self.value == 0 { 1 } else { 0 }, Some(1)).unwrap();
        (value, zero)
    }

    pub fn reset(&mut self) {
        self.value = 0;
        self.prev_clock = None;
    }
}
