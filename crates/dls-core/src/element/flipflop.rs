//! Clocked and level-sensitive storage elements: D/T/JK flip-flops, the
//! SR and D latches, and the plain edge-triggered register.
//!
//! Every clock input arrives already reduced to `Option<bool>` (`None`
//! meaning unset, never treated as an edge) by `Element::resolve`, so
//! edge detection here only has to compare against the previously
//! observed level.

use crate::bitvalue::BitValue;

use super::Maybe;

/// Which clock transition a flip-flop or register reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeTrigger {
    Positive,
    Negative,
}

/// D latch behavior. `AsShipped` is the default: rather than the
/// textbook transparent-while-high latch, it only captures `d` on
/// the clock's rising edge, matching the edge-triggered behavior the
/// original hardware this core emulates actually ships with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DLatchMode {
    Transparent,
    #[default]
    AsShipped,
}

fn is_high(v: &Maybe) -> bool {
    v.as_ref().map(|b| b.to_unsigned() != 0).unwrap_or(false)
}

fn clock_high(clock: Option<bool>) -> bool {
    clock.unwrap_or(false)
}

fn edge_fired(prev: &mut Option<bool>, clock: Option<bool>, edge: EdgeTrigger) -> bool {
    let current = clock_high(clock);
    let previous = prev.unwrap_or(false);
    let fired = match edge {
        EdgeTrigger::Positive => !previous && current,
        EdgeTrigger::Negative => previous && !current,
    };
    *prev = Some(current);
    fired
}

/// Shared state for D and T flip-flops: current `Q`, the preset value
/// `initialize`/synchronous reset restores, and the edge detector.
#[derive(Debug, Clone)]
pub struct FlipFlopState {
    pub edge: EdgeTrigger,
    q: Maybe,
    preset: Maybe,
    prev_clock: Option<bool>,
}

impl FlipFlopState {
    pub fn new(edge: EdgeTrigger) -> Self {
        Self {
            edge,
            q: None,
            preset: None,
            prev_clock: None,
        }
    }

    pub fn initialize(&mut self, value: BitValue) {
        self.preset = Some(value.clone());
        self.q = Some(value);
    }

    pub fn reset(&mut self) {
        self.q = self.preset.clone();
        self.prev_clock = None;
    }
}

/// `reset` wins every resolve regardless of the clock edge, driving `Q`
/// to the configured preset (or to unset, if none was ever given via
/// `initialize`). Otherwise, on the configured edge, `Q := d` if
/// `enable` is high.
pub fn resolve_d(
    state: &mut FlipFlopState,
    clock: Option<bool>,
    d: Maybe,
    enable: Maybe,
    reset: Maybe,
) -> (Maybe, Maybe) {
    let fired = edge_fired(&mut state.prev_clock, clock, state.edge);
    if is_high(&reset) {
        state.q = state.preset.clone();
    } else if fired && is_high(&enable) {
        state.q = d;
    }
    let qn = state.q.as_ref().map(|v| v.not());
    (state.q.clone(), qn)
}

/// Same reset contract as [`resolve_d`]; on the configured edge, when
/// `enable` is high, `Q := ¬t` — toggling when `t == Q` and holding
/// otherwise. This is the as-shipped T flip-flop contract, not a plain
/// toggle-on-high: `t` is compared against `Q` rather than gating
/// whether a toggle happens at all.
pub fn resolve_t(
    state: &mut FlipFlopState,
    clock: Option<bool>,
    t: Maybe,
    enable: Maybe,
    reset: Maybe,
) -> (Maybe, Maybe) {
    let fired = edge_fired(&mut state.prev_clock, clock, state.edge);
    if is_high(&reset) {
        state.q = state.preset.clone();
    } else if fired && is_high(&enable) {
        state.q = t.map(|v| v.not());
    }
    let qn = state.q.as_ref().map(|v| v.not());
    (state.q.clone(), qn)
}

/// State for the JK flip-flop: same shape as [`FlipFlopState`], kept
/// separate since JK has no `enable` input.
#[derive(Debug, Clone)]
pub struct JkState {
    q: Maybe,
    preset: Maybe,
    prev_clock: Option<bool>,
}

impl JkState {
    pub fn new() -> Self {
        Self {
            q: None,
            preset: None,
            prev_clock: None,
        }
    }

    pub fn initialize(&mut self, value: BitValue) {
        self.preset = Some(value.clone());
        self.q = Some(value);
    }

    pub fn reset(&mut self) {
        self.q = self.preset.clone();
        self.prev_clock = None;
    }
}

impl Default for JkState {
    fn default() -> Self {
        Self::new()
    }
}

/// On a positive clock edge: `00` holds, `10` sets, `01` clears, `11`
/// toggles. `reset` overrides every edge, as in [`resolve_d`].
pub fn resolve_jk(
    state: &mut JkState,
    clock: Option<bool>,
    j: Maybe,
    k: Maybe,
    reset: Maybe,
) -> (Maybe, Maybe) {
    let fired = edge_fired(&mut state.prev_clock, clock, EdgeTrigger::Positive);
    if is_high(&reset) {
        state.q = state.preset.clone();
    } else if fired {
        let (j, k) = (is_high(&j), is_high(&k));
        match (j, k) {
            (false, false) => {}
            (true, false) => state.q = Some(BitValue::high(1)),
            (false, true) => state.q = Some(BitValue::low(1)),
            (true, true) => state.q = state.q.take().map(|v| v.not()),
        }
    }
    let qn = state.q.as_ref().map(|v| v.not());
    (state.q.clone(), qn)
}

/// State for the level-sensitive SR latch, a strictly one-bit primitive.
#[derive(Debug, Clone, Default)]
pub struct LatchState {
    q: Maybe,
}

impl LatchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.q = None;
    }
}

/// `S=1,R=0` sets, `S=0,R=1` clears, `S=0,R=0` holds, and `S=1,R=1` also
/// holds (rather than racing to an undefined state).
pub fn resolve_sr(state: &mut LatchState, s: Maybe, r: Maybe) -> (Maybe, Maybe) {
    match (is_high(&s), is_high(&r)) {
        (true, false) => state.q = Some(BitValue::high(1)),
        (false, true) => state.q = Some(BitValue::low(1)),
        _ => {}
    }
    let qn = state.q.as_ref().map(|v| v.not());
    (state.q.clone(), qn)
}

/// State for the D latch: current `Q`, configured [`DLatchMode`], and
/// the edge detector `AsShipped` mode needs.
#[derive(Debug, Clone)]
pub struct DLatchState {
    pub mode: DLatchMode,
    q: Maybe,
    prev_clock: Option<bool>,
}

impl DLatchState {
    pub fn new(mode: DLatchMode) -> Self {
        Self {
            mode,
            q: None,
            prev_clock: None,
        }
    }

    pub fn reset(&mut self) {
        self.q = None;
        self.prev_clock = None;
    }
}

pub fn resolve_d_latch(state: &mut DLatchState, clock: Option<bool>, d: Maybe) -> (Maybe, Maybe) {
    let fired = edge_fired(&mut state.prev_clock, clock, EdgeTrigger::Positive);
    match state.mode {
        DLatchMode::Transparent => {
            if clock_high(clock) {
                state.q = d;
            }
        }
        DLatchMode::AsShipped => {
            // As-shipped quirk: the rising edge drives Q to the
            // *complement* of D, not D itself.
            if fired {
                state.q = d.map(|v| v.not());
            }
        }
    }
    let qn = state.q.as_ref().map(|v| v.not());
    (state.q.clone(), qn)
}

/// State for the plain edge-triggered register: no enable, no reset,
/// no complementary output.
#[derive(Debug, Clone)]
pub struct RegisterState {
    pub edge: EdgeTrigger,
    q: Maybe,
    prev_clock: Option<bool>,
}

impl RegisterState {
    pub fn new(edge: EdgeTrigger) -> Self {
        Self {
            edge,
            q: None,
            prev_clock: None,
        }
    }

    pub fn reset(&mut self) {
        self.q = None;
        self.prev_clock = None;
    }
}

pub fn resolve_register(state: &mut RegisterState, clock: Option<bool>, d: Maybe) -> Maybe {
    if edge_fired(&mut state.prev_clock, clock, state.edge) {
        state.q = d;
    }
    state.q.clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> Maybe {
        Some(BitValue::from_binary_str(s).unwrap())
    }

    #[test]
    fn d_flip_flop_captures_on_rising_edge_when_enabled() {
        let mut state = FlipFlopState::new(EdgeTrigger::Positive);
        let (q, _) = resolve_d(&mut state, Some(false), bits("1"), bits("1"), bits("0"));
        assert_eq!(q, None);
        let (q, qn) = resolve_d(&mut state, Some(true), bits("1"), bits("1"), bits("0"));
        assert_eq!(q, bits("1"));
        assert_eq!(qn, bits("0"));
    }

    #[test]
    fn d_flip_flop_ignores_d_when_disabled() {
        let mut state = FlipFlopState::new(EdgeTrigger::Positive);
        resolve_d(&mut state, Some(false), bits("1"), bits("1"), bits("0"));
        let (q, _) = resolve_d(&mut state, Some(true), bits("1"), bits("0"), bits("0"));
        assert_eq!(q, None);
    }

    #[test]
    fn d_flip_flop_reset_forces_preset_regardless_of_clock() {
        let mut state = FlipFlopState::new(EdgeTrigger::Positive);
        state.initialize(BitValue::low(1));
        resolve_d(&mut state, Some(false), bits("1"), bits("1"), bits("0"));
        let (q, _) = resolve_d(&mut state, Some(true), bits("1"), bits("1"), bits("1"));
        assert_eq!(q, bits("0"));
    }

    #[test]
    fn t_flip_flop_drives_q_to_complement_of_t_on_rising_edge() {
        let mut state = FlipFlopState::new(EdgeTrigger::Positive);
        state.initialize(BitValue::low(1));
        // D(=t)=0, Q=0 -> spec gives Q=1 (toggle, since t == q).
        resolve_t(&mut state, Some(false), bits("0"), bits("1"), bits("0"));
        let (q, _) = resolve_t(&mut state, Some(true), bits("0"), bits("1"), bits("0"));
        assert_eq!(q, bits("1"));

        // D(=t)=1, Q=0 -> spec gives Q=0 (hold, since t != q).
        resolve_t(&mut state, Some(false), bits("1"), bits("1"), bits("0"));
        let (q, _) = resolve_t(&mut state, Some(true), bits("1"), bits("1"), bits("0"));
        assert_eq!(q, bits("0"));
    }

    #[test]
    fn jk_toggles_on_eleven() {
        let mut state = JkState::new();
        state.initialize(BitValue::low(1));
        resolve_jk(&mut state, Some(false), bits("1"), bits("1"), bits("0"));
        let (q, _) = resolve_jk(&mut state, Some(true), bits("1"), bits("1"), bits("0"));
        assert_eq!(q, bits("1"));
    }

    #[test]
    fn sr_latch_double_assert_holds() {
        let mut state = LatchState::new();
        resolve_sr(&mut state, bits("1"), bits("0"));
        let (q, _) = resolve_sr(&mut state, bits("1"), bits("1"));
        assert_eq!(q, bits("1"));
    }

    #[test]
    fn d_latch_as_shipped_only_updates_on_rising_edge() {
        let mut state = DLatchState::new(DLatchMode::AsShipped);
        let (q, _) = resolve_d_latch(&mut state, Some(true), bits("1"));
        assert_eq!(q, None, "level-high with no prior edge must not be transparent");
        resolve_d_latch(&mut state, Some(false), bits("1"));
        let (q, _) = resolve_d_latch(&mut state, Some(true), bits("1"));
        assert_eq!(q, bits("0"), "as-shipped quirk drives Q to the complement of D");
    }

    #[test]
    fn d_latch_transparent_tracks_d_whenever_clock_high() {
        let mut state = DLatchState::new(DLatchMode::Transparent);
        let (q, _) = resolve_d_latch(&mut state, Some(true), bits("1"));
        assert_eq!(q, bits("1"));
        let (q, _) = resolve_d_latch(&mut state, Some(true), bits("0"));
        assert_eq!(q, bits("0"));
    }

    #[test]
    fn register_captures_on_edge_only() {
        let mut state = RegisterState::new(EdgeTrigger::Positive);
        resolve_register(&mut state, Some(false), bits("1"));
        let held_low = resolve_register(&mut state, Some(false), bits("1"));
        assert_eq!(held_low, None);
        let captured = resolve_register(&mut state, Some(true), bits("1"));
        assert_eq!(captured, bits("1"));
    }
}
