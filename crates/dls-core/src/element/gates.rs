//! Pure combinational logic: n-ary gates and the two unary ops.

use crate::bitvalue::BitValue;
use crate::error::{SimError, SimResult};

use super::Maybe;

/// N-ary bitwise operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOp {
    And,
    Or,
    Xor,
    Nand,
    Nor,
    Xnor,
}

/// Single-input operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Buffer,
}

/// Fold `inputs` left-to-right through `op`'s bitwise combinator, then
/// apply the negation the `N`-prefixed variants carry. Any unset input
/// makes the result unset, matching a floating wire's propagation.
pub fn resolve_gate(op: GateOp, inputs: &[Maybe]) -> SimResult<Maybe> {
    if inputs.len() < 2 {
        return Err(SimError::BadInput(format!(
            "gate requires at least 2 inputs, got {}",
            inputs.len()
        )));
    }
    let mut values = Vec::with_capacity(inputs.len());
    for v in inputs {
        match v {
            Some(v) => values.push(v.clone()),
            None => return Ok(None),
        }
    }
    let mut acc = values[0].clone();
    for v in &values[1..] {
        acc = match op {
            GateOp::And | GateOp::Nand => acc.and(v)?,
            GateOp::Or | GateOp::Nor => acc.or(v)?,
            GateOp::Xor | GateOp::Xnor => acc.xor(v)?,
        };
    }
    let negate = matches!(op, GateOp::Nand | GateOp::Nor | GateOp::Xnor);
    Ok(Some(if negate { acc.not() } else { acc }))
}

pub fn resolve_unary(op: UnaryOp, input: Maybe) -> SimResult<Maybe> {
    Ok(input.map(|v| match op {
        UnaryOp::Not => v.not(),
        UnaryOp::Buffer => v,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> Maybe {
        Some(BitValue::from_binary_str(s).unwrap())
    }

    #[test]
    fn and_of_three_inputs() {
        let out = resolve_gate(GateOp::And, &[bits("1100"), bits("1010"), bits("1110")]).unwrap();
        assert_eq!(out, bits("1000"));
    }

    #[test]
    fn nand_negates_and() {
        let out = resolve_gate(GateOp::Nand, &[bits("1100"), bits("1010")]).unwrap();
        assert_eq!(out, bits("0111"));
    }

    #[test]
    fn xnor_negates_xor() {
        let out = resolve_gate(GateOp::Xnor, &[bits("1100"), bits("1010")]).unwrap();
        assert_eq!(out, bits("1001"));
    }

    #[test]
    fn any_unset_input_makes_output_unset() {
        let out = resolve_gate(GateOp::Or, &[bits("10"), None]).unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn buffer_passes_through_unset() {
        assert_eq!(resolve_unary(UnaryOp::Buffer, None).unwrap(), None);
    }

    #[test]
    fn not_unset_is_unset() {
        assert_eq!(resolve_unary(UnaryOp::Not, None).unwrap(), None);
    }
}
