//! Arithmetic elements: the ripple adder and the control-selected ALU.

use crate::bitvalue::BitValue;
use crate::error::SimResult;

use super::Maybe;

/// `sum = a + b + carry_in` at `a`'s width, plus the carry out of the
/// top bit. Any unset operand makes both outputs unset.
pub fn resolve_adder(a: Maybe, b: Maybe, carry_in: Maybe) -> SimResult<(Maybe, Maybe)> {
    let (Some(a), Some(b), Some(cin)) = (a, b, carry_in) else {
        return Ok((None, None));
    };
    let width = a.width();
    let full = a.to_unsigned() + b.to_unsigned() + cin.to_unsigned();
    let mask: u128 = if width >= 128 { u128::MAX } else { (1u128 << width) - 1 };
    let sum = BitValue::make((full & mask) as i128, Some(width))?;
    let carry = if full > mask { 1 } else { 0 };
    Ok((Some(sum), Some(BitValue::make(carry, Some(1))?)))
}

/// The 3-bit control codes the ALU recognizes, named for the operation
/// each drives rather than their numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluOp {
    And,
    Or,
    Add,
    AndNot,
    OrNot,
    Subtract,
    LessThan,
    Unknown,
}

impl AluOp {
    fn from_control(control: &BitValue) -> Self {
        match control.to_unsigned() & 0b111 {
            0b000 => AluOp::And,
            0b001 => AluOp::Or,
            0b010 => AluOp::Add,
            0b100 => AluOp::AndNot,
            0b101 => AluOp::OrNot,
            0b110 => AluOp::Subtract,
            0b111 => AluOp::LessThan,
            _ => AluOp::Unknown,
        }
    }
}

/// `control`'s low 3 bits select the operation applied to `a` and `b`:
/// `000` A&B, `001` A|B, `010` A+B (with carry), `100` A & ~B, `101`
/// A | ~B, `110` A − B, `111` A < B unsigned; any other code (011 or
/// any bit above position 2) drives the result low with carry clear.
/// Any unset operand makes both outputs unset.
pub fn resolve_alu(a: Maybe, b: Maybe, control: Maybe) -> SimResult<(Maybe, Maybe)> {
    let (Some(a), Some(b), Some(control)) = (a, b, control) else {
        return Ok((None, None));
    };
    let width = a.width();
    let op = AluOp::from_control(&control);
    let mask: u128 = if width >= 128 { u128::MAX } else { (1u128 << width) - 1 };
    let (result, carry) = match op {
        AluOp::And => (a.to_unsigned() & b.to_unsigned(), 0),
        AluOp::Or => (a.to_unsigned() | b.to_unsigned(), 0),
        AluOp::Add => {
            let full = a.to_unsigned() + b.to_unsigned();
            (full & mask, if full > mask { 1 } else { 0 })
        }
        AluOp::AndNot => (a.to_unsigned() & !b.to_unsigned() & mask, 0),
        AluOp::OrNot => ((a.to_unsigned() | (!b.to_unsigned() & mask)) & mask, 0),
        AluOp::Subtract => {
            let full = a.to_unsigned().wrapping_sub(b.to_unsigned());
            (full & mask, if a.to_unsigned() < b.to_unsigned() { 1 } else { 0 })
        }
        AluOp::LessThan => {
            let bit = if a.to_unsigned() < b.to_unsigned() { 1 } else { 0 };
            (bit, 0)
        }
        AluOp::Unknown => (0, 0),
    };
    Ok((
        Some(BitValue::make(result as i128, Some(width))?),
        Some(BitValue::make(carry, Some(1))?),
    ))
}
