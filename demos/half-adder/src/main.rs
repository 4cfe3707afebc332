//! Half-adder — binary entry point.
//!
//! Builds a two-gate circuit (A⊕B, A∧B) and runs it over all four input
//! combinations, printing the truth table.

use std::collections::HashMap;

use dls_core::element::{Element, ElementKind, GateOp};
use dls_core::{BitValue, Circuit, RunShape, SimulationConfig};

fn build_half_adder() -> Circuit {
    let mut circuit = Circuit::new(SimulationConfig::default());
    let bus_a = circuit.buses_mut().create_bus(1);
    let bus_b = circuit.buses_mut().create_bus(1);
    let bus_sum = circuit.buses_mut().create_bus(1);
    let bus_carry = circuit.buses_mut().create_bus(1);

    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![bus_a]).with_label("A"))
        .expect("input A");
    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![bus_b]).with_label("B"))
        .expect("input B");

    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::Gate(GateOp::Xor), vec![bus_a, bus_b], vec![bus_sum]))
        .expect("xor gate");
    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::Gate(GateOp::And), vec![bus_a, bus_b], vec![bus_carry]))
        .expect("and gate");

    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::OutputPort, vec![bus_sum], vec![]).with_label("Sum"))
        .expect("output Sum");
    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::OutputPort, vec![bus_carry], vec![]).with_label("Carry"))
        .expect("output Carry");

    circuit.declare_input("A");
    circuit.declare_input("B");
    circuit.declare_output("Sum");
    circuit.declare_output("Carry");
    circuit
}

fn bit(value: i128) -> BitValue {
    BitValue::make(value, Some(1)).expect("1-bit literal")
}

fn main() {
    tracing_subscriber::fmt::init();

    println!("A B | Sum Carry");
    for a in [0, 1] {
        for b in [0, 1] {
            let mut circuit = build_half_adder();
            let mut inputs = HashMap::new();
            inputs.insert("A".to_string(), bit(a));
            inputs.insert("B".to_string(), bit(b));
            let result = circuit.run(RunShape::Labeled(inputs), None).expect("half-adder resolves");
            let RunShape::Labeled(outputs) = result.outputs else {
                unreachable!("labeled inputs yield labeled outputs")
            };
            let sum = outputs["Sum"].as_ref().map(|v| v.to_unsigned()).unwrap_or(0);
            let carry = outputs["Carry"].as_ref().map(|v| v.to_unsigned()).unwrap_or(0);
            println!("{a} {b} |  {sum}    {carry}   (delay={})", result.propagation_delay);
        }
    }
}
