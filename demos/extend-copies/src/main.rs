//! "Make N copies" — binary entry point.
//!
//! A single input bit broadcast through an `Extend` element onto a
//! 4-bit output: input 0 → output "0000", input 1 → output "1111".

use std::collections::HashMap;

use dls_core::element::{Element, ElementKind};
use dls_core::{BitValue, Circuit, RunShape, SimulationConfig};

fn build_extend() -> Circuit {
    let mut circuit = Circuit::new(SimulationConfig::default());
    let bit_bus = circuit.buses_mut().create_bus(1);
    let out_bus = circuit.buses_mut().create_bus(4);

    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![bit_bus]).with_label("bit"))
        .expect("bit input");
    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::Extend, vec![bit_bus], vec![out_bus]))
        .expect("extend element");
    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::OutputPort, vec![out_bus], vec![]).with_label("out"))
        .expect("output tap");

    circuit.declare_input("bit");
    circuit.declare_output("out");
    circuit
}

fn bit(v: i128) -> BitValue {
    BitValue::make(v, Some(1)).unwrap()
}

fn main() {
    tracing_subscriber::fmt::init();

    for value in [0, 1] {
        let mut circuit = build_extend();
        let mut inputs = HashMap::new();
        inputs.insert("bit".to_string(), bit(value));
        let result = circuit.run(RunShape::Labeled(inputs), None).expect("extend resolves");
        let RunShape::Labeled(outputs) = result.outputs else {
            unreachable!("labeled inputs yield labeled outputs")
        };
        let out = outputs["out"].as_ref().map(|v| v.to_string()).unwrap_or_else(|| "?".into());
        println!("bit={value} -> out={out}");
    }
}
