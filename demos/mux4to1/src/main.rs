//! 4-to-1 multiplexer — binary entry point.
//!
//! Builds a `Mux { data_count: 4 }` element and runs it against the
//! select=10(binary) / data=[1,0,1,1] case, then sweeps every select
//! value for a full truth table.

use std::collections::HashMap;

use dls_core::element::{Element, ElementKind};
use dls_core::{BitValue, Circuit, RunShape, SimulationConfig};

fn build_mux4to1() -> Circuit {
    let mut circuit = Circuit::new(SimulationConfig::default());
    let data_buses: Vec<_> = (0..4).map(|_| circuit.buses_mut().create_bus(1)).collect();
    let select_bus = circuit.buses_mut().create_bus(2);
    let out_bus = circuit.buses_mut().create_bus(1);

    for (index, &bus) in data_buses.iter().enumerate() {
        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![bus]).with_label(format!("D{index}")))
            .expect("data input");
    }
    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![select_bus]).with_label("S"))
        .expect("select input");

    let mut mux_inputs = data_buses.clone();
    mux_inputs.push(select_bus);
    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::Mux { data_count: 4 }, mux_inputs, vec![out_bus]))
        .expect("mux element");

    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::OutputPort, vec![out_bus], vec![]).with_label("Y"))
        .expect("output Y");

    for index in 0..4 {
        circuit.declare_input(format!("D{index}"));
    }
    circuit.declare_input("S");
    circuit.declare_output("Y");
    circuit
}

fn bit(value: i128, width: usize) -> BitValue {
    BitValue::make(value, Some(width)).expect("literal fits width")
}

fn run_once(data: [i128; 4], select: i128) -> Option<u128> {
    let mut circuit = build_mux4to1();
    let mut inputs = HashMap::new();
    for (index, value) in data.iter().enumerate() {
        inputs.insert(format!("D{index}"), bit(*value, 1));
    }
    inputs.insert("S".to_string(), bit(select, 2));
    let result = circuit.run(RunShape::Labeled(inputs), None).expect("mux resolves");
    let RunShape::Labeled(outputs) = result.outputs else {
        unreachable!("labeled inputs yield labeled outputs")
    };
    outputs["Y"].as_ref().map(|v| v.to_unsigned())
}

fn main() {
    tracing_subscriber::fmt::init();

    let data = [1, 0, 1, 1];
    let select = 0b10;
    println!(
        "data={data:?} select={select:#04b} -> Y={:?}",
        run_once(data, select)
    );

    println!("full select sweep over data={data:?}:");
    for select in 0..4 {
        println!("  select={select:02b} -> Y={:?}", run_once(data, select));
    }
}
