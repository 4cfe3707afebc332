//! RAM write-then-read — binary entry point.
//!
//! A 4×2-bit RAM: write "11" to address 01 with CS/WE asserted low,
//! then flip to a read (WE deasserted, OE asserted low) and confirm
//! the value round-trips, then reset and confirm the whole array reads
//! back zero.

use dls_core::element::{Element, ElementKind, MemoryState};
use dls_core::{BitValue, Circuit, SimulationConfig};

fn build_ram() -> Circuit {
    let mut circuit = Circuit::new(SimulationConfig::default());
    let addr = circuit.buses_mut().create_bus(2);
    let data_in = circuit.buses_mut().create_bus(2);
    let cs = circuit.buses_mut().create_bus(1);
    let oe = circuit.buses_mut().create_bus(1);
    let we = circuit.buses_mut().create_bus(1);
    let reset = circuit.buses_mut().create_bus(1);
    let data_out = circuit.buses_mut().create_bus(2);

    for (label, bus) in [("ADDR", addr), ("DIN", data_in), ("CS", cs), ("OE", oe), ("WE", we), ("RST", reset)] {
        let id = circuit.allocate_element_id();
        circuit
            .add_element(Element::new(id, ElementKind::InputPort, vec![], vec![bus]).with_label(label))
            .expect("ram control input");
    }

    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(
            id,
            ElementKind::Ram(MemoryState::new(2, 2)),
            vec![addr, data_in, cs, oe, we, reset],
            vec![data_out],
        ))
        .expect("ram element");

    let id = circuit.allocate_element_id();
    circuit
        .add_element(Element::new(id, ElementKind::OutputPort, vec![data_out], vec![]).with_label("DOUT"))
        .expect("data out tap");

    circuit
}

fn bit(v: i128, width: usize) -> BitValue {
    BitValue::make(v, Some(width)).unwrap()
}

fn show(circuit: &Circuit, label: &str) {
    let dout = circuit.labeled_output_value("DOUT").unwrap();
    println!("  {label}: DOUT={}", dout.map(|v| v.to_string()).unwrap_or_else(|| "?".into()));
}

fn main() {
    tracing_subscriber::fmt::init();

    let mut circuit = build_ram();

    println!("write 11 to address 01 (CS=0, WE=0)");
    circuit.set_labeled_input("ADDR", Some(bit(0b01, 2))).unwrap();
    circuit.set_labeled_input("DIN", Some(bit(0b11, 2))).unwrap();
    circuit.set_labeled_input("CS", Some(bit(0, 1))).unwrap();
    circuit.set_labeled_input("WE", Some(bit(0, 1))).unwrap();
    circuit.set_labeled_input("OE", Some(bit(1, 1))).unwrap();
    circuit.run_to_stability().expect("write settles");
    show(&circuit, "after write (OE deasserted, DOUT floats)");

    println!("switch to read (WE=1, OE=0, CS=0)");
    circuit.set_labeled_input("WE", Some(bit(1, 1))).unwrap();
    circuit.set_labeled_input("OE", Some(bit(0, 1))).unwrap();
    circuit.run_to_stability().expect("read settles");
    show(&circuit, "after read");

    println!("reset clears every cell");
    circuit.set_labeled_input("RST", Some(bit(1, 1))).unwrap();
    circuit.run_to_stability().expect("reset settles");
    show(&circuit, "after reset (same address)");
}
