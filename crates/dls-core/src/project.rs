//! [`Project`]: a collection of [`Circuit`]s, indexed by both a stable
//! string id and a display name, the way a loader hands off a whole
//! file's worth of circuits to a client in one bundle.

use std::collections::HashMap;

use dls_log::{Loggable, Logger};

use crate::circuit::Circuit;
use crate::error::{SimError, SimResult};

/// Owns every [`Circuit`] a loader produced from one source file, keyed
/// by a loader-assigned stable id and a human-facing name.
pub struct Project {
    circuits: HashMap<String, Circuit>,
    name_index: HashMap<String, String>,
    logger: Option<Logger>,
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

impl Project {
    pub fn new() -> Self {
        Self {
            circuits: HashMap::new(),
            name_index: HashMap::new(),
            logger: None,
        }
    }

    /// Register `circuit` under `id`, with `name` as its lookup alias.
    /// A second circuit registered under an id already in use replaces
    /// the first (loaders re-registering on reload, not a fault case).
    pub fn add_circuit(&mut self, id: impl Into<String>, name: impl Into<String>, circuit: Circuit) {
        let id = id.into();
        self.name_index.insert(name.into(), id.clone());
        self.circuits.insert(id, circuit);
    }

    pub fn get_circuit_by_id(&self, id: &str) -> SimResult<&Circuit> {
        self.circuits
            .get(id)
            .ok_or_else(|| SimError::BadInput(id.to_string()))
    }

    pub fn get_circuit_by_id_mut(&mut self, id: &str) -> SimResult<&mut Circuit> {
        self.circuits
            .get_mut(id)
            .ok_or_else(|| SimError::BadInput(id.to_string()))
    }

    pub fn get_circuit_by_name(&self, name: &str) -> SimResult<&Circuit> {
        let id = self
            .name_index
            .get(name)
            .ok_or_else(|| SimError::BadInput(name.to_string()))?;
        self.get_circuit_by_id(id)
    }

    pub fn get_circuit_by_name_mut(&mut self, name: &str) -> SimResult<&mut Circuit> {
        let id = self
            .name_index
            .get(name)
            .cloned()
            .ok_or_else(|| SimError::BadInput(name.to_string()))?;
        self.get_circuit_by_id_mut(&id)
    }

    pub fn get_circuits(&self) -> impl Iterator<Item = &Circuit> {
        self.circuits.values()
    }

    pub fn circuit_ids(&self) -> impl Iterator<Item = &str> {
        self.circuits.keys().map(String::as_str)
    }
}

impl Loggable for Project {
    fn logger_slot(&mut self) -> &mut Option<Logger> {
        &mut self.logger
    }

    fn logger(&self) -> Option<&Logger> {
        self.logger.as_ref()
    }

    fn children_mut(&mut self) -> Vec<&mut dyn Loggable> {
        self.circuits.values_mut().map(|c| c as &mut dyn Loggable).collect()
    }
}
