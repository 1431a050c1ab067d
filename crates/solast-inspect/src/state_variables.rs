// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! info/state-variables: every state variable with its contract and type.

use std::collections::HashMap;

use serde::Serialize;
use solast_ast::{NodeId, NodeRef};

use crate::detector::{Detector, DetectorType};

#[derive(Debug, Clone, Serialize)]
pub struct StateVariable {
    pub id: u32,
    pub contract: String,
    pub name: String,
    /// Empty when the type never resolved.
    pub type_string: String,
    pub type_identifier: String,
    pub visibility: &'static str,
    pub constant: bool,
    pub immutable: bool,
    pub line: u32,
}

#[derive(Debug, Default)]
pub struct StateVariableDetector {
    /// Contract names by id, gathered on enter.
    contracts: HashMap<NodeId, String>,
    found: Vec<StateVariable>,
}

impl StateVariableDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn variables(&self) -> &[StateVariable] {
        &self.found
    }
}

impl Detector for StateVariableDetector {
    fn name(&self) -> &str {
        "state_variables"
    }

    fn detector_type(&self) -> DetectorType {
        DetectorType::STATE_VARIABLES
    }

    fn enter(&mut self, node: NodeRef<'_>) -> bool {
        match node {
            NodeRef::Contract(c) => {
                self.contracts.insert(c.id, c.name.clone());
                false
            }
            NodeRef::SourceUnit(_) => true,
            _ => false,
        }
    }

    fn detect(&mut self, node: NodeRef<'_>) -> bool {
        match node {
            NodeRef::SourceUnit(_) | NodeRef::Contract(_) => true,
            NodeRef::Variable(v) if v.state_variable => {
                let (type_string, type_identifier) = match &v.type_description {
                    Some(td) => (td.type_string.clone(), td.type_identifier.clone()),
                    None => (String::new(), String::new()),
                };
                self.found.push(StateVariable {
                    id: v.id.0,
                    contract: self.contracts.get(&v.scope).cloned().unwrap_or_default(),
                    name: v.name.clone(),
                    type_string,
                    type_identifier,
                    visibility: v.visibility.as_str(),
                    constant: v.constant,
                    immutable: v.immutable,
                    line: v.src.line,
                });
                false
            }
            // state variables only sit directly under contracts
            _ => false,
        }
    }

    fn results(&self) -> serde_json::Value {
        serde_json::to_value(&self.found).unwrap_or_default()
    }

    fn reset(&mut self) {
        self.contracts.clear();
        self.found.clear();
    }
}
