// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Contract signature projection.
//!
//! The flattened function/event shape that standard-compliance checks
//! compare against their templates.

use crate::decl::{ContractDefinition, FunctionKind, ParameterList, SourceUnit};

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContractSignature {
    pub name: String,
    pub functions: Vec<FunctionSignature>,
    pub events: Vec<EventSignature>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionSignature {
    pub name: String,
    pub inputs: Vec<SignatureParameter>,
    pub outputs: Vec<SignatureParameter>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventSignature {
    pub name: String,
    pub inputs: Vec<SignatureParameter>,
}

/// One parameter: its type string (empty when the type is unknown) and,
/// for events, whether it is indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignatureParameter {
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub type_string: String,
    pub indexed: bool,
}

impl FunctionSignature {
    /// Canonical `name(type,type)` form.
    pub fn selector_text(&self) -> String {
        let types: Vec<&str> = self.inputs.iter().map(|p| p.type_string.as_str()).collect();
        format!("{}({})", self.name, types.join(","))
    }
}

fn parameters(list: &ParameterList) -> Vec<SignatureParameter> {
    list.parameters
        .iter()
        .map(|p| SignatureParameter {
            type_string: p.type_string().unwrap_or_default().to_string(),
            indexed: p.indexed,
        })
        .collect()
}

impl From<&ContractDefinition> for ContractSignature {
    fn from(contract: &ContractDefinition) -> Self {
        let functions = contract
            .functions()
            .filter(|f| f.kind == FunctionKind::Function)
            .map(|f| FunctionSignature {
                name: f.name.clone(),
                inputs: parameters(&f.parameters),
                outputs: parameters(&f.return_parameters),
            })
            .collect();
        let events = contract
            .events()
            .map(|e| EventSignature { name: e.name.clone(), inputs: parameters(&e.parameters) })
            .collect();
        ContractSignature { name: contract.name.clone(), functions, events }
    }
}

impl ContractDefinition {
    pub fn signature(&self) -> ContractSignature {
        ContractSignature::from(self)
    }
}

impl SourceUnit {
    /// One signature per contract, in source order.
    pub fn signatures(&self) -> Vec<ContractSignature> {
        self.contracts().map(ContractSignature::from).collect()
    }
}
