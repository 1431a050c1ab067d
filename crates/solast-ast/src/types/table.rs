// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Structure behind composite type identifiers.

use std::collections::HashMap;

use super::TypeDescription;
use crate::NodeId;

/// What a composite or declared type is made of.
#[derive(Debug, Clone, PartialEq)]
pub enum Composite {
    Mapping { key: TypeDescription, value: TypeDescription },
    Array { base: TypeDescription },
    Function { parameters: Vec<TypeDescription>, returns: Vec<TypeDescription> },
    Tuple { components: Vec<Option<TypeDescription>> },
    Declared { declaration: NodeId, kind: DeclaredKind },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredKind {
    Contract,
    Struct,
    Enum,
    UserDefinedValueType,
}

/// Identifier → structure lookup, filled in as type descriptions are made.
///
/// Lets later passes type an index access or a call result from a
/// [`TypeDescription`] alone.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    composites: HashMap<String, Composite>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, td: &TypeDescription, composite: Composite) {
        self.composites.insert(td.type_identifier.clone(), composite);
    }

    pub fn get(&self, td: &TypeDescription) -> Option<&Composite> {
        self.composites.get(&td.type_identifier)
    }

    pub fn len(&self) -> usize {
        self.composites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.composites.is_empty()
    }

    /// Element type produced by indexing a value of type `td`.
    pub fn index_result(&self, td: &TypeDescription) -> Option<TypeDescription> {
        match self.get(td) {
            Some(Composite::Mapping { value, .. }) => Some(value.clone()),
            Some(Composite::Array { base }) => Some(base.clone()),
            _ if td.is_byte_array() => Some(TypeDescription::elementary("bytes1")),
            _ => None,
        }
    }

    /// Result type of calling a value of type `td`, when `td` is a
    /// function type: its single return, or a tuple of all returns.
    pub fn call_result(&self, td: &TypeDescription) -> Option<TypeDescription> {
        match self.get(td) {
            Some(Composite::Function { returns, .. }) => Some(match returns.as_slice() {
                [single] => single.clone(),
                many => TypeDescription::tuple(&many.iter().cloned().map(Some).collect::<Vec<_>>()),
            }),
            _ => None,
        }
    }

    /// Declaration behind a contract, struct, enum or value-type type.
    pub fn declaration_of(&self, td: &TypeDescription) -> Option<(NodeId, DeclaredKind)> {
        match self.get(td) {
            Some(Composite::Declared { declaration, kind }) => Some((*declaration, *kind)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexing_a_mapping_yields_its_value_type() {
        let key = TypeDescription::elementary("address");
        let value = TypeDescription::elementary("uint256");
        let mapping = TypeDescription::mapping("address", &key, "uint256", &value);
        let mut table = TypeTable::new();
        table.insert(&mapping, Composite::Mapping { key, value: value.clone() });
        assert_eq!(table.index_result(&mapping), Some(value));
    }

    #[test]
    fn indexing_bytes_yields_a_byte() {
        let table = TypeTable::new();
        let td = table.index_result(&TypeDescription::elementary("bytes32"));
        assert_eq!(td.map(|t| t.type_identifier), Some("t_bytes1".to_string()));
    }

    #[test]
    fn call_results() {
        let mut table = TypeTable::new();
        let uint = TypeDescription::elementary("uint256");
        let f = TypeDescription::function("internal", Default::default(), &[], &[uint.clone()]);
        table.insert(&f, Composite::Function { parameters: vec![], returns: vec![uint.clone()] });
        assert_eq!(table.call_result(&f), Some(uint));

        let g = TypeDescription::function("internal", Default::default(), &[], &[]);
        table.insert(&g, Composite::Function { parameters: vec![], returns: vec![] });
        assert_eq!(table.call_result(&g), Some(TypeDescription::empty_tuple()));
    }
}
