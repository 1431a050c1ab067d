// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The default symbol table.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

use solast_ast::{NodeId, TypeDescription};
use tracing::{debug, trace};

use crate::declaration::{Declaration, DeclarationKind};
use crate::error::ResolveError;
use crate::scope::{Scope, ScopeKey};
use crate::{Declare, Request, Resolution, Resolve};

/// Declarations of one source unit, grouped by scope.
///
/// Lookups search the requesting contract, then its bases (most derived
/// first), then file scope. Results are memoized until the next write.
#[derive(Debug, Default)]
pub struct DeclarationTable {
    declarations: Vec<Declaration>,
    by_id: HashMap<NodeId, usize>,
    scopes: HashMap<ScopeKey, Scope>,
    cache: RefCell<HashMap<(Option<NodeId>, String), Option<Resolution>>>,
}

impl DeclarationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: NodeId) -> Option<&Declaration> {
        self.by_id.get(&id).map(|&slot| &self.declarations[slot])
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Declarations in the order they were registered.
    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.iter()
    }

    /// `contract` followed by its bases, most derived first. Each contract
    /// appears once even in diamond hierarchies.
    pub fn linearize(&self, contract: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        self.linearize_into(contract, &mut order, &mut seen);
        order
    }

    fn linearize_into(&self, contract: NodeId, order: &mut Vec<NodeId>, seen: &mut HashSet<NodeId>) {
        if !seen.insert(contract) {
            return;
        }
        order.push(contract);
        if let Some(scope) = self.scopes.get(&ScopeKey::Node(contract)) {
            // the last base written is the most derived
            for &base in scope.bases.iter().rev() {
                self.linearize_into(base, order, seen);
            }
        }
    }

    fn invalidate(&self) {
        self.cache.borrow_mut().clear();
    }

    fn lookup_in(&self, key: ScopeKey, name: &str) -> Option<Resolution> {
        let slots = self.scopes.get(&key)?.lookup(name)?;
        Some(self.resolution_for(slots))
    }

    /// Overload sets resolve to their first member; a plain redeclaration
    /// shadows the earlier one.
    fn resolution_for(&self, slots: &[usize]) -> Resolution {
        let first = &self.declarations[slots[0]];
        let overloaded = slots.len() > 1 && first.kind.is_overloadable();
        let chosen = if overloaded {
            first
        } else {
            &self.declarations[slots[slots.len() - 1]]
        };
        Resolution {
            declaration: chosen.id,
            kind: chosen.kind,
            type_description: chosen.type_description.clone(),
            overloaded_declarations: if overloaded {
                slots.iter().map(|&s| self.declarations[s].id).collect()
            } else {
                Vec::new()
            },
        }
    }

    fn lookup_name(&self, name: &str, contract: Option<NodeId>) -> Option<Resolution> {
        if let Some(contract) = contract {
            for scope in self.linearize(contract) {
                if let Some(found) = self.lookup_in(ScopeKey::Node(scope), name) {
                    return Some(found);
                }
            }
        }
        self.lookup_in(ScopeKey::File, name)
    }

    fn lookup_path(&self, path: &str, contract: Option<NodeId>) -> Option<Resolution> {
        let mut segments = path.split('.');
        let first = segments.next()?;
        let mut current = self.lookup_name(first, contract)?;
        for segment in segments {
            current = self.resolve_member(current.declaration, segment)?;
        }
        Some(current)
    }
}

impl Resolve for DeclarationTable {
    fn resolve(&self, request: &Request<'_>) -> Option<Resolution> {
        let key = (request.contract, request.name.to_string());
        if let Some(cached) = self.cache.borrow().get(&key) {
            return cached.clone();
        }

        let found = self.lookup_path(request.name, request.contract);
        match &found {
            Some(resolution) => trace!(
                node = %request.node,
                name = request.name,
                declaration = %resolution.declaration,
                "resolved"
            ),
            None => debug!(node = %request.node, name = request.name, "no declaration found"),
        }
        self.cache.borrow_mut().insert(key, found.clone());
        found
    }

    fn resolve_member(&self, container: NodeId, member: &str) -> Option<Resolution> {
        let declaration = self.get(container)?;
        match declaration.kind {
            DeclarationKind::Contract => self
                .linearize(container)
                .into_iter()
                .find_map(|scope| self.lookup_in(ScopeKey::Node(scope), member)),
            kind if kind.has_members() => self.lookup_in(ScopeKey::Node(container), member),
            _ => None,
        }
    }
}

impl Declare for DeclarationTable {
    fn declare(&mut self, declaration: Declaration) -> Result<(), ResolveError> {
        if let Some(existing) = self.get(declaration.id) {
            return Err(ResolveError::AlreadyDeclared {
                id: declaration.id,
                name: existing.name.clone(),
            });
        }
        trace!(id = %declaration.id, name = %declaration.name, kind = ?declaration.kind, "declare");

        let slot = self.declarations.len();
        self.scopes.entry(declaration.scope_key()).or_default().bind(&declaration.name, slot);
        if declaration.kind.has_members() {
            self.scopes.entry(ScopeKey::Node(declaration.id)).or_default();
        }
        self.by_id.insert(declaration.id, slot);
        self.declarations.push(declaration);
        self.invalidate();
        Ok(())
    }

    fn declare_bases(&mut self, contract: NodeId, bases: Vec<NodeId>) -> Result<(), ResolveError> {
        let name = match self.get(contract) {
            Some(declaration) => declaration.name.clone(),
            None => return Err(ResolveError::UnknownDeclaration(contract)),
        };
        if bases.contains(&contract) {
            return Err(ResolveError::SelfInheritance { name });
        }
        self.scopes.entry(ScopeKey::Node(contract)).or_default().bases = bases;
        self.invalidate();
        Ok(())
    }

    fn update_type(&mut self, declaration: NodeId, type_description: TypeDescription) -> Result<(), ResolveError> {
        let slot = *self
            .by_id
            .get(&declaration)
            .ok_or(ResolveError::UnknownDeclaration(declaration))?;
        self.declarations[slot].type_description = Some(type_description);
        self.invalidate();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint() -> TypeDescription {
        TypeDescription::elementary("uint256")
    }

    fn request(name: &str, contract: Option<u32>) -> Request<'_> {
        Request::new(NodeId(999), name, contract.map(NodeId))
    }

    /// contract A { uint x; }  contract B is A { uint y; }  uint constant x = 1;
    fn hierarchy() -> DeclarationTable {
        let mut table = DeclarationTable::new();
        table.declare(Declaration::new(NodeId(1), "A", DeclarationKind::Contract, None)).unwrap();
        table
            .declare(Declaration::new(NodeId(2), "x", DeclarationKind::StateVariable, Some(NodeId(1))).with_type(Some(uint())))
            .unwrap();
        table.declare(Declaration::new(NodeId(3), "B", DeclarationKind::Contract, None)).unwrap();
        table
            .declare(Declaration::new(NodeId(4), "y", DeclarationKind::StateVariable, Some(NodeId(3))).with_type(Some(uint())))
            .unwrap();
        table.declare_bases(NodeId(3), vec![NodeId(1)]).unwrap();
        table.declare(Declaration::new(NodeId(5), "x", DeclarationKind::Variable, None)).unwrap();
        table
    }

    #[test]
    fn contract_scope_wins_over_file_scope() {
        let table = hierarchy();
        let found = table.resolve(&request("x", Some(1))).unwrap();
        assert_eq!(found.declaration, NodeId(2));
        assert_eq!(found.type_description, Some(uint()));

        let found = table.resolve(&request("x", None)).unwrap();
        assert_eq!(found.declaration, NodeId(5));
    }

    #[test]
    fn inherited_members_are_visible() {
        let table = hierarchy();
        assert_eq!(table.resolve(&request("x", Some(3))).unwrap().declaration, NodeId(2));
        assert_eq!(table.resolve(&request("y", Some(3))).unwrap().declaration, NodeId(4));
        assert!(table.resolve(&request("y", Some(1))).is_none());
    }

    #[test]
    fn last_base_is_most_derived() {
        let mut table = DeclarationTable::new();
        for (id, name) in [(1, "A"), (2, "B"), (3, "C")] {
            table.declare(Declaration::new(NodeId(id), name, DeclarationKind::Contract, None)).unwrap();
        }
        table.declare(Declaration::new(NodeId(10), "f", DeclarationKind::Function, Some(NodeId(1)))).unwrap();
        table.declare(Declaration::new(NodeId(11), "f", DeclarationKind::Function, Some(NodeId(2)))).unwrap();
        table.declare_bases(NodeId(3), vec![NodeId(1), NodeId(2)]).unwrap();

        assert_eq!(table.linearize(NodeId(3)), vec![NodeId(3), NodeId(2), NodeId(1)]);
        assert_eq!(table.resolve(&request("f", Some(3))).unwrap().declaration, NodeId(11));
    }

    #[test]
    fn overloads_are_reported() {
        let mut table = DeclarationTable::new();
        table.declare(Declaration::new(NodeId(1), "C", DeclarationKind::Contract, None)).unwrap();
        table.declare(Declaration::new(NodeId(2), "transfer", DeclarationKind::Function, Some(NodeId(1)))).unwrap();
        table.declare(Declaration::new(NodeId(3), "transfer", DeclarationKind::Function, Some(NodeId(1)))).unwrap();

        let found = table.resolve(&request("transfer", Some(1))).unwrap();
        assert_eq!(found.declaration, NodeId(2));
        assert_eq!(found.overloaded_declarations, vec![NodeId(2), NodeId(3)]);
    }

    #[test]
    fn redeclared_variable_shadows() {
        let mut table = DeclarationTable::new();
        table.declare(Declaration::new(NodeId(1), "v", DeclarationKind::Variable, None)).unwrap();
        table.declare(Declaration::new(NodeId(2), "v", DeclarationKind::Variable, None)).unwrap();
        let found = table.resolve(&request("v", None)).unwrap();
        assert_eq!(found.declaration, NodeId(2));
        assert!(found.overloaded_declarations.is_empty());
    }

    #[test]
    fn dotted_paths_walk_members() {
        let mut table = DeclarationTable::new();
        table.declare(Declaration::new(NodeId(1), "Lib", DeclarationKind::Contract, None)).unwrap();
        table.declare(Declaration::new(NodeId(2), "Point", DeclarationKind::Struct, Some(NodeId(1)))).unwrap();
        table.declare(Declaration::new(NodeId(3), "x", DeclarationKind::StructMember, Some(NodeId(2)))).unwrap();

        assert_eq!(table.resolve(&request("Lib.Point", None)).unwrap().declaration, NodeId(2));
        assert_eq!(table.resolve(&request("Lib.Point.x", None)).unwrap().declaration, NodeId(3));
        assert!(table.resolve(&request("Lib.Missing", None)).is_none());
    }

    #[test]
    fn enum_values_are_members() {
        let mut table = DeclarationTable::new();
        table.declare(Declaration::new(NodeId(1), "Color", DeclarationKind::Enum, None)).unwrap();
        table.declare(Declaration::new(NodeId(2), "Red", DeclarationKind::EnumValue, Some(NodeId(1)))).unwrap();
        assert_eq!(table.resolve_member(NodeId(1), "Red").unwrap().kind, DeclarationKind::EnumValue);
        assert!(table.resolve_member(NodeId(2), "Red").is_none());
    }

    #[test]
    fn later_declarations_invalidate_cached_misses() {
        let mut table = DeclarationTable::new();
        assert!(table.resolve(&request("Later", None)).is_none());
        table.declare(Declaration::new(NodeId(7), "Later", DeclarationKind::Struct, None)).unwrap();
        assert_eq!(table.resolve(&request("Later", None)).unwrap().declaration, NodeId(7));
    }

    #[test]
    fn update_type_is_visible_to_lookups() {
        let mut table = DeclarationTable::new();
        table.declare(Declaration::new(NodeId(1), "m", DeclarationKind::Variable, None)).unwrap();
        assert_eq!(table.resolve(&request("m", None)).unwrap().type_description, None);
        table.update_type(NodeId(1), uint()).unwrap();
        assert_eq!(table.resolve(&request("m", None)).unwrap().type_description, Some(uint()));
    }

    #[test]
    fn registration_errors() {
        let mut table = hierarchy();
        assert_eq!(
            table.declare(Declaration::new(NodeId(1), "Again", DeclarationKind::Contract, None)),
            Err(ResolveError::AlreadyDeclared { id: NodeId(1), name: "A".into() })
        );
        assert_eq!(
            table.update_type(NodeId(42), uint()),
            Err(ResolveError::UnknownDeclaration(NodeId(42)))
        );
        assert_eq!(
            table.declare_bases(NodeId(1), vec![NodeId(1)]),
            Err(ResolveError::SelfInheritance { name: "A".into() })
        );
    }

    #[test]
    fn cyclic_bases_terminate() {
        let mut table = hierarchy();
        table.declare_bases(NodeId(1), vec![NodeId(3)]).unwrap();
        assert_eq!(table.linearize(NodeId(3)), vec![NodeId(3), NodeId(1)]);
        assert!(table.resolve(&request("missing", Some(3))).is_none());
    }
}
