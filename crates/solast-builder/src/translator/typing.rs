// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Type derivation for declarations and expressions.
//!
//! Every rule here only fills a type that is still unknown; it never
//! replaces one that a translator or the resolver already set.

use solast_ast::decl::ParameterList;
use solast_ast::expr::{BinaryOperator, Expression, FunctionCall, FunctionCallKind, UnaryOperator};
use solast_ast::types::{Composite, DeclaredKind};
use solast_ast::{NodeId, NodeKind, StateMutability, TypeDescription};

use super::Translator;

/// Names the language provides without a declaration.
pub(super) fn is_builtin(name: &str) -> bool {
    matches!(
        name,
        "msg"
            | "block"
            | "tx"
            | "abi"
            | "this"
            | "super"
            | "now"
            | "require"
            | "assert"
            | "revert"
            | "selfdestruct"
            | "keccak256"
            | "sha256"
            | "ripemd160"
            | "ecrecover"
            | "addmod"
            | "mulmod"
            | "blockhash"
            | "gasleft"
    )
}

/// Type of a pseudo-global that no declaration can shadow. `this` is
/// handled by the caller since it needs the enclosing contract.
pub(super) fn pseudo_global_type(name: &str) -> Option<TypeDescription> {
    match name {
        "msg" => Some(TypeDescription::magic_message()),
        "block" => Some(TypeDescription::magic_block()),
        _ => None,
    }
}

/// Type of a global used only when no local or declaration has the name.
pub(super) fn fallback_global_type(name: &str) -> Option<TypeDescription> {
    match name {
        "tx" => Some(TypeDescription::new("t_magic_transaction", "tx")),
        "abi" => Some(TypeDescription::new("t_magic_abi", "abi")),
        "now" => Some(TypeDescription::elementary("uint256")),
        _ => None,
    }
}

fn bytes_memory() -> TypeDescription {
    TypeDescription::new("t_bytes_memory_ptr", "bytes memory")
}

/// Result type of calling a built-in function. Qualified names such as
/// `abi.encode` cover members of the magic globals.
pub(super) fn builtin_call_type(name: &str) -> Option<TypeDescription> {
    match name {
        "require" | "assert" | "revert" | "selfdestruct" => Some(TypeDescription::empty_tuple()),
        "keccak256" | "sha256" | "blockhash" => Some(TypeDescription::elementary("bytes32")),
        "ripemd160" => Some(TypeDescription::elementary("bytes20")),
        "ecrecover" => Some(TypeDescription::elementary("address")),
        "addmod" | "mulmod" | "gasleft" => Some(TypeDescription::elementary("uint256")),
        "abi.encode" | "abi.encodePacked" | "abi.encodeWithSelector" | "abi.encodeWithSignature" | "abi.encodeCall" => {
            Some(bytes_memory())
        }
        _ => None,
    }
}

/// Well-known members of `msg`, `block` and `tx`.
pub(super) fn magic_member(base: &TypeDescription, member: &str) -> Option<TypeDescription> {
    let elementary = |name: &str| Some(TypeDescription::elementary(name));
    match (base.type_identifier.as_str(), member) {
        ("t_magic_message", "sender") => elementary("address"),
        ("t_magic_message", "value") => elementary("uint256"),
        ("t_magic_message", "data") => Some(TypeDescription::new("t_bytes_calldata_ptr", "bytes calldata")),
        ("t_magic_message", "sig") => elementary("bytes4"),
        (
            "t_magic_block",
            "timestamp" | "number" | "chainid" | "basefee" | "gaslimit" | "difficulty" | "prevrandao",
        ) => elementary("uint256"),
        ("t_magic_block", "coinbase") => elementary("address payable"),
        ("t_magic_transaction", "origin") => elementary("address"),
        ("t_magic_transaction", "gasprice") => elementary("uint256"),
        _ => None,
    }
}

/// Literal operands adopt the type of the other side.
fn prefer_typed(left: Option<&TypeDescription>, right: Option<&TypeDescription>) -> Option<TypeDescription> {
    match (left, right) {
        (Some(l), Some(r)) if l.is_literal() && !r.is_literal() => Some(r.clone()),
        (l, r) => l.or(r).cloned(),
    }
}

pub(super) fn binary_type(
    operator: BinaryOperator,
    left: Option<&TypeDescription>,
    right: Option<&TypeDescription>,
) -> Option<TypeDescription> {
    if operator.yields_bool() {
        return Some(TypeDescription::boolean());
    }
    prefer_typed(left, right)
}

pub(super) fn unary_type(operator: UnaryOperator, operand: Option<&TypeDescription>) -> Option<TypeDescription> {
    match operator {
        UnaryOperator::Not => Some(TypeDescription::boolean()),
        UnaryOperator::Delete => Some(TypeDescription::empty_tuple()),
        _ => operand.cloned(),
    }
}

pub(super) fn conditional_type(
    when_true: Option<&TypeDescription>,
    when_false: Option<&TypeDescription>,
) -> Option<TypeDescription> {
    prefer_typed(when_true, when_false)
}

/// Tuple of the component types; a single parenthesized expression keeps
/// its own type.
pub(super) fn tuple_type(components: &[Option<Expression>]) -> Option<TypeDescription> {
    match components {
        [Some(single)] => single.type_description().cloned(),
        many => {
            let tds: Vec<Option<TypeDescription>> =
                many.iter().map(|c| c.as_ref().and_then(|e| e.type_description().cloned())).collect();
            Some(TypeDescription::tuple(&tds))
        }
    }
}

impl Translator<'_> {
    /// Function type of a declaration with the given parameter lists, or
    /// `None` while any parameter type is unknown.
    pub(super) fn function_type(
        &mut self,
        class: &str,
        mutability: StateMutability,
        parameters: &ParameterList,
        returns: Option<&ParameterList>,
    ) -> Option<TypeDescription> {
        let parameters = parameters.type_descriptions()?;
        let returns = match returns {
            Some(list) => list.type_descriptions()?,
            None => Vec::new(),
        };
        let td = TypeDescription::function(class, mutability, &parameters, &returns);
        self.types.insert(&td, Composite::Function { parameters, returns });
        Some(td)
    }

    /// Inline array `[a, b, c]`: a fixed array of the first typed element.
    pub(super) fn inline_array_type(&mut self, components: &[Option<Expression>]) -> Option<TypeDescription> {
        let elements: Vec<Option<&TypeDescription>> =
            components.iter().map(|c| c.as_ref().and_then(Expression::type_description)).collect();
        let base = elements.iter().copied().fold(None, |acc, td| prefer_typed(acc.as_ref(), td));
        let length = components.len().to_string();
        self.array_type(base.as_ref(), Some(&length))
    }

    pub(super) fn index_type(&self, base: Option<&TypeDescription>) -> Option<TypeDescription> {
        self.types.index_result(base?)
    }

    /// Type and declaration of `base.member`.
    pub(super) fn member_type(&self, base: &Expression, member: &str) -> (Option<TypeDescription>, Option<NodeId>) {
        let Some(td) = base.type_description() else {
            return (None, None);
        };
        if let Some(magic) = magic_member(td, member) {
            return (Some(magic), None);
        }
        if member == "length" && (matches!(self.types.get(td), Some(Composite::Array { .. })) || td.is_byte_array()) {
            return (Some(TypeDescription::elementary("uint256")), None);
        }
        if td.is_address() && member == "balance" {
            return (Some(TypeDescription::elementary("uint256")), None);
        }
        match self.types.declaration_of(td) {
            Some((declaration, DeclaredKind::UserDefinedValueType)) if member == "wrap" => (Some(td.clone()), Some(declaration)),
            Some((declaration, _)) => match self.resolver.resolve_member(declaration, member) {
                Some(found) => (found.type_description, Some(found.declaration)),
                None => (None, None),
            },
            None => (None, None),
        }
    }

    /// Classify a call and type its result from the callee.
    pub(super) fn type_call(&self, call: &mut FunctionCall) {
        let (kind, td) = self.call_shape(&call.expression);
        call.kind = kind;
        if call.type_description.is_none() {
            call.type_description = td;
        }
        if call.referenced_declaration.is_none() {
            call.referenced_declaration = call.expression.referenced_declaration();
        }
    }

    fn call_shape(&self, callee: &Expression) -> (FunctionCallKind, Option<TypeDescription>) {
        match callee {
            Expression::New(new) => return (FunctionCallKind::FunctionCall, new.type_description.clone()),
            Expression::Primary(p) if p.node_type == NodeKind::ElementaryTypeNameExpression => {
                return (FunctionCallKind::TypeConversion, p.type_description.clone());
            }
            Expression::FunctionCallOptions(options) => return self.call_shape(&options.expression),
            _ => {}
        }

        let Some(td) = callee.type_description() else {
            let builtin = match callee {
                Expression::Primary(p) if p.node_type == NodeKind::Identifier => builtin_call_type(&p.name),
                Expression::MemberAccess(m) => match &m.expression {
                    Expression::Primary(p) if p.name == "abi" => builtin_call_type(&format!("abi.{}", m.member_name)),
                    _ => None,
                },
                _ => None,
            };
            return (FunctionCallKind::FunctionCall, builtin);
        };

        match self.types.declaration_of(td) {
            Some((_, DeclaredKind::Struct)) => (FunctionCallKind::StructConstructorCall, Some(td.clone())),
            Some(_) => (FunctionCallKind::TypeConversion, Some(td.clone())),
            None => (FunctionCallKind::FunctionCall, self.types.call_result(td)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparisons_are_bool() {
        let uint = TypeDescription::elementary("uint256");
        let td = binary_type(BinaryOperator::Lt, Some(&uint), Some(&uint));
        assert_eq!(td, Some(TypeDescription::boolean()));
    }

    #[test]
    fn literal_operand_adopts_the_other_side() {
        let uint8 = TypeDescription::elementary("uint8");
        let one = TypeDescription::new("rational_1_by_1", "int_const 1");
        assert_eq!(binary_type(BinaryOperator::Add, Some(&one), Some(&uint8)), Some(uint8.clone()));
        assert_eq!(binary_type(BinaryOperator::Add, Some(&uint8), Some(&one)), Some(uint8));
    }

    #[test]
    fn unary_operators() {
        let int = TypeDescription::elementary("int256");
        assert_eq!(unary_type(UnaryOperator::Neg, Some(&int)), Some(int.clone()));
        assert_eq!(unary_type(UnaryOperator::Not, None), Some(TypeDescription::boolean()));
        assert_eq!(unary_type(UnaryOperator::Delete, Some(&int)), Some(TypeDescription::empty_tuple()));
    }

    #[test]
    fn magic_members() {
        let msg = TypeDescription::magic_message();
        assert_eq!(magic_member(&msg, "sender").map(|t| t.type_identifier), Some("t_address".into()));
        assert_eq!(magic_member(&msg, "sig").map(|t| t.type_identifier), Some("t_bytes4".into()));
        let block = TypeDescription::magic_block();
        assert_eq!(
            magic_member(&block, "coinbase").map(|t| t.type_identifier),
            Some("t_address_payable".into())
        );
        assert_eq!(magic_member(&block, "sender"), None);
    }

    #[test]
    fn builtin_calls() {
        assert_eq!(builtin_call_type("require"), Some(TypeDescription::empty_tuple()));
        assert_eq!(builtin_call_type("keccak256").map(|t| t.type_string), Some("bytes32".into()));
        assert_eq!(builtin_call_type("abi.encodePacked").map(|t| t.type_string), Some("bytes memory".into()));
        assert_eq!(builtin_call_type("transfer"), None);
    }
}
