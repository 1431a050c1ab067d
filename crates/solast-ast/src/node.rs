// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Read-only view shared by every node kind.

use crate::decl::*;
use crate::expr::{Expression, FunctionCall};
use crate::stmt::{Block, Statement};
use crate::type_name::{PathNode, TypeName};
use crate::{NodeId, SrcNode, TypeDescription};

/// Node kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeKind {
    SourceUnit,
    PragmaDirective,
    ImportDirective,
    ContractDefinition,
    InheritanceSpecifier,
    FunctionDefinition,
    ModifierDefinition,
    ModifierInvocation,
    ParameterList,
    EventDefinition,
    ErrorDefinition,
    StructDefinition,
    EnumDefinition,
    EnumValue,
    UserDefinedValueTypeDefinition,
    UsingForDirective,
    VariableDeclaration,
    ElementaryTypeName,
    MappingTypeName,
    ArrayTypeName,
    UserDefinedTypeName,
    FunctionTypeName,
    IdentifierPath,
    Block,
    UncheckedBlock,
    VariableDeclarationStatement,
    IfStatement,
    ForStatement,
    WhileStatement,
    DoWhileStatement,
    Continue,
    Break,
    Return,
    EmitStatement,
    RevertStatement,
    PlaceholderStatement,
    Identifier,
    Literal,
    ElementaryTypeNameExpression,
    FunctionCall,
    FunctionCallOptions,
    MemberAccess,
    IndexAccess,
    Assignment,
    BinaryOperation,
    UnaryOperation,
    Conditional,
    TupleExpression,
    NewExpression,
}

impl NodeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::SourceUnit => "SourceUnit",
            NodeKind::PragmaDirective => "PragmaDirective",
            NodeKind::ImportDirective => "ImportDirective",
            NodeKind::ContractDefinition => "ContractDefinition",
            NodeKind::InheritanceSpecifier => "InheritanceSpecifier",
            NodeKind::FunctionDefinition => "FunctionDefinition",
            NodeKind::ModifierDefinition => "ModifierDefinition",
            NodeKind::ModifierInvocation => "ModifierInvocation",
            NodeKind::ParameterList => "ParameterList",
            NodeKind::EventDefinition => "EventDefinition",
            NodeKind::ErrorDefinition => "ErrorDefinition",
            NodeKind::StructDefinition => "StructDefinition",
            NodeKind::EnumDefinition => "EnumDefinition",
            NodeKind::EnumValue => "EnumValue",
            NodeKind::UserDefinedValueTypeDefinition => "UserDefinedValueTypeDefinition",
            NodeKind::UsingForDirective => "UsingForDirective",
            NodeKind::VariableDeclaration => "VariableDeclaration",
            NodeKind::ElementaryTypeName => "ElementaryTypeName",
            NodeKind::MappingTypeName => "Mapping",
            NodeKind::ArrayTypeName => "ArrayTypeName",
            NodeKind::UserDefinedTypeName => "UserDefinedTypeName",
            NodeKind::FunctionTypeName => "FunctionTypeName",
            NodeKind::IdentifierPath => "IdentifierPath",
            NodeKind::Block => "Block",
            NodeKind::UncheckedBlock => "UncheckedBlock",
            NodeKind::VariableDeclarationStatement => "VariableDeclarationStatement",
            NodeKind::IfStatement => "IfStatement",
            NodeKind::ForStatement => "ForStatement",
            NodeKind::WhileStatement => "WhileStatement",
            NodeKind::DoWhileStatement => "DoWhileStatement",
            NodeKind::Continue => "Continue",
            NodeKind::Break => "Break",
            NodeKind::Return => "Return",
            NodeKind::EmitStatement => "EmitStatement",
            NodeKind::RevertStatement => "RevertStatement",
            NodeKind::PlaceholderStatement => "PlaceholderStatement",
            NodeKind::Identifier => "Identifier",
            NodeKind::Literal => "Literal",
            NodeKind::ElementaryTypeNameExpression => "ElementaryTypeNameExpression",
            NodeKind::FunctionCall => "FunctionCall",
            NodeKind::FunctionCallOptions => "FunctionCallOptions",
            NodeKind::MemberAccess => "MemberAccess",
            NodeKind::IndexAccess => "IndexAccess",
            NodeKind::Assignment => "Assignment",
            NodeKind::BinaryOperation => "BinaryOperation",
            NodeKind::UnaryOperation => "UnaryOperation",
            NodeKind::Conditional => "Conditional",
            NodeKind::TupleExpression => "TupleExpression",
            NodeKind::NewExpression => "NewExpression",
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capabilities every node exposes.
pub trait Node {
    fn id(&self) -> NodeId;
    fn kind(&self) -> NodeKind;
    fn src(&self) -> &SrcNode;

    fn type_description(&self) -> Option<&TypeDescription> {
        None
    }

    fn referenced_declaration(&self) -> Option<NodeId> {
        None
    }
}

/// Borrowed handle to any node in a finished tree.
///
/// Match on the variant to reach kind-specific fields.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    SourceUnit(&'a SourceUnit),
    Pragma(&'a PragmaDirective),
    Import(&'a ImportDirective),
    Contract(&'a ContractDefinition),
    Inheritance(&'a InheritanceSpecifier),
    Function(&'a FunctionDefinition),
    ModifierInvocation(&'a ModifierInvocation),
    ParameterList(&'a ParameterList),
    Event(&'a EventDefinition),
    Error(&'a ErrorDefinition),
    Struct(&'a StructDefinition),
    Enum(&'a EnumDefinition),
    EnumValue(&'a EnumValue),
    UserDefinedValueType(&'a UserDefinedValueTypeDefinition),
    Using(&'a UsingForDirective),
    Variable(&'a VariableDeclaration),
    TypeName(&'a TypeName),
    Path(&'a PathNode),
    Block(&'a Block),
    Statement(&'a Statement),
    Expression(&'a Expression),
    /// Call embedded in an `emit` or `revert` statement.
    Call(&'a FunctionCall),
}

impl<'a> NodeRef<'a> {
    /// Canonical handle for a statement: blocks and expression
    /// statements are reported as what they contain.
    pub fn statement(s: &'a Statement) -> Self {
        match s {
            Statement::Block(b) => NodeRef::Block(b),
            Statement::Expression(e) => NodeRef::Expression(e),
            other => NodeRef::Statement(other),
        }
    }

    /// Direct children in source order.
    pub fn children(self) -> Vec<NodeRef<'a>> {
        let mut out = Vec::new();
        match self {
            NodeRef::SourceUnit(unit) => {
                for part in &unit.nodes {
                    out.push(match part {
                        SourceUnitPart::Pragma(p) => NodeRef::Pragma(p),
                        SourceUnitPart::Import(i) => NodeRef::Import(i),
                        SourceUnitPart::Contract(c) => NodeRef::Contract(c),
                        SourceUnitPart::Function(f) => NodeRef::Function(f),
                        SourceUnitPart::Struct(s) => NodeRef::Struct(s),
                        SourceUnitPart::Enum(e) => NodeRef::Enum(e),
                        SourceUnitPart::Error(e) => NodeRef::Error(e),
                        SourceUnitPart::Event(e) => NodeRef::Event(e),
                        SourceUnitPart::UserDefinedValueType(u) => NodeRef::UserDefinedValueType(u),
                        SourceUnitPart::Using(u) => NodeRef::Using(u),
                        SourceUnitPart::Constant(v) => NodeRef::Variable(v),
                    });
                }
            }
            NodeRef::Pragma(_) | NodeRef::Import(_) | NodeRef::EnumValue(_) | NodeRef::Path(_) => {}
            NodeRef::Contract(c) => {
                out.extend(c.base_contracts.iter().map(NodeRef::Inheritance));
                for part in &c.nodes {
                    out.push(match part {
                        ContractPart::Function(f) => NodeRef::Function(f),
                        ContractPart::StateVariable(v) => NodeRef::Variable(v),
                        ContractPart::Event(e) => NodeRef::Event(e),
                        ContractPart::Error(e) => NodeRef::Error(e),
                        ContractPart::Struct(s) => NodeRef::Struct(s),
                        ContractPart::Enum(e) => NodeRef::Enum(e),
                        ContractPart::UserDefinedValueType(u) => NodeRef::UserDefinedValueType(u),
                        ContractPart::Using(u) => NodeRef::Using(u),
                    });
                }
            }
            NodeRef::Inheritance(i) => {
                out.push(NodeRef::Path(&i.base_name));
                out.extend(i.arguments.iter().map(NodeRef::Expression));
            }
            NodeRef::Function(f) => {
                out.push(NodeRef::ParameterList(&f.parameters));
                out.push(NodeRef::ParameterList(&f.return_parameters));
                out.extend(f.modifiers.iter().map(NodeRef::ModifierInvocation));
                if let Some(body) = &f.body {
                    out.push(NodeRef::Block(body));
                }
            }
            NodeRef::ModifierInvocation(m) => {
                out.push(NodeRef::Path(&m.modifier_name));
                out.extend(m.arguments.iter().map(NodeRef::Expression));
            }
            NodeRef::ParameterList(list) => out.extend(list.parameters.iter().map(NodeRef::Variable)),
            NodeRef::Event(e) => out.push(NodeRef::ParameterList(&e.parameters)),
            NodeRef::Error(e) => out.push(NodeRef::ParameterList(&e.parameters)),
            NodeRef::Struct(s) => out.extend(s.members.iter().map(NodeRef::Variable)),
            NodeRef::Enum(e) => out.extend(e.members.iter().map(NodeRef::EnumValue)),
            NodeRef::UserDefinedValueType(u) => out.push(NodeRef::TypeName(&u.underlying_type)),
            NodeRef::Using(u) => {
                out.push(NodeRef::Path(&u.library_name));
                if let Some(t) = &u.type_name {
                    out.push(NodeRef::TypeName(t));
                }
            }
            NodeRef::Variable(v) => {
                if let Some(t) = &v.type_name {
                    out.push(NodeRef::TypeName(t));
                }
                if let Some(value) = &v.value {
                    out.push(NodeRef::Expression(value));
                }
            }
            NodeRef::TypeName(t) => {
                for child in [&t.key_type, &t.value_type, &t.base_type].into_iter().flatten() {
                    out.push(NodeRef::TypeName(child));
                }
                if let Some(path) = &t.path_node {
                    out.push(NodeRef::Path(path));
                }
            }
            NodeRef::Block(b) => out.extend(b.statements.iter().map(NodeRef::statement)),
            NodeRef::Statement(s) => statement_children(s, &mut out),
            NodeRef::Expression(e) => expression_children(e, &mut out),
            NodeRef::Call(call) => call_children(call, &mut out),
        }
        out
    }
}

fn statement_children<'a>(s: &'a Statement, out: &mut Vec<NodeRef<'a>>) {
    match s {
        Statement::Block(b) => out.extend(b.statements.iter().map(NodeRef::statement)),
        Statement::VariableDeclaration(decl) => {
            out.extend(decl.declared().map(NodeRef::Variable));
            if let Some(value) = &decl.initial_value {
                out.push(NodeRef::Expression(value));
            }
        }
        Statement::Expression(e) => out.push(NodeRef::Expression(e)),
        Statement::If(stmt) => {
            out.push(NodeRef::Expression(&stmt.condition));
            out.push(NodeRef::statement(&stmt.true_body));
            if let Some(f) = &stmt.false_body {
                out.push(NodeRef::statement(f));
            }
        }
        Statement::For(stmt) => {
            if let Some(init) = &stmt.initialization {
                out.push(NodeRef::statement(init));
            }
            if let Some(cond) = &stmt.condition {
                out.push(NodeRef::Expression(cond));
            }
            if let Some(step) = &stmt.loop_expression {
                out.push(NodeRef::Expression(step));
            }
            out.push(NodeRef::statement(&stmt.body));
        }
        Statement::While(stmt) => {
            out.push(NodeRef::Expression(&stmt.condition));
            out.push(NodeRef::statement(&stmt.body));
        }
        Statement::DoWhile(stmt) => {
            out.push(NodeRef::statement(&stmt.body));
            out.push(NodeRef::Expression(&stmt.condition));
        }
        Statement::Continue(_) | Statement::Break(_) => {}
        Statement::Return(r) => {
            if let Some(e) = &r.expression {
                out.push(NodeRef::Expression(e));
            }
        }
        Statement::Emit(e) => out.push(NodeRef::Call(&e.event_call)),
        Statement::Revert(r) => out.push(NodeRef::Call(&r.error_call)),
    }
}

fn call_children<'a>(call: &'a FunctionCall, out: &mut Vec<NodeRef<'a>>) {
    out.push(NodeRef::Expression(&call.expression));
    out.extend(call.arguments.iter().map(NodeRef::Expression));
}

fn expression_children<'a>(e: &'a Expression, out: &mut Vec<NodeRef<'a>>) {
    match e {
        Expression::Primary(_) => {}
        Expression::FunctionCall(call) => call_children(call, out),
        Expression::FunctionCallOptions(o) => {
            out.push(NodeRef::Expression(&o.expression));
            out.extend(o.options.iter().map(NodeRef::Expression));
        }
        Expression::MemberAccess(m) => out.push(NodeRef::Expression(&m.expression)),
        Expression::IndexAccess(i) => {
            out.push(NodeRef::Expression(&i.base));
            if let Some(index) = &i.index {
                out.push(NodeRef::Expression(index));
            }
        }
        Expression::Assignment(a) => {
            out.push(NodeRef::Expression(&a.left));
            out.push(NodeRef::Expression(&a.right));
        }
        Expression::BinaryOperation(b) => {
            out.push(NodeRef::Expression(&b.left));
            out.push(NodeRef::Expression(&b.right));
        }
        Expression::UnaryOperation(u) => out.push(NodeRef::Expression(&u.sub_expression)),
        Expression::Conditional(c) => {
            out.push(NodeRef::Expression(&c.condition));
            out.push(NodeRef::Expression(&c.true_expression));
            out.push(NodeRef::Expression(&c.false_expression));
        }
        Expression::Tuple(t) => out.extend(t.components.iter().flatten().map(NodeRef::Expression)),
        Expression::New(n) => out.push(NodeRef::TypeName(&n.type_name)),
    }
}

impl Node for NodeRef<'_> {
    fn id(&self) -> NodeId {
        match *self {
            NodeRef::SourceUnit(n) => n.id,
            NodeRef::Pragma(n) => n.id,
            NodeRef::Import(n) => n.id,
            NodeRef::Contract(n) => n.id,
            NodeRef::Inheritance(n) => n.id,
            NodeRef::Function(n) => n.id,
            NodeRef::ModifierInvocation(n) => n.id,
            NodeRef::ParameterList(n) => n.id,
            NodeRef::Event(n) => n.id,
            NodeRef::Error(n) => n.id,
            NodeRef::Struct(n) => n.id,
            NodeRef::Enum(n) => n.id,
            NodeRef::EnumValue(n) => n.id,
            NodeRef::UserDefinedValueType(n) => n.id,
            NodeRef::Using(n) => n.id,
            NodeRef::Variable(n) => n.id,
            NodeRef::TypeName(n) => n.id,
            NodeRef::Path(n) => n.id,
            NodeRef::Block(n) => n.id,
            NodeRef::Statement(n) => n.id(),
            NodeRef::Expression(n) => n.id(),
            NodeRef::Call(n) => n.id,
        }
    }

    fn kind(&self) -> NodeKind {
        match *self {
            NodeRef::SourceUnit(_) => NodeKind::SourceUnit,
            NodeRef::Pragma(_) => NodeKind::PragmaDirective,
            NodeRef::Import(_) => NodeKind::ImportDirective,
            NodeRef::Contract(_) => NodeKind::ContractDefinition,
            NodeRef::Inheritance(_) => NodeKind::InheritanceSpecifier,
            NodeRef::Function(f) if f.kind == FunctionKind::Modifier => NodeKind::ModifierDefinition,
            NodeRef::Function(_) => NodeKind::FunctionDefinition,
            NodeRef::ModifierInvocation(_) => NodeKind::ModifierInvocation,
            NodeRef::ParameterList(_) => NodeKind::ParameterList,
            NodeRef::Event(_) => NodeKind::EventDefinition,
            NodeRef::Error(_) => NodeKind::ErrorDefinition,
            NodeRef::Struct(_) => NodeKind::StructDefinition,
            NodeRef::Enum(_) => NodeKind::EnumDefinition,
            NodeRef::EnumValue(_) => NodeKind::EnumValue,
            NodeRef::UserDefinedValueType(_) => NodeKind::UserDefinedValueTypeDefinition,
            NodeRef::Using(_) => NodeKind::UsingForDirective,
            NodeRef::Variable(_) => NodeKind::VariableDeclaration,
            NodeRef::TypeName(t) => t.node_type,
            NodeRef::Path(p) => p.node_type,
            NodeRef::Block(b) if b.unchecked => NodeKind::UncheckedBlock,
            NodeRef::Block(_) => NodeKind::Block,
            NodeRef::Statement(s) => s.kind(),
            NodeRef::Expression(e) => e.kind(),
            NodeRef::Call(_) => NodeKind::FunctionCall,
        }
    }

    fn src(&self) -> &SrcNode {
        match *self {
            NodeRef::SourceUnit(n) => &n.src,
            NodeRef::Pragma(n) => &n.src,
            NodeRef::Import(n) => &n.src,
            NodeRef::Contract(n) => &n.src,
            NodeRef::Inheritance(n) => &n.src,
            NodeRef::Function(n) => &n.src,
            NodeRef::ModifierInvocation(n) => &n.src,
            NodeRef::ParameterList(n) => &n.src,
            NodeRef::Event(n) => &n.src,
            NodeRef::Error(n) => &n.src,
            NodeRef::Struct(n) => &n.src,
            NodeRef::Enum(n) => &n.src,
            NodeRef::EnumValue(n) => &n.src,
            NodeRef::UserDefinedValueType(n) => &n.src,
            NodeRef::Using(n) => &n.src,
            NodeRef::Variable(n) => &n.src,
            NodeRef::TypeName(n) => &n.src,
            NodeRef::Path(n) => &n.src,
            NodeRef::Block(n) => &n.src,
            NodeRef::Statement(n) => n.src(),
            NodeRef::Expression(n) => n.src(),
            NodeRef::Call(n) => &n.src,
        }
    }

    fn type_description(&self) -> Option<&TypeDescription> {
        match *self {
            NodeRef::Contract(c) => Some(&c.type_description),
            NodeRef::Function(f) => f.type_description.as_ref(),
            NodeRef::Event(e) => e.type_description.as_ref(),
            NodeRef::Error(e) => e.type_description.as_ref(),
            NodeRef::Struct(s) => Some(&s.type_description),
            NodeRef::Enum(e) => Some(&e.type_description),
            NodeRef::UserDefinedValueType(u) => Some(&u.type_description),
            NodeRef::Variable(v) => v.type_description.as_ref(),
            NodeRef::TypeName(t) => t.type_description.as_ref(),
            NodeRef::Expression(e) => e.type_description(),
            NodeRef::Call(c) => c.type_description.as_ref(),
            _ => None,
        }
    }

    fn referenced_declaration(&self) -> Option<NodeId> {
        match *self {
            NodeRef::TypeName(t) => t.referenced_declaration,
            NodeRef::Path(p) => p.referenced_declaration,
            NodeRef::Expression(e) => e.referenced_declaration(),
            NodeRef::Call(c) => c.referenced_declaration,
            _ => None,
        }
    }
}
