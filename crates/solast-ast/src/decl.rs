// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source units, contracts and the declarations inside them.

use crate::expr::Expression;
use crate::stmt::Block;
use crate::type_name::{PathNode, TypeName};
use crate::{NodeId, SrcNode, StateMutability, TypeDescription};

/// A whole source file.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceUnit {
    pub id: NodeId,
    pub src: SrcNode,
    pub nodes: Vec<SourceUnitPart>,
}

impl SourceUnit {
    pub fn contracts(&self) -> impl Iterator<Item = &ContractDefinition> {
        self.nodes.iter().filter_map(|part| match part {
            SourceUnitPart::Contract(c) => Some(c),
            _ => None,
        })
    }

    pub fn contract(&self, name: &str) -> Option<&ContractDefinition> {
        self.contracts().find(|c| c.name == name)
    }
}

/// Top-level item of a source unit.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SourceUnitPart {
    Pragma(PragmaDirective),
    Import(ImportDirective),
    Contract(ContractDefinition),
    Function(FunctionDefinition),
    Struct(StructDefinition),
    Enum(EnumDefinition),
    Error(ErrorDefinition),
    Event(EventDefinition),
    UserDefinedValueType(UserDefinedValueTypeDefinition),
    Using(UsingForDirective),
    Constant(VariableDeclaration),
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PragmaDirective {
    pub id: NodeId,
    pub src: SrcNode,
    /// Token texts after `pragma`, e.g. `["solidity", "^", "0.8", ".0"]`.
    pub literals: Vec<String>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ImportDirective {
    pub id: NodeId,
    pub src: SrcNode,
    pub file: String,
    pub unit_alias: Option<String>,
    pub symbol_aliases: Vec<SymbolAlias>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SymbolAlias {
    pub foreign: String,
    pub local: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum ContractKind {
    Contract,
    Interface,
    Library,
}

impl ContractKind {
    pub fn keyword(self) -> &'static str {
        match self {
            ContractKind::Contract => "contract",
            ContractKind::Interface => "interface",
            ContractKind::Library => "library",
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContractDefinition {
    pub id: NodeId,
    pub src: SrcNode,
    pub name: String,
    pub kind: ContractKind,
    pub is_abstract: bool,
    pub base_contracts: Vec<InheritanceSpecifier>,
    pub nodes: Vec<ContractPart>,
    pub type_description: TypeDescription,
}

impl ContractDefinition {
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDefinition> {
        self.nodes.iter().filter_map(|part| match part {
            ContractPart::Function(f) => Some(f),
            _ => None,
        })
    }

    pub fn events(&self) -> impl Iterator<Item = &EventDefinition> {
        self.nodes.iter().filter_map(|part| match part {
            ContractPart::Event(e) => Some(e),
            _ => None,
        })
    }

    pub fn state_variables(&self) -> impl Iterator<Item = &VariableDeclaration> {
        self.nodes.iter().filter_map(|part| match part {
            ContractPart::StateVariable(v) => Some(v),
            _ => None,
        })
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InheritanceSpecifier {
    pub id: NodeId,
    pub src: SrcNode,
    pub base_name: PathNode,
    pub arguments: Vec<Expression>,
}

/// Member of a contract body.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContractPart {
    Function(FunctionDefinition),
    StateVariable(VariableDeclaration),
    Event(EventDefinition),
    Error(ErrorDefinition),
    Struct(StructDefinition),
    Enum(EnumDefinition),
    UserDefinedValueType(UserDefinedValueTypeDefinition),
    Using(UsingForDirective),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum FunctionKind {
    Function,
    Constructor,
    Modifier,
    Fallback,
    Receive,
    FreeFunction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum Visibility {
    #[default]
    Default,
    Public,
    Private,
    Internal,
    External,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Default => "default",
            Visibility::Public => "public",
            Visibility::Private => "private",
            Visibility::Internal => "internal",
            Visibility::External => "external",
        }
    }
}

/// Functions, constructors, modifiers, fallback and receive.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionDefinition {
    pub id: NodeId,
    pub src: SrcNode,
    pub name: String,
    pub kind: FunctionKind,
    pub visibility: Visibility,
    pub state_mutability: StateMutability,
    pub is_virtual: bool,
    pub overrides: Vec<PathNode>,
    pub is_override: bool,
    pub modifiers: Vec<ModifierInvocation>,
    pub parameters: ParameterList,
    pub return_parameters: ParameterList,
    pub body: Option<Block>,
    /// Function type; unset until every parameter type is known.
    pub type_description: Option<TypeDescription>,
    /// Enclosing contract, or `NodeId::ROOT` for free functions.
    pub scope: NodeId,
}

impl FunctionDefinition {
    pub fn is_implemented(&self) -> bool {
        self.body.is_some()
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifierInvocation {
    pub id: NodeId,
    pub src: SrcNode,
    pub modifier_name: PathNode,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParameterList {
    pub id: NodeId,
    pub src: SrcNode,
    pub parameters: Vec<VariableDeclaration>,
}

impl ParameterList {
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Every parameter type, or `None` if any is still unknown.
    pub fn type_descriptions(&self) -> Option<Vec<TypeDescription>> {
        self.parameters.iter().map(|p| p.type_description.clone()).collect()
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventDefinition {
    pub id: NodeId,
    pub src: SrcNode,
    pub name: String,
    pub anonymous: bool,
    pub parameters: ParameterList,
    pub type_description: Option<TypeDescription>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorDefinition {
    pub id: NodeId,
    pub src: SrcNode,
    pub name: String,
    pub parameters: ParameterList,
    pub type_description: Option<TypeDescription>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StructDefinition {
    pub id: NodeId,
    pub src: SrcNode,
    pub name: String,
    pub members: Vec<VariableDeclaration>,
    pub type_description: TypeDescription,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumDefinition {
    pub id: NodeId,
    pub src: SrcNode,
    pub name: String,
    pub members: Vec<EnumValue>,
    pub type_description: TypeDescription,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnumValue {
    pub id: NodeId,
    pub src: SrcNode,
    pub name: String,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserDefinedValueTypeDefinition {
    pub id: NodeId,
    pub src: SrcNode,
    pub name: String,
    pub underlying_type: TypeName,
    pub type_description: TypeDescription,
}

/// `using L for T;` A missing `type_name` means `*`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UsingForDirective {
    pub id: NodeId,
    pub src: SrcNode,
    pub library_name: PathNode,
    pub type_name: Option<TypeName>,
    pub global: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(rename_all = "snake_case"))]
pub enum StorageLocation {
    #[default]
    Default,
    Memory,
    Storage,
    Calldata,
}

impl StorageLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageLocation::Default => "default",
            StorageLocation::Memory => "memory",
            StorageLocation::Storage => "storage",
            StorageLocation::Calldata => "calldata",
        }
    }
}

/// State variables, parameters, struct members and locals.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VariableDeclaration {
    pub id: NodeId,
    pub src: SrcNode,
    /// Empty for unnamed parameters.
    pub name: String,
    pub type_name: Option<TypeName>,
    pub type_description: Option<TypeDescription>,
    pub storage_location: StorageLocation,
    pub visibility: Visibility,
    pub state_variable: bool,
    pub constant: bool,
    pub immutable: bool,
    pub indexed: bool,
    pub value: Option<Expression>,
    pub scope: NodeId,
}

impl VariableDeclaration {
    pub fn type_string(&self) -> Option<&str> {
        self.type_description.as_ref().map(|td| td.type_string.as_str())
    }
}
