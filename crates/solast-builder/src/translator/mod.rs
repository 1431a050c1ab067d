// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Node translators.
//!
//! One translator per syntactic category, each an `impl Translator` block
//! in its own module. Translators share the id allocator, the symbol
//! table and the scope stacks held here; nodes never point back at them.

use solast_ast::decl::SourceUnit;
use solast_ast::token::Token;
use solast_ast::{IdAllocator, NodeId, Span, SrcNode, TypeDescription, TypeTable};
use solast_parser::Production;
use solast_resolve::{Declaration, Request, Resolution, SymbolTable};
use tracing::{debug, warn};

use crate::error::{BuildError, BuildWarning, WarningKind};
use crate::options::{BuildOptions, UnsupportedPolicy};
use crate::BuildOutput;

mod contract;
mod declarations;
mod deferred;
mod expression;
mod expression_statement;
mod function;
mod primary_expression;
mod source_unit;
mod statement;
mod type_name;
mod typing;

use deferred::Deferred;

/// The contract whose members are being translated.
#[derive(Debug, Clone)]
pub(super) struct ContractScope {
    pub id: NodeId,
    pub type_description: TypeDescription,
}

/// The function, constructor or modifier being translated.
#[derive(Debug, Default)]
pub(super) struct FunctionScope {
    pub parameters: Vec<Local>,
    pub returns: Vec<Local>,
    pub return_list: NodeId,
}

/// A name bound inside a function body or parameter list.
#[derive(Debug, Clone)]
pub(super) struct Local {
    pub name: String,
    pub id: NodeId,
    pub type_description: Option<TypeDescription>,
}

/// Per-call translation context.
#[derive(Debug, Clone, Copy)]
pub(super) struct Cx<'a> {
    /// Id of the structurally enclosing node.
    pub parent: NodeId,
    /// Argument types when the node being built is the callee of a call.
    pub call_arguments: Option<&'a [Option<TypeDescription>]>,
}

impl<'a> Cx<'a> {
    pub fn new(parent: NodeId) -> Self {
        Self { parent, call_arguments: None }
    }

    pub fn callee(parent: NodeId, arguments: &'a [Option<TypeDescription>]) -> Self {
        Self { parent, call_arguments: Some(arguments) }
    }
}

pub(crate) struct Translator<'r> {
    pub(super) ids: IdAllocator,
    pub(super) resolver: &'r mut dyn SymbolTable,
    pub(super) types: TypeTable,
    pub(super) options: BuildOptions,
    pub(super) deferred: Vec<Deferred>,
    pub(super) warnings: Vec<BuildWarning>,
    pub(super) skipped: Vec<BuildError>,
    pub(super) contract: Option<ContractScope>,
    pub(super) function: Option<FunctionScope>,
    /// Block scopes of the current function body, innermost last.
    pub(super) frames: Vec<Vec<Local>>,
}

impl<'r> Translator<'r> {
    pub fn new(resolver: &'r mut dyn SymbolTable, options: BuildOptions) -> Self {
        Self {
            ids: IdAllocator::new(),
            resolver,
            types: TypeTable::new(),
            options,
            deferred: Vec::new(),
            warnings: Vec::new(),
            skipped: Vec::new(),
            contract: None,
            function: None,
            frames: Vec::new(),
        }
    }

    /// Phase one, then (unless disabled) phase two.
    pub fn translate(&mut self, tree: &Production) -> Result<SourceUnit, BuildError> {
        let mut unit = self.translate_source_unit(tree)?;
        if self.options.resolve_deferred {
            self.complete(&mut unit);
        }
        Ok(unit)
    }

    pub fn finish(mut self, unit: SourceUnit) -> BuildOutput {
        for pending in std::mem::take(&mut self.deferred) {
            debug!(node = %pending.node, name = %pending.name, "left unresolved");
            if self.options.report_unresolved {
                self.warnings.push(BuildWarning {
                    kind: WarningKind::UnresolvedReference,
                    node: pending.node,
                    span: pending.span,
                    message: format!("cannot resolve `{}`", pending.name),
                });
            }
        }
        BuildOutput {
            unit,
            warnings: self.warnings,
            skipped: self.skipped,
            types: self.types,
            node_count: self.ids.allocated(),
        }
    }

    // =========================================================================
    // Ids and source positions
    // =========================================================================

    pub(super) fn next_id(&mut self) -> NodeId {
        self.ids.next_id()
    }

    pub(super) fn src(&self, p: &Production, parent: NodeId) -> SrcNode {
        Self::range_src(&p.start, &p.stop, parent)
    }

    pub(super) fn range_src(start: &Token, stop: &Token, parent: NodeId) -> SrcNode {
        SrcNode::new(start.line, start.column, start.span.start, stop.stop(), parent)
    }

    pub(super) fn span_of(p: &Production) -> Span {
        Span::new(p.start.span.start, p.stop.span.end.max(p.start.span.start))
    }

    // =========================================================================
    // Errors and warnings
    // =========================================================================

    pub(super) fn unsupported(translator: &'static str, p: &Production) -> BuildError {
        BuildError::UnsupportedProduction {
            translator,
            rule: p.rule,
            span: Self::span_of(p),
            line: p.start.line,
            column: p.start.column,
        }
    }

    /// Apply the unsupported-production policy at a member or statement
    /// boundary.
    pub(super) fn guard<T>(&mut self, result: Result<T, BuildError>) -> Result<Option<T>, BuildError> {
        match result {
            Ok(node) => Ok(Some(node)),
            Err(error) if self.options.on_unsupported == UnsupportedPolicy::Skip => {
                warn!(%error, "skipping unsupported production");
                self.skipped.push(error);
                Ok(None)
            }
            Err(error) => Err(error),
        }
    }

    pub(super) fn warn(&mut self, kind: WarningKind, node: NodeId, span: Span, message: String) {
        self.warnings.push(BuildWarning { kind, node, span, message });
    }

    // =========================================================================
    // Names
    // =========================================================================

    pub(super) fn contract_id(&self) -> Option<NodeId> {
        self.contract.as_ref().map(|c| c.id)
    }

    /// Register with the symbol table. A rejected declaration only costs
    /// resolvability, so it is logged and dropped.
    pub(super) fn declare(&mut self, declaration: Declaration) {
        if let Err(error) = self.resolver.declare(declaration) {
            debug!(%error, "declaration rejected");
        }
    }

    pub(super) fn update_declared_type(&mut self, id: NodeId, td: &TypeDescription) {
        if let Err(error) = self.resolver.update_type(id, td.clone()) {
            debug!(%error, "type update rejected");
        }
    }

    pub(super) fn resolve(&self, node: NodeId, name: &str) -> Option<Resolution> {
        self.resolver.resolve(&Request::new(node, name, self.contract_id()))
    }

    /// Innermost block binding first, later bindings shadowing earlier
    /// ones, then parameters, then return parameters.
    pub(super) fn lookup_local(&self, name: &str) -> Option<&Local> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.iter().rev().find(|l| l.name == name))
            .or_else(|| {
                let function = self.function.as_ref()?;
                function
                    .parameters
                    .iter()
                    .rev()
                    .find(|l| l.name == name)
                    .or_else(|| function.returns.iter().rev().find(|l| l.name == name))
            })
    }

    pub(super) fn push_frame(&mut self) {
        self.frames.push(Vec::new());
    }

    pub(super) fn pop_frame(&mut self) {
        self.frames.pop();
    }

    pub(super) fn bind_local(&mut self, local: Local) {
        if local.name.is_empty() {
            return;
        }
        match self.frames.last_mut() {
            Some(frame) => frame.push(local),
            None => debug!(name = %local.name, "local outside of any block"),
        }
    }

    pub(super) fn defer(&mut self, node: NodeId, name: &str, span: Span) {
        debug!(%node, name, "deferring reference");
        self.deferred.push(Deferred {
            node,
            name: name.to_string(),
            contract: self.contract_id(),
            span,
        });
    }
}
