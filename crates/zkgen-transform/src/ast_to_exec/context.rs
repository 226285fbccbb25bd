use super::errors::{GenError, GenResult};
use indexmap::IndexMap;
use std::fmt;
use tracing::{debug, trace};
use zkgen_core::{Circuit, DeclarationKind, Definition, FieldConfig, Span};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Variable,
    Signal,
    Component,
    Template,
    Function,
}

impl From<DeclarationKind> for SymbolKind {
    fn from(kind: DeclarationKind) -> Self {
        match kind {
            DeclarationKind::SignalInput
            | DeclarationKind::SignalOutput
            | DeclarationKind::Signal => SymbolKind::Signal,
            DeclarationKind::Variable => SymbolKind::Variable,
            DeclarationKind::Component => SymbolKind::Component,
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Signal => "signal",
            SymbolKind::Component => "component",
            SymbolKind::Template => "template",
            SymbolKind::Function => "function",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub kind: SymbolKind,
    /// Where the name was introduced.
    pub span: Span,
}

/// One lexical level. Names are unique within a table.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: IndexMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbols.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.symbols.iter().map(|(name, symbol)| (name.as_str(), symbol))
    }

    fn insert(&mut self, name: &str, symbol: Symbol) -> GenResult<()> {
        if let Some(existing) = self.symbols.get(name) {
            return Err(GenError::NameCollision {
                name: name.to_string(),
                span: symbol.span,
                previous: existing.span,
            });
        }
        self.symbols.insert(name.to_string(), symbol);
        Ok(())
    }
}

/// Stack of symbol tables, innermost last. The global table at the bottom is never popped.
#[derive(Debug)]
pub struct Scope {
    tables: Vec<SymbolTable>,
}

impl Scope {
    pub fn new() -> Self {
        Self {
            tables: vec![SymbolTable::new()],
        }
    }

    pub fn depth(&self) -> usize {
        self.tables.len()
    }

    pub fn push(&mut self) {
        self.tables.push(SymbolTable::new());
        trace!(depth = self.depth(), "push scope");
    }

    pub fn pop(&mut self) -> Option<SymbolTable> {
        if self.tables.len() == 1 {
            return None;
        }
        let table = self.tables.pop();
        trace!(depth = self.depth(), "pop scope");
        table
    }

    /// Declare in the innermost table; fails if the name already exists at this level.
    pub fn declare(&mut self, name: &str, kind: SymbolKind, span: Span) -> GenResult<()> {
        let depth = self.tables.len();
        self.tables[depth - 1].insert(name, Symbol { kind, span })
    }

    /// Declare in the outermost table regardless of the current depth.
    pub fn declare_global(&mut self, name: &str, kind: SymbolKind, span: Span) -> GenResult<()> {
        self.tables[0].insert(name, Symbol { kind, span })
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.tables.iter().rev().find_map(|table| table.get(name))
    }

    /// Like `lookup`, but an unknown name is an error.
    pub fn resolve(&self, name: &str, span: Span) -> GenResult<Symbol> {
        self.lookup(name)
            .copied()
            .ok_or_else(|| GenError::UnresolvedIdentifier {
                name: name.to_string(),
                span,
            })
    }

    pub fn global(&self) -> &SymbolTable {
        &self.tables[0]
    }

    pub fn current(&self) -> &SymbolTable {
        &self.tables[self.tables.len() - 1]
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

/// State of one compilation: scopes, registries and the first recorded error.
///
/// Not meant to be shared; run one context per compilation unit.
#[derive(Debug, Default)]
pub struct GenerationContext {
    pub(crate) scope: Scope,
    pub(crate) templates: IndexMap<String, Definition>,
    pub(crate) functions: IndexMap<String, Definition>,
    pub(crate) function_params: IndexMap<String, Vec<String>>,
    error: Option<GenError>,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scope.lookup(name)
    }

    pub fn error(&self) -> Option<&GenError> {
        self.error.as_ref()
    }

    pub fn templates(&self) -> &IndexMap<String, Definition> {
        &self.templates
    }

    pub fn functions(&self) -> &IndexMap<String, Definition> {
        &self.functions
    }

    pub fn function_params(&self) -> &IndexMap<String, Vec<String>> {
        &self.function_params
    }

    /// Keep `error` unless one is already recorded; returns whichever error is recorded.
    pub(crate) fn record_error(&mut self, error: GenError) -> GenError {
        match &self.error {
            Some(first) => first.clone(),
            None => {
                debug!(span = %error.span(), %error, "generation failed");
                self.error = Some(error.clone());
                error
            }
        }
    }

    /// Package the registries with the field constants. A failed context yields its error.
    pub fn into_circuit(self, field: &FieldConfig) -> GenResult<Circuit> {
        if let Some(error) = self.error {
            return Err(error);
        }
        let mut circuit = Circuit::new(field);
        circuit.templates = self.templates;
        circuit.functions = self.functions;
        circuit.function_params = self.function_params;
        Ok(circuit)
    }
}
