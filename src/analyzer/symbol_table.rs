use std::collections::HashMap;

/// Index of a scope inside a [`SymbolTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(usize);

impl ScopeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Declared parameter names, empty for variables.
    pub params: Vec<String>,
    /// `None` for built-ins.
    pub line: Option<usize>,
}

impl Symbol {
    pub fn variable(name: &str, line: usize) -> Self {
        Self {
            name: name.to_string(),
            kind: SymbolKind::Variable,
            params: vec![],
            line: Some(line),
        }
    }

    pub fn function(name: &str, params: Vec<String>, line: Option<usize>) -> Self {
        Self {
            name: name.to_string(),
            kind: SymbolKind::Function,
            params,
            line,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Scope {
    pub name: String,
    pub parent: Option<ScopeId>,
    symbols: HashMap<String, Symbol>,
    order: Vec<String>,
}

impl Scope {
    fn new(name: &str, parent: Option<ScopeId>) -> Self {
        Self {
            name: name.to_string(),
            parent,
            symbols: HashMap::new(),
            order: vec![],
        }
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    /// Symbols in declaration order, built-ins first.
    pub fn symbols(&self) -> Vec<&Symbol> {
        self.order
            .iter()
            .filter_map(|name| self.symbols.get(name))
            .collect()
    }
}

/// Arena of every scope created during one analysis, in creation order.
///
/// Scopes are never removed. Entering and leaving a scope only moves the
/// `current` cursor.
#[derive(Clone, Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
    current: ScopeId,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub const GLOBAL: ScopeId = ScopeId(0);

    /// A table holding only the global scope with `printf` pre-declared.
    pub fn new() -> Self {
        let mut table = Self {
            scopes: vec![Scope::new("global", None)],
            current: Self::GLOBAL,
        };
        table.declare(Self::GLOBAL, Symbol::function("printf", vec![], None));
        table
    }

    pub fn current(&self) -> ScopeId {
        self.current
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0]
    }

    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    pub fn into_scopes(self) -> Vec<Scope> {
        self.scopes
    }

    /// Creates a child of the current scope and moves into it.
    pub fn enter_scope(&mut self, name: &str) -> ScopeId {
        let id = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(name, Some(self.current)));
        self.current = id;
        id
    }

    /// Moves the cursor back to the parent. Stays put at the global scope.
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scope(self.current).parent {
            self.current = parent;
        }
    }

    /// Returns false if `scope` already holds a symbol with that name.
    pub fn declare(&mut self, scope: ScopeId, symbol: Symbol) -> bool {
        let scope = &mut self.scopes[scope.0];
        if scope.symbols.contains_key(&symbol.name) {
            return false;
        }
        scope.order.push(symbol.name.clone());
        scope.symbols.insert(symbol.name.clone(), symbol);
        true
    }

    /// `scope` followed by each of its ancestors up to the global scope.
    pub fn ancestors(&self, scope: ScopeId) -> impl Iterator<Item = ScopeId> + '_ {
        std::iter::successors(Some(scope), |&id| self.scope(id).parent)
    }

    pub fn lookup_from(&self, scope: ScopeId, name: &str) -> Option<&Symbol> {
        self.ancestors(scope)
            .find_map(|id| self.scope(id).get(name))
    }

    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.lookup_from(self.current, name)
    }
}
