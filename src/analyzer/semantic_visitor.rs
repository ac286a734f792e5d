use log::debug;

use crate::error::SemanticError;
use crate::parser::{
    Assignment, Block, Expr, ForLoop, FunctionCall, FunctionDefinition, Identifier, IfStatement,
    Program, Stmt, VariableDeclaration,
};

use super::symbol_table::{Scope, Symbol, SymbolKind, SymbolTable};

/// Outcome of one analysis run.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub errors: Vec<SemanticError>,
    pub symbol_table: SymbolTable,
}

impl Analysis {
    /// Every scope created during the run, in creation order.
    pub fn scopes(&self) -> &[Scope] {
        self.symbol_table.scopes()
    }
}

/// Walks the AST once, building the scope tree and recording every
/// declaration or resolution problem. Never stops early.
pub struct SemanticVisitor {
    symbol_table: SymbolTable,
    errors: Vec<SemanticError>,
}

impl Default for SemanticVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl SemanticVisitor {
    pub fn new() -> Self {
        Self {
            symbol_table: SymbolTable::new(),
            errors: vec![],
        }
    }

    pub fn analyze(mut self, program: &Program) -> Analysis {
        self.visit_program(program);
        debug!(
            "analysis finished with {} scopes and {} errors",
            self.symbol_table.scopes().len(),
            self.errors.len()
        );

        Analysis {
            errors: self.errors,
            symbol_table: self.symbol_table,
        }
    }

    fn error(&mut self, message: String, line: usize) {
        self.errors.push(SemanticError::new(message, Some(line)));
    }

    fn enter_scope(&mut self, name: &str) {
        let id = self.symbol_table.enter_scope(name);
        debug!("entered scope #{} '{}'", id.index(), name);
    }

    fn declare_variable(&mut self, name: &str, line: usize) {
        let scope = self.symbol_table.current();
        if !self.symbol_table.declare(scope, Symbol::variable(name, line)) {
            self.error(format!("Variable '{}' already declared", name), line);
        }
    }

    fn visit_program(&mut self, program: &Program) {
        for func_def in program.0.iter() {
            self.visit_func_def(func_def);
        }
    }

    /// The function name always lands in the global scope, whatever scope
    /// the cursor is in.
    fn visit_func_def(&mut self, func_def: &FunctionDefinition) {
        let params = func_def.params.iter().map(|p| p.name.clone()).collect();
        let symbol = Symbol::function(&func_def.name, params, Some(func_def.line));
        if !self.symbol_table.declare(SymbolTable::GLOBAL, symbol) {
            self.error(
                format!("Function '{}' already defined", func_def.name),
                func_def.line,
            );
        }

        self.enter_scope(&func_def.name);
        for param in func_def.params.iter() {
            self.declare_variable(&param.name, param.line);
        }
        // The function scope doubles as the body scope.
        for stmt in func_def.body.0.iter() {
            self.visit_stmt(stmt);
        }
        self.symbol_table.exit_scope();
    }

    fn visit_block(&mut self, block: &Block) {
        self.enter_scope("block");
        for stmt in block.0.iter() {
            self.visit_stmt(stmt);
        }
        self.symbol_table.exit_scope();
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VariableDeclaration(decl) => self.visit_var_decl(decl),
            Stmt::Assignment(assign) => self.visit_assignment(assign),
            Stmt::Call(call) => self.visit_call(call),
            Stmt::If(if_stmt) => self.visit_if(if_stmt),
            Stmt::For(for_loop) => self.visit_for(for_loop),
            Stmt::Return(ret) => {
                if let Some(value) = &ret.value {
                    self.visit_expr(value);
                }
            }
        }
    }

    fn visit_var_decl(&mut self, decl: &VariableDeclaration) {
        self.declare_variable(&decl.name, decl.line);
        if let Some(init) = &decl.init {
            self.visit_expr(init);
        }
    }

    fn visit_assignment(&mut self, assign: &Assignment) {
        self.visit_ident(&assign.target);
        self.visit_expr(&assign.value);
    }

    fn visit_if(&mut self, if_stmt: &IfStatement) {
        self.visit_expr(&if_stmt.condition);
        self.visit_block(&if_stmt.then_block);
        if let Some(else_block) = &if_stmt.else_block {
            self.visit_block(else_block);
        }
    }

    fn visit_for(&mut self, for_loop: &ForLoop) {
        self.enter_scope("for-loop");
        self.visit_var_decl(&for_loop.init);
        self.visit_expr(&for_loop.condition);
        self.visit_assignment(&for_loop.increment);
        self.visit_block(&for_loop.body);
        self.symbol_table.exit_scope();
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Binary(binary) => {
                self.visit_expr(&binary.left);
                self.visit_expr(&binary.right);
            }
            Expr::Unary(unary) => self.visit_expr(&unary.operand),
            Expr::Number(_) | Expr::String(_) => (),
            Expr::Ident(ident) => self.visit_ident(ident),
            Expr::Call(call) => self.visit_call(call),
        }
    }

    fn visit_ident(&mut self, ident: &Identifier) {
        if self.symbol_table.lookup(&ident.name).is_none() {
            self.error(
                format!("Undeclared variable '{}'", ident.name),
                ident.line,
            );
        }
    }

    fn visit_call(&mut self, call: &FunctionCall) {
        match self.symbol_table.lookup(&call.name).map(|s| s.kind) {
            None => self.error(format!("Function '{}' not defined", call.name), call.line),
            Some(SymbolKind::Variable) => {
                self.error(format!("'{}' is not a function", call.name), call.line)
            }
            Some(SymbolKind::Function) => (),
        }

        for arg in call.args.iter() {
            self.visit_expr(arg);
        }
    }
}
