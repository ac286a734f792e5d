use log::trace;

use crate::parser::{
    Assignment, BinaryOp, Block, Expr, ForLoop, FunctionCall, FunctionDefinition, IfStatement,
    Program, ReturnStatement, Stmt, UnaryOp, VariableDeclaration,
};

use super::Instruction;

/// Lowers an analyzed program to three-address code.
///
/// Only run this on a program that parsed and analyzed without errors; no
/// checks are repeated here.
#[derive(Debug, Default)]
pub struct TacGenerator {
    temp_index: usize,
    label_index: usize,
    code: Vec<Instruction>,
}

impl TacGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Temporaries and labels restart from 1 on every call.
    pub fn generate(&mut self, program: &Program) -> Vec<Instruction> {
        self.temp_index = 0;
        self.label_index = 0;
        self.code.clear();

        for func_def in program.0.iter() {
            self.gen_func_def(func_def);
        }

        std::mem::take(&mut self.code)
    }

    fn new_temp(&mut self) -> String {
        self.temp_index += 1;
        format!("t{}", self.temp_index)
    }

    fn new_label(&mut self) -> String {
        self.label_index += 1;
        format!("L{}", self.label_index)
    }

    fn emit(&mut self, instruction: Instruction) {
        trace!("emit {}", instruction);
        self.code.push(instruction);
    }

    fn gen_func_def(&mut self, func_def: &FunctionDefinition) {
        self.emit(Instruction::FuncBegin(func_def.name.clone()));
        self.gen_block(&func_def.body);
        self.emit(Instruction::FuncEnd(func_def.name.clone()));
    }

    fn gen_block(&mut self, block: &Block) {
        for stmt in block.0.iter() {
            self.gen_stmt(stmt);
        }
    }

    fn gen_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VariableDeclaration(decl) => self.gen_var_decl(decl),
            Stmt::Assignment(assign) => self.gen_assign(assign),
            Stmt::Call(call) => {
                self.gen_call(call);
            }
            Stmt::If(if_stmt) => self.gen_if(if_stmt),
            Stmt::For(for_loop) => self.gen_for(for_loop),
            Stmt::Return(ret) => self.gen_return(ret),
        }
    }

    /// A declaration without initializer emits nothing.
    fn gen_var_decl(&mut self, decl: &VariableDeclaration) {
        if let Some(init) = &decl.init {
            let src = self.gen_expr(init);
            self.emit(Instruction::Copy {
                dest: decl.name.clone(),
                src,
            });
        }
    }

    fn gen_assign(&mut self, assign: &Assignment) {
        let src = self.gen_expr(&assign.value);
        self.emit(Instruction::Copy {
            dest: assign.target.name.clone(),
            src,
        });
    }

    /// ```text
    ///     ifFalse cond goto Lelse
    ///     <then>
    ///     goto Lend
    /// Lelse:
    ///     <else>
    /// Lend:
    /// ```
    /// Both labels and the jump are emitted even without an else branch.
    fn gen_if(&mut self, if_stmt: &IfStatement) {
        let cond = self.gen_expr(&if_stmt.condition);
        let else_label = self.new_label();
        let end_label = self.new_label();

        self.emit(Instruction::IfFalse {
            cond,
            label: else_label.clone(),
        });
        self.gen_block(&if_stmt.then_block);
        self.emit(Instruction::Goto(end_label.clone()));
        self.emit(Instruction::Label(else_label));
        if let Some(else_block) = &if_stmt.else_block {
            self.gen_block(else_block);
        }
        self.emit(Instruction::Label(end_label));
    }

    /// ```text
    ///     <init>
    /// Lstart:
    ///     ifFalse cond goto Lend
    ///     <body>
    ///     <increment>
    ///     goto Lstart
    /// Lend:
    /// ```
    fn gen_for(&mut self, for_loop: &ForLoop) {
        self.gen_var_decl(&for_loop.init);
        let start_label = self.new_label();
        self.emit(Instruction::Label(start_label.clone()));

        let cond = self.gen_expr(&for_loop.condition);
        let end_label = self.new_label();
        self.emit(Instruction::IfFalse {
            cond,
            label: end_label.clone(),
        });

        self.gen_block(&for_loop.body);
        self.gen_assign(&for_loop.increment);
        self.emit(Instruction::Goto(start_label));
        self.emit(Instruction::Label(end_label));
    }

    fn gen_return(&mut self, ret: &ReturnStatement) {
        let value = ret.value.as_ref().map(|value| self.gen_expr(value));
        self.emit(Instruction::Return(value));
    }

    /// Returns the operand holding the value of `expr`.
    fn gen_expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Number(num) => num.value.clone(),
            Expr::String(s) => format!("\"{}\"", s.value),
            Expr::Ident(ident) => ident.name.clone(),
            Expr::Binary(binary) => self.gen_binary(binary),
            Expr::Unary(unary) => self.gen_unary(unary),
            Expr::Call(call) => self.gen_call(call),
        }
    }

    fn gen_binary(&mut self, binary: &BinaryOp) -> String {
        let left = self.gen_expr(&binary.left);
        let right = self.gen_expr(&binary.right);
        let dest = self.new_temp();
        self.emit(Instruction::Binary {
            dest: dest.clone(),
            left,
            op: binary.op,
            right,
        });
        dest
    }

    fn gen_unary(&mut self, unary: &UnaryOp) -> String {
        let operand = self.gen_expr(&unary.operand);
        let dest = self.new_temp();
        self.emit(Instruction::Unary {
            dest: dest.clone(),
            op: unary.op,
            operand,
        });
        dest
    }

    /// Arguments are evaluated left to right before any `param` is pushed.
    fn gen_call(&mut self, call: &FunctionCall) -> String {
        let args: Vec<_> = call.args.iter().map(|arg| self.gen_expr(arg)).collect();
        let argc = args.len();
        for arg in args {
            self.emit(Instruction::Param(arg));
        }

        let dest = self.new_temp();
        self.emit(Instruction::Call {
            dest: dest.clone(),
            func: call.name.clone(),
            argc,
        });
        dest
    }
}
