use super::{Expr, FunctionCall, Identifier};

#[derive(Clone, Debug, PartialEq)]
pub struct Program(pub Vec<FunctionDefinition>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeSpecifier {
    Void,
    Int,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDefinition {
    pub return_type: TypeSpecifier,
    pub name: String,
    pub params: Vec<Param>,
    pub body: Block,
    pub line: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub ty: TypeSpecifier,
    pub name: String,
    pub line: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Block(pub Vec<Stmt>);

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    VariableDeclaration(VariableDeclaration),
    Assignment(Assignment),
    Call(FunctionCall),
    If(IfStatement),
    For(ForLoop),
    Return(ReturnStatement),
}

/// `int name (= init)?;`
#[derive(Clone, Debug, PartialEq)]
pub struct VariableDeclaration {
    pub name: String,
    pub init: Option<Expr>,
    pub line: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Assignment {
    pub target: Identifier,
    pub value: Expr,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IfStatement {
    pub condition: Expr,
    pub then_block: Block,
    pub else_block: Option<Block>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ForLoop {
    pub init: VariableDeclaration,
    pub condition: Expr,
    pub increment: Assignment,
    pub body: Block,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReturnStatement {
    pub value: Option<Expr>,
    pub line: usize,
}
