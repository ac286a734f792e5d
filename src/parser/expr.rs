use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOpKind {
    LogicalOr,
    LogicalAnd,
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOpKind {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let kind = match symbol {
            "||" => BinOpKind::LogicalOr,
            "&&" => BinOpKind::LogicalAnd,
            "==" => BinOpKind::Equal,
            "!=" => BinOpKind::NotEqual,
            "<" => BinOpKind::LessThan,
            "<=" => BinOpKind::LessEqual,
            ">" => BinOpKind::GreaterThan,
            ">=" => BinOpKind::GreaterEqual,
            "+" => BinOpKind::Add,
            "-" => BinOpKind::Sub,
            "*" => BinOpKind::Mul,
            "/" => BinOpKind::Div,
            _ => return None,
        };
        Some(kind)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinOpKind::LogicalOr => "||",
            BinOpKind::LogicalAnd => "&&",
            BinOpKind::Equal => "==",
            BinOpKind::NotEqual => "!=",
            BinOpKind::LessThan => "<",
            BinOpKind::LessEqual => "<=",
            BinOpKind::GreaterThan => ">",
            BinOpKind::GreaterEqual => ">=",
            BinOpKind::Add => "+",
            BinOpKind::Sub => "-",
            BinOpKind::Mul => "*",
            BinOpKind::Div => "/",
        }
    }
}

impl fmt::Display for BinOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOpKind {
    Neg,
    Not,
}

impl UnaryOpKind {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOpKind::Neg => "-",
            UnaryOpKind::Not => "!",
        }
    }
}

impl fmt::Display for UnaryOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Binary(BinaryOp),
    Unary(UnaryOp),
    Number(NumberLiteral),
    Ident(Identifier),
    String(StringLiteral),
    Call(FunctionCall),
}

#[derive(Clone, Debug, PartialEq)]
pub struct BinaryOp {
    pub op: BinOpKind,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UnaryOp {
    pub op: UnaryOpKind,
    pub operand: Box<Expr>,
}

/// Integer or float literal, kept as written.
#[derive(Clone, Debug, PartialEq)]
pub struct NumberLiteral {
    pub value: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Identifier {
    pub name: String,
    pub line: usize,
}

/// The contents between the quotes.
#[derive(Clone, Debug, PartialEq)]
pub struct StringLiteral {
    pub value: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
    pub line: usize,
}
