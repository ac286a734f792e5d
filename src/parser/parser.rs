use log::debug;

use crate::error::SyntaxError;
use crate::lexer::{Token, TokenKind};

use super::{
    Assignment, BinOpKind, BinaryOp, Block, Expr, ForLoop, FunctionCall, FunctionDefinition,
    Identifier, IfStatement, NumberLiteral, Param, Program, ReturnStatement, Stmt, StringLiteral,
    TypeSpecifier, UnaryOp, UnaryOpKind, VariableDeclaration,
};

type ParseResult<T> = Result<T, SyntaxError>;

/// The AST together with every syntax error met on the way.
///
/// When `errors` is not empty the program is partial and must not be handed
/// to later stages.
#[derive(Clone, Debug, PartialEq)]
pub struct Parsed {
    pub program: Program,
    pub errors: Vec<SyntaxError>,
}

#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
    errors: Vec<SyntaxError>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            index: 0,
            errors: vec![],
        }
    }

    pub fn parse(&mut self) -> Parsed {
        let program = self.parse_program();
        Parsed {
            program,
            errors: std::mem::take(&mut self.errors),
        }
    }

    fn is_eof(&self) -> bool {
        self.index >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.index + n)
    }

    fn check(&self, kind: TokenKind, text: &str) -> bool {
        self.peek().is_some_and(|t| t.is(kind, text))
    }

    fn consume(&mut self, kind: TokenKind, text: &str) -> bool {
        if !self.check(kind, text) {
            return false;
        }
        self.index += 1;
        true
    }

    /// On mismatch the offending token is skipped, so a failed `expect`
    /// always makes progress.
    fn expect(&mut self, kind: TokenKind, text: Option<&str>) -> ParseResult<Token> {
        let expected = match text {
            Some(text) => format!("'{}'", text),
            None => kind.to_string(),
        };
        let Some(t) = self.peek().cloned() else {
            return Err(SyntaxError::new(
                format!("Expected {} but reached end of input", expected),
                None,
            ));
        };
        self.index += 1;
        if t.kind != kind || text.is_some_and(|text| t.text != text) {
            return Err(SyntaxError::new(
                format!("Expected {} but found '{}'", expected, t.text),
                Some(t.line),
            ));
        }
        Ok(t)
    }

    fn error_here(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message, self.peek().map(|t| t.line))
    }

    /// Panic-mode recovery: drop tokens up to the next `;` (consumed) or `}`
    /// (left for the enclosing block).
    fn synchronize(&mut self) {
        let start = self.index;
        while let Some(t) = self.peek() {
            if t.is(TokenKind::Separator, ";") {
                self.index += 1;
                break;
            }
            if t.is(TokenKind::Separator, "}") {
                break;
            }
            self.index += 1;
        }
        debug!("recovered after skipping {} tokens", self.index - start);
    }

    /// program = func*
    ///
    /// A failing function definition ends the whole parse.
    fn parse_program(&mut self) -> Program {
        let mut funcs = vec![];

        while !self.is_eof() {
            match self.parse_func() {
                Ok(func) => funcs.push(func),
                Err(e) => {
                    debug!("aborting parse at top level: {}", e);
                    self.errors.push(e);
                    break;
                }
            }
        }

        Program(funcs)
    }

    /// func = ("int" | "void") ident "(" params? ")" block
    fn parse_func(&mut self) -> ParseResult<FunctionDefinition> {
        let t = self.expect(TokenKind::Keyword, None)?;
        let return_type = match t.text.as_str() {
            "int" => TypeSpecifier::Int,
            "void" => TypeSpecifier::Void,
            other => {
                return Err(SyntaxError::new(
                    format!("Expected return type but found '{}'", other),
                    Some(t.line),
                ))
            }
        };

        let name = self.expect(TokenKind::Identifier, None)?;
        self.expect(TokenKind::Separator, Some("("))?;
        let params = self.parse_params()?;
        self.expect(TokenKind::Separator, Some(")"))?;
        let body = self.parse_block()?;

        Ok(FunctionDefinition {
            return_type,
            name: name.text,
            params,
            body,
            line: name.line,
        })
    }

    /// params = param ("," param)*
    /// param  = "int" ident
    fn parse_params(&mut self) -> ParseResult<Vec<Param>> {
        let mut params = vec![];
        if self.check(TokenKind::Separator, ")") {
            return Ok(params);
        }

        loop {
            self.expect(TokenKind::Keyword, Some("int"))?;
            let name = self.expect(TokenKind::Identifier, None)?;
            params.push(Param {
                ty: TypeSpecifier::Int,
                name: name.text,
                line: name.line,
            });
            if !self.consume(TokenKind::Separator, ",") {
                break;
            }
        }

        Ok(params)
    }

    /// block = "{" stmt* "}"
    fn parse_block(&mut self) -> ParseResult<Block> {
        self.expect(TokenKind::Separator, Some("{"))?;

        let mut stmts = vec![];
        while !self.is_eof() && !self.check(TokenKind::Separator, "}") {
            match self.parse_stmt() {
                Ok(stmt) => stmts.push(stmt),
                Err(e) => {
                    debug!("statement failed: {}", e);
                    self.errors.push(e);
                    self.synchronize();
                }
            }
        }

        self.expect(TokenKind::Separator, Some("}"))?;
        Ok(Block(stmts))
    }

    /// stmt = var_decl
    ///      | "if" "(" expr ")" block ("else" block)?
    ///      | "for" "(" var_decl expr ";" assign ")" block
    ///      | "return" expr? ";"
    ///      | call ";"
    ///      | assign ";"
    fn parse_stmt(&mut self) -> ParseResult<Stmt> {
        let Some(t) = self.peek() else {
            return Err(self.error_here("Expected statement but reached end of input"));
        };
        let (kind, text, line) = (t.kind, t.text.clone(), t.line);
        let next_is = |p: &Self, kind: TokenKind, text: &str| {
            p.peek_nth(1).is_some_and(|t| t.is(kind, text))
        };

        match (kind, text.as_str()) {
            (TokenKind::Keyword, "int") => Ok(Stmt::VariableDeclaration(self.parse_var_decl()?)),
            (TokenKind::Keyword, "if") => Ok(Stmt::If(self.parse_if()?)),
            (TokenKind::Keyword, "for") => Ok(Stmt::For(self.parse_for()?)),
            (TokenKind::Keyword, "return") => Ok(Stmt::Return(self.parse_return()?)),
            (TokenKind::Keyword, "printf") => {
                let call = self.parse_call()?;
                self.expect(TokenKind::Separator, Some(";"))?;
                Ok(Stmt::Call(call))
            }
            (TokenKind::Identifier, _) if next_is(self, TokenKind::Separator, "(") => {
                let call = self.parse_call()?;
                self.expect(TokenKind::Separator, Some(";"))?;
                Ok(Stmt::Call(call))
            }
            (TokenKind::Identifier, _) if next_is(self, TokenKind::Operator, "=") => {
                let assign = self.parse_assign()?;
                self.expect(TokenKind::Separator, Some(";"))?;
                Ok(Stmt::Assignment(assign))
            }
            _ => Err(SyntaxError::new(
                format!("Invalid statement starting with '{}'", text),
                Some(line),
            )),
        }
    }

    /// var_decl = "int" ident ("=" expr)? ";"
    fn parse_var_decl(&mut self) -> ParseResult<VariableDeclaration> {
        self.expect(TokenKind::Keyword, Some("int"))?;
        let name = self.expect(TokenKind::Identifier, None)?;
        let init = if self.consume(TokenKind::Operator, "=") {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Separator, Some(";"))?;

        Ok(VariableDeclaration {
            name: name.text,
            init,
            line: name.line,
        })
    }

    /// assign = ident "=" expr
    fn parse_assign(&mut self) -> ParseResult<Assignment> {
        let target = self.expect(TokenKind::Identifier, None)?;
        self.expect(TokenKind::Operator, Some("="))?;
        let value = self.parse_expr()?;

        Ok(Assignment {
            target: Identifier {
                name: target.text,
                line: target.line,
            },
            value,
        })
    }

    fn parse_if(&mut self) -> ParseResult<IfStatement> {
        self.expect(TokenKind::Keyword, Some("if"))?;
        self.expect(TokenKind::Separator, Some("("))?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::Separator, Some(")"))?;
        let then_block = self.parse_block()?;
        let else_block = if self.consume(TokenKind::Keyword, "else") {
            Some(self.parse_block()?)
        } else {
            None
        };

        Ok(IfStatement {
            condition,
            then_block,
            else_block,
        })
    }

    /// The increment clause is a bare assignment with no trailing `;`.
    fn parse_for(&mut self) -> ParseResult<ForLoop> {
        self.expect(TokenKind::Keyword, Some("for"))?;
        self.expect(TokenKind::Separator, Some("("))?;
        let init = self.parse_var_decl()?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::Separator, Some(";"))?;
        let increment = self.parse_assign()?;
        self.expect(TokenKind::Separator, Some(")"))?;
        let body = self.parse_block()?;

        Ok(ForLoop {
            init,
            condition,
            increment,
            body,
        })
    }

    fn parse_return(&mut self) -> ParseResult<ReturnStatement> {
        let t = self.expect(TokenKind::Keyword, Some("return"))?;
        let value = if self.check(TokenKind::Separator, ";") {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Separator, Some(";"))?;

        Ok(ReturnStatement {
            value,
            line: t.line,
        })
    }

    /// call = (ident | "printf") "(" (expr ("," expr)*)? ")"
    fn parse_call(&mut self) -> ParseResult<FunctionCall> {
        let name = match self.peek() {
            Some(t) if t.kind == TokenKind::Identifier || t.is(TokenKind::Keyword, "printf") => {
                let t = t.clone();
                self.index += 1;
                t
            }
            _ => return Err(self.error_here("Expected function name")),
        };

        self.expect(TokenKind::Separator, Some("("))?;
        let mut args = vec![];
        if !self.check(TokenKind::Separator, ")") {
            args.push(self.parse_expr()?);
            while self.consume(TokenKind::Separator, ",") {
                args.push(self.parse_expr()?);
            }
        }
        self.expect(TokenKind::Separator, Some(")"))?;

        Ok(FunctionCall {
            name: name.text,
            args,
            line: name.line,
        })
    }

    /// Consumes the next token if it is one of the operators in `ops`.
    fn consume_binop(&mut self, ops: &[&str]) -> Option<BinOpKind> {
        let t = self.peek()?;
        if t.kind != TokenKind::Operator || !ops.contains(&t.text.as_str()) {
            return None;
        }
        let kind = BinOpKind::from_symbol(&t.text)?;
        self.index += 1;
        Some(kind)
    }

    /// Left fold of `next (op next)*`.
    fn parse_left_assoc(
        &mut self,
        ops: &[&str],
        next: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let mut left = next(self)?;
        while let Some(op) = self.consume_binop(ops) {
            let right = next(self)?;
            left = Expr::Binary(BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    /// expr = logical_and ("||" logical_and)*
    fn parse_expr(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&["||"], Self::parse_logical_and)
    }

    /// logical_and = comparison ("&&" comparison)*
    fn parse_logical_and(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&["&&"], Self::parse_comparison)
    }

    /// comparison = add (("<" | ">" | "==" | "!=" | "<=" | ">=") add)*
    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&["<", ">", "==", "!=", "<=", ">="], Self::parse_add)
    }

    /// add = mul (("+" | "-") mul)*
    fn parse_add(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&["+", "-"], Self::parse_mul)
    }

    /// mul = unary (("*" | "/") unary)*
    fn parse_mul(&mut self) -> ParseResult<Expr> {
        self.parse_left_assoc(&["*", "/"], Self::parse_unary)
    }

    /// unary = ("-" | "!") unary
    ///       | primary
    fn parse_unary(&mut self) -> ParseResult<Expr> {
        let op = if self.consume(TokenKind::Operator, "-") {
            UnaryOpKind::Neg
        } else if self.consume(TokenKind::Operator, "!") {
            UnaryOpKind::Not
        } else {
            return self.parse_primary();
        };

        Ok(Expr::Unary(UnaryOp {
            op,
            operand: Box::new(self.parse_unary()?),
        }))
    }

    /// primary = num
    ///         | string
    ///         | call
    ///         | ident
    ///         | "(" expr ")"
    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let Some(t) = self.peek().cloned() else {
            return Err(SyntaxError::new(
                "Expected expression but reached end of input",
                None,
            ));
        };
        let is_call = self
            .peek_nth(1)
            .is_some_and(|n| n.is(TokenKind::Separator, "("));

        match t.kind {
            TokenKind::IntLit | TokenKind::FloatLit => {
                self.index += 1;
                Ok(Expr::Number(NumberLiteral { value: t.text }))
            }
            TokenKind::StringLit => {
                self.index += 1;
                let value = t
                    .text
                    .strip_prefix('"')
                    .and_then(|s| s.strip_suffix('"'))
                    .unwrap_or(&t.text)
                    .to_string();
                Ok(Expr::String(StringLiteral { value }))
            }
            TokenKind::Identifier if is_call => Ok(Expr::Call(self.parse_call()?)),
            TokenKind::Keyword if t.text == "printf" && is_call => {
                Ok(Expr::Call(self.parse_call()?))
            }
            TokenKind::Identifier => {
                self.index += 1;
                Ok(Expr::Ident(Identifier {
                    name: t.text,
                    line: t.line,
                }))
            }
            TokenKind::Separator if t.text == "(" => {
                self.index += 1;
                let expr = self.parse_expr()?;
                self.expect(TokenKind::Separator, Some(")"))?;
                Ok(expr)
            }
            _ => Err(SyntaxError::new(
                format!("Unexpected token '{}' in expression", t.text),
                Some(t.line),
            )),
        }
    }
}
