use tacc::analyzer::SymbolTable;
use tacc::lexer::TokenKind;
use tacc::parser::*;
use tacc::{analyze, compile, generate, parse, tokenize, Outcome};

const SQUARE_PROGRAM: &str = "
int square(int n) { return n * n; }
int main() { int x = 5; for (int i = 0; i < 2; i = i + 1) { int y = square(i); printf(\"val\", y); } return x; }
";

fn generate_ast(input: &str) -> Parsed {
    let tokens = tokenize(input).unwrap();
    parse(tokens)
}

fn semantic_messages(input: &str) -> Vec<(String, Option<usize>)> {
    let parsed = generate_ast(input);
    assert!(parsed.errors.is_empty(), "{:?}", parsed.errors);
    analyze(&parsed.program)
        .errors
        .into_iter()
        .map(|e| (e.message, e.line))
        .collect()
}

fn tac(input: &str) -> Vec<String> {
    match compile(input).unwrap() {
        Outcome::Compiled(artifacts) => artifacts.tac,
        Outcome::Halted(diagnostics) => panic!("{:?}", diagnostics),
    }
}

#[test]
fn float_literal_is_one_token() {
    let tokens = tokenize("3.14").unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::FloatLit);
    assert_eq!(tokens[0].text, "3.14");
}

#[test]
fn token_positions_never_go_backwards() {
    let tokens = tokenize(SQUARE_PROGRAM).unwrap();
    for pair in tokens.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!((a.line, a.column) < (b.line, b.column), "{:?} then {:?}", a, b);
    }
}

#[test]
fn well_formed_program_has_one_child_per_function() {
    let parsed = generate_ast(SQUARE_PROGRAM);
    assert!(parsed.errors.is_empty());
    assert_eq!(parsed.program.0.len(), 2);
    assert_eq!(parsed.program.0[0].name, "square");
    assert_eq!(parsed.program.0[0].params.len(), 1);
    assert_eq!(parsed.program.0[1].return_type, TypeSpecifier::Int);
}

#[test]
fn precedence_climbs_from_or_to_mul() {
    let parsed = generate_ast("int main() { return a || b && c < d + e * f; }");
    let Stmt::Return(ReturnStatement {
        value: Some(Expr::Binary(or)),
        ..
    }) = &parsed.program.0[0].body.0[0]
    else {
        panic!();
    };
    assert_eq!(or.op, BinOpKind::LogicalOr);
    let Expr::Binary(and) = &*or.right else {
        panic!();
    };
    assert_eq!(and.op, BinOpKind::LogicalAnd);
    let Expr::Binary(lt) = &*and.right else {
        panic!();
    };
    assert_eq!(lt.op, BinOpKind::LessThan);
    let Expr::Binary(add) = &*lt.right else {
        panic!();
    };
    assert_eq!(add.op, BinOpKind::Add);
    let Expr::Binary(mul) = &*add.right else {
        panic!();
    };
    assert_eq!(mul.op, BinOpKind::Mul);
}

#[test]
fn binary_operators_fold_left() {
    let code = tac("int f(int a, int b, int c) { return a - b - c; }");
    assert_eq!(code[1], "t1 = a - b");
    assert_eq!(code[2], "t2 = t1 - c");
    assert_eq!(code[3], "return t2");
}

#[test]
fn unary_operators_bind_tighter_than_mul() {
    let code = tac("int f(int a) { return -a * 2; }");
    assert_eq!(code[1], "t1 = -a");
    assert_eq!(code[2], "t2 = t1 * 2");
}

#[test]
fn statement_errors_are_recovered() {
    let input = "int main() {
  int x = ;
  int y = 2;
  x = 3
  y = 4;
}";
    let parsed = generate_ast(input);
    let lines: Vec<_> = parsed.errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, vec![Some(2), Some(5)]);
    assert_eq!(parsed.program.0.len(), 1);
    assert_eq!(parsed.program.0[0].body.0.len(), 1);
}

#[test]
fn for_increment_must_be_an_assignment() {
    let parsed = generate_ast("int main() { for (int i = 0; i < 2; f(i)) { } return 0; }");
    assert!(!parsed.errors.is_empty());
    assert_eq!(parsed.errors[0].message, "Expected '=' but found '('");
    assert_eq!(parsed.errors[0].line, Some(1));
}

#[test]
fn while_is_reserved_but_not_a_statement() {
    let parsed = generate_ast("int main() {\n  while (1) { }\n  return 0;\n}");
    assert!(!parsed.errors.is_empty());
    assert_eq!(
        parsed.errors[0].message,
        "Invalid statement starting with 'while'"
    );
    assert_eq!(parsed.errors[0].line, Some(2));
}

#[test]
fn parameters_must_be_int() {
    let parsed = generate_ast("int f(void x) { return 0; }");
    assert!(parsed.program.0.is_empty());
    assert_eq!(parsed.errors.len(), 1);
    assert_eq!(parsed.errors[0].message, "Expected 'int' but found 'void'");
}

#[test]
fn return_type_must_be_int_or_void() {
    let parsed = generate_ast("if main() { return 0; }");
    assert!(parsed.program.0.is_empty());
    assert_eq!(parsed.errors.len(), 1);
    assert_eq!(
        parsed.errors[0].to_string(),
        "Syntax error at line 1: Expected return type but found 'if'"
    );
}

#[test]
fn top_level_error_aborts_parse() {
    let parsed = generate_ast("int main() { return 0; }\n5 int f() { }");
    assert_eq!(parsed.program.0.len(), 1);
    assert_eq!(parsed.errors.len(), 1);
    assert_eq!(parsed.errors[0].line, Some(2));
}

#[test]
fn missing_close_brace_reports_eof() {
    let parsed = generate_ast("int main() { return 0;");
    assert_eq!(parsed.errors.len(), 1);
    assert_eq!(parsed.errors[0].line, None);
    assert_eq!(
        parsed.errors[0].to_string(),
        "Syntax error at EOF: Expected '}' but reached end of input"
    );
}

#[test]
fn mismatch_character_surfaces_as_syntax_error() {
    let parsed = generate_ast("int main() {\n  @\n  return 0;\n}");
    assert_eq!(parsed.errors.len(), 1);
    assert_eq!(parsed.errors[0].line, Some(2));
    assert!(parsed.errors[0].message.contains("Invalid statement"));
}

#[test]
fn block_local_names_do_not_leak() {
    let input = "int main() {
  if (1) { int inner = 1; } else { int other = inner; }
  return inner;
}";
    assert_eq!(
        semantic_messages(input),
        vec![
            ("Undeclared variable 'inner'".to_string(), Some(2)),
            ("Undeclared variable 'inner'".to_string(), Some(3)),
        ]
    );
}

#[test]
fn redeclaration_in_same_scope_is_one_error() {
    let errors = semantic_messages("int main() { int x = 1; int x = 2; return x; }");
    assert_eq!(
        errors,
        vec![("Variable 'x' already declared".to_string(), Some(1))]
    );
}

#[test]
fn shadowing_in_nested_scope_is_allowed() {
    let errors = semantic_messages(
        "int main() { int x = 1; if (x) { int x = 2; } for (int x = 0; x < 1; x = x + 1) { int x = 3; } return x; }",
    );
    assert!(errors.is_empty(), "{:?}", errors);
}

#[test]
fn every_undefined_reference_is_reported_with_its_line() {
    let input = "int main() {
  int a = b;
  c = 1;
  foo(a);
  return b;
}";
    assert_eq!(
        semantic_messages(input),
        vec![
            ("Undeclared variable 'b'".to_string(), Some(2)),
            ("Undeclared variable 'c'".to_string(), Some(3)),
            ("Function 'foo' not defined".to_string(), Some(4)),
            ("Undeclared variable 'b'".to_string(), Some(5)),
        ]
    );
}

#[test]
fn calling_a_variable_is_an_error() {
    let errors = semantic_messages("int main() { int f = 1; f(2); return 0; }");
    assert_eq!(errors, vec![("'f' is not a function".to_string(), Some(1))]);
}

#[test]
fn function_redefinition_is_an_error() {
    let errors = semantic_messages("int f() { return 1; }\nint f() { return 2; }");
    assert_eq!(
        errors,
        vec![("Function 'f' already defined".to_string(), Some(2))]
    );
}

#[test]
fn functions_are_registered_globally() {
    let parsed = generate_ast("int helper() { return 1; } int main() { return helper(); }");
    let analysis = analyze(&parsed.program);
    assert!(analysis.errors.is_empty());

    let table = &analysis.symbol_table;
    let global = table.scope(SymbolTable::GLOBAL);
    assert!(global.get("helper").is_some());
    assert!(global.get("main").is_some());
    assert!(global.get("printf").is_some());
    assert_eq!(analysis.scopes()[1].get("helper"), None);
}

#[test]
fn scope_symbols_follow_declaration_order() {
    let parsed = generate_ast("int main() { int b = 1; int a = 2; return a; }");
    let analysis = analyze(&parsed.program);
    let names: Vec<_> = analysis.scopes()[1]
        .symbols()
        .iter()
        .map(|s| s.name.as_str())
        .collect();
    assert_eq!(names, vec!["b", "a"]);
}

#[test]
fn if_else_lowering_shape() {
    let code = tac(
        "int main() { int c = 1; int r = 0; if (c) { r = 1; } else { r = 2; } return r; }",
    );
    assert_eq!(
        code,
        vec![
            "func begin main",
            "c = 1",
            "r = 0",
            "ifFalse c goto L1",
            "r = 1",
            "goto L2",
            "L1:",
            "r = 2",
            "L2:",
            "return r",
            "func end main",
        ]
    );
}

#[test]
fn if_without_else_keeps_both_labels_and_jump() {
    let code = tac("int main() { int c = 1; if (c) { c = 2; } return c; }");
    let labels: Vec<_> = code.iter().filter(|l| l.ends_with(':')).collect();
    let jumps: Vec<_> = code.iter().filter(|l| l.starts_with("goto ")).collect();
    assert_eq!(labels, vec!["L1:", "L2:"]);
    assert_eq!(jumps, vec!["goto L2"]);

    let jump_at = code.iter().position(|l| l == "goto L2").unwrap();
    assert_eq!(code[jump_at - 1], "c = 2");
    assert_eq!(code[jump_at + 1], "L1:");
}

#[test]
fn for_loop_lowering_order() {
    let code = tac("int main() { for (int i = 0; i < 2; i = i + 1) { } return 0; }");
    assert_eq!(
        code,
        vec![
            "func begin main",
            "i = 0",
            "L1:",
            "t1 = i < 2",
            "ifFalse t1 goto L2",
            "t2 = i + 1",
            "i = t2",
            "goto L1",
            "L2:",
            "return 0",
            "func end main",
        ]
    );
}

#[test]
fn square_program_end_to_end() {
    let Outcome::Compiled(artifacts) = compile(SQUARE_PROGRAM).unwrap() else {
        panic!("expected a clean compile");
    };

    let names: Vec<_> = artifacts.scopes.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["global", "square", "main", "for-loop", "block"]);
    let parents: Vec<_> = artifacts
        .scopes
        .iter()
        .map(|s| s.parent.map(|p| p.index()))
        .collect();
    assert_eq!(parents, vec![None, Some(0), Some(0), Some(2), Some(3)]);

    assert_eq!(
        artifacts.tac,
        vec![
            "func begin square",
            "t1 = n * n",
            "return t1",
            "func end square",
            "func begin main",
            "x = 5",
            "i = 0",
            "L1:",
            "t2 = i < 2",
            "ifFalse t2 goto L2",
            "param i",
            "t3 = call square, 1",
            "y = t3",
            "param \"val\"",
            "param y",
            "t4 = call printf, 2",
            "t5 = i + 1",
            "i = t5",
            "goto L1",
            "L2:",
            "return x",
            "func end main",
        ]
    );
}

#[test]
fn syntax_errors_halt_before_analysis() {
    let Outcome::Halted(diagnostics) = compile("int main() { return y }").unwrap() else {
        panic!();
    };
    assert!(!diagnostics.syntax.is_empty());
    assert!(diagnostics.semantic.is_empty());
}

#[test]
fn semantic_errors_halt_before_generation() {
    let outcome = compile("int main() { return y; }").unwrap();
    assert!(!outcome.is_compiled());
    let Outcome::Halted(diagnostics) = outcome else {
        panic!();
    };
    assert!(diagnostics.syntax.is_empty());
    assert_eq!(diagnostics.semantic.len(), 1);
    assert_eq!(
        diagnostics.semantic[0].to_string(),
        "Semantic error at line 1: Undeclared variable 'y'"
    );
}

#[test]
fn generate_restarts_numbering_each_run() {
    let parsed = generate_ast("int f(int a) { return a * a; }");
    assert_eq!(generate(&parsed.program), generate(&parsed.program));
    assert_eq!(generate(&parsed.program)[1], "t1 = a * a");
}

#[test]
fn bare_return_and_void_functions() {
    let code = tac("void log_it(int v) { printf(v); return; } int main() { log_it(1); return 0; }");
    assert_eq!(
        code[..5],
        [
            "func begin log_it",
            "param v",
            "t1 = call printf, 1",
            "return",
            "func end log_it",
        ]
    );
}

#[test]
fn unreadable_input_is_reported_on_stderr() {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_tacc"))
        .arg("no/such/file.c")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read input"), "{}", stderr);
}
