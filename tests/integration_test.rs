// Integration tests for the C-minus front end

use cminus::compile::{CompileError, Frontend};
use cminus::parser::lexer::{Token, TokenKind};
use cminus::semantic::errors::SemanticError;

fn compile(source: &str) -> Result<Vec<String>, CompileError> {
    let frontend = Frontend::new().expect("Grammar is not LL(1)");
    let code = frontend.compile(source)?;
    Ok(code.iter().map(|i| i.to_string()).collect())
}

fn semantic_errors(source: &str) -> Vec<SemanticError> {
    match compile(source) {
        Err(CompileError::Semantic(errors)) => errors,
        other => panic!("Expected semantic errors, got {:?}", other),
    }
}

#[test]
fn test_global_redefinition_reported_once() {
    let errors = semantic_errors("int x; int x;");
    assert_eq!(
        errors,
        vec![SemanticError::Redefinition {
            name: "x".to_string(),
            line: 1,
        }]
    );
}

#[test]
fn test_zero_argument_call() {
    let source = r#"
        int f(void) { return 1; }
        int main(void) {
            f();
            return 0;
        }
    "#;

    let code = compile(source).expect("Compilation failed");
    assert_eq!(
        code,
        vec![
            "f:",
            "return 1",
            "main:",
            "call f, 0",
            "_v0 := result",
            "return 0",
        ]
    );
}

#[test]
fn test_argument_count_mismatch() {
    let source = r#"
        int f(void) { return 1; }
        int main(void) {
            f(1);
            return 0;
        }
    "#;

    let errors = semantic_errors(source);
    assert_eq!(
        errors,
        vec![SemanticError::ArgumentCountMismatch {
            function: "f".to_string(),
            expected: 0,
            got: 1,
            line: 4,
        }]
    );
}

#[test]
fn test_array_write_then_read() {
    let code = compile("int main(void){ int a[3]; a[0] = 1; return a[0]; }")
        .expect("Compilation failed");
    assert_eq!(
        code,
        vec!["main:", "a[0] := 1", "_v0 := a[0]", "return _v0"]
    );

    let write = code.iter().position(|l| l == "a[0] := 1").unwrap();
    let read = code.iter().position(|l| l.ends_with(":= a[0]")).unwrap();
    let ret = code.iter().position(|l| l.starts_with("return")).unwrap();
    assert!(write < read && read < ret);
}

#[test]
fn test_while_with_empty_body() {
    let code = compile("void main(void) { while (1) { } }").expect("Compilation failed");
    assert_eq!(
        code,
        vec![
            "main:",
            "__b0:",
            "if 1 goto __b1",
            "goto __b2",
            "__b1:",
            "goto __b0",
            "__b2:",
        ]
    );

    let labels = code.iter().filter(|l| l.starts_with("__b") && l.ends_with(':')).count();
    assert_eq!(labels, 3);
}

#[test]
fn test_if_without_else() {
    let code = compile("void main(int x) { if (x) { x = 1; } }").expect("Compilation failed");
    assert_eq!(
        code,
        vec![
            "main:",
            "if x goto __b0",
            "__b1:",
            "goto __b2",
            "__b0:",
            "x := 1",
            "goto __b2",
            "__b2:",
        ]
    );
}

#[test]
fn test_gcd() {
    let source = r#"
        /* Euclid */
        int gcd(int u, int v) {
            if (v == 0) { return u; }
            else { return gcd(v, u - u / v * v); }
        }

        void main(void) {
            int x;
            int y;
            x = 12;
            y = 18;
            x = gcd(x, y);
        }
    "#;

    let code = compile(source).expect("Compilation failed");
    assert_eq!(
        code,
        vec![
            "gcd:",
            "_v0 := v == 0",
            "if _v0 goto __b0",
            "__b1:",
            "_v1 := u / v",
            "_v2 := _v1 * v",
            "_v3 := u - _v2",
            "param v",
            "param _v3",
            "call gcd, 2",
            "_v4 := result",
            "return _v4",
            "goto __b2",
            "__b0:",
            "return u",
            "goto __b2",
            "__b2:",
            "main:",
            "x := 12",
            "y := 18",
            "param x",
            "param y",
            "call gcd, 2",
            "_v5 := result",
            "x := _v5",
        ]
    );
}

#[test]
fn test_array_sum_loop() {
    let source = r#"
        int data[10];

        int sum(int a[], int n) {
            int i;
            int s;
            i = 0;
            s = 0;
            while (i < n) {
                s = s + a[i];
                i = i + 1;
            }
            return s;
        }

        int main(void) {
            return sum(data, 10);
        }
    "#;

    let code = compile(source).expect("Compilation failed");
    assert_eq!(
        code,
        vec![
            "sum:",
            "i := 0",
            "s := 0",
            "__b0:",
            "_v0 := i < n",
            "if _v0 goto __b1",
            "goto __b2",
            "__b1:",
            "_v1 := a[i]",
            "_v2 := s + _v1",
            "s := _v2",
            "_v3 := i + 1",
            "i := _v3",
            "goto __b0",
            "__b2:",
            "return s",
            "main:",
            "param data",
            "param 10",
            "call sum, 2",
            "_v4 := result",
            "return _v4",
        ]
    );
}

#[test]
fn test_errors_accumulate_across_program() {
    let source = r#"
        int g;
        void g2;
        int f(int a) { return a; }
        int f(void) { return 0; }
        int main(void) {
            int b[2];
            b[5] = missing;
            return f(1, 2) + nothing();
        }
    "#;

    let errors = semantic_errors(source);
    let lines: Vec<_> = errors.iter().map(|e| e.line()).collect();
    assert_eq!(lines, vec![3, 5, 8, 8, 9, 9]);

    assert!(matches!(errors[0], SemanticError::VoidVariable { .. }));
    assert!(matches!(errors[1], SemanticError::FunctionRedefinition { .. }));
    assert!(matches!(errors[2], SemanticError::UndefinedVariable { .. }));
    assert!(matches!(errors[3], SemanticError::IndexOutOfBounds { index: 5, length: 2, .. }));
    assert!(matches!(errors[4], SemanticError::ArgumentCountMismatch { expected: 1, got: 2, .. }));
    assert!(matches!(errors[5], SemanticError::UndefinedFunction { .. }));
}

#[test]
fn test_local_shadows_global_in_code() {
    let source = r#"
        int x[4];
        int f(void) {
            int x;
            x = 3;
            return x;
        }
    "#;

    let code = compile(source).expect("Compilation failed");
    assert_eq!(code, vec!["f:", "x := 3", "return x"]);
}

#[test]
fn test_syntax_error_is_fatal() {
    let source = "int main(void) {\n  int x;\n  x = ;\n}";
    match compile(source) {
        Err(CompileError::Syntax(e)) => assert_eq!(e.line(), 3),
        other => panic!("Expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_declaration_after_statement_rejected() {
    let source = "void main(void) { int x; x = 1; int y; }";
    assert!(matches!(compile(source), Err(CompileError::Syntax(_))));
}

#[test]
fn test_lex_error_reports_position() {
    match compile("int x;\nint y = 3 # 4;") {
        Err(CompileError::Lex(e)) => {
            assert_eq!(e.line, 2);
            assert_eq!(e.column, 11);
        }
        other => panic!("Expected lex error, got {:?}", other),
    }
}

#[test]
fn test_long_statement_list() {
    let mut source = String::from("void main(void) {\n  int x;\n");
    for _ in 0..50_000 {
        source.push_str("  x = 1;\n");
    }
    source.push_str("}\n");

    let code = compile(&source).expect("Compilation failed");
    assert_eq!(code.len(), 50_001);
    assert_eq!(code[0], "main:");
    assert!(code[1..].iter().all(|line| line == "x := 1"));
}

#[test]
fn test_many_global_definitions() {
    let mut source = String::new();
    for i in 0..50_000 {
        source.push_str(&format!("int g{};\n", i));
    }
    source.push_str("int main(void) { return g49999; }\n");

    let code = compile(&source).expect("Compilation failed");
    assert_eq!(code, vec!["main:", "return g49999"]);
}

/// `int a[<length>];` as tokens, bypassing the lexer's literal check.
fn array_definition(length: &str) -> Vec<Token> {
    vec![
        Token::new(TokenKind::Int, "int", 1),
        Token::new(TokenKind::Ident, "a", 1),
        Token::new(TokenKind::LBracket, "[", 1),
        Token::new(TokenKind::Num, length, 1),
        Token::new(TokenKind::RBracket, "]", 1),
        Token::new(TokenKind::Semicolon, ";", 1),
    ]
}

#[test]
fn test_array_length_overflowing_storage() {
    let frontend = Frontend::new().expect("Grammar is not LL(1)");
    match frontend.compile_tokens(&array_definition("4611686018427387904")) {
        Err(CompileError::Semantic(errors)) => assert_eq!(
            errors,
            vec![SemanticError::StorageOverflow {
                name: "a".to_string(),
                line: 1,
            }]
        ),
        other => panic!("Expected semantic errors, got {:?}", other),
    }
}

#[test]
fn test_unrepresentable_array_length() {
    let frontend = Frontend::new().expect("Grammar is not LL(1)");
    let tokens = array_definition("99999999999999999999999999");
    let tree = frontend.parse_tokens(&tokens).expect("Parse failed");
    let evaluation = frontend.analyze(&tree);

    assert_eq!(
        evaluation.errors,
        vec![SemanticError::InvalidArrayLength {
            name: "a".to_string(),
            length: "99999999999999999999999999".to_string(),
            line: 1,
        }]
    );
    assert!(evaluation.symbols.global.is_empty());
}
