use std::io;

use treelox as lox;

use lox::error::LoxError;
use lox::interpreter::Interpreter;
use lox::parser::Parser;
use lox::resolver::Resolver;
use lox::scanner::Scanner;

fn resolve(source: &str) -> Result<(), LoxError> {
    let (tokens, scan_errors) = Scanner::new(source.as_bytes().to_vec()).scan_tokens();
    assert!(scan_errors.is_empty(), "lex errors: {:?}", scan_errors);

    let (statements, parse_errors) = Parser::new(tokens).parse();
    assert!(parse_errors.is_empty(), "parse errors: {:?}", parse_errors);

    let mut sink = io::sink();
    let mut interpreter = Interpreter::new(&mut sink);

    Resolver::new(&mut interpreter).resolve(&statements)
}

fn assert_resolve_error(source: &str, expected: &str) {
    match resolve(source) {
        Err(LoxError::Resolve { message, .. }) => assert_eq!(message, expected),

        Err(other) => panic!("expected resolve error, got {:?}", other),

        Ok(()) => panic!("expected resolve error for: {}", source),
    }
}

#[test]
fn top_level_return() {
    assert_resolve_error("return 1;", "Can't return from top-level code.");
}

#[test]
fn return_value_from_initializer() {
    assert_resolve_error(
        "class A { init() { return 1; } }",
        "Can't return a value from an initializer.",
    );
}

#[test]
fn bare_return_from_initializer_is_allowed() {
    assert!(resolve("class A { init() { return; } }").is_ok());
}

#[test]
fn duplicate_local_declaration() {
    assert_resolve_error(
        "fun f() { var a = 1; var a = 2; }",
        "Already a variable with this name in this scope.",
    );
}

#[test]
fn global_redeclaration_is_allowed() {
    assert!(resolve("var a = 1; var a = 2;").is_ok());
}

#[test]
fn read_local_in_its_own_initializer() {
    assert_resolve_error(
        "{ var a = 1; { var a = a; } }",
        "Can't read local variable in its own initializer.",
    );
}

#[test]
fn this_outside_class() {
    assert_resolve_error("print this;", "Can't use 'this' outside of a class.");
}

#[test]
fn this_in_standalone_function() {
    assert_resolve_error(
        "fun f() { return this; }",
        "Can't use 'this' outside of a class.",
    );
}

#[test]
fn super_outside_class() {
    assert_resolve_error(
        "print super.x;",
        "Can't use 'super' outside of a class.",
    );
}

#[test]
fn super_without_superclass() {
    assert_resolve_error(
        "class A { m() { return super.m(); } }",
        "Can't use 'super' in a class with no superclass.",
    );
}

#[test]
fn class_inheriting_from_itself() {
    assert_resolve_error("class A < A {}", "A class can't inherit from itself.");
}

#[test]
fn parameters_share_the_function_scope() {
    assert_resolve_error(
        "fun f(a) { var a = 1; }",
        "Already a variable with this name in this scope.",
    );
}

#[test]
fn valid_program_resolves() {
    let source = "\
        var a = 1;
        fun outer() {
            var b = a;
            fun inner() {
                return a + b;
            }
            return inner;
        }
        class A {
            init(x) { this.x = x; }
            get() { return this.x; }
        }
        class B < A {
            get() { return super.get() + 1; }
        }";

    assert!(resolve(source).is_ok());
}
