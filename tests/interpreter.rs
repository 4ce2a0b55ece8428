use treelox as lox;

use lox::error::LoxError;
use lox::interpreter::Interpreter;
use lox::parser::Parser;
use lox::resolver::Resolver;
use lox::scanner::Scanner;

/// Run a program through the full pipeline and return everything it printed.
fn run(source: &str) -> Result<String, LoxError> {
    let (tokens, scan_errors) = Scanner::new(source.as_bytes().to_vec()).scan_tokens();
    assert!(scan_errors.is_empty(), "lex errors: {:?}", scan_errors);

    let (statements, parse_errors) = Parser::new(tokens).parse();
    assert!(parse_errors.is_empty(), "parse errors: {:?}", parse_errors);

    let mut buffer: Vec<u8> = Vec::new();

    {
        let mut interpreter = Interpreter::new(&mut buffer);

        Resolver::new(&mut interpreter).resolve(&statements)?;
        interpreter.interpret(&statements)?;
    }

    Ok(String::from_utf8(buffer)?)
}

fn assert_output(source: &str, expected: &str) {
    match run(source) {
        Ok(output) => assert_eq!(output, expected),
        Err(e) => panic!("program failed: {}", e),
    }
}

fn assert_runtime_error(source: &str, expected: &str) {
    match run(source) {
        Err(LoxError::Runtime { message, .. }) => assert_eq!(message, expected),

        Err(other) => panic!("expected runtime error, got {:?}", other),

        Ok(output) => panic!("expected runtime error, program printed: {:?}", output),
    }
}

// ─────────────────────────────────────────────────────────────────────────
// Expressions and operators
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn arithmetic() {
    assert_output("print 1 + 2;", "3\n");
    assert_output("print 7 - 2 * 3;", "1\n");
    assert_output("print (7 - 2) * 3;", "15\n");
    assert_output("print -4 / 2;", "-2\n");
    assert_output("print 0.5 + 0.25;", "0.75\n");
}

#[test]
fn string_concatenation() {
    assert_output("print \"a\" + \"b\";", "ab\n");
}

#[test]
fn plus_type_mismatch() {
    assert_runtime_error(
        "print 1 + \"a\";",
        "Operands must be two numbers or two strings.",
    );
}

#[test]
fn comparison_requires_numbers() {
    assert_runtime_error("print \"a\" < \"b\";", "Operands must be numbers.");
}

#[test]
fn unary_minus_requires_number() {
    assert_runtime_error("print -\"a\";", "Operand must be a number.");
}

#[test]
fn division_by_zero_is_ieee() {
    assert_output("print 1 / 0; print 10 / 0 > 100;", "inf\ntrue\n");
}

#[test]
fn equality_semantics() {
    assert_output("print nil == nil;", "true\n");
    assert_output("print nil == false;", "false\n");
    assert_output("print \"a\" == \"a\";", "true\n");
    assert_output("print 0 == false;", "false\n");
    assert_output("print 1 == 1;", "true\n");
    assert_output("print 1 != 2;", "true\n");
}

#[test]
fn truthiness() {
    assert_output("print !nil; print !false; print !0; print !\"\";", "true\ntrue\nfalse\nfalse\n");
}

#[test]
fn short_circuit_returns_operand() {
    assert_output("print \"hi\" or 2;", "hi\n");
    assert_output("print nil or \"yes\";", "yes\n");
    assert_output("print nil and 2;", "nil\n");
    assert_output("print 1 and 2;", "2\n");
}

#[test]
fn number_formatting() {
    assert_output("print 3;", "3\n");
    assert_output("print 3.0;", "3\n");
    assert_output("print 2.5;", "2.5\n");
}

// ─────────────────────────────────────────────────────────────────────────
// Variables and scope
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn uninitialized_variable_is_nil() {
    assert_output("var a; print a;", "nil\n");
}

#[test]
fn assignment_is_an_expression() {
    assert_output("var a = 1; print a = 2; print a;", "2\n2\n");
}

#[test]
fn undefined_variable_read() {
    assert_runtime_error("print missing;", "Undefined variable 'missing'.");
}

#[test]
fn undefined_variable_assign() {
    assert_runtime_error("missing = 1;", "Undefined variable 'missing'.");
}

#[test]
fn variable_scoping() {
    let source = "\
        var a = \"global a\";
        var b = \"global b\";
        {
            var a = \"outer a\";
            {
                var a = \"inner a\";
                print a;
                print b;
            }
            print a;
        }
        print a;";

    assert_output(source, "inner a\nglobal b\nouter a\nglobal a\n");
}

#[test]
fn lexical_resolution_is_static() {
    // the closure keeps seeing the global `a`, not the later shadow
    let source = "\
        var a = \"global\";
        {
            fun showA() {
                print a;
            }
            showA();
            var a = \"block\";
            showA();
        }";

    assert_output(source, "global\nglobal\n");
}

// ─────────────────────────────────────────────────────────────────────────
// Control flow
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn if_else() {
    assert_output("if (1 < 2) print \"yes\"; else print \"no\";", "yes\n");
    assert_output("if (nil) print \"yes\"; else print \"no\";", "no\n");
}

#[test]
fn while_loop() {
    assert_output(
        "var i = 0; while (i < 3) { print i; i = i + 1; }",
        "0\n1\n2\n",
    );
}

#[test]
fn for_loop() {
    assert_output("for (var i = 0; i < 3; i = i + 1) print i;", "0\n1\n2\n");
}

#[test]
fn for_loop_without_clauses() {
    assert_output(
        "var i = 10; for (; i > 7;) { print i; i = i - 1; }",
        "10\n9\n8\n",
    );
}

// ─────────────────────────────────────────────────────────────────────────
// Functions and closures
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn function_call_and_return() {
    assert_output(
        "fun add(a, b) { return a + b; } print add(1, 2);",
        "3\n",
    );
}

#[test]
fn function_without_return_yields_nil() {
    assert_output("fun f() {} print f();", "nil\n");
}

#[test]
fn return_skips_rest_of_body() {
    assert_output(
        "fun f() { return 1; print \"unreachable\"; } print f();",
        "1\n",
    );
}

#[test]
fn recursion() {
    assert_output(
        "fun fib(n) { if (n <= 1) return n; return fib(n - 2) + fib(n - 1); } print fib(12);",
        "144\n",
    );
}

#[test]
fn first_class_functions() {
    assert_output(
        "fun greet(name) { print \"hi \" + name; } var f = greet; f(\"lox\");",
        "hi lox\n",
    );
}

#[test]
fn function_stringification() {
    assert_output("fun f() {} print f; print clock;", "<fn f>\n<native fn>\n");
}

#[test]
fn closure_counter() {
    let source = "\
        fun make() {
            var x = 0;
            fun inc() {
                x = x + 1;
                return x;
            }
            return inc;
        }
        var f = make();
        print f();
        print f();
        print f();";

    assert_output(source, "1\n2\n3\n");
}

#[test]
fn closures_capture_the_declaration_scope() {
    let source = "\
        var f;
        {
            var divisor = 2;
            fun half(n) {
                return n / divisor;
            }
            f = half;
        }
        var divisor = 100;
        print f(8);";

    assert_output(source, "4\n");
}

#[test]
fn arity_mismatch() {
    assert_runtime_error(
        "fun f(a, b) {} f(1);",
        "Expected 2 arguments but got 1.",
    );
}

#[test]
fn calling_a_non_callable() {
    assert_runtime_error("\"text\"();", "Can only call functions and classes.");
}

#[test]
fn clock_returns_a_number() {
    assert_output("print clock() > 0;", "true\n");
}

// ─────────────────────────────────────────────────────────────────────────
// Classes, instances, inheritance
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn class_and_instance_stringification() {
    assert_output(
        "class Bagel {} print Bagel; print Bagel();",
        "Bagel\nBagel instance\n",
    );
}

#[test]
fn fields_and_methods() {
    let source = "\
        class Counter {
            init() { this.count = 0; }
            bump() {
                this.count = this.count + 1;
                return this.count;
            }
        }
        var c = Counter();
        c.bump();
        print c.bump();
        print c.count;";

    assert_output(source, "2\n2\n");
}

#[test]
fn init_binding() {
    assert_output(
        "class P { init(x) { this.x = x; } } print P(5).x;",
        "5\n",
    );
}

#[test]
fn init_arity_checked() {
    assert_runtime_error(
        "class P { init(x) {} } P();",
        "Expected 1 arguments but got 0.",
    );
}

#[test]
fn bare_return_in_init_yields_the_instance() {
    let source = "\
        class P {
            init() {
                this.x = 1;
                return;
            }
        }
        print P().x;";

    assert_output(source, "1\n");
}

#[test]
fn fields_shadow_methods() {
    let source = "\
        class A {
            m() { return \"method\"; }
        }
        var a = A();
        a.m = 1;
        print a.m;";

    assert_output(source, "1\n");
}

#[test]
fn methods_bind_this() {
    let source = "\
        class Person {
            sayName() { print this.name; }
        }
        var jane = Person();
        jane.name = \"Jane\";
        var method = jane.sayName;
        method();";

    assert_output(source, "Jane\n");
}

#[test]
fn property_on_non_instance() {
    assert_runtime_error("print (1).x;", "Only instances have properties.");
    assert_runtime_error("1.x = 2;", "Only instances have fields.");
}

#[test]
fn undefined_property() {
    assert_runtime_error("class A {} print A().missing;", "Undefined property 'missing'.");
}

#[test]
fn inheritance_and_super() {
    let source = "\
        class A {
            greet() { return \"A\"; }
        }
        class B < A {
            greet() { return super.greet() + \"B\"; }
        }
        print B().greet();";

    assert_output(source, "AB\n");
}

#[test]
fn methods_are_inherited() {
    let source = "\
        class A {
            m() { return 1; }
        }
        class B < A {}
        print B().m();";

    assert_output(source, "1\n");
}

#[test]
fn super_skips_own_override() {
    // jlox's canonical three-level dispatch check
    let source = "\
        class A {
            method() { print \"A method\"; }
        }
        class B < A {
            method() { print \"B method\"; }
            test() { super.method(); }
        }
        class C < B {}
        C().test();";

    assert_output(source, "A method\n");
}

#[test]
fn super_to_missing_method() {
    assert_runtime_error(
        "class A {} class B < A { m() { return super.m(); } } B().m();",
        "Undefined property 'm'.",
    );
}

#[test]
fn superclass_must_be_a_class() {
    assert_runtime_error(
        "var NotAClass = 1; class A < NotAClass {}",
        "Superclass must be a class.",
    );
}

#[test]
fn class_identity_equality() {
    assert_output(
        "class A {} var a = A; print a == A; class B {} print A == B;",
        "true\nfalse\n",
    );
}

#[test]
fn instances_compare_by_identity() {
    assert_output(
        "class A {} var a = A(); var b = a; print a == b; print a == A();",
        "true\nfalse\n",
    );
}

// ─────────────────────────────────────────────────────────────────────────
// Error propagation
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn runtime_error_aborts_remaining_statements() {
    let source = "print 1; print missing; print 2;";

    let mut buffer: Vec<u8> = Vec::new();

    {
        let (tokens, _) = Scanner::new(source.as_bytes().to_vec()).scan_tokens();
        let (statements, _) = Parser::new(tokens).parse();

        let mut interpreter = Interpreter::new(&mut buffer);
        Resolver::new(&mut interpreter)
            .resolve(&statements)
            .unwrap();

        assert!(interpreter.interpret(&statements).is_err());
    }

    // output before the failure survives, nothing after it runs
    assert_eq!(String::from_utf8(buffer).unwrap(), "1\n");
}

#[test]
fn scopes_restore_after_runtime_error() {
    let mut buffer: Vec<u8> = Vec::new();

    fn run_more(interpreter: &mut Interpreter<'_>, source: &str) -> Result<(), LoxError> {
        let (tokens, _) = Scanner::new(source.as_bytes().to_vec()).scan_tokens();
        let (statements, _) = Parser::new(tokens).parse();

        Resolver::new(interpreter).resolve(&statements)?;
        interpreter.interpret(&statements)
    }

    {
        let mut interpreter = Interpreter::new(&mut buffer);

        let first = "var a = \"ok\"; fun f() { var local = 1; missing; } f();";
        assert!(run_more(&mut interpreter, first).is_err());

        // the failed call frame was popped: globals readable, locals gone
        assert!(run_more(&mut interpreter, "print a;").is_ok());
        assert!(run_more(&mut interpreter, "print local;").is_err());
    }

    assert_eq!(String::from_utf8(buffer).unwrap(), "ok\n");
}

#[test]
fn runtime_error_display_format() {
    let err = run("print missing;").unwrap_err();

    assert_eq!(err.to_string(), "Undefined variable 'missing'.\n[line 1]");
}
