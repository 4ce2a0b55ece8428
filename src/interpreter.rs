//! Tree-walking evaluator.
//!
//! Expressions evaluate to [`Value`]s; statements execute for effect against
//! a chain of lexical environments.  The single mutable `environment` cursor
//! tracks the current scope; `globals` is the immovable root.  Variable
//! references resolved by the static pass are read by walking exactly the
//! recorded number of enclosing links; everything else falls back to the
//! global scope.
//!
//! `return` unwinds through statement frames as [`Unwind::Return`], caught at
//! the active call frame.  Runtime errors ride the same channel as
//! [`Unwind::Error`] and surface from [`Interpreter::interpret`] as plain
//! [`LoxError`]s.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

use log::debug;

use crate::environment::Environment;
use crate::error::{LoxError, Result};
use crate::parser::{Expr, ExprId, FunctionDecl, LiteralValue, Stmt};
use crate::token::{Token, TokenType};
use crate::value::{LoxClass, LoxFunction, LoxInstance, Value};

/// Non-local control transfer: either an early `return` carrying its value,
/// or a genuine runtime failure.  Both restore enclosing scopes on the way
/// out through the block-execution path.
#[derive(Debug)]
pub enum Unwind {
    Return(Value),
    Error(LoxError),
}

impl From<LoxError> for Unwind {
    fn from(error: LoxError) -> Self {
        Unwind::Error(error)
    }
}

type EvalResult = std::result::Result<Value, Unwind>;
type ExecResult = std::result::Result<(), Unwind>;

pub struct Interpreter<'w> {
    globals: Rc<RefCell<Environment>>,
    environment: Rc<RefCell<Environment>>,
    locals: HashMap<ExprId, usize>,
    output: &'w mut dyn Write,
}

impl<'w> Interpreter<'w> {
    /// `output` receives everything `print` produces; the driver passes
    /// stdout, tests pass a byte buffer.
    pub fn new(output: &'w mut dyn Write) -> Self {
        let globals = Rc::new(RefCell::new(Environment::new()));

        globals.borrow_mut().define(
            "clock",
            Value::NativeFunction {
                name: "clock".to_string(),
                arity: 0,
                func: clock_native,
            },
        );

        Interpreter {
            environment: Rc::clone(&globals),
            globals,
            locals: HashMap::new(),
            output,
        }
    }

    /// Record the binding depth of a resolvable expression.  Called by the
    /// resolver; ids absent from the table are globals.
    pub fn note_local(&mut self, id: ExprId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Run a resolved program.  The first runtime error aborts the
    /// remaining statements.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Result<()> {
        for statement in statements {
            match self.execute(statement) {
                Ok(()) => {}

                Err(Unwind::Error(e)) => return Err(e),

                // the resolver rejects top-level returns
                Err(Unwind::Return(_)) => unreachable!("return unwound past all call frames"),
            }
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────

    fn execute(&mut self, stmt: &Stmt) -> ExecResult {
        match stmt {
            Stmt::Expression(expr) => {
                self.evaluate(expr)?;

                Ok(())
            }

            Stmt::Print(expr) => {
                let value: Value = self.evaluate(expr)?;

                writeln!(self.output, "{}", value).map_err(LoxError::from)?;

                Ok(())
            }

            Stmt::Var { name, initializer } => {
                let value: Value = if let Some(expr) = initializer {
                    self.evaluate(expr)?
                } else {
                    Value::Nil
                };

                self.environment.borrow_mut().define(&name.lexeme, value);

                Ok(())
            }

            Stmt::Block(statements) => {
                let child = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(
                    &self.environment,
                ))));

                self.execute_block(statements, child)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if is_truthy(&self.evaluate(condition)?) {
                    self.execute(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)?;
                }

                Ok(())
            }

            Stmt::While { condition, body } => {
                while is_truthy(&self.evaluate(condition)?) {
                    self.execute(body)?;
                }

                Ok(())
            }

            Stmt::Function(declaration) => {
                debug!("Defining function '{}'", declaration.name.lexeme);

                let function = LoxFunction {
                    declaration: Rc::clone(declaration),
                    closure: Rc::clone(&self.environment),
                    is_initializer: false,
                };

                self.environment
                    .borrow_mut()
                    .define(&declaration.name.lexeme, Value::Function(Rc::new(function)));

                Ok(())
            }

            Stmt::Return { keyword: _, value } => {
                let value: Value = match value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Nil,
                };

                Err(Unwind::Return(value))
            }

            Stmt::Class {
                name,
                superclass,
                methods,
            } => self.execute_class(name, superclass.as_ref(), methods),
        }
    }

    /// Run `statements` with `environment` as the current scope, restoring
    /// the previous scope on every exit path, unwinding included.
    fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> ExecResult {
        let previous: Rc<RefCell<Environment>> = Rc::clone(&self.environment);

        self.environment = environment;

        let mut result: ExecResult = Ok(());

        for statement in statements {
            result = self.execute(statement);

            if result.is_err() {
                break;
            }
        }

        self.environment = previous;

        result
    }

    fn execute_class(
        &mut self,
        name: &Token,
        superclass: Option<&Expr>,
        methods: &[Rc<FunctionDecl>],
    ) -> ExecResult {
        let superclass_value: Option<Rc<LoxClass>> = match superclass {
            Some(expr) => match self.evaluate(expr)? {
                Value::Class(class) => Some(class),

                _ => {
                    // the parser guarantees the superclass clause is a bare name
                    let line = match expr {
                        Expr::Variable { name, .. } => name.line,
                        _ => name.line,
                    };

                    return Err(LoxError::runtime(line, "Superclass must be a class.").into());
                }
            },

            None => None,
        };

        // Bind the name first so methods can refer to the class itself.
        self.environment.borrow_mut().define(&name.lexeme, Value::Nil);

        // Methods close over an extra scope holding `super` when inheriting.
        let defining_env: Rc<RefCell<Environment>> = if let Some(superclass) = &superclass_value {
            let env = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(
                &self.environment,
            ))));

            env.borrow_mut()
                .define("super", Value::Class(Rc::clone(superclass)));

            env
        } else {
            Rc::clone(&self.environment)
        };

        let mut method_map: HashMap<String, Rc<LoxFunction>> = HashMap::new();

        for method in methods {
            let is_initializer = method.name.lexeme == "init";

            method_map.insert(
                method.name.lexeme.clone(),
                Rc::new(LoxFunction {
                    declaration: Rc::clone(method),
                    closure: Rc::clone(&defining_env),
                    is_initializer,
                }),
            );
        }

        debug!(
            "Defining class '{}' with {} method(s)",
            name.lexeme,
            method_map.len()
        );

        let class = Value::Class(Rc::new(LoxClass {
            name: name.lexeme.clone(),
            superclass: superclass_value,
            methods: method_map,
        }));

        self.environment
            .borrow_mut()
            .assign(&name.lexeme, class, name.line)?;

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────

    fn evaluate(&mut self, expr: &Expr) -> EvalResult {
        match expr {
            Expr::Literal(literal) => Ok(evaluate_literal(literal)),

            Expr::Unary { operator, right } => self.evaluate_unary(operator, right),

            Expr::Binary {
                left,
                operator,
                right,
            } => self.evaluate_binary(left, operator, right),

            Expr::Logical {
                left,
                operator,
                right,
            } => self.evaluate_logical(left, operator, right),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Variable { id, name } => Ok(self.look_up_variable(name, *id)?),

            Expr::Assign { id, name, value } => {
                let value: Value = self.evaluate(value)?;

                match self.locals.get(id) {
                    Some(&distance) => Environment::assign_at(
                        &self.environment,
                        distance,
                        &name.lexeme,
                        value.clone(),
                    ),

                    None => {
                        self.globals
                            .borrow_mut()
                            .assign(&name.lexeme, value.clone(), name.line)?
                    }
                }

                Ok(value)
            }

            Expr::Call {
                callee,
                paren,
                arguments,
            } => self.evaluate_call(callee, paren, arguments),

            Expr::Get { object, name } => match self.evaluate(object)? {
                Value::Instance(instance) => Ok(LoxInstance::get(&instance, name)?),

                _ => Err(
                    LoxError::runtime(name.line, "Only instances have properties.").into(),
                ),
            },

            Expr::Set {
                object,
                name,
                value,
            } => match self.evaluate(object)? {
                Value::Instance(instance) => {
                    let value: Value = self.evaluate(value)?;

                    instance.borrow_mut().set(&name.lexeme, value.clone());

                    Ok(value)
                }

                _ => Err(LoxError::runtime(name.line, "Only instances have fields.").into()),
            },

            Expr::This { id, keyword } => Ok(self.look_up_variable(keyword, *id)?),

            Expr::Super { id, keyword, method } => self.evaluate_super(*id, keyword, method),
        }
    }

    fn look_up_variable(&self, name: &Token, id: ExprId) -> Result<Value> {
        match self.locals.get(&id) {
            Some(&distance) => Ok(Environment::get_at(
                &self.environment,
                distance,
                &name.lexeme,
            )),

            None => self.globals.borrow().get(&name.lexeme, name.line),
        }
    }

    fn evaluate_unary(&mut self, operator: &Token, right: &Expr) -> EvalResult {
        let value: Value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::MINUS => match value {
                Value::Number(n) => Ok(Value::Number(-n)),

                _ => Err(LoxError::runtime(operator.line, "Operand must be a number.").into()),
            },

            TokenType::BANG => Ok(Value::Bool(!is_truthy(&value))),

            _ => unreachable!("invalid unary operator"),
        }
    }

    fn evaluate_binary(&mut self, left: &Expr, operator: &Token, right: &Expr) -> EvalResult {
        let left_val: Value = self.evaluate(left)?;
        let right_val: Value = self.evaluate(right)?;

        match operator.token_type {
            TokenType::PLUS => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),

                (Value::String(a), Value::String(b)) => Ok(Value::String(a + &b)),

                _ => Err(LoxError::runtime(
                    operator.line,
                    "Operands must be two numbers or two strings.",
                )
                .into()),
            },

            TokenType::MINUS => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),

                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers.").into()),
            },

            TokenType::STAR => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a * b)),

                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers.").into()),
            },

            // division by zero yields the IEEE-754 result, not an error
            TokenType::SLASH => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a / b)),

                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers.").into()),
            },

            TokenType::EQUAL_EQUAL => Ok(Value::Bool(is_equal(&left_val, &right_val))),

            TokenType::BANG_EQUAL => Ok(Value::Bool(!is_equal(&left_val, &right_val))),

            TokenType::GREATER => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a > b)),

                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers.").into()),
            },

            TokenType::GREATER_EQUAL => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a >= b)),

                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers.").into()),
            },

            TokenType::LESS => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a < b)),

                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers.").into()),
            },

            TokenType::LESS_EQUAL => match (left_val, right_val) {
                (Value::Number(a), Value::Number(b)) => Ok(Value::Bool(a <= b)),

                _ => Err(LoxError::runtime(operator.line, "Operands must be numbers.").into()),
            },

            _ => unreachable!("invalid binary operator"),
        }
    }

    /// Short-circuiting `and` / `or`.  The result is the deciding operand
    /// itself, never a coerced boolean.
    fn evaluate_logical(&mut self, left: &Expr, operator: &Token, right: &Expr) -> EvalResult {
        let left_val: Value = self.evaluate(left)?;

        match operator.token_type {
            TokenType::OR => {
                if is_truthy(&left_val) {
                    Ok(left_val)
                } else {
                    self.evaluate(right)
                }
            }

            TokenType::AND => {
                if !is_truthy(&left_val) {
                    Ok(left_val)
                } else {
                    self.evaluate(right)
                }
            }

            _ => unreachable!("invalid logical operator"),
        }
    }

    fn evaluate_call(&mut self, callee: &Expr, paren: &Token, arguments: &[Expr]) -> EvalResult {
        let callee_val: Value = self.evaluate(callee)?;

        let mut args: Vec<Value> = Vec::with_capacity(arguments.len());

        for argument in arguments {
            args.push(self.evaluate(argument)?);
        }

        match callee_val {
            Value::Function(function) => {
                check_arity(function.arity(), args.len(), paren)?;

                self.call_function(&function, args)
            }

            Value::NativeFunction { arity, func, .. } => {
                check_arity(arity, args.len(), paren)?;

                Ok(func(&args)?)
            }

            Value::Class(class) => {
                check_arity(class.arity(), args.len(), paren)?;

                self.instantiate(&class, args)
            }

            _ => {
                Err(LoxError::runtime(paren.line, "Can only call functions and classes.").into())
            }
        }
    }

    /// Execute a user function: fresh frame under the closure, parameters
    /// bound in order, `return` caught here.  Initializers always yield the
    /// bound `this`, whatever the body did.
    fn call_function(&mut self, function: &LoxFunction, arguments: Vec<Value>) -> EvalResult {
        let environment = Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(
            &function.closure,
        ))));

        for (param, argument) in function.declaration.params.iter().zip(arguments) {
            environment.borrow_mut().define(&param.lexeme, argument);
        }

        match self.execute_block(&function.declaration.body, environment) {
            Ok(()) => {
                if function.is_initializer {
                    Ok(Environment::get_at(&function.closure, 0, "this"))
                } else {
                    Ok(Value::Nil)
                }
            }

            Err(Unwind::Return(value)) => {
                if function.is_initializer {
                    Ok(Environment::get_at(&function.closure, 0, "this"))
                } else {
                    Ok(value)
                }
            }

            Err(err) => Err(err),
        }
    }

    fn instantiate(&mut self, class: &Rc<LoxClass>, arguments: Vec<Value>) -> EvalResult {
        let instance = Rc::new(RefCell::new(LoxInstance::new(Rc::clone(class))));

        if let Some(init) = class.find_method("init") {
            let bound: LoxFunction = init.bind(Rc::clone(&instance));

            self.call_function(&bound, arguments)?;
        }

        Ok(Value::Instance(instance))
    }

    fn evaluate_super(&mut self, id: ExprId, keyword: &Token, method: &Token) -> EvalResult {
        let distance: usize = *self
            .locals
            .get(&id)
            .expect("'super' expression missing from the resolver table");

        let superclass: Rc<LoxClass> =
            match Environment::get_at(&self.environment, distance, "super") {
                Value::Class(class) => class,
                _ => unreachable!("'super' bound to a non-class"),
            };

        // `bind` adds one scope on top of the super scope, hence distance - 1.
        let instance: Rc<RefCell<LoxInstance>> =
            match Environment::get_at(&self.environment, distance - 1, "this") {
                Value::Instance(instance) => instance,
                _ => unreachable!("'this' bound to a non-instance"),
            };

        match superclass.find_method(&method.lexeme) {
            Some(found) => Ok(Value::Function(Rc::new(found.bind(instance)))),

            None => Err(LoxError::runtime(
                keyword.line,
                format!("Undefined property '{}'.", method.lexeme),
            )
            .into()),
        }
    }
}

fn evaluate_literal(literal: &LiteralValue) -> Value {
    match literal {
        LiteralValue::Number(n) => Value::Number(*n),

        LiteralValue::Str(s) => Value::String(s.clone()),

        LiteralValue::True => Value::Bool(true),

        LiteralValue::False => Value::Bool(false),

        LiteralValue::Nil => Value::Nil,
    }
}

fn check_arity(expected: usize, got: usize, paren: &Token) -> std::result::Result<(), Unwind> {
    if expected != got {
        return Err(LoxError::runtime(
            paren.line,
            format!("Expected {} arguments but got {}.", expected, got),
        )
        .into());
    }

    Ok(())
}

/// `nil` and `false` are falsy; every other value is truthy.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Nil => false,

        Value::Bool(b) => *b,

        _ => true,
    }
}

/// Structural equality for plain values, identity for callables and
/// instances.  Values of different types are never equal.
fn is_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Nil, Value::Nil) => true,

        (Value::Number(a), Value::Number(b)) => a == b,

        (Value::String(a), Value::String(b)) => a == b,

        (Value::Bool(a), Value::Bool(b)) => a == b,

        (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),

        (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),

        (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),

        (Value::NativeFunction { func: a, .. }, Value::NativeFunction { func: b, .. }) => a == b,

        _ => false,
    }
}

fn clock_native(_args: &[Value]) -> Result<Value> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| LoxError::runtime(0, format!("Clock error: {}", e)))?
        .as_secs_f64();

    Ok(Value::Number(timestamp))
}
