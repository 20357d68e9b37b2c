//! Statement execution and expression evaluation.
//!
//! Execution pipeline:
//! exec_block (top-level statements) -> exec_statement -> eval_expression
//! -> call_value -> exec_block (function body).
//!
//! `return` unwinds through the `ExecResult::Return` arm of every statement
//! result until a function-call boundary absorbs it; runtime failures travel
//! the `Err` channel instead and are never absorbed.

use num_bigint::BigInt;
use num_traits::{ToPrimitive, Zero};

use crate::builtins::BuiltinFunction;
use crate::parser::ast::{BinaryOperator, Expression, Statement, UnaryOperator};

use super::env::{self, Scope, ScopeRef};
use super::error::RuntimeError;
use super::value::{ObjectData, Value};

/// Nested language-level calls allowed before the interpreter reports a
/// stack overflow instead of exhausting the host stack.
const MAX_CALL_DEPTH: usize = 256;

/// Control-flow marker for statement execution. `Continue` carries the value
/// the statement produced so the REPL can surface the last one.
pub(super) enum ExecResult {
    Continue(Value),
    Return(Value),
}

pub(super) struct Evaluator {
    pub(super) output: Vec<String>,
    depth: usize,
}

impl Evaluator {
    pub(super) fn new() -> Self {
        Self {
            output: Vec::new(),
            depth: 0,
        }
    }

    pub(super) fn exec_block(
        &mut self,
        body: &[Statement],
        scope: &ScopeRef,
    ) -> Result<ExecResult, RuntimeError> {
        let mut last = Value::Null;
        for statement in body {
            match self.exec_statement(statement, scope)? {
                ExecResult::Continue(value) => last = value,
                ExecResult::Return(value) => return Ok(ExecResult::Return(value)),
            }
        }
        Ok(ExecResult::Continue(last))
    }

    fn exec_statement(
        &mut self,
        statement: &Statement,
        scope: &ScopeRef,
    ) -> Result<ExecResult, RuntimeError> {
        match statement {
            Statement::Var { name, value } => {
                let value = self.eval_expression(value, scope)?;
                scope.borrow_mut().declare(name, value)?;
                Ok(ExecResult::Continue(Value::Null))
            }
            Statement::Expr(expr) => {
                let value = self.eval_expression(expr, scope)?;
                Ok(ExecResult::Continue(value))
            }
            Statement::Block(body) => {
                let child = Scope::child(scope);
                self.exec_scoped_body(body, &child)
            }
            Statement::If { arms, else_body } => {
                for (condition, body) in arms {
                    let condition = self.eval_expression(condition, scope)?;
                    let Value::Boolean(truth) = &condition else {
                        return Err(RuntimeError::ConditionType {
                            type_name: condition.type_name(),
                        });
                    };
                    if *truth {
                        let child = Scope::child(scope);
                        return self.exec_scoped_body(body, &child);
                    }
                }
                if let Some(body) = else_body {
                    let child = Scope::child(scope);
                    return self.exec_scoped_body(body, &child);
                }
                Ok(ExecResult::Continue(Value::Null))
            }
            Statement::Return(expr) => {
                let value = self.eval_expression(expr, scope)?;
                Ok(ExecResult::Return(value))
            }
        }
    }

    /// Runs a block in its own scope, producing Null unless it returns.
    fn exec_scoped_body(
        &mut self,
        body: &[Statement],
        scope: &ScopeRef,
    ) -> Result<ExecResult, RuntimeError> {
        match self.exec_block(body, scope)? {
            ExecResult::Return(value) => Ok(ExecResult::Return(value)),
            ExecResult::Continue(_) => Ok(ExecResult::Continue(Value::Null)),
        }
    }

    fn eval_expression(
        &mut self,
        expr: &Expression,
        scope: &ScopeRef,
    ) -> Result<Value, RuntimeError> {
        match expr {
            Expression::Integer(value) => Ok(Value::Integer(value.clone())),
            Expression::Float(value) => Ok(Value::Float(*value)),
            Expression::Boolean(value) => Ok(Value::Boolean(*value)),
            Expression::Null => Ok(Value::Null),
            // A fresh buffer per evaluation: literals inside loops or calls
            // must not alias each other.
            Expression::String(value) => Ok(Value::string(value.clone().into_bytes())),
            Expression::Identifier(name) => env::lookup(scope, name),
            Expression::Object(properties) => {
                let mut object = ObjectData::new();
                for (name, value) in properties {
                    let value = match value {
                        Some(expr) => self.eval_expression(expr, scope)?,
                        None => env::lookup(scope, name)?,
                    };
                    object.set(name, value);
                }
                Ok(Value::object(object))
            }
            Expression::Function { params, body } => Ok(Value::function(
                params.clone(),
                body.clone(),
                ScopeRef::clone(scope),
            )),
            Expression::Binary { left, op, right } => {
                let left = self.eval_expression(left, scope)?;
                let right = self.eval_expression(right, scope)?;
                apply_binary(*op, left, right)
            }
            Expression::Unary { op, operand } => {
                let operand = self.eval_expression(operand, scope)?;
                apply_unary(*op, operand)
            }
            Expression::Member { object, field } => {
                let object = self.eval_expression(object, scope)?;
                let Value::Object(data) = &object else {
                    return Err(RuntimeError::FieldAccessOnNonObject {
                        field: field.clone(),
                        type_name: object.type_name(),
                    });
                };
                let value = data.borrow().get(field);
                value.ok_or_else(|| RuntimeError::FieldNotPresent {
                    field: field.clone(),
                })
            }
            Expression::Index { object, index } => {
                let target = self.eval_expression(object, scope)?;
                let index = self.eval_expression(index, scope)?;
                read_string_byte(&target, &index)
            }
            Expression::Assign { target, value } => self.eval_assignment(target, value, scope),
            Expression::Call { callee, args } => {
                let callee = self.eval_expression(callee, scope)?;
                let mut evaluated = Vec::with_capacity(args.len());
                for arg in args {
                    evaluated.push(self.eval_expression(arg, scope)?);
                }
                self.call_value(callee, evaluated)
            }
        }
    }

    fn eval_assignment(
        &mut self,
        target: &Expression,
        value: &Expression,
        scope: &ScopeRef,
    ) -> Result<Value, RuntimeError> {
        match target {
            Expression::Identifier(name) => {
                let value = self.eval_expression(value, scope)?;
                env::assign(scope, name, value.clone())?;
                Ok(value)
            }
            Expression::Member { object, field } => {
                let object = self.eval_expression(object, scope)?;
                let Value::Object(data) = &object else {
                    return Err(RuntimeError::FieldAccessOnNonObject {
                        field: field.clone(),
                        type_name: object.type_name(),
                    });
                };
                let value = self.eval_expression(value, scope)?;
                data.borrow_mut().set(field, value.clone());
                Ok(value)
            }
            Expression::Index { object, index } => {
                let target = self.eval_expression(object, scope)?;
                let Value::Str(buffer) = &target else {
                    return Err(RuntimeError::SubscriptOnNonString {
                        type_name: target.type_name(),
                    });
                };
                let index = self.eval_expression(index, scope)?;
                let Value::Integer(index) = &index else {
                    return Err(RuntimeError::SubscriptIndexType {
                        type_name: index.type_name(),
                    });
                };
                // Index constraints are checked before the right-hand side
                // runs, mirroring the read path. Stores cannot change a
                // buffer's length, so the position stays valid.
                let position = string_index(index, buffer.borrow().len())?;
                let value = self.eval_expression(value, scope)?;
                let Value::Integer(byte) = &value else {
                    return Err(RuntimeError::SubscriptValueType {
                        type_name: value.type_name(),
                    });
                };
                let byte = byte.to_u8().ok_or_else(|| RuntimeError::ByteOutOfRange {
                    value: byte.to_string(),
                })?;
                buffer.borrow_mut()[position] = byte;
                Ok(value)
            }
            // The parser only emits the three targets above; a hand-built
            // tree can still carry anything.
            _ => Err(RuntimeError::InvalidAssignmentTarget),
        }
    }

    fn call_value(&mut self, callee: Value, args: Vec<Value>) -> Result<Value, RuntimeError> {
        match callee {
            Value::Host(builtin) => self.call_builtin(builtin, args),
            Value::Function(function) => {
                if args.len() != function.params.len() {
                    return Err(RuntimeError::ArityMismatch {
                        expected: function.params.len(),
                        found: args.len(),
                    });
                }
                if self.depth >= MAX_CALL_DEPTH {
                    return Err(RuntimeError::StackOverflow);
                }
                // The frame parents to the closure's captured scope, not the
                // caller's: lexical scoping.
                let frame = Scope::child(&function.closure);
                {
                    let mut frame_mut = frame.borrow_mut();
                    for (param, arg) in function.params.iter().zip(args) {
                        frame_mut.declare(param, arg)?;
                    }
                }
                self.depth += 1;
                let result = self.exec_block(&function.body, &frame);
                self.depth -= 1;
                match result? {
                    ExecResult::Continue(_) => Ok(Value::Null),
                    ExecResult::Return(value) => Ok(value),
                }
            }
            _ => Err(RuntimeError::NotCallable),
        }
    }

    fn call_builtin(
        &mut self,
        builtin: BuiltinFunction,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        match builtin {
            BuiltinFunction::Print => {
                let value = expect_one_arg(builtin, args)?;
                self.output.push(value.to_output());
                Ok(Value::Null)
            }
            BuiltinFunction::Panic => {
                let value = expect_one_arg(builtin, args)?;
                Err(RuntimeError::Panic {
                    message: value.to_output(),
                })
            }
            BuiltinFunction::StringsLen => {
                let value = expect_one_arg(builtin, args)?;
                let Value::Str(buffer) = &value else {
                    return Err(RuntimeError::BuiltinArgumentType {
                        name: builtin.name(),
                        expected: "a string",
                        got: value.type_name(),
                    });
                };
                let len = buffer.borrow().len();
                Ok(Value::Integer(BigInt::from(len)))
            }
        }
    }
}

fn expect_one_arg(builtin: BuiltinFunction, mut args: Vec<Value>) -> Result<Value, RuntimeError> {
    if args.len() != 1 {
        return Err(RuntimeError::BuiltinArityMismatch {
            name: builtin.name(),
            expected: 1,
            found: args.len(),
        });
    }
    Ok(args.pop().expect("len checked above"))
}

fn apply_binary(op: BinaryOperator, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match op {
        // Both sides are already evaluated by the caller: no short-circuit.
        BinaryOperator::And | BinaryOperator::Or => match (&left, &right) {
            (Value::Boolean(l), Value::Boolean(r)) => Ok(Value::Boolean(match op {
                BinaryOperator::And => *l && *r,
                _ => *l || *r,
            })),
            _ => Err(operand_mismatch(op, "boolean operands", &left, &right)),
        },
        BinaryOperator::Equal => Ok(Value::Boolean(left == right)),
        BinaryOperator::NotEqual => Ok(Value::Boolean(left != right)),
        BinaryOperator::LessThan | BinaryOperator::GreaterThan => {
            let ordered = match (&left, &right) {
                (Value::Integer(l), Value::Integer(r)) => match op {
                    BinaryOperator::LessThan => l < r,
                    _ => l > r,
                },
                (Value::Float(l), Value::Float(r)) => match op {
                    BinaryOperator::LessThan => l < r,
                    _ => l > r,
                },
                _ => {
                    return Err(operand_mismatch(
                        op,
                        "two integers or two floats",
                        &left,
                        &right,
                    ));
                }
            };
            Ok(Value::Boolean(ordered))
        }
        BinaryOperator::Add => match (&left, &right) {
            (Value::Integer(l), Value::Integer(r)) => Ok(Value::Integer(l + r)),
            (Value::Float(l), Value::Float(r)) => Ok(Value::Float(l + r)),
            (Value::Str(l), Value::Str(r)) => {
                let mut bytes = l.borrow().clone();
                bytes.extend_from_slice(&r.borrow());
                Ok(Value::string(bytes))
            }
            _ => Err(operand_mismatch(
                op,
                "two integers, two floats, or two strings",
                &left,
                &right,
            )),
        },
        BinaryOperator::Sub | BinaryOperator::Mul => match (&left, &right) {
            (Value::Integer(l), Value::Integer(r)) => Ok(Value::Integer(match op {
                BinaryOperator::Sub => l - r,
                _ => l * r,
            })),
            (Value::Float(l), Value::Float(r)) => Ok(Value::Float(match op {
                BinaryOperator::Sub => l - r,
                _ => l * r,
            })),
            _ => Err(operand_mismatch(
                op,
                "two integers or two floats",
                &left,
                &right,
            )),
        },
        BinaryOperator::Div | BinaryOperator::Mod => match (&left, &right) {
            (Value::Integer(l), Value::Integer(r)) => {
                if r.is_zero() {
                    return Err(RuntimeError::DivisionByZero);
                }
                // BigInt division truncates toward zero.
                Ok(Value::Integer(match op {
                    BinaryOperator::Div => l / r,
                    _ => l % r,
                }))
            }
            (Value::Float(l), Value::Float(r)) => {
                if *r == 0.0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                Ok(Value::Float(match op {
                    BinaryOperator::Div => l / r,
                    _ => l % r,
                }))
            }
            _ => Err(operand_mismatch(
                op,
                "two integers or two floats",
                &left,
                &right,
            )),
        },
    }
}

fn apply_unary(op: UnaryOperator, operand: Value) -> Result<Value, RuntimeError> {
    match op {
        UnaryOperator::Not => match operand {
            Value::Boolean(value) => Ok(Value::Boolean(!value)),
            other => Err(RuntimeError::UnaryOperandType {
                operator: op.symbol(),
                expected: "a boolean",
                operand: other.type_name(),
            }),
        },
        UnaryOperator::Neg => match operand {
            Value::Integer(value) => Ok(Value::Integer(-value)),
            Value::Float(value) => Ok(Value::Float(-value)),
            other => Err(RuntimeError::UnaryOperandType {
                operator: op.symbol(),
                expected: "an integer or float",
                operand: other.type_name(),
            }),
        },
    }
}

fn operand_mismatch(
    op: BinaryOperator,
    expected: &'static str,
    left: &Value,
    right: &Value,
) -> RuntimeError {
    RuntimeError::BinaryOperandTypes {
        operator: op.symbol(),
        expected,
        left: left.type_name(),
        right: right.type_name(),
    }
}

fn read_string_byte(target: &Value, index: &Value) -> Result<Value, RuntimeError> {
    let Value::Str(buffer) = target else {
        return Err(RuntimeError::SubscriptOnNonString {
            type_name: target.type_name(),
        });
    };
    let Value::Integer(index) = index else {
        return Err(RuntimeError::SubscriptIndexType {
            type_name: index.type_name(),
        });
    };
    let buffer = buffer.borrow();
    let position = string_index(index, buffer.len())?;
    Ok(Value::Integer(BigInt::from(buffer[position])))
}

fn string_index(index: &BigInt, len: usize) -> Result<usize, RuntimeError> {
    index
        .to_usize()
        .filter(|&position| position < len)
        .ok_or_else(|| RuntimeError::IndexOutOfRange {
            index: index.to_string(),
            len,
        })
}
