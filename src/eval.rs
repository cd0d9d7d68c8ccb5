// This file is part of aexpr, an infix expression parser and evaluator.
// Copyright (C) 2026 aexpr contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Two monomorphic recursive evaluators, one for `Long`, one for `Double`.
//!
//! Selection happens once, at the top of [`eval`], rather than per node;
//! each evaluator walks the arena directly and short-circuits through `?`
//! exactly the way the reference evaluator short-circuits through its own
//! error flag, without needing an out-of-band channel to do it.

use crate::ast::{Ast, NodeId, Payload, TokenKind};
use crate::error::EvalError;
use crate::value::{DataType, Value};

pub fn eval(ast: &Ast, variables: &[Value], data_type: DataType) -> Result<Value, EvalError> {
    let root = ast.root().expect("a built Ast always has a root");
    match data_type {
        DataType::Long => {
            let longs = collect_longs(variables)?;
            eval_long(ast, root, &longs).map(Value::Long)
        }
        DataType::Double => {
            let doubles = collect_doubles(variables)?;
            eval_double(ast, root, &doubles).map(Value::Double)
        }
    }
}

fn collect_longs(variables: &[Value]) -> Result<Vec<i64>, EvalError> {
    variables
        .iter()
        .map(|v| v.as_long().ok_or(EvalError::WrongDataType))
        .collect()
}

fn collect_doubles(variables: &[Value]) -> Result<Vec<f64>, EvalError> {
    variables
        .iter()
        .map(|v| v.as_double().ok_or(EvalError::WrongDataType))
        .collect()
}

fn eval_long(ast: &Ast, id: NodeId, variables: &[i64]) -> Result<i64, EvalError> {
    let node = ast.get(id);
    match node.kind {
        TokenKind::Num => match node.payload {
            Payload::Num(Value::Long(n)) => Ok(n),
            _ => Err(EvalError::UnknownToken),
        },
        TokenKind::Var => match node.payload {
            Payload::Var(idx) => variables
                .get(idx as usize)
                .copied()
                .ok_or(EvalError::TooFewVariables {
                    need: idx as usize + 1,
                    got: variables.len(),
                }),
            _ => Err(EvalError::UnknownToken),
        },
        TokenKind::Neg => {
            let v = eval_long(ast, node.left.unwrap(), variables)?;
            v.checked_neg().ok_or(EvalError::Overflow {
                at: node.range.clone(),
            })
        }
        TokenKind::Not => {
            let v = eval_long(ast, node.left.unwrap(), variables)?;
            Ok((v == 0) as i64)
        }
        TokenKind::Sqrt => {
            let v = eval_long(ast, node.left.unwrap(), variables)?;
            if v < 0 {
                return Err(EvalError::InvalidOperand {
                    at: node.range.clone(),
                });
            }
            Ok((v as f64).sqrt().trunc() as i64)
        }
        TokenKind::Ln => {
            let v = eval_long(ast, node.left.unwrap(), variables)?;
            Ok((v as f64).ln().trunc() as i64)
        }
        TokenKind::Log => {
            let v = eval_long(ast, node.left.unwrap(), variables)?;
            Ok((v as f64).log10().trunc() as i64)
        }
        TokenKind::Plus | TokenKind::Minus | TokenKind::Mul | TokenKind::Div | TokenKind::Pow => {
            let l = eval_long(ast, node.left.unwrap(), variables)?;
            let r = eval_long(ast, node.right.unwrap(), variables)?;
            let overflow = || EvalError::Overflow {
                at: node.range.clone(),
            };
            match node.kind {
                TokenKind::Plus => l.checked_add(r).ok_or_else(overflow),
                TokenKind::Minus => l.checked_sub(r).ok_or_else(overflow),
                TokenKind::Mul => l.checked_mul(r).ok_or_else(overflow),
                TokenKind::Div => {
                    if r == 0 {
                        Err(EvalError::DivisionByZero {
                            at: node.range.clone(),
                        })
                    } else {
                        l.checked_div(r).ok_or_else(overflow)
                    }
                }
                TokenKind::Pow => {
                    let result = (l as f64).powf(r as f64).trunc();
                    if !result.is_finite() || result > i64::MAX as f64 || result < i64::MIN as f64 {
                        Err(overflow())
                    } else {
                        Ok(result as i64)
                    }
                }
                _ => unreachable!(),
            }
        }
        TokenKind::And | TokenKind::Or => {
            let l = eval_long(ast, node.left.unwrap(), variables)?;
            let r = eval_long(ast, node.right.unwrap(), variables)?;
            Ok(match node.kind {
                TokenKind::And => (l != 0 && r != 0) as i64,
                TokenKind::Or => (l != 0 || r != 0) as i64,
                _ => unreachable!(),
            })
        }
        TokenKind::Eq | TokenKind::Neq | TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => {
            let l = eval_long(ast, node.left.unwrap(), variables)?;
            let r = eval_long(ast, node.right.unwrap(), variables)?;
            Ok(match node.kind {
                TokenKind::Eq => (l == r) as i64,
                TokenKind::Neq => (l != r) as i64,
                TokenKind::Lt => (l < r) as i64,
                TokenKind::Le => (l <= r) as i64,
                TokenKind::Gt => (l > r) as i64,
                TokenKind::Ge => (l >= r) as i64,
                _ => unreachable!(),
            })
        }
        TokenKind::Undef | TokenKind::ParenLeft | TokenKind::ParenRight => {
            Err(EvalError::UnknownToken)
        }
    }
}

fn eval_double(ast: &Ast, id: NodeId, variables: &[f64]) -> Result<f64, EvalError> {
    let node = ast.get(id);
    match node.kind {
        TokenKind::Num => match node.payload {
            Payload::Num(Value::Double(n)) => Ok(n),
            _ => Err(EvalError::UnknownToken),
        },
        TokenKind::Var => match node.payload {
            Payload::Var(idx) => variables
                .get(idx as usize)
                .copied()
                .ok_or(EvalError::TooFewVariables {
                    need: idx as usize + 1,
                    got: variables.len(),
                }),
            _ => Err(EvalError::UnknownToken),
        },
        TokenKind::Neg => Ok(-eval_double(ast, node.left.unwrap(), variables)?),
        TokenKind::Not => {
            let v = eval_double(ast, node.left.unwrap(), variables)?;
            Ok(if v == 0.0 { 1.0 } else { 0.0 })
        }
        TokenKind::Sqrt => Ok(eval_double(ast, node.left.unwrap(), variables)?.sqrt()),
        TokenKind::Ln => Ok(eval_double(ast, node.left.unwrap(), variables)?.ln()),
        TokenKind::Log => Ok(eval_double(ast, node.left.unwrap(), variables)?.log10()),
        TokenKind::Plus | TokenKind::Minus | TokenKind::Mul | TokenKind::Div | TokenKind::Pow => {
            let l = eval_double(ast, node.left.unwrap(), variables)?;
            let r = eval_double(ast, node.right.unwrap(), variables)?;
            Ok(match node.kind {
                TokenKind::Plus => l + r,
                TokenKind::Minus => l - r,
                TokenKind::Mul => l * r,
                TokenKind::Div => l / r,
                TokenKind::Pow => l.powf(r),
                _ => unreachable!(),
            })
        }
        TokenKind::And | TokenKind::Or => {
            let l = eval_double(ast, node.left.unwrap(), variables)?;
            let r = eval_double(ast, node.right.unwrap(), variables)?;
            Ok(match node.kind {
                TokenKind::And => {
                    if l != 0.0 && r != 0.0 {
                        1.0
                    } else {
                        0.0
                    }
                }
                TokenKind::Or => {
                    if l != 0.0 || r != 0.0 {
                        1.0
                    } else {
                        0.0
                    }
                }
                _ => unreachable!(),
            })
        }
        TokenKind::Eq | TokenKind::Neq | TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => {
            let l = eval_double(ast, node.left.unwrap(), variables)?;
            let r = eval_double(ast, node.right.unwrap(), variables)?;
            Ok(match node.kind {
                TokenKind::Eq => (l == r) as i64 as f64,
                TokenKind::Neq => (l != r) as i64 as f64,
                TokenKind::Lt => (l < r) as i64 as f64,
                TokenKind::Le => (l <= r) as i64 as f64,
                TokenKind::Gt => (l > r) as i64 as f64,
                TokenKind::Ge => (l >= r) as i64 as f64,
                _ => unreachable!(),
            })
        }
        TokenKind::Undef | TokenKind::ParenLeft | TokenKind::ParenRight => {
            Err(EvalError::UnknownToken)
        }
    }
}
