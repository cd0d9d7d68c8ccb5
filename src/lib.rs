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

//! Parsing and evaluation of infix arithmetic and logical expressions with
//! numbered variable placeholders.
//!
//! ```
//! use aexpr::{DataType, Expr, Value};
//!
//! let mut expr = Expr::new();
//! expr.build("($1 + $2) * 2", DataType::Long).unwrap();
//! let result = expr.eval(&[Value::Long(3), Value::Long(4)]).unwrap();
//! assert_eq!(result, Value::Long(14));
//! ```
//!
//! An expression is built once into an [`Expr`] handle and can then be
//! evaluated any number of times against different variable arrays. Numbers
//! are either 64-bit signed integers or IEEE-754 doubles, chosen up front
//! via [`DataType`]; variables are referenced positionally as `$1`, `$2`,
//! ... or `${N}` for indices above 9, never by name.

mod ast;
mod builder;
mod error;
mod eval;
mod handle;
mod pretty;
mod token;
mod value;
mod varset;

pub use error::{BuildError, EvalError};
pub use handle::Expr;
pub use value::{DataType, Syntax, Value};
