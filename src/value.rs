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

//! Tagged numeric values and the data-type selector.

/// Selects which arithmetic an [`Expr`](crate::Expr) builds and evaluates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// Signed 64-bit integer arithmetic.
    Long,
    /// IEEE-754 double-precision arithmetic.
    Double,
}

/// A numeric value tagged by the [`DataType`] it was produced under.
///
/// [`Expr::eval`](crate::Expr::eval) returns a `Value` matching the handle's
/// declared data type; the variable slice passed in must match it too.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Long(i64),
    Double(f64),
}

impl Value {
    /// The [`DataType`] tag of this value.
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Long(_) => DataType::Long,
            Value::Double(_) => DataType::Double,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(v) => Some(*v),
            Value::Double(_) => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Value::Double(v) => Some(*v),
            Value::Long(_) => None,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Long(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
        }
    }
}

/// Characters recognised for variable references: `$flag` for a single digit
/// or `$flag start N end` for a multi-digit index.
///
/// Mirrors the spec's configurable variable syntax; defaults to `$`, `{`, `}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Syntax {
    pub var_flag: char,
    pub var_start: char,
    pub var_end: char,
}

impl Default for Syntax {
    fn default() -> Self {
        Syntax {
            var_flag: '$',
            var_start: '{',
            var_end: '}',
        }
    }
}
