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

//! The public handle: `Expr::new` → `build` → `eval` → drop (or `destroy`).

use std::io::{self, Write};

use crate::ast::{Ast, NodeId, Payload};
use crate::builder::Builder;
use crate::error::{BuildError, EvalError};
use crate::eval;
use crate::value::{DataType, Syntax, Value};
use crate::varset::VarSet;

/// One parsed expression, ready to be evaluated any number of times against
/// different variable arrays.
///
/// An `Expr` is built exactly once: [`build`](Expr::build) returns
/// [`BuildError::AlreadyBuilt`] on a handle that already has an AST, and
/// there is no API to reset or reuse a handle for a second expression.
/// [`eval`](Expr::eval) takes `&self` and is safe to call concurrently
/// against the same built handle from multiple threads, since evaluation
/// never mutates the tree or the variable set.
pub struct Expr {
    data_type: Option<DataType>,
    ast: Option<Ast>,
    variables: VarSet,
    source: String,
    error: Option<BuildError>,
}

impl Expr {
    /// An empty handle with no AST and no recorded error.
    pub fn new() -> Self {
        Expr {
            data_type: None,
            ast: None,
            variables: VarSet::new(),
            source: String::new(),
            error: None,
        }
    }

    /// Parses `expression` into this handle's AST under `data_type`, using
    /// the default variable syntax (`$`, `{`, `}`). See
    /// [`build_with_syntax`](Expr::build_with_syntax) to customize it.
    pub fn build(&mut self, expression: &str, data_type: DataType) -> Result<(), BuildError> {
        self.build_with_syntax(expression, data_type, Syntax::default())
    }

    /// As [`build`](Expr::build), with a caller-chosen variable syntax.
    pub fn build_with_syntax(
        &mut self,
        expression: &str,
        data_type: DataType,
        syntax: Syntax,
    ) -> Result<(), BuildError> {
        if self.ast.is_some() {
            return Err(BuildError::AlreadyBuilt);
        }
        if expression.trim().is_empty() {
            let err = BuildError::EmptyExpression;
            self.error = Some(err.clone());
            return Err(err);
        }

        self.source = expression.to_owned();
        match Builder::new(expression, data_type, syntax).build() {
            Ok((ast, variables)) => {
                self.ast = Some(ast);
                self.variables = variables;
                self.data_type = Some(data_type);
                Ok(())
            }
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Evaluates the built expression against `variables`.
    ///
    /// `variables[i]` supplies the value referenced as `$(i+1)` (or
    /// `${i+1}`) in the source expression. The slice must be at least as
    /// long as the largest referenced index, and every element must match
    /// this handle's declared [`DataType`].
    pub fn eval(&self, variables: &[Value]) -> Result<Value, EvalError> {
        let Some(ast) = &self.ast else {
            return Err(EvalError::NoAst);
        };
        let data_type = self.data_type.expect("data_type is set alongside ast");

        if let Some(max) = self.variables.max() {
            let need = max as usize + 1;
            if variables.len() < need {
                return Err(EvalError::TooFewVariables {
                    need,
                    got: variables.len(),
                });
            }
        }

        eval::eval(ast, variables, data_type)
    }

    /// The number of distinct variable indices referenced by the built
    /// expression, or `0` if nothing has been built yet.
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Consumes the handle, freeing its AST, variable set, and error state
    /// together. Equivalent to simply letting the handle drop out of scope;
    /// offered for callers who want to state that lifecycle boundary
    /// explicitly.
    pub fn destroy(self) {}

    /// Writes a human-readable diagnostic for this handle's build error, if
    /// any, to `w`. Writes nothing if the handle has no recorded error.
    pub fn write_report(&self, w: &mut impl Write, prefix: &str) -> io::Result<()> {
        let Some(error) = &self.error else {
            return Ok(());
        };
        crate::pretty::write_report(w, prefix, &self.source, error)
    }

    /// Renders the recorded build error, if any, to a `String`.
    pub fn report(&self, prefix: &str) -> Option<String> {
        self.error.as_ref()?;
        let mut buf = Vec::new();
        self.write_report(&mut buf, prefix).ok()?;
        Some(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Renders the built AST as an indented text tree, one node per line.
    /// Returns `None` if nothing has been built successfully yet.
    ///
    /// Intended for interactively inspecting precedence and associativity;
    /// not used by any other part of this crate.
    pub fn debug_tree(&self) -> Option<String> {
        let ast = self.ast.as_ref()?;
        let root = ast.root()?;
        let mut out = String::new();
        write_node(ast, root, 0, &mut out);
        Some(out)
    }
}

fn write_node(ast: &Ast, id: NodeId, depth: usize, out: &mut String) {
    let node = ast.get(id);
    out.push_str(&"  ".repeat(depth));
    match node.payload {
        Payload::Num(v) => out.push_str(&format!("{:?} {}\n", node.kind, v)),
        Payload::Var(idx) => out.push_str(&format!("{:?} ${}\n", node.kind, idx + 1)),
        Payload::None => out.push_str(&format!("{:?}\n", node.kind)),
    }
    if let Some(l) = node.left {
        write_node(ast, l, depth + 1, out);
    }
    if let Some(r) = node.right {
        write_node(ast, r, depth + 1, out);
    }
}

impl Default for Expr {
    fn default() -> Self {
        Expr::new()
    }
}
