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

//! Black-box tests against the public API only.

use aexpr::{BuildError, DataType, Expr, Value};
use assert_matches::assert_matches;

#[test]
fn quadratic_formula_scenario() {
    let mut expr = Expr::new();
    expr.build(
        "(-$2 + sqrt(${2}^2 - 4*$1*$3)) / (2*$1)",
        DataType::Double,
    )
    .unwrap();
    assert_eq!(expr.variable_count(), 3);
    let result = expr
        .eval(&[Value::Double(1.0), Value::Double(6.0), Value::Double(5.0)])
        .unwrap();
    assert_eq!(result, Value::Double(-1.0));
}

#[test]
fn long_left_associative_precedence() {
    let mut expr = Expr::new();
    expr.build("2+3*4", DataType::Long).unwrap();
    assert_eq!(expr.eval(&[]).unwrap(), Value::Long(14));
}

#[test]
fn parens_override_precedence() {
    let mut expr = Expr::new();
    expr.build("(2+3)*4", DataType::Long).unwrap();
    assert_eq!(expr.eval(&[]).unwrap(), Value::Long(20));
}

#[test]
fn nested_function_scopes() {
    let mut expr = Expr::new();
    expr.build("sqrt(ln(1))", DataType::Double).unwrap();
    assert_eq!(expr.eval(&[]).unwrap(), Value::Double(0.0));
}

#[test]
fn logical_operators() {
    let mut expr = Expr::new();
    expr.build("$1 >= $2 && $2 != 0", DataType::Double).unwrap();
    let result = expr
        .eval(&[Value::Double(3.0), Value::Double(1.0)])
        .unwrap();
    assert_eq!(result, Value::Double(1.0));
}

#[test]
fn equality_maps_to_eq_not_or() {
    // Regression against the historical bug where `==` was mis-wired to OR.
    let mut expr = Expr::new();
    expr.build("$1 == $2", DataType::Long).unwrap();
    assert_eq!(
        expr.eval(&[Value::Long(4), Value::Long(4)]).unwrap(),
        Value::Long(1)
    );
    assert_eq!(
        expr.eval(&[Value::Long(0), Value::Long(4)]).unwrap(),
        Value::Long(0)
    );
}

#[test]
fn build_failure_scenarios() {
    let cases: &[(&str, fn(&BuildError) -> bool)] = &[
        ("(1+2", |e| matches!(e, BuildError::UnclosedParenthesis { .. })),
        ("1+", |e| matches!(e, BuildError::IncompleteExpression { .. })),
        ("1++2", |e| matches!(e, BuildError::MissingValue { .. })),
        ("(1+2))", |e| matches!(e, BuildError::UnbalancedParenthesis { .. })),
        ("()", |e| matches!(e, BuildError::EmptyParenthesis { .. })),
        ("$0", |e| matches!(e, BuildError::InvalidVariableIndex { .. })),
        ("${0}", |e| matches!(e, BuildError::InvalidVariableIndex { .. })),
    ];

    for (source, predicate) in cases {
        let mut expr = Expr::new();
        let err = expr
            .build(source, DataType::Long)
            .expect_err(&format!("expected '{source}' to fail to build"));
        assert!(predicate(&err), "wrong error kind for '{source}': {err:?}");
    }
}

#[test]
fn handle_cannot_be_rebuilt() {
    let mut expr = Expr::new();
    expr.build("1+1", DataType::Long).unwrap();
    assert_matches!(expr.build("2+2", DataType::Long), Err(BuildError::AlreadyBuilt));
}

#[test]
fn report_renders_caret_diagnostic() {
    let mut expr = Expr::new();
    assert!(expr.build("1&2", DataType::Long).is_err());
    let report = expr.report("aexpr").expect("build failed");
    assert!(report.contains("unrecognised token"));
}

#[test]
fn destroy_consumes_the_handle() {
    let mut expr = Expr::new();
    expr.build("1+1", DataType::Long).unwrap();
    expr.destroy();
}
