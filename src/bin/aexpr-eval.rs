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

//! Line-oriented expression evaluator.
//!
//! Reads a file given as the sole command-line argument. Each non-blank,
//! non-`#`-prefixed line has the form:
//!
//! ```text
//! <long|double> <expression> ; v1, v2, ...
//! ```
//!
//! The `; values` suffix may be omitted when the expression references no
//! variables. Prints `<line> => <result>` on success, or the line together
//! with a caret diagnostic on failure, and keeps going. Exits with status 1
//! if any line failed.

use std::fs;
use std::process::ExitCode;

use aexpr::{DataType, Expr, Value};

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: aexpr-eval <script-file>");
        return ExitCode::FAILURE;
    };

    let contents = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(err) => {
            eprintln!("aexpr-eval: cannot read '{path}': {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut had_failure = false;
    for line in contents.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        if let Err(message) = run_line(trimmed) {
            eprintln!("{trimmed}\naexpr-eval: {message}");
            had_failure = true;
        }
    }

    if had_failure {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn run_line(line: &str) -> Result<(), String> {
    let (data_type, rest) = split_type(line)?;
    let (expression, values_text) = match rest.split_once(';') {
        Some((expr, values)) => (expr.trim(), Some(values.trim())),
        None => (rest.trim(), None),
    };

    let variables = match values_text {
        Some(text) if !text.is_empty() => parse_variables(text, data_type)?,
        _ => Vec::new(),
    };

    let mut expr = Expr::new();
    expr.build(expression, data_type)
        .map_err(|err| expr.report("aexpr-eval").unwrap_or_else(|| err.to_string()))?;
    let result = expr
        .eval(&variables)
        .map_err(|err| format!("{err}"))?;

    println!("{line} => {result}");
    Ok(())
}

fn split_type(line: &str) -> Result<(DataType, &str), String> {
    let (head, rest) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| "expected '<long|double> <expression>'".to_owned())?;
    let data_type = match head {
        "long" => DataType::Long,
        "double" => DataType::Double,
        other => return Err(format!("unknown data type '{other}'")),
    };
    Ok((data_type, rest))
}

fn parse_variables(text: &str, data_type: DataType) -> Result<Vec<Value>, String> {
    text.split(',')
        .map(|field| {
            let field = field.trim();
            match data_type {
                DataType::Long => field
                    .parse::<i64>()
                    .map(Value::Long)
                    .map_err(|_| format!("invalid long variable value '{field}'")),
                DataType::Double => field
                    .parse::<f64>()
                    .map(Value::Double)
                    .map_err(|_| format!("invalid double variable value '{field}'")),
            }
        })
        .collect()
}
