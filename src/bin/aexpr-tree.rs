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

//! Debugging aid: builds one expression and prints its AST as an indented
//! text tree. Not used by any other part of this crate.
//!
//! Usage: `aexpr-tree <long|double> <expression>`

use std::process::ExitCode;

use aexpr::{DataType, Expr};

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let (Some(type_arg), Some(expr_arg)) = (args.next(), args.next()) else {
        eprintln!("usage: aexpr-tree <long|double> <expression>");
        return ExitCode::FAILURE;
    };

    let data_type = match type_arg.as_str() {
        "long" => DataType::Long,
        "double" => DataType::Double,
        other => {
            eprintln!("unknown data type '{other}', expected 'long' or 'double'");
            return ExitCode::FAILURE;
        }
    };

    let mut expr = Expr::new();
    if let Err(err) = expr.build(&expr_arg, data_type) {
        eprintln!("aexpr-tree: {err}");
        if let Some(report) = expr.report("aexpr-tree") {
            eprint!("{report}");
        }
        return ExitCode::FAILURE;
    }

    print!("{}", expr.debug_tree().expect("build just succeeded"));
    ExitCode::SUCCESS
}
