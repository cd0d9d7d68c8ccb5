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

//! Incremental tree construction: turns a token stream into a completed
//! [`Ast`], enforcing operator precedence, parenthesis scoping, and
//! function-argument scoping along the way.

use std::ops::Range;

use crate::ast::{Ast, Category, NodeId, Payload, TokenKind};
use crate::error::BuildError;
use crate::token::Tokenizer;
use crate::value::{DataType, Syntax};
use crate::varset::VarSet;

pub struct Builder<'a> {
    tokenizer: Tokenizer<'a>,
    ast: Ast,
    current: Option<NodeId>,
    varset: VarSet,
}

impl<'a> Builder<'a> {
    pub fn new(source: &'a str, data_type: DataType, syntax: Syntax) -> Self {
        Builder {
            tokenizer: Tokenizer::new(source, data_type, syntax),
            ast: Ast::new(),
            current: None,
            varset: VarSet::new(),
        }
    }

    /// Whether the next token must be value-like (an operand is expected)
    /// given the current state of the tree.
    fn expect_operand(&self) -> bool {
        match self.current {
            None => true,
            Some(cur) => {
                let node = self.ast.get(cur);
                node.filled_arity() < node.kind.arity()
            }
        }
    }

    /// Consumes the builder and produces the finished AST and variable set.
    pub fn build(mut self) -> Result<(Ast, VarSet), BuildError> {
        loop {
            let expect_operand = self.expect_operand();
            let Some(tok) = self.tokenizer.next(expect_operand)? else {
                break;
            };

            if tok.kind == TokenKind::ParenRight {
                // Bypasses the generic operand/operator classification
                // below: whether a `)` is acceptable here depends on
                // whether it closes an open scope, not on whether an
                // operand or operator was nominally expected. This is what
                // lets `()` get diagnosed specifically as an empty
                // parenthesis rather than a generic missing value.
                self.close_paren(tok.range)?;
                continue;
            }

            let is_value_like = matches!(
                tok.kind.category(),
                Category::Value | Category::Paren | Category::UnaryOp | Category::Func
            );

            if expect_operand && !is_value_like {
                return Err(BuildError::MissingValue { at: tok.range });
            }
            if !expect_operand && is_value_like {
                return Err(BuildError::MissingOperator { at: tok.range });
            }

            if tok.kind.category() == Category::BinaryOp {
                let id = self.insert_binary(tok.kind, tok.range);
                self.current = Some(id);
            } else {
                if let Payload::Var(idx) = tok.payload {
                    self.varset.insert(idx)?;
                }
                let id = self.insert_operand(tok.kind, tok.payload, tok.range);
                self.current = Some(id);
            }
        }

        self.finish()
    }

    fn insert_operand(&mut self, kind: TokenKind, payload: Payload, range: Range<usize>) -> NodeId {
        let new_id = self.ast.push(kind, payload, range);
        match self.current {
            None => self.ast.set_root(new_id),
            Some(cur) => {
                self.ast.get_mut(new_id).parent = Some(cur);
                let node = self.ast.get_mut(cur);
                if node.left.is_none() {
                    node.left = Some(new_id);
                } else {
                    node.right = Some(new_id);
                }
            }
        }
        new_id
    }

    fn insert_binary(&mut self, kind: TokenKind, range: Range<usize>) -> NodeId {
        let mut node = self.current.expect("a binary operator always follows a value");
        loop {
            let Some(parent) = self.ast.get(node).parent else {
                break;
            };
            let parent_kind = self.ast.get(parent).kind;
            let parent_is_scope =
                parent_kind == TokenKind::ParenLeft || parent_kind.category() == Category::Func;
            if parent_is_scope || parent_kind.precedence() < kind.precedence() {
                break;
            }
            node = parent;
        }

        let new_id = self.ast.push(kind, Payload::None, range);
        let old_parent = self.ast.get(node).parent;
        self.ast.get_mut(new_id).left = Some(node);
        self.ast.get_mut(new_id).parent = old_parent;
        self.ast.get_mut(node).parent = Some(new_id);
        match old_parent {
            Some(p) => {
                if self.ast.get(p).left == Some(node) {
                    self.ast.get_mut(p).left = Some(new_id);
                } else {
                    self.ast.get_mut(p).right = Some(new_id);
                }
            }
            None => self.ast.set_root(new_id),
        }
        new_id
    }

    fn close_paren(&mut self, range: Range<usize>) -> Result<(), BuildError> {
        let mut walk = self.current;
        let scope = loop {
            let Some(id) = walk else {
                return Err(BuildError::UnbalancedParenthesis { at: range });
            };
            let node = self.ast.get(id);
            let is_open_scope = (node.kind == TokenKind::ParenLeft
                || node.kind.category() == Category::Func)
                && !node.closed;
            if is_open_scope {
                break id;
            }
            walk = node.parent;
        };

        if self.ast.get(scope).kind.category() == Category::Func {
            self.ast.get_mut(scope).closed = true;
            self.current = Some(scope);
            return Ok(());
        }

        let Some(child) = self.ast.get(scope).left else {
            return Err(BuildError::EmptyParenthesis { at: range });
        };
        let child = self.ast.get(child).clone();
        {
            let paren = self.ast.get_mut(scope);
            paren.kind = child.kind;
            paren.payload = child.payload;
            paren.left = child.left;
            paren.right = child.right;
            paren.range = child.range.clone();
            paren.closed = child.closed;
        }
        if let Some(l) = child.left {
            self.ast.get_mut(l).parent = Some(scope);
        }
        if let Some(r) = child.right {
            self.ast.get_mut(r).parent = Some(scope);
        }
        self.current = Some(scope);
        Ok(())
    }

    fn finish(mut self) -> Result<(Ast, VarSet), BuildError> {
        let Some(cur) = self.current else {
            return Err(BuildError::EmptyExpression);
        };

        let mut walk = Some(cur);
        while let Some(id) = walk {
            let node = self.ast.get(id);
            let unclosed_scope = (node.kind == TokenKind::ParenLeft
                || node.kind.category() == Category::Func)
                && !node.closed;
            if unclosed_scope {
                return Err(BuildError::UnclosedParenthesis {
                    at: node.range.clone(),
                });
            }
            walk = node.parent;
        }

        let node = self.ast.get(cur);
        if node.filled_arity() < node.kind.arity() {
            let at = self.tokenizer.pos();
            return Err(BuildError::IncompleteExpression { at: at..at });
        }

        let mut root = cur;
        while let Some(p) = self.ast.get(root).parent {
            root = p;
        }
        self.ast.set_root(root);

        Ok((self.ast, self.varset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn build(src: &str, dt: DataType) -> Result<(Ast, VarSet), BuildError> {
        Builder::new(src, dt, Syntax::default()).build()
    }

    #[test]
    fn left_associative_precedence() {
        let (ast, _) = build("2+3*4", DataType::Long).unwrap();
        let root = ast.root().unwrap();
        assert_eq!(ast.get(root).kind, TokenKind::Plus);
        let right = ast.get(root).right.unwrap();
        assert_eq!(ast.get(right).kind, TokenKind::Mul);
    }

    #[test]
    fn left_to_left_chain_is_left_associative() {
        let (ast, _) = build("2+3+4", DataType::Long).unwrap();
        let root = ast.root().unwrap();
        assert_eq!(ast.get(root).kind, TokenKind::Plus);
        let left = ast.get(root).left.unwrap();
        assert_eq!(ast.get(left).kind, TokenKind::Plus);
    }

    #[test]
    fn parens_splice_out() {
        let (ast, _) = build("(2+3)*4", DataType::Long).unwrap();
        let root = ast.root().unwrap();
        assert_eq!(ast.get(root).kind, TokenKind::Mul);
        let left = ast.get(root).left.unwrap();
        assert_eq!(ast.get(left).kind, TokenKind::Plus);
        // 2, 3, +, * plus the original ParenLeft and Plus slots, which stay
        // allocated (now unreachable) once the splice rewrites node 0 in place.
        assert_eq!(ast.len(), 6);
    }

    #[test]
    fn unclosed_paren_is_an_error() {
        assert_matches!(build("(1+2", DataType::Long), Err(BuildError::UnclosedParenthesis { .. }));
    }

    #[test]
    fn incomplete_expression_is_an_error() {
        assert_matches!(build("1+", DataType::Long), Err(BuildError::IncompleteExpression { .. }));
    }

    #[test]
    fn missing_value_is_an_error() {
        assert_matches!(build("1++2", DataType::Long), Err(BuildError::MissingValue { .. }));
    }

    #[test]
    fn unbalanced_paren_is_an_error() {
        assert_matches!(build("(1+2))", DataType::Long), Err(BuildError::UnbalancedParenthesis { .. }));
    }

    #[test]
    fn empty_paren_is_an_error() {
        assert_matches!(build("()", DataType::Long), Err(BuildError::EmptyParenthesis { .. }));
    }

    #[test]
    fn variable_zero_is_invalid() {
        assert_matches!(build("$0", DataType::Long), Err(BuildError::InvalidVariableIndex { .. }));
        assert_matches!(build("${0}", DataType::Long), Err(BuildError::InvalidVariableIndex { .. }));
    }

    #[test]
    fn nested_function_scopes_close_in_order() {
        let (ast, _) = build("sqrt(ln(1))", DataType::Double).unwrap();
        let root = ast.root().unwrap();
        assert_eq!(ast.get(root).kind, TokenKind::Sqrt);
        let inner = ast.get(root).left.unwrap();
        assert_eq!(ast.get(inner).kind, TokenKind::Ln);
    }

    #[test]
    fn variable_set_tracks_distinct_indices() {
        let (_, vars) = build("$1 + $2 + $1", DataType::Long).unwrap();
        assert_eq!(vars.iter().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn context_sensitive_negation() {
        let (ast, _) = build("-1+2", DataType::Long).unwrap();
        let root = ast.root().unwrap();
        assert_eq!(ast.get(root).kind, TokenKind::Plus);
        let left = ast.get(root).left.unwrap();
        assert_eq!(ast.get(left).kind, TokenKind::Neg);
    }

    #[test]
    fn closed_function_scope_does_not_swallow_a_following_close_paren() {
        // Regression: a closed `sqrt(...)` node still reports Func category,
        // so the scope search must skip it rather than treating the next
        // `)` as belonging to it.
        let (ast, _) = build("(sqrt(1)+2)", DataType::Double).unwrap();
        let root = ast.root().unwrap();
        assert_eq!(ast.get(root).kind, TokenKind::Plus);
    }

    #[test]
    fn function_without_closing_paren_is_unclosed() {
        assert_matches!(build("sqrt(1", DataType::Double), Err(BuildError::UnclosedParenthesis { .. }));
    }

    #[test]
    fn complete_function_call_is_not_reported_unclosed() {
        assert!(build("sqrt(1)", DataType::Double).is_ok());
    }
}
