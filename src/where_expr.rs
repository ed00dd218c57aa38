//! Default WHERE-clause parser built on a pest grammar.

use pest::Parser;
use pest::iterators::{Pair, Pairs};
use pest_derive::Parser;

use crate::query::{ExpressionOptions, ExpressionParser, NodeKind, QueryNode, QueryParseError};
use crate::scanner::Location;

#[derive(Parser)]
#[grammar = "src/where.pest"]
struct WhereGrammar;

/// Parses `AND`/`OR`/`XOR`/`NOT` combinations of comparisons, `IN` lists,
/// `LIKE` and `BETWEEN` tests over identifiers, literals and function calls.
///
/// `--` starts a comment running to the end of the line. `!=` is accepted
/// here, but the macro scanner rejects `!`, so inside a macro only `<>`
/// reaches this parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhereExpressionParser;

impl ExpressionParser for WhereExpressionParser {
    fn parse_expression(
        &self,
        text: &str,
        options: &ExpressionOptions<'_>,
    ) -> Result<QueryNode, QueryParseError> {
        let builder = TreeBuilder { text, options };
        let mut pairs = WhereGrammar::parse(Rule::clause, text).map_err(|err| {
            let offset = match err.location {
                pest::error::InputLocation::Pos(pos) => pos,
                pest::error::InputLocation::Span((start, _)) => start,
            };
            QueryParseError::Syntax {
                message: err.variant.message().into_owned(),
                location: builder.locate(offset),
            }
        })?;

        let clause = builder.next_pair(&mut pairs, options.start)?;
        let expr = builder.next_pair(&mut clause.into_inner(), options.start)?;
        builder.build(expr)
    }
}

struct TreeBuilder<'a> {
    text: &'a str,
    options: &'a ExpressionOptions<'a>,
}

impl TreeBuilder<'_> {
    /// Translate a byte offset within the clause into a macro-text location.
    fn locate(&self, offset: usize) -> Location {
        let mut location = self.options.start;
        for &byte in self.text.as_bytes().iter().take(offset) {
            if byte == b'\n' {
                location.line += 1;
                location.column = 1;
            } else {
                location.column += 1;
            }
            location.pos += 1;
        }
        location
    }

    fn next_pair<'i>(
        &self,
        pairs: &mut Pairs<'i, Rule>,
        location: Location,
    ) -> Result<Pair<'i, Rule>, QueryParseError> {
        pairs.next().ok_or_else(|| QueryParseError::Syntax {
            message: "incomplete expression".to_string(),
            location,
        })
    }

    fn build(&self, pair: Pair<'_, Rule>) -> Result<QueryNode, QueryParseError> {
        let location = self.locate(pair.as_span().start());
        match pair.as_rule() {
            Rule::or_expr => self.build_chain(pair, NodeKind::Or),
            Rule::xor_expr => self.build_chain(pair, NodeKind::Xor),
            Rule::and_expr => self.build_chain(pair, NodeKind::And),
            Rule::unary => {
                let mut inner = pair.into_inner();
                let first = self.next_pair(&mut inner, location)?;
                if first.as_rule() != Rule::not_op {
                    return self.build(first);
                }
                let operand = self.build(self.next_pair(&mut inner, location)?)?;
                Ok(QueryNode::with_children(NodeKind::Not, vec![operand], location))
            }
            Rule::predicate => self.build_predicate(pair),
            Rule::group => {
                let inner = self.next_pair(&mut pair.into_inner(), location)?;
                self.build(inner)
            }
            Rule::function_call => {
                let mut inner = pair.into_inner();
                let name = self.next_pair(&mut inner, location)?.as_str().to_string();
                if !self.options.allows_function(&name) {
                    return Err(QueryParseError::UnknownFunction { name, location });
                }
                let args = inner
                    .map(|arg| self.build(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(QueryNode::with_children(NodeKind::Function(name), args, location))
            }
            Rule::identifier => Ok(QueryNode::new(
                NodeKind::Identifier(pair.as_str().to_string()),
                location,
            )),
            Rule::string => {
                let raw = pair.into_inner().next().map_or("", |inner| inner.as_str());
                let text = raw.replace("\"\"", "\"").replace("\\\"", "\"");
                Ok(QueryNode::new(NodeKind::String(text), location))
            }
            Rule::int => match pair.as_str().parse() {
                Ok(value) => Ok(QueryNode::new(NodeKind::Int(value), location)),
                Err(_) => Err(QueryParseError::InvalidNumber {
                    text: pair.as_str().to_string(),
                    location,
                }),
            },
            Rule::float => match pair.as_str().parse() {
                Ok(value) => Ok(QueryNode::new(NodeKind::Float(value), location)),
                Err(_) => Err(QueryParseError::InvalidNumber {
                    text: pair.as_str().to_string(),
                    location,
                }),
            },
            Rule::bool => Ok(QueryNode::new(
                NodeKind::Bool(pair.as_str().eq_ignore_ascii_case("true")),
                location,
            )),
            rule => Err(QueryParseError::Syntax {
                message: format!("unexpected {rule:?}"),
                location,
            }),
        }
    }

    /// Build an `AND`/`OR`/`XOR` level; a single operand is passed through.
    fn build_chain(&self, pair: Pair<'_, Rule>, kind: NodeKind) -> Result<QueryNode, QueryParseError> {
        let location = self.locate(pair.as_span().start());
        let mut operands = pair
            .into_inner()
            .filter(|p| !matches!(p.as_rule(), Rule::and_op | Rule::or_op | Rule::xor_op))
            .map(|p| self.build(p))
            .collect::<Result<Vec<_>, _>>()?;
        if operands.len() == 1 {
            if let Some(only) = operands.pop() {
                return Ok(only);
            }
        }
        Ok(QueryNode::with_children(kind, operands, location))
    }

    fn build_predicate(&self, pair: Pair<'_, Rule>) -> Result<QueryNode, QueryParseError> {
        let location = self.locate(pair.as_span().start());
        let mut inner = pair.into_inner();
        let left = self.build(self.next_pair(&mut inner, location)?)?;
        let Some(tail) = inner.next() else {
            return Ok(left);
        };

        let rule = tail.as_rule();
        let mut negated = false;
        let mut operator = "";
        let mut operands = vec![left];
        for part in tail.into_inner() {
            match part.as_rule() {
                Rule::not_op => negated = true,
                Rule::compare_op => operator = part.as_str(),
                Rule::in_op | Rule::like_op | Rule::between_op | Rule::and_op => {}
                _ => operands.push(self.build(part)?),
            }
        }

        let kind = match (rule, operator) {
            (Rule::compare, "=" | "==") => NodeKind::Eq,
            (Rule::compare, "<>" | "!=") => {
                negated = true;
                NodeKind::Eq
            }
            (Rule::compare, "<") => NodeKind::Lt,
            (Rule::compare, "<=") => NodeKind::Le,
            (Rule::compare, ">") => NodeKind::Gt,
            (Rule::compare, ">=") => NodeKind::Ge,
            (Rule::in_list, _) => NodeKind::In,
            (Rule::like, _) => NodeKind::Like,
            (Rule::between, _) => NodeKind::Between,
            _ => {
                return Err(QueryParseError::Syntax {
                    message: format!("unsupported operator '{operator}'"),
                    location,
                });
            }
        };

        let node = QueryNode::with_children(kind, operands, location);
        if negated {
            Ok(QueryNode::with_children(NodeKind::Not, vec![node], location))
        } else {
            Ok(node)
        }
    }
}
