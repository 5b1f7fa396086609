// Predicate Filter Port
//
// The engine treats item filtering as an opaque collaborator: compile an
// expression once, then evaluate it against each item of the canonical
// listing. The default evaluator understands flat field comparisons
// joined with `&&`, e.g.:
//
//   origin == 'alice' && quantity >= 100

use crate::domain::QueueItem;
use crate::error::{AppError, Result};

/// Compiled, reusable filter expression
pub trait Predicate: Send + Sync + std::fmt::Debug {
    fn matches(&self, item: &QueueItem) -> bool;
}

/// Filter expression compiler (allows swapping the expression language)
pub trait PredicateEvaluator: Send + Sync {
    /// Compile `expr`, failing with `PredicateSyntax` on malformed input
    fn compile(&self, expr: &str) -> Result<Box<dyn Predicate>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Origin,
    Destination,
    Quantity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone)]
enum Literal {
    Text(String),
    Number(i64),
}

#[derive(Debug, Clone)]
struct Clause {
    field: Field,
    op: Op,
    literal: Literal,
}

impl Clause {
    fn matches(&self, item: &QueueItem) -> bool {
        match (&self.field, &self.literal) {
            (Field::Quantity, Literal::Number(n)) => compare_ord(item.quantity, *n, self.op),
            (Field::Id, Literal::Text(t)) => compare_eq(item.id.as_str(), t, self.op),
            (Field::Origin, Literal::Text(t)) => compare_eq(&item.origin, t, self.op),
            (Field::Destination, Literal::Text(t)) => compare_eq(&item.destination, t, self.op),
            // type mismatches are rejected at compile time
            _ => false,
        }
    }
}

fn compare_ord(left: i64, right: i64, op: Op) -> bool {
    match op {
        Op::Eq => left == right,
        Op::Ne => left != right,
        Op::Lt => left < right,
        Op::Le => left <= right,
        Op::Gt => left > right,
        Op::Ge => left >= right,
    }
}

fn compare_eq(left: &str, right: &str, op: Op) -> bool {
    match op {
        Op::Eq => left == right,
        Op::Ne => left != right,
        // order comparisons on text are rejected at compile time
        _ => false,
    }
}

/// Default evaluator: conjunction of field comparisons
pub struct FieldExprEvaluator;

impl PredicateEvaluator for FieldExprEvaluator {
    fn compile(&self, expr: &str) -> Result<Box<dyn Predicate>> {
        if expr.trim().is_empty() {
            return Err(AppError::PredicateSyntax("empty expression".to_string()));
        }

        let mut clauses = Vec::new();
        for part in expr.split("&&") {
            clauses.push(parse_clause(part)?);
        }
        Ok(Box::new(CompiledExpr { clauses }))
    }
}

#[derive(Debug)]
struct CompiledExpr {
    clauses: Vec<Clause>,
}

impl Predicate for CompiledExpr {
    fn matches(&self, item: &QueueItem) -> bool {
        self.clauses.iter().all(|c| c.matches(item))
    }
}

fn parse_clause(text: &str) -> Result<Clause> {
    let syntax = |msg: &str| AppError::PredicateSyntax(format!("{}: '{}'", msg, text.trim()));

    // longest operators first so ">=" is not read as ">"
    const OPS: [(&str, Op); 6] = [
        ("==", Op::Eq),
        ("!=", Op::Ne),
        ("<=", Op::Le),
        (">=", Op::Ge),
        ("<", Op::Lt),
        (">", Op::Gt),
    ];

    let (op_text, op) = OPS
        .iter()
        .find(|(needle, _)| text.contains(needle))
        .copied()
        .ok_or_else(|| syntax("missing comparison operator"))?;

    let (field_text, literal_text) = text
        .split_once(op_text)
        .ok_or_else(|| syntax("missing comparison operator"))?;

    let field = match field_text.trim() {
        "id" => Field::Id,
        "origin" => Field::Origin,
        "destination" => Field::Destination,
        "quantity" => Field::Quantity,
        other => {
            return Err(AppError::PredicateSyntax(format!(
                "unknown field '{}'",
                other
            )))
        }
    };

    let literal = parse_literal(literal_text.trim()).ok_or_else(|| syntax("malformed literal"))?;

    match (field, &literal) {
        (Field::Quantity, Literal::Number(_)) => {}
        (Field::Quantity, Literal::Text(_)) => {
            return Err(syntax("quantity compares against a number"))
        }
        (_, Literal::Number(_)) => return Err(syntax("text field compares against a quoted value")),
        (_, Literal::Text(_)) => {
            if !matches!(op, Op::Eq | Op::Ne) {
                return Err(syntax("text fields support only == and !="));
            }
        }
    }

    Ok(Clause { field, op, literal })
}

fn parse_literal(text: &str) -> Option<Literal> {
    let quoted = |q: char| {
        text.len() >= 2 && text.starts_with(q) && text.ends_with(q)
    };
    if quoted('\'') || quoted('"') {
        return Some(Literal::Text(text[1..text.len() - 1].to_string()));
    }
    text.parse::<i64>().ok().map(Literal::Number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ItemId, QueueItem, QueueItemSpec};

    fn item(origin: &str, quantity: i64) -> QueueItem {
        QueueItem::from_spec(
            ItemId::from_parts(quantity * 100, [1u8; 10]),
            QueueItemSpec {
                origin: origin.to_string(),
                destination: "warehouse".to_string(),
                quantity,
                extra_data: None,
            },
            0,
        )
    }

    #[test]
    fn test_single_clause() {
        let predicate = FieldExprEvaluator.compile("quantity > 10").unwrap();
        assert!(predicate.matches(&item("alice", 11)));
        assert!(!predicate.matches(&item("alice", 10)));
    }

    #[test]
    fn test_conjunction() {
        let predicate = FieldExprEvaluator
            .compile("origin == 'alice' && quantity <= 5")
            .unwrap();
        assert!(predicate.matches(&item("alice", 5)));
        assert!(!predicate.matches(&item("bob", 5)));
        assert!(!predicate.matches(&item("alice", 6)));
    }

    #[test]
    fn test_text_inequality() {
        let predicate = FieldExprEvaluator.compile("destination != 'depot'").unwrap();
        assert!(predicate.matches(&item("alice", 1)));
    }

    #[test]
    fn test_syntax_errors() {
        let cases = [
            "",
            "quantity",
            "unknown == 'x'",
            "quantity == 'text'",
            "origin > 'alice'",
            "origin == alice",
        ];
        for expr in cases {
            let err = FieldExprEvaluator.compile(expr).unwrap_err();
            assert!(matches!(err, AppError::PredicateSyntax(_)), "{}", expr);
        }
    }
}
