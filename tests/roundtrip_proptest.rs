//! Property-based tests: canonical rendering parses back to the same tree
//!
//! Generated numbers are non-negative because the grammar has no unary minus, and
//! generated strings never contain `;`, which always starts a comment.

use au3::au3::ast::{BlockLine, Expression, Operator, Scope, Script, Statement};
use au3::{parse_expression, parse_script};
use proptest::prelude::*;

const OPERATORS: [Operator; 15] = [
    Operator::And,
    Operator::Or,
    Operator::LessEqual,
    Operator::GreaterEqual,
    Operator::NotEqual,
    Operator::StrictEqual,
    Operator::Less,
    Operator::Greater,
    Operator::Equal,
    Operator::Concat,
    Operator::Add,
    Operator::Subtract,
    Operator::Multiply,
    Operator::Divide,
    Operator::Power,
];

fn leaf() -> impl Strategy<Value = Expression> {
    prop_oneof![
        (0i64..1_000_000).prop_map(Expression::value),
        (0.0f64..1.0e6).prop_map(Expression::value),
        any::<bool>().prop_map(Expression::value),
        "[a-zA-Z0-9 ,'\"()]{0,12}".prop_map(Expression::value),
        "[$@][a-zA-Z_][a-zA-Z0-9_]{0,8}".prop_map(Expression::variable),
        "Fn[a-zA-Z0-9_]{0,6}".prop_map(Expression::reference),
    ]
}

fn expression() -> impl Strategy<Value = Expression> {
    leaf().prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (
                prop::sample::select(OPERATORS.to_vec()),
                inner.clone(),
                inner.clone()
            )
                .prop_map(|(operator, left, right)| Expression::binary(operator, left, right)),
            inner.clone().prop_map(Expression::not),
            ("Fn[a-zA-Z0-9_]{0,6}", prop::collection::vec(inner.clone(), 0..4))
                .prop_map(|(name, arguments)| Expression::call(name, arguments)),
            prop::collection::vec(inner, 0..4).prop_map(Expression::array),
        ]
    })
}

fn declaration() -> impl Strategy<Value = Statement> {
    (
        prop::sample::select(vec![Scope::Local, Scope::Global, Scope::Dim]),
        any::<bool>(),
        prop::collection::vec(("\\$[a-z][a-z0-9_]{0,6}", expression()), 1..4),
    )
        .prop_map(|(scope, is_const, bindings)| Statement::VariableDeclaration {
            scope,
            is_const,
            bindings: bindings.into_iter().collect(),
        })
}

proptest! {
    #[test]
    fn rendered_expression_parses_to_same_tree(expression in expression()) {
        let rendered = expression.to_string();
        let reparsed = parse_expression(&rendered);

        prop_assert!(reparsed.is_ok(), "{rendered:?} failed: {:?}", reparsed.err());
        prop_assert_eq!(reparsed.unwrap(), expression);
    }

    #[test]
    fn rendered_declarations_parse_to_same_script(
        statements in prop::collection::vec(declaration(), 1..5),
        comment in "[a-zA-Z0-9 ]{0,10}",
    ) {
        let lines = statements
            .into_iter()
            .enumerate()
            .map(|(idx, statement)| BlockLine::new(idx + 1, statement).with_comment(comment.trim()))
            .collect();
        let script = Script::from_lines(lines);
        let rendered = script.to_source();

        let reparsed = parse_script(&rendered);
        prop_assert!(reparsed.is_ok(), "{rendered:?} failed: {:?}", reparsed.err());
        prop_assert_eq!(reparsed.unwrap(), script);
    }

    #[test]
    fn arbitrary_input_never_panics(source in "[ -~\n]{0,80}") {
        let _ = parse_script(&source);
    }
}
