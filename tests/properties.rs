use criteria_eval::{evaluate, DocumentExtractor, Expression, Value};
use proptest::prelude::*;
use serde_yaml::Value as YamlValue;

fn run(expr: &Expression) -> bool {
    let doc = YamlValue::Mapping(Default::default());
    evaluate(expr, &doc, &DocumentExtractor::default()).unwrap() == Value::Bool(true)
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-5i64..5).prop_map(Value::Int),
        "[a-c]{0,2}".prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn not_equal_is_complement_of_equal(a in scalar(), b in scalar()) {
        let eq = run(&Expression::equal(Expression::literal(a.clone()), Expression::literal(b.clone())));
        let ne = run(&Expression::not_equal(Expression::literal(a.clone()), Expression::literal(b.clone())));
        prop_assert_ne!(eq, ne);
        prop_assert_eq!(eq, a == b);
    }

    #[test]
    fn not_in_is_complement_of_in(v in scalar(), items in prop::collection::vec(scalar(), 0..5)) {
        let list = Expression::literal(Value::List(items.clone()));
        let hit = run(&Expression::is_in(Expression::literal(v.clone()), list.clone()));
        let miss = run(&Expression::not_in(Expression::literal(v.clone()), list));
        prop_assert_ne!(hit, miss);
        prop_assert_eq!(hit, items.contains(&v));
    }

    #[test]
    fn ordering_follows_integers(a in any::<i64>(), b in any::<i64>()) {
        let l = || Expression::literal(a);
        let r = || Expression::literal(b);
        prop_assert_eq!(run(&Expression::greater_than(l(), r())), a > b);
        prop_assert_eq!(run(&Expression::greater_than_or_equal(l(), r())), a >= b);
        prop_assert_eq!(run(&Expression::less_than(l(), r())), a < b);
        prop_assert_eq!(run(&Expression::less_than_or_equal(l(), r())), a <= b);
    }

    #[test]
    fn ordering_follows_strings(a in "[a-z]{0,4}", b in "[a-z]{0,4}") {
        let l = || Expression::literal(a.as_str());
        let r = || Expression::literal(b.as_str());
        prop_assert_eq!(run(&Expression::greater_than(l(), r())), a > b);
        prop_assert_eq!(run(&Expression::less_than_or_equal(l(), r())), a <= b);
    }

    #[test]
    fn and_or_are_duals(flags in prop::collection::vec(any::<bool>(), 1..6)) {
        let args = || flags.iter().map(|f| Expression::literal(*f)).collect::<Vec<_>>();
        prop_assert_eq!(run(&Expression::and(args()).unwrap()), flags.iter().all(|f| *f));
        prop_assert_eq!(run(&Expression::or(args()).unwrap()), flags.iter().any(|f| *f));
    }
}
