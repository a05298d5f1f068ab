// Conjunction Simplification 속성 기반 테스트
//
// 임의의 AND/OR/NOT 트리에 대해:
// - 단순화 결과가 원래 식과 같은 진리값을 가짐
// - 단순화는 멱등
// - 결과 트리는 정규형 (중첩 동종 연결자, 상수 피연산자, 이중 부정 없음)

use planx_core::expressions::{
    CompareValue, Key, ParameterId, make_compare_expression, make_compare_union_expression,
    make_constant_expression,
};
use planx_core::{Arena, CompareType, ConjunctionSimplificationRule, ExprPtr, Expression};
use proptest::prelude::*;

/// 리프 변수 개수: 진리표 전수 검사 범위
const VARIABLES: usize = 4;

#[derive(Debug, Clone)]
enum Shape {
    Leaf(u16),
    True,
    False,
    And(Vec<Shape>),
    Or(Vec<Shape>),
    Not(Box<Shape>),
}

fn arb_shape() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        4 => (0..VARIABLES as u16).prop_map(Shape::Leaf),
        1 => Just(Shape::True),
        1 => Just(Shape::False),
    ];
    leaf.prop_recursive(5, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Shape::And),
            prop::collection::vec(inner.clone(), 0..4).prop_map(Shape::Or),
            inner.prop_map(|s| Shape::Not(Box::new(s))),
        ]
    })
}

fn build(arena: &Arena, shape: &Shape) -> ExprPtr {
    let union = |op, shapes: &[Shape]| {
        let children = shapes.iter().map(|s| build(arena, s)).collect();
        make_compare_union_expression(arena, op, children).unwrap()
    };
    match shape {
        Shape::Leaf(id) => make_compare_expression(
            arena,
            CompareType::Eq,
            Key::new(format!("f{id}")),
            CompareValue::Parameter(ParameterId(*id)),
        )
        .unwrap(),
        Shape::True => make_constant_expression(arena, true).unwrap(),
        Shape::False => make_constant_expression(arena, false).unwrap(),
        Shape::And(children) => union(CompareType::UnionAnd, children),
        Shape::Or(children) => union(CompareType::UnionOr, children),
        Shape::Not(child) => union(CompareType::UnionNot, std::slice::from_ref(child.as_ref())),
    }
}

/// 리프 `#n`의 값은 `assignment`의 n번째 비트
fn eval(expr: &Expression, assignment: u32) -> bool {
    let compare = expr.as_compare().unwrap();
    match compare.compare_type() {
        CompareType::AllTrue => true,
        CompareType::AllFalse => false,
        CompareType::UnionAnd => compare.children().iter().all(|c| eval(c, assignment)),
        CompareType::UnionOr => compare.children().iter().any(|c| eval(c, assignment)),
        CompareType::UnionNot => !compare.children().iter().all(|c| eval(c, assignment)),
        _ => match compare.rhs() {
            Some(CompareValue::Parameter(id)) => assignment & (1 << id.0) != 0,
            other => panic!("unexpected leaf operand {other:?}"),
        },
    }
}

fn is_normalized(expr: &Expression) -> bool {
    let compare = expr.as_compare().unwrap();
    let children = compare.children();
    let operand_ok = |child: &ExprPtr, op| {
        !child.is_true() && !child.is_false() && !child.is_compare_type(op) && is_normalized(child)
    };
    match compare.compare_type() {
        CompareType::AllTrue | CompareType::AllFalse => children.is_empty(),
        op @ (CompareType::UnionAnd | CompareType::UnionOr) => {
            children.len() >= 2 && children.iter().all(|c| operand_ok(c, op))
        }
        CompareType::UnionNot => {
            children.len() == 1 && operand_ok(&children[0], CompareType::UnionNot)
        }
        _ => children.is_empty(),
    }
}

fn simplify(arena: &Arena, expr: &ExprPtr) -> ExprPtr {
    ConjunctionSimplificationRule.simplify(arena, expr).unwrap()
}

proptest! {
    #[test]
    fn prop_simplify_preserves_truth_table(shape in arb_shape()) {
        let arena = Arena::new();
        let original = build(&arena, &shape);
        let simplified = simplify(&arena, &original);
        for assignment in 0..(1u32 << VARIABLES) {
            prop_assert_eq!(
                eval(&original, assignment),
                eval(&simplified, assignment),
                "{} vs {} under {:04b}", original, simplified, assignment
            );
        }
    }

    #[test]
    fn prop_simplify_is_idempotent(shape in arb_shape()) {
        let arena = Arena::new();
        let once = simplify(&arena, &build(&arena, &shape));
        let twice = simplify(&arena, &once);
        prop_assert_eq!(once.to_string(), twice.to_string());
    }

    #[test]
    fn prop_simplify_output_is_normalized(shape in arb_shape()) {
        let arena = Arena::new();
        let simplified = simplify(&arena, &build(&arena, &shape));
        prop_assert!(is_normalized(&simplified), "not normalized: {}", simplified);
    }

    #[test]
    fn prop_double_negation_cancels(shape in arb_shape()) {
        let arena = Arena::new();
        let inner = build(&arena, &shape);
        let not = |e: ExprPtr| {
            make_compare_union_expression(&arena, CompareType::UnionNot, vec![e]).unwrap()
        };
        let twice = not(not(inner.clone()));
        prop_assert_eq!(
            simplify(&arena, &twice).to_string(),
            simplify(&arena, &inner).to_string()
        );
    }

    #[test]
    fn prop_singleton_connective_unwraps(shape in arb_shape(), use_or in any::<bool>()) {
        let arena = Arena::new();
        let inner = build(&arena, &shape);
        let op = if use_or { CompareType::UnionOr } else { CompareType::UnionAnd };
        let wrapped = make_compare_union_expression(&arena, op, vec![inner.clone()]).unwrap();
        prop_assert_eq!(
            simplify(&arena, &wrapped).to_string(),
            simplify(&arena, &inner).to_string()
        );
    }

    #[test]
    fn prop_absorbing_constant_wins(
        shapes in prop::collection::vec(arb_shape(), 0..4),
        position in any::<prop::sample::Index>(),
        use_or in any::<bool>(),
    ) {
        let arena = Arena::new();
        let mut children: Vec<ExprPtr> = shapes.iter().map(|s| build(&arena, s)).collect();
        let at = position.index(children.len() + 1);
        // OR은 true, AND는 false가 흡수 원소
        children.insert(at, make_constant_expression(&arena, use_or).unwrap());
        let op = if use_or { CompareType::UnionOr } else { CompareType::UnionAnd };
        let expr = make_compare_union_expression(&arena, op, children).unwrap();
        let simplified = simplify(&arena, &expr);
        if use_or {
            prop_assert!(simplified.is_true());
        } else {
            prop_assert!(simplified.is_false());
        }
    }

    #[test]
    fn prop_nested_and_flattens(
        a in arb_shape(),
        b in arb_shape(),
        c in arb_shape(),
    ) {
        let arena = Arena::new();
        let inner = Shape::And(vec![a.clone(), b.clone()]);
        let nested = build(&arena, &Shape::And(vec![inner, c.clone()]));
        let flat = build(&arena, &Shape::And(vec![a, b, c]));
        prop_assert_eq!(
            simplify(&arena, &nested).to_string(),
            simplify(&arena, &flat).to_string()
        );
    }
}
