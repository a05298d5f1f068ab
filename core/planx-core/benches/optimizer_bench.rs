// 옵티마이저 성능 벤치마크
//
// Section 1: 표현식 단순화 (깊은 이중 부정, 넓은 AND 평탄화)
// Section 2: 플랜 전체 최적화 (SQL → 플랜 → ConjunctionSimplification)

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use planx_core::expressions::{
    CompareValue, Key, ParameterId, make_compare_expression, make_compare_union_expression,
    make_constant_expression,
};
use planx_core::sql::{SqlParser, SqlTransformer};
use planx_core::{Arena, CompareType, ConjunctionSimplificationRule, ExprPtr, QueryOptimizer};

fn leaf(arena: &Arena, id: u16) -> ExprPtr {
    make_compare_expression(
        arena,
        CompareType::Gte,
        Key::new(format!("f{id}")),
        CompareValue::Parameter(ParameterId(id)),
    )
    .unwrap()
}

/// NOT(NOT(...NOT(leaf)...)): `depth`개의 부정
fn nested_not(arena: &Arena, depth: usize) -> ExprPtr {
    let mut expr = leaf(arena, 0);
    for _ in 0..depth {
        expr = make_compare_union_expression(arena, CompareType::UnionNot, vec![expr]).unwrap();
    }
    expr
}

/// 왼쪽으로 깊어지는 AND 체인, 중간중간 TRUE 섞음
fn left_deep_and(arena: &Arena, width: u16) -> ExprPtr {
    let mut expr = leaf(arena, 0);
    for id in 1..width {
        let rhs = if id % 4 == 0 {
            make_constant_expression(arena, true).unwrap()
        } else {
            leaf(arena, id)
        };
        expr =
            make_compare_union_expression(arena, CompareType::UnionAnd, vec![expr, rhs]).unwrap();
    }
    expr
}

fn bench_simplify_expressions(c: &mut Criterion) {
    let mut group = c.benchmark_group("simplify_expression");
    let rule = ConjunctionSimplificationRule;

    for depth in [2usize, 16, 128] {
        let arena = Arena::new();
        let expr = nested_not(&arena, depth);
        group.bench_with_input(BenchmarkId::new("nested_not", depth), &expr, |b, expr| {
            b.iter(|| rule.simplify(&arena, black_box(expr)).unwrap())
        });
    }

    for width in [8u16, 64, 512] {
        let arena = Arena::new();
        let expr = left_deep_and(&arena, width);
        group.bench_with_input(BenchmarkId::new("left_deep_and", width), &expr, |b, expr| {
            b.iter(|| rule.simplify(&arena, black_box(expr)).unwrap())
        });
    }

    group.finish();
}

fn bench_optimize_plan(c: &mut Criterion) {
    let queries = [
        (
            "double_not",
            "SELECT * FROM TestDatabase.TestCollection WHERE NOT (NOT (number >= 10)) AND number <= 20",
        ),
        (
            "join_and_filter",
            "SELECT * FROM db.users u JOIN db.orders o ON u.id = o.user_id AND TRUE \
             WHERE (a = 1 OR FALSE) AND (b = 2 AND (c = 3 AND TRUE)) ORDER BY a LIMIT 10",
        ),
        ("always_true", "SELECT * FROM db.c WHERE TRUE OR number = 5"),
    ];

    let arena = Arena::new();
    let optimizer = QueryOptimizer::new();
    let mut group = c.benchmark_group("optimize_plan");

    for (name, sql) in queries {
        let statement = SqlParser::new().parse_one(sql).unwrap();
        let plan = SqlTransformer::new(&arena).transform(&statement).unwrap().node;
        group.bench_function(name, |b| {
            b.iter(|| {
                optimizer
                    .optimize(Some(&arena), Some(black_box(plan.clone())))
                    .unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_simplify_expressions, bench_optimize_plan);
criterion_main!(benches);
