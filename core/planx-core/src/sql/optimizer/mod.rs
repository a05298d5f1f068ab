//! SQL 쿼리 옵티마이저: 규칙 기반 재작성
//!
//! 논리 플랜을 실행 전에 순서대로 규칙에 통과시킵니다.
//! 현재 규칙: ConjunctionSimplification

mod conjunction_simplification;


use crate::arena::Arena;
use crate::error::PlanxResult;
use crate::logical_plan::Node;

pub use conjunction_simplification::ConjunctionSimplificationRule;

/// 최적화 규칙 트레이트
pub trait OptimizationRule: Send + Sync {
    /// 규칙 이름
    fn name(&self) -> &str;

    /// 플랜에 규칙 적용. New expressions come from `arena`; the rule owns
    /// `root` for the duration of the call and may mutate or replace it.
    fn apply(&self, arena: &Arena, root: Option<Node>) -> PlanxResult<Option<Node>>;
}

/// 쿼리 옵티마이저
pub struct QueryOptimizer {
    rules: Vec<Box<dyn OptimizationRule>>,
    trace_rules: bool,
}

impl QueryOptimizer {
    /// 기본 최적화 규칙으로 생성
    pub fn new() -> Self {
        Self {
            rules: vec![Box::new(ConjunctionSimplificationRule)],
            trace_rules: false,
        }
    }

    /// Append a rule; it runs after every rule already registered.
    pub fn with_rule(mut self, rule: Box<dyn OptimizationRule>) -> Self {
        self.rules.push(rule);
        self
    }

    /// Log the rendered plan before and after every rule.
    pub fn with_trace_rules(mut self, trace_rules: bool) -> Self {
        self.trace_rules = trace_rules;
        self
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// 모든 규칙 적용
    pub fn optimize(
        &self,
        arena: Option<&Arena>,
        plan: Option<Node>,
    ) -> PlanxResult<Option<Node>> {
        let arena = Arena::resolve(arena);
        let mut optimized = plan;
        for rule in &self.rules {
            tracing::debug!(rule = rule.name(), "applying optimization rule");
            if self.trace_rules {
                tracing::debug!(rule = rule.name(), before = %render(optimized.as_ref()));
            }
            optimized = rule.apply(arena, optimized)?;
            if self.trace_rules {
                tracing::debug!(rule = rule.name(), after = %render(optimized.as_ref()));
            }
        }
        Ok(optimized)
    }
}

impl Default for QueryOptimizer {
    fn default() -> Self {
        Self::new()
    }
}

fn render(plan: Option<&Node>) -> String {
    match plan {
        Some(node) => node.to_string(),
        None => "<empty>".to_string(),
    }
}
