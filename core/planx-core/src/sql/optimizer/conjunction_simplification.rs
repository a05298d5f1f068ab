//! Rule 1: Conjunction Simplification
//!
//! AND/OR/NOT 연결자를 단순화하고 (평탄화, 상수 단락, 이중 부정 제거)
//! 조건이 항상 참이 된 필터 단계를 플랜에서 제거합니다.

use crate::arena::Arena;
use crate::error::{PlanxError, PlanxResult};
use crate::expressions::{
    CompareType, ExprPtr, Expression, make_compare_union_expression, make_constant_expression,
};
use crate::logical_plan::Node;

use super::OptimizationRule;

/// 불리언 연결자 단순화 + 항상 참인 필터 제거
pub struct ConjunctionSimplificationRule;

impl OptimizationRule for ConjunctionSimplificationRule {
    fn name(&self) -> &str {
        "ConjunctionSimplification"
    }

    fn apply(&self, arena: &Arena, root: Option<Node>) -> PlanxResult<Option<Node>> {
        let Some(mut root) = root else {
            return Ok(None);
        };
        let pruned = self.simplify_plan(arena, &mut root)?;
        if pruned > 0 {
            tracing::debug!(pruned, "removed always-true filter stages");
        }
        Ok(Some(root))
    }
}

impl ConjunctionSimplificationRule {
    /// Simplify a possibly absent expression.
    pub fn simplify_expr(
        &self,
        arena: &Arena,
        expr: Option<ExprPtr>,
    ) -> PlanxResult<Option<ExprPtr>> {
        expr.map(|e| self.simplify(arena, &e)).transpose()
    }

    /// Simplify one expression tree. Anything outside the compare group, and
    /// every leaf comparison, comes back as the same handle.
    pub fn simplify(&self, arena: &Arena, expr: &ExprPtr) -> PlanxResult<ExprPtr> {
        let Expression::Compare(compare) = expr.as_ref() else {
            return Ok(expr.clone());
        };
        match compare.compare_type() {
            CompareType::UnionAnd => self.simplify_and(arena, expr),
            CompareType::UnionOr => self.simplify_or(arena, expr),
            CompareType::UnionNot => self.simplify_not(arena, expr),
            _ => Ok(expr.clone()),
        }
    }

    fn simplify_and(&self, arena: &Arena, expr: &ExprPtr) -> PlanxResult<ExprPtr> {
        self.simplify_connective(arena, expr, CompareType::UnionAnd)
    }

    fn simplify_or(&self, arena: &Arena, expr: &ExprPtr) -> PlanxResult<ExprPtr> {
        self.simplify_connective(arena, expr, CompareType::UnionOr)
    }

    /// Shared body of AND/OR: `absorbing` short-circuits the whole connective,
    /// the identity constant is dropped, same-kind operands are spliced in.
    fn simplify_connective(
        &self,
        arena: &Arena,
        expr: &ExprPtr,
        op: CompareType,
    ) -> PlanxResult<ExprPtr> {
        let compare = expr.as_compare()?;
        // AND: false 흡수, true 항등 / OR: 반대
        let absorbing = op == CompareType::UnionOr;

        let mut operands = Vec::with_capacity(compare.children().len());
        for child in compare.children() {
            let simplified = self.simplify(arena, child)?;
            if self.is_constant(&simplified, absorbing) {
                return self.make_constant(arena, absorbing);
            }
            if self.is_constant(&simplified, !absorbing) {
                continue;
            }
            self.append_flattened(op, simplified, &mut operands);
        }

        match operands.len() {
            0 => self.make_constant(arena, !absorbing),
            1 => Ok(operands.swap_remove(0)),
            _ => make_compare_union_expression(arena, op, operands),
        }
    }

    fn simplify_not(&self, arena: &Arena, expr: &ExprPtr) -> PlanxResult<ExprPtr> {
        let compare = expr.as_compare()?;
        let inner = match compare.children() {
            [] => return self.make_true(arena),
            [inner] => inner,
            children => {
                return Err(PlanxError::MalformedExpression(format!(
                    "$not expects one operand, found {}",
                    children.len()
                )));
            }
        };

        let inner = self.simplify(arena, inner)?;
        if inner.is_true() {
            return self.make_false(arena);
        }
        if inner.is_false() {
            return self.make_true(arena);
        }
        if inner.is_compare_type(CompareType::UnionNot) {
            // already simplified, so its operand is in normal form
            if let Some(operand) = inner.as_compare()?.children().first() {
                return Ok(operand.clone());
            }
        }
        make_compare_union_expression(arena, CompareType::UnionNot, vec![inner])
    }

    /// Simplify predicates bottom-up and drop child filter stages whose
    /// predicate became constant-true. Returns the number of pruned stages.
    fn simplify_plan(&self, arena: &Arena, node: &mut Node) -> PlanxResult<usize> {
        let mut pruned = 0;

        let children = std::mem::take(node.children_mut());
        let mut kept = Vec::with_capacity(children.len());
        for mut child in children {
            pruned += self.simplify_plan(arena, &mut child)?;
            if child.predicate().is_some_and(|p| p.is_true()) {
                tracing::trace!(collection = %child.collection(), "pruning always-true filter");
                pruned += 1;
                continue;
            }
            kept.push(child);
        }
        *node.children_mut() = kept;

        if node.is_match() {
            if let Some(predicate) = node.expressions_mut().first_mut() {
                *predicate = self.simplify(arena, predicate)?;
            }
        } else if node.is_join() {
            for slot in node.expressions_mut().iter_mut() {
                *slot = self.simplify(arena, slot)?;
            }
        }

        Ok(pruned)
    }

    fn append_flattened(&self, op: CompareType, operand: ExprPtr, out: &mut Vec<ExprPtr>) {
        match operand.as_ref() {
            Expression::Compare(nested) if nested.compare_type() == op => {
                out.extend(nested.children().iter().cloned());
            }
            _ => out.push(operand),
        }
    }

    fn is_constant(&self, expr: &ExprPtr, value: bool) -> bool {
        if value { expr.is_true() } else { expr.is_false() }
    }

    fn make_constant(&self, arena: &Arena, value: bool) -> PlanxResult<ExprPtr> {
        make_constant_expression(arena, value)
    }

    pub fn make_true(&self, arena: &Arena) -> PlanxResult<ExprPtr> {
        self.make_constant(arena, true)
    }

    pub fn make_false(&self, arena: &Arena) -> PlanxResult<ExprPtr> {
        self.make_constant(arena, false)
    }
}
