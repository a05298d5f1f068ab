//! 표현식 데이터 모델
//!
//! 재작성 규칙이 들여다보는 것은 [`ExpressionGroup::Compare`] 그룹뿐이며,
//! 나머지 그룹은 불투명한 리프로 취급합니다. 표현식은 [`ExprPtr`]로 공유되고
//! 모든 새 노드는 [`Arena`]에서 할당됩니다.

use std::fmt;
use std::sync::Arc;

use crate::arena::Arena;
use crate::error::{PlanxError, PlanxResult};

/// Shared handle to an arena-allocated expression.
pub type ExprPtr = Arc<Expression>;

/// 표현식 그룹 (판별자)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionGroup {
    Compare,
    Scalar,
    Sort,
}

impl ExpressionGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpressionGroup::Compare => "compare",
            ExpressionGroup::Scalar => "scalar",
            ExpressionGroup::Sort => "sort",
        }
    }
}

impl fmt::Display for ExpressionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 필드 이름
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key(String);

impl Key {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0)
    }
}

/// Index into the query's parameter table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParameterId(pub u16);

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 비교/논리 연산 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareType {
    // 리프 비교
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Regex,
    // 상수
    AllTrue,
    AllFalse,
    // 논리 연결자
    UnionAnd,
    UnionOr,
    UnionNot,
}

impl CompareType {
    /// Operator as rendered in plan dumps.
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareType::Eq => "$eq",
            CompareType::Ne => "$ne",
            CompareType::Lt => "$lt",
            CompareType::Lte => "$lte",
            CompareType::Gt => "$gt",
            CompareType::Gte => "$gte",
            CompareType::Regex => "$regex",
            CompareType::AllTrue => "$all_true",
            CompareType::AllFalse => "$all_false",
            CompareType::UnionAnd => "$and",
            CompareType::UnionOr => "$or",
            CompareType::UnionNot => "$not",
        }
    }

    pub fn is_union(&self) -> bool {
        matches!(
            self,
            CompareType::UnionAnd | CompareType::UnionOr | CompareType::UnionNot
        )
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, CompareType::AllTrue | CompareType::AllFalse)
    }

    /// Operator to use when the operands of a leaf comparison are swapped
    /// (`10 < x` becomes `x > 10`).
    pub fn mirrored(&self) -> Self {
        match self {
            CompareType::Lt => CompareType::Gt,
            CompareType::Lte => CompareType::Gte,
            CompareType::Gt => CompareType::Lt,
            CompareType::Gte => CompareType::Lte,
            other => *other,
        }
    }
}

/// Right-hand side of a leaf comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CompareValue {
    Parameter(ParameterId),
    Key(Key),
}

impl fmt::Display for CompareValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareValue::Parameter(id) => write!(f, "{id}"),
            CompareValue::Key(key) => write!(f, "{key}"),
        }
    }
}

/// 비교 표현식: 리프 비교, 상수, AND/OR/NOT 연결자
#[derive(Debug, Clone, PartialEq)]
pub struct CompareExpression {
    compare_type: CompareType,
    key: Option<Key>,
    rhs: Option<CompareValue>,
    children: Vec<ExprPtr>,
}

impl CompareExpression {
    /// Leaf comparison `key <op> rhs`.
    pub fn leaf(compare_type: CompareType, key: Key, rhs: CompareValue) -> Self {
        Self {
            compare_type,
            key: Some(key),
            rhs: Some(rhs),
            children: Vec::new(),
        }
    }

    /// Constant-true or constant-false.
    pub fn constant(value: bool) -> Self {
        Self {
            compare_type: if value {
                CompareType::AllTrue
            } else {
                CompareType::AllFalse
            },
            key: None,
            rhs: None,
            children: Vec::new(),
        }
    }

    /// Connective over `children`. No shape checks: malformed input is
    /// representable on purpose so the rewrite rules can reject it.
    pub fn union(compare_type: CompareType, children: Vec<ExprPtr>) -> Self {
        Self {
            compare_type,
            key: None,
            rhs: None,
            children,
        }
    }

    pub fn compare_type(&self) -> CompareType {
        self.compare_type
    }

    pub fn key(&self) -> Option<&Key> {
        self.key.as_ref()
    }

    pub fn rhs(&self) -> Option<&CompareValue> {
        self.rhs.as_ref()
    }

    pub fn children(&self) -> &[ExprPtr] {
        &self.children
    }

    pub fn is_true(&self) -> bool {
        self.compare_type == CompareType::AllTrue
    }

    pub fn is_false(&self) -> bool {
        self.compare_type == CompareType::AllFalse
    }
}

impl fmt::Display for CompareExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.compare_type.as_str();
        if self.compare_type.is_constant() {
            return f.write_str(op);
        }
        if self.compare_type.is_union() {
            write!(f, "{op}: [")?;
            for (i, child) in self.children.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{child}")?;
            }
            return f.write_str("]");
        }
        match &self.key {
            Some(key) => write!(f, "{key}: {{")?,
            None => f.write_str("\"\": {")?,
        }
        match &self.rhs {
            Some(rhs) => write!(f, "{op}: {rhs}}}"),
            None => write!(f, "{op}: null}}"),
        }
    }
}

/// Projected field; opaque to the rewrite rules.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarExpression {
    pub key: Key,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// ORDER BY 항목; opaque to the rewrite rules.
#[derive(Debug, Clone, PartialEq)]
pub struct SortExpression {
    pub key: Key,
    pub order: SortOrder,
}

/// 표현식: 그룹별 닫힌 합 타입
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Compare(CompareExpression),
    Scalar(ScalarExpression),
    Sort(SortExpression),
}

impl Expression {
    pub fn group(&self) -> ExpressionGroup {
        match self {
            Expression::Compare(_) => ExpressionGroup::Compare,
            Expression::Scalar(_) => ExpressionGroup::Scalar,
            Expression::Sort(_) => ExpressionGroup::Sort,
        }
    }

    /// Checked downcast to the compare group.
    pub fn as_compare(&self) -> PlanxResult<&CompareExpression> {
        match self {
            Expression::Compare(compare) => Ok(compare),
            other => Err(PlanxError::ExpressionGroupMismatch {
                expected: ExpressionGroup::Compare,
                actual: other.group(),
            }),
        }
    }

    /// `true` when this is a compare expression of the given type.
    pub fn is_compare_type(&self, compare_type: CompareType) -> bool {
        matches!(self, Expression::Compare(c) if c.compare_type == compare_type)
    }

    pub fn is_true(&self) -> bool {
        self.is_compare_type(CompareType::AllTrue)
    }

    pub fn is_false(&self) -> bool {
        self.is_compare_type(CompareType::AllFalse)
    }

    /// Bytes charged against an arena for this node (operand handles included).
    pub(crate) fn footprint(&self) -> usize {
        let extra = match self {
            Expression::Compare(c) => {
                c.children.len() * std::mem::size_of::<ExprPtr>()
                    + c.key.as_ref().map_or(0, |k| k.0.len())
            }
            Expression::Scalar(s) => s.key.0.len(),
            Expression::Sort(s) => s.key.0.len(),
        };
        std::mem::size_of::<Expression>() + extra
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Compare(c) => write!(f, "{c}"),
            Expression::Scalar(s) => write!(f, "{}", s.key),
            Expression::Sort(s) => {
                let order = match s.order {
                    SortOrder::Asc => 1,
                    SortOrder::Desc => -1,
                };
                write!(f, "{}: {order}", s.key)
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════
// Arena constructors
// ═══════════════════════════════════════════════════════════════

/// Allocate a leaf comparison. Connectives and constants have their own
/// constructors.
pub fn make_compare_expression(
    arena: &Arena,
    compare_type: CompareType,
    key: Key,
    rhs: CompareValue,
) -> PlanxResult<ExprPtr> {
    if compare_type.is_union() || compare_type.is_constant() {
        return Err(PlanxError::MalformedExpression(format!(
            "{} is not a leaf comparison",
            compare_type.as_str()
        )));
    }
    arena.alloc(Expression::Compare(CompareExpression::leaf(
        compare_type,
        key,
        rhs,
    )))
}

/// Allocate an AND/OR/NOT connective over `children`.
pub fn make_compare_union_expression(
    arena: &Arena,
    compare_type: CompareType,
    children: Vec<ExprPtr>,
) -> PlanxResult<ExprPtr> {
    if !compare_type.is_union() {
        return Err(PlanxError::MalformedExpression(format!(
            "{} is not a connective",
            compare_type.as_str()
        )));
    }
    arena.alloc(Expression::Compare(CompareExpression::union(
        compare_type,
        children,
    )))
}

pub fn make_constant_expression(arena: &Arena, value: bool) -> PlanxResult<ExprPtr> {
    arena.alloc(Expression::Compare(CompareExpression::constant(value)))
}

pub fn make_scalar_expression(arena: &Arena, key: Key) -> PlanxResult<ExprPtr> {
    arena.alloc(Expression::Scalar(ScalarExpression { key }))
}

pub fn make_sort_expression(arena: &Arena, key: Key, order: SortOrder) -> PlanxResult<ExprPtr> {
    arena.alloc(Expression::Sort(SortExpression { key, order }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gte(arena: &Arena, key: &str, param: u16) -> ExprPtr {
        make_compare_expression(
            arena,
            CompareType::Gte,
            Key::from(key),
            CompareValue::Parameter(ParameterId(param)),
        )
        .unwrap()
    }

    #[test]
    fn test_leaf_display() {
        let arena = Arena::new();
        assert_eq!(gte(&arena, "number", 0).to_string(), r#""number": {$gte: #0}"#);
    }

    #[test]
    fn test_key_to_key_display() {
        let arena = Arena::new();
        let expr = make_compare_expression(
            &arena,
            CompareType::Eq,
            Key::from("id"),
            CompareValue::Key(Key::from("user_id")),
        )
        .unwrap();
        assert_eq!(expr.to_string(), r#""id": {$eq: "user_id"}"#);
    }

    #[test]
    fn test_union_display() {
        let arena = Arena::new();
        let not = make_compare_union_expression(
            &arena,
            CompareType::UnionNot,
            vec![gte(&arena, "number", 0)],
        )
        .unwrap();
        let and = make_compare_union_expression(
            &arena,
            CompareType::UnionAnd,
            vec![not, gte(&arena, "count", 1)],
        )
        .unwrap();
        assert_eq!(
            and.to_string(),
            r#"$and: [$not: ["number": {$gte: #0}], "count": {$gte: #1}]"#
        );
    }

    #[test]
    fn test_constant_display() {
        let arena = Arena::new();
        assert_eq!(
            make_constant_expression(&arena, true).unwrap().to_string(),
            "$all_true"
        );
        assert_eq!(
            make_constant_expression(&arena, false).unwrap().to_string(),
            "$all_false"
        );
    }

    #[test]
    fn test_as_compare_checks_group() {
        let arena = Arena::new();
        let scalar = make_scalar_expression(&arena, Key::from("name")).unwrap();
        match scalar.as_compare() {
            Err(PlanxError::ExpressionGroupMismatch { expected, actual }) => {
                assert_eq!(expected, ExpressionGroup::Compare);
                assert_eq!(actual, ExpressionGroup::Scalar);
            }
            other => panic!("Expected group mismatch, got: {:?}", other),
        }
        assert!(gte(&arena, "number", 0).as_compare().is_ok());
    }

    #[test]
    fn test_constructors_reject_wrong_kind() {
        let arena = Arena::new();
        assert!(make_compare_union_expression(&arena, CompareType::Eq, vec![]).is_err());
        assert!(
            make_compare_expression(
                &arena,
                CompareType::UnionAnd,
                Key::from("x"),
                CompareValue::Parameter(ParameterId(0)),
            )
            .is_err()
        );
    }

    #[test]
    fn test_mirrored() {
        assert_eq!(CompareType::Lt.mirrored(), CompareType::Gt);
        assert_eq!(CompareType::Gte.mirrored(), CompareType::Lte);
        assert_eq!(CompareType::Eq.mirrored(), CompareType::Eq);
    }
}
