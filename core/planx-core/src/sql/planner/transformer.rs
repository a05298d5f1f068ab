//! SQL AST → 논리 플랜 변환기
//!
//! `SELECT * FROM db.collection [JOIN ...] [WHERE ...] [ORDER BY ...] [LIMIT n]`
//! 형태만 지원합니다. 리터럴은 파라미터 테이블로 옮겨지고 플랜에는 `#n`으로
//! 남습니다.

use crate::arena::Arena;
use crate::error::{PlanxError, PlanxResult};
use crate::expressions::{
    CompareType, CompareValue, ExprPtr, Key, SortOrder, make_compare_expression,
    make_compare_union_expression, make_constant_expression, make_sort_expression,
};
use crate::logical_plan::{CollectionName, JoinType, Node};
use crate::sql::planner::types::{Parameters, ScalarValue};
use sqlparser::ast::{
    BinaryOperator as SqlBinaryOp, Expr as SqlExpr, GroupByExpr, JoinConstraint, JoinOperator,
    ObjectName, Query, Select, SelectItem, SetExpr, Statement, TableFactor, UnaryOperator, Value,
};

/// SQL 비교 연산자 → CompareType 변환
pub fn convert_compare_op(op: &SqlBinaryOp) -> Option<CompareType> {
    match op {
        SqlBinaryOp::Eq => Some(CompareType::Eq),
        SqlBinaryOp::NotEq => Some(CompareType::Ne),
        SqlBinaryOp::Lt => Some(CompareType::Lt),
        SqlBinaryOp::LtEq => Some(CompareType::Lte),
        SqlBinaryOp::Gt => Some(CompareType::Gt),
        SqlBinaryOp::GtEq => Some(CompareType::Gte),
        _ => None,
    }
}

/// SQL 리터럴 → ScalarValue 변환
pub fn convert_value(value: &Value) -> PlanxResult<ScalarValue> {
    match value {
        Value::Number(n, _) => {
            if let Ok(i) = n.parse::<i64>() {
                Ok(ScalarValue::Int64(i))
            } else if let Ok(f) = n.parse::<f64>() {
                Ok(ScalarValue::Float64(f))
            } else {
                Err(PlanxError::SqlNotSupported {
                    feature: format!("numeric literal {n}"),
                    hint: "Use a 64-bit integer or float".to_string(),
                })
            }
        }
        Value::SingleQuotedString(s) => Ok(ScalarValue::Utf8(s.clone())),
        Value::Boolean(b) => Ok(ScalarValue::Boolean(*b)),
        Value::Null => Ok(ScalarValue::Null),
        other => Err(PlanxError::SqlNotSupported {
            feature: format!("literal {other}"),
            hint: "Use numbers, single-quoted strings, booleans or NULL".to_string(),
        }),
    }
}

/// `[database.]collection` → CollectionName
fn collection_name(name: &ObjectName) -> PlanxResult<CollectionName> {
    match name.0.as_slice() {
        [collection] => Ok(CollectionName::new("", collection.value.clone())),
        [database, collection] => Ok(CollectionName::new(
            database.value.clone(),
            collection.value.clone(),
        )),
        _ => Err(PlanxError::SqlNotSupported {
            feature: format!("table name {name}"),
            hint: "Use collection or database.collection".to_string(),
        }),
    }
}

fn table_collection(relation: &TableFactor) -> PlanxResult<CollectionName> {
    match relation {
        TableFactor::Table { name, .. } => collection_name(name),
        _ => Err(PlanxError::SqlNotSupported {
            feature: "Complex table expressions".to_string(),
            hint: "Use simple table names only".to_string(),
        }),
    }
}

fn not_supported(feature: &str, hint: &str) -> PlanxError {
    PlanxError::SqlNotSupported {
        feature: feature.to_string(),
        hint: hint.to_string(),
    }
}

/// 플랜에 표현되지 않는 절은 조용히 버리지 않고 거부
fn reject_unsupported_clauses(select: &Select) -> PlanxResult<()> {
    if !matches!(select.projection.as_slice(), [SelectItem::Wildcard(_)]) {
        return Err(not_supported("projection list", "Use SELECT *"));
    }
    if select.distinct.is_some() {
        return Err(not_supported("DISTINCT", "Remove DISTINCT"));
    }
    let grouped = match &select.group_by {
        GroupByExpr::All(_) => true,
        GroupByExpr::Expressions(exprs, _) => !exprs.is_empty(),
    };
    if grouped {
        return Err(not_supported("GROUP BY", "Aggregation is not planned"));
    }
    if select.having.is_some() {
        return Err(not_supported("HAVING", "Aggregation is not planned"));
    }
    Ok(())
}

/// Operand of a leaf comparison.
enum Operand {
    Key(Key),
    Value(ScalarValue),
}

/// 변환 결과: 플랜 루트와 파라미터 테이블
#[derive(Debug)]
pub struct TransformResult {
    pub node: Node,
    pub parameters: Parameters,
}

/// SQL Statement → 논리 플랜 변환기
pub struct SqlTransformer<'a> {
    arena: &'a Arena,
}

impl<'a> SqlTransformer<'a> {
    pub fn new(arena: &'a Arena) -> Self {
        Self { arena }
    }

    /// SQL Statement → Node 변환
    pub fn transform(&self, statement: &Statement) -> PlanxResult<TransformResult> {
        let mut parameters = Parameters::new();
        let node = match statement {
            Statement::Query(query) => self.transform_query(query, &mut parameters)?,
            _ => {
                return Err(PlanxError::SqlNotSupported {
                    feature: "Non-query statements".to_string(),
                    hint: "Only SELECT queries are planned".to_string(),
                });
            }
        };
        Ok(TransformResult { node, parameters })
    }

    fn transform_query(&self, query: &Query, parameters: &mut Parameters) -> PlanxResult<Node> {
        let select = match query.body.as_ref() {
            SetExpr::Select(select) => select,
            _ => {
                return Err(PlanxError::SqlNotSupported {
                    feature: "Non-SELECT queries".to_string(),
                    hint: "Only SELECT queries are currently supported".to_string(),
                });
            }
        };
        if query.offset.is_some() {
            return Err(not_supported("OFFSET", "Only LIMIT n is planned"));
        }
        let mut plan = self.transform_select(select, parameters)?;

        // ORDER BY (lives on Query, not Select in sqlparser 0.52)
        if let Some(ref order_by) = query.order_by {
            let keys = order_by
                .exprs
                .iter()
                .map(|ob| {
                    let order = if ob.asc == Some(false) {
                        SortOrder::Desc
                    } else {
                        SortOrder::Asc
                    };
                    make_sort_expression(self.arena, self.key(&ob.expr)?, order)
                })
                .collect::<PlanxResult<Vec<_>>>()?;
            if !keys.is_empty() {
                let collection = plan.collection().clone();
                plan.append_child(Node::sort(collection, keys));
            }
        }

        if let Some(ref limit) = query.limit {
            let count = match limit {
                SqlExpr::Value(Value::Number(n, _)) => n.parse::<usize>().ok(),
                _ => None,
            };
            let Some(count) = count else {
                return Err(PlanxError::SqlNotSupported {
                    feature: format!("LIMIT {limit}"),
                    hint: "LIMIT must be a non-negative integer literal".to_string(),
                });
            };
            let collection = plan.collection().clone();
            plan.append_child(Node::limit(collection, count));
        }

        Ok(plan)
    }

    fn transform_select(&self, select: &Select, parameters: &mut Parameters) -> PlanxResult<Node> {
        if select.from.len() != 1 {
            return Err(PlanxError::SqlNotSupported {
                feature: "FROM clause without exactly one table".to_string(),
                hint: "Use JOIN syntax or separate queries".to_string(),
            });
        }
        reject_unsupported_clauses(select)?;
        let from = &select.from[0];
        let collection = table_collection(&from.relation)?;
        let mut plan = Node::aggregate(collection.clone());

        // 1. JOIN → left-deep join 트리
        if !from.joins.is_empty() {
            let mut left = Node::aggregate(collection.clone());
            for join in &from.joins {
                let right = Node::aggregate(table_collection(&join.relation)?);
                let (join_type, constraint) = match &join.join_operator {
                    JoinOperator::Inner(c) => (JoinType::Inner, Some(c)),
                    JoinOperator::LeftOuter(c) => (JoinType::Left, Some(c)),
                    JoinOperator::RightOuter(c) => (JoinType::Right, Some(c)),
                    JoinOperator::FullOuter(c) => (JoinType::Full, Some(c)),
                    JoinOperator::CrossJoin => (JoinType::Cross, None),
                    other => {
                        return Err(PlanxError::SqlNotSupported {
                            feature: format!("JOIN type: {:?}", other),
                            hint: "Supported: INNER, LEFT, RIGHT, FULL, CROSS JOIN".to_string(),
                        });
                    }
                };
                let mut node = Node::join(collection.clone(), join_type)
                    .with_child(left)
                    .with_child(right);
                match constraint {
                    Some(JoinConstraint::On(expr)) => {
                        node.append_expression(self.transform_predicate(expr, parameters)?);
                    }
                    Some(JoinConstraint::None) | None => {
                        node.append_expression(make_constant_expression(self.arena, true)?);
                    }
                    Some(_) => {
                        return Err(PlanxError::SqlNotSupported {
                            feature: "JOIN USING / NATURAL JOIN".to_string(),
                            hint: "Use explicit ON clause instead".to_string(),
                        });
                    }
                }
                left = node;
            }
            plan.append_child(left);
        }

        // 2. WHERE 절 → Match
        if let Some(ref selection) = select.selection {
            let predicate = self.transform_predicate(selection, parameters)?;
            plan.append_child(Node::matching(collection, predicate));
        }

        Ok(plan)
    }

    /// SQL Expr → 비교 표현식
    fn transform_predicate(
        &self,
        expr: &SqlExpr,
        parameters: &mut Parameters,
    ) -> PlanxResult<ExprPtr> {
        match expr {
            SqlExpr::Nested(inner) => self.transform_predicate(inner, parameters),
            SqlExpr::UnaryOp {
                op: UnaryOperator::Not,
                expr: inner,
            } => {
                let operand = self.transform_predicate(inner, parameters)?;
                make_compare_union_expression(self.arena, CompareType::UnionNot, vec![operand])
            }
            SqlExpr::Value(Value::Boolean(b)) => make_constant_expression(self.arena, *b),
            SqlExpr::BinaryOp { left, op, right } => {
                let union = match op {
                    SqlBinaryOp::And => Some(CompareType::UnionAnd),
                    SqlBinaryOp::Or => Some(CompareType::UnionOr),
                    _ => None,
                };
                if let Some(union) = union {
                    let left = self.transform_predicate(left, parameters)?;
                    let right = self.transform_predicate(right, parameters)?;
                    return make_compare_union_expression(self.arena, union, vec![left, right]);
                }
                let Some(compare_type) = convert_compare_op(op) else {
                    return Err(PlanxError::SqlNotSupported {
                        feature: format!("operator {op}"),
                        hint: "Use =, <>, <, <=, >, >=, AND, OR, NOT".to_string(),
                    });
                };
                self.transform_comparison(compare_type, left, right, parameters)
            }
            _ => Err(PlanxError::SqlNotSupported {
                feature: format!("predicate {expr}"),
                hint: "Use comparisons combined with AND, OR, NOT".to_string(),
            }),
        }
    }

    fn transform_comparison(
        &self,
        compare_type: CompareType,
        left: &SqlExpr,
        right: &SqlExpr,
        parameters: &mut Parameters,
    ) -> PlanxResult<ExprPtr> {
        let (compare_type, key, rhs) = match (self.operand(left)?, self.operand(right)?) {
            (Operand::Key(key), Operand::Value(value)) => {
                (compare_type, key, self.parameter(value, parameters)?)
            }
            (Operand::Value(value), Operand::Key(key)) => (
                compare_type.mirrored(),
                key,
                self.parameter(value, parameters)?,
            ),
            (Operand::Key(key), Operand::Key(other)) => {
                (compare_type, key, CompareValue::Key(other))
            }
            (Operand::Value(_), Operand::Value(_)) => {
                return Err(PlanxError::SqlNotSupported {
                    feature: "comparison between two literals".to_string(),
                    hint: "Reference at least one field".to_string(),
                });
            }
        };
        make_compare_expression(self.arena, compare_type, key, rhs)
    }

    fn operand(&self, expr: &SqlExpr) -> PlanxResult<Operand> {
        match expr {
            SqlExpr::Nested(inner) => self.operand(inner),
            SqlExpr::Value(value) => Ok(Operand::Value(convert_value(value)?)),
            _ => Ok(Operand::Key(self.key(expr)?)),
        }
    }

    fn key(&self, expr: &SqlExpr) -> PlanxResult<Key> {
        match expr {
            SqlExpr::Identifier(ident) => Ok(Key::new(ident.value.clone())),
            // table.column → just use the column name
            SqlExpr::CompoundIdentifier(idents) => match idents.last() {
                Some(ident) => Ok(Key::new(ident.value.clone())),
                None => Err(PlanxError::SqlNotSupported {
                    feature: "empty identifier".to_string(),
                    hint: "Reference a field by name".to_string(),
                }),
            },
            _ => Err(PlanxError::SqlNotSupported {
                feature: format!("operand {expr}"),
                hint: "Compare a field with a literal or another field".to_string(),
            }),
        }
    }

    fn parameter(
        &self,
        value: ScalarValue,
        parameters: &mut Parameters,
    ) -> PlanxResult<CompareValue> {
        match parameters.add(value) {
            Some(id) => Ok(CompareValue::Parameter(id)),
            None => Err(PlanxError::SqlNotSupported {
                feature: "more than 65536 parameters".to_string(),
                hint: "Split the query".to_string(),
            }),
        }
    }
}
