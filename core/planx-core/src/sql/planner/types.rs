//! SQL 플래너 타입 정의
//!
//! 파라미터 테이블과 플래닝 결과 타입들을 정의합니다.

use std::fmt;

use crate::expressions::ParameterId;
use crate::logical_plan::Node;

/// 리터럴 값: 파라미터 테이블에 저장됨
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Null,
    Boolean(bool),
    Int64(i64),
    Float64(f64),
    Utf8(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Null => f.write_str("null"),
            ScalarValue::Boolean(b) => write!(f, "{b}"),
            ScalarValue::Int64(i) => write!(f, "{i}"),
            ScalarValue::Float64(v) => write!(f, "{v}"),
            ScalarValue::Utf8(s) => write!(f, "'{s}'"),
        }
    }
}

/// Literal values referenced by `#n` in a plan, in order of appearance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Parameters {
    values: Vec<ScalarValue>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` and return the id the plan should reference.
    pub fn add(&mut self, value: ScalarValue) -> Option<ParameterId> {
        let id = u16::try_from(self.values.len()).ok()?;
        self.values.push(value);
        Some(ParameterId(id))
    }

    pub fn get(&self, id: ParameterId) -> Option<&ScalarValue> {
        self.values.get(usize::from(id.0))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Output of the SQL front-end: plan root plus its parameter table.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedQuery {
    pub node: Option<Node>,
    pub parameters: Parameters,
}

impl PlannedQuery {
    /// Plan dump, or an empty string for an empty plan.
    pub fn explain(&self) -> String {
        self.node.as_ref().map(Node::to_string).unwrap_or_default()
    }
}
