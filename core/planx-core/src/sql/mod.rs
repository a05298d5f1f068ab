// SQL 모듈 진입점
pub mod optimizer;
pub mod parser;
pub mod planner;

pub use optimizer::{ConjunctionSimplificationRule, OptimizationRule, QueryOptimizer};
pub use parser::SqlParser;
pub use planner::{
    Parameters, PlannedQuery, QueryPlanner, ScalarValue, SqlTransformer, TransformResult,
};
