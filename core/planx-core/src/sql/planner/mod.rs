//! SQL 플래너 모듈
//!
//! 변환기가 만든 논리 플랜을 옵티마이저에 한 번 통과시킵니다.

mod transformer;
pub mod types;

pub use transformer::{SqlTransformer, TransformResult};
pub use types::*;

use crate::arena::Arena;
use crate::config::PlannerConfig;
use crate::error::PlanxResult;
use crate::logical_plan::Node;
use crate::sql::optimizer::QueryOptimizer;
use crate::sql::parser::SqlParser;

/// 쿼리 플래너: 쿼리 플랜당 옵티마이저를 한 번 호출
pub struct QueryPlanner {
    optimizer: QueryOptimizer,
    config: PlannerConfig,
}

impl QueryPlanner {
    pub fn new() -> Self {
        Self::with_config(PlannerConfig::default())
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        Self {
            optimizer: QueryOptimizer::new().with_trace_rules(config.trace_rules),
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// 변환기 출력 → 최적화된 플랜
    pub fn create_plan(
        &self,
        arena: Option<&Arena>,
        node: Option<Node>,
    ) -> PlanxResult<Option<Node>> {
        if !self.config.optimizer_enabled {
            tracing::debug!("optimizer disabled, plan passed through");
            return Ok(node);
        }
        self.optimizer.optimize(arena, node)
    }

    /// SQL 문자열 → 파싱 → 변환 → 최적화
    pub fn plan_sql(&self, arena: Option<&Arena>, sql: &str) -> PlanxResult<PlannedQuery> {
        let arena = Arena::resolve(arena);
        let statement = SqlParser::new().parse_one(sql)?;
        let TransformResult { node, parameters } =
            SqlTransformer::new(arena).transform(&statement)?;
        let node = self.create_plan(Some(arena), Some(node))?;
        Ok(PlannedQuery { node, parameters })
    }
}

impl Default for QueryPlanner {
    fn default() -> Self {
        Self::new()
    }
}
