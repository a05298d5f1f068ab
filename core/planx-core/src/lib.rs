//! # planx: Logical Plan Rewrite Stage
//!
//! planx는 쿼리 엔진의 논리 플랜 재작성 단계입니다. 파서와 변환기가 만든
//! 플랜 트리를 실행 전에 최적화 규칙들에 순서대로 통과시킵니다.
//!
//! ## 빠른 시작
//!
//! ```rust
//! use planx_core::{Arena, QueryPlanner};
//!
//! # fn main() -> planx_core::PlanxResult<()> {
//! let arena = Arena::new();
//! let planned = QueryPlanner::new().plan_sql(
//!     Some(&arena),
//!     "SELECT * FROM TestDatabase.TestCollection WHERE NOT (NOT (number >= 10));",
//! )?;
//! assert_eq!(
//!     planned.explain(),
//!     r#"$aggregate: {$match: {"number": {$gte: #0}}}"#
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## SQL 실행 파이프라인
//!
//! ```text
//! SQL 문자열 → Parser → AST → Transformer → Node
//!          → QueryOptimizer (ConjunctionSimplification) → 실행 엔진
//! ```
//!
//! ## 모듈 구조
//!
//! - [`arena`]: 할당 컨텍스트 ([`Arena`])
//! - [`expressions`]: 비교/논리 표현식
//! - [`logical_plan`]: 플랜 노드 ([`Node`])
//! - [`sql`]: SQL 파서, 변환기, 플래너, 최적화기
//! - [`config`]: 플래너 설정

pub mod arena;
pub mod config;
pub mod error;
pub mod expressions;
pub mod logical_plan;
pub mod sql;

// Logging utilities
pub mod logging;

// Re-export commonly used types
pub use arena::{Arena, ArenaStats};
pub use config::PlannerConfig;
pub use error::{PlanxError, PlanxResult};
pub use expressions::{CompareType, ExprPtr, Expression};
pub use logical_plan::{CollectionName, Node, NodeType};
pub use sql::{ConjunctionSimplificationRule, OptimizationRule, QueryOptimizer, QueryPlanner};
