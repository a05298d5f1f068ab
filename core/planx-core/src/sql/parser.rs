use crate::error::{PlanxError, PlanxResult};
use sqlparser::ast::Statement;
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;

/// SQL 파서: sqlparser-rs
pub struct SqlParser {
    dialect: GenericDialect,
}

impl SqlParser {
    /// 새 SQL 파서 생성
    pub fn new() -> Self {
        Self {
            dialect: GenericDialect {},
        }
    }

    /// SQL 문자열을 AST로 파싱
    pub fn parse(&self, sql: &str) -> PlanxResult<Vec<Statement>> {
        Parser::parse_sql(&self.dialect, sql).map_err(|e| PlanxError::SqlParse {
            message: e.to_string(),
            sql: sql.to_string(),
        })
    }

    /// Parse exactly one statement.
    pub fn parse_one(&self, sql: &str) -> PlanxResult<Statement> {
        let mut statements = self.parse(sql)?;
        if statements.len() != 1 {
            return Err(PlanxError::SqlParse {
                message: format!("expected one statement, found {}", statements.len()),
                sql: sql.to_string(),
            });
        }
        Ok(statements.remove(0))
    }
}

impl Default for SqlParser {
    fn default() -> Self {
        Self::new()
    }
}
