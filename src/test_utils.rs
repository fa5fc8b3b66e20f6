//! Scripted executor for exercising CRUD flows without a database.
//!
//! Tests queue canned responses in call order and assert afterwards on the
//! recorded statements and parameters.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::error::SqlRecordError;
use crate::executor::SqlExecutor;
use crate::results::{DbRow, ResultSet};
use crate::value::SqlValue;

/// One canned executor response.
#[derive(Debug, Clone)]
pub enum ScriptedResponse {
    /// Answer an `execute_dml` call with a rows-affected count.
    Affected(u64),
    /// Answer an `execute_select` call with a result set.
    Rows(ResultSet),
    /// Answer an `execute_select_one` call with an optional row.
    Row(Option<DbRow>),
    /// Fail the call with an execution error.
    Fail(String),
}

/// A statement the executor received, as issued.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub sql: String,
    pub params: Vec<SqlValue>,
}

/// [`SqlExecutor`] that replays a scripted response per call and records
/// every statement it is handed.
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    script: VecDeque<ScriptedResponse>,
    pub calls: Vec<RecordedCall>,
}

impl ScriptedExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next response.
    #[must_use]
    pub fn respond(mut self, response: ScriptedResponse) -> Self {
        self.script.push_back(response);
        self
    }

    /// Build a single row for `ScriptedResponse::Row`.
    #[must_use]
    pub fn row(columns: &[&str], values: Vec<SqlValue>) -> DbRow {
        let names = Arc::new(columns.iter().map(|c| (*c).to_string()).collect::<Vec<_>>());
        DbRow::new(names, values)
    }

    /// Build a result set for `ScriptedResponse::Rows`.
    #[must_use]
    pub fn rows(columns: &[&str], rows: Vec<Vec<SqlValue>>) -> ResultSet {
        let names = Arc::new(columns.iter().map(|c| (*c).to_string()).collect::<Vec<_>>());
        let mut result_set = ResultSet::with_capacity(rows.len());
        result_set.set_column_names(names);
        for values in rows {
            result_set.add_row_values(values);
        }
        result_set
    }

    fn next(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> Result<ScriptedResponse, SqlRecordError> {
        self.calls.push(RecordedCall {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        self.script.pop_front().ok_or_else(|| {
            SqlRecordError::Execution(format!("scripted executor has no response for: {sql}"))
        })
    }
}

impl SqlExecutor for ScriptedExecutor {
    #[allow(clippy::manual_async_fn)]
    fn execute_dml(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl std::future::Future<Output = Result<u64, SqlRecordError>> {
        async move {
            match self.next(sql, params)? {
                ScriptedResponse::Affected(n) => Ok(n),
                ScriptedResponse::Fail(msg) => Err(SqlRecordError::Execution(msg)),
                other => Err(SqlRecordError::Execution(format!(
                    "scripted response {other:?} does not answer a DML call"
                ))),
            }
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn execute_select(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl std::future::Future<Output = Result<ResultSet, SqlRecordError>> {
        async move {
            match self.next(sql, params)? {
                ScriptedResponse::Rows(rows) => Ok(rows),
                ScriptedResponse::Fail(msg) => Err(SqlRecordError::Execution(msg)),
                other => Err(SqlRecordError::Execution(format!(
                    "scripted response {other:?} does not answer a select call"
                ))),
            }
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn execute_select_one(
        &mut self,
        sql: &str,
        params: &[SqlValue],
    ) -> impl std::future::Future<Output = Result<Option<DbRow>, SqlRecordError>> {
        async move {
            match self.next(sql, params)? {
                ScriptedResponse::Row(row) => Ok(row),
                ScriptedResponse::Fail(msg) => Err(SqlRecordError::Execution(msg)),
                other => Err(SqlRecordError::Execution(format!(
                    "scripted response {other:?} does not answer a single-row call"
                ))),
            }
        }
    }
}
