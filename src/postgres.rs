//! `tokio-postgres` adapter: binds [`SqlValue`] parameters, converts rows
//! into [`ResultSet`]s, and implements [`SqlExecutor`] for clients,
//! transactions, and pooled connections.

use std::error::Error;
use std::sync::Arc;

use chrono::NaiveDateTime;
use deadpool_postgres::{Config as PgConfig, Object, Pool};
use serde_json::Value as JsonValue;
use tokio_postgres::types::{IsNull, ToSql, Type, to_sql_checked};
use tokio_postgres::{Client, NoTls, Row, Transaction};

use crate::error::SqlRecordError;
use crate::executor::SqlExecutor;
use crate::results::{DbRow, ResultSet};
use crate::value::SqlValue;

impl ToSql for SqlValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut bytes::BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            SqlValue::Int(i) => (*i).to_sql(ty, out),
            SqlValue::Float(f) => (*f).to_sql(ty, out),
            SqlValue::Text(s) => s.to_sql(ty, out),
            SqlValue::Bool(b) => (*b).to_sql(ty, out),
            SqlValue::Timestamp(dt) => dt.to_sql(ty, out),
            SqlValue::Json(jsval) => jsval.to_sql(ty, out),
            SqlValue::Blob(bytes) => bytes.to_sql(ty, out),
            SqlValue::Null => Ok(IsNull::Yes),
        }
    }

    fn accepts(ty: &Type) -> bool {
        // Only accept types we can properly handle
        match *ty {
            // Integer types
            Type::INT2 | Type::INT4 | Type::INT8 => true,
            // Floating point types
            Type::FLOAT4 | Type::FLOAT8 => true,
            // Text types
            Type::TEXT | Type::VARCHAR | Type::CHAR | Type::NAME => true,
            // Boolean type
            Type::BOOL => true,
            // Date/time types
            Type::TIMESTAMP | Type::TIMESTAMPTZ | Type::DATE => true,
            // JSON types
            Type::JSON | Type::JSONB => true,
            // Binary data
            Type::BYTEA => true,
            // For any other type, we don't accept
            _ => false,
        }
    }

    to_sql_checked!();
}

fn to_sql_refs(params: &[SqlValue]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

/// Extract a [`SqlValue`] from a row at the given index, based on the
/// column's Postgres type name.
///
/// # Errors
/// Returns the underlying driver error when the column cannot be read.
pub fn extract_value(row: &Row, idx: usize) -> Result<SqlValue, SqlRecordError> {
    let type_info = row.columns()[idx].type_();

    if type_info.name() == "int2" {
        let val: Option<i16> = row.try_get(idx)?;
        Ok(val.map_or(SqlValue::Null, |v| SqlValue::Int(i64::from(v))))
    } else if type_info.name() == "int4" {
        let val: Option<i32> = row.try_get(idx)?;
        Ok(val.map_or(SqlValue::Null, |v| SqlValue::Int(i64::from(v))))
    } else if type_info.name() == "int8" {
        let val: Option<i64> = row.try_get(idx)?;
        Ok(val.map_or(SqlValue::Null, SqlValue::Int))
    } else if type_info.name() == "float4" || type_info.name() == "float8" {
        let val: Option<f64> = row.try_get(idx)?;
        Ok(val.map_or(SqlValue::Null, SqlValue::Float))
    } else if type_info.name() == "bool" {
        let val: Option<bool> = row.try_get(idx)?;
        Ok(val.map_or(SqlValue::Null, SqlValue::Bool))
    } else if type_info.name() == "timestamp" || type_info.name() == "timestamptz" {
        let val: Option<NaiveDateTime> = row.try_get(idx)?;
        Ok(val.map_or(SqlValue::Null, SqlValue::Timestamp))
    } else if type_info.name() == "json" || type_info.name() == "jsonb" {
        let val: Option<JsonValue> = row.try_get(idx)?;
        Ok(val.map_or(SqlValue::Null, SqlValue::Json))
    } else if type_info.name() == "bytea" {
        let val: Option<Vec<u8>> = row.try_get(idx)?;
        Ok(val.map_or(SqlValue::Null, SqlValue::Blob))
    } else {
        // Everything else comes back as text
        let val: Option<String> = row.try_get(idx)?;
        Ok(val.map_or(SqlValue::Null, SqlValue::Text))
    }
}

fn row_column_names(row: &Row) -> Arc<Vec<String>> {
    Arc::new(
        row.columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect(),
    )
}

/// Convert one driver row into a [`DbRow`].
///
/// # Errors
/// Returns errors from value extraction.
pub fn build_row(row: &Row) -> Result<DbRow, SqlRecordError> {
    let column_names = row_column_names(row);
    let mut values = Vec::with_capacity(column_names.len());
    for idx in 0..column_names.len() {
        values.push(extract_value(row, idx)?);
    }
    Ok(DbRow::new(column_names, values))
}

/// Build a [`ResultSet`] from driver rows.
///
/// # Errors
/// Returns errors from value extraction.
pub fn build_result_set(rows: &[Row]) -> Result<ResultSet, SqlRecordError> {
    let mut result_set = ResultSet::with_capacity(rows.len());
    if let Some(row) = rows.first() {
        result_set.set_column_names(row_column_names(row));
    }

    for row in rows {
        let col_count = row.columns().len();
        let mut values = Vec::with_capacity(col_count);
        for idx in 0..col_count {
            values.push(extract_value(row, idx)?);
        }
        result_set.add_row_values(values);
    }

    Ok(result_set)
}

macro_rules! impl_sql_executor {
    ($($target:ty),* $(,)?) => {$(
        impl SqlExecutor for $target {
            #[allow(clippy::manual_async_fn)]
            fn execute_dml(
                &mut self,
                sql: &str,
                params: &[SqlValue],
            ) -> impl std::future::Future<Output = Result<u64, SqlRecordError>> {
                async move {
                    let refs = to_sql_refs(params);
                    Ok(self.execute(sql, &refs).await?)
                }
            }

            #[allow(clippy::manual_async_fn)]
            fn execute_select(
                &mut self,
                sql: &str,
                params: &[SqlValue],
            ) -> impl std::future::Future<Output = Result<ResultSet, SqlRecordError>> {
                async move {
                    let refs = to_sql_refs(params);
                    let rows = self.query(sql, &refs).await?;
                    build_result_set(&rows)
                }
            }

            #[allow(clippy::manual_async_fn)]
            fn execute_select_one(
                &mut self,
                sql: &str,
                params: &[SqlValue],
            ) -> impl std::future::Future<Output = Result<Option<DbRow>, SqlRecordError>> {
                async move {
                    let refs = to_sql_refs(params);
                    let rows = self.query(sql, &refs).await?;
                    match rows.first() {
                        Some(row) => Ok(Some(build_row(row)?)),
                        None => Ok(None),
                    }
                }
            }
        }
    )*};
}

impl_sql_executor!(Client, Transaction<'_>, Object);

/// Create a connection pool after validating the required config fields.
///
/// # Errors
/// Returns `SqlRecordError::ConfigError` if a required field is missing, or
/// `SqlRecordError::ConnectionError` if pool creation fails.
pub fn connect_pool(pg_config: PgConfig) -> Result<Pool, SqlRecordError> {
    if pg_config.dbname.is_none() {
        return Err(SqlRecordError::ConfigError("dbname is required".to_string()));
    }
    if pg_config.host.is_none() {
        return Err(SqlRecordError::ConfigError("host is required".to_string()));
    }
    if pg_config.port.is_none() {
        return Err(SqlRecordError::ConfigError("port is required".to_string()));
    }
    if pg_config.user.is_none() {
        return Err(SqlRecordError::ConfigError("user is required".to_string()));
    }
    if pg_config.password.is_none() {
        return Err(SqlRecordError::ConfigError(
            "password is required".to_string(),
        ));
    }

    pg_config
        .create_pool(Some(deadpool_postgres::Runtime::Tokio1), NoTls)
        .map_err(|e| {
            SqlRecordError::ConnectionError(format!("Failed to create Postgres pool: {e}"))
        })
}
