use anyhow::{Context, Result};
use rusqlite::Connection;

/// Drop and recreate every table
pub fn reset_database(conn: &Connection) -> Result<()> {
    let schema_sql = include_str!("schema.sql");
    let statements = split_sql_statements(schema_sql);

    for (idx, statement) in statements.iter().enumerate() {
        execute_sql(conn, statement)
            .with_context(|| format!("Failed to execute statement {}", idx + 1))?;
    }

    log::info!("Database schema reset ({} statements)", statements.len());
    Ok(())
}

fn split_sql_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn execute_sql(conn: &Connection, sql: &str) -> Result<()> {
    conn.execute(sql, [])
        .context("Failed to execute SQL statement")
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{create_memory_pool, get_connection};

    #[test]
    fn test_reset_creates_tables_and_can_run_twice() {
        let pool = create_memory_pool().unwrap();
        let conn = get_connection(&pool).unwrap();

        reset_database(&conn).unwrap();
        reset_database(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 11);
    }

    #[test]
    fn test_split_skips_empty_statements() {
        let statements = split_sql_statements("CREATE TABLE a (x INTEGER);\n\n;  ");
        assert_eq!(statements, vec!["CREATE TABLE a (x INTEGER)"]);
    }
}
