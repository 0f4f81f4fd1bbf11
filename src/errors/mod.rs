use anyhow::Context as _;

/// Add context to query errors
pub fn query_context(what: &str) -> String {
    format!("Failed to query {}", what)
}

/// Add context to insert errors
pub fn insert_context(what: &str) -> String {
    format!("Failed to insert {}", what)
}

/// Add context to parse errors
pub fn parse_context(data_type: &str) -> String {
    format!("Failed to parse {}", data_type)
}

/// Add context to cache errors
pub fn cache_context(operation: &str, key: &str) -> String {
    format!("Failed to {} cache for key: {}", operation, key)
}

/// Wrap result with parse context
pub fn with_parse_context<T, E>(result: Result<T, E>, data_type: &str) -> anyhow::Result<T>
where
    E: std::error::Error + Send + Sync + 'static,
{
    result.context(parse_context(data_type))
}

/// Turn a domain parse failure inside a row mapper into a rusqlite error
pub fn column_error(idx: usize, err: anyhow::Error) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, err.into())
}
