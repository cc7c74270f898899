/// DDL for one table, kept as compile-time strings.
///
/// Implementors assemble their statements with `const_format::concatcp!`
/// over the table name constants; [`prepare`](crate::prepare) runs them.
pub trait Schema {
    /// Table name.
    fn name() -> &'static str;
    /// Idempotent `CREATE TABLE` statement.
    fn creates() -> &'static str;
    /// Idempotent `CREATE INDEX` statements, run after the table exists.
    fn indices() -> &'static str;
}
