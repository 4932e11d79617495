pub mod query_executor;

pub use query_executor::QueryExecutor;
#[cfg(test)]
pub use query_executor::MockQueryExecutor;
