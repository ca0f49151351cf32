//! SQL for the mutation queue, one module per concern.

pub mod aggregation;
pub mod mutation_crud;
pub mod mutation_query;
pub mod retry_ops;
pub(crate) mod row_codec;
