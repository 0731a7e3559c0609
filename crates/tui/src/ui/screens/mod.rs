pub mod entry;
pub mod transactions;
