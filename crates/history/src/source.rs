use std::future::Future;

use api_types::transaction::TransactionRecord;

/// Where transaction records come from.
///
/// Implementations return the full current set for an owner: no paging or
/// filtering is pushed to the backend, the view derives everything locally.
pub trait TransactionSource {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_transactions(
        &self,
        owner_id: i64,
    ) -> impl Future<Output = Result<Vec<TransactionRecord>, Self::Error>> + Send;
}
