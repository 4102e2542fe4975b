//! Parallel fan-out over independent source branches.

use std::future::Future;

use futures::future::join_all;
use tracing::warn;

use crate::error::Result;

/// Run labelled branches concurrently and flatten their record lists.
///
/// A failed branch logs a warning and contributes zero records; it never
/// poisons its siblings.
pub async fn collect_named<T, F>(branches: Vec<(&'static str, F)>) -> Vec<T>
where
    F: Future<Output = Result<Vec<T>>>,
{
    let (labels, futures): (Vec<_>, Vec<_>) = branches.into_iter().unzip();
    let outcomes = join_all(futures).await;

    let mut records = Vec::new();
    for (label, outcome) in labels.into_iter().zip(outcomes) {
        match outcome {
            Ok(mut branch_records) => records.append(&mut branch_records),
            Err(err) => warn!(source = label, error = %err, "source branch failed"),
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;

    async fn ok_branch(values: Vec<u32>) -> Result<Vec<u32>> {
        Ok(values)
    }

    async fn failing_branch() -> Result<Vec<u32>> {
        Err(SourceError::Status { code: 503 })
    }

    #[tokio::test]
    async fn flattens_successful_branches() {
        let records = collect_named(vec![
            ("a", ok_branch(vec![1, 2])),
            ("b", ok_branch(vec![3])),
        ])
        .await;
        assert_eq!(records, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn failed_branch_contributes_nothing() {
        let records = collect_named(vec![
            ("good", futures::future::Either::Left(ok_branch(vec![7]))),
            ("bad", futures::future::Either::Right(failing_branch())),
        ])
        .await;
        assert_eq!(records, vec![7]);
    }

    #[tokio::test]
    async fn all_failed_yields_empty() {
        let records: Vec<u32> = collect_named(vec![("only", failing_branch())]).await;
        assert!(records.is_empty());
    }
}
