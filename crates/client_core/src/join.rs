//! All-or-nothing join over concurrent operations.

use std::future::Future;

use futures::future::try_join_all;

/// Awaits every operation concurrently and yields the complete collection of
/// outputs in **input order**, regardless of which operation finishes first.
/// The first failure to occur fails the whole join; no partial results are
/// ever produced.
pub async fn join_all_ordered<I, F, T, E>(futures: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = F>,
    F: Future<Output = Result<T, E>>,
{
    try_join_all(futures).await
}

#[cfg(test)]
mod tests {
    use std::{future::Future, pin::Pin, time::Duration};

    use super::join_all_ordered;

    type BoxedFetch<T> = Pin<Box<dyn Future<Output = Result<T, String>>>>;

    #[tokio::test]
    async fn preserves_input_order_when_completion_order_inverts() {
        let slow_first = async {
            tokio::time::sleep(Duration::from_millis(50)).await;
            Ok::<_, String>("first")
        };
        let fast_second = async { Ok::<_, String>("second") };

        let fetches: Vec<BoxedFetch<&str>> = vec![Box::pin(slow_first), Box::pin(fast_second)];
        let outputs = join_all_ordered(fetches).await.expect("join");

        assert_eq!(outputs, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn single_failure_fails_the_whole_join() {
        let ok = async { Ok::<i64, String>(1) };
        let err = async { Err::<i64, String>("listing failed".to_string()) };

        let fetches: Vec<BoxedFetch<i64>> = vec![Box::pin(ok), Box::pin(err)];
        let result = join_all_ordered(fetches).await;

        assert_eq!(result, Err("listing failed".to_string()));
    }

    #[tokio::test]
    async fn empty_input_yields_empty_collection() {
        let outputs: Result<Vec<i64>, String> =
            join_all_ordered(std::iter::empty::<std::future::Ready<Result<i64, String>>>()).await;
        assert_eq!(outputs, Ok(Vec::new()));
    }
}
