//! Stream helpers shared by the paginators

use futures::stream::{Stream, StreamExt, Take};

/// Cap a stream at `limit` items, `None` leaves it unbounded.
///
/// The inner stream is not polled again once the cap is reached, so a
/// paginated source stops fetching as soon as the prefix is produced.
pub fn limited<S: Stream>(stream: S, limit: Option<usize>) -> Take<S> {
    stream.take(limit.unwrap_or(usize::MAX))
}

/// Pair every item with its position, counting from `start`
pub fn enumerate_from<S: Stream>(stream: S, start: usize) -> impl Stream<Item = (usize, S::Item)> {
    stream.enumerate().map(move |(i, item)| (start + i, item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    #[tokio::test]
    async fn test_limited_caps_stream() {
        let items: Vec<u32> = limited(stream::iter(1..=10), Some(3)).collect().await;
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_limited_none_is_unbounded() {
        let items: Vec<u32> = limited(stream::iter(1..=5), None).collect().await;
        assert_eq!(items, vec![1, 2, 3, 4, 5]);
    }

    #[tokio::test]
    async fn test_limited_zero_is_empty() {
        let items: Vec<u32> = limited(stream::iter(1..=5), Some(0)).collect().await;
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_enumerate_from() {
        let items: Vec<(usize, char)> = enumerate_from(stream::iter(['a', 'b', 'c']), 1)
            .collect()
            .await;
        assert_eq!(items, vec![(1, 'a'), (2, 'b'), (3, 'c')]);
    }
}
