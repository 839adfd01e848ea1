//! Ordered k-way merge
//!
//! Both merges expect every source to be sorted ascending by the key and
//! produce a globally ascending sequence. Equal keys come out in source
//! registration order. A source that is not sorted by the key produces an
//! unsorted result; this is not detected.

use crate::error::Result;
use futures::stream::{BoxStream, FusedStream, Stream, StreamExt};
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Head item of one source, ordered so that `BinaryHeap` pops the smallest
/// key first and, on ties, the earliest registered source.
struct HeapEntry<T, O> {
    key: O,
    source: usize,
    item: T,
}

impl<T, O: Ord> PartialEq for HeapEntry<T, O> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.source == other.source
    }
}

impl<T, O: Ord> Eq for HeapEntry<T, O> {}

impl<T, O: Ord> PartialOrd for HeapEntry<T, O> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, O: Ord> Ord for HeapEntry<T, O> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .cmp(&self.key)
            .then_with(|| other.source.cmp(&self.source))
    }
}

// ============================================================================
// Lazy Merge
// ============================================================================

/// Stream merging several sorted fallible streams by a key.
///
/// Holds at most one pending item per live source. A source is only polled
/// when its pending slot is empty, so after the initial fill each yielded
/// item causes exactly one source to be advanced. The first error from any
/// source is yielded and ends the merge.
#[must_use = "streams do nothing unless polled"]
pub struct OrderedMerge<'a, T, K, O> {
    sources: Vec<Option<BoxStream<'a, Result<T>>>>,
    /// Sources whose head must be pulled before the next item can be chosen
    refill: Vec<usize>,
    heap: BinaryHeap<HeapEntry<T, O>>,
    key: K,
    done: bool,
}

/// Merge sorted streams lazily by `key`
pub fn ordered_merge<'a, T, K, O>(
    sources: Vec<BoxStream<'a, Result<T>>>,
    key: K,
) -> OrderedMerge<'a, T, K, O>
where
    K: Fn(&T) -> O,
    O: Ord,
{
    let refill = (0..sources.len()).collect();
    OrderedMerge {
        heap: BinaryHeap::with_capacity(sources.len()),
        sources: sources.into_iter().map(Some).collect(),
        refill,
        key,
        done: false,
    }
}

impl<T, K, O> OrderedMerge<'_, T, K, O> {
    /// Number of sources that have not ended yet
    pub fn live_sources(&self) -> usize {
        self.sources.iter().filter(|s| s.is_some()).count()
    }
}

impl<T, K, O> Unpin for OrderedMerge<'_, T, K, O> {}

impl<T, K, O> Stream for OrderedMerge<'_, T, K, O>
where
    K: Fn(&T) -> O,
    O: Ord,
{
    type Item = Result<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }

        let mut i = 0;
        while i < this.refill.len() {
            let source = this.refill[i];
            let Some(stream) = this.sources[source].as_mut() else {
                this.refill.swap_remove(i);
                continue;
            };

            match stream.poll_next_unpin(cx) {
                Poll::Ready(Some(Ok(item))) => {
                    let key = (this.key)(&item);
                    this.heap.push(HeapEntry { key, source, item });
                    this.refill.swap_remove(i);
                }
                Poll::Ready(Some(Err(e))) => {
                    this.done = true;
                    this.sources.clear();
                    this.refill.clear();
                    this.heap.clear();
                    return Poll::Ready(Some(Err(e)));
                }
                Poll::Ready(None) => {
                    this.sources[source] = None;
                    this.refill.swap_remove(i);
                }
                Poll::Pending => i += 1,
            }
        }

        if !this.refill.is_empty() {
            return Poll::Pending;
        }

        match this.heap.pop() {
            Some(HeapEntry { source, item, .. }) => {
                this.refill.push(source);
                Poll::Ready(Some(Ok(item)))
            }
            None => {
                this.done = true;
                Poll::Ready(None)
            }
        }
    }
}

impl<T, K, O> FusedStream for OrderedMerge<'_, T, K, O>
where
    K: Fn(&T) -> O,
    O: Ord,
{
    fn is_terminated(&self) -> bool {
        self.done
    }
}

// ============================================================================
// Offline Merge
// ============================================================================

/// Merge fully materialized sorted lists by `key`
pub fn merge_sorted<T, K, O>(lists: Vec<Vec<T>>, key: K) -> Vec<T>
where
    K: Fn(&T) -> O,
    O: Ord,
{
    let total = lists.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);
    let mut iters: Vec<_> = lists.into_iter().map(Vec::into_iter).collect();
    let mut heap = BinaryHeap::with_capacity(iters.len());

    for (source, iter) in iters.iter_mut().enumerate() {
        if let Some(item) = iter.next() {
            heap.push(HeapEntry {
                key: key(&item),
                source,
                item,
            });
        }
    }

    while let Some(HeapEntry { source, item, .. }) = heap.pop() {
        merged.push(item);
        if let Some(next) = iters[source].next() {
            heap.push(HeapEntry {
                key: key(&next),
                source,
                item: next,
            });
        }
    }

    merged
}
