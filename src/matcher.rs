use std::{collections::VecDeque, sync::Mutex};

use crate::completion::{AbortSignal, Settler};
use crate::Error;

type Classify<I, D, P> = Box<dyn Fn(&I, &D) -> Option<P> + Send + Sync>;
type Filter<I> = Box<dyn Fn(&I) -> bool + Send + Sync>;
type Describe<D> = Box<dyn Fn(&[D]) -> String + Send + Sync>;

/// Drives an ordered list of expected discriminants against a stream of
/// observations.
///
/// Each observed item is tested only against the current front of the queue;
/// items that don't match the front are dropped, never buffered for later
/// positions. On a match the item's payload is accumulated and the cursor
/// advances; when the queue empties the settler resolves with the payloads
/// in their original expected order. If the watched actor completes first,
/// [`on_complete`](Self::on_complete) rejects naming the unmet
/// discriminants. Once the coupled signal is aborted, both paths become
/// deliberate no-ops.
pub(crate) struct OrderedMatcher<I, D, P> {
    inner: Mutex<Inner<D, P>>,
    classify: Classify<I, D, P>,
    filter: Option<Filter<I>>,
    describe: Describe<D>,
    settler: Settler<Vec<P>>,
    signal: AbortSignal,
}

struct Inner<D, P> {
    queue: VecDeque<D>,
    seen: Vec<P>,
}

impl<I, D, P> OrderedMatcher<I, D, P>
where
    D: Clone + Send + 'static,
    P: Send + 'static,
{
    /// Fails synchronously with [`Error::EmptyExpectation`] on an empty
    /// list - a contract violation, caught before any actor is started.
    pub fn new(
        expected: Vec<D>,
        classify: impl Fn(&I, &D) -> Option<P> + Send + Sync + 'static,
        filter: Option<Filter<I>>,
        describe: impl Fn(&[D]) -> String + Send + Sync + 'static,
        settler: Settler<Vec<P>>,
        signal: AbortSignal,
    ) -> crate::Result<Self> {
        if expected.is_empty() {
            return Err(Error::EmptyExpectation);
        }
        Ok(Self {
            inner: Mutex::new(Inner {
                queue: expected.into(),
                seen: Vec::new(),
            }),
            classify: Box::new(classify),
            filter,
            describe: Box::new(describe),
            settler,
            signal,
        })
    }

    pub fn observe(&self, item: &I) {
        if self.signal.is_aborted() {
            return;
        }
        let mut inner = self.inner.lock().unwrap();
        let Some(front) = inner.queue.front() else {
            return;
        };
        let Some(payload) = (self.classify)(item, front) else {
            return;
        };
        if let Some(filter) = &self.filter {
            if !filter(item) {
                return;
            }
        }
        inner.seen.push(payload);
        inner.queue.pop_front();
        if inner.queue.is_empty() {
            let seen = std::mem::take(&mut inner.seen);
            drop(inner);
            self.settler.resolve(seen);
        }
    }

    /// The watched actor reached a terminal status; reject if expectations
    /// remain.
    pub fn on_complete(&self) {
        if self.signal.is_aborted() {
            return;
        }
        let remaining: Vec<D> = {
            let inner = self.inner.lock().unwrap();
            if inner.queue.is_empty() {
                return;
            }
            inner.queue.iter().cloned().collect()
        };
        let message = (self.describe)(&remaining);
        self.settler.reject(Error::Unmatched { message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionKit;
    use std::time::Duration;

    fn matcher(
        expected: &[&str],
        kit: &CompletionKit<Vec<String>>,
    ) -> OrderedMatcher<String, String, String> {
        OrderedMatcher::new(
            expected.iter().map(|s| s.to_string()).collect(),
            |item: &String, front: &String| (item == front).then(|| item.clone()),
            None,
            |remaining| format!("unmet: {}", remaining.join(", ")),
            kit.settler(),
            kit.signal(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn resolves_in_expected_order() {
        let kit = CompletionKit::new(None);
        let m = matcher(&["a", "b"], &kit);
        for item in ["x", "a", "y", "b"] {
            m.observe(&item.to_string());
        }
        assert_eq!(kit.settled().await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn out_of_order_items_are_dropped_not_buffered() {
        let kit = CompletionKit::new(None);
        let m = matcher(&["a", "b"], &kit);
        // "b" arrives while "a" is still the front: it must not count.
        m.observe(&"b".to_string());
        m.observe(&"a".to_string());
        let pending = tokio::time::timeout(Duration::from_millis(10), kit.settled()).await;
        assert!(pending.is_err(), "matcher resolved early");
    }

    #[tokio::test]
    async fn completion_with_unmet_expectations_rejects() {
        let kit = CompletionKit::new(None);
        let m = matcher(&["a", "b", "c"], &kit);
        m.observe(&"a".to_string());
        m.on_complete();
        match kit.settled().await {
            Err(Error::Unmatched { message }) => assert_eq!(message, "unmet: b, c"),
            other => panic!("unexpected settlement: {other:?}"),
        }
    }

    #[tokio::test]
    async fn silent_after_abort() {
        let kit = CompletionKit::new(None);
        let m = matcher(&["a"], &kit);
        kit.signal().abort(Error::Aborted);
        m.observe(&"a".to_string());
        m.on_complete();
        assert!(matches!(kit.settled().await, Err(Error::Aborted)));
    }

    #[test]
    fn empty_expectation_is_a_contract_violation() {
        let kit: CompletionKit<Vec<String>> = CompletionKit::new(None);
        let result = OrderedMatcher::<String, String, String>::new(
            Vec::new(),
            |_, _| None,
            None,
            |_| String::new(),
            kit.settler(),
            kit.signal(),
        );
        assert!(matches!(result, Err(Error::EmptyExpectation)));
    }
}
