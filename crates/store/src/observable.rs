//! Atomic update + subscribe primitive.
//!
//! [`ObservableContainer`] holds one current value and fans it out to any
//! number of subscribers. All mutation funnels through
//! `watch::Sender::send_modify`, which serializes concurrent callers: two
//! racing updates compose in some serial order, never interleave at field
//! granularity, and neither is lost.
//!
//! Delivery to subscribers is conflated: a subscriber always receives the
//! current value on first poll and never observes a value older than one it
//! already received, but it may skip intermediate values produced while it
//! was not polling. That matches what the UI needs (render the latest
//! state) and keeps slow subscribers from backpressuring mutators.

use tokio::sync::watch;

/// A shared, observable value of type `T`.
///
/// Cheap to construct, sync to mutate. Readers never block writers beyond
/// the critical section applying an update.
#[derive(Debug)]
pub struct ObservableContainer<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> ObservableContainer<T> {
    /// Create a container holding `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Replace the current value. Equivalent to `update(|_| value)`.
    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Apply `f` to the current value and replace it.
    ///
    /// Atomic with respect to concurrent callers: the closure runs under
    /// the channel's internal lock, so concurrent updates apply in some
    /// total order and neither is lost.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        self.tx.send_modify(|value| {
            let next = f(value);
            *value = next;
        });
    }

    /// Mutate the current value in place and return a result computed
    /// under the same critical section.
    ///
    /// Used where the caller must know what the update decided (e.g. the
    /// checkout coordinator's "did the transition fire" answer) without a
    /// separate, racy read.
    pub fn update_and<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut result = None;
        self.tx.send_modify(|value| result = Some(f(value)));
        // send_modify invokes the closure exactly once before returning
        result.unwrap_or_else(|| unreachable!("send_modify ran the closure"))
    }

    /// Subscribe to this container.
    ///
    /// The subscription yields the current value on the first
    /// [`Subscription::next`] call, then every later call yields a value at
    /// least as new as any previously observed one.
    #[must_use]
    pub fn subscribe(&self) -> Subscription<T> {
        let mut rx = self.tx.subscribe();
        // Deliver the current value to the new subscriber immediately.
        rx.mark_changed();
        Subscription { rx }
    }
}

/// A live subscription to an [`ObservableContainer`].
#[derive(Debug)]
pub struct Subscription<T> {
    rx: watch::Receiver<T>,
}

impl<T: Clone> Subscription<T> {
    /// Wait for the next value.
    ///
    /// Returns `None` once the container has been dropped and no unseen
    /// value remains.
    pub async fn next(&mut self) -> Option<T> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Peek at the latest value without waiting or consuming it.
    #[must_use]
    pub fn latest(&self) -> T {
        self.rx.borrow().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribe_replays_current_value() {
        let container = ObservableContainer::new(7_u32);
        let mut sub = container.subscribe();
        assert_eq!(sub.next().await, Some(7));
    }

    #[tokio::test]
    async fn test_subscriber_sees_updates_in_order() {
        let container = ObservableContainer::new(0_u32);
        let mut sub = container.subscribe();
        assert_eq!(sub.next().await, Some(0));

        container.set(1);
        assert_eq!(sub.next().await, Some(1));

        container.update(|v| v + 1);
        assert_eq!(sub.next().await, Some(2));
    }

    #[tokio::test]
    async fn test_slow_subscriber_skips_to_latest() {
        let container = ObservableContainer::new(0_u32);
        let mut sub = container.subscribe();
        assert_eq!(sub.next().await, Some(0));

        for _ in 0..10 {
            container.update(|v| v + 1);
        }
        // Conflated delivery: the subscriber jumps to the newest value.
        assert_eq!(sub.next().await, Some(10));
    }

    #[tokio::test]
    async fn test_next_returns_none_after_container_drop() {
        let container = ObservableContainer::new(1_u32);
        let mut sub = container.subscribe();
        assert_eq!(sub.next().await, Some(1));
        drop(container);
        assert_eq!(sub.next().await, None);
    }

    #[test]
    fn test_latest_does_not_consume() {
        let container = ObservableContainer::new(5_u32);
        let sub = container.subscribe();
        assert_eq!(sub.latest(), 5);
        container.set(6);
        assert_eq!(sub.latest(), 6);
    }

    #[test]
    fn test_concurrent_updates_are_not_lost() {
        let container = ObservableContainer::new(0_u64);
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for _ in 0..1000 {
                        container.update(|v| v + 1);
                    }
                });
            }
        });
        assert_eq!(container.get(), 4000);
    }

    #[test]
    fn test_update_and_returns_closure_result() {
        let container = ObservableContainer::new(vec![1, 2, 3]);
        let len = container.update_and(|v| {
            v.push(4);
            v.len()
        });
        assert_eq!(len, 4);
        assert_eq!(container.get(), vec![1, 2, 3, 4]);
    }
}
