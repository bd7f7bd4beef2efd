//! Checkout coordination.
//!
//! [`CheckoutCoordinator`] owns the "payment succeeded" handshake between
//! the payment flow and the cart: when the UI reports a successful
//! payment, exactly one cart clear happens here, no matter how many
//! screens observe the signal, and the success dialog stays up until the
//! user dismisses it.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cart::CartStore;
use crate::observable::{ObservableContainer, Subscription};

/// Where checkout currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckoutPhase {
    /// No completed payment pending acknowledgement.
    #[default]
    Idle,
    /// Payment landed; the success dialog is showing until the user
    /// dismisses it.
    AwaitingAcknowledgement,
}

/// Single-flight owner of the post-payment cart clear.
///
/// UI subscribers watch [`CheckoutCoordinator::subscribe`] to show or hide
/// the success dialog; none of them clear the cart themselves.
#[derive(Debug)]
pub struct CheckoutCoordinator {
    phase: ObservableContainer<CheckoutPhase>,
    cart: Arc<CartStore>,
}

impl CheckoutCoordinator {
    /// Wire the coordinator to the cart it clears.
    #[must_use]
    pub fn new(cart: Arc<CartStore>) -> Self {
        Self {
            phase: ObservableContainer::new(CheckoutPhase::Idle),
            cart,
        }
    }

    /// Report a successful payment.
    ///
    /// The first signal per checkout wins the `Idle ->
    /// AwaitingAcknowledgement` transition and clears the cart; duplicate
    /// or delayed signals while awaiting acknowledgement are no-ops.
    /// Returns whether the transition fired.
    pub fn payment_succeeded(&self) -> bool {
        let fired = self.phase.update_and(|phase| match phase {
            CheckoutPhase::Idle => {
                *phase = CheckoutPhase::AwaitingAcknowledgement;
                true
            }
            CheckoutPhase::AwaitingAcknowledgement => false,
        });
        if fired {
            info!("Payment succeeded, clearing cart");
            // The clear's persistence is best-effort like any other
            // mutation; a failed snapshot does not roll the clear back.
            self.cart.clear();
        } else {
            debug!("Duplicate payment signal ignored");
        }
        fired
    }

    /// Dismiss the success dialog, returning to idle. No side effects.
    pub fn acknowledge(&self) {
        self.phase.set(CheckoutPhase::Idle);
    }

    /// Current phase without subscribing.
    #[must_use]
    pub fn phase(&self) -> CheckoutPhase {
        self.phase.get()
    }

    /// Subscribe to phase changes (drives the success dialog).
    #[must_use]
    pub fn subscribe(&self) -> Subscription<CheckoutPhase> {
        self.phase.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::persist::MemoryStore;
    use niba_vision_core::ItemId;

    async fn coordinator() -> CheckoutCoordinator {
        let cart = Arc::new(CartStore::hydrate(Arc::new(MemoryStore::new())).await);
        CheckoutCoordinator::new(cart)
    }

    #[tokio::test]
    async fn test_payment_clears_cart_and_raises_dialog() {
        let coordinator = coordinator().await;
        coordinator.cart.add(ItemId::new(1));
        coordinator.cart.add(ItemId::new(2));

        assert!(coordinator.payment_succeeded());
        assert!(coordinator.cart.state().is_empty());
        assert_eq!(coordinator.phase(), CheckoutPhase::AwaitingAcknowledgement);
    }

    #[tokio::test]
    async fn test_duplicate_signal_is_noop() {
        let coordinator = coordinator().await;
        coordinator.cart.add(ItemId::new(1));

        assert!(coordinator.payment_succeeded());
        // Delayed duplicate for the same checkout: no second transition.
        assert!(!coordinator.payment_succeeded());
        assert_eq!(coordinator.phase(), CheckoutPhase::AwaitingAcknowledgement);
    }

    #[tokio::test]
    async fn test_acknowledge_returns_to_idle() {
        let coordinator = coordinator().await;
        coordinator.payment_succeeded();
        coordinator.acknowledge();
        assert_eq!(coordinator.phase(), CheckoutPhase::Idle);
    }

    #[tokio::test]
    async fn test_next_checkout_can_fire_after_acknowledge() {
        let coordinator = coordinator().await;
        assert!(coordinator.payment_succeeded());
        coordinator.acknowledge();

        coordinator.cart.add(ItemId::new(3));
        assert!(coordinator.payment_succeeded());
        assert!(coordinator.cart.state().is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_observe_signal_but_clear_happens_once() {
        let coordinator = Arc::new(coordinator().await);
        coordinator.cart.add(ItemId::new(1));

        // N observers of the payment signal.
        let mut subs: Vec<_> = (0..5).map(|_| coordinator.subscribe()).collect();
        for sub in &mut subs {
            assert_eq!(sub.next().await, Some(CheckoutPhase::Idle));
        }

        assert!(coordinator.payment_succeeded());
        for sub in &mut subs {
            assert_eq!(sub.next().await, Some(CheckoutPhase::AwaitingAcknowledgement));
        }

        // Every observer saw the transition, but the coordinator alone
        // cleared the cart.
        assert!(coordinator.cart.state().is_empty());
    }

    #[test]
    fn test_concurrent_signals_fire_exactly_once() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let coordinator = Arc::new(coordinator().await);
            coordinator.cart.add(ItemId::new(1));

            let fired: usize = std::thread::scope(|scope| {
                let handles: Vec<_> = (0..8)
                    .map(|_| {
                        let coordinator = Arc::clone(&coordinator);
                        scope.spawn(move || usize::from(coordinator.payment_succeeded()))
                    })
                    .collect();
                handles.into_iter().map(|h| h.join().unwrap_or(0)).sum()
            });

            assert_eq!(fired, 1);
            assert!(coordinator.cart.state().is_empty());
        });
    }
}
