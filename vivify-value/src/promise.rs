// vivify-value - Settle-once promise cell
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! A settle-once awaitable cell.
//!
//! `JsPromise` starts either already settled or pending on a boxed local
//! future. Settling is one-way: once the future completes, its outcome
//! replaces the pending state and every later observation sees the same
//! settled value. The cell is deliberately not thread-safe (`Rc`-based,
//! like the rest of the value model) and must not be settled from two
//! overlapping async parses.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

use crate::value::JsValue;

type SettleFuture = LocalBoxFuture<'static, Result<JsValue, JsValue>>;

enum PromiseState {
    /// Not yet settled; holds the future that will settle it.
    Pending(SettleFuture),
    /// Future taken by an in-flight settle; observing this from a second
    /// settle is a caller contract violation.
    Settling,
    Resolved(JsValue),
    Rejected(JsValue),
}

/// Observation of a promise's state.
#[derive(Clone, Debug)]
pub enum PromiseSnapshot {
    /// Settled with a value.
    Resolved(JsValue),
    /// Settled with a rejection reason.
    Rejected(JsValue),
    /// Not settled (or a settle is in flight elsewhere).
    Pending,
}

/// A promise value: a shared settle-once cell.
#[derive(Clone)]
pub struct JsPromise {
    state: Rc<RefCell<PromiseState>>,
}

impl JsPromise {
    /// Create a pending promise from a future.
    #[must_use]
    pub fn new<F>(future: F) -> Self
    where
        F: std::future::Future<Output = Result<JsValue, JsValue>> + 'static,
    {
        JsPromise {
            state: Rc::new(RefCell::new(PromiseState::Pending(Box::pin(future)))),
        }
    }

    /// Create an already-resolved promise.
    #[must_use]
    pub fn resolved(value: JsValue) -> Self {
        JsPromise {
            state: Rc::new(RefCell::new(PromiseState::Resolved(value))),
        }
    }

    /// Create an already-rejected promise.
    #[must_use]
    pub fn rejected(reason: JsValue) -> Self {
        JsPromise {
            state: Rc::new(RefCell::new(PromiseState::Rejected(reason))),
        }
    }

    /// Observe the current state without driving the future.
    #[must_use]
    pub fn snapshot(&self) -> PromiseSnapshot {
        match &*self.state.borrow() {
            PromiseState::Pending(_) | PromiseState::Settling => PromiseSnapshot::Pending,
            PromiseState::Resolved(v) => PromiseSnapshot::Resolved(v.clone()),
            PromiseState::Rejected(v) => PromiseSnapshot::Rejected(v.clone()),
        }
    }

    /// Drive the promise to a settled state and observe it.
    ///
    /// Pending is only returned when another settle holds the future,
    /// which callers are contractually required to avoid.
    pub async fn settle(&self) -> PromiseSnapshot {
        let future = {
            let mut state = self.state.borrow_mut();
            match &*state {
                PromiseState::Pending(_) => {
                    let PromiseState::Pending(fut) =
                        std::mem::replace(&mut *state, PromiseState::Settling)
                    else {
                        unreachable!("state matched Pending above");
                    };
                    fut
                }
                PromiseState::Settling => return PromiseSnapshot::Pending,
                PromiseState::Resolved(v) => return PromiseSnapshot::Resolved(v.clone()),
                PromiseState::Rejected(v) => return PromiseSnapshot::Rejected(v.clone()),
            }
        };

        let outcome = future.await;
        let mut state = self.state.borrow_mut();
        match outcome {
            Ok(value) => {
                *state = PromiseState::Resolved(value.clone());
                PromiseSnapshot::Resolved(value)
            }
            Err(reason) => {
                *state = PromiseState::Rejected(reason.clone());
                PromiseSnapshot::Rejected(reason)
            }
        }
    }

    pub(crate) fn addr(&self) -> usize {
        Rc::as_ptr(&self.state) as *const () as usize
    }
}

impl fmt::Debug for JsPromise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.state.borrow() {
            PromiseState::Pending(_) | PromiseState::Settling => write!(f, "Promise {{ pending }}"),
            PromiseState::Resolved(v) => write!(f, "Promise {{ resolved: {:?} }}", v),
            PromiseState::Rejected(v) => write!(f, "Promise {{ rejected: {:?} }}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_snapshot() {
        let p = JsPromise::resolved(JsValue::Number(42.0));
        match p.snapshot() {
            PromiseSnapshot::Resolved(JsValue::Number(n)) => assert_eq!(n, 42.0),
            other => panic!("unexpected snapshot: {:?}", other),
        }
    }

    #[test]
    fn pending_snapshot_does_not_drive() {
        let p = JsPromise::new(async { Ok(JsValue::Null) });
        assert!(matches!(p.snapshot(), PromiseSnapshot::Pending));
        assert!(matches!(p.snapshot(), PromiseSnapshot::Pending));
    }

    #[test]
    fn settle_is_sticky() {
        let p = JsPromise::new(async { Ok(JsValue::Number(7.0)) });
        let first = futures::executor::block_on(p.settle());
        assert!(matches!(first, PromiseSnapshot::Resolved(_)));
        // A second settle observes the stored value without a future.
        let second = futures::executor::block_on(p.settle());
        assert!(matches!(second, PromiseSnapshot::Resolved(_)));
    }

    #[test]
    fn rejection_settles() {
        let p = JsPromise::new(async { Err(JsValue::from("boom")) });
        let out = futures::executor::block_on(p.settle());
        assert!(matches!(out, PromiseSnapshot::Rejected(_)));
    }
}
