use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::editing::interval::ClosedRange;

/// Receiver of "a span of content changed length" events.
///
/// `range` is the closed interval of actual positions the edit touched and
/// `delta` the signed change in actual-space document length.
pub trait LengthObserver {
    fn on_length_change(&self, range: ClosedRange, delta: isize);
}

/// Synchronous publish/subscribe channel for length-change events.
///
/// Subscribers are held by `Weak` reference: dropping the last strong
/// reference to an observer is all it takes to unsubscribe. Dead entries
/// are pruned as a side effect of the next publish; there is no separate
/// cleanup pass. Live observers are invoked synchronously, in registration
/// order, exactly once per publish.
#[derive(Default)]
pub struct ChangeBus {
    subscribers: RefCell<Vec<Weak<dyn LengthObserver>>>,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, observer: Weak<dyn LengthObserver>) {
        self.subscribers.borrow_mut().push(observer);
    }

    /// Number of registered subscribers, dead entries included until the
    /// next publish prunes them.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    /// Fan a length-change event out to every live subscriber.
    ///
    /// A `delta` of zero is suppressed: no subscriber state could change.
    /// The registry borrow is released before any callback runs, so an
    /// observer may subscribe further observers from inside its callback.
    pub fn publish(&self, range: ClosedRange, delta: isize) {
        if delta == 0 {
            return;
        }

        let live: Vec<Rc<dyn LengthObserver>> = {
            let mut subscribers = self.subscribers.borrow_mut();
            let mut live = Vec::with_capacity(subscribers.len());
            subscribers.retain(|weak| match weak.upgrade() {
                Some(observer) => {
                    live.push(observer);
                    true
                }
                None => false,
            });
            live
        };

        for observer in live {
            observer.on_length_change(range, delta);
        }
    }
}
