//! Synchronous observer lists and the deferred queue used for
//! "publish on the next turn" notifications.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

pub type Observer<T> = Box<dyn Fn(&T)>;

/// Ordered list of callbacks, notified synchronously in registration order.
pub struct Subscribers<T> {
    observers: Vec<Observer<T>>,
}

impl<T> Subscribers<T> {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Observer<T>) {
        self.observers.push(observer);
    }

    pub fn notify(&self, value: &T) {
        for observer in &self.observers {
            observer(value);
        }
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<T> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Subscribers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("len", &self.observers.len())
            .finish()
    }
}

/// Values posted here are delivered to subscribers only when the driver
/// calls [`DeferredQueue::run_pending`], never from inside `post`.
pub struct DeferredQueue<T> {
    pending: RefCell<VecDeque<T>>,
    subscribers: Subscribers<T>,
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self {
            pending: RefCell::new(VecDeque::new()),
            subscribers: Subscribers::new(),
        }
    }

    pub fn subscribe(&mut self, observer: Observer<T>) {
        self.subscribers.subscribe(observer);
    }

    pub fn post(&self, value: T) {
        self.pending.borrow_mut().push_back(value);
    }

    pub fn pending(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Deliver everything queued so far. Returns the number of values delivered.
    pub fn run_pending(&self) -> usize {
        let mut delivered = 0;
        loop {
            // observers may post again, so the queue is not borrowed while notifying
            let next = self.pending.borrow_mut().pop_front();
            let Some(value) = next else { break };
            self.subscribers.notify(&value);
            delivered += 1;
        }
        delivered
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for DeferredQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferredQueue")
            .field("pending", &self.pending.borrow().len())
            .field("subscribers", &self.subscribers)
            .finish()
    }
}
