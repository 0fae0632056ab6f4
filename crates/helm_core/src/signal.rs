//! Multicast signal bus
//!
//! A `Signal<A, R>` is an ordered callback list for one event signature:
//! argument tuple `A`, listener return type `R` (unit for almost every
//! event). Listeners come in three shapes: free functions, methods bound
//! to a specific receiver, and capturing closures. Emission is synchronous
//! and walks listeners most-recently-connected-first; that LIFO order is
//! part of the contract and is relied upon by tests.
//!
//! Connection inserts at the head of the list, so disconnecting by a
//! reconstructed identity removes the most recent matching listener.
//! A listener must not connect/disconnect the signal it is currently
//! being invoked from; `&mut self` on `emit` makes that unrepresentable
//! rather than undefined.

use std::cell::RefCell;
use std::rc::Rc;

/// Identity of a connected listener, used for disconnection.
///
/// Function and method listeners have structural identity (pointer
/// addresses), so an equal `ListenerId` can be rebuilt later without
/// holding on to the value returned by `connect_*`. Closures are only
/// identified by the token handed back at connection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenerId {
    /// A free function, identified by its address.
    Function(usize),
    /// A bound method: receiver address plus method address.
    Method { receiver: usize, method: usize },
    /// A capturing closure, identified by a connection token.
    Token(u64),
}

impl ListenerId {
    /// Identity of a free-function listener.
    pub fn of_fn<A, R>(f: fn(&A) -> R) -> Self {
        ListenerId::Function(f as usize)
    }

    /// Identity of a bound-method listener.
    pub fn of_method<T, A, R>(receiver: &Rc<RefCell<T>>, method: fn(&mut T, &A) -> R) -> Self {
        ListenerId::Method {
            receiver: Rc::as_ptr(receiver) as *const () as usize,
            method: method as usize,
        }
    }
}

struct Node<A, R> {
    call: Box<dyn FnMut(&A) -> R>,
    id: ListenerId,
}

/// Ordered multicast list for one event signature.
pub struct Signal<A, R = ()> {
    nodes: Vec<Node<A, R>>,
    next_token: u64,
}

impl<A, R> Signal<A, R> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            next_token: 0,
        }
    }

    /// Connect a free function. Most recent connection fires first.
    pub fn connect_fn(&mut self, f: fn(&A) -> R) -> ListenerId
    where
        A: 'static,
        R: 'static,
    {
        let id = ListenerId::of_fn(f);
        self.insert(Box::new(move |args| f(args)), id.clone());
        id
    }

    /// Connect a method bound to a shared receiver.
    ///
    /// The signal keeps the receiver alive for as long as the listener
    /// stays connected.
    pub fn connect_method<T>(
        &mut self,
        receiver: &Rc<RefCell<T>>,
        method: fn(&mut T, &A) -> R,
    ) -> ListenerId
    where
        T: 'static,
        A: 'static,
        R: 'static,
    {
        let id = ListenerId::of_method(receiver, method);
        let target = Rc::clone(receiver);
        self.insert(
            Box::new(move |args| method(&mut target.borrow_mut(), args)),
            id.clone(),
        );
        id
    }

    /// Connect a capturing closure. The returned token is the only way
    /// to disconnect it.
    pub fn connect<F>(&mut self, f: F) -> ListenerId
    where
        F: FnMut(&A) -> R + 'static,
    {
        self.next_token += 1;
        let id = ListenerId::Token(self.next_token);
        self.insert(Box::new(f), id.clone());
        id
    }

    fn insert(&mut self, call: Box<dyn FnMut(&A) -> R>, id: ListenerId) {
        // Head insertion; emission walks front to back.
        self.nodes.insert(0, Node { call, id });
    }

    /// Disconnect the first (most recently connected) listener matching
    /// the identity. Linear scan; subscriber counts are small.
    pub fn disconnect(&mut self, id: &ListenerId) -> bool {
        match self.nodes.iter().position(|node| node.id == *id) {
            Some(index) => {
                self.nodes.remove(index);
                true
            }
            None => false,
        }
    }

    /// Disconnect a free-function listener by address.
    pub fn disconnect_fn(&mut self, f: fn(&A) -> R) -> bool {
        self.disconnect(&ListenerId::of_fn(f))
    }

    /// Disconnect a bound-method listener by receiver and method address.
    pub fn disconnect_method<T>(
        &mut self,
        receiver: &Rc<RefCell<T>>,
        method: fn(&mut T, &A) -> R,
    ) -> bool {
        self.disconnect(&ListenerId::of_method(receiver, method))
    }

    /// Invoke every listener, feeding each return value to `collect`.
    /// Walk order is the same LIFO order as [`Signal::emit`].
    pub fn emit_query(&mut self, args: &A, mut collect: impl FnMut(R)) {
        for node in self.nodes.iter_mut() {
            collect((node.call)(args));
        }
    }

    /// Drop every listener. Called when a slot is deinitialized so stale
    /// subscriptions cannot fire against a reused ID.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<A> Signal<A, ()> {
    /// Invoke every listener front to back (most recent first).
    pub fn emit(&mut self, args: &A) {
        for node in self.nodes.iter_mut() {
            (node.call)(args);
        }
    }
}

impl<A, R> Default for Signal<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_in_lifo_order() {
        let mut signal: Signal<(i32,)> = Signal::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        signal.connect(move |_| first.borrow_mut().push("first"));
        let second = Rc::clone(&seen);
        signal.connect(move |_| second.borrow_mut().push("second"));

        signal.emit(&(0,));
        assert_eq!(*seen.borrow(), vec!["second", "first"]);
    }

    #[test]
    fn disconnects_closure_by_token() {
        let mut signal: Signal<(i32,)> = Signal::new();
        let count = Rc::new(RefCell::new(0));

        let hits = Rc::clone(&count);
        let token = signal.connect(move |_| *hits.borrow_mut() += 1);
        signal.emit(&(0,));
        assert!(signal.disconnect(&token));
        assert!(!signal.disconnect(&token));
        signal.emit(&(0,));

        assert_eq!(*count.borrow(), 1);
    }

    fn noop(_: &(i32,)) {}

    #[test]
    fn disconnects_free_function_by_address() {
        let mut signal: Signal<(i32,)> = Signal::new();
        signal.connect_fn(noop);
        assert_eq!(signal.len(), 1);
        assert!(signal.disconnect_fn(noop));
        assert!(signal.is_empty());
    }

    struct Recorder {
        hits: Vec<i32>,
    }

    impl Recorder {
        fn on_event(&mut self, args: &(i32,)) {
            self.hits.push(args.0);
        }
    }

    #[test]
    fn invokes_and_disconnects_bound_method() {
        let mut signal: Signal<(i32,)> = Signal::new();
        let recorder = Rc::new(RefCell::new(Recorder { hits: Vec::new() }));

        signal.connect_method(&recorder, Recorder::on_event);
        signal.emit(&(7,));
        assert!(signal.disconnect_method(&recorder, Recorder::on_event));
        signal.emit(&(8,));

        assert_eq!(recorder.borrow().hits, vec![7]);
    }

    #[test]
    fn query_collects_return_values_in_walk_order() {
        let mut signal: Signal<(i32,), i32> = Signal::new();
        signal.connect(|args| args.0 + 1);
        signal.connect(|args| args.0 * 2);

        let mut results = Vec::new();
        signal.emit_query(&(10,), |value| results.push(value));
        // Most recent listener answers first.
        assert_eq!(results, vec![20, 11]);
    }

    #[test]
    fn clear_drops_every_listener() {
        let mut signal: Signal<(i32,)> = Signal::new();
        let count = Rc::new(RefCell::new(0));
        for _ in 0..3 {
            let hits = Rc::clone(&count);
            signal.connect(move |_| *hits.borrow_mut() += 1);
        }

        signal.clear();
        signal.emit(&(0,));
        assert_eq!(*count.borrow(), 0);
        assert!(signal.is_empty());
    }
}
