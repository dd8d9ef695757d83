use std::fmt::{Debug, Formatter};
use std::ops::{Index, IndexMut};

use fixedbitset::FixedBitSet;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::ring::iterator::Iter;

pub mod iterator;

mod algorithms;
#[cfg(feature = "serde")]
mod repr;

const DEFAULT_CAPACITY: usize = 8;

/// The `Ring` is a circular doubly-linked list whose nodes live in a flat array
/// and refer to each other by index.
///
/// Every node is addressed by the index it was given when it was created. The
/// index is a permanent handle: nodes are never moved, freed or reused, even
/// after they are [detached](Ring::detach) from the ring. A detached node keeps
/// its value and can be linked back in with [`Ring::insert_after`] or
/// [`Ring::insert_before`].
///
/// The `Ring` contains:
/// - the node storage, which only grows by appending;
/// - a length field `len` counting the nodes currently linked into the cycle
///   (detached nodes are not counted);
/// - a `head` index, the node where traversals start.
///
/// # Naming Conventions
///
/// - `n`, `p`: node indices given as arguments, `p` being the anchor of an
///   insertion;
/// - *linked*: a node that is part of the cycle, with both links set;
/// - *detached*: a node present in storage with neither link set.
#[derive(Clone, PartialEq, Eq)]
pub struct Ring<T> {
    nodes: Vec<Node<T>>,
    /// the number of linked nodes
    len: usize,
    head: usize,
}

#[derive(Clone, PartialEq, Eq)]
pub(crate) struct Node<T> {
    pub(crate) next: Option<usize>,
    pub(crate) prev: Option<usize>,
    pub(crate) value: T,
}

impl<T> Node<T> {
    fn detached(value: T) -> Self {
        Self {
            next: None,
            prev: None,
            value,
        }
    }

    pub(crate) fn is_detached(&self) -> bool {
        self.next.is_none() && self.prev.is_none()
    }
}

// private methods
impl<T> Ring<T> {
    /// Returns `(prev, next)` of node `n`, or `None` if `n` is detached.
    pub(crate) fn links(&self, n: usize) -> Option<(usize, usize)> {
        let node = &self.nodes[n];
        Some((node.prev?, node.next?))
    }

    pub(crate) fn connect(&mut self, prev: usize, next: usize) {
        self.nodes[prev].next = Some(next);
        self.nodes[next].prev = Some(prev);
    }

    /// Unlink node `n` from the cycle, connecting its neighbours together.
    ///
    /// Returns `false` if `n` was already detached.
    pub(crate) fn unlink(&mut self, n: usize) -> bool {
        let (prev, next) = match self.links(n) {
            Some(links) => links,
            None => return false,
        };
        self.connect(prev, next);
        let node = &mut self.nodes[n];
        node.next = None;
        node.prev = None;
        self.len -= 1;
        if n == self.head {
            self.head = next;
        }
        true
    }

    /// Link the detached node `n` between `prev` and `next`.
    ///
    /// `prev` and `next` must be adjacent (only checked in
    /// `#[cfg(debug_assertions)]`), otherwise the ring becomes ill-formed.
    pub(crate) fn attach(&mut self, prev: usize, next: usize, n: usize) {
        #[cfg(debug_assertions)]
        self.assert_adjacent(prev, next);
        self.connect(prev, n);
        self.connect(n, next);
        self.len += 1;
        #[cfg(debug_assertions)]
        {
            self.assert_adjacent(prev, n);
            self.assert_adjacent(n, next);
        }
    }

    #[cfg(debug_assertions)]
    fn assert_adjacent(&self, prev: usize, next: usize) {
        assert_eq!(self.nodes[prev].next, Some(next));
        assert_eq!(self.nodes[next].prev, Some(prev));
    }

    fn assert_in_bounds(&self, n: usize) {
        assert!(
            n < self.nodes.len(),
            "node index {} out of bounds (node count is {})",
            n,
            self.nodes.len()
        );
    }

    /// Iterate from the head, yielding nothing on an empty ring.
    pub(crate) fn walk(&self) -> Iter<'_, T> {
        Iter::new(self, self.head)
    }
}

pub(crate) fn rejected(op: &'static str, err: Error) -> Error {
    debug!(op, %err, "rejected ring operation");
    err
}

impl<T> Ring<T> {
    /// Create an empty `Ring`.
    ///
    /// # Examples
    /// ```
    /// use array_ring::Ring;
    /// let ring: Ring<u32> = Ring::new();
    /// assert!(ring.is_empty());
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty `Ring` with storage for at least `capacity` nodes.
    #[inline]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            len: 0,
            head: 0,
        }
    }

    /// Returns `true` if no node is linked into the ring.
    ///
    /// Detached nodes may still be present in storage.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of linked nodes.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use array_ring::Ring;
    ///
    /// let mut ring = Ring::<()>::from_order(&[2, 1, 0]).unwrap();
    /// assert_eq!(ring.len(), 3);
    ///
    /// ring.detach(1);
    /// assert_eq!(ring.len(), 2);
    /// assert_eq!(ring.node_count(), 3);
    /// ```
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns the number of node slots in storage, linked or detached.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the index traversals start from, or `None` if the ring is empty.
    #[inline]
    pub fn head(&self) -> Option<usize> {
        if self.is_empty() {
            None
        } else {
            Some(self.head)
        }
    }

    /// Returns the successor of node `n`, or `None` if `n` is detached.
    ///
    /// # Panics
    ///
    /// Panics if `n >= self.node_count()`.
    #[inline]
    pub fn next(&self, n: usize) -> Option<usize> {
        self.nodes[n].next
    }

    /// Returns the predecessor of node `n`, or `None` if `n` is detached.
    ///
    /// # Panics
    ///
    /// Panics if `n >= self.node_count()`.
    #[inline]
    pub fn prev(&self, n: usize) -> Option<usize> {
        self.nodes[n].prev
    }

    /// Returns `true` if node `n` is in storage but not linked into the ring.
    ///
    /// # Panics
    ///
    /// Panics if `n >= self.node_count()`.
    #[inline]
    pub fn is_detached(&self, n: usize) -> bool {
        self.nodes[n].is_detached()
    }

    /// Provides a reference to the value of node `n`, linked or not.
    ///
    /// # Panics
    ///
    /// Panics if `n >= self.node_count()`.
    #[inline]
    pub fn value(&self, n: usize) -> &T {
        &self.nodes[n].value
    }

    /// Provides a mutable reference to the value of node `n`.
    ///
    /// # Panics
    ///
    /// Panics if `n >= self.node_count()`.
    #[inline]
    pub fn value_mut(&mut self, n: usize) -> &mut T {
        &mut self.nodes[n].value
    }

    /// Replaces the value of node `n`, returning the old one.
    ///
    /// # Panics
    ///
    /// Panics if `n >= self.node_count()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use array_ring::Ring;
    ///
    /// let mut ring = Ring::new();
    /// let n = ring.add_with_value("mdoe");
    /// assert_eq!(ring.set_value(n, "sawyer"), "mdoe");
    /// assert_eq!(ring[n], "sawyer");
    /// ```
    #[inline]
    pub fn set_value(&mut self, n: usize, value: T) -> T {
        std::mem::replace(&mut self.nodes[n].value, value)
    }

    /// Appends a new node holding `value` to the "end" of the ring, which is
    /// right before the head. If the ring is empty, the new node becomes the
    /// head and links to itself.
    ///
    /// Returns the index of the new node.
    ///
    /// # Complexity
    ///
    /// This operation should compute in amortized *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use array_ring::Ring;
    ///
    /// let mut ring = Ring::new();
    /// assert_eq!(ring.add_with_value(1), 0);
    /// assert_eq!(ring.add_with_value(10), 1);
    /// assert_eq!(ring.add_with_value(100), 2);
    /// assert_eq!(ring.order(), vec![0, 1, 2]);
    /// ```
    pub fn add_with_value(&mut self, value: T) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node::detached(value));
        let tail = if self.is_empty() {
            None
        } else {
            self.nodes[self.head].prev
        };
        match tail {
            Some(tail) => self.attach(tail, self.head, index),
            None => {
                self.connect(index, index);
                self.head = index;
                self.len += 1;
            }
        }
        index
    }

    /// Detaches node `n` and links it right after node `p`, so that the ring
    /// reads `.., p, n, ..` afterwards.
    ///
    /// `n` may be linked or detached. If `n` already follows `p`, the ring is
    /// left as it is.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyRing`] if no node is linked;
    /// - [`Error::DetachedNodeOperation`] if `p` is detached;
    /// - [`Error::InvalidArgument`] if `n == p`.
    ///
    /// The ring is not modified on error.
    ///
    /// # Panics
    ///
    /// Panics if `n` or `p` is not smaller than `self.node_count()` on a
    /// non-empty ring. An empty ring reports [`Error::EmptyRing`] instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use array_ring::Ring;
    ///
    /// let mut ring = Ring::<()>::from_order(&[2, 1, 0, 4, 3]).unwrap();
    /// assert_eq!(ring.order(), vec![0, 4, 3, 2, 1]);
    ///
    /// ring.insert_after(0, 3).unwrap();
    /// assert_eq!(ring.order(), vec![4, 3, 0, 2, 1]);
    /// ```
    pub fn insert_after(&mut self, n: usize, p: usize) -> Result<()> {
        if self.is_empty() {
            return Err(rejected("insert_after", Error::EmptyRing));
        }
        self.assert_in_bounds(n);
        if n == p {
            return Err(rejected(
                "insert_after",
                Error::InvalidArgument(format!("cannot insert node {} after itself", n)),
            ));
        }
        let mut next = self.nodes[p].next;
        if next == Some(n) {
            next = self.nodes[n].next;
        }
        let next = next.ok_or_else(|| rejected("insert_after", Error::DetachedNodeOperation))?;
        self.unlink(n);
        self.attach(p, next, n);
        Ok(())
    }

    /// Detaches node `n` and links it right before node `p`, so that the ring
    /// reads `.., n, p, ..` afterwards.
    ///
    /// The mirror image of [`Ring::insert_after`], with the same errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use array_ring::Ring;
    ///
    /// let mut ring = Ring::<()>::from_order(&[2, 1, 0, 4, 3]).unwrap();
    ///
    /// ring.insert_before(0, 3).unwrap();
    /// assert_eq!(ring.order(), vec![4, 0, 3, 2, 1]);
    /// ```
    pub fn insert_before(&mut self, n: usize, p: usize) -> Result<()> {
        if self.is_empty() {
            return Err(rejected("insert_before", Error::EmptyRing));
        }
        self.assert_in_bounds(n);
        if n == p {
            return Err(rejected(
                "insert_before",
                Error::InvalidArgument(format!("cannot insert node {} before itself", n)),
            ));
        }
        let mut prev = self.nodes[p].prev;
        if prev == Some(n) {
            prev = self.nodes[n].prev;
        }
        let prev = prev.ok_or_else(|| rejected("insert_before", Error::DetachedNodeOperation))?;
        self.unlink(n);
        self.attach(prev, p, n);
        Ok(())
    }

    /// Detaches node `n` from the ring, connecting its neighbours together.
    ///
    /// The node keeps its slot and its value, and can be linked back in later.
    /// If `n` is the head, its successor becomes the new head. Detaching an
    /// already detached node does nothing.
    ///
    /// # Panics
    ///
    /// Panics if `n >= self.node_count()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use array_ring::Ring;
    ///
    /// let mut ring = Ring::<()>::from_order(&[2, 1, 0, 4, 3]).unwrap();
    /// ring.detach(3);
    /// assert_eq!(ring.order(), vec![0, 4, 2, 1]);
    /// assert!(ring.is_detached(3));
    ///
    /// ring.detach(3);
    /// assert_eq!(ring.len(), 4);
    /// ```
    #[inline]
    pub fn detach(&mut self, n: usize) {
        self.unlink(n);
    }

    /// Returns the linked node indices in traversal order, starting from the
    /// head.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time.
    pub fn order(&self) -> Vec<usize> {
        self.walk().map(|(index, _)| index).collect()
    }

    /// Provides a forward iterator over the linked nodes, starting from the
    /// head.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyRing`] if no node is linked.
    ///
    /// # Examples
    ///
    /// ```
    /// use array_ring::Ring;
    ///
    /// let mut ring = Ring::new();
    /// ring.add_with_value(1);
    /// ring.add_with_value(10);
    /// ring.add_with_value(100);
    ///
    /// let values: Vec<_> = ring.iter().unwrap().map(|(_, v)| *v).collect();
    /// assert_eq!(values, vec![1, 10, 100]);
    /// ```
    pub fn iter(&self) -> Result<Iter<'_, T>> {
        if self.is_empty() {
            return Err(rejected("iter", Error::EmptyRing));
        }
        Ok(self.walk())
    }

    /// Provides a forward iterator starting from node `n`.
    ///
    /// # Errors
    ///
    /// - [`Error::EmptyRing`] if no node is linked;
    /// - [`Error::DetachedNodeOperation`] if `n` is detached.
    ///
    /// # Panics
    ///
    /// Panics if `n >= self.node_count()`.
    pub fn iter_from(&self, n: usize) -> Result<Iter<'_, T>> {
        if self.is_empty() {
            return Err(rejected("iter_from", Error::EmptyRing));
        }
        if self.is_detached(n) {
            return Err(rejected("iter_from", Error::DetachedNodeOperation));
        }
        Ok(Iter::new(self, n))
    }
}

impl<T: Default> Ring<T> {
    /// Appends a new node holding `T::default()`. See [`Ring::add_with_value`].
    #[inline]
    pub fn add(&mut self) -> usize {
        self.add_with_value(T::default())
    }

    /// Create a ring from a tour.
    ///
    /// A tour lists every node index of `0..order.len()` exactly once, in
    /// traversal order; `order[i]` is linked to `order[i + 1]`, and the last
    /// entry back to the first. Values are `T::default()` and the head is node
    /// `0`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if `order` has an entry out of range or a
    /// repeated entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use array_ring::{Error, Ring};
    ///
    /// let ring = Ring::<()>::from_order(&[2, 1, 0, 4, 3]).unwrap();
    /// assert_eq!(ring.order(), vec![0, 4, 3, 2, 1]);
    ///
    /// assert!(matches!(
    ///     Ring::<()>::from_order(&[0, 1, 1]),
    ///     Err(Error::InvalidArgument(_))
    /// ));
    /// ```
    pub fn from_order(order: &[usize]) -> Result<Self> {
        let len = order.len();
        let mut seen = FixedBitSet::with_capacity(len);
        for &n in order {
            if n >= len {
                return Err(rejected(
                    "from_order",
                    Error::InvalidArgument(format!(
                        "node {} out of range for a tour of {} nodes",
                        n, len
                    )),
                ));
            }
            if seen.put(n) {
                return Err(rejected(
                    "from_order",
                    Error::InvalidArgument(format!("node {} appears twice in the tour", n)),
                ));
            }
        }

        let mut ring = Self::with_capacity(len);
        ring.nodes.resize_with(len, || Node::detached(T::default()));
        for (i, &n) in order.iter().enumerate() {
            let node = &mut ring.nodes[n];
            node.next = Some(order[(i + 1) % len]);
            node.prev = Some(order[(i + len - 1) % len]);
        }
        ring.len = len;
        trace!(len, "built ring from tour");
        Ok(ring)
    }
}

impl<T> Index<usize> for Ring<T> {
    type Output = T;

    fn index(&self, n: usize) -> &T {
        self.value(n)
    }
}

impl<T> IndexMut<usize> for Ring<T> {
    fn index_mut(&mut self, n: usize) -> &mut T {
        self.value_mut(n)
    }
}

impl<T: Debug> Debug for Ring<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.walk()).finish()
    }
}

impl<T> Default for Ring<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::ring::Ring;

    fn tour() -> Ring<Option<&'static str>> {
        Ring::from_order(&[2, 1, 0, 4, 3]).unwrap()
    }

    #[test]
    fn ring_create() {
        let ring = Ring::<i32>::new();
        assert!(ring.is_empty());
        assert_eq!(ring.len(), 0);
        assert_eq!(ring.node_count(), 0);
        assert_eq!(ring.head(), None);
        assert_eq!(ring.order(), Vec::<usize>::new());
    }

    #[test]
    fn ring_from_order() {
        let ring = tour();
        assert_eq!(ring.order(), vec![0, 4, 3, 2, 1]);
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.head(), Some(0));
        assert_eq!(ring.next(2), Some(1));
        assert_eq!(ring.prev(2), Some(3));

        let ring = Ring::<()>::from_order(&[]).unwrap();
        assert!(ring.is_empty());

        let ring = Ring::<()>::from_order(&[0]).unwrap();
        assert_eq!(ring.order(), vec![0]);
        assert_eq!(ring.next(0), Some(0));
        assert_eq!(ring.prev(0), Some(0));
    }

    #[test]
    fn ring_from_order_rejects_non_permutations() {
        let orders: [&[usize]; 3] = [&[0, 1, 3], &[0, 0, 1], &[1, 2]];
        for order in orders.iter() {
            match Ring::<()>::from_order(order) {
                Err(Error::InvalidArgument(_)) => {}
                other => panic!("expected InvalidArgument for {:?}, got {:?}", order, other),
            }
        }
    }

    #[test]
    fn ring_add() {
        let mut ring = Ring::<()>::new();
        assert_eq!(ring.add(), 0);
        assert_eq!(ring.node_count(), 1);
        assert_eq!(ring.order(), vec![0]);
        assert_eq!(ring.next(0), Some(0));

        ring.add();
        assert_eq!(ring.node_count(), 2);
        assert_eq!(ring.order(), vec![0, 1]);

        ring.add();
        ring.add();
        ring.add();
        ring.add();
        assert_eq!(ring.order(), vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(ring.len(), 6);
    }

    #[test]
    fn ring_add_after_everything_detached() {
        let mut ring = Ring::new();
        ring.add_with_value('a');
        ring.detach(0);
        assert!(ring.is_empty());
        assert_eq!(ring.head(), None);

        let b = ring.add_with_value('b');
        assert_eq!(ring.order(), vec![b]);
        assert_eq!(ring.head(), Some(b));

        ring.insert_after(0, b).unwrap();
        assert_eq!(ring.order(), vec![1, 0]);
        assert_eq!(ring[0], 'a');
    }

    #[test]
    fn ring_values() {
        let mut ring = Ring::new();
        ring.add_with_value("mdoe");
        ring.add_with_value("abc");
        ring.add_with_value("sawyer");
        assert_eq!(ring.order(), vec![0, 1, 2]);
        assert_eq!(ring.value(1), &"abc");

        ring[1] = "hello";
        assert_eq!(ring.set_value(2, "world"), "sawyer");
        *ring.value_mut(0) = "greeting";
        assert_eq!(format!("{:?}", ring), r#"{0: "greeting", 1: "hello", 2: "world"}"#);
    }

    #[test]
    fn ring_insert_after() {
        let mut ring = tour();

        ring.insert_after(0, 3).unwrap();
        assert_eq!(ring.order(), vec![4, 3, 0, 2, 1]);

        ring.insert_after(4, 2).unwrap();
        assert_eq!(ring.order(), vec![3, 0, 2, 4, 1]);

        // already in place
        ring.insert_after(4, 2).unwrap();
        assert_eq!(ring.order(), vec![3, 0, 2, 4, 1]);

        ring.insert_after(2, 4).unwrap();
        assert_eq!(ring.order(), vec![3, 0, 4, 2, 1]);

        ring.insert_after(0, 2).unwrap();
        assert_eq!(ring.order(), vec![3, 4, 2, 0, 1]);

        assert_eq!(ring.len(), 5);
    }

    #[test]
    fn ring_insert_before() {
        let mut ring = tour();

        ring.insert_before(0, 3).unwrap();
        assert_eq!(ring.order(), vec![4, 0, 3, 2, 1]);

        ring.insert_before(4, 2).unwrap();
        assert_eq!(ring.order(), vec![0, 3, 4, 2, 1]);

        ring.insert_before(4, 2).unwrap();
        assert_eq!(ring.order(), vec![0, 3, 4, 2, 1]);

        ring.insert_before(2, 4).unwrap();
        assert_eq!(ring.order(), vec![0, 3, 2, 4, 1]);

        ring.insert_before(0, 2).unwrap();
        assert_eq!(ring.order(), vec![3, 0, 2, 4, 1]);

        assert_eq!(ring.len(), 5);
    }

    #[test]
    fn ring_reinsert_detached() {
        let mut ring = tour();
        ring.detach(0);
        assert_eq!(ring.len(), 4);

        ring.insert_after(0, 3).unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.order(), vec![4, 3, 0, 2, 1]);

        ring.detach(2);
        ring.insert_before(2, 4).unwrap();
        assert_eq!(ring.order(), vec![4, 3, 0, 1, 2]);
    }

    #[test]
    fn ring_insert_errors() {
        let mut empty = Ring::<()>::new();
        assert_eq!(empty.insert_after(0, 0), Err(Error::EmptyRing));
        assert_eq!(empty.insert_before(1, 0), Err(Error::EmptyRing));
        assert_eq!(empty.add(), 0);
        empty.detach(0);
        assert_eq!(empty.insert_after(0, 0), Err(Error::EmptyRing));
        assert_eq!(empty.insert_before(0, 0), Err(Error::EmptyRing));
        assert_eq!(empty.node_count(), 1);

        let mut ring = tour();
        ring.detach(3);
        let before = ring.clone();
        assert_eq!(ring.insert_after(0, 3), Err(Error::DetachedNodeOperation));
        assert_eq!(ring.insert_before(0, 3), Err(Error::DetachedNodeOperation));
        assert!(matches!(
            ring.insert_after(1, 1),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(ring, before);
    }

    #[test]
    #[should_panic]
    fn ring_insert_out_of_bounds() {
        let mut ring = tour();
        let _ = ring.insert_after(5, 0);
    }

    #[test]
    fn ring_detach() {
        let mut ring = tour();
        ring.detach(3);
        assert_eq!(ring.order(), vec![0, 4, 2, 1]);
        assert_eq!(ring.len(), 4);
        assert!(ring.is_detached(3));
        assert_eq!(ring.next(3), None);
        assert_eq!(ring.prev(3), None);

        ring.detach(3);
        assert_eq!(ring.len(), 4);

        ring.detach(2);
        assert_eq!(ring.order(), vec![0, 4, 1]);
        assert_eq!(ring.len(), 3);

        // detaching the head moves it to the successor
        ring.detach(0);
        assert_eq!(ring.head(), Some(4));
        assert_eq!(ring.order(), vec![4, 1]);
        assert_eq!(ring.len(), 2);

        ring.detach(4);
        ring.detach(1);
        assert!(ring.is_empty());
        assert_eq!(ring.node_count(), 5);
        assert!(ring.iter().is_err());
    }
}
