use crate::ring::Ring;
use std::fmt;
use std::iter::FusedIterator;

/// A forward iterator over the linked nodes of a `Ring`.
///
/// It starts at a given node and follows the `next` links until it comes
/// back to the start, visiting every linked node once. It yields
/// `(index, &value)` pairs.
///
/// Besides the [`Iterator`] interface, the `Iter` can be driven as a cursor
/// with [`Iter::advance`], [`Iter::index`] and [`Iter::value`]. It is not
/// restartable: create a new one to traverse the ring again.
///
/// The `Iter` borrows the ring immutably, so the ring cannot be mutated while
/// the iterator is alive.
///
/// # Examples
///
/// ```compile_fail
/// use array_ring::Ring;
///
/// let mut ring = Ring::<()>::from_order(&[1, 0, 2]).unwrap();
/// let mut iter = ring.iter().unwrap();
///
/// // Won't compile, because ring is already borrowed immutably.
/// ring.detach(1);
/// println!("{:?}", iter.next());
/// ```
#[derive(Clone)]
pub struct Iter<'a, T: 'a> {
    ring: &'a Ring<T>,
    start: usize,
    current: Option<usize>,
    remaining: usize,
    finished: bool,
}

impl<'a, T: 'a> Iter<'a, T> {
    pub(crate) fn new(ring: &'a Ring<T>, start: usize) -> Self {
        Self {
            ring,
            start,
            current: None,
            remaining: ring.len(),
            finished: ring.is_empty(),
        }
    }

    /// Moves to the next node.
    ///
    /// The first call moves onto the start node. Returns `false` once the
    /// iterator has looped back to the start (or hit a detached link), and
    /// keeps returning `false` afterwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use array_ring::Ring;
    ///
    /// let mut ring = Ring::<()>::from_order(&[2, 0, 1, 3]).unwrap();
    /// ring.swap(0, 3).unwrap();
    ///
    /// let mut indices = Vec::new();
    /// let mut iter = ring.iter().unwrap();
    /// while iter.advance() {
    ///     indices.push(iter.index().unwrap());
    /// }
    /// assert_eq!(indices, vec![3, 1, 0, 2]);
    /// ```
    pub fn advance(&mut self) -> bool {
        if self.finished {
            return false;
        }
        let start = self.start;
        let next = match self.current {
            None => Some(start),
            Some(current) => self.ring.next(current).filter(|&next| next != start),
        };
        self.current = next;
        if next.is_some() {
            self.remaining = self.remaining.saturating_sub(1);
            true
        } else {
            self.finished = true;
            false
        }
    }

    /// Returns the index of the current node, or `None` before the first
    /// [`advance`](Iter::advance) and after the traversal is over.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.current
    }

    /// Returns the value of the current node.
    #[inline]
    pub fn value(&self) -> Option<&'a T> {
        let ring = self.ring;
        self.current.map(|n| ring.value(n))
    }
}

impl<'a, T: 'a> fmt::Debug for Iter<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("start", &self.start)
            .field("current", &self.current)
            .field("remaining", &self.remaining)
            .finish()
    }
}

impl<'a, T: 'a> Iterator for Iter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if !self.advance() {
            return None;
        }
        let ring = self.ring;
        self.current.map(|n| (n, ring.value(n)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T: 'a> ExactSizeIterator for Iter<'a, T> {}

impl<'a, T: 'a> FusedIterator for Iter<'a, T> {}
