use crate::error::{Error, Result};
use crate::ring::{rejected, Ring};
use std::iter::FromIterator;
use tracing::trace;

impl<T> FromIterator<T> for Ring<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut ring = Ring::new();
        ring.extend(iter);
        ring
    }
}

impl<T> Extend<T> for Ring<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add_with_value(value);
        }
    }
}

impl<T> Ring<T> {
    /// Exchange the positions of the linked nodes `a` and `b`.
    ///
    /// Every other node keeps its place. The head stays at the same position,
    /// so if the head was `a` it becomes `b`, and the other way round.
    /// Swapping the same pair twice restores the ring exactly.
    ///
    /// # Errors
    ///
    /// [`Error::DetachedNodeOperation`] if `a` or `b` is detached. The ring
    /// is not modified on error.
    ///
    /// # Panics
    ///
    /// Panics if `a` or `b` is not smaller than `self.node_count()`.
    ///
    /// # Examples
    ///
    /// ```
    /// use array_ring::Ring;
    ///
    /// let mut ring = Ring::<()>::from_order(&[2, 1, 0, 4, 3]).unwrap();
    /// assert_eq!(ring.order(), vec![0, 4, 3, 2, 1]);
    ///
    /// ring.swap(1, 3).unwrap();
    /// assert_eq!(ring.order(), vec![0, 4, 1, 2, 3]);
    /// ```
    pub fn swap(&mut self, a: usize, b: usize) -> Result<()> {
        let (a_prev, _) = self
            .links(a)
            .ok_or_else(|| rejected("swap", Error::DetachedNodeOperation))?;
        let (b_prev, _) = self
            .links(b)
            .ok_or_else(|| rejected("swap", Error::DetachedNodeOperation))?;
        if a == b {
            return Ok(());
        }

        let head = self.head;
        // Two nodes form the same cycle in either order, only the head moves.
        // Otherwise both neighbours-to-be are linked once `a` and `b` are out,
        // so the insertions below cannot fail.
        if self.len > 2 {
            self.unlink(a);
            self.unlink(b);
            if a_prev == b {
                self.insert_after(a, b_prev)?;
                self.insert_after(b, a)?;
            } else if b_prev == a {
                self.insert_after(b, a_prev)?;
                self.insert_after(a, b)?;
            } else {
                self.insert_after(a, b_prev)?;
                self.insert_after(b, a_prev)?;
            }
        }
        if head == a {
            self.head = b;
        } else if head == b {
            self.head = a;
        }
        trace!(a, b, "swapped nodes");
        Ok(())
    }

    /// Relink node `n` to `target` and reverse the segment in between, the
    /// "2-opt" move of tour improvement heuristics.
    ///
    /// With the ring reading `n, s, .., target, t`, the segment `s..=target`
    /// is reversed so the ring reads `n, target, .., s, t` afterwards: the
    /// edges `(n, s)` and `(target, t)` are replaced by `(n, target)` and
    /// `(s, t)`. The length and the head do not change.
    ///
    /// # Errors
    ///
    /// - [`Error::DetachedNodeOperation`] if `n` or `target` is detached;
    /// - [`Error::InvalidArgument`] if `n == target`.
    ///
    /// The ring is not modified on error.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*k*) time, where *k* is the length
    /// of the reversed segment.
    ///
    /// # Examples
    ///
    /// ```
    /// use array_ring::Ring;
    ///
    /// let mut ring = Ring::<()>::from_order(&[0, 1, 2, 3, 4, 5]).unwrap();
    /// ring.reverse_segment(0, 3).unwrap();
    /// assert_eq!(ring.order(), vec![0, 3, 2, 1, 4, 5]);
    /// ```
    pub fn reverse_segment(&mut self, n: usize, target: usize) -> Result<()> {
        let (_, old_next) = self
            .links(n)
            .ok_or_else(|| rejected("reverse_segment", Error::DetachedNodeOperation))?;
        let (_, old_target_next) = self
            .links(target)
            .ok_or_else(|| rejected("reverse_segment", Error::DetachedNodeOperation))?;
        if n == target {
            return Err(rejected(
                "reverse_segment",
                Error::InvalidArgument(format!("cannot link node {} to itself", n)),
            ));
        }

        // Walk backwards from `target` to `old_next`, flipping links.
        let mut after = n;
        let mut cursor = Some(target);
        while let Some(current) = cursor {
            let node = &mut self.nodes[current];
            let before = node.prev;
            node.prev = Some(after);
            node.next = before;
            cursor = if current == old_next { None } else { before };
            after = current;
        }

        self.nodes[n].next = Some(target);
        self.connect(old_next, old_target_next);
        trace!(n, target, "reversed segment");
        Ok(())
    }

    /// Reverse the direction of the whole ring in place.
    ///
    /// The head stays the same, the traversal just goes the other way from it.
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
    /// let mut ring = Ring::<()>::from_order(&[2, 1, 0, 4, 3]).unwrap();
    /// ring.reverse().unwrap();
    /// assert_eq!(ring.order(), vec![0, 1, 2, 3, 4]);
    /// ```
    pub fn reverse(&mut self) -> Result<()> {
        if self.is_empty() {
            return Err(rejected("reverse", Error::EmptyRing));
        }
        let mut current = self.head;
        for _ in 0..self.len {
            let node = &mut self.nodes[current];
            std::mem::swap(&mut node.next, &mut node.prev);
            match node.next {
                Some(next) => current = next,
                None => break,
            }
        }
        trace!(len = self.len, "reversed ring");
        Ok(())
    }

    /// Verify the structure of the ring.
    ///
    /// Checks that every node is either detached or linked both ways to
    /// neighbours that link back to it, that the number of linked nodes is
    /// [`Ring::len`], and that they all sit on the single cycle through the
    /// head.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] describing the first violation found.
    pub fn check(&self) -> Result<()> {
        let count = self.nodes.len();
        let invalid = |msg: String| Err(Error::InvalidArgument(msg));

        let mut linked = 0;
        for (i, node) in self.nodes.iter().enumerate() {
            match (node.prev, node.next) {
                (None, None) => {}
                (Some(prev), Some(next)) => {
                    if prev >= count || next >= count {
                        return invalid(format!("node {} links outside of {} nodes", i, count));
                    }
                    if self.nodes[prev].next != Some(i) || self.nodes[next].prev != Some(i) {
                        return invalid(format!("node {} is not linked back by its neighbours", i));
                    }
                    linked += 1;
                }
                _ => return invalid(format!("node {} is only linked one way", i)),
            }
        }
        if linked != self.len {
            return invalid(format!(
                "{} nodes are linked but the length is {}",
                linked, self.len
            ));
        }
        if self.is_empty() {
            return Ok(());
        }

        if self.head >= count || self.nodes[self.head].is_detached() {
            return invalid(format!("head {} is not a linked node", self.head));
        }
        let mut current = self.head;
        for step in 1..=self.len {
            current = match self.nodes[current].next {
                Some(next) => next,
                None => return invalid(format!("node {} is detached mid-cycle", current)),
            };
            if current == self.head && step != self.len {
                return invalid(format!(
                    "the cycle through the head has {} nodes out of {}",
                    step, self.len
                ));
            }
        }
        Ok(())
    }
}
