//! This crate provides a circular doubly-linked list ("ring") whose nodes are
//! stored in a flat array and linked by index.
//!
//! The [`Ring`] allows detaching, reinserting and swapping nodes in constant
//! time, and reversing a segment of the ring (the "2-opt" move used by tour
//! improvement heuristics such as traveling-salesman local search) in time
//! proportional to the segment.
//!
//! Here is a quick example showing how the ring works.
//!
//! ```
//! use array_ring::Ring;
//!
//! // The tour [2, 1, 0, 4, 3] links 2 -> 1 -> 0 -> 4 -> 3 -> 2.
//! let mut ring = Ring::<()>::from_order(&[2, 1, 0, 4, 3]).unwrap();
//! assert_eq!(ring.order(), vec![0, 4, 3, 2, 1]); // read from the head, node 0
//!
//! ring.insert_after(0, 3).unwrap(); // move node 0 right after node 3
//! assert_eq!(ring.order(), vec![4, 3, 0, 2, 1]);
//!
//! ring.detach(3); // node 3 leaves the ring, but keeps its slot
//! assert_eq!(ring.order(), vec![4, 0, 2, 1]);
//! assert_eq!(ring.len(), 4);
//!
//! ring.insert_before(3, 4).unwrap(); // and comes back in
//! assert_eq!(ring.order(), vec![4, 0, 2, 1, 3]);
//! ```
//!
//! # Memory Layout
//!
//! The memory layout of the ring is like the following graph:
//! ```text
//!              ┌────────────────────────────────────────────────┐
//!              ↓                                                │
//!    ╔═══════════╗  ╔═══════════╗  ╔═══════════╗  ╔═══════════╗ │
//!    ║ next: 2   ║  ║ next: -1  ║  ║ next: 3   ║  ║ next: 0   ║ ─┘
//!    ╟───────────╢  ╟───────────╢  ╟───────────╢  ╟───────────╢
//!    ║ prev: 3   ║  ║ prev: -1  ║  ║ prev: 0   ║  ║ prev: 2   ║
//!    ╟───────────╢  ╟───────────╢  ╟───────────╢  ╟───────────╢
//!    ║ value T   ║  ║ value T   ║  ║ value T   ║  ║ value T   ║
//!    ╚═══════════╝  ╚═══════════╝  ╚═══════════╝  ╚═══════════╝
//!       Node 0     Node 1 (detached)   Node 2         Node 3
//!         ↑
//! ╔═══════════╗
//! ║  head: 0  ║
//! ╟───────────╢
//! ║  len: 3   ║
//! ╚═══════════╝
//!     Ring
//! ```
//! The `Ring` contains:
//! - the node storage, which only grows by appending, so the index of a node
//!   is a permanent handle to it;
//! - a length field `len` counting the linked nodes;
//! - a `head` index where traversals start.
//!
//! Each node contains:
//! - the `next` index of its successor;
//! - the `prev` index of its predecessor;
//! - the payload `T`.
//!
//! A detached node has neither link (written `-1` above), is not counted by
//! `len`, and is skipped by traversals. It still owns its payload, and can be
//! linked back in with [`insert_after`] or [`insert_before`].
//!
//! # Iteration
//!
//! Iterating over a ring is by the [`Iter`] iterator, which starts at the head
//! (or any linked node, with [`iter_from`]) and follows the `next` links until
//! it is back at the start. It yields `(index, &value)` pairs, and can also be
//! driven step by step as a cursor.
//!
//! ## Examples
//!
//! ```
//! use array_ring::Ring;
//!
//! let mut ring = Ring::new();
//! ring.add_with_value(1);
//! ring.add_with_value(10);
//! ring.add_with_value(100);
//!
//! let mut iter = ring.iter().unwrap();
//! assert_eq!(iter.next(), Some((0, &1)));
//! assert_eq!(iter.next(), Some((1, &10)));
//! assert_eq!(iter.next(), Some((2, &100)));
//! assert_eq!(iter.next(), None);
//! ```
//!
//! # Algorithms
//!
//! - [`swap`]: exchange the positions of two nodes;
//! - [`reverse_segment`]: the 2-opt move, relinking a node to a target and
//!   reversing the segment in between;
//! - [`reverse`]: reverse the direction of the whole ring.
//!
//! ## Examples
//!
//! ```
//! use array_ring::Ring;
//!
//! let mut ring = Ring::<()>::from_order(&[0, 1, 2, 3, 4, 5]).unwrap();
//!
//! ring.reverse_segment(0, 3).unwrap(); // edges (0, 1), (3, 4) become (0, 3), (1, 4)
//! assert_eq!(ring.order(), vec![0, 3, 2, 1, 4, 5]);
//!
//! ring.swap(2, 5).unwrap();
//! assert_eq!(ring.order(), vec![0, 3, 5, 1, 4, 2]);
//!
//! ring.reverse().unwrap();
//! assert_eq!(ring.order(), vec![0, 2, 4, 1, 5, 3]);
//! ```
//!
//! # Serialization
//!
//! With the `serde` feature (enabled by default), a ring serializes as a record
//! of `head`, `length` and every node slot, detached ones included, so that a
//! round trip restores it exactly.
//!
//! [`Ring`]: crate::Ring
//! [`Iter`]: crate::Iter
//! [`iter_from`]: crate::Ring::iter_from
//! [`insert_after`]: crate::Ring::insert_after
//! [`insert_before`]: crate::Ring::insert_before
//! [`swap`]: crate::Ring::swap
//! [`reverse_segment`]: crate::Ring::reverse_segment
//! [`reverse`]: crate::Ring::reverse

#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use ring::iterator::Iter;
#[doc(inline)]
pub use ring::Ring;

pub mod ring;

mod error;
