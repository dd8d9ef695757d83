//! Serde mapping of a `Ring`.
//!
//! A ring is written as a record with `head`, `length` and `nodes`, each node
//! holding `next`, `prev` and `value` in storage order. A missing link is
//! written as `-1`:
//!
//! ```text
//! {"head":0,"length":2,"nodes":[{"next":1,"prev":1,"value":"a"},{"next":0,"prev":0,"value":"b"}]}
//! ```
//!
//! Detached nodes are kept verbatim. On input, missing fields default to an
//! empty ring, missing links to detached, and missing values to
//! `T::default()`; the decoded ring must pass [`Ring::check`].

use std::convert::TryFrom;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ring::{Node, Ring};

const NONE: i64 = -1;

#[derive(Serialize)]
struct NodeRef<'a, T> {
    #[serde(serialize_with = "serialize_link")]
    next: Option<usize>,
    #[serde(serialize_with = "serialize_link")]
    prev: Option<usize>,
    value: &'a T,
}

struct Nodes<'a, T>(&'a [Node<T>]);

impl<T: Serialize> Serialize for Nodes<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|node| NodeRef {
            next: node.next,
            prev: node.prev,
            value: &node.value,
        }))
    }
}

impl<T: Serialize> Serialize for Ring<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Ring", 3)?;
        state.serialize_field("head", &self.head)?;
        state.serialize_field("length", &self.len)?;
        state.serialize_field("nodes", &Nodes(&self.nodes))?;
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
struct RawRing<T> {
    #[serde(default)]
    head: usize,
    #[serde(default)]
    length: usize,
    #[serde(default)]
    nodes: Vec<RawNode<T>>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
struct RawNode<T> {
    #[serde(default, deserialize_with = "deserialize_link")]
    next: Option<usize>,
    #[serde(default, deserialize_with = "deserialize_link")]
    prev: Option<usize>,
    #[serde(default)]
    value: T,
}

impl<'de, T> Deserialize<'de> for Ring<T>
where
    T: Deserialize<'de> + Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawRing::<T>::deserialize(deserializer)?;
        let ring = Ring {
            nodes: raw
                .nodes
                .into_iter()
                .map(|node| Node {
                    next: node.next,
                    prev: node.prev,
                    value: node.value,
                })
                .collect(),
            len: raw.length,
            head: raw.head,
        };
        if let Err(err) = ring.check() {
            debug!(%err, "rejected deserialized ring");
            return Err(de::Error::custom(err));
        }
        Ok(ring)
    }
}

fn serialize_link<S: Serializer>(link: &Option<usize>, serializer: S) -> Result<S::Ok, S::Error> {
    match *link {
        Some(n) => serializer.serialize_u64(n as u64),
        None => serializer.serialize_i64(NONE),
    }
}

/// Reads `-1` or `null` as a missing link.
fn deserialize_link<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<usize>, D::Error> {
    match Option::<i64>::deserialize(deserializer)? {
        None | Some(NONE) => Ok(None),
        Some(n) if n >= 0 => usize::try_from(n).map(Some).map_err(de::Error::custom),
        Some(n) => Err(de::Error::custom(format_args!(
            "invalid link {}, expected -1 or a node index",
            n
        ))),
    }
}

#[cfg(test)]
mod tests {
    use crate::ring::Ring;

    fn tour() -> Ring<Option<&'static str>> {
        let mut ring = Ring::from_order(&[2, 1, 0, 4, 3]).unwrap();
        ring.set_value(0, Some("hello"));
        ring.set_value(1, Some("world"));
        ring
    }

    #[test]
    fn ring_to_json() {
        let json = serde_json::to_string(&tour()).unwrap();
        assert_eq!(
            json,
            r#"{"head":0,"length":5,"nodes":[{"next":4,"prev":1,"value":"hello"},{"next":0,"prev":2,"value":"world"},{"next":1,"prev":3,"value":null},{"next":2,"prev":4,"value":null},{"next":3,"prev":0,"value":null}]}"#
        );
    }

    #[test]
    fn ring_json_round_trip() {
        let mut ring = tour();
        ring.detach(3);
        ring.swap(0, 4).unwrap();

        let json = serde_json::to_string(&ring).unwrap();
        assert!(json.contains(r#"{"next":-1,"prev":-1,"value":null}"#));

        let decoded: Ring<Option<String>> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.head(), ring.head());
        assert_eq!(decoded.len(), ring.len());
        assert_eq!(decoded.order(), ring.order());
        assert!(decoded.is_detached(3));
        for n in 0..ring.node_count() {
            assert_eq!(decoded.next(n), ring.next(n));
            assert_eq!(decoded.prev(n), ring.prev(n));
            assert_eq!(decoded.value(n).as_deref(), *ring.value(n));
        }
    }

    #[test]
    fn ring_from_json_defaults() {
        let ring: Ring<u32> = serde_json::from_str("{}").unwrap();
        assert!(ring.is_empty());
        assert_eq!(ring.node_count(), 0);

        let ring: Ring<u32> = serde_json::from_str(
            r#"{"length":2,"nodes":[{"next":1,"prev":1},{"next":0,"prev":0,"value":7},{"value":9}]}"#,
        )
        .unwrap();
        assert_eq!(ring.order(), vec![0, 1]);
        assert_eq!(ring[0], 0);
        assert_eq!(ring[1], 7);
        assert!(ring.is_detached(2));
        assert_eq!(ring[2], 9);

        let ring: Ring<u32> =
            serde_json::from_str(r#"{"nodes":[{"next":null,"prev":-1,"value":3}]}"#).unwrap();
        assert!(ring.is_empty());
        assert_eq!(ring[0], 3);
    }

    #[test]
    fn ring_from_json_rejects_broken_links() {
        let cases = [
            // out of range
            r#"{"length":1,"nodes":[{"next":1,"prev":0}]}"#,
            // below -1
            r#"{"length":1,"nodes":[{"next":-2,"prev":0}]}"#,
            // length disagrees with the links
            r#"{"length":3,"nodes":[{"next":1,"prev":1},{"next":0,"prev":0}]}"#,
            // one way only
            r#"{"length":1,"nodes":[{"next":0}]}"#,
            // head on a detached node
            r#"{"head":1,"length":1,"nodes":[{"next":0,"prev":0},{}]}"#,
        ];
        for json in cases.iter() {
            assert!(
                serde_json::from_str::<Ring<u32>>(json).is_err(),
                "accepted {}",
                json
            );
        }
    }
}
