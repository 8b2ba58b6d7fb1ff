//! Nested serialization of forests: every node becomes `{ key, model, children }`.
//! A node below several parents is written out once per parent.

use serde::ser::{Serialize, SerializeStruct, Serializer};

use super::{Forest, KeyComparer, TreeNode};

impl<K: Serialize, M: Serialize, C: KeyComparer<K>> Serialize for TreeNode<'_, K, M, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TreeNode", 3)?;
        state.serialize_field("key", self.key())?;
        state.serialize_field("model", self.model())?;
        state.serialize_field("children", &Children(*self))?;
        state.end()
    }
}

struct Children<'a, K, M, C: KeyComparer<K>>(TreeNode<'a, K, M, C>);

impl<K: Serialize, M: Serialize, C: KeyComparer<K>> Serialize for Children<'_, K, M, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.children())
    }
}

impl<K: Serialize, M: Serialize, C: KeyComparer<K>> Serialize for Forest<K, M, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Forest", 2)?;
        state.serialize_field("roots", &Roots(self))?;
        state.serialize_field("orphans", &Orphans(self))?;
        state.end()
    }
}

struct Roots<'a, K, M, C: KeyComparer<K>>(&'a Forest<K, M, C>);

impl<K: Serialize, M: Serialize, C: KeyComparer<K>> Serialize for Roots<'_, K, M, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

struct Orphans<'a, K, M, C: KeyComparer<K>>(&'a Forest<K, M, C>);

impl<K: Serialize, M: Serialize, C: KeyComparer<K>> Serialize for Orphans<'_, K, M, C> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.orphans())
    }
}
