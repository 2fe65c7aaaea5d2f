use std::sync::Arc;
use turnflow_base::{generate_id_type, ObjectStoreContent};
use crate::Handler;

generate_id_type!(NodeId);

/// A named, ordered chain of [`Handler`]s
///
/// A position in a node is an index into its chain. An index at or past [`len`](Node::len) means the chain has run out.
pub struct Node {
  id: NodeId,
  name: String,
  chain: Vec<Arc<dyn Handler>>,
}

impl std::fmt::Debug for Node {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "Node({}, '{}', {} handlers)", self.id, self.name, self.chain.len())
  }
}

impl ObjectStoreContent for Node {
  type IdType = NodeId;

  fn new_id(id_val: u32) -> Self::IdType {
    NodeId::new(id_val)
  }

  fn id(&self) -> &Self::IdType {
    &self.id
  }
}

impl Node {
  pub fn new<S: Into<String>>(id: NodeId, name: S, chain: Vec<Arc<dyn Handler>>) -> Self {
    Node { id, name: name.into(), chain }
  }

  pub fn id(&self) -> &NodeId {
    &self.id
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn chain(&self) -> &[Arc<dyn Handler>] {
    &self.chain
  }

  pub fn len(&self) -> usize {
    self.chain.len()
  }

  pub fn is_empty(&self) -> bool {
    self.chain.is_empty()
  }
}
