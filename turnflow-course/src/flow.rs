use std::sync::Arc;
use turnflow_base::{IdError, ObjectStore};
use crate::{Error, Handler, Node, NodeId};

/// Middleware lists a node can be registered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowType {
  /// Runs before the main chain on every turn
  Incoming,
  /// Runs after the main chain unless the turn completed the conversation
  Outgoing,
}

/// Read access to a graph of [`Node`]s.
///
/// A [`Course`](crate::Course) only reads from the graph. One graph is typically shared by every in-flight turn.
pub trait FlowGraph: Send + Sync {
  /// Resolve a node by name
  fn node(&self, name: &str) -> Result<Arc<Node>, Error>;

  /// Nodes registered for `flow_type` in order, or every node in the graph when `None`.
  fn nodes(&self, flow_type: Option<FlowType>) -> Result<Vec<Arc<Node>>, Error>;
}

/// In-memory [`FlowGraph`]
///
/// # Examples
/// ```
/// # use turnflow_course::{Flow, FlowGraph, FlowType, CallbackHandler};
/// let mut flow = Flow::new();
/// flow.insert_node("welcome", vec![
///   CallbackHandler::new(|course| { course.next(); }).boxed(),
/// ]).unwrap();
/// flow.insert_node("filter", vec![]).unwrap();
/// flow.register(FlowType::Incoming, "filter").unwrap();
///
/// assert_eq!(flow.node("welcome").unwrap().len(), 1);
/// assert_eq!(flow.nodes(Some(FlowType::Incoming)).unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Flow {
  node_store: ObjectStore<Arc<Node>, NodeId>,
  incoming: Vec<NodeId>,
  outgoing: Vec<NodeId>,
}

impl Flow {
  pub fn new() -> Self {
    Self::with_capacity(0)
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Flow {
      node_store: ObjectStore::with_capacity(capacity),
      incoming: Vec::new(),
      outgoing: Vec::new(),
    }
  }

  /// Add a node. The first node added is where a conversation lands after it ends.
  pub fn insert_node<S: Into<String>>(&mut self, name: S, chain: Vec<Arc<dyn Handler>>) -> Result<NodeId, Error> {
    let name = name.into();
    let node_id = self.node_store.insert_new(
      Some(name.clone()),
      |id| Ok(Arc::new(Node::new(id, name, chain))))?;
    Ok(node_id)
  }

  /// Append an existing node to the `flow_type` middleware list
  pub fn register(&mut self, flow_type: FlowType, name: &str) -> Result<(), Error> {
    let node_id = *self.node_store
      .id_from_name(name)
      .ok_or_else(|| Error::NodeId(IdError::NoSuchName(name.to_owned())))?;

    let list = match flow_type {
      FlowType::Incoming => &mut self.incoming,
      FlowType::Outgoing => &mut self.outgoing,
    };
    if list.contains(&node_id) {
      return Err(Error::NodeId(IdError::NameAlreadyExists(name.to_owned())));
    }
    list.push(node_id);
    Ok(())
  }

  pub fn len(&self) -> usize {
    self.node_store.len()
  }

  pub fn is_empty(&self) -> bool {
    self.node_store.is_empty()
  }
}

impl FlowGraph for Flow {
  fn node(&self, name: &str) -> Result<Arc<Node>, Error> {
    self.node_store
      .get_by_name(name)
      .cloned()
      .ok_or_else(|| Error::NodeId(IdError::NoSuchName(name.to_owned())))
  }

  fn nodes(&self, flow_type: Option<FlowType>) -> Result<Vec<Arc<Node>>, Error> {
    let nodes: Vec<Arc<Node>> = match flow_type {
      None => self.node_store.iter().cloned().collect(),
      Some(FlowType::Incoming) => self.registered(&self.incoming)?,
      Some(FlowType::Outgoing) => self.registered(&self.outgoing)?,
    };
    if nodes.is_empty() {
      return Err(Error::NoNodes(flow_type));
    }
    Ok(nodes)
  }
}

impl Flow {
  fn registered(&self, ids: &[NodeId]) -> Result<Vec<Arc<Node>>, Error> {
    ids.iter()
      .map(|id| self.node_store.get(id).cloned().ok_or(Error::NodeId(IdError::IdMissing(*id))))
      .collect()
  }
}
