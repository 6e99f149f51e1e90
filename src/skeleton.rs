use std::collections::HashMap;

use glam::Vec3;

use crate::document::LbsmResolvedJoint;
use crate::error::{LbsmError, LbsmResult};

/// A skeleton joint in bind pose, as supplied by the host.
/// The name is unique within one skeleton; a joint without a parent is a root.
#[derive(Debug, Clone)]
pub struct LbsmJoint {
  pub name: String,
  pub parent: Option<String>,
  pub head: Vec3,
  pub tail: Option<Vec3>,
  pub is_connected: bool,
}

/// The implementation of the joint.
impl LbsmJoint {
  /// Create a new root joint.
  /// param name: The joint name.
  /// param head: The bind pose position.
  /// return: The joint.
  pub fn new(name: &str, head: Vec3) -> Self {
    Self {
      name: name.to_string(),
      parent: None,
      head,
      tail: None,
      is_connected: false,
    }
  }

  /// Create a new joint with a parent.
  /// param name: The joint name.
  /// param parent: The parent joint name.
  /// param head: The bind pose position.
  /// return: The joint.
  pub fn with_parent(name: &str, parent: &str, head: Vec3) -> Self {
    Self {
      name: name.to_string(),
      parent: Some(parent.to_string()),
      head,
      tail: None,
      is_connected: false,
    }
  }
}

/// A skeleton is an ordered collection of joints.
#[derive(Debug, Clone, Default)]
pub struct LbsmSkeleton {
  joints: Vec<LbsmJoint>,
}

/// The implementation of the skeleton.
impl LbsmSkeleton {
  /// Create a new skeleton.
  /// param joints: The joints in host order.
  /// return: The skeleton.
  pub fn new(joints: Vec<LbsmJoint>) -> Self {
    Self {
      joints,
    }
  }

  pub fn joints(&self) -> &[LbsmJoint] {
    &self.joints
  }

  /// Find a joint by name.
  /// param name: The joint name.
  /// return: The joint, or None.
  pub fn joint(&self, name: &str) -> Option<&LbsmJoint> {
    self.joints.iter().find(|joint| joint.name == name)
  }
}

/// The flat joint table of one export session.
/// Resolution is memoized by joint name, so a joint shared by several
/// meshes is emitted exactly once no matter the visitation order, and a
/// parent always receives its identifier before any of its children.
#[derive(Debug, Default)]
pub struct LbsmJointTable {
  joints: Vec<LbsmResolvedJoint>,
  index_by_name: HashMap<String, u32>,
}

/// The implementation of the joint table.
impl LbsmJointTable {
  /// Create a new empty joint table.
  /// return: The joint table.
  pub fn new() -> Self {
    Self::default()
  }

  /// Resolve a joint to its stable identifier, registering it and all of
  /// its unregistered ancestors.
  /// param skeleton: The skeleton owning the joint.
  /// param name: The joint name.
  /// return: The joint identifier.
  pub fn resolve(&mut self, skeleton: &LbsmSkeleton, name: &str) -> LbsmResult<u32> {
    let mut pending = Vec::new();
    self.resolve_inner(skeleton, name, &mut pending)
  }

  fn resolve_inner(
    &mut self,
    skeleton: &LbsmSkeleton,
    name: &str,
    pending: &mut Vec<String>,
  ) -> LbsmResult<u32> {
    if let Some(index) = self.index_by_name.get(name) {
      return Ok(*index);
    }
    // A joint already on the resolution path means the parent graph loops.
    if pending.iter().any(|pending_name| pending_name == name) {
      return Err(LbsmError::CyclicJointHierarchy(name.to_string()));
    }

    let joint = skeleton
      .joint(name)
      .ok_or_else(|| LbsmError::UnknownJoint(name.to_string()))?
      .clone();

    // Resolve the parent first so ancestors always precede descendants.
    let parent = match joint.parent.as_deref() {
      Some(parent_name) => {
        pending.push(name.to_string());
        let parent_index = self.resolve_inner(skeleton, parent_name, pending)?;
        pending.pop();
        parent_index as i32
      },
      None => -1,
    };

    let index = self.joints.len() as u32;
    self.joints.push(LbsmResolvedJoint {
      name: joint.name.clone(),
      parent,
      head: joint.head.to_array(),
      tail: joint.tail.map(|tail| tail.to_array()),
      is_connected: joint.is_connected,
    });
    self.index_by_name.insert(joint.name, index);

    Ok(index)
  }

  pub fn joints(&self) -> &[LbsmResolvedJoint] {
    &self.joints
  }

  /// Consume the table and return the flat joint list.
  /// return: The resolved joints in identifier order.
  pub fn into_joints(self) -> Vec<LbsmResolvedJoint> {
    self.joints
  }
}
