use glam::{
  Vec2,
  Vec3,
  Vec4,
};

use crate::skeleton::LbsmSkeleton;

/// One triangle of a source mesh: three loop indices, the face normal and
/// the smooth shading flag deciding which normal each corner receives.
#[derive(Debug, Clone)]
pub struct LbsmTriangle {
  pub loops: [u32; 3],
  pub normal: Vec3,
  pub smooth: bool,
}

/// The per joint weight array of a skinned mesh.
/// Weights are indexed by shared vertex, 0.0 means unbound.
#[derive(Debug, Clone)]
pub struct LbsmWeightGroup {
  pub joint: String,
  pub weights: Vec<f32>,
}

/// The skinning input of a source mesh: the skeleton it is bound to and
/// one weight group per influencing joint.
#[derive(Debug, Clone)]
pub struct LbsmSkinSource {
  pub skeleton: LbsmSkeleton,
  pub groups: Vec<LbsmWeightGroup>,
}

/// A triangulated, already transformed mesh handed over by the host.
///
/// Positions and normals are stored per shared vertex; every other
/// attribute layer is stored per loop. Loops are never welded, so the
/// exported vertex count equals the loop count.
#[derive(Debug, Clone, Default)]
pub struct LbsmSourceMesh {
  pub name: String,
  /// Per shared vertex.
  pub positions: Vec<Vec3>,
  /// Per shared vertex, used for smooth shaded corners.
  pub vertex_normals: Vec<Vec3>,
  /// Per loop, the shared vertex each loop belongs to.
  pub loop_vertices: Vec<u32>,
  /// Per loop, optional.
  pub uvs0: Option<Vec<Vec2>>,
  /// Per loop, optional.
  pub uvs1: Option<Vec<Vec2>>,
  /// Per loop, optional.
  pub colors: Option<Vec<Vec4>>,
  /// Per loop, optional.
  pub tangents: Option<Vec<Vec4>>,
  pub triangles: Vec<LbsmTriangle>,
  pub skin: Option<LbsmSkinSource>,
}

/// The implementation of the source mesh.
impl LbsmSourceMesh {
  /// The number of loop vertices the exported buffers will hold.
  /// return: The loop count.
  pub fn loop_count(&self) -> usize {
    self.loop_vertices.len()
  }
}
