use glam::{
  Vec2,
  Vec3,
  Vec4,
};

use crate::error::{LbsmError, LbsmResult};
use crate::skeleton::LbsmSkeleton;
use super::source::{LbsmSourceMesh, LbsmSkinSource};
use super::vertex::{
  LbsmGeometryVertex,
  LbsmColorTexVertex,
  LbsmSkinVertex,
  LBSM_MAX_INFLUENCES,
};

/// The triangle index buffer of one mesh.
/// The storage width is decided once per mesh: 2 byte indices whenever the
/// loop count stays within u16 range, 4 byte indices otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LbsmIndexBuffer {
  U16(Vec<u16>),
  U32(Vec<u32>),
}

/// The implementation of the index buffer.
impl LbsmIndexBuffer {
  /// Build the index buffer from loop indices.
  /// param loop_indices: The loop indices, three per triangle.
  /// param vertex_count: The loop vertex count of the mesh.
  /// return: The index buffer.
  pub fn new(loop_indices: &[u32], vertex_count: usize) -> Self {
    if vertex_count > u16::MAX as usize {
      Self::U32(loop_indices.to_vec())
    } else {
      Self::U16(loop_indices.iter().map(|&index| index as u16).collect())
    }
  }

  /// The byte stride of one index.
  /// return: 2 or 4.
  pub fn stride(&self) -> u32 {
    match self {
      Self::U16(_) => 2,
      Self::U32(_) => 4,
    }
  }

  /// The number of indices.
  /// return: The index count.
  pub fn len(&self) -> usize {
    match self {
      Self::U16(indices) => indices.len(),
      Self::U32(indices) => indices.len(),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// The raw little-endian bytes of the index list.
  /// return: The bytes.
  pub fn as_bytes(&self) -> &[u8] {
    match self {
      Self::U16(indices) => bytemuck::cast_slice(indices),
      Self::U32(indices) => bytemuck::cast_slice(indices),
    }
  }
}

/// The skinning data of one vertex buffer: the skeleton the blend indices
/// are local to and one packed record per loop vertex.
#[derive(Debug, Clone)]
pub struct LbsmSkinning {
  pub skeleton: LbsmSkeleton,
  pub vertices: Vec<LbsmSkinVertex>,
}

/// The implementation of the skinning data.
impl LbsmSkinning {
  /// The raw bytes of the skin stream.
  /// return: The bytes.
  pub fn vertex_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.vertices)
  }
}

/// The packed vertex streams of one mesh, ready for serialization.
#[derive(Debug, Clone)]
pub struct LbsmVertexBuffer {
  pub name: String,
  pub vertex_count: u32,
  pub geometry: Vec<LbsmGeometryVertex>,
  pub colortex: Vec<LbsmColorTexVertex>,
  pub indices: LbsmIndexBuffer,
  pub skinning: Option<LbsmSkinning>,
}

/// The implementation of the vertex buffer.
impl LbsmVertexBuffer {
  /// Convert a source mesh into packed vertex streams.
  ///
  /// A mesh without triangles or loops yields Ok(None), the distinct
  /// "no geometry" outcome; callers skip such objects and continue.
  /// param source: The source mesh.
  /// return: The vertex buffer, or None when the mesh has no geometry.
  pub fn from_mesh(source: &LbsmSourceMesh) -> LbsmResult<Option<Self>> {
    if source.triangles.is_empty() || source.loop_vertices.is_empty() {
      log::debug!("Mesh \"{}\" has no geometry.", source.name);
      return Ok(None);
    }

    let loop_count = source.loop_count();
    Self::validate(source, loop_count)?;
    log::debug!("Packing mesh \"{}\", {} loops, {} triangles.", source.name, loop_count, source.triangles.len());

    // Resolve the per loop normal from the owning triangle: the shared
    // vertex normal for smooth triangles, the face normal otherwise.
    let mut loop_normals = vec![Vec3::ZERO; loop_count];
    for triangle in source.triangles.iter() {
      for &loop_index in triangle.loops.iter() {
        let vertex_index = source.loop_vertices[loop_index as usize] as usize;
        loop_normals[loop_index as usize] = if triangle.smooth {
          source.vertex_normals[vertex_index]
        } else {
          triangle.normal
        };
      }
    }

    // Assemble the two interleaved streams, one record per loop vertex.
    // Absent attribute layers stay zero filled.
    let mut geometry = Vec::with_capacity(loop_count);
    let mut colortex = Vec::with_capacity(loop_count);
    for (loop_index, &vertex_index) in source.loop_vertices.iter().enumerate() {
      geometry.push(LbsmGeometryVertex {
        position: source.positions[vertex_index as usize].to_array(),
        normal: loop_normals[loop_index].to_array(),
        tangent: source.tangents.as_ref().map_or(Vec4::ZERO, |tangents| tangents[loop_index]).to_array(),
      });
      colortex.push(LbsmColorTexVertex {
        color: source.colors.as_ref().map_or(Vec4::ZERO, |colors| colors[loop_index]).to_array(),
        tex0: source.uvs0.as_ref().map_or(Vec2::ZERO, |uvs| uvs[loop_index]).to_array(),
        tex1: source.uvs1.as_ref().map_or(Vec2::ZERO, |uvs| uvs[loop_index]).to_array(),
      });
    }

    let skinning = match source.skin.as_ref() {
      Some(skin) => Some(Self::build_skinning(source, skin, loop_count)?),
      None => None,
    };

    // Three loop indices per triangle, in triangle order.
    let mut loop_indices = Vec::with_capacity(source.triangles.len() * 3);
    for triangle in source.triangles.iter() {
      loop_indices.extend_from_slice(&triangle.loops);
    }
    let indices = LbsmIndexBuffer::new(&loop_indices, loop_count);

    Ok(Some(Self {
      name: source.name.clone(),
      vertex_count: loop_count as u32,
      geometry,
      colortex,
      indices,
      skinning,
    }))
  }

  /// The raw bytes of the geometry stream.
  /// return: The bytes.
  pub fn geometry_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.geometry)
  }

  /// The raw bytes of the color/texture stream.
  /// return: The bytes.
  pub fn colortex_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.colortex)
  }

  fn validate(source: &LbsmSourceMesh, loop_count: usize) -> LbsmResult<()> {
    if source.vertex_normals.len() != source.positions.len() {
      return Err(Self::invalid(source, format!(
        "{} vertex normals for {} positions", source.vertex_normals.len(), source.positions.len()
      )));
    }
    for &vertex_index in source.loop_vertices.iter() {
      if vertex_index as usize >= source.positions.len() {
        return Err(Self::invalid(source, format!("loop vertex {} out of range", vertex_index)));
      }
    }
    for triangle in source.triangles.iter() {
      for &loop_index in triangle.loops.iter() {
        if loop_index as usize >= loop_count {
          return Err(Self::invalid(source, format!("triangle loop {} out of range", loop_index)));
        }
      }
    }
    if let Some(uvs) = source.uvs0.as_ref() {
      if uvs.len() != loop_count {
        return Err(Self::invalid(source, format!("{} uv0 entries for {} loops", uvs.len(), loop_count)));
      }
    }
    if let Some(uvs) = source.uvs1.as_ref() {
      if uvs.len() != loop_count {
        return Err(Self::invalid(source, format!("{} uv1 entries for {} loops", uvs.len(), loop_count)));
      }
    }
    if let Some(colors) = source.colors.as_ref() {
      if colors.len() != loop_count {
        return Err(Self::invalid(source, format!("{} color entries for {} loops", colors.len(), loop_count)));
      }
    }
    if let Some(tangents) = source.tangents.as_ref() {
      if tangents.len() != loop_count {
        return Err(Self::invalid(source, format!("{} tangent entries for {} loops", tangents.len(), loop_count)));
      }
    }
    if let Some(skin) = source.skin.as_ref() {
      for group in skin.groups.iter() {
        if group.weights.len() != source.positions.len() {
          return Err(Self::invalid(source, format!(
            "weight group \"{}\" has {} weights for {} vertices",
            group.joint, group.weights.len(), source.positions.len()
          )));
        }
      }
    }
    Ok(())
  }

  fn build_skinning(
    source: &LbsmSourceMesh,
    skin: &LbsmSkinSource,
    loop_count: usize,
  ) -> LbsmResult<LbsmSkinning> {
    // Map every weight group onto the index of its joint in the skeleton;
    // the blend indices of the skin stream are local to that list.
    let mut group_joints = Vec::with_capacity(skin.groups.len());
    for group in skin.groups.iter() {
      let joint_index = skin.skeleton.joints().iter()
        .position(|joint| joint.name == group.joint)
        .ok_or_else(|| LbsmError::UnknownJoint(group.joint.clone()))?;
      group_joints.push(joint_index as u16);
    }

    let mut vertices = Vec::with_capacity(loop_count);
    for &vertex_index in source.loop_vertices.iter() {
      let mut record = LbsmSkinVertex {
        weights: [0.0; LBSM_MAX_INFLUENCES],
        joints: [0; LBSM_MAX_INFLUENCES],
      };
      let mut slot = 0;
      for (group_index, group) in skin.groups.iter().enumerate() {
        let weight = group.weights[vertex_index as usize];
        if weight <= 0.0 {
          continue;
        }
        if slot == LBSM_MAX_INFLUENCES {
          // Influences past the fourth are dropped, without renormalization.
          break;
        }
        record.weights[slot] = weight;
        record.joints[slot] = group_joints[group_index];
        slot += 1;
      }
      vertices.push(record);
    }

    Ok(LbsmSkinning {
      skeleton: skin.skeleton.clone(),
      vertices,
    })
  }

  fn invalid(source: &LbsmSourceMesh, reason: String) -> LbsmError {
    LbsmError::InvalidMesh {
      name: source.name.clone(),
      reason,
    }
  }
}
