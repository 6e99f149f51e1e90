use std::path::Path;

use crate::container::{
  self,
  LbsmChunk,
  LBSM_CHUNK_BIN,
  LBSM_CHUNK_JSON,
};
use crate::document::{
  LbsmAsset,
  LbsmAttribute,
  LbsmAttributeFormat,
  LbsmBufferView,
  LbsmIndices,
  LbsmMaterial,
  LbsmMesh,
  LbsmRoot,
  LbsmStream,
  LbsmSubMesh,
  LbsmVertexAttribute,
};
use crate::error::{LbsmError, LbsmResult};
use crate::mesh::{LbsmSourceMesh, LbsmVertexBuffer};
use crate::skeleton::LbsmJointTable;

/// The binary stream builder.
/// Appends opaque byte blocks and registers each one as a named buffer
/// view carrying its running byte offset into the final blob.
#[derive(Debug, Default)]
pub struct LbsmBinBuilder {
  stream: Vec<u8>,
  buffer_views: Vec<LbsmBufferView>,
}

/// The implementation of the binary stream builder.
impl LbsmBinBuilder {
  /// Create a new empty builder.
  /// return: The builder.
  pub fn new() -> Self {
    Self::default()
  }

  /// Append a block and register its byte range.
  /// param name: The buffer view name, unique across the file.
  /// param data: The block bytes.
  /// return: The registered buffer view.
  pub fn push(&mut self, name: &str, data: &[u8]) -> LbsmResult<LbsmBufferView> {
    if self.buffer_views.iter().any(|view| view.name == name) {
      return Err(LbsmError::DuplicateBufferView(name.to_string()));
    }
    let view = LbsmBufferView {
      name: name.to_string(),
      byte_offset: self.stream.len() as u32,
      byte_length: data.len() as u32,
    };
    self.stream.extend_from_slice(data);
    self.buffer_views.push(view.clone());
    Ok(view)
  }

  pub fn buffer_views(&self) -> &[LbsmBufferView] {
    &self.buffer_views
  }

  /// Consume the builder.
  /// return: The buffer view table and the concatenated blob.
  pub fn into_parts(self) -> (Vec<LbsmBufferView>, Vec<u8>) {
    (self.buffer_views, self.stream)
  }
}

/// The serializer of one export session.
/// It owns the joint table, so joints shared by several meshes resolve to
/// the same identifiers; overlapping exports must not share a serializer.
#[derive(Debug, Default)]
pub struct LbsmSerializer {
  joint_table: LbsmJointTable,
}

/// The implementation of the serializer.
impl LbsmSerializer {
  /// Create a new serializer.
  /// return: The serializer.
  pub fn new() -> Self {
    Self::default()
  }

  /// Assemble the root document and the binary blob.
  /// param buffers: The packed vertex buffers, one per exported mesh.
  /// return: The root document and the blob.
  pub fn build(mut self, buffers: &[LbsmVertexBuffer]) -> LbsmResult<(LbsmRoot, Vec<u8>)> {
    let mut bin = LbsmBinBuilder::new();
    let mut meshes = Vec::new();

    for (mesh_index, buffer) in buffers.iter().enumerate() {
      let name = format!("mesh{}", mesh_index);
      log::debug!("Serializing mesh \"{}\" as \"{}\".", buffer.name, name);

      bin.push(&format!("{}.vert", name), buffer.geometry_bytes())?;
      bin.push(&format!("{}.tex", name), buffer.colortex_bytes())?;
      bin.push(&format!("{}.indx", name), buffer.indices.as_bytes())?;

      let mut vertex_streams = vec![
        LbsmStream {
          buffer_view: format!("{}.vert", name),
          attributes: vec![
            attribute(LbsmVertexAttribute::Position, LbsmAttributeFormat::F32, 3),
            attribute(LbsmVertexAttribute::Normal, LbsmAttributeFormat::F32, 3),
            attribute(LbsmVertexAttribute::Tangent, LbsmAttributeFormat::F32, 4),
          ],
        },
        LbsmStream {
          buffer_view: format!("{}.tex", name),
          attributes: vec![
            attribute(LbsmVertexAttribute::Color, LbsmAttributeFormat::F32, 4),
            attribute(LbsmVertexAttribute::Tex0, LbsmAttributeFormat::F32, 2),
            attribute(LbsmVertexAttribute::Tex1, LbsmAttributeFormat::F32, 2),
          ],
        },
      ];

      let mut joints = Vec::new();
      if let Some(skinning) = buffer.skinning.as_ref() {
        bin.push(&format!("{}.skin", name), skinning.vertex_bytes())?;
        vertex_streams.push(LbsmStream {
          buffer_view: format!("{}.skin", name),
          attributes: vec![
            attribute(LbsmVertexAttribute::BlendWeights, LbsmAttributeFormat::F32, 4),
            attribute(LbsmVertexAttribute::BlendIndices, LbsmAttributeFormat::U16, 4),
          ],
        });
        // Resolve every skeleton joint; the blend indices of the skin
        // stream index into this list.
        for joint in skinning.skeleton.joints() {
          joints.push(self.joint_table.resolve(&skinning.skeleton, &joint.name)?);
        }
      }

      meshes.push(LbsmMesh {
        name: name.clone(),
        vertex_count: buffer.vertex_count,
        vertex_streams,
        indices: LbsmIndices {
          stride: buffer.indices.stride(),
          buffer_view: format!("{}.indx", name),
        },
        sub_meshes: vec![LbsmSubMesh {
          material: 0,
          draw_count: buffer.indices.len() as u32,
        }],
        joints,
      });
    }

    let (buffer_views, stream) = bin.into_parts();
    let root = LbsmRoot {
      asset: LbsmAsset {
        version: "alpha".to_string(),
        axes: None,
      },
      buffer_views,
      meshes,
      materials: vec![LbsmMaterial {
        name: "default".to_string(),
      }],
      joints: self.joint_table.into_joints(),
    };

    Ok((root, stream))
  }

  /// Serialize the vertex buffers into a container file.
  /// param path: The output file path.
  /// param buffers: The packed vertex buffers.
  /// return: The total byte length written.
  pub fn serialize<P: AsRef<Path>>(self, path: P, buffers: &[LbsmVertexBuffer]) -> LbsmResult<u64> {
    let (root, stream) = self.build(buffers)?;
    let json = serde_json::to_vec(&root)?;
    let chunks = [
      LbsmChunk::new(LBSM_CHUNK_JSON.to_vec(), json),
      LbsmChunk::new(LBSM_CHUNK_BIN.to_vec(), stream),
    ];
    container::write_chunks_to_path(path, &chunks)
  }
}

fn attribute(
  vertex_attribute: LbsmVertexAttribute,
  format: LbsmAttributeFormat,
  dimension: u32,
) -> LbsmAttribute {
  LbsmAttribute {
    vertex_attribute,
    format,
    dimension,
  }
}

/// Convert and serialize a list of source objects into a container file.
/// Objects without geometry are skipped, everything else is exported.
/// param path: The output file path.
/// param sources: The source meshes.
/// return: The total byte length written.
pub fn export_to_path<P: AsRef<Path>>(path: P, sources: &[LbsmSourceMesh]) -> LbsmResult<u64> {
  let mut buffers = Vec::new();
  for source in sources.iter() {
    match LbsmVertexBuffer::from_mesh(source)? {
      Some(buffer) => buffers.push(buffer),
      None => log::warn!("Object \"{}\" has no geometry, skipped.", source.name),
    }
  }
  LbsmSerializer::new().serialize(path, &buffers)
}
