use serde::{
  Deserialize, Serialize
};

/// The asset information of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LbsmAsset {
  pub version: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub axes: Option<String>,
}

/// A named byte range inside the binary chunk.
/// The name is unique across the whole file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LbsmBufferView {
  pub name: String,
  pub byte_offset: u32,
  pub byte_length: u32,
}

/// The semantic of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LbsmVertexAttribute {
  #[serde(rename = "position")]
  Position,
  #[serde(rename = "normal")]
  Normal,
  #[serde(rename = "tangent")]
  Tangent,
  #[serde(rename = "color")]
  Color,
  #[serde(rename = "tex0")]
  Tex0,
  #[serde(rename = "tex1")]
  Tex1,
  #[serde(rename = "blendWeights")]
  BlendWeights,
  #[serde(rename = "blendIndices")]
  BlendIndices,
}

/// The scalar format of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LbsmAttributeFormat {
  #[serde(rename = "f32")]
  F32,
  #[serde(rename = "u16")]
  U16,
  #[serde(rename = "u32")]
  U32,
}

/// One attribute declaration inside a vertex stream.
/// A reader can reconstruct the stream layout from these triples alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LbsmAttribute {
  pub vertex_attribute: LbsmVertexAttribute,
  pub format: LbsmAttributeFormat,
  pub dimension: u32,
}

/// One vertex stream of a mesh, a buffer view plus its attribute layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LbsmStream {
  pub buffer_view: String,
  pub attributes: Vec<LbsmAttribute>,
}

/// The index descriptor of a mesh. The stride is 2 or 4 bytes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LbsmIndices {
  pub stride: u32,
  pub buffer_view: String,
}

/// One submesh, a material reference plus the number of indices it draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LbsmSubMesh {
  pub material: u32,
  pub draw_count: u32,
}

/// One mesh entry of a document.
/// The joints list maps the local blend indices of the skin stream to
/// entries of the document joint table; it is empty for unskinned meshes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LbsmMesh {
  pub name: String,
  pub vertex_count: u32,
  pub vertex_streams: Vec<LbsmStream>,
  pub indices: LbsmIndices,
  pub sub_meshes: Vec<LbsmSubMesh>,
  pub joints: Vec<u32>,
}

/// A material stub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LbsmMaterial {
  pub name: String,
}

/// A joint after hierarchy flattening.
/// The parent is a table index, -1 marks a root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LbsmResolvedJoint {
  pub name: String,
  pub parent: i32,
  pub head: [f32; 3],
  pub tail: Option<[f32; 3]>,
  pub is_connected: bool,
}

/// The root document stored in the JSON chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LbsmRoot {
  pub asset: LbsmAsset,
  pub buffer_views: Vec<LbsmBufferView>,
  pub meshes: Vec<LbsmMesh>,
  pub materials: Vec<LbsmMaterial>,
  pub joints: Vec<LbsmResolvedJoint>,
}

impl LbsmRoot {
  /// Find a buffer view by name.
  /// param name: The buffer view name.
  /// return: The buffer view, or None.
  pub fn buffer_view(&self, name: &str) -> Option<&LbsmBufferView> {
    self.buffer_views.iter().find(|view| view.name == name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn attribute_keys_are_camel_case() {
    let attribute = LbsmAttribute {
      vertex_attribute: LbsmVertexAttribute::BlendWeights,
      format: LbsmAttributeFormat::F32,
      dimension: 4,
    };
    let text = serde_json::to_string(&attribute).unwrap();
    assert_eq!(text, r#"{"vertexAttribute":"blendWeights","format":"f32","dimension":4}"#);
  }

  #[test]
  fn resolved_joint_round_trips() {
    let joint = LbsmResolvedJoint {
      name: "root".to_string(),
      parent: -1,
      head: [0.0, 0.0, 1.0],
      tail: None,
      is_connected: false,
    };
    let text = serde_json::to_string(&joint).unwrap();
    assert!(text.contains(r#""parent":-1"#));
    assert!(text.contains(r#""tail":null"#));
    let back: LbsmResolvedJoint = serde_json::from_str(&text).unwrap();
    assert_eq!(back, joint);
  }
}
