pub mod source;
pub mod vertex;
pub mod buffer;

pub use source::{
  LbsmSourceMesh,
  LbsmTriangle,
  LbsmSkinSource,
  LbsmWeightGroup,
};
pub use vertex::{
  LbsmGeometryVertex,
  LbsmColorTexVertex,
  LbsmSkinVertex,
};
pub use buffer::{
  LbsmIndexBuffer,
  LbsmSkinning,
  LbsmVertexBuffer,
};
