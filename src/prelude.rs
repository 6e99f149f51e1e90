pub use crate::error::{
  LbsmError,
  LbsmResult,
};
pub use crate::container::{
  LbsmChunk,
  LbsmContainer,
};
pub use crate::document::LbsmRoot;
pub use crate::skeleton::{
  LbsmJoint,
  LbsmSkeleton,
  LbsmJointTable,
};
pub use crate::mesh::{
  LbsmSourceMesh,
  LbsmTriangle,
  LbsmSkinSource,
  LbsmWeightGroup,
  LbsmVertexBuffer,
};
pub use crate::serializer::{
  LbsmSerializer,
  export_to_path,
};
