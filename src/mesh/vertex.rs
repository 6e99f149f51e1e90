use bytemuck::{
  Pod,
  Zeroable,
};

/// The number of weight slots of one skin vertex.
pub const LBSM_MAX_INFLUENCES: usize = 4;

/// One record of the geometry stream, 40 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LbsmGeometryVertex {
  pub position: [f32; 3],
  pub normal: [f32; 3],
  pub tangent: [f32; 4],
}

/// One record of the color/texture stream, 32 bytes.
/// tex1 is always reserved, the host may never fill it.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LbsmColorTexVertex {
  pub color: [f32; 4],
  pub tex0: [f32; 2],
  pub tex1: [f32; 2],
}

/// One record of the skin stream, 24 bytes.
/// Slots with zero weight are unused, their joint index is zero and
/// carries no meaning.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LbsmSkinVertex {
  pub weights: [f32; LBSM_MAX_INFLUENCES],
  pub joints: [u16; LBSM_MAX_INFLUENCES],
}
