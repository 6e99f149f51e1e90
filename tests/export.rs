use anyhow::Result;
use glam::{Vec2, Vec3};

use lbsm_exporter::prelude::*;
use lbsm_exporter::container::{
  write_chunks,
  LBSM_CHUNK_BIN,
  LBSM_CHUNK_JSON,
  LBSM_HEADER_SIZE,
  LBSM_VERSION,
};
use lbsm_exporter::document::{LbsmAttributeFormat, LbsmVertexAttribute};
use lbsm_exporter::mesh::LbsmVertexBuffer;

fn fan_mesh(name: &str, triangle_count: usize) -> LbsmSourceMesh {
  let loop_count = triangle_count * 3;
  LbsmSourceMesh {
    name: name.to_string(),
    positions: (0..loop_count).map(|i| Vec3::new(i as f32, 1.0, 2.0)).collect(),
    vertex_normals: vec![Vec3::Z; loop_count],
    loop_vertices: (0..loop_count as u32).collect(),
    uvs0: Some((0..loop_count).map(|i| Vec2::new(i as f32, 0.5)).collect()),
    triangles: (0..triangle_count)
      .map(|i| LbsmTriangle {
        loops: [(i * 3) as u32, (i * 3 + 1) as u32, (i * 3 + 2) as u32],
        normal: Vec3::Z,
        smooth: false,
      })
      .collect(),
    ..Default::default()
  }
}

fn two_joint_skeleton() -> LbsmSkeleton {
  LbsmSkeleton::new(vec![
    LbsmJoint::new("root", Vec3::ZERO),
    LbsmJoint::with_parent("child", "root", Vec3::new(0.0, 0.0, 0.5)),
  ])
}

fn skinned_fan(name: &str) -> LbsmSourceMesh {
  let mut source = fan_mesh(name, 1);
  let vertex_count = source.positions.len();
  source.skin = Some(LbsmSkinSource {
    skeleton: two_joint_skeleton(),
    groups: vec![
      LbsmWeightGroup {
        joint: "root".to_string(),
        weights: vec![0.5; vertex_count],
      },
      LbsmWeightGroup {
        joint: "child".to_string(),
        weights: vec![0.5; vertex_count],
      },
    ],
  });
  source
}

fn decode_root(container: &LbsmContainer) -> Result<LbsmRoot> {
  let json = container.chunk(&LBSM_CHUNK_JSON).expect("JSON chunk");
  Ok(serde_json::from_slice(json.data())?)
}

#[test]
fn unskinned_mesh_exports_two_streams() -> Result<()> {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("fan.lbsm");
  export_to_path(&path, &[fan_mesh("fan", 4)])?;

  let container = LbsmContainer::from_file(&path)?;
  assert_eq!(container.version, LBSM_VERSION);
  let root = decode_root(&container)?;

  assert_eq!(root.meshes.len(), 1);
  let mesh = &root.meshes[0];
  assert_eq!(mesh.name, "mesh0");
  assert_eq!(mesh.vertex_count, 12);
  assert_eq!(mesh.indices.stride, 2);
  assert_eq!(mesh.vertex_streams.len(), 2);
  assert!(mesh.joints.is_empty());
  assert_eq!(mesh.sub_meshes.len(), 1);
  assert_eq!(mesh.sub_meshes[0].material, 0);
  assert_eq!(mesh.sub_meshes[0].draw_count, 12);

  // The declared attribute triples describe the packed layout exactly.
  let geometry = &mesh.vertex_streams[0];
  assert_eq!(geometry.buffer_view, "mesh0.vert");
  assert_eq!(geometry.attributes[0].vertex_attribute, LbsmVertexAttribute::Position);
  assert_eq!(geometry.attributes[0].format, LbsmAttributeFormat::F32);
  assert_eq!(geometry.attributes[0].dimension, 3);
  let colortex = &mesh.vertex_streams[1];
  assert_eq!(colortex.buffer_view, "mesh0.tex");
  assert_eq!(colortex.attributes.len(), 3);

  // The geometry view holds 12 records of 40 bytes; the first position is
  // the first shared vertex.
  let bin = container.chunk(&LBSM_CHUNK_BIN).expect("BIN chunk");
  let view = root.buffer_view("mesh0.vert").expect("geometry view");
  assert_eq!(view.byte_length, 12 * 40);
  let begin = view.byte_offset as usize;
  let x = f32::from_le_bytes(bin.data()[begin..begin + 4].try_into()?);
  assert_eq!(x, 0.0);
  let y = f32::from_le_bytes(bin.data()[begin + 4..begin + 8].try_into()?);
  assert_eq!(y, 1.0);
  Ok(())
}

#[test]
fn oversized_mesh_switches_to_wide_indices() -> Result<()> {
  let loop_count = 70000;
  let source = LbsmSourceMesh {
    name: "big".to_string(),
    positions: vec![Vec3::ZERO],
    vertex_normals: vec![Vec3::Z],
    loop_vertices: vec![0; loop_count],
    triangles: (0..loop_count / 3)
      .map(|i| LbsmTriangle {
        loops: [(i * 3) as u32, (i * 3 + 1) as u32, (i * 3 + 2) as u32],
        normal: Vec3::Z,
        smooth: false,
      })
      .collect(),
    ..Default::default()
  };

  let dir = tempfile::tempdir()?;
  let path = dir.path().join("big.lbsm");
  export_to_path(&path, &[source])?;

  let root = decode_root(&LbsmContainer::from_file(&path)?)?;
  assert_eq!(root.meshes[0].vertex_count, 70000);
  assert_eq!(root.meshes[0].indices.stride, 4);
  Ok(())
}

#[test]
fn shared_skeleton_is_flattened_once() -> Result<()> {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("pair.lbsm");
  export_to_path(&path, &[skinned_fan("left"), skinned_fan("right")])?;

  let root = decode_root(&LbsmContainer::from_file(&path)?)?;
  assert_eq!(root.joints.len(), 2);
  let root_id = root.joints.iter().position(|joint| joint.name == "root").unwrap();
  let child = root.joints.iter().find(|joint| joint.name == "child").unwrap();
  assert_eq!(child.parent, root_id as i32);
  assert_eq!(root.joints[root_id].parent, -1);
  assert_eq!(root.meshes[0].joints, root.meshes[1].joints);
  assert_eq!(root.meshes[0].joints.len(), 2);

  // Both meshes carry their own skin stream.
  for mesh in root.meshes.iter() {
    assert_eq!(mesh.vertex_streams.len(), 3);
    let skin = &mesh.vertex_streams[2];
    assert_eq!(skin.attributes[0].vertex_attribute, LbsmVertexAttribute::BlendWeights);
    assert_eq!(skin.attributes[1].vertex_attribute, LbsmVertexAttribute::BlendIndices);
    assert_eq!(skin.attributes[1].format, LbsmAttributeFormat::U16);
  }
  Ok(())
}

#[test]
fn empty_scene_has_header_and_empty_binary_chunk() -> Result<()> {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("empty.lbsm");
  let byte_length = export_to_path(&path, &[])?;

  let data = std::fs::read(&path)?;
  assert_eq!(data.len() as u64, byte_length);

  let container = LbsmContainer::decode(&data)?;
  let root = decode_root(&container)?;
  assert!(root.meshes.is_empty());
  assert_eq!(root.asset.version, "alpha");

  let json = container.chunk(&LBSM_CHUNK_JSON).expect("JSON chunk");
  let bin = container.chunk(&LBSM_CHUNK_BIN).expect("BIN chunk");
  assert!(bin.data().is_empty());
  assert_eq!(
    byte_length,
    LBSM_HEADER_SIZE + (8 + json.data().len() as u64) + 8
  );
  Ok(())
}

#[test]
fn written_file_round_trips_byte_for_byte() -> Result<()> {
  let dir = tempfile::tempdir()?;
  let path = dir.path().join("roundtrip.lbsm");
  export_to_path(&path, &[fan_mesh("fan", 2), skinned_fan("skinned")])?;

  let encoded = std::fs::read(&path)?;
  let container = LbsmContainer::decode(&encoded)?;

  let mut reencoded = Vec::new();
  write_chunks(&mut reencoded, &container.chunks)?;
  assert_eq!(reencoded, encoded);

  // The decoded document parses back into the same shape it was built from.
  let root = decode_root(&container)?;
  let buffers = [
    LbsmVertexBuffer::from_mesh(&fan_mesh("fan", 2))?.unwrap(),
    LbsmVertexBuffer::from_mesh(&skinned_fan("skinned"))?.unwrap(),
  ];
  let (rebuilt, blob) = LbsmSerializer::new().build(&buffers)?;
  assert_eq!(rebuilt, root);
  assert_eq!(blob, container.chunk(&LBSM_CHUNK_BIN).unwrap().data());
  Ok(())
}
