use std::fs;
use std::io::{
  BufWriter,
  Write,
};
use std::path::Path;

use byteorder::{
  ByteOrder,
  LittleEndian,
  WriteBytesExt,
};

use crate::error::{LbsmError, LbsmResult};

/// The magic bytes at the start of every container file.
pub const LBSM_MAGIC: [u8; 4] = *b"LBSM";
/// The container format version.
pub const LBSM_VERSION: u32 = 1;
/// The byte size of the container header (magic, version, total length).
pub const LBSM_HEADER_SIZE: u64 = 12;
/// The tag of the metadata chunk.
pub const LBSM_CHUNK_JSON: [u8; 4] = *b"JSON";
/// The tag of the binary buffer chunk.
pub const LBSM_CHUNK_BIN: [u8; 4] = *b"BIN\0";

/// A length-prefixed, tagged block inside the container file.
/// The tag is stored unchecked and validated when the chunk set is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LbsmChunk {
  tag: Vec<u8>,
  data: Vec<u8>,
}

/// The implementation of the chunk.
impl LbsmChunk {
  /// Create a new chunk.
  /// param tag: The chunk tag, must be exactly 4 bytes to be encodable.
  /// param data: The chunk payload.
  /// return: The chunk.
  pub fn new(tag: impl Into<Vec<u8>>, data: Vec<u8>) -> Self {
    Self {
      tag: tag.into(),
      data,
    }
  }

  pub fn tag(&self) -> &[u8] {
    &self.tag
  }

  pub fn data(&self) -> &[u8] {
    &self.data
  }
}

/// Compute the total byte length of a container holding the given chunks.
/// param chunks: The chunks.
/// return: The header size plus every chunk's 8 byte prefix and payload.
pub fn total_byte_length(chunks: &[LbsmChunk]) -> u64 {
  let mut byte_length = LBSM_HEADER_SIZE;
  for chunk in chunks.iter() {
    byte_length += 8 + chunk.data.len() as u64;
  }
  byte_length
}

/// Encode the container into a writer.
/// Every chunk tag is validated before the first byte is written.
/// param w: The writer.
/// param chunks: The chunks, written in the given order.
/// return: The total byte length written.
pub fn write_chunks<W: Write>(w: &mut W, chunks: &[LbsmChunk]) -> LbsmResult<u64> {
  // Reject malformed tags before anything reaches the writer.
  for chunk in chunks.iter() {
    if chunk.tag.len() != 4 {
      return Err(LbsmError::InvalidChunkTag(chunk.tag.len()));
    }
  }

  let byte_length = total_byte_length(chunks);

  w.write_all(&LBSM_MAGIC)?;
  w.write_u32::<LittleEndian>(LBSM_VERSION)?;
  w.write_u32::<LittleEndian>(byte_length as u32)?;

  for chunk in chunks.iter() {
    w.write_u32::<LittleEndian>(chunk.data.len() as u32)?;
    w.write_all(&chunk.tag)?;
    w.write_all(&chunk.data)?;
  }

  Ok(byte_length)
}

/// Encode the container into a file and verify the written size.
/// param path: The output file path.
/// param chunks: The chunks.
/// return: The total byte length written.
pub fn write_chunks_to_path<P: AsRef<Path>>(path: P, chunks: &[LbsmChunk]) -> LbsmResult<u64> {
  let path = path.as_ref();
  let file = fs::File::create(path)?;
  let mut writer = BufWriter::new(file);
  let byte_length = write_chunks(&mut writer, chunks)?;
  writer.flush()?;
  drop(writer);

  // The on-disk size must match the computed total, anything else is an
  // integrity failure.
  let written = fs::metadata(path)?.len();
  if written != byte_length {
    return Err(LbsmError::SizeSelfCheckFailed {
      written,
      computed: byte_length,
    });
  }

  log::debug!("Wrote container \"{:?}\", {} bytes.", path, byte_length);
  Ok(byte_length)
}

/// A decoded container, the format version plus its chunks in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LbsmContainer {
  pub version: u32,
  pub chunks: Vec<LbsmChunk>,
}

/// The implementation of the container decoder.
impl LbsmContainer {
  /// Decode a container from bytes.
  /// param data: The complete container bytes.
  /// return: The decoded container.
  pub fn decode(data: &[u8]) -> LbsmResult<Self> {
    if data.len() < 4 || data[0..4] != LBSM_MAGIC {
      return Err(LbsmError::BadMagic);
    }
    if (data.len() as u64) < LBSM_HEADER_SIZE {
      return Err(LbsmError::TruncatedChunk(data.len() as u64));
    }

    let version = LittleEndian::read_u32(&data[4..8]);
    if version != LBSM_VERSION {
      return Err(LbsmError::UnsupportedVersion(version));
    }

    let declared = LittleEndian::read_u32(&data[8..12]) as u64;
    if declared != data.len() as u64 {
      return Err(LbsmError::LengthMismatch {
        declared,
        actual: data.len() as u64,
      });
    }

    // Walk the chunk list until the declared total is consumed.
    let mut chunks = Vec::new();
    let mut offset = LBSM_HEADER_SIZE as usize;
    while offset < data.len() {
      if offset + 8 > data.len() {
        return Err(LbsmError::TruncatedChunk(offset as u64));
      }
      let data_length = LittleEndian::read_u32(&data[offset..offset + 4]) as usize;
      let tag = data[offset + 4..offset + 8].to_vec();
      let begin = offset + 8;
      let end = begin + data_length;
      if end > data.len() {
        return Err(LbsmError::TruncatedChunk(offset as u64));
      }
      chunks.push(LbsmChunk {
        tag,
        data: data[begin..end].to_vec(),
      });
      offset = end;
    }

    Ok(Self {
      version,
      chunks,
    })
  }

  /// Decode a container from a file.
  /// param path: The file path.
  /// return: The decoded container.
  pub fn from_file<P: AsRef<Path>>(path: P) -> LbsmResult<Self> {
    let data = fs::read(path)?;
    Self::decode(&data)
  }

  /// Find a chunk by tag.
  /// param tag: The 4 byte chunk tag.
  /// return: The chunk, or None.
  pub fn chunk(&self, tag: &[u8; 4]) -> Option<&LbsmChunk> {
    self.chunks.iter().find(|chunk| chunk.tag == tag)
  }
}
