use thiserror::Error;

/// The error type of the lbsm-exporter crate.
#[derive(Error, Debug)]
pub enum LbsmError {
  /// The source mesh data is malformed (mismatched array lengths, out of range indices).
  #[error("invalid mesh \"{name}\": {reason}")]
  InvalidMesh {
    name: String,
    reason: String,
  },

  /// A joint references a parent name that is not part of the skeleton.
  #[error("unknown joint \"{0}\"")]
  UnknownJoint(String),

  /// The joint parent graph contains a cycle.
  #[error("cyclic joint hierarchy at \"{0}\"")]
  CyclicJointHierarchy(String),

  /// A chunk tag is not exactly 4 bytes.
  #[error("chunk tag must be 4 bytes, got {0}")]
  InvalidChunkTag(usize),

  /// A buffer view name was registered twice.
  #[error("duplicate buffer view \"{0}\"")]
  DuplicateBufferView(String),

  /// The written file length does not match the computed total byte length.
  #[error("written {written} bytes, computed {computed}")]
  SizeSelfCheckFailed {
    written: u64,
    computed: u64,
  },

  /// The decoded data does not start with the LBSM magic.
  #[error("bad magic, not an LBSM container")]
  BadMagic,

  /// The decoded container declares an unsupported format version.
  #[error("unsupported container version {0}")]
  UnsupportedVersion(u32),

  /// The declared total byte length does not match the actual data length.
  #[error("declared {declared} bytes, actual {actual}")]
  LengthMismatch {
    declared: u64,
    actual: u64,
  },

  /// A chunk extends past the end of the declared container length.
  #[error("truncated chunk at offset {0}")]
  TruncatedChunk(u64),

  /// The JSON metadata chunk could not be serialized or parsed.
  #[error("metadata error: {0}")]
  Metadata(#[from] serde_json::Error),

  /// An underlying file I/O operation failed.
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}

/// The result type of the lbsm-exporter crate.
pub type LbsmResult<T> = Result<T, LbsmError>;
