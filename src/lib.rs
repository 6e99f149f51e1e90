pub mod prelude;
pub mod error;
pub mod container;
pub mod document;
pub mod skeleton;
pub mod mesh;
pub mod serializer;
