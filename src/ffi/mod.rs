//! FFI bindings to the NVIDIA libraries.
//!
//! This module contains low-level C bindings resolved at runtime. Users
//! should prefer the safe Rust wrappers in the parent modules.

pub mod cudart;
pub mod cusolver;
pub mod cusparse;
pub mod error;
pub mod handles;
pub mod loader;
pub mod nvjpeg;
pub mod raw;

#[cfg(test)]
pub(crate) mod mock;

pub use cudart::CudartApi;
pub use cusolver::CusolverApi;
pub use cusparse::CusparseApi;
pub use error::{check, status_name};
pub use handles::*;
pub use nvjpeg::NvjpegApi;
pub use raw::*;
