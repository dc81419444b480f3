//! Safe Rust bindings for parts of the NVIDIA CUDA libraries.
//!
//! This crate wraps the cuSOLVER iterative refinement solver objects, the
//! cuSPARSE triangular solve descriptor and the nvJPEG decode/encode objects.
//! Each wrapper owns exactly one native handle: it is created by a checked
//! native call, every method forwards to the matching entry point and turns
//! a failing status into an [`Error`], and the handle is destroyed exactly
//! once, by `dispose()` or on drop.
//!
//! The vendor libraries are opened at runtime, so nothing needs to be
//! installed to build a crate that depends on this one. Set
//! `NVLIBS_CUDART_PATH`, `NVLIBS_CUSOLVER_PATH`, `NVLIBS_CUSPARSE_PATH` or
//! `NVLIBS_NVJPEG_PATH` to load a library from a specific file.
//!
//! # Example
//!
//! ```no_run
//! use nvlibs::{CudaRuntime, CusolverLib, Precision, Refinement};
//!
//! fn main() -> nvlibs::Result<()> {
//!     let cuda = CudaRuntime::load()?;
//!     let solver_lib = CusolverLib::load()?;
//!     println!("cuSOLVER {:?}", solver_lib.version()?);
//!
//!     let stream = cuda.create_stream()?;
//!     let mut solver = solver_lib.dense_solver()?;
//!     solver.set_stream(&stream)?;
//!
//!     // Solve in double precision, factorize in half precision
//!     let mut params = solver_lib.irs_params()?;
//!     params.set_solver_precisions(Precision::R64F, Precision::R16F)?;
//!     params.set_refinement_solver(Refinement::Classical)?;
//!     params.set_tol(1e-10)?;
//!     params.set_max_iters(50)?;
//!
//!     let lwork = solver.irs_xgesv_buffer_size(&params, 1024, 1)?;
//!     println!("workspace: {lwork} bytes");
//!     Ok(())
//! }
//! ```
//!
//! # Threading
//!
//! Wrappers may be moved to another thread but not shared: everything that
//! changes native state takes `&mut self`. nvJPEG objects borrow their
//! [`NvJpeg`] context and therefore stay on the thread that owns it. Work
//! submitted with a [`Stream`] runs asynchronously; only the methods
//! documented as synchronizing wait for it.

pub mod bitstream;
pub mod decode;
pub mod encode;
pub mod error;
mod ffi;
pub mod irs;
pub mod jpeg;
mod resource;
pub mod runtime;
pub mod solver;
pub mod sparse;
pub mod types;

// Re-export main types at the crate root
pub use bitstream::JpegStream;
pub use decode::DecodeParams;
pub use encode::{EncoderParams, EncoderState, Image};
pub use error::{Error, Library, Result, Status};
pub use irs::{IrsInfos, IrsParams};
pub use jpeg::{NvJpeg, NvjpegLib};
pub use runtime::{CudaRuntime, DeviceBuffer, Stream};
pub use solver::{CusolverLib, DenseSolver, IrsSystem};
pub use sparse::{CusparseLib, SparseContext, SpSmDescr};
pub use types::{
    ChromaSubsampling, ExifOrientation, InputFormat, JpegEncoding, OutputFormat, Precision,
    Refinement, Roi, ScaleFactor,
};

/// Raw native handle types, for passing wrapped objects to entry points this
/// crate does not cover.
pub mod sys {
    pub use crate::ffi::{
        CudaStreamHandle, CusolverDnHandle, CusparseHandle, DecodeParamsHandle, DevicePtr,
        EncoderParamsHandle, EncoderStateHandle, IrsInfosHandle, IrsParamsHandle,
        JpegStreamHandle, NvjpegHandle, RawHandle, SpSmDescrHandle, StatusCode,
    };
}
