//! CUDA runtime entry points.

use std::os::raw::{c_int, c_void};
use std::path::Path;

use libloading::Library as SharedLibrary;

use super::handles::{CudaStreamHandle, DevicePtr};
use super::loader;
use super::raw::StatusCode;
use crate::error::{Library, Result};

pub type FnRuntimeGetVersion = unsafe extern "C" fn(version: *mut c_int) -> StatusCode;
pub type FnStreamCreate = unsafe extern "C" fn(stream: *mut CudaStreamHandle) -> StatusCode;
pub type FnStreamDestroy = unsafe extern "C" fn(stream: CudaStreamHandle) -> StatusCode;
pub type FnStreamSynchronize = unsafe extern "C" fn(stream: CudaStreamHandle) -> StatusCode;
pub type FnMalloc = unsafe extern "C" fn(ptr: *mut DevicePtr, size: usize) -> StatusCode;
pub type FnFree = unsafe extern "C" fn(ptr: DevicePtr) -> StatusCode;
pub type FnMemcpy = unsafe extern "C" fn(
    dst: *mut c_void,
    src: *const c_void,
    count: usize,
    kind: c_int,
) -> StatusCode;

/// Resolved CUDA runtime functions.
pub struct CudartApi {
    pub(crate) _lib: Option<SharedLibrary>,
    pub(crate) runtime_get_version: FnRuntimeGetVersion,
    pub(crate) stream_create: FnStreamCreate,
    pub(crate) stream_destroy: FnStreamDestroy,
    pub(crate) stream_synchronize: FnStreamSynchronize,
    pub(crate) malloc: FnMalloc,
    pub(crate) free: FnFree,
    pub(crate) memcpy: FnMemcpy,
}

impl CudartApi {
    /// Load from the default search path.
    pub fn load() -> Result<Self> {
        Self::resolve(loader::open(Library::CudaRuntime)?)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::resolve(loader::open_path(Library::CudaRuntime, path)?)
    }

    fn resolve(lib: SharedLibrary) -> Result<Self> {
        const L: Library = Library::CudaRuntime;
        unsafe {
            Ok(Self {
                runtime_get_version: loader::symbol(&lib, L, "cudaRuntimeGetVersion")?,
                stream_create: loader::symbol(&lib, L, "cudaStreamCreate")?,
                stream_destroy: loader::symbol(&lib, L, "cudaStreamDestroy")?,
                stream_synchronize: loader::symbol(&lib, L, "cudaStreamSynchronize")?,
                malloc: loader::symbol(&lib, L, "cudaMalloc")?,
                free: loader::symbol(&lib, L, "cudaFree")?,
                memcpy: loader::symbol(&lib, L, "cudaMemcpy")?,
                _lib: Some(lib),
            })
        }
    }
}
