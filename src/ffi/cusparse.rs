//! cuSPARSE entry points (handle management and SpSM descriptors).

use std::os::raw::c_int;
use std::path::Path;

use libloading::Library as SharedLibrary;

use super::handles::{CudaStreamHandle, CusparseHandle, SpSmDescrHandle};
use super::loader;
use super::raw::StatusCode;
use crate::error::{Library, Result};

pub type FnCreate = unsafe extern "C" fn(handle: *mut CusparseHandle) -> StatusCode;
pub type FnDestroy = unsafe extern "C" fn(handle: CusparseHandle) -> StatusCode;
pub type FnSetStream =
    unsafe extern "C" fn(handle: CusparseHandle, stream: CudaStreamHandle) -> StatusCode;
pub type FnGetVersion =
    unsafe extern "C" fn(handle: CusparseHandle, version: *mut c_int) -> StatusCode;
pub type FnSpSmCreateDescr = unsafe extern "C" fn(descr: *mut SpSmDescrHandle) -> StatusCode;
pub type FnSpSmDestroyDescr = unsafe extern "C" fn(descr: SpSmDescrHandle) -> StatusCode;

/// Resolved cuSPARSE functions.
pub struct CusparseApi {
    pub(crate) _lib: Option<SharedLibrary>,
    pub(crate) create: FnCreate,
    pub(crate) destroy: FnDestroy,
    pub(crate) set_stream: FnSetStream,
    pub(crate) get_version: FnGetVersion,
    pub(crate) spsm_create_descr: FnSpSmCreateDescr,
    pub(crate) spsm_destroy_descr: FnSpSmDestroyDescr,
}

impl CusparseApi {
    /// Load from the default search path.
    pub fn load() -> Result<Self> {
        Self::resolve(loader::open(Library::Cusparse)?)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::resolve(loader::open_path(Library::Cusparse, path)?)
    }

    fn resolve(lib: SharedLibrary) -> Result<Self> {
        const L: Library = Library::Cusparse;
        unsafe {
            Ok(Self {
                create: loader::symbol(&lib, L, "cusparseCreate")?,
                destroy: loader::symbol(&lib, L, "cusparseDestroy")?,
                set_stream: loader::symbol(&lib, L, "cusparseSetStream")?,
                get_version: loader::symbol(&lib, L, "cusparseGetVersion")?,
                spsm_create_descr: loader::symbol(&lib, L, "cusparseSpSM_createDescr")?,
                spsm_destroy_descr: loader::symbol(&lib, L, "cusparseSpSM_destroyDescr")?,
                _lib: Some(lib),
            })
        }
    }
}
