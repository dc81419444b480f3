//! cuSPARSE handle and triangular solve descriptors.

use std::path::Path;
use std::sync::Arc;

use crate::error::{Library, Result};
use crate::ffi::{check, CusparseApi, CusparseHandle, SpSmDescrHandle, StatusCode};
use crate::resource::{Owned, Resource};
use crate::runtime::Stream;

/// The loaded cuSPARSE library.
#[derive(Clone)]
pub struct CusparseLib {
    api: Arc<CusparseApi>,
}

impl CusparseLib {
    /// Load cuSPARSE from the default search path (or `NVLIBS_CUSPARSE_PATH`).
    pub fn load() -> Result<Self> {
        Ok(Self::from_api(Arc::new(CusparseApi::load()?)))
    }

    /// Load cuSPARSE from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_api(Arc::new(CusparseApi::load_from(path.as_ref())?)))
    }

    pub(crate) fn from_api(api: Arc<CusparseApi>) -> Self {
        Self { api }
    }

    /// Create a cuSPARSE handle.
    pub fn context(&self) -> Result<SparseContext> {
        SparseContext::new(self)
    }

    /// Create an SpSM descriptor.
    pub fn spsm_descr(&self) -> Result<SpSmDescr> {
        SpSmDescr::new(self)
    }
}

impl Resource for CusparseHandle {
    type Api = CusparseApi;
    const KIND: &'static str = "SparseContext";
    const LIBRARY: Library = Library::Cusparse;
    const DESTROY: &'static str = "cusparseDestroy";

    unsafe fn destroy(self, api: &CusparseApi) -> StatusCode {
        (api.destroy)(self)
    }
}

/// Owned `cusparseHandle_t`.
pub struct SparseContext {
    inner: Owned<CusparseHandle>,
}

impl SparseContext {
    /// Create a cuSPARSE handle.
    pub fn new(lib: &CusparseLib) -> Result<Self> {
        let inner = Owned::<CusparseHandle>::create(lib.api.clone(), "cusparseCreate", |api, out| {
            unsafe { (api.create)(out) }
        })?;
        Ok(Self { inner })
    }

    /// Returns the inner handle.
    pub fn as_raw(&self) -> Result<CusparseHandle> {
        self.inner.raw()
    }

    /// Run later calls on `stream`.
    pub fn set_stream(&mut self, stream: &Stream) -> Result<()> {
        let stream = stream.as_raw()?;
        let (raw, api) = self.inner.get()?;
        let code = unsafe { (api.set_stream)(raw, stream) };
        check(Library::Cusparse, "cusparseSetStream", code)
    }

    /// Library version encoded as `major * 1000 + minor * 100 + patch`.
    pub fn version(&self) -> Result<i32> {
        let (raw, api) = self.inner.get()?;
        let mut version = 0;
        let code = unsafe { (api.get_version)(raw, &mut version) };
        check(Library::Cusparse, "cusparseGetVersion", code)?;
        Ok(version)
    }

    /// Destroy the native handle. Later calls are no-ops.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }

    /// Whether `dispose` has run.
    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

unsafe impl Send for SparseContext {}

impl Resource for SpSmDescrHandle {
    type Api = CusparseApi;
    const KIND: &'static str = "SpSmDescr";
    const LIBRARY: Library = Library::Cusparse;
    const DESTROY: &'static str = "cusparseSpSM_destroyDescr";

    unsafe fn destroy(self, api: &CusparseApi) -> StatusCode {
        (api.spsm_destroy_descr)(self)
    }
}

/// Owned `cusparseSpSMDescr_t`, the opaque state of a sparse triangular
/// solve with multiple right-hand sides.
///
/// The descriptor has no settable fields; it is handed to the SpSM
/// analysis and solve entry points through [`SpSmDescr::as_raw`].
pub struct SpSmDescr {
    inner: Owned<SpSmDescrHandle>,
}

impl SpSmDescr {
    /// Create an SpSM descriptor.
    pub fn new(lib: &CusparseLib) -> Result<Self> {
        let inner = Owned::<SpSmDescrHandle>::create(
            lib.api.clone(),
            "cusparseSpSM_createDescr",
            |api, out| unsafe { (api.spsm_create_descr)(out) },
        )?;
        Ok(Self { inner })
    }

    /// Returns the inner handle.
    pub fn as_raw(&self) -> Result<SpSmDescrHandle> {
        self.inner.raw()
    }

    /// Destroy the descriptor. Later calls are no-ops.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }

    /// Whether `dispose` has run.
    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

unsafe impl Send for SpSmDescr {}
