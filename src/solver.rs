//! cuSOLVER dense handle and the iterative refinement solve.

use std::mem;
use std::path::Path;
use std::sync::Arc;

use tracing::trace;

use crate::error::{Error, Library, Result};
use crate::ffi::{self, check, CusolverApi, CusolverDnHandle, StatusCode};
use crate::irs::{IrsInfos, IrsParams};
use crate::resource::{Owned, Resource};
use crate::runtime::{DeviceBuffer, Stream};

/// The loaded cuSOLVER library.
#[derive(Clone)]
pub struct CusolverLib {
    api: Arc<CusolverApi>,
}

impl CusolverLib {
    /// Load cuSOLVER from the default search path (or `NVLIBS_CUSOLVER_PATH`).
    pub fn load() -> Result<Self> {
        Ok(Self::from_api(Arc::new(CusolverApi::load()?)))
    }

    /// Load cuSOLVER from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_api(Arc::new(CusolverApi::load_from(path.as_ref())?)))
    }

    pub(crate) fn from_api(api: Arc<CusolverApi>) -> Self {
        Self { api }
    }

    pub(crate) fn api(&self) -> Arc<CusolverApi> {
        self.api.clone()
    }

    /// Library version as `(major, minor, patch)`.
    pub fn version(&self) -> Result<(i32, i32, i32)> {
        let property = |kind| {
            let mut value = 0;
            let code = unsafe { (self.api.get_property)(kind, &mut value) };
            check(Library::Cusolver, "cusolverGetProperty", code).map(|()| value)
        };

        Ok((
            property(ffi::MAJOR_VERSION)?,
            property(ffi::MINOR_VERSION)?,
            property(ffi::PATCH_LEVEL)?,
        ))
    }

    /// Create a dense solver handle.
    pub fn dense_solver(&self) -> Result<DenseSolver> {
        DenseSolver::new(self)
    }

    /// Create an iterative refinement configuration object.
    pub fn irs_params(&self) -> Result<IrsParams> {
        IrsParams::new(self)
    }

    /// Create an iterative refinement result object.
    pub fn irs_infos(&self) -> Result<IrsInfos> {
        IrsInfos::new(self)
    }
}

impl Resource for CusolverDnHandle {
    type Api = CusolverApi;
    const KIND: &'static str = "DenseSolver";
    const LIBRARY: Library = Library::Cusolver;
    const DESTROY: &'static str = "cusolverDnDestroy";

    unsafe fn destroy(self, api: &CusolverApi) -> StatusCode {
        (api.dn_destroy)(self)
    }
}

/// A linear system `A * X = B` held in device memory, column major.
///
/// Leading dimensions are in elements; the element type follows the
/// main precision configured on the [`IrsParams`].
pub struct IrsSystem<'b> {
    pub n: i32,
    pub nrhs: i32,
    /// `n x n` matrix; overwritten by its factorization.
    pub a: &'b mut DeviceBuffer,
    pub lda: i32,
    /// `n x nrhs` right-hand sides.
    pub b: &'b DeviceBuffer,
    pub ldb: i32,
    /// `n x nrhs` solution.
    pub x: &'b mut DeviceBuffer,
    pub ldx: i32,
}

impl IrsSystem<'_> {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("n", self.n),
            ("nrhs", self.nrhs),
            ("lda", self.lda),
            ("ldb", self.ldb),
            ("ldx", self.ldx),
        ] {
            if value < 0 {
                return Err(Error::InvalidArgument(format!(
                    "{name} must be non-negative, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Owned `cusolverDnHandle_t`.
pub struct DenseSolver {
    inner: Owned<CusolverDnHandle>,
}

impl DenseSolver {
    /// Create a dense solver handle.
    pub fn new(lib: &CusolverLib) -> Result<Self> {
        let inner = Owned::<CusolverDnHandle>::create(lib.api(), "cusolverDnCreate", |api, out| {
            unsafe { (api.dn_create)(out) }
        })?;
        Ok(Self { inner })
    }

    /// Returns the inner handle.
    pub fn as_raw(&self) -> Result<CusolverDnHandle> {
        self.inner.raw()
    }

    /// Run later solver work on `stream`.
    pub fn set_stream(&mut self, stream: &Stream) -> Result<()> {
        let stream = stream.as_raw()?;
        let (raw, api) = self.inner.get()?;
        let code = unsafe { (api.dn_set_stream)(raw, stream) };
        check(Library::Cusolver, "cusolverDnSetStream", code)
    }

    /// Workspace size in bytes needed by [`DenseSolver::irs_xgesv`].
    pub fn irs_xgesv_buffer_size(&self, params: &IrsParams, n: i32, nrhs: i32) -> Result<usize> {
        if n < 0 || nrhs < 0 {
            return Err(Error::InvalidArgument(format!(
                "n and nrhs must be non-negative, got {n} and {nrhs}"
            )));
        }

        let params = params.as_raw()?;
        let (raw, api) = self.inner.get()?;
        let mut lwork = 0usize;
        let code = unsafe { (api.irs_xgesv_buffer_size)(raw, params, n, nrhs, &mut lwork) };
        check(Library::Cusolver, "cusolverDnIRSXgesv_bufferSize", code)?;
        Ok(lwork)
    }

    /// Solve `system` with mixed precision iterative refinement.
    ///
    /// Returns the iteration count reported by the solver (negative when it
    /// fell back to the main precision). `info` receives the device-side
    /// factorization status as one `i32`. Per-solve statistics land in
    /// `infos`.
    pub fn irs_xgesv(
        &self,
        params: &IrsParams,
        infos: &mut IrsInfos,
        system: IrsSystem<'_>,
        workspace: &mut DeviceBuffer,
        info: &mut DeviceBuffer,
    ) -> Result<i32> {
        system.validate()?;
        if info.len() < mem::size_of::<i32>() {
            return Err(Error::BufferTooSmall {
                required: mem::size_of::<i32>(),
                available: info.len(),
            });
        }

        let params = params.as_raw()?;
        let infos = infos.as_raw()?;
        let a = system.a.as_raw()?;
        let b = system.b.as_raw()?;
        let x = system.x.as_raw()?;
        let work = workspace.as_raw()?;
        let d_info = info.as_raw()?;
        let (raw, api) = self.inner.get()?;

        let mut niters = 0;
        let code = unsafe {
            (api.irs_xgesv)(
                raw,
                params,
                infos,
                system.n,
                system.nrhs,
                a.as_ptr(),
                system.lda,
                b.as_ptr(),
                system.ldb,
                x.as_ptr(),
                system.ldx,
                work.as_ptr(),
                workspace.len(),
                &mut niters,
                d_info.as_ptr() as *mut i32,
            )
        };
        check(Library::Cusolver, "cusolverDnIRSXgesv", code)?;
        trace!(n = system.n, nrhs = system.nrhs, niters, "irs solve done");
        Ok(niters)
    }

    /// Destroy the handle. Later calls are no-ops.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }

    /// Whether `dispose` has run.
    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

unsafe impl Send for DenseSolver {}
