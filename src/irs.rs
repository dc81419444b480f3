//! Iterative refinement solver configuration and results.
//!
//! [`IrsParams`] configures a mixed precision solve (precisions, refinement
//! method, tolerances, iteration limits); [`IrsInfos`] receives the
//! statistics of one solve. Both are passed to
//! [`DenseSolver::irs_xgesv`](crate::DenseSolver::irs_xgesv).

use std::os::raw::c_void;
use std::ptr;

use crate::error::{Library, Result};
use crate::ffi::{check, CusolverApi, IrsInfosHandle, IrsParamsHandle, StatusCode};
use crate::resource::{Owned, Resource};
use crate::solver::CusolverLib;
use crate::types::{Precision, Refinement};

impl Resource for IrsParamsHandle {
    type Api = CusolverApi;
    const KIND: &'static str = "IrsParams";
    const LIBRARY: Library = Library::Cusolver;
    const DESTROY: &'static str = "cusolverDnIRSParamsDestroy";

    unsafe fn destroy(self, api: &CusolverApi) -> StatusCode {
        (api.params_destroy)(self)
    }
}

/// Owned `cusolverDnIRSParams_t`.
pub struct IrsParams {
    inner: Owned<IrsParamsHandle>,
}

impl IrsParams {
    /// Create a parameter block with the library defaults.
    pub fn new(lib: &CusolverLib) -> Result<Self> {
        let inner =
            Owned::<IrsParamsHandle>::create(lib.api(), "cusolverDnIRSParamsCreate", |api, out| {
                unsafe { (api.params_create)(out) }
            })?;
        Ok(Self { inner })
    }

    /// Returns the inner handle.
    pub fn as_raw(&self) -> Result<IrsParamsHandle> {
        self.inner.raw()
    }

    fn call<F>(&self, op: &'static str, f: F) -> Result<()>
    where
        F: FnOnce(&CusolverApi, IrsParamsHandle) -> StatusCode,
    {
        let (raw, api) = self.inner.get()?;
        check(Library::Cusolver, op, f(api, raw))
    }

    /// Refinement method wrapped around the low precision factorization.
    pub fn set_refinement_solver(&mut self, solver: Refinement) -> Result<()> {
        self.call("cusolverDnIRSParamsSetRefinementSolver", |api, h| unsafe {
            (api.params_set_refinement_solver)(h, solver.into())
        })
    }

    /// Precision of the inputs and the solution.
    pub fn set_solver_main_precision(&mut self, precision: Precision) -> Result<()> {
        self.call("cusolverDnIRSParamsSetSolverMainPrecision", |api, h| unsafe {
            (api.params_set_solver_main_precision)(h, precision.into())
        })
    }

    /// Lowest precision the factorization may use.
    pub fn set_solver_lowest_precision(&mut self, precision: Precision) -> Result<()> {
        self.call("cusolverDnIRSParamsSetSolverLowestPrecision", |api, h| unsafe {
            (api.params_set_solver_lowest_precision)(h, precision.into())
        })
    }

    /// Set the main (input/output) and lowest (factorization) precisions.
    pub fn set_solver_precisions(&mut self, main: Precision, lowest: Precision) -> Result<()> {
        self.call("cusolverDnIRSParamsSetSolverPrecisions", |api, h| unsafe {
            (api.params_set_solver_precisions)(h, main.into(), lowest.into())
        })
    }

    /// Tolerance of the refinement solver.
    pub fn set_tol(&mut self, tol: f64) -> Result<()> {
        self.call("cusolverDnIRSParamsSetTol", |api, h| unsafe {
            (api.params_set_tol)(h, tol)
        })
    }

    /// Tolerance of the inner solver of a nested refinement (GMRES-GMRES).
    pub fn set_tol_inner(&mut self, tol: f64) -> Result<()> {
        self.call("cusolverDnIRSParamsSetTolInner", |api, h| unsafe {
            (api.params_set_tol_inner)(h, tol)
        })
    }

    /// Outer refinement iteration limit.
    pub fn set_max_iters(&mut self, max_iters: i32) -> Result<()> {
        self.call("cusolverDnIRSParamsSetMaxIters", |api, h| unsafe {
            (api.params_set_max_iters)(h, max_iters)
        })
    }

    /// Inner solver iteration limit, for the GMRES refinements.
    pub fn set_max_iters_inner(&mut self, max_iters: i32) -> Result<()> {
        self.call("cusolverDnIRSParamsSetMaxItersInner", |api, h| unsafe {
            (api.params_set_max_iters_inner)(h, max_iters)
        })
    }

    /// Current limit on the total number of refinement iterations.
    pub fn max_iters(&self) -> Result<i32> {
        let mut value = 0;
        self.call("cusolverDnIRSParamsGetMaxIters", |api, h| unsafe {
            (api.params_get_max_iters)(h, &mut value)
        })?;
        Ok(value)
    }

    /// Fall back to a full main precision solve if refinement does not converge.
    pub fn enable_fallback(&mut self) -> Result<()> {
        self.call("cusolverDnIRSParamsEnableFallback", |api, h| unsafe {
            (api.params_enable_fallback)(h)
        })
    }

    /// Do not fall back to a full precision solve when refinement fails to converge.
    pub fn disable_fallback(&mut self) -> Result<()> {
        self.call("cusolverDnIRSParamsDisableFallback", |api, h| unsafe {
            (api.params_disable_fallback)(h)
        })
    }

    /// Destroy the native object. Later calls are no-ops.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }

    /// Whether `dispose` has run.
    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

unsafe impl Send for IrsParams {}

impl Resource for IrsInfosHandle {
    type Api = CusolverApi;
    const KIND: &'static str = "IrsInfos";
    const LIBRARY: Library = Library::Cusolver;
    const DESTROY: &'static str = "cusolverDnIRSInfosDestroy";

    unsafe fn destroy(self, api: &CusolverApi) -> StatusCode {
        (api.infos_destroy)(self)
    }
}

/// Owned `cusolverDnIRSInfos_t`.
pub struct IrsInfos {
    inner: Owned<IrsInfosHandle>,
}

impl IrsInfos {
    /// Create an empty result block, filled by the next solve.
    pub fn new(lib: &CusolverLib) -> Result<Self> {
        let inner =
            Owned::<IrsInfosHandle>::create(lib.api(), "cusolverDnIRSInfosCreate", |api, out| {
                unsafe { (api.infos_create)(out) }
            })?;
        Ok(Self { inner })
    }

    /// Returns the inner handle.
    pub fn as_raw(&self) -> Result<IrsInfosHandle> {
        self.inner.raw()
    }

    fn get_int<F>(&self, op: &'static str, f: F) -> Result<i32>
    where
        F: FnOnce(&CusolverApi, IrsInfosHandle, &mut i32) -> StatusCode,
    {
        let (raw, api) = self.inner.get()?;
        let mut value = 0;
        check(Library::Cusolver, op, f(api, raw, &mut value))?;
        Ok(value)
    }

    /// Total iterations of the last solve.
    pub fn niters(&self) -> Result<i32> {
        self.get_int("cusolverDnIRSInfosGetNiters", |api, h, v| unsafe {
            (api.infos_get_niters)(h, v)
        })
    }

    /// Outer iterations of the last solve.
    pub fn outer_niters(&self) -> Result<i32> {
        self.get_int("cusolverDnIRSInfosGetOuterNiters", |api, h, v| unsafe {
            (api.infos_get_outer_niters)(h, v)
        })
    }

    /// Iteration limit that was in effect for the last solve.
    pub fn max_iters(&self) -> Result<i32> {
        self.get_int("cusolverDnIRSInfosGetMaxIters", |api, h, v| unsafe {
            (api.infos_get_max_iters)(h, v)
        })
    }

    /// Ask the next solve to record its residual norms.
    pub fn request_residual(&mut self) -> Result<()> {
        let (raw, api) = self.inner.get()?;
        let code = unsafe { (api.infos_request_residual)(raw) };
        check(Library::Cusolver, "cusolverDnIRSInfosRequestResidual", code)
    }

    /// Host pointer to the residual history of the last solve.
    ///
    /// The array is owned by the native object and stays valid until this
    /// `IrsInfos` is disposed; its element type follows the main precision.
    /// Requires [`IrsInfos::request_residual`] before the solve.
    pub fn residual_history(&self) -> Result<*mut c_void> {
        let (raw, api) = self.inner.get()?;
        let mut history = ptr::null_mut();
        let code = unsafe { (api.infos_get_residual_history)(raw, &mut history) };
        check(Library::Cusolver, "cusolverDnIRSInfosGetResidualHistory", code)?;
        Ok(history)
    }

    /// Destroy the native object. Later calls are no-ops.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }

    /// Whether `dispose` has run.
    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

unsafe impl Send for IrsInfos {}
