//! cuSOLVER dense entry points (handle management and iterative refinement).

use std::os::raw::{c_double, c_int, c_void};
use std::path::Path;

use libloading::Library as SharedLibrary;

use super::handles::{CudaStreamHandle, CusolverDnHandle, IrsInfosHandle, IrsParamsHandle};
use super::loader;
use super::raw::StatusCode;
use crate::error::{Library, Result};

pub type FnGetProperty = unsafe extern "C" fn(kind: c_int, value: *mut c_int) -> StatusCode;

pub type FnDnCreate = unsafe extern "C" fn(handle: *mut CusolverDnHandle) -> StatusCode;
pub type FnDnDestroy = unsafe extern "C" fn(handle: CusolverDnHandle) -> StatusCode;
pub type FnDnSetStream =
    unsafe extern "C" fn(handle: CusolverDnHandle, stream: CudaStreamHandle) -> StatusCode;

pub type FnParamsCreate = unsafe extern "C" fn(params: *mut IrsParamsHandle) -> StatusCode;
pub type FnParamsDestroy = unsafe extern "C" fn(params: IrsParamsHandle) -> StatusCode;
pub type FnParamsSetInt = unsafe extern "C" fn(params: IrsParamsHandle, value: c_int) -> StatusCode;
pub type FnParamsSetDouble =
    unsafe extern "C" fn(params: IrsParamsHandle, value: c_double) -> StatusCode;
pub type FnParamsSetPrecisions =
    unsafe extern "C" fn(params: IrsParamsHandle, main: c_int, lowest: c_int) -> StatusCode;
pub type FnParamsGetInt =
    unsafe extern "C" fn(params: IrsParamsHandle, value: *mut c_int) -> StatusCode;
pub type FnParamsToggle = unsafe extern "C" fn(params: IrsParamsHandle) -> StatusCode;

pub type FnInfosCreate = unsafe extern "C" fn(infos: *mut IrsInfosHandle) -> StatusCode;
pub type FnInfosDestroy = unsafe extern "C" fn(infos: IrsInfosHandle) -> StatusCode;
pub type FnInfosGetInt =
    unsafe extern "C" fn(infos: IrsInfosHandle, value: *mut c_int) -> StatusCode;
pub type FnInfosRequestResidual = unsafe extern "C" fn(infos: IrsInfosHandle) -> StatusCode;
pub type FnInfosGetResidualHistory =
    unsafe extern "C" fn(infos: IrsInfosHandle, history: *mut *mut c_void) -> StatusCode;

pub type FnIrsXgesvBufferSize = unsafe extern "C" fn(
    handle: CusolverDnHandle,
    params: IrsParamsHandle,
    n: c_int,
    nrhs: c_int,
    lwork_bytes: *mut usize,
) -> StatusCode;
pub type FnIrsXgesv = unsafe extern "C" fn(
    handle: CusolverDnHandle,
    params: IrsParamsHandle,
    infos: IrsInfosHandle,
    n: c_int,
    nrhs: c_int,
    d_a: *mut c_void,
    ldda: c_int,
    d_b: *mut c_void,
    lddb: c_int,
    d_x: *mut c_void,
    lddx: c_int,
    d_workspace: *mut c_void,
    lwork_bytes: usize,
    niters: *mut c_int,
    d_info: *mut c_int,
) -> StatusCode;

/// Resolved cuSOLVER functions.
pub struct CusolverApi {
    pub(crate) _lib: Option<SharedLibrary>,
    pub(crate) get_property: FnGetProperty,
    pub(crate) dn_create: FnDnCreate,
    pub(crate) dn_destroy: FnDnDestroy,
    pub(crate) dn_set_stream: FnDnSetStream,
    pub(crate) params_create: FnParamsCreate,
    pub(crate) params_destroy: FnParamsDestroy,
    pub(crate) params_set_refinement_solver: FnParamsSetInt,
    pub(crate) params_set_solver_main_precision: FnParamsSetInt,
    pub(crate) params_set_solver_lowest_precision: FnParamsSetInt,
    pub(crate) params_set_solver_precisions: FnParamsSetPrecisions,
    pub(crate) params_set_tol: FnParamsSetDouble,
    pub(crate) params_set_tol_inner: FnParamsSetDouble,
    pub(crate) params_set_max_iters: FnParamsSetInt,
    pub(crate) params_set_max_iters_inner: FnParamsSetInt,
    pub(crate) params_get_max_iters: FnParamsGetInt,
    pub(crate) params_enable_fallback: FnParamsToggle,
    pub(crate) params_disable_fallback: FnParamsToggle,
    pub(crate) infos_create: FnInfosCreate,
    pub(crate) infos_destroy: FnInfosDestroy,
    pub(crate) infos_get_niters: FnInfosGetInt,
    pub(crate) infos_get_outer_niters: FnInfosGetInt,
    pub(crate) infos_get_max_iters: FnInfosGetInt,
    pub(crate) infos_request_residual: FnInfosRequestResidual,
    pub(crate) infos_get_residual_history: FnInfosGetResidualHistory,
    pub(crate) irs_xgesv_buffer_size: FnIrsXgesvBufferSize,
    pub(crate) irs_xgesv: FnIrsXgesv,
}

impl CusolverApi {
    /// Load from the default search path.
    pub fn load() -> Result<Self> {
        Self::resolve(loader::open(Library::Cusolver)?)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::resolve(loader::open_path(Library::Cusolver, path)?)
    }

    fn resolve(lib: SharedLibrary) -> Result<Self> {
        const L: Library = Library::Cusolver;
        unsafe {
            Ok(Self {
                get_property: loader::symbol(&lib, L, "cusolverGetProperty")?,
                dn_create: loader::symbol(&lib, L, "cusolverDnCreate")?,
                dn_destroy: loader::symbol(&lib, L, "cusolverDnDestroy")?,
                dn_set_stream: loader::symbol(&lib, L, "cusolverDnSetStream")?,
                params_create: loader::symbol(&lib, L, "cusolverDnIRSParamsCreate")?,
                params_destroy: loader::symbol(&lib, L, "cusolverDnIRSParamsDestroy")?,
                params_set_refinement_solver: loader::symbol(
                    &lib,
                    L,
                    "cusolverDnIRSParamsSetRefinementSolver",
                )?,
                params_set_solver_main_precision: loader::symbol(
                    &lib,
                    L,
                    "cusolverDnIRSParamsSetSolverMainPrecision",
                )?,
                params_set_solver_lowest_precision: loader::symbol(
                    &lib,
                    L,
                    "cusolverDnIRSParamsSetSolverLowestPrecision",
                )?,
                params_set_solver_precisions: loader::symbol(
                    &lib,
                    L,
                    "cusolverDnIRSParamsSetSolverPrecisions",
                )?,
                params_set_tol: loader::symbol(&lib, L, "cusolverDnIRSParamsSetTol")?,
                params_set_tol_inner: loader::symbol(&lib, L, "cusolverDnIRSParamsSetTolInner")?,
                params_set_max_iters: loader::symbol(&lib, L, "cusolverDnIRSParamsSetMaxIters")?,
                params_set_max_iters_inner: loader::symbol(
                    &lib,
                    L,
                    "cusolverDnIRSParamsSetMaxItersInner",
                )?,
                params_get_max_iters: loader::symbol(&lib, L, "cusolverDnIRSParamsGetMaxIters")?,
                params_enable_fallback: loader::symbol(
                    &lib,
                    L,
                    "cusolverDnIRSParamsEnableFallback",
                )?,
                params_disable_fallback: loader::symbol(
                    &lib,
                    L,
                    "cusolverDnIRSParamsDisableFallback",
                )?,
                infos_create: loader::symbol(&lib, L, "cusolverDnIRSInfosCreate")?,
                infos_destroy: loader::symbol(&lib, L, "cusolverDnIRSInfosDestroy")?,
                infos_get_niters: loader::symbol(&lib, L, "cusolverDnIRSInfosGetNiters")?,
                infos_get_outer_niters: loader::symbol(
                    &lib,
                    L,
                    "cusolverDnIRSInfosGetOuterNiters",
                )?,
                infos_get_max_iters: loader::symbol(&lib, L, "cusolverDnIRSInfosGetMaxIters")?,
                infos_request_residual: loader::symbol(
                    &lib,
                    L,
                    "cusolverDnIRSInfosRequestResidual",
                )?,
                infos_get_residual_history: loader::symbol(
                    &lib,
                    L,
                    "cusolverDnIRSInfosGetResidualHistory",
                )?,
                irs_xgesv_buffer_size: loader::symbol(&lib, L, "cusolverDnIRSXgesv_bufferSize")?,
                irs_xgesv: loader::symbol(&lib, L, "cusolverDnIRSXgesv")?,
                _lib: Some(lib),
            })
        }
    }
}
