//! Fake native libraries for unit tests.
//!
//! Every fake entry point records its name, can be told to fail with a given
//! status, and keeps just enough native-side state (per handle) for setters,
//! getters and the encode/retrieve round trip to behave like the real thing.
//! State is thread-local, so parallel tests do not interfere.

use std::cell::RefCell;
use std::collections::HashMap;
use std::os::raw::{c_double, c_int, c_uint, c_void};
use std::sync::Arc;

use super::cudart::CudartApi;
use super::cusolver::CusolverApi;
use super::cusparse::CusparseApi;
use super::handles::*;
use super::nvjpeg::NvjpegApi;
use super::raw::*;

pub const CUDART_VERSION: c_int = 12040;
pub const CUSPARSE_VERSION: c_int = 12300;

#[derive(Default)]
struct Object {
    kind: &'static str,
    fields: HashMap<&'static str, i64>,
    bytes: Vec<u8>,
}

#[derive(Default)]
struct MockState {
    calls: Vec<&'static str>,
    failures: HashMap<&'static str, c_int>,
    objects: HashMap<usize, Object>,
    next_id: usize,
    retrieve_lengths: Vec<usize>,
}

thread_local! {
    static STATE: RefCell<MockState> = RefCell::new(MockState::default());
}

/// Forget all calls, failures and objects on this thread.
pub fn reset() {
    STATE.with(|s| *s.borrow_mut() = MockState::default());
}

/// Make every later call to `op` return `status`.
pub fn fail(op: &'static str, status: c_int) {
    STATE.with(|s| {
        s.borrow_mut().failures.insert(op, status);
    });
}

/// Entry points called so far, in order.
pub fn calls() -> Vec<&'static str> {
    STATE.with(|s| s.borrow().calls.clone())
}

/// Number of calls to `op` so far.
pub fn count(op: &str) -> usize {
    STATE.with(|s| s.borrow().calls.iter().filter(|c| **c == op).count())
}

/// Number of native objects not yet destroyed.
pub fn live_objects() -> usize {
    STATE.with(|s| s.borrow().objects.len())
}

/// Buffer lengths passed into the bitstream retrieval entry points.
pub fn retrieve_lengths() -> Vec<usize> {
    STATE.with(|s| s.borrow().retrieve_lengths.clone())
}

/// Value of a native-side field of a live object.
pub fn field(handle: *mut c_void, name: &str) -> Option<i64> {
    STATE.with(|s| {
        s.borrow()
            .objects
            .get(&(handle as usize))
            .and_then(|o| o.fields.get(name).copied())
    })
}

fn enter(op: &'static str) -> c_int {
    STATE.with(|s| {
        let mut s = s.borrow_mut();
        s.calls.push(op);
        s.failures.get(op).copied().unwrap_or(STATUS_SUCCESS)
    })
}

fn new_object(kind: &'static str) -> *mut c_void {
    STATE.with(|s| {
        let mut s = s.borrow_mut();
        s.next_id += 0x10;
        let id = 0x1000 + s.next_id;
        s.objects.insert(
            id,
            Object {
                kind,
                ..Default::default()
            },
        );
        id as *mut c_void
    })
}

fn remove(handle: *mut c_void, kind: &'static str) -> bool {
    STATE.with(|s| {
        let mut s = s.borrow_mut();
        let key = handle as usize;
        let found = s.objects.get(&key).map(|o| o.kind == kind).unwrap_or(false);
        if found {
            s.objects.remove(&key);
        }
        found
    })
}

fn exists(handle: *mut c_void, kind: &'static str) -> bool {
    STATE.with(|s| {
        s.borrow()
            .objects
            .get(&(handle as usize))
            .map(|o| o.kind == kind)
            .unwrap_or(false)
    })
}

fn set(handle: *mut c_void, name: &'static str, value: i64) -> bool {
    STATE.with(|s| match s.borrow_mut().objects.get_mut(&(handle as usize)) {
        Some(o) => {
            o.fields.insert(name, value);
            true
        }
        None => false,
    })
}

fn get(handle: *mut c_void, name: &str) -> Option<i64> {
    field(handle, name)
}

fn bytes(handle: *mut c_void) -> Option<Vec<u8>> {
    STATE.with(|s| {
        s.borrow()
            .objects
            .get(&(handle as usize))
            .map(|o| o.bytes.clone())
    })
}

fn set_bytes(handle: *mut c_void, data: Vec<u8>) {
    STATE.with(|s| {
        if let Some(o) = s.borrow_mut().objects.get_mut(&(handle as usize)) {
            o.bytes = data;
        }
    })
}

/// Fail with `$status` unless `$cond` holds.
macro_rules! ensure {
    ($cond:expr, $status:expr) => {
        if !$cond {
            return $status;
        }
    };
}

/// Record the call and return early if a failure was injected.
macro_rules! enter {
    ($op:literal) => {
        let injected = enter($op);
        if injected != STATUS_SUCCESS {
            return injected;
        }
    };
}

// ---------------------------------------------------------------------------
// CUDA runtime
// ---------------------------------------------------------------------------

unsafe extern "C" fn cuda_runtime_get_version(version: *mut c_int) -> c_int {
    enter!("cudaRuntimeGetVersion");
    *version = CUDART_VERSION;
    STATUS_SUCCESS
}

unsafe extern "C" fn cuda_stream_create(stream: *mut CudaStreamHandle) -> c_int {
    enter!("cudaStreamCreate");
    *stream = CudaStreamHandle::from_ptr(new_object("stream"));
    STATUS_SUCCESS
}

unsafe extern "C" fn cuda_stream_destroy(stream: CudaStreamHandle) -> c_int {
    enter!("cudaStreamDestroy");
    ensure!(remove(stream.as_ptr(), "stream"), CUDA_ERROR_INVALID_RESOURCE_HANDLE);
    STATUS_SUCCESS
}

unsafe extern "C" fn cuda_stream_synchronize(stream: CudaStreamHandle) -> c_int {
    enter!("cudaStreamSynchronize");
    ensure!(exists(stream.as_ptr(), "stream"), CUDA_ERROR_INVALID_RESOURCE_HANDLE);
    STATUS_SUCCESS
}

/// Device memory is plain host memory owned by the fake object.
unsafe extern "C" fn cuda_malloc(ptr: *mut DevicePtr, size: usize) -> c_int {
    enter!("cudaMalloc");
    let mut memory = vec![0u8; size];
    let address = memory.as_mut_ptr() as *mut c_void;
    STATE.with(|s| {
        s.borrow_mut().objects.insert(
            address as usize,
            Object {
                kind: "device",
                fields: HashMap::new(),
                bytes: memory,
            },
        );
    });
    *ptr = DevicePtr::from_ptr(address);
    STATUS_SUCCESS
}

unsafe extern "C" fn cuda_free(ptr: DevicePtr) -> c_int {
    enter!("cudaFree");
    ensure!(remove(ptr.as_ptr(), "device"), CUDA_ERROR_INVALID_VALUE);
    STATUS_SUCCESS
}

unsafe extern "C" fn cuda_memcpy(
    dst: *mut c_void,
    src: *const c_void,
    count: usize,
    _kind: c_int,
) -> c_int {
    enter!("cudaMemcpy");
    std::ptr::copy_nonoverlapping(src as *const u8, dst as *mut u8, count);
    STATUS_SUCCESS
}

pub fn cudart() -> Arc<CudartApi> {
    Arc::new(CudartApi {
        _lib: None,
        runtime_get_version: cuda_runtime_get_version,
        stream_create: cuda_stream_create,
        stream_destroy: cuda_stream_destroy,
        stream_synchronize: cuda_stream_synchronize,
        malloc: cuda_malloc,
        free: cuda_free,
        memcpy: cuda_memcpy,
    })
}

// ---------------------------------------------------------------------------
// cuSOLVER
// ---------------------------------------------------------------------------

const IRS_PARAMS: &str = "irs_params";
const IRS_INFOS: &str = "irs_infos";
const DN_HANDLE: &str = "cusolver_dn";
const RESIDUAL_HISTORY: usize = 0xdead0;

unsafe extern "C" fn cusolver_get_property(kind: c_int, value: *mut c_int) -> c_int {
    enter!("cusolverGetProperty");
    *value = match kind {
        MAJOR_VERSION => 11,
        MINOR_VERSION => 6,
        _ => 1,
    };
    STATUS_SUCCESS
}

unsafe extern "C" fn cusolver_dn_create(handle: *mut CusolverDnHandle) -> c_int {
    enter!("cusolverDnCreate");
    *handle = CusolverDnHandle::from_ptr(new_object(DN_HANDLE));
    STATUS_SUCCESS
}

unsafe extern "C" fn cusolver_dn_destroy(handle: CusolverDnHandle) -> c_int {
    enter!("cusolverDnDestroy");
    ensure!(remove(handle.as_ptr(), DN_HANDLE), CUSOLVER_STATUS_NOT_INITIALIZED);
    STATUS_SUCCESS
}

unsafe extern "C" fn cusolver_dn_set_stream(
    handle: CusolverDnHandle,
    stream: CudaStreamHandle,
) -> c_int {
    enter!("cusolverDnSetStream");
    ensure!(
        set(handle.as_ptr(), "stream", stream.as_ptr() as i64),
        CUSOLVER_STATUS_NOT_INITIALIZED
    );
    STATUS_SUCCESS
}

unsafe extern "C" fn irs_params_create(params: *mut IrsParamsHandle) -> c_int {
    enter!("cusolverDnIRSParamsCreate");
    let p = new_object(IRS_PARAMS);
    set(p, "max_iters", 50);
    *params = IrsParamsHandle::from_ptr(p);
    STATUS_SUCCESS
}

unsafe extern "C" fn irs_params_destroy(params: IrsParamsHandle) -> c_int {
    enter!("cusolverDnIRSParamsDestroy");
    ensure!(
        remove(params.as_ptr(), IRS_PARAMS),
        CUSOLVER_STATUS_IRS_PARAMS_NOT_INITIALIZED
    );
    STATUS_SUCCESS
}

fn params_set(params: IrsParamsHandle, name: &'static str, value: i64) -> c_int {
    ensure!(
        exists(params.as_ptr(), IRS_PARAMS),
        CUSOLVER_STATUS_IRS_PARAMS_NOT_INITIALIZED
    );
    set(params.as_ptr(), name, value);
    STATUS_SUCCESS
}

unsafe extern "C" fn irs_params_set_refinement_solver(p: IrsParamsHandle, v: c_int) -> c_int {
    enter!("cusolverDnIRSParamsSetRefinementSolver");
    params_set(p, "refinement", v as i64)
}

unsafe extern "C" fn irs_params_set_solver_main_precision(p: IrsParamsHandle, v: c_int) -> c_int {
    enter!("cusolverDnIRSParamsSetSolverMainPrecision");
    params_set(p, "main_precision", v as i64)
}

unsafe extern "C" fn irs_params_set_solver_lowest_precision(
    p: IrsParamsHandle,
    v: c_int,
) -> c_int {
    enter!("cusolverDnIRSParamsSetSolverLowestPrecision");
    params_set(p, "lowest_precision", v as i64)
}

unsafe extern "C" fn irs_params_set_solver_precisions(
    p: IrsParamsHandle,
    main: c_int,
    lowest: c_int,
) -> c_int {
    enter!("cusolverDnIRSParamsSetSolverPrecisions");
    let status = params_set(p, "main_precision", main as i64);
    ensure!(status == STATUS_SUCCESS, status);
    params_set(p, "lowest_precision", lowest as i64)
}

unsafe extern "C" fn irs_params_set_tol(p: IrsParamsHandle, v: c_double) -> c_int {
    enter!("cusolverDnIRSParamsSetTol");
    params_set(p, "tol", v.to_bits() as i64)
}

unsafe extern "C" fn irs_params_set_tol_inner(p: IrsParamsHandle, v: c_double) -> c_int {
    enter!("cusolverDnIRSParamsSetTolInner");
    params_set(p, "tol_inner", v.to_bits() as i64)
}

unsafe extern "C" fn irs_params_set_max_iters(p: IrsParamsHandle, v: c_int) -> c_int {
    enter!("cusolverDnIRSParamsSetMaxIters");
    ensure!(v > 0, CUSOLVER_STATUS_IRS_PARAMS_INVALID_MAXITER);
    params_set(p, "max_iters", v as i64)
}

unsafe extern "C" fn irs_params_set_max_iters_inner(p: IrsParamsHandle, v: c_int) -> c_int {
    enter!("cusolverDnIRSParamsSetMaxItersInner");
    ensure!(v > 0, CUSOLVER_STATUS_IRS_PARAMS_INVALID_MAXITER);
    params_set(p, "max_iters_inner", v as i64)
}

unsafe extern "C" fn irs_params_get_max_iters(p: IrsParamsHandle, v: *mut c_int) -> c_int {
    enter!("cusolverDnIRSParamsGetMaxIters");
    match get(p.as_ptr(), "max_iters") {
        Some(value) => {
            *v = value as c_int;
            STATUS_SUCCESS
        }
        None => CUSOLVER_STATUS_IRS_PARAMS_NOT_INITIALIZED,
    }
}

unsafe extern "C" fn irs_params_enable_fallback(p: IrsParamsHandle) -> c_int {
    enter!("cusolverDnIRSParamsEnableFallback");
    params_set(p, "fallback", 1)
}

unsafe extern "C" fn irs_params_disable_fallback(p: IrsParamsHandle) -> c_int {
    enter!("cusolverDnIRSParamsDisableFallback");
    params_set(p, "fallback", 0)
}

unsafe extern "C" fn irs_infos_create(infos: *mut IrsInfosHandle) -> c_int {
    enter!("cusolverDnIRSInfosCreate");
    let i = new_object(IRS_INFOS);
    set(i, "niters", 0);
    set(i, "outer_niters", 0);
    set(i, "max_iters", 0);
    *infos = IrsInfosHandle::from_ptr(i);
    STATUS_SUCCESS
}

unsafe extern "C" fn irs_infos_destroy(infos: IrsInfosHandle) -> c_int {
    enter!("cusolverDnIRSInfosDestroy");
    ensure!(
        remove(infos.as_ptr(), IRS_INFOS),
        CUSOLVER_STATUS_IRS_INFOS_NOT_INITIALIZED
    );
    STATUS_SUCCESS
}

fn infos_get(infos: IrsInfosHandle, name: &str, value: *mut c_int) -> c_int {
    ensure!(
        exists(infos.as_ptr(), IRS_INFOS),
        CUSOLVER_STATUS_IRS_INFOS_NOT_INITIALIZED
    );
    unsafe { *value = get(infos.as_ptr(), name).unwrap_or(0) as c_int };
    STATUS_SUCCESS
}

unsafe extern "C" fn irs_infos_get_niters(i: IrsInfosHandle, v: *mut c_int) -> c_int {
    enter!("cusolverDnIRSInfosGetNiters");
    infos_get(i, "niters", v)
}

unsafe extern "C" fn irs_infos_get_outer_niters(i: IrsInfosHandle, v: *mut c_int) -> c_int {
    enter!("cusolverDnIRSInfosGetOuterNiters");
    infos_get(i, "outer_niters", v)
}

unsafe extern "C" fn irs_infos_get_max_iters(i: IrsInfosHandle, v: *mut c_int) -> c_int {
    enter!("cusolverDnIRSInfosGetMaxIters");
    infos_get(i, "max_iters", v)
}

unsafe extern "C" fn irs_infos_request_residual(i: IrsInfosHandle) -> c_int {
    enter!("cusolverDnIRSInfosRequestResidual");
    ensure!(
        set(i.as_ptr(), "residual", 1),
        CUSOLVER_STATUS_IRS_INFOS_NOT_INITIALIZED
    );
    STATUS_SUCCESS
}

unsafe extern "C" fn irs_infos_get_residual_history(
    i: IrsInfosHandle,
    history: *mut *mut c_void,
) -> c_int {
    enter!("cusolverDnIRSInfosGetResidualHistory");
    ensure!(
        exists(i.as_ptr(), IRS_INFOS),
        CUSOLVER_STATUS_IRS_INFOS_NOT_INITIALIZED
    );
    ensure!(
        get(i.as_ptr(), "residual") == Some(1),
        CUSOLVER_STATUS_INVALID_VALUE
    );
    *history = RESIDUAL_HISTORY as *mut c_void;
    STATUS_SUCCESS
}

/// Workspace the fake solver asks for.
pub fn xgesv_workspace(n: c_int, nrhs: c_int) -> usize {
    n as usize * (n as usize + nrhs as usize) * 8
}

unsafe extern "C" fn irs_xgesv_buffer_size(
    handle: CusolverDnHandle,
    params: IrsParamsHandle,
    n: c_int,
    nrhs: c_int,
    lwork_bytes: *mut usize,
) -> c_int {
    enter!("cusolverDnIRSXgesv_bufferSize");
    ensure!(exists(handle.as_ptr(), DN_HANDLE), CUSOLVER_STATUS_NOT_INITIALIZED);
    ensure!(
        exists(params.as_ptr(), IRS_PARAMS),
        CUSOLVER_STATUS_IRS_PARAMS_NOT_INITIALIZED
    );
    *lwork_bytes = xgesv_workspace(n, nrhs);
    STATUS_SUCCESS
}

unsafe extern "C" fn irs_xgesv(
    handle: CusolverDnHandle,
    params: IrsParamsHandle,
    infos: IrsInfosHandle,
    n: c_int,
    nrhs: c_int,
    _d_a: *mut c_void,
    _ldda: c_int,
    _d_b: *mut c_void,
    _lddb: c_int,
    _d_x: *mut c_void,
    _lddx: c_int,
    d_workspace: *mut c_void,
    lwork_bytes: usize,
    niters: *mut c_int,
    d_info: *mut c_int,
) -> c_int {
    enter!("cusolverDnIRSXgesv");
    ensure!(exists(handle.as_ptr(), DN_HANDLE), CUSOLVER_STATUS_NOT_INITIALIZED);
    ensure!(
        exists(params.as_ptr(), IRS_PARAMS),
        CUSOLVER_STATUS_IRS_PARAMS_NOT_INITIALIZED
    );
    ensure!(
        exists(infos.as_ptr(), IRS_INFOS),
        CUSOLVER_STATUS_IRS_INFOS_NOT_INITIALIZED
    );
    ensure!(
        lwork_bytes >= xgesv_workspace(n, nrhs),
        CUSOLVER_STATUS_INVALID_WORKSPACE
    );

    let max_iters = get(params.as_ptr(), "max_iters").unwrap_or(50);
    set(infos.as_ptr(), "niters", 3);
    set(infos.as_ptr(), "outer_niters", 1);
    set(infos.as_ptr(), "max_iters", max_iters);
    set(infos.as_ptr(), "workspace", d_workspace as i64);
    *niters = 3;
    d_info.write_unaligned(0);
    STATUS_SUCCESS
}

pub fn cusolver() -> Arc<CusolverApi> {
    Arc::new(CusolverApi {
        _lib: None,
        get_property: cusolver_get_property,
        dn_create: cusolver_dn_create,
        dn_destroy: cusolver_dn_destroy,
        dn_set_stream: cusolver_dn_set_stream,
        params_create: irs_params_create,
        params_destroy: irs_params_destroy,
        params_set_refinement_solver: irs_params_set_refinement_solver,
        params_set_solver_main_precision: irs_params_set_solver_main_precision,
        params_set_solver_lowest_precision: irs_params_set_solver_lowest_precision,
        params_set_solver_precisions: irs_params_set_solver_precisions,
        params_set_tol: irs_params_set_tol,
        params_set_tol_inner: irs_params_set_tol_inner,
        params_set_max_iters: irs_params_set_max_iters,
        params_set_max_iters_inner: irs_params_set_max_iters_inner,
        params_get_max_iters: irs_params_get_max_iters,
        params_enable_fallback: irs_params_enable_fallback,
        params_disable_fallback: irs_params_disable_fallback,
        infos_create: irs_infos_create,
        infos_destroy: irs_infos_destroy,
        infos_get_niters: irs_infos_get_niters,
        infos_get_outer_niters: irs_infos_get_outer_niters,
        infos_get_max_iters: irs_infos_get_max_iters,
        infos_request_residual: irs_infos_request_residual,
        infos_get_residual_history: irs_infos_get_residual_history,
        irs_xgesv_buffer_size,
        irs_xgesv,
    })
}

// ---------------------------------------------------------------------------
// cuSPARSE
// ---------------------------------------------------------------------------

const SPARSE_HANDLE: &str = "cusparse";
const SPSM_DESCR: &str = "spsm_descr";

unsafe extern "C" fn cusparse_create(handle: *mut CusparseHandle) -> c_int {
    enter!("cusparseCreate");
    *handle = CusparseHandle::from_ptr(new_object(SPARSE_HANDLE));
    STATUS_SUCCESS
}

unsafe extern "C" fn cusparse_destroy(handle: CusparseHandle) -> c_int {
    enter!("cusparseDestroy");
    ensure!(remove(handle.as_ptr(), SPARSE_HANDLE), CUSPARSE_STATUS_NOT_INITIALIZED);
    STATUS_SUCCESS
}

unsafe extern "C" fn cusparse_set_stream(handle: CusparseHandle, stream: CudaStreamHandle) -> c_int {
    enter!("cusparseSetStream");
    ensure!(
        exists(handle.as_ptr(), SPARSE_HANDLE),
        CUSPARSE_STATUS_NOT_INITIALIZED
    );
    set(handle.as_ptr(), "stream", stream.as_ptr() as i64);
    STATUS_SUCCESS
}

unsafe extern "C" fn cusparse_get_version(handle: CusparseHandle, version: *mut c_int) -> c_int {
    enter!("cusparseGetVersion");
    ensure!(
        exists(handle.as_ptr(), SPARSE_HANDLE),
        CUSPARSE_STATUS_NOT_INITIALIZED
    );
    *version = CUSPARSE_VERSION;
    STATUS_SUCCESS
}

unsafe extern "C" fn cusparse_spsm_create_descr(descr: *mut SpSmDescrHandle) -> c_int {
    enter!("cusparseSpSM_createDescr");
    *descr = SpSmDescrHandle::from_ptr(new_object(SPSM_DESCR));
    STATUS_SUCCESS
}

unsafe extern "C" fn cusparse_spsm_destroy_descr(descr: SpSmDescrHandle) -> c_int {
    enter!("cusparseSpSM_destroyDescr");
    ensure!(remove(descr.as_ptr(), SPSM_DESCR), CUSPARSE_STATUS_INVALID_VALUE);
    STATUS_SUCCESS
}

pub fn cusparse() -> Arc<CusparseApi> {
    Arc::new(CusparseApi {
        _lib: None,
        create: cusparse_create,
        destroy: cusparse_destroy,
        set_stream: cusparse_set_stream,
        get_version: cusparse_get_version,
        spsm_create_descr: cusparse_spsm_create_descr,
        spsm_destroy_descr: cusparse_spsm_destroy_descr,
    })
}

// ---------------------------------------------------------------------------
// nvJPEG
// ---------------------------------------------------------------------------

const NVJPEG: &str = "nvjpeg";
const DECODE_PARAMS: &str = "decode_params";
const ENCODER_STATE: &str = "encoder_state";
const ENCODER_PARAMS: &str = "encoder_params";
const JPEG_STREAM: &str = "jpeg_stream";

/// Bitstream produced by the fake encoder: SOI, width, height, quality, EOI.
pub fn fake_jpeg(width: u16, height: u16, quality: u8) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());
    out.push(quality);
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

unsafe extern "C" fn nvjpeg_get_property(kind: c_int, value: *mut c_int) -> c_int {
    enter!("nvjpegGetProperty");
    *value = match kind {
        MAJOR_VERSION => 12,
        MINOR_VERSION => 3,
        _ => 1,
    };
    STATUS_SUCCESS
}

unsafe extern "C" fn nvjpeg_create_simple(handle: *mut NvjpegHandle) -> c_int {
    enter!("nvjpegCreateSimple");
    *handle = NvjpegHandle::from_ptr(new_object(NVJPEG));
    STATUS_SUCCESS
}

unsafe extern "C" fn nvjpeg_destroy(handle: NvjpegHandle) -> c_int {
    enter!("nvjpegDestroy");
    ensure!(remove(handle.as_ptr(), NVJPEG), NVJPEG_STATUS_INVALID_PARAMETER);
    STATUS_SUCCESS
}

unsafe extern "C" fn decode_params_create(
    handle: NvjpegHandle,
    params: *mut DecodeParamsHandle,
) -> c_int {
    enter!("nvjpegDecodeParamsCreate");
    ensure!(exists(handle.as_ptr(), NVJPEG), NVJPEG_STATUS_INVALID_PARAMETER);
    *params = DecodeParamsHandle::from_ptr(new_object(DECODE_PARAMS));
    STATUS_SUCCESS
}

unsafe extern "C" fn decode_params_destroy(params: DecodeParamsHandle) -> c_int {
    enter!("nvjpegDecodeParamsDestroy");
    ensure!(
        remove(params.as_ptr(), DECODE_PARAMS),
        NVJPEG_STATUS_INVALID_PARAMETER
    );
    STATUS_SUCCESS
}

fn decode_set(params: DecodeParamsHandle, name: &'static str, value: i64) -> c_int {
    ensure!(
        exists(params.as_ptr(), DECODE_PARAMS),
        NVJPEG_STATUS_INVALID_PARAMETER
    );
    set(params.as_ptr(), name, value);
    STATUS_SUCCESS
}

unsafe extern "C" fn decode_params_set_output_format(p: DecodeParamsHandle, v: c_int) -> c_int {
    enter!("nvjpegDecodeParamsSetOutputFormat");
    decode_set(p, "output_format", v as i64)
}

unsafe extern "C" fn decode_params_set_roi(
    p: DecodeParamsHandle,
    x: c_int,
    y: c_int,
    w: c_int,
    h: c_int,
) -> c_int {
    enter!("nvjpegDecodeParamsSetROI");
    ensure!(x >= 0 && y >= 0 && w >= -1 && h >= -1, NVJPEG_STATUS_INVALID_PARAMETER);
    for (name, value) in [("roi_x", x), ("roi_y", y), ("roi_w", w), ("roi_h", h)] {
        let status = decode_set(p, name, value as i64);
        ensure!(status == STATUS_SUCCESS, status);
    }
    STATUS_SUCCESS
}

unsafe extern "C" fn decode_params_set_allow_cmyk(p: DecodeParamsHandle, v: c_int) -> c_int {
    enter!("nvjpegDecodeParamsSetAllowCMYK");
    decode_set(p, "allow_cmyk", v as i64)
}

unsafe extern "C" fn decode_params_set_scale_factor(p: DecodeParamsHandle, v: c_int) -> c_int {
    enter!("nvjpegDecodeParamsSetScaleFactor");
    decode_set(p, "scale_factor", v as i64)
}

unsafe extern "C" fn decode_params_set_exif_orientation(p: DecodeParamsHandle, v: c_int) -> c_int {
    enter!("nvjpegDecodeParamsSetExifOrientation");
    decode_set(p, "exif_orientation", v as i64)
}

unsafe extern "C" fn encoder_state_create(
    handle: NvjpegHandle,
    state: *mut EncoderStateHandle,
    stream: CudaStreamHandle,
) -> c_int {
    enter!("nvjpegEncoderStateCreate");
    ensure!(exists(handle.as_ptr(), NVJPEG), NVJPEG_STATUS_INVALID_PARAMETER);
    let s = new_object(ENCODER_STATE);
    set(s, "stream", stream.as_ptr() as i64);
    *state = EncoderStateHandle::from_ptr(s);
    STATUS_SUCCESS
}

unsafe extern "C" fn encoder_state_destroy(state: EncoderStateHandle) -> c_int {
    enter!("nvjpegEncoderStateDestroy");
    ensure!(
        remove(state.as_ptr(), ENCODER_STATE),
        NVJPEG_STATUS_INVALID_PARAMETER
    );
    STATUS_SUCCESS
}

unsafe extern "C" fn encoder_params_create(
    handle: NvjpegHandle,
    params: *mut EncoderParamsHandle,
    _stream: CudaStreamHandle,
) -> c_int {
    enter!("nvjpegEncoderParamsCreate");
    ensure!(exists(handle.as_ptr(), NVJPEG), NVJPEG_STATUS_INVALID_PARAMETER);
    let p = new_object(ENCODER_PARAMS);
    set(p, "quality", 70);
    *params = EncoderParamsHandle::from_ptr(p);
    STATUS_SUCCESS
}

unsafe extern "C" fn encoder_params_destroy(params: EncoderParamsHandle) -> c_int {
    enter!("nvjpegEncoderParamsDestroy");
    ensure!(
        remove(params.as_ptr(), ENCODER_PARAMS),
        NVJPEG_STATUS_INVALID_PARAMETER
    );
    STATUS_SUCCESS
}

fn encoder_set(params: EncoderParamsHandle, name: &'static str, value: i64) -> c_int {
    ensure!(
        exists(params.as_ptr(), ENCODER_PARAMS),
        NVJPEG_STATUS_INVALID_PARAMETER
    );
    set(params.as_ptr(), name, value);
    STATUS_SUCCESS
}

unsafe extern "C" fn encoder_params_set_quality(
    p: EncoderParamsHandle,
    v: c_int,
    _s: CudaStreamHandle,
) -> c_int {
    enter!("nvjpegEncoderParamsSetQuality");
    encoder_set(p, "quality", v as i64)
}

unsafe extern "C" fn encoder_params_set_encoding(
    p: EncoderParamsHandle,
    v: c_int,
    _s: CudaStreamHandle,
) -> c_int {
    enter!("nvjpegEncoderParamsSetEncoding");
    encoder_set(p, "encoding", v as i64)
}

unsafe extern "C" fn encoder_params_set_optimized_huffman(
    p: EncoderParamsHandle,
    v: c_int,
    _s: CudaStreamHandle,
) -> c_int {
    enter!("nvjpegEncoderParamsSetOptimizedHuffman");
    encoder_set(p, "optimized_huffman", v as i64)
}

unsafe extern "C" fn encoder_params_set_sampling_factors(
    p: EncoderParamsHandle,
    v: c_int,
    _s: CudaStreamHandle,
) -> c_int {
    enter!("nvjpegEncoderParamsSetSamplingFactors");
    encoder_set(p, "sampling", v as i64)
}

fn copy_from_stream(
    state: EncoderStateHandle,
    params: EncoderParamsHandle,
    jpeg_stream: JpegStreamHandle,
    name: &'static str,
) -> c_int {
    ensure!(
        exists(state.as_ptr(), ENCODER_STATE),
        NVJPEG_STATUS_INVALID_PARAMETER
    );
    ensure!(
        exists(params.as_ptr(), ENCODER_PARAMS),
        NVJPEG_STATUS_INVALID_PARAMETER
    );
    ensure!(
        get(jpeg_stream.as_ptr(), "parsed") == Some(1),
        NVJPEG_STATUS_INVALID_PARAMETER
    );
    set(params.as_ptr(), name, 1);
    STATUS_SUCCESS
}

unsafe extern "C" fn encoder_params_copy_metadata(
    state: EncoderStateHandle,
    params: EncoderParamsHandle,
    jpeg_stream: JpegStreamHandle,
    _s: CudaStreamHandle,
) -> c_int {
    enter!("nvjpegEncoderParamsCopyMetadata");
    copy_from_stream(state, params, jpeg_stream, "metadata_copied")
}

unsafe extern "C" fn encoder_params_copy_huffman_tables(
    state: EncoderStateHandle,
    params: EncoderParamsHandle,
    jpeg_stream: JpegStreamHandle,
    _s: CudaStreamHandle,
) -> c_int {
    enter!("nvjpegEncoderParamsCopyHuffmanTables");
    copy_from_stream(state, params, jpeg_stream, "huffman_copied")
}

fn encode(
    handle: NvjpegHandle,
    state: EncoderStateHandle,
    params: EncoderParamsHandle,
    source: *const NvjpegImage,
    width: c_int,
    height: c_int,
) -> c_int {
    ensure!(exists(handle.as_ptr(), NVJPEG), NVJPEG_STATUS_INVALID_PARAMETER);
    ensure!(
        exists(state.as_ptr(), ENCODER_STATE),
        NVJPEG_STATUS_INVALID_PARAMETER
    );
    ensure!(
        exists(params.as_ptr(), ENCODER_PARAMS),
        NVJPEG_STATUS_INVALID_PARAMETER
    );
    ensure!(!source.is_null(), NVJPEG_STATUS_INVALID_PARAMETER);
    ensure!(
        (1..=i32::from(u16::MAX)).contains(&width) && (1..=i32::from(u16::MAX)).contains(&height),
        NVJPEG_STATUS_INVALID_PARAMETER
    );
    ensure!(
        unsafe { !(*source).channel[0].is_null() },
        NVJPEG_STATUS_INVALID_PARAMETER
    );

    let quality = get(params.as_ptr(), "quality").unwrap_or(70) as u8;
    set_bytes(
        state.as_ptr(),
        fake_jpeg(width as u16, height as u16, quality),
    );
    STATUS_SUCCESS
}

unsafe extern "C" fn encode_yuv(
    handle: NvjpegHandle,
    state: EncoderStateHandle,
    params: EncoderParamsHandle,
    source: *const NvjpegImage,
    _subsampling: c_int,
    width: c_int,
    height: c_int,
    _stream: CudaStreamHandle,
) -> c_int {
    enter!("nvjpegEncodeYUV");
    encode(handle, state, params, source, width, height)
}

unsafe extern "C" fn encode_image(
    handle: NvjpegHandle,
    state: EncoderStateHandle,
    params: EncoderParamsHandle,
    source: *const NvjpegImage,
    _format: c_int,
    width: c_int,
    height: c_int,
    _stream: CudaStreamHandle,
) -> c_int {
    enter!("nvjpegEncodeImage");
    encode(handle, state, params, source, width, height)
}

/// Null `data` reports the size; otherwise `*length` must be large enough.
unsafe fn retrieve(state: EncoderStateHandle, data: *mut u8, length: *mut usize) -> c_int {
    ensure!(
        exists(state.as_ptr(), ENCODER_STATE),
        NVJPEG_STATUS_INVALID_PARAMETER
    );
    let encoded = bytes(state.as_ptr()).unwrap_or_default();
    STATE.with(|s| s.borrow_mut().retrieve_lengths.push(*length));

    if data.is_null() {
        *length = encoded.len();
        return STATUS_SUCCESS;
    }

    ensure!(*length >= encoded.len(), NVJPEG_STATUS_INVALID_PARAMETER);
    std::ptr::copy_nonoverlapping(encoded.as_ptr(), data, encoded.len());
    *length = encoded.len();
    STATUS_SUCCESS
}

unsafe extern "C" fn encode_retrieve_bitstream(
    _handle: NvjpegHandle,
    state: EncoderStateHandle,
    data: *mut u8,
    length: *mut usize,
    _stream: CudaStreamHandle,
) -> c_int {
    enter!("nvjpegEncodeRetrieveBitstream");
    retrieve(state, data, length)
}

unsafe extern "C" fn encode_retrieve_bitstream_device(
    _handle: NvjpegHandle,
    state: EncoderStateHandle,
    data: *mut u8,
    length: *mut usize,
    _stream: CudaStreamHandle,
) -> c_int {
    enter!("nvjpegEncodeRetrieveBitstreamDevice");
    retrieve(state, data, length)
}

unsafe extern "C" fn jpeg_stream_create(
    handle: NvjpegHandle,
    jpeg_stream: *mut JpegStreamHandle,
) -> c_int {
    enter!("nvjpegJpegStreamCreate");
    ensure!(exists(handle.as_ptr(), NVJPEG), NVJPEG_STATUS_INVALID_PARAMETER);
    *jpeg_stream = JpegStreamHandle::from_ptr(new_object(JPEG_STREAM));
    STATUS_SUCCESS
}

unsafe extern "C" fn jpeg_stream_destroy(jpeg_stream: JpegStreamHandle) -> c_int {
    enter!("nvjpegJpegStreamDestroy");
    ensure!(
        remove(jpeg_stream.as_ptr(), JPEG_STREAM),
        NVJPEG_STATUS_INVALID_PARAMETER
    );
    STATUS_SUCCESS
}

/// Understands only the layout written by [`fake_jpeg`].
unsafe extern "C" fn jpeg_stream_parse(
    handle: NvjpegHandle,
    data: *const u8,
    length: usize,
    save_metadata: c_int,
    save_stream: c_int,
    jpeg_stream: JpegStreamHandle,
) -> c_int {
    enter!("nvjpegJpegStreamParse");
    ensure!(exists(handle.as_ptr(), NVJPEG), NVJPEG_STATUS_INVALID_PARAMETER);
    ensure!(
        exists(jpeg_stream.as_ptr(), JPEG_STREAM),
        NVJPEG_STATUS_INVALID_PARAMETER
    );
    ensure!(!data.is_null(), NVJPEG_STATUS_INVALID_PARAMETER);

    let bytes = std::slice::from_raw_parts(data, length);
    ensure!(bytes.len() >= 9, NVJPEG_STATUS_INCOMPLETE_BITSTREAM);
    ensure!(bytes[0] == 0xFF && bytes[1] == 0xD8, NVJPEG_STATUS_BAD_JPEG);

    let width = u16::from_be_bytes([bytes[2], bytes[3]]);
    let height = u16::from_be_bytes([bytes[4], bytes[5]]);
    let js = jpeg_stream.as_ptr();
    set(js, "parsed", 1);
    set(js, "width", width as i64);
    set(js, "height", height as i64);
    set(js, "metadata", save_metadata as i64);
    set(js, "saved_stream", save_stream as i64);
    STATUS_SUCCESS
}

unsafe extern "C" fn jpeg_stream_get_frame_dimensions(
    jpeg_stream: JpegStreamHandle,
    width: *mut c_uint,
    height: *mut c_uint,
) -> c_int {
    enter!("nvjpegJpegStreamGetFrameDimensions");
    ensure!(
        get(jpeg_stream.as_ptr(), "parsed") == Some(1),
        NVJPEG_STATUS_INVALID_PARAMETER
    );
    *width = get(jpeg_stream.as_ptr(), "width").unwrap_or(0) as c_uint;
    *height = get(jpeg_stream.as_ptr(), "height").unwrap_or(0) as c_uint;
    STATUS_SUCCESS
}

unsafe extern "C" fn jpeg_stream_get_components_num(
    jpeg_stream: JpegStreamHandle,
    components: *mut c_uint,
) -> c_int {
    enter!("nvjpegJpegStreamGetComponentsNum");
    ensure!(
        get(jpeg_stream.as_ptr(), "parsed") == Some(1),
        NVJPEG_STATUS_INVALID_PARAMETER
    );
    *components = 3;
    STATUS_SUCCESS
}

pub fn nvjpeg() -> Arc<NvjpegApi> {
    Arc::new(NvjpegApi {
        _lib: None,
        get_property: nvjpeg_get_property,
        create_simple: nvjpeg_create_simple,
        destroy: nvjpeg_destroy,
        decode_params_create,
        decode_params_destroy,
        decode_params_set_output_format,
        decode_params_set_roi,
        decode_params_set_allow_cmyk,
        decode_params_set_scale_factor,
        decode_params_set_exif_orientation,
        encoder_state_create,
        encoder_state_destroy,
        encoder_params_create,
        encoder_params_destroy,
        encoder_params_set_quality,
        encoder_params_set_encoding,
        encoder_params_set_optimized_huffman,
        encoder_params_set_sampling_factors,
        encoder_params_copy_metadata,
        encoder_params_copy_huffman_tables,
        encode_yuv,
        encode_image,
        encode_retrieve_bitstream,
        encode_retrieve_bitstream_device,
        jpeg_stream_create,
        jpeg_stream_destroy,
        jpeg_stream_parse,
        jpeg_stream_get_frame_dimensions,
        jpeg_stream_get_components_num,
    })
}
