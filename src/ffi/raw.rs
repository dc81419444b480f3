//! Raw C types and constants shared by the native libraries.
//!
//! Values match the vendor headers (`cuda_runtime_api.h`, `cusolver_common.h`,
//! `cusparse.h`, `nvjpeg.h`). Users should prefer the typed enums in
//! [`crate::types`].

use std::os::raw::c_int;

/// Status code returned by every native entry point.
pub type StatusCode = c_int;

/// Success value, shared by all four libraries.
pub const STATUS_SUCCESS: StatusCode = 0;

// cudaError_t (subset)
pub const CUDA_ERROR_INVALID_VALUE: StatusCode = 1;
pub const CUDA_ERROR_MEMORY_ALLOCATION: StatusCode = 2;
pub const CUDA_ERROR_INITIALIZATION: StatusCode = 3;
pub const CUDA_ERROR_CUDART_UNLOADING: StatusCode = 4;
pub const CUDA_ERROR_INSUFFICIENT_DRIVER: StatusCode = 35;
pub const CUDA_ERROR_NO_DEVICE: StatusCode = 100;
pub const CUDA_ERROR_INVALID_RESOURCE_HANDLE: StatusCode = 400;
pub const CUDA_ERROR_NOT_READY: StatusCode = 600;
pub const CUDA_ERROR_ILLEGAL_ADDRESS: StatusCode = 700;
pub const CUDA_ERROR_UNKNOWN: StatusCode = 999;

// cusolverStatus_t
pub const CUSOLVER_STATUS_NOT_INITIALIZED: StatusCode = 1;
pub const CUSOLVER_STATUS_ALLOC_FAILED: StatusCode = 2;
pub const CUSOLVER_STATUS_INVALID_VALUE: StatusCode = 3;
pub const CUSOLVER_STATUS_ARCH_MISMATCH: StatusCode = 4;
pub const CUSOLVER_STATUS_MAPPING_ERROR: StatusCode = 5;
pub const CUSOLVER_STATUS_EXECUTION_FAILED: StatusCode = 6;
pub const CUSOLVER_STATUS_INTERNAL_ERROR: StatusCode = 7;
pub const CUSOLVER_STATUS_MATRIX_TYPE_NOT_SUPPORTED: StatusCode = 8;
pub const CUSOLVER_STATUS_NOT_SUPPORTED: StatusCode = 9;
pub const CUSOLVER_STATUS_ZERO_PIVOT: StatusCode = 10;
pub const CUSOLVER_STATUS_INVALID_LICENSE: StatusCode = 11;
pub const CUSOLVER_STATUS_IRS_PARAMS_NOT_INITIALIZED: StatusCode = 12;
pub const CUSOLVER_STATUS_IRS_PARAMS_INVALID: StatusCode = 13;
pub const CUSOLVER_STATUS_IRS_PARAMS_INVALID_PREC: StatusCode = 14;
pub const CUSOLVER_STATUS_IRS_PARAMS_INVALID_REFINE: StatusCode = 15;
pub const CUSOLVER_STATUS_IRS_PARAMS_INVALID_MAXITER: StatusCode = 16;
pub const CUSOLVER_STATUS_IRS_INTERNAL_ERROR: StatusCode = 20;
pub const CUSOLVER_STATUS_IRS_NOT_SUPPORTED: StatusCode = 21;
pub const CUSOLVER_STATUS_IRS_OUT_OF_RANGE: StatusCode = 22;
pub const CUSOLVER_STATUS_IRS_NRHS_NOT_SUPPORTED_FOR_REFINE_GMRES: StatusCode = 23;
pub const CUSOLVER_STATUS_IRS_INFOS_NOT_INITIALIZED: StatusCode = 25;
pub const CUSOLVER_STATUS_IRS_INFOS_NOT_DESTROYED: StatusCode = 26;
pub const CUSOLVER_STATUS_IRS_MATRIX_SINGULAR: StatusCode = 30;
pub const CUSOLVER_STATUS_INVALID_WORKSPACE: StatusCode = 31;

// cusparseStatus_t
pub const CUSPARSE_STATUS_NOT_INITIALIZED: StatusCode = 1;
pub const CUSPARSE_STATUS_ALLOC_FAILED: StatusCode = 2;
pub const CUSPARSE_STATUS_INVALID_VALUE: StatusCode = 3;
pub const CUSPARSE_STATUS_ARCH_MISMATCH: StatusCode = 4;
pub const CUSPARSE_STATUS_MAPPING_ERROR: StatusCode = 5;
pub const CUSPARSE_STATUS_EXECUTION_FAILED: StatusCode = 6;
pub const CUSPARSE_STATUS_INTERNAL_ERROR: StatusCode = 7;
pub const CUSPARSE_STATUS_MATRIX_TYPE_NOT_SUPPORTED: StatusCode = 8;
pub const CUSPARSE_STATUS_ZERO_PIVOT: StatusCode = 9;
pub const CUSPARSE_STATUS_NOT_SUPPORTED: StatusCode = 10;
pub const CUSPARSE_STATUS_INSUFFICIENT_RESOURCES: StatusCode = 11;

// nvjpegStatus_t
pub const NVJPEG_STATUS_NOT_INITIALIZED: StatusCode = 1;
pub const NVJPEG_STATUS_INVALID_PARAMETER: StatusCode = 2;
pub const NVJPEG_STATUS_BAD_JPEG: StatusCode = 3;
pub const NVJPEG_STATUS_JPEG_NOT_SUPPORTED: StatusCode = 4;
pub const NVJPEG_STATUS_ALLOCATOR_FAILURE: StatusCode = 5;
pub const NVJPEG_STATUS_EXECUTION_FAILED: StatusCode = 6;
pub const NVJPEG_STATUS_ARCH_MISMATCH: StatusCode = 7;
pub const NVJPEG_STATUS_INTERNAL_ERROR: StatusCode = 8;
pub const NVJPEG_STATUS_IMPLEMENTATION_NOT_SUPPORTED: StatusCode = 9;
pub const NVJPEG_STATUS_INCOMPLETE_BITSTREAM: StatusCode = 10;

// cudaMemcpyKind
pub const CUDA_MEMCPY_HOST_TO_DEVICE: c_int = 1;
pub const CUDA_MEMCPY_DEVICE_TO_HOST: c_int = 2;

// libraryPropertyType
pub const MAJOR_VERSION: c_int = 0;
pub const MINOR_VERSION: c_int = 1;
pub const PATCH_LEVEL: c_int = 2;

/// Maximum number of planes in an nvJPEG image.
pub const NVJPEG_MAX_COMPONENT: usize = 4;

/// `nvjpegImage_t`: per-plane device pointers and pitches.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct NvjpegImage {
    pub channel: [*mut u8; NVJPEG_MAX_COMPONENT],
    pub pitch: [usize; NVJPEG_MAX_COMPONENT],
}

impl Default for NvjpegImage {
    fn default() -> Self {
        Self {
            channel: [std::ptr::null_mut(); NVJPEG_MAX_COMPONENT],
            pitch: [0; NVJPEG_MAX_COMPONENT],
        }
    }
}
