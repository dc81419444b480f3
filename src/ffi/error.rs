//! Status code conversion utilities for FFI.

use tracing::{debug, trace};

use super::raw::*;
use crate::error::{Error, Library, Status};

/// Check a status code and convert to Result.
///
/// Every native call goes through here, so this is also where the per-call
/// log line is emitted.
pub fn check(library: Library, op: &'static str, code: StatusCode) -> crate::Result<()> {
    if code == STATUS_SUCCESS {
        trace!(%library, op, "native call ok");
        return Ok(());
    }

    let status = Status { library, code };
    debug!(%library, op, %status, "native call failed");
    Err(Error::NativeCallFailed { op, status })
}

/// Vendor constant name for a status code.
pub fn status_name(library: Library, code: StatusCode) -> &'static str {
    if code == STATUS_SUCCESS {
        return match library {
            Library::CudaRuntime => "cudaSuccess",
            Library::Cusolver => "CUSOLVER_STATUS_SUCCESS",
            Library::Cusparse => "CUSPARSE_STATUS_SUCCESS",
            Library::Nvjpeg => "NVJPEG_STATUS_SUCCESS",
        };
    }

    match library {
        Library::CudaRuntime => match code {
            CUDA_ERROR_INVALID_VALUE => "cudaErrorInvalidValue",
            CUDA_ERROR_MEMORY_ALLOCATION => "cudaErrorMemoryAllocation",
            CUDA_ERROR_INITIALIZATION => "cudaErrorInitializationError",
            CUDA_ERROR_CUDART_UNLOADING => "cudaErrorCudartUnloading",
            CUDA_ERROR_INSUFFICIENT_DRIVER => "cudaErrorInsufficientDriver",
            CUDA_ERROR_NO_DEVICE => "cudaErrorNoDevice",
            CUDA_ERROR_INVALID_RESOURCE_HANDLE => "cudaErrorInvalidResourceHandle",
            CUDA_ERROR_NOT_READY => "cudaErrorNotReady",
            CUDA_ERROR_ILLEGAL_ADDRESS => "cudaErrorIllegalAddress",
            CUDA_ERROR_UNKNOWN => "cudaErrorUnknown",
            _ => "cudaError",
        },
        Library::Cusolver => match code {
            CUSOLVER_STATUS_NOT_INITIALIZED => "CUSOLVER_STATUS_NOT_INITIALIZED",
            CUSOLVER_STATUS_ALLOC_FAILED => "CUSOLVER_STATUS_ALLOC_FAILED",
            CUSOLVER_STATUS_INVALID_VALUE => "CUSOLVER_STATUS_INVALID_VALUE",
            CUSOLVER_STATUS_ARCH_MISMATCH => "CUSOLVER_STATUS_ARCH_MISMATCH",
            CUSOLVER_STATUS_MAPPING_ERROR => "CUSOLVER_STATUS_MAPPING_ERROR",
            CUSOLVER_STATUS_EXECUTION_FAILED => "CUSOLVER_STATUS_EXECUTION_FAILED",
            CUSOLVER_STATUS_INTERNAL_ERROR => "CUSOLVER_STATUS_INTERNAL_ERROR",
            CUSOLVER_STATUS_MATRIX_TYPE_NOT_SUPPORTED => {
                "CUSOLVER_STATUS_MATRIX_TYPE_NOT_SUPPORTED"
            }
            CUSOLVER_STATUS_NOT_SUPPORTED => "CUSOLVER_STATUS_NOT_SUPPORTED",
            CUSOLVER_STATUS_ZERO_PIVOT => "CUSOLVER_STATUS_ZERO_PIVOT",
            CUSOLVER_STATUS_INVALID_LICENSE => "CUSOLVER_STATUS_INVALID_LICENSE",
            CUSOLVER_STATUS_IRS_PARAMS_NOT_INITIALIZED => {
                "CUSOLVER_STATUS_IRS_PARAMS_NOT_INITIALIZED"
            }
            CUSOLVER_STATUS_IRS_PARAMS_INVALID => "CUSOLVER_STATUS_IRS_PARAMS_INVALID",
            CUSOLVER_STATUS_IRS_PARAMS_INVALID_PREC => "CUSOLVER_STATUS_IRS_PARAMS_INVALID_PREC",
            CUSOLVER_STATUS_IRS_PARAMS_INVALID_REFINE => {
                "CUSOLVER_STATUS_IRS_PARAMS_INVALID_REFINE"
            }
            CUSOLVER_STATUS_IRS_PARAMS_INVALID_MAXITER => {
                "CUSOLVER_STATUS_IRS_PARAMS_INVALID_MAXITER"
            }
            CUSOLVER_STATUS_IRS_INTERNAL_ERROR => "CUSOLVER_STATUS_IRS_INTERNAL_ERROR",
            CUSOLVER_STATUS_IRS_NOT_SUPPORTED => "CUSOLVER_STATUS_IRS_NOT_SUPPORTED",
            CUSOLVER_STATUS_IRS_OUT_OF_RANGE => "CUSOLVER_STATUS_IRS_OUT_OF_RANGE",
            CUSOLVER_STATUS_IRS_NRHS_NOT_SUPPORTED_FOR_REFINE_GMRES => {
                "CUSOLVER_STATUS_IRS_NRHS_NOT_SUPPORTED_FOR_REFINE_GMRES"
            }
            CUSOLVER_STATUS_IRS_INFOS_NOT_INITIALIZED => {
                "CUSOLVER_STATUS_IRS_INFOS_NOT_INITIALIZED"
            }
            CUSOLVER_STATUS_IRS_INFOS_NOT_DESTROYED => "CUSOLVER_STATUS_IRS_INFOS_NOT_DESTROYED",
            CUSOLVER_STATUS_IRS_MATRIX_SINGULAR => "CUSOLVER_STATUS_IRS_MATRIX_SINGULAR",
            CUSOLVER_STATUS_INVALID_WORKSPACE => "CUSOLVER_STATUS_INVALID_WORKSPACE",
            _ => "CUSOLVER_STATUS_UNKNOWN",
        },
        Library::Cusparse => match code {
            CUSPARSE_STATUS_NOT_INITIALIZED => "CUSPARSE_STATUS_NOT_INITIALIZED",
            CUSPARSE_STATUS_ALLOC_FAILED => "CUSPARSE_STATUS_ALLOC_FAILED",
            CUSPARSE_STATUS_INVALID_VALUE => "CUSPARSE_STATUS_INVALID_VALUE",
            CUSPARSE_STATUS_ARCH_MISMATCH => "CUSPARSE_STATUS_ARCH_MISMATCH",
            CUSPARSE_STATUS_MAPPING_ERROR => "CUSPARSE_STATUS_MAPPING_ERROR",
            CUSPARSE_STATUS_EXECUTION_FAILED => "CUSPARSE_STATUS_EXECUTION_FAILED",
            CUSPARSE_STATUS_INTERNAL_ERROR => "CUSPARSE_STATUS_INTERNAL_ERROR",
            CUSPARSE_STATUS_MATRIX_TYPE_NOT_SUPPORTED => {
                "CUSPARSE_STATUS_MATRIX_TYPE_NOT_SUPPORTED"
            }
            CUSPARSE_STATUS_ZERO_PIVOT => "CUSPARSE_STATUS_ZERO_PIVOT",
            CUSPARSE_STATUS_NOT_SUPPORTED => "CUSPARSE_STATUS_NOT_SUPPORTED",
            CUSPARSE_STATUS_INSUFFICIENT_RESOURCES => "CUSPARSE_STATUS_INSUFFICIENT_RESOURCES",
            _ => "CUSPARSE_STATUS_UNKNOWN",
        },
        Library::Nvjpeg => match code {
            NVJPEG_STATUS_NOT_INITIALIZED => "NVJPEG_STATUS_NOT_INITIALIZED",
            NVJPEG_STATUS_INVALID_PARAMETER => "NVJPEG_STATUS_INVALID_PARAMETER",
            NVJPEG_STATUS_BAD_JPEG => "NVJPEG_STATUS_BAD_JPEG",
            NVJPEG_STATUS_JPEG_NOT_SUPPORTED => "NVJPEG_STATUS_JPEG_NOT_SUPPORTED",
            NVJPEG_STATUS_ALLOCATOR_FAILURE => "NVJPEG_STATUS_ALLOCATOR_FAILURE",
            NVJPEG_STATUS_EXECUTION_FAILED => "NVJPEG_STATUS_EXECUTION_FAILED",
            NVJPEG_STATUS_ARCH_MISMATCH => "NVJPEG_STATUS_ARCH_MISMATCH",
            NVJPEG_STATUS_INTERNAL_ERROR => "NVJPEG_STATUS_INTERNAL_ERROR",
            NVJPEG_STATUS_IMPLEMENTATION_NOT_SUPPORTED => {
                "NVJPEG_STATUS_IMPLEMENTATION_NOT_SUPPORTED"
            }
            NVJPEG_STATUS_INCOMPLETE_BITSTREAM => "NVJPEG_STATUS_INCOMPLETE_BITSTREAM",
            _ => "NVJPEG_STATUS_UNKNOWN",
        },
    }
}
