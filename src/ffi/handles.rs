//! Handle types for opaque references to native objects.
//!
//! Each handle type is a newtype wrapper around a raw pointer to provide type
//! safety. They are `Copy` on purpose: ownership is tracked one level up, by
//! `resource::Owned`.

use std::os::raw::c_void;

/// Common behaviour of every native handle type.
pub trait RawHandle: Copy + std::fmt::Debug {
    /// The null handle, used as the out-parameter before a create call.
    fn null() -> Self;

    /// Check if this handle is null.
    fn is_null(&self) -> bool;
}

/// Macro to define a handle type.
macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            _p: *mut c_void,
        }

        impl $name {
            /// Wrap a raw pointer received from outside this crate.
            #[inline]
            pub const fn from_ptr(p: *mut c_void) -> Self {
                Self { _p: p }
            }

            /// Raw pointer value.
            #[inline]
            pub const fn as_ptr(&self) -> *mut c_void {
                self._p
            }
        }

        impl RawHandle for $name {
            #[inline]
            fn null() -> Self {
                Self { _p: std::ptr::null_mut() }
            }

            #[inline]
            fn is_null(&self) -> bool {
                self._p.is_null()
            }
        }

        impl Default for $name {
            fn default() -> Self {
                <Self as RawHandle>::null()
            }
        }
    };
}

define_handle!(
    /// `cudaStream_t`.
    CudaStreamHandle
);
define_handle!(
    /// Device pointer returned by `cudaMalloc`.
    DevicePtr
);
define_handle!(
    /// `cusolverDnHandle_t`.
    CusolverDnHandle
);
define_handle!(
    /// `cusolverDnIRSParams_t`.
    IrsParamsHandle
);
define_handle!(
    /// `cusolverDnIRSInfos_t`.
    IrsInfosHandle
);
define_handle!(
    /// `cusparseHandle_t`.
    CusparseHandle
);
define_handle!(
    /// `cusparseSpSMDescr_t`.
    SpSmDescrHandle
);
define_handle!(
    /// `nvjpegHandle_t`.
    NvjpegHandle
);
define_handle!(
    /// `nvjpegDecodeParams_t`.
    DecodeParamsHandle
);
define_handle!(
    /// `nvjpegEncoderState_t`.
    EncoderStateHandle
);
define_handle!(
    /// `nvjpegEncoderParams_t`.
    EncoderParamsHandle
);
define_handle!(
    /// `nvjpegJpegStream_t`.
    JpegStreamHandle
);
