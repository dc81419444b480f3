//! Error types for the nvlibs crate.

use std::fmt;

use thiserror::Error;

/// Result type alias for nvlibs operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The vendor library a native call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Library {
    /// CUDA runtime (`cudart`).
    CudaRuntime,
    /// Dense and sparse solvers (`cusolver`).
    Cusolver,
    /// Sparse linear algebra (`cusparse`).
    Cusparse,
    /// JPEG encode/decode (`nvjpeg`).
    Nvjpeg,
}

impl Library {
    /// Short library name as used in shared object file names.
    pub fn name(&self) -> &'static str {
        match self {
            Library::CudaRuntime => "cudart",
            Library::Cusolver => "cusolver",
            Library::Cusparse => "cusparse",
            Library::Nvjpeg => "nvjpeg",
        }
    }

    /// Environment variable that overrides where the library is loaded from.
    pub fn path_env_var(&self) -> &'static str {
        match self {
            Library::CudaRuntime => "NVLIBS_CUDART_PATH",
            Library::Cusolver => "NVLIBS_CUSOLVER_PATH",
            Library::Cusparse => "NVLIBS_CUSPARSE_PATH",
            Library::Nvjpeg => "NVLIBS_NVJPEG_PATH",
        }
    }
}

impl fmt::Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A non-success status code returned by a native entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status {
    /// Library that produced the code.
    pub library: Library,
    /// Raw status value.
    pub code: i32,
}

impl Status {
    /// Vendor constant name for this status, e.g. `NVJPEG_STATUS_BAD_JPEG`.
    pub fn name(&self) -> &'static str {
        crate::ffi::status_name(self.library, self.code)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code)
    }
}

/// Error type for nvlibs operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A native entry point returned a non-success status.
    #[error("{op} failed: {status}")]
    NativeCallFailed {
        /// Entry point that failed, e.g. `cusolverDnIRSParamsSetTol`.
        op: &'static str,
        /// Status it returned.
        status: Status,
    },

    /// The wrapper was already disposed and no longer owns a handle.
    #[error("{0} used after dispose")]
    UseAfterDispose(&'static str),

    /// A caller-supplied buffer cannot hold the data.
    #[error("buffer too small: need {required} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes needed.
        required: usize,
        /// Bytes available.
        available: usize,
    },

    /// Function argument is invalid.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The shared library could not be opened.
    #[error("failed to load {library}: {message}")]
    LibraryLoad {
        /// Library that was being loaded.
        library: Library,
        /// Loader message for every candidate tried.
        message: String,
    },

    /// The shared library was opened but lacks a required entry point.
    #[error("{library} has no symbol {symbol}")]
    MissingSymbol {
        /// Library that was loaded.
        library: Library,
        /// Name of the missing entry point.
        symbol: String,
    },
}

impl Error {
    /// Check if this error came from a failing native call.
    pub fn is_native(&self) -> bool {
        matches!(self, Error::NativeCallFailed { .. })
    }

    /// Check if this is a use-after-dispose error.
    pub fn is_use_after_dispose(&self) -> bool {
        matches!(self, Error::UseAfterDispose(_))
    }

    /// Check if the library or one of its symbols could not be loaded.
    pub fn is_load(&self) -> bool {
        matches!(self, Error::LibraryLoad { .. } | Error::MissingSymbol { .. })
    }

    /// Native status carried by this error, if any.
    pub fn status(&self) -> Option<Status> {
        match self {
            Error::NativeCallFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Native entry point that failed, if any.
    pub fn op(&self) -> Option<&'static str> {
        match self {
            Error::NativeCallFailed { op, .. } => Some(*op),
            _ => None,
        }
    }
}
