//! CUDA runtime objects: streams and device allocations.

use std::os::raw::c_void;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Library, Result};
use crate::ffi::{self, check, CudaStreamHandle, CudartApi, DevicePtr, StatusCode};
use crate::resource::{Owned, Resource};

/// The loaded CUDA runtime library.
///
/// Cheap to clone; every object created from it keeps the library loaded.
#[derive(Clone)]
pub struct CudaRuntime {
    api: Arc<CudartApi>,
}

impl CudaRuntime {
    /// Load the runtime from the default search path (or `NVLIBS_CUDART_PATH`).
    pub fn load() -> Result<Self> {
        Ok(Self::from_api(Arc::new(CudartApi::load()?)))
    }

    /// Load the runtime from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_api(Arc::new(CudartApi::load_from(path.as_ref())?)))
    }

    pub(crate) fn from_api(api: Arc<CudartApi>) -> Self {
        Self { api }
    }

    /// Runtime version, e.g. `12040` for 12.4.
    pub fn version(&self) -> Result<i32> {
        let mut version = 0;
        let code = unsafe { (self.api.runtime_get_version)(&mut version) };
        check(Library::CudaRuntime, "cudaRuntimeGetVersion", code)?;
        Ok(version)
    }

    /// Create a new asynchronous stream.
    pub fn create_stream(&self) -> Result<Stream> {
        Stream::new(self.api.clone())
    }

    /// Allocate `len` bytes of device memory.
    pub fn alloc(&self, len: usize) -> Result<DeviceBuffer> {
        DeviceBuffer::new(self.api.clone(), len)
    }
}

impl Resource for CudaStreamHandle {
    type Api = CudartApi;
    const KIND: &'static str = "Stream";
    const LIBRARY: Library = Library::CudaRuntime;
    const DESTROY: &'static str = "cudaStreamDestroy";

    unsafe fn destroy(self, api: &CudartApi) -> StatusCode {
        (api.stream_destroy)(self)
    }
}

/// An owned CUDA stream.
///
/// Work enqueued on one stream runs in enqueue order; the stream is destroyed
/// by [`Stream::dispose`] or on drop.
pub struct Stream {
    inner: Owned<CudaStreamHandle>,
}

impl Stream {
    pub(crate) fn new(api: Arc<CudartApi>) -> Result<Self> {
        let inner = Owned::<CudaStreamHandle>::create(api, "cudaStreamCreate", |api, out| {
            unsafe { (api.stream_create)(out) }
        })?;
        Ok(Self { inner })
    }

    /// Returns the inner handle.
    pub fn as_raw(&self) -> Result<CudaStreamHandle> {
        self.inner.raw()
    }

    /// Block until all work enqueued on this stream has finished.
    pub fn synchronize(&self) -> Result<()> {
        let (raw, api) = self.inner.get()?;
        let code = unsafe { (api.stream_synchronize)(raw) };
        check(Library::CudaRuntime, "cudaStreamSynchronize", code)
    }

    /// Destroy the stream. Later calls are no-ops.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }

    /// Whether `dispose` has run.
    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

// Stream may move between threads; concurrent use needs external locking.
unsafe impl Send for Stream {}

impl Resource for DevicePtr {
    type Api = CudartApi;
    const KIND: &'static str = "DeviceBuffer";
    const LIBRARY: Library = Library::CudaRuntime;
    const DESTROY: &'static str = "cudaFree";

    unsafe fn destroy(self, api: &CudartApi) -> StatusCode {
        (api.free)(self)
    }
}

/// An owned block of device memory.
pub struct DeviceBuffer {
    inner: Owned<DevicePtr>,
    len: usize,
}

impl DeviceBuffer {
    pub(crate) fn new(api: Arc<CudartApi>, len: usize) -> Result<Self> {
        if len == 0 {
            return Err(Error::InvalidArgument(
                "device allocation of zero bytes".to_string(),
            ));
        }

        let inner = Owned::<DevicePtr>::create(api, "cudaMalloc", |api, out| unsafe {
            (api.malloc)(out, len)
        })?;
        Ok(Self { inner, len })
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the device pointer.
    pub fn as_raw(&self) -> Result<DevicePtr> {
        self.inner.raw()
    }

    /// Copy `src` to the start of the buffer.
    pub fn copy_from_host(&mut self, src: &[u8]) -> Result<()> {
        if src.len() > self.len {
            return Err(Error::BufferTooSmall {
                required: src.len(),
                available: self.len,
            });
        }

        let (raw, api) = self.inner.get()?;
        let code = unsafe {
            (api.memcpy)(
                raw.as_ptr(),
                src.as_ptr() as *const c_void,
                src.len(),
                ffi::CUDA_MEMCPY_HOST_TO_DEVICE,
            )
        };
        check(Library::CudaRuntime, "cudaMemcpy", code)
    }

    /// Copy the start of the buffer into `dst`, filling it completely.
    pub fn copy_to_host(&self, dst: &mut [u8]) -> Result<()> {
        if dst.len() > self.len {
            return Err(Error::BufferTooSmall {
                required: dst.len(),
                available: self.len,
            });
        }

        let (raw, api) = self.inner.get()?;
        let code = unsafe {
            (api.memcpy)(
                dst.as_mut_ptr() as *mut c_void,
                raw.as_ptr() as *const c_void,
                dst.len(),
                ffi::CUDA_MEMCPY_DEVICE_TO_HOST,
            )
        };
        check(Library::CudaRuntime, "cudaMemcpy", code)
    }

    /// Copy the whole buffer to a new host vector.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let mut out = vec![0u8; self.len];
        self.copy_to_host(&mut out)?;
        Ok(out)
    }

    /// Free the allocation. Later calls are no-ops.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }

    /// Whether `dispose` has run.
    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

unsafe impl Send for DeviceBuffer {}
