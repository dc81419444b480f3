//! nvJPEG library and its context handle.
//!
//! Every nvJPEG object is created from an [`NvJpeg`] context and borrows it
//! for its whole life, so the context cannot be disposed while any of its
//! children is still alive.

use std::path::Path;
use std::sync::Arc;

use crate::bitstream::JpegStream;
use crate::decode::DecodeParams;
use crate::encode::{EncoderParams, EncoderState};
use crate::error::{Library, Result};
use crate::ffi::{self, check, NvjpegApi, NvjpegHandle, StatusCode};
use crate::resource::{Owned, Resource};
use crate::runtime::Stream;

/// The loaded nvJPEG library.
#[derive(Clone)]
pub struct NvjpegLib {
    api: Arc<NvjpegApi>,
}

impl NvjpegLib {
    /// Load nvJPEG from the default search path (or `NVLIBS_NVJPEG_PATH`).
    pub fn load() -> Result<Self> {
        Ok(Self::from_api(Arc::new(NvjpegApi::load()?)))
    }

    /// Load nvJPEG from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_api(Arc::new(NvjpegApi::load_from(path.as_ref())?)))
    }

    pub(crate) fn from_api(api: Arc<NvjpegApi>) -> Self {
        Self { api }
    }

    /// Library version as `(major, minor, patch)`.
    pub fn version(&self) -> Result<(i32, i32, i32)> {
        let property = |kind| {
            let mut value = 0;
            let code = unsafe { (self.api.get_property)(kind, &mut value) };
            check(Library::Nvjpeg, "nvjpegGetProperty", code).map(|()| value)
        };

        Ok((
            property(ffi::MAJOR_VERSION)?,
            property(ffi::MINOR_VERSION)?,
            property(ffi::PATCH_LEVEL)?,
        ))
    }

    /// Create a context with the default backend and allocators.
    pub fn create(&self) -> Result<NvJpeg> {
        NvJpeg::new(self)
    }
}

impl Resource for NvjpegHandle {
    type Api = NvjpegApi;
    const KIND: &'static str = "NvJpeg";
    const LIBRARY: Library = Library::Nvjpeg;
    const DESTROY: &'static str = "nvjpegDestroy";

    unsafe fn destroy(self, api: &NvjpegApi) -> StatusCode {
        (api.destroy)(self)
    }
}

/// Owned `nvjpegHandle_t`.
pub struct NvJpeg {
    inner: Owned<NvjpegHandle>,
}

impl NvJpeg {
    /// Create a context with the default backend and allocators.
    pub fn new(lib: &NvjpegLib) -> Result<Self> {
        let inner = Owned::<NvjpegHandle>::create(lib.api.clone(), "nvjpegCreateSimple", |api, out| {
            unsafe { (api.create_simple)(out) }
        })?;
        Ok(Self { inner })
    }

    /// Returns the inner handle.
    pub fn as_raw(&self) -> Result<NvjpegHandle> {
        self.inner.raw()
    }

    pub(crate) fn get(&self) -> Result<(NvjpegHandle, &NvjpegApi)> {
        self.inner.get()
    }

    pub(crate) fn shared_api(&self) -> Arc<NvjpegApi> {
        self.inner.shared_api()
    }

    /// Create decode parameters owned by this context.
    pub fn decode_params(&self) -> Result<DecodeParams<'_>> {
        DecodeParams::new(self)
    }

    /// Encoder state; native setup work is enqueued on `stream`.
    pub fn encoder_state(&self, stream: &Stream) -> Result<EncoderState<'_>> {
        EncoderState::new(self, stream)
    }

    /// Create encode parameters owned by this context.
    pub fn encoder_params(&self, stream: &Stream) -> Result<EncoderParams<'_>> {
        EncoderParams::new(self, stream)
    }

    /// Create an empty JPEG stream owned by this context.
    pub fn jpeg_stream(&self) -> Result<JpegStream<'_>> {
        JpegStream::new(self)
    }

    /// Destroy the context. Later calls are no-ops.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }

    /// Whether `dispose` has run.
    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}

unsafe impl Send for NvJpeg {}
