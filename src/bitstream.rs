//! Parsed JPEG bitstreams.

use crate::error::{Error, Library, Result};
use crate::ffi::{check, JpegStreamHandle, NvjpegApi, StatusCode};
use crate::jpeg::NvJpeg;
use crate::resource::{Owned, Resource};

impl Resource for JpegStreamHandle {
    type Api = NvjpegApi;
    const KIND: &'static str = "JpegStream";
    const LIBRARY: Library = Library::Nvjpeg;
    const DESTROY: &'static str = "nvjpegJpegStreamDestroy";

    unsafe fn destroy(self, api: &NvjpegApi) -> StatusCode {
        (api.jpeg_stream_destroy)(self)
    }
}

/// Owned `nvjpegJpegStream_t`, the parsed headers of one JPEG image.
///
/// Used to inspect an image before decoding it, and as the source of
/// [`EncoderState::copy_metadata`](crate::EncoderState::copy_metadata) when
/// transcoding.
pub struct JpegStream<'a> {
    inner: Owned<JpegStreamHandle>,
    ctx: &'a NvJpeg,
}

impl<'a> JpegStream<'a> {
    /// Create an empty stream owned by `ctx`.
    pub fn new(ctx: &'a NvJpeg) -> Result<Self> {
        let handle = ctx.as_raw()?;
        let inner = Owned::<JpegStreamHandle>::create(
            ctx.shared_api(),
            "nvjpegJpegStreamCreate",
            |api, out| unsafe { (api.jpeg_stream_create)(handle, out) },
        )?;
        Ok(Self { inner, ctx })
    }

    /// Returns the inner handle.
    pub fn as_raw(&self) -> Result<JpegStreamHandle> {
        self.inner.raw()
    }

    /// Parse the headers of `data`.
    ///
    /// `save_metadata` keeps application markers for a later
    /// `copy_metadata`. The native object always keeps its own copy of the
    /// bitstream, so `data` need not outlive this call.
    pub fn parse(&mut self, data: &[u8], save_metadata: bool) -> Result<()> {
        if data.is_empty() {
            return Err(Error::InvalidArgument("empty JPEG bitstream".to_string()));
        }

        let (handle, _) = self.ctx.get()?;
        let (raw, api) = self.inner.get()?;
        let code = unsafe {
            (api.jpeg_stream_parse)(
                handle,
                data.as_ptr(),
                data.len(),
                save_metadata as i32,
                1,
                raw,
            )
        };
        check(Library::Nvjpeg, "nvjpegJpegStreamParse", code)
    }

    /// Image size as `(width, height)` in pixels.
    pub fn frame_dimensions(&self) -> Result<(u32, u32)> {
        let (raw, api) = self.inner.get()?;
        let (mut width, mut height) = (0, 0);
        let code = unsafe { (api.jpeg_stream_get_frame_dimensions)(raw, &mut width, &mut height) };
        check(Library::Nvjpeg, "nvjpegJpegStreamGetFrameDimensions", code)?;
        Ok((width, height))
    }

    /// Number of color components.
    pub fn components(&self) -> Result<u32> {
        let (raw, api) = self.inner.get()?;
        let mut components = 0;
        let code = unsafe { (api.jpeg_stream_get_components_num)(raw, &mut components) };
        check(Library::Nvjpeg, "nvjpegJpegStreamGetComponentsNum", code)?;
        Ok(components)
    }

    /// Destroy the native stream. Later calls are no-ops.
    pub fn dispose(&mut self) {
        self.inner.dispose();
    }

    /// Whether `dispose` has run.
    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }
}
