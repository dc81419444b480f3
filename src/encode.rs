//! JPEG encoding.
//!
//! An [`EncoderState`] holds the working buffers of one encode and, after
//! [`EncoderState::encode_image`] or [`EncoderState::encode_yuv`], the
//! compressed bitstream. The bitstream can be retrieved into device memory,
//! into a raw host pointer without waiting, or into host memory after the
//! stream has been synchronized.
//!
//! ```no_run
//! # fn run(ctx: &nvlibs::NvJpeg, rt: &nvlibs::CudaRuntime, frame: &nvlibs::DeviceBuffer)
//! #     -> nvlibs::Result<Vec<u8>> {
//! use nvlibs::{Image, InputFormat};
//!
//! let stream = rt.create_stream()?;
//! let mut params = ctx.encoder_params(&stream)?;
//! params.set_quality(90, &stream)?;
//!
//! let mut state = ctx.encoder_state(&stream)?;
//! let image = Image::interleaved(frame, 640 * 3)?;
//! state.encode_image(&params, &image, InputFormat::RgbI, 640, 480, &stream)?;
//! state.retrieve_bitstream(&stream)
//! # }
//! ```

use std::marker::PhantomData;
use std::ptr;

use tracing::trace;

use crate::bitstream::JpegStream;
use crate::error::{Error, Library, Result};
use crate::ffi::nvjpeg::{FnEncode, FnEncoderParamsCopy, FnEncoderParamsSetInt};
use crate::ffi::{
    check, EncoderParamsHandle, EncoderStateHandle, NvjpegApi, NvjpegImage, StatusCode,
    NVJPEG_MAX_COMPONENT,
};
use crate::jpeg::NvJpeg;
use crate::resource::{Owned, Resource};
use crate::runtime::{DeviceBuffer, Stream};
use crate::types::{ChromaSubsampling, InputFormat, JpegEncoding};

/// Source planes for an encode, in device memory.
///
/// Planar layouts use one plane per component; interleaved layouts use
/// plane 0 only. The buffers must stay alive while the image is in use.
#[derive(Debug, Clone, Copy, Default)]
pub struct Image<'b> {
    raw: NvjpegImage,
    lens: [usize; NVJPEG_MAX_COMPONENT],
    _buffers: PhantomData<&'b DeviceBuffer>,
}

impl<'b> Image<'b> {
    /// An image with no planes set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set plane `index` to `buffer`, with `pitch` bytes per row.
    pub fn with_plane(mut self, index: usize, buffer: &'b DeviceBuffer, pitch: usize) -> Result<Self> {
        if index >= NVJPEG_MAX_COMPONENT {
            return Err(Error::InvalidArgument(format!(
                "plane index {index} out of range, at most {NVJPEG_MAX_COMPONENT} planes"
            )));
        }
        self.raw.channel[index] = buffer.as_raw()?.as_ptr() as *mut u8;
        self.raw.pitch[index] = pitch;
        self.lens[index] = buffer.len();
        Ok(self)
    }

    /// One plane per `(buffer, pitch)` pair.
    pub fn planar(planes: &[(&'b DeviceBuffer, usize)]) -> Result<Self> {
        if planes.len() > NVJPEG_MAX_COMPONENT {
            return Err(Error::InvalidArgument(format!(
                "{} planes given, at most {NVJPEG_MAX_COMPONENT} supported",
                planes.len()
            )));
        }
        planes
            .iter()
            .enumerate()
            .try_fold(Self::new(), |image, (i, (buffer, pitch))| {
                image.with_plane(i, *buffer, *pitch)
            })
    }

    /// A single interleaved plane.
    pub fn interleaved(buffer: &'b DeviceBuffer, pitch: usize) -> Result<Self> {
        Self::new().with_plane(0, buffer, pitch)
    }

    /// Number of planes set, counting up to the first empty one.
    pub fn planes(&self) -> usize {
        self.raw.channel.iter().take_while(|c| !c.is_null()).count()
    }

    /// Check that every plane in `layout` is set and holds its rows.
    ///
    /// `layout` lists `(row_bytes, rows)` per plane, starting at plane 0.
    fn check_layout(&self, layout: &[(usize, usize)]) -> Result<()> {
        for (i, &(row_bytes, rows)) in layout.iter().enumerate() {
            if self.raw.channel[i].is_null() {
                return Err(Error::InvalidArgument(format!(
                    "plane {i} is required but not set"
                )));
            }
            let pitch = self.raw.pitch[i];
            if pitch < row_bytes {
                return Err(Error::InvalidArgument(format!(
                    "plane {i} pitch {pitch} is shorter than a row of {row_bytes} bytes"
                )));
            }
            let required = pitch.saturating_mul(rows);
            if required > self.lens[i] {
                return Err(Error::BufferTooSmall {
                    required,
                    available: self.lens[i],
                });
            }
        }
        Ok(())
    }

    pub(crate) fn as_native(&self) -> &NvjpegImage {
        &self.raw
    }
}

/// Validated image size as unsigned `(width, height)`.
fn image_size(width: i32, height: i32) -> Result<(usize, usize)> {
    if width <= 0 || height <= 0 {
        return Err(Error::InvalidArgument(format!(
            "image size must be positive, got {width}x{height}"
        )));
    }
    Ok((width as usize, height as usize))
}

/// Plane layout read by `nvjpegEncodeImage`.
fn image_layout(format: InputFormat, width: usize, height: usize) -> Vec<(usize, usize)> {
    match format {
        InputFormat::RgbI | InputFormat::BgrI => vec![(width * 3, height)],
        InputFormat::Rgb | InputFormat::Bgr => vec![(width, height); 3],
    }
}

/// Plane layout read by `nvjpegEncodeYUV`.
fn yuv_layout(subsampling: ChromaSubsampling, width: usize, height: usize) -> Vec<(usize, usize)> {
    let luma = (width, height);
    let chroma = match subsampling {
        ChromaSubsampling::Gray => return vec![luma],
        ChromaSubsampling::Css444 => luma,
        ChromaSubsampling::Css422 => (width.div_ceil(2), height),
        ChromaSubsampling::Css420 => (width.div_ceil(2), height.div_ceil(2)),
        ChromaSubsampling::Css440 => (width, height.div_ceil(2)),
        ChromaSubsampling::Css411 => (width.div_ceil(4), height),
        ChromaSubsampling::Css410 => (width.div_ceil(4), height.div_ceil(2)),
        ChromaSubsampling::Css410V => (width.div_ceil(2), height.div_ceil(4)),
    };
    vec![luma, chroma, chroma]
}

impl Resource for EncoderParamsHandle {
    type Api = NvjpegApi;
    const KIND: &'static str = "EncoderParams";
    const LIBRARY: Library = Library::Nvjpeg;
    const DESTROY: &'static str = "nvjpegEncoderParamsDestroy";

    unsafe fn destroy(self, api: &NvjpegApi) -> StatusCode {
        (api.encoder_params_destroy)(self)
    }
}

/// Owned `nvjpegEncoderParams_t`: quality, coding process and sampling of
/// an encode.
pub struct EncoderParams<'a> {
    inner: Owned<EncoderParamsHandle>,
    _ctx: PhantomData<&'a NvJpeg>,
}

impl<'a> EncoderParams<'a> {
    /// Create encode parameters owned by `ctx`.
    pub fn new(ctx: &'a NvJpeg, stream: &Stream) -> Result<Self> {
        let handle = ctx.as_raw()?;
        let stream = stream.as_raw()?;
        let inner = Owned::<EncoderParamsHandle>::create(
            ctx.shared_api(),
            "nvjpegEncoderParamsCreate",
            |api, out| unsafe { (api.encoder_params_create)(handle, out, stream) },
        )?;
        Ok(Self {
            inner,
            _ctx: PhantomData,
        })
    }

    /// Returns the inner handle.
    pub fn as_raw(&self) -> Result<EncoderParamsHandle> {
        self.inner.raw()
    }

    fn set_int<F>(&mut self, op: &'static str, value: i32, stream: &Stream, f: F) -> Result<()>
    where
        F: FnOnce(&NvjpegApi) -> FnEncoderParamsSetInt,
    {
        let stream = stream.as_raw()?;
        let (raw, api) = self.inner.get()?;
        let code = unsafe { f(api)(raw, value, stream) };
        check(Library::Nvjpeg, op, code)
    }

    /// Quality factor, 1 (smallest) to 100 (best).
    pub fn set_quality(&mut self, quality: i32, stream: &Stream) -> Result<()> {
        if !(1..=100).contains(&quality) {
            return Err(Error::InvalidArgument(format!(
                "quality must be within 1..=100, got {quality}"
            )));
        }
        self.set_int("nvjpegEncoderParamsSetQuality", quality, stream, |api| {
            api.encoder_params_set_quality
        })
    }

    /// JPEG coding process, baseline or progressive.
    pub fn set_encoding(&mut self, encoding: JpegEncoding, stream: &Stream) -> Result<()> {
        self.set_int("nvjpegEncoderParamsSetEncoding", encoding.into(), stream, |api| {
            api.encoder_params_set_encoding
        })
    }

    /// Build per-image Huffman tables instead of the standard ones.
    pub fn set_optimized_huffman(&mut self, optimized: bool, stream: &Stream) -> Result<()> {
        self.set_int(
            "nvjpegEncoderParamsSetOptimizedHuffman",
            optimized as i32,
            stream,
            |api| api.encoder_params_set_optimized_huffman,
        )
    }

    /// Chroma subsampling of the output.
    pub fn set_sampling_factors(
        &mut self,
        subsampling: ChromaSubsampling,
        stream: &Stream,
    ) -> Result<()> {
        self.set_int(
            "nvjpegEncoderParamsSetSamplingFactors",
            subsampling.into(),
            stream,
            |api| api.encoder_params_set_sampling_factors,
        )
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

impl Resource for EncoderStateHandle {
    type Api = NvjpegApi;
    const KIND: &'static str = "EncoderState";
    const LIBRARY: Library = Library::Nvjpeg;
    const DESTROY: &'static str = "nvjpegEncoderStateDestroy";

    unsafe fn destroy(self, api: &NvjpegApi) -> StatusCode {
        (api.encoder_state_destroy)(self)
    }
}

/// Owned `nvjpegEncoderState_t`.
pub struct EncoderState<'a> {
    inner: Owned<EncoderStateHandle>,
    ctx: &'a NvJpeg,
}

impl<'a> EncoderState<'a> {
    /// Create an encoder state owned by `ctx`.
    pub fn new(ctx: &'a NvJpeg, stream: &Stream) -> Result<Self> {
        let handle = ctx.as_raw()?;
        let stream = stream.as_raw()?;
        let inner = Owned::<EncoderStateHandle>::create(
            ctx.shared_api(),
            "nvjpegEncoderStateCreate",
            |api, out| unsafe { (api.encoder_state_create)(handle, out, stream) },
        )?;
        Ok(Self { inner, ctx })
    }

    /// Returns the inner handle.
    pub fn as_raw(&self) -> Result<EncoderStateHandle> {
        self.inner.raw()
    }

    #[allow(clippy::too_many_arguments)]
    fn encode<F>(
        &mut self,
        op: &'static str,
        params: &EncoderParams<'_>,
        source: &Image<'_>,
        format: i32,
        width: i32,
        height: i32,
        stream: &Stream,
        f: F,
    ) -> Result<()>
    where
        F: FnOnce(&NvjpegApi) -> FnEncode,
    {
        let stream = stream.as_raw()?;
        let params = params.as_raw()?;
        let (handle, _) = self.ctx.get()?;
        let (raw, api) = self.inner.get()?;
        let code = unsafe {
            f(api)(
                handle,
                raw,
                params,
                source.as_native(),
                format,
                width,
                height,
                stream,
            )
        };
        check(Library::Nvjpeg, op, code)?;
        trace!(width, height, planes = source.planes(), "encode enqueued");
        Ok(())
    }

    /// Compress YUV planes with the given chroma subsampling.
    ///
    /// Fails with `BufferTooSmall` if a plane's `pitch * rows` exceeds its
    /// buffer.
    pub fn encode_yuv(
        &mut self,
        params: &EncoderParams<'_>,
        source: &Image<'_>,
        subsampling: ChromaSubsampling,
        width: i32,
        height: i32,
        stream: &Stream,
    ) -> Result<()> {
        let (w, h) = image_size(width, height)?;
        source.check_layout(&yuv_layout(subsampling, w, h))?;
        self.encode(
            "nvjpegEncodeYUV",
            params,
            source,
            subsampling.into(),
            width,
            height,
            stream,
            |api| api.encode_yuv,
        )
    }

    /// Compress RGB or BGR pixels, planar or interleaved.
    ///
    /// Interleaved input needs a pitch of at least `width * 3`.
    pub fn encode_image(
        &mut self,
        params: &EncoderParams<'_>,
        source: &Image<'_>,
        format: InputFormat,
        width: i32,
        height: i32,
        stream: &Stream,
    ) -> Result<()> {
        let (w, h) = image_size(width, height)?;
        source.check_layout(&image_layout(format, w, h))?;
        self.encode(
            "nvjpegEncodeImage",
            params,
            source,
            format.into(),
            width,
            height,
            stream,
            |api| api.encode_image,
        )
    }

    /// Copy the bitstream into device memory. Does not wait for `stream`.
    ///
    /// Returns the bitstream length.
    pub fn retrieve_bitstream_device(
        &self,
        dst: &mut DeviceBuffer,
        stream: &Stream,
    ) -> Result<usize> {
        let data = dst.as_raw()?.as_ptr() as *mut u8;
        let stream = stream.as_raw()?;
        let (handle, _) = self.ctx.get()?;
        let (raw, api) = self.inner.get()?;

        let mut length = dst.len();
        let code =
            unsafe { (api.encode_retrieve_bitstream_device)(handle, raw, data, &mut length, stream) };
        check(Library::Nvjpeg, "nvjpegEncodeRetrieveBitstreamDevice", code)?;
        Ok(length)
    }

    /// Copy the bitstream to host memory without waiting for `stream`.
    ///
    /// With a null `data`, only stores the bitstream length in `length`.
    ///
    /// # Safety
    ///
    /// A non-null `data` must be valid for writes of `*length` bytes until
    /// `stream` has been synchronized.
    pub unsafe fn retrieve_bitstream_raw(
        &self,
        data: *mut u8,
        length: &mut usize,
        stream: &Stream,
    ) -> Result<()> {
        let stream = stream.as_raw()?;
        let (handle, _) = self.ctx.get()?;
        let (raw, api) = self.inner.get()?;
        let code = (api.encode_retrieve_bitstream)(handle, raw, data, length, stream);
        check(Library::Nvjpeg, "nvjpegEncodeRetrieveBitstream", code)
    }

    /// Length in bytes of the encoded bitstream.
    pub fn bitstream_len(&self, stream: &Stream) -> Result<usize> {
        let mut length = 0;
        unsafe { self.retrieve_bitstream_raw(ptr::null_mut(), &mut length, stream)? };
        Ok(length)
    }

    /// Copy the bitstream into `dst` and wait for `stream`.
    ///
    /// Returns the number of bytes written.
    pub fn retrieve_bitstream_into(&self, dst: &mut [u8], stream: &Stream) -> Result<usize> {
        let mut length = dst.len();
        let retrieved = unsafe { self.retrieve_bitstream_raw(dst.as_mut_ptr(), &mut length, stream) };
        let synced = stream.synchronize();
        retrieved?;
        synced?;
        Ok(length)
    }

    /// Copy the whole bitstream into a new vector and wait for `stream`.
    pub fn retrieve_bitstream(&self, stream: &Stream) -> Result<Vec<u8>> {
        let length = self.bitstream_len(stream)?;
        let mut out = vec![0u8; length];
        let written = self.retrieve_bitstream_into(&mut out, stream)?;
        out.truncate(written);
        Ok(out)
    }

    fn copy_from<F>(
        &self,
        op: &'static str,
        params: &mut EncoderParams<'_>,
        source: &JpegStream<'_>,
        stream: &Stream,
        f: F,
    ) -> Result<()>
    where
        F: FnOnce(&NvjpegApi) -> FnEncoderParamsCopy,
    {
        let stream = stream.as_raw()?;
        let source = source.as_raw()?;
        let params = params.as_raw()?;
        let (raw, api) = self.inner.get()?;
        let code = unsafe { f(api)(raw, params, source, stream) };
        check(Library::Nvjpeg, op, code)
    }

    /// Copy the metadata of a parsed JPEG into `params`, for transcoding.
    pub fn copy_metadata(
        &self,
        params: &mut EncoderParams<'_>,
        source: &JpegStream<'_>,
        stream: &Stream,
    ) -> Result<()> {
        self.copy_from("nvjpegEncoderParamsCopyMetadata", params, source, stream, |api| {
            api.encoder_params_copy_metadata
        })
    }

    /// Copy the Huffman tables of a parsed JPEG into `params`.
    pub fn copy_huffman_tables(
        &self,
        params: &mut EncoderParams<'_>,
        source: &JpegStream<'_>,
        stream: &Stream,
    ) -> Result<()> {
        self.copy_from(
            "nvjpegEncoderParamsCopyHuffmanTables",
            params,
            source,
            stream,
            |api| api.encoder_params_copy_huffman_tables,
        )
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
