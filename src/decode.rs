//! Decode parameters.

use std::marker::PhantomData;

use crate::error::{Library, Result};
use crate::ffi::nvjpeg::FnDecodeParamsSetInt;
use crate::ffi::{check, DecodeParamsHandle, NvjpegApi, StatusCode};
use crate::jpeg::NvJpeg;
use crate::resource::{Owned, Resource};
use crate::types::{ExifOrientation, OutputFormat, Roi, ScaleFactor};

impl Resource for DecodeParamsHandle {
    type Api = NvjpegApi;
    const KIND: &'static str = "DecodeParams";
    const LIBRARY: Library = Library::Nvjpeg;
    const DESTROY: &'static str = "nvjpegDecodeParamsDestroy";

    unsafe fn destroy(self, api: &NvjpegApi) -> StatusCode {
        (api.decode_params_destroy)(self)
    }
}

/// Owned `nvjpegDecodeParams_t`: output format, region of interest and
/// orientation of a decode.
pub struct DecodeParams<'a> {
    inner: Owned<DecodeParamsHandle>,
    _ctx: PhantomData<&'a NvJpeg>,
}

impl<'a> DecodeParams<'a> {
    /// Create decode parameters owned by `ctx`.
    pub fn new(ctx: &'a NvJpeg) -> Result<Self> {
        let handle = ctx.as_raw()?;
        let inner = Owned::<DecodeParamsHandle>::create(
            ctx.shared_api(),
            "nvjpegDecodeParamsCreate",
            |api, out| unsafe { (api.decode_params_create)(handle, out) },
        )?;
        Ok(Self {
            inner,
            _ctx: PhantomData,
        })
    }

    /// Returns the inner handle.
    pub fn as_raw(&self) -> Result<DecodeParamsHandle> {
        self.inner.raw()
    }

    fn set_int<F>(&mut self, op: &'static str, value: i32, f: F) -> Result<()>
    where
        F: FnOnce(&NvjpegApi) -> FnDecodeParamsSetInt,
    {
        let (raw, api) = self.inner.get()?;
        let code = unsafe { f(api)(raw, value) };
        check(Library::Nvjpeg, op, code)
    }

    /// Pixel format and plane layout of the decoded output.
    pub fn set_output_format(&mut self, format: OutputFormat) -> Result<()> {
        self.set_int("nvjpegDecodeParamsSetOutputFormat", format.into(), |api| {
            api.decode_params_set_output_format
        })
    }

    /// Decode only `roi`. [`Roi::FULL`] restores whole-image decoding.
    pub fn set_roi(&mut self, roi: Roi) -> Result<()> {
        let (raw, api) = self.inner.get()?;
        let code = unsafe {
            (api.decode_params_set_roi)(raw, roi.offset_x, roi.offset_y, roi.width, roi.height)
        };
        check(Library::Nvjpeg, "nvjpegDecodeParamsSetROI", code)
    }

    /// Accept CMYK input, converting it to the output format.
    pub fn set_allow_cmyk(&mut self, allow: bool) -> Result<()> {
        self.set_int("nvjpegDecodeParamsSetAllowCMYK", allow as i32, |api| {
            api.decode_params_set_allow_cmyk
        })
    }

    /// Downscale the output. Only the hardware backend honors this.
    pub fn set_scale_factor(&mut self, factor: ScaleFactor) -> Result<()> {
        self.set_int("nvjpegDecodeParamsSetScaleFactor", factor.into(), |api| {
            api.decode_params_set_scale_factor
        })
    }

    /// Orientation to apply, overriding any EXIF tag in the image.
    pub fn set_exif_orientation(&mut self, orientation: ExifOrientation) -> Result<()> {
        self.set_int(
            "nvjpegDecodeParamsSetExifOrientation",
            orientation.into(),
            |api| api.decode_params_set_exif_orientation,
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
