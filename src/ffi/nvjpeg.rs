//! nvJPEG entry points.

use std::os::raw::{c_int, c_uint};
use std::path::Path;

use libloading::Library as SharedLibrary;

use super::handles::{
    CudaStreamHandle, DecodeParamsHandle, EncoderParamsHandle, EncoderStateHandle,
    JpegStreamHandle, NvjpegHandle,
};
use super::loader;
use super::raw::{NvjpegImage, StatusCode};
use crate::error::{Library, Result};

pub type FnGetProperty = unsafe extern "C" fn(kind: c_int, value: *mut c_int) -> StatusCode;
pub type FnCreateSimple = unsafe extern "C" fn(handle: *mut NvjpegHandle) -> StatusCode;
pub type FnDestroy = unsafe extern "C" fn(handle: NvjpegHandle) -> StatusCode;

// Decode parameters
pub type FnDecodeParamsCreate =
    unsafe extern "C" fn(handle: NvjpegHandle, params: *mut DecodeParamsHandle) -> StatusCode;
pub type FnDecodeParamsDestroy = unsafe extern "C" fn(params: DecodeParamsHandle) -> StatusCode;
pub type FnDecodeParamsSetInt =
    unsafe extern "C" fn(params: DecodeParamsHandle, value: c_int) -> StatusCode;
pub type FnDecodeParamsSetRoi = unsafe extern "C" fn(
    params: DecodeParamsHandle,
    offset_x: c_int,
    offset_y: c_int,
    roi_width: c_int,
    roi_height: c_int,
) -> StatusCode;

// Encoder state
pub type FnEncoderStateCreate = unsafe extern "C" fn(
    handle: NvjpegHandle,
    state: *mut EncoderStateHandle,
    stream: CudaStreamHandle,
) -> StatusCode;
pub type FnEncoderStateDestroy = unsafe extern "C" fn(state: EncoderStateHandle) -> StatusCode;

// Encoder parameters
pub type FnEncoderParamsCreate = unsafe extern "C" fn(
    handle: NvjpegHandle,
    params: *mut EncoderParamsHandle,
    stream: CudaStreamHandle,
) -> StatusCode;
pub type FnEncoderParamsDestroy = unsafe extern "C" fn(params: EncoderParamsHandle) -> StatusCode;
pub type FnEncoderParamsSetInt = unsafe extern "C" fn(
    params: EncoderParamsHandle,
    value: c_int,
    stream: CudaStreamHandle,
) -> StatusCode;
pub type FnEncoderParamsCopy = unsafe extern "C" fn(
    state: EncoderStateHandle,
    params: EncoderParamsHandle,
    jpeg_stream: JpegStreamHandle,
    stream: CudaStreamHandle,
) -> StatusCode;

// Encoding
pub type FnEncode = unsafe extern "C" fn(
    handle: NvjpegHandle,
    state: EncoderStateHandle,
    params: EncoderParamsHandle,
    source: *const NvjpegImage,
    format: c_int,
    image_width: c_int,
    image_height: c_int,
    stream: CudaStreamHandle,
) -> StatusCode;
pub type FnEncodeRetrieveBitstream = unsafe extern "C" fn(
    handle: NvjpegHandle,
    state: EncoderStateHandle,
    data: *mut u8,
    length: *mut usize,
    stream: CudaStreamHandle,
) -> StatusCode;

// Parsed JPEG streams
pub type FnJpegStreamCreate =
    unsafe extern "C" fn(handle: NvjpegHandle, jpeg_stream: *mut JpegStreamHandle) -> StatusCode;
pub type FnJpegStreamDestroy = unsafe extern "C" fn(jpeg_stream: JpegStreamHandle) -> StatusCode;
pub type FnJpegStreamParse = unsafe extern "C" fn(
    handle: NvjpegHandle,
    data: *const u8,
    length: usize,
    save_metadata: c_int,
    save_stream: c_int,
    jpeg_stream: JpegStreamHandle,
) -> StatusCode;
pub type FnJpegStreamGetFrameDimensions = unsafe extern "C" fn(
    jpeg_stream: JpegStreamHandle,
    width: *mut c_uint,
    height: *mut c_uint,
) -> StatusCode;
pub type FnJpegStreamGetComponentsNum =
    unsafe extern "C" fn(jpeg_stream: JpegStreamHandle, components: *mut c_uint) -> StatusCode;

/// Resolved nvJPEG functions.
pub struct NvjpegApi {
    pub(crate) _lib: Option<SharedLibrary>,
    pub(crate) get_property: FnGetProperty,
    pub(crate) create_simple: FnCreateSimple,
    pub(crate) destroy: FnDestroy,
    pub(crate) decode_params_create: FnDecodeParamsCreate,
    pub(crate) decode_params_destroy: FnDecodeParamsDestroy,
    pub(crate) decode_params_set_output_format: FnDecodeParamsSetInt,
    pub(crate) decode_params_set_roi: FnDecodeParamsSetRoi,
    pub(crate) decode_params_set_allow_cmyk: FnDecodeParamsSetInt,
    pub(crate) decode_params_set_scale_factor: FnDecodeParamsSetInt,
    pub(crate) decode_params_set_exif_orientation: FnDecodeParamsSetInt,
    pub(crate) encoder_state_create: FnEncoderStateCreate,
    pub(crate) encoder_state_destroy: FnEncoderStateDestroy,
    pub(crate) encoder_params_create: FnEncoderParamsCreate,
    pub(crate) encoder_params_destroy: FnEncoderParamsDestroy,
    pub(crate) encoder_params_set_quality: FnEncoderParamsSetInt,
    pub(crate) encoder_params_set_encoding: FnEncoderParamsSetInt,
    pub(crate) encoder_params_set_optimized_huffman: FnEncoderParamsSetInt,
    pub(crate) encoder_params_set_sampling_factors: FnEncoderParamsSetInt,
    pub(crate) encoder_params_copy_metadata: FnEncoderParamsCopy,
    pub(crate) encoder_params_copy_huffman_tables: FnEncoderParamsCopy,
    pub(crate) encode_yuv: FnEncode,
    pub(crate) encode_image: FnEncode,
    pub(crate) encode_retrieve_bitstream: FnEncodeRetrieveBitstream,
    pub(crate) encode_retrieve_bitstream_device: FnEncodeRetrieveBitstream,
    pub(crate) jpeg_stream_create: FnJpegStreamCreate,
    pub(crate) jpeg_stream_destroy: FnJpegStreamDestroy,
    pub(crate) jpeg_stream_parse: FnJpegStreamParse,
    pub(crate) jpeg_stream_get_frame_dimensions: FnJpegStreamGetFrameDimensions,
    pub(crate) jpeg_stream_get_components_num: FnJpegStreamGetComponentsNum,
}

impl NvjpegApi {
    /// Load from the default search path.
    pub fn load() -> Result<Self> {
        Self::resolve(loader::open(Library::Nvjpeg)?)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        Self::resolve(loader::open_path(Library::Nvjpeg, path)?)
    }

    fn resolve(lib: SharedLibrary) -> Result<Self> {
        const L: Library = Library::Nvjpeg;
        unsafe {
            Ok(Self {
                get_property: loader::symbol(&lib, L, "nvjpegGetProperty")?,
                create_simple: loader::symbol(&lib, L, "nvjpegCreateSimple")?,
                destroy: loader::symbol(&lib, L, "nvjpegDestroy")?,
                decode_params_create: loader::symbol(&lib, L, "nvjpegDecodeParamsCreate")?,
                decode_params_destroy: loader::symbol(&lib, L, "nvjpegDecodeParamsDestroy")?,
                decode_params_set_output_format: loader::symbol(
                    &lib,
                    L,
                    "nvjpegDecodeParamsSetOutputFormat",
                )?,
                decode_params_set_roi: loader::symbol(&lib, L, "nvjpegDecodeParamsSetROI")?,
                decode_params_set_allow_cmyk: loader::symbol(
                    &lib,
                    L,
                    "nvjpegDecodeParamsSetAllowCMYK",
                )?,
                decode_params_set_scale_factor: loader::symbol(
                    &lib,
                    L,
                    "nvjpegDecodeParamsSetScaleFactor",
                )?,
                decode_params_set_exif_orientation: loader::symbol(
                    &lib,
                    L,
                    "nvjpegDecodeParamsSetExifOrientation",
                )?,
                encoder_state_create: loader::symbol(&lib, L, "nvjpegEncoderStateCreate")?,
                encoder_state_destroy: loader::symbol(&lib, L, "nvjpegEncoderStateDestroy")?,
                encoder_params_create: loader::symbol(&lib, L, "nvjpegEncoderParamsCreate")?,
                encoder_params_destroy: loader::symbol(&lib, L, "nvjpegEncoderParamsDestroy")?,
                encoder_params_set_quality: loader::symbol(
                    &lib,
                    L,
                    "nvjpegEncoderParamsSetQuality",
                )?,
                encoder_params_set_encoding: loader::symbol(
                    &lib,
                    L,
                    "nvjpegEncoderParamsSetEncoding",
                )?,
                encoder_params_set_optimized_huffman: loader::symbol(
                    &lib,
                    L,
                    "nvjpegEncoderParamsSetOptimizedHuffman",
                )?,
                encoder_params_set_sampling_factors: loader::symbol(
                    &lib,
                    L,
                    "nvjpegEncoderParamsSetSamplingFactors",
                )?,
                encoder_params_copy_metadata: loader::symbol(
                    &lib,
                    L,
                    "nvjpegEncoderParamsCopyMetadata",
                )?,
                encoder_params_copy_huffman_tables: loader::symbol(
                    &lib,
                    L,
                    "nvjpegEncoderParamsCopyHuffmanTables",
                )?,
                encode_yuv: loader::symbol(&lib, L, "nvjpegEncodeYUV")?,
                encode_image: loader::symbol(&lib, L, "nvjpegEncodeImage")?,
                encode_retrieve_bitstream: loader::symbol(
                    &lib,
                    L,
                    "nvjpegEncodeRetrieveBitstream",
                )?,
                encode_retrieve_bitstream_device: loader::symbol(
                    &lib,
                    L,
                    "nvjpegEncodeRetrieveBitstreamDevice",
                )?,
                jpeg_stream_create: loader::symbol(&lib, L, "nvjpegJpegStreamCreate")?,
                jpeg_stream_destroy: loader::symbol(&lib, L, "nvjpegJpegStreamDestroy")?,
                jpeg_stream_parse: loader::symbol(&lib, L, "nvjpegJpegStreamParse")?,
                jpeg_stream_get_frame_dimensions: loader::symbol(
                    &lib,
                    L,
                    "nvjpegJpegStreamGetFrameDimensions",
                )?,
                jpeg_stream_get_components_num: loader::symbol(
                    &lib,
                    L,
                    "nvjpegJpegStreamGetComponentsNum",
                )?,
                _lib: Some(lib),
            })
        }
    }
}
