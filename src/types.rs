//! Typed mode values passed to the native libraries.

/// Floating point precision used by the iterative refinement solver
/// (`cusolverPrecType_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// Real 64-bit.
    R64F,
    /// Real 32-bit.
    R32F,
    /// Real 16-bit half.
    R16F,
    /// Real bfloat16.
    R16BF,
    /// Real TensorFloat-32.
    RTF32,
    /// Complex 64-bit.
    C64F,
    /// Complex 32-bit.
    C32F,
    /// Complex 16-bit half.
    C16F,
    /// Complex bfloat16.
    C16BF,
    /// Complex TensorFloat-32.
    CTF32,
}

impl From<Precision> for i32 {
    fn from(p: Precision) -> i32 {
        match p {
            Precision::R64F => 1203,
            Precision::R32F => 1204,
            Precision::R16F => 1205,
            Precision::R16BF => 1206,
            Precision::RTF32 => 1207,
            Precision::C64F => 1213,
            Precision::C32F => 1214,
            Precision::C16F => 1215,
            Precision::C16BF => 1216,
            Precision::CTF32 => 1217,
        }
    }
}

/// Refinement solver (`cusolverIRSRefinement_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Refinement {
    #[default]
    NotSet,
    /// No refinement: plain solve at the lowest precision.
    None,
    Classical,
    ClassicalGmres,
    Gmres,
    GmresGmres,
    GmresNoPrecond,
}

impl From<Refinement> for i32 {
    fn from(r: Refinement) -> i32 {
        match r {
            Refinement::NotSet => 1100,
            Refinement::None => 1101,
            Refinement::Classical => 1102,
            Refinement::ClassicalGmres => 1103,
            Refinement::Gmres => 1104,
            Refinement::GmresGmres => 1105,
            Refinement::GmresNoPrecond => 1106,
        }
    }
}

/// Decoded pixel layout (`nvjpegOutputFormat_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Planar, same color space as the bitstream.
    #[default]
    Unchanged,
    Yuv,
    /// Luma only.
    Y,
    Rgb,
    Bgr,
    /// Interleaved RGB.
    RgbI,
    /// Interleaved BGR.
    BgrI,
}

impl From<OutputFormat> for i32 {
    fn from(f: OutputFormat) -> i32 {
        match f {
            OutputFormat::Unchanged => 0,
            OutputFormat::Yuv => 1,
            OutputFormat::Y => 2,
            OutputFormat::Rgb => 3,
            OutputFormat::Bgr => 4,
            OutputFormat::RgbI => 5,
            OutputFormat::BgrI => 6,
        }
    }
}

/// Source pixel layout for `encode_image` (`nvjpegInputFormat_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Rgb,
    Bgr,
    RgbI,
    BgrI,
}

impl From<InputFormat> for i32 {
    fn from(f: InputFormat) -> i32 {
        match f {
            InputFormat::Rgb => 3,
            InputFormat::Bgr => 4,
            InputFormat::RgbI => 5,
            InputFormat::BgrI => 6,
        }
    }
}

/// Chroma subsampling (`nvjpegChromaSubsampling_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromaSubsampling {
    Css444,
    Css422,
    Css420,
    Css440,
    Css411,
    Css410,
    Gray,
    Css410V,
}

impl From<ChromaSubsampling> for i32 {
    fn from(c: ChromaSubsampling) -> i32 {
        match c {
            ChromaSubsampling::Css444 => 0,
            ChromaSubsampling::Css422 => 1,
            ChromaSubsampling::Css420 => 2,
            ChromaSubsampling::Css440 => 3,
            ChromaSubsampling::Css411 => 4,
            ChromaSubsampling::Css410 => 5,
            ChromaSubsampling::Gray => 6,
            ChromaSubsampling::Css410V => 7,
        }
    }
}

/// Output downscaling, hardware backend only (`nvjpegScaleFactor_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleFactor {
    #[default]
    None,
    OneHalf,
    OneQuarter,
    OneEighth,
}

impl From<ScaleFactor> for i32 {
    fn from(s: ScaleFactor) -> i32 {
        match s {
            ScaleFactor::None => 0,
            ScaleFactor::OneHalf => 1,
            ScaleFactor::OneQuarter => 2,
            ScaleFactor::OneEighth => 3,
        }
    }
}

/// EXIF orientation applied while decoding (`nvjpegExifOrientation_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExifOrientation {
    #[default]
    Unknown,
    Horizontal,
    MirrorHorizontal,
    Rotate180,
    MirrorVertical,
    MirrorHorizontalRotate270,
    Rotate90,
    MirrorHorizontalRotate90,
    Rotate270,
}

impl From<ExifOrientation> for i32 {
    fn from(o: ExifOrientation) -> i32 {
        match o {
            ExifOrientation::Unknown => 0,
            ExifOrientation::Horizontal => 1,
            ExifOrientation::MirrorHorizontal => 2,
            ExifOrientation::Rotate180 => 3,
            ExifOrientation::MirrorVertical => 4,
            ExifOrientation::MirrorHorizontalRotate270 => 5,
            ExifOrientation::Rotate90 => 6,
            ExifOrientation::MirrorHorizontalRotate90 => 7,
            ExifOrientation::Rotate270 => 8,
        }
    }
}

/// JPEG coding process written by the encoder (`nvjpegJpegEncoding_t`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JpegEncoding {
    #[default]
    BaselineDct,
    ExtendedDctHuffman,
    ProgressiveDctHuffman,
}

impl From<JpegEncoding> for i32 {
    fn from(e: JpegEncoding) -> i32 {
        match e {
            JpegEncoding::BaselineDct => 0xc0,
            JpegEncoding::ExtendedDctHuffman => 0xc1,
            JpegEncoding::ProgressiveDctHuffman => 0xc2,
        }
    }
}

/// Decode region of interest, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roi {
    pub offset_x: i32,
    pub offset_y: i32,
    pub width: i32,
    pub height: i32,
}

impl Roi {
    /// Decode the whole image.
    pub const FULL: Roi = Roi {
        offset_x: 0,
        offset_y: 0,
        width: -1,
        height: -1,
    };

    /// A region of `width` x `height` pixels at the given offset.
    pub fn new(offset_x: i32, offset_y: i32, width: i32, height: i32) -> Self {
        Self {
            offset_x,
            offset_y,
            width,
            height,
        }
    }
}

impl Default for Roi {
    fn default() -> Self {
        Self::FULL
    }
}
