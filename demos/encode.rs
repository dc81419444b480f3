//! Encode a generated gradient to JPEG with nvJPEG.
//!
//! Run with: cargo run --example encode -- out.jpg

use std::env;
use std::fs;

use nvlibs::{ChromaSubsampling, CudaRuntime, Image, InputFormat, JpegEncoding, NvjpegLib};

const WIDTH: usize = 320;
const HEIGHT: usize = 240;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out = env::args().nth(1).unwrap_or_else(|| "gradient.jpg".to_string());

    let cuda = CudaRuntime::load()?;
    let jpeg = NvjpegLib::load()?;
    println!("CUDA runtime: {}", cuda.version()?);
    println!("nvJPEG: {:?}", jpeg.version()?);

    // Interleaved RGB gradient
    let mut pixels = Vec::with_capacity(WIDTH * HEIGHT * 3);
    for y in 0..HEIGHT {
        for x in 0..WIDTH {
            pixels.push((x * 255 / WIDTH) as u8);
            pixels.push((y * 255 / HEIGHT) as u8);
            pixels.push(128);
        }
    }

    let stream = cuda.create_stream()?;
    let mut frame = cuda.alloc(pixels.len())?;
    frame.copy_from_host(&pixels)?;

    let ctx = jpeg.create()?;
    let mut params = ctx.encoder_params(&stream)?;
    params.set_quality(85, &stream)?;
    params.set_encoding(JpegEncoding::BaselineDct, &stream)?;
    params.set_sampling_factors(ChromaSubsampling::Css420, &stream)?;
    params.set_optimized_huffman(true, &stream)?;

    let mut state = ctx.encoder_state(&stream)?;
    let image = Image::interleaved(&frame, WIDTH * 3)?;
    state.encode_image(
        &params,
        &image,
        InputFormat::RgbI,
        WIDTH as i32,
        HEIGHT as i32,
        &stream,
    )?;

    let bytes = state.retrieve_bitstream(&stream)?;
    fs::write(&out, &bytes)?;
    println!("Wrote {} bytes to {}", bytes.len(), out);

    // Read the headers back
    let mut parsed = ctx.jpeg_stream()?;
    parsed.parse(&bytes, false)?;
    let (w, h) = parsed.frame_dimensions()?;
    println!("Parsed: {}x{}, {} components", w, h, parsed.components()?);

    Ok(())
}
