use std::path::PathBuf;

use texel_core::color::float_to_byte;
use texel_core::raster::{PatternParams, make_checker_image};
use texel_core::{Image, Image4b, Image4f};
use texel_io::{
    IoError, load_image4b, load_image4b_from_memory, load_image4f, save_image3f, save_image4b,
    save_image4f,
};

/// Per-test scratch file under the system temp dir.
fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("texel-io-{}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir.join(name)
}

fn gradient4b() -> Image4b {
    Image::from_fn(7, 5, |x, y| [(x * 30) as u8, (y * 50) as u8, 128, 255 - (x * y) as u8])
        .expect("gradient")
}

#[test]
fn png_roundtrip_is_lossless_for_bytes() {
    let path = scratch("bytes.png");
    let img = gradient4b();
    save_image4b(&path, &img).expect("save png");
    let back = load_image4b(&path).expect("load png");
    assert_eq!(back, img);

    let bytes = std::fs::read(&path).expect("read png");
    assert_eq!(load_image4b_from_memory(&bytes).expect("decode png"), img);
}

#[test]
fn exr_roundtrip_keeps_hdr_values() {
    let path = scratch("radiance.exr");
    let img: Image4f = Image::from_fn(4, 3, |x, y| [x as f32 * 3.5, y as f32 * 10.0, 0.25, 1.0])
        .expect("hdr image");
    save_image4f(&path, &img, 2.2).expect("save exr");
    let back = load_image4f(&path, 2.2).expect("load exr");
    assert_eq!(back.width(), 4);
    for (a, b) in back.pixels().iter().zip(img.pixels()) {
        for c in 0..4 {
            assert!((a[c] - b[c]).abs() < 1e-3, "{a:?} vs {b:?}");
        }
    }
}

#[test]
fn float_png_roundtrip_within_quantization() {
    let path = scratch("float.png");
    let img: Image4f = Image::from_fn(8, 2, |x, _| {
        let v = x as f32 / 8.0;
        [v, 1.0 - v, 0.5, 1.0]
    })
    .expect("ramp");
    save_image4f(&path, &img, 1.0).expect("save png");
    let back = load_image4f(&path, 1.0).expect("load png");
    for (a, b) in back.pixels().iter().zip(img.pixels()) {
        // Bytes are written with ×256 truncation and read back as /255.
        let expected = float_to_byte(*b).map(|v| v as f32 / 255.0);
        for c in 0..4 {
            assert!((a[c] - expected[c]).abs() < 1e-6, "{a:?} vs {expected:?}");
        }
    }
}

#[test]
fn generated_checker_survives_save_and_load() {
    let path = scratch("checker.png");
    let params = PatternParams { tile: 4, color0: [0.0; 3], color1: [1.0; 3] };
    let img = make_checker_image(8, 8, &params).expect("checker");
    save_image3f(&path, &img, 2.2).expect("save");
    let back = load_image4b(&path).expect("load");
    assert_eq!(back.at(0, 0), [0, 0, 0, 255]);
    assert_eq!(back.at(4, 0), [255, 255, 255, 255]);
}

#[test]
fn unknown_extension_is_unsupported() {
    let path = scratch("image.notaformat");
    let err = save_image4b(&path, &gradient4b()).unwrap_err();
    assert!(matches!(err, IoError::Unsupported(_)), "{err}");
}

#[test]
fn missing_file_reports_error() {
    let path = scratch("does-not-exist.png");
    assert!(load_image4b(&path).is_err());
}
