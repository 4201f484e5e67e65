use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub fn encode_png(width: u32, height: u32, color: [u8; 4]) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba(color));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub fn encode_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::new_rgb8(width, height);
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Jpeg).unwrap();
    buf.into_inner()
}

pub fn create_test_image_files(temp_dir: &Path) -> Vec<PathBuf> {
    let png_file = temp_dir.join("test.png");
    let jpg_file = temp_dir.join("test.jpg");
    let txt_file = temp_dir.join("test.txt");

    fs::write(&png_file, encode_png(32, 32, [200, 200, 200, 255])).unwrap();
    fs::write(&jpg_file, encode_jpeg(48, 32)).unwrap();
    fs::write(&txt_file, b"not an image").unwrap();

    vec![png_file, jpg_file, txt_file]
}

pub fn create_nested_directory_structure(temp_dir: &Path) -> PathBuf {
    let subdir = temp_dir.join("subdir");
    fs::create_dir(&subdir).unwrap();

    fs::write(
        subdir.join("nested.png"),
        encode_png(16, 16, [10, 20, 30, 255]),
    )
    .unwrap();
    fs::write(subdir.join("nested.txt"), b"nested text").unwrap();

    subdir
}

pub fn create_temp_directory() -> TempDir {
    TempDir::new().unwrap()
}
