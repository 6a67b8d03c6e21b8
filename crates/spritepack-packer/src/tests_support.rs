//! Shared helpers for packer tests.

use spritepack_core::Texture;

use crate::png::write_rgba_to_vec;

/// Build a solid-color PNG texture of the given size.
pub(crate) fn png_texture(path: &str, width: u32, height: u32) -> Texture {
    let pixels = vec![0xA0u8; width as usize * height as usize * 4];
    Texture {
        path: path.to_string(),
        contents: write_rgba_to_vec(width, height, &pixels).unwrap(),
    }
}
