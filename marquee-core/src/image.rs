//! 4-bit sprites
//!
//! Images use the framebuffer's nibble packing with a `width / 2` byte
//! stride. An [`ImageList`] is a dense, homogeneous set of sprites read
//! back to back from one file:
//!
//! ```text
//! repeated count times:
//!     i16 width, i16 height, (width / 2) * height packed bytes
//! ```
//!
//! The record count is not stored in the file; the caller supplies it.

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;
use embedded_io::Read;
use marquee_hal::AssetStorage;

use crate::asset::{AssetError, AssetReader};

/// Largest sprite edge accepted from an asset file
pub const MAX_IMAGE_EDGE: i16 = 1024;

/// A packed 4-bit sprite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: i16,
    height: i16,
    pixels: Box<[u8]>,
}

impl Image {
    /// Wrap already-packed pixel data
    ///
    /// Returns `None` when `pixels` does not hold `(width / 2) * height` bytes.
    pub fn from_packed(width: i16, height: i16, pixels: &[u8]) -> Option<Self> {
        if width < 0 || height < 0 || pixels.len() != Self::packed_len(width, height) {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels: pixels.into(),
        })
    }

    /// Read one image record
    pub fn read_from<R: Read>(reader: &mut AssetReader<R>) -> Result<Self, AssetError> {
        let width = reader.read_i16()?;
        let height = reader.read_i16()?;
        if !(0..=MAX_IMAGE_EDGE).contains(&width) || !(0..=MAX_IMAGE_EDGE).contains(&height) {
            return Err(AssetError::InvalidDimensions);
        }

        let mut pixels = vec![0u8; Self::packed_len(width, height)].into_boxed_slice();
        reader.read_bytes(&mut pixels)?;
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    fn packed_len(width: i16, height: i16) -> usize {
        (width as usize / 2) * height as usize
    }

    pub fn width(&self) -> i16 {
        self.width
    }

    pub fn height(&self) -> i16 {
        self.height
    }

    /// Bytes per row
    pub fn stride(&self) -> usize {
        self.width as usize / 2
    }

    /// Packed pixel data, row-major
    pub fn data(&self) -> &[u8] {
        &self.pixels
    }

    /// Pixel level at `(x, y)`, 0 outside the image
    pub fn pixel(&self, x: i16, y: i16) -> u8 {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return 0;
        }
        // odd widths leave the last column without storage
        if x as usize >= self.stride() * 2 {
            return 0;
        }
        let data = self.pixels[y as usize * self.stride() + x as usize / 2];
        if x % 2 != 0 {
            data & 0x0F
        } else {
            (data >> 4) & 0x0F
        }
    }
}

/// Homogeneous sprite list owned as one block
#[derive(Debug, Clone, Default)]
pub struct ImageList {
    images: Box<[Image]>,
}

impl ImageList {
    /// Load `count` images from asset storage
    pub fn load<S: AssetStorage>(storage: &mut S, path: &str, count: usize) -> Result<Self, AssetError> {
        let file = match storage.open(path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Cannot open image list {}", path);
                return Err(e.into());
            }
        };
        let list = Self::read_from(file, count)?;
        info!("{} loaded ({} images)", path, count);
        Ok(list)
    }

    /// Read `count` consecutive image records from a stream
    pub fn read_from<R: Read>(reader: R, count: usize) -> Result<Self, AssetError> {
        let mut reader = AssetReader::new(reader);
        let mut images = Vec::with_capacity(count);
        for _ in 0..count {
            images.push(Image::read_from(&mut reader)?);
        }
        Ok(Self {
            images: images.into_boxed_slice(),
        })
    }

    /// Build a list from images already in memory
    pub fn from_images(images: Vec<Image>) -> Self {
        Self {
            images: images.into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Width shared by every sprite, 0 for an empty list
    pub fn image_width(&self) -> i16 {
        self.images.first().map_or(0, Image::width)
    }

    /// Height shared by every sprite, 0 for an empty list
    pub fn image_height(&self) -> i16 {
        self.images.first().map_or(0, Image::height)
    }

    /// Sprite at `index`, if any
    pub fn get(&self, index: usize) -> Option<&Image> {
        self.images.get(index)
    }

    /// Sprite at `index`
    ///
    /// # Panics
    /// Panics if `index >= self.len()`; indices come from UI code and an
    /// out-of-range one is a bug, not a runtime condition.
    pub fn image(&self, index: usize) -> &Image {
        match self.images.get(index) {
            Some(image) => image,
            None => panic!("image index {} out of range ({})", index, self.images.len()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Image> {
        self.images.iter()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Serialize images into the on-disk list layout
    pub(crate) fn image_file(images: &[(i16, i16, &[u8])]) -> Vec<u8> {
        let mut out = Vec::new();
        for &(w, h, data) in images {
            out.extend_from_slice(&w.to_le_bytes());
            out.extend_from_slice(&h.to_le_bytes());
            out.extend_from_slice(data);
        }
        out
    }

    #[test]
    fn test_pixel_unpacking() {
        let image = Image::from_packed(4, 2, &[0x12, 0x34, 0x56, 0x78]).unwrap();
        assert_eq!(image.pixel(0, 0), 0x1);
        assert_eq!(image.pixel(1, 0), 0x2);
        assert_eq!(image.pixel(3, 1), 0x8);
        assert_eq!(image.pixel(4, 0), 0);
        assert_eq!(image.pixel(0, -1), 0);
    }

    #[test]
    fn test_odd_width_last_column_is_blank() {
        let image = Image::from_packed(3, 2, &[0x12, 0x34]).unwrap();
        assert_eq!(image.stride(), 1);
        assert_eq!(image.pixel(1, 0), 0x2);
        assert_eq!(image.pixel(2, 0), 0);
        assert_eq!(image.pixel(0, 1), 0x3);
        assert_eq!(image.pixel(2, 1), 0);
    }

    #[test]
    fn test_from_packed_checks_length() {
        assert!(Image::from_packed(4, 2, &[0; 3]).is_none());
    }

    #[test]
    fn test_load_list() {
        let data = image_file(&[(2, 1, &[0xF0]), (2, 1, &[0x0F]), (2, 1, &[0xAA])]);
        let list = ImageList::read_from(data.as_slice(), 3).unwrap();
        assert_eq!(list.len(), 3);
        assert_eq!(list.image_width(), 2);
        assert_eq!(list.image_height(), 1);
        assert_eq!(list.image(1).pixel(1, 0), 0xF);
        assert_eq!(list.image(2).data(), &[0xAA]);
    }

    #[test]
    fn test_count_comes_from_caller() {
        let data = image_file(&[(2, 1, &[0xF0]), (2, 1, &[0x0F])]);
        let list = ImageList::read_from(data.as_slice(), 1).unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_short_file() {
        let data = image_file(&[(2, 1, &[0xF0])]);
        assert_eq!(
            ImageList::read_from(data.as_slice(), 2).err(),
            Some(AssetError::Truncated)
        );
    }

    #[test]
    fn test_negative_dimensions_rejected() {
        let data = image_file(&[(-2, 1, &[])]);
        assert_eq!(
            ImageList::read_from(data.as_slice(), 1).err(),
            Some(AssetError::InvalidDimensions)
        );
    }

    #[test]
    fn test_get_out_of_range() {
        let list = ImageList::default();
        assert!(list.get(0).is_none());
        assert_eq!(list.image_width(), 0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_image_out_of_range_panics() {
        let data = image_file(&[(2, 1, &[0xF0])]);
        let list = ImageList::read_from(data.as_slice(), 1).unwrap();
        let _ = list.image(1);
    }
}
