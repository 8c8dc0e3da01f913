use serde::{Deserialize, Serialize};

/// Channel order the strip expects on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PixelOrder {
    #[default]
    Rgb,
    Grb,
    Bgr,
}

/// Reorder packed RGB data into the strip's channel order
pub fn transform_pixels(data: &mut [u8], order: PixelOrder) {
    match order {
        PixelOrder::Rgb => {} // No transformation needed
        PixelOrder::Grb => swap_channels(data, 0, 1),
        PixelOrder::Bgr => swap_channels(data, 0, 2),
    }
}

/// Swap two channels of every pixel in-place
fn swap_channels(data: &mut [u8], a: usize, b: usize) {
    for pixel in data.chunks_exact_mut(3) {
        pixel.swap(a, b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_passthrough() {
        let mut data = vec![255, 0, 0, 0, 255, 0, 0, 0, 255];
        transform_pixels(&mut data, PixelOrder::Rgb);
        assert_eq!(data, vec![255, 0, 0, 0, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn test_grb_transform() {
        let mut data = vec![255, 0, 0, 1, 2, 3]; // Red, then a mixed pixel
        transform_pixels(&mut data, PixelOrder::Grb);
        assert_eq!(&data[..], &[0, 255, 0, 2, 1, 3]);
    }

    #[test]
    fn test_bgr_transform() {
        let mut data = vec![255, 0, 0]; // Red in RGB
        transform_pixels(&mut data, PixelOrder::Bgr);
        assert_eq!(&data[..], &[0, 0, 255]);
    }

    #[test]
    fn test_partial_pixel_untouched() {
        let mut data = vec![1, 2, 3, 4, 5];
        transform_pixels(&mut data, PixelOrder::Grb);
        assert_eq!(&data[..], &[2, 1, 3, 4, 5]);
    }

    #[test]
    fn test_order_from_json() {
        let order: PixelOrder = serde_json::from_str("\"GRB\"").unwrap();
        assert_eq!(order, PixelOrder::Grb);
        assert!(serde_json::from_str::<PixelOrder>("\"RGBW\"").is_err());
    }
}
