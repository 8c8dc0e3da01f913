/// Build AWA protocol frame (HyperSerial format) for packed RGB data
pub fn build_awa_frame(pixel_data: &[u8]) -> Vec<u8> {
    // The header carries the index of the last LED
    let last_led = (pixel_data.len() / 3).saturating_sub(1);

    let count_hi = (last_led >> 8) as u8;
    let count_lo = last_led as u8;
    let crc = (count_hi ^ count_lo) ^ 0x55;

    let mut frame = Vec::with_capacity(6 + pixel_data.len() + 3);
    frame.extend_from_slice(b"Awa");
    frame.push(count_hi);
    frame.push(count_lo);
    frame.push(crc);
    frame.extend_from_slice(pixel_data);
    frame.extend_from_slice(&fletcher_trailer(pixel_data));

    frame
}

/// Fletcher checksums appended after the pixel data
fn fletcher_trailer(pixel_data: &[u8]) -> [u8; 3] {
    let mut fletcher1: u32 = 0;
    let mut fletcher2: u32 = 0;
    let mut fletcher_ext: u32 = 0;

    for (position, &byte) in pixel_data.iter().enumerate() {
        // The position is a 16-bit counter on the controller side
        let position = position as u16 as u32;
        fletcher1 = (fletcher1 + byte as u32) % 255;
        fletcher2 = (fletcher2 + fletcher1) % 255;
        fletcher_ext = (fletcher_ext + (byte as u32 ^ position)) % 255;
    }

    // 0x41 ('A') would look like the start of a new frame
    if fletcher_ext == 0x41 {
        fletcher_ext = 0xaa;
    }

    [fletcher1 as u8, fletcher2 as u8, fletcher_ext as u8]
}
