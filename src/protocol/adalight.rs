/// Build Adalight protocol frame for packed RGB data
pub fn build_adalight_frame(pixel_data: &[u8]) -> Vec<u8> {
    let led_count = pixel_data.len() / 3;

    // Adalight header: 'Ada' + LED count high + LED count low + checksum
    let count_hi = (led_count >> 8) as u8;
    let count_lo = led_count as u8;
    let checksum = count_hi ^ count_lo ^ 0x55;

    let mut frame = Vec::with_capacity(6 + pixel_data.len());
    frame.extend_from_slice(b"Ada");
    frame.push(count_hi);
    frame.push(count_lo);
    frame.push(checksum);
    frame.extend_from_slice(pixel_data);

    frame
}
