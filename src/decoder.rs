//! Streaming decoder for the text color protocol.
//!
//! A datagram carries decimal channel values separated by `,`, `\n` or `\r`.
//! Every three values form one pixel, pixels are numbered from 0 in arrival
//! order. Nothing is ever rejected: values are clamped to 255, output stops at
//! the strip length and incomplete trailing pixels are dropped.

use std::iter::FusedIterator;

use rgb::RGB8;

/// Channel slot the next committed value is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    #[default]
    AwaitingR,
    AwaitingG,
    AwaitingB,
}

impl Slot {
    /// Transition taken when a value is committed into this slot.
    /// Returns the next slot and whether the pixel is now complete.
    pub fn advance(self) -> (Slot, bool) {
        match self {
            Slot::AwaitingR => (Slot::AwaitingG, false),
            Slot::AwaitingG => (Slot::AwaitingB, false),
            Slot::AwaitingB => (Slot::AwaitingR, true),
        }
    }

    fn index(self) -> usize {
        match self {
            Slot::AwaitingR => 0,
            Slot::AwaitingG => 1,
            Slot::AwaitingB => 2,
        }
    }
}

/// Value of the channel currently being parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Accumulator {
    value: u8,
    digit_seen: bool,
}

impl Accumulator {
    /// Append a decimal digit (0..=9). Saturates at 255.
    pub fn push_digit(&mut self, digit: u8) {
        let next = self.value as u16 * 10 + digit as u16;
        self.value = next.min(u8::MAX as u16) as u8;
        self.digit_seen = true;
    }

    pub fn digit_seen(&self) -> bool {
        self.digit_seen
    }

    /// Hand out the accumulated value and reset for the next channel.
    pub fn take(&mut self) -> u8 {
        let value = self.value;
        *self = Accumulator::default();
        value
    }
}

#[inline]
fn is_separator(byte: u8) -> bool {
    matches!(byte, b',' | b'\n' | b'\r')
}

/// Lazily decodes `(pixel index, color)` pairs from one datagram.
pub struct FrameDecoder<'a> {
    bytes: &'a [u8],
    pos: usize,
    led_count: usize,
    pixel: usize,
    slot: Slot,
    acc: Accumulator,
    channels: [u8; 3],
}

impl<'a> FrameDecoder<'a> {
    pub fn new(bytes: &'a [u8], led_count: usize) -> Self {
        FrameDecoder {
            bytes,
            pos: 0,
            led_count,
            pixel: 0,
            slot: Slot::default(),
            acc: Accumulator::default(),
            channels: [0; 3],
        }
    }

    /// Commit the accumulator into the current slot, yielding a pixel when
    /// the blue channel was just written.
    fn commit(&mut self) -> Option<(usize, RGB8)> {
        self.channels[self.slot.index()] = self.acc.take();
        let (next, complete) = self.slot.advance();
        self.slot = next;
        if !complete {
            return None;
        }

        let [r, g, b] = self.channels;
        let index = self.pixel;
        self.pixel += 1;
        Some((index, RGB8::new(r, g, b)))
    }
}

impl Iterator for FrameDecoder<'_> {
    type Item = (usize, RGB8);

    fn next(&mut self) -> Option<Self::Item> {
        while self.pixel < self.led_count && self.pos < self.bytes.len() {
            let byte = self.bytes[self.pos];
            self.pos += 1;
            let last = self.pos == self.bytes.len();

            if byte.is_ascii_digit() {
                self.acc.push_digit(byte - b'0');
            }

            // The final byte always commits, even without a digit.
            if (is_separator(byte) || last) && (self.acc.digit_seen() || last) {
                if let Some(pixel) = self.commit() {
                    return Some(pixel);
                }
            }
        }

        None
    }
}

impl FusedIterator for FrameDecoder<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(bytes: &[u8], led_count: usize) -> Vec<(usize, RGB8)> {
        FrameDecoder::new(bytes, led_count).collect()
    }

    fn colors(bytes: &[u8], led_count: usize) -> Vec<RGB8> {
        decode(bytes, led_count).into_iter().map(|(_, c)| c).collect()
    }

    #[test]
    fn test_two_pixels() {
        let pixels = decode(b"255,0,0,0,255,0", 2);
        assert_eq!(pixels, vec![(0, RGB8::new(255, 0, 0)), (1, RGB8::new(0, 255, 0))]);
    }

    #[test]
    fn test_exact_strip_length() {
        let payload = b"1,2,3,4,5,6,7,8,9";
        let pixels = decode(payload, 3);
        assert_eq!(pixels.len(), 3);
        assert_eq!(pixels[2], (2, RGB8::new(7, 8, 9)));
    }

    #[test]
    fn test_clamps_large_values() {
        assert_eq!(colors(b"256,1000,99999999", 1), vec![RGB8::new(255, 255, 255)]);
        assert_eq!(colors(b"0255,300,255", 1), vec![RGB8::new(255, 255, 255)]);
    }

    #[test]
    fn test_truncates_at_strip_length() {
        let pixels = decode(b"1,1,1,2,2,2,3,3,3", 2);
        assert_eq!(pixels, vec![(0, RGB8::new(1, 1, 1)), (1, RGB8::new(2, 2, 2))]);
    }

    #[test]
    fn test_empty_payload() {
        assert!(decode(b"", 10).is_empty());
    }

    #[test]
    fn test_zero_length_strip() {
        assert!(decode(b"1,2,3", 0).is_empty());
    }

    #[test]
    fn test_last_byte_commits_unterminated_number() {
        assert_eq!(colors(b"10,20,30", 1), vec![RGB8::new(10, 20, 30)]);
    }

    #[test]
    fn test_trailing_separator_commits_zero() {
        // The last byte commits even without a digit, so blue becomes 0.
        assert_eq!(colors(b"1,2,,", 1), vec![RGB8::new(1, 2, 0)]);
        assert_eq!(colors(b"1,2,x", 1), vec![RGB8::new(1, 2, 0)]);
        // Here the final separator only commits green; no pixel completes.
        assert!(colors(b"1,2,", 1).is_empty());
        // A complete pixel followed by a separator starts a pixel that never completes.
        assert_eq!(colors(b"1,2,3,", 2), vec![RGB8::new(1, 2, 3)]);
    }

    #[test]
    fn test_mixed_separators() {
        let pixels = colors(b"1\n2\r3,4\r\n5\n6", 2);
        assert_eq!(pixels, vec![RGB8::new(1, 2, 3), RGB8::new(4, 5, 6)]);
    }

    #[test]
    fn test_empty_fields_are_skipped() {
        // Separators without digits do not commit.
        assert_eq!(colors(b",,1,,2,,,3", 1), vec![RGB8::new(1, 2, 3)]);
    }

    #[test]
    fn test_unknown_bytes_are_ignored() {
        assert_eq!(colors(b" 1 2, x3y, 4 ", 1), vec![RGB8::new(12, 3, 4)]);
    }

    #[test]
    fn test_incomplete_pixel_dropped() {
        assert_eq!(decode(b"1,2,3,4,5", 4).len(), 1);
    }

    #[test]
    fn test_extra_values_start_next_pixel() {
        let pixels = colors(b"1,2,3,4", 2);
        assert_eq!(pixels, vec![RGB8::new(1, 2, 3)]);
        let pixels = colors(b"1,2,3,4,5,6,7", 3);
        assert_eq!(pixels, vec![RGB8::new(1, 2, 3), RGB8::new(4, 5, 6)]);
    }

    fn frame(pixels: &[[u8; 3]]) -> String {
        pixels.iter().map(|[r, g, b]| format!("{},{},{},", r, g, b)).collect()
    }

    #[test]
    fn test_comma_after_every_pixel() {
        let payload = frame(&[[1, 2, 3], [4, 5, 6]]);
        assert_eq!(colors(payload.as_bytes(), 2), vec![RGB8::new(1, 2, 3), RGB8::new(4, 5, 6)]);
        // The trailing comma only opens a pixel that never completes
        assert_eq!(decode(payload.as_bytes(), 5).len(), 2);
        // Same frame with the final comma removed
        let trimmed = payload.trim_end_matches(',');
        assert_eq!(colors(trimmed.as_bytes(), 2), colors(payload.as_bytes(), 2));
    }

    #[test]
    fn test_more_pixels_than_strip() {
        let pixels: Vec<[u8; 3]> = (0..115u8).map(|i| [i, i, i]).collect();
        let payload = frame(&pixels);
        let decoded = decode(payload.as_bytes(), 114);
        assert_eq!(decoded.len(), 114);
        assert_eq!(decoded.last(), Some(&(113, RGB8::new(113, 113, 113))));
    }

    #[test]
    fn test_decoder_is_fused() {
        let mut decoder = FrameDecoder::new(b"1,2,3", 1);
        assert!(decoder.next().is_some());
        assert!(decoder.next().is_none());
        assert!(decoder.next().is_none());
    }

    #[test]
    fn test_slot_transitions() {
        assert_eq!(Slot::AwaitingR.advance(), (Slot::AwaitingG, false));
        assert_eq!(Slot::AwaitingG.advance(), (Slot::AwaitingB, false));
        assert_eq!(Slot::AwaitingB.advance(), (Slot::AwaitingR, true));
    }

    #[test]
    fn test_accumulator_saturates_and_resets() {
        let mut acc = Accumulator::default();
        assert!(!acc.digit_seen());
        for d in [2, 5, 6] {
            acc.push_digit(d);
        }
        assert!(acc.digit_seen());
        assert_eq!(acc.take(), 255);
        assert!(!acc.digit_seen());
        assert_eq!(acc.take(), 0);
    }
}
