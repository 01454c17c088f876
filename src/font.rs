//! Seven-segment glyph encoding for printable ASCII.

/// First character covered by [`SEGMENT_FONT`].
const FONT_START: char = '0';

/// Last character covered by [`SEGMENT_FONT`].
const FONT_END: char = 'z';

/// Segment masks for `'0'..='z'`, indexed by `character - '0'`.
///
/// Bit layout is `.abcdefg` (bit 7 = decimal point, bit 0 = segment g),
/// matching the digit registers with decode mode off. Characters that have
/// no legible seven-segment rendering are left at `0x00`.
const SEGMENT_FONT: [u8; 75] = [
    //  0     1     2     3     4     5     6     7     8     9     :     ;
    0x7E, 0x30, 0x6D, 0x79, 0x33, 0x5B, 0x5F, 0x70, 0x7F, 0x7B, 0x00, 0x00,
    //  <     =     >     ?     @     A     B     C     D     E     F     G
    0x00, 0x00, 0x00, 0x00, 0x00, 0x77, 0x00, 0x4E, 0x00, 0x4F, 0x47, 0x5E,
    //  H     I     J     K     L     M     N     O     P     Q     R     S
    0x37, 0x06, 0x3C, 0x00, 0x0E, 0x00, 0x00, 0x7E, 0x67, 0x00, 0x00, 0x5B,
    //  T     U     V     W     X     Y     Z     [     \     ]     ^     _
    0x00, 0x3E, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    //  `     a     b     c     d     e     f     g     h     i     j     k
    0x00, 0x7D, 0x1F, 0x0D, 0x3D, 0x00, 0x00, 0x00, 0x17, 0x00, 0x00, 0x00,
    //  l     m     n     o     p     q     r     s     t     u     v     w
    0x00, 0x00, 0x15, 0x1D, 0x00, 0x73, 0x05, 0x00, 0x0F, 0x1C, 0x00, 0x00,
    //  x     y     z
    0x00, 0x3B, 0x00,
];

///
/// Translates a character into the segment mask to write to a digit
/// register with decode mode off.
///
/// Characters outside `'0'..='z'`, and characters inside the range without
/// a seven-segment rendering, yield `0x00` (all segments off). Blanking
/// unsupported input is deliberate; there is no error case.
///
pub const fn encode(c: char) -> u8 {
    match c {
        FONT_START..=FONT_END => SEGMENT_FONT[c as usize - FONT_START as usize],
        _ => 0x00,
    }
}
