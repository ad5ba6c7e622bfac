//! Built-in 8x8 bitmap font
//!
//! The glyph sheet is stored as 1024 printable characters. Every four
//! characters form one 24-bit word (`c - 48` gives six bits each, most
//! significant first) and the words are unpacked least significant bit first,
//! column-major, into a 128x48 sheet: 48 rows per column, two words per column.
//! Glyphs sit on a 16x6 grid of 8x8 cells starting at ASCII 32.
//!
//! The glyph shapes are a common 8x8 console font re-encoded into this
//! packing. They are not the classic engine font pixel for pixel, so output that
//! must match that font exactly needs its packed string swapped into
//! `PACKED_GLYPHS`.

use once_cell::sync::Lazy;

use super::PixelBuffer;
use crate::color::Color;

pub const GLYPH_WIDTH: u32 = 8;
pub const GLYPH_HEIGHT: u32 = 8;
pub const SHEET_WIDTH: u32 = 128;
pub const SHEET_HEIGHT: u32 = 48;

const GLYPHS_PER_ROW: u32 = SHEET_WIDTH / GLYPH_WIDTH;
const FIRST_GLYPH: u32 = 32;
const LAST_GLYPH: u32 = 127;

const PACKED_GLYPHS: &str = concat!(
    r"?Sh0o01oOgl0o01o@ET09009GDd090<9GDL090L9Ggl0?0@?GSh0600600000000",
    r"O000620nOT00?7Ao4d8095A14GmO95Aa4gmO95AQOT00o7coO400o7Rn00000000",
    r"Og80O7moOg\3O7moBDT724@9BDT014@IBDT314@iOdl737a_=TH023Q600000000",
    r"?T4DB3PVOd5oG7a_@DUoE4A9@DTDE4A9@DUoE4A9HgmoM6ak8SHD92Pb00000000",
    r"OahT03P0Oah^17`1@A0Z?d@1@A1[OdAoHgm[A4Ao?WljA7l1710B07l100000000",
    r"ObM6?3PoOfMVO7aoBDD`@5A0BDDH@5A0BDD<@5A0@GeVO5ao@CURO1Po00000000",
    r"Och`700?Ogmj?0PO2DU?H7h`2DUM@7mP2DTgH0T`0GUj?0TO0C18700?00000000",
    r"?P40?1QoO`40O;ao@@44H:@`@G47<:@HBGT3H:@`N`l0O?ao>PL0?7ao00000000",
    r"OcH0A7mSOgl0K7mg24TL>0@L24Tn40@824US>0@LOgm1K7agOcH0A7QS00000000",
    r"00H07000@Dl0_007@DU1X4@?OdUSX7ehOdTnX7eh@GlLo40?@Ch0O00700000000",
    r"<008A011L00ZI81Q@00nM8Aa@6HLE?eI@6HLG7e=O`0nC017?`0ZA01300080000",
    r"O`0007l0O`0827l02808211o7>Hn?Q1o=VHnMcQ1H`08@Fa1@@08@D@000000000",
    r"O`000001O`P00003@1b00446@3KPOgl<@6=POglH@440040`@000001P00000000",
    r"O`0007`0Oa@8@G`01Q@8@@a131@8MaQ11Q@8?PaoOa@827aoOa@827P000000000",
    r"O`000W`8O`000G`<1T400@@636=P0`@363IP0P@6Oa`00W`<O`P00GP800000000",
    r"?P1P03R0O`8`07b0@@<H04B0@ET<04B0@Ed604B0O`L307b0?P8103R000000000",
);

static FONT_SHEET: Lazy<PixelBuffer> = Lazy::new(|| decode_sheet(PACKED_GLYPHS));

/// The decoded glyph sheet, built on first use and shared read-only afterwards
pub fn font_sheet() -> &'static PixelBuffer {
    &FONT_SHEET
}

/// Unpack a glyph sheet. Set bits become opaque white, clear bits transparent
/// black. Trailing characters that don't fill a word are ignored, as are bits
/// past the end of the sheet.
pub fn decode_sheet(packed: &str) -> PixelBuffer {
    let mut sheet = PixelBuffer::with_size(SHEET_WIDTH, SHEET_HEIGHT);
    let (mut px, mut py) = (0i32, 0i32);

    for word in packed.as_bytes().chunks_exact(4) {
        let bits = word
            .iter()
            .fold(0u32, |acc, &c| (acc << 6) | (u32::from(c.wrapping_sub(48)) & 0x3F));

        for i in 0..24 {
            let k = if bits & (1 << i) != 0 { 255 } else { 0 };
            sheet.set(px, py, Color::rgba(k, k, k, k));
            py += 1;
            if py == SHEET_HEIGHT as i32 {
                px += 1;
                py = 0;
            }
        }
    }

    sheet
}

/// Top-left corner of a character's cell in the sheet, `None` outside ASCII 32..=127
pub fn glyph_cell(ch: char) -> Option<(i32, i32)> {
    let code = ch as u32;
    if !(FIRST_GLYPH..=LAST_GLYPH).contains(&code) {
        return None;
    }
    let index = code - FIRST_GLYPH;
    Some((
        ((index % GLYPHS_PER_ROW) * GLYPH_WIDTH) as i32,
        ((index / GLYPHS_PER_ROW) * GLYPH_HEIGHT) as i32,
    ))
}

/// Pixel size of `text` drawn at `scale`: longest line by number of lines.
/// Every character advances by the full glyph width.
pub fn text_size(text: &str, scale: u32) -> (u32, u32) {
    if text.is_empty() {
        return (0, 0);
    }
    let (longest, lines) = text
        .split('\n')
        .fold((0u32, 0u32), |(longest, lines), line| {
            (longest.max(line.chars().count() as u32), lines + 1)
        });
    (longest * GLYPH_WIDTH * scale, lines * GLYPH_HEIGHT * scale)
}
