use genpdf::fonts::{FontData, FontFamily};
use ttf_parser::{Face, FaceParsingError, GlyphId};

const REGULAR: &[u8] = include_bytes!("../../fonts/DejaVuSans.ttf");
const BOLD: &[u8] = include_bytes!("../../fonts/DejaVuSans-Bold.ttf");

/// Family handed to the PDF document. DejaVu has no italics we need, so the
/// upright faces stand in for them.
pub fn family() -> Result<FontFamily<FontData>, genpdf::error::Error> {
    let regular = FontData::new(REGULAR.to_vec(), None)?;
    let bold = FontData::new(BOLD.to_vec(), None)?;
    Ok(FontFamily {
        italic: regular.clone(),
        bold_italic: bold.clone(),
        regular,
        bold,
    })
}

/// Horizontal advance widths read from the same font files the document embeds.
pub struct Metrics {
    face: Face<'static>,
    units_per_em: f64,
}

impl Metrics {
    pub fn regular() -> Result<Self, FaceParsingError> {
        Self::parse(REGULAR)
    }

    pub fn bold() -> Result<Self, FaceParsingError> {
        Self::parse(BOLD)
    }

    fn parse(data: &'static [u8]) -> Result<Self, FaceParsingError> {
        let face = Face::parse(data, 0)?;
        let units_per_em = f64::from(face.units_per_em());
        Ok(Self { face, units_per_em })
    }

    /// Width of `text` in points at `size` points. Unmapped characters are
    /// measured as the `.notdef` glyph they will be drawn with.
    pub fn width(&self, text: &str, size: f64) -> f64 {
        let units: u32 = text
            .chars()
            .map(|c| {
                let glyph = self.face.glyph_index(c).unwrap_or(GlyphId(0));
                u32::from(self.face.glyph_hor_advance(glyph).unwrap_or(0))
            })
            .sum();
        f64::from(units) * size / self.units_per_em
    }
}
