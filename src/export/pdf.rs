// src/export/pdf.rs

use std::{io::Cursor, ops::Range, path::Path, sync::Arc};

use anyhow::{Context, Result};
use owned_ttf_parser::Face;
use printpdf::{IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point};

use super::ExportError;
use crate::report::{NonVoter, NON_VOTER_COLUMNS};

// A4 portrait, millimetres
const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const TITLE_BLOCK: f32 = 15.0;
const CELL_WIDTH: f32 = 30.0;
const CELL_HEIGHT: f32 = 8.0;
const TITLE_SIZE: f32 = 14.0;
const TEXT_SIZE: f32 = 10.0;
const LAYER: &str = "table";

/// DejaVu Sans (Bitstream Vera license, see `assets/fonts/`).
const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// TrueType font embedded into exported PDFs. The built-in PDF fonts only
/// cover WinAnsi, so every export embeds one of these.
#[derive(Clone)]
pub struct PdfFont {
    bytes: Arc<[u8]>,
}

impl PdfFont {
    /// The font compiled into the binary. Covers Latin and Hebrew.
    pub fn bundled() -> Self {
        Self {
            bytes: Arc::from(BUNDLED_FONT),
        }
    }

    /// Accepts `bytes` only if they parse as a TrueType face with a glyph for
    /// every character of the title line.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Result<Self, ExportError> {
        let bytes = bytes.into();
        let face = Face::parse(&bytes, 0).map_err(|e| ExportError::Font(e.to_string()))?;
        if let Some(missing) = title("").chars().find(|c| face.glyph_index(*c).is_none()) {
            return Err(ExportError::Font(format!("no glyph for {:?}", missing)));
        }
        Ok(Self { bytes })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_context(|| format!("reading PDF font {:?}", path))?;
        Self::from_bytes(bytes).with_context(|| format!("loading PDF font {:?}", path))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

impl std::fmt::Debug for PdfFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfFont")
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

pub fn title(user_id: &str) -> String {
    format!("רשימת משתמשים שטרם הצביעו ({})", user_id)
}

/// Data rows that fit under the header row on a page.
fn rows_per_page(first_page: bool) -> usize {
    let mut usable = PAGE_HEIGHT - 2.0 * MARGIN;
    if first_page {
        usable -= TITLE_BLOCK;
    }
    (usable / CELL_HEIGHT) as usize - 1
}

/// Split `n` rows into per-page ranges. There is always at least one page,
/// so an empty listing still renders its title and header row.
fn paginate(n: usize) -> Vec<Range<usize>> {
    let mut pages = Vec::new();
    let mut start = 0;
    loop {
        let take = rows_per_page(pages.is_empty());
        let end = (start + take).min(n);
        pages.push(start..end);
        if end >= n {
            break;
        }
        start = end;
    }
    pages
}

fn draw_row(layer: &PdfLayerReference, font: &IndirectFontRef, top: f32, cells: &[&str]) {
    let bottom = top - CELL_HEIGHT;
    for (i, value) in cells.iter().enumerate() {
        let left = MARGIN + i as f32 * CELL_WIDTH;
        let right = left + CELL_WIDTH;
        layer.add_line(Line {
            points: vec![
                (Point::new(Mm(left), Mm(top)), false),
                (Point::new(Mm(right), Mm(top)), false),
                (Point::new(Mm(right), Mm(bottom)), false),
                (Point::new(Mm(left), Mm(bottom)), false),
            ],
            is_closed: true,
        });
        layer.use_text(*value, TEXT_SIZE, Mm(left + 1.5), Mm(bottom + 2.5), font);
    }
}

/// Title line, then a bordered fixed-width grid: header row plus one row
/// per non-voter. Long listings continue on new pages with the header
/// repeated.
pub fn encode(
    user_id: &str,
    rows: &[NonVoter],
    font: &PdfFont,
) -> Result<Vec<u8>, ExportError> {
    let title = title(user_id);
    let (doc, first_page, first_layer) =
        PdfDocument::new(&title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);

    let font_ref = doc
        .add_external_font(Cursor::new(font.bytes.to_vec()))
        .map_err(|e| ExportError::Font(e.to_string()))?;

    let pages = paginate(rows.len());
    let mut layers = vec![doc.get_page(first_page).get_layer(first_layer)];
    for _ in 1..pages.len() {
        let (page, layer) = doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), LAYER);
        layers.push(doc.get_page(page).get_layer(layer));
    }

    for (n, (range, layer)) in pages.into_iter().zip(layers).enumerate() {
        layer.set_outline_thickness(0.3);

        let mut top = PAGE_HEIGHT - MARGIN;
        if n == 0 {
            layer.use_text(&title, TITLE_SIZE, Mm(MARGIN), Mm(top - 7.0), &font_ref);
            top -= TITLE_BLOCK;
        }

        draw_row(&layer, &font_ref, top, &NON_VOTER_COLUMNS);
        for (i, row) in rows[range].iter().enumerate() {
            let row_top = top - (i + 1) as f32 * CELL_HEIGHT;
            draw_row(&layer, &font_ref, row_top, &row.cells());
        }
    }

    doc.save_to_bytes().map_err(|e| ExportError::Pdf(e.to_string()))
}

#[cfg(test)]
pub(crate) mod testing {
    use lopdf::{content::Content, Document, Object};
    use owned_ttf_parser::Face;

    use super::BUNDLED_FONT;

    /// Operands of every `Tj` operator, page by page in document order.
    pub(crate) fn shown_strings(pdf: &[u8]) -> Vec<Vec<u8>> {
        let doc = Document::load_mem(pdf).unwrap();
        let mut shown = Vec::new();
        for page_id in doc.get_pages().into_values() {
            let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
            for op in content.operations {
                if op.operator == "Tj" {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        shown.push(bytes.clone());
                    }
                }
            }
        }
        shown
    }

    /// `text` as the big-endian glyph ids the bundled font draws it with.
    pub(crate) fn glyphs(text: &str) -> Vec<u8> {
        let face = Face::parse(BUNDLED_FONT, 0).unwrap();
        text.chars()
            .flat_map(|c| face.glyph_index(c).unwrap().0.to_be_bytes())
            .collect()
    }
}
