//! PDF rendering via `printpdf`: builtin Helvetica faces, A4 pages,
//! millimetre coordinates. One pagination routine serves every document
//! kind and the agenda listing. Rendering produces bytes; writing them to
//! disk is a separate step so validation failures never touch the
//! filesystem.

use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};

use super::{AgendaContent, ClinicHeader, DocumentContent, DocumentFooter};
use crate::error::AgendaError;

// A4 geometry, millimetres.
const PAGE_WIDTH: f64 = 210.0;
const PAGE_HEIGHT: f64 = 297.0;
const MARGIN_X: f64 = 14.0;
/// Cursor start on continuation pages.
const PAGE_TOP: f64 = 277.0;
/// Crossing this starts a new page; the footer strip sits below it.
const PAGE_BOTTOM: f64 = 27.0;
/// Cursor position where the document body begins on the first page.
const BODY_START: f64 = 233.0;
const BODY_LINE_HEIGHT: f64 = 6.0;
const AGENDA_LINE_HEIGHT: f64 = 5.0;
/// Character budgets approximating the printable width at each size.
const BODY_WRAP_CHARS: usize = 88;
const AGENDA_WRAP_CHARS: usize = 100;

fn pdf_error<E: std::fmt::Display>(e: E) -> AgendaError {
    AgendaError::Pdf(e.to_string())
}

struct Canvas {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f64,
}

impl Canvas {
    /// Open a document and draw the clinic header block on the first page.
    fn start_document(title: &str, clinic: &ClinicHeader) -> Result<Self, AgendaError> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "Layer 1");
        let layer = doc.get_page(page).get_layer(layer);
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?;

        let canvas = Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_TOP,
        };
        canvas.text_bold(&clinic.name, 12.0, MARGIN_X, 281.0);
        canvas.text(&clinic.address_line, 10.0, MARGIN_X, 275.0);
        canvas.text(&clinic.contact_line, 10.0, MARGIN_X, 270.0);
        Ok(canvas)
    }

    fn text(&self, s: &str, size: f64, x: f64, y: f64) {
        self.layer
            .use_text(s, size as f32, Mm(x as f32), Mm(y as f32), &self.regular);
    }

    fn text_bold(&self, s: &str, size: f64, x: f64, y: f64) {
        self.layer
            .use_text(s, size as f32, Mm(x as f32), Mm(y as f32), &self.bold);
    }

    fn add_page(&mut self) {
        let (page, layer) = self
            .doc
            .add_page(Mm(PAGE_WIDTH as f32), Mm(PAGE_HEIGHT as f32), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_TOP;
    }

    /// The shared pagination rule: each wrapped line advances the cursor by
    /// `line_height`; a cursor past the bottom margin starts a new page and
    /// resets to the top margin.
    fn write_wrapped(&mut self, text: &str, size: f64, wrap_chars: usize, line_height: f64) {
        for line in wrap_text(text, wrap_chars) {
            if self.y < PAGE_BOTTOM {
                self.add_page();
            }
            self.layer
                .use_text(&line, size as f32, Mm(MARGIN_X as f32), Mm(self.y as f32), &self.regular);
            self.y -= line_height;
        }
    }

    fn save(self) -> Result<Vec<u8>, AgendaError> {
        let mut buf = BufWriter::new(Vec::new());
        self.doc.save(&mut buf).map_err(pdf_error)?;
        buf.into_inner()
            .map_err(|e| AgendaError::Pdf(format!("PDF buffer error: {e}")))
    }
}

/// Word-wrap on a character budget, preserving explicit line breaks. An
/// empty input line stays a blank line so paragraph gaps survive.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.lines() {
        if raw.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in raw.split_whitespace() {
            if !current.is_empty() && current.len() + word.len() + 1 > max_chars {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn draw_footer(canvas: &Canvas, footer: &DocumentFooter) {
    canvas.text(
        &format!("{} • {}", footer.credentials, footer.contact),
        10.0,
        MARGIN_X,
        19.0,
    );
    if let Some(signature) = &footer.signature_line {
        canvas.text(signature, 10.0, 70.0, 9.0);
    }
}

/// Render assembled document content to PDF bytes.
pub fn render_document(content: &DocumentContent) -> Result<Vec<u8>, AgendaError> {
    let mut canvas = Canvas::start_document(content.title, &content.clinic)?;

    canvas.text_bold(content.title, 13.0, MARGIN_X, 257.0);

    let mut field_y = 245.0;
    if let Some(patient_line) = &content.patient_line {
        canvas.text(patient_line, 11.0, MARGIN_X, field_y);
    }
    canvas.text(&content.date_line, 11.0, 150.0, field_y);
    for field in &content.extra_fields {
        field_y -= 8.0;
        canvas.text(field, 11.0, MARGIN_X, field_y);
    }

    canvas.y = BODY_START.min(field_y - 12.0);
    canvas.write_wrapped(&content.body, 11.0, BODY_WRAP_CHARS, BODY_LINE_HEIGHT);

    // footer strip lands on whatever page the body ended on
    draw_footer(&canvas, &content.footer);
    canvas.save()
}

/// Render the agenda listing to PDF bytes.
pub fn render_agenda(content: &AgendaContent) -> Result<Vec<u8>, AgendaError> {
    let mut canvas = Canvas::start_document(&content.title, &content.clinic)?;
    canvas.text_bold(&content.title, 14.0, MARGIN_X, 255.0);
    canvas.y = 245.0;
    for line in &content.lines {
        canvas.write_wrapped(line, 10.0, AGENDA_WRAP_CHARS, AGENDA_LINE_HEIGHT);
    }
    canvas.save()
}

/// Write rendered bytes into the exports directory, creating it if needed.
pub fn export_to_file(bytes: &[u8], filename: &str, dir: &Path) -> Result<PathBuf, AgendaError> {
    fs::create_dir_all(dir)
        .map_err(|e| AgendaError::Pdf(format!("cannot create exports dir: {e}")))?;
    let path = dir.join(filename);
    fs::write(&path, bytes)
        .map_err(|e| AgendaError::Pdf(format!("cannot write {}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), "document exported");
    Ok(path)
}
