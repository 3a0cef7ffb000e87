use super::{ClinicalReport, DISCLAIMER, REPORT_TITLE, ReportRenderer, RiskLevel};
use crate::error::ReportError;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

// A4 in points.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;

const MARGIN_LEFT: f32 = 40.0;
const MARGIN_RIGHT: f32 = 40.0;
const MARGIN_TOP: f32 = 60.0;
const MARGIN_BOTTOM: f32 = 40.0;

const INCH: f32 = 72.0;
const LABEL_COLUMN: f32 = 2.0 * INCH;
const VALUE_COLUMN: f32 = 4.0 * INCH;
const ROW_HEIGHT: f32 = 18.0;

const FONT_REGULAR: &str = "F1";
const FONT_BOLD: &str = "F2";
const FONT_ITALIC: &str = "F3";

/// Helvetica averages roughly half an em per glyph.
const GLYPH_WIDTH_EM: f32 = 0.5;

/// Renders a `ClinicalReport` as a PDF document on A4 pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl ReportRenderer for PdfRenderer {
    fn render(&self, report: &ClinicalReport) -> Result<Vec<u8>, ReportError> {
        let mut layout = PageLayout::new();

        layout.text_line(FONT_BOLD, 20.0, REPORT_TITLE);
        layout.gap(6.0);
        layout.text_line(FONT_ITALIC, 10.0, &report.timestamp_line());
        layout.gap(0.4 * INCH);

        layout.banner(report.risk_level(), &report.banner());
        layout.gap(0.4 * INCH);

        layout.heading("Patient Drug Assessment");
        layout.table(&report.assessment_rows());
        layout.gap(0.5 * INCH);

        if let Some(rows) = report.findings_rows() {
            layout.heading("Genetic Findings");
            layout.table(&rows);
            layout.gap(0.5 * INCH);
        }

        if let Some(explanation) = &report.explanation {
            layout.heading("Clinical Interpretation");
            layout.gap(0.2 * INCH);
            for paragraph in explanation.lines().map(str::trim).filter(|l| !l.is_empty()) {
                layout.paragraph(FONT_REGULAR, 10.0, paragraph);
            }
            layout.gap(0.5 * INCH);
        }

        layout.gap(0.3 * INCH);
        layout.paragraph(FONT_ITALIC, 9.0, DISCLAIMER);

        layout.into_document()
    }
}

/// Accumulates drawing operations top to bottom, starting a new page when the
/// current one is full.
struct PageLayout {
    pages: Vec<Vec<Operation>>,
    current: Vec<Operation>,
    cursor: f32,
}

impl PageLayout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: Vec::new(),
            cursor: PAGE_HEIGHT - MARGIN_TOP,
        }
    }

    fn content_width() -> f32 {
        PAGE_WIDTH - MARGIN_LEFT - MARGIN_RIGHT
    }

    fn ensure_space(&mut self, height: f32) {
        if self.cursor - height < MARGIN_BOTTOM {
            let full = std::mem::take(&mut self.current);
            self.pages.push(full);
            self.cursor = PAGE_HEIGHT - MARGIN_TOP;
        }
    }

    fn gap(&mut self, height: f32) {
        self.cursor -= height;
    }

    fn draw_text(&mut self, font: &str, size: f32, x: f32, y: f32, text: &str) {
        self.current.extend([
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(font.as_bytes().to_vec()), real(size)]),
            Operation::new("Td", vec![real(x), real(y)]),
            Operation::new("Tj", vec![Object::string_literal(pdf_safe(text))]),
            Operation::new("ET", vec![]),
        ]);
    }

    fn fill_color(&mut self, (r, g, b): (f32, f32, f32)) {
        self.current
            .push(Operation::new("rg", vec![real(r), real(g), real(b)]));
    }

    fn text_line(&mut self, font: &str, size: f32, text: &str) {
        let height = size * 1.2;
        self.ensure_space(height);
        self.cursor -= size;
        self.fill_color((0.0, 0.0, 0.0));
        self.draw_text(font, size, MARGIN_LEFT, self.cursor, text);
        self.cursor -= height - size;
    }

    fn heading(&mut self, text: &str) {
        // Keep a heading on the same page as at least one row below it.
        self.ensure_space(14.0 * 1.2 + ROW_HEIGHT + 10.0);
        self.text_line(FONT_BOLD, 14.0, text);
        self.gap(10.0);
    }

    fn paragraph(&mut self, font: &str, size: f32, text: &str) {
        let max_chars = (Self::content_width() / (size * GLYPH_WIDTH_EM)) as usize;
        for line in wrap_words(text, max_chars) {
            self.text_line(font, size, &line);
        }
        self.gap(size * 0.4);
    }

    fn banner(&mut self, level: RiskLevel, text: &str) {
        let width = 6.0 * INCH;
        let height = 12.0 + 16.0;
        self.ensure_space(height);

        let bottom = self.cursor - height;
        self.fill_color(level.rgb());
        self.current.extend([
            Operation::new(
                "re",
                vec![real(MARGIN_LEFT), real(bottom), real(width), real(height)],
            ),
            Operation::new("f", vec![]),
        ]);

        let text_width = text.chars().count() as f32 * 12.0 * GLYPH_WIDTH_EM;
        let x = MARGIN_LEFT + ((width - text_width) / 2.0).max(4.0);
        self.fill_color((1.0, 1.0, 1.0));
        self.draw_text(FONT_BOLD, 12.0, x, bottom + 9.0, text);
        self.cursor = bottom;
    }

    fn table(&mut self, rows: &[(&str, String)]) {
        let value_chars = ((VALUE_COLUMN - 12.0) / (10.0 * GLYPH_WIDTH_EM)) as usize;

        for (label, value) in rows {
            let lines = wrap_words(value, value_chars);
            let height = ROW_HEIGHT.max(lines.len() as f32 * 12.0 + 6.0);
            self.ensure_space(height);
            let bottom = self.cursor - height;

            self.current.extend([
                Operation::new("RG", vec![real(0.5), real(0.5), real(0.5)]),
                Operation::new("w", vec![real(0.5)]),
                Operation::new(
                    "re",
                    vec![real(MARGIN_LEFT), real(bottom), real(LABEL_COLUMN), real(height)],
                ),
                Operation::new(
                    "re",
                    vec![
                        real(MARGIN_LEFT + LABEL_COLUMN),
                        real(bottom),
                        real(VALUE_COLUMN),
                        real(height),
                    ],
                ),
                Operation::new("S", vec![]),
            ]);

            self.fill_color((0.0, 0.0, 0.0));
            let first_baseline = self.cursor - 13.0;
            self.draw_text(FONT_REGULAR, 10.0, MARGIN_LEFT + 6.0, first_baseline, label);
            for (i, line) in lines.iter().enumerate() {
                self.draw_text(
                    FONT_REGULAR,
                    10.0,
                    MARGIN_LEFT + LABEL_COLUMN + 6.0,
                    first_baseline - i as f32 * 12.0,
                    line,
                );
            }
            self.cursor = bottom;
        }
    }

    fn into_document(mut self) -> Result<Vec<u8>, ReportError> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(std::mem::take(&mut self.current));
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let regular_id = font(&mut doc, "Helvetica");
        let bold_id = font(&mut doc, "Helvetica-Bold");
        let italic_id = font(&mut doc, "Helvetica-Oblique");
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                FONT_REGULAR => regular_id,
                FONT_BOLD => bold_id,
                FONT_ITALIC => italic_id,
            },
        });

        let mut kids = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations };
            let encoded = content
                .encode()
                .map_err(|e| ReportError::Encode(e.to_string()))?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
            "Resources" => resources_id,
            "MediaBox" => vec![real(0.0), real(0.0), real(PAGE_WIDTH), real(PAGE_HEIGHT)],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)
            .map_err(|e| ReportError::Encode(e.to_string()))?;
        Ok(bytes)
    }
}

fn real(value: f32) -> Object {
    Object::Real(value)
}

fn font(doc: &mut Document, base_font: &str) -> ObjectId {
    doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    })
}

/// Encodes text for the WinAnsi fonts. Printable ASCII and U+00A0..=U+00FF
/// share their code points with WinAnsiEncoding; anything else becomes `?`.
fn pdf_safe(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' | '\u{a0}'..='\u{ff}' => c as u8,
            _ => b'?',
        })
        .collect()
}

/// Greedy word wrap at `max_chars` columns. Over-long words are split.
fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word = word;
        while word.chars().count() > max_chars {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let split = word
                .char_indices()
                .nth(max_chars)
                .map_or(word.len(), |(i, _)| i);
            lines.push(word[..split].to_string());
            word = &word[split..];
        }
        if word.is_empty() {
            continue;
        }
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
