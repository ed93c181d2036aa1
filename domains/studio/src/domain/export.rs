//! Project bible export
//!
//! All present artifacts are concatenated into one labelled bundle, then laid
//! out as a Courier PDF on US Letter pages or written as a DOCX document.

use std::io::Cursor;

use docx_rs::{BreakType, Docx, Paragraph, Run, Style, StyleType};
use printpdf::{BuiltinFont, Mm, PdfDocument, Pt};
use thiserror::Error;

use super::entities::Session;

const DOCUMENT_TITLE: &str = "Project Bible";
const TITLE_STYLE: &str = "Title";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExportError {
    #[error("No content to export")]
    EmptyContent,

    /// Kept in the payload for logs; the displayed message stays fixed
    #[error("Invalid format")]
    UnsupportedFormat(String),

    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("DOCX rendering failed: {0}")]
    Docx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Docx,
}

impl ExportFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "application/pdf",
            ExportFormat::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Docx => "docx",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = ExportError;

    /// Tokens are case-sensitive, exactly as they appear in the URL
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(ExportFormat::Pdf),
            "docx" => Ok(ExportFormat::Docx),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// What happens to PDF lines wider than the layout allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LongLinePolicy {
    #[default]
    Truncate,
    Wrap,
}

impl std::str::FromStr for LongLinePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "truncate" => Ok(LongLinePolicy::Truncate),
            "wrap" => Ok(LongLinePolicy::Wrap),
            other => Err(format!(
                "expected 'truncate' or 'wrap', got '{}'",
                other
            )),
        }
    }
}

/// Labelled concatenation of a session's artifacts in export order
#[derive(Debug, Clone, PartialEq)]
pub struct ExportBundle(String);

impl ExportBundle {
    pub fn from_session(session: &Session) -> Result<Self, ExportError> {
        let text: String = session
            .artifacts()
            .map(|(kind, body)| format!("{}\n\n{}\n\n", kind.label(), body))
            .collect();

        if text.is_empty() {
            return Err(ExportError::EmptyContent);
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One line of text positioned on a PDF page, in points from the bottom-left
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Page geometry and text metrics for PDF output, in points
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    pub page_width: f32,
    pub page_height: f32,
    pub origin_x: f32,
    pub origin_y: f32,
    /// A line is never placed below this baseline
    pub bottom_margin: f32,
    pub font_size: f32,
    pub leading: f32,
    pub max_line_chars: usize,
    pub long_lines: LongLinePolicy,
}

impl Default for PdfLayout {
    fn default() -> Self {
        Self {
            page_width: 612.0,
            page_height: 792.0,
            origin_x: 40.0,
            origin_y: 750.0,
            bottom_margin: 40.0,
            font_size: 12.0,
            leading: 14.4,
            max_line_chars: 90,
            long_lines: LongLinePolicy::Truncate,
        }
    }
}

impl PdfLayout {
    /// Split text into pages of positioned lines
    pub fn paginate(&self, text: &str) -> Vec<Vec<PlacedLine>> {
        let mut pages = Vec::new();
        let mut page: Vec<PlacedLine> = Vec::new();

        for line in text.split('\n').flat_map(|line| self.fit(line)) {
            let mut y = self.line_y(page.len());
            if y < self.bottom_margin && !page.is_empty() {
                pages.push(std::mem::take(&mut page));
                y = self.line_y(0);
            }
            page.push(PlacedLine {
                text: line,
                x: self.origin_x,
                y,
            });
        }

        if !page.is_empty() {
            pages.push(page);
        }
        pages
    }

    fn line_y(&self, index: usize) -> f32 {
        self.origin_y - self.leading * index as f32
    }

    fn fit(&self, line: &str) -> Vec<String> {
        let max = self.max_line_chars.max(1);
        match self.long_lines {
            LongLinePolicy::Truncate => vec![line.chars().take(max).collect()],
            LongLinePolicy::Wrap => {
                let chars: Vec<char> = line.chars().collect();
                if chars.is_empty() {
                    return vec![String::new()];
                }
                chars.chunks(max).map(|chunk| chunk.iter().collect()).collect()
            }
        }
    }
}

pub fn render_pdf(bundle: &ExportBundle, layout: &PdfLayout) -> Result<Vec<u8>, ExportError> {
    let width = Mm::from(Pt(layout.page_width));
    let height = Mm::from(Pt(layout.page_height));

    let (doc, first_page, first_layer) = PdfDocument::new(DOCUMENT_TITLE, width, height, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Courier)
        .map_err(|e| ExportError::Pdf(e.to_string()))?;

    for (index, lines) in layout.paginate(bundle.as_str()).into_iter().enumerate() {
        let (page, layer) = if index == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(width, height, "Layer 1")
        };
        let layer = doc.get_page(page).get_layer(layer);

        for line in lines.iter().filter(|line| !line.text.is_empty()) {
            layer.use_text(
                line.text.as_str(),
                layout.font_size,
                Mm::from(Pt(line.x)),
                Mm::from(Pt(line.y)),
                &font,
            );
        }
    }

    doc.save_to_bytes()
        .map_err(|e| ExportError::Pdf(e.to_string()))
}

pub fn render_docx(bundle: &ExportBundle) -> Result<Vec<u8>, ExportError> {
    let mut buffer = Cursor::new(Vec::new());
    bible_docx(bundle)
        .build()
        .pack(&mut buffer)
        .map_err(|e| ExportError::Docx(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// One title heading followed by the bundle as a single paragraph
fn bible_docx(bundle: &ExportBundle) -> Docx {
    let title_style = Style::new(TITLE_STYLE, StyleType::Paragraph)
        .name(TITLE_STYLE)
        .bold()
        .size(56);
    let title = Paragraph::new()
        .style(TITLE_STYLE)
        .add_run(Run::new().add_text(DOCUMENT_TITLE));

    let mut body = Run::new();
    for (index, line) in bundle.as_str().split('\n').enumerate() {
        if index > 0 {
            body = body.add_break(BreakType::TextWrapping);
        }
        body = body.add_text(line);
    }

    Docx::new()
        .add_style(title_style)
        .add_paragraph(title)
        .add_paragraph(Paragraph::new().add_run(body))
}

/// A rendered document ready to be served as an attachment
#[derive(Debug, Clone)]
pub struct ExportedDocument {
    pub content: Vec<u8>,
    pub content_type: &'static str,
    pub filename: String,
}

#[derive(Debug, Clone, Default)]
pub struct Exporter {
    layout: PdfLayout,
}

impl Exporter {
    pub fn new(layout: PdfLayout) -> Self {
        Self { layout }
    }

    /// Export the session, checking for content before the format token
    pub fn export(&self, session: &Session, format: &str) -> Result<ExportedDocument, ExportError> {
        let bundle = ExportBundle::from_session(session)?;
        let format: ExportFormat = format.parse()?;

        let content = match format {
            ExportFormat::Pdf => render_pdf(&bundle, &self.layout)?,
            ExportFormat::Docx => render_docx(&bundle)?,
        };

        tracing::info!(format = %format, bytes = content.len(), "Exported project bible");

        Ok(ExportedDocument {
            content,
            content_type: format.content_type(),
            filename: format!("project_bible.{}", format.extension()),
        })
    }
}
