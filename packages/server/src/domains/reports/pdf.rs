//! A4 PDF rendering with lopdf.
//!
//! Text uses the standard Helvetica fonts with WinAnsi encoding, so no font
//! files are embedded. Wrapping is estimated from an average glyph width.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use thiserror::Error;

use super::layout::{build_document, Block, DocumentSection};
use crate::common::PartialReport;

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 56;
const TOP: i64 = PAGE_HEIGHT - MARGIN;
const BOTTOM: i64 = MARGIN + 20;
const FOOTER_Y: i64 = 30;
const BULLET_INDENT: i64 = 14;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Falha ao codificar PDF: {0}")]
    Encode(#[from] lopdf::Error),
    #[error("Falha ao gravar PDF: {0}")]
    Write(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }

    /// Average glyph width as a fraction of the font size.
    fn width_factor(self) -> f64 {
        match self {
            Font::Regular => 0.5,
            Font::Bold => 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Run {
    font: Font,
    text: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Line {
    x: i64,
    y: i64,
    size: i64,
    runs: Vec<Run>,
}

struct Style {
    font: Font,
    size: i64,
    leading: i64,
    space_before: i64,
    indent: i64,
}

fn style(block: &Block) -> Style {
    let (font, size, leading, space_before, indent) = match block {
        Block::Title(_) => (Font::Bold, 20, 26, 0, 0),
        Block::Subtitle(_) => (Font::Regular, 14, 20, 0, 0),
        Block::Heading(_) => (Font::Bold, 14, 20, 10, 0),
        Block::Subheading(_) => (Font::Bold, 12, 16, 6, 0),
        Block::Paragraph(_) | Block::Field { .. } => (Font::Regular, 10, 14, 2, 0),
        Block::Bullet(_) => (Font::Regular, 10, 14, 1, BULLET_INDENT),
        Block::Spacer => (Font::Regular, 10, 12, 0, 0),
    };
    Style {
        font,
        size,
        leading,
        space_before,
        indent,
    }
}

fn max_chars(style: &Style) -> usize {
    let width = (PAGE_WIDTH - 2 * MARGIN - style.indent) as f64;
    let per_char = style.size as f64 * style.font.width_factor();
    ((width / per_char).floor() as usize).max(1)
}

/// Greedy word wrap by character count. Words longer than a line are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                lines.push(word.drain(..max_chars).collect());
            }
            if word.is_empty() {
                continue;
            }

            let needed = if current_len == 0 {
                word.len()
            } else {
                current_len + 1 + word.len()
            };
            if needed > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(word.iter());
            current_len += word.len();
        }

        if current_len > 0 || lines.is_empty() {
            lines.push(current);
        }
    }

    lines
}

/// Encode text for the WinAnsi code page. Unmappable characters become `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7e}' | '\u{a0}'..='\u{ff}' => c as u8,
            '\t' => b' ',
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

// =============================================================================
// Pagination
// =============================================================================

struct Paginator {
    pages: Vec<Vec<Line>>,
    cursor: i64,
}

impl Paginator {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            cursor: BOTTOM,
        }
    }

    fn start_page(&mut self) {
        self.pages.push(Vec::new());
        self.cursor = TOP;
    }

    /// Move down one line, breaking the page when it would not fit.
    fn advance(&mut self, leading: i64) -> i64 {
        if self.pages.is_empty() || self.cursor - leading < BOTTOM {
            self.start_page();
        }
        self.cursor -= leading;
        self.cursor
    }

    fn skip(&mut self, amount: i64) {
        self.cursor -= amount;
    }

    fn push(&mut self, line: Line) {
        if let Some(page) = self.pages.last_mut() {
            page.push(line);
        }
    }

    fn layout_section(&mut self, section: &DocumentSection) {
        self.start_page();
        for block in &section.blocks {
            self.layout_block(block);
        }
    }

    fn layout_block(&mut self, block: &Block) {
        let style = style(block);
        self.skip(style.space_before);

        let (text, bold_prefix) = match block {
            Block::Spacer => {
                self.skip(style.leading);
                return;
            }
            Block::Title(t)
            | Block::Subtitle(t)
            | Block::Heading(t)
            | Block::Subheading(t)
            | Block::Paragraph(t) => (t.clone(), None),
            Block::Bullet(t) => (format!("• {}", t), None),
            Block::Field { label, value } => {
                let prefix = format!("{}:", label);
                (format!("{} {}", prefix, value), Some(prefix))
            }
        };

        for (i, content) in wrap(&text, max_chars(&style)).into_iter().enumerate() {
            let y = self.advance(style.leading);
            let runs = match &bold_prefix {
                Some(prefix) if i == 0 && content.starts_with(prefix.as_str()) => {
                    let rest = &content[prefix.len()..];
                    let mut runs = vec![Run {
                        font: Font::Bold,
                        text: prefix.clone(),
                    }];
                    if !rest.is_empty() {
                        runs.push(Run {
                            font: Font::Regular,
                            text: rest.to_string(),
                        });
                    }
                    runs
                }
                _ => vec![Run {
                    font: style.font,
                    text: content,
                }],
            };
            self.push(Line {
                x: MARGIN + style.indent,
                y,
                size: style.size,
                runs,
            });
        }
    }
}

fn layout(sections: &[DocumentSection]) -> Vec<Vec<Line>> {
    let mut paginator = Paginator::new();
    for section in sections {
        paginator.layout_section(section);
    }
    paginator.pages
}

// =============================================================================
// Encoding
// =============================================================================

fn page_operations(lines: &[Line], footer: &str) -> Vec<Operation> {
    let mut ops = vec![Operation::new("BT", vec![])];

    let footer_line = Line {
        x: MARGIN,
        y: FOOTER_Y,
        size: 8,
        runs: vec![Run {
            font: Font::Regular,
            text: footer.to_string(),
        }],
    };

    for line in lines.iter().chain(std::iter::once(&footer_line)) {
        ops.push(Operation::new(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                1.into(),
                Object::Integer(line.x),
                Object::Integer(line.y),
            ],
        ));
        for run in &line.runs {
            ops.push(Operation::new(
                "Tf",
                vec![
                    Object::Name(run.font.resource_name().as_bytes().to_vec()),
                    Object::Integer(line.size),
                ],
            ));
            ops.push(Operation::new(
                "Tj",
                vec![Object::String(win_ansi(&run.text), StringFormat::Literal)],
            ));
        }
    }

    ops.push(Operation::new("ET", vec![]));
    ops
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn encode(pages: &[Vec<Line>]) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font("Helvetica"));
    let bold_id = doc.add_object(font("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let total = pages.len();
    let mut kids: Vec<Object> = Vec::with_capacity(total);
    for (i, lines) in pages.iter().enumerate() {
        let footer = format!("Página {} de {}", i + 1, total);
        let content = Content {
            operations: page_operations(lines, &footer),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => total as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| PdfError::Write(e.to_string()))?;
    Ok(bytes)
}

/// Render a report into PDF bytes. Absent sections are skipped; the cover
/// and executive summary are always present.
pub fn render_pdf(report: &PartialReport) -> Result<Vec<u8>, PdfError> {
    let sections = build_document(report);
    encode(&layout(&sections))
}
