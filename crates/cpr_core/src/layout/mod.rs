use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{codes, AppError};
use crate::export::{export_filename, DocumentBlock, Emphasis};

/// Page geometry in character columns and lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageLayout {
    pub width: usize,
    /// Maximum lines on one page before a break is forced.
    pub page_break_threshold: usize,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: 90,
            page_break_threshold: 60,
        }
    }
}

impl PageLayout {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.width == 0 || self.page_break_threshold == 0 {
            return Err(AppError::new(
                codes::EXPORT_LAYOUT_INVALID,
                "Page width and page break threshold must be positive",
            )
            .with_details(format!(
                "width={}; page_break_threshold={}",
                self.width, self.page_break_threshold
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub emphasis: Emphasis,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub lines: Vec<Line>,
}

/// Greedy word wrap. Words longer than `width` are split; embedded newlines start new lines.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0usize;
        for word in paragraph.split_whitespace() {
            let mut chars: Vec<char> = word.chars().collect();
            while chars.len() > width {
                if current_len > 0 {
                    out.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = chars.split_off(width);
                out.push(chars.into_iter().collect());
                chars = rest;
            }
            let word_len = chars.len();
            if word_len == 0 {
                continue;
            }
            let needed = if current_len == 0 { word_len } else { current_len + 1 + word_len };
            if needed > width {
                out.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.extend(chars);
            current_len += word_len;
        }
        out.push(current);
    }
    out
}

/// Lay blocks out on pages.
///
/// A heading that does not start a page is preceded by a blank line. A block that would cross
/// the threshold starts a new page; a block longer than a whole page continues on the next.
pub fn paginate(blocks: &[DocumentBlock], layout: PageLayout) -> Result<Vec<Page>, AppError> {
    layout.validate()?;

    let mut pages: Vec<Page> = Vec::new();
    let mut page = Page::default();

    for block in blocks {
        let wrapped = wrap_text(&block.text, layout.width);
        let gap = usize::from(block.is_heading && !page.lines.is_empty());
        if !page.lines.is_empty() && page.lines.len() + gap + wrapped.len() > layout.page_break_threshold {
            pages.push(std::mem::take(&mut page));
        }
        if block.is_heading && !page.lines.is_empty() {
            page.lines.push(Line {
                text: String::new(),
                emphasis: Emphasis::Body,
            });
        }
        for text in wrapped {
            if page.lines.len() == layout.page_break_threshold {
                pages.push(std::mem::take(&mut page));
            }
            page.lines.push(Line {
                text,
                emphasis: block.emphasis,
            });
        }
    }
    if !page.lines.is_empty() || pages.is_empty() {
        pages.push(page);
    }
    Ok(pages)
}

/// Writes laid-out pages to a concrete document format.
pub trait DocumentWriter {
    fn extension(&self) -> &'static str;

    /// Write the document for an incident dated `date` and return the artifact path.
    fn write(&self, date: &str, pages: &[Page], layout: PageLayout) -> Result<PathBuf, AppError>;
}

/// Plain UTF-8 text, pages separated by form feeds. Titles and captions are centered.
#[derive(Debug, Clone)]
pub struct TextDocumentWriter {
    out_dir: PathBuf,
}

impl TextDocumentWriter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }
}

pub fn render_text(pages: &[Page], layout: PageLayout) -> String {
    let mut out = String::new();
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            out.push('\u{c}');
        }
        for line in &page.lines {
            match line.emphasis {
                Emphasis::Title | Emphasis::Caption => {
                    let len = line.text.chars().count();
                    let pad = layout.width.saturating_sub(len) / 2;
                    out.push_str(&" ".repeat(pad));
                    out.push_str(&line.text);
                }
                Emphasis::Section => out.push_str(&line.text.to_uppercase()),
                _ => out.push_str(&line.text),
            }
            out.push('\n');
        }
    }
    out
}

impl DocumentWriter for TextDocumentWriter {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn write(&self, date: &str, pages: &[Page], layout: PageLayout) -> Result<PathBuf, AppError> {
        fs::create_dir_all(&self.out_dir).map_err(|e| {
            AppError::new(codes::EXPORT_FAILED, "Failed to create export directory")
                .with_details(format!("path={}: {}", self.out_dir.display(), e))
        })?;

        let target = self.out_dir.join(export_filename(date, self.extension()));
        let tmp_path = target.with_extension("export_tmp");
        let body = render_text(pages, layout);

        if let Err(e) = fs::write(&tmp_path, body.as_bytes()) {
            let _ = fs::remove_file(&tmp_path);
            return Err(
                AppError::new(codes::EXPORT_FAILED, "Failed to write export file")
                    .with_details(format!("path={}: {}", tmp_path.display(), e))
                    .with_retryable(true),
            );
        }
        fs::rename(&tmp_path, &target).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            AppError::new(codes::EXPORT_FAILED, "Failed to finalize export file")
                .with_details(format!(
                    "src={} dst={}: {}",
                    tmp_path.display(),
                    target.display(),
                    e
                ))
                .with_retryable(true)
        })?;

        log::info!("exported report to {}", target.display());
        Ok(target)
    }
}
