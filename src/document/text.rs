//! Paragraph setting for the text column of a spread.
//!
//! Positions are relative to the top-left of the text block, with `baseline` growing
//! downwards. The layout engine flips them into page space.

use crate::{config::PageConfig, document::metrics::BaseFont};

// Slack for floating-point width sums.
const FIT_EPSILON: f64 = 1e-9;

#[derive(Clone, Debug, PartialEq)]
/// Fonts and spacing used to set a text block.
pub struct TextStyle {
    /// Body face.
    pub body_font: BaseFont,
    /// Body size in points.
    pub body_size: f64,
    /// Baseline-to-baseline distance.
    pub leading: f64,
    /// Drop cap face.
    pub cap_font: BaseFont,
    /// Drop cap size in points.
    pub cap_size: f64,
    /// Space between the drop cap and the indented lines.
    pub cap_gap: f64,
    /// Extra space between paragraphs.
    pub paragraph_spacing: f64,
}

impl TextStyle {
    /// Style derived from page settings.
    pub fn from_page(cfg: &PageConfig) -> Self {
        Self {
            body_font: BaseFont::TimesRoman,
            body_size: cfg.body_size,
            leading: cfg.leading,
            cap_font: BaseFont::TimesBold,
            cap_size: cfg.body_size * cfg.drop_cap_scale,
            cap_gap: cfg.drop_cap_gap,
            paragraph_spacing: cfg.paragraph_spacing,
        }
    }

    /// Number of body lines the drop cap spans.
    pub fn cap_lines(&self) -> usize {
        let lines = (self.cap_size * self.cap_font.cap_height() / self.leading).ceil();
        if lines.is_finite() && lines >= 1.0 {
            lines as usize
        } else {
            1
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
/// Enlarged first character of the text.
pub struct DropCap {
    /// The character.
    pub text: String,
    /// Advance width in points.
    pub width: f64,
    /// Baseline, aligned with the last body line it spans.
    pub baseline: f64,
    /// Number of body lines indented beside it.
    pub lines: usize,
}

#[derive(Clone, Debug, PartialEq)]
/// One set line of body text.
pub struct SetLine {
    /// Words joined by single spaces.
    pub text: String,
    /// Left offset from the block edge.
    pub x: f64,
    /// Baseline offset from the block top.
    pub baseline: f64,
    /// Width available to the line.
    pub available: f64,
    /// Natural width without justification.
    pub natural_width: f64,
    /// Extra space added to every word gap.
    pub word_spacing: f64,
    /// Index of the paragraph the line belongs to.
    pub paragraph: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
/// A set block of text.
pub struct TextBlock {
    /// Drop cap, absent for blank text.
    pub drop_cap: Option<DropCap>,
    /// Body lines, top to bottom.
    pub lines: Vec<SetLine>,
    /// Total height from block top to the lowest descender.
    pub height: f64,
}

/// Split on blank lines and collapse whitespace inside each paragraph.
pub fn split_paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut words: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !words.is_empty() {
                out.push(words.join(" "));
                words.clear();
            }
            continue;
        }
        words.extend(line.split_whitespace());
    }
    if !words.is_empty() {
        out.push(words.join(" "));
    }
    out
}

/// Greedy line breaking. `available(i)` is the width of line `i`.
///
/// A word wider than its line is placed alone rather than split.
pub fn wrap_words<'a>(
    words: &[&'a str],
    font: BaseFont,
    size: f64,
    available: impl Fn(usize) -> f64,
) -> Vec<Vec<&'a str>> {
    let space = font.text_width(" ", size);
    let mut lines: Vec<Vec<&str>> = Vec::new();
    let mut cur: Vec<&str> = Vec::new();
    let mut cur_w = 0.0;
    for &word in words {
        let ww = font.text_width(word, size);
        if cur.is_empty() {
            cur.push(word);
            cur_w = ww;
        } else if cur_w + space + ww <= available(lines.len()) + FIT_EPSILON {
            cur.push(word);
            cur_w += space + ww;
        } else {
            lines.push(std::mem::take(&mut cur));
            cur.push(word);
            cur_w = ww;
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

/// Set `text` into a column `width` points wide.
pub fn typeset(text: &str, width: f64, style: &TextStyle) -> TextBlock {
    let paragraphs = split_paragraphs(text);
    let Some(first) = paragraphs.first() else {
        return TextBlock::default();
    };

    let body = style.body_font;
    let size = style.body_size;
    let space = body.text_width(" ", size);

    let mut chars = first.chars();
    let cap = chars.next().map(String::from).unwrap_or_default();
    let rest = chars.as_str();
    let cap_width = style.cap_font.text_width(&cap, style.cap_size);
    let cap_lines = style.cap_lines();
    let mut indent = cap_width + style.cap_gap;
    if rest.starts_with(' ') {
        indent += space;
    }

    let cap_rise = style.cap_size * style.cap_font.cap_height();
    let first_baseline = (size * body.ascent())
        .max(cap_rise - (cap_lines as f64 - 1.0) * style.leading);
    let cap_baseline = first_baseline + (cap_lines as f64 - 1.0) * style.leading;

    let mut lines = Vec::new();
    let mut baseline = first_baseline;
    for (pi, para) in paragraphs.iter().enumerate() {
        let words: Vec<&str> = if pi == 0 {
            rest.split_whitespace().collect()
        } else {
            para.split_whitespace().collect()
        };
        if pi > 0 {
            baseline += style.paragraph_spacing;
        }

        let line_indent = |i: usize| if pi == 0 && i < cap_lines { indent } else { 0.0 };
        let wrapped = wrap_words(&words, body, size, |i| width - line_indent(i));
        let last = wrapped.len().saturating_sub(1);
        for (li, line_words) in wrapped.iter().enumerate() {
            let x = line_indent(li);
            let available = width - x;
            let text = line_words.join(" ");
            let natural_width = body.text_width(&text, size);
            let gaps = line_words.len().saturating_sub(1);
            let word_spacing = if li < last && gaps > 0 && natural_width < available {
                (available - natural_width) / gaps as f64
            } else {
                0.0
            };
            lines.push(SetLine {
                text,
                x,
                baseline,
                available,
                natural_width,
                word_spacing,
                paragraph: pi,
            });
            baseline += style.leading;
        }

        // Later paragraphs start below the drop cap.
        if pi == 0 && wrapped.len() < cap_lines {
            baseline = cap_baseline + style.leading;
        }
    }

    let descent = size * body.descent();
    let text_bottom = lines.last().map(|l| l.baseline + descent).unwrap_or(0.0);
    let height = text_bottom.max(cap_baseline + descent);

    TextBlock {
        drop_cap: (!cap.is_empty()).then(|| DropCap {
            text: cap,
            width: cap_width,
            baseline: cap_baseline,
            lines: cap_lines,
        }),
        lines,
        height,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/document/text.rs"]
mod tests;
