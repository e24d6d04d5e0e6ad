//! Block layout for raster capture
//!
//! Stacks blocks vertically at a fixed capture width. Text is measured on a
//! fixed 8px glyph cell, so wrapping and heights are deterministic.

use crate::rendering::images::ImageLoader;
use image::RgbaImage;
use scraper::{ElementRef, Html, Node};
use std::sync::Arc;

/// Glyph cell edge in CSS px at scale 1
pub const GLYPH: u32 = 8;
/// Vertical gap between wrapped lines at scale 1
pub const LINE_GAP: u32 = 2;

const PAGE_PADDING: u32 = 8;

#[derive(Debug, Clone, PartialEq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    /// h1..h6, carrying the level
    Heading(u8),
    Paragraph,
    ListItem,
    Preformatted,
    Rule,
    Image,
}

/// A positioned block with its wrapped text (one line per `\n`)
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub rect: Rect,
    /// Inset of the text from the block edge
    pub padding: u32,
    pub text: String,
    pub elem_type: ElementType,
    pub scale: u32,
    pub image: Option<Arc<RgbaImage>>,
}

/// Laid-out fragment; `height` covers every block plus page padding.
#[derive(Debug, Clone)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub nodes: Vec<LayoutNode>,
}

enum Block {
    Text { kind: ElementType, text: String },
    Rule,
    Image { src: String, width: Option<u32>, height: Option<u32> },
}

const SKIPPED_TAGS: &[&str] = &["head", "title", "script", "style", "template", "noscript", "br"];

const TEXT_BLOCK_TAGS: &[&str] = &[
    "p", "li", "dt", "dd", "td", "th", "caption", "figcaption", "blockquote", "label",
];

fn is_block_tag(tag: &str) -> bool {
    TEXT_BLOCK_TAGS.contains(&tag)
        || matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "pre" | "hr" | "img")
        || matches!(tag, "div" | "section" | "article" | "ul" | "ol" | "table" | "tr")
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn dimension_attr(el: &ElementRef<'_>, name: &str) -> Option<u32> {
    el.value()
        .attr(name)
        .map(|v| v.trim().trim_end_matches("px"))
        .and_then(|v| v.parse::<u32>().ok())
        .filter(|v| *v > 0)
}

fn push_image(el: &ElementRef<'_>, out: &mut Vec<Block>) {
    if let Some(src) = el.value().attr("src") {
        out.push(Block::Image {
            src: src.to_string(),
            width: dimension_attr(el, "width"),
            height: dimension_attr(el, "height"),
        });
    }
}

fn collect_blocks(el: ElementRef<'_>, out: &mut Vec<Block>) {
    for child in el.children() {
        match child.value() {
            Node::Text(t) => {
                let text = collapse_whitespace(t);
                if !text.is_empty() {
                    out.push(Block::Text { kind: ElementType::Paragraph, text });
                }
            }
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_element(child_el, out);
                }
            }
            _ => {}
        }
    }
}

fn collect_element(el: ElementRef<'_>, out: &mut Vec<Block>) {
    let tag = el.value().name();
    if SKIPPED_TAGS.contains(&tag) {
        return;
    }
    if let Some(level) = heading_level(tag) {
        let text = collapse_whitespace(&el.text().collect::<String>());
        if !text.is_empty() {
            out.push(Block::Text { kind: ElementType::Heading(level), text });
        }
        return;
    }
    match tag {
        "hr" => out.push(Block::Rule),
        "img" => push_image(&el, out),
        "pre" => {
            let text = el.text().collect::<String>();
            if !text.trim().is_empty() {
                out.push(Block::Text {
                    kind: ElementType::Preformatted,
                    text: text.trim_matches('\n').to_string(),
                });
            }
        }
        t if TEXT_BLOCK_TAGS.contains(&t) => {
            let text = collapse_whitespace(&el.text().collect::<String>());
            if !text.is_empty() {
                let kind = if t == "li" { ElementType::ListItem } else { ElementType::Paragraph };
                out.push(Block::Text { kind, text });
            }
            // Inline images inside a text block follow it
            for img in el.descendants().filter_map(ElementRef::wrap) {
                if img.value().name() == "img" {
                    push_image(&img, out);
                }
            }
        }
        _ => {
            let has_blocks = el
                .descendants()
                .skip(1)
                .filter_map(ElementRef::wrap)
                .any(|d| is_block_tag(d.value().name()));
            if has_blocks {
                collect_blocks(el, out);
            } else {
                // Inline-only container: one paragraph for the whole run
                let text = collapse_whitespace(&el.text().collect::<String>());
                if !text.is_empty() {
                    out.push(Block::Text { kind: ElementType::Paragraph, text });
                }
            }
        }
    }
}

/// Greedy word wrap on a fixed character budget
pub fn wrap_text(text: &str, chars_per_line: usize) -> Vec<String> {
    let chars_per_line = chars_per_line.max(1);
    let mut lines = Vec::new();
    let mut cur = String::new();
    for word in text.split_whitespace() {
        if cur.chars().count() + word.chars().count() + 1 > chars_per_line && !cur.is_empty() {
            lines.push(cur);
            cur = word.to_string();
        } else {
            if !cur.is_empty() {
                cur.push(' ');
            }
            cur.push_str(word);
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

fn text_scale(kind: ElementType) -> u32 {
    match kind {
        ElementType::Heading(1) => 3,
        ElementType::Heading(2) => 2,
        _ => 1,
    }
}

/// Lay out a parsed fragment at `width` CSS px. Images are resolved through
/// `images`; one that fails to load is left out.
pub fn layout_fragment(fragment: &Html, width: u32, images: &mut ImageLoader) -> Layout {
    let mut blocks = Vec::new();
    collect_blocks(fragment.root_element(), &mut blocks);

    let mut y = PAGE_PADDING;
    let block_width = width.saturating_sub(PAGE_PADDING * 2);
    let mut nodes = Vec::new();

    for block in blocks {
        match block {
            Block::Text { kind, text } => {
                let scale = text_scale(kind);
                let padding = if matches!(kind, ElementType::Heading(_)) { 8 } else { 6 };
                let indent = if kind == ElementType::ListItem { 16 } else { 0 };
                let content_w = block_width.saturating_sub(padding * 2 + indent);
                let cell = GLYPH * scale;
                let chars_per_line = (content_w / cell).max(1) as usize;

                let lines: Vec<String> = if kind == ElementType::Preformatted {
                    text.lines()
                        .map(|l| l.chars().take(chars_per_line).collect())
                        .collect()
                } else {
                    wrap_text(&text, chars_per_line)
                };
                let line_count = (lines.len() as u32).max(1);
                let box_h = line_count * (GLYPH + LINE_GAP) * scale + padding * 2;

                nodes.push(LayoutNode {
                    rect: Rect {
                        x: (PAGE_PADDING + indent) as i32,
                        y: y as i32,
                        width: block_width.saturating_sub(indent),
                        height: box_h,
                    },
                    padding,
                    text: lines.join("\n"),
                    elem_type: kind,
                    scale,
                    image: None,
                });
                y += box_h + padding;
            }
            Block::Rule => {
                nodes.push(LayoutNode {
                    rect: Rect { x: PAGE_PADDING as i32, y: (y + 4) as i32, width: block_width, height: 2 },
                    padding: 0,
                    text: String::new(),
                    elem_type: ElementType::Rule,
                    scale: 1,
                    image: None,
                });
                y += 10;
            }
            Block::Image { src, width: attr_w, height: attr_h } => {
                let Some(img) = images.load(&src) else {
                    continue;
                };
                let (nat_w, nat_h) = img.dimensions();
                let (mut w, mut h) = match (attr_w, attr_h) {
                    (Some(w), Some(h)) => (w, h),
                    (Some(w), None) => (w, scale_dim(nat_h, w, nat_w)),
                    (None, Some(h)) => (scale_dim(nat_w, h, nat_h), h),
                    (None, None) => (nat_w, nat_h),
                };
                if w > block_width && block_width > 0 {
                    h = scale_dim(h, block_width, w);
                    w = block_width;
                }
                if w == 0 || h == 0 {
                    continue;
                }
                nodes.push(LayoutNode {
                    rect: Rect { x: PAGE_PADDING as i32, y: y as i32, width: w, height: h },
                    padding: 0,
                    text: String::new(),
                    elem_type: ElementType::Image,
                    scale: 1,
                    image: Some(img),
                });
                y += h + 6;
            }
        }
    }

    Layout {
        width,
        height: y + PAGE_PADDING,
        nodes,
    }
}

/// `value * num / den`, rounded, for aspect-preserving resizes
fn scale_dim(value: u32, num: u32, den: u32) -> u32 {
    if den == 0 {
        return value;
    }
    ((value as u64 * num as u64 + den as u64 / 2) / den as u64) as u32
}
