//! Paint command list produced from a layout

use crate::rendering::layout::{ElementType, Layout};
use image::RgbaImage;
use std::sync::Arc;

pub const TEXT_RGBA: (u8, u8, u8, u8) = (34, 34, 34, 255);
pub const RULE_RGBA: (u8, u8, u8, u8) = (180, 180, 180, 255);
pub const PRE_BACKGROUND_RGBA: (u8, u8, u8, u8) = (242, 242, 242, 255);
const HEADING_UNDERLINE_RGBA: (u8, u8, u8, u8) = (220, 220, 220, 255);

#[derive(Debug, Clone, PartialEq)]
pub enum PaintCommand {
    SolidRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        rgba: (u8, u8, u8, u8),
    },
    /// Lines separated by `\n`, drawn on a fixed glyph grid
    Text {
        x: i32,
        y: i32,
        text: String,
        scale: u32,
    },
    Image {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        image: Arc<RgbaImage>,
    },
}

/// Turn laid-out nodes into paint commands, in paint order.
pub fn paint(layout: &Layout) -> Vec<PaintCommand> {
    let mut cmds = Vec::with_capacity(layout.nodes.len() * 2);
    for node in &layout.nodes {
        let r = &node.rect;
        let pad = node.padding as i32;
        match node.elem_type {
            ElementType::Rule => cmds.push(PaintCommand::SolidRect {
                x: r.x,
                y: r.y,
                width: r.width,
                height: r.height,
                rgba: RULE_RGBA,
            }),
            ElementType::Image => {
                if let Some(img) = &node.image {
                    cmds.push(PaintCommand::Image {
                        x: r.x,
                        y: r.y,
                        width: r.width,
                        height: r.height,
                        image: Arc::clone(img),
                    });
                }
            }
            kind => {
                if kind == ElementType::Preformatted {
                    cmds.push(PaintCommand::SolidRect {
                        x: r.x,
                        y: r.y,
                        width: r.width,
                        height: r.height,
                        rgba: PRE_BACKGROUND_RGBA,
                    });
                }
                if kind == ElementType::ListItem {
                    // bullet
                    cmds.push(PaintCommand::SolidRect {
                        x: r.x - 10,
                        y: r.y + pad + 2,
                        width: 4,
                        height: 4,
                        rgba: TEXT_RGBA,
                    });
                }
                cmds.push(PaintCommand::Text {
                    x: r.x + pad,
                    y: r.y + pad,
                    text: node.text.clone(),
                    scale: node.scale,
                });
                if matches!(kind, ElementType::Heading(1) | ElementType::Heading(2)) {
                    cmds.push(PaintCommand::SolidRect {
                        x: r.x,
                        y: r.y + r.height as i32 - 1,
                        width: r.width,
                        height: 1,
                        rgba: HEADING_UNDERLINE_RGBA,
                    });
                }
            }
        }
    }
    cmds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::images::ImageLoader;
    use crate::rendering::layout::layout_fragment;
    use crate::CaptureConfig;
    use scraper::Html;

    fn paint_markup(html: &str) -> Vec<PaintCommand> {
        let doc = Html::parse_fragment(html);
        let mut loader = ImageLoader::new(&CaptureConfig::default());
        paint(&layout_fragment(&doc, 300, &mut loader))
    }

    #[test]
    fn paragraph_paints_text() {
        let cmds = paint_markup("<p>Hello</p>");
        assert_eq!(cmds.len(), 1);
        match &cmds[0] {
            PaintCommand::Text { text, scale, .. } => {
                assert_eq!(text, "Hello");
                assert_eq!(*scale, 1);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn rule_and_list_item_paint_rects() {
        let cmds = paint_markup("<hr><ul><li>item</li></ul>");
        let rects = cmds
            .iter()
            .filter(|c| matches!(c, PaintCommand::SolidRect { .. }))
            .count();
        assert_eq!(rects, 2);
    }
}
