use std::fmt::Write as _;

use crate::foundation::core::{SceneCanvas, polar_to_xy};
use crate::scene::node::{ArcCap, ArcClass, GroupRole, Node, NodeId, NodeKind, Scene, Stroke};

/// Serialize a scene to SVG markup.
///
/// The writer is a pure projection of the retained scene: it allocates
/// nothing in the scene and can be called at any time between rebuilds.
pub fn write_svg(scene: &Scene, canvas: &SceneCanvas) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        "<svg width=\"{}\" height=\"{}\" viewBox=\"0 0 {} {}\" fill=\"none\" xmlns=\"http://www.w3.org/2000/svg\">",
        canvas.width, canvas.height, canvas.width, canvas.height
    );

    for &child in scene.children(scene.root()) {
        write_node(scene, child, &mut out);
    }

    out.push_str("</svg>");
    out
}

/// Stylesheet for the segment hover/selection contract.
///
/// The fill layer reveals on hover, the base dims so color reads, and the
/// selected stack keeps the reveal sticky. Hosts embedding the markup in a
/// page include this once.
pub fn arc_style_css() -> &'static str {
    r#".seg-wrap { cursor: pointer; }
.seg-wrap .seg-color { opacity: 0; transition: opacity 180ms ease; }
.seg-wrap:hover .seg-color { opacity: 1; }
.seg-wrap .seg-base { opacity: 0.92; transition: opacity 180ms ease; }
.seg-wrap:hover .seg-base { opacity: 0.25; }
.seg-wrap .seg-outline { opacity: 0.24; transition: opacity 180ms ease, stroke 180ms ease; }
.seg-wrap:hover .seg-outline { opacity: 0.5; }
.seg-wrap.is-selected .seg-color { opacity: 1; }
.seg-wrap.is-selected .seg-base { opacity: 0.15; }
.seg-wrap.is-selected .seg-outline { opacity: 0.7; }
"#
}

fn write_node(scene: &Scene, id: NodeId, out: &mut String) {
    let Some(node) = scene.node(id) else {
        return;
    };
    if !node.display {
        return;
    }

    match &node.kind {
        NodeKind::Group(group) => {
            out.push_str("<g");
            write_name(node, out);
            match &group.role {
                GroupRole::Plain => {}
                GroupRole::SegmentWrap(seg) => {
                    let class = if group.selected {
                        "seg-wrap is-selected"
                    } else {
                        "seg-wrap"
                    };
                    let _ = write!(
                        out,
                        " class=\"{class}\" data-seg-key=\"{}\" data-gate=\"{}\"",
                        escape(&seg.key),
                        seg.gate
                    );
                }
                GroupRole::RingInstance {
                    instance_id,
                    module_id,
                } => {
                    let _ = write!(
                        out,
                        " data-ring-instance=\"{}\" data-ring-module=\"{}\"",
                        escape(instance_id),
                        escape(module_id)
                    );
                }
            }
            if node.opacity < 1.0 {
                let _ = write!(out, " opacity=\"{}\"", node.opacity);
            }
            out.push('>');
            for &child in scene.children(id) {
                write_node(scene, child, out);
            }
            out.push_str("</g>");
        }
        NodeKind::Circle(c) => {
            let _ = write!(out, "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"none\"", c.cx, c.cy, c.r);
            write_name(node, out);
            if let Some(stroke) = &c.stroke {
                write_stroke(stroke, out);
            }
            out.push_str(" pointer-events=\"none\"/>");
        }
        NodeKind::Arc(a) => {
            let _ = write!(out, "<path d=\"{}\" fill=\"none\"", a.to_svg_d());
            if let Some(class) = arc_class_name(a.class) {
                let _ = write!(out, " class=\"{class}\"");
            }
            write_stroke(&a.stroke, out);
            if a.class == ArcClass::Hit || a.hit.is_some() {
                out.push_str(" pointer-events=\"stroke\"");
            } else {
                out.push_str(" pointer-events=\"none\"");
            }
            out.push_str("/>");
        }
        NodeKind::Line(l) => {
            let _ = write!(
                out,
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"",
                l.from.x, l.from.y, l.to.x, l.to.y
            );
            write_stroke(&l.stroke, out);
            out.push_str(" pointer-events=\"none\"/>");
        }
        NodeKind::Dot(d) => {
            let _ = write!(
                out,
                "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" pointer-events=\"none\"/>",
                d.center.x,
                d.center.y,
                d.r,
                d.fill.to_svg()
            );
        }
        NodeKind::Path(p) => {
            let _ = write!(
                out,
                "<path d=\"{}\" fill=\"{}\" pointer-events=\"none\"/>",
                p.path.to_svg(),
                p.fill.to_svg()
            );
        }
        NodeKind::Text(t) => {
            let _ = write!(
                out,
                "<text x=\"{}\" y=\"{}\" fill=\"{}\" font-size=\"{}\" text-anchor=\"middle\" dominant-baseline=\"central\"",
                t.pos.x,
                t.pos.y,
                t.fill.to_svg(),
                t.size
            );
            if t.bold {
                out.push_str(" font-weight=\"700\"");
            }
            if node.opacity < 1.0 {
                let _ = write!(out, " opacity=\"{}\"", node.opacity);
            }
            let _ = write!(out, " pointer-events=\"none\">{}</text>", escape(&t.content));
        }
        NodeKind::ArcText(t) => {
            // The label path lives in defs; the glyphs ride it via textPath.
            let path_id = format!("tp-{}", id.0);
            let start_deg = t.center_deg - t.span_deg / 2.0;
            let end_deg = t.center_deg + t.span_deg / 2.0;
            let start = polar_to_xy(t.cx, t.cy, t.r, start_deg);
            let end = polar_to_xy(t.cx, t.cy, t.r, end_deg);
            let _ = write!(
                out,
                "<defs><path id=\"{path_id}\" d=\"M {} {} A {} {} 0 0 1 {} {}\"/></defs>",
                start.x, start.y, t.r, t.r, end.x, end.y
            );
            let _ = write!(
                out,
                "<text fill=\"{}\" font-size=\"{}\" letter-spacing=\"{}\" pointer-events=\"none\">",
                t.fill.to_svg(),
                t.size,
                t.letter_spacing
            );
            let _ = write!(
                out,
                "<textPath href=\"#{path_id}\" startOffset=\"50%\" text-anchor=\"middle\">{}</textPath></text>",
                escape(&t.content)
            );
        }
    }
}

fn write_name(node: &Node, out: &mut String) {
    if let Some(name) = &node.name {
        let _ = write!(out, " id=\"{}\"", escape(name));
    }
}

fn write_stroke(stroke: &Stroke, out: &mut String) {
    let _ = write!(
        out,
        " stroke=\"{}\" stroke-width=\"{}\"",
        stroke.paint.to_svg(),
        stroke.width
    );
    if stroke.cap == ArcCap::Round {
        out.push_str(" stroke-linecap=\"round\" stroke-linejoin=\"round\"");
    }
    if let Some((dash, gap)) = stroke.dash {
        let _ = write!(out, " stroke-dasharray=\"{dash} {gap}\"");
    }
}

fn arc_class_name(class: ArcClass) -> Option<&'static str> {
    match class {
        ArcClass::Hit => Some("seg-hit"),
        ArcClass::Outline => Some("seg-outline"),
        ArcClass::Base => Some("seg-base"),
        ArcClass::Match => Some("seg-match"),
        ArcClass::Fill => Some("seg-color"),
        ArcClass::Plain => None,
    }
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

#[cfg(test)]
#[path = "../../tests/unit/scene/svg.rs"]
mod tests;
