// File: crates/chart-core/src/export.rs
// Summary: Style-inlining exporter: bakes effective style into a clone of a rendered chart.
// Notes:
// - The clone and the live original are walked in lockstep by child position.
// - Only container tags are descended into; only tags in the property table get a style.
// - The original is borrowed immutably for the whole walk.

use std::path::Path;

use tracing::debug;

use crate::error::{ChartError, Result};
use crate::style::StyleResolver;
use crate::svg::{Element, Node, SVG_NS};

/// Tags whose children are visited.
pub const CONTAINER_TAGS: [&str; 4] = ["svg", "g", "defs", "marker"];

/// Properties captured for a style-relevant tag, or `None` when the tag is left untouched.
pub fn style_properties(tag: &str) -> Option<&'static [&'static str]> {
    const SHAPE: &[&str] = &["fill", "stroke", "stroke-width"];
    match tag {
        "rect" | "path" | "marker" | "circle" => Some(SHAPE),
        "line" => Some(&["stroke", "stroke-width"]),
        "text" => Some(&["fill", "font-size", "text-anchor", "visibility", "font-family"]),
        "polygon" => Some(&["stroke", "fill"]),
        _ => None,
    }
}

/// A self-contained SVG document.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorDocument {
    root: Element,
}

impl VectorDocument {
    pub fn root(&self) -> &Element { &self.root }
    pub fn into_root(self) -> Element { self.root }

    pub fn to_svg_string(&self) -> String {
        self.root.to_xml()
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_svg_string())?;
        Ok(())
    }
}

/// Clone `original`, inline the effective style of every relevant element, and return the clone.
pub fn export_standalone<R: StyleResolver + ?Sized>(original: &Element, resolver: &R) -> Result<VectorDocument> {
    let mut root = original.clone();
    inline_styles_into(&mut root, original, resolver)?;
    if root.tag() == "svg" && root.get_attr("xmlns").is_none() {
        root.set_attr("xmlns", SVG_NS);
    }
    Ok(VectorDocument { root })
}

/// Write inline styles onto `target`, reading them from the structurally identical `original`.
///
/// Fails with [`ChartError::StructureMismatch`] as soon as the two trees diverge; `target`
/// may be partially styled in that case.
pub fn inline_styles_into<R: StyleResolver + ?Sized>(target: &mut Element, original: &Element, resolver: &R) -> Result<()> {
    let mut ancestors = Vec::new();
    let path = original.tag().to_string();
    walk(target, original, &mut ancestors, resolver, &path)
}

fn walk<'a, R: StyleResolver + ?Sized>(
    clone: &mut Element,
    original: &'a Element,
    ancestors: &mut Vec<&'a Element>,
    resolver: &R,
    path: &str,
) -> Result<()> {
    ensure_same_shape(clone, original, path)?;
    ancestors.push(original);
    for (i, (c, o)) in clone.children.iter_mut().zip(&original.children).enumerate() {
        let (Node::Element(c), Node::Element(o)) = (c, o) else { continue };
        if CONTAINER_TAGS.contains(&o.tag()) {
            walk(c, o, ancestors, resolver, &format!("{path}/{}[{i}]", o.tag()))?;
        } else if let Some(props) = style_properties(o.tag()) {
            let style = props
                .iter()
                .map(|p| format!("{p}:{};", resolver.computed_value(o, ancestors.as_slice(), p)))
                .collect::<Vec<_>>()
                .join(" ");
            c.set_attr("style", style);
        }
    }
    ancestors.pop();
    debug!(path, "inlined styles");
    Ok(())
}

fn ensure_same_shape(clone: &Element, original: &Element, path: &str) -> Result<()> {
    let mismatch = |reason: String| ChartError::StructureMismatch { path: path.to_string(), reason };
    if clone.tag() != original.tag() {
        return Err(mismatch(format!("tag <{}> vs <{}>", clone.tag(), original.tag())));
    }
    if clone.children.len() != original.children.len() {
        return Err(mismatch(format!(
            "{} children vs {}",
            clone.children.len(),
            original.children.len()
        )));
    }
    for (i, pair) in clone.children.iter().zip(&original.children).enumerate() {
        match pair {
            (Node::Element(a), Node::Element(b)) if a.tag() == b.tag() => {}
            (Node::Text(_), Node::Text(_)) => {}
            (a, b) => {
                let describe = |n: &Node| match n {
                    Node::Element(e) => format!("<{}>", e.tag()),
                    Node::Text(_) => "text".to_string(),
                };
                return Err(mismatch(format!("child {i} is {} vs {}", describe(a), describe(b))));
            }
        }
    }
    Ok(())
}
