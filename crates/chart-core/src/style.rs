// File: crates/chart-core/src/style.rs
// Summary: Stylesheet cascade standing in for a page's computed style.
// Notes:
// - Selectors support tag, `.class`, `#id` and the descendant combinator.
// - Precedence: inline `style` > rules (specificity, then source order) >
//   presentation attribute > inherited from parent > initial value.

use crate::error::{ChartError, Result};
use crate::svg::Element;

/// Resolves the effective value of a style property on an element.
pub trait StyleResolver {
    /// `ancestors` lists the element's ancestors from the root down to its parent.
    fn computed_value(&self, element: &Element, ancestors: &[&Element], property: &str) -> String;
}

/// Page style shipped with the chart renderer.
pub const DEFAULT_CSS: &str = r#"
/* base */
.linechart { font-family: "Helvetica Neue", Arial, sans-serif; color: #333333; }
.linechart text { fill: #333333; font-size: 12px; }
.linechart .title { font-size: 18px; fill: #000000; }
.linechart .source { font-size: 10px; fill: #999999; }

/* data */
.linechart .line { fill: none; stroke: #ff7f0e; stroke-width: 3px; }
.linechart .area { fill: #ffe0c2; stroke: none; }
.linechart .dots circle { fill: #ff7f0e; stroke: #ffffff; stroke-width: 1px; }
.linechart marker path, .linechart marker circle { fill: #ff7f0e; stroke: none; }

/* axes */
.linechart .axis { color: #999999; }
.linechart .axis path, .linechart .axis line { fill: none; stroke-width: 1px; }
.linechart .axis text { font-size: 11px; fill: #666666; }

/* annotations */
.linechart .reference { fill: none; stroke: #888888; stroke-width: 2px; }
.linechart text.reference { fill: #555555; stroke: none; font-size: 12px; }
.linechart .startvalue, .linechart .endvalue { font-size: 16px; fill: #ff7f0e; }
.linechart .multiplier { font-size: 11px; fill: #666666; }
"#;

/// One compound selector: optional tag, optional id, any number of classes.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn parse(s: &str) -> Option<Self> {
        let mut out = Compound { tag: None, id: None, classes: Vec::new() };
        let mut rest = s;
        let ident_len = |t: &str| t.find(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_')).unwrap_or(t.len());

        if let Some(stripped) = rest.strip_prefix('*') {
            rest = stripped;
        } else {
            let n = ident_len(rest);
            if n > 0 {
                out.tag = Some(rest[..n].to_ascii_lowercase());
                rest = &rest[n..];
            }
        }
        while let Some(kind) = rest.chars().next() {
            let body = &rest[kind.len_utf8()..];
            let n = ident_len(body);
            if n == 0 {
                return None;
            }
            match kind {
                '.' => out.classes.push(body[..n].to_string()),
                '#' => out.id = Some(body[..n].to_string()),
                _ => return None,
            }
            rest = &body[n..];
        }
        Some(out)
    }

    fn matches(&self, e: &Element) -> bool {
        self.tag.as_deref().map_or(true, |t| t == e.tag())
            && self.id.as_deref().map_or(true, |id| e.id() == Some(id))
            && self.classes.iter().all(|c| e.has_class(c))
    }
}

/// A descendant-combinator selector such as `.linechart text.reference`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    parts: Vec<Compound>,
}

impl Selector {
    pub fn parse(s: &str) -> Option<Self> {
        let parts = s.split_whitespace().map(Compound::parse).collect::<Option<Vec<_>>>()?;
        if parts.is_empty() { None } else { Some(Self { parts }) }
    }

    /// (ids, classes, tags)
    pub fn specificity(&self) -> (usize, usize, usize) {
        self.parts.iter().fold((0, 0, 0), |(a, b, c), p| {
            (a + p.id.is_some() as usize, b + p.classes.len(), c + p.tag.is_some() as usize)
        })
    }

    pub fn matches(&self, element: &Element, ancestors: &[&Element]) -> bool {
        let Some((last, rest)) = self.parts.split_last() else { return false };
        if !last.matches(element) {
            return false;
        }
        // Descendant-only combinators: matching greedily from the nearest ancestor is exact.
        let mut pending = rest.iter().rev().peekable();
        for anc in ancestors.iter().rev() {
            match pending.peek() {
                Some(part) if part.matches(anc) => {
                    pending.next();
                }
                Some(_) => {}
                None => break,
            }
        }
        pending.peek().is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Rule {
    selector: Selector,
    declarations: Vec<(String, String)>,
    order: usize,
}

impl Rule {
    fn get(&self, property: &str) -> Option<&str> {
        self.declarations.iter().rev().find(|(k, _)| k == property).map(|(_, v)| v.as_str())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Stylesheet {
    rules: Vec<Rule>,
    blocks: usize,
}

impl Stylesheet {
    pub fn new() -> Self { Self::default() }

    /// The stylesheet charts are designed against.
    pub fn default_chart() -> Self {
        // DEFAULT_CSS is covered by tests; an empty sheet is the only possible fallback.
        Self::parse(DEFAULT_CSS).unwrap_or_default()
    }

    pub fn parse(css: &str) -> Result<Self> {
        let mut sheet = Self::new();
        sheet.extend_from_css(css)?;
        Ok(sheet)
    }

    /// Append the rules of `css` after the existing ones (later rules win ties).
    pub fn extend_from_css(&mut self, css: &str) -> Result<()> {
        let css = strip_comments(css);
        let mut rest = css.as_str();
        loop {
            let Some(open) = rest.find('{') else {
                if rest.trim().is_empty() {
                    return Ok(());
                }
                return Err(self.error("expected `{` after selector"));
            };
            let Some(close) = rest[open..].find('}').map(|i| open + i) else {
                return Err(self.error("unterminated block"));
            };
            let selectors = &rest[..open];
            let declarations = parse_declarations(&rest[open + 1..close]).ok_or_else(|| self.error("declaration without `:`"))?;
            let order = self.blocks;
            for raw in selectors.split(',') {
                let selector = Selector::parse(raw.trim()).ok_or_else(|| self.error(format!("bad selector {:?}", raw.trim())))?;
                self.rules.push(Rule { selector, declarations: declarations.clone(), order });
            }
            self.blocks += 1;
            rest = &rest[close + 1..];
        }
    }

    fn error(&self, reason: impl Into<String>) -> ChartError {
        ChartError::Stylesheet { block: self.blocks, reason: reason.into() }
    }

    pub fn len(&self) -> usize { self.rules.len() }
    pub fn is_empty(&self) -> bool { self.rules.is_empty() }

    /// Specified value before inheritance, if any source declares one.
    fn declared(&self, element: &Element, ancestors: &[&Element], property: &str) -> Option<String> {
        if let Some(v) = element.get_attr("style").and_then(|s| inline_value(s, property)) {
            return Some(v);
        }
        let winner = self
            .rules
            .iter()
            .filter_map(|r| r.get(property).map(|v| (r, v)))
            .filter(|(r, _)| r.selector.matches(element, ancestors))
            .max_by_key(|(r, _)| (r.selector.specificity(), r.order));
        if let Some((_, v)) = winner {
            return Some(v.to_string());
        }
        element.get_attr(property).map(str::to_string)
    }
}

impl StyleResolver for Stylesheet {
    fn computed_value(&self, element: &Element, ancestors: &[&Element], property: &str) -> String {
        let declared = self.declared(element, ancestors, property);
        match declared.as_deref() {
            Some(v) if v.eq_ignore_ascii_case("inherit") => self.inherited(ancestors, property),
            Some(v) if v.eq_ignore_ascii_case("currentcolor") && property != "color" => {
                self.computed_value(element, ancestors, "color")
            }
            Some(v) => normalize(property, v),
            None if is_inherited(property) => self.inherited(ancestors, property),
            None => initial_value(property).to_string(),
        }
    }
}

impl Stylesheet {
    fn inherited(&self, ancestors: &[&Element], property: &str) -> String {
        match ancestors.split_last() {
            Some((parent, rest)) => self.computed_value(parent, rest, property),
            None => initial_value(property).to_string(),
        }
    }
}

fn strip_comments(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut rest = css;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        rest = match rest[start + 2..].find("*/") {
            Some(end) => &rest[start + 2 + end + 2..],
            None => "",
        };
    }
    out.push_str(rest);
    out
}

fn parse_declarations(body: &str) -> Option<Vec<(String, String)>> {
    let mut out = Vec::new();
    for decl in body.split(';') {
        if decl.trim().is_empty() {
            continue;
        }
        let (k, v) = decl.split_once(':')?;
        let v = v.trim().trim_end_matches("!important").trim();
        out.push((k.trim().to_ascii_lowercase(), v.to_string()));
    }
    Some(out)
}

/// Last declaration of `property` in an inline `style` attribute.
pub fn inline_value(style: &str, property: &str) -> Option<String> {
    parse_declarations(style)?
        .into_iter()
        .rev()
        .find(|(k, _)| k == property)
        .map(|(_, v)| v)
}

fn is_inherited(property: &str) -> bool {
    matches!(
        property,
        "fill" | "stroke" | "stroke-width" | "stroke-linejoin" | "font-size" | "font-family"
            | "font-weight" | "text-anchor" | "visibility" | "color"
    )
}

fn initial_value(property: &str) -> &'static str {
    match property {
        "fill" | "color" => "rgb(0, 0, 0)",
        "stroke" => "none",
        "stroke-width" => "1px",
        "font-size" => "16px",
        "font-family" => "sans-serif",
        "text-anchor" => "start",
        "visibility" => "visible",
        "opacity" => "1",
        _ => "",
    }
}

fn normalize(property: &str, value: &str) -> String {
    match property {
        "fill" | "stroke" | "color" => normalize_color(value),
        "stroke-width" | "font-size" => match value.parse::<f64>() {
            Ok(n) => format!("{}px", crate::svg::fmt_num(n)),
            Err(_) => value.to_string(),
        },
        _ => value.to_string(),
    }
}

/// Colours in computed form: `rgb(r, g, b)`, or `rgba(...)` when translucent.
pub fn normalize_color(value: &str) -> String {
    let v = value.trim();
    let lower = v.to_ascii_lowercase();
    let rgb = match lower.as_str() {
        "none" => return "none".to_string(),
        "transparent" => return "rgba(0, 0, 0, 0)".to_string(),
        "black" => Some((0, 0, 0)),
        "white" => Some((255, 255, 255)),
        "red" => Some((255, 0, 0)),
        "green" => Some((0, 128, 0)),
        "blue" => Some((0, 0, 255)),
        "orange" => Some((255, 165, 0)),
        "gray" | "grey" => Some((128, 128, 128)),
        "steelblue" => Some((70, 130, 180)),
        _ => None,
    };
    if let Some((r, g, b)) = rgb {
        return format!("rgb({r}, {g}, {b})");
    }
    if let Some(hex) = lower.strip_prefix('#') {
        let expanded: String = match hex.len() {
            3 => hex.chars().flat_map(|c| [c, c]).collect(),
            6 => hex.to_string(),
            _ => return v.to_string(),
        };
        if let Ok(n) = u32::from_str_radix(&expanded, 16) {
            return format!("rgb({}, {}, {})", n >> 16, (n >> 8) & 0xff, n & 0xff);
        }
        return v.to_string();
    }
    if let Some(inner) = lower.strip_prefix("rgb(").and_then(|s| s.strip_suffix(')')) {
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        return format!("rgb({})", parts.join(", "));
    }
    v.to_string()
}
