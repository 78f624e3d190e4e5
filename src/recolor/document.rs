//! Owned, immutable-by-convention SVG document tree.
//!
//! Parsing goes through `roxmltree`; every transform in this crate takes a `&SvgDocument` and
//! builds a new one, so a parsed part can be recolored several ways without re-fetching it.

use std::collections::HashSet;

use crate::foundation::error::{AvatarError, AvatarResult};

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// One node of the owned tree. Processing instructions are dropped on parse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum XmlNode {
    /// Element with attributes and children.
    Element(XmlElement),
    /// Character data (CDATA is folded into text).
    Text(String),
    /// Comment body.
    Comment(String),
}

/// Element with qualified names (`xlink:href`) kept as written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlElement {
    /// Qualified tag name.
    pub name: String,
    /// Attributes in document order, namespace declarations included.
    pub attrs: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    /// Element with no attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Tag name without namespace prefix.
    pub fn local_name(&self) -> &str {
        local(&self.name)
    }

    /// Attribute value by qualified name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or replace an attribute, keeping its position when it already exists.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_owned(), value)),
        }
    }

    /// Remove an attribute, returning its previous value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let idx = self.attrs.iter().position(|(k, _)| k == name)?;
        Some(self.attrs.remove(idx).1)
    }

    /// Child elements only.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|c| match c {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Concatenated direct text content.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|c| match c {
                XmlNode::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Depth-first visit of this element and all descendants.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a XmlElement)) {
        f(self);
        for child in self.child_elements() {
            child.walk(f);
        }
    }

    /// Serialize this element and its subtree.
    pub fn write_markup(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (k, v) in &self.attrs {
            out.push(' ');
            out.push_str(k);
            out.push_str("=\"");
            escape_into(v, true, out);
            out.push('"');
        }
        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        write_children(&self.children, out);
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    fn from_node(node: roxmltree::Node<'_, '_>) -> Self {
        let tag = node.tag_name();
        let mut el = Self::new(qualified(node, tag.namespace(), tag.name()));

        let inherited: HashSet<(Option<&str>, &str)> = node
            .parent_element()
            .map(|p| p.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
            .unwrap_or_default();
        for ns in node.namespaces() {
            if ns.uri() == XML_NS || inherited.contains(&(ns.name(), ns.uri())) {
                continue;
            }
            let key = match ns.name() {
                Some(prefix) => format!("xmlns:{prefix}"),
                None => "xmlns".to_owned(),
            };
            el.attrs.push((key, ns.uri().to_owned()));
        }

        for a in node.attributes() {
            el.attrs
                .push((qualified(node, a.namespace(), a.name()), a.value().to_owned()));
        }

        for child in node.children() {
            if child.is_element() {
                el.children.push(XmlNode::Element(Self::from_node(child)));
            } else if child.is_text() {
                if let Some(t) = child.text() {
                    el.children.push(XmlNode::Text(t.to_owned()));
                }
            } else if child.is_comment() {
                if let Some(t) = child.text() {
                    el.children.push(XmlNode::Comment(t.to_owned()));
                }
            }
        }
        el
    }
}

/// A parsed SVG document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SvgDocument {
    /// Root `<svg>` element.
    pub root: XmlElement,
}

impl SvgDocument {
    /// Parse SVG markup. DTDs are tolerated since exported art often carries one.
    pub fn parse(text: &str) -> AvatarResult<Self> {
        let opts = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..roxmltree::ParsingOptions::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, opts)
            .map_err(|e| AvatarError::asset(format!("parse svg markup: {e}")))?;
        Ok(Self {
            root: XmlElement::from_node(doc.root_element()),
        })
    }

    /// Wrap an element (typically a sprite-sheet `<symbol>`) as a document root.
    pub fn from_element(root: XmlElement) -> Self {
        Self { root }
    }

    /// Root `viewBox` attribute, if declared.
    pub fn view_box(&self) -> Option<&str> {
        self.root.attr("viewBox")
    }

    /// Serialized children of the root, ready to be wrapped in another element.
    pub fn inner_markup(&self) -> String {
        let mut out = String::new();
        write_children(&self.root.children, &mut out);
        out
    }

    /// Serialized document, without an XML declaration.
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.root.write_markup(&mut out);
        out
    }

    /// Copy with every element id and class name prefixed by `prefix`, references included.
    ///
    /// Merged layers share one document, so `cls-1` in the hair must not restyle `cls-1` in the
    /// body, nor a gradient id in one part shadow another's.
    pub fn scoped(&self, prefix: &str) -> Self {
        let mut ids = HashSet::new();
        self.root.walk(&mut |el| {
            if let Some(id) = el.attr("id") {
                ids.insert(id.to_owned());
            }
        });
        Self {
            root: scope_element(&self.root, prefix, &ids),
        }
    }
}

fn scope_element(el: &XmlElement, prefix: &str, ids: &HashSet<String>) -> XmlElement {
    let mut out = XmlElement::new(el.name.clone());
    for (k, v) in &el.attrs {
        let value = match local(k) {
            "id" => format!("{prefix}-{v}"),
            "class" => v
                .split_whitespace()
                .map(|c| format!("{prefix}-{c}"))
                .collect::<Vec<_>>()
                .join(" "),
            "href" => match v.strip_prefix('#') {
                Some(target) if ids.contains(target) => format!("#{prefix}-{target}"),
                _ => v.clone(),
            },
            _ => scope_url_refs(v, prefix, ids),
        };
        out.attrs.push((k.clone(), value));
    }
    let is_style = el.local_name() == "style";
    for child in &el.children {
        out.children.push(match child {
            XmlNode::Element(e) => XmlNode::Element(scope_element(e, prefix, ids)),
            XmlNode::Text(t) if is_style => XmlNode::Text(scope_url_refs(
                &crate::recolor::styles::scope_class_selectors(t, prefix),
                prefix,
                ids,
            )),
            other => other.clone(),
        });
    }
    out
}

fn scope_url_refs(value: &str, prefix: &str, ids: &HashSet<String>) -> String {
    if !value.contains("url(#") {
        return value.to_owned();
    }
    let mut out = String::with_capacity(value.len() + prefix.len());
    let mut rest = value;
    while let Some(at) = rest.find("url(#") {
        let (head, tail) = rest.split_at(at + "url(#".len());
        out.push_str(head);
        let end = tail.find(')').unwrap_or(tail.len());
        let target = &tail[..end];
        if ids.contains(target) {
            out.push_str(prefix);
            out.push('-');
        }
        out.push_str(target);
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}

fn qualified(node: roxmltree::Node<'_, '_>, ns: Option<&str>, name: &str) -> String {
    let Some(uri) = ns else {
        return name.to_owned();
    };
    if uri == XML_NS {
        return format!("xml:{name}");
    }
    match node.lookup_prefix(uri) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{name}"),
        _ => name.to_owned(),
    }
}

fn local(name: &str) -> &str {
    name.rsplit_once(':').map(|(_, l)| l).unwrap_or(name)
}

fn write_children(children: &[XmlNode], out: &mut String) {
    for child in children {
        match child {
            XmlNode::Element(e) => e.write_markup(out),
            XmlNode::Text(t) => escape_into(t, false, out),
            XmlNode::Comment(c) => {
                out.push_str("<!--");
                out.push_str(c);
                out.push_str("-->");
            }
        }
    }
}

/// Escape `s` for use inside a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_into(s, true, &mut out);
    out
}

fn escape_into(s: &str, attr: bool, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' if !attr => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/recolor/document.rs"]
mod tests;
