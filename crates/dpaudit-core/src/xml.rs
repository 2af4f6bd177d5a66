use crate::error::Result;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// One element of a loaded configuration document. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// The `name` attribute, present on every named configuration object.
    pub fn name(&self) -> Option<&str> {
        self.attr("name")
    }

    /// Direct text content, whitespace-trimmed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    pub fn children<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.tag == tag)
    }

    pub fn all_children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter()
    }

    pub fn child(&self, tag: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Text of the first child with the given tag. `Some("")` when the child
    /// exists but is empty; `None` when the child is absent.
    pub fn child_text(&self, tag: &str) -> Option<&str> {
        self.child(tag).map(Element::text)
    }

    /// Attribute of the first child with the given tag.
    pub fn child_attr(&self, tag: &str, attr: &str) -> Option<&str> {
        self.child(tag).and_then(|c| c.attr(attr))
    }
}

// ---------------------------------------------------------------------------
// Document
// ---------------------------------------------------------------------------

/// A loaded `export.xml`, rooted at the `datapower-configuration` element.
#[derive(Debug, Clone)]
pub struct Document {
    root: Element,
}

impl Document {
    pub fn parse(xml: &str) -> Result<Document> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(element_from(&start)?),
                Event::Empty(start) => {
                    let elem = element_from(&start)?;
                    attach(&mut stack, &mut root, elem);
                }
                Event::Text(t) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.text.push_str(&t.unescape()?);
                    }
                }
                Event::CData(c) => {
                    if let Some(parent) = stack.last_mut() {
                        parent.text.push_str(std::str::from_utf8(&c)?);
                    }
                }
                Event::End(_) => {
                    // quick-xml validates end-tag pairing, so the stack is
                    // never empty here.
                    if let Some(elem) = stack.pop() {
                        attach(&mut stack, &mut root, elem);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        let root = root.ok_or_else(|| {
            crate::error::AuditError::MalformedDocument("document has no root element".into())
        })?;
        Ok(Document { root })
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// All elements of the given tag under `configuration`.
    pub fn config_elements<'a>(&'a self, tag: &'a str) -> Vec<&'a Element> {
        self.root
            .children("configuration")
            .flat_map(|c| c.children(tag))
            .collect()
    }

    /// The configuration element of the given tag whose `name` attribute
    /// matches.
    pub fn config_named<'a>(&'a self, tag: &'a str, name: &str) -> Option<&'a Element> {
        self.root
            .children("configuration")
            .flat_map(|c| c.children(tag))
            .find(|e| e.name() == Some(name))
    }

    /// Domain names listed in the top-level export.
    pub fn domain_names(&self) -> Vec<String> {
        self.root
            .children("domains")
            .flat_map(|d| d.children("domain"))
            .filter_map(|e| e.name().map(str::to_string))
            .collect()
    }
}

fn element_from(start: &BytesStart<'_>) -> Result<Element> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attrs = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attrs.push((key, value));
    }
    Ok(Element {
        tag,
        attrs,
        children: Vec::new(),
        text: String::new(),
    })
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, elem: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(elem),
        None => {
            if root.is_none() {
                *root = Some(elem);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<datapower-configuration version="3">
  <configuration domain="default">
    <StylePolicyAction name="rule_xform_0">
      <Transform>local:///a.xsl</Transform>
      <Type>xform</Type>
    </StylePolicyAction>
    <StylePolicyAction name="rule_log_1">
      <LogType>urlopen</LogType>
    </StylePolicyAction>
    <Matching name="all">
      <CombineWithOr>off</CombineWithOr>
    </Matching>
  </configuration>
  <domains>
    <domain name="default"/>
    <domain name="edge"/>
  </domains>
</datapower-configuration>
"#;

    #[test]
    fn parses_nested_elements() {
        let doc = Document::parse(EXPORT).unwrap();
        assert_eq!(doc.root().tag, "datapower-configuration");
        assert_eq!(doc.config_elements("StylePolicyAction").len(), 2);
        assert_eq!(doc.config_elements("Matching").len(), 1);
    }

    #[test]
    fn named_lookup() {
        let doc = Document::parse(EXPORT).unwrap();
        let action = doc.config_named("StylePolicyAction", "rule_xform_0").unwrap();
        assert_eq!(action.child_text("Transform"), Some("local:///a.xsl"));
        assert_eq!(action.child_text("Type"), Some("xform"));
        assert!(doc.config_named("StylePolicyAction", "missing").is_none());
    }

    #[test]
    fn child_text_absent_vs_empty() {
        let doc = Document::parse("<r><a></a></r>").unwrap();
        assert_eq!(doc.root().child_text("a"), Some(""));
        assert_eq!(doc.root().child_text("b"), None);
    }

    #[test]
    fn empty_elements_and_attrs() {
        let doc = Document::parse(EXPORT).unwrap();
        assert_eq!(doc.domain_names(), vec!["default", "edge"]);
        let root = doc.root();
        assert_eq!(root.attr("version"), Some("3"));
    }

    #[test]
    fn text_is_trimmed() {
        let doc = Document::parse("<r><a>\n  spaced  \n</a></r>").unwrap();
        assert_eq!(doc.root().child_text("a"), Some("spaced"));
    }

    #[test]
    fn unescapes_entities() {
        let doc = Document::parse("<r><a>x &amp; y</a></r>").unwrap();
        assert_eq!(doc.root().child_text("a"), Some("x & y"));
    }

    #[test]
    fn rejects_documents_without_a_root() {
        assert!(Document::parse("").is_err());
        assert!(Document::parse("just text, no elements").is_err());
    }
}
