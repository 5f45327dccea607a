//! XML loader

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::Value;
use std::collections::HashMap;

use super::{InputFormat, LoadError, Loader};
use crate::models::{DataRow, Dataset};

/// Loads XML documents whose repeated elements are the rows
///
/// The row element is the most repeated child of the root; when no child
/// repeats, the search descends into the first child with several
/// children. Attributes and leaf children of each row element become
/// string columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlLoader;

#[derive(Debug, Default)]
struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    fn is_leaf(&self) -> bool {
        self.children.is_empty() && self.attributes.is_empty()
    }
}

fn start_node(e: &BytesStart<'_>) -> Result<XmlNode, LoadError> {
    let mut node = XmlNode {
        name: String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
        ..XmlNode::default()
    };
    for attr in e.attributes() {
        let attr = attr.map_err(|err| LoadError::parse(InputFormat::Xml, err))?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| LoadError::parse(InputFormat::Xml, err))?
            .into_owned();
        node.attributes.push((key, value));
    }
    Ok(node)
}

fn parse_tree(text: &str) -> Result<XmlNode, LoadError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => stack.push(start_node(e)?),
            Ok(Event::Empty(ref e)) => {
                let node = start_node(e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root = Some(node),
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(current) = stack.last_mut() {
                    let text = e.unescape().map_err(|err| LoadError::parse(InputFormat::Xml, err))?;
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(ref e)) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(e));
                }
            }
            Ok(Event::End(_)) => {
                let Some(node) = stack.pop() else {
                    return Err(LoadError::parse(InputFormat::Xml, "unbalanced closing tag"));
                };
                match stack.last_mut() {
                    Some(parent) => parent.children.push(node),
                    None => root = Some(node),
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(LoadError::parse(
                    InputFormat::Xml,
                    format!("at position {}: {}", reader.error_position(), e),
                ));
            }
            _ => {}
        }
    }

    root.ok_or_else(|| LoadError::parse(InputFormat::Xml, "document has no root element"))
}

/// The elements that hold one row each
fn find_row_elements(root: &XmlNode) -> Vec<&XmlNode> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for child in &root.children {
        let count = counts.entry(child.name.as_str()).or_insert(0);
        if *count == 0 {
            first_seen.push(child.name.as_str());
        }
        *count += 1;
    }

    let most_repeated = first_seen
        .iter()
        .map(|name| (*name, counts[name]))
        .fold(None, |best: Option<(&str, usize)>, (name, count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((name, count)),
        });

    if let Some((name, count)) = most_repeated
        && count > 1
    {
        return root.children.iter().filter(|c| c.name == name).collect();
    }

    if let Some(container) = root.children.iter().find(|c| c.children.len() > 1) {
        return find_row_elements(container);
    }

    if root.children.is_empty() {
        vec![root]
    } else {
        root.children.iter().collect()
    }
}

impl Loader for XmlLoader {
    fn format(&self) -> InputFormat {
        InputFormat::Xml
    }

    fn parse(&self, text: &str) -> Result<Dataset, LoadError> {
        let root = parse_tree(text)?;
        let mut columns: Vec<String> = Vec::new();
        let mut rows = Vec::new();

        for element in find_row_elements(&root) {
            let mut row = DataRow::new();
            for (key, value) in &element.attributes {
                row.insert(key.clone(), Value::String(value.clone()));
            }
            for child in element.children.iter().filter(|c| c.is_leaf()) {
                row.insert(child.name.clone(), Value::String(child.text.trim().to_string()));
            }
            for key in row.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
            rows.push(row);
        }

        Ok(Dataset::new(columns, rows))
    }
}
