use crate::text::clean;
use scraper::node::Node;
use scraper::{ElementRef, Html};

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledBlock {
    pub label: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabeledText {
    pub preamble: String,
    pub blocks: Vec<LabeledBlock>,
}

pub fn has_label(raw: &str, tag: &str) -> bool {
    let lowered = raw.to_ascii_lowercase();
    let open = format!("<{tag}>");
    let close = format!("</{tag}>");
    let mut rest = lowered.as_str();
    while let Some(start) = rest.find(&open) {
        let after = &rest[start + open.len()..];
        let Some(end) = after.find(&close) else {
            return false;
        };
        if clean(&after[..end]).ends_with(':') {
            return true;
        }
        rest = &after[end..];
    }
    false
}

pub fn split_labeled(raw: &str, tag: &str) -> LabeledText {
    let fragment = Html::parse_fragment(raw);
    let mut preamble = String::new();
    let mut blocks: Vec<(String, String)> = Vec::new();
    walk(fragment.root_element(), tag, &mut preamble, &mut blocks);

    LabeledText {
        preamble: clean(&preamble),
        blocks: blocks
            .into_iter()
            .map(|(label, content)| LabeledBlock {
                label: clean(label.trim_end().trim_end_matches(':')),
                content: clean(&content),
            })
            .collect(),
    }
}

fn walk(
    element: ElementRef<'_>,
    tag: &str,
    preamble: &mut String,
    blocks: &mut Vec<(String, String)>,
) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => current(preamble, blocks).push_str(text),
            Node::Element(el) => {
                let Some(child_el) = ElementRef::wrap(child) else {
                    continue;
                };
                let name = el.name();
                if name.eq_ignore_ascii_case(tag) {
                    let label = child_el.text().collect::<String>();
                    if label.trim_end().ends_with(':') {
                        blocks.push((label, String::new()));
                        continue;
                    }
                }
                if is_block(name) {
                    current(preamble, blocks).push(' ');
                }
                walk(child_el, tag, preamble, blocks);
                if is_block(name) {
                    current(preamble, blocks).push(' ');
                }
            }
            _ => {}
        }
    }
}

fn current<'a>(preamble: &'a mut String, blocks: &'a mut [(String, String)]) -> &'a mut String {
    match blocks.last_mut() {
        Some((_, content)) => content,
        None => preamble,
    }
}

fn is_block(name: &str) -> bool {
    matches!(name, "p" | "br" | "div" | "li" | "ul" | "ol")
}
