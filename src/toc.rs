//! Table of contents.
//!
//! Turns the flat heading list of a document into a forest:
//!
//! ```text
//! ## Install            Install
//! ## Usage              Usage
//! ### Config     ──►      ├── Config
//! #### Env                │   └── Env
//! ### CLI                 └── CLI
//! ## FAQ                FAQ
//! ```
//!
//! Skipped levels are tolerated: a `####` right after a `##` becomes its
//! child.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use serde::Serialize;

use crate::utils::slug::{SlugSet, slugify};

const MAX_DEPTH: usize = 6;

/// A heading of a markdown document, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Heading {
    /// 1 to 6.
    pub depth: u8,
    pub slug: String,
    pub label: String,
}

impl Heading {
    pub fn new(depth: u8, label: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            depth,
            slug: slugify(&label),
            label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadingNode {
    pub label: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<HeadingNode>,
}

/// Nest a flat heading list.
///
/// The parent of a heading is the most recent heading at a shallower depth
/// that has not been closed by a later heading at its own depth or above.
pub fn build_toc(headings: &[Heading]) -> Vec<HeadingNode> {
    // last_at[d]: index of the open heading at depth d
    let mut last_at = [None::<usize>; MAX_DEPTH + 1];
    let mut children = vec![Vec::new(); headings.len()];
    let mut roots = Vec::new();

    for (i, heading) in headings.iter().enumerate() {
        let depth = usize::from(heading.depth).clamp(1, MAX_DEPTH);
        match (1..depth).rev().find_map(|d| last_at[d]) {
            Some(parent) => children[parent].push(i),
            None => roots.push(i),
        }
        last_at[depth] = Some(i);
        last_at[depth + 1..].fill(None);
    }

    roots
        .into_iter()
        .map(|i| assemble(i, headings, &children))
        .collect()
}

fn assemble(i: usize, headings: &[Heading], children: &[Vec<usize>]) -> HeadingNode {
    HeadingNode {
        label: headings[i].label.clone(),
        slug: headings[i].slug.clone(),
        children: children[i]
            .iter()
            .map(|&child| assemble(child, headings, children))
            .collect(),
    }
}

/// Collect the headings of a markdown body.
///
/// `{#custom-id}` attributes win over generated slugs; generated slugs are
/// made unique within the document.
pub fn extract_headings(markdown: &str) -> Vec<Heading> {
    let parser = Parser::new_ext(markdown, Options::ENABLE_HEADING_ATTRIBUTES);
    let mut slugs = SlugSet::default();
    let mut headings = Vec::new();
    let mut current: Option<(u8, Option<String>, String)> = None;

    for event in parser {
        match event {
            Event::Start(Tag::Heading { level, id, .. }) => {
                current = Some((level as u8, id.map(|id| id.to_string()), String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, label)) = &mut current {
                    label.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((_, _, label)) = &mut current {
                    label.push(' ');
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((depth, id, label)) = current.take() {
                    let label = label.trim().to_owned();
                    let slug = match id {
                        Some(id) => {
                            slugs.reserve(&id);
                            id
                        }
                        None => slugs.unique(slugify(&label)),
                    };
                    headings.push(Heading { depth, slug, label });
                }
            }
            _ => {}
        }
    }

    headings
}
