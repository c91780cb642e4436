//! PowerPoint decks (`.pptx`).

use crate::documents::package::{self, OfficePackage};
use crate::documents::text::{self, DRAWING};
use crate::documents::xml::{Element, XmlDocument};
use crate::documents::DocumentError;
use log::warn;

const SLIDE_PREFIX: &str = "ppt/slides/slide";
const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS: &str = "ppt/_rels/presentation.xml.rels";

pub struct SlideDeck {
    package: OfficePackage,
    /// Slide part name and parsed XML, in presentation order.
    slides: Vec<(String, XmlDocument)>,
}

impl SlideDeck {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let package = OfficePackage::from_bytes(bytes)?;
        let names = if package.contains(PRESENTATION_PART) {
            listed_slides(&package)?
        } else {
            numbered_slides(&package)
        };

        let mut slides = Vec::with_capacity(names.len());
        for name in names {
            let xml = package.read_xml(&name)?;
            slides.push((name, xml));
        }
        Ok(Self { package, slides })
    }

    /// Text of every text-bearing shape across all slides; paragraphs of a shape are
    /// joined with `\n`.
    pub fn shape_texts(&self) -> Vec<String> {
        let mut texts = Vec::new();
        for (_, slide) in &self.slides {
            if let Some(tree) = shape_tree(&slide.root) {
                collect_shape_texts(tree, &mut texts);
            }
        }
        texts
    }

    /// Calls `rewrite` with the `p:txBody` of every text-bearing shape.
    pub fn rewrite_shapes<F>(&mut self, mut rewrite: F)
    where
        F: FnMut(&mut Element),
    {
        for (_, slide) in &mut self.slides {
            if let Some(tree) = shape_tree_mut(&mut slide.root) {
                rewrite_shape_tree(tree, &mut rewrite);
            }
        }
    }

    pub fn into_bytes(mut self) -> Result<Vec<u8>, DocumentError> {
        for (name, slide) in &self.slides {
            self.package.write_xml(name, slide);
        }
        self.package.to_bytes()
    }
}

/// Slides in the order of the presentation's slide list. Parts the list does not
/// reference are not part of the deck.
fn listed_slides(package: &OfficePackage) -> Result<Vec<String>, DocumentError> {
    let presentation = package.read_xml(PRESENTATION_PART)?;
    let Some(list) = presentation.root.find("p:sldIdLst") else {
        return Ok(Vec::new());
    };
    let rels = package.read_xml(PRESENTATION_RELS)?;

    let mut names = Vec::new();
    for slide_id in list.elements().filter(|el| el.name == "p:sldId") {
        let Some(rid) = slide_id.attribute("r:id") else {
            continue;
        };
        let target = rels
            .root
            .elements()
            .find(|rel| rel.local_name() == "Relationship" && rel.attribute("Id") == Some(rid))
            .and_then(|rel| rel.attribute("Target"));
        match target {
            Some(target) => {
                let name = package::resolve_target(PRESENTATION_PART, target);
                if package.contains(&name) {
                    names.push(name);
                } else {
                    warn!("slide list entry {rid} points at missing part {name}");
                }
            }
            None => warn!("slide list entry {rid} has no relationship"),
        }
    }
    Ok(names)
}

/// Fallback for packages without a presentation part: slide parts by number.
fn numbered_slides(package: &OfficePackage) -> Vec<String> {
    let mut numbered: Vec<(u32, String)> = package
        .part_names()
        .filter_map(|name| {
            let number = name.strip_prefix(SLIDE_PREFIX)?.strip_suffix(".xml")?;
            Some((number.parse().ok()?, name.to_string()))
        })
        .collect();
    numbered.sort_by_key(|(number, _)| *number);
    numbered.into_iter().map(|(_, name)| name).collect()
}

/// Paragraph texts of a text body joined with `\n`.
pub fn text_body_text(body: &Element) -> String {
    paragraphs(body)
        .map(|p| text::block_text(p, &DRAWING))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn paragraphs(body: &Element) -> impl Iterator<Item = &Element> {
    body.elements().filter(|el| el.name == "a:p")
}

pub fn paragraphs_mut(body: &mut Element) -> impl Iterator<Item = &mut Element> {
    body.elements_mut().filter(|el| el.name == "a:p")
}

fn shape_tree(slide: &Element) -> Option<&Element> {
    slide.find("p:cSld")?.find("p:spTree")
}

fn shape_tree_mut(slide: &mut Element) -> Option<&mut Element> {
    slide.find_mut("p:cSld")?.find_mut("p:spTree")
}

fn collect_shape_texts(tree: &Element, texts: &mut Vec<String>) {
    for shape in tree.elements() {
        match shape.name.as_str() {
            "p:sp" => {
                if let Some(body) = shape.find("p:txBody") {
                    texts.push(text_body_text(body));
                }
            }
            "p:grpSp" => collect_shape_texts(shape, texts),
            _ => {}
        }
    }
}

fn rewrite_shape_tree<F>(tree: &mut Element, rewrite: &mut F)
where
    F: FnMut(&mut Element),
{
    for shape in tree.elements_mut() {
        if shape.name == "p:grpSp" {
            rewrite_shape_tree(shape, rewrite);
        } else if shape.name == "p:sp" {
            if let Some(body) = shape.find_mut("p:txBody") {
                rewrite(body);
            }
        }
    }
}
