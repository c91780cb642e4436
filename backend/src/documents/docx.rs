//! Word templates (`.dotx` / `.docx`).

use crate::documents::package::OfficePackage;
use crate::documents::text::{self, WORD};
use crate::documents::xml::{Element, Node, XmlDocument};
use crate::documents::DocumentError;

pub const DOCUMENT_PART: &str = "word/document.xml";
const DOCUMENT_RELS_PART: &str = "word/_rels/document.xml.rels";
const IMAGE_RELATIONSHIP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const DOCUMENT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const TEMPLATE_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.template.main+xml";

const NS_WP: &str = "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const EMU_PER_INCH: u64 = 914_400;
/// Embedded pictures are 4 inches wide.
pub const PICTURE_WIDTH_EMU: u64 = 4 * EMU_PER_INCH;
/// 6.5 inches in twentieths of a point, the usable width of a Letter page.
const TABLE_WIDTH_TWIPS: u32 = 9_360;

pub struct WordDocument {
    package: OfficePackage,
    document: XmlDocument,
    next_drawing_id: u32,
}

/// Registers pictures in the package while the body is being rewritten.
pub struct MediaSink<'a> {
    package: &'a mut OfficePackage,
    next_drawing_id: &'a mut u32,
}

impl WordDocument {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        let package = OfficePackage::from_bytes(bytes)?;
        let document = package.read_xml(DOCUMENT_PART)?;

        let mut max_id = 0;
        document.root.walk(&mut |el| {
            if el.local_name() == "docPr" {
                if let Some(id) = el.attribute("id").and_then(|v| v.parse::<u32>().ok()) {
                    max_id = max_id.max(id);
                }
            }
        });

        Ok(Self {
            package,
            document,
            next_drawing_id: max_id + 1,
        })
    }

    fn body(&self) -> Result<&Element, DocumentError> {
        self.document
            .root
            .find("w:body")
            .ok_or_else(|| DocumentError::Malformed("document has no w:body".into()))
    }

    /// Text of every body paragraph, including paragraphs inside body tables, in
    /// document order.
    pub fn paragraph_texts(&self) -> Vec<String> {
        let mut texts = Vec::new();
        if let Ok(body) = self.body() {
            collect_paragraph_texts(body, &mut texts);
        }
        texts
    }

    /// Calls `rewrite` for every paragraph (same order as [`paragraph_texts`]). The
    /// blocks it returns are inserted right after that paragraph.
    ///
    /// [`paragraph_texts`]: WordDocument::paragraph_texts
    pub fn rewrite_paragraphs<F>(&mut self, mut rewrite: F) -> Result<(), DocumentError>
    where
        F: FnMut(&mut Element, &mut MediaSink<'_>) -> Result<Vec<Element>, DocumentError>,
    {
        let Self {
            package,
            document,
            next_drawing_id,
        } = self;
        let body = document
            .root
            .find_mut("w:body")
            .ok_or_else(|| DocumentError::Malformed("document has no w:body".into()))?;
        let mut sink = MediaSink {
            package,
            next_drawing_id,
        };
        rewrite_container(body, &mut sink, &mut rewrite)
    }

    /// Serializes the document. Word templates come out as regular documents.
    pub fn into_bytes(mut self) -> Result<Vec<u8>, DocumentError> {
        self.package.write_xml(DOCUMENT_PART, &self.document);
        let part_name = format!("/{DOCUMENT_PART}");
        if self.package.override_content_type(&part_name)?.as_deref() == Some(TEMPLATE_CONTENT_TYPE) {
            self.package
                .set_override_content_type(&part_name, DOCUMENT_CONTENT_TYPE)?;
        }
        self.package.to_bytes()
    }
}

fn collect_paragraph_texts(container: &Element, texts: &mut Vec<String>) {
    for child in container.elements() {
        match child.name.as_str() {
            "w:p" => texts.push(text::block_text(child, &WORD)),
            "w:tbl" => {
                for cell in table_cells(child) {
                    collect_paragraph_texts(cell, texts);
                }
            }
            _ => {}
        }
    }
}

fn table_cells(table: &Element) -> impl Iterator<Item = &Element> {
    table
        .elements()
        .filter(|row| row.name == "w:tr")
        .flat_map(|row| row.elements().filter(|cell| cell.name == "w:tc"))
}

fn rewrite_container<F>(
    container: &mut Element,
    sink: &mut MediaSink<'_>,
    rewrite: &mut F,
) -> Result<(), DocumentError>
where
    F: FnMut(&mut Element, &mut MediaSink<'_>) -> Result<Vec<Element>, DocumentError>,
{
    let children = std::mem::take(&mut container.children);
    for child in children {
        match child {
            Node::Element(mut paragraph) if paragraph.name == "w:p" => {
                let inserted = rewrite(&mut paragraph, &mut *sink)?;
                container.children.push(Node::Element(paragraph));
                container
                    .children
                    .extend(inserted.into_iter().map(Node::Element));
            }
            Node::Element(mut table) if table.name == "w:tbl" => {
                for row in table.elements_mut().filter(|row| row.name == "w:tr") {
                    for cell in row.elements_mut().filter(|cell| cell.name == "w:tc") {
                        rewrite_container(cell, sink, rewrite)?;
                    }
                }
                container.children.push(Node::Element(table));
            }
            other => container.children.push(other),
        }
    }

    // A table cell must end with a paragraph.
    if container.name == "w:tc"
        && container.elements().last().map(|el| el.name.as_str()) != Some("w:p")
    {
        container.children.push(Node::Element(Element::new("w:p")));
    }
    Ok(())
}

impl MediaSink<'_> {
    /// Adds `png` as a media part and returns a paragraph showing it at
    /// [`PICTURE_WIDTH_EMU`] wide, height following the pixel aspect ratio.
    pub fn embed_png(&mut self, png: Vec<u8>, width_px: u32, height_px: u32) -> Result<Element, DocumentError> {
        let media_name = (1..)
            .map(|n| format!("docfactory_image{n}.png"))
            .find(|name| !self.package.contains(&format!("word/media/{name}")))
            .unwrap_or_else(|| "docfactory_image.png".to_string());
        self.package.put_part(&format!("word/media/{media_name}"), png);
        self.package.ensure_default_content_type("png", "image/png")?;
        let rel_id = self.package.add_relationship(
            DOCUMENT_RELS_PART,
            IMAGE_RELATIONSHIP,
            &format!("media/{media_name}"),
        )?;

        let drawing_id = *self.next_drawing_id;
        *self.next_drawing_id += 1;

        let cx = PICTURE_WIDTH_EMU;
        let cy = if width_px == 0 {
            cx
        } else {
            cx * u64::from(height_px) / u64::from(width_px)
        };
        Ok(picture_paragraph(&rel_id, drawing_id, &media_name, cx, cy))
    }
}

fn picture_paragraph(rel_id: &str, drawing_id: u32, name: &str, cx: u64, cy: u64) -> Element {
    let (cx, cy) = (cx.to_string(), cy.to_string());
    let picture = Element::new("pic:pic")
        .attr("xmlns:pic", NS_PIC)
        .child(
            Element::new("pic:nvPicPr")
                .child(Element::new("pic:cNvPr").attr("id", "0").attr("name", name))
                .child(Element::new("pic:cNvPicPr")),
        )
        .child(
            Element::new("pic:blipFill")
                .child(Element::new("a:blip").attr("xmlns:r", NS_R).attr("r:embed", rel_id))
                .child(Element::new("a:stretch").child(Element::new("a:fillRect"))),
        )
        .child(
            Element::new("pic:spPr")
                .child(
                    Element::new("a:xfrm")
                        .child(Element::new("a:off").attr("x", "0").attr("y", "0"))
                        .child(Element::new("a:ext").attr("cx", cx.as_str()).attr("cy", cy.as_str())),
                )
                .child(
                    Element::new("a:prstGeom")
                        .attr("prst", "rect")
                        .child(Element::new("a:avLst")),
                ),
        );

    let inline = Element::new("wp:inline")
        .attr("xmlns:wp", NS_WP)
        .attr("distT", "0")
        .attr("distB", "0")
        .attr("distL", "0")
        .attr("distR", "0")
        .child(Element::new("wp:extent").attr("cx", cx.as_str()).attr("cy", cy.as_str()))
        .child(
            Element::new("wp:docPr")
                .attr("id", drawing_id.to_string())
                .attr("name", format!("Picture {drawing_id}")),
        )
        .child(
            Element::new("wp:cNvGraphicFramePr").child(
                Element::new("a:graphicFrameLocks")
                    .attr("xmlns:a", NS_A)
                    .attr("noChangeAspect", "1"),
            ),
        )
        .child(
            Element::new("a:graphic").attr("xmlns:a", NS_A).child(
                Element::new("a:graphicData")
                    .attr("uri", NS_PIC)
                    .child(picture),
            ),
        );

    Element::new("w:p").child(Element::new("w:r").child(Element::new("w:drawing").child(inline)))
}

/// A bordered table: one header row from `columns`, then one row per entry of `rows`.
/// Rows are padded or cut to the column count.
pub fn table_element(columns: &[String], rows: &[Vec<String>]) -> Element {
    let column_count = columns.len().max(1);
    let cell_width = (TABLE_WIDTH_TWIPS / column_count as u32).to_string();

    let mut borders = Element::new("w:tblBorders");
    for edge in ["w:top", "w:left", "w:bottom", "w:right", "w:insideH", "w:insideV"] {
        borders = borders.child(
            Element::new(edge)
                .attr("w:val", "single")
                .attr("w:sz", "4")
                .attr("w:space", "0")
                .attr("w:color", "auto"),
        );
    }
    let properties = Element::new("w:tblPr")
        .child(Element::new("w:tblW").attr("w:w", "0").attr("w:type", "auto"))
        .child(borders);

    let mut grid = Element::new("w:tblGrid");
    for _ in 0..column_count {
        grid = grid.child(Element::new("w:gridCol").attr("w:w", cell_width.as_str()));
    }

    let mut table = Element::new("w:tbl").child(properties).child(grid);

    let mut header = Element::new("w:tr")
        .child(Element::new("w:trPr").child(Element::new("w:tblHeader")));
    for column in columns {
        header = header.child(table_cell(column, &cell_width, true));
    }
    table = table.child(header);

    for row in rows {
        let mut tr = Element::new("w:tr");
        for i in 0..columns.len() {
            let value = row.get(i).map(String::as_str).unwrap_or("");
            tr = tr.child(table_cell(value, &cell_width, false));
        }
        table = table.child(tr);
    }
    table
}

fn table_cell(value: &str, width: &str, bold: bool) -> Element {
    let mut paragraph = Element::new("w:p");
    let value = text::sanitize_value(value);
    if !value.is_empty() {
        let mut run = Element::new("w:r");
        if bold {
            run = run.child(Element::new("w:rPr").child(Element::new("w:b")));
        }
        for (i, line) in value.split('\n').enumerate() {
            if i > 0 {
                run = run.child(Element::new("w:br"));
            }
            run = run.child(Element::new("w:t").attr("xml:space", "preserve").text(line));
        }
        paragraph = paragraph.child(run);
    }
    Element::new("w:tc")
        .child(
            Element::new("w:tcPr")
                .child(Element::new("w:tcW").attr("w:w", width).attr("w:type", "dxa")),
        )
        .child(paragraph)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_header_plus_body_rows() {
        let columns = vec!["Service".to_string(), "Cost".to_string()];
        let rows = vec![
            vec!["EC2".to_string(), "10".to_string()],
            vec!["S3".to_string(), "2".to_string()],
            vec!["RDS".to_string()],
        ];
        let table = table_element(&columns, &rows);
        let trs: Vec<&Element> = table.elements().filter(|e| e.name == "w:tr").collect();
        assert_eq!(trs.len(), 4);
        assert!(trs
            .iter()
            .all(|tr| tr.elements().filter(|e| e.name == "w:tc").count() == 2));
        let grid = table.find("w:tblGrid").unwrap();
        assert_eq!(grid.elements().count(), 2);
    }

    #[test]
    fn picture_paragraph_references_relationship() {
        let p = picture_paragraph("rId9", 3, "img.png", PICTURE_WIDTH_EMU, 100);
        let mut blip = None;
        p.walk(&mut |el| {
            if el.name == "a:blip" {
                blip = el.attribute("r:embed").map(str::to_string);
            }
        });
        assert_eq!(blip.as_deref(), Some("rId9"));
    }
}
