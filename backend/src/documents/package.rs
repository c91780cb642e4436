//! Zip-level access to Office Open XML packages.

use crate::documents::xml::{Element, Node, XmlDocument};
use crate::documents::DocumentError;
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Upper bound on the total unpacked size of a package.
pub const MAX_UNPACKED_BYTES: u64 = 256 * 1024 * 1024;

const RELATIONSHIPS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

struct PackageEntry {
    name: String,
    data: Vec<u8>,
    compression: CompressionMethod,
}

/// An Office package held in memory, entry order preserved.
pub struct OfficePackage {
    entries: Vec<PackageEntry>,
}

impl OfficePackage {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DocumentError> {
        Self::from_bytes_with_limit(bytes, MAX_UNPACKED_BYTES)
    }

    /// Reads a package whose entries unpack to at most `limit` bytes in total. Sizes
    /// declared in the zip directory are not trusted.
    pub fn from_bytes_with_limit(bytes: &[u8], limit: u64) -> Result<Self, DocumentError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut entries = Vec::with_capacity(archive.len());
        let mut remaining = limit;
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::new();
            (&mut file).take(remaining + 1).read_to_end(&mut data)?;
            if data.len() as u64 > remaining {
                return Err(DocumentError::TooLarge(limit));
            }
            remaining -= data.len() as u64;
            entries.push(PackageEntry {
                name: file.name().to_string(),
                compression: file.compression(),
                data,
            });
        }
        Ok(Self { entries })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.data.as_slice())
    }

    /// Inserts a new part or replaces the content of an existing one.
    pub fn put_part(&mut self, name: &str, data: Vec<u8>) {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => entry.data = data,
            None => self.entries.push(PackageEntry {
                name: name.to_string(),
                data,
                compression: CompressionMethod::Deflated,
            }),
        }
    }

    pub fn read_xml(&self, name: &str) -> Result<XmlDocument, DocumentError> {
        let data = self
            .part(name)
            .ok_or_else(|| DocumentError::MissingPart(name.to_string()))?;
        XmlDocument::parse(&String::from_utf8_lossy(data))
    }

    pub fn write_xml(&mut self, name: &str, doc: &XmlDocument) {
        self.put_part(name, doc.to_xml().into_bytes());
    }

    /// Ensures `[Content_Types].xml` declares a default for `extension`.
    pub fn ensure_default_content_type(
        &mut self,
        extension: &str,
        content_type: &str,
    ) -> Result<(), DocumentError> {
        let mut types = self.read_xml(CONTENT_TYPES_PART)?;
        let present = types.root.elements().any(|el| {
            el.local_name() == "Default"
                && el
                    .attribute("Extension")
                    .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        });
        if !present {
            types.root.children.insert(
                0,
                Node::Element(
                    Element::new("Default")
                        .attr("Extension", extension)
                        .attr("ContentType", content_type),
                ),
            );
            self.write_xml(CONTENT_TYPES_PART, &types);
        }
        Ok(())
    }

    /// Content type override registered for `part_name` (with leading `/`).
    pub fn override_content_type(&self, part_name: &str) -> Result<Option<String>, DocumentError> {
        let types = self.read_xml(CONTENT_TYPES_PART)?;
        let content_type = types
            .root
            .elements()
            .find(|el| el.local_name() == "Override" && el.attribute("PartName") == Some(part_name))
            .and_then(|el| el.attribute("ContentType"))
            .map(str::to_string);
        Ok(content_type)
    }

    /// Sets (or adds) the content type override for `part_name`.
    pub fn set_override_content_type(
        &mut self,
        part_name: &str,
        content_type: &str,
    ) -> Result<(), DocumentError> {
        let mut types = self.read_xml(CONTENT_TYPES_PART)?;
        let existing = types.root.children.iter().position(|node| {
            matches!(node, Node::Element(el)
                if el.local_name() == "Override" && el.attribute("PartName") == Some(part_name))
        });
        match existing {
            Some(index) => {
                if let Node::Element(el) = &mut types.root.children[index] {
                    el.set_attribute("ContentType", content_type);
                }
            }
            None => types.root.children.push(Node::Element(
                Element::new("Override")
                    .attr("PartName", part_name)
                    .attr("ContentType", content_type),
            )),
        }
        self.write_xml(CONTENT_TYPES_PART, &types);
        Ok(())
    }

    /// Adds a relationship to `rels_part` (created if missing) and returns its id.
    pub fn add_relationship(
        &mut self,
        rels_part: &str,
        rel_type: &str,
        target: &str,
    ) -> Result<String, DocumentError> {
        let mut rels = if self.contains(rels_part) {
            self.read_xml(rels_part)?
        } else {
            XmlDocument {
                has_declaration: true,
                root: Element::new("Relationships").attr("xmlns", RELATIONSHIPS_NS),
            }
        };

        let next = rels
            .root
            .elements()
            .filter_map(|el| el.attribute("Id"))
            .filter_map(|id| id.strip_prefix("rId"))
            .filter_map(|n| n.parse::<u32>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let id = format!("rId{next}");
        rels.root.children.push(Node::Element(
            Element::new("Relationship")
                .attr("Id", id.as_str())
                .attr("Type", rel_type)
                .attr("Target", target),
        ));
        self.write_xml(rels_part, &rels);
        Ok(id)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for entry in &self.entries {
            let method = match entry.compression {
                CompressionMethod::Stored => CompressionMethod::Stored,
                _ => CompressionMethod::Deflated,
            };
            let options = SimpleFileOptions::default().compression_method(method);
            writer.start_file(entry.name.as_str(), options)?;
            writer.write_all(&entry.data)?;
        }
        Ok(writer.finish()?.into_inner())
    }
}

/// Part name a relationship target points at, resolved against the part owning the
/// relationship.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = source_part.split('/').collect();
    segments.pop();
    for segment in target.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            other => segments.push(other),
        }
    }
    segments.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT_TYPES_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

    fn empty_content_types() -> XmlDocument {
        XmlDocument {
            has_declaration: true,
            root: Element::new("Types").attr("xmlns", CONTENT_TYPES_NS),
        }
    }

    fn package_with_types() -> OfficePackage {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(CONTENT_TYPES_PART, SimpleFileOptions::default())
            .unwrap();
        writer
            .write_all(empty_content_types().to_xml().as_bytes())
            .unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        OfficePackage::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn relationship_ids_continue_from_highest() {
        let mut pkg = package_with_types();
        let first = pkg.add_relationship("word/_rels/document.xml.rels", "t", "a.png").unwrap();
        let second = pkg.add_relationship("word/_rels/document.xml.rels", "t", "b.png").unwrap();
        assert_eq!(first, "rId1");
        assert_eq!(second, "rId2");
    }

    #[test]
    fn default_content_type_is_added_once() {
        let mut pkg = package_with_types();
        pkg.ensure_default_content_type("png", "image/png").unwrap();
        pkg.ensure_default_content_type("PNG", "image/png").unwrap();
        let types = pkg.read_xml(CONTENT_TYPES_PART).unwrap();
        assert_eq!(types.root.elements().count(), 1);
    }

    #[test]
    fn round_trip_through_bytes_keeps_parts() {
        let mut pkg = package_with_types();
        pkg.put_part("word/media/a.bin", vec![1, 2, 3]);
        let reread = OfficePackage::from_bytes(&pkg.to_bytes().unwrap()).unwrap();
        assert_eq!(reread.part("word/media/a.bin"), Some(&[1u8, 2, 3][..]));
        assert!(reread.contains(CONTENT_TYPES_PART));
    }

    #[test]
    fn missing_part_is_an_error() {
        let pkg = package_with_types();
        assert!(matches!(
            pkg.read_xml("word/document.xml"),
            Err(DocumentError::MissingPart(_))
        ));
    }

    #[test]
    fn override_content_type_is_replaced_in_place() {
        let mut pkg = package_with_types();
        assert_eq!(pkg.override_content_type("/word/document.xml").unwrap(), None);
        pkg.set_override_content_type("/word/document.xml", "template").unwrap();
        pkg.set_override_content_type("/word/document.xml", "document").unwrap();
        assert_eq!(
            pkg.override_content_type("/word/document.xml").unwrap().as_deref(),
            Some("document")
        );
        let types = pkg.read_xml(CONTENT_TYPES_PART).unwrap();
        assert_eq!(types.root.elements().count(), 1);
    }

    fn package_with_part(name: &str, data: &[u8]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        writer.start_file(name, options).unwrap();
        writer.write_all(data).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn unpacked_size_over_the_limit_is_rejected() {
        let bytes = package_with_part("word/document.xml", &[b'x'; 64]);
        assert!(OfficePackage::from_bytes_with_limit(&bytes, 64).is_ok());
        assert!(matches!(
            OfficePackage::from_bytes_with_limit(&bytes, 63),
            Err(DocumentError::TooLarge(63))
        ));
    }

    #[test]
    fn declared_entry_size_is_not_trusted() {
        let mut bytes = package_with_part("word/document.xml", b"<w:document/>");
        let central = bytes
            .windows(4)
            .position(|w| w == b"PK\x01\x02")
            .unwrap();
        bytes[central + 24..central + 28].copy_from_slice(&0xFFFF_FFF0u32.to_le_bytes());
        // Either outcome is fine as long as nothing is sized from the claim.
        if let Ok(pkg) = OfficePackage::from_bytes(&bytes) {
            assert!(pkg.part("word/document.xml").map_or(0, <[u8]>::len) <= 13);
        }
    }

    #[test]
    fn relationship_targets_resolve_against_the_source_part() {
        assert_eq!(
            resolve_target("ppt/presentation.xml", "slides/slide2.xml"),
            "ppt/slides/slide2.xml"
        );
        assert_eq!(
            resolve_target("ppt/slides/slide1.xml", "../media/image1.png"),
            "ppt/media/image1.png"
        );
        assert_eq!(resolve_target("ppt/presentation.xml", "/ppt/slides/slide9.xml"), "ppt/slides/slide9.xml");
    }
}
