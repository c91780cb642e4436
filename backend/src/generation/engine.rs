//! Writes resolved values into a template.

use crate::content::PlaceholderValue;
use crate::documents::docx::{table_element, WordDocument};
use crate::documents::pptx::{self, SlideDeck};
use crate::documents::text::{self, DRAWING, WORD};
use crate::error::AppError;
use crate::generation::staging::StagedImage;
use common::model::place_holder::PlaceHolder;
use common::model::template::TemplateKind;
use indexmap::IndexMap;
use log::debug;

/// One value and every spelling of its token in the template.
struct Substitution<'a> {
    token: &'a str,
    spellings: Vec<&'a str>,
    value: &'a PlaceholderValue,
}

/// Tokens from `placeholders` with no entry in `values`, in discovery order.
pub fn missing_placeholders(
    placeholders: &[PlaceHolder],
    values: &IndexMap<String, PlaceholderValue>,
) -> Vec<String> {
    placeholders
        .iter()
        .filter(|ph| !values.contains_key(&ph.token))
        .map(|ph| ph.token.clone())
        .collect()
}

/// Fills `template` and returns the new document. Nothing is rewritten unless every
/// placeholder has a value.
pub fn fill(
    kind: TemplateKind,
    template: &[u8],
    placeholders: &[PlaceHolder],
    values: &IndexMap<String, PlaceholderValue>,
) -> Result<Vec<u8>, AppError> {
    let missing = missing_placeholders(placeholders, values);
    if !missing.is_empty() {
        return Err(AppError::MissingPlaceholders(missing));
    }

    let substitutions: Vec<Substitution<'_>> = values
        .iter()
        .map(|(token, value)| {
            let spellings = placeholders
                .iter()
                .find(|ph| ph.token == *token)
                .map(|ph| ph.spellings.iter().map(String::as_str).collect())
                .unwrap_or_else(|| vec![token.as_str()]);
            Substitution {
                token: token.as_str(),
                spellings,
                value,
            }
        })
        .collect();

    match kind {
        TemplateKind::WordDocument => fill_word(template, &substitutions),
        TemplateKind::SlideDeck => fill_slides(template, &substitutions),
    }
}

fn fill_word(template: &[u8], substitutions: &[Substitution<'_>]) -> Result<Vec<u8>, AppError> {
    let mut document = WordDocument::from_bytes(template)?;

    // Dropped (and deleted) on every exit path out of this function.
    let mut staged: IndexMap<&str, StagedImage> = IndexMap::new();
    for sub in substitutions {
        if let PlaceholderValue::Image(bytes) = sub.value {
            staged.insert(sub.token, StagedImage::stage(bytes)?);
        }
    }

    let mut replaced = 0;
    let mut inserted_blocks = 0;
    document.rewrite_paragraphs(|paragraph, sink| {
        let mut inserted = Vec::new();
        for sub in substitutions {
            let paragraph_text = text::collect_spans(paragraph, &WORD).concat();
            let present: Vec<&str> = sub
                .spellings
                .iter()
                .copied()
                .filter(|spelling| paragraph_text.contains(*spelling))
                .collect();
            if present.is_empty() {
                continue;
            }

            match sub.value {
                PlaceholderValue::Text(value) | PlaceholderValue::Extracted(value) => {
                    let value = text::sanitize_value(value);
                    for spelling in present {
                        replaced += text::replace_text(paragraph, &WORD, spelling, &value);
                    }
                }
                PlaceholderValue::Image(_) => {
                    for spelling in present {
                        replaced += text::replace_text(paragraph, &WORD, spelling, "");
                    }
                    if let Some(image) = staged.get(sub.token) {
                        inserted.push(sink.embed_png(image.png_bytes()?, image.width, image.height)?);
                    }
                }
                PlaceholderValue::Table(table) => {
                    for spelling in present {
                        replaced += text::replace_text(paragraph, &WORD, spelling, "");
                    }
                    inserted.push(table_element(&table.columns, &table.rows));
                }
            }
        }
        inserted_blocks += inserted.len();
        Ok(inserted)
    })?;

    debug!(
        "Word document: {} token occurrences replaced, {} blocks inserted, {} images staged",
        replaced,
        inserted_blocks,
        staged.len()
    );
    Ok(document.into_bytes()?)
}

fn fill_slides(template: &[u8], substitutions: &[Substitution<'_>]) -> Result<Vec<u8>, AppError> {
    let mut deck = SlideDeck::from_bytes(template)?;

    let rendered: Vec<(&[&str], String)> = substitutions
        .iter()
        .map(|sub| (sub.spellings.as_slice(), text::sanitize_value(&sub.value.to_string())))
        .collect();

    let mut replaced = 0;
    deck.rewrite_shapes(|body| {
        for (spellings, value) in &rendered {
            for spelling in spellings.iter() {
                for paragraph in pptx::paragraphs_mut(body) {
                    replaced += text::replace_text(paragraph, &DRAWING, spelling, value);
                }
            }
        }
    });

    debug!("Slide deck: {} token occurrences replaced", replaced);
    Ok(deck.into_bytes()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholders::extract::extract;

    #[test]
    fn missing_is_reported_in_discovery_order() {
        let placeholders = extract(&["{C} {A} {B}"]);
        let values = IndexMap::from([("{A}".to_string(), PlaceholderValue::Text("a".into()))]);
        assert_eq!(missing_placeholders(&placeholders, &values), vec!["{C}", "{B}"]);
    }

    #[test]
    fn incomplete_values_produce_no_output() {
        let placeholders = extract(&["{A}"]);
        let result = fill(TemplateKind::WordDocument, b"not even a zip", &placeholders, &IndexMap::new());
        assert!(matches!(result, Err(AppError::MissingPlaceholders(m)) if m == vec!["{A}"]));
    }
}
