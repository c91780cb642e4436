//! Reading and rewriting the text of a paragraph or shape without losing run formatting.
//!
//! Word and PowerPoint split visible text into runs, and a single `{TOKEN}` is often
//! spread across several of them. Text is handled as an ordered list of *spans*, one
//! per text element (`w:t` / `a:t`). A replacement that crosses spans writes the value
//! into the first span and trims the matched pieces out of the following ones, so each
//! run keeps its own properties.

use crate::documents::xml::{Element, Node};

/// Element names for one flavour of Office text markup.
pub struct TextMarkup {
    pub text: &'static str,
    pub run: &'static str,
    pub run_properties: &'static str,
    pub line_break: &'static str,
    /// Word puts `w:br` inside the run; DrawingML puts `a:br` between runs.
    pub break_inside_run: bool,
    /// Subtrees whose text belongs to some other block (text boxes, embedded objects)
    /// or that carry no visible text (paragraph properties and their tab stops).
    pub opaque: &'static [&'static str],
    /// Empty elements rendered as characters when a block is read as plain text.
    pub separators: &'static [(&'static str, &'static str)],
}

pub const WORD: TextMarkup = TextMarkup {
    text: "w:t",
    run: "w:r",
    run_properties: "w:rPr",
    line_break: "w:br",
    break_inside_run: true,
    opaque: &["w:pPr", "w:drawing", "w:pict", "w:object", "mc:AlternateContent"],
    separators: &[("w:br", "\n"), ("w:cr", "\n"), ("w:tab", "\t")],
};

pub const DRAWING: TextMarkup = TextMarkup {
    text: "a:t",
    run: "a:r",
    run_properties: "a:rPr",
    line_break: "a:br",
    break_inside_run: false,
    opaque: &["a:pPr"],
    separators: &[("a:br", "\u{b}")],
};

fn for_each_text<'a>(el: &'a Element, markup: &TextMarkup, visit: &mut dyn FnMut(&'a Element)) {
    for child in el.elements() {
        if markup.opaque.contains(&child.name.as_str()) {
            continue;
        }
        if child.name == markup.text {
            visit(child);
        } else {
            for_each_text(child, markup, visit);
        }
    }
}

fn for_each_text_mut(el: &mut Element, markup: &TextMarkup, visit: &mut dyn FnMut(&mut Element)) {
    for child in el.elements_mut() {
        if markup.opaque.contains(&child.name.as_str()) {
            continue;
        }
        if child.name == markup.text {
            visit(child);
        } else {
            for_each_text_mut(child, markup, visit);
        }
    }
}

/// The text spans of `el`, in document order.
pub fn collect_spans(el: &Element, markup: &TextMarkup) -> Vec<String> {
    let mut spans = Vec::new();
    for_each_text(el, markup, &mut |t| spans.push(t.own_text()));
    spans
}

/// Plain text of a block: spans in order, with line breaks and tabs rendered as
/// characters. A DrawingML line break reads as a vertical tab.
pub fn block_text(el: &Element, markup: &TextMarkup) -> String {
    let mut out = String::new();
    push_block_text(el, markup, &mut out);
    out
}

fn push_block_text(el: &Element, markup: &TextMarkup, out: &mut String) {
    for child in el.elements() {
        let name = child.name.as_str();
        if markup.opaque.contains(&name) {
            continue;
        }
        if name == markup.text {
            out.push_str(&child.own_text());
        } else if let Some((_, rendered)) = markup.separators.iter().find(|(tag, _)| *tag == name) {
            out.push_str(rendered);
        } else {
            push_block_text(child, markup, out);
        }
    }
}

/// Writes `spans` back into the text elements they were collected from.
fn apply_spans(el: &mut Element, markup: &TextMarkup, spans: Vec<String>) {
    let mut spans = spans.into_iter();
    let preserve = markup.break_inside_run;
    for_each_text_mut(el, markup, &mut |t| {
        let text = spans.next().unwrap_or_default();
        if preserve {
            t.set_attribute("xml:space", "preserve");
        }
        if text.is_empty() {
            t.children.clear();
        } else {
            t.set_text(text);
        }
    });
}

/// Replaces every occurrence of `needle` across `spans`. Returns the number of matches.
pub fn replace_in_spans(spans: &mut [String], needle: &str, value: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    let joined = spans.concat();
    let matches: Vec<usize> = joined.match_indices(needle).map(|(at, _)| at).collect();
    if matches.is_empty() {
        return 0;
    }

    let mut starts = Vec::with_capacity(spans.len());
    let mut offset = 0;
    for span in spans.iter() {
        starts.push(offset);
        offset += span.len();
    }
    let lens: Vec<usize> = spans.iter().map(String::len).collect();
    let locate = |pos: usize| (0..lens.len()).find(|&i| starts[i] <= pos && pos < starts[i] + lens[i]);

    // Last match first: earlier offsets stay valid.
    for &start in matches.iter().rev() {
        let end = start + needle.len();
        let (Some(first), Some(last)) = (locate(start), locate(end - 1)) else {
            continue;
        };
        let from = start - starts[first];
        let to = end - starts[last];
        if first == last {
            spans[first].replace_range(from..to, value);
        } else {
            spans[first].replace_range(from.., value);
            for span in &mut spans[first + 1..last] {
                span.clear();
            }
            spans[last].replace_range(..to, "");
        }
    }
    matches.len()
}

/// Replaces `needle` with `value` inside `block`, keeping run formatting. Newlines in
/// `value` become line breaks. Returns the number of replacements.
pub fn replace_text(block: &mut Element, markup: &TextMarkup, needle: &str, value: &str) -> usize {
    let mut spans = collect_spans(block, markup);
    let count = replace_in_spans(&mut spans, needle, value);
    if count > 0 {
        apply_spans(block, markup, spans);
        if value.contains('\n') {
            expand_line_breaks(block, markup);
        }
    }
    count
}

/// Normalizes a substitution value for XML text: CRLF, CR and vertical tab to LF,
/// XML-illegal control characters dropped.
pub fn sanitize_value(value: &str) -> String {
    value
        .replace("\r\n", "\n")
        .replace(['\r', '\u{b}'], "\n")
        .chars()
        .filter(|&c| c == '\t' || c == '\n' || c >= ' ')
        .collect()
}

fn expand_line_breaks(el: &mut Element, markup: &TextMarkup) {
    if markup.opaque.contains(&el.name.as_str()) {
        return;
    }
    let splits_here = if markup.break_inside_run {
        el.name == markup.run
    } else {
        el.find(markup.run).is_some()
    };
    if splits_here {
        let children = std::mem::take(&mut el.children);
        for child in children {
            match child {
                Node::Element(t) if markup.break_inside_run && t.name == markup.text => {
                    el.children.extend(split_text_element(t, markup));
                }
                Node::Element(run) if !markup.break_inside_run && run.name == markup.run => {
                    el.children.extend(split_run(run, markup));
                }
                other => el.children.push(other),
            }
        }
    }
    for child in el.elements_mut() {
        expand_line_breaks(child, markup);
    }
}

/// `w:t` with newlines -> `w:t`, `w:br`, `w:t`...
fn split_text_element(t: Element, markup: &TextMarkup) -> Vec<Node> {
    let text = t.own_text();
    if !text.contains('\n') {
        return vec![Node::Element(t)];
    }
    let mut nodes = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            nodes.push(Node::Element(Element::new(markup.line_break)));
        }
        let mut piece = t.clone();
        piece.set_text(line);
        nodes.push(Node::Element(piece));
    }
    nodes
}

/// `a:r` with newlines -> `a:r`, `a:br`, `a:r`... with the run properties copied onto
/// each piece and onto the break.
fn split_run(run: Element, markup: &TextMarkup) -> Vec<Node> {
    let text = run.find(markup.text).map(Element::own_text).unwrap_or_default();
    if !text.contains('\n') {
        return vec![Node::Element(run)];
    }
    let properties = run.find(markup.run_properties).cloned();
    let mut nodes = Vec::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            let mut br = Element::new(markup.line_break);
            if let Some(props) = &properties {
                br.children.push(Node::Element(props.clone()));
            }
            nodes.push(Node::Element(br));
        }
        let mut piece = run.clone();
        if let Some(t) = piece.find_mut(markup.text) {
            t.set_text(line);
        }
        nodes.push(Node::Element(piece));
    }
    nodes
}
