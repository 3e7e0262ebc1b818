use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::{HashMap, HashSet};
use unicode_normalization::UnicodeNormalization;

/// A bookmark as it appears in the outline tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub title: Option<String>,
    /// Zero-based page the bookmark points at, if it could be resolved.
    pub page: Option<u32>,
    pub children: Vec<OutlineNode>,
}

/// A flattened outline item. `level` starts at 1 for top-level bookmarks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineEntry {
    pub name: String,
    pub page: u32,
    pub level: u32,
}

/// Read the bookmark tree from the document catalog.
pub fn read_outline(doc: &Document) -> Vec<OutlineNode> {
    let catalog = match doc.catalog() {
        Ok(c) => c,
        Err(_) => return Vec::new(),
    };

    let outlines = match catalog.get(b"Outlines") {
        Ok(Object::Reference(r)) => match doc.get_dictionary(*r) {
            Ok(d) => d,
            Err(_) => return Vec::new(),
        },
        Ok(Object::Dictionary(d)) => d,
        _ => return Vec::new(),
    };

    let first_ref = match outlines.get(b"First") {
        Ok(Object::Reference(r)) => *r,
        _ => return Vec::new(),
    };

    let page_map = build_page_map(doc);
    let mut visited = HashSet::new();
    parse_outline_items(doc, first_ref, &page_map, &mut visited)
}

fn parse_outline_items(
    doc: &Document,
    first_id: ObjectId,
    page_map: &HashMap<ObjectId, u32>,
    visited: &mut HashSet<ObjectId>,
) -> Vec<OutlineNode> {
    let mut nodes = Vec::new();
    let mut current_id = Some(first_id);

    while let Some(id) = current_id {
        if !visited.insert(id) {
            log::warn!("outline item {:?} is linked more than once, stopping", id);
            break;
        }

        let dict = match doc.get_dictionary(id) {
            Ok(d) => d,
            Err(_) => break,
        };

        let title = match dict.get(b"Title").map(|t| resolve(doc, t)) {
            Ok(Object::String(bytes, _)) => Some(decode_text_string(bytes)),
            _ => None,
        };

        let page = destination_page(doc, dict, page_map);

        let children = match dict.get(b"First") {
            Ok(Object::Reference(child_ref)) => {
                parse_outline_items(doc, *child_ref, page_map, visited)
            }
            _ => Vec::new(),
        };

        nodes.push(OutlineNode {
            title,
            page,
            children,
        });

        current_id = match dict.get(b"Next") {
            Ok(Object::Reference(r)) => Some(*r),
            _ => None,
        };
    }

    nodes
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(r) => doc.get_object(*r).unwrap_or(obj),
        _ => obj,
    }
}

fn destination_page(
    doc: &Document,
    dict: &Dictionary,
    page_map: &HashMap<ObjectId, u32>,
) -> Option<u32> {
    if let Ok(dest) = dict.get(b"Dest") {
        return resolve_destination(doc, dest, page_map, 0);
    }

    // GoTo action, either inline or referenced
    let action = match dict.get(b"A").map(|a| resolve(doc, a)) {
        Ok(Object::Dictionary(a)) => a,
        _ => return None,
    };
    match action.get(b"S") {
        Ok(Object::Name(kind)) if kind == b"GoTo" => {}
        _ => return None,
    }
    action
        .get(b"D")
        .ok()
        .and_then(|dest| resolve_destination(doc, dest, page_map, 0))
}

// Named destinations may point at other named destinations.
const MAX_DEST_HOPS: usize = 8;

fn resolve_destination(
    doc: &Document,
    dest: &Object,
    page_map: &HashMap<ObjectId, u32>,
    hops: usize,
) -> Option<u32> {
    if hops > MAX_DEST_HOPS {
        return None;
    }
    match dest {
        Object::String(name, _) | Object::Name(name) => {
            let target = lookup_named_destination(doc, name)?;
            resolve_destination(doc, target, page_map, hops + 1)
        }
        Object::Array(arr) => match arr.first() {
            Some(Object::Reference(page_ref)) => page_map.get(page_ref).copied(),
            _ => None,
        },
        Object::Dictionary(d) => d
            .get(b"D")
            .ok()
            .and_then(|inner| resolve_destination(doc, inner, page_map, hops + 1)),
        Object::Reference(r) => doc
            .get_object(*r)
            .ok()
            .and_then(|obj| resolve_destination(doc, obj, page_map, hops + 1)),
        _ => None,
    }
}

fn lookup_named_destination<'a>(doc: &'a Document, name: &[u8]) -> Option<&'a Object> {
    let catalog = doc.catalog().ok()?;

    if let Ok(Object::Dictionary(names)) = catalog.get(b"Names").map(|n| resolve(doc, n)) {
        if let Ok(Object::Reference(dests_ref)) = names.get(b"Dests") {
            let mut seen = HashSet::new();
            if let Some(found) = search_name_tree(doc, *dests_ref, name, &mut seen) {
                return Some(found);
            }
        }
    }

    // Pre-1.2 style /Dests dictionary
    match catalog.get(b"Dests").map(|d| resolve(doc, d)) {
        Ok(Object::Dictionary(dests)) => dests.get(name).ok(),
        _ => None,
    }
}

fn search_name_tree<'a>(
    doc: &'a Document,
    node_id: ObjectId,
    name: &[u8],
    seen: &mut HashSet<ObjectId>,
) -> Option<&'a Object> {
    if !seen.insert(node_id) {
        return None;
    }
    let dict = doc.get_dictionary(node_id).ok()?;

    if let Ok(Object::Array(names)) = dict.get(b"Names") {
        for pair in names.chunks(2) {
            if let [Object::String(key, _), value] = pair {
                if key.as_slice() == name {
                    return Some(value);
                }
            }
        }
    }

    if let Ok(Object::Array(kids)) = dict.get(b"Kids") {
        for kid in kids {
            if let Object::Reference(kid_ref) = kid {
                if let Some(found) = search_name_tree(doc, *kid_ref, name, seen) {
                    return Some(found);
                }
            }
        }
    }

    None
}

/// Page object id to zero-based page index.
fn build_page_map(doc: &Document) -> HashMap<ObjectId, u32> {
    doc.get_pages()
        .into_iter()
        .map(|(num, id)| (id, num - 1))
        .collect()
}

/// Decode a PDF text string (UTF-16BE or UTF-8 with BOM, else PDFDocEncoding).
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        String::from_utf8_lossy(utf8).into_owned()
    } else {
        bytes.iter().map(|&b| pdf_doc_char(b)).collect()
    }
}

// PDFDocEncoding 0x80..=0x9F. 0x9F is undefined.
const PDF_DOC_HIGH: [char; 32] = [
    '\u{2022}', '\u{2020}', '\u{2021}', '\u{2026}', '\u{2014}', '\u{2013}', '\u{0192}', '\u{2044}',
    '\u{2039}', '\u{203A}', '\u{2212}', '\u{2030}', '\u{201E}', '\u{201C}', '\u{201D}', '\u{2018}',
    '\u{2019}', '\u{201A}', '\u{2122}', '\u{FB01}', '\u{FB02}', '\u{0141}', '\u{0152}', '\u{0160}',
    '\u{0178}', '\u{017D}', '\u{0131}', '\u{0142}', '\u{0153}', '\u{0161}', '\u{017E}', '\u{FFFD}',
];

/// Map a PDFDocEncoding byte to a char. Outside 0x80..=0xA0 it matches Latin-1.
fn pdf_doc_char(b: u8) -> char {
    match b {
        0x80..=0x9F => PDF_DOC_HIGH[(b - 0x80) as usize],
        0xA0 => '\u{20AC}',
        0xAD => '\u{FFFD}',
        _ => b as char,
    }
}

/// Normalize a bookmark title for use as a section name.
pub fn normalize_title(title: &str) -> String {
    let decomposed: String = title
        .nfd()
        .map(|c| match c {
            '\r' | '\t' | '\n' => ' ',
            other => other,
        })
        .collect();
    decomposed.trim().to_string()
}

/// Flatten the outline tree into entries sorted by (page, level).
///
/// Untitled bookmarks and bookmarks without a resolvable page are left out,
/// but their children are still visited. Exact repeats are kept once.
pub fn flatten_outline(nodes: &[OutlineNode]) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    flatten_recursive(nodes, 1, &mut entries);
    entries.sort_by_key(|e| (e.page, e.level));
    entries
}

fn flatten_recursive(nodes: &[OutlineNode], level: u32, entries: &mut Vec<OutlineEntry>) {
    for node in nodes {
        if let Some(title) = &node.title {
            match node.page {
                Some(page) => {
                    let entry = OutlineEntry {
                        name: normalize_title(title),
                        page,
                        level,
                    };
                    if !entries.contains(&entry) {
                        entries.push(entry);
                    }
                }
                None => log::warn!("skipping bookmark {:?}: destination not found", title),
            }
        }
        flatten_recursive(&node.children, level + 1, entries);
    }
}
