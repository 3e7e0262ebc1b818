//! In-memory fixture PDFs with bookmarks.

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use std::path::{Path, PathBuf};

pub struct Bookmark {
    pub title: Option<String>,
    pub page: u32,
    pub children: Vec<Bookmark>,
}

impl Bookmark {
    pub fn new(title: &str, page: u32) -> Self {
        Bookmark {
            title: Some(title.to_string()),
            page,
            children: Vec::new(),
        }
    }

    pub fn untitled(page: u32) -> Self {
        Bookmark {
            title: None,
            page,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Bookmark>) -> Self {
        self.children = children;
        self
    }
}

/// Build a document with `page_count` blank pages and the given bookmarks.
/// Bookmark pages are zero-based.
pub fn build_document(page_count: u32, bookmarks: &[Bookmark]) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let page_ids: Vec<ObjectId> = (0..page_count)
        .map(|_| {
            let page = Dictionary::from_iter(vec![
                ("Type", Object::Name(b"Page".to_vec())),
                ("Parent", Object::Reference(pages_id)),
                (
                    "MediaBox",
                    Object::Array(vec![
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(612),
                        Object::Integer(792),
                    ]),
                ),
            ]);
            doc.add_object(page)
        })
        .collect();

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(page_count as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);

    if !bookmarks.is_empty() {
        let outlines_id = doc.new_object_id();
        let mut outlines = Dictionary::new();
        outlines.set("Type", Object::Name(b"Outlines".to_vec()));
        if let Some((first, last)) = add_outline_level(&mut doc, outlines_id, bookmarks, &page_ids)
        {
            outlines.set("First", Object::Reference(first));
            outlines.set("Last", Object::Reference(last));
            outlines.set("Count", Object::Integer(bookmarks.len() as i64));
        }
        doc.objects
            .insert(outlines_id, Object::Dictionary(outlines));
        catalog.set("Outlines", Object::Reference(outlines_id));
    }

    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

fn add_outline_level(
    doc: &mut Document,
    parent: ObjectId,
    items: &[Bookmark],
    page_ids: &[ObjectId],
) -> Option<(ObjectId, ObjectId)> {
    let ids: Vec<ObjectId> = items.iter().map(|_| doc.new_object_id()).collect();

    for (i, item) in items.iter().enumerate() {
        let mut dict = Dictionary::new();
        if let Some(title) = &item.title {
            dict.set("Title", Object::String(utf16_be(title), StringFormat::Hexadecimal));
        }
        dict.set("Parent", Object::Reference(parent));
        dict.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(page_ids[item.page as usize]),
                Object::Name(b"Fit".to_vec()),
            ]),
        );
        if i > 0 {
            dict.set("Prev", Object::Reference(ids[i - 1]));
        }
        if i + 1 < ids.len() {
            dict.set("Next", Object::Reference(ids[i + 1]));
        }
        if let Some((first, last)) = add_outline_level(doc, ids[i], &item.children, page_ids) {
            dict.set("First", Object::Reference(first));
            dict.set("Last", Object::Reference(last));
            dict.set("Count", Object::Integer(item.children.len() as i64));
        }
        doc.objects.insert(ids[i], Object::Dictionary(dict));
    }

    Some((*ids.first()?, *ids.last()?))
}

fn utf16_be(s: &str) -> Vec<u8> {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in s.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    bytes
}

/// Save a fixture into `dir` and return its path.
pub fn write_document(dir: &Path, name: &str, page_count: u32, bookmarks: &[Bookmark]) -> PathBuf {
    let path = dir.join(name);
    let mut doc = build_document(page_count, bookmarks);
    doc.save(&path).unwrap();
    path
}

/// Object ids of the top-level bookmarks, in sibling order.
pub fn outline_item_ids(doc: &Document) -> Vec<ObjectId> {
    let outlines = doc
        .catalog()
        .unwrap()
        .get(b"Outlines")
        .and_then(Object::as_reference)
        .unwrap();
    let mut next = doc
        .get_dictionary(outlines)
        .unwrap()
        .get(b"First")
        .and_then(Object::as_reference)
        .ok();

    let mut ids = Vec::new();
    while let Some(id) = next {
        ids.push(id);
        next = doc
            .get_dictionary(id)
            .unwrap()
            .get(b"Next")
            .and_then(Object::as_reference)
            .ok();
    }
    ids
}

/// Object id of the zero-based `page`.
pub fn page_id(doc: &Document, page: u32) -> ObjectId {
    doc.get_pages()[&(page + 1)]
}

pub fn set_catalog_entry(doc: &mut Document, key: &str, value: Object) {
    let root = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .unwrap();
    doc.get_dictionary_mut(root).unwrap().set(key, value);
}
