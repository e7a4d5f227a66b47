//! Post-processing of rendered PDFs with `lopdf`: document info and page outlines.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

/// Errors that can occur while rewriting a rendered PDF document.
#[derive(Debug, thiserror::Error)]
pub enum OutlineError {
    /// The PDF bytes could not be parsed or re-serialized by `lopdf`.
    #[error("failed to process PDF bytes: {0}")]
    Parse(#[from] lopdf::Error),
    /// The trailer has no usable `/Root` catalog entry.
    #[error("PDF catalog entry is missing")]
    MissingCatalog,
    /// The catalog object was not a dictionary, preventing outline injection.
    #[error("PDF catalog entry is not a dictionary")]
    InvalidCatalog,
    /// A bookmark refers to a page the document does not have.
    #[error("bookmark '{title}' refers to missing page {page_number}")]
    MissingPage { title: String, page_number: usize },
}

impl From<std::io::Error> for OutlineError {
    fn from(err: std::io::Error) -> Self {
        Self::Parse(err.into())
    }
}

/// Document-level metadata written into the `/Info` dictionary.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DocumentInfo {
    pub title: String,
    pub author: Option<String>,
}

impl DocumentInfo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: None,
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }
}

/// An outline entry pointing at a (1-indexed) page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageBookmark {
    pub page_number: usize,
    pub title: String,
}

impl PageBookmark {
    pub fn new(page_number: usize, title: impl Into<String>) -> Self {
        Self {
            page_number,
            title: title.into(),
        }
    }
}

/// Returns the number of pages in the given PDF.
pub fn page_count(pdf_bytes: &[u8]) -> Result<usize, OutlineError> {
    Ok(Document::load_mem(pdf_bytes)?.get_pages().len())
}

/// Writes the title and author into the document's `/Info` dictionary.
pub fn apply_document_info(pdf_bytes: &[u8], info: &DocumentInfo) -> Result<Vec<u8>, OutlineError> {
    let mut document = Document::load_mem(pdf_bytes)?;

    let existing = document
        .trailer
        .get(b"Info")
        .ok()
        .and_then(|object| object.as_reference().ok());
    let info_id = match existing {
        Some(id) if document.objects.contains_key(&id) => id,
        _ => {
            let id = document.add_object(Dictionary::new());
            document.trailer.set("Info", Object::Reference(id));
            id
        }
    };

    let dictionary = document
        .objects
        .get_mut(&info_id)
        .and_then(|object| object.as_dict_mut().ok())
        .ok_or(OutlineError::InvalidCatalog)?;
    dictionary.set("Title", Object::string_literal(info.title.as_str()));
    if let Some(author) = &info.author {
        dictionary.set("Author", Object::string_literal(author.as_str()));
    }

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Reads the title and author back from the `/Info` dictionary.
pub fn read_document_info(pdf_bytes: &[u8]) -> Result<DocumentInfo, OutlineError> {
    let document = Document::load_mem(pdf_bytes)?;
    let info = document
        .trailer
        .get(b"Info")
        .and_then(Object::as_reference)
        .and_then(|id| document.get_dictionary(id));
    let Ok(info) = info else {
        return Ok(DocumentInfo::default());
    };

    let text = |key: &[u8]| {
        info.get(key)
            .and_then(Object::as_str)
            .ok()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    };
    Ok(DocumentInfo {
        title: text(b"Title").unwrap_or_default(),
        author: text(b"Author"),
    })
}

/// Applies a flat outline tree with one entry per bookmark.
///
/// Each entry gets a `/Dest [page /Fit]` destination targeting its page.
pub fn apply_page_bookmarks(
    pdf_bytes: &[u8],
    bookmarks: &[PageBookmark],
) -> Result<Vec<u8>, OutlineError> {
    if bookmarks.is_empty() {
        return Ok(pdf_bytes.to_vec());
    }

    let mut document = Document::load_mem(pdf_bytes)?;
    let pages = document.get_pages();
    let mut outline_entries = collect_outline_entries(&mut document, bookmarks, &pages)?;

    let outlines_id = document.new_object_id();
    link_outline_entries(outlines_id, &mut document, &mut outline_entries);
    insert_outlines_root(outlines_id, &mut document, &outline_entries)?;

    let mut buffer = Vec::new();
    document.save_to(&mut buffer)?;
    Ok(buffer)
}

/// Reads the outline titles of a PDF in order.
pub fn outline_titles(pdf_bytes: &[u8]) -> Result<Vec<String>, OutlineError> {
    let document = Document::load_mem(pdf_bytes)?;
    let catalog = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .and_then(|id| document.get_dictionary(id))
        .map_err(|_| OutlineError::MissingCatalog)?;
    let Some(mut next) = catalog
        .get(b"Outlines")
        .ok()
        .and_then(|object| object.as_reference().ok())
        .and_then(|id| document.get_dictionary(id).ok())
        .and_then(|outlines| outlines.get(b"First").ok())
        .and_then(|object| object.as_reference().ok())
    else {
        return Ok(Vec::new());
    };

    let mut titles = Vec::new();
    loop {
        let entry = document.get_dictionary(next)?;
        let title = entry.get(b"Title").and_then(Object::as_str)?;
        titles.push(String::from_utf8_lossy(title).into_owned());
        match entry.get(b"Next").and_then(Object::as_reference) {
            Ok(id) => next = id,
            Err(_) => break,
        }
    }
    Ok(titles)
}

struct OutlineEntry {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
}

fn collect_outline_entries(
    document: &mut Document,
    bookmarks: &[PageBookmark],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<OutlineEntry>, OutlineError> {
    bookmarks
        .iter()
        .map(|bookmark| {
            let page_ref = pages
                .get(&(bookmark.page_number as u32))
                .copied()
                .ok_or_else(|| OutlineError::MissingPage {
                    title: bookmark.title.clone(),
                    page_number: bookmark.page_number,
                })?;
            Ok(OutlineEntry {
                object_id: document.new_object_id(),
                page_ref,
                title: bookmark.title.clone(),
            })
        })
        .collect()
}

fn link_outline_entries(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &mut [OutlineEntry],
) {
    for index in 0..entries.len() {
        let mut dictionary = Dictionary::new();
        dictionary.set(
            "Title",
            Object::string_literal(entries[index].title.as_str()),
        );
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(entries[index].page_ref),
                Object::Name("Fit".into()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));

        if index > 0 {
            dictionary.set("Prev", Object::Reference(entries[index - 1].object_id));
        }

        if index + 1 < entries.len() {
            dictionary.set("Next", Object::Reference(entries[index + 1].object_id));
        }

        document
            .objects
            .insert(entries[index].object_id, Object::Dictionary(dictionary));
    }
}

fn insert_outlines_root(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &[OutlineEntry],
) -> Result<(), OutlineError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| OutlineError::MissingCatalog)?;

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Outlines".into()));
    dictionary.set("Count", Object::Integer(entries.len() as i64));
    if let Some(first) = entries.first() {
        dictionary.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = entries.last() {
        dictionary.set("Last", Object::Reference(last.object_id));
    }

    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(OutlineError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| OutlineError::InvalidCatalog)?;
    catalog.set("Outlines", Object::Reference(outlines_id));

    Ok(())
}
