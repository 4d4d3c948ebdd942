//! Copy one page, and only what it references, into a fresh document.

use crate::error::{Result, SplitError};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::collections::{BTreeMap, BTreeSet};

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Build a one-page document from `page_id` in `source`.
///
/// The new document holds a catalog, a single-node page tree and the page's
/// dependency graph. Links to other pages (annotation targets, form widgets
/// living elsewhere) become null instead of dragging their pages along.
pub fn copy_page(source: &Document, page_number: u32, page_id: ObjectId) -> Result<Document> {
    let mut copier = PageCopier {
        source,
        target: Document::with_version(source.version.clone()),
        page_number,
        page_id,
        mapped: BTreeMap::new(),
    };

    let page = copier.page_with_inherited()?;
    copier.check_contents(&page)?;

    let pages_id = copier.target.new_object_id();
    let new_page_id = copier.target.new_object_id();
    copier.mapped.insert(page_id, new_page_id);

    let mut page = copier.copy_dictionary(&page);
    page.set("Parent", pages_id);
    copier
        .target
        .objects
        .insert(new_page_id, Object::Dictionary(page));

    copier.target.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(new_page_id)],
            "Count" => Object::Integer(1),
        }),
    );
    let catalog_id = copier.target.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    copier.target.trailer.set("Root", catalog_id);

    Ok(copier.target)
}

struct PageCopier<'a> {
    source: &'a Document,
    target: Document,
    page_number: u32,
    page_id: ObjectId,
    /// Source object id -> target object id
    mapped: BTreeMap<ObjectId, ObjectId>,
}

impl PageCopier<'_> {
    fn extract_error(&self, reason: impl ToString) -> SplitError {
        SplitError::Extract {
            page: self.page_number,
            reason: reason.to_string(),
        }
    }

    /// The page dictionary without /Parent, with inherited attributes pulled down
    fn page_with_inherited(&self) -> Result<Dictionary> {
        let mut page = self
            .source
            .get_dictionary(self.page_id)
            .map_err(|e| self.extract_error(format!("page object: {}", e)))?
            .clone();

        let mut seen = BTreeSet::from([self.page_id]);
        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
        while let Some(id) = parent.filter(|id| seen.insert(*id)) {
            let Ok(node) = self.source.get_dictionary(id) else {
                break;
            };
            for key in INHERITABLE {
                if !page.has(key) {
                    if let Ok(value) = node.get(key) {
                        page.set(key.to_vec(), value.clone());
                    }
                }
            }
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        }

        page.remove(b"Parent");
        Ok(page)
    }

    /// Content streams are the page itself; a missing one is a corrupt page
    fn check_contents(&self, page: &Dictionary) -> Result<()> {
        let refs: Vec<ObjectId> = match page.get(b"Contents") {
            Ok(Object::Reference(id)) => vec![*id],
            Ok(Object::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_reference().ok())
                .collect(),
            _ => Vec::new(),
        };

        for id in refs {
            if self.source.get_object(id).is_err() {
                return Err(self.extract_error(format!(
                    "content stream {} {} R is missing",
                    id.0, id.1
                )));
            }
        }
        Ok(())
    }

    fn copy_object(&mut self, object: &Object) -> Object {
        match object {
            Object::Reference(id) => self.copy_reference(*id),
            Object::Array(items) => {
                Object::Array(items.iter().map(|item| self.copy_object(item)).collect())
            }
            Object::Dictionary(dict) => Object::Dictionary(self.copy_dictionary(dict)),
            Object::Stream(stream) => {
                let mut copy = stream.clone();
                copy.dict = self.copy_dictionary(&stream.dict);
                Object::Stream(copy)
            }
            other => other.clone(),
        }
    }

    fn copy_dictionary(&mut self, dict: &Dictionary) -> Dictionary {
        let mut copy = Dictionary::new();
        for (key, value) in dict.iter() {
            copy.set(key.clone(), self.copy_object(value));
        }
        copy
    }

    fn copy_reference(&mut self, id: ObjectId) -> Object {
        if let Some(mapped) = self.mapped.get(&id) {
            return Object::Reference(*mapped);
        }

        let source = self.source;
        // Dangling references read as null
        let Ok(object) = source.get_object(id) else {
            return Object::Null;
        };
        if is_page_tree_node(object) {
            return Object::Null;
        }

        let new_id = self.target.new_object_id();
        self.mapped.insert(id, new_id);
        let copy = self.copy_object(object);
        self.target.objects.insert(new_id, copy);
        Object::Reference(new_id)
    }
}

fn is_page_tree_node(object: &Object) -> bool {
    let Object::Dictionary(dict) = object else {
        return false;
    };
    match dict.get(b"Type") {
        Ok(Object::Name(name)) => matches!(name.as_slice(), b"Page" | b"Pages"),
        _ => false,
    }
}
