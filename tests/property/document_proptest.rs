//! Property-based tests for element-tree operations

use proptest::prelude::*;
use std::collections::HashSet;
use xfcanvas::shared::document::{create, delete, put, update};
use xfcanvas::shared::{Document, Element, ElementId, ElementPatch};

/// Documents with ids `0..n`; element `i` may have any earlier element as parent
fn forest() -> impl Strategy<Value = Document> {
    (1usize..24).prop_flat_map(|n| {
        proptest::collection::vec(proptest::option::of(any::<prop::sample::Index>()), n).prop_map(
            |parents| {
                parents
                    .into_iter()
                    .enumerate()
                    .map(|(i, parent)| {
                        let element = Element::new(i as i64).with_attr("name", format!("e{}", i));
                        match parent {
                            Some(index) if i > 0 => element.with_parent(index.index(i) as i64),
                            _ => element,
                        }
                    })
                    .collect::<Document>()
            },
        )
    })
}

fn ids(document: &Document) -> Vec<ElementId> {
    document.elements().iter().map(|e| e.id.clone()).collect()
}

fn descends_from(document: &Document, id: &ElementId, ancestor: &ElementId) -> bool {
    let mut current = Some(id.clone());
    let mut seen = HashSet::new();
    while let Some(cursor) = current {
        if &cursor == ancestor {
            return true;
        }
        if !seen.insert(cursor.clone()) {
            return false;
        }
        current = document.get(&cursor).and_then(|e| e.parent.clone());
    }
    false
}

proptest! {
    #[test]
    fn test_create_fresh_id_appends(doc in forest(), fresh in 1000i64..2000) {
        let element = Element::new(fresh);
        let result = create(doc.clone(), element.clone());

        prop_assert_eq!(result.len(), doc.len() + 1);
        prop_assert_eq!(result.elements().last(), Some(&element));
    }

    #[test]
    fn test_create_existing_id_is_noop(doc in forest(), pick in any::<prop::sample::Index>()) {
        let existing = doc.elements()[pick.index(doc.len())].id.clone();
        let result = create(doc.clone(), Element::new(existing).with_attr("name", "dup"));

        prop_assert_eq!(result, doc);
    }

    #[test]
    fn test_delete_removes_exactly_the_subtree(doc in forest(), pick in any::<prop::sample::Index>()) {
        let target = doc.elements()[pick.index(doc.len())].id.clone();
        let result = delete(doc.clone(), &target);

        let expected: Vec<ElementId> = ids(&doc)
            .into_iter()
            .filter(|id| !descends_from(&doc, id, &target))
            .collect();
        prop_assert_eq!(ids(&result), expected);
    }

    #[test]
    fn test_delete_unknown_id_is_noop(doc in forest()) {
        let result = delete(doc.clone(), &ElementId::from("missing"));
        prop_assert_eq!(result, doc);
    }

    #[test]
    fn test_put_missing_anchor_is_noop(doc in forest(), pick in any::<prop::sample::Index>()) {
        let moved = doc.elements()[pick.index(doc.len())].id.clone();
        let result = put(doc.clone(), &moved, Some(&ElementId::from(-1)));

        prop_assert_eq!(result, doc);
    }

    #[test]
    fn test_put_is_a_permutation(
        doc in forest(),
        pick in any::<prop::sample::Index>(),
        anchor in proptest::option::of(any::<prop::sample::Index>()),
    ) {
        let moved = doc.elements()[pick.index(doc.len())].id.clone();
        let anchor = anchor.map(|a| doc.elements()[a.index(doc.len())].id.clone());
        let result = put(doc.clone(), &moved, anchor.as_ref());

        let mut before = ids(&doc);
        let mut after = ids(&result);
        before.sort_by_key(|id| id.to_string());
        after.sort_by_key(|id| id.to_string());
        prop_assert_eq!(before, after);

        let order = ids(&result);
        match anchor {
            None => prop_assert_eq!(&order[0], &moved),
            Some(anchor) if anchor != moved => {
                let at = order.iter().position(|id| id == &anchor).unwrap();
                prop_assert_eq!(&order[at + 1], &moved);
            }
            Some(_) => {}
        }
    }

    #[test]
    fn test_update_zero_strips_field(doc in forest(), pick in any::<prop::sample::Index>()) {
        let target = doc.elements()[pick.index(doc.len())].id.clone();
        let widened = update(doc, ElementPatch::new(target.clone()).with_attr("width", 50));
        let result = update(widened, ElementPatch::new(target.clone()).with_attr("width", 0));

        let element = result.get(&target).unwrap();
        prop_assert!(!element.attrs.contains_key("width"));
        prop_assert!(element.attrs.contains_key("name"));
    }
}
