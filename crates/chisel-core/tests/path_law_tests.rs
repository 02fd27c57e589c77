//! Behavioral checks for `Path`: the get-put/put-get laws, the documented
//! exceptions to them, optional lifting, and container accessors.

use std::collections::HashMap;

use chisel_core::{modified, path, Path};

#[derive(Clone, Debug, PartialEq)]
struct Val {
    int: i32,
    string: String,
    array: Vec<i32>,
    dictionary: HashMap<i32, i32>,
    optional_int: Option<i32>,
}

impl Default for Val {
    fn default() -> Self {
        Self {
            int: 0,
            string: String::new(),
            array: vec![0, 0, 0],
            dictionary: HashMap::from([(0, 0), (1, 1), (2, 2)]),
            optional_int: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Outer {
    value: Val,
    other: i32,
}

#[derive(Clone, Debug, Default, PartialEq)]
struct Holder {
    content: Option<Val>,
}

#[test]
fn get_put_law_holds_for_field_paths() {
    let int = path!(Val, int);
    let string = path!(Val, string);

    for v in [-3, 0, 42] {
        let root = Val::default();
        assert_eq!(int.extract(&int.embed(v, root)), v);
    }

    let root = Val { string: "seed".into(), ..Val::default() };
    assert_eq!(
        string.extract(&string.embed("written".into(), root)),
        "written"
    );
}

#[test]
fn put_get_law_holds_for_field_paths() {
    let int = path!(Val, int);
    let root = Val { int: 7, ..Val::default() };

    assert_eq!(int.embed(int.extract(&root), root.clone()), root);
}

#[test]
fn get_only_embed_is_a_noop() {
    let int = Path::<Val, i32>::get_only(|val| val.int);
    let root = Val { int: 7, ..Val::default() };

    assert_eq!(int.extract(&root), 7);
    assert_eq!(int.embed(99, root.clone()), root);
}

#[test]
fn optional_lift_extracts_some_and_ignores_absent_writes() {
    let int = path!(Val, int).optional();
    let root = Val::default();

    assert_eq!(int.extract(&root), Some(0));
    assert_eq!(int.embed(None, root.clone()), root);
    assert_eq!(int.embed(Some(5), root).int, 5);
}

#[test]
fn optional_root_without_unwrap_collapses_to_absent() {
    let int = path!(Val, int).optional_root(false);

    let absent: Option<Val> = None;
    assert_eq!(int.extract(&absent), None);
    assert_eq!(int.embed(None, absent.clone()), None);
    assert_eq!(int.embed(Some(0), absent), None);

    let mut present = Some(Val::default());
    assert_eq!(int.extract(&present), Some(0));

    if let Some(val) = present.as_mut() {
        val.int = 1;
    }
    assert_eq!(int.extract(&present), Some(1));

    // Writing the absent value through a present root collapses it.
    assert_eq!(int.embed(None, present), None);
}

#[test]
fn optional_root_with_unwrap_preserves_present_root() {
    let int = path!(Val, int).optional_root(true);

    let absent: Option<Val> = None;
    assert_eq!(int.extract(&absent), None);
    assert_eq!(int.embed(None, absent.clone()), None);
    assert_eq!(int.embed(Some(0), absent), None);

    let present = Some(Val { int: 1, ..Val::default() });

    let untouched = int.embed(None, present.clone());
    assert_eq!(untouched.as_ref().map(|val| val.int), Some(1));

    let written = int.embed(Some(0), present);
    assert_eq!(written.map(|val| val.int), Some(0));
}

#[test]
fn appending_chains_reads_and_writes() {
    let value_int = path!(Outer, value).appending(path!(Val, int));
    let root = Outer { other: 9, ..Outer::default() };

    assert_eq!(value_int.extract(&root), 0);

    let written = value_int.embed(5, root);
    assert_eq!(written.value.int, 5);
    assert_eq!(written.other, 9);
}

#[test]
fn appending_to_optional_value_writes_through() {
    // The appended path's root matches this path's value type exactly, so
    // plain composition applies: embedding `None` clears the location.
    let optional_int = path!(Outer, value).appending(path!(Val, optional_int));
    let root = Outer::default();

    assert_eq!(optional_int.extract(&root), None);

    let written = optional_int.embed(Some(2), root);
    assert_eq!(written.value.optional_int, Some(2));

    let cleared = optional_int.embed(None, written);
    assert_eq!(cleared.value.optional_int, None);
}

#[test]
fn appending_through_optional_intermediate_is_inert_when_absent() {
    let content_int = path!(Holder, content).appending_optional(path!(Val, int));
    let root = Holder { content: None };

    assert_eq!(content_int.extract(&root), None);
    assert_eq!(content_int.embed(Some(5), root.clone()), root);
    assert_eq!(content_int.embed(None, root.clone()), root);
}

#[test]
fn appending_through_optional_intermediate_writes_when_present() {
    let content_int = path!(Holder, content).appending_optional(path!(Val, int));
    let root = Holder { content: Some(Val { int: 1, ..Val::default() }) };

    assert_eq!(content_int.extract(&root), Some(1));

    let written = content_int.embed(Some(5), root.clone());
    assert_eq!(written.content.as_ref().map(|val| val.int), Some(5));

    // Embedding an absent value must leave the present intermediate
    // untouched: the lifted inner path unwraps with the root.
    let untouched = content_int.embed(None, root.clone());
    assert_eq!(untouched, root);
}

#[test]
fn unwrap_or_substitutes_default_on_read_only() {
    let optional_int = path!(Val, optional_int).unwrap_or(0);

    let absent = Val::default();
    assert_eq!(optional_int.extract(&absent), 0);

    let present = Val { optional_int: Some(5), ..Val::default() };
    assert_eq!(optional_int.extract(&present), 5);

    let written = optional_int.embed(7, absent);
    assert_eq!(written.optional_int, Some(7));
}

#[test]
fn key_path_inserts_and_removes() {
    let zero = Path::<HashMap<i32, i32>, _>::key(0);

    assert_eq!(zero.extract(&HashMap::from([(0, 1)])), Some(1));
    assert_eq!(zero.extract(&HashMap::from([(1, 2)])), None);

    let written = zero.embed(Some(1), HashMap::from([(0, 0)]));
    assert_eq!(written, HashMap::from([(0, 1)]));

    let removed = zero.embed(None, written);
    assert_eq!(removed, HashMap::new());
}

#[test]
fn index_path_reads_and_writes_in_range() {
    let first = Path::<Vec<i32>, i32>::index(0);

    assert_eq!(first.extract(&vec![1, 2]), 1);
    assert_eq!(first.embed(9, vec![0, 1]), vec![9, 1]);
}

#[test]
fn index_get_only_ignores_embeds() {
    let first = Path::<Vec<i32>, i32>::index_get_only(0);

    assert_eq!(first.extract(&vec![4, 5]), 4);
    assert_eq!(first.embed(9, vec![4, 5]), vec![4, 5]);
}

#[test]
fn index_safe_defines_out_of_range_access() {
    let second = Path::<Vec<i32>, _>::index_safe(1);

    assert_eq!(second.extract(&vec![0]), None);
    assert_eq!(second.extract(&vec![1, 2]), Some(2));

    assert_eq!(second.embed(Some(1), vec![0, 0]), vec![0, 1]);
    assert_eq!(second.embed(Some(1), vec![0]), vec![0]);
    assert_eq!(second.embed(None, vec![0, 0]), vec![0, 0]);
}

#[test]
fn embed_in_place_rewrites_the_binding() {
    let int = path!(Val, int);
    let mut root = Val::default();

    int.embed_in_place(3, &mut root);
    assert_eq!(root.int, 3);
}

#[test]
fn modified_returns_a_copy_and_leaves_input_alone() {
    let original = Val::default();
    let updated = modified(original.clone(), |val| val.int = 10);

    assert_eq!(original.int, 0);
    assert_eq!(updated.int, 10);
}

#[test]
fn nested_field_macro_reaches_deep_fields() {
    let deep = path!(Outer, value.int);
    let root = Outer::default();

    assert_eq!(deep.extract(&root), 0);
    assert_eq!(deep.embed(8, root).value.int, 8);
}
