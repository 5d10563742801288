use flatten_core::{Category, Field, Reflect, SelectionTable, Shape, Shaped, TypeSet, reflect};
use flatten_reflect::{FieldId, Query, Site};
use static_assertions::assert_impl_all;

assert_impl_all!(Site: Send, Sync, Copy);

reflect! {
    #[derive(Clone, Debug, PartialEq)]
    struct Foo<A, B, C> {
        a: A,
        b: B,
        c: C,
    }
}

reflect! {
    #[derive(Clone, Debug, PartialEq)]
    struct Bar<X> {
        x: X,
    }
}

reflect! {
    #[derive(Clone, Debug, PartialEq)]
    struct Partial<A, B, C> {
        a: A,
        b: B,
        c: C,
    }
}

reflect! {
    #[derive(Clone, Debug, PartialEq)]
    struct Model {
        rates: Vec<f64>,
        offset: Option<f32>,
        label: String,
        enabled: bool,
        window: (u32, u32),
    }
}

fn render(leaves: &[Box<dyn Reflect>]) -> String {
    format!("{leaves:?}")
}

fn except_bar() -> TypeSet {
    TypeSet::decl::<Bar<()>>()
}

#[test]
fn use_and_ignore_pick_leaves() {
    flatten_testhelpers::setup();

    let obj = Foo {
        a: 1i64,
        b: "two",
        c: Foo {
            a: Bar { x: 3i64 },
            b: 4.0f64,
            c: 5.0f32,
        },
    };
    let query = Query::new()
        .uses(TypeSet::of::<i64>().with::<f32>())
        .ignore(except_bar());
    let leaves = query.flatten(&obj).unwrap();
    insta::assert_snapshot!(render(&leaves), @"[1, 5.0]");
    assert!(leaves[0].is::<i64>());
    assert!(leaves[1].is::<f32>());
}

#[test]
fn symbols_except_under_ignored_types() {
    flatten_testhelpers::setup();

    let obj = Foo {
        a: "one",
        b: "two",
        c: Foo {
            a: Bar { x: "three" },
            b: 4.0f64,
            c: "five",
        },
    };
    let query = Query::new()
        .uses(TypeSet::of::<&'static str>())
        .ignore(except_bar());
    let leaves = query.flatten(&obj).unwrap();
    insta::assert_snapshot!(render(&leaves), @r#"["one", "two", "five"]"#);
}

#[test]
fn numbers_by_default() {
    flatten_testhelpers::setup();

    let nested = Foo {
        a: Foo {
            a: 1i64,
            b: 2i64,
            c: 3i64,
        },
        b: 4.0f64,
        c: 5.0f64,
    };
    let leaves = Query::new().flatten(&nested).unwrap();
    insta::assert_snapshot!(render(&leaves), @"[1, 2, 3, 4.0, 5.0]");
}

#[test]
fn unselected_fields_are_not_visited() {
    flatten_testhelpers::setup();

    let table = SelectionTable::new()
        .exclude::<Partial<(), (), ()>>("c")
        .unwrap();
    let nested = Partial {
        a: Partial {
            a: 1.0f64,
            b: 2.0f64,
            c: 3.0f64,
        },
        b: 4i64,
        c: 5i64,
    };
    let leaves = Query::new().selector(&table).flatten(&nested).unwrap();
    insta::assert_snapshot!(render(&leaves), @"[1.0, 2.0, 4]");
}

#[test]
fn tuple_selections_stay_with_their_arity() {
    flatten_testhelpers::setup();

    let table = SelectionTable::new().exclude::<(f64, f64)>("1").unwrap();
    let query = Query::new().selector(&table);
    let pair = query.flatten(&(1.0f64, 2.0f64)).unwrap();
    insta::assert_snapshot!(render(&pair), @"[1.0]");
    let triple = query.flatten(&(1.0f64, 2.0f64, 3.0f64)).unwrap();
    insta::assert_snapshot!(render(&triple), @"[1.0, 2.0, 3.0]");

    let query = Query::new().ignore(TypeSet::decl::<((),)>());
    let pair = query.flatten(&(1.0f64, 2.0f64)).unwrap();
    insta::assert_snapshot!(render(&pair), @"[1.0, 2.0]");
    assert!(query.flatten(&((1.0f64, 2.0f64),)).unwrap().is_empty());
}

#[test]
fn closures_select_fields() {
    flatten_testhelpers::setup();

    let skip_b = |_: &'static Shape, field: &Field| field.name != "b";
    let obj = Foo {
        a: 1u8,
        b: 2u8,
        c: 3u8,
    };
    let leaves = Query::new().selector(&skip_b).flatten(&obj).unwrap();
    insta::assert_snapshot!(render(&leaves), @"[1, 3]");
}

#[test]
fn ignore_wins_over_use() {
    flatten_testhelpers::setup();

    let obj = Foo {
        a: 1i64,
        b: Bar { x: 2i64 },
        c: 3i64,
    };
    let query = Query::new()
        .uses(TypeSet::numbers().with_decl::<Bar<()>>())
        .ignore(except_bar());
    let leaves = query.flatten(&obj).unwrap();
    insta::assert_snapshot!(render(&leaves), @"[1, 3]");
}

#[test]
fn used_composites_are_captured_whole() {
    flatten_testhelpers::setup();

    let obj = Foo {
        a: 1i64,
        b: Bar { x: 2i64 },
        c: 3i64,
    };
    let query = Query::new().uses(TypeSet::numbers().with_decl::<Bar<()>>());
    let leaves = query.flatten(&obj).unwrap();
    insta::assert_snapshot!(render(&leaves), @"[1, Bar { x: 2 }, 3]");
}

#[test]
fn sequences_options_and_tuples() {
    flatten_testhelpers::setup();

    let model = Model {
        rates: vec![0.1, 0.2],
        offset: Some(1.5),
        label: "m".to_string(),
        enabled: true,
        window: (3, 4),
    };
    let leaves = Query::new().flatten(&model).unwrap();
    insta::assert_snapshot!(render(&leaves), @"[0.1, 0.2, 1.5, 3, 4]");

    let empty = Model {
        rates: Vec::new(),
        offset: None,
        ..model
    };
    let leaves = Query::new().flatten(&empty).unwrap();
    insta::assert_snapshot!(render(&leaves), @"[3, 4]");
}

#[test]
fn bool_and_text_are_opt_in() {
    flatten_testhelpers::setup();

    let model = Model {
        rates: vec![],
        offset: None,
        label: "m".to_string(),
        enabled: true,
        window: (3, 4),
    };
    let opted_in = TypeSet::category(Category::Boolean).with_category(Category::Textual);
    let query = Query::new().uses(opted_in);
    let leaves = query.flatten(&model).unwrap();
    insta::assert_snapshot!(render(&leaves), @r#"["m", true]"#);
}

#[test]
fn root_leaf_flattens_to_itself() {
    flatten_testhelpers::setup();

    let leaves = Query::new().flatten(&7u16).unwrap();
    insta::assert_snapshot!(render(&leaves), @"[7]");
    assert!(Query::new().flatten(&"text").unwrap().is_empty());
}

#[test]
fn flatten_is_deterministic() {
    flatten_testhelpers::setup();

    let obj = Foo {
        a: vec![1.0f64, 2.0],
        b: (3i8, Some(4u64)),
        c: [5.0f32, 6.0],
    };
    let query = Query::new();
    let first = render(&query.flatten(&obj).unwrap());
    let second = render(&query.flatten(&obj).unwrap());
    assert_eq!(first, second);
    assert_eq!(query.count(&obj).unwrap(), 6);
}

#[test]
fn flatten_as_coerces_every_leaf() {
    flatten_testhelpers::setup();

    let obj = Foo {
        a: 1i64,
        b: 2.5f32,
        c: vec![3u8],
    };
    let values = Query::new().flatten_as::<f64>(&obj).unwrap();
    assert_eq!(values, vec![1.0, 2.5, 3.0]);
}

#[test]
fn metaflatten_matches_flatten_positions() {
    flatten_testhelpers::setup();

    let obj = Foo {
        a: 1i64,
        b: "two",
        c: Foo {
            a: Bar { x: 3i64 },
            b: 4.0f64,
            c: 5.0f32,
        },
    };
    let query = Query::new().ignore(except_bar());
    let depths = query.metaflatten(&obj, |site| site.depth).unwrap();
    assert_eq!(depths.len(), query.flatten(&obj).unwrap().len());
    assert_eq!(depths, vec![1, 2, 2]);
}

#[test]
fn field_names() {
    flatten_testhelpers::setup();

    let names = Query::new()
        .fieldnameflatten(&Foo { a: 1, b: 2, c: 3 })
        .unwrap();
    assert_eq!(
        names,
        vec![FieldId::Name("a"), FieldId::Name("b"), FieldId::Name("c")]
    );

    let obj = Foo {
        a: vec![1.0, 2.0],
        b: (3, 4),
        c: (),
    };
    let names = Query::new().fieldnameflatten(&obj).unwrap();
    let rendered: Vec<String> = names.iter().map(ToString::to_string).collect();
    assert_eq!(rendered, ["0", "1", "0", "1"]);
}

#[test]
fn parent_names_and_types() {
    flatten_testhelpers::setup();

    let obj = Foo {
        a: 1i64,
        b: 2i64,
        c: Foo {
            a: 3i64,
            b: 4i64,
            c: Bar { x: () },
        },
    };
    let names = Query::new().parentnameflatten(&obj).unwrap();
    assert_eq!(
        names,
        vec![Some("Foo"), Some("Foo"), Some("Foo"), Some("Foo")]
    );

    let obj = Foo {
        a: 1i64,
        b: 2i64,
        c: Bar { x: 3i64 },
    };
    let types = Query::new().parenttypeflatten(&obj).unwrap();
    let outer = <Foo<i64, i64, Bar<i64>>>::SHAPE;
    let inner = <Bar<i64>>::SHAPE;
    assert_eq!(types, vec![Some(outer), Some(outer), Some(inner)]);
}

#[test]
fn field_types() {
    flatten_testhelpers::setup();

    let obj = Foo {
        a: 1.0f64,
        b: "two",
        c: "Three".to_string(),
    };
    let query = Query::new().uses(TypeSet::category(Category::Float).with::<String>());
    let types = query.fieldtypeflatten(&obj).unwrap();
    assert_eq!(types, vec![f64::SHAPE, String::SHAPE]);
}
