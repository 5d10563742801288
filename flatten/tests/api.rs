use flatten::{
    FieldId, FieldValues, FlattenError, Reflect, Shaped, fieldnameflatten, fieldtypeflatten,
    flatten, metaflatten, modify, modify_in_place, parentnameflatten, parenttypeflatten,
    reconstruct, reflect, register_constructor, update,
};

reflect! {
    #[derive(Clone, Debug, PartialEq)]
    struct Foo<A, B, C> {
        a: A,
        b: B,
        c: C,
    }
}

reflect! {
    #[reflect(pod)]
    #[derive(Clone, Debug, PartialEq)]
    struct Bar<X, Y> {
        x: X,
        y: Y,
    }
}

reflect! {
    #[reflect(no_constructor)]
    #[derive(Clone, Debug, PartialEq)]
    struct Celsius {
        degrees: f64,
        kelvin: f64,
    }
}

impl Celsius {
    fn new(degrees: f64) -> Self {
        Self {
            degrees,
            kelvin: degrees + 273.15,
        }
    }
}

#[test]
fn defaults_capture_every_number() {
    flatten_testhelpers::setup();

    let foo = Foo {
        a: 1i64,
        b: 2i64,
        c: 3i64,
    };
    let leaves = flatten(&foo).unwrap();
    insta::assert_snapshot!(format!("{leaves:?}"), @"[1, 2, 3]");

    let nested = Foo {
        a: Foo {
            a: 1i64,
            b: 2i64,
            c: 3i64,
        },
        b: 4.0f64,
        c: 5.0f64,
    };
    let leaves = flatten(&nested).unwrap();
    insta::assert_snapshot!(format!("{leaves:?}"), @"[1, 2, 3, 4.0, 5.0]");
}

#[test]
fn metadata_helpers() {
    flatten_testhelpers::setup();

    let obj = Foo {
        a: 1i64,
        b: 2i64,
        c: Bar { x: 3i64, y: 4i64 },
    };
    assert_eq!(
        fieldnameflatten(&obj).unwrap(),
        vec![
            FieldId::Name("a"),
            FieldId::Name("b"),
            FieldId::Name("x"),
            FieldId::Name("y"),
        ]
    );
    assert_eq!(
        parentnameflatten(&obj).unwrap(),
        vec![Some("Foo"), Some("Foo"), Some("Bar"), Some("Bar")]
    );
    assert_eq!(fieldtypeflatten(&obj).unwrap(), vec![i64::SHAPE; 4]);

    let outer = <Foo<i64, i64, Bar<i64, i64>>>::SHAPE;
    let inner = <Bar<i64, i64>>::SHAPE;
    assert_eq!(
        parenttypeflatten(&obj).unwrap(),
        vec![Some(outer), Some(outer), Some(inner), Some(inner)]
    );

    let labels = metaflatten(&obj, |site| {
        let owner = site.parent.map_or("", |p| p.type_identifier);
        format!("{owner}.{}", site.field)
    })
    .unwrap();
    insta::assert_snapshot!(labels.join(" "), @"Foo.a Foo.b Bar.x Bar.y");
}

#[test]
fn reconstruct_update_and_modify() {
    flatten_testhelpers::setup();

    let foo = Foo {
        a: 1i64,
        b: 2i64,
        c: 3i64,
    };
    assert_eq!(
        reconstruct(&foo, [1i64, 20, 3]).unwrap(),
        Foo { a: 1, b: 20, c: 3 }
    );

    let mut bar = Bar { x: 1.0f64, y: 2u32 };
    update(&mut bar, [3.0, 4.0]).unwrap();
    assert_eq!(bar, Bar { x: 3.0, y: 4 });

    let negated = modify(|leaf| Box::new(-leaf.as_f64().unwrap_or_default()), &foo).unwrap();
    assert_eq!(
        negated,
        Foo {
            a: -1,
            b: -2,
            c: -3,
        }
    );

    let mut bar = Bar {
        x: 1.5f64,
        y: vec![2u32, 3],
    };
    modify_in_place(
        |leaf| Box::new(leaf.as_f64().unwrap_or_default() * 2.0),
        &mut bar,
    )
    .unwrap();
    assert_eq!(
        bar,
        Bar {
            x: 3.0,
            y: vec![4, 6],
        }
    );
}

#[test]
fn process_wide_constructor_overrides() {
    flatten_testhelpers::setup();

    let reading = Foo {
        a: Celsius::new(20.0),
        b: 1u8,
        c: 2u8,
    };
    let err = reconstruct(&reading, [25.0, 0.0, 1.0, 2.0]).unwrap_err();
    assert!(matches!(err, FlattenError::MissingConstructor { .. }));

    register_constructor::<Celsius, _>(2, |mut values: FieldValues| {
        let degrees = values.take::<f64>()?;
        Ok(Celsius::new(degrees))
    })
    .unwrap();

    let rebuilt = reconstruct(&reading, [25.0, 0.0, 1.0, 2.0]).unwrap();
    assert_eq!(rebuilt.a, Celsius::new(25.0));
    assert_eq!(rebuilt.a.kelvin, 25.0 + 273.15);
}

#[test]
fn boxed_leaves_round_trip() {
    flatten_testhelpers::setup();

    let obj = Foo {
        a: (1u8, 2.5f32),
        b: vec![3i64],
        c: Some(4.0f64),
    };
    let leaves: Vec<Box<dyn Reflect>> = flatten(&obj).unwrap();
    assert_eq!(reconstruct(&obj, leaves).unwrap(), obj);
}
