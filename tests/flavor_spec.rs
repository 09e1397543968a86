use dif_flavor::dif::format::text;
use dif_flavor::{
    compute_totals, encode_flavor, encode_flavor_with_version, export_flavor, move_item,
    reconstruct_flavors, validate, Category, DifError, ErrorKind, FlatDatabase, Flavor, Item,
    Seconds, ValidationError,
};

fn flat(pairs: &[(&str, &str)]) -> FlatDatabase {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn item(name: &str, duration: Seconds) -> Item {
    Item::new(name, duration)
}

fn sample_flavor() -> Flavor {
    let mut flavor = Flavor::new("L");
    flavor.init = true;
    flavor.modifiers = Some("DH1H2".to_string());
    flavor.add_or_update_item(Category::Product, None, "lf001", "10").unwrap();
    flavor.add_or_update_item(Category::Product, None, "lf002", "7.5").unwrap();
    flavor.add_or_update_item(Category::Sensor, None, "par_hum001", "7").unwrap();
    flavor.set_clock(true);
    flavor
}

/// Structural fields compared across a round trip.
fn structure(f: &Flavor) -> (String, bool, Option<String>, Vec<Vec<Item>>) {
    (
        f.name.clone(),
        f.init,
        f.modifiers.clone(),
        Category::ALL.iter().map(|c| f.list(*c).order().to_vec()).collect(),
    )
}

#[test]
fn reconstructs_indexed_products() {
    let db = flat(&[
        ("c_X_product_num", "2"),
        ("c_X_product_00", "p1"),
        ("c_X_product_duration_00", "5"),
        ("c_X_product_01", "p2"),
        ("c_X_product_duration_01", "3"),
    ]);
    let flavors = reconstruct_flavors(&db);
    let x = &flavors["X"];
    assert_eq!(x.products().count(), 2);
    assert_eq!(
        x.products().order(),
        &[item("p1", Seconds::Whole(5)), item("p2", Seconds::Whole(3))]
    );
    assert!(!x.init);
    assert_eq!(x.modifiers, None);
}

#[test]
fn reconstructs_init_directive_and_modifiers() {
    let db = flat(&[
        ("c_flavor_L", "@Init(L)DH1H2"),
        ("c_flavor_M", "@Init(M)"),
        ("c_flavor_N", "something else"),
    ]);
    let flavors = reconstruct_flavors(&db);
    assert!(flavors["L"].init);
    assert_eq!(flavors["L"].modifiers.as_deref(), Some("DH1H2"));
    assert!(flavors["M"].init);
    assert_eq!(flavors["M"].modifiers, None);
    assert!(!flavors["N"].init);
    assert!(flavors["N"].products().is_empty());
}

#[test]
fn reserved_names_are_not_flavors() {
    let db = flat(&[
        ("c_flavor_name_prefix", "@Init(x)"),
        ("c_flavor_PERM", "1"),
        ("c_SENSORS_product_num", "1"),
        ("c_TAG_misc_num", "1"),
        ("c_flavor_version_name", "v1"),
    ]);
    assert!(reconstruct_flavors(&db).is_empty());
}

#[test]
fn incomplete_indices_are_omitted() {
    let db = flat(&[
        ("c_Y_sensor_num", "4"),
        ("c_Y_sensor_00", "s0"),
        ("c_Y_sensor_duration_00", "7"),
        // 01 has no duration
        ("c_Y_sensor_01", "s1"),
        // 02 has no name
        ("c_Y_sensor_duration_02", "7"),
        // 03 has an unreadable duration
        ("c_Y_sensor_03", "s3"),
        ("c_Y_sensor_duration_03", "seven"),
        ("c_Y_misc_num", "1"),
        ("c_Y_misc_00", "clock"),
        ("c_Y_misc_duration_00", "12.5"),
    ]);
    let flavors = reconstruct_flavors(&db);
    let y = &flavors["Y"];
    assert_eq!(y.sensors().order(), &[item("s0", Seconds::Whole(7))]);
    assert_eq!(y.sensors().count(), 1);
    assert_eq!(y.misc().order(), &[item("clock", Seconds::Fractional(12.5))]);
    assert!(y.clock_enabled());
}

#[test]
fn unreadable_counts_are_ignored() {
    let db = flat(&[("c_Z_product_num", "many"), ("c_Z_product_00", "p")]);
    assert!(reconstruct_flavors(&db).is_empty());
}

#[test]
fn encodes_in_import_order() {
    let flavor = sample_flavor();
    let out = encode_flavor_with_version(&flavor, "EXPORT_1");
    let expected = [
        r#""c_flavor_L",0,0,"@Init(L)DH1H2""#,
        r#""c_L_duration",0,0,"17.5 sec""#,
        r#""c_L_product_num",0,0,"2""#,
        r#""c_L_product_00",0,0,"lf001""#,
        r#""c_L_product_duration_00",0,0,"10""#,
        r#""c_L_product_01",0,0,"lf002""#,
        r#""c_L_product_duration_01",0,0,"7.5""#,
        r#""c_L_sensor_num",0,0,"1""#,
        r#""c_L_sensor_00",0,0,"par_hum001""#,
        r#""c_L_sensor_duration_00",0,0,"7""#,
        r#""c_L_misc_num",0,0,"1""#,
        r#""c_L_misc_00",0,0,"clock""#,
        r#""c_L_misc_duration_00",0,0,"17.5""#,
        r#""c_L_product_version",0,0,"EXPORT_1""#,
        r#""c_L_sensor_version",0,0,"EXPORT_1""#,
        r#""c_L_misc_version",0,0,"EXPORT_1""#,
    ];
    assert_eq!(out.lines().collect::<Vec<_>>(), expected);
}

#[test]
fn uninitialized_flavor_has_no_activation_line() {
    let mut flavor = sample_flavor();
    flavor.init = false;
    let out = encode_flavor(&flavor);
    assert!(!out.contains("c_flavor_L"));
    assert!(out.starts_with("\"c_L_duration\""));
    let versions: Vec<_> = out.lines().filter(|l| l.contains("_version\"")).collect();
    assert_eq!(versions.len(), 3);
    assert!(versions.iter().all(|l| l.contains("\"EXPORT_")));
}

#[test]
fn round_trip_preserves_structure() {
    let db = flat(&[
        ("c_flavor_L", "@Init(L)DH1H2"),
        ("c_L_product_num", "2"),
        ("c_L_product_00", "lf001"),
        ("c_L_product_duration_00", "10"),
        ("c_L_product_01", "lf002"),
        ("c_L_product_duration_01", "7.5"),
        ("c_L_sensor_num", "1"),
        ("c_L_sensor_00", "par_hum001"),
        ("c_L_sensor_duration_00", "7"),
        ("c_L_misc_num", "1"),
        ("c_L_misc_00", "clock"),
        ("c_L_misc_duration_00", "17.5"),
    ]);
    let first = reconstruct_flavors(&db);
    let encoded = encode_flavor(&first["L"]);
    let second = reconstruct_flavors(&text::decode(&encoded).expect("decode"));
    assert_eq!(structure(&first["L"]), structure(&second["L"]));
}

#[test]
fn totals_sum_durations() {
    assert_eq!(compute_totals(&[]), (0, Seconds::Whole(0)));
    let order = [item("a", Seconds::Whole(5)), item("b", Seconds::Fractional(2.5))];
    assert_eq!(compute_totals(&order), (2, Seconds::Fractional(7.5)));
    let whole = [item("a", Seconds::Fractional(2.5)), item("b", Seconds::Fractional(2.5))];
    assert_eq!(compute_totals(&whole), (2, Seconds::Whole(5)));
}

#[test]
fn move_relocates_one_item() {
    let mut order = vec!['A', 'B', 'C', 'D'];
    move_item(&mut order, 0, 2).unwrap();
    assert_eq!(order, ['B', 'C', 'A', 'D']);

    let mut order = vec!['A', 'B', 'C', 'D'];
    move_item(&mut order, 3, 0).unwrap();
    assert_eq!(order, ['D', 'A', 'B', 'C']);

    let mut order = vec!['A', 'B', 'C', 'D'];
    move_item(&mut order, 1, 99).unwrap();
    assert_eq!(order, ['A', 'C', 'D', 'B']);

    let mut order = vec!['A'];
    assert!(move_item(&mut order, 1, 0).is_err());
}

#[test]
fn list_edits_keep_counts_in_sync() {
    let mut flavor = sample_flavor();
    flavor.add_or_update_item(Category::Product, Some(0), "lf009", "4").unwrap();
    assert_eq!(flavor.products().get(0), Some(&item("lf009", Seconds::Whole(4))));

    flavor.move_item(Category::Product, 0, 1).unwrap();
    assert_eq!(flavor.products().get(1).map(|i| i.name.as_str()), Some("lf009"));

    let removed = flavor.remove_item(Category::Product, 0).unwrap();
    assert_eq!(removed.name, "lf002");
    assert_eq!(flavor.products().count(), 1);
    assert_eq!(flavor.duration(), "4 sec");

    flavor.sync_clock();
    assert_eq!(flavor.misc().get(0), Some(&item("clock", Seconds::Whole(4))));
}

#[test]
fn list_edits_reject_bad_input() {
    let mut flavor = Flavor::new("L");
    let err = flavor.add_or_update_item(Category::Product, None, "", "5").unwrap_err();
    assert!(matches!(err, DifError::MissingField { field: "name", .. }));
    let err = flavor.add_or_update_item(Category::Sensor, None, "s", "").unwrap_err();
    assert!(matches!(err, DifError::MissingField { field: "duration", .. }));
    let err = flavor.add_or_update_item(Category::Product, None, "p", "ten").unwrap_err();
    assert!(matches!(err, DifError::InvalidDuration { .. }));
    let err = flavor.add_or_update_item(Category::Product, Some(3), "p", "1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Edit);
    assert!(flavor.remove_item(Category::Misc, 0).is_err());
    assert!(flavor.move_item(Category::Product, 0, 0).is_err());
    assert!(flavor.products().is_empty());
}

#[test]
fn duration_text_parsing() {
    assert_eq!("5".parse::<Seconds>(), Ok(Seconds::Whole(5)));
    assert_eq!("5.0".parse::<Seconds>(), Ok(Seconds::Whole(5)));
    assert_eq!(" 2.5 ".parse::<Seconds>(), Ok(Seconds::Fractional(2.5)));
    assert!("inf".parse::<Seconds>().is_err());
    assert!("".parse::<Seconds>().is_err());
}

#[test]
fn clock_toggle() {
    let mut flavor = sample_flavor();
    assert!(flavor.clock_enabled());
    flavor.set_clock(false);
    assert!(!flavor.clock_enabled());
    assert_eq!(flavor.misc().count(), 0);
    flavor.sync_clock();
    assert!(flavor.misc().is_empty());
}

#[test]
fn validation_rules() {
    assert!(validate(&sample_flavor()).is_empty());

    let mut flavor = Flavor::new("");
    assert_eq!(
        validate(&flavor),
        vec![ValidationError::EmptyName, ValidationError::NoProducts]
    );

    flavor.name = "lower".to_string();
    flavor.set_clock(true);
    assert_eq!(
        validate(&flavor),
        vec![
            ValidationError::InvalidName,
            ValidationError::ClockWithoutProducts,
            ValidationError::NoProducts,
        ]
    );

    let mut flavor = sample_flavor();
    flavor.add_or_update_item(Category::Misc, Some(0), "clock", "60").unwrap();
    assert_eq!(validate(&flavor), vec![ValidationError::ClockTooLong]);

    let mut flavor = Flavor::new("BIG");
    for i in 0..100 {
        flavor.add_or_update_item(Category::Product, None, &format!("p{}", i), "1").unwrap();
    }
    assert_eq!(validate(&flavor), vec![ValidationError::TooManyProducts]);
    assert_eq!(
        ValidationError::TooManyProducts.to_string(),
        "Product count cannot be higher than 99!"
    );
}

#[test]
fn export_refuses_invalid_flavors() {
    let err = export_flavor(&Flavor::new("EMPTY")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    match err {
        DifError::Validation(problems) => assert_eq!(problems, vec![ValidationError::NoProducts]),
        other => panic!("unexpected error {:?}", other),
    }

    let text = export_flavor(&sample_flavor()).expect("export");
    assert!(text.starts_with("\"c_flavor_L\",0,0,\"@Init(L)DH1H2\"\n"));
}
