//! Tests for output module

use nodestitch::{FormatSchema, NodeRef, OutputFormat, Path, RecordStore, StitchError, render_paths};

fn fixture() -> (RecordStore, FormatSchema) {
    let schema = FormatSchema::parse("no,i,j,lon,lat").unwrap();
    let input = "\
1 2 2000 1 0
1 10 20 0.0 0.0
1 2 2000 1 6
1 11 20 4.0 0.0
";
    let (store, _) = RecordStore::from_reader(input.as_bytes(), &schema).unwrap();
    (store, schema)
}

fn two_node_path() -> Path {
    Path {
        nodes: vec![NodeRef::new(0, 0), NodeRef::new(1, 0)],
    }
}

#[test]
fn test_std_layout() {
    let (store, schema) = fixture();
    let bytes = render_paths(OutputFormat::Std, &[two_node_path()], &store, &schema).unwrap();
    let expected = "start\t2\t1\t2\t2000\t0\t\n\
                    \t1\t10\t20\t0.0\t0.0\t1\t2\t2000\t0\t\n\
                    \t1\t11\t20\t4.0\t0.0\t1\t2\t2000\t6\t\n";
    assert_eq!(String::from_utf8(bytes).unwrap(), expected);
}

#[test]
fn test_visit_layout() {
    let (store, schema) = fixture();
    let bytes = render_paths(OutputFormat::Visit, &[two_node_path()], &store, &schema).unwrap();
    let expected = "id,time_id,year,month,day,hour,no,i,j,lon,lat\n\
                    1,\t1,\t2000,\t2,\t1,\t0,\t\t1,\t10,\t20,\t0.0,\t0.0\n\
                    1,\t2,\t2000,\t2,\t1,\t6,\t\t1,\t11,\t20,\t4.0,\t0.0\n";
    assert_eq!(String::from_utf8(bytes).unwrap(), expected);
}

#[test]
fn test_no_paths() {
    let (store, schema) = fixture();
    let std = render_paths(OutputFormat::Std, &[], &store, &schema).unwrap();
    assert!(std.is_empty());

    let visit = render_paths(OutputFormat::Visit, &[], &store, &schema).unwrap();
    assert_eq!(
        String::from_utf8(visit).unwrap(),
        "id,time_id,year,month,day,hour,no,i,j,lon,lat\n"
    );
}

#[test]
fn test_unknown_node_is_an_error() {
    let (store, schema) = fixture();
    let bad = Path {
        nodes: vec![NodeRef::new(0, 0), NodeRef::new(5, 0)],
    };
    assert!(render_paths(OutputFormat::Std, &[bad], &store, &schema).is_err());
}

#[test]
fn test_output_format_parsing() {
    assert_eq!("std".parse::<OutputFormat>().unwrap(), OutputFormat::Std);
    assert_eq!("visit".parse::<OutputFormat>().unwrap(), OutputFormat::Visit);
    assert!(matches!(
        "csv".parse::<OutputFormat>(),
        Err(StitchError::Configuration(_))
    ));
    assert_eq!(OutputFormat::Visit.to_string(), "visit");
    assert_eq!(OutputFormat::default(), OutputFormat::Std);
}
