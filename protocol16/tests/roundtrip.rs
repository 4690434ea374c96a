use bytestream::{ByteReader, ByteWriter};
use proptest::prelude::*;
use protocol16::{
    decode_parameter_table, decode_tagged, encode_parameter_table, encode_tagged, DecodeError,
    Limits, ParameterTable, TypeCode, Value, ValueMap,
};

fn roundtrip_table(table: &ParameterTable) -> ParameterTable {
    let mut writer = ByteWriter::new();
    encode_parameter_table(&mut writer, table).unwrap();
    let bytes = writer.finish();
    let mut reader = ByteReader::new(&bytes);
    let decoded = decode_parameter_table(&mut reader, &Limits::default()).unwrap();
    assert!(reader.is_empty(), "trailing bytes after table");
    decoded
}

#[test]
fn fixed_table_roundtrip() {
    let dictionary: ValueMap = [
        (Value::String("a".into()), Value::Integer(1)),
        (Value::String("b".into()), Value::Integer(-1)),
    ]
    .into_iter()
    .collect();
    let table = ParameterTable::from([
        (0, Value::Byte(255)),
        (1, Value::Boolean(true)),
        (2, Value::Short(65_000)),
        (3, Value::Integer(i32::MIN)),
        (4, Value::Long(-5)),
        (5, Value::Float(3.25)),
        (6, Value::Double(-0.5)),
        (7, Value::String("Ünïcode".into())),
        (8, Value::ByteArray(vec![0, 1, 2, 3])),
        (
            9,
            Value::Array {
                element: TypeCode::Float,
                values: vec![Value::Float(1.0), Value::Float(2.0)],
            },
        ),
        (
            10,
            Value::Dictionary {
                key: TypeCode::String,
                value: TypeCode::Integer,
                entries: dictionary,
            },
        ),
        (11, Value::StringArray(vec!["x".into(), String::new()])),
        (12, Value::IntegerArray(vec![1, -2, 3])),
        (
            13,
            Value::ObjectArray(vec![Value::Null, Value::Byte(1), Value::String("s".into())]),
        ),
        (14, Value::Null),
    ]);
    assert_eq!(roundtrip_table(&table), table);
}

#[test]
fn hashtable_entries_carry_their_own_tags() {
    // h, count 2, (b 1 -> s "one"), (i 2 -> o true)
    let bytes = [
        b'h', 0, 2, b'b', 1, b's', 0, 3, b'o', b'n', b'e', b'i', 0, 0, 0, 2, b'o', 1,
    ];
    let value = decode_tagged(&mut ByteReader::new(&bytes), &Limits::default()).unwrap();
    let Value::Hashtable(entries) = value else {
        panic!("expected hashtable, got {value:?}");
    };
    assert_eq!(entries.get(&Value::Byte(1)), Some(&Value::String("one".into())));
    assert_eq!(entries.get(&Value::Integer(2)), Some(&Value::Boolean(true)));
}

#[test]
fn dictionary_with_dynamic_key_slot() {
    // D, key '*', value 'b', count 1, (s "k" -> 9)
    let bytes = [b'D', b'*', b'b', 0, 1, b's', 0, 1, b'k', 9];
    let value = decode_tagged(&mut ByteReader::new(&bytes), &Limits::default()).unwrap();
    let Value::Dictionary { entries, .. } = &value else {
        panic!("expected dictionary");
    };
    assert_eq!(entries.get(&Value::String("k".into())), Some(&Value::Byte(9)));

    let mut writer = ByteWriter::new();
    encode_tagged(&mut writer, &value).unwrap();
    assert_eq!(writer.finish(), bytes);
}

#[test]
fn duplicate_dictionary_keys_keep_last_value() {
    let bytes = [b'D', b'b', b'b', 0, 2, 1, 10, 1, 20];
    let value = decode_tagged(&mut ByteReader::new(&bytes), &Limits::default()).unwrap();
    let Value::Dictionary { entries, .. } = value else {
        panic!("expected dictionary");
    };
    assert_eq!(entries.len(), 1);
    assert_eq!(entries.get(&Value::Byte(1)), Some(&Value::Byte(20)));
}

#[test]
fn operation_response_value() {
    let value = Value::OperationResponse {
        operation_code: 4,
        return_code: -3,
        debug_message: Box::new(Value::String("denied".into())),
        parameters: ParameterTable::from([(1, Value::Boolean(false))]),
    };
    let mut writer = ByteWriter::new();
    encode_tagged(&mut writer, &value).unwrap();
    let bytes = writer.finish();
    assert_eq!(bytes[0], b'p');
    let decoded = decode_tagged(&mut ByteReader::new(&bytes), &Limits::default()).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn unrecognized_tag_inside_table() {
    // count 1, id 0, tag 255
    let bytes = [0, 1, 0, 255, 0, 0];
    let mut reader = ByteReader::new(&bytes);
    let err = decode_parameter_table(&mut reader, &Limits::default()).unwrap_err();
    assert_eq!(
        err,
        DecodeError::UnrecognizedType {
            code: 255,
            position: 3
        }
    );
}

#[test]
fn truncated_value_reports_read_error() {
    let bytes = [b'i', 0, 0];
    let err = decode_tagged(&mut ByteReader::new(&bytes), &Limits::default()).unwrap_err();
    assert!(matches!(err, DecodeError::Read(_)));
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<u8>().prop_map(Value::Byte),
        any::<bool>().prop_map(Value::Boolean),
        any::<u16>().prop_map(Value::Short),
        any::<i32>().prop_map(Value::Integer),
        any::<i64>().prop_map(Value::Long),
        (-1.0e6f32..1.0e6).prop_map(Value::Float),
        (-1.0e12f64..1.0e12).prop_map(Value::Double),
        "[a-zA-Z0-9 ]{0,24}".prop_map(Value::String),
        prop::collection::vec(any::<u8>(), 0..64).prop_map(Value::ByteArray),
    ]
}

fn composite() -> impl Strategy<Value = Value> {
    prop_oneof![
        scalar(),
        prop::collection::vec(any::<i32>(), 0..8).prop_map(|ints| Value::Array {
            element: TypeCode::Integer,
            values: ints.into_iter().map(Value::Integer).collect(),
        }),
        prop::collection::vec((any::<u8>(), scalar()), 0..8).prop_map(|entries| {
            Value::Dictionary {
                key: TypeCode::Byte,
                value: TypeCode::Null,
                entries: entries
                    .into_iter()
                    .map(|(k, v)| (Value::Byte(k), v))
                    .collect(),
            }
        }),
        prop::collection::vec(scalar(), 0..8).prop_map(Value::ObjectArray),
    ]
}

proptest! {
    #[test]
    fn prop_parameter_table_roundtrip(
        entries in prop::collection::vec((any::<u8>(), composite()), 0..16)
    ) {
        let table: ParameterTable = entries.into_iter().collect();
        prop_assert_eq!(roundtrip_table(&table), table);
    }

    #[test]
    fn prop_decoder_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut reader = ByteReader::new(&bytes);
        let _ = decode_tagged(&mut reader, &Limits::for_testing());
        prop_assert!(reader.position() <= bytes.len());
    }
}
