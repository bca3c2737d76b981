//! End-to-end tests driving the public API: framing, parsing, rendering,
//! and the error surface.

use std::io::Cursor;

use npy_header::{
    from_reader, from_slice, to_vec, to_writer, ElementType, Endianness, Error, Header, Order,
    MAGIC,
};

/// Frames header text the way a writer for the given major version would.
fn frame(major: u8, text: &str) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&[major, 0]);
    match major {
        1 => bytes.extend_from_slice(&(text.len() as u16).to_le_bytes()),
        _ => bytes.extend_from_slice(&(text.len() as u32).to_le_bytes()),
    }
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

const BASIC: &str = "{'descr': '<f8', 'fortran_order': False, 'shape': (3, 4), }\n";

#[test]
fn version_1_basic_header() {
    let header = from_slice(&frame(1, BASIC)).unwrap();
    assert_eq!(header.shape, vec![3, 4]);
    assert_eq!(header.element_type, ElementType::Float64);
    assert_eq!(header.endianness, Endianness::Little);
    assert_eq!(header.order, Order::C);
    assert_eq!(header.element_size(), 8);
    assert_eq!(header.num_elements(), Some(12));
}

#[test]
fn version_2_uses_four_byte_length() {
    let bytes = frame(2, BASIC);
    // 4-byte length field shifts the text by two bytes relative to v1.
    assert_eq!(bytes.len(), frame(1, BASIC).len() + 2);
    let header = from_slice(&bytes).unwrap();
    assert_eq!(header.shape, vec![3, 4]);
}

#[test]
fn version_3_allows_utf8_in_strings() {
    // Non-ASCII is only legal inside string literals, and only in v3.
    let text = "{'descr': '<f8', 'fortran_order': False, 'shape': (3, 4), 'café': 1, }\n";
    let header = from_slice(&frame(3, text)).unwrap();
    assert_eq!(header.shape, vec![3, 4]);

    match from_slice(&frame(2, text)) {
        Err(Error::InvalidHeaderFormat(_)) => {}
        other => panic!("expected InvalidHeaderFormat under ASCII, got {:?}", other),
    }
}

#[test]
fn version_3_non_ascii_descr_fails_cleanly() {
    // The lexer legally passes multi-byte UTF-8 through to the
    // descriptor parser under version 3; it must come back as a typed
    // error, never a panic.
    let text = "{'descr': '<é8', 'fortran_order': False, 'shape': (3,), }\n";
    match from_slice(&frame(3, text)) {
        Err(Error::UnsupportedType(code)) => assert_eq!(code, "<é8"),
        other => panic!("expected UnsupportedType, got {:?}", other),
    }
}

#[test]
fn fortran_order_flips_only_order() {
    let c = from_slice(&frame(1, BASIC)).unwrap();
    let f = from_slice(&frame(
        1,
        "{'descr': '<f8', 'fortran_order': True, 'shape': (3, 4), }\n",
    ))
    .unwrap();
    assert_eq!(f.order, Order::F);
    assert_eq!(c.order, Order::C);
    assert_eq!(f.shape, c.shape);
    assert_eq!(f.element_type, c.element_type);
    assert_eq!(f.endianness, c.endianness);
}

#[test]
fn key_order_in_the_dict_does_not_matter() {
    let header = from_slice(&frame(
        1,
        "{'shape': (2,), 'descr': '>i2', 'fortran_order': True}\n",
    ))
    .unwrap();
    assert_eq!(header.shape, vec![2]);
    assert_eq!(header.element_type, ElementType::Int16);
    assert_eq!(header.endianness, Endianness::Big);
    assert_eq!(header.order, Order::F);
}

#[test]
fn every_supported_dtype_end_to_end() {
    let cases = [
        ("|b1", ElementType::Bool, Endianness::NotApplicable),
        ("|i1", ElementType::Int8, Endianness::NotApplicable),
        ("<i2", ElementType::Int16, Endianness::Little),
        ("<i4", ElementType::Int32, Endianness::Little),
        ("<i8", ElementType::Int64, Endianness::Little),
        ("|u1", ElementType::UInt8, Endianness::NotApplicable),
        (">u2", ElementType::UInt16, Endianness::Big),
        (">u4", ElementType::UInt32, Endianness::Big),
        (">u8", ElementType::UInt64, Endianness::Big),
        ("<f4", ElementType::Float32, Endianness::Little),
        ("<f8", ElementType::Float64, Endianness::Little),
        ("=f16", ElementType::Float128, Endianness::Native),
        ("<c8", ElementType::Complex64, Endianness::Little),
        ("=c16", ElementType::Complex128, Endianness::Native),
    ];
    for (code, element_type, endianness) in cases {
        let text = format!(
            "{{'descr': '{}', 'fortran_order': False, 'shape': (2, 4), }}\n",
            code
        );
        let header = from_slice(&frame(1, &text)).unwrap();
        assert_eq!(header.element_type, element_type, "descr {}", code);
        assert_eq!(header.endianness, endianness, "descr {}", code);
    }
}

#[test]
fn shapes_across_ranks() {
    let cases: [(&str, &[usize]); 4] = [
        ("()", &[]),
        ("(1000,)", &[1000]),
        ("(2, 3, 4)", &[2, 3, 4]),
        ("(2, 3, 4, 5, 6)", &[2, 3, 4, 5, 6]),
    ];
    for (shape_text, expected) in cases {
        let text = format!(
            "{{'descr': '<i4', 'fortran_order': False, 'shape': {}, }}\n",
            shape_text
        );
        let header = from_slice(&frame(1, &text)).unwrap();
        assert_eq!(header.shape, expected, "shape {}", shape_text);
    }
}

#[test]
fn zero_extent_shapes() {
    for shape_text in ["(0,)", "(0, 5)", "(5, 0)", "(0, 0)", "(2, 0, 4)"] {
        let text = format!(
            "{{'descr': '<f8', 'fortran_order': False, 'shape': {}, }}\n",
            shape_text
        );
        let header = from_slice(&frame(1, &text)).unwrap();
        assert_eq!(header.num_elements(), Some(0), "shape {}", shape_text);
    }
}

#[test]
fn shape_without_trailing_comma_is_rejected_for_rank_one() {
    let text = "{'descr': '<f8', 'fortran_order': False, 'shape': (5), }\n";
    assert!(matches!(
        from_slice(&frame(1, text)),
        Err(Error::InvalidHeaderFormat(_))
    ));
}

#[test]
fn reader_stops_at_first_data_byte() {
    let mut file = frame(1, BASIC);
    file.extend_from_slice(&[0xAA; 16]);
    let mut cursor = Cursor::new(file.clone());
    from_reader(&mut cursor).unwrap();
    assert_eq!(cursor.position() as usize, file.len() - 16);
}

#[test]
fn render_round_trips_through_both_entry_points() {
    let header = Header {
        shape: vec![3, 4, 5],
        element_type: ElementType::Float32,
        endianness: Endianness::Little,
        order: Order::F,
    };
    let mut buffer = Vec::new();
    to_writer(&mut buffer, &header).unwrap();
    assert_eq!(buffer, to_vec(&header));
    assert_eq!(from_slice(&buffer).unwrap(), header);
    assert_eq!(from_reader(&mut Cursor::new(buffer)).unwrap(), header);
}

#[test]
fn header_serializes_with_serde() {
    let header = Header {
        shape: vec![3, 4],
        element_type: ElementType::Float64,
        endianness: Endianness::Little,
        order: Order::C,
    };
    let json = serde_json::to_string(&header).unwrap();
    let back: Header = serde_json::from_str(&json).unwrap();
    assert_eq!(back, header);
}

#[test]
fn error_display_is_stable_for_callers() {
    let err = from_slice(b"\x93NUMPY\x09\x00").unwrap_err();
    assert_eq!(err.to_string(), "unsupported npy format version 9.0");

    let err = from_slice(&frame(
        1,
        "{'fortran_order': False, 'shape': (3,), }\n",
    ))
    .unwrap_err();
    assert_eq!(err.to_string(), "missing required header key 'descr'");
}
