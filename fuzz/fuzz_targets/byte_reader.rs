#![no_main]

use bytestream::ByteReader;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = ByteReader::new(data);
    let mut idx = 0usize;

    // Use input bytes to drive a bounded sequence of operations.
    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 8;
        let arg = usize::from(data[idx].wrapping_mul(31));
        idx += 1;

        let before = reader.position();
        let ok = match op {
            0 => reader.read_u8().is_ok(),
            1 => reader.read_i16().is_ok(),
            2 => reader.read_u32_after(arg % 8).is_ok(),
            3 => reader.read_f64().is_ok(),
            4 => reader.read_bytes(arg).is_ok(),
            5 => reader.read_str(arg % 16).is_ok(),
            6 => reader.skip(arg).is_ok(),
            _ => reader.seek(arg).is_ok(),
        };
        if !ok {
            assert_eq!(reader.position(), before);
        }
        assert!(reader.position() <= data.len());
    }

    // Tagged values and tables reuse the same input as a value stream.
    let limits = protocol16::Limits::for_testing();
    let mut reader = ByteReader::new(data);
    let _ = protocol16::decode_parameter_table(&mut reader, &limits);
});
