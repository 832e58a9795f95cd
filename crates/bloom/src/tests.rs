use super::*;
use std::io::Cursor;

// -------------------- Construction --------------------

#[test]
fn new_creates_valid_filter() {
    let bf = BloomFilter::new(8192, 4);
    assert_eq!(bf.num_bits(), 8192);
    assert_eq!(bf.num_hashes(), 4);
    assert_eq!(bf.bits.len(), 1024);
}

#[test]
#[should_panic(expected = "num_bits must be > 0")]
fn new_panics_on_zero_bits() {
    BloomFilter::new(0, 4);
}

#[test]
fn with_defaults_matches_spec_defaults() {
    let bf = BloomFilter::with_defaults();
    assert_eq!(bf.num_bits(), DEFAULT_NUM_BITS);
    assert_eq!(bf.num_hashes(), DEFAULT_NUM_HASHES);
}

// -------------------- Insert / Contains --------------------

#[test]
fn added_key_is_found() {
    let mut bf = BloomFilter::with_defaults();
    bf.add(b"hello");
    assert!(bf.might_contain(b"hello"));
}

#[test]
fn missing_key_is_not_found() {
    let bf = BloomFilter::with_defaults();
    assert!(!bf.might_contain(b"hello"));
}

#[test]
fn many_keys_all_found() {
    let mut bf = BloomFilter::with_defaults();
    for i in 0..1000u64 {
        bf.add(&i.to_le_bytes());
    }
    for i in 0..1000u64 {
        assert!(bf.might_contain(&i.to_le_bytes()), "key {} should be found", i);
    }
}

#[test]
fn false_positive_rate_is_bounded_at_default_fill() {
    // Scenario C: 1000 keys in an m=8192, k=4 filter.
    let mut bf = BloomFilter::with_defaults();
    for i in 0..1000u64 {
        bf.add(&i.to_le_bytes());
    }

    let mut false_positives = 0;
    let test_count = 1000u64;
    for i in 1000u64..(1000 + test_count) {
        if bf.might_contain(&i.to_le_bytes()) {
            false_positives += 1;
        }
    }

    let actual_fpr = false_positives as f64 / test_count as f64;
    // Theoretical FPR at m=8192, k=4, n=1000 is ~2.2%; bound with slack for
    // statistical variance in a single sample, not slack for a bug.
    assert!(actual_fpr < 0.04, "FPR too high: {:.4}", actual_fpr);
}

#[test]
fn empty_key() {
    let mut bf = BloomFilter::with_defaults();
    bf.add(b"");
    assert!(bf.might_contain(b""));
}

#[test]
fn binary_key() {
    let mut bf = BloomFilter::with_defaults();
    let key = vec![0u8, 1, 2, 255, 254, 253];
    bf.add(&key);
    assert!(bf.might_contain(&key));
}

// -------------------- Serialization --------------------

#[test]
fn roundtrip_serialize_deserialize() {
    let mut bf = BloomFilter::with_defaults();
    for i in 0..500u64 {
        bf.add(&i.to_le_bytes());
    }

    let mut buf = Vec::new();
    bf.write_to(&mut buf).unwrap();
    assert_eq!(buf.len(), bf.serialized_size());

    let mut cursor = Cursor::new(&buf);
    let bf2 = BloomFilter::read_from(&mut cursor).unwrap();

    assert_eq!(bf2.num_bits(), bf.num_bits());
    assert_eq!(bf2.num_hashes(), bf.num_hashes());
    assert_eq!(bf2.bits, bf.bits);

    for i in 0..500u64 {
        assert!(
            bf2.might_contain(&i.to_le_bytes()),
            "key {} missing after roundtrip",
            i
        );
    }
}

#[test]
fn serialized_size_is_correct() {
    let bf = BloomFilter::new(100, 5);
    // 4 (m) + 4 (k) + ceil(100/8) = 4 + 4 + 13
    assert_eq!(bf.serialized_size(), 8 + 13);
}

// -------------------- Debug --------------------

#[test]
fn debug_impl_works() {
    let bf = BloomFilter::with_defaults();
    let debug = format!("{:?}", bf);
    assert!(debug.contains("BloomFilter"));
    assert!(debug.contains("num_bits"));
}

// -------------------- Edge cases --------------------

#[test]
fn single_bit_alignment() {
    let bf = BloomFilter::new(1, 1);
    assert_eq!(bf.bits.len(), 1);
}

#[test]
fn odd_bit_count_rounds_up_to_whole_bytes() {
    let bf = BloomFilter::new(100, 3);
    assert_eq!(bf.bits.len(), 13); // ceil(100/8)
}
