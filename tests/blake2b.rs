use hex_literal::hex;
use memhard::hash::{blake2b, blake2b_long, Blake2b};

#[test]
fn blake2b_512_empty_input() {
    // RFC 7693 reference implementation, BLAKE2b-512("")
    let expected = hex!(
        "786a02f742015903c6c6fd852552d272912f4740e15847618a86e217f71f5419"
        "d25e1031afee585313896444934eb04b903a685b1448b755d56f701afe9be2ce"
    );
    assert_eq!(blake2b(64, b""), expected);
}

#[test]
fn blake2b_512_abc() {
    // RFC 7693 Appendix A
    let expected = hex!(
        "ba80a53f981c4d0d6a2797b69f12f6e94c212f14685ac4b74b12bb6fdbffa2d1"
        "7d87c5392aab792dc252d5de4533cc9518d38aa8dbf1925ab92386edd4009923"
    );
    assert_eq!(blake2b(64, b"abc"), expected);
}

#[test]
fn blake2b_256_empty_input() {
    let expected = hex!("0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8");
    assert_eq!(blake2b(32, b""), expected);
}

#[test]
fn streaming_matches_one_shot() {
    let data = [0x5au8; 300];

    let mut hasher = Blake2b::new(64);
    hasher.update(&data[..1]);
    hasher.update(&data[1..127]);
    hasher.update(&data[127..128]);
    hasher.update(&data[128..]);
    let mut streamed = [0u8; 64];
    hasher.finalize_into(&mut streamed);

    assert_eq!(blake2b(64, &data), streamed);
}

#[test]
fn matches_blake2_crate_across_lengths() {
    use blake2::digest::{Update, VariableOutput};
    use blake2::Blake2bVar;

    // Input lengths straddling the 128-byte block boundary, digest
    // lengths covering the whole supported range.
    let inputs: Vec<Vec<u8>> = [0usize, 1, 64, 127, 128, 129, 255, 256, 1000]
        .iter()
        .map(|&len| (0..len).map(|i| i as u8).collect())
        .collect();

    for input in &inputs {
        for out_len in [1usize, 4, 20, 32, 48, 63, 64] {
            let mut reference = Blake2bVar::new(out_len).unwrap();
            reference.update(input);
            let mut expected = vec![0u8; out_len];
            reference.finalize_variable(&mut expected).unwrap();

            assert_eq!(
                blake2b(out_len, input),
                expected,
                "input len {} digest len {}",
                input.len(),
                out_len
            );
        }
    }
}

#[test]
fn long_hash_short_outputs_are_prefixed_digests() {
    // H'(n, x) = BLAKE2b(n, LE32(n) || x) whenever n fits in one digest
    let input = b"some input material";

    for out_len in [4usize, 16, 32, 64] {
        let mut prefixed = (out_len as u32).to_le_bytes().to_vec();
        prefixed.extend_from_slice(input);
        assert_eq!(blake2b_long(out_len, input), blake2b(out_len, &prefixed));
    }
}

#[test]
fn long_hash_produces_requested_lengths() {
    for out_len in [65usize, 72, 96, 128, 1024] {
        let out = blake2b_long(out_len, b"stretch me");
        assert_eq!(out.len(), out_len);
    }
}

#[test]
fn long_hash_is_deterministic_and_input_sensitive() {
    let a = blake2b_long(1024, b"input a");
    let b = blake2b_long(1024, b"input a");
    let c = blake2b_long(1024, b"input b");

    assert_eq!(a, b);
    assert_ne!(a, c);

    // the emitted chain halves must not repeat
    assert_ne!(a[..32], a[32..64]);
}

#[test]
fn long_hash_differs_by_length() {
    // The requested length is hashed into the first link, so a longer
    // output is not an extension of a shorter one.
    let short = blake2b_long(64, b"material");
    let long = blake2b_long(128, b"material");
    assert_ne!(short[..], long[..64]);
}
