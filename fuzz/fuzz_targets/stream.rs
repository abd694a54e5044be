//! Fuzz target for the streaming interface
//!
//! Splits one message across fuzzer-chosen chunk boundaries and checks the
//! output is identical to the one-shot path.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shroud_aead::aead::{AeadKey, ChaCha20Poly1305, Nonce, TAG_SIZE, Tag};

#[derive(Debug, Arbitrary)]
struct StreamInput {
    key: [u8; 32],
    nonce: [u8; 12],
    plaintext: Vec<u8>,
    aad: Vec<u8>,
    chunks: Vec<u8>,
}

fuzz_target!(|input: StreamInput| {
    let cipher = ChaCha20Poly1305::new(AeadKey::new(input.key));
    let nonce = Nonce::from_bytes(input.nonce);

    let one_shot = cipher
        .encrypt(&nonce, &input.plaintext, &input.aad)
        .unwrap();

    // Encrypt the same message across arbitrary chunk boundaries.
    let mut stream = cipher.encrypt_stream(&nonce);
    stream.update_aad(&input.aad).unwrap();
    let mut out = input.plaintext.clone();
    let mut pos = 0;
    for &step in &input.chunks {
        if pos == out.len() {
            break;
        }
        let take = (step as usize % (out.len() - pos)) + 1;
        stream.update_in_place(&mut out[pos..pos + take]).unwrap();
        pos += take;
    }
    stream.update_in_place(&mut out[pos..]).unwrap();
    let tag = stream.finalize();
    out.extend_from_slice(tag.as_bytes());
    assert_eq!(out, one_shot);

    // Streaming decrypt releases the original plaintext.
    let (ciphertext, tag_bytes) = one_shot.split_at(one_shot.len() - TAG_SIZE);
    let tag = Tag::from_slice(tag_bytes).unwrap();
    let mut open = cipher.decrypt_stream(&nonce);
    open.update_aad(&input.aad).unwrap();
    open.update(ciphertext).unwrap();
    assert_eq!(open.verify(&tag).unwrap(), input.plaintext);
});
