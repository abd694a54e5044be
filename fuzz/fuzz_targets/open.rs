//! Fuzz target for decryption of hostile input
//!
//! Arbitrary bytes fed to the open paths must be rejected or decrypted
//! cleanly, never panic, and a failed detached open must leave the buffer
//! untouched.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shroud_aead::aead::{AeadKey, ChaCha20Poly1305, Nonce, TAG_SIZE, Tag};

#[derive(Debug, Arbitrary)]
struct OpenInput {
    key: [u8; 32],
    nonce: [u8; 12],
    sealed: Vec<u8>,
    aad: Vec<u8>,
}

fuzz_target!(|input: OpenInput| {
    let cipher = ChaCha20Poly1305::new(AeadKey::new(input.key));
    let nonce = Nonce::from_bytes(input.nonce);

    // Attached open of arbitrary bytes - should never panic
    let _ = cipher.decrypt(&nonce, &input.sealed, &input.aad);

    // Detached open with a fuzzer-chosen tag
    if input.sealed.len() >= TAG_SIZE {
        let (ct, tag_bytes) = input.sealed.split_at(input.sealed.len() - TAG_SIZE);
        let tag = Tag::from_slice(tag_bytes).unwrap();

        let mut buffer = ct.to_vec();
        let before = buffer.clone();
        if cipher
            .decrypt_detached(&nonce, &mut buffer, &tag, &input.aad)
            .is_err()
        {
            assert_eq!(buffer, before);
        }
    }

    // Streaming open of the same bytes
    let mut stream = cipher.decrypt_stream(&nonce);
    stream.update_aad(&input.aad).unwrap();
    stream.update(&input.sealed).unwrap();
    let _ = stream.verify(&Tag::from_bytes([0u8; TAG_SIZE]));
});
