//! Fuzz target for the one-shot and detached AEAD interfaces
//!
//! Checks that encrypt/decrypt roundtrip for arbitrary inputs and that the
//! detached layout agrees with the attached one.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shroud_aead::aead::{AeadKey, ChaCha20Poly1305, Nonce, XChaCha20Poly1305, XNonce};

#[derive(Debug, Arbitrary)]
struct AeadInput {
    key: [u8; 32],
    nonce: [u8; 12],
    xnonce: [u8; 24],
    plaintext: Vec<u8>,
    aad: Vec<u8>,
}

fuzz_target!(|input: AeadInput| {
    let cipher = ChaCha20Poly1305::new(AeadKey::new(input.key));
    let nonce = Nonce::from_bytes(input.nonce);

    // Fuzz-sized messages never hit the length limit, so sealing succeeds
    // and must roundtrip.
    let sealed = cipher
        .encrypt(&nonce, &input.plaintext, &input.aad)
        .unwrap();
    let opened = cipher.decrypt(&nonce, &sealed, &input.aad).unwrap();
    assert_eq!(opened, input.plaintext);

    // Detached output is the attached output split at the tag boundary.
    let mut buffer = input.plaintext.clone();
    let tag = cipher
        .encrypt_detached(&nonce, &mut buffer, &input.aad)
        .unwrap();
    assert_eq!(&sealed[..input.plaintext.len()], &buffer[..]);
    assert_eq!(&sealed[input.plaintext.len()..], tag.as_bytes());

    let xcipher = XChaCha20Poly1305::new(AeadKey::new(input.key));
    let xnonce = XNonce::from_bytes(input.xnonce);
    let sealed = xcipher
        .encrypt(&xnonce, &input.plaintext, &input.aad)
        .unwrap();
    let opened = xcipher.decrypt(&xnonce, &sealed, &input.aad).unwrap();
    assert_eq!(opened, input.plaintext);
});
