//! Property-based tests for the AEAD construction
//!
//! Uses proptest to verify invariants across large input spaces.

use proptest::prelude::*;

// ============================================================================
// One-Shot AEAD Properties
// ============================================================================

mod aead_properties {
    use super::*;
    use shroud_aead::aead::{AeadKey, ChaCha20Poly1305, Nonce, XChaCha20Poly1305, XNonce};

    proptest! {
        /// AEAD roundtrip: encrypt then decrypt should recover plaintext
        #[test]
        fn aead_roundtrip(
            key_bytes in any::<[u8; 32]>(),
            nonce_bytes in any::<[u8; 12]>(),
            plaintext in prop::collection::vec(any::<u8>(), 0..1024),
            aad in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            let cipher = ChaCha20Poly1305::new(AeadKey::new(key_bytes));
            let nonce = Nonce::from_bytes(nonce_bytes);

            let ciphertext = cipher.encrypt(&nonce, &plaintext, &aad)
                .expect("Encryption should succeed");

            let decrypted = cipher.decrypt(&nonce, &ciphertext, &aad)
                .expect("Decryption should succeed");

            prop_assert_eq!(decrypted, plaintext);
        }

        /// XChaCha roundtrip with the extended 192-bit nonce
        #[test]
        fn xchacha_roundtrip(
            key_bytes in any::<[u8; 32]>(),
            nonce_bytes in any::<[u8; 24]>(),
            plaintext in prop::collection::vec(any::<u8>(), 0..1024),
            aad in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            let cipher = XChaCha20Poly1305::new(AeadKey::new(key_bytes));
            let nonce = XNonce::from_bytes(nonce_bytes);

            let ciphertext = cipher.encrypt(&nonce, &plaintext, &aad).unwrap();
            let decrypted = cipher.decrypt(&nonce, &ciphertext, &aad).unwrap();

            prop_assert_eq!(decrypted, plaintext);
        }

        /// Ciphertext is larger than plaintext (includes auth tag)
        #[test]
        fn ciphertext_size(
            key_bytes in any::<[u8; 32]>(),
            nonce_bytes in any::<[u8; 12]>(),
            plaintext in prop::collection::vec(any::<u8>(), 0..1024),
        ) {
            let cipher = ChaCha20Poly1305::new(AeadKey::new(key_bytes));
            let nonce = Nonce::from_bytes(nonce_bytes);

            let ciphertext = cipher.encrypt(&nonce, &plaintext, b"").unwrap();

            // Ciphertext should be plaintext + 16 byte auth tag
            prop_assert_eq!(ciphertext.len(), plaintext.len() + 16);
        }

        /// Flipping any single bit in the sealed message breaks authentication
        #[test]
        fn any_bit_flip_rejected(
            key_bytes in any::<[u8; 32]>(),
            nonce_bytes in any::<[u8; 12]>(),
            plaintext in prop::collection::vec(any::<u8>(), 0..256),
            byte_index in any::<u16>(),
            bit in 0u8..8,
        ) {
            let cipher = ChaCha20Poly1305::new(AeadKey::new(key_bytes));
            let nonce = Nonce::from_bytes(nonce_bytes);

            let mut sealed = cipher.encrypt(&nonce, &plaintext, b"").unwrap();
            let index = byte_index as usize % sealed.len();
            sealed[index] ^= 1 << bit;

            prop_assert!(
                cipher.decrypt(&nonce, &sealed, b"").is_err(),
                "Flipping byte {} bit {} should break authentication",
                index,
                bit
            );
        }

        /// Decryption with a different key fails
        #[test]
        fn wrong_key_decryption_fails(
            key1_bytes in any::<[u8; 32]>(),
            key2_bytes in any::<[u8; 32]>(),
            nonce_bytes in any::<[u8; 12]>(),
            plaintext in prop::collection::vec(any::<u8>(), 1..64),
        ) {
            prop_assume!(key1_bytes != key2_bytes);

            let nonce = Nonce::from_bytes(nonce_bytes);
            let ciphertext = ChaCha20Poly1305::new(AeadKey::new(key1_bytes))
                .encrypt(&nonce, &plaintext, b"")
                .unwrap();

            prop_assert!(
                ChaCha20Poly1305::new(AeadKey::new(key2_bytes))
                    .decrypt(&nonce, &ciphertext, b"")
                    .is_err(),
                "Decryption with wrong key should fail"
            );
        }

        /// Decryption under a different nonce fails
        #[test]
        fn wrong_nonce_decryption_fails(
            key_bytes in any::<[u8; 32]>(),
            nonce1_bytes in any::<[u8; 12]>(),
            nonce2_bytes in any::<[u8; 12]>(),
            plaintext in prop::collection::vec(any::<u8>(), 1..64),
        ) {
            prop_assume!(nonce1_bytes != nonce2_bytes);

            let cipher = ChaCha20Poly1305::new(AeadKey::new(key_bytes));
            let ciphertext = cipher
                .encrypt(&Nonce::from_bytes(nonce1_bytes), &plaintext, b"")
                .unwrap();

            prop_assert!(
                cipher
                    .decrypt(&Nonce::from_bytes(nonce2_bytes), &ciphertext, b"")
                    .is_err(),
                "Decryption under wrong nonce should fail"
            );
        }

        /// Decryption with different associated data fails
        #[test]
        fn wrong_aad_decryption_fails(
            key_bytes in any::<[u8; 32]>(),
            nonce_bytes in any::<[u8; 12]>(),
            plaintext in prop::collection::vec(any::<u8>(), 0..64),
            aad1 in prop::collection::vec(any::<u8>(), 0..64),
            aad2 in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            prop_assume!(aad1 != aad2);

            let cipher = ChaCha20Poly1305::new(AeadKey::new(key_bytes));
            let nonce = Nonce::from_bytes(nonce_bytes);

            let ciphertext = cipher.encrypt(&nonce, &plaintext, &aad1).unwrap();

            prop_assert!(
                cipher.decrypt(&nonce, &ciphertext, &aad2).is_err(),
                "Decryption with wrong AAD should fail"
            );
        }
    }
}

// ============================================================================
// Streaming and Detached Properties
// ============================================================================

mod stream_properties {
    use super::*;
    use shroud_aead::aead::{AeadKey, ChaCha20Poly1305, Nonce, Tag};

    proptest! {
        /// Streaming encryption matches one-shot for any chunk boundaries
        #[test]
        fn stream_encrypt_matches_one_shot(
            key_bytes in any::<[u8; 32]>(),
            nonce_bytes in any::<[u8; 12]>(),
            plaintext in prop::collection::vec(any::<u8>(), 0..1024),
            aad in prop::collection::vec(any::<u8>(), 0..64),
            aad_cut in any::<u16>(),
            data_cut in any::<u16>(),
        ) {
            let cipher = ChaCha20Poly1305::new(AeadKey::new(key_bytes));
            let nonce = Nonce::from_bytes(nonce_bytes);

            let one_shot = cipher.encrypt(&nonce, &plaintext, &aad).unwrap();

            let aad_cut = aad_cut as usize % (aad.len() + 1);
            let data_cut = data_cut as usize % (plaintext.len() + 1);

            let mut stream = cipher.encrypt_stream(&nonce);
            stream.update_aad(&aad[..aad_cut]).unwrap();
            stream.update_aad(&aad[aad_cut..]).unwrap();

            let mut streamed = plaintext.clone();
            stream.update_in_place(&mut streamed[..data_cut]).unwrap();
            stream.update_in_place(&mut streamed[data_cut..]).unwrap();
            let tag = stream.finalize();
            streamed.extend_from_slice(tag.as_bytes());

            prop_assert_eq!(streamed, one_shot);
        }

        /// Streaming decryption recovers the plaintext for any chunk size
        #[test]
        fn stream_decrypt_roundtrip(
            key_bytes in any::<[u8; 32]>(),
            nonce_bytes in any::<[u8; 12]>(),
            plaintext in prop::collection::vec(any::<u8>(), 0..1024),
            aad in prop::collection::vec(any::<u8>(), 0..64),
            chunk in 1usize..257,
        ) {
            let cipher = ChaCha20Poly1305::new(AeadKey::new(key_bytes));
            let nonce = Nonce::from_bytes(nonce_bytes);

            let sealed = cipher.encrypt(&nonce, &plaintext, &aad).unwrap();
            let (ciphertext, tag_bytes) = sealed.split_at(sealed.len() - 16);
            let tag = Tag::from_slice(tag_bytes).unwrap();

            let mut stream = cipher.decrypt_stream(&nonce);
            stream.update_aad(&aad).unwrap();
            for piece in ciphertext.chunks(chunk) {
                stream.update(piece).unwrap();
            }
            let recovered = stream.verify(&tag).unwrap();

            prop_assert_eq!(recovered, plaintext);
        }

        /// Detached mode produces the same bytes as attached mode
        #[test]
        fn detached_matches_attached(
            key_bytes in any::<[u8; 32]>(),
            nonce_bytes in any::<[u8; 12]>(),
            plaintext in prop::collection::vec(any::<u8>(), 0..512),
            aad in prop::collection::vec(any::<u8>(), 0..64),
        ) {
            let cipher = ChaCha20Poly1305::new(AeadKey::new(key_bytes));
            let nonce = Nonce::from_bytes(nonce_bytes);

            let attached = cipher.encrypt(&nonce, &plaintext, &aad).unwrap();

            let mut buffer = plaintext.clone();
            let tag = cipher.encrypt_detached(&nonce, &mut buffer, &aad).unwrap();

            prop_assert_eq!(&attached[..plaintext.len()], &buffer[..]);
            prop_assert_eq!(&attached[plaintext.len()..], tag.as_bytes());

            cipher.decrypt_detached(&nonce, &mut buffer, &tag, &aad).unwrap();
            prop_assert_eq!(buffer, plaintext);
        }

        /// Truncated tags roundtrip at every permitted length
        #[test]
        fn truncated_tag_roundtrip(
            key_bytes in any::<[u8; 32]>(),
            nonce_bytes in any::<[u8; 12]>(),
            plaintext in prop::collection::vec(any::<u8>(), 0..256),
            tag_len in 1usize..=16,
        ) {
            let cipher = ChaCha20Poly1305::new(AeadKey::new(key_bytes));
            let nonce = Nonce::from_bytes(nonce_bytes);

            let mut stream = cipher.encrypt_stream(&nonce);
            let mut ciphertext = plaintext.clone();
            stream.update_in_place(&mut ciphertext).unwrap();
            let mut short = vec![0u8; tag_len];
            stream.finalize_truncated(&mut short).unwrap();

            let mut open = cipher.decrypt_stream(&nonce);
            open.update(&ciphertext).unwrap();
            let recovered = open.verify_truncated(&short).unwrap();

            prop_assert_eq!(recovered, plaintext);
        }
    }
}

// ============================================================================
// One-Time MAC Properties
// ============================================================================

mod mac_properties {
    use super::*;
    use shroud_aead::mac::OneTimeMac;

    proptest! {
        /// The tag does not depend on how the input is chunked
        #[test]
        fn chunking_does_not_change_tag(
            key in any::<[u8; 32]>(),
            data in prop::collection::vec(any::<u8>(), 0..512),
            split in any::<u16>(),
        ) {
            let split = split as usize % (data.len() + 1);

            let mut one_shot = OneTimeMac::new(&key);
            one_shot.update(&data);

            let mut split_mac = OneTimeMac::new(&key);
            split_mac.update(&data[..split]);
            split_mac.update(&data[split..]);

            prop_assert_eq!(one_shot.finalize(), split_mac.finalize());
        }

        /// Modifying the message changes the tag (with high probability)
        #[test]
        fn modified_message_changes_tag(
            key in any::<[u8; 32]>(),
            data in prop::collection::vec(any::<u8>(), 1..256),
            index in any::<u16>(),
            flip in 1u8..=255,
        ) {
            let index = index as usize % data.len();
            let mut modified = data.clone();
            modified[index] ^= flip;

            let mut mac1 = OneTimeMac::new(&key);
            mac1.update(&data);

            let mut mac2 = OneTimeMac::new(&key);
            mac2.update(&modified);

            prop_assert_ne!(
                mac1.finalize(),
                mac2.finalize(),
                "Corrupting byte {} should change the tag",
                index
            );
        }
    }
}
