use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
use kyber_kem::{kyber_1024, kyber_512, kyber_768};
use rand_chacha::rand_core::SeedableRng;
use rand_core::RngCore;

// cargo flamegraph --test integration

// $ cargo test --release -- --nocapture --ignored
#[ignore]
#[test]
fn forever() {
    let mut i = 0u64;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    loop {
        let (ek, dk) = kyber_768::KG::try_keygen_with_rng(&mut rng).unwrap();
        let (ssk1, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();
        let ssk2 = dk.try_decaps(&ct).unwrap();
        assert_eq!(ssk1, ssk2);
        if i % 10000 == 0 {
            println!("So far i: {}", i)
        };
        i += 1;
    }
}


#[test]
fn test_512_rounds() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    for _i in 0..128 {
        let (ek, dk) = kyber_512::KG::try_keygen_with_rng(&mut rng).unwrap();
        let (ssk1, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();
        let ssk2 = dk.try_decaps(&ct).unwrap();
        assert_eq!(ssk1, ssk2)
    }
}

#[test]
fn test_768_rounds() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(456);
    for _i in 0..128 {
        let (ek, dk) = kyber_768::KG::try_keygen_with_rng(&mut rng).unwrap();
        let (ssk1, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();
        let ssk2 = dk.try_decaps(&ct).unwrap();
        assert_eq!(ssk1, ssk2)
    }
}

#[test]
fn test_1024_rounds() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(789);
    for _i in 0..128 {
        let (ek, dk) = kyber_1024::KG::try_keygen_with_rng(&mut rng).unwrap();
        let (ssk1, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();
        let ssk2 = dk.try_decaps(&ct).unwrap();
        assert_eq!(ssk1, ssk2)
    }
}

#[test]
fn test_768_implicit_rejection() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
    let (ek, dk) = kyber_768::KG::try_keygen_with_rng(&mut rng).unwrap();
    let (ssk1, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();

    // Any single-bit flip anywhere in the ciphertext must decapsulate without
    // error, but to a secret unrelated to the encapsulated one
    for i in [0, 1, 100, kyber_768::CT_LEN / 2, kyber_768::CT_LEN - 1] {
        let mut ct_bad = ct;
        ct_bad[i] ^= 0x08;
        let ssk2 = dk.try_decaps(&ct_bad).unwrap();
        assert_ne!(ssk1, ssk2);
    }

    // A rejected ciphertext must decapsulate deterministically
    let mut ct_bad = ct;
    ct_bad[7] ^= 0x01;
    let ssk2 = dk.try_decaps(&ct_bad).unwrap();
    let ssk3 = dk.try_decaps(&ct_bad).unwrap();
    assert_eq!(ssk2, ssk3);
}

#[test]
fn test_keygen_from_seed_determinism() {
    let d: [u8; 32] = hex::decode("0101010101010101010101010101010101010101010101010101010101010101")
        .unwrap()
        .try_into()
        .unwrap();
    let z: [u8; 32] = hex::decode("6262626262626262626262626262626262626262626262626262626262626262")
        .unwrap()
        .try_into()
        .unwrap();
    let (ek1, dk1) = kyber_512::KG::keygen_from_seed(&d, &z);
    let (ek2, dk2) = kyber_512::KG::keygen_from_seed(&d, &z);
    assert_eq!(ek1.into_bytes(), ek2.into_bytes());
    assert_eq!(dk1.into_bytes(), dk2.into_bytes());

    let (ek3, _) = kyber_512::KG::keygen_from_seed(&z, &d);
    assert_ne!(kyber_512::KG::keygen_from_seed(&d, &z).0.into_bytes(), ek3.into_bytes());
}

#[test]
fn test_768_zero_seed_scenario() {
    let d = [0u8; 32];
    let z = [0u8; 32];
    let (ek1, dk1) = kyber_768::KG::keygen_from_seed(&d, &z);
    let (ek2, dk2) = kyber_768::KG::keygen_from_seed(&d, &z);
    assert_eq!(ek1.clone().into_bytes(), ek2.into_bytes());
    assert_eq!(dk1.clone().into_bytes(), dk2.into_bytes());

    // the same entropy stream must reproduce the same ciphertext and secret
    let mut rng_a = rand_chacha::ChaCha8Rng::seed_from_u64(0);
    let mut rng_b = rand_chacha::ChaCha8Rng::seed_from_u64(0);
    let (ssk_a, ct_a) = ek1.try_encaps_with_rng(&mut rng_a).unwrap();
    let (ssk_b, ct_b) = ek2_roundtrip(&d, &z).try_encaps_with_rng(&mut rng_b).unwrap();
    assert_eq!(ct_a, ct_b);
    assert_eq!(ssk_a, ssk_b);
    assert_eq!(dk1.try_decaps(&ct_a).unwrap(), ssk_a);
}

fn ek2_roundtrip(d: &[u8; 32], z: &[u8; 32]) -> kyber_768::PublicKey {
    let (ek, _) = kyber_768::KG::keygen_from_seed(d, z);
    kyber_768::PublicKey::try_from_bytes(ek.into_bytes()).unwrap()
}

#[test]
fn test_serdes_roundtrip() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(31337);
    let (ek, dk) = kyber_1024::KG::try_keygen_with_rng(&mut rng).unwrap();
    let ek_bytes = ek.into_bytes();
    let dk_bytes = dk.into_bytes();

    let ek2 = kyber_1024::PublicKey::try_from_bytes(ek_bytes).unwrap();
    let dk2 = kyber_1024::PrivateKey::try_from_bytes(dk_bytes).unwrap();
    let (ssk1, ct) = ek2.try_encaps_with_rng(&mut rng).unwrap();
    let ssk2 = dk2.try_decaps(&ct).unwrap();
    assert_eq!(ssk1, ssk2);
}

#[test]
fn test_malformed_ek_rejected() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(2024);
    let (ek, _dk) = kyber_768::KG::try_keygen_with_rng(&mut rng).unwrap();
    let mut ek_bytes = ek.into_bytes();

    // Force the first 12-bit coefficient to 4095, well above the modulus
    ek_bytes[0] = 0xFF;
    ek_bytes[1] |= 0x0F;
    assert!(kyber_768::PublicKey::try_from_bytes(ek_bytes).is_err());
}

#[test]
fn test_malformed_dk_rejected() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(2025);
    let (_ek, dk) = kyber_768::KG::try_keygen_with_rng(&mut rng).unwrap();

    // Corrupt the stored hash of the encapsulation key
    let mut dk_bytes = dk.clone().into_bytes();
    dk_bytes[kyber_768::SK_LEN - 64] ^= 0x01;
    assert!(kyber_768::PrivateKey::try_from_bytes(dk_bytes).is_err());

    // Corrupt a decryption key coefficient so it is out of range
    let mut dk_bytes = dk.into_bytes();
    dk_bytes[0] = 0xFF;
    dk_bytes[1] |= 0x0F;
    assert!(kyber_768::PrivateKey::try_from_bytes(dk_bytes).is_err());
}

#[test]
fn test_cross_key_secrets_differ() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(777);
    let (ek_a, _dk_a) = kyber_512::KG::try_keygen_with_rng(&mut rng).unwrap();
    let (_ek_b, dk_b) = kyber_512::KG::try_keygen_with_rng(&mut rng).unwrap();
    let (ssk_a, ct) = ek_a.try_encaps_with_rng(&mut rng).unwrap();

    // Decapsulating under the wrong key hits the implicit rejection path
    let ssk_b = dk_b.try_decaps(&ct).unwrap();
    assert_ne!(ssk_a, ssk_b);
}

#[test]
fn test_shared_secret_bytes() {
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(888);
    let (ek, dk) = kyber_768::KG::try_keygen_with_rng(&mut rng).unwrap();
    let (ssk1, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();
    let ssk2 = dk.try_decaps(&ct).unwrap();
    assert_eq!(ssk1.into_bytes(), ssk2.into_bytes());
    assert_eq!(kyber_kem::SharedSecretKey::LEN, 32);
}

#[test]
fn test_with_os_entropy() {
    let mut rng = rand::rngs::OsRng;
    let mut spot_check = 0u32;
    for _i in 0..8 {
        let (ek, dk) = kyber_768::KG::try_keygen_with_rng(&mut rng).unwrap();
        let (ssk1, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();
        let ssk2 = dk.try_decaps(&ct).unwrap();
        assert_eq!(ssk1, ssk2);
        spot_check |= u32::from(ct[rng.next_u32() as usize % kyber_768::CT_LEN]);
    }
    assert!(spot_check > 0); // ciphertexts are never all zero
}
