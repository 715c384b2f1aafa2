#![no_std]
#![deny(clippy::pedantic, warnings, missing_docs, unsafe_code)]
// Almost all of the 'allow' category...
#![deny(absolute_paths_not_starting_with_crate, dead_code)]
#![deny(elided_lifetimes_in_paths, explicit_outlives_requirements, keyword_idents)]
#![deny(let_underscore_drop, macro_use_extern_crate, meta_variable_misuse, missing_abi)]
#![deny(non_ascii_idents, rust_2021_incompatible_closure_captures)]
#![deny(rust_2021_incompatible_or_patterns, rust_2021_prefixes_incompatible_syntax)]
#![deny(rust_2021_prelude_collisions, single_use_lifetimes, trivial_casts)]
#![deny(trivial_numeric_casts, unreachable_pub, unsafe_op_in_unsafe_fn, unstable_features)]
#![deny(unused_extern_crates, unused_import_braces, unused_lifetimes, unused_macro_rules)]
#![deny(unused_qualifications, unused_results, variant_size_differences)]
//
#![doc = include_str!("../README.md")]


// Implements the CRYSTALS-Kyber key encapsulation mechanism, round 3 submission.
// See <https://pq-crystals.org/kyber/data/kyber-specification-round3-20210804.pdf>

// Functionality map per the round-3 specification
//
// Algorithm 1 Parse: B^* -> R_q on page 7                  --> sampling.rs
// Algorithm 2 CBD_eta: B^{64eta} -> R_q on page 8          --> sampling.rs
// Algorithm 3 Decode_l: B^{32l} -> R_q on page 8           --> byte_fns.rs
// Compress_d / Decompress_d on page 5                      --> byte_fns.rs
// Algorithm 4 Kyber.CPAPKE.KeyGen() on page 9              --> k_pke.rs
// Algorithm 5 Kyber.CPAPKE.Enc(pk,m,r) on page 9           --> k_pke.rs
// Algorithm 6 Kyber.CPAPKE.Dec(sk,c) on page 10            --> k_pke.rs
// Algorithm 7 Kyber.CCAKEM.KeyGen() on page 10             --> kyber.rs
// Algorithm 8 Kyber.CCAKEM.Enc(pk) on page 10              --> kyber.rs
// Algorithm 9 Kyber.CCAKEM.Dec(c,sk) on page 10            --> kyber.rs
// NTT and NTT^-1 on page 6                                 --> ntt.rs
// Types are in types.rs, traits are in traits.rs...

// Note that debug_assert! statements enforce correct program construction and are not involved
// in any operational dataflow (so are good fuzz targets). The ensure! statements implement
// conservative dataflow validation and do not panic. Separately, functions are only generic
// over security parameters that are directly involved in memory allocation (on the stack);
// the small parameters eta1, eta2, du and dv travel as runtime arguments.

/// The `rand_core` types are re-exported so that users of this crate do not
/// have to worry about using the exact correct version of `rand_core`.
pub use rand_core::{CryptoRng, Error as RngError, RngCore};

mod byte_fns;
mod hashing;
mod helpers;
mod k_pke;
mod kyber;
mod ntt;
mod sampling;
mod types;

/// All functionality is covered by traits, such that consumers can utilize trait objects as desired.
pub mod traits;
pub use crate::types::SharedSecretKey;

// Applies across all security parameter sets
const Q: i16 = 3329; // 13 * 2^8 + 1; page 5 table 1
const ZETA: i16 = 17; // smallest 256-th primitive root of unity mod q


// This common functionality is injected into each security parameter set namespace, and is
// largely a lightweight wrapper into the k_pke and kyber functions.
macro_rules! functionality {
    () => {
        use crate::kyber;
        use crate::traits::{Decaps, Encaps, KeyGen, SerDes};
        use rand_core::CryptoRngCore;
        use zeroize::{Zeroize, ZeroizeOnDrop};


        // ----- 'EXTERNAL' DATA TYPES -----

        /// Empty struct to enable `KeyGen` trait objects across security parameter
        /// sets. Implements the [`crate::traits::KeyGen`] trait.
        #[derive(Zeroize, ZeroizeOnDrop)]
        pub struct KG();


        /// Encapsulation key specific to the target security parameter set.
        ///
        /// Implements the [`crate::traits::Encaps`] and [`crate::traits::SerDes`] traits.
        // Note: #[derive(Zeroize, ZeroizeOnDrop)] is implemented on the underlying struct.
        pub type PublicKey = crate::types::PublicKey<PK_LEN>;


        /// Decapsulation key specific to the target security parameter set.
        ///
        /// Implements the [`crate::traits::Decaps`] and [`crate::traits::SerDes`] traits.
        // Note: #[derive(Zeroize, ZeroizeOnDrop)] is implemented on the underlying struct.
        pub type PrivateKey = crate::types::PrivateKey<SK_LEN>;


        /// The shared secret key produced by encapsulation and decapsulation.
        pub use crate::types::SharedSecretKey;

        // Note: (public) CipherText is just a vanilla fixed-size byte array


        // ----- PRIMARY FUNCTIONS ---

        /// # Algorithm 7: `Kyber.CCAKEM.KeyGen()` on page 10.
        /// Generates an encapsulation and decapsulation key pair specific to this security
        /// parameter set.
        ///
        /// This function utilizes the **default OS** random number generator.
        ///
        /// **Output**: Encapsulation key struct and decapsulation key struct.
        ///
        /// # Errors
        /// Returns an error if the random number generator fails.
        ///
        /// # Examples
        /// ```rust
        /// # use std::error::Error;
        /// # fn main() -> Result<(), Box<dyn Error>> {
        /// # #[cfg(all(feature = "kyber-768", feature = "default-rng"))] {
        /// use kyber_kem::kyber_768; // Could also be kyber_512 or kyber_1024.
        /// use kyber_kem::traits::{Decaps, Encaps, SerDes};
        ///
        /// let (ek, dk) = kyber_768::try_keygen()?; // Generate both encaps and decaps keys
        /// let (ssk1, ct) = ek.try_encaps()?; // Generate a shared secret and ciphertext
        /// let ssk2 = dk.try_decaps(&ct)?; // Recover the shared secret
        /// assert_eq!(ssk1, ssk2);
        /// # }
        /// # Ok(())}
        /// ```
        #[cfg(feature = "default-rng")]
        pub fn try_keygen() -> Result<(PublicKey, PrivateKey), &'static str> { KG::try_keygen() }


        /// # Algorithm 7: `Kyber.CCAKEM.KeyGen()` on page 10.
        /// Generates an encapsulation and decapsulation key pair specific to this security
        /// parameter set.
        ///
        /// This function utilizes the **provided** random number generator.
        ///
        /// **Output**: Encapsulation key struct and decapsulation key struct.
        ///
        /// # Errors
        /// Returns an error if the random number generator fails.
        ///
        /// # Examples
        /// ```rust
        /// # use std::error::Error;
        /// # fn main() -> Result<(), Box<dyn Error>> {
        /// # #[cfg(feature = "kyber-768")] {
        /// use kyber_kem::kyber_768; // Could also be kyber_512 or kyber_1024.
        /// use kyber_kem::traits::{Decaps, Encaps, SerDes};
        /// use rand_chacha::rand_core::SeedableRng;
        ///
        /// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        ///
        /// let (ek, dk) = kyber_768::try_keygen_with_rng(&mut rng)?;
        /// let (ssk1, ct) = ek.try_encaps_with_rng(&mut rng)?;
        /// let ssk2 = dk.try_decaps(&ct)?;
        /// assert_eq!(ssk1, ssk2);
        /// # }
        /// # Ok(())}
        /// ```
        pub fn try_keygen_with_rng(rng: &mut impl CryptoRngCore) -> Result<(PublicKey, PrivateKey), &'static str> {
            KG::try_keygen_with_rng(rng)
        }


        impl KeyGen for KG {
            type PrivateKey = PrivateKey;
            type PublicKey = PublicKey;


            /// # Algorithm 7 in `KeyGen` trait
            fn try_keygen_with_rng(rng: &mut impl CryptoRngCore) -> Result<(PublicKey, PrivateKey), &'static str> {
                let (ek, dk) = kyber::key_gen::<K, PK_LEN, SK_LEN>(rng, ETA1)?;
                Ok((ek, dk))
            }

            /// # Algorithm 7 in `KeyGen` trait, deterministic portion
            fn keygen_from_seed(d: &[u8; 32], z: &[u8; 32]) -> (Self::PublicKey, Self::PrivateKey) {
                kyber::key_gen_from_seed::<K, PK_LEN, SK_LEN>(d, z, ETA1)
            }
        }


        impl Encaps for PublicKey {
            type CipherText = [u8; CT_LEN];
            type SharedSecretKey = SharedSecretKey;

            /// # Algorithm 8: `Kyber.CCAKEM.Enc(pk)` on page 10.
            /// Generates a fresh 32-byte shared secret and the ciphertext transporting it.
            ///
            /// **Input**:  Implemented on the encapsulation key struct. <br>
            /// **Output**: Shared secret key struct and ciphertext byte array.
            ///
            /// # Errors
            /// Returns an error when the random number generator fails; propagates internal errors.
            fn try_encaps_with_rng(
                &self, rng: &mut impl CryptoRngCore,
            ) -> Result<(Self::SharedSecretKey, Self::CipherText), &'static str> {
                kyber::encaps::<K, CT_LEN>(rng, DU, DV, ETA1, ETA2, &self.0)
            }
        }


        impl Decaps for PrivateKey {
            type CipherText = [u8; CT_LEN];
            type SharedSecretKey = SharedSecretKey;

            /// # Algorithm 9: `Kyber.CCAKEM.Dec(c, sk)` on page 10.
            /// Recovers the shared secret from a ciphertext; implicit rejection substitutes a
            /// pseudorandom secret for a ciphertext that fails the re-encryption check.
            ///
            /// **Input**:  Implemented on the decapsulation key struct,
            ///             ciphertext byte array. <br>
            /// **Output**: Shared secret key struct.
            ///
            /// # Errors
            /// Propagates internal errors; a mismatched ciphertext is not an error.
            fn try_decaps(&self, ct: &Self::CipherText) -> Result<Self::SharedSecretKey, &'static str> {
                kyber::decaps::<K, CT_LEN>(DU, DV, ETA1, ETA2, &self.0, ct)
            }
        }


        // ----- SERIALIZATION AND DESERIALIZATION ---

        impl SerDes for PublicKey {
            type ByteArray = [u8; PK_LEN];


            fn try_from_bytes(ek: Self::ByteArray) -> Result<Self, &'static str> {
                kyber::validate_ek::<K>(&ek)?;
                Ok(crate::types::PublicKey(ek))
            }


            fn into_bytes(self) -> Self::ByteArray { self.0 }
        }


        impl SerDes for PrivateKey {
            type ByteArray = [u8; SK_LEN];


            fn try_from_bytes(dk: Self::ByteArray) -> Result<Self, &'static str> {
                kyber::validate_dk::<K>(&dk)?;
                Ok(crate::types::PrivateKey(dk))
            }


            fn into_bytes(self) -> Self::ByteArray { self.0 }
        }


        #[cfg(test)]
        mod tests {
            use super::*;
            use rand_chacha::rand_core::SeedableRng;

            #[test]
            fn smoke_test() {
                let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);

                for _i in 0..16 {
                    let (ek, dk) = try_keygen_with_rng(&mut rng).unwrap();
                    let (ssk1, ct) = ek.try_encaps_with_rng(&mut rng).unwrap();
                    let ssk2 = dk.try_decaps(&ct).unwrap();
                    assert_eq!(ssk1, ssk2);

                    let mut bad_ct = ct;
                    bad_ct[0] ^= 0x80;
                    let ssk3 = dk.try_decaps(&bad_ct).unwrap();
                    assert_ne!(ssk2, ssk3);
                }

                let (ek1, dk1) = KG::keygen_from_seed(&[0x11u8; 32], &[0x22u8; 32]);
                let (ek2, dk2) = KG::keygen_from_seed(&[0x11u8; 32], &[0x22u8; 32]);
                assert_eq!(ek1.clone().into_bytes(), ek2.into_bytes());
                assert_eq!(dk1.clone().into_bytes(), dk2.into_bytes());

                let ek3 = PublicKey::try_from_bytes(ek1.clone().into_bytes()).unwrap();
                let dk3 = PrivateKey::try_from_bytes(dk1.clone().into_bytes()).unwrap();
                let mut rng2 = rand_chacha::ChaCha8Rng::seed_from_u64(456);
                let (ssk1, ct) = ek3.try_encaps_with_rng(&mut rng2).unwrap();
                assert_eq!(ssk1, dk3.try_decaps(&ct).unwrap());
            }
        }
    };
}


/// # Functionality for the **Kyber-512** security parameter set.
///
/// This includes specific sizes for the encapsulation key, decapsulation key, and
/// ciphertext along with a number of internal constants. The Kyber-512 parameter set
/// is claimed to be in security strength category 1.
///
/// **1)** The basic usage is for an originator to start with the [`kyber_512::try_keygen`] function below to
/// generate both [`kyber_512::PublicKey`] and [`kyber_512::PrivateKey`] structs. The resulting
/// [`kyber_512::PublicKey`] struct implements the [`traits::Encaps`] trait which supplies
/// [`traits::Encaps::try_encaps()`] to generate a shared secret and its transporting ciphertext.
///
/// **2)** Both of the `PrivateKey` and `PublicKey` structs implement the [`traits::SerDes`] trait.
/// The originator utilizes the [`traits::SerDes::into_bytes()`] functions to serialize the structs
/// into byte-arrays for storage and/or transmission, similar to the ciphertext. Upon retrieval and/or
/// receipt, the remote party utilizes the [`traits::SerDes::try_from_bytes()`] functions to deserialize
/// the byte-arrays into structs.
///
/// **3)** Finally, the remote party uses the [`traits::Decaps::try_decaps()`] function implemented on the
/// [`kyber_512::PrivateKey`] struct to recover the identical shared secret from the ciphertext.
///
/// See the top-level [crate] documentation for example code that implements the above flow.
#[cfg(feature = "kyber-512")]
pub mod kyber_512 {
    const K: usize = 2;
    const ETA1: usize = 3;
    const ETA2: usize = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;
    /// Private (secret) key length in bytes.
    pub const SK_LEN: usize = 1632;
    /// Public key length in bytes.
    pub const PK_LEN: usize = 800;
    /// Ciphertext length in bytes.
    pub const CT_LEN: usize = 768;

    functionality!();
}


/// # Functionality for the **Kyber-768** security parameter set.
///
/// This includes specific sizes for the encapsulation key, decapsulation key, and
/// ciphertext along with a number of internal constants. The Kyber-768 parameter set
/// is claimed to be in security strength category 3.
///
/// **1)** The basic usage is for an originator to start with the [`kyber_768::try_keygen`] function below to
/// generate both [`kyber_768::PublicKey`] and [`kyber_768::PrivateKey`] structs. The resulting
/// [`kyber_768::PublicKey`] struct implements the [`traits::Encaps`] trait which supplies
/// [`traits::Encaps::try_encaps()`] to generate a shared secret and its transporting ciphertext.
///
/// **2)** Both of the `PrivateKey` and `PublicKey` structs implement the [`traits::SerDes`] trait.
/// The originator utilizes the [`traits::SerDes::into_bytes()`] functions to serialize the structs
/// into byte-arrays for storage and/or transmission, similar to the ciphertext. Upon retrieval and/or
/// receipt, the remote party utilizes the [`traits::SerDes::try_from_bytes()`] functions to deserialize
/// the byte-arrays into structs.
///
/// **3)** Finally, the remote party uses the [`traits::Decaps::try_decaps()`] function implemented on the
/// [`kyber_768::PrivateKey`] struct to recover the identical shared secret from the ciphertext.
///
/// See the top-level [crate] documentation for example code that implements the above flow.
#[cfg(feature = "kyber-768")]
pub mod kyber_768 {
    const K: usize = 3;
    const ETA1: usize = 2;
    const ETA2: usize = 2;
    const DU: u32 = 10;
    const DV: u32 = 4;
    /// Private (secret) key length in bytes.
    pub const SK_LEN: usize = 2400;
    /// Public key length in bytes.
    pub const PK_LEN: usize = 1184;
    /// Ciphertext length in bytes.
    pub const CT_LEN: usize = 1088;

    functionality!();
}


/// # Functionality for the **Kyber-1024** security parameter set.
///
/// This includes specific sizes for the encapsulation key, decapsulation key, and
/// ciphertext along with a number of internal constants. The Kyber-1024 parameter set
/// is claimed to be in security strength category 5.
///
/// **1)** The basic usage is for an originator to start with the [`kyber_1024::try_keygen`] function below to
/// generate both [`kyber_1024::PublicKey`] and [`kyber_1024::PrivateKey`] structs. The resulting
/// [`kyber_1024::PublicKey`] struct implements the [`traits::Encaps`] trait which supplies
/// [`traits::Encaps::try_encaps()`] to generate a shared secret and its transporting ciphertext.
///
/// **2)** Both of the `PrivateKey` and `PublicKey` structs implement the [`traits::SerDes`] trait.
/// The originator utilizes the [`traits::SerDes::into_bytes()`] functions to serialize the structs
/// into byte-arrays for storage and/or transmission, similar to the ciphertext. Upon retrieval and/or
/// receipt, the remote party utilizes the [`traits::SerDes::try_from_bytes()`] functions to deserialize
/// the byte-arrays into structs.
///
/// **3)** Finally, the remote party uses the [`traits::Decaps::try_decaps()`] function implemented on the
/// [`kyber_1024::PrivateKey`] struct to recover the identical shared secret from the ciphertext.
///
/// See the top-level [crate] documentation for example code that implements the above flow.
#[cfg(feature = "kyber-1024")]
pub mod kyber_1024 {
    const K: usize = 4;
    const ETA1: usize = 2;
    const ETA2: usize = 2;
    const DU: u32 = 11;
    const DV: u32 = 5;
    /// Private (secret) key length in bytes.
    pub const SK_LEN: usize = 3168;
    /// Public key length in bytes.
    pub const PK_LEN: usize = 1568;
    /// Ciphertext length in bytes.
    pub const CT_LEN: usize = 1568;

    functionality!();
}
