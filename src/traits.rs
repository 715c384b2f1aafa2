use rand_core::CryptoRngCore;
#[cfg(feature = "default-rng")]
use rand_core::OsRng;


/// The `KeyGen` trait is defined to allow trait objects.
pub trait KeyGen {
    /// An encapsulation key specific to the chosen security parameter set, e.g., kyber-512, kyber-768 or kyber-1024
    type PublicKey;
    /// A decapsulation key specific to the chosen security parameter set, e.g., kyber-512, kyber-768 or kyber-1024
    type PrivateKey;

    /// Generates an encapsulation and decapsulation key pair specific to this security parameter set. <br>
    /// This function utilizes the OS default random number generator.
    /// # Errors
    /// Returns an error when the random number generator fails; propagates internal errors.
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use kyber_kem::kyber_768; // Could also be kyber_512 or kyber_1024.
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
    ///
    /// // Generate key pair and encapsulate a shared secret
    /// let (ek, dk) = kyber_768::KG::try_keygen()?; // Generate both encaps and decaps keys
    /// let (ssk, ct) = ek.try_encaps()?; // Use the encaps key to generate a shared secret
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_keygen() -> Result<(Self::PublicKey, Self::PrivateKey), &'static str> {
        Self::try_keygen_with_rng(&mut OsRng)
    }

    /// Generates an encapsulation and decapsulation key pair specific to this security parameter set. <br>
    /// This function utilizes a supplied random number generator.
    /// # Errors
    /// Returns an error when the random number generator fails; propagates internal errors.
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use kyber_kem::kyber_768; // Could also be kyber_512 or kyber_1024.
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
    /// use rand_chacha::rand_core::SeedableRng;
    ///
    /// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    ///
    /// // Generate key pair and encapsulate a shared secret
    /// let (ek, dk) = kyber_768::KG::try_keygen_with_rng(&mut rng)?; // Generate both encaps and decaps keys
    /// let (ssk, ct) = ek.try_encaps_with_rng(&mut rng)?; // Use the encaps key to generate a shared secret
    /// # Ok(())}
    /// ```
    fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), &'static str>;

    /// Generates an encapsulation and decapsulation key pair deterministically from the two
    /// 32-byte seeds `d` and `z`, primarily for known-answer testing and key re-derivation.
    fn keygen_from_seed(d: &[u8; 32], z: &[u8; 32]) -> (Self::PublicKey, Self::PrivateKey);
}


/// The `Encaps` trait is implemented for the `PublicKey` struct on each of the security parameter sets.
pub trait Encaps {
    /// A shared secret key of 32 bytes
    type SharedSecretKey;
    /// A ciphertext specific to the chosen security parameter set, e.g., kyber-512, kyber-768 or kyber-1024
    type CipherText;

    /// Generates a fresh shared secret and the ciphertext that transports it. This function
    /// utilizes the OS default random number generator.
    /// # Errors
    /// Returns an error when the random number generator fails; propagates internal errors.
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use kyber_kem::kyber_768; // Could also be kyber_512 or kyber_1024.
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
    ///
    /// let (ek, dk) = kyber_768::KG::try_keygen()?; // Generate both encaps and decaps keys
    /// let (ssk1, ct) = ek.try_encaps()?; // Use the encaps key to generate a shared secret
    /// let ssk2 = dk.try_decaps(&ct)?; // Use the decaps key to recover the shared secret
    /// assert_eq!(ssk1, ssk2);
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_encaps(&self) -> Result<(Self::SharedSecretKey, Self::CipherText), &'static str> {
        self.try_encaps_with_rng(&mut OsRng)
    }

    /// Generates a fresh shared secret and the ciphertext that transports it. This function
    /// utilizes a supplied random number generator.
    /// # Errors
    /// Returns an error when the random number generator fails; propagates internal errors.
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use kyber_kem::kyber_768; // Could also be kyber_512 or kyber_1024.
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
    /// use rand_chacha::rand_core::SeedableRng;
    ///
    /// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    ///
    /// let (ek, dk) = kyber_768::KG::try_keygen_with_rng(&mut rng)?;
    /// let (ssk1, ct) = ek.try_encaps_with_rng(&mut rng)?;
    /// let ssk2 = dk.try_decaps(&ct)?;
    /// assert_eq!(ssk1, ssk2);
    /// # Ok(())}
    /// ```
    fn try_encaps_with_rng(
        &self, rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::SharedSecretKey, Self::CipherText), &'static str>;
}


/// The `Decaps` trait is implemented for the `PrivateKey` struct on each of the security parameter sets.
pub trait Decaps {
    /// A shared secret key of 32 bytes
    type SharedSecretKey;
    /// A ciphertext specific to the chosen security parameter set, e.g., kyber-512, kyber-768 or kyber-1024
    type CipherText;

    /// Recovers the shared secret from a ciphertext. A ciphertext that fails the internal
    /// re-encryption check yields a pseudorandom secret rather than an error, so this function
    /// does not reveal whether decapsulation succeeded.
    /// # Errors
    /// Propagates internal errors only; a mismatched ciphertext is not an error.
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use kyber_kem::kyber_1024; // Could also be kyber_512 or kyber_768.
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
    ///
    /// let (ek, dk) = kyber_1024::KG::try_keygen()?;
    /// let (ssk1, ct) = ek.try_encaps()?;
    /// let ssk2 = dk.try_decaps(&ct)?;
    /// assert_eq!(ssk1, ssk2);
    /// # Ok(())}
    /// ```
    fn try_decaps(&self, ct: &Self::CipherText) -> Result<Self::SharedSecretKey, &'static str>;
}


/// The `SerDes` trait provides for validated serialization and deserialization of fixed-size elements.
/// Deserialization of an encapsulation key checks that every coefficient is canonical (below the
/// modulus); deserialization of a decapsulation key additionally checks its embedded key hash.
pub trait SerDes {
    /// The fixed-size byte array to be serialized or deserialized
    type ByteArray;

    /// Produces a byte array of fixed-size specific to the struct being serialized.
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use kyber_kem::kyber_768; // Could also be kyber_512 or kyber_1024.
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
    ///
    /// let (ek, dk) = kyber_768::KG::try_keygen()?;
    /// let ek_bytes = ek.into_bytes(); // Serialize the encaps key
    /// let dk_bytes = dk.into_bytes(); // Serialize the decaps key
    /// # Ok(())}
    /// ```
    fn into_bytes(self) -> Self::ByteArray;

    /// Consumes a byte array of fixed-size specific to the struct being deserialized; performs validation
    /// # Errors
    /// Returns an error on malformed input.
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use kyber_kem::kyber_512; // Could also be kyber_768 or kyber_1024.
    /// use kyber_kem::traits::{Decaps, Encaps, KeyGen, SerDes};
    ///
    /// let (ek, dk) = kyber_512::KG::try_keygen()?;
    /// let ek_bytes = ek.into_bytes(); // Serialize the encaps key
    /// let dk_bytes = dk.into_bytes(); // Serialize the decaps key
    /// let ek2 = kyber_512::PublicKey::try_from_bytes(ek_bytes)?;
    /// let dk2 = kyber_512::PrivateKey::try_from_bytes(dk_bytes)?;
    /// # Ok(())}
    /// ```
    fn try_from_bytes(ba: Self::ByteArray) -> Result<Self, &'static str>
    where
        Self: Sized;
}
