use txkit_types::{Hash, PublicKey};

use crate::error::SignatureError;
use crate::signature::{Signature, SignatureWithPublicKey};

/// Signing capability over 32-byte transaction hashes.
///
/// Implemented by [`crate::PrivateKey`]. External key custodians implement it
/// to plug into transaction assembly.
pub trait Signer {
    fn public_key(&self) -> PublicKey;

    fn sign(&self, message: &Hash) -> Result<Signature, SignatureError>;

    /// Sign and pair the result with this signer's key.
    fn sign_with_public_key(&self, message: &Hash) -> Result<SignatureWithPublicKey, SignatureError> {
        let signature = self.sign(message)?;
        SignatureWithPublicKey::new(signature, self.public_key())
    }
}

impl<S: Signer + ?Sized> Signer for &S {
    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn sign(&self, message: &Hash) -> Result<Signature, SignatureError> {
        (**self).sign(message)
    }
}

impl<S: Signer + ?Sized> Signer for Box<S> {
    fn public_key(&self) -> PublicKey {
        (**self).public_key()
    }

    fn sign(&self, message: &Hash) -> Result<Signature, SignatureError> {
        (**self).sign(message)
    }
}
