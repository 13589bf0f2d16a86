/// Payload encryption supplied by the session layer.
///
/// Implementations own the key material negotiated during login. The framing
/// layer only hands over the checksummed plaintext payload and flags the
/// header as encrypted; it never inspects the ciphertext.
pub trait EncryptionEnvelope: Send + Sync {
    /// Transform a plaintext payload into its on-wire ciphertext.
    fn encrypt(&self, plaintext: &[u8]) -> Vec<u8>;
}

impl<E: EncryptionEnvelope + ?Sized> EncryptionEnvelope for std::sync::Arc<E> {
    fn encrypt(&self, plaintext: &[u8]) -> Vec<u8> {
        (**self).encrypt(plaintext)
    }
}
