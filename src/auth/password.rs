use tracing::error;

/// Hash a plaintext password with bcrypt at the given cost factor.
/// The salt is generated per call and embedded in the returned hash.
pub fn hash_password(plain: &str, cost: u32) -> anyhow::Result<String> {
    let hash = bcrypt::hash(plain, cost).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(hash)
}

/// Verify a plaintext password against a stored bcrypt hash using bcrypt's
/// own comparison, never by re-hashing and comparing output strings.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let ok = bcrypt::verify(plain, hash).map_err(|e| {
        error!(error = %e, "bcrypt verify error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(ok)
}
