//! Signing secret provisioning.
//!
//! The JWT signing secret is random key material persisted outside the
//! process so tokens survive restarts. On first start the secret is
//! generated and written with owner-only permissions; every later start
//! loads the same bytes verbatim. Any read failure other than the file
//! being absent aborts startup: the service must not serve requests
//! without deterministic secret material.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rand::RngCore;
use rand::rngs::OsRng;

use crate::prelude::*;

/// Length of a generated secret in bytes.
pub const SECRET_LEN: usize = 32;

/// Well-known secret file name under the home directory.
pub const SECRET_FILE: &str = ".jwt_secret";

/// In-memory signing secret, provisioned once at startup.
#[derive(Clone)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    /// Loads the secret from `path`, generating and persisting a fresh one
    /// when the file does not exist yet.
    pub fn load_or_generate(path: &Path) -> Result<Self> {
        match fs::read(path) {
            Ok(bytes) => Ok(Self(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let secret = Self::generate();
                secret.persist(path)?;
                Ok(secret)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Resolves `~/.jwt_secret` and delegates to [`Self::load_or_generate`].
    pub fn from_home() -> Result<Self> {
        let home = dirs::home_dir().ok_or(Error::HomeDirMissing)?;
        Self::load_or_generate(&Self::default_path(&home))
    }

    /// The secret path for a given home directory.
    pub fn default_path(home: &Path) -> PathBuf {
        home.join(SECRET_FILE)
    }

    /// Raw key material for the token signer.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    fn generate() -> Self {
        let mut bytes = vec![0u8; SECRET_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    fn persist(&self, path: &Path) -> Result<()> {
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path)?;
        file.write_all(&self.0)?;
        Ok(())
    }
}

// Key material must never end up in logs.
impl std::fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SigningSecret(REDACTED)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_run_generates_and_persists() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(SECRET_FILE);

        let secret = SigningSecret::load_or_generate(&path)?;
        assert_eq!(secret.as_bytes().len(), SECRET_LEN);

        let on_disk = fs::read(&path)?;
        assert_eq!(on_disk, secret.as_bytes());
        Ok(())
    }

    #[test]
    fn second_run_reuses_identical_bytes() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join(SECRET_FILE);

        let first = SigningSecret::load_or_generate(&path)?;
        let second = SigningSecret::load_or_generate(&path)?;
        assert_eq!(first.as_bytes(), second.as_bytes());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn secret_file_is_owner_only() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir()?;
        let path = dir.path().join(SECRET_FILE);

        SigningSecret::load_or_generate(&path)?;
        let mode = fs::metadata(&path)?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        Ok(())
    }

    #[test]
    fn unreadable_path_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // a directory at the secret path is neither readable nor "absent"
        let result = SigningSecret::load_or_generate(dir.path());
        assert!(matches!(result, Err(Error::IO(_))));
    }

    #[test]
    fn debug_output_is_redacted() {
        let secret = SigningSecret::generate();
        assert_eq!(format!("{secret:?}"), "SigningSecret(REDACTED)");
    }
}
