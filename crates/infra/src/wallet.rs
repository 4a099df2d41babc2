//! Filesystem wallet and crypto-material import.
//!
//! Layout: `<root>/<org>/<LABEL>.id`, one JSON identity per file. Admin
//! identities are imported from the network's generated crypto material:
//!
//! ```text
//! <crypto>/peerOrganizations/<org>.pharma-network.com/users/Admin@<org>.pharma-network.com/msp/
//!     signcerts/Admin@<org>.pharma-network.com-cert.pem
//!     keystore/<key>_sk
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use pharmanet_auth::{Organisation, X509Identity};

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed identity file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid private key file name '{0}'")]
    InvalidKeyFileName(String),

    #[error("expected exactly one *_sk private key in {dir}, found {found}")]
    KeyNotDetected { dir: PathBuf, found: usize },
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> WalletError + '_ {
    move |source| WalletError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Per-organisation identity store on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSystemWallet {
    root: PathBuf,
}

impl FileSystemWallet {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn identity_path(&self, org: Organisation, label: &str) -> PathBuf {
        self.root.join(org.as_str()).join(format!("{label}.id"))
    }

    pub fn put(&self, org: Organisation, label: &str, identity: &X509Identity) -> Result<(), WalletError> {
        let path = self.identity_path(org, label);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(io_error(dir))?;
        }
        let json = serde_json::to_vec_pretty(identity).map_err(|source| WalletError::Malformed {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(io_error(&path))
    }

    pub fn get(&self, org: Organisation, label: &str) -> Result<Option<X509Identity>, WalletError> {
        let path = self.identity_path(org, label);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&path)(e)),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| WalletError::Malformed { path, source })
    }
}

/// Generated crypto material of the network (`crypto-config`).
#[derive(Debug, Clone)]
pub struct CryptoMaterial {
    root: PathBuf,
}

impl CryptoMaterial {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// MSP directory of the organisation's admin user.
    pub fn admin_msp_dir(&self, org: Organisation) -> PathBuf {
        let domain = org.domain();
        self.root
            .join("peerOrganizations")
            .join(&domain)
            .join("users")
            .join(format!("Admin@{domain}"))
            .join("msp")
    }

    pub fn admin_certificate(&self, org: Organisation) -> PathBuf {
        self.admin_msp_dir(org)
            .join("signcerts")
            .join(format!("Admin@{}-cert.pem", org.domain()))
    }

    pub fn admin_keystore(&self, org: Organisation) -> PathBuf {
        self.admin_msp_dir(org).join("keystore")
    }

    /// The admin's private key file: `file_name` if given, otherwise the only
    /// `*_sk` file in the keystore.
    pub fn admin_private_key(&self, org: Organisation, file_name: Option<&str>) -> Result<PathBuf, WalletError> {
        let keystore = self.admin_keystore(org);

        if let Some(name) = file_name.map(str::trim).filter(|n| !n.is_empty()) {
            if name.contains(['/', '\\']) || name == ".." || name == "." {
                return Err(WalletError::InvalidKeyFileName(name.to_string()));
            }
            return Ok(keystore.join(name));
        }

        let mut candidates = Vec::new();
        for entry in fs::read_dir(&keystore).map_err(io_error(&keystore))? {
            let path = entry.map_err(io_error(&keystore))?.path();
            if path.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.ends_with("_sk")) {
                candidates.push(path);
            }
        }
        match candidates.len() {
            1 => Ok(candidates.remove(0)),
            found => Err(WalletError::KeyNotDetected { dir: keystore, found }),
        }
    }
}

/// Import `org`'s admin identity from crypto material into the wallet under
/// `<ORG>_ADMIN`, replacing any existing entry.
pub fn import_admin_identity(
    wallet: &FileSystemWallet,
    crypto: &CryptoMaterial,
    org: Organisation,
    private_key_file: Option<&str>,
) -> Result<X509Identity, WalletError> {
    let cert_path = crypto.admin_certificate(org);
    let certificate = fs::read_to_string(&cert_path).map_err(io_error(&cert_path))?;

    let key_path = crypto.admin_private_key(org, private_key_file)?;
    let private_key = fs::read_to_string(&key_path).map_err(io_error(&key_path))?;

    let identity = X509Identity::new(org.msp_id(), certificate, private_key);
    let label = org.admin_label();
    wallet.put(org, &label, &identity)?;

    tracing::info!(org = %org, label = %label, "identity added to wallet");
    Ok(identity)
}

/// Import the admin identity of every organisation, auto-detecting keys.
pub fn import_all_admin_identities(
    wallet: &FileSystemWallet,
    crypto: &CryptoMaterial,
) -> Result<Vec<Organisation>, WalletError> {
    Organisation::ALL
        .into_iter()
        .map(|org| import_admin_identity(wallet, crypto, org, None).map(|_| org))
        .collect()
}
