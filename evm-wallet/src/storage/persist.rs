//! Plaintext wallet records on the local filesystem

use std::fmt::Write as _;
use std::fs::{self, DirBuilder, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use zeroize::Zeroizing;

use crate::account::Wallet;
use crate::config::MnemonicFormat;
use crate::error::{Error, Result};

/// Warning written at the end of every record and printed after generation
pub const WARNING_BANNER: &str =
    "IMPORTANT: Keep this file safe and never share your private key or mnemonic with anyone!";

const FILE_PREFIX: &str = "wallet_";
const FILE_EXTENSION: &str = "txt";
const FILENAME_TIMESTAMP: &str = "%Y%m%d_%H%M%S";
const CREATED_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";
const MAX_SUFFIX: u32 = 1000;

#[cfg(unix)]
const DIR_MODE: u32 = 0o700;
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Write the wallet record into `dir`, named after the wallet's creation time
pub fn persist(wallet: &Wallet, dir: &Path) -> Result<PathBuf> {
    persist_at(wallet, dir, MnemonicFormat::default(), wallet.created_at())
}

/// Write the wallet record into `dir`, named after `timestamp`.
///
/// The directory is created owner-only if missing. An existing record is
/// never overwritten: a `_1`, `_2`, ... suffix is appended instead. If the
/// write fails the partially written file is removed.
pub fn persist_at(
    wallet: &Wallet,
    dir: &Path,
    format: MnemonicFormat,
    timestamp: DateTime<Local>,
) -> Result<PathBuf> {
    create_output_dir(dir)?;

    let stem = format!("{}{}", FILE_PREFIX, timestamp.format(FILENAME_TIMESTAMP));
    let (path, file) = create_record_file(dir, &stem)?;

    let content = render_record(wallet, format);
    let file = write_record(file, &path, content.as_bytes())?;
    if let Err(e) = file.sync_all() {
        drop(file);
        return Err(discard_partial(&path, e));
    }

    tracing::info!(path = %path.display(), address = %wallet.address(), "Wallet record saved");
    Ok(path)
}

/// Render the human-readable record
pub fn render_record(wallet: &Wallet, format: MnemonicFormat) -> Zeroizing<String> {
    let mut out = Zeroizing::new(String::with_capacity(1024));

    // Writing to a String cannot fail
    let _ = writeln!(out, "=== EVM Wallet ===\n");
    match format {
        MnemonicFormat::Numbered => {
            let _ = writeln!(out, "Mnemonic:");
            for (i, word) in wallet.mnemonic().words().enumerate() {
                let _ = writeln!(out, "{:>2}. {}", i + 1, word);
            }
        }
        MnemonicFormat::Inline => {
            let _ = writeln!(out, "Mnemonic: {}", wallet.mnemonic().as_str());
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Derivation Path: {}", wallet.derivation_path());
    let _ = writeln!(out, "Address: {}", wallet.address());
    let _ = writeln!(out, "Private Key: {}", wallet.private_key().to_hex().as_str());
    let _ = writeln!(out);
    let _ = writeln!(out, "Created: {}", wallet.created_at().format(CREATED_TIMESTAMP));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", WARNING_BANNER);
    out
}

fn create_output_dir(dir: &Path) -> Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }

    builder
        .create(dir)
        .map_err(|e| Error::persistence(format!("Failed to create directory {}", dir.display()), e))
}

fn create_record_file(dir: &Path, stem: &str) -> Result<(PathBuf, File)> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }

    for suffix in 0..=MAX_SUFFIX {
        let name = if suffix == 0 {
            format!("{}.{}", stem, FILE_EXTENSION)
        } else {
            format!("{}_{}.{}", stem, suffix, FILE_EXTENSION)
        };
        let path = dir.join(name);

        match options.open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                tracing::warn!(path = %path.display(), "Wallet file already exists, trying next name");
            }
            Err(e) => {
                return Err(Error::persistence(format!("Failed to create {}", path.display()), e));
            }
        }
    }

    Err(Error::persistence(
        format!("No free file name for {} in {}", stem, dir.display()),
        io::Error::new(io::ErrorKind::AlreadyExists, "too many wallet files with the same timestamp"),
    ))
}

/// Write `content` to the freshly created record at `path`, removing the
/// file again if the write fails
fn write_record<W: Write>(mut writer: W, path: &Path, content: &[u8]) -> Result<W> {
    match writer.write_all(content).and_then(|()| writer.flush()) {
        Ok(()) => Ok(writer),
        Err(e) => {
            drop(writer);
            Err(discard_partial(path, e))
        }
    }
}

fn discard_partial(path: &Path, cause: io::Error) -> Error {
    if let Err(cleanup) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %cleanup, "Failed to remove partial wallet file");
    }
    Error::persistence(format!("Failed to write {}", path.display()), cause)
}
