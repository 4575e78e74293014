//! EVM Wallet CLI
//!
//! Generates one wallet, saves it to disk and prints it.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use evm_wallet::account::WalletRecord;
use evm_wallet::config::DEFAULT_OUTPUT_DIR;
use evm_wallet::storage::WARNING_BANNER;
use evm_wallet::{create_wallet, EntropyStrength, MnemonicFormat, Wallet, WalletConfig};

#[derive(Parser)]
#[command(name = "evm-wallet")]
#[command(about = "Generate a new EVM wallet and save it to a local file")]
#[command(version)]
struct Cli {
    /// Directory the wallet file is written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Number of mnemonic words
    #[arg(short, long, default_value_t = 24, value_parser = parse_word_count)]
    words: usize,

    /// Write the mnemonic on a single line instead of a numbered list
    #[arg(long)]
    inline_mnemonic: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn wallet_config(&self) -> anyhow::Result<WalletConfig> {
        let strength = EntropyStrength::from_word_count(self.words)?;
        let format = if self.inline_mnemonic {
            MnemonicFormat::Inline
        } else {
            MnemonicFormat::Numbered
        };

        Ok(WalletConfig::default()
            .with_output_dir(&self.output_dir)
            .with_strength(strength)
            .with_mnemonic_format(format))
    }
}

fn parse_word_count(s: &str) -> Result<usize, String> {
    let words: usize = s.parse().map_err(|_| format!("not a number: {}", s))?;
    EntropyStrength::from_word_count(words)
        .map(|_| words)
        .map_err(|_| "must be one of 12, 15, 18, 21, 24".to_string())
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    wallet: WalletRecord<'a>,
    file: &'a Path,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "warn,evm_wallet=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.wallet_config()?;
    tracing::debug!(output_dir = %config.output_dir.display(), words = config.strength.word_count(), "Generating wallet");

    let (wallet, path) = create_wallet(&config).context("Failed to create wallet")?;

    if cli.json {
        print_json(&wallet, &path)
    } else {
        print_wallet(&wallet, &path);
        Ok(())
    }
}

fn print_json(wallet: &Wallet, path: &Path) -> anyhow::Result<()> {
    let output = JsonOutput {
        wallet: wallet.record(),
        file: path,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    eprintln!("{}", WARNING_BANNER.red());
    Ok(())
}

fn print_wallet(wallet: &Wallet, path: &Path) {
    println!();
    println!("{}", "Wallet successfully created!".green().bold());
    println!();
    println!("{} {}", "Mnemonic:".bold(), wallet.mnemonic().as_str());
    println!();
    println!("{} {}", "Derivation Path:".bold(), wallet.derivation_path());
    println!("{} {}", "Address:".bold(), wallet.address());
    println!("{} {}", "Private Key:".bold(), wallet.private_key().to_hex().as_str());
    println!();
    println!("Wallet information has been saved to {}", path.display());
    println!();
    println!("{}", WARNING_BANNER.red().bold());
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["evm-wallet"]);
        let config = cli.wallet_config().unwrap();

        assert_eq!(config, WalletConfig::default());
        assert!(!cli.json);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::parse_from(["evm-wallet", "--output-dir", "keys", "--words", "12", "--inline-mnemonic"]);
        let config = cli.wallet_config().unwrap();

        assert_eq!(config.output_dir, PathBuf::from("keys"));
        assert_eq!(config.strength, EntropyStrength::Bits128);
        assert_eq!(config.mnemonic_format, MnemonicFormat::Inline);
    }

    #[test]
    fn test_rejects_unsupported_word_count() {
        assert!(Cli::try_parse_from(["evm-wallet", "--words", "13"]).is_err());
        assert!(Cli::try_parse_from(["evm-wallet", "--words", "many"]).is_err());
    }
}
