//! `hdkey` command-line tool.

use clap::{Parser, Subcommand};
use hdkey_rs::utils::crypto::{parse_seed_hex, random_seed};
use hdkey_rs::{Bip32, ConfigLoader, ExtendedKey, HdConfig, KeyReport, Network, Result};
use std::path::PathBuf;
use std::process::ExitCode;
use zeroize::Zeroizing;

#[derive(Parser, Debug)]
#[command(
    name = "hdkey",
    about = "Generate, derive and inspect BIP32 extended keys",
    version
)]
struct Cli {
    #[arg(long, global = true, help = "path to a JSON configuration file")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Create a master key from a seed
    Generate(GenerateArgs),

    /// Derive a child key along a path
    Derive(DeriveArgs),

    /// Show the fields of an extended key
    Decode(DecodeArgs),
}

#[derive(Parser, Debug, Clone)]
struct GenerateArgs {
    #[arg(short, long, help = "seed as hex; 32 random bytes when omitted")]
    seed: Option<String>,

    #[arg(short, long, help = "produce testnet keys (tprv/tpub)")]
    testnet: bool,

    #[arg(short, long, help = "print private key, public key, fingerprint and seed")]
    verbose: bool,
}

#[derive(Parser, Debug, Clone)]
struct DeriveArgs {
    #[arg(short, long, help = "parent extended key (xprv, xpub, tprv or tpub)")]
    key: String,

    #[arg(short, long, help = "derivation path, e.g. m/0'/1")]
    path: String,

    #[arg(short, long, help = "print path, both key forms and fingerprint")]
    verbose: bool,
}

#[derive(Parser, Debug, Clone)]
struct DecodeArgs {
    #[arg(short, long, help = "extended key to decode")]
    key: String,

    #[arg(short, long, help = "print labelled lines instead of JSON")]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => return fail("loading configuration", &e),
    };

    let bip32: Bip32 = Bip32::default();
    let bip32 = match bip32.with_policy(config.invalid_index_policy) {
        Ok(bip32) => bip32,
        Err(e) => return fail("loading configuration", &e),
    };

    let (action, outcome) = match &cli.command {
        Commands::Generate(args) => ("generating key", generate(&bip32, &config, args)),
        Commands::Derive(args) => ("deriving key", derive(&bip32, args)),
        Commands::Decode(args) => ("decoding key", decode(&bip32, args)),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(action, &e),
    }
}

fn fail(action: &str, error: &hdkey_rs::HdError) -> ExitCode {
    eprintln!("Error {}: {}", action, error);
    ExitCode::FAILURE
}

fn load_config(path: Option<&PathBuf>) -> Result<HdConfig> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = path {
        loader = loader.with_file(path);
    }
    let config = loader.load()?;
    hdkey_rs::init(&config)?;
    Ok(config)
}

fn generate(bip32: &Bip32, config: &HdConfig, args: &GenerateArgs) -> Result<()> {
    let seed = match &args.seed {
        Some(text) => parse_seed_hex(text)?,
        None => random_seed()?,
    };
    let network = if args.testnet {
        Network::Testnet
    } else {
        config.network
    };

    let master = bip32.generate_master(&seed, network)?;
    let private = bip32.encode_key(&master, network);

    if args.verbose {
        let public = bip32.encode_key(&bip32.neuter(&master)?, network);
        println!("Private key: {}", private);
        println!("Public key:  {}", public);
        println!("Fingerprint: {}", bip32.fingerprint(&master)?);
        println!("Seed:        {}", hex::encode(seed.as_slice()));
    } else {
        println!("{}", private);
    }
    Ok(())
}

fn derive(bip32: &Bip32, args: &DeriveArgs) -> Result<()> {
    let decoded = bip32.decode_key(args.key.trim())?;
    let child = bip32.derive_path(&decoded.key, args.path.trim())?;
    let network = decoded.network;

    let public = bip32.encode_key(&bip32.neuter(&child)?, network);
    let private = private_form(bip32, &child, network);

    if args.verbose {
        println!("Path:        {}", args.path.trim());
        if let Some(private) = &private {
            println!("Private key: {}", private);
        }
        println!("Public key:  {}", public);
        println!("Fingerprint: {}", bip32.fingerprint(&child)?);
    } else {
        println!("{}", private.unwrap_or(public));
    }
    Ok(())
}

fn private_form(bip32: &Bip32, key: &ExtendedKey, network: Network) -> Option<String> {
    key.is_private().then(|| bip32.encode_key(key, network))
}

fn decode(bip32: &Bip32, args: &DecodeArgs) -> Result<()> {
    let decoded = bip32.decode_key(args.key.trim())?;
    let report = bip32.report(&decoded.key)?;

    if args.verbose {
        print_report(&report);
    } else {
        let json = Zeroizing::new(serde_json::to_string_pretty(&report)?);
        println!("{}", json.as_str());
    }
    Ok(())
}

fn print_report(report: &KeyReport) {
    println!("Version:            {}", report.version);
    println!("Network:            {}", report.network);
    println!("Type:               {}", report.key_type);
    println!("Depth:              {}", report.depth);
    println!("Parent fingerprint: {}", report.parent_fingerprint);
    println!("Index:              {}", report.index);
    println!("Fingerprint:        {}", report.fingerprint);
    println!("Chain code:         {}", report.chain_code);
    println!("Public key:         {}", report.public_key);
    println!("Hash160:            {}", report.hash160);
    if let Some(private_key) = &report.private_key {
        println!("Private key:        {}", private_key.as_str());
    }
}
