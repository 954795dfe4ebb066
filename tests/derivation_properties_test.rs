//! Behavioural properties of derivation and serialization

use hdkey_rs::api;
use hdkey_rs::{ChildNumber, ExtendedKey, Fingerprint, HdError, KeyKind, Network};
use std::thread;

const SEED: &str = "000102030405060708090a0b0c0d0e0f";
const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

fn master(network: Network) -> ExtendedKey {
    api::generate_master(&hex::decode(SEED).unwrap(), network).unwrap()
}

#[test]
fn test_hardened_derivation_requires_private_key() {
    let public = api::neuter(&master(Network::Mainnet)).unwrap();

    let err = api::derive_path(&public, "m/0'").unwrap_err();
    assert!(matches!(
        err.root_cause(),
        HdError::HardenedDerivationRequiresPrivateKey { index: 0x8000_0000 }
    ));
    assert!(matches!(err, HdError::PathStep { step: 0, .. }));
}

#[test]
fn test_public_derivation_matches_neutered_private() {
    let private = master(Network::Mainnet);
    let public = api::neuter(&private).unwrap();

    let from_public = api::derive_path(&public, "m/0").unwrap();
    let from_private = api::derive_path(&private, "m/0").unwrap();
    assert_eq!(from_public, api::neuter(&from_private).unwrap());

    let from_public = api::derive_path(&public, "m/7/2147483647").unwrap();
    let from_private = api::derive_path(&private, "m/7/2147483647").unwrap();
    assert_eq!(from_public, api::neuter(&from_private).unwrap());
}

#[test]
fn test_hardened_notation_equivalence() {
    let master = master(Network::Mainnet);
    let apostrophe = api::derive_path(&master, "m/0'/1").unwrap();
    let letter = api::derive_path(&master, "m/0h/1").unwrap();
    let upper_root = api::derive_path(&master, "M/0h/1").unwrap();
    assert_eq!(apostrophe, letter);
    assert_eq!(apostrophe, upper_root);
}

#[test]
fn test_fingerprint_linkage() {
    let master = master(Network::Mainnet);
    assert_eq!(master.parent_fingerprint(), Fingerprint::ZERO);
    assert_eq!(api::fingerprint(&master).unwrap().to_string(), "3442193e");

    let mut parent = master;
    for path in ["m/0'", "m/1", "m/2'", "m/2", "m/1000000000"] {
        let child = api::derive_path(&parent, path).unwrap();
        assert_eq!(child.parent_fingerprint(), api::fingerprint(&parent).unwrap());
        assert_eq!(child.depth(), parent.depth() + 1);
        parent = child;
    }
}

#[test]
fn test_fingerprint_is_identifier_prefix() {
    let key = api::derive_path(&master(Network::Mainnet), "m/44'/0'").unwrap();
    let identifier = api::identifier(&key).unwrap();
    assert_eq!(api::fingerprint(&key).unwrap(), identifier.fingerprint());
    assert_eq!(
        api::identifier(&api::neuter(&key).unwrap()).unwrap(),
        identifier
    );
}

#[test]
fn test_depth_bound() {
    let path = format!("m{}", "/0".repeat(256));
    let err = api::derive_path(&master(Network::Mainnet), &path).unwrap_err();
    match err {
        HdError::PathStep { step, child, source } => {
            assert_eq!(step, 255);
            assert_eq!(child, ChildNumber::from_index(0));
            assert!(matches!(*source, HdError::DepthOverflow));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let deepest = api::derive_path(&master(Network::Mainnet), &format!("m{}", "/0".repeat(255))).unwrap();
    assert_eq!(deepest.depth(), 255);
    let decoded = api::decode_key(&api::encode_key(&deepest, Network::Mainnet)).unwrap();
    assert_eq!(decoded.key.depth(), 255);
}

#[test]
fn test_master_generation_is_deterministic() {
    let seed = hex::decode(SEED).unwrap();
    let a = api::generate_master(&seed, Network::Mainnet).unwrap();
    let b = api::generate_master(&seed, Network::Mainnet).unwrap();
    assert_eq!(a, b);
    assert_eq!(
        api::encode_key(&a, Network::Mainnet),
        api::encode_key(&b, Network::Mainnet)
    );

    let other = api::generate_master(&[0x42; 32], Network::Mainnet).unwrap();
    assert_ne!(a, other);
}

#[test]
fn test_empty_seed_is_rejected() {
    assert!(matches!(
        api::generate_master(&[], Network::Mainnet),
        Err(HdError::InvalidSeed(_))
    ));
}

#[test]
fn test_round_trip_on_both_networks() {
    for network in [Network::Mainnet, Network::Testnet] {
        let master = master(network);
        for path in ["m", "m/0'", "m/0'/1/2'", "m/2147483647'/0"] {
            let key = api::derive_path(&master, path).unwrap();
            let public = api::neuter(&key).unwrap();
            for candidate in [key, public] {
                let encoded = api::encode_key(&candidate, network);
                let decoded = api::decode_key(&encoded).unwrap();
                assert_eq!(decoded.key, candidate);
                assert_eq!(decoded.network, network);
                assert_eq!(decoded.is_private, candidate.is_private());
            }
        }
    }
}

#[test]
fn test_testnet_prefixes() {
    let master = master(Network::Testnet);
    let tprv = api::encode_key(&master, Network::Testnet);
    let tpub = api::encode_key(&api::neuter(&master).unwrap(), Network::Testnet);
    assert!(tprv.starts_with("tprv"));
    assert!(tpub.starts_with("tpub"));
    assert_eq!(
        Network::Testnet.key_prefix(KeyKind::Private),
        &tprv[..4]
    );

    // re-tagging keeps the key material
    let xprv = api::encode_key(&master, Network::Mainnet);
    assert!(xprv.starts_with("xprv"));
    let decoded = api::decode_key(&xprv).unwrap();
    assert_eq!(decoded.network, Network::Mainnet);
    assert_eq!(decoded.key.material(), master.material());
    assert_eq!(decoded.key.chain_code(), master.chain_code());
}

#[test]
fn test_neuter_keeps_metadata() {
    let key = api::derive_path(&master(Network::Mainnet), "m/0'/5").unwrap();
    let public = api::neuter(&key).unwrap();
    assert!(!public.is_private());
    assert_eq!(public.depth(), key.depth());
    assert_eq!(public.parent_fingerprint(), key.parent_fingerprint());
    assert_eq!(public.child_number(), key.child_number());
    assert_eq!(public.chain_code(), key.chain_code());
    assert_eq!(api::neuter(&public).unwrap(), public);
}

#[test]
fn test_single_character_tampering_is_detected() {
    let master = master(Network::Mainnet);
    let key = api::derive_path(&master, "m/0'/1").unwrap();
    let encoded = api::encode_key(&key, Network::Mainnet);
    let alphabet: Vec<char> = BASE58_ALPHABET.chars().collect();

    for (position, original) in encoded.char_indices() {
        let slot = alphabet.iter().position(|c| *c == original).unwrap();
        let replacement = alphabet[(slot + 1) % alphabet.len()];

        let mut tampered = encoded.clone();
        tampered.replace_range(position..position + 1, &replacement.to_string());

        let err = api::decode_key(&tampered).unwrap_err();
        assert!(
            matches!(err, HdError::ChecksumMismatch),
            "position {} gave {:?}",
            position,
            err
        );
    }
}

#[test]
fn test_independent_derivations_across_threads() {
    let master = master(Network::Mainnet);
    let expected: Vec<String> = (0..4)
        .map(|i| api::encode_key(&api::derive_path(&master, &format!("m/{}'", i)).unwrap(), Network::Mainnet))
        .collect();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let master = master.clone();
            thread::spawn(move || {
                let child = api::derive_path(&master, &format!("m/{}'", i)).unwrap();
                api::encode_key(&child, Network::Mainnet)
            })
        })
        .collect();

    let actual: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(actual, expected);
}
