//! Byte-exact regression fixture for a compiled intent.
//!
//! Any change to the value encoding, the instruction layout, the header
//! layout, or the intent hash shows up here first.

use txkit_sdk::{
    known_addresses, Address, ContentHasher, Intent, Manifest, ManifestBuilder, Message, PublicKey,
    TransactionHeader,
};
use txkit_types::Ed25519PublicKey;

const NETWORK: u8 = 0x01;

// V1 intent payload layout:
// - `4d` payload prefix, then the intent as enum discriminator 1 with 4
//   fields: header, instructions, blobs, message.
// - The notary key is enum variant 1 (Ed25519) wrapping a 32-byte array.
// - Each CallMethod is instruction `0x41` with 3 fields: address, method
//   name, argument tuple.
// - The 5000 XRD faucet fee is a decimal: 24 little-endian bytes of
//   5000 * 10^18.
const EXPECTED_INTENT: &str = concat!(
    "4d220104",
    // header
    "2107",
    "0701",
    "0a0a00000000000000",
    "0a1400000000000000",
    "0978563412",
    "220101",
    "2007201111111111111111111111111111111111111111111111111111111111111111",
    "0101",
    "080000",
    // instructions
    "202204",
    "41038000c0566318c6318c64f798cacc6318c6318cf7be8af78a78f8a6318c6318c6",
    "0c086c6f636b5f666565",
    "21018500002059dd64f00c0f010000000000000000000000000000",
    "41038000c0566318c6318c64f798cacc6318c6318cf7be8af78a78f8a6318c6318c6",
    "0c0466726565",
    "2100",
    "020180005da66318c6318c61f5a61b4c6318c6318cf794aa8d295f14e6318c6318c6",
    "4103800051eac45aa41825e0bc3f875570af061acbf0b950ad752ff0f9463fe13ad5",
    "0c147472795f6465706f7369745f6f725f61626f7274",
    "21028100000000220000",
    // blobs
    "202000",
    // message
    "220000",
);

const EXPECTED_INTENT_HASH: &str =
    "2ceb9eae8900d45b2ff8434ffa94e17e7b5d54a654b7c0a2959e851414cebc64";

const EXPECTED_TXID: &str = "txid_rdx19n4eat5fqr29ktlcgd8l498p0ea4649x2jmupg54n6z3g9xwh3jqax7k9n";

fn notary_key() -> PublicKey {
    PublicKey::Ed25519(Ed25519PublicKey([0x11; 32]))
}

fn account() -> Address {
    Address::virtual_account(&notary_key(), NETWORK)
}

fn manifest() -> Manifest {
    let xrd = known_addresses(NETWORK).unwrap().resource_addresses.xrd;
    ManifestBuilder::new()
        .lock_fee_from_faucet()
        .get_free_xrd_from_faucet()
        .take_all_from_worktop(xrd, "xrd")
        .unwrap()
        .try_deposit_or_abort(account(), "xrd")
        .unwrap()
        .build(NETWORK)
        .unwrap()
}

fn intent() -> Intent {
    let header = TransactionHeader {
        network_id: NETWORK,
        start_epoch_inclusive: 10,
        end_epoch_exclusive: 20,
        nonce: 0x1234_5678,
        notary_public_key: notary_key(),
        notary_is_signatory: true,
        tip_percentage: 0,
    };
    Intent::new(header, manifest(), Message::None).unwrap()
}

#[test]
fn account_address_of_the_fixture_key() {
    assert_eq!(
        account().to_string(),
        "account_rdx1284vgk4yrqj7p0plsa2hptcxrt9lpw2s446jlu8egcl7zwk4ad9rfj"
    );
}

#[test]
fn compiled_intent_matches_fixture() {
    let compiled = intent().compile();
    assert_eq!(hex::encode(&compiled), EXPECTED_INTENT);
    assert_eq!(compiled.len(), 296);
}

#[test]
fn intent_hash_matches_fixture() {
    let intent = intent();
    let expected = hex::decode(EXPECTED_INTENT).unwrap();
    assert_eq!(intent.hash().0, ContentHasher::INTENT.hash(&expected));
    assert_eq!(intent.hash().0.to_hex(), EXPECTED_INTENT_HASH);
    assert_eq!(intent.hash().to_bech32(NETWORK).unwrap(), EXPECTED_TXID);
}

#[test]
fn compiling_is_idempotent() {
    let a = intent();
    let b = intent();
    assert_eq!(a.compile(), b.compile());
    assert_eq!(a.compile(), a.compile());
    assert_eq!(a.hash(), b.hash());
}

#[test]
fn fixture_decompiles_to_the_same_intent() {
    let bytes = hex::decode(EXPECTED_INTENT).unwrap();
    let decoded = Intent::decompile(&bytes).unwrap();
    assert_eq!(decoded, intent());
    assert_eq!(decoded.compile(), bytes);
}

#[test]
fn truncated_fixture_is_rejected() {
    let bytes = hex::decode(EXPECTED_INTENT).unwrap();
    for cut in [1, 4, 40, bytes.len() - 1] {
        assert!(Intent::decompile(&bytes[..cut]).is_err(), "cut at {cut}");
    }
    let mut trailing = bytes.clone();
    trailing.push(0);
    assert!(Intent::decompile(&trailing).is_err());
}
