//! End-to-end flows across wallet, ABI and config.

use kodechain_sdk::{
    decode_parameters, encode_function_call, function_selector, quantum_hash_hex, AbiCoder,
    AbiError, AbiType, AbiValue, AddressFormat, CoreConfig, DecodeMode, QuantumWallet,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn sign_and_verify_transfer_call() {
    init_logging();
    let sender = QuantumWallet::from_seed(&[11u8; 32]).unwrap();
    let recipient = QuantumWallet::from_seed(&[12u8; 32]).unwrap();

    let call = encode_function_call(
        "transferFrom(address,address,uint256)",
        &[
            AbiValue::address(sender.address()).unwrap(),
            AbiValue::address(recipient.address()).unwrap(),
            AbiValue::from(1_000_000u64),
        ],
    )
    .unwrap();
    assert!(call.starts_with("0x56eca0a0"));
    assert_eq!(call.len(), 2 + 8 + 3 * 64);

    let signature = sender.sign(&call).unwrap();
    assert!(sender.verify(&signature, &call).unwrap());

    // A verifier holding only the public key reaches the same answer.
    let verifier = QuantumWallet::watch_only_hex(&sender.get_public_key()).unwrap();
    assert_eq!(verifier.address(), sender.address());
    assert!(verifier.verify(&signature, &call).unwrap());
    assert!(!recipient.verify(&signature, &call).unwrap());

    let decoded = decode_parameters(
        &call[10..],
        &[AbiType::Address64, AbiType::Address64, AbiType::Uint256],
    )
    .unwrap();
    assert_eq!(decoded[0].as_str(), Some(sender.address()));
    assert_eq!(decoded[1].as_str(), Some(recipient.address()));
    assert_eq!(decoded[2], AbiValue::from(1_000_000u64));
}

#[test]
fn selector_is_hash_prefix() {
    let signature = "approveAndCall(address,uint256,bytes32)";
    let digest = quantum_hash_hex(signature).unwrap();
    assert_eq!(function_selector(signature), &digest[2..10]);
    assert_eq!(function_selector(signature), "0ed6868c");
}

#[test]
fn config_drives_decode_and_display() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kodechain.toml");

    let config = CoreConfig {
        address_format: AddressFormat::Evm,
        decode_mode: DecodeMode::Lenient,
        keystore_path: dir.path().join("wallet.key").to_string_lossy().into_owned(),
    };
    config.save(&path).unwrap();
    let config = CoreConfig::load(&path).unwrap();

    let wallet = QuantumWallet::create_random();
    config.save_wallet(&wallet).unwrap();
    let restored = config.load_wallet().unwrap();
    assert_eq!(config.display_address(&restored), wallet.evm_address());

    // One word of data, two requested types.
    let data = format!("0x{:0>64}", "2a");
    let types = [AbiType::Uint256, AbiType::Uint256];

    let lenient = config.abi_coder().decode(&data, &types).unwrap();
    assert_eq!(lenient, vec![AbiValue::from(42u64), AbiValue::from(0u64)]);

    let strict = AbiCoder::new(DecodeMode::Strict).decode(&data, &types);
    assert_eq!(
        strict,
        Err(AbiError::LengthMismatch {
            expected: 128,
            actual: 64
        })
    );
}

#[tokio::test]
async fn background_wallet_signs_call() {
    let wallet = QuantumWallet::generate_in_background().await.unwrap();
    let call = encode_function_call("approve(address,uint256)", &[
        AbiValue::address(wallet.address()).unwrap(),
        AbiValue::from(7u64),
    ])
    .unwrap();

    let signature = wallet.sign_in_background(call.clone().into_bytes()).await.unwrap();
    assert!(wallet.verify(&signature, &call).unwrap());
}
