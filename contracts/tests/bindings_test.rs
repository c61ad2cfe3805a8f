//! Generated bindings exercised against the recording mock client

use std::sync::Arc;
use std::time::Duration;

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{address, hex, Address, FixedBytes, TxKind, I256, U256};
use kuku_contracts::runtime::mock::MockClient;
use kuku_contracts::runtime::{BindingError, Overrides, SignerOrProvider};
use kuku_contracts::reward_vault::{self, Config, RewardVault, RewardVaultCalls, RewardVaultFactory};
use kuku_contracts::{
    i_kuku_farmer, safe_erc20, IKukuFarmer, IKukuFarmerCalls, IKukuFarmerFactory, PoolInfo,
    SafeERC20Calls, SafeERC20Factory,
};

const FARM: Address = address!("00000000000000000000000000000000000000fa");
const LP_TOKEN: Address = address!("00000000000000000000000000000000000000aa");
const SENDER: Address = address!("00000000000000000000000000000000000000ee");

fn word(value: u64) -> [u8; 32] {
    U256::from(value).to_be_bytes::<32>()
}

fn mock() -> Arc<MockClient> {
    Arc::new(MockClient::new().with_signer(SENDER))
}

#[test]
fn test_descriptors_match_embedded_abi() {
    for (abi, functions) in [
        (i_kuku_farmer::abi().unwrap(), i_kuku_farmer::FUNCTIONS),
        (safe_erc20::abi().unwrap(), safe_erc20::FUNCTIONS),
        (reward_vault::abi().unwrap(), reward_vault::FUNCTIONS),
    ] {
        let declared: Vec<_> = abi.functions().collect();
        assert_eq!(declared.len(), functions.len());
        for function in declared {
            let descriptor = functions
                .iter()
                .find(|d| d.signature == function.signature())
                .unwrap_or_else(|| panic!("no descriptor for {}", function.signature()));
            assert_eq!(descriptor.selector, function.selector().0);
            assert_eq!(descriptor.inputs.len(), function.inputs.len());
            assert_eq!(descriptor.outputs.len(), function.outputs.len());
            assert_eq!(descriptor.mutability, function.state_mutability);
        }
    }
}

#[test]
fn test_selectors() {
    assert_eq!(i_kuku_farmer::DEPOSIT.selector_hex(), "0xe2bbb158");
    assert_eq!(i_kuku_farmer::POOL_INFO.signature, "poolInfo(uint256)");
    assert_eq!(
        i_kuku_farmer::TOTAL_ALLOC_POINT.signature,
        "totalAllocPoint()"
    );
    assert_eq!(safe_erc20::SAFE_DECIMALS.signature, "safeDecimals(IERC20)");
    assert_eq!(safe_erc20::SAFE_DECIMALS.selector_hex(), "0x72a58ae1");
}

#[test]
fn test_connect_binds_address() {
    let farmer = IKukuFarmerFactory::connect(FARM, mock());
    assert_eq!(farmer.address(), FARM);

    let library = SafeERC20Factory::connect(FARM, mock());
    assert_eq!(library.address(), FARM);
}

#[test]
fn test_deposit_calldata() {
    let farmer = IKukuFarmerFactory::connect(FARM, mock());
    let call = farmer.deposit(U256::from(1), U256::from(2));

    let mut expected = vec![0xe2, 0xbb, 0xb1, 0x58];
    expected.extend_from_slice(&word(1));
    expected.extend_from_slice(&word(2));
    assert_eq!(call.calldata().unwrap().to_vec(), expected);

    let request = call.request().unwrap();
    assert_eq!(request.to, Some(TxKind::Call(FARM)));
    assert_eq!(request.from, Some(SENDER));
}

#[test]
fn test_value_on_nonpayable_rejected() {
    let farmer = IKukuFarmerFactory::connect(FARM, mock());
    let err = farmer
        .deposit(U256::from(1), U256::from(2))
        .value(U256::from(1))
        .request()
        .unwrap_err();
    assert!(matches!(err, BindingError::NonPayableValue(_)));
}

#[tokio::test]
async fn test_deposit_send() {
    let client = mock();
    let farmer = IKukuFarmer::new(FARM, client.clone());

    let pending = farmer
        .deposit(U256::from(3), U256::from(500))
        .overrides(Overrides::new().gas_limit(120_000))
        .send()
        .await
        .unwrap();

    let receipt = pending
        .wait(Duration::from_millis(1), Duration::from_secs(1))
        .await
        .unwrap();
    assert!(receipt.status);
    assert_eq!(receipt.transaction_hash, pending.tx_hash());

    let sent = client.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].gas, Some(120_000));
    assert_eq!(sent[0].to, Some(TxKind::Call(FARM)));
}

#[tokio::test]
async fn test_pool_info_decodes_struct() {
    let client = mock();
    let mut data = Vec::new();
    let mut lp = [0u8; 32];
    lp[12..].copy_from_slice(LP_TOKEN.as_slice());
    data.extend_from_slice(&lp);
    data.extend_from_slice(&word(40));
    data.extend_from_slice(&word(1_000));
    data.extend_from_slice(&word(7));
    client.push_response(data);

    let farmer = IKukuFarmerFactory::connect(FARM, client.clone());
    let pool = farmer.pool_info(U256::from(0)).call().await.unwrap();

    assert_eq!(
        pool,
        PoolInfo {
            lp_token: LP_TOKEN,
            alloc_point: U256::from(40),
            last_reward_block: U256::from(1_000),
            acc_kuku_per_share: U256::from(7),
        }
    );
    let calls = client.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0].input.input().map(|b| b[..4].to_vec()),
        Some(i_kuku_farmer::POOL_INFO.selector.to_vec())
    );
}

#[tokio::test]
async fn test_total_alloc_point() {
    let client = mock();
    client.push_response(word(4_000).to_vec());

    let farmer = IKukuFarmerFactory::connect(FARM, client);
    assert_eq!(
        farmer.total_alloc_point().call().await.unwrap(),
        U256::from(4_000)
    );
}

#[tokio::test]
async fn test_safe_decimals() {
    let client = mock();
    client.push_response(word(18).to_vec());

    let library = SafeERC20Factory::connect(FARM, client.clone());
    let decimals = library.safe_decimals(LP_TOKEN).call().await.unwrap();

    assert_eq!(decimals, 18u8);
    let input = client.calls()[0].input.input().cloned().unwrap();
    assert_eq!(&input[..4], &[0x72, 0xa5, 0x8a, 0xe1]);
    assert_eq!(&input[16..36], LP_TOKEN.as_slice());
}

#[test]
fn test_pool_info_round_trips_through_abi_value() {
    use kuku_contracts::runtime::AbiType;

    let pool = PoolInfo {
        lp_token: LP_TOKEN,
        alloc_point: U256::from(1),
        ..Default::default()
    };
    let value = pool.clone().into_value();
    assert!(matches!(&value, DynSolValue::Tuple(fields) if fields.len() == 4));
    assert_eq!(PoolInfo::from_value(value).unwrap(), pool);
}

#[test]
fn test_deploy_transaction() {
    let signer: Arc<dyn SignerOrProvider> = mock();
    let factory = SafeERC20Factory::new(Some(signer));
    let request = factory.deploy_transaction(Overrides::new()).unwrap();

    assert_eq!(request.to, Some(TxKind::Create));
    assert_eq!(request.from, Some(SENDER));
    let input = request.input.input().cloned().unwrap();
    assert_eq!(format!("0x{}", hex::encode(&input)), safe_erc20::BYTECODE);
    assert!(safe_erc20::CONSTRUCTOR_INPUTS.is_empty());
}

#[tokio::test]
async fn test_deploy() {
    let deployed = address!("00000000000000000000000000000000000000d0");
    let client = Arc::new(
        MockClient::new()
            .with_signer(SENDER)
            .with_deploy_address(deployed),
    );
    let factory = SafeERC20Factory::from_factory(
        SafeERC20Factory::default()
            .connect_signer(client.clone())
            .factory()
            .clone()
            .with_poll_interval(Duration::from_millis(1)),
    );

    let library = factory.deploy(Overrides::new()).await.unwrap();

    assert_eq!(library.address(), deployed);
    assert_eq!(client.sent()[0].to, Some(TxKind::Create));
}

#[tokio::test]
async fn test_deploy_without_signer() {
    let err = SafeERC20Factory::default()
        .deploy(Overrides::new())
        .await
        .unwrap_err();
    assert!(matches!(err, BindingError::MissingSigner));
}

#[test]
fn test_attach_and_connect_signer_preserve_fields() {
    let signer: Arc<dyn SignerOrProvider> = mock();
    let factory = SafeERC20Factory::default();
    let rebound = factory.connect_signer(signer);

    assert_eq!(rebound.factory().bytecode(), safe_erc20::BYTECODE);
    assert_eq!(rebound.factory().abi_json(), safe_erc20::ABI);
    assert_eq!(
        rebound.factory().poll_interval(),
        factory.factory().poll_interval()
    );
    assert!(factory.factory().signer().is_none());
    assert!(rebound.factory().signer().is_some());

    let attached = rebound.attach(FARM);
    assert_eq!(attached.address(), FARM);
    assert!(attached.handle().client().is_some());
    // attach leaves the factory usable
    assert_eq!(rebound.attach(LP_TOKEN).address(), LP_TOKEN);
}

#[tokio::test]
async fn test_handle_without_client() {
    let farmer = IKukuFarmer::from_handle(kuku_contracts::runtime::ContractHandle::new(FARM, None));
    let err = farmer.total_alloc_point().call().await.unwrap_err();
    assert!(matches!(err, BindingError::MissingClient));

    // Rebinding supplies the missing client
    let client = mock();
    client.push_response(word(1).to_vec());
    let farmer = farmer.with_client(client);
    assert_eq!(farmer.address(), FARM);
    assert_eq!(farmer.total_alloc_point().call().await.unwrap(), U256::from(1));
}

#[test]
fn test_overloads_keep_distinct_selectors() {
    assert_eq!(reward_vault::STAKE_0.signature, "stake(uint256)");
    assert_eq!(reward_vault::STAKE_0.selector_hex(), "0xa694fc3a");
    assert_eq!(reward_vault::STAKE_1.signature, "stake(uint256,address)");
    assert_eq!(reward_vault::STAKE_1.selector_hex(), "0x7acb7757");

    let vault = RewardVault::new(FARM, mock());
    let single = vault.stake_0(U256::from(10)).calldata().unwrap();
    assert_eq!(single.len(), 4 + 32);
    assert_eq!(single[..4], reward_vault::STAKE_0.selector);

    let beneficiary = vault.stake_1(U256::from(10), LP_TOKEN).calldata().unwrap();
    assert_eq!(beneficiary[..4], reward_vault::STAKE_1.selector);
    assert_eq!(&beneficiary[4..36], &word(10));
    assert_eq!(&beneficiary[48..68], LP_TOKEN.as_slice());
}

#[test]
fn test_struct_argument_encoding() {
    let vault = RewardVault::new(FARM, mock());
    let config = Config {
        rate: 7,
        paused: true,
        admins: vec![SENDER],
    };
    let data = vault.configure(config).calldata().unwrap();

    assert_eq!(
        reward_vault::CONFIGURE.signature,
        "configure((uint32,bool,address[]))"
    );
    assert_eq!(reward_vault::CONFIGURE.selector_hex(), "0x0e98ee8b");
    assert_eq!(data[..4], reward_vault::CONFIGURE.selector);
    // Dynamic tuple: head offset, then rate, paused, admins offset, length, admin
    let words: Vec<&[u8]> = data[4..].chunks(32).collect();
    assert_eq!(words.len(), 6);
    assert_eq!(words[0], &word(0x20));
    assert_eq!(words[1], &word(7));
    assert_eq!(words[2], &word(1));
    assert_eq!(words[3], &word(0x60));
    assert_eq!(words[4], &word(1));
    assert_eq!(&words[5][12..], SENDER.as_slice());
}

#[test]
fn test_fixed_array_argument_length_checked() {
    let vault = RewardVault::new(FARM, mock());
    let data = vault
        .names(vec![U256::from(1), U256::from(2)])
        .calldata()
        .unwrap();
    assert_eq!(reward_vault::NAMES.selector_hex(), "0xb1ff3272");
    assert_eq!(data[..4], reward_vault::NAMES.selector);
    assert_eq!(&data[4..36], &word(1));
    assert_eq!(&data[36..68], &word(2));

    let err = vault
        .names(vec![U256::from(1), U256::from(2), U256::from(3)])
        .calldata()
        .unwrap_err();
    assert!(matches!(err, BindingError::Encode { .. }));
}

#[tokio::test]
async fn test_multiple_outputs_decode() {
    let client = mock();
    let mut data = Vec::new();
    data.extend_from_slice(&word(5));
    data.extend_from_slice(&I256::unchecked_from(-3i64).to_be_bytes::<32>());
    data.extend_from_slice(&[0xab; 32]);
    client.push_response(data);

    let vault = RewardVault::new(FARM, client);
    let (amount, debt, tag) = vault.positions(SENDER).call().await.unwrap();
    assert_eq!(amount, U256::from(5));
    assert_eq!(debt, I256::unchecked_from(-3i64));
    assert_eq!(tag, FixedBytes::<32>::repeat_byte(0xab));
}

#[test]
fn test_payable_method_accepts_value() {
    let vault = RewardVault::new(FARM, mock());
    let request = vault.notify().value(U256::from(9)).request().unwrap();
    assert_eq!(request.value, Some(U256::from(9)));

    let err = vault
        .stake_0(U256::from(1))
        .value(U256::from(9))
        .request()
        .unwrap_err();
    assert!(matches!(err, BindingError::NonPayableValue(_)));
}

#[test]
fn test_constructor_arguments_follow_bytecode() {
    assert_eq!(reward_vault::CONSTRUCTOR_INPUTS, &["address", "uint256"]);

    let signer: Arc<dyn SignerOrProvider> = mock();
    let request = RewardVaultFactory::new(Some(signer))
        .deploy_transaction(LP_TOKEN, U256::from(600), Overrides::new())
        .unwrap();
    let input = request.input.input().cloned().unwrap();

    let code = hex::decode(reward_vault::BYTECODE).unwrap();
    assert_eq!(input.len(), code.len() + 64);
    assert_eq!(&input[..code.len()], code.as_slice());
    assert_eq!(&input[code.len() + 12..code.len() + 32], LP_TOKEN.as_slice());
    assert_eq!(&input[code.len() + 32..], &word(600));
}
