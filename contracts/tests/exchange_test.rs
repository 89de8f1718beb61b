//! Integration tests for primary-currency deposits: exchange issuance,
//! the fee-sweep bypass, and primary moves that no rule claims.

use lot_contracts::{LedgerError, LedgerMetrics, LotContract};
use lot_protocol::types::{AccountName, Asset, Symbol};
use lot_protocol::{ContractConfig, MemoryHost};

const TREASURY: &str = "lotttttttttt";
const FEE_COLLECTOR: &str = "lottttttteos";
const EOS_ISSUER: &str = "eosio.token";

fn eos_symbol() -> Symbol {
    Symbol::new(4, "EOS").unwrap()
}

fn lot_symbol() -> Symbol {
    Symbol::new(4, "LOT").unwrap()
}

/// Raw EOS smallest units.
fn eos(units: i64) -> Asset {
    Asset::new(units, eos_symbol())
}

fn name(s: &str) -> AccountName {
    AccountName::from(s)
}

/// EOS and LOT registered, alice holding 100.0000 EOS. `lot_issuer` owns
/// the LOT currency.
fn setup_with_issuer(lot_issuer: &str) -> LotContract<MemoryHost> {
    let host = MemoryHost::with_accounts([TREASURY, FEE_COLLECTOR, EOS_ISSUER, "alice", "bob"]);
    let mut contract = LotContract::new(ContractConfig::default(), host).unwrap();

    contract.host_mut().sign_as([TREASURY]);
    contract
        .create(EOS_ISSUER, eos(10_000_000_000))
        .unwrap();
    contract
        .create(lot_issuer, Asset::new(1_000_000_000_000, lot_symbol()))
        .unwrap();

    contract.host_mut().sign_as([EOS_ISSUER]);
    contract.issue("alice", eos(1_000_000), "").unwrap();
    contract.issue(FEE_COLLECTOR, eos(5_000), "").unwrap();

    contract.host_mut().sign_as(["alice"]);
    contract.host_mut().take_notifications();
    contract
}

fn setup() -> LotContract<MemoryHost> {
    setup_with_issuer(TREASURY)
}

fn eos_of(contract: &LotContract<MemoryHost>, owner: &str) -> i64 {
    contract.balance_of(&name(owner), &eos_symbol().code)
}

fn lot_of(contract: &LotContract<MemoryHost>, owner: &str) -> i64 {
    contract.balance_of(&name(owner), &lot_symbol().code)
}

// ---------------------------------------------------------------------------
// Exchange
// ---------------------------------------------------------------------------

#[test]
fn deposit_is_exchanged_at_default_rate() {
    let mut contract = setup();
    contract.transfer("alice", TREASURY, eos(100), "").unwrap();

    assert_eq!(eos_of(&contract, "alice"), 1_000_000 - 100);
    assert_eq!(eos_of(&contract, TREASURY), 100);
    assert_eq!(lot_of(&contract, "alice"), 100_000);
    assert_eq!(
        contract.currency(&lot_symbol().code).unwrap().supply.amount,
        100_000
    );
    // Issued to the treasury and forwarded; nothing left behind.
    assert_eq!(lot_of(&contract, TREASURY), 0);
}

#[test]
fn configured_rate_applies() {
    let mut contract = setup();
    contract.host_mut().sign_as([TREASURY]);
    contract
        .init(lot_contracts::ConfigEntry::new("init", "").with_memo("250"))
        .unwrap();

    contract.host_mut().sign_as(["alice"]);
    contract.transfer("alice", TREASURY, eos(40), "").unwrap();
    assert_eq!(lot_of(&contract, "alice"), 10_000);
}

#[test]
fn exchange_notifies_every_party_once() {
    let mut contract = setup();
    let receipt = contract.transfer("alice", TREASURY, eos(100), "").unwrap();
    assert_eq!(receipt.notified, vec![name("alice"), name(TREASURY)]);
}

#[test]
fn exchange_needs_treasury_to_issue() {
    let mut contract = setup_with_issuer("bob");
    let before = contract.state().clone();

    assert_eq!(
        contract.transfer("alice", TREASURY, eos(100), ""),
        Err(LedgerError::Unauthorized(name("bob")))
    );
    // The deposit itself was rolled back too.
    assert_eq!(contract.state(), &before);
    assert_eq!(eos_of(&contract, "alice"), 1_000_000);
}

#[test]
fn exchange_respects_secondary_supply() {
    let host = MemoryHost::with_accounts([TREASURY, EOS_ISSUER, "alice"]);
    let mut contract = LotContract::new(ContractConfig::default(), host).unwrap();
    contract.host_mut().sign_as([TREASURY]);
    contract.create(EOS_ISSUER, eos(1_000_000)).unwrap();
    contract
        .create(TREASURY, Asset::new(50_000, lot_symbol()))
        .unwrap();
    contract.host_mut().sign_as([EOS_ISSUER]);
    contract.issue("alice", eos(1_000), "").unwrap();

    contract.host_mut().sign_as(["alice"]);
    contract.transfer("alice", TREASURY, eos(50), "").unwrap();
    assert!(matches!(
        contract.transfer("alice", TREASURY, eos(1), ""),
        Err(LedgerError::SupplyExceeded { .. })
    ));
    assert_eq!(eos_of(&contract, "alice"), 950);
}

#[test]
fn deposit_needs_payer_authority() {
    let mut contract = setup();
    contract.host_mut().sign_as(["bob"]);
    assert_eq!(
        contract.transfer("alice", TREASURY, eos(100), ""),
        Err(LedgerError::Unauthorized(name("alice")))
    );
}

// ---------------------------------------------------------------------------
// Bypass / pass-through
// ---------------------------------------------------------------------------

#[test]
fn fee_sweep_is_not_exchanged() {
    let mut contract = setup();
    contract.host_mut().sign_as([FEE_COLLECTOR]);
    contract
        .transfer(FEE_COLLECTOR, TREASURY, eos(5_000), "sweep")
        .unwrap();

    assert_eq!(eos_of(&contract, TREASURY), 5_000);
    assert_eq!(lot_of(&contract, FEE_COLLECTOR), 0);
    assert!(contract.currency(&lot_symbol().code).unwrap().supply.is_zero());
}

#[test]
fn primary_between_users_is_settled_only() {
    let mut contract = setup();
    contract.transfer("alice", "bob", eos(300), "").unwrap();
    assert_eq!(eos_of(&contract, "bob"), 300);
    assert!(contract.currency(&lot_symbol().code).unwrap().supply.is_zero());
}

#[test]
fn metrics_follow_commits_and_rejections() {
    let metrics = LedgerMetrics::new().unwrap();
    let mut contract = setup().with_metrics(metrics.clone());

    contract.transfer("alice", TREASURY, eos(100), "").unwrap();
    assert!(contract.transfer("alice", "alice", eos(1), "").is_err());

    assert_eq!(
        metrics.actions_total.with_label_values(&["transfer"]).get(),
        1
    );
    assert_eq!(
        metrics
            .rejections_total
            .with_label_values(&["self_transfer"])
            .get(),
        1
    );
    assert_eq!(metrics.exchange_issued_units_total.get(), 100_000);
}
