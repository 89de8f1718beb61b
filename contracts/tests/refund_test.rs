//! Integration tests for the refund workflow: eligibility, fee split,
//! the three settlement legs and rollback.

use lot_contracts::{ConfigEntry, LedgerError, LotContract};
use lot_protocol::types::{AccountName, Asset, Symbol};
use lot_protocol::{ContractConfig, MemoryHost};

const TREASURY: &str = "lotttttttttt";
const FEE_COLLECTOR: &str = "lottttttteos";
const RESERVE: &str = "lotttttttlot";
const EOS_ISSUER: &str = "eosio.token";
const DB_MEMO: &str = "db-week1-a b c d e f g";

fn eos_symbol() -> Symbol {
    Symbol::new(4, "EOS").unwrap()
}

fn lot_symbol() -> Symbol {
    Symbol::new(4, "LOT").unwrap()
}

fn eos(units: i64) -> Asset {
    Asset::new(units, eos_symbol())
}

/// Whole LOT tokens.
fn lot(whole: i64) -> Asset {
    Asset::new(whole * 10_000, lot_symbol())
}

fn name(s: &str) -> AccountName {
    AccountName::from(s)
}

fn eos_of(contract: &LotContract<MemoryHost>, owner: &str) -> i64 {
    contract.balance_of(&name(owner), &eos_symbol().code)
}

fn lot_of(contract: &LotContract<MemoryHost>, owner: &str) -> i64 {
    contract.balance_of(&name(owner), &lot_symbol().code)
}

/// Alice exchanges 10.0000 EOS for 10,000 LOT and wagers 100 LOT on
/// `db/week1`. The treasury then holds 10.0000 EOS and 100 LOT, and the
/// treasury is signing.
fn setup() -> LotContract<MemoryHost> {
    let host = MemoryHost::with_accounts([
        TREASURY,
        FEE_COLLECTOR,
        RESERVE,
        EOS_ISSUER,
        "alice",
        "bob",
    ]);
    let mut contract = LotContract::new(ContractConfig::default(), host).unwrap();

    contract.host_mut().sign_as([TREASURY]);
    contract.create(EOS_ISSUER, eos(10_000_000_000)).unwrap();
    contract.create(TREASURY, lot(100_000_000)).unwrap();
    contract.init(ConfigEntry::new("db", "week1")).unwrap();

    contract.host_mut().sign_as([EOS_ISSUER]);
    contract.issue("alice", eos(1_000_000), "").unwrap();

    contract.host_mut().sign_as(["alice"]);
    contract.transfer("alice", TREASURY, eos(100_000), "").unwrap();
    contract.transfer("alice", TREASURY, lot(100), DB_MEMO).unwrap();

    contract.host_mut().sign_as([TREASURY]);
    contract
}

fn stop_week1(contract: &mut LotContract<MemoryHost>) {
    contract
        .init(ConfigEntry::new("db", "week1").stopped(true))
        .unwrap();
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

#[test]
fn refund_splits_and_records() {
    let mut contract = setup();
    stop_week1(&mut contract);
    assert_eq!(lot_of(&contract, TREASURY), lot(100).amount);
    let treasury_eos = eos_of(&contract, TREASURY);
    let alice_eos = eos_of(&contract, "alice");

    contract
        .refund(TREASURY, "alice", lot(100), "db", "week1", "sorry")
        .unwrap();

    // 1,000,000 units gross: net 900, fee 100.
    assert_eq!(eos_of(&contract, "alice"), alice_eos + 900);
    assert_eq!(eos_of(&contract, FEE_COLLECTOR), 100);
    assert_eq!(eos_of(&contract, TREASURY), treasury_eos - 1_000);
    assert_eq!(lot_of(&contract, RESERVE), lot(100).amount);
    assert_eq!(lot_of(&contract, TREASURY), 0);

    let records = contract.refund_records();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.id, 0);
    assert_eq!(record.recipient, name("alice"));
    assert_eq!(record.net, eos(900));
    assert_eq!(record.fee, eos(100));
    assert_eq!(record.gross, lot(100));
    assert_eq!(record.memo, "sorry");
    assert_eq!((record.typ.as_str(), record.period.as_str()), ("db", "week1"));
}

#[test]
fn configured_deduction_applies() {
    let mut contract = setup();
    stop_week1(&mut contract);
    contract
        .init(ConfigEntry::new("init", "").with_memo("1000-100-50-25"))
        .unwrap();

    contract
        .refund(TREASURY, "alice", lot(100), "db", "week1", "")
        .unwrap();
    assert_eq!(contract.refund_records()[0].net, eos(750));
    assert_eq!(contract.refund_records()[0].fee, eos(250));
}

#[test]
fn refund_notifies_every_leg() {
    let mut contract = setup();
    stop_week1(&mut contract);
    contract.host_mut().take_notifications();

    let receipt = contract
        .refund(TREASURY, "alice", lot(100), "db", "week1", "")
        .unwrap();
    assert_eq!(
        receipt.notified,
        vec![name(TREASURY), name(RESERVE), name("alice"), name(FEE_COLLECTOR)]
    );
}

// ---------------------------------------------------------------------------
// Eligibility
// ---------------------------------------------------------------------------

#[test]
fn open_period_cannot_be_refunded() {
    let mut contract = setup();
    assert!(matches!(
        contract.refund(TREASURY, "alice", lot(100), "db", "week1", ""),
        Err(LedgerError::HitNotStopped { .. })
    ));
}

#[test]
fn refund_caller_checks() {
    let mut contract = setup();
    stop_week1(&mut contract);

    contract.host_mut().sign_as(["alice"]);
    assert_eq!(
        contract.refund(TREASURY, "alice", lot(100), "db", "week1", ""),
        Err(LedgerError::Unauthorized(name(TREASURY)))
    );
    assert_eq!(
        contract.refund("alice", "bob", lot(100), "db", "week1", ""),
        Err(LedgerError::Unauthorized(name(TREASURY)))
    );

    contract.host_mut().sign_as([TREASURY]);
    assert_eq!(
        contract.refund(TREASURY, TREASURY, lot(100), "db", "week1", ""),
        Err(LedgerError::SelfTransfer)
    );
    assert!(matches!(
        contract.refund(TREASURY, "alice", eos(100), "db", "week1", ""),
        Err(LedgerError::InvalidSymbol(_))
    ));
}

#[test]
fn refund_target_checks() {
    let mut contract = setup();
    stop_week1(&mut contract);

    assert_eq!(
        contract.refund(TREASURY, "nobody", lot(100), "db", "week1", ""),
        Err(LedgerError::AccountNotFound(name("nobody")))
    );
    assert_eq!(
        contract.refund(TREASURY, "alice", lot(100), "", "week1", ""),
        Err(LedgerError::BadType)
    );
    assert_eq!(
        contract.refund(TREASURY, "alice", lot(100), "db", "", ""),
        Err(LedgerError::BadPeriod)
    );
    assert!(matches!(
        contract.refund(TREASURY, "alice", lot(100), "db", "week7", ""),
        Err(LedgerError::BadTypeOrPeriod { .. })
    ));
}

// ---------------------------------------------------------------------------
// Rollback
// ---------------------------------------------------------------------------

#[test]
fn tiny_refund_fails_whole() {
    let mut contract = setup();
    stop_week1(&mut contract);
    let before = contract.state().clone();

    // 0.0010 LOT: net and fee both round to zero, and the net leg is
    // rejected after the reserve leg already ran.
    let err = contract
        .refund(TREASURY, "alice", Asset::new(10, lot_symbol()), "db", "week1", "")
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
    assert_eq!(contract.state(), &before);
}

#[test]
fn refund_beyond_treasury_holdings_fails_whole() {
    let mut contract = setup();
    stop_week1(&mut contract);
    let before = contract.state().clone();

    assert!(matches!(
        contract.refund(TREASURY, "alice", lot(200), "db", "week1", ""),
        Err(LedgerError::InsufficientBalance { .. })
    ));
    assert_eq!(contract.state(), &before);
    assert!(contract.refund_records().is_empty());
}
