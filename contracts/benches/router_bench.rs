// Transfer router benchmarks for the lot ledger.
//
// Covers route classification, a full wager dispatch (clone, validate,
// settle, record) and quota aggregation over a growing record table.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use lot_contracts::router::classify;
use lot_contracts::{ConfigEntry, LotContract};
use lot_protocol::types::{AccountName, Asset, Symbol};
use lot_protocol::{ContractConfig, MemoryHost};

const TREASURY: &str = "lotttttttttt";

fn lot(whole: i64) -> Asset {
    Asset::new(whole * 10_000, Symbol::new(4, "LOT").unwrap())
}

/// Contract with `players` funded accounts, each holding `prior` accepted
/// wagers on `db/week1`. Per-hit unit lowered to 1 and the cap raised so
/// the setup never hits the quota.
fn setup(players: usize, prior: usize) -> LotContract<MemoryHost> {
    let names: Vec<String> = (0..players)
        .map(|i| format!("player{}{}", i / 5 + 1, i % 5 + 1))
        .collect();
    let mut host = MemoryHost::with_accounts([TREASURY]);
    for n in &names {
        host.add_account(n.as_str());
    }

    let mut contract = LotContract::new(ContractConfig::default(), host).unwrap();
    contract.host_mut().sign_as([TREASURY]);
    contract.create(TREASURY, lot(1_000_000_000)).unwrap();
    contract
        .init(ConfigEntry::new("init", "").with_memo("1000-1-250"))
        .unwrap();
    contract.init(ConfigEntry::new("db", "week1")).unwrap();
    for n in &names {
        contract.issue(n.as_str(), lot(1_000), "").unwrap();
    }

    for n in &names {
        contract.host_mut().sign_as([n.as_str()]);
        for _ in 0..prior {
            contract
                .transfer(n.as_str(), TREASURY, lot(1), "db-week1-a b c d e f g")
                .unwrap();
        }
    }
    contract
}

fn bench_classify(c: &mut Criterion) {
    let config = ContractConfig::default();
    let from = AccountName::from("alice");
    let symbol = config.secondary_symbol.clone();

    c.bench_function("router/classify", |b| {
        b.iter(|| classify(black_box(&config), &from, &config.treasury, &symbol));
    });
}

fn bench_wager_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("router/wager_dispatch");
    for prior in [0usize, 50, 200] {
        let base = setup(4, prior);
        group.bench_with_input(BenchmarkId::from_parameter(prior), &prior, |b, _| {
            b.iter_batched(
                || {
                    LotContract::from_state(
                        base.config().clone(),
                        base.host().clone(),
                        base.state().clone(),
                    )
                    .unwrap()
                },
                |mut contract| {
                    contract.host_mut().sign_as(["player11"]);
                    contract
                        .transfer("player11", TREASURY, lot(1), "db-week1-a b c d e f g")
                        .unwrap()
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_quota_usage(c: &mut Criterion) {
    let mut group = c.benchmark_group("router/quota_usage");
    for players in [5usize, 20] {
        let contract = setup(players, 50);
        let participant = AccountName::from("player11");
        group.bench_with_input(BenchmarkId::from_parameter(players), &players, |b, _| {
            b.iter(|| contract.quota_usage(black_box(&participant), "db", "week1").unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_classify, bench_wager_dispatch, bench_quota_usage);
criterion_main!(benches);
