use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use teller::model::{AccountType, UserId};
use teller::{Amount, Bank};

/// Seeded demo user.
const DEMO_USER: UserId = UserId(2);

fn bank_with_funded_account(transactions: usize) -> (Bank, teller::AccountId) {
    let bank = Bank::in_memory();
    let account = bank
        .create_account(DEMO_USER, AccountType::Savings)
        .expect("create account");

    // Deposit 100, deposit 50, withdraw 30 (repeating) keeps the balance
    // climbing, so withdrawals never fail.
    for step in 0..transactions {
        match step % 3 {
            0 => bank
                .deposit(account.id, Amount::from_cents(10_000), None)
                .expect("deposit"),
            1 => bank
                .deposit(account.id, Amount::from_cents(5_000), None)
                .expect("deposit"),
            _ => bank
                .withdraw(account.id, Amount::from_cents(3_000), None)
                .expect("withdraw"),
        };
    }
    (bank, account.id)
}

fn bench_apply(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger_apply");

    group.bench_function("deposit_withdraw_cycle", |b| {
        let (bank, account) = bank_with_funded_account(0);
        bank.deposit(account, Amount::from_cents(1_000_000), None)
            .expect("initial funding");
        b.iter(|| {
            bank.deposit(account, Amount::from_cents(10_000), None)
                .expect("deposit");
            bank.withdraw(account, Amount::from_cents(10_000), None)
                .expect("withdraw");
        });
    });

    group.finish();
}

fn bench_history(c: &mut Criterion) {
    let mut group = c.benchmark_group("history");

    for size in [10usize, 1_000, 10_000] {
        let (bank, account) = bank_with_funded_account(size);
        group.bench_with_input(BenchmarkId::new("transactions_of", size), &size, |b, _| {
            b.iter(|| {
                let history = bank.transactions_of(account);
                assert_eq!(history.len(), size);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_apply, bench_history);
criterion_main!(benches);
