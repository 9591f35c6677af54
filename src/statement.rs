//! CSV statements for an account's transaction history.

use std::io;

use serde::Serialize;

use crate::model::Transaction;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Row<'a> {
    id: u64,
    r#type: String,
    amount: String,
    description: &'a str,
    timestamp: String,
    balance_after: String,
}

/// Write `transactions` as CSV rows to `out`, in the order given
/// (callers pass the newest-first order of `transactions_of`).
/// The header row is written even when the history is empty.
pub fn write_statement<W: io::Write>(out: W, transactions: &[Transaction]) -> csv::Result<()> {
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(["id", "type", "amount", "description", "timestamp", "balanceAfter"])?;

    for tx in transactions {
        let row = Row {
            id: tx.id.0,
            r#type: tx.kind.to_string(),
            amount: tx.amount.to_string(),
            description: &tx.description,
            timestamp: tx.timestamp.to_rfc3339(),
            balance_after: tx.balance_after.to_string(),
        };
        writer.serialize(&row)?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Amount;
    use crate::model::{AccountId, TxId, TxKind};

    fn tx(id: u64, kind: TxKind, amount: i64, balance_after: i64) -> Transaction {
        Transaction {
            id: TxId(id),
            account_id: AccountId(1),
            kind,
            amount: Amount::from_cents(amount),
            description: kind.default_description().to_string(),
            timestamp: "2026-08-06T12:00:00Z".parse().unwrap(),
            balance_after: Amount::from_cents(balance_after),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let transactions = vec![
            tx(2, TxKind::Withdrawal, 4_050, 5_950),
            tx(1, TxKind::Deposit, 10_000, 10_000),
        ];

        let mut out = Vec::new();
        write_statement(&mut out, &transactions).unwrap();
        let text = String::from_utf8(out).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "id,type,amount,description,timestamp,balanceAfter"
        );
        assert_eq!(
            lines[1],
            "2,withdrawal,40.50,Withdrawal,2026-08-06T12:00:00+00:00,59.50"
        );
        assert_eq!(
            lines[2],
            "1,deposit,100.00,Deposit,2026-08-06T12:00:00+00:00,100.00"
        );
    }

    #[test]
    fn empty_history_is_just_the_header() {
        let mut out = Vec::new();
        write_statement(&mut out, &[]).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
