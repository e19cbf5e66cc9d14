//! Buy/sell classification for swap transactions

use serde::{Deserialize, Serialize};

use crate::api::types::Transaction;

/// Mint address of wrapped SOL, the quote side of most Solana pairs.
pub const WSOL_MINT: &str = "So11111111111111111111111111111111111111112";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    pub fn as_str(self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction labeled with the direction it represents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    #[serde(rename = "type")]
    pub side: TradeSide,
}

/// Label transactions as buys or sells, preserving their order.
///
/// With a target token only transactions touching that token are kept:
/// receiving it is a buy, sending it is a sell. Without a target, a swap
/// into wrapped SOL means the wallet exited a position and counts as a
/// sell; everything else counts as a buy.
pub fn classify_transactions(
    transactions: Vec<Transaction>,
    token_address: Option<&str>,
) -> Vec<ClassifiedTransaction> {
    match token_address {
        Some(target) => transactions
            .into_iter()
            .filter(|tx| tx.from.address == target || tx.to.address == target)
            .map(|tx| {
                let side = if tx.to.address == target {
                    TradeSide::Buy
                } else {
                    TradeSide::Sell
                };
                ClassifiedTransaction {
                    transaction: tx,
                    side,
                }
            })
            .collect(),
        None => transactions
            .into_iter()
            .map(|tx| {
                let side = if tx.to.address == WSOL_MINT {
                    TradeSide::Sell
                } else {
                    TradeSide::Buy
                };
                ClassifiedTransaction {
                    transaction: tx,
                    side,
                }
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swap(tx: &str, from: &str, to: &str) -> Transaction {
        let mut transaction = Transaction {
            tx: tx.to_string(),
            ..Transaction::default()
        };
        transaction.from.address = from.to_string();
        transaction.to.address = to.to_string();
        transaction
    }

    #[test]
    fn with_target_receiving_is_a_buy_and_sending_is_a_sell() {
        let target = "TargetMint11111111111111111111111111111111";
        let classified = classify_transactions(
            vec![
                swap("t1", WSOL_MINT, target),
                swap("t2", target, WSOL_MINT),
            ],
            Some(target),
        );

        assert_eq!(classified.len(), 2);
        assert_eq!(classified[0].side, TradeSide::Buy);
        assert_eq!(classified[1].side, TradeSide::Sell);
    }

    #[test]
    fn with_target_unrelated_transactions_are_dropped() {
        let target = "TargetMint11111111111111111111111111111111";
        let classified = classify_transactions(
            vec![
                swap("t1", "OtherA", "OtherB"),
                swap("t2", target, "OtherB"),
                swap("t3", "OtherA", "OtherB"),
            ],
            Some(target),
        );

        assert_eq!(classified.len(), 1);
        assert_eq!(classified[0].transaction.tx, "t2");
        assert_eq!(classified[0].side, TradeSide::Sell);
    }

    #[test]
    fn without_target_wsol_destination_means_sell() {
        let classified = classify_transactions(
            vec![
                swap("t1", "SomeMint", WSOL_MINT),
                swap("t2", WSOL_MINT, "SomeMint"),
                swap("t3", "SomeMint", "OtherMint"),
            ],
            None,
        );

        assert_eq!(classified.len(), 3);
        assert_eq!(classified[0].side, TradeSide::Sell);
        assert_eq!(classified[1].side, TradeSide::Buy);
        assert_eq!(classified[2].side, TradeSide::Buy);
    }

    #[test]
    fn order_is_preserved() {
        let classified = classify_transactions(
            vec![swap("t1", "a", "b"), swap("t2", "c", "d"), swap("t3", "e", "f")],
            None,
        );
        let hashes: Vec<_> = classified
            .iter()
            .map(|c| c.transaction.tx.as_str())
            .collect();
        assert_eq!(hashes, vec!["t1", "t2", "t3"]);
    }

    #[test]
    fn side_serializes_as_a_lowercase_type_tag() {
        let classified = classify_transactions(vec![swap("t1", "a", WSOL_MINT)], None);
        let value = serde_json::to_value(&classified[0]).unwrap();
        assert_eq!(value["type"], "sell");
        assert_eq!(value["tx"], "t1");
    }
}
