//! Wallet analysis action
//!
//! Extracts a wallet address from the message, composes the wallet's
//! balances, windowed PnL, and labeled trade history, and has the model
//! rewrite the numbers as a markdown report.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::actions::{
    extract_address, Action, ActionExample, ActionResponse, ChatMessage, ResponseSink,
    FALLBACK_TEXT,
};
use crate::analysis::classifier::ClassifiedTransaction;
use crate::analysis::wallet::{analyze_wallet, WalletAnalysis, WalletDataSource};
use crate::api::types::Holding;
use crate::config::Config;
use crate::error::Result;
use crate::llm::LanguageModel;

const RESPONSE_ACTION: &str = "ANALYZE_WALLET_RESPONSE";
const DEFAULT_SOURCE: &str = "wallet analysis";

const USAGE_HINT: &str = "Unable to extract the wallet address. Please try using one of the following formats:\n- Analyze this wallet {{walletAddress}}\n- Get me information on this wallet {{walletAddress}}\n- What do you know about this wallet {{walletAddress}}?\n- Do a quick research on this wallet {{walletAddress}}.";

pub struct AnalyzeWalletAction {
    model: Arc<dyn LanguageModel>,
    source: Arc<dyn WalletDataSource>,
    has_api_key: bool,
    pnl_window: String,
    trade_display_limit: usize,
}

impl AnalyzeWalletAction {
    pub fn new(
        model: Arc<dyn LanguageModel>,
        source: Arc<dyn WalletDataSource>,
        config: &Config,
    ) -> Self {
        Self {
            model,
            source,
            has_api_key: config.has_tracker_key(),
            pnl_window: config.analysis.pnl_window.clone(),
            trade_display_limit: config.analysis.trade_display_limit,
        }
    }

    fn respond(&self, message: &ChatMessage, text: String, data: Option<Value>) -> ActionResponse {
        ActionResponse {
            text,
            action: RESPONSE_ACTION.to_string(),
            source: message
                .source
                .clone()
                .unwrap_or_else(|| DEFAULT_SOURCE.to_string()),
            data,
        }
    }

    async fn run(&self, message: &ChatMessage, sink: &dyn ResponseSink) -> Result<()> {
        let prompt = format!(
            "Extract the wallet address from the user's message here: {}. Only return the wallet address as a string without quotes.",
            message.text
        );
        let Some(address) = extract_address(self.model.as_ref(), prompt).await? else {
            sink.deliver(self.respond(message, USAGE_HINT.to_string(), None))
                .await?;
            return Ok(());
        };

        let analysis = analyze_wallet(self.source.as_ref(), &address, &self.pnl_window).await?;

        let holdings = format_holdings(&analysis.wallet_analysis.new_tokens.tokens);
        let transactions = format_trades(&analysis.trades, self.trade_display_limit);
        let context = wallet_report_context(&analysis, &holdings, &transactions);

        let report = self.model.generate(&context, &[]).await?;
        let data = serde_json::to_value(&analysis)?;
        sink.deliver(self.respond(message, report, Some(data)))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Action for AnalyzeWalletAction {
    fn name(&self) -> &'static str {
        "ANALYZE_WALLET"
    }

    fn similes(&self) -> &'static [&'static str] {
        &["GET_WALLET_INFO", "GET_WALLET"]
    }

    fn description(&self) -> &'static str {
        "this action is used to analyze a wallet"
    }

    fn examples(&self) -> Vec<Vec<ActionExample>> {
        [
            "Analyze this wallet {{walletAddress}}",
            "Get me information on this wallet {{walletAddress}}",
            "what do you know about this wallet {{walletAddress}}?",
            "Do a quick research on this wallet {{walletAddress}}",
        ]
        .iter()
        .map(|text| vec![ActionExample::user(text), ActionExample::agent(self.name())])
        .collect()
    }

    /// The wallet endpoints all need the data API key.
    fn validate(&self, _message: &ChatMessage) -> bool {
        self.has_api_key
    }

    async fn handle(&self, message: &ChatMessage, sink: &dyn ResponseSink) -> Result<()> {
        if let Err(err) = self.run(message, sink).await {
            tracing::error!(error = %err, "wallet analysis failed");
            sink.deliver(self.respond(message, FALLBACK_TEXT.to_string(), None))
                .await?;
        }
        Ok(())
    }
}

fn format_holdings(holdings: &BTreeMap<String, Holding>) -> String {
    if holdings.is_empty() {
        return "No data available".to_string();
    }
    holdings
        .values()
        .map(|holding| {
            format!(
                "Name: {name}\nSymbol: {symbol}\nAddress: {mint}\nFirst Buy Amount: {amount}\nFirst Buy Value: ${first_value:.2}\nCurrent Value: ${current_value:.2}\nRealized: ${realized:.2}\nUnrealized: ${unrealized:.2}\nTotal: ${total:.2}",
                name = holding.name.as_deref().unwrap_or("unknown"),
                symbol = holding.symbol.as_deref().unwrap_or("unknown"),
                mint = holding.mint.as_deref().unwrap_or("unknown"),
                amount = holding.first_buy_amount,
                first_value = holding.first_buy_value,
                current_value = holding.current_value,
                realized = holding.realized,
                unrealized = holding.unrealized,
                total = holding.total,
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn format_trades(trades: &[ClassifiedTransaction], limit: usize) -> String {
    if trades.is_empty() {
        return "No Trades".to_string();
    }
    trades
        .iter()
        .take(limit)
        .map(|trade| {
            let tx = &trade.transaction;
            format!(
                "Hash: {hash}\nBase Token Address: {address}\nBase Token Amount: {amount}\nBase Token Details: {name} {symbol}\nPrice: ${price_usd}\nVolume (USD): {volume_usd}\nVolume (SOL): {volume_sol}\nWallet Address: {wallet}\nAction: {side}\nTime: {time}",
                hash = tx.tx,
                address = tx.from.address,
                amount = tx.from.amount,
                name = tx.from.token.name.as_deref().unwrap_or("unknown"),
                symbol = tx.from.token.symbol.as_deref().unwrap_or("unknown"),
                price_usd = tx.price.usd,
                volume_usd = tx.volume.usd,
                volume_sol = tx.volume.sol,
                wallet = tx.wallet,
                side = trade.side,
                time = time_ago(tx.time),
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// "3 days ago" style rendering of a Unix timestamp.
fn time_ago(unix_seconds: u64) -> String {
    let Some(when) = DateTime::<Utc>::from_timestamp(unix_seconds as i64, 0) else {
        return "unknown".to_string();
    };
    let seconds = Utc::now().signed_duration_since(when).num_seconds().max(0);
    let (count, unit) = match seconds {
        s if s < 60 => (s.max(1), "second"),
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s => (s / 86_400, "day"),
    };
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Prompt context for the wallet report. The braced placeholders are filled
/// in by the model from the data sections below them.
fn wallet_report_context(analysis: &WalletAnalysis, holdings: &str, transactions: &str) -> String {
    let summary = &analysis.wallet_analysis;
    let new_tokens = &summary.new_tokens;

    format!(
        r#"Using the wallet data below, generate a comprehensive wallet analysis in the following format:

# ({{walletAddress}}) Analysis 📊

[# Whale Analysis Criteria:

🐋 Whale Classification
[Analyze based on:
1. Portfolio Value Tier
- Dolphin: $100k-$500k
- Whale: $500k-$1M
- Mega Whale: >$1M

2. Capital Scale 💰
- Total Invested > $100,000 = Potential Whale
- Total Invested > $500,000 = Likely Whale
- Total Invested > $1,000,000 = Definite Whale

3. Trading Behavior 📊
- Average Buy Amount > $10,000 = Potential Whale
- Average Buy Amount > $50,000 = Likely Whale
- Average Buy Amount > $100,000 = Definite Whale

4. Performance Metrics ⚖️
- Win Percentage > 60% = Sophisticated Trader
- Total Realized/Unrealized > $100,000 = Significant Impact]

5. Trading Impact
- Volume per trade
- Position sizing
- Market impact

6. Trading Sophistication
- Win rate vs market average
- Portfolio diversification
- Risk management patterns]

# 📊 Trading Sophistication
├ Win rate vs market average: {{{{contentHere}}}}
├ Portfolio diversification:  {{{{contentHere}}}}
└ Risk management patterns: {{{{contentHere}}}}

# 📊 Risk Assessment
Overall Risk Level: [Low 🟢 | Medium 🟡 | High 🔴]


# 📊 Performance Summary
├ Total P&L: {total_pnl}
├ Realized: {realized_change}
├ Unrealized: {unrealized_change}
└ Total Capital Deployed: {total_invested}

# 📈 Trading Metrics
├ Success Rate: {win_percentage}% ({wins} wins)
├ Loss Rate: {loss_percentage}% ({losses} losses)
├ ROI: {percentage_change}%
└ Total Trades: {count}

💼 Portfolio Overview:
├ Total Capital: {total_change}
├ Realized P/L: {realized_change}
└ Total Profit and Loss: {total_pnl}

📈 Performance Metrics:
├ Win Rate: {win_percentage}%
├ Loss Rate: {loss_percentage}%
└ Break Even: {percentage_change}%

🎯 Whale Confidence Rating: [🔴/🟡/🟢]

💡 Analysis:
[Generate 2-3 sentences explaining the rating based on:
- Size of positions relative to market
- Win/loss ratio sophistication
- Overall capital deployment
- Transactions
- Profits/losses]

⚠️ Risk Level: [Low/Medium/High]
[Based on position sizes and win/loss ratio]

# Wallet Address
{wallet_address}

# USD Balance
${usd_balance}

# SOL Balance
{sol_balance}

# Holdings
{holdings}

# History
{transactions}

# Additional Insights:
- Count: {count}
- Total Current Value: {total_current_value}
"#,
        total_pnl = new_tokens.total_pnl,
        realized_change = summary.realized_change,
        unrealized_change = summary.unrealized_change,
        total_invested = new_tokens.total_invested,
        win_percentage = summary.win_percentage,
        wins = summary.wins,
        loss_percentage = summary.loss_percentage,
        losses = summary.losses,
        percentage_change = summary.percentage_change,
        count = new_tokens.count,
        total_change = summary.total_change,
        wallet_address = analysis.wallet_address,
        usd_balance = analysis.usd_balance,
        sol_balance = analysis.sol_balance,
        total_current_value = new_tokens.total_current_value,
        holdings = holdings,
        transactions = transactions,
    )
}
