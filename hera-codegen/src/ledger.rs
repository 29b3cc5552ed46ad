//! General-ledger balance rules
//!
//! For every transaction that posts GL lines, the debit total must equal the
//! credit total per currency, within [`BALANCE_TOLERANCE`]. The same rule is
//! emitted into the generated `gl-balance.ts` helper; this module is the
//! reference the generated tests and seed amounts are derived from.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::pack::{LineType, Side, TransactionDef};

/// Maximum absolute DR/CR difference still considered balanced.
pub const BALANCE_TOLERANCE: f64 = 0.01;

/// Total posted to each side of a sample transaction, in cents.
pub const SAMPLE_SIDE_TOTAL_CENTS: i64 = 100_000;

/// A concrete transaction line with a sample amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleLine {
    pub line_number: u32,
    pub name: String,
    pub line_type: LineType,
    pub smart_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub currency: String,
    pub quantity: u32,
    pub amount: f64,
}

impl SampleLine {
    /// `true` if this line counts toward the ledger balance.
    pub fn is_posting(&self) -> bool {
        self.line_type == LineType::Gl && self.side.is_some()
    }

    /// Amount formatted with two decimals, e.g. `1000.00`.
    pub fn amount_fixed(&self) -> String {
        format!("{:.2}", self.amount)
    }
}

/// Debit and credit totals for one currency.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CurrencyTotals {
    pub debit: f64,
    pub credit: f64,
}

impl CurrencyTotals {
    pub fn difference(&self) -> f64 {
        (self.debit - self.credit).abs()
    }

    pub fn is_balanced(&self) -> bool {
        self.difference() < BALANCE_TOLERANCE
    }
}

/// Per-currency totals of a line set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BalanceReport {
    pub currencies: BTreeMap<String, CurrencyTotals>,
}

impl BalanceReport {
    /// Balanced iff every currency is balanced. A set without GL lines is
    /// trivially balanced.
    pub fn is_balanced(&self) -> bool {
        self.currencies.values().all(CurrencyTotals::is_balanced)
    }
}

/// Sum GL lines per currency and side.
pub fn check_balance(lines: &[SampleLine]) -> BalanceReport {
    let mut report = BalanceReport::default();
    for line in lines.iter().filter(|l| l.is_posting()) {
        let totals = report.currencies.entry(line.currency.clone()).or_default();
        match line.side {
            Some(Side::Dr) => totals.debit += line.amount,
            Some(Side::Cr) => totals.credit += line.amount,
            None => {}
        }
    }
    report
}

/// Deterministic sample lines for a transaction template.
///
/// Each (currency, side) group of GL lines shares
/// [`SAMPLE_SIDE_TOTAL_CENTS`]; the last line of a group absorbs the rounding
/// remainder so the group sums exactly. Non-GL lines get quantity 1 and the
/// same nominal amount but never count toward the balance.
pub fn sample_lines(txn: &TransactionDef, default_currency: &str) -> Vec<SampleLine> {
    let currency_of = |idx: usize| -> String {
        txn.lines[idx]
            .currency
            .clone()
            .unwrap_or_else(|| default_currency.to_string())
    };

    // (currency, side) → line indices
    let mut groups: BTreeMap<(String, Side), Vec<usize>> = BTreeMap::new();
    for (idx, line) in txn.lines.iter().enumerate() {
        if let (LineType::Gl, Some(side)) = (line.line_type, line.side) {
            groups.entry((currency_of(idx), side)).or_default().push(idx);
        }
    }

    let mut cents = vec![SAMPLE_SIDE_TOTAL_CENTS; txn.lines.len()];
    for indices in groups.values() {
        let shares = split_cents(SAMPLE_SIDE_TOTAL_CENTS, indices.len());
        for (idx, share) in indices.iter().zip(shares) {
            cents[*idx] = share;
        }
    }

    txn.lines
        .iter()
        .enumerate()
        .map(|(idx, line)| SampleLine {
            line_number: idx as u32 + 1,
            name: line.name.clone(),
            line_type: line.line_type,
            smart_code: line.smart_code.clone(),
            side: line.side,
            currency: currency_of(idx),
            quantity: 1,
            amount: cents[idx] as f64 / 100.0,
        })
        .collect()
}

/// Split `total` into `parts` shares; the last share takes the remainder.
fn split_cents(total: i64, parts: usize) -> Vec<i64> {
    if parts == 0 {
        return Vec::new();
    }
    let n = parts as i64;
    let base = total / n;
    let mut shares = vec![base; parts];
    shares[parts - 1] = total - base * (n - 1);
    shares
}
