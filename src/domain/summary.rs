use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::iter::Sum;
use std::ops::Add;

use super::{Cents, MonthPeriod, Transaction, TransactionKind};

/// Income, expense and balance totals for a set of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: Cents,
    pub total_expense: Cents,
    pub balance: Cents,
}

impl Summary {
    /// Totals for a single transaction.
    pub fn of(transaction: &Transaction) -> Self {
        let (total_income, total_expense) = match transaction.kind {
            TransactionKind::Income => (transaction.amount_cents, 0),
            TransactionKind::Expense => (0, transaction.amount_cents),
        };
        Summary {
            total_income,
            total_expense,
            balance: transaction.signed_amount(),
        }
    }

    pub fn is_deficit(&self) -> bool {
        self.balance < 0
    }
}

/// Saturates instead of overflowing. Validated entries are capped at
/// `MAX_AMOUNT_CENTS`, so only records written outside validation can reach the bound.
impl Add for Summary {
    type Output = Summary;

    fn add(self, other: Summary) -> Summary {
        Summary {
            total_income: self.total_income.saturating_add(other.total_income),
            total_expense: self.total_expense.saturating_add(other.total_expense),
            balance: self.balance.saturating_add(other.balance),
        }
    }
}

impl Sum for Summary {
    fn sum<I: Iterator<Item = Summary>>(iter: I) -> Summary {
        iter.fold(Summary::default(), |acc, s| acc + s)
    }
}

/// One category's share of total spending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount_cents: Cents,
    pub percentage: f64,
}

/// Transactions dated within `period`, most recent first.
/// Transactions sharing a date keep their relative order from `transactions`.
pub fn filter_by_month(transactions: &[Transaction], period: MonthPeriod) -> Vec<Transaction> {
    let mut filtered: Vec<Transaction> = transactions
        .iter()
        .filter(|t| period.contains(t.date))
        .cloned()
        .collect();
    filtered.sort_by(|a, b| b.date.cmp(&a.date));
    filtered
}

/// Sum income and expenses. The result does not depend on input order.
pub fn summarize(transactions: &[Transaction]) -> Summary {
    transactions.iter().map(Summary::of).sum()
}

/// Group expenses by category, largest first.
/// Categories with equal totals keep the order in which they first appear.
/// Percentages are 0 when `total_expense` is 0.
pub fn category_breakdown(transactions: &[Transaction], total_expense: Cents) -> Vec<CategoryShare> {
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, Cents> = HashMap::new();

    for transaction in transactions.iter().filter(|t| t.is_expense()) {
        let category = transaction.category.as_str();
        let total = totals.entry(category).or_insert_with(|| {
            order.push(category);
            0
        });
        *total = total.saturating_add(transaction.amount_cents);
    }

    let mut shares: Vec<CategoryShare> = order
        .into_iter()
        .map(|category| {
            let amount_cents = totals[category];
            let percentage = if total_expense > 0 {
                amount_cents as f64 / total_expense as f64 * 100.0
            } else {
                0.0
            };
            CategoryShare {
                category: category.to_string(),
                amount_cents,
                percentage,
            }
        })
        .collect();

    shares.sort_by(|a, b| b.amount_cents.cmp(&a.amount_cents));
    shares
}
