use super::TransactionKind;

pub const INCOME_CATEGORIES: &[&str] = &["Salary", "Bonus", "Sales", "Investment", "Other"];

pub const EXPENSE_CATEGORIES: &[&str] = &[
    "Food & Drinks",
    "Transportation",
    "Shopping",
    "Bills & Utilities",
    "Entertainment",
    "Health",
    "Education",
    "Other",
];

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Suggested categories for a kind. Any non-empty category is still accepted.
pub fn suggested_categories(kind: TransactionKind) -> &'static [&'static str] {
    match kind {
        TransactionKind::Income => INCOME_CATEGORIES,
        TransactionKind::Expense => EXPENSE_CATEGORIES,
    }
}

pub fn is_suggested(kind: TransactionKind, category: &str) -> bool {
    suggested_categories(kind).contains(&category)
}
