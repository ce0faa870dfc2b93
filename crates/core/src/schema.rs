//! Column names the dashboard understands.

/// Transaction date, coerced to a timestamp.
pub const DATE: &str = "Date";
/// Revenue per transaction.
pub const TOTAL: &str = "Total";
/// Units sold.
pub const QUANTITY: &str = "Quantity";
/// Cost of goods sold.
pub const COGS: &str = "cogs";
/// Customer satisfaction score.
pub const RATING: &str = "Rating";
/// Product category label.
pub const PRODUCT_LINE: &str = "Product line";
/// Store location label.
pub const CITY: &str = "City";
/// Payment method label.
pub const PAYMENT: &str = "Payment";
/// Derived column: `Date` truncated to the first day of its month.
pub const MONTH: &str = "Month";

/// Columns coerced to numbers.
pub const NUMERIC_COLUMNS: [&str; 4] = [TOTAL, QUANTITY, COGS, RATING];

/// Columns grouped on as category labels.
pub const CATEGORY_COLUMNS: [&str; 3] = [PRODUCT_LINE, CITY, PAYMENT];

/// How a column is normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Date,
    Numeric,
    Category,
    PassThrough,
}

impl ColumnKind {
    /// Normalization kind for a header name.
    #[must_use]
    pub fn of(name: &str) -> Self {
        if name == DATE {
            Self::Date
        } else if NUMERIC_COLUMNS.contains(&name) {
            Self::Numeric
        } else if CATEGORY_COLUMNS.contains(&name) {
            Self::Category
        } else {
            Self::PassThrough
        }
    }
}

/// Every column some view depends on, in report order.
pub const EXPECTED_COLUMNS: [&str; 8] = [
    DATE,
    TOTAL,
    QUANTITY,
    COGS,
    RATING,
    PRODUCT_LINE,
    CITY,
    PAYMENT,
];
