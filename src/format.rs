//! Display formatting: currency, dates, chart axis and pagination controls.

use crate::entity::RevenuePoint;
use crate::error::Result;
use chrono::NaiveDate;
use std::fmt;

/// Render an amount in cents as en-US dollars.
///
/// ```
/// use invoice_kit::format::format_currency;
///
/// assert_eq!(format_currency(15795), "$157.95");
/// assert_eq!(format_currency(0), "$0.00");
/// assert_eq!(format_currency(123456789), "$1,234,567.89");
/// ```
pub fn format_currency(amount_in_cents: i64) -> String {
    let sign = if amount_in_cents < 0 { "-" } else { "" };
    let abs = amount_in_cents.unsigned_abs();
    let dollars = group_thousands(abs / 100);
    format!("{}${}.{:02}", sign, dollars, abs % 100)
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Render a date the way the invoices table shows it, e.g. `Dec 6, 2022`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Parse an ISO `YYYY-MM-DD` date and render it with [`format_date`].
///
/// # Errors
/// Returns `Error::Validation` if the input is not an ISO calendar date.
pub fn format_date_to_local(iso_date: &str) -> Result<String> {
    let date = NaiveDate::parse_from_str(iso_date, "%Y-%m-%d")?;
    Ok(format_date(date))
}

/// Step between two Y-axis labels, in revenue units.
pub const Y_AXIS_STEP: i64 = 1000;

/// Beyond this many steps the label interval widens to a multiple of the step.
pub const MAX_Y_AXIS_INTERVALS: i64 = 20;

/// Y-axis of the revenue chart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct YAxis {
    /// Labels from `$0K` up to the top label, ascending.
    pub labels: Vec<String>,
    /// Highest revenue rounded up to the next step.
    pub top_label: i64,
}

/// Build the revenue chart's Y-axis.
///
/// ```
/// use invoice_kit::entity::RevenuePoint;
/// use invoice_kit::format::generate_y_axis;
///
/// let axis = generate_y_axis(&[RevenuePoint { month: "Jan".into(), revenue: 4800 }]);
/// assert_eq!(axis.top_label, 5000);
/// assert_eq!(axis.labels.first().map(String::as_str), Some("$0K"));
/// assert_eq!(axis.labels.last().map(String::as_str), Some("$5K"));
/// ```
pub fn generate_y_axis(points: &[RevenuePoint]) -> YAxis {
    let highest = points.iter().map(|p| p.revenue).max().unwrap_or(0).max(0);
    let steps = ceil_div(highest, Y_AXIS_STEP);
    let interval = Y_AXIS_STEP.saturating_mul(ceil_div(steps, MAX_Y_AXIS_INTERVALS).max(1));
    let intervals = ceil_div(highest, interval);
    let top_label = intervals.saturating_mul(interval);

    let labels = (0..=intervals)
        .map(|i| format!("${}K", i.saturating_mul(interval) / 1000))
        .collect();

    YAxis { labels, top_label }
}

/// `a / b` rounded up, for `a >= 0` and `b > 0`.
fn ceil_div(a: i64, b: i64) -> i64 {
    a / b + i64::from(a % b != 0)
}

/// One slot in the pagination control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageItem::Page(n) => write!(f, "{}", n),
            PageItem::Ellipsis => f.write_str("..."),
        }
    }
}

/// Page numbers to show for `current_page` of `total_pages`.
///
/// Seven or fewer pages are listed in full. Otherwise the first and last
/// pages are always shown, with ellipses around the current window.
pub fn generate_pagination(current_page: u32, total_pages: u32) -> Vec<PageItem> {
    use PageItem::{Ellipsis, Page};

    if total_pages <= 7 {
        return (1..=total_pages).map(Page).collect();
    }

    if current_page <= 3 {
        return vec![
            Page(1),
            Page(2),
            Page(3),
            Ellipsis,
            Page(total_pages - 1),
            Page(total_pages),
        ];
    }

    if current_page >= total_pages - 2 {
        return vec![
            Page(1),
            Page(2),
            Ellipsis,
            Page(total_pages - 2),
            Page(total_pages - 1),
            Page(total_pages),
        ];
    }

    vec![
        Page(1),
        Ellipsis,
        Page(current_page - 1),
        Page(current_page),
        Page(current_page + 1),
        Ellipsis,
        Page(total_pages),
    ]
}
