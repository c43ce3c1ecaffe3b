//! Report text

use super::types::{FeeAverages, FeeReport};
use crate::types::Chain;
use std::fmt::Write;

pub const DAILY_HEADER: &str = "USDT daily average fee:";
pub const WEEKLY_HEADER: &str = "USDT weekly average fee:";

/// Render the daily and weekly blocks as Slack markdown
pub fn format_report(report: &FeeReport) -> String {
    let mut out = String::new();
    write_block(&mut out, DAILY_HEADER, &report.daily);
    write_block(&mut out, WEEKLY_HEADER, &report.weekly);
    out
}

fn write_block(out: &mut String, header: &str, averages: &FeeAverages) {
    out.push_str(header);
    out.push('\n');
    for chain in Chain::ALL {
        // Writing into a String cannot fail
        let _ = match averages.fee(chain) {
            Some(fee) => writeln!(
                out,
                "> {}: `{:.2}$` - `{:.2}$`",
                chain.label(),
                fee.low,
                fee.high
            ),
            None => writeln!(out, "> {}: `n/a`", chain.label()),
        };
    }
}
