//! Address summarization.
//!
//! Merges single addresses and CIDR blocks into the minimal ordered list of
//! consecutive runs. Works on `(start, end)` intervals, so a /8 costs the
//! same as a single address.

use crate::error::NetError;
use crate::models::{AddressRun, Family, NetworkRange};
use itertools::Itertools;

/// Closed interval of address values.
type Interval = (u128, u128);

/// Parse the non-blank specs into intervals of a single family.
fn parse_intervals<S: AsRef<str>>(
    specs: &[S],
) -> Result<Option<(Family, Vec<Interval>)>, NetError> {
    let mut family: Option<Family> = None;
    let mut intervals = Vec::with_capacity(specs.len());

    for spec in specs.iter().map(AsRef::as_ref) {
        if spec.trim().is_empty() {
            continue;
        }
        let net = NetworkRange::parse_cidr(spec, false).map_err(|e| match e {
            NetError::Format(msg) | NetError::Range(msg) | NetError::Parse(msg) => {
                NetError::format(format!("cannot parse '{}': {msg}", spec.trim()))
            }
        })?;
        match family {
            None => family = Some(net.family()),
            Some(f) if f != net.family() => {
                return Err(NetError::parse(format!(
                    "cannot mix {f} and {} addresses ('{}')",
                    net.family(),
                    spec.trim()
                )));
            }
            Some(_) => {}
        }
        intervals.push((net.network(), net.broadcast()));
    }
    Ok(family.map(|f| (f, intervals)))
}

/// Merge intervals that overlap or touch, returning them in ascending order.
fn merge_intervals(intervals: Vec<Interval>) -> Vec<Interval> {
    intervals
        .into_iter()
        .sorted_unstable()
        .coalesce(|prev, next| {
            if next.0 <= prev.1.saturating_add(1) {
                Ok((prev.0, prev.1.max(next.1)))
            } else {
                Err((prev, next))
            }
        })
        .collect()
}

/// Summarize address specs into ascending runs.
///
/// Each spec is an address or a block (`10.0.0.0/24`, host bits tolerated).
/// Blank specs are skipped. All specs must be of one address family.
///
/// # Examples
/// ```
/// use ip_toolbox::processing::summarize;
/// let runs = summarize(&["10.0.0.1", "10.0.0.2", "10.0.0.4"]).unwrap();
/// let text: Vec<String> = runs.iter().map(|r| r.to_string()).collect();
/// assert_eq!(text, vec!["10.0.0.1-10.0.0.2", "10.0.0.4"]);
/// ```
pub fn summarize<S: AsRef<str>>(specs: &[S]) -> Result<Vec<AddressRun>, NetError> {
    let Some((family, intervals)) = parse_intervals(specs)? else {
        return Ok(Vec::new());
    };
    let count = intervals.len();
    let runs: Vec<AddressRun> = merge_intervals(intervals)
        .into_iter()
        .map(|(start, end)| AddressRun::from_values(family, start, end))
        .collect();
    log::debug!("summarize: {count} {family} specs -> {} runs", runs.len());
    Ok(runs)
}

/// Summarize, then split every run into aligned CIDR blocks.
pub fn summarize_cidrs<S: AsRef<str>>(specs: &[S]) -> Result<Vec<NetworkRange>, NetError> {
    Ok(summarize(specs)?
        .iter()
        .flat_map(AddressRun::to_cidrs)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(specs: &[&str]) -> Vec<String> {
        summarize(specs)
            .unwrap()
            .iter()
            .map(|r| r.to_string())
            .collect()
    }

    #[test]
    fn test_single_block() {
        assert_eq!(text(&["10.0.0.0/30"]), vec!["10.0.0.0-10.0.0.3"]);
        assert_eq!(text(&["10.0.0.5/32"]), vec!["10.0.0.5"]);
    }

    #[test]
    fn test_gaps_and_singles() {
        assert_eq!(
            text(&["10.0.0.1", "10.0.0.2", "10.0.0.4"]),
            vec!["10.0.0.1-10.0.0.2", "10.0.0.4"]
        );
    }

    #[test]
    fn test_unsorted_duplicates_and_overlaps() {
        assert_eq!(
            text(&["10.0.1.0/24", "10.0.0.7", "10.0.0.0/29", "10.0.1.5", "", "10.0.0.8"]),
            vec!["10.0.0.0-10.0.0.8", "10.0.1.0-10.0.1.255"]
        );
    }

    #[test]
    fn test_numeric_not_lexical_order() {
        assert_eq!(
            text(&["10.0.0.10", "10.0.0.9", "10.0.0.100"]),
            vec!["10.0.0.9-10.0.0.10", "10.0.0.100"]
        );
    }

    #[test]
    fn test_host_bits_tolerated() {
        assert_eq!(text(&["192.168.1.77/30"]), vec!["192.168.1.76-192.168.1.79"]);
    }

    #[test]
    fn test_large_blocks_and_top_of_space() {
        assert_eq!(
            text(&["0.0.0.0/1", "128.0.0.0/1"]),
            vec!["0.0.0.0-255.255.255.255"]
        );
        assert_eq!(
            text(&["ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff", "::/0"]),
            vec!["::-ffff:ffff:ffff:ffff:ffff:ffff:ffff:ffff"]
        );
    }

    #[test]
    fn test_ipv6() {
        assert_eq!(
            text(&["2001:db8::2", "2001:db8::1", "2001:db8::10/127"]),
            vec!["2001:db8::1-2001:db8::2", "2001:db8::10-2001:db8::11"]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(summarize::<&str>(&[]).unwrap().is_empty());
        assert!(summarize(&["  ", ""]).unwrap().is_empty());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(summarize(&["10.0.0.1", "nope"]), Err(NetError::Format(_))));
        assert!(matches!(summarize(&["10.0.0.0/33"]), Err(NetError::Format(_))));
        assert!(matches!(summarize(&["10.0.0.1", "::1"]), Err(NetError::Parse(_))));
    }

    #[test]
    fn test_summarize_cidrs() {
        let blocks: Vec<String> = summarize_cidrs(&["10.0.0.0/25", "10.0.0.128/25", "10.0.1.0"])
            .unwrap()
            .iter()
            .map(|n| n.cidr())
            .collect();
        assert_eq!(blocks, vec!["10.0.0.0/24", "10.0.1.0/32"]);
    }
}
