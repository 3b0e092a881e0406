// Call-site aggregation shared by every language extractor
//
// A collector lives for one body analysis. Each invocation node is visited once
// (keyed by its byte span), identical sites are merged into one counted entry,
// and `finish` returns the list in canonical order.

use std::cmp::Ordering;
use std::collections::HashSet;

use tree_sitter::Node;

use super::types::CallSite;

pub struct CallSiteCollector {
    sites: Vec<CallSite>,
    visited: HashSet<(usize, usize, u16)>,
    track_arg_counts: bool,
}

impl CallSiteCollector {
    pub fn new(track_arg_counts: bool) -> Self {
        Self {
            sites: Vec::new(),
            visited: HashSet::new(),
            track_arg_counts,
        }
    }

    /// Mark an invocation node as handled; false if it was seen before
    pub fn first_visit(&mut self, node: &Node) -> bool {
        self.visited
            .insert((node.start_byte(), node.end_byte(), node.kind_id()))
    }

    /// Find-or-insert-then-increment
    pub fn record(
        &mut self,
        name: impl Into<String>,
        receiver_type: Option<String>,
        receiver_name: Option<String>,
        arg_count: Option<usize>,
    ) {
        let name = name.into();
        if name.is_empty() {
            return;
        }
        let arg_count = if self.track_arg_counts { arg_count } else { None };

        if let Some(existing) = self.sites.iter_mut().find(|site| {
            site.same_site(
                &name,
                receiver_type.as_deref(),
                receiver_name.as_deref(),
                arg_count,
            )
        }) {
            existing.count += 1;
            return;
        }
        self.sites
            .push(CallSite::new(name, receiver_type, receiver_name, arg_count));
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// The aggregated sites in canonical order
    pub fn finish(mut self) -> Vec<CallSite> {
        sort_call_sites(&mut self.sites);
        self.sites
    }
}

/// Canonical call-site order: name, then receiver type, then receiver name, then
/// argument count. An absent value sorts before any present one.
pub fn compare_call_sites(a: &CallSite, b: &CallSite) -> Ordering {
    a.name
        .cmp(&b.name)
        .then_with(|| a.receiver_type.cmp(&b.receiver_type))
        .then_with(|| a.receiver_name.cmp(&b.receiver_name))
        .then_with(|| a.arg_count.cmp(&b.arg_count))
}

pub fn sort_call_sites(sites: &mut [CallSite]) {
    sites.sort_by(compare_call_sites);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Option<String> {
        Some(v.to_string())
    }

    #[test]
    fn test_identical_sites_merge_and_arity_splits_identity() {
        let mut collector = CallSiteCollector::new(true);
        collector.record("run", None, s("obj"), Some(0));
        collector.record("run", None, s("obj"), Some(0));
        collector.record("run", None, s("obj"), Some(1));

        let sites = collector.finish();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].arg_count, Some(0));
        assert_eq!(sites[0].count, 2);
        assert_eq!(sites[1].arg_count, Some(1));
        assert_eq!(sites[1].count, 1);
    }

    #[test]
    fn test_untracked_arity_merges_by_name_and_receiver() {
        let mut collector = CallSiteCollector::new(false);
        collector.record("run", None, s("obj"), Some(0));
        collector.record("run", None, s("obj"), Some(3));

        let sites = collector.finish();
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].count, 2);
        assert_eq!(sites[0].arg_count, None);
    }

    #[test]
    fn test_canonical_order_places_absent_first() {
        let mut collector = CallSiteCollector::new(false);
        collector.record("run", s("Logger"), None, None);
        collector.record("run", None, None, None);
        collector.record("add", None, s("list"), None);

        let sites = collector.finish();
        let rendered: Vec<(String, Option<String>, Option<String>)> = sites
            .into_iter()
            .map(|c| (c.name, c.receiver_type, c.receiver_name))
            .collect();
        assert_eq!(
            rendered,
            vec![
                ("add".to_string(), None, s("list")),
                ("run".to_string(), None, None),
                ("run".to_string(), s("Logger"), None),
            ]
        );
    }

    #[test]
    fn test_empty_names_are_ignored() {
        let mut collector = CallSiteCollector::new(true);
        collector.record("", None, None, None);
        assert!(collector.is_empty());
    }
}
