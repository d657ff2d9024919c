//! Cache statistics and monitoring

use serde::{Deserialize, Serialize};

/// Statistics for a single namespace.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NamespaceStats {
    /// Version tag of the namespace
    pub tag: String,

    /// Number of cached entries
    pub entry_count: usize,

    /// Sum of body sizes in bytes
    pub total_bytes: u64,
}

/// Aggregate statistics across all namespaces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of open namespaces
    pub namespace_count: usize,

    /// Total entries across all namespaces
    pub entry_count: usize,

    /// Total body bytes across all namespaces
    pub total_bytes: u64,

    /// Per-namespace breakdown
    pub namespaces: Vec<NamespaceStats>,
}

impl CacheStats {
    /// Average entry size in bytes, zero when empty.
    pub fn average_entry_size(&self) -> u64 {
        if self.entry_count == 0 {
            0
        } else {
            self.total_bytes / self.entry_count as u64
        }
    }

    /// Stats for one namespace by tag, if present.
    pub fn namespace(&self, tag: &str) -> Option<&NamespaceStats> {
        self.namespaces.iter().find(|n| n.tag == tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_entry_size() {
        let stats = CacheStats {
            namespace_count: 1,
            entry_count: 4,
            total_bytes: 100,
            namespaces: vec![],
        };
        assert_eq!(stats.average_entry_size(), 25);

        assert_eq!(CacheStats::default().average_entry_size(), 0);
    }

    #[test]
    fn test_namespace_lookup() {
        let stats = CacheStats {
            namespace_count: 2,
            entry_count: 3,
            total_bytes: 30,
            namespaces: vec![
                NamespaceStats {
                    tag: "static-v1".to_string(),
                    entry_count: 2,
                    total_bytes: 20,
                },
                NamespaceStats {
                    tag: "runtime-v1".to_string(),
                    entry_count: 1,
                    total_bytes: 10,
                },
            ],
        };

        assert_eq!(stats.namespace("static-v1").unwrap().entry_count, 2);
        assert!(stats.namespace("static-v9").is_none());
    }
}
