//! Friendly-name classification of well-known development servers.
//!
//! The rule table relabels a process for display when its command line
//! matches a known signature (a dev server, a database daemon, a reverse
//! proxy). Matching is a prioritized case-insensitive substring check over
//! the full command line; the table order is the only tie-break. The result
//! is cosmetic and must never influence status or control flow.

/// A single classification rule.
///
/// The rule matches when any needle occurs in the lowercased command line,
/// unless the exclusion needle also occurs (e.g. `vite` but not `vitest`).
#[derive(Debug, Clone, Copy)]
pub struct FriendlyRule {
    pub needles: &'static [&'static str],
    pub exclude: Option<&'static str>,
    pub label: &'static str,
}

/// Built-in signatures, in priority order. First match wins.
const BUILTIN_RULES: &[FriendlyRule] = &[
    FriendlyRule {
        needles: &["next dev", "next-server"],
        exclude: None,
        label: "\u{26a1} Next.js Dev",
    },
    FriendlyRule {
        needles: &["vite"],
        exclude: Some("vitest"),
        label: "\u{26a1} Vite Dev Server",
    },
    FriendlyRule {
        needles: &["webpack"],
        exclude: None,
        label: "\u{1f4e6} Webpack Dev Server",
    },
    FriendlyRule {
        needles: &["react-scripts"],
        exclude: None,
        label: "\u{269b}\u{fe0f} React Dev Server",
    },
    FriendlyRule {
        needles: &["ng serve", "angular"],
        exclude: None,
        label: "\u{1f170}\u{fe0f} Angular Dev Server",
    },
    FriendlyRule {
        needles: &["vue-cli-service"],
        exclude: None,
        label: "\u{1f49a} Vue Dev Server",
    },
    FriendlyRule {
        needles: &["nuxt"],
        exclude: None,
        label: "\u{1f49a} Nuxt.js Dev",
    },
    FriendlyRule {
        needles: &["gatsby"],
        exclude: None,
        label: "\u{1f7e3} Gatsby Dev Server",
    },
    FriendlyRule {
        needles: &["remix"],
        exclude: None,
        label: "\u{1f4bf} Remix Dev Server",
    },
    FriendlyRule {
        needles: &["flask"],
        exclude: None,
        label: "\u{1f40d} Flask Server",
    },
    FriendlyRule {
        needles: &["django"],
        exclude: None,
        label: "\u{1f40d} Django Server",
    },
    FriendlyRule {
        needles: &["rails"],
        exclude: None,
        label: "\u{1f48e} Rails Server",
    },
    FriendlyRule {
        needles: &["docker"],
        exclude: None,
        label: "\u{1f433} Docker",
    },
    FriendlyRule {
        needles: &["nginx"],
        exclude: None,
        label: "\u{1f310} Nginx",
    },
    FriendlyRule {
        needles: &["apache", "httpd"],
        exclude: None,
        label: "\u{1f310} Apache",
    },
    FriendlyRule {
        needles: &["postgres"],
        exclude: None,
        label: "\u{1f418} PostgreSQL",
    },
    FriendlyRule {
        needles: &["mysql"],
        exclude: None,
        label: "\u{1f42c} MySQL",
    },
    FriendlyRule {
        needles: &["mongo"],
        exclude: None,
        label: "\u{1f343} MongoDB",
    },
    FriendlyRule {
        needles: &["redis"],
        exclude: None,
        label: "\u{1f4ee} Redis",
    },
];

/// Frozen, ordered rule table. Constructed once and injected into the
/// normalizer rather than read from ambient global state.
#[derive(Debug, Clone)]
pub struct FriendlyRules {
    rules: Vec<FriendlyRule>,
}

impl FriendlyRules {
    /// The built-in signature table.
    pub fn builtin() -> Self {
        Self {
            rules: BUILTIN_RULES.to_vec(),
        }
    }

    /// A custom rule table, matched in the given order.
    pub fn from_rules(rules: Vec<FriendlyRule>) -> Self {
        Self { rules }
    }

    /// Resolve the display label for a process.
    ///
    /// Unmatched commands pass the raw process name through unchanged, so
    /// the result is never empty for a non-empty process name.
    pub fn resolve(&self, process_name: &str, command: &str) -> String {
        let haystack = command.to_lowercase();

        for rule in &self.rules {
            if let Some(exclude) = rule.exclude {
                if haystack.contains(exclude) {
                    continue;
                }
            }
            if rule.needles.iter().any(|n| haystack.contains(n)) {
                return rule.label.to_string();
            }
        }

        process_name.to_string()
    }
}

impl Default for FriendlyRules {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_dev_server() {
        let rules = FriendlyRules::builtin();
        assert_eq!(
            rules.resolve("node", "next dev --port 3000"),
            "\u{26a1} Next.js Dev"
        );
        assert_eq!(
            rules.resolve("node", "node /app/.next/server/next-server.js"),
            "\u{26a1} Next.js Dev"
        );
    }

    #[test]
    fn test_vite_excludes_vitest() {
        let rules = FriendlyRules::builtin();
        assert_eq!(
            rules.resolve("node", "node node_modules/.bin/vite"),
            "\u{26a1} Vite Dev Server"
        );
        // vitest must not be mistaken for the vite dev server
        assert_eq!(rules.resolve("node", "node vitest run"), "node");
    }

    #[test]
    fn test_case_insensitive() {
        let rules = FriendlyRules::builtin();
        assert_eq!(
            rules.resolve("nginx", "NGINX -g daemon off;"),
            "\u{1f310} Nginx"
        );
    }

    #[test]
    fn test_first_match_wins() {
        let rules = FriendlyRules::builtin();
        // docker appears before nginx in the table
        assert_eq!(
            rules.resolve("docker", "docker-proxy nginx"),
            "\u{1f433} Docker"
        );
    }

    #[test]
    fn test_unmatched_passes_name_through() {
        let rules = FriendlyRules::builtin();
        assert_eq!(rules.resolve("my-server", "./my-server --port 9"), "my-server");
    }

    #[test]
    fn test_databases() {
        let rules = FriendlyRules::builtin();
        assert_eq!(
            rules.resolve("postgres", "/usr/lib/postgresql/16/bin/postgres"),
            "\u{1f418} PostgreSQL"
        );
        assert_eq!(
            rules.resolve("redis-server", "redis-server *:6379"),
            "\u{1f4ee} Redis"
        );
    }
}
