//! Coding-platform allow-list and hostname alias resolution
//!
//! Only contests whose (alias-resolved) host matches an included platform,
//! either exactly or as a subdomain, reach the calendar.
//!
//! The registry is immutable after construction. Build it once at startup
//! (`PlatformRegistry::builtin()` or `from_json_file`) and share it by
//! reference.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Display metadata for one allow-listed host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformDescriptor {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default = "default_include")]
    pub include: bool,
}

fn default_include() -> bool {
    true
}

impl PlatformDescriptor {
    fn new(name: &str, icon: &str) -> Self {
        Self {
            name: name.to_string(),
            icon: Some(icon.to_string()),
            include: true,
        }
    }
}

const CODEFORCES_ICON: &str = "https://codeforces.org/s/0/favicon-32x32.png";
const CODECHEF_ICON: &str = "https://img.icons8.com/fluent/512/codechef.png";
const ATCODER_ICON: &str = "https://img.atcoder.jp/assets/atcoder.png";
const LEETCODE_ICON: &str = "https://leetcode.com/favicon.ico";
const HACKERRANK_ICON: &str =
    "https://www.hackerrank.com/wp-content/uploads/2018/08/hackerrank_logo.png";
const GEEKSFORGEEKS_ICON: &str = "https://media.geeksforgeeks.org/gfg-gg-logo.svg";
const ICPC_ICON: &str = "https://icpc.global/favicon.ico";

/// (host, display name, icon)
const BUILTIN_PLATFORMS: &[(&str, &str, &str)] = &[
    ("codeforces.com", "Codeforces", CODEFORCES_ICON),
    ("codeforces.com/gyms", "Codeforces Gyms", CODEFORCES_ICON),
    ("codechef.com", "CodeChef", CODECHEF_ICON),
    ("atcoder.jp", "AtCoder", ATCODER_ICON),
    ("leetcode.com", "LeetCode", LEETCODE_ICON),
    ("hackerrank.com", "HackerRank", HACKERRANK_ICON),
    ("geeksforgeeks.org", "GeeksforGeeks", GEEKSFORGEEKS_ICON),
    ("naukri.com", "Naukri Code 360", "https://www.naukri.com/favicon.ico"),
    ("usaco.org", "USACO", "https://usaco.org/current/images/usaco_logo.png"),
    ("usaco.guide", "USACO Guide", "https://usaco.guide/favicon.ico"),
    ("csacademy.com", "CS Academy", "https://csacademy.com/favicon.ico"),
    ("icpc.global", "ICPC Global", ICPC_ICON),
    ("icpc.baylor.edu", "ICPC", ICPC_ICON),
    ("icpcarchive.ecs.baylor.edu", "ICPC Archive", ICPC_ICON),
];

/// (observed host, canonical host)
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("www.codeforces.com", "codeforces.com"),
    ("www.codechef.com", "codechef.com"),
    ("www.leetcode.com", "leetcode.com"),
    ("www.hackerrank.com", "hackerrank.com"),
    ("practice.geeksforgeeks.org", "geeksforgeeks.org"),
    ("www.geeksforgeeks.org", "geeksforgeeks.org"),
    ("auth.geeksforgeeks.org", "geeksforgeeks.org"),
    ("contests.geeksforgeeks.org", "geeksforgeeks.org"),
    ("www.naukri.com", "naukri.com"),
    ("naukri.com/code360", "naukri.com"),
    ("www.usaco.org", "usaco.org"),
    ("www.csacademy.com", "csacademy.com"),
    ("icpc.baylor.edu", "icpc.global"),
    ("icpcarchive.ecs.baylor.edu", "icpc.global"),
];

/// Substring keyword → icon, used when the host has no exact table entry
const ICON_KEYWORDS: &[(&str, &str)] = &[
    ("codeforces", CODEFORCES_ICON),
    ("codechef", CODECHEF_ICON),
    ("atcoder", ATCODER_ICON),
    ("leetcode", LEETCODE_ICON),
    ("hackerrank", HACKERRANK_ICON),
    ("geeksforgeeks", GEEKSFORGEEKS_ICON),
];

/// On-disk shape of a platform table override
#[derive(Debug, Deserialize)]
struct PlatformsFile {
    platforms: HashMap<String, PlatformDescriptor>,
    #[serde(default)]
    aliases: HashMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct PlatformRegistry {
    platforms: HashMap<String, PlatformDescriptor>,
    aliases: HashMap<String, String>,
}

impl Default for PlatformRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PlatformRegistry {
    pub fn new(
        platforms: HashMap<String, PlatformDescriptor>,
        aliases: HashMap<String, String>,
    ) -> Self {
        Self {
            platforms: platforms
                .into_iter()
                .map(|(host, desc)| (normalize_host(&host), desc))
                .collect(),
            aliases: aliases
                .into_iter()
                .map(|(alias, host)| (normalize_host(&alias), normalize_host(&host)))
                .collect(),
        }
    }

    /// The coding platforms surfaced by default
    pub fn builtin() -> Self {
        let platforms = BUILTIN_PLATFORMS
            .iter()
            .map(|(host, name, icon)| (host.to_string(), PlatformDescriptor::new(name, icon)))
            .collect();
        let aliases = BUILTIN_ALIASES
            .iter()
            .map(|(alias, host)| (alias.to_string(), host.to_string()))
            .collect();
        Self::new(platforms, aliases)
    }

    /// Parse a platform table from JSON
    ///
    /// ```json
    /// { "platforms": { "codeforces.com": { "name": "Codeforces", "icon": "...", "include": true } },
    ///   "aliases": { "www.codeforces.com": "codeforces.com" } }
    /// ```
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: PlatformsFile = serde_json::from_str(json)?;
        Ok(Self::new(file.platforms, file.aliases))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let json = std::fs::read_to_string(path)?;
        let registry = Self::from_json(&json)?;
        log::info!(
            "Loaded {} platforms and {} aliases from {}",
            registry.platforms.len(),
            registry.aliases.len(),
            path.display()
        );
        Ok(registry)
    }

    /// Canonical host for a raw hostname: alias target if registered, else the host itself.
    pub fn resolve_host(&self, host: &str) -> String {
        let host = normalize_host(host);
        match self.aliases.get(&host) {
            Some(canonical) => canonical.clone(),
            None => host,
        }
    }

    /// True if the canonical host equals, or is a subdomain of, any included platform.
    pub fn is_allowed(&self, canonical: &str) -> bool {
        self.platforms
            .iter()
            .filter(|(_, desc)| desc.include)
            .any(|(host, _)| {
                canonical == host
                    || (canonical.len() > host.len()
                        && canonical.ends_with(host.as_str())
                        && canonical.as_bytes()[canonical.len() - host.len() - 1] == b'.')
            })
    }

    /// Exact table entry for a canonical host
    pub fn descriptor(&self, canonical: &str) -> Option<&PlatformDescriptor> {
        self.platforms.get(canonical)
    }

    pub fn display_name(&self, canonical: &str) -> String {
        match self.descriptor(canonical) {
            Some(desc) => desc.name.clone(),
            None => fallback_platform_name(canonical),
        }
    }

    pub fn icon(&self, canonical: &str) -> Option<String> {
        self.descriptor(canonical)
            .and_then(|desc| desc.icon.clone())
            .or_else(|| infer_icon(canonical).map(str::to_string))
    }

    /// Included hosts, sorted
    pub fn allowed_hosts(&self) -> Vec<&str> {
        let mut hosts: Vec<&str> = self
            .platforms
            .iter()
            .filter(|(_, desc)| desc.include)
            .map(|(host, _)| host.as_str())
            .collect();
        hosts.sort_unstable();
        hosts
    }
}

fn normalize_host(host: &str) -> String {
    host.trim().to_ascii_lowercase()
}

/// "www.example.org" → "example"
pub fn fallback_platform_name(host: &str) -> String {
    let host = host.strip_prefix("www.").unwrap_or(host);
    host.split('.').next().unwrap_or(host).to_string()
}

/// Best-effort icon for well-known platforms
pub fn infer_icon(host: &str) -> Option<&'static str> {
    let host = host.to_ascii_lowercase();
    ICON_KEYWORDS
        .iter()
        .find(|(keyword, _)| host.contains(keyword))
        .map(|(_, icon)| *icon)
}
