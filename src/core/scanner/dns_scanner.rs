// src/core/scanner/dns_scanner.rs

use tracing::{debug, info, warn};

use crate::core::config::ScanConfig;
use crate::core::models::NOT_AVAILABLE;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::system_conf::read_system_conf;
use hickory_resolver::TokioAsyncResolver;
use std::net::{IpAddr, Ipv4Addr};

/// Resolves the A record and the nameservers of a host.
///
/// Both lookups swallow every failure and answer with the `N/A` sentinel, so
/// a broken or unknown domain never interrupts a scan.
#[derive(Clone)]
pub struct DnsResolver {
    resolver: TokioAsyncResolver,
}

impl DnsResolver {
    /// Builds a resolver from the system configuration, falling back to the
    /// library's default upstreams when it cannot be read.
    pub fn new(config: &ScanConfig) -> Self {
        let (resolver_config, mut opts) = match read_system_conf() {
            Ok(conf) => conf,
            Err(e) => {
                warn!(error = %e, "Could not read system resolver configuration, using defaults.");
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };
        opts.timeout = config.dns_timeout();

        Self { resolver: TokioAsyncResolver::tokio(resolver_config, opts) }
    }

    /// Returns the first IPv4 address of `hostname` in dotted-quad form.
    pub async fn resolve_a(&self, hostname: &str) -> String {
        let host = lookup_name(hostname);
        if let Ok(ip) = host.parse::<Ipv4Addr>() {
            return ip.to_string();
        }

        debug!(host, "Looking up A record.");
        match self.resolver.lookup_ip(host).await {
            Ok(lookup) => match lookup.iter().find(IpAddr::is_ipv4) {
                Some(ip) => {
                    debug!(host, %ip, "A record found.");
                    ip.to_string()
                }
                None => {
                    debug!(host, "No IPv4 address among lookup results.");
                    NOT_AVAILABLE.to_string()
                }
            },
            Err(e) => {
                warn!(host, error = %e, "A lookup failed.");
                NOT_AVAILABLE.to_string()
            }
        }
    }

    /// Returns the authoritative nameservers of `hostname`, sorted and joined
    /// with `", "`.
    pub async fn resolve_ns(&self, hostname: &str) -> String {
        let host = lookup_name(hostname);
        // IP literals have no zone to ask about.
        if host.parse::<IpAddr>().is_ok() {
            return NOT_AVAILABLE.to_string();
        }

        debug!(host, "Looking up NS records.");
        match self.resolver.ns_lookup(host).await {
            Ok(lookup) => {
                let mut nameservers: Vec<String> = lookup.iter().map(|ns| ns.to_string()).collect();
                if nameservers.is_empty() {
                    debug!(host, "No NS records found.");
                    return NOT_AVAILABLE.to_string();
                }
                nameservers.sort();
                info!(host, count = nameservers.len(), "Found NS records.");
                nameservers.join(", ")
            }
            Err(e) => {
                warn!(host, error = %e, "NS lookup failed.");
                NOT_AVAILABLE.to_string()
            }
        }
    }
}

/// Strips a `:port` suffix (and IPv6 brackets) from a hostname.
fn lookup_name(hostname: &str) -> &str {
    if let Some(rest) = hostname.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    match hostname.rsplit_once(':') {
        Some((host, port)) if !host.contains(':') && port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => hostname,
    }
}
