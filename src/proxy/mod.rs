use tracing::debug;

use crate::config::{ConfigStore, NETWORK_SECTION};
use crate::core::types::ProxySpec;

pub const DEFAULT_PROXY_TYPE: &str = "http";
pub const DEFAULT_PROXY_HOST: &str = "127.0.0.1";
pub const DEFAULT_PROXY_PORT: &str = "7890";

/// Derives the outbound proxy from the `network` section.
///
/// `None` unless the section exists and `proxy_enable` is true. Host and port
/// are not validated; a bad value only shows up when a request is sent.
pub fn resolve(store: &ConfigStore) -> Option<ProxySpec> {
    if !store.has_section(NETWORK_SECTION)
        || !store.get_bool_or(NETWORK_SECTION, "proxy_enable", false)
    {
        return None;
    }

    let proxy = ProxySpec {
        scheme: store.get_str_or(NETWORK_SECTION, "proxy_type", DEFAULT_PROXY_TYPE),
        host: store.get_str_or(NETWORK_SECTION, "proxy_host", DEFAULT_PROXY_HOST),
        port: store.get_str_or(NETWORK_SECTION, "proxy_port", DEFAULT_PROXY_PORT),
    };
    debug!(proxy = %proxy.url(), "outbound proxy enabled");

    Some(proxy)
}
