//! Endpoint-string parsing shared by the platform probes.

/// Parse an `address:port` endpoint string.
///
/// Handles the formats the enumeration tools emit:
/// - IPv4: "127.0.0.1:3000" or "0.0.0.0:8080"
/// - IPv6: "\[::1]:3000" or "\[fe80::1]:8080"
/// - Wildcard: "*:5173" or a bare ":3000" (empty address becomes "*")
pub(crate) fn parse_endpoint(endpoint: &str) -> Option<(String, u16)> {
    if endpoint.starts_with('[') {
        // IPv6 format: [::1]:3000
        let bracket_end = endpoint.find(']')?;
        if bracket_end + 1 >= endpoint.len() || endpoint.as_bytes()[bracket_end + 1] != b':' {
            return None;
        }
        let address = &endpoint[..=bracket_end];
        let port: u16 = endpoint[bracket_end + 2..].parse().ok()?;
        Some((address.to_string(), port))
    } else {
        // IPv4 format: 127.0.0.1:3000 or *:8080
        let last_colon = endpoint.rfind(':')?;
        let address = &endpoint[..last_colon];
        let port: u16 = endpoint[last_colon + 1..].parse().ok()?;
        let address = if address.is_empty() { "*" } else { address };
        Some((address.to_string(), port))
    }
}
