//! Client identity used as the rate-limit key.

/// Key used when a request carries no client address headers.
pub const ANONYMOUS_CLIENT: &str = "anonymous";

/// Derive a stable per-client key from request metadata.
///
/// Takes the raw `x-forwarded-for` and `x-real-ip` header values. The first
/// entry of a forwarded chain wins, then the real-ip header, then
/// [`ANONYMOUS_CLIENT`]. Blank values are treated as missing.
pub fn derive_client_key(forwarded_for: Option<&str>, real_ip: Option<&str>) -> String {
    let forwarded = forwarded_for
        .and_then(|chain| chain.split(',').next())
        .map(str::trim)
        .filter(|addr| !addr.is_empty());

    let real = real_ip.map(str::trim).filter(|addr| !addr.is_empty());

    forwarded
        .or(real)
        .unwrap_or(ANONYMOUS_CLIENT)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_forwarded_address_wins() {
        assert_eq!(derive_client_key(Some("1.2.3.4, 5.6.6.6"), None), "1.2.3.4");
        assert_eq!(
            derive_client_key(Some("1.2.3.4, 5.6.6.6"), Some("9.9.9.9")),
            "1.2.3.4"
        );
    }

    #[test]
    fn test_falls_back_to_real_ip() {
        assert_eq!(derive_client_key(None, Some("9.9.9.9")), "9.9.9.9");
        assert_eq!(derive_client_key(Some("  "), Some(" 9.9.9.9 ")), "9.9.9.9");
    }

    #[test]
    fn test_anonymous_without_headers() {
        assert_eq!(derive_client_key(None, None), ANONYMOUS_CLIENT);
        assert_eq!(derive_client_key(Some(""), Some("")), "anonymous");
    }
}
