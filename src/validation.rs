//! Address and port classification. Every function here is total: malformed
//! input yields `false`, never an error.

/// Decodes a dotted-decimal candidate into its integer components.
fn octets(candidate: &str) -> Option<Vec<i64>> {
  candidate
    .split('.')
    .map(|part| part.parse::<i64>().ok())
    .collect()
}

/// Checks that a candidate string has the shape of an IPv4 address:
/// exactly four dot-separated components, each an integer in [0, 255].
pub fn is_ipv4_format(candidate: &str) -> bool {
  match octets(candidate) {
    Some(octets) => {
      octets.len() == 4 && octets.iter().all(|octet| (0..=255).contains(octet))
    }
    None => false,
  }
}

/// Checks that a candidate string is a usable unicast IPv4 destination.
///
/// Rejects multicast, experimental, and broadcast (first octet above 223),
/// "this network" source-only addresses, and a handful of special-use
/// ranges, each by exact octet comparison. Loopback is accepted.
pub fn is_ipv4_unicast(candidate: &str) -> bool {
  if !is_ipv4_format(candidate) {
    return false;
  }

  let Some(octets) = octets(candidate) else {
    return false;
  };

  // multicast, experimental, broadcast
  if octets[0] > 223 {
    return false;
  }

  // "this network", valid only as a source address (RFC 1122)
  if octets[0] == 0 {
    return false;
  }

  // self-assigned link-local (RFC 3927)
  if octets[0] == 169 && octets[1] == 254 {
    return false;
  }

  // IETF protocol assignments (RFC 6890)
  if octets[0] == 192 && octets[1] == 0 && octets[2] == 0 {
    return false;
  }

  // automatic multicast tunneling (RFC 7450)
  if octets[0] == 192 && octets[1] == 52 && octets[2] == 193 {
    return false;
  }

  // AS112 DNS redirection (RFC 7535)
  if octets[0] == 192 && octets[1] == 31 && octets[2] == 196 {
    return false;
  }

  // AS112 DNS service (RFC 7534)
  if octets[0] == 192 && octets[1] == 175 && octets[2] == 48 {
    return false;
  }

  // 6to4 relay anycast (RFC 3068)
  if octets[0] == 192 && octets[1] == 88 && octets[2] == 99 {
    return false;
  }

  true
}

/// Checks that a port number is usable without elevated privileges.
pub fn is_unprivileged_port(port: i64) -> bool {
  (1024..=65535).contains(&port)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ipv4_format_accepts_dotted_quads() {
    assert!(is_ipv4_format("0.0.0.0"));
    assert!(is_ipv4_format("10.10.10.10"));
    assert!(is_ipv4_format("255.255.255.255"));
  }

  #[test]
  fn ipv4_format_rejects_wrong_component_count() {
    assert!(!is_ipv4_format("10.10.10"));
    assert!(!is_ipv4_format("10.10.10.10.10"));
    assert!(!is_ipv4_format("10"));
  }

  #[test]
  fn ipv4_format_rejects_out_of_range_octets() {
    assert!(!is_ipv4_format("256.0.0.1"));
    assert!(!is_ipv4_format("10.10.10.-1"));
  }

  #[test]
  fn ipv4_format_rejects_non_integer_components() {
    assert!(!is_ipv4_format("a.b.c.d"));
    assert!(!is_ipv4_format("10.10.10.ten"));
    assert!(!is_ipv4_format("10.10..10"));
    assert!(!is_ipv4_format(""));
  }

  #[test]
  fn unicast_accepts_ordinary_hosts() {
    assert!(is_ipv4_unicast("10.10.10.10"));
    assert!(is_ipv4_unicast("192.168.1.10"));
    assert!(is_ipv4_unicast("8.8.8.8"));
    assert!(is_ipv4_unicast("223.255.255.254"));
  }

  #[test]
  fn unicast_accepts_loopback() {
    assert!(is_ipv4_unicast("127.0.0.1"));
  }

  #[test]
  fn unicast_rejects_multicast_and_broadcast() {
    assert!(!is_ipv4_unicast("224.0.0.1"));
    assert!(!is_ipv4_unicast("239.1.2.3"));
    assert!(!is_ipv4_unicast("255.255.255.255"));
  }

  #[test]
  fn unicast_rejects_this_network() {
    assert!(!is_ipv4_unicast("0.0.0.0"));
    assert!(!is_ipv4_unicast("0.1.2.3"));
  }

  #[test]
  fn unicast_rejects_special_use_ranges() {
    assert!(!is_ipv4_unicast("169.254.0.1"));
    assert!(!is_ipv4_unicast("192.0.0.5"));
    assert!(!is_ipv4_unicast("192.52.193.1"));
    assert!(!is_ipv4_unicast("192.31.196.1"));
    assert!(!is_ipv4_unicast("192.175.48.1"));
    assert!(!is_ipv4_unicast("192.88.99.1"));
  }

  #[test]
  fn unicast_allows_neighbors_of_special_use_ranges() {
    assert!(is_ipv4_unicast("169.253.0.1"));
    assert!(is_ipv4_unicast("192.0.1.5"));
    assert!(is_ipv4_unicast("192.88.100.1"));
  }

  #[test]
  fn unicast_rejects_malformed_input() {
    assert!(!is_ipv4_unicast("not an address"));
    assert!(!is_ipv4_unicast("10.10.10"));
  }

  #[test]
  fn unprivileged_port_bounds() {
    assert!(!is_unprivileged_port(0));
    assert!(!is_unprivileged_port(80));
    assert!(!is_unprivileged_port(1023));
    assert!(is_unprivileged_port(1024));
    assert!(is_unprivileged_port(5060));
    assert!(is_unprivileged_port(65535));
    assert!(!is_unprivileged_port(65536));
    assert!(!is_unprivileged_port(-1));
  }
}
