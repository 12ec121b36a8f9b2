use actix_web::HttpRequest;
use std::net::IpAddr;

/// The address a submission is attributed to.
///
/// `X-Forwarded-For` is only honoured when the direct peer is one of
/// `trusted_proxies`. The header is then read right to left and the first hop
/// that is not itself a trusted proxy wins.
pub fn client_ip(req: &HttpRequest, trusted_proxies: &[IpAddr]) -> String {
    let Some(peer) = req.peer_addr().map(|addr| addr.ip()) else {
        return "unknown".to_string();
    };

    if !trusted_proxies.contains(&peer) {
        return peer.to_string();
    }

    req.headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            value
                .rsplit(',')
                .filter_map(|hop| hop.trim().parse::<IpAddr>().ok())
                .find(|hop| !trusted_proxies.contains(hop))
        })
        .unwrap_or(peer)
        .to_string()
}
