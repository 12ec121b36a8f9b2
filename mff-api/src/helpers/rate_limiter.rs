use actix_web::HttpRequest;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use super::client_ip::client_ip;

/// How often idle client entries are dropped from the limiter
pub const PRUNE_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Per-client limiter for public submission endpoints, keyed by IP
pub struct SubmissionRateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    trusted_proxies: Vec<IpAddr>,
}

impl SubmissionRateLimiter {
    /// `per_hour` of zero is treated as one
    pub fn per_hour(per_hour: u32) -> Self {
        let per_hour = NonZeroU32::new(per_hour).unwrap_or(NonZeroU32::MIN);
        Self {
            limiter: RateLimiter::keyed(Quota::per_hour(per_hour)),
            trusted_proxies: Vec::new(),
        }
    }

    /// Proxies whose `X-Forwarded-For` header is believed
    pub fn with_trusted_proxies(mut self, trusted_proxies: Vec<IpAddr>) -> Self {
        self.trusted_proxies = trusted_proxies;
        self
    }

    /// Consumes one slot for `client`; false when the client is over quota
    pub fn check(&self, client: &str) -> bool {
        let allowed = self.limiter.check_key(&client.to_string()).is_ok();
        if !allowed {
            tracing::warn!("Rate limit hit for {}", client);
        }
        allowed
    }

    pub fn check_request(&self, req: &HttpRequest) -> bool {
        self.check(&client_ip(req, &self.trusted_proxies))
    }

    /// Drops clients whose quota has fully replenished
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    /// Prunes on a fixed interval until the runtime shuts down
    pub fn spawn_pruning(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let limiter = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(PRUNE_INTERVAL);
            loop {
                interval.tick().await;
                limiter.prune();
                tracing::debug!("Rate limiter tracking {} clients", limiter.tracked_clients());
            }
        })
    }
}
