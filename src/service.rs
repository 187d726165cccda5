//! Request orchestration: validate, consult the cache, resolve, render, store.
//!
//! Every outcome is an image. Failures of any kind become a degraded badge and
//! never escape as errors.

use std::collections::HashMap;

use crate::badge::BadgeRequest;
use crate::cache::{TtlCache, build_fingerprint};
use crate::cooldown::client_key;
use crate::errors::BadgeError;
use crate::resolver::StatResolver;
use crate::svg::{ErrorBadge, render, render_error};

pub const CONTENT_TYPE: &str = "image/svg+xml";
const CACHE_PUBLIC: &str = "public, max-age=300, s-maxage=300";
const CACHE_NONE: &str = "no-cache, no-store, must-revalidate";

/// Where the response body came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    CacheHit,
    Rendered,
    Degraded(ErrorBadge),
}

/// A rendered badge plus its caching semantics.
#[derive(Clone, Debug)]
pub struct BadgeResponse {
    pub svg: String,
    pub cacheable: bool,
    pub outcome: Outcome,
}

impl BadgeResponse {
    /// A degraded badge in place of the requested value.
    #[must_use]
    pub fn degraded(kind: ErrorBadge, cacheable: bool) -> Self {
        Self { svg: render_error(kind), cacheable, outcome: Outcome::Degraded(kind) }
    }

    /// Response headers for this badge.
    #[must_use]
    pub fn headers(&self) -> Vec<(&'static str, &'static str)> {
        let mut h = vec![("Content-Type", CONTENT_TYPE), ("X-Content-Type-Options", "nosniff")];
        if self.cacheable {
            h.push(("Cache-Control", CACHE_PUBLIC));
        } else {
            h.push(("Cache-Control", CACHE_NONE));
            h.push(("Pragma", "no-cache"));
            h.push(("Expires", "0"));
        }
        h
    }
}

/// Composition root of the badge pipeline.
#[derive(Clone)]
pub struct BadgeService {
    cache: TtlCache,
    resolver: StatResolver,
}

impl BadgeService {
    pub fn new(cache: TtlCache, resolver: StatResolver) -> Self {
        Self { cache, resolver }
    }

    #[must_use]
    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }

    #[must_use]
    pub fn resolver(&self) -> &StatResolver {
        &self.resolver
    }

    /// Serve the badge for `kind_segment` with `query` on behalf of `client_addr`.
    pub async fn handle(&self, kind_segment: &str, query: &HashMap<String, String>, client_addr: &str) -> BadgeResponse {
        let req = match BadgeRequest::parse(kind_segment, query) {
            Ok(req) => req,
            Err(e) => {
                log::debug!("badge: rejected kind={kind_segment}: {e}");
                return BadgeResponse::degraded(ErrorBadge::Generic, false);
            }
        };

        let cacheable = req.kind.is_cacheable();
        let fingerprint = cacheable
            .then(|| build_fingerprint(req.kind.as_str(), &req.identity, req.render_params()));

        if let Some(fp) = &fingerprint
            && let Some(svg) = self.cache.get(fp)
        {
            log::debug!("badge: cache hit {fp}");
            return BadgeResponse { svg, cacheable, outcome: Outcome::CacheHit };
        }
        if let Some(fp) = &fingerprint {
            log::debug!("badge: cache miss {fp}");
        }

        let key = client_key(client_addr, &req.identity);
        let value = match self.resolver.resolve(req.kind, &req.identity, &key).await {
            Ok(v) => v,
            Err(e) => {
                log_failure(&req, &e);
                return BadgeResponse::degraded(ErrorBadge::from_error(&e), cacheable);
            }
        };

        let svg = render(req.label(), &req.decorate(&value), req.color(), req.label_color(), req.style);
        if let Some(fp) = fingerprint {
            self.store_rendered(fp, svg.clone()).await;
        }
        BadgeResponse { svg, cacheable, outcome: Outcome::Rendered }
    }

    // Upserting rewrites the snapshot file; keep it off the async workers.
    // A failed write loses only the cache entry, the badge is still served.
    async fn store_rendered(&self, fingerprint: String, svg: String) {
        let cache = self.cache.clone();
        let write = tokio::task::spawn_blocking(move || cache.set(&fingerprint, &svg).map_err(|e| (fingerprint, e)));
        match write.await {
            Ok(Ok(())) => {}
            Ok(Err((fp, e))) => log::error!("badge: failed to cache {fp}: {e}"),
            Err(e) => log::error!("badge: cache write task failed: {e}"),
        }
    }
}

fn log_failure(req: &BadgeRequest, e: &BadgeError) {
    match e {
        BadgeError::NotFound(_) => log::info!("badge: {} {} not found upstream", req.kind, req.identity),
        BadgeError::RateLimited | BadgeError::Timeout | BadgeError::UpstreamStatus(_) | BadgeError::Upstream(_) => {
            log::warn!("badge: {} {} upstream failure: {e}", req.kind, req.identity)
        }
        _ => log::error!("badge: {} {} failed: {e}", req.kind, req.identity),
    }
}
