//! Request classification: an explicit, ordered route table.
//!
//! Every intercepted GET request is matched against an ordered list of
//! predicate/class pairs, evaluated top to bottom with first match winning.
//! The order is part of the contract: adding a new static extension or API
//! host can never silently reclassify a request that an earlier route
//! already claimed. Non-GET requests skip the table entirely and take the
//! default route.

use bridge_traits::fetch::FetchRequest;
use url::Url;

use core_runtime::config::{ApiRules, StaticAssetRules, WorkerConfig};

use crate::error::{Result, RouterError};

/// The four request classes, each with its own caching strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Top-level page load; network-first with a cached document fallback.
    Navigation,
    /// Style/script/image/font families and trusted asset hosts; cache-first.
    StaticAsset,
    /// External API hosts and same-origin API routes; network-first with a
    /// timeout race.
    Api,
    /// Everything else, including non-GET methods; network-first, cache
    /// fallback, no synthesized response.
    Default,
}

/// One entry in the route table.
struct Route {
    class: RequestClass,
    predicate: Box<dyn Fn(&RouteContext<'_>) -> bool + Send + Sync>,
}

/// What a predicate gets to look at: the parsed URL plus the raw request.
struct RouteContext<'a> {
    url: &'a Url,
    request: &'a FetchRequest,
}

/// Ordered request classifier.
pub struct RouteTable {
    scope_origin: Url,
    routes: Vec<Route>,
}

impl RouteTable {
    /// Builds the table from the worker configuration.
    ///
    /// Route order: navigation, static asset, API. Anything unmatched is
    /// [`RequestClass::Default`].
    pub fn new(config: &WorkerConfig) -> Result<Self> {
        let scope_origin = Url::parse(&config.scope_origin).map_err(|e| {
            RouterError::Config(format!(
                "Scope origin '{}' is not an absolute URL: {}",
                config.scope_origin, e
            ))
        })?;

        let static_rules = config.static_rules.clone();
        let api_rules = config.api_rules.clone();

        let routes = vec![
            Route {
                class: RequestClass::Navigation,
                predicate: Box::new(|ctx| ctx.request.is_navigation()),
            },
            Route {
                class: RequestClass::StaticAsset,
                predicate: Box::new(move |ctx| is_static_asset(ctx.url, &static_rules)),
            },
            Route {
                class: RequestClass::Api,
                predicate: Box::new(move |ctx| is_api_request(ctx.url, &api_rules)),
            },
        ];

        Ok(Self {
            scope_origin,
            routes,
        })
    }

    /// Classifies a request, first route match wins.
    pub fn classify(&self, request: &FetchRequest) -> RequestClass {
        if !request.method.is_cacheable() {
            return RequestClass::Default;
        }

        let Some(url) = self.resolve(&request.url) else {
            return RequestClass::Default;
        };

        let ctx = RouteContext {
            url: &url,
            request,
        };

        for route in &self.routes {
            if (route.predicate)(&ctx) {
                return route.class;
            }
        }
        RequestClass::Default
    }

    /// Resolves a possibly-relative request URL against the worker scope and
    /// returns its canonical absolute form, or `None` if it cannot parse.
    pub fn canonical_url(&self, url: &str) -> Option<String> {
        self.resolve(url).map(|u| u.to_string())
    }

    fn resolve(&self, url: &str) -> Option<Url> {
        Url::options()
            .base_url(Some(&self.scope_origin))
            .parse(url)
            .ok()
    }
}

fn is_static_asset(url: &Url, rules: &StaticAssetRules) -> bool {
    let path = url.path();
    rules.extensions.iter().any(|ext| path.ends_with(ext.as_str()))
        || url
            .host_str()
            .is_some_and(|host| rules.asset_hosts.iter().any(|h| h == host))
        || path.contains(&rules.path_marker)
}

fn is_api_request(url: &Url, rules: &ApiRules) -> bool {
    url.host_str()
        .is_some_and(|host| rules.hosts.iter().any(|h| h == host))
        || url.path().starts_with(&rules.path_prefix)
        || url
            .query()
            .is_some_and(|query| query.contains(&rules.query_marker))
}
