//! Static per-integration field table.
//!
//! Pure data: which `requestContext` key marks each integration, where the
//! method and path live, and what the response shape carries.

use std::fmt;

/// One of the three supported trigger wire formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// API Gateway REST proxy integration (payload v1).
    RestProxy,
    /// API Gateway HTTP API integration (payload v2).
    HttpApiV2,
    /// Application load balancer target group.
    AlbTargetGroup,
}

/// Field locations for one variant.
#[derive(Debug)]
pub struct VariantSpec {
    /// Short name used in logs and metric labels.
    pub name: &'static str,
    /// Key under `requestContext` whose presence identifies the variant.
    pub context_marker: &'static str,
    /// Dotted path of the HTTP method.
    pub method_field: &'static str,
    /// Dotted path of the request path.
    pub path_field: &'static str,
    /// Whether the wire response carries `statusDescription`.
    pub status_description: bool,
}

static REST_PROXY: VariantSpec = VariantSpec {
    name: "rest_proxy",
    context_marker: "resourcePath",
    method_field: "httpMethod",
    path_field: "path",
    status_description: false,
};

static HTTP_API_V2: VariantSpec = VariantSpec {
    name: "http_api_v2",
    context_marker: "http",
    method_field: "requestContext.http.method",
    path_field: "rawPath",
    status_description: false,
};

static ALB_TARGET_GROUP: VariantSpec = VariantSpec {
    name: "alb_target_group",
    context_marker: "elb",
    method_field: "httpMethod",
    path_field: "path",
    status_description: true,
};

impl Variant {
    /// Classification probe order; first marker present wins.
    pub const PROBE_ORDER: [Variant; 3] = [
        Variant::AlbTargetGroup,
        Variant::HttpApiV2,
        Variant::RestProxy,
    ];

    pub fn spec(self) -> &'static VariantSpec {
        match self {
            Variant::RestProxy => &REST_PROXY,
            Variant::HttpApiV2 => &HTTP_API_V2,
            Variant::AlbTargetGroup => &ALB_TARGET_GROUP,
        }
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_order_is_alb_then_v2_then_rest() {
        let markers: Vec<_> = Variant::PROBE_ORDER
            .iter()
            .map(|v| v.spec().context_marker)
            .collect();
        assert_eq!(markers, vec!["elb", "http", "resourcePath"]);
    }

    #[test]
    fn only_alb_carries_status_description() {
        assert!(Variant::AlbTargetGroup.spec().status_description);
        assert!(!Variant::RestProxy.spec().status_description);
        assert!(!Variant::HttpApiV2.spec().status_description);
    }
}
