use regex::{Regex, RegexBuilder};

use crate::error::MultiTenantError;
use crate::model::{HttpWorkContext, WorkContext};
use crate::strategy::traits::{priority, TenantStrategy};

/// Placeholder token that marks the tenant label in a host template.
pub const TENANT_TOKEN: &str = "__tenant__";

/// Template used when none is configured: tenant label atop a registrable
/// domain, e.g. `acme.example.com` -> `acme`.
pub const DEFAULT_TEMPLATE: &str = "__tenant__.*";

// RFC 1035 bound on a full domain name. Longer inputs never match.
const MAX_HOST_LENGTH: usize = 253;

/// Extracts the tenant identifier from the request host using a dot-segment
/// template.
///
/// The template contains exactly one `__tenant__` placeholder plus literal
/// segments, `?` (exactly one segment), `*.` prefixes (one or more leading
/// segments), and a trailing `.*` (the tenant label must be followed by a
/// registrable domain, i.e. at least two further segments). The placeholder
/// may not have wildcards on both sides. The template is compiled once at
/// construction; matching is case-insensitive, anchored, and linear-time in
/// the host length, so adversarial hosts cannot stall the pipeline.
pub struct HostStrategy {
    template: String,
    pattern: Regex,
}

impl HostStrategy {
    pub fn new(template: &str) -> Result<Self, MultiTenantError> {
        let template = template.trim().to_string();
        if template.is_empty() {
            return Err(MultiTenantError::misconfigured_template(
                &template,
                "template is empty",
            ));
        }
        let Some(token_at) = template.find(TENANT_TOKEN) else {
            return Err(MultiTenantError::misconfigured_template(
                &template,
                "missing the __tenant__ placeholder",
            ));
        };
        let before = &template[..token_at];
        let after = &template[token_at + TENANT_TOKEN.len()..];
        if after.contains(TENANT_TOKEN) {
            return Err(MultiTenantError::misconfigured_template(
                &template,
                "more than one __tenant__ placeholder",
            ));
        }
        if before.ends_with("*.") && after.starts_with(".*") {
            return Err(MultiTenantError::misconfigured_template(
                &template,
                "the __tenant__ placeholder cannot have wildcards on both sides",
            ));
        }

        let mut pattern = template.replace('.', r"\.");
        // A trailing `.*` means the tenant label sits above a registrable
        // domain: at least two further dot-segments must follow.
        if pattern.ends_with(r"\.*") {
            pattern.truncate(pattern.len() - 3);
            pattern.push_str(r"(\.[^\.]+){2,}");
        }
        // An embedded `*.` spans one or more leading dot-segments.
        pattern = pattern.replace(r"*\.", r"([^\.]+\.)+");
        if pattern.contains('*') {
            return Err(MultiTenantError::misconfigured_template(
                &template,
                "wildcards may only appear as `*.` segments or a trailing `.*`",
            ));
        }
        pattern = pattern.replace('?', r"[^\.]+");
        pattern = pattern.replace(TENANT_TOKEN, r"(?P<tenant>[^\.]+)");

        let pattern = RegexBuilder::new(&format!("^{pattern}$"))
            .case_insensitive(true)
            .build()
            .map_err(|e| MultiTenantError::misconfigured_template(&template, &e.to_string()))?;

        Ok(Self { template, pattern })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    fn match_host(&self, host: &str) -> Option<String> {
        if host.is_empty() || host.len() > MAX_HOST_LENGTH {
            return None;
        }
        self.pattern
            .captures(host)?
            .name("tenant")
            .map(|m| m.as_str().to_string())
    }
}

#[async_trait::async_trait]
impl TenantStrategy for HostStrategy {
    fn name(&self) -> &str {
        "host"
    }

    fn priority(&self) -> u8 {
        priority::HOST
    }

    async fn try_get_identifier(
        &self,
        ctx: &dyn WorkContext,
    ) -> Result<Option<String>, MultiTenantError> {
        let Some(http) = ctx.as_any().downcast_ref::<HttpWorkContext>() else {
            return Ok(None);
        };
        let Some(host) = http.host.as_deref() else {
            return Ok(None);
        };
        Ok(self.match_host(host))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_matching() {
        let strategy = HostStrategy::new(DEFAULT_TEMPLATE).unwrap();
        assert_eq!(
            strategy.match_host("acme.example.com"),
            Some("acme".to_string())
        );
        assert_eq!(
            strategy.match_host("acme.ignore.ignore"),
            Some("acme".to_string())
        );
        // A bare registrable domain has no tenant sub-segment.
        assert_eq!(strategy.match_host("example.com"), None);
        assert_eq!(strategy.match_host("localhost"), None);
    }

    #[test]
    fn test_literal_template() {
        let strategy = HostStrategy::new("__tenant__.example.com").unwrap();
        assert_eq!(
            strategy.match_host("acme.example.com"),
            Some("acme".to_string())
        );
        assert_eq!(strategy.match_host("acme.other.com"), None);
        assert_eq!(strategy.match_host("a.b.example.com"), None);
    }

    #[test]
    fn test_matching_is_case_insensitive_and_preserves_case() {
        let strategy = HostStrategy::new("__tenant__.Example.COM").unwrap();
        assert_eq!(
            strategy.match_host("ACME.example.com"),
            Some("ACME".to_string())
        );
    }

    #[test]
    fn test_leading_wildcard_requires_a_segment() {
        let strategy = HostStrategy::new("*.__tenant__.example.com").unwrap();
        assert_eq!(
            strategy.match_host("a.b.acme.example.com"),
            Some("acme".to_string())
        );
        assert_eq!(
            strategy.match_host("eu.acme.example.com"),
            Some("acme".to_string())
        );
        assert_eq!(strategy.match_host("acme.example.com"), None);
    }

    #[test]
    fn test_single_segment_wildcard() {
        let strategy = HostStrategy::new("__tenant__.?.com").unwrap();
        assert_eq!(
            strategy.match_host("acme.region.com"),
            Some("acme".to_string())
        );
        assert_eq!(strategy.match_host("acme.com"), None);
        assert_eq!(strategy.match_host("acme.a.b.com"), None);
    }

    #[test]
    fn test_rejects_bad_templates() {
        for (template, fragment) in [
            ("", "empty"),
            ("   ", "empty"),
            ("example.com", "missing"),
            ("__tenant__.__tenant__.*", "more than one"),
            ("*.__tenant__.*", "both sides"),
            ("__tenant__.ex*mple.com", "wildcards may only appear"),
        ] {
            let err = HostStrategy::new(template).unwrap_err();
            match err {
                MultiTenantError::MisconfiguredTemplate { reason, .. } => {
                    assert!(
                        reason.contains(fragment),
                        "template {template:?}: reason {reason:?} missing {fragment:?}"
                    );
                }
                other => panic!("expected MisconfiguredTemplate, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_oversized_host_never_matches() {
        let strategy = HostStrategy::new(DEFAULT_TEMPLATE).unwrap();
        let host = format!("acme.{}.com", "a".repeat(300));
        assert_eq!(strategy.match_host(&host), None);
    }

    #[tokio::test]
    async fn test_non_http_context_is_not_applicable() {
        struct PlainContext;
        impl crate::model::WorkContext for PlainContext {
            fn as_any(&self) -> &dyn std::any::Any {
                self
            }
        }

        let strategy = HostStrategy::new(DEFAULT_TEMPLATE).unwrap();
        assert_eq!(strategy.try_get_identifier(&PlainContext).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_reads_host_from_http_context() {
        let strategy = HostStrategy::new(DEFAULT_TEMPLATE).unwrap();
        let ctx = HttpWorkContext::new().with_host("acme.example.com");
        assert_eq!(
            strategy.try_get_identifier(&ctx).await.unwrap(),
            Some("acme".to_string())
        );

        let no_host = HttpWorkContext::new();
        assert_eq!(strategy.try_get_identifier(&no_host).await.unwrap(), None);
    }
}
