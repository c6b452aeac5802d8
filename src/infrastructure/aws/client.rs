use crate::domain::config::ClientConfig;
use aws_config::meta::region::RegionProviderChain;
use aws_config::timeout::TimeoutConfig;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_iam::config::Region;
use tracing::debug;

/// Resolve shared AWS configuration from settings, falling back to the default chains
pub async fn load_sdk_config(settings: &ClientConfig) -> SdkConfig {
    let region = RegionProviderChain::first_try(settings.region.clone().map(Region::new))
        .or_default_provider();

    let timeouts = TimeoutConfig::builder()
        .operation_timeout(settings.timeout())
        .build();

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(region)
        .timeout_config(timeouts);

    if let Some(profile) = &settings.profile {
        debug!(profile = %profile, "using named profile");
        loader = loader.profile_name(profile);
    }

    if let Some(endpoint_url) = &settings.endpoint_url {
        debug!(endpoint_url = %endpoint_url, "using custom endpoint");
        loader = loader.endpoint_url(endpoint_url);
    }

    loader.load().await
}
