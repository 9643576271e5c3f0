use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;

pub const DEFAULT_REGION: &str = "us-east-1";

/// How to reach the backend. Built once from the parsed flags and handed to
/// [`build_client`]; nothing else reads the AWS environment directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub endpoint_url: Option<String>,
}

impl ClientConfig {
    pub fn new(
        region: Option<String>,
        profile: Option<String>,
        endpoint_url: Option<String>,
    ) -> Self {
        fn non_empty(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        ClientConfig {
            region: non_empty(region),
            profile: non_empty(profile),
            endpoint_url: non_empty(endpoint_url),
        }
    }
}

pub async fn build_client(config: &ClientConfig) -> aws_sdk_s3::Client {
    let region_provider = RegionProviderChain::first_try(config.region.clone().map(Region::new))
        .or_default_provider()
        .or_else(DEFAULT_REGION);

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region_provider);
    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }
    if let Some(endpoint) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }
    let sdk_config = loader.load().await;

    tracing::debug!(
        region = ?sdk_config.region(),
        profile = config.profile.as_deref().unwrap_or("default"),
        endpoint = config.endpoint_url.as_deref().unwrap_or_default(),
        "loaded AWS config"
    );

    // S3-compatible stores behind a custom endpoint rarely support virtual-hosted buckets.
    let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
        .force_path_style(config.endpoint_url.is_some())
        .build();
    aws_sdk_s3::Client::from_conf(s3_config)
}
