//! Resolve links to channel and video identifiers

use crate::error::PulseError;
use crate::platform::client::ChannelLookup;
use crate::platform::data_api::SearchResult;
use crate::platform::gateway::ApiGateway;
use crate::utils::cache::{IdKind, IdentifierCache};
use crate::utils::url::{classify, LinkClass, YouTubeLink};
use tracing::{debug, error, info, warn};

/// Results requested per channel search
const SEARCH_RESULTS: u32 = 10;

/// Ways to turn a handle or legacy name into a channel id, in the order
/// they are attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// `channels.list?forHandle=`
    ForHandle,
    /// `channels.list?forUsername=`
    ForUsername,
    /// Channel search on the raw name
    KeywordSearch,
    /// Channel search on the quoted name
    ExactPhraseSearch,
    /// Channel search on spaced / lowercased variants of the name
    VariantSearch,
}

impl ResolutionStrategy {
    pub const ORDER: [ResolutionStrategy; 5] = [
        ResolutionStrategy::ForHandle,
        ResolutionStrategy::ForUsername,
        ResolutionStrategy::KeywordSearch,
        ResolutionStrategy::ExactPhraseSearch,
        ResolutionStrategy::VariantSearch,
    ];

    /// Handle lookups only make sense for `/@handle` links
    pub fn applies_to(self, link: &YouTubeLink) -> bool {
        match self {
            ResolutionStrategy::ForHandle => matches!(link, YouTubeLink::Handle(_)),
            _ => true,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ResolutionStrategy::ForHandle => "handle lookup",
            ResolutionStrategy::ForUsername => "username lookup",
            ResolutionStrategy::KeywordSearch => "keyword search",
            ResolutionStrategy::ExactPhraseSearch => "exact phrase search",
            ResolutionStrategy::VariantSearch => "variant search",
        }
    }
}

/// Resolves links to identifiers, caching successes by link
#[derive(Clone)]
pub struct IdentifierResolver {
    gateway: ApiGateway,
    cache: IdentifierCache,
}

impl IdentifierResolver {
    pub fn new(gateway: ApiGateway) -> Self {
        Self {
            gateway,
            cache: IdentifierCache::new(),
        }
    }

    pub fn cache(&self) -> &IdentifierCache {
        &self.cache
    }

    /// Video id of a watch, shorts or youtu.be link. Never calls the API.
    pub async fn resolve_video_id(&self, link: &str) -> Result<String, PulseError> {
        if let Some(id) = self.cache.get(IdKind::Video, link).await {
            debug!("Video id for {} served from cache", link);
            return Ok(id);
        }

        let id = match classify(link) {
            LinkClass::YouTube(YouTubeLink::ShortVideo(id) | YouTubeLink::Video(id))
                if !id.is_empty() =>
            {
                id
            }
            LinkClass::YouTube(_) => {
                return Err(PulseError::UnsupportedLink(format!(
                    "{} does not contain a video id",
                    link
                )))
            }
            _ => return Err(PulseError::InvalidLink(link.to_string())),
        };

        self.cache.insert(IdKind::Video, link, id.clone()).await;
        Ok(id)
    }

    /// Channel id of a channel, handle or legacy-name link
    pub async fn resolve_channel_id(&self, link: &str) -> Result<String, PulseError> {
        if let Some(id) = self.cache.get(IdKind::Channel, link).await {
            debug!("Channel id for {} served from cache", link);
            return Ok(id);
        }

        let youtube = match classify(link) {
            LinkClass::YouTube(youtube) => youtube,
            _ => return Err(PulseError::InvalidLink(link.to_string())),
        };

        if youtube.is_video() {
            return Err(PulseError::UnsupportedLink(format!(
                "{} points at a video, not a channel",
                link
            )));
        }

        let token = match youtube.token() {
            Some(token) if !token.is_empty() => token,
            _ => return Err(PulseError::UnsupportedLink(link.to_string())),
        };

        let id = match &youtube {
            YouTubeLink::ChannelId(_) => token.to_string(),
            _ => self.resolve_by_name(token, &youtube).await?,
        };

        info!("Resolved {} to channel {}", link, id);
        self.cache.insert(IdKind::Channel, link, id.clone()).await;
        Ok(id)
    }

    async fn resolve_by_name(&self, name: &str, link: &YouTubeLink) -> Result<String, PulseError> {
        let mut last_error = None;

        for strategy in ResolutionStrategy::ORDER
            .into_iter()
            .filter(|strategy| strategy.applies_to(link))
        {
            info!("Resolving '{}' with {}", name, strategy.name());
            match self.run_strategy(strategy, name).await {
                Ok(Some(id)) => {
                    info!("{} resolved '{}' to {}", strategy.name(), name, id);
                    return Ok(id);
                }
                Ok(None) => debug!("{} found nothing for '{}'", strategy.name(), name),
                Err(e) => {
                    warn!("{} failed for '{}': {}", strategy.name(), name, e);
                    last_error = Some(Box::new(e));
                }
            }
        }

        error!("All resolution strategies failed for '{}'", name);
        Err(PulseError::Unresolvable {
            name: name.to_string(),
            last_error,
        })
    }

    /// Run one strategy. `Ok(None)` means the strategy found nothing.
    pub async fn run_strategy(
        &self,
        strategy: ResolutionStrategy,
        name: &str,
    ) -> Result<Option<String>, PulseError> {
        match strategy {
            ResolutionStrategy::ForHandle => self.lookup(ChannelLookup::Handle(name)).await,
            ResolutionStrategy::ForUsername => self.lookup(ChannelLookup::Username(name)).await,
            ResolutionStrategy::KeywordSearch => self.search(name, name).await,
            ResolutionStrategy::ExactPhraseSearch => {
                self.search(&format!("\"{}\"", name), name).await
            }
            ResolutionStrategy::VariantSearch => {
                for variant in handle_variants(name) {
                    if let Some(id) = self.search(&variant, &variant).await? {
                        return Ok(Some(id));
                    }
                }
                Ok(None)
            }
        }
    }

    async fn lookup(&self, lookup: ChannelLookup<'_>) -> Result<Option<String>, PulseError> {
        let api = self.gateway.api();
        let channels = self
            .gateway
            .call("channels.list", move || api.channels(lookup, "id"))
            .await?;
        Ok(channels.into_iter().map(|c| c.id).find(|id| !id.is_empty()))
    }

    async fn search(&self, query: &str, name: &str) -> Result<Option<String>, PulseError> {
        let api = self.gateway.api();
        let results = self
            .gateway
            .call("search.list", move || api.search_channels(query, SEARCH_RESULTS))
            .await?;
        Ok(select_candidate(name, &results)
            .and_then(|candidate| candidate.channel_id())
            .map(str::to_string))
    }
}

/// Pick the search result that best matches `name`: a title containing the
/// name (or contained in it), then a title sharing at least two words with
/// it, then the first result
pub fn select_candidate<'a>(name: &str, candidates: &'a [SearchResult]) -> Option<&'a SearchResult> {
    let usable: Vec<&SearchResult> = candidates
        .iter()
        .filter(|c| c.channel_id().is_some())
        .collect();

    let needle = compact(name);
    if !needle.is_empty() {
        let substring = usable.iter().copied().find(|c| {
            let title = compact(c.title());
            !title.is_empty()
                && (title.contains(&needle) || (title.len() >= 3 && needle.contains(&title)))
        });
        if let Some(candidate) = substring {
            return Some(candidate);
        }
    }

    let name_words = words(name);
    if name_words.len() >= 2 {
        let overlapping = usable.iter().copied().find(|c| {
            let title_words = words(c.title());
            name_words.iter().filter(|w| title_words.contains(w)).count() >= 2
        });
        if let Some(candidate) = overlapping {
            return Some(candidate);
        }
    }

    usable.first().copied()
}

/// Search variants of a handle: separators replaced with spaces, lowercased.
/// The original spelling is never repeated.
pub fn handle_variants(name: &str) -> Vec<String> {
    let spaced = name
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    let lowered = name.to_lowercase();

    let mut variants: Vec<String> = Vec::new();
    for variant in [spaced, lowered] {
        if !variant.is_empty() && variant != name && !variants.contains(&variant) {
            variants.push(variant);
        }
    }
    variants
}

fn compact(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}
