use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::{
    media::index::MediaIndexStore,
    models::MediaPreview,
    normalize::rules::scalar_text,
    upstream::Upstream,
};

/// What the user clicked: a card title, its granted-item ids and its poster.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaRequest {
    /// Title shown in the modal.
    pub title: String,
    /// Granted-item ids in offer order.
    pub ids: Vec<String>,
    /// Poster used when no better image is found.
    pub poster: String,
}

/// One tier of the media lookup chain.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Media for the request, or `None` to defer to the next source.
    async fn find(&self, request: &MediaRequest) -> Option<MediaPreview>;
}

/// Looks ids up in the prebuilt media index.
pub struct IndexSource {
    store: Arc<MediaIndexStore>,
}

impl IndexSource {
    /// Source backed by `store`.
    pub fn new(store: Arc<MediaIndexStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl MediaSource for IndexSource {
    fn name(&self) -> &'static str {
        "index"
    }

    async fn find(&self, request: &MediaRequest) -> Option<MediaPreview> {
        let index = self.store.get().await;
        let entry = index.first_with_media(&request.ids)?;
        Some(MediaPreview {
            title: request.title.clone(),
            video: entry.video().to_string(),
            audio: entry.audio().to_string(),
            poster: entry.poster().unwrap_or(request.poster.as_str()).to_string(),
        })
    }
}

/// Queries the per-item detail endpoint, one id at a time.
pub struct DetailSource {
    upstream: Arc<dyn Upstream>,
    lang: String,
}

impl DetailSource {
    /// Source querying `upstream` in `lang`.
    pub fn new(upstream: Arc<dyn Upstream>, lang: impl Into<String>) -> Self {
        Self {
            upstream,
            lang: lang.into(),
        }
    }
}

#[async_trait]
impl MediaSource for DetailSource {
    fn name(&self) -> &'static str {
        "detail"
    }

    async fn find(&self, request: &MediaRequest) -> Option<MediaPreview> {
        for id in &request.ids {
            let payload = self
                .upstream
                .item(id, &self.lang)
                .await
                .and_then(|response| response.json());
            match payload {
                Ok(payload) => {
                    if let Some(mut preview) = detail_media(&payload, &request.poster) {
                        preview.title = request.title.clone();
                        return Some(preview);
                    }
                }
                Err(err) => debug!(%id, "item detail unavailable: {err}"),
            }
        }
        None
    }
}

/// Extract playable media from an item detail payload.
///
/// Returns `None` when the payload has neither video nor audio.
pub fn detail_media(payload: &Value, fallback_poster: &str) -> Option<MediaPreview> {
    let record = payload
        .get("item")
        .filter(|item| item.is_object())
        .unwrap_or(payload);

    let first_video = record
        .get("videos")
        .and_then(Value::as_array)
        .and_then(|videos| videos.first());
    let video = record
        .get("video")
        .and_then(scalar_text)
        .or_else(|| first_video.and_then(|video| video.get("url")).and_then(scalar_text))
        .or_else(|| first_video.and_then(scalar_text))
        .unwrap_or_default();
    let audio = record
        .get("audio")
        .and_then(scalar_text)
        .unwrap_or_default();
    if video.is_empty() && audio.is_empty() {
        return None;
    }

    let images = record.get("images");
    let poster = ["full_background", "icon"]
        .iter()
        .find_map(|key| images.and_then(|images| images.get(*key)).and_then(scalar_text))
        .unwrap_or_else(|| fallback_poster.to_string());

    Some(MediaPreview {
        title: String::new(),
        video,
        audio,
        poster,
    })
}

/// Ordered chain of media sources, falling back to the poster alone.
pub struct MediaResolver {
    sources: Vec<Box<dyn MediaSource>>,
}

impl MediaResolver {
    /// Resolver trying `sources` in order.
    pub fn new(sources: Vec<Box<dyn MediaSource>>) -> Self {
        Self { sources }
    }

    /// The index → detail chain used by the storefront.
    pub fn standard(
        index: Arc<MediaIndexStore>,
        upstream: Arc<dyn Upstream>,
        lang: impl Into<String>,
    ) -> Self {
        Self::new(vec![
            Box::new(IndexSource::new(index)),
            Box::new(DetailSource::new(upstream, lang)),
        ])
    }

    /// Resolve the best available preview for a card.
    pub async fn resolve(&self, request: &MediaRequest) -> MediaPreview {
        for source in &self.sources {
            if let Some(preview) = source.find(request).await {
                debug!(source = source.name(), title = %request.title, "resolved preview media");
                return preview;
            }
        }
        debug!(title = %request.title, "no preview media, showing poster");
        MediaPreview::poster_only(request.title.clone(), request.poster.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        media::index::MediaIndex,
        models::MediaIndexEntry,
        upstream::{UpstreamError, UpstreamResponse},
    };
    use serde_json::json;
    use std::{collections::HashMap, sync::Mutex};

    #[derive(Default)]
    struct FakeDetails {
        responses: HashMap<String, UpstreamResponse>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeDetails {
        fn with(mut self, id: &str, status: u16, body: Value) -> Self {
            self.responses.insert(
                id.to_string(),
                UpstreamResponse {
                    status,
                    body: body.to_string(),
                },
            );
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl Upstream for FakeDetails {
        async fn shop(&self, _lang: &str) -> Result<UpstreamResponse, UpstreamError> {
            Err(UpstreamError::Status(500))
        }

        async fn item(&self, id: &str, _lang: &str) -> Result<UpstreamResponse, UpstreamError> {
            self.calls.lock().expect("calls lock").push(id.to_string());
            self.responses
                .get(id)
                .cloned()
                .ok_or(UpstreamError::Status(404))
        }
    }

    fn request(ids: &[&str]) -> MediaRequest {
        MediaRequest {
            title: "Card".to_string(),
            ids: ids.iter().map(|id| id.to_string()).collect(),
            poster: "https://cdn/poster.png".to_string(),
        }
    }

    fn resolver(index: MediaIndex, details: Arc<FakeDetails>) -> MediaResolver {
        MediaResolver::standard(Arc::new(MediaIndexStore::preloaded(index)), details, "en")
    }

    #[tokio::test]
    async fn index_audio_short_circuits_detail_lookup() {
        let index = MediaIndex::from_entries([(
            "MusicPack_1",
            MediaIndexEntry {
                video: None,
                audio: Some("https://cdn/track.ogg".to_string()),
                poster: Some("https://cdn/cover.png".to_string()),
            },
        )]);
        let details = Arc::new(FakeDetails::default());
        let preview = resolver(index, details.clone())
            .resolve(&request(&["Other", "MusicPack_1"]))
            .await;

        assert_eq!(
            preview,
            MediaPreview {
                title: "Card".to_string(),
                video: String::new(),
                audio: "https://cdn/track.ogg".to_string(),
                poster: "https://cdn/cover.png".to_string(),
            }
        );
        assert!(details.calls().is_empty());
    }

    #[tokio::test]
    async fn index_entry_without_poster_keeps_card_poster() {
        let index = MediaIndex::from_entries([(
            "EID_1",
            MediaIndexEntry {
                video: Some("https://cdn/emote.mp4".to_string()),
                ..MediaIndexEntry::default()
            },
        )]);
        let preview = resolver(index, Arc::new(FakeDetails::default()))
            .resolve(&request(&["EID_1"]))
            .await;
        assert_eq!(preview.video, "https://cdn/emote.mp4");
        assert_eq!(preview.poster, "https://cdn/poster.png");
    }

    #[tokio::test]
    async fn detail_video_stops_remaining_lookups() {
        let details = Arc::new(
            FakeDetails::default()
                .with("a", 200, json!({ "images": { "icon": "https://cdn/a.png" } }))
                .with(
                    "b",
                    200,
                    json!({
                        "item": {
                            "videos": [{ "url": "https://cdn/b.mp4" }],
                            "images": { "icon": "https://cdn/b-icon.png" }
                        }
                    }),
                )
                .with("c", 200, json!({ "video": "https://cdn/c.mp4" })),
        );
        let preview = resolver(MediaIndex::default(), details.clone())
            .resolve(&request(&["a", "b", "c"]))
            .await;

        assert_eq!(preview.video, "https://cdn/b.mp4");
        assert_eq!(preview.audio, "");
        assert_eq!(preview.poster, "https://cdn/b-icon.png");
        assert_eq!(preview.title, "Card");
        assert_eq!(details.calls(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn failed_detail_lookups_are_skipped() {
        let details = Arc::new(
            FakeDetails::default()
                .with("broken", 500, json!({ "video": "https://cdn/ignored.mp4" }))
                .with("ok", 200, json!({ "audio": "https://cdn/ok.ogg" })),
        );
        let preview = resolver(MediaIndex::default(), details.clone())
            .resolve(&request(&["missing", "broken", "ok"]))
            .await;
        assert_eq!(preview.audio, "https://cdn/ok.ogg");
        assert_eq!(preview.poster, "https://cdn/poster.png");
        assert_eq!(details.calls(), vec!["missing", "broken", "ok"]);
    }

    #[tokio::test]
    async fn nothing_found_returns_poster_only() {
        let details = Arc::new(FakeDetails::default().with("a", 200, json!({ "result": true })));
        let preview = resolver(MediaIndex::default(), details)
            .resolve(&request(&["a", "b"]))
            .await;
        assert_eq!(
            preview,
            MediaPreview::poster_only("Card", "https://cdn/poster.png")
        );

        let preview = MediaResolver::new(Vec::new()).resolve(&request(&[])).await;
        assert_eq!(preview.poster, "https://cdn/poster.png");
    }

    #[test]
    fn detail_media_reads_string_video_list() {
        let preview = detail_media(
            &json!({ "videos": ["https://cdn/v.mp4"], "images": { "full_background": "https://cdn/full.png", "icon": "https://cdn/i.png" } }),
            "fallback",
        )
        .expect("video present");
        assert_eq!(preview.video, "https://cdn/v.mp4");
        assert_eq!(preview.poster, "https://cdn/full.png");

        assert!(detail_media(&json!({ "videos": [] }), "fallback").is_none());
    }
}
