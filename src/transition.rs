//! Main image transitions
//!
//! A two-state machine (`Idle` / `Loading(token)`) in front of the displayed
//! main image. Every request gets a new, strictly increasing token and the
//! target is loaded off the visible path. Only a completion carrying the
//! current token swaps the image; anything older is dropped without effect,
//! so rapid clicks can complete in any order.
//!
//! Color changes crossfade: a snapshot of the previous image fades out over
//! the configured duration. Ink toggles for the same color swap instantly.

use std::collections::HashSet;
use thiserror::Error;

use crate::config::TransitionConfig;

/// Monotonic identifier of a load request.
pub type LoadToken = u64;

/// Why the main image is changing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// A different color was selected
    ColorChange,
    /// Same color, other image (usually the other ink row); no fade
    InkToggle,
}

impl ChangeKind {
    pub fn fades(self) -> bool {
        matches!(self, ChangeKind::ColorChange)
    }
}

/// A load the caller must perform and report back with its token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub token: LoadToken,
    pub target: String,
    pub kind: ChangeKind,
}

/// Failure to load a main image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to load '{url}': {reason}")]
pub struct LoadError {
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TransitionState {
    Idle,
    Loading(LoadTicket),
}

/// Outcome of reporting a finished load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The target is now displayed
    Swapped { displayed: String, faded: bool },
    /// Superseded by a newer request; ignored
    Stale,
    /// The current load failed; the previous image stays
    Failed(LoadError),
}

/// Outgoing image snapshot being faded out.
#[derive(Debug, Clone, PartialEq)]
pub struct Fade {
    pub snapshot: String,
    elapsed_ms: u32,
    duration_ms: u32,
}

impl Fade {
    fn new(snapshot: String, duration_ms: u32) -> Self {
        Self { snapshot, elapsed_ms: 0, duration_ms }
    }

    /// Snapshot opacity, 1.0 → 0.0 along a quadratic ease-out.
    pub fn opacity(&self) -> f32 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        let t = (self.elapsed_ms as f32 / self.duration_ms as f32).clamp(0.0, 1.0);
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        1.0 - eased
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }
}

/// Deduplicating set of URLs already requested during one product view.
///
/// Advisory only: a miss never blocks a transition.
#[derive(Debug, Clone, Default)]
pub struct PrefetchCache {
    requested: HashSet<String>,
}

impl PrefetchCache {
    /// Record a URL; `true` the first time it is seen.
    pub fn insert(&mut self, url: &str) -> bool {
        if self.requested.contains(url) {
            return false;
        }
        self.requested.insert(url.to_string())
    }

    /// The URLs from `urls` not requested yet, recorded as requested.
    pub fn warm<'a>(&mut self, urls: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        urls.into_iter().filter(|url| self.insert(url)).map(str::to_string).collect()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.requested.contains(url)
    }

    pub fn len(&self) -> usize {
        self.requested.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requested.is_empty()
    }

    pub fn clear(&mut self) {
        self.requested.clear();
    }
}

/// Token-guarded swap and fade of the displayed main image.
#[derive(Debug, Clone)]
pub struct ImageTransitionController {
    last_token: LoadToken,
    state: TransitionState,
    displayed: Option<String>,
    fade: Option<Fade>,
    fade_ms: u32,
    prefetch: PrefetchCache,
}

impl Default for ImageTransitionController {
    fn default() -> Self {
        Self::new(&TransitionConfig::default())
    }
}

impl ImageTransitionController {
    pub fn new(config: &TransitionConfig) -> Self {
        Self {
            last_token: 0,
            state: TransitionState::Idle,
            displayed: None,
            fade: None,
            fade_ms: config.fade_ms,
            prefetch: PrefetchCache::default(),
        }
    }

    /// Show `url` immediately, as on first render.
    pub fn show(&mut self, url: &str) {
        self.displayed = Some(url.to_string());
        self.prefetch.insert(url);
    }

    /// Ask to display `target`.
    ///
    /// Returns the ticket to load, or `None` when `target` is already shown
    /// and nothing newer is pending. A new request supersedes any pending one.
    pub fn request(&mut self, target: &str, kind: ChangeKind) -> Option<LoadTicket> {
        if self.state == TransitionState::Idle && self.displayed.as_deref() == Some(target) {
            return None;
        }

        self.last_token += 1;
        let ticket = LoadTicket { token: self.last_token, target: target.to_string(), kind };
        if let TransitionState::Loading(previous) = &self.state {
            log::debug!("load {} superseded by {}", previous.token, ticket.token);
        }
        self.prefetch.insert(target);
        self.state = TransitionState::Loading(ticket.clone());
        Some(ticket)
    }

    /// Report a finished load.
    pub fn complete(&mut self, token: LoadToken, result: Result<(), LoadError>) -> Completion {
        let ticket = match &self.state {
            TransitionState::Loading(ticket) if ticket.token == token => ticket.clone(),
            _ => {
                log::debug!("discarding stale load {}", token);
                return Completion::Stale;
            }
        };
        self.state = TransitionState::Idle;

        if let Err(e) = result {
            log::warn!("{}", e);
            return Completion::Failed(e);
        }

        let previous = self.displayed.replace(ticket.target.clone());
        let faded = match previous {
            Some(snapshot) if ticket.kind.fades() && self.fade_ms > 0 && snapshot != ticket.target => {
                self.fade = Some(Fade::new(snapshot, self.fade_ms));
                true
            }
            _ => {
                self.fade = None;
                false
            }
        };

        Completion::Swapped { displayed: ticket.target, faded }
    }

    /// Advance the fade; returns the snapshot opacity while fading.
    pub fn tick(&mut self, dt_ms: u32) -> Option<f32> {
        let fade = self.fade.as_mut()?;
        fade.elapsed_ms = fade.elapsed_ms.saturating_add(dt_ms);
        if fade.is_finished() {
            self.fade = None;
            return None;
        }
        Some(fade.opacity())
    }

    pub fn displayed(&self) -> Option<&str> {
        self.displayed.as_deref()
    }

    pub fn fade(&self) -> Option<&Fade> {
        self.fade.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, TransitionState::Loading(_))
    }

    /// The pending ticket, if a load is in flight.
    pub fn pending(&self) -> Option<&LoadTicket> {
        match &self.state {
            TransitionState::Loading(ticket) => Some(ticket),
            TransitionState::Idle => None,
        }
    }

    pub fn prefetch(&mut self) -> &mut PrefetchCache {
        &mut self.prefetch
    }

    /// Forget everything tied to the current product view.
    ///
    /// The token counter keeps counting so late completions stay stale.
    pub fn reset(&mut self) {
        self.state = TransitionState::Idle;
        self.displayed = None;
        self.fade = None;
        self.prefetch.clear();
    }
}

#[cfg(feature = "preload")]
pub use preload::Preloader;

/// Async loading of transition tickets on a tokio runtime.
#[cfg(feature = "preload")]
mod preload {
    use std::future::Future;
    use tokio::sync::mpsc;

    use super::{LoadError, LoadTicket, LoadToken};

    /// Runs load futures and yields their results in completion order.
    pub struct Preloader {
        tx: mpsc::UnboundedSender<(LoadToken, Result<(), LoadError>)>,
        rx: mpsc::UnboundedReceiver<(LoadToken, Result<(), LoadError>)>,
    }

    impl Default for Preloader {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Preloader {
        pub fn new() -> Self {
            let (tx, rx) = mpsc::unbounded_channel();
            Self { tx, rx }
        }

        /// Spawn `load(target)` for a ticket on the current runtime.
        pub fn spawn<F, Fut>(&self, ticket: &LoadTicket, load: F)
        where
            F: FnOnce(String) -> Fut,
            Fut: Future<Output = Result<(), LoadError>> + Send + 'static,
        {
            let tx = self.tx.clone();
            let token = ticket.token;
            let fut = load(ticket.target.clone());
            tokio::spawn(async move {
                let result = fut.await;
                // Receiver gone means the view was torn down
                let _ = tx.send((token, result));
            });
        }

        /// Next finished load.
        pub async fn next(&mut self) -> Option<(LoadToken, Result<(), LoadError>)> {
            self.rx.recv().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> ImageTransitionController {
        let mut c = ImageTransitionController::new(&TransitionConfig { fade_ms: 200 });
        c.show("a.png");
        c
    }

    #[test]
    fn test_tokens_increase() {
        let mut c = controller();
        let t1 = c.request("b.png", ChangeKind::ColorChange).unwrap();
        let t2 = c.request("c.png", ChangeKind::ColorChange).unwrap();
        assert!(t2.token > t1.token);
        assert_eq!(c.pending(), Some(&t2));
    }

    #[test]
    fn test_request_for_displayed_image_is_noop() {
        let mut c = controller();
        assert_eq!(c.request("a.png", ChangeKind::ColorChange), None);
        assert!(!c.is_loading());
    }

    #[test]
    fn test_out_of_order_completions() {
        let mut c = controller();
        let t1 = c.request("1.png", ChangeKind::ColorChange).unwrap();
        let t2 = c.request("2.png", ChangeKind::ColorChange).unwrap();
        let t3 = c.request("3.png", ChangeKind::ColorChange).unwrap();

        assert!(matches!(c.complete(t3.token, Ok(())), Completion::Swapped { .. }));
        assert_eq!(c.complete(t1.token, Ok(())), Completion::Stale);
        assert_eq!(c.complete(t2.token, Ok(())), Completion::Stale);
        assert_eq!(c.displayed(), Some("3.png"));
        assert!(!c.is_loading());
    }

    #[test]
    fn test_color_change_fades_ink_toggle_does_not() {
        let mut c = controller();
        let t = c.request("b.png", ChangeKind::ColorChange).unwrap();
        assert_eq!(
            c.complete(t.token, Ok(())),
            Completion::Swapped { displayed: "b.png".to_string(), faded: true }
        );
        assert_eq!(c.fade().map(|f| f.snapshot.as_str()), Some("a.png"));

        let t = c.request("c.png", ChangeKind::InkToggle).unwrap();
        assert_eq!(
            c.complete(t.token, Ok(())),
            Completion::Swapped { displayed: "c.png".to_string(), faded: false }
        );
        assert!(c.fade().is_none());
    }

    #[test]
    fn test_fade_ticks_to_zero() {
        let mut c = controller();
        let t = c.request("b.png", ChangeKind::ColorChange).unwrap();
        c.complete(t.token, Ok(()));

        let half = c.tick(100).unwrap();
        // ease-out: past the linear midpoint
        assert!((half - 0.25).abs() < 1e-6);
        assert!(c.tick(50).unwrap() < half);
        assert_eq!(c.tick(50), None);
        assert!(c.fade().is_none());
        assert_eq!(c.tick(10), None);
    }

    #[test]
    fn test_failed_load_keeps_displayed() {
        let mut c = controller();
        let t = c.request("b.png", ChangeKind::ColorChange).unwrap();
        let err = LoadError { url: "b.png".to_string(), reason: "404".to_string() };
        assert_eq!(c.complete(t.token, Err(err.clone())), Completion::Failed(err));
        assert_eq!(c.displayed(), Some("a.png"));
        assert!(!c.is_loading());
    }

    #[test]
    fn test_zero_fade_duration_swaps_instantly() {
        let mut c = ImageTransitionController::new(&TransitionConfig { fade_ms: 0 });
        c.show("a.png");
        let t = c.request("b.png", ChangeKind::ColorChange).unwrap();
        assert_eq!(c.complete(t.token, Ok(())), Completion::Swapped { displayed: "b.png".to_string(), faded: false });
    }

    #[test]
    fn test_reset_keeps_old_tokens_stale() {
        let mut c = controller();
        let t = c.request("b.png", ChangeKind::ColorChange).unwrap();
        c.reset();
        assert_eq!(c.complete(t.token, Ok(())), Completion::Stale);
        assert_eq!(c.displayed(), None);
        let next = c.request("b.png", ChangeKind::ColorChange).unwrap();
        assert!(next.token > t.token);
    }

    #[test]
    fn test_prefetch_cache_dedups() {
        let mut cache = PrefetchCache::default();
        assert!(cache.insert("a.png"));
        assert!(!cache.insert("a.png"));
        assert_eq!(cache.warm(["a.png", "b.png", "b.png", "c.png"]), vec!["b.png", "c.png"]);
        assert_eq!(cache.len(), 3);
    }

    #[cfg(feature = "preload")]
    #[tokio::test]
    async fn test_preloader_delivers_in_completion_order() {
        use std::time::Duration;

        let mut c = controller();
        let preloader_tickets: Vec<LoadTicket> = ["1.png", "2.png", "3.png"]
            .iter()
            .map(|t| c.request(t, ChangeKind::ColorChange).unwrap())
            .collect();

        let mut preloader = Preloader::new();
        for (ticket, delay) in preloader_tickets.iter().zip([20u64, 40, 0]) {
            preloader.spawn(ticket, move |_| async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok(())
            });
        }

        let mut order = Vec::new();
        for _ in 0..3 {
            let (token, result) = preloader.next().await.unwrap();
            order.push(token);
            c.complete(token, result);
        }

        assert_eq!(order, vec![3, 1, 2]);
        assert_eq!(c.displayed(), Some("3.png"));
    }
}
