//! Integration tests for playback coordination
//!
//! Mixed player kinds mounted side by side, the way the search and
//! library views mount them.

use musicapp_playback::{
    EmbedHandle, EmbedProtocol, NativeAudioControl, PlaybackCoordinator, PlaybackEvent,
    PlayerEvent, PlayerHandle, PlayerId, PlayerRegistry, SilenceOutcome, WidgetControl,
    WidgetHandle,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

// ===== Test Helpers =====

#[derive(Debug)]
struct AudioState {
    paused: bool,
    position: Duration,
    pauses: usize,
}

/// Audio element that records the calls made on it
#[derive(Clone)]
struct FakeAudio {
    state: Arc<Mutex<AudioState>>,
}

impl FakeAudio {
    fn playing_at(position: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(AudioState {
                paused: false,
                position,
                pauses: 0,
            })),
        }
    }

    fn resume(&self) {
        self.state.lock().unwrap().paused = false;
    }

    fn pauses(&self) -> usize {
        self.state.lock().unwrap().pauses
    }

    fn position(&self) -> Duration {
        self.state.lock().unwrap().position
    }
}

impl NativeAudioControl for FakeAudio {
    fn pause(&self) -> musicapp_playback::Result<()> {
        let mut state = self.state.lock().unwrap();
        state.paused = true;
        state.pauses += 1;
        Ok(())
    }

    fn set_position(&self, position: Duration) -> musicapp_playback::Result<()> {
        self.state.lock().unwrap().position = position;
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.state.lock().unwrap().paused
    }
}

/// Widget that counts pause calls
#[derive(Clone, Default)]
struct FakeWidget {
    pauses: Arc<AtomicUsize>,
}

impl WidgetControl for FakeWidget {
    fn pause(&self) -> musicapp_playback::Result<()> {
        self.pauses.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

fn drain(rx: &mut mpsc::UnboundedReceiver<String>) -> Vec<String> {
    let mut messages = Vec::new();
    while let Ok(message) = rx.try_recv() {
        messages.push(message);
    }
    messages
}

// ===== Scenarios =====

#[test]
fn test_three_heterogeneous_players() {
    let registry = PlayerRegistry::new();

    let audio = FakeAudio::playing_at(Duration::from_secs(42));
    registry.register(PlayerHandle::native("native", audio.clone()));

    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();
    registry.register(PlayerHandle::embed(
        "embed",
        EmbedHandle::new(frame_tx, EmbedProtocol::YouTubeIframe),
    ));

    let widget = FakeWidget::default();
    let (widget_handle, ready) = WidgetHandle::new(widget.clone());
    registry.register(PlayerHandle::widget("widget", widget_handle));

    let native = PlayerId::from("native");
    let embed = PlayerId::from("embed");
    let widget_id = PlayerId::from("widget");

    let mut coordinator = PlaybackCoordinator::new(registry);

    // Play native: embed and widget receive silence commands
    let pass = coordinator.on_play_started(&native);
    assert_eq!(pass.outcomes.len(), 2);
    let frame_messages = drain(&mut frame_rx);
    assert_eq!(frame_messages.len(), 1);
    assert!(frame_messages[0].contains("stopVideo"));
    assert_eq!(
        pass.outcome(&widget_id),
        Some(&SilenceOutcome::SkippedNotReady)
    );
    assert_eq!(audio.pauses(), 0);
    assert_eq!(audio.position(), Duration::from_secs(42));

    // Play the widget before its handshake: the native player stops,
    // the widget itself is untouched and nothing fails
    let pass = coordinator.on_play_started(&widget_id);
    assert_eq!(coordinator.active(), Some(&widget_id));
    assert_eq!(
        pass.outcome(&native),
        Some(&SilenceOutcome::Paused { was_playing: true })
    );
    assert_eq!(audio.position(), Duration::ZERO);
    assert_eq!(drain(&mut frame_rx).len(), 1);
    assert_eq!(widget.pauses.load(Ordering::SeqCst), 0);

    // Once ready, the widget is paused through its SDK
    ready.mark_ready();
    audio.resume();
    let pass = coordinator.on_play_started(&embed);
    assert_eq!(pass.outcome(&widget_id), Some(&SilenceOutcome::WidgetPaused));
    assert_eq!(widget.pauses.load(Ordering::SeqCst), 1);
    assert_eq!(audio.pauses(), 2);
    assert!(drain(&mut frame_rx).is_empty());
}

#[test]
fn test_unmounted_embed_is_never_called() {
    let registry = PlayerRegistry::new();
    registry.register(PlayerHandle::native(
        "native",
        FakeAudio::playing_at(Duration::ZERO),
    ));

    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel();
    registry.register(PlayerHandle::embed(
        "embed",
        EmbedHandle::new(frame_tx, EmbedProtocol::PostMessage),
    ));

    let mut coordinator = PlaybackCoordinator::new(registry.clone());
    registry.deregister(&PlayerId::from("embed"));

    let pass = coordinator.on_play_started(&PlayerId::from("native"));
    assert!(pass.is_empty());
    assert!(drain(&mut frame_rx).is_empty());
}

#[test]
fn test_closed_frame_does_not_stop_the_pass() {
    let registry = PlayerRegistry::new();
    let audio = FakeAudio::playing_at(Duration::from_secs(3));
    registry.register(PlayerHandle::native("native", audio.clone()));

    let (frame_tx, frame_rx) = mpsc::unbounded_channel::<String>();
    drop(frame_rx);
    registry.register(PlayerHandle::embed(
        "embed",
        EmbedHandle::new(frame_tx, EmbedProtocol::Unknown),
    ));

    let (widget_handle, ready) = WidgetHandle::new(FakeWidget::default());
    ready.mark_ready();
    registry.register(PlayerHandle::widget("widget", widget_handle));

    let mut coordinator = PlaybackCoordinator::new(registry);
    let pass = coordinator.on_play_started(&PlayerId::from("widget"));

    assert_eq!(
        pass.outcome(&PlayerId::from("embed")),
        Some(&SilenceOutcome::Posted {
            payloads: 2,
            delivered: 0
        })
    );
    assert_eq!(audio.pauses(), 1);
}

#[tokio::test]
async fn test_run_processes_events_in_order() {
    let (tx, rx) = mpsc::channel(16);
    let mut coordinator = PlaybackCoordinator::new(PlayerRegistry::new());
    let mut events = coordinator.subscribe();

    let first = FakeAudio::playing_at(Duration::from_secs(10));
    let second = FakeAudio::playing_at(Duration::from_secs(20));

    let task = tokio::spawn(async move {
        coordinator.run(rx).await;
        coordinator
    });

    tx.send(PlayerEvent::Mounted(PlayerHandle::native("one", first.clone())))
        .await
        .unwrap();
    tx.send(PlayerEvent::Mounted(PlayerHandle::native("two", second.clone())))
        .await
        .unwrap();
    tx.send(PlayerEvent::PlayStarted(PlayerId::from("one")))
        .await
        .unwrap();
    tx.send(PlayerEvent::PlayStarted(PlayerId::from("two")))
        .await
        .unwrap();
    tx.send(PlayerEvent::Unmounted(PlayerId::from("two")))
        .await
        .unwrap();
    tx.send(PlayerEvent::PlayStarted(PlayerId::from("two")))
        .await
        .unwrap();
    drop(tx);

    let coordinator = tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(coordinator.active(), None);
    assert_eq!(coordinator.registry().ids(), vec![PlayerId::from("one")]);
    assert_eq!(first.pauses(), 1);
    assert_eq!(second.pauses(), 1);

    let mut received = Vec::new();
    while let Ok(event) = events.try_recv() {
        received.push(event);
    }
    assert_eq!(
        received,
        vec![
            PlaybackEvent::ActiveChanged {
                active: Some(PlayerId::from("one")),
                previous: None,
            },
            PlaybackEvent::Silenced {
                id: PlayerId::from("two"),
                kind: musicapp_playback::PlayerKind::NativeAudio,
                outcome: SilenceOutcome::Paused { was_playing: true },
            },
            PlaybackEvent::ActiveChanged {
                active: Some(PlayerId::from("two")),
                previous: Some(PlayerId::from("one")),
            },
            PlaybackEvent::Silenced {
                id: PlayerId::from("one"),
                kind: musicapp_playback::PlayerKind::NativeAudio,
                outcome: SilenceOutcome::Paused { was_playing: true },
            },
            PlaybackEvent::ActiveChanged {
                active: None,
                previous: Some(PlayerId::from("two")),
            },
        ]
    );
}

#[tokio::test]
async fn test_widget_play_after_handshake() {
    let registry = PlayerRegistry::new();
    let audio = FakeAudio::playing_at(Duration::from_secs(5));
    registry.register(PlayerHandle::native("native", audio.clone()));

    let (widget_handle, ready) = WidgetHandle::new(FakeWidget::default());
    registry.register(PlayerHandle::widget("widget", widget_handle.clone()));

    let mut coordinator = PlaybackCoordinator::new(registry);

    let waiter = tokio::spawn(async move { widget_handle.ready().await });
    ready.mark_ready();
    assert!(waiter.await.unwrap());

    // The widget's play subscription fires only once it is ready
    coordinator.on_play_started(&PlayerId::from("widget"));
    assert_eq!(audio.pauses(), 1);
    assert_eq!(audio.position(), Duration::ZERO);
}
