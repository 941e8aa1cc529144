//! Controller tests against an in-memory store and fake collaborators.

use std::{
  io::Cursor,
  sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
  },
  time::Duration,
};

use axum::{Router, http::StatusCode, routing::get};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use image::{DynamicImage, ImageFormat, RgbImage};
use serde_json::json;
use tapnote_core::{
  Error as CoreError,
  note::{Blob, TITLE_PLACEHOLDER},
};
use tapnote_media::{PickError, PickRequest, Picker};

use super::*;
use crate::{
  client::tests::{geocode_router, geocoder, serve},
  config::LocationConfig,
  location::{FixedLocator, LocateError, Position},
};

enum FakePicker {
  Image(Blob),
  Cancel,
  Fail,
}

impl Picker for FakePicker {
  async fn pick(&self, _request: &PickRequest) -> Result<Blob, PickError> {
    match self {
      Self::Image(blob) => Ok(blob.clone()),
      Self::Cancel => Err(PickError::Cancelled),
      Self::Fail => Err(PickError::Failed("camera unplugged".into())),
    }
  }
}

/// Counts lookups and never finds the device.
#[derive(Clone, Default)]
struct CountingLocator(Arc<AtomicUsize>);

impl Locator for CountingLocator {
  async fn locate(&self) -> Result<Position, LocateError> {
    self.0.fetch_add(1, Ordering::SeqCst);
    Err(LocateError::Unsupported)
  }
}

type TestApp = App<FakePicker, FixedLocator>;

fn png(width: u32, height: u32) -> Blob {
  let mut buf = Vec::new();
  DynamicImage::ImageRgb8(RgbImage::new(width, height))
    .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
    .unwrap();
  Blob::new("image/png", buf)
}

async fn build<L: Locator + 'static>(
  picker: FakePicker,
  locator: L,
  geocoder: Option<Geocoder>,
) -> App<FakePicker, L> {
  let mut app = App::new(json!(null), Services { picker, locator, geocoder });
  app.open_store(1).await;
  app
}

async fn app_with(picker: FakePicker, geocoder: Option<Geocoder>) -> TestApp {
  let locator = FixedLocator::new(Some(&LocationConfig { latitude: 52.52, longitude: 13.4 }));
  build(picker, locator, geocoder).await
}

/// Give a title suggestion task time to finish, then apply what it sent.
async fn settle<L>(app: &mut App<FakePicker, L>)
where
  L: Locator + 'static,
{
  tokio::time::sleep(Duration::from_millis(300)).await;
  app.process_pending_events();
}

async fn app() -> TestApp { app_with(FakePicker::Cancel, None).await }

async fn next(app: &mut TestApp) {
  tokio::time::timeout(Duration::from_secs(5), app.next_event())
    .await
    .expect("event within timeout")
    .expect("channel open");
}

/// Make sure two saves in a row get different time stamps.
async fn tick() { tokio::time::sleep(Duration::from_millis(3)).await; }

fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

fn ctrl(c: char) -> KeyEvent { KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL) }

// ─── Transitions ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn starts_on_empty_list() {
  let app = app().await;
  assert_eq!(app.screen, Screen::NoteList);
  assert!(app.notes.is_empty());
  assert!(app.status_msg.is_empty());
}

#[tokio::test]
async fn create_update_delete_scenario() {
  let mut app = app().await;

  app.open_new();
  assert!(app.is_new_note());
  app.draft.title = "Groceries".into();
  app.draft.text = "milk, eggs".into();
  app.save().await;
  app.process_pending_events();

  assert_eq!(app.screen, Screen::NoteList);
  assert_eq!(app.notes.len(), 1);
  let created = app.notes[0].clone();
  assert_eq!(created.title, "Groceries");
  assert_eq!(created.text, "milk, eggs");
  assert!(created.poster_blob.is_none());
  assert!(created.time_stamp > 0);

  app.open_existing(0);
  assert!(!app.is_new_note());
  app.draft.text = "milk, eggs, bread".into();
  app.save().await;
  app.process_pending_events();

  assert_eq!(app.notes.len(), 1);
  assert_eq!(app.notes[0].time_stamp, created.time_stamp);
  assert_eq!(app.notes[0].text, "milk, eggs, bread");

  app.open_existing(0);
  app.request_delete();
  app.confirm_delete().await.unwrap();
  app.process_pending_events();

  assert_eq!(app.screen, Screen::NoteList);
  assert!(app.notes.iter().all(|n| n.time_stamp != created.time_stamp));
}

#[tokio::test]
async fn new_notes_listed_newest_first() {
  let mut app = app().await;
  for title in ["first", "second", "third"] {
    app.open_new();
    app.draft.title = title.into();
    app.save().await;
    tick().await;
  }
  app.process_pending_events();

  let titles: Vec<_> = app.notes.iter().map(|n| n.title.as_str()).collect();
  assert_eq!(titles, vec!["third", "second", "first"]);
}

#[tokio::test]
async fn empty_title_saves_placeholder() {
  let mut app = app().await;
  app.open_new();
  app.save().await;
  app.process_pending_events();

  assert_eq!(app.notes[0].title, TITLE_PLACEHOLDER);
}

#[tokio::test]
async fn cancel_discards_draft() {
  let mut app = app().await;
  app.open_new();
  app.draft.title = "never saved".into();
  app.cancel();
  app.process_pending_events();

  assert_eq!(app.screen, Screen::NoteList);
  assert_eq!(app.draft, Draft::empty());
  assert!(app.notes.is_empty());
}

#[tokio::test]
async fn deleting_unsaved_draft_is_rejected() {
  let mut app = app().await;
  app.open_new();
  app.draft.title = "draft".into();
  app.request_delete();

  let err = app.confirm_delete().await.unwrap_err();
  app.process_pending_events();

  assert!(matches!(err, CoreError::MissingIdentity));
  assert_eq!(app.screen, Screen::NoteDetail);
  assert!(!app.confirm_delete);
  assert_eq!(app.draft.title, "draft");
  assert!(app.status_msg.starts_with("Error:"));
  assert!(app.notes.is_empty());
}

#[tokio::test]
async fn dismissing_delete_keeps_note() {
  let mut app = app().await;
  app.open_new();
  app.save().await;
  app.process_pending_events();

  app.open_existing(0);
  app.request_delete();
  app.dismiss_delete();
  app.process_pending_events();

  assert_eq!(app.screen, Screen::NoteDetail);
  assert_eq!(app.notes.len(), 1);
  assert!(app.draft.is_persisted());
}

#[tokio::test]
async fn store_errors_reach_the_status_bar() {
  let locator = FixedLocator::new(None);
  let services = Services { picker: FakePicker::Cancel, locator, geocoder: None };
  let mut app = App::new(json!({ "primaryKey": "title" }), services);
  app.open_store(1).await;

  assert!(app.status_msg.starts_with("Error:"));

  app.open_new();
  app.save().await;
  app.process_pending_events();
  assert!(app.status_msg.contains("not been opened"));
  assert_eq!(app.screen, Screen::NoteList);
}

// ─── Title suggestion ─────────────────────────────────────────────────────────

#[tokio::test]
async fn suggestion_sets_placeholder_for_new_note() {
  let base = serve(geocode_router(Some("1 Main St, Springfield"))).await;
  let mut app = app_with(FakePicker::Cancel, Some(geocoder(base))).await;

  app.open_new();
  next(&mut app).await;

  assert_eq!(app.draft.title_placeholder, "Note from 1 Main St, Springfield");
  app.save().await;
  app.process_pending_events();
  assert_eq!(app.notes[0].title, "Note from 1 Main St, Springfield");
}

#[tokio::test]
async fn suggestion_does_not_overwrite_typed_title() {
  let base = serve(geocode_router(Some("1 Main St, Springfield"))).await;
  let mut app = app_with(FakePicker::Cancel, Some(geocoder(base))).await;

  app.open_new();
  app.draft.title = "Groceries".into();
  next(&mut app).await;

  assert_eq!(app.draft.title, "Groceries");
  assert_eq!(app.draft.title_placeholder, TITLE_PLACEHOLDER);
}

#[tokio::test]
async fn suggestion_for_closed_draft_is_dropped() {
  let mut app = app().await;
  app.open_new();
  let stale = app.draft_epoch;
  app.cancel();

  app.handle_event(AppEvent::TitleSuggestion { epoch: stale, address: "Old Town".into() });
  assert_eq!(app.draft.title_placeholder, TITLE_PLACEHOLDER);
}

#[tokio::test]
async fn existing_notes_get_no_suggestion() {
  let base = serve(geocode_router(Some("Anywhere"))).await;
  let mut app = app_with(FakePicker::Cancel, Some(geocoder(base))).await;

  app.open_new();
  next(&mut app).await;
  app.draft.title = "kept".into();
  app.save().await;
  app.process_pending_events();

  app.open_existing(0);
  tokio::time::sleep(Duration::from_millis(50)).await;
  app.process_pending_events();
  assert_eq!(app.draft.title_placeholder, TITLE_PLACEHOLDER);
}

#[tokio::test]
async fn unknown_location_leaves_placeholder() {
  let base = serve(geocode_router(Some("Anywhere"))).await;
  let mut app = build(FakePicker::Cancel, FixedLocator::new(None), Some(geocoder(base))).await;

  app.open_new();
  settle(&mut app).await;

  assert!(app.status_msg.is_empty());
  assert_eq!(app.draft.title_placeholder, TITLE_PLACEHOLDER);
}

#[tokio::test]
async fn geocode_server_error_leaves_placeholder() {
  let router = Router::new().route("/json", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
  let base = serve(router).await;
  let mut app = app_with(FakePicker::Cancel, Some(geocoder(base))).await;

  app.open_new();
  settle(&mut app).await;

  assert!(app.status_msg.is_empty());
  assert_eq!(app.draft.title_placeholder, TITLE_PLACEHOLDER);
}

#[tokio::test]
async fn unreachable_geocoder_leaves_placeholder() {
  let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);
  let mut app = app_with(FakePicker::Cancel, Some(geocoder(format!("http://{addr}/")))).await;

  app.open_new();
  settle(&mut app).await;

  assert!(app.status_msg.is_empty());
  assert_eq!(app.draft.title_placeholder, TITLE_PLACEHOLDER);
}

#[tokio::test]
async fn location_is_requested_without_geocoder() {
  let locator = CountingLocator::default();
  let lookups = Arc::clone(&locator.0);
  let mut app = build(FakePicker::Cancel, locator, None).await;

  app.open_new();
  settle(&mut app).await;

  assert_eq!(lookups.load(Ordering::SeqCst), 1);
  assert!(app.status_msg.is_empty());
  assert_eq!(app.draft.title_placeholder, TITLE_PLACEHOLDER);
}

// ─── Photos ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn captured_photo_is_resized_and_saved() {
  let mut app = app_with(FakePicker::Image(png(600, 400)), None).await;

  app.open_new();
  app.capture_photo();
  assert!(app.capture_in_flight);
  next(&mut app).await;

  assert!(!app.capture_in_flight);
  let poster = app.draft.poster_blob.clone().expect("poster attached");
  assert_eq!(poster.mime_type, "image/jpeg");
  let decoded = image::load_from_memory(&poster.data).unwrap();
  assert_eq!((decoded.width(), decoded.height()), (300, 200));

  app.save().await;
  app.process_pending_events();
  assert_eq!(app.notes[0].poster_blob.as_ref(), Some(&poster));
}

#[tokio::test]
async fn cancelled_capture_is_silent() {
  let mut app = app_with(FakePicker::Cancel, None).await;
  app.open_new();
  app.capture_photo();
  next(&mut app).await;

  assert!(!app.capture_in_flight);
  assert!(app.draft.poster_blob.is_none());
  assert!(app.status_msg.is_empty());
}

#[tokio::test]
async fn failed_capture_is_reported() {
  let mut app = app_with(FakePicker::Fail, None).await;
  app.open_new();
  app.capture_photo();
  next(&mut app).await;

  assert!(app.draft.poster_blob.is_none());
  assert!(app.status_msg.contains("camera unplugged"));
}

#[tokio::test]
async fn only_one_capture_at_a_time() {
  let mut app = app_with(FakePicker::Cancel, None).await;
  app.open_new();
  app.capture_photo();
  app.capture_photo();
  next(&mut app).await;

  tokio::time::sleep(Duration::from_millis(50)).await;
  assert!(app.events_rx.try_recv().is_err());
}

#[tokio::test]
async fn photo_for_closed_draft_is_dropped() {
  let mut app = app_with(FakePicker::Image(png(10, 10)), None).await;
  app.open_new();
  app.capture_photo();
  app.cancel();
  next(&mut app).await;

  assert!(app.draft.poster_blob.is_none());
  assert!(!app.capture_in_flight);
}

// ─── Keys ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn keyboard_add_and_save() {
  let mut app = app().await;

  assert!(app.handle_key(key(KeyCode::Char('a'))).await.unwrap());
  assert_eq!(app.screen, Screen::NoteDetail);

  for c in "Hi!".chars() {
    app.handle_key(key(KeyCode::Char(c))).await.unwrap();
  }
  app.handle_key(key(KeyCode::Backspace)).await.unwrap();
  app.handle_key(key(KeyCode::Tab)).await.unwrap();
  for c in "body".chars() {
    app.handle_key(key(KeyCode::Char(c))).await.unwrap();
  }
  app.handle_key(ctrl('s')).await.unwrap();
  app.process_pending_events();

  assert_eq!(app.screen, Screen::NoteList);
  assert_eq!(app.notes[0].title, "Hi");
  assert_eq!(app.notes[0].text, "body");
}

#[tokio::test]
async fn keyboard_delete_needs_confirmation() {
  let mut app = app().await;
  app.open_new();
  app.save().await;
  app.process_pending_events();

  app.handle_key(key(KeyCode::Enter)).await.unwrap();
  app.handle_key(ctrl('d')).await.unwrap();
  assert!(app.confirm_delete);

  app.handle_key(key(KeyCode::Char('n'))).await.unwrap();
  assert!(!app.confirm_delete);
  assert_eq!(app.screen, Screen::NoteDetail);

  app.handle_key(ctrl('d')).await.unwrap();
  app.handle_key(key(KeyCode::Char('y'))).await.unwrap();
  app.process_pending_events();

  assert_eq!(app.screen, Screen::NoteList);
  assert!(app.notes.is_empty());
}

#[tokio::test]
async fn quit_keys() {
  let mut app = app().await;
  assert!(!app.handle_key(key(KeyCode::Char('q'))).await.unwrap());

  app.open_new();
  assert!(app.handle_key(key(KeyCode::Char('q'))).await.unwrap());
  assert_eq!(app.draft.title, "q");
  assert!(!app.handle_key(ctrl('c')).await.unwrap());
}
