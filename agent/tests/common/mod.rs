//! In-memory collaborators for exercising the sync engine without a network.

#![allow(dead_code)]

use async_trait::async_trait;
use cart_sync_agent::indicator::LoadingIndicator;
use cart_sync_agent::remote::RemoteCartStore;
use cart_sync_agent::session::StaticIdentity;
use cart_sync_agent::storefront::StorefrontCart;
use cart_sync_agent::sync::SyncContext;
use cart_sync_engine::{
    CartOperation, Error, Identity, LineItem, LocalCart, MemoryWatermarkStore, PushAck,
    PushPayload, RemoteCart, Result, Watermark, WatermarkStore,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

pub fn item_a() -> LineItem {
    LineItem::new(1001, 1).with_property("colour", "red")
}

pub fn item_b() -> LineItem {
    LineItem::new(2002, 3)
}

/// A call made against the fake storefront.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorefrontCall {
    Read,
    Clear,
    Add(Vec<LineItem>),
}

#[derive(Default)]
pub struct FakeStorefront {
    items: Mutex<Vec<LineItem>>,
    calls: Mutex<Vec<StorefrontCall>>,
    failing: Mutex<Option<CartOperation>>,
}

impl FakeStorefront {
    pub fn with_items(items: Vec<LineItem>) -> Self {
        Self {
            items: Mutex::new(items),
            ..Self::default()
        }
    }

    pub fn fail_on(&self, operation: CartOperation) {
        *self.failing.lock().unwrap() = Some(operation);
    }

    pub fn items(&self) -> Vec<LineItem> {
        self.items.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<StorefrontCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls other than reads.
    pub fn mutations(&self) -> Vec<StorefrontCall> {
        self.calls()
            .into_iter()
            .filter(|c| *c != StorefrontCall::Read)
            .collect()
    }

    fn check(&self, operation: CartOperation) -> Result<()> {
        if *self.failing.lock().unwrap() == Some(operation) {
            return Err(Error::local_cart(operation, "status 500 Internal Server Error"));
        }
        Ok(())
    }
}

#[async_trait]
impl StorefrontCart for FakeStorefront {
    async fn read_cart(&self) -> Result<LocalCart> {
        self.calls.lock().unwrap().push(StorefrontCall::Read);
        self.check(CartOperation::Read)?;
        Ok(LocalCart::new(self.items()))
    }

    async fn clear_cart(&self) -> Result<()> {
        self.calls.lock().unwrap().push(StorefrontCall::Clear);
        self.check(CartOperation::Clear)?;
        self.items.lock().unwrap().clear();
        Ok(())
    }

    async fn add_items(&self, items: &[LineItem]) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(StorefrontCall::Add(items.to_vec()));
        self.check(CartOperation::Add)?;
        self.items.lock().unwrap().extend_from_slice(items);
        Ok(())
    }
}

/// Remote store with a scripted number of push failures.
#[derive(Default)]
pub struct FakeRemote {
    saved: Mutex<Option<RemoteCart>>,
    fetch_fails: Mutex<bool>,
    push_failures_left: AtomicUsize,
    push_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    pushed: Mutex<Vec<PushPayload>>,
    ack_without_date: Mutex<bool>,
}

impl FakeRemote {
    pub fn with_cart(cart: RemoteCart) -> Self {
        Self {
            saved: Mutex::new(Some(cart)),
            ..Self::default()
        }
    }

    pub fn fail_fetch(&self) {
        *self.fetch_fails.lock().unwrap() = true;
    }

    pub fn fail_pushes(&self, times: usize) {
        self.push_failures_left.store(times, Ordering::SeqCst);
    }

    pub fn ack_without_date(&self) {
        *self.ack_without_date.lock().unwrap() = true;
    }

    pub fn push_calls(&self) -> usize {
        self.push_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn pushed(&self) -> Vec<PushPayload> {
        self.pushed.lock().unwrap().clone()
    }

    /// `addedDate` the fake assigns to the n-th push (1-based).
    pub fn ack_date(n: usize) -> String {
        format!("2024-02-01T00:00:0{n}.000Z")
    }
}

#[async_trait]
impl RemoteCartStore for FakeRemote {
    async fn push(&self, payload: &PushPayload) -> Result<PushAck> {
        let n = self.push_calls.fetch_add(1, Ordering::SeqCst) + 1;
        let failed = self
            .push_failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failed {
            return Err(Error::RemoteSync("status 503 Service Unavailable".into()));
        }

        self.pushed.lock().unwrap().push(payload.clone());
        let body = if *self.ack_without_date.lock().unwrap() {
            json!({"cart": {}})
        } else {
            json!({"cart": {"addedDate": Self::ack_date(n)}})
        };
        Ok(serde_json::from_value(body)?)
    }

    async fn fetch(&self, _email: &str) -> Result<Option<RemoteCart>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fetch_fails.lock().unwrap() {
            return Err(Error::RemoteFetch("status 502 Bad Gateway".into()));
        }
        Ok(self.saved.lock().unwrap().clone())
    }
}

/// Watermark store that counts writes and notes the calling threads.
#[derive(Default)]
pub struct CountingWatermarks {
    inner: MemoryWatermarkStore,
    sets: AtomicUsize,
    clears: AtomicUsize,
    threads: Mutex<Vec<ThreadId>>,
}

impl CountingWatermarks {
    pub fn with_value(value: &str) -> Self {
        Self {
            inner: MemoryWatermarkStore::with_value(value),
            ..Self::default()
        }
    }

    pub fn value(&self) -> Option<Watermark> {
        self.inner.get().unwrap()
    }

    pub fn sets(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }

    pub fn threads(&self) -> Vec<ThreadId> {
        self.threads.lock().unwrap().clone()
    }

    fn touch(&self) {
        self.threads.lock().unwrap().push(thread::current().id());
    }
}

impl WatermarkStore for CountingWatermarks {
    fn get(&self) -> Result<Option<Watermark>> {
        self.touch();
        self.inner.get()
    }

    fn set(&self, watermark: &Watermark) -> Result<()> {
        self.touch();
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(watermark)
    }

    fn clear(&self) -> Result<()> {
        self.touch();
        self.clears.fetch_add(1, Ordering::SeqCst);
        self.inner.clear()
    }
}

/// Indicator that records show/hide transitions.
#[derive(Default)]
pub struct RecordingIndicator {
    events: Mutex<Vec<&'static str>>,
}

impl RecordingIndicator {
    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

impl LoadingIndicator for RecordingIndicator {
    fn show(&self) {
        self.events.lock().unwrap().push("show");
    }

    fn hide(&self) {
        self.events.lock().unwrap().push("hide");
    }
}

/// All fakes wired together.
pub struct Harness {
    pub storefront: Arc<FakeStorefront>,
    pub remote: Arc<FakeRemote>,
    pub watermarks: Arc<CountingWatermarks>,
    pub identity: Option<Identity>,
}

impl Harness {
    pub fn new(storefront: FakeStorefront, remote: FakeRemote, watermarks: CountingWatermarks) -> Self {
        Self {
            storefront: Arc::new(storefront),
            remote: Arc::new(remote),
            watermarks: Arc::new(watermarks),
            identity: Some(Identity::logged_in("42", "shopper@example.com")),
        }
    }

    pub fn logged_out(mut self) -> Self {
        self.identity = None;
        self
    }

    pub fn context(&self) -> SyncContext {
        SyncContext {
            storefront: self.storefront.clone(),
            remote: self.remote.clone(),
            identity: Arc::new(StaticIdentity::new(self.identity.clone())),
            watermarks: self.watermarks.clone(),
        }
    }
}
