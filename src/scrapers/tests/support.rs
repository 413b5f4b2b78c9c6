//! In-memory document and virtual clock for driving scrapes without a browser

use crate::clock::Clock;
use crate::dom::{Document, DomError};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Clock whose sleeps return immediately and advance virtual time
#[derive(Debug, Default)]
pub struct VirtualClock {
    now: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl VirtualClock {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed().as_millis()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for VirtualClock {
    fn elapsed(&self) -> Duration {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        *self.now.lock().unwrap() += duration;
        self.sleeps.lock().unwrap().push(duration);
    }
}

struct MockElement {
    selector: String,
    parent: Option<usize>,
    text: String,
    appears_at: Duration,
}

/// Synthetic DOM; selectors match by exact string equality
pub struct MockDocument {
    clock: Arc<VirtualClock>,
    elements: Vec<MockElement>,
    heights: Vec<u64>,
    failing: HashSet<String>,
    fail_height: bool,
    scrolls: Mutex<Vec<u64>>,
    height_reads: Mutex<usize>,
    find_calls: Mutex<HashMap<String, usize>>,
    find_all_calls: Mutex<HashMap<String, usize>>,
}

impl MockDocument {
    pub fn new(clock: Arc<VirtualClock>) -> Self {
        Self {
            clock,
            elements: Vec::new(),
            heights: vec![1000],
            failing: HashSet::new(),
            fail_height: false,
            scrolls: Mutex::new(Vec::new()),
            height_reads: Mutex::new(0),
            find_calls: Mutex::new(HashMap::new()),
            find_all_calls: Mutex::new(HashMap::new()),
        }
    }

    /// Adds an element present from the start
    pub fn element(&mut self, selector: &str, text: &str) -> usize {
        self.element_at(selector, text, Duration::ZERO)
    }

    /// Adds an element that becomes visible once virtual time reaches `appears_at`
    pub fn element_at(&mut self, selector: &str, text: &str, appears_at: Duration) -> usize {
        self.push(selector, None, text, appears_at)
    }

    pub fn child(&mut self, parent: usize, selector: &str, text: &str) -> usize {
        self.push(selector, Some(parent), text, Duration::ZERO)
    }

    /// Height after 0, 1, 2... scrolls; the last value repeats
    pub fn heights(&mut self, heights: &[u64]) {
        self.heights = heights.to_vec();
    }

    /// Every lookup of `selector` fails with a driver error
    pub fn fail_selector(&mut self, selector: &str) {
        self.failing.insert(selector.to_string());
    }

    pub fn fail_height(&mut self) {
        self.fail_height = true;
    }

    pub fn scroll_count(&self) -> usize {
        self.scrolls.lock().unwrap().len()
    }

    pub fn scroll_targets(&self) -> Vec<u64> {
        self.scrolls.lock().unwrap().clone()
    }

    pub fn height_reads(&self) -> usize {
        *self.height_reads.lock().unwrap()
    }

    pub fn find_calls(&self, selector: &str) -> usize {
        self.find_calls
            .lock()
            .unwrap()
            .get(selector)
            .copied()
            .unwrap_or(0)
    }

    pub fn find_all_calls(&self, selector: &str) -> usize {
        self.find_all_calls
            .lock()
            .unwrap()
            .get(selector)
            .copied()
            .unwrap_or(0)
    }

    fn push(
        &mut self,
        selector: &str,
        parent: Option<usize>,
        text: &str,
        appears_at: Duration,
    ) -> usize {
        self.elements.push(MockElement {
            selector: selector.to_string(),
            parent,
            text: text.to_string(),
            appears_at,
        });
        self.elements.len() - 1
    }

    fn visible(&self, element: &MockElement) -> bool {
        self.clock.elapsed() >= element.appears_at
    }

    fn check(&self, selector: &str) -> Result<(), DomError> {
        if self.failing.contains(selector) {
            return Err(DomError::Driver(format!("lookup of {} failed", selector)));
        }
        Ok(())
    }
}

fn bump(counter: &Mutex<HashMap<String, usize>>, selector: &str) {
    *counter
        .lock()
        .unwrap()
        .entry(selector.to_string())
        .or_insert(0) += 1;
}

#[async_trait]
impl Document for MockDocument {
    type Element = usize;

    async fn find(&self, selector: &str) -> Result<Option<usize>, DomError> {
        bump(&self.find_calls, selector);
        self.check(selector)?;
        Ok(self
            .elements
            .iter()
            .position(|e| e.parent.is_none() && e.selector == selector && self.visible(e)))
    }

    async fn find_all(&self, selector: &str) -> Result<Vec<usize>, DomError> {
        bump(&self.find_all_calls, selector);
        self.check(selector)?;
        Ok(self
            .elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.selector == selector && self.visible(e))
            .map(|(id, _)| id)
            .collect())
    }

    async fn find_within(
        &self,
        scope: &usize,
        selector: &str,
    ) -> Result<Option<usize>, DomError> {
        bump(&self.find_calls, selector);
        self.check(selector)?;
        Ok(self.elements.iter().position(|e| {
            e.parent == Some(*scope) && e.selector == selector && self.visible(e)
        }))
    }

    async fn inner_text(&self, element: &usize) -> Result<String, DomError> {
        self.elements
            .get(*element)
            .map(|e| e.text.clone())
            .ok_or_else(|| DomError::Driver("stale element".to_string()))
    }

    async fn scroll_height(&self) -> Result<u64, DomError> {
        *self.height_reads.lock().unwrap() += 1;
        if self.fail_height {
            return Err(DomError::Script("scrollHeight unavailable".to_string()));
        }
        let scrolled = self.scroll_count();
        let index = scrolled.min(self.heights.len() - 1);
        Ok(self.heights[index])
    }

    async fn scroll_to(&self, y: u64) -> Result<(), DomError> {
        self.scrolls.lock().unwrap().push(y);
        Ok(())
    }
}

/// Document whose lookups take `delay` of tokio time; for racing against deadlines
pub struct SlowDocument {
    delay: Duration,
    present: bool,
    lookups: Mutex<usize>,
}

impl SlowDocument {
    pub fn new(delay: Duration, present: bool) -> Self {
        Self {
            delay,
            present,
            lookups: Mutex::new(0),
        }
    }

    pub fn lookups(&self) -> usize {
        *self.lookups.lock().unwrap()
    }
}

#[async_trait]
impl Document for SlowDocument {
    type Element = ();

    async fn find(&self, _selector: &str) -> Result<Option<()>, DomError> {
        *self.lookups.lock().unwrap() += 1;
        tokio::time::sleep(self.delay).await;
        Ok(self.present.then_some(()))
    }

    async fn find_all(&self, _selector: &str) -> Result<Vec<()>, DomError> {
        Ok(Vec::new())
    }

    async fn find_within(&self, _scope: &(), _selector: &str) -> Result<Option<()>, DomError> {
        Ok(None)
    }

    async fn inner_text(&self, _element: &()) -> Result<String, DomError> {
        Ok(String::new())
    }

    async fn scroll_height(&self) -> Result<u64, DomError> {
        Ok(0)
    }

    async fn scroll_to(&self, _y: u64) -> Result<(), DomError> {
        Ok(())
    }
}
