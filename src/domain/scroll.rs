//! Scroll-linked pinning for horizontal showcase sections.
//!
//! A showcase section is held against the top of the viewport while the
//! page scrolls through a fixed distance; during that distance the inner
//! card strip slides left in proportion to scroll progress. Everything here
//! is a pure function of scroll position and layout, never of elapsed time.
//!
//! Positions are page coordinates in CSS pixels with `y` growing downwards.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Where the viewport sits relative to a section's pinned range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinPhase {
    Before,
    Pinned,
    After,
}

/// Visual state of a section for one scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub phase: PinPhase,
    /// Position within the pinned range, in `[0, 1]`.
    pub progress: f64,
    /// Horizontal translation of the card strip; zero or negative.
    pub offset: f64,
    /// Vertical translation that keeps the pinned section fixed on screen.
    pub pin_shift: f64,
}

impl Frame {
    pub const REST: Frame = Frame {
        phase: PinPhase::Before,
        progress: 0.0,
        offset: 0.0,
        pin_shift: 0.0,
    };
}

/// Strip translation for a given progress.
///
/// `progress` is clamped to `[0, 1]`. Zero progress yields exactly `0.0`
/// so a section scrolled back above its pin start carries no residue.
pub fn offset_for(progress: f64, track_extent: f64, multiplier: f64) -> f64 {
    let progress = progress.clamp(0.0, 1.0);
    if progress == 0.0 {
        return 0.0;
    }
    -(progress * track_extent * multiplier)
}

/// Pinning geometry of one showcase section.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSection {
    section_top: f64,
    track_extent: f64,
    multiplier: f64,
    phase: PinPhase,
}

impl ScrollSection {
    /// `strip_width` is the full scrollable width of the card strip and
    /// `viewport_width` the visible part of it. A multiplier that is not
    /// strictly positive falls back to `1.0`.
    pub fn new(section_top: f64, strip_width: f64, viewport_width: f64, multiplier: f64) -> Self {
        Self {
            section_top,
            track_extent: track_extent(strip_width, viewport_width),
            multiplier: positive_or_one(multiplier),
            phase: PinPhase::Before,
        }
    }

    pub fn section_top(&self) -> f64 {
        self.section_top
    }

    pub fn track_extent(&self) -> f64 {
        self.track_extent
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    pub fn phase(&self) -> PinPhase {
        self.phase
    }

    /// Scroll distance the section stays pinned for.
    pub fn pin_distance(&self) -> f64 {
        self.track_extent * self.multiplier
    }

    /// Recompute geometry after a layout change. The phase is re-derived on
    /// the next scroll event.
    pub fn relayout(&mut self, section_top: f64, strip_width: f64, viewport_width: f64) {
        self.section_top = section_top;
        self.track_extent = track_extent(strip_width, viewport_width);
    }

    /// Frame for a scroll position without touching the stored phase.
    pub fn frame_at(&self, scroll_y: f64) -> Frame {
        let distance = self.pin_distance();
        let travelled = sanitize(scroll_y) - self.section_top;

        if travelled < 0.0 || (distance == 0.0 && travelled == 0.0) {
            return Frame::REST;
        }
        if distance == 0.0 || travelled >= distance {
            return Frame {
                phase: PinPhase::After,
                progress: if distance == 0.0 { 0.0 } else { 1.0 },
                offset: if distance == 0.0 {
                    0.0
                } else {
                    offset_for(1.0, self.track_extent, self.multiplier)
                },
                pin_shift: distance,
            };
        }

        let progress = travelled / distance;
        Frame {
            phase: PinPhase::Pinned,
            progress,
            offset: offset_for(progress, self.track_extent, self.multiplier),
            pin_shift: travelled,
        }
    }

    /// Visible fraction of the pinned box, which is one viewport tall and
    /// rides along with the scroll while pinned.
    pub fn pin_visible_fraction(&self, scroll_y: f64, viewport_height: f64) -> f64 {
        let frame = self.frame_at(scroll_y);
        visible_fraction(
            self.section_top + frame.pin_shift,
            viewport_height,
            sanitize(scroll_y),
            viewport_height,
        )
    }

    /// Apply a scroll event. Identical positions produce identical frames.
    pub fn on_scroll(&mut self, scroll_y: f64) -> Frame {
        let frame = self.frame_at(scroll_y);
        self.phase = frame.phase;
        frame
    }
}

fn track_extent(strip_width: f64, viewport_width: f64) -> f64 {
    (sanitize(strip_width) - sanitize(viewport_width)).max(0.0)
}

fn sanitize(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

fn positive_or_one(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 1.0 }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewportEvent {
    Scrolled { y: f64 },
    Resized { width: f64, height: f64 },
}

pub type Listener = Rc<dyn Fn(ViewportEvent)>;

/// Read-only view of the page's scroll position.
pub trait ScrollSource {
    fn scroll_y(&self) -> f64;
    fn viewport_width(&self) -> f64;
    fn viewport_height(&self) -> f64;
    /// Register a listener for scroll and resize events. The listener stays
    /// registered until the returned handle is dropped.
    fn subscribe(&self, listener: Listener) -> Subscription;
}

/// Registration handle; dropping it unregisters the listener.
#[must_use = "dropping a subscription unregisters its listener"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn release(mut self) {
        self.run_release();
    }

    fn run_release(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

struct ViewportState {
    scroll_y: f64,
    width: f64,
    height: f64,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// In-process scroll source driven by explicit `scroll_to`/`resize` calls.
#[derive(Clone)]
pub struct Viewport {
    state: Rc<RefCell<ViewportState>>,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            state: Rc::new(RefCell::new(ViewportState {
                scroll_y: 0.0,
                width,
                height,
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    pub fn scroll_to(&self, y: f64) {
        self.state.borrow_mut().scroll_y = y;
        self.emit(ViewportEvent::Scrolled { y });
    }

    pub fn resize(&self, width: f64, height: f64) {
        {
            let mut state = self.state.borrow_mut();
            state.width = width;
            state.height = height;
        }
        self.emit(ViewportEvent::Resized { width, height });
    }

    pub fn listener_count(&self) -> usize {
        self.state.borrow().listeners.len()
    }

    fn emit(&self, event: ViewportEvent) {
        // Listeners may subscribe or unsubscribe while being notified.
        let listeners: Vec<Listener> = self
            .state
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(event);
        }
    }
}

impl ScrollSource for Viewport {
    fn scroll_y(&self) -> f64 {
        self.state.borrow().scroll_y
    }

    fn viewport_width(&self) -> f64 {
        self.state.borrow().width
    }

    fn viewport_height(&self) -> f64 {
        self.state.borrow().height
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        let id = {
            let mut state = self.state.borrow_mut();
            let id = state.next_id;
            state.next_id += 1;
            state.listeners.push((id, listener));
            id
        };

        let weak: Weak<RefCell<ViewportState>> = Rc::downgrade(&self.state);
        Subscription::new(move || {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().listeners.retain(|(other, _)| *other != id);
            }
        })
    }
}

/// Measured layout of a showcase for a given viewport width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionLayout {
    pub section_top: f64,
    pub strip_width: f64,
    pub visible_width: f64,
}

type Measure = Box<dyn Fn(f64) -> SectionLayout>;

struct ShowcaseState {
    section: ScrollSection,
    frame: Frame,
    last_y: f64,
    measure: Measure,
}

impl ShowcaseState {
    fn handle(&mut self, event: ViewportEvent) {
        match event {
            ViewportEvent::Scrolled { y } => {
                self.last_y = y;
            }
            ViewportEvent::Resized { width, .. } => {
                let layout = (self.measure)(width);
                self.section.relayout(
                    layout.section_top,
                    layout.strip_width,
                    layout.visible_width,
                );
            }
        }
        self.frame = self.section.on_scroll(self.last_y);
    }
}

/// A `ScrollSection` bound to a scroll source for as long as it is alive.
///
/// Dropping the showcase (or calling [`PinnedShowcase::detach`]) releases
/// its listener.
pub struct PinnedShowcase {
    state: Rc<RefCell<ShowcaseState>>,
    subscription: Subscription,
}

impl PinnedShowcase {
    /// Measure the section, derive the frame for the current scroll
    /// position and start following scroll and resize events. `measure`
    /// is called again with the new viewport width on every resize.
    pub fn attach<S, F>(source: &S, multiplier: f64, measure: F) -> Self
    where
        S: ScrollSource + ?Sized,
        F: Fn(f64) -> SectionLayout + 'static,
    {
        let layout = measure(source.viewport_width());
        let mut section = ScrollSection::new(
            layout.section_top,
            layout.strip_width,
            layout.visible_width,
            multiplier,
        );
        let last_y = source.scroll_y();
        let frame = section.on_scroll(last_y);

        let state = Rc::new(RefCell::new(ShowcaseState {
            section,
            frame,
            last_y,
            measure: Box::new(measure),
        }));

        let listener_state = Rc::clone(&state);
        let subscription = source.subscribe(Rc::new(move |event: ViewportEvent| {
            listener_state.borrow_mut().handle(event);
        }));

        Self {
            state,
            subscription,
        }
    }

    pub fn frame(&self) -> Frame {
        self.state.borrow().frame
    }

    pub fn section(&self) -> ScrollSection {
        self.state.borrow().section.clone()
    }

    pub fn detach(self) {
        let Self { subscription, .. } = self;
        subscription.release();
    }
}

/// Card pose during the entrance animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub opacity: f64,
    pub scale: f64,
    pub translate_y: f64,
}

impl Pose {
    pub const VISIBLE: Pose = Pose {
        opacity: 1.0,
        scale: 1.0,
        translate_y: 0.0,
    };

    fn lerp(from: Pose, to: Pose, t: f64) -> Pose {
        Pose {
            opacity: from.opacity + (to.opacity - from.opacity) * t,
            scale: from.scale + (to.scale - from.scale) * t,
            translate_y: from.translate_y + (to.translate_y - from.translate_y) * t,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealConfig {
    /// Fraction of the section that must be visible before cards appear.
    pub threshold: f64,
    pub stagger_ms: u32,
    pub duration_ms: u32,
    pub hidden: Pose,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            stagger_ms: 150,
            duration_ms: 800,
            hidden: Pose {
                opacity: 0.0,
                scale: 0.85,
                translate_y: 40.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardReveal {
    pub index: usize,
    pub delay_ms: u32,
}

/// One-shot staggered entrance for the cards of a section.
#[derive(Debug, Clone)]
pub struct EntranceReveal {
    config: RevealConfig,
    cards: usize,
    fired: bool,
}

impl EntranceReveal {
    pub fn new(cards: usize, config: RevealConfig) -> Self {
        Self {
            config,
            cards,
            fired: false,
        }
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Report the section's current visible fraction. Returns the reveal
    /// schedule the first time the threshold is reached, `None` otherwise.
    pub fn observe(&mut self, visible_fraction: f64) -> Option<Vec<CardReveal>> {
        if self.fired || visible_fraction < self.config.threshold {
            return None;
        }
        self.fired = true;
        Some(
            (0..self.cards)
                .map(|index| CardReveal {
                    index,
                    delay_ms: self.config.stagger_ms.saturating_mul(index as u32),
                })
                .collect(),
        )
    }

    /// Pose of a card `elapsed_ms` after the reveal fired. Cards stay hidden
    /// until the reveal fires.
    pub fn pose_at(&self, card: usize, elapsed_ms: u32) -> Pose {
        if !self.fired {
            return self.config.hidden;
        }
        let delay = self.config.stagger_ms.saturating_mul(card as u32);
        let Some(running) = elapsed_ms.checked_sub(delay) else {
            return self.config.hidden;
        };
        if running >= self.config.duration_ms || self.config.duration_ms == 0 {
            return Pose::VISIBLE;
        }
        let t = f64::from(running) / f64::from(self.config.duration_ms);
        Pose::lerp(self.config.hidden, Pose::VISIBLE, ease_out_cubic(t))
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Fraction of an element's height inside the viewport, in `[0, 1]`.
pub fn visible_fraction(
    element_top: f64,
    element_height: f64,
    viewport_top: f64,
    viewport_height: f64,
) -> f64 {
    if element_height <= 0.0 {
        return 0.0;
    }
    let top = element_top.max(viewport_top);
    let bottom = (element_top + element_height).min(viewport_top + viewport_height);
    ((bottom - top) / element_height).clamp(0.0, 1.0)
}
