//! Ordered offer list, active slide, and the pause flags that gate autoplay.

use shared::domain::Offer;

/// Course shown in the lead form when no slide is visible.
pub const DEFAULT_COURSE_INTEREST: &str = "Vestibular";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideView<'a> {
    pub index: usize,
    pub total: usize,
    pub offer: &'a Offer,
    /// The autoplay progress line is drawn only while autoplay may run.
    pub progress_visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct CarouselController {
    offers: Vec<Offer>,
    current_index: usize,
    paused: bool,
    modal_open: bool,
}

impl CarouselController {
    pub fn new(offers: Vec<Offer>) -> Self {
        Self {
            offers,
            ..Self::default()
        }
    }

    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    pub fn len(&self) -> usize {
        self.offers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offers.is_empty()
    }

    /// Active index, or `None` when there is nothing to render.
    pub fn current_index(&self) -> Option<usize> {
        (!self.offers.is_empty()).then_some(self.current_index)
    }

    pub fn current(&self) -> Option<&Offer> {
        self.offers.get(self.current_index)
    }

    pub fn view(&self) -> Option<SlideView<'_>> {
        let offer = self.current()?;
        Some(SlideView {
            index: self.current_index,
            total: self.offers.len(),
            offer,
            progress_visible: self.autoplay_eligible(),
        })
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn modal_open(&self) -> bool {
        self.modal_open
    }

    /// Autoplay may run only while neither hover nor the lead modal holds it.
    pub fn autoplay_eligible(&self) -> bool {
        !self.paused && !self.modal_open
    }

    pub fn course_interest(&self) -> &str {
        self.current()
            .map(|offer| offer.course.as_str())
            .unwrap_or(DEFAULT_COURSE_INTEREST)
    }

    pub fn next(&mut self) {
        let len = self.offers.len();
        if len == 0 {
            return;
        }
        self.current_index = (self.current_index + 1) % len;
    }

    pub fn previous(&mut self) {
        let len = self.offers.len();
        if len == 0 {
            return;
        }
        self.current_index = (self.current_index + len - 1) % len;
    }

    pub fn go_to(&mut self, index: usize) {
        if index >= self.offers.len() {
            tracing::warn!(index, total = self.offers.len(), "ignoring out-of-range slide index");
            return;
        }
        self.current_index = index;
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn set_modal_open(&mut self, open: bool) {
        self.modal_open = open;
    }

    /// Append and jump to the new offer.
    pub fn append_offer(&mut self, offer: Offer) {
        let previous_len = self.offers.len();
        self.offers.push(offer);
        self.current_index = previous_len;
    }

    pub fn replace_all(&mut self, offers: Vec<Offer>) {
        self.offers = offers;
        self.current_index = 0;
    }
}
