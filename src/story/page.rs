use std::fmt;

/// Text given to pages created by the editor before the author types anything.
pub const PLACEHOLDER_TEXT: &str = "Page text";

/// Which of a page's two outgoing choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChoiceSlot {
    First,
    Second,
}

impl ChoiceSlot {
    pub const ALL: [ChoiceSlot; 2] = [ChoiceSlot::First, ChoiceSlot::Second];
}

impl fmt::Display for ChoiceSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChoiceSlot::First => f.write_str("first choice"),
            ChoiceSlot::Second => f.write_str("second choice"),
        }
    }
}

/// One node of the story graph.
///
/// Choices are 1-based page numbers; `0` marks an absent branch. The page
/// itself does not know how many pages its story has, so a choice may
/// point past the end. See [`Story::dangling_choices`](super::Story::dangling_choices).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    text: String,
    /// Already-encoded image bytes. `Some(vec![])` is distinct from `None`.
    image: Option<Vec<u8>>,
    choice1: u16,
    choice2: u16,
}

impl Page {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// A fresh page as the editor creates it.
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_TEXT)
    }

    pub fn with_image(mut self, image: Vec<u8>) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_choices(mut self, choice1: u16, choice2: u16) -> Self {
        self.choice1 = choice1;
        self.choice2 = choice2;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn image(&self) -> Option<&[u8]> {
        self.image.as_deref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn set_image(&mut self, image: Vec<u8>) {
        self.image = Some(image);
    }

    /// Remove the image, returning it if there was one.
    pub fn clear_image(&mut self) -> Option<Vec<u8>> {
        self.image.take()
    }

    pub fn choice(&self, slot: ChoiceSlot) -> u16 {
        match slot {
            ChoiceSlot::First => self.choice1,
            ChoiceSlot::Second => self.choice2,
        }
    }

    /// Store a raw choice value. No bounds check is made here.
    pub fn set_choice(&mut self, slot: ChoiceSlot, value: u16) {
        match slot {
            ChoiceSlot::First => self.choice1 = value,
            ChoiceSlot::Second => self.choice2 = value,
        }
    }

    pub fn choice1(&self) -> u16 {
        self.choice1
    }

    pub fn choice2(&self) -> u16 {
        self.choice2
    }

    pub fn set_choice1(&mut self, value: u16) {
        self.choice1 = value;
    }

    pub fn set_choice2(&mut self, value: u16) {
        self.choice2 = value;
    }

    /// The 0-based page index a choice leads to, or `None` for the `0` sentinel.
    pub fn choice_target(&self, slot: ChoiceSlot) -> Option<usize> {
        match self.choice(slot) {
            0 => None,
            n => Some(usize::from(n) - 1),
        }
    }

    /// Present choices in slot order, as 1-based page numbers.
    pub fn choices(&self) -> impl Iterator<Item = (ChoiceSlot, u16)> + '_ {
        ChoiceSlot::ALL
            .into_iter()
            .map(move |slot| (slot, self.choice(slot)))
            .filter(|&(_, value)| value != 0)
    }

    /// True when neither choice is set.
    pub fn is_ending(&self) -> bool {
        self.choice1 == 0 && self.choice2 == 0
    }
}
