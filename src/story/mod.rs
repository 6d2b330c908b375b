//! The in-memory story: an ordered list of pages plus a reading cursor.

mod page;

pub use page::{ChoiceSlot, PLACEHOLDER_TEXT, Page};

use tracing::debug;

use crate::error::{Error, Result};

/// Title used when a new story is created without one.
pub const DEFAULT_TITLE: &str = "Unnamed";
/// Author used when a new story is created without one.
pub const DEFAULT_AUTHOR: &str = "Unknown";

/// A choose-your-own-adventure story.
///
/// Page order is insertion order, and a page's position is its identity:
/// choices refer to pages by 1-based position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Story {
    title: String,
    author: String,
    pages: Vec<Page>,
    current: usize,
}

/// A nonzero choice that points past the last page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DanglingChoice {
    /// 0-based index of the page holding the choice.
    pub page: usize,
    pub slot: ChoiceSlot,
    /// The stored 1-based target.
    pub target: u16,
}

impl Story {
    pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            pages: Vec::new(),
            current: 0,
        }
    }

    /// Like [`Story::new`], but blank title or author fall back to
    /// [`DEFAULT_TITLE`] and [`DEFAULT_AUTHOR`].
    pub fn new_or_default(title: &str, author: &str) -> Self {
        let title = if title.is_empty() { DEFAULT_TITLE } else { title };
        let author = if author.is_empty() { DEFAULT_AUTHOR } else { author };
        Self::new(title, author)
    }

    pub(crate) fn from_parts(title: String, author: String, pages: Vec<Page>) -> Self {
        Self {
            title,
            author,
            pages,
            current: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Append a page and return its 0-based index.
    pub fn add_page(&mut self, page: Page) -> usize {
        self.pages.push(page);
        self.pages.len() - 1
    }

    /// Append a [`Page::placeholder`] and return its 0-based index.
    pub fn add_placeholder_page(&mut self) -> usize {
        self.add_page(Page::placeholder())
    }

    pub fn page(&self, index: usize) -> Result<&Page> {
        let len = self.pages.len();
        self.pages
            .get(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    pub fn page_mut(&mut self, index: usize) -> Result<&mut Page> {
        let len = self.pages.len();
        self.pages
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn current_page_index(&self) -> usize {
        self.current
    }

    /// The page under the cursor. Fails only when the story has no pages.
    pub fn current_page(&self) -> Result<&Page> {
        self.page(self.current)
    }

    /// Move the cursor to `index` and return that page.
    ///
    /// The cursor is left untouched when `index` is out of range.
    pub fn turn_to(&mut self, index: usize) -> Result<&Page> {
        if index >= self.pages.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.pages.len(),
            });
        }
        self.current = index;
        Ok(&self.pages[index])
    }

    /// Back to the first page.
    pub fn restart(&mut self) -> Result<&Page> {
        self.turn_to(0)
    }

    /// Follow one of the current page's choices.
    ///
    /// A `0` choice yields [`Error::AbsentChoice`]; a choice past the last
    /// page yields [`Error::IndexOutOfRange`]. Either way the cursor stays put.
    pub fn follow(&mut self, slot: ChoiceSlot) -> Result<&Page> {
        let from = self.current;
        let target = self
            .current_page()?
            .choice_target(slot)
            .ok_or(Error::AbsentChoice { page: from, slot })?;
        debug!(from, to = target, %slot, "following choice");
        self.turn_to(target)
    }

    // ------------------------------------------------------------------
    // Choice validation
    // ------------------------------------------------------------------

    /// Whether a nonzero choice value names an existing page, judged
    /// against the page count right now.
    pub fn is_choice_in_bounds(&self, choice: u16) -> bool {
        choice != 0 && usize::from(choice) <= self.pages.len()
    }

    /// Every nonzero choice that points past the last page.
    pub fn dangling_choices(&self) -> Vec<DanglingChoice> {
        let len = self.pages.len();
        self.pages
            .iter()
            .enumerate()
            .flat_map(|(page, p)| {
                p.choices()
                    .filter(move |&(_, target)| usize::from(target) > len)
                    .map(move |(slot, target)| DanglingChoice { page, slot, target })
            })
            .collect()
    }

    /// Set a choice the way the editor does: an out-of-bounds value is
    /// replaced with `0`. Returns whether `value` was accepted.
    pub fn set_choice_checked(&mut self, page: usize, slot: ChoiceSlot, value: u16) -> Result<bool> {
        let accepted = value == 0 || self.is_choice_in_bounds(value);
        let stored = if accepted { value } else { 0 };
        self.page_mut(page)?.set_choice(slot, stored);
        Ok(accepted)
    }

    // ------------------------------------------------------------------
    // Serialization shortcuts
    // ------------------------------------------------------------------

    /// Decode a story from an in-memory `.storybook` image.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        crate::format::decode(data)
    }

    /// Encode this story with default [`WriteOptions`](crate::format::WriteOptions).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        crate::format::encode(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_pages() -> Story {
        let mut story = Story::new("Cave", "Ann");
        story.add_page(Page::new("Start").with_choices(2, 3));
        story.add_page(Page::new("Left").with_choices(1, 0));
        story.add_page(Page::new("Right"));
        story
    }

    #[test]
    fn test_new_story_is_empty() {
        let story = Story::new("T", "A");
        assert!(story.is_empty());
        assert_eq!(story.current_page_index(), 0);
        assert!(matches!(
            story.current_page(),
            Err(Error::IndexOutOfRange { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_new_or_default() {
        let story = Story::new_or_default("", "");
        assert_eq!(story.title(), DEFAULT_TITLE);
        assert_eq!(story.author(), DEFAULT_AUTHOR);

        let story = Story::new_or_default("Mine", "");
        assert_eq!(story.title(), "Mine");
    }

    #[test]
    fn test_turn_to_sets_cursor() {
        let mut story = three_pages();
        assert_eq!(story.turn_to(2).unwrap().text(), "Right");
        assert_eq!(story.current_page_index(), 2);
    }

    #[test]
    fn test_turn_to_out_of_range_keeps_cursor() {
        let mut story = three_pages();
        story.turn_to(1).unwrap();
        let err = story.turn_to(3).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 3, len: 3 }));
        assert_eq!(story.current_page_index(), 1);
    }

    #[test]
    fn test_follow_uses_one_based_choice() {
        let mut story = three_pages();
        assert_eq!(story.follow(ChoiceSlot::Second).unwrap().text(), "Right");
        assert_eq!(story.current_page_index(), 2);
    }

    #[test]
    fn test_follow_zero_choice_is_rejected() {
        let mut story = three_pages();
        story.turn_to(1).unwrap();
        let err = story.follow(ChoiceSlot::Second).unwrap_err();
        assert!(matches!(
            err,
            Error::AbsentChoice {
                page: 1,
                slot: ChoiceSlot::Second
            }
        ));
        assert_eq!(story.current_page_index(), 1);
    }

    #[test]
    fn test_follow_dangling_choice() {
        let mut story = Story::new("T", "A");
        story.add_page(Page::new("only").with_choices(5, 0));
        let err = story.follow(ChoiceSlot::First).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 4, len: 1 }));
        assert_eq!(story.current_page_index(), 0);
    }

    #[test]
    fn test_bounds_check_uses_greater_than() {
        let story = three_pages();
        assert!(!story.is_choice_in_bounds(0));
        assert!(story.is_choice_in_bounds(1));
        assert!(story.is_choice_in_bounds(3));
        assert!(!story.is_choice_in_bounds(4));
    }

    #[test]
    fn test_dangling_choices_report() {
        let mut story = three_pages();
        story.page_mut(2).unwrap().set_choice2(9);
        story.page_mut(0).unwrap().set_choice1(4);

        let dangling = story.dangling_choices();
        assert_eq!(
            dangling,
            vec![
                DanglingChoice {
                    page: 0,
                    slot: ChoiceSlot::First,
                    target: 4
                },
                DanglingChoice {
                    page: 2,
                    slot: ChoiceSlot::Second,
                    target: 9
                },
            ]
        );

        story.add_placeholder_page();
        assert_eq!(story.dangling_choices().len(), 1);
    }

    #[test]
    fn test_set_choice_checked() {
        let mut story = three_pages();
        assert!(story.set_choice_checked(2, ChoiceSlot::First, 3).unwrap());
        assert_eq!(story.page(2).unwrap().choice1(), 3);

        assert!(!story.set_choice_checked(2, ChoiceSlot::First, 4).unwrap());
        assert_eq!(story.page(2).unwrap().choice1(), 0);

        assert!(story.set_choice_checked(2, ChoiceSlot::Second, 0).unwrap());
        assert!(story.set_choice_checked(7, ChoiceSlot::First, 1).is_err());
    }
}
