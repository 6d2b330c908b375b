//! # storybook
//!
//! Reader and writer for `.storybook` files: choose-your-own-adventure
//! stories made of pages with text, an optional image and up to two
//! choices that jump to other pages.
//!
//! ## Quick Start
//!
//! ```no_run
//! use storybook::{read_story, write_story};
//!
//! let mut story = read_story("cave.storybook").unwrap();
//! story.set_author("Someone Else");
//! write_story(&story, "cave-edited.storybook").unwrap();
//! ```
//!
//! ## Building and Reading a Story
//!
//! ```
//! use storybook::{ChoiceSlot, Page, Story};
//!
//! let mut story = Story::new("The Cave", "Ann");
//! story.add_page(Page::new("You stand at the mouth of a cave.").with_choices(2, 3));
//! story.add_page(Page::new("It is dark. You are eaten by a grue."));
//! story.add_page(Page::new("You walk home and have tea."));
//!
//! let bytes = story.to_bytes().unwrap();
//! let mut story = Story::from_bytes(&bytes).unwrap();
//!
//! let page = story.follow(ChoiceSlot::Second).unwrap();
//! assert_eq!(page.text(), "You walk home and have tea.");
//! assert_eq!(story.current_page_index(), 2);
//! ```

pub mod error;
pub mod format;
pub mod io;
pub mod story;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{Error, Field, Result};
pub use format::{
    WriteOptions, read_story, read_story_from_reader, write_story, write_story_to_writer,
};
pub use story::{ChoiceSlot, DEFAULT_AUTHOR, DEFAULT_TITLE, DanglingChoice, Page, Story};
