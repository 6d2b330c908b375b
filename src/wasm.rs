//! WASM bindings for reading storybooks in the browser.

use wasm_bindgen::prelude::*;

use crate::story::Story;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn load(data: &[u8]) -> Result<Story, JsValue> {
    Story::from_bytes(data).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// One-line summary of a `.storybook` file: title, author and page count.
#[wasm_bindgen]
pub fn story_info(data: &[u8]) -> Result<String, JsValue> {
    let story = load(data)?;
    Ok(format!(
        "{} - By: {} ({} pages)",
        story.title(),
        story.author(),
        story.len()
    ))
}

/// Text of the page at `index` (0-based).
#[wasm_bindgen]
pub fn page_text(data: &[u8], index: usize) -> Result<String, JsValue> {
    let story = load(data)?;
    let page = story
        .page(index)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(page.text().to_string())
}

/// Choices pointing past the last page, one per line as
/// `page <n>: <slot> -> <target>` with 1-based page numbers.
#[wasm_bindgen]
pub fn dangling_choices(data: &[u8]) -> Result<String, JsValue> {
    let story = load(data)?;
    Ok(story
        .dangling_choices()
        .iter()
        .map(|d| format!("page {}: {} -> {}", d.page + 1, d.slot, d.target))
        .collect::<Vec<_>>()
        .join("\n"))
}
